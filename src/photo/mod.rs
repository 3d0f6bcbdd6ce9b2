/// Photo handling module
///
/// This module handles:
/// - Naming and importing captured photos
/// - Decimated live previews
/// - Rendering and writing the adjusted photo
/// - Running saves on a background worker

pub mod capture;
pub mod preview;
pub mod processor;
pub mod saver;
