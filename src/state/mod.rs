/// State management module
///
/// This module handles all application state, including:
/// - The brightness model (edit.rs)
/// - Shared data structures (data.rs)
/// - The editing session owned by the UI (session.rs)
/// - The shared-storage media index (media_store.rs)

pub mod data;
pub mod edit;
pub mod media_store;
pub mod session;
