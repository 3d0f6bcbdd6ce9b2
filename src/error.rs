/// Crate-wide error type
///
/// Every fallible operation in the library returns `Result<T>`. Only the
/// save pipeline boundary flattens these into a plain `bool`.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied value is outside its documented domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Shared storage refused to hand out a new entry
    #[error("Failed to register media entry: {0}")]
    StorageRegistration(String),

    /// Opening, writing or closing an output stream failed
    #[error("Stream IO error: {0}")]
    StreamIo(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Media index error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The save worker has shut down and no longer accepts jobs
    #[error("Save worker is not running")]
    WorkerUnavailable,
}
