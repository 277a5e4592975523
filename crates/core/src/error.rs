//! Error types for slide deck composition.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing or emitting a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// No stored configuration exists yet.
    #[error("No configuration found. Run with --init to create one.")]
    ConfigurationMissing,

    /// The stored configuration cannot be used as-is.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The item source returned nothing or the collection lookup failed.
    #[error("No items loaded: {0}")]
    NoItemsLoaded(String),

    /// The selection left no items to print.
    #[error("No items selected")]
    NoItemsSelected,

    /// The drawing backend could not open its output target.
    #[error("Failed to create drawing surface: {0}")]
    SurfaceCreationError(String),

    /// A drawing call failed or was issued out of order.
    #[error("Drawing error: {0}")]
    DrawingError(String),

    /// The finished document could not be opened in a viewer.
    #[error("Failed to open document in viewer: {0}")]
    RevealError(String),

    /// The item source failed to answer a request.
    #[error("Item source error: {0}")]
    ItemSourceError(String),

    /// The configuration store failed to load or persist.
    #[error("Configuration store error: {0}")]
    ConfigStoreError(String),
}

impl Error {
    /// Whether the run still produced its document despite this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RevealError(_))
    }
}
