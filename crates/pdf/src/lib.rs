//! PDF drawing backend for slide decks.
//!
//! Renders pages with the standard Helvetica faces, so no font files are embedded.

pub mod encoding;
pub mod metrics;
pub mod surface;

pub use metrics::{StandardFont, StandardMetrics};
pub use surface::PdfSurface;
