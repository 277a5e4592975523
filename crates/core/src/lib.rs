//! Core domain types, description extraction, category resolution, grid layout
//! and page emission for printable work-item slide decks.

pub mod category;
pub mod collab;
pub mod config;
pub mod deck;
pub mod emit;
pub mod error;
pub mod extract;
pub mod fit;
pub mod geometry;
pub mod grid;
pub mod surface;
pub mod types;

pub use category::{Category, CategoryResolver, Resolution, FEATURE_CATEGORY};
pub use collab::{ConfigStore, ItemSource, Prompter};
pub use config::{Color, Configuration, DescriptionPattern, FontStyle, Insets};
pub use deck::{Deck, ResolvedSlide};
pub use emit::{document_info, EmitSummary, PageEmitter};
pub use error::{Error, Result};
pub use extract::{DescriptionExtractor, ExtractedDescription};
pub use fit::{FontMetrics, TextFitter};
pub use geometry::{Rect, Size};
pub use grid::{GridLayout, A4};
pub use surface::{DocumentInfo, RecordingSurface, Surface, TextBlock};
pub use types::{Collection, Grouping, SlideItem};
