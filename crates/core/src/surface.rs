//! Drawing surface abstraction and an in-memory recording implementation.

use crate::config::Color;
use crate::geometry::{Rect, Size};
use crate::{Error, Result};

/// Metadata written into the document information dictionary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub author: Option<String>,
    pub subject: String,
    pub creator: String,
}

/// A block of pre-wrapped lines set in one font.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font_name: String,
    pub font_size: f32,

    /// Distance between consecutive baselines.
    pub line_advance: f32,

    pub color: Color,
    pub underline: bool,

    /// Box the block is drawn into; the first line hangs from its top edge.
    pub rect: Rect,
}

impl TextBlock {
    /// All lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Output sink for composed pages.
///
/// Calls arrive in a fixed order: `begin_document`, then one or more
/// `begin_page` / drawing / `end_page` runs, then `finish`.
pub trait Surface {
    fn begin_document(&mut self, info: &DocumentInfo) -> Result<()>;

    /// Open a page of the given size, already rotated for the orientation.
    fn begin_page(&mut self, size: Size) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    fn draw_text(&mut self, block: &TextBlock) -> Result<()>;

    fn end_page(&mut self) -> Result<()>;

    /// Finalize and close the document.
    fn finish(&mut self) -> Result<()>;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { rect: Rect, color: Color },
    Text(TextBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPage {
    pub size: Size,
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(block) => Some(block),
            DrawOp::Fill { .. } => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Rect, &Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill { rect, color } => Some((rect, color)),
            DrawOp::Text(_) => None,
        })
    }
}

/// Surface that keeps every call in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub info: Option<DocumentInfo>,
    pub pages: Vec<RecordedPage>,
    pub finished: bool,
    page_open: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_page(&mut self) -> Result<&mut RecordedPage> {
        if !self.page_open {
            return Err(Error::DrawingError("no page is open".to_string()));
        }
        self.pages
            .last_mut()
            .ok_or_else(|| Error::DrawingError("no page is open".to_string()))
    }
}

impl Surface for RecordingSurface {
    fn begin_document(&mut self, info: &DocumentInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(Error::DrawingError("document already started".to_string()));
        }
        self.info = Some(info.clone());
        Ok(())
    }

    fn begin_page(&mut self, size: Size) -> Result<()> {
        if self.info.is_none() || self.finished {
            return Err(Error::DrawingError("no open document".to_string()));
        }
        if self.page_open {
            return Err(Error::DrawingError("previous page still open".to_string()));
        }
        self.pages.push(RecordedPage {
            size,
            ops: Vec::new(),
        });
        self.page_open = true;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.current_page()?.ops.push(DrawOp::Fill { rect, color });
        Ok(())
    }

    fn draw_text(&mut self, block: &TextBlock) -> Result<()> {
        self.current_page()?.ops.push(DrawOp::Text(block.clone()));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        self.current_page()?;
        self.page_open = false;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.info.is_none() || self.page_open || self.finished {
            return Err(Error::DrawingError(
                "document cannot be finished in its current state".to_string(),
            ));
        }
        self.finished = true;
        Ok(())
    }
}
