//! PDF drawing surface.
//!
//! The document is assembled in memory and only written on [`Surface::finish`],
//! so a run aborted before that leaves no file behind.

use std::path::{Path, PathBuf};

use demoslides_core::geometry::{Rect, Size};
use demoslides_core::surface::{DocumentInfo, Surface, TextBlock};
use demoslides_core::{Color, Error, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::encoding::encode_win_ansi;
use crate::metrics::{StandardFont, ASCENT};

/// Underline thickness and offset below the baseline, as fractions of the font size.
const UNDERLINE_THICKNESS: f32 = 0.05;
const UNDERLINE_OFFSET: f32 = 0.1;

struct OpenPage {
    size: Size,
    operations: Vec<Operation>,
}

/// A [`Surface`] producing a PDF document.
pub struct PdfSurface {
    path: Option<PathBuf>,
    document: Document,
    pages_id: ObjectId,
    resources_id: Option<ObjectId>,
    info: Option<DocumentInfo>,
    page_ids: Vec<ObjectId>,
    page: Option<OpenPage>,
    output: Option<Vec<u8>>,
}

impl PdfSurface {
    /// A surface that writes the finished document to `path`.
    ///
    /// Fails when the directory the file would be created in does not exist.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.is_dir() {
            return Err(Error::SurfaceCreationError(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            if !parent.is_dir() {
                return Err(Error::SurfaceCreationError(format!(
                    "directory {} does not exist",
                    parent.display()
                )));
            }
        }

        let mut surface = Self::in_memory();
        surface.path = Some(path);
        Ok(surface)
    }

    /// A surface that keeps the finished document in memory only.
    pub fn in_memory() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        Self {
            path: None,
            document,
            pages_id,
            resources_id: None,
            info: None,
            page_ids: Vec::new(),
            page: None,
            output: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The serialized document, available after `finish`.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    fn open_page(&mut self) -> Result<&mut OpenPage> {
        self.page
            .as_mut()
            .ok_or_else(|| Error::DrawingError("no page is open".to_string()))
    }

    fn font_resources(&mut self) -> ObjectId {
        let mut fonts = Dictionary::new();
        for font in StandardFont::ALL {
            let font_id = self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        self.document.add_object(dictionary! {
            "Font" => fonts,
        })
    }

    fn info_dictionary(info: &DocumentInfo) -> Dictionary {
        let mut dictionary = dictionary! {
            "Title" => text_string(&info.title),
            "Subject" => text_string(&info.subject),
            "Creator" => text_string(&info.creator),
            "Producer" => text_string(&info.creator),
        };
        if let Some(author) = &info.author {
            dictionary.set("Author", text_string(author));
        }
        dictionary
    }
}

impl Surface for PdfSurface {
    fn begin_document(&mut self, info: &DocumentInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(Error::DrawingError("document already started".to_string()));
        }

        self.resources_id = Some(self.font_resources());
        self.info = Some(info.clone());
        Ok(())
    }

    fn begin_page(&mut self, size: Size) -> Result<()> {
        if self.info.is_none() || self.output.is_some() {
            return Err(Error::DrawingError("no open document".to_string()));
        }
        if self.page.is_some() {
            return Err(Error::DrawingError("previous page still open".to_string()));
        }

        self.page = Some(OpenPage {
            size,
            operations: Vec::new(),
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let page = self.open_page()?;

        page.operations.extend([
            Operation::new("q", vec![]),
            fill_color(color),
            Operation::new(
                "re",
                vec![
                    rect.min_x().into(),
                    rect.min_y().into(),
                    rect.width().into(),
                    rect.height().into(),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn draw_text(&mut self, block: &TextBlock) -> Result<()> {
        let font = StandardFont::for_name(&block.font_name);
        let page = self.open_page()?;

        let x = block.rect.min_x();
        let first_baseline = block.rect.max_y() - block.font_size * ASCENT;

        page.operations.extend([
            Operation::new("q", vec![]),
            fill_color(block.color),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    block.font_size.into(),
                ],
            ),
        ]);

        for (i, line) in block.lines.iter().enumerate() {
            let encoded = encode_win_ansi(line);
            if !encoded.replaced.is_empty() {
                log::warn!(
                    "Characters {:?} cannot be set in {}, printed as '?'",
                    encoded.replaced,
                    font.base_font()
                );
            }

            let baseline = first_baseline - i as f32 * block.line_advance;
            page.operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    x.into(),
                    baseline.into(),
                ],
            ));
            page.operations.push(Operation::new(
                "Tj",
                vec![Object::String(encoded.bytes, StringFormat::Literal)],
            ));
        }

        page.operations.push(Operation::new("ET", vec![]));

        if block.underline {
            page.operations.extend([
                stroke_color(block.color),
                Operation::new("w", vec![(block.font_size * UNDERLINE_THICKNESS).into()]),
            ]);

            for (i, line) in block.lines.iter().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let width = font.text_width(block.font_size, line);
                let y = first_baseline
                    - i as f32 * block.line_advance
                    - block.font_size * UNDERLINE_OFFSET;
                page.operations.extend([
                    Operation::new("m", vec![x.into(), y.into()]),
                    Operation::new("l", vec![(x + width).into(), y.into()]),
                    Operation::new("S", vec![]),
                ]);
            }
        }

        page.operations.push(Operation::new("Q", vec![]));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let page = self
            .page
            .take()
            .ok_or_else(|| Error::DrawingError("no page is open".to_string()))?;
        let resources_id = self
            .resources_id
            .ok_or_else(|| Error::DrawingError("no open document".to_string()))?;

        let content = Content {
            operations: page.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::DrawingError(format!("Failed to encode page content: {}", e)))?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                page.size.width.into(),
                page.size.height.into(),
            ],
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let Some(info) = self.info.as_ref() else {
            return Err(Error::DrawingError("no open document".to_string()));
        };
        if self.page.is_some() || self.output.is_some() {
            return Err(Error::DrawingError(
                "document cannot be finished in its current state".to_string(),
            ));
        }

        let info_id = self.document.add_object(Self::info_dictionary(info));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);
        self.document.compress();

        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| Error::DrawingError(format!("Failed to serialize document: {}", e)))?;

        if let Some(path) = &self.path {
            // write beside the target, then move it into place in one step
            let temp_path = path.with_extension("pdf.tmp");
            if let Err(e) = std::fs::write(&temp_path, &bytes) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(e.into());
            }
            std::fs::rename(&temp_path, path)?;
            log::info!("Wrote {} pages to {}", self.page_ids.len(), path.display());
        }

        self.output = Some(bytes);
        Ok(())
    }
}

fn fill_color(color: Color) -> Operation {
    Operation::new(
        "rg",
        vec![color.red.into(), color.green.into(), color.blue.into()],
    )
}

fn stroke_color(color: Color) -> Operation {
    Operation::new(
        "RG",
        vec![color.red.into(), color.green.into(), color.blue.into()],
    )
}

/// A PDF text string: literal when ASCII, UTF-16BE with byte order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
