//! Grid layout planning: slides per page, columns, rows and cell geometry.
//!
//! The grid always holds a power of two of slides. Cells are filled column by
//! column, top to bottom within a column. Which cell a slide gets and where that
//! cell sits on the page are computed separately: [`GridLayout::placements`] for
//! the order, [`GridLayout::cell_rect`] for the page-space position.

use crate::config::{Configuration, ContentInsets, Insets};
use crate::geometry::{Point, Rect, Size};

/// ISO A4 in points, portrait.
pub const A4: Size = Size::new(595.28, 841.89);

/// Space left between neighbouring cells.
const GUTTER: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Effective slides per page, columns and rows for a requested items-per-page count.
///
/// Slides per page is the next power of two; columns get the smaller half of the
/// exponent, so rows equal columns or are twice as many.
pub fn grid_dimensions(items_per_page: usize) -> (usize, usize, usize) {
    let exponent = items_per_page.max(1).next_power_of_two().trailing_zeros();
    let slides_per_page = 1usize << exponent;
    let columns = 1usize << (exponent / 2);
    let rows = slides_per_page / columns;
    (slides_per_page, columns, rows)
}

/// Position of one slide in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    /// Index into the ordered slide list.
    pub index: usize,
    pub page: usize,
    pub column: usize,
    pub row: usize,
}

/// The nested rectangles of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// Whole cell, filled with the category color.
    pub cell: Rect,

    /// White panel behind the text.
    pub content_background: Rect,

    /// Area the text blocks are stacked in.
    pub content: Rect,
}

/// Page and cell geometry for one deck.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub slides_per_page: usize,
    pub columns: usize,
    pub rows: usize,
    pub orientation: Orientation,
    pub page: Rect,
    pub printable: Rect,
    pub column_width: f32,
    pub row_height: f32,
    pub cell_size: Size,

    /// Applied to every font size and inset: `1 / sqrt(slides_per_page)`.
    pub scale: f32,
}

impl GridLayout {
    /// Plan a grid on `paper` (given in portrait). `printable_insets` limits the
    /// usable area; `None` uses the full page.
    pub fn plan(items_per_page: usize, paper: Size, printable_insets: Option<&Insets>) -> Self {
        let (slides_per_page, columns, rows) = grid_dimensions(items_per_page);

        let orientation = if columns == rows {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };

        let page_size = match orientation {
            Orientation::Landscape if paper.height > paper.width => paper.swapped(),
            Orientation::Portrait if paper.width > paper.height => paper.swapped(),
            _ => paper,
        };
        let page = Rect::from_size(page_size);
        let printable = printable_insets.map_or(page, |insets| page.inset(insets));

        let column_width = (printable.width() / columns as f32).floor();
        let row_height = (printable.height() / rows as f32).floor();
        let cell_size = Size::new(
            column_width - if columns > 1 { GUTTER } else { 0.0 },
            row_height - if rows > 1 { GUTTER } else { 0.0 },
        );

        Self {
            slides_per_page,
            columns,
            rows,
            orientation,
            page,
            printable,
            column_width,
            row_height,
            cell_size,
            scale: 1.0 / (slides_per_page as f32).sqrt(),
        }
    }

    /// Plan the grid described by a configuration.
    pub fn from_config(config: &Configuration, paper: Size) -> Self {
        let printable = config
            .limit_to_printable_area
            .then_some(&config.printable_area_insets);
        Self::plan(config.items_per_page, paper, printable)
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.slides_per_page)
    }

    /// Cell assignment for `total` slides: pages in order, columns outer, rows inner.
    pub fn placements(&self, total: usize) -> impl Iterator<Item = CellPlacement> + '_ {
        (0..total).map(move |index| {
            let page = index / self.slides_per_page;
            let position = index % self.slides_per_page;
            CellPlacement {
                index,
                page,
                column: position / self.rows,
                row: position % self.rows,
            }
        })
    }

    /// Page-space rectangle of a cell. Row 0 is the top row while the page origin
    /// is bottom-left, so rows are counted down from the printable top edge.
    pub fn cell_rect(&self, column: usize, row: usize) -> Rect {
        let x = self.printable.min_x() + column as f32 * self.column_width;
        let y = self.printable.min_y() + self.printable.height()
            - self.row_height
            - row as f32 * self.row_height;
        Rect {
            origin: Point::new(x, y),
            size: self.cell_size,
        }
    }

    /// Cell, content panel and text area for a cell, insets scaled.
    pub fn cell_geometry(&self, column: usize, row: usize, insets: &ContentInsets) -> CellGeometry {
        let cell = self.cell_rect(column, row);
        let content_background = cell.inset(&insets.content_background.scaled(self.scale));
        let content = content_background.inset(&insets.content.scaled(self.scale));
        CellGeometry {
            cell,
            content_background,
            content,
        }
    }
}
