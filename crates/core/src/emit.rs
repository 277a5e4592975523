//! Page emission: places every slide of a deck into its grid cell and draws it.
//!
//! Per cell the drawing order is fixed: category color over the whole cell, the
//! category badge and release tags in the bottom strip, the white content panel,
//! then summary, aim label and description stacked from the top of the panel.

use crate::config::{Color, Configuration, FontStyle, AIM_RESOURCE};
use crate::deck::{Deck, ResolvedSlide};
use crate::extract::DescriptionExtractor;
use crate::fit::{layout_text, FontMetrics, TextFitter, TextLayout};
use crate::geometry::{Rect, Size};
use crate::grid::{CellPlacement, GridLayout};
use crate::surface::{DocumentInfo, Surface, TextBlock};
use crate::types::Collection;
use crate::{Error, Result};

/// Creator entry of the document information dictionary.
pub const CREATOR: &str = concat!("demoslides ", env!("CARGO_PKG_VERSION"));

/// Metadata for the document of a collection.
pub fn document_info(collection: &Collection) -> DocumentInfo {
    DocumentInfo {
        title: collection.name.clone(),
        author: None,
        subject: format!("Items of {}.", collection.name),
        creator: CREATOR.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    NotStarted,
    PageOpen,
    CellDrawn,
    PageClosed,
    Done,
}

/// Counts of one emission run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub pages: usize,
    pub slides: usize,

    /// Text blocks that did not fit even at the minimum font size.
    pub overflowed: usize,
}

/// Drives a [`Surface`] through one document.
pub struct PageEmitter<'a> {
    config: &'a Configuration,
    layout: GridLayout,
    extractor: DescriptionExtractor,
    fitter: TextFitter<'a>,
    state: EmitterState,
}

impl<'a> PageEmitter<'a> {
    /// Plan the grid on `paper` (portrait) for the given configuration.
    pub fn new(config: &'a Configuration, metrics: &'a dyn FontMetrics, paper: Size) -> Self {
        Self {
            config,
            layout: GridLayout::from_config(config, paper),
            extractor: DescriptionExtractor::from_config(config),
            fitter: TextFitter::new(metrics, config.min_font_size),
            state: EmitterState::NotStarted,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Emit all slides of `deck` as one document.
    pub fn emit(
        &mut self,
        info: &DocumentInfo,
        deck: &Deck,
        surface: &mut dyn Surface,
    ) -> Result<EmitSummary> {
        if deck.is_empty() {
            return Err(Error::NoItemsSelected);
        }
        if self.state != EmitterState::NotStarted {
            return Err(Error::DrawingError("emitter was already used".to_string()));
        }

        log::debug!(
            "Emitting {} slides on {} pages, {} per page ({}x{})",
            deck.len(),
            self.layout.page_count(deck.len()),
            self.layout.slides_per_page,
            self.layout.columns,
            self.layout.rows
        );

        surface.begin_document(info)?;

        let placements: Vec<CellPlacement> = self.layout.placements(deck.len()).collect();
        let mut summary = EmitSummary::default();
        let mut current_page = None;

        for placement in placements {
            if current_page != Some(placement.page) {
                if current_page.is_some() {
                    self.close_page(surface)?;
                }
                self.open_page(surface)?;
                current_page = Some(placement.page);
                summary.pages += 1;
            }

            let slide = &deck.slides[placement.index];
            summary.overflowed += self.draw_slide(slide, &placement, surface)?;
            self.transition(EmitterState::CellDrawn)?;
            summary.slides += 1;
        }

        self.close_page(surface)?;
        surface.finish()?;
        self.transition(EmitterState::Done)?;

        Ok(summary)
    }

    fn open_page(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.transition(EmitterState::PageOpen)?;
        surface.begin_page(self.layout.page.size)
    }

    fn close_page(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.transition(EmitterState::PageClosed)?;
        surface.end_page()
    }

    fn transition(&mut self, next: EmitterState) -> Result<()> {
        use EmitterState::*;

        let allowed = matches!(
            (self.state, next),
            (NotStarted, PageOpen)
                | (PageOpen | CellDrawn, CellDrawn)
                | (CellDrawn, PageClosed)
                | (PageClosed, PageOpen)
                | (PageClosed, Done)
        );
        if !allowed {
            return Err(Error::DrawingError(format!(
                "invalid emitter transition {:?} -> {:?}",
                self.state, next
            )));
        }

        self.state = next;
        Ok(())
    }

    /// Draw one slide into its cell. Returns the number of overflowing text blocks.
    fn draw_slide(
        &self,
        slide: &ResolvedSlide,
        placement: &CellPlacement,
        surface: &mut dyn Surface,
    ) -> Result<usize> {
        let scale = self.layout.scale;
        let fonts = &self.config.font_settings;
        let geometry =
            self.layout
                .cell_geometry(placement.column, placement.row, &self.config.insets);
        let content = geometry.content;
        let strip_height = self.config.insets.content_background.bottom * scale;
        let color = slide.category.color;

        surface.fill_rect(geometry.cell, color)?;

        // category badge, right-aligned in the bottom strip
        let category_style = &fonts.category;
        let category_insets = category_style.insets.scaled(scale);
        let category = self.badge(
            &slide.category_label(),
            category_style,
            content.width() - category_insets.left - category_insets.right,
            strip_height - category_insets.bottom,
        );
        let category_width = category.widest_line;
        let category_rect = Rect::new(
            content.max_x() - category_width - category_insets.right,
            geometry.cell.min_y() + (strip_height - category.height) / 2.0 + category_insets.bottom,
            category_width,
            category.height,
        );
        surface.draw_text(&text_block(category, category_style, Color::WHITE, category_rect))?;

        // release tags, left-aligned in the same strip
        let tag_font = fonts.release_tags.font_name.as_str();
        let tags = self.config.release_tag_label(&slide.item.release_tags, |glyph| {
            self.fitter.metrics().can_render(tag_font, glyph)
        });
        if !tags.is_empty() {
            let tag_style = &fonts.release_tags;
            let tag_insets = tag_style.insets.scaled(scale);
            let tags = self.badge(
                &tags,
                tag_style,
                content.width() - category_width - category_insets.right - tag_insets.left,
                strip_height - tag_insets.bottom,
            );
            let tag_rect = Rect::new(
                content.min_x() + tag_insets.left,
                geometry.cell.min_y() + (strip_height - tags.height) / 2.0 + tag_insets.bottom,
                tags.widest_line,
                tags.height,
            );
            surface.draw_text(&text_block(tags, tag_style, Color::WHITE, tag_rect))?;
        }

        surface.fill_rect(geometry.content_background, Color::WHITE)?;

        let extracted = self.extractor.extract(slide.item.description.as_deref());

        log::debug!("Item {}: {}", slide.item.key, slide.item.summary);
        log::debug!(
            "Original description: {}",
            slide.item.description.as_deref().unwrap_or("No description")
        );
        log::debug!(
            "Cleansed description: {}",
            extracted
                .as_ref()
                .map_or("No cleansed description", |e| e.text.as_str())
        );
        log::debug!(
            "Applied pattern: {}",
            extracted
                .as_ref()
                .and_then(|e| e.pattern.as_ref())
                .map_or("No pattern applied".to_string(), |p| format!("{:?}", p))
        );

        let description = extracted
            .as_ref()
            .map(|e| e.text.as_str())
            .filter(|text| !text.is_empty());
        let aim = description.and(self.config.text_resource(AIM_RESOURCE));

        let roles = [
            (Some(slide.item.summary.as_str()), &fonts.summary),
            (aim, &fonts.aim),
            (description, &fonts.description),
        ];

        let mut space = content;
        let mut overflowed = 0;

        for (text, style) in roles {
            let Some(text) = text.filter(|t| !t.is_empty()) else {
                continue;
            };

            let insets = style.insets.scaled(scale);
            let bounds = Size::new(
                space.width() - insets.left - insets.right,
                space.height() - insets.top - insets.bottom,
            );

            let fitted = self.fitter.fit(text, bounds, style, scale);
            if fitted.overflow {
                log::warn!("Text of {} overflows its cell", slide.item.key);
                overflowed += 1;
            }

            let rect = Rect::new(
                space.min_x() + insets.left,
                space.max_y() - fitted.size.height - insets.top,
                fitted.size.width,
                fitted.size.height,
            );
            surface.draw_text(&text_block(fitted.layout, style, color, rect))?;

            space = space.remainder_below(fitted.size.height + insets.top + insets.bottom);
        }

        Ok(overflowed)
    }

    /// Badge text at its configured size; badges wrap but never shrink.
    ///
    /// Lines that would rise above `max_height` are dropped, keeping at least one.
    fn badge(&self, text: &str, style: &FontStyle, width: f32, max_height: f32) -> TextLayout {
        let scale = self.layout.scale;
        let font_size = style.font_size * scale;
        let metrics = self.fitter.metrics();
        let layout = layout_text(metrics, style, scale, font_size, text, width);

        if layout.height <= max_height || layout.lines.len() <= 1 {
            return layout;
        }

        // height of n lines is n * advance minus one spacing
        let spacing = layout.lines.len() as f32 * layout.line_advance - layout.height;
        let fitting = ((max_height + spacing) / layout.line_advance).floor().max(1.0) as usize;
        log::debug!(
            "Badge \"{}\" cut to {} of {} lines",
            text,
            fitting,
            layout.lines.len()
        );

        let kept = layout.lines[..fitting].join("\n");
        layout_text(metrics, style, scale, font_size, &kept, width)
    }
}

fn text_block(layout: TextLayout, style: &FontStyle, color: Color, rect: Rect) -> TextBlock {
    TextBlock {
        lines: layout.lines,
        font_name: style.font_name.clone(),
        font_size: layout.font_size,
        line_advance: layout.line_advance,
        color,
        underline: style.is_underlined,
        rect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::testing::*;
    use crate::category::{Category, CategoryResolver};
    use crate::fit::ApproximateMetrics;
    use crate::grid::A4;
    use crate::surface::RecordingSurface;
    use crate::types::SlideItem;
    use std::collections::BTreeMap;

    const RED: Color = Color {
        red: 1.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
    };
    const BLUE: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 1.0,
        alpha: 1.0,
    };

    fn config(items_per_page: usize) -> Configuration {
        let mut categories = BTreeMap::new();
        categories.insert(
            "Payments".to_string(),
            Category::new(vec!["Checkout".to_string()], RED),
        );
        categories.insert(
            "Accounts".to_string(),
            Category::new(vec!["Login".to_string()], BLUE),
        );
        let mut config = Configuration::with_categories(categories);
        config.items_per_page = items_per_page;
        config
    }

    fn deck(items: Vec<SlideItem>, config: &mut Configuration) -> Deck {
        let mut source = FakeSource::default()
            .with_grouping("EP-1", "Checkout")
            .with_grouping("EP-2", "Login");
        let mut prompter = ScriptedPrompter::default();
        let mut store = MemoryStore::default();
        let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
        Deck::prepare(items, &mut resolver, config).unwrap()
    }

    fn render(config: &Configuration, deck: &Deck) -> (EmitSummary, RecordingSurface) {
        let metrics = ApproximateMetrics::default();
        let mut surface = RecordingSurface::new();
        let mut emitter = PageEmitter::new(config, &metrics, A4);
        let info = document_info(&Collection::new(7, "Sprint 42"));
        let summary = emitter.emit(&info, deck, &mut surface).unwrap();
        assert_eq!(emitter.state(), EmitterState::Done);
        (summary, surface)
    }

    fn is_cell_fill(color: &Color) -> bool {
        *color == RED || *color == BLUE
    }

    #[test]
    fn test_five_slides_two_per_page() {
        let mut config = config(2);
        let items = vec![
            SlideItem::new(1, "S-1", "Pay by card").with_grouping("EP-1"),
            SlideItem::new(2, "S-2", "Sign in").with_grouping("EP-2"),
            SlideItem::new(3, "S-3", "Refund").with_grouping("EP-1"),
            SlideItem::new(4, "S-4", "Sign out").with_grouping("EP-2"),
            SlideItem::new(5, "S-5", "Invoice").with_grouping("EP-1"),
        ];
        let deck = deck(items, &mut config);
        let (summary, surface) = render(&config, &deck);

        assert_eq!(summary.pages, 3);
        assert_eq!(summary.slides, 5);
        assert_eq!(surface.pages.len(), 3);
        assert!(surface.finished);

        let cells_per_page: Vec<usize> = surface
            .pages
            .iter()
            .map(|page| page.fills().filter(|(_, c)| is_cell_fill(c)).count())
            .collect();
        assert_eq!(cells_per_page, vec![2, 2, 1]);

        // summaries appear in sorted deck order
        let expected: Vec<&str> = deck.slides.iter().map(|s| s.item.summary.as_str()).collect();
        assert_eq!(expected, vec!["Sign in", "Sign out", "Pay by card", "Refund", "Invoice"]);

        let drawn: Vec<String> = surface
            .pages
            .iter()
            .flat_map(|page| page.texts())
            .map(TextBlock::text)
            .filter(|text| expected.contains(&text.as_str()))
            .collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_first_slide_of_page_is_in_the_top_cell() {
        let mut config = config(2);
        let items = vec![
            SlideItem::new(1, "S-1", "Top").with_grouping("EP-1"),
            SlideItem::new(2, "S-2", "Bottom").with_grouping("EP-1"),
        ];
        let deck = deck(items, &mut config);
        let (_, surface) = render(&config, &deck);

        let cells: Vec<Rect> = surface.pages[0]
            .fills()
            .filter(|(_, c)| is_cell_fill(c))
            .map(|(rect, _)| *rect)
            .collect();
        assert_eq!(cells.len(), 2);
        assert!(cells[0].min_y() > cells[1].min_y());
    }

    #[test]
    fn test_aim_only_with_description() {
        let mut config = config(1);
        let items = vec![
            SlideItem::new(1, "S-1", "Plain").with_grouping("EP-1"),
            SlideItem::new(2, "S-2", "Described")
                .with_grouping("EP-1")
                .with_description("User Story:\nAs a buyer I want receipts.\n\nh2. Notes"),
            SlideItem::new(3, "S-3", "Heading only")
                .with_grouping("EP-1")
                .with_description("h1. Nothing else"),
        ];
        let deck = deck(items, &mut config);
        let (_, surface) = render(&config, &deck);

        let texts: Vec<Vec<String>> = surface
            .pages
            .iter()
            .map(|page| page.texts().map(TextBlock::text).collect())
            .collect();

        assert_eq!(texts[0], vec!["Payments / Checkout", "Plain"]);
        assert_eq!(texts[1].len(), 4);
        assert_eq!(texts[1][2], "Ziel:");
        assert_eq!(texts[1][3].replace('\n', " "), "As a buyer I want receipts.");
        assert_eq!(texts[2], vec!["Payments / Checkout", "Heading only"]);
    }

    #[test]
    fn test_blocks_stack_top_down_inside_content() {
        let mut config = config(1);
        let items = vec![SlideItem::new(1, "S-1", "Summary")
            .with_grouping("EP-1")
            .with_description("User Story: A description line\n")];
        let deck = deck(items, &mut config);
        let (_, surface) = render(&config, &deck);

        let layout = GridLayout::from_config(&config, A4);
        let content = layout.cell_geometry(0, 0, &config.insets).content;
        let blocks: Vec<&TextBlock> = surface.pages[0].texts().skip(1).collect();
        assert_eq!(blocks.len(), 3);

        let summary_top = content.max_y() - config.font_settings.summary.insets.top * layout.scale;
        assert!((blocks[0].rect.max_y() - summary_top).abs() < 1e-3);

        for pair in blocks.windows(2) {
            assert!(pair[1].rect.max_y() <= pair[0].rect.min_y() + 1e-3);
        }
        for block in &blocks {
            assert!(content.contains_rect(&block.rect));
        }
        assert!(blocks[1].underline);
        assert_eq!(blocks[0].color, RED);
    }

    #[test]
    fn test_release_tags_drawn_only_when_present() {
        let mut config = config(1);
        let items = vec![
            SlideItem::new(1, "S-1", "Tagged")
                .with_grouping("EP-2")
                .with_release_tags(["iOS", "Web"]),
            SlideItem::new(2, "S-2", "Untagged").with_grouping("EP-2"),
        ];
        let deck = deck(items, &mut config);
        let (_, surface) = render(&config, &deck);

        let first: Vec<String> = surface.pages[0].texts().map(TextBlock::text).collect();
        assert_eq!(first, vec!["Accounts / Login", "🍏 Web", "Tagged"]);

        let badge = surface.pages[0].texts().next().unwrap();
        let tags = surface.pages[0].texts().nth(1).unwrap();
        assert_eq!(badge.color, Color::WHITE);
        assert!(tags.rect.min_x() < badge.rect.min_x());

        assert_eq!(surface.pages[1].texts().count(), 2);
    }

    #[test]
    fn test_long_badge_stays_in_bottom_strip() {
        let long_name = "Checkout and payment provider migration ".repeat(5);
        let long_name = long_name.trim().to_string();

        let mut config = config(2);
        config.categories.insert(
            "Migration".to_string(),
            Category::new(vec![long_name.clone()], RED),
        );

        let mut source = FakeSource::default().with_grouping("EP-9", &long_name);
        let mut prompter = ScriptedPrompter::default();
        let mut store = MemoryStore::default();
        let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
        let items = vec![SlideItem::new(1, "S-1", "Move").with_grouping("EP-9")];
        let deck = Deck::prepare(items, &mut resolver, &mut config).unwrap();

        let (_, surface) = render(&config, &deck);
        let page = &surface.pages[0];

        let cell = page
            .fills()
            .find(|(_, c)| is_cell_fill(c))
            .map(|(rect, _)| *rect)
            .unwrap();
        let badge = page
            .texts()
            .find(|block| block.text().starts_with("Migration"))
            .unwrap();

        let layout = GridLayout::from_config(&config, A4);
        let strip_height = config.insets.content_background.bottom * layout.scale;

        assert!(badge.lines.len() > 1);
        assert!(badge.rect.height() <= strip_height);
        assert!(badge.rect.min_y() >= cell.min_y());
        assert!(badge.rect.max_y() <= cell.min_y() + strip_height + 1e-3);
    }

    #[test]
    fn test_cells_only_drawn_on_open_page() {
        let config = config(2);
        let metrics = ApproximateMetrics::default();
        let mut emitter = PageEmitter::new(&config, &metrics, A4);

        assert!(matches!(
            emitter.transition(EmitterState::CellDrawn),
            Err(Error::DrawingError(_))
        ));

        emitter.transition(EmitterState::PageOpen).unwrap();
        assert!(matches!(
            emitter.transition(EmitterState::PageClosed),
            Err(Error::DrawingError(_))
        ));
        emitter.transition(EmitterState::CellDrawn).unwrap();
        emitter.transition(EmitterState::CellDrawn).unwrap();
        emitter.transition(EmitterState::PageClosed).unwrap();
        assert!(emitter.transition(EmitterState::CellDrawn).is_err());
        assert_eq!(emitter.state(), EmitterState::PageClosed);
    }

    #[test]
    fn test_landscape_pages_for_square_grid() {
        let mut config = config(4);
        let deck = deck(vec![SlideItem::new(1, "S-1", "One")], &mut config);
        let (summary, surface) = render(&config, &deck);

        assert_eq!(summary.pages, 1);
        assert!(surface.pages[0].size.width > surface.pages[0].size.height);
    }

    #[test]
    fn test_document_metadata() {
        let mut config = config(2);
        let deck = deck(vec![SlideItem::new(1, "S-1", "One")], &mut config);
        let (_, surface) = render(&config, &deck);

        let info = surface.info.unwrap();
        assert_eq!(info.title, "Sprint 42");
        assert_eq!(info.subject, "Items of Sprint 42.");
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let config = config(2);
        let metrics = ApproximateMetrics::default();
        let mut surface = RecordingSurface::new();
        let mut emitter = PageEmitter::new(&config, &metrics, A4);

        let result = emitter.emit(&DocumentInfo::default(), &Deck::default(), &mut surface);
        assert!(matches!(result, Err(Error::NoItemsSelected)));
        assert!(surface.info.is_none());
    }

    #[test]
    fn test_emitter_runs_once() {
        let mut config = config(2);
        let deck = deck(vec![SlideItem::new(1, "S-1", "One")], &mut config);
        let metrics = ApproximateMetrics::default();
        let mut emitter = PageEmitter::new(&config, &metrics, A4);

        let mut first = RecordingSurface::new();
        emitter.emit(&DocumentInfo::default(), &deck, &mut first).unwrap();

        let mut second = RecordingSurface::new();
        let result = emitter.emit(&DocumentInfo::default(), &deck, &mut second);
        assert!(matches!(result, Err(Error::DrawingError(_))));
    }
}
