//! Font-fit text layout.
//!
//! Text is wrapped to a fixed width and the font size is lowered in fixed steps
//! until the wrapped block fits the available height.

use crate::config::FontStyle;
use crate::geometry::Size;

/// Decrement applied per fit attempt, in points.
pub const FONT_SIZE_STEP: f32 = 0.5;

/// Measures text set in a named font.
pub trait FontMetrics {
    /// Advance width of `text` on a single line.
    fn text_width(&self, font_name: &str, font_size: f32, text: &str) -> f32;

    /// Natural distance between two baselines.
    fn line_height(&self, _font_name: &str, font_size: f32) -> f32 {
        font_size * 1.2
    }

    /// Whether every character of `text` has a glyph in the font.
    fn can_render(&self, _font_name: &str, _text: &str) -> bool {
        true
    }
}

/// Metrics assuming every character has the same advance.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMetrics {
    /// Advance of one character as a fraction of the font size.
    pub average_advance: f32,
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            average_advance: 0.6,
        }
    }
}

impl FontMetrics for ApproximateMetrics {
    fn text_width(&self, _font_name: &str, font_size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * font_size * self.average_advance
    }
}

/// Text wrapped at one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub font_size: f32,

    /// Distance between consecutive baselines, spacing included.
    pub line_advance: f32,

    /// Height of the whole block.
    pub height: f32,

    /// Width of the longest line.
    pub widest_line: f32,
}

/// Paragraph attributes after scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Paragraph {
    line_spacing: f32,
    maximum_line_height: f32,
}

impl Paragraph {
    fn from_style(style: &FontStyle, scale: f32) -> Self {
        Self {
            line_spacing: style.line_spacing * scale,
            maximum_line_height: style.maximum_line_height * scale,
        }
    }
}

/// Wrap `text` at `font_size` into lines no wider than `width`.
pub fn layout_text(
    metrics: &dyn FontMetrics,
    style: &FontStyle,
    scale: f32,
    font_size: f32,
    text: &str,
    width: f32,
) -> TextLayout {
    let paragraph = Paragraph::from_style(style, scale);
    let measure = |s: &str| metrics.text_width(&style.font_name, font_size, s);

    let lines = wrap_lines(text, width, &measure);

    let mut line_height = metrics.line_height(&style.font_name, font_size);
    if paragraph.maximum_line_height > 0.0 {
        line_height = line_height.min(paragraph.maximum_line_height);
    }

    let height = if lines.is_empty() {
        0.0
    } else {
        lines.len() as f32 * line_height + (lines.len() - 1) as f32 * paragraph.line_spacing
    };
    let widest_line = lines.iter().map(|l| measure(l)).fold(0.0, f32::max);

    TextLayout {
        lines,
        font_size,
        line_advance: line_height + paragraph.line_spacing,
        height,
        widest_line,
    }
}

/// Greedy word wrap per paragraph; words wider than `width` break between characters.
fn wrap_lines(text: &str, width: f32, measure: &dyn Fn(&str) -> f32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure(&candidate) <= width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, width, measure);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

/// Split a word into pieces that fit `width`, at least one character each.
fn break_word(word: &str, width: f32, measure: &dyn Fn(&str) -> f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if measure(&current) > width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::replace(&mut current, c.to_string()));
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// A text block sized to fit its box.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub layout: TextLayout,

    /// Box width and the measured block height.
    pub size: Size,

    /// Still too tall at the smallest allowed size.
    pub overflow: bool,
}

/// Finds the largest font size, in fixed steps, at which text fits a box.
#[derive(Clone, Copy)]
pub struct TextFitter<'m> {
    metrics: &'m dyn FontMetrics,
    min_font_size: f32,
}

impl<'m> TextFitter<'m> {
    /// Minimums below one step (zero, negative or NaN) are raised to one step.
    pub fn new(metrics: &'m dyn FontMetrics, min_font_size: f32) -> Self {
        let floor = min_font_size.max(FONT_SIZE_STEP);
        if floor != min_font_size {
            log::warn!(
                "Minimum font size {} raised to {}pt",
                min_font_size,
                floor
            );
        }

        Self {
            metrics,
            min_font_size: floor,
        }
    }

    pub fn metrics(&self) -> &'m dyn FontMetrics {
        self.metrics
    }

    /// Shrink from `style.font_size * scale` until the block is no taller than `bounds`.
    ///
    /// Sizes only ever decrease. The search stops at the minimum font size; a block
    /// that still overflows there is returned with `overflow` set.
    pub fn fit(&self, text: &str, bounds: Size, style: &FontStyle, scale: f32) -> FittedText {
        let mut font_size = style.font_size * scale;

        loop {
            let layout = layout_text(self.metrics, style, scale, font_size, text, bounds.width);

            if layout.height <= bounds.height {
                return self.fitted(layout, bounds, false);
            }

            let next = font_size - FONT_SIZE_STEP;
            if next < self.min_font_size {
                log::warn!(
                    "Text does not fit {:.1}x{:.1} even at {:.1}pt: {:?}",
                    bounds.width,
                    bounds.height,
                    font_size,
                    text
                );
                return self.fitted(layout, bounds, true);
            }
            font_size = next;
        }
    }

    fn fitted(&self, layout: TextLayout, bounds: Size, overflow: bool) -> FittedText {
        FittedText {
            size: Size::new(bounds.width, layout.height),
            layout,
            overflow,
        }
    }
}
