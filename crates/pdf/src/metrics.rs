//! Glyph widths of the standard Helvetica faces.

use demoslides_core::fit::FontMetrics;
use unicode_normalization::UnicodeNormalization;

use crate::encoding::win_ansi_byte;

/// Helvetica advance widths for codes 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for codes 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Widths of the WinAnsi punctuation block shared by both faces.
const PUNCTUATION_WIDTHS: [(u8, u16); 12] = [
    (0x80, 556),
    (0x82, 222),
    (0x84, 333),
    (0x85, 1000),
    (0x89, 1000),
    (0x91, 222),
    (0x92, 222),
    (0x93, 333),
    (0x94, 333),
    (0x95, 350),
    (0x96, 556),
    (0x97, 1000),
];

const DEFAULT_WIDTH: u16 = 556;

/// Ascender of both faces as a fraction of the font size.
pub const ASCENT: f32 = 0.718;

/// One of the two base-14 faces used for every text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub const ALL: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::HelveticaBold];

    /// The face standing in for a configured font name.
    pub fn for_name(font_name: &str) -> Self {
        if font_name.contains("Bold") {
            Self::HelveticaBold
        } else {
            Self::Helvetica
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name of the font in page resource dictionaries.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
        }
    }

    fn ascii_widths(&self) -> &'static [u16; 95] {
        match self {
            Self::Helvetica => &HELVETICA_WIDTHS,
            Self::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance of one character in 1/1000 em, measured as it will be encoded.
    pub fn char_width(&self, c: char) -> u16 {
        let Some(code) = win_ansi_byte(c) else {
            return self.code_width(b'?');
        };

        if code >= 0xC0 {
            // accented letters are as wide as their base letter
            if let Some(base) = c.nfd().next().filter(char::is_ascii_alphabetic) {
                return self.code_width(base as u8);
            }
        }

        self.code_width(code)
    }

    fn code_width(&self, code: u8) -> u16 {
        match code {
            32..=126 => self.ascii_widths()[(code - 32) as usize],
            _ => PUNCTUATION_WIDTHS
                .iter()
                .find(|(c, _)| *c == code)
                .map_or(DEFAULT_WIDTH, |(_, width)| *width),
        }
    }

    /// Width of `text` at `font_size` points.
    pub fn text_width(&self, font_size: f32, text: &str) -> f32 {
        let units: u32 = text
            .chars()
            .filter(|c| *c != '\u{FE0F}' && *c != '\u{200D}')
            .map(|c| self.char_width(c) as u32)
            .sum();
        units as f32 * font_size / 1000.0
    }
}

/// [`FontMetrics`] of the standard faces, mapping configured names with [`StandardFont::for_name`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl FontMetrics for StandardMetrics {
    fn text_width(&self, font_name: &str, font_size: f32, text: &str) -> f32 {
        StandardFont::for_name(font_name).text_width(font_size, text)
    }

    fn can_render(&self, _font_name: &str, text: &str) -> bool {
        text.chars()
            .filter(|c| *c != '\u{FE0F}' && *c != '\u{200D}')
            .all(|c| win_ansi_byte(c).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_for_name() {
        assert_eq!(StandardFont::for_name("Lato-Bold"), StandardFont::HelveticaBold);
        assert_eq!(StandardFont::for_name("Oswald-Regular"), StandardFont::Helvetica);
        assert_eq!(StandardFont::for_name(""), StandardFont::Helvetica);
    }

    #[test]
    fn test_ascii_widths() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.char_width(' '), 278);
        assert_eq!(font.char_width('A'), 667);
        assert_eq!(font.char_width('i'), 222);
        assert_eq!(font.char_width('~'), 584);
        assert_eq!(StandardFont::HelveticaBold.char_width('b'), 611);
    }

    #[test]
    fn test_accented_letters_use_base_width() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.char_width('ä'), font.char_width('a'));
        assert_eq!(font.char_width('É'), font.char_width('E'));
    }

    #[test]
    fn test_unencodable_measured_as_replacement() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.char_width('🍏'), font.char_width('?'));
        assert_eq!(font.char_width('—'), 1000);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        // "AV" = 667 + 667
        assert_eq!(StandardFont::Helvetica.text_width(10.0, "AV"), 13.34);
        assert_eq!(StandardMetrics.text_width("Lato-Regular", 1000.0, "AV"), 1334.0);
        assert!(StandardMetrics.text_width("Lato-Bold", 12.0, "wide") > StandardMetrics.text_width("Lato-Regular", 12.0, "wide"));
    }

    #[test]
    fn test_can_render() {
        assert!(StandardMetrics.can_render("Lato-Regular", "Grüße € 1"));
        assert!(!StandardMetrics.can_render("Lato-Regular", "🍏"));
        assert!(!StandardMetrics.can_render("Lato-Regular", "iOS 🤖"));
    }

    #[test]
    fn test_default_line_height() {
        assert!((StandardMetrics.line_height("Any", 10.0) - 12.0).abs() < 1e-4);
    }
}
