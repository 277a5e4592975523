//! Layout configuration: fonts, insets, colors, text resources and categories.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::{Category, FEATURE_CATEGORY};
use crate::{Error, Result};

/// Solid RGBA color, stored normalized to `0.0..=1.0`.
///
/// Serialized as integer components `0..=255`; out of range values are clamped on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColor", into = "RawColor")]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

#[derive(Serialize, Deserialize)]
struct RawColor {
    red: i64,
    green: i64,
    blue: i64,
    alpha: i64,
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Self {
        Color::from_components(raw.red, raw.green, raw.blue, raw.alpha)
    }
}

impl From<Color> for RawColor {
    fn from(color: Color) -> Self {
        let [red, green, blue, alpha] = color.components();
        RawColor {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Color {
    pub const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
    };

    pub const WHITE: Color = Color {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 1.0,
    };

    /// Build a color from 0-255 components, clamping each one.
    pub fn from_components(red: i64, green: i64, blue: i64, alpha: i64) -> Self {
        Self {
            red: normalize_component(red),
            green: normalize_component(green),
            blue: normalize_component(blue),
            alpha: normalize_component(alpha),
        }
    }

    /// Parse `r,g,b,a` with four integer components.
    pub fn parse(input: &str) -> Option<Self> {
        let components: Vec<i64> = input
            .trim()
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect();

        match components.as_slice() {
            [r, g, b, a] => Some(Self::from_components(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// Components scaled back to `0..=255`.
    pub fn components(&self) -> [i64; 4] {
        [self.red, self.green, self.blue, self.alpha].map(|c| (c * 255.0).round() as i64)
    }
}

fn normalize_component(value: i64) -> f32 {
    value.clamp(0, 255) as f32 / 255.0
}

/// Top, right, bottom and left distances in points, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Every side multiplied by `scale`.
    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(
            self.top * scale,
            self.right * scale,
            self.bottom * scale,
            self.left * scale,
        )
    }
}

/// The two inset layers applied inside each cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentInsets {
    /// Cell edge to the white content panel. The bottom strip holds the badges.
    pub content_background: Insets,

    /// Content panel edge to the text area.
    pub content: Insets,
}

impl Default for ContentInsets {
    fn default() -> Self {
        Self {
            content_background: Insets::new(12.0, 12.0, 96.0, 12.0),
            content: Insets::uniform(36.0),
        }
    }
}

/// Font and paragraph attributes of one text role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub font_name: String,

    /// Maximum size before scaling; the fit search only shrinks from here.
    pub font_size: f32,

    /// Extra space between wrapped lines, before scaling.
    #[serde(default)]
    pub line_spacing: f32,

    /// Cap on the line height before scaling. Zero means uncapped.
    #[serde(default)]
    pub maximum_line_height: f32,

    #[serde(default)]
    pub is_underlined: bool,

    #[serde(default)]
    pub insets: Insets,
}

impl FontStyle {
    fn preset(
        font_name: &str,
        font_size: f32,
        line_spacing: f32,
        maximum_line_height: f32,
        is_underlined: bool,
        insets: Insets,
    ) -> Self {
        Self {
            font_name: font_name.to_string(),
            font_size,
            line_spacing,
            maximum_line_height,
            is_underlined,
            insets,
        }
    }

    pub fn summary() -> Self {
        Self::preset("Oswald-Regular", 44.0, 8.0, 64.0, false, Insets::new(4.0, 0.0, 0.0, 0.0))
    }

    pub fn aim() -> Self {
        Self::preset("Lato-Bold", 24.0, 0.0, 0.0, true, Insets::new(16.0, 0.0, 0.0, 0.0))
    }

    pub fn description() -> Self {
        Self::preset("Lato-Regular", 24.0, 0.0, 0.0, false, Insets::new(16.0, 24.0, 0.0, 24.0))
    }

    pub fn category() -> Self {
        Self::preset("Oswald-Regular", 32.0, 2.0, 0.0, false, Insets::ZERO)
    }
}

/// One style per text role. Release tags default to the category style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    pub summary: FontStyle,
    pub aim: FontStyle,
    pub description: FontStyle,
    pub category: FontStyle,
    pub release_tags: FontStyle,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            summary: FontStyle::summary(),
            aim: FontStyle::aim(),
            description: FontStyle::description(),
            category: FontStyle::category(),
            release_tags: FontStyle::category(),
        }
    }
}

/// A begin/end regex pair carving one description window out of the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionPattern {
    pub begin_after: String,
    pub end_before: String,
}

impl DescriptionPattern {
    pub fn new(begin_after: impl Into<String>, end_before: impl Into<String>) -> Self {
        Self {
            begin_after: begin_after.into(),
            end_before: end_before.into(),
        }
    }
}

/// Key of the aim label in `text_resources`.
pub const AIM_RESOURCE: &str = "aim";

/// Key of the goal slide label in `text_resources`.
pub const SPRINT_GOAL_RESOURCE: &str = "sprint_goal";

/// Everything the deck engine needs to know besides the items themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub text_resources: BTreeMap<String, String>,
    pub release_tag_emojis: BTreeMap<String, String>,
    pub description_patterns: Vec<DescriptionPattern>,
    pub description_lines_max: usize,

    /// Characters trimmed from both ends of every description line, besides whitespace.
    #[serde(default = "default_trim_chars")]
    pub description_trim_chars: String,

    pub insets: ContentInsets,
    pub font_settings: FontSettings,
    pub items_per_page: usize,
    pub limit_to_printable_area: bool,

    /// Margins of the printable area when `limit_to_printable_area` is set.
    #[serde(default = "default_printable_area_insets")]
    pub printable_area_insets: Insets,

    /// Smallest size the fit search will try before giving up.
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f32,

    /// Item kinds never loaded from the tracker.
    #[serde(default = "default_excluded_kinds")]
    pub excluded_kinds: Vec<String>,

    #[serde(default = "default_item_limit")]
    pub item_limit: usize,

    pub categories: BTreeMap<String, Category>,
}

fn default_trim_chars() -> String {
    "*:".to_string()
}

fn default_printable_area_insets() -> Insets {
    Insets::uniform(18.0)
}

fn default_min_font_size() -> f32 {
    4.0
}

fn default_excluded_kinds() -> Vec<String> {
    vec!["Sub-task".to_string(), "Bug (sub)".to_string()]
}

fn default_item_limit() -> usize {
    100
}

impl Default for Configuration {
    fn default() -> Self {
        Self::with_categories(BTreeMap::new())
    }
}

impl Configuration {
    /// Default configuration extended with the given categories and the feature category.
    pub fn with_categories(mut categories: BTreeMap<String, Category>) -> Self {
        categories.insert(FEATURE_CATEGORY.to_string(), Category::feature());

        let text_resources = [(AIM_RESOURCE, "Ziel:"), (SPRINT_GOAL_RESOURCE, "Sprintziel")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let release_tag_emojis = [("iOS", "🍏"), ("Android", "🤖")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            text_resources,
            release_tag_emojis,
            description_patterns: vec![DescriptionPattern::new(r"User Story\W+", r"\n")],
            description_lines_max: 3,
            description_trim_chars: default_trim_chars(),
            insets: ContentInsets::default(),
            font_settings: FontSettings::default(),
            items_per_page: 2,
            limit_to_printable_area: true,
            printable_area_insets: default_printable_area_insets(),
            min_font_size: default_min_font_size(),
            excluded_kinds: default_excluded_kinds(),
            item_limit: default_item_limit(),
            categories,
        }
    }

    /// Look up a text resource, if configured and non-empty.
    pub fn text_resource(&self, key: &str) -> Option<&str> {
        self.text_resources
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Release tags mapped through the emoji table and joined with spaces.
    ///
    /// A tag keeps its raw text when `can_render` rejects its mapped glyph.
    pub fn release_tag_label(&self, tags: &[String], can_render: impl Fn(&str) -> bool) -> String {
        tags.iter()
            .map(|tag| {
                self.release_tag_emojis
                    .get(tag)
                    .map(String::as_str)
                    .filter(|glyph| can_render(glyph))
                    .unwrap_or(tag.as_str())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check the values the layout engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.items_per_page == 0 {
            return Err(Error::InvalidConfiguration(
                "items_per_page must be at least 1".to_string(),
            ));
        }

        if !(self.min_font_size > 0.0) {
            return Err(Error::InvalidConfiguration(
                "min_font_size must be positive".to_string(),
            ));
        }

        let styles = [
            ("summary", &self.font_settings.summary),
            ("aim", &self.font_settings.aim),
            ("description", &self.font_settings.description),
            ("category", &self.font_settings.category),
            ("release_tags", &self.font_settings.release_tags),
        ];
        for (role, style) in styles {
            if !(style.font_size > 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "font size of {} must be positive",
                    role
                )));
            }
        }

        for pattern in &self.description_patterns {
            for source in [&pattern.begin_after, &pattern.end_before] {
                Regex::new(source).map_err(|e| {
                    Error::InvalidConfiguration(format!(
                        "invalid description pattern {:?}: {}",
                        source, e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_clamps_components() {
        let color = Color::from_components(300, -5, 255, 0);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert_eq!(color.blue, 1.0);
        assert_eq!(color.alpha, 0.0);
    }

    #[test]
    fn test_color_deserialize_clamps() {
        let color: Color =
            serde_json::from_str(r#"{"red": 512, "green": 51, "blue": -1, "alpha": 255}"#)
                .unwrap();
        assert_eq!(color.components(), [255, 51, 0, 255]);
    }

    #[test]
    fn test_color_serializes_as_integers() {
        let json = serde_json::to_string(&Color::from_components(43, 54, 113, 255)).unwrap();
        assert_eq!(json, r#"{"red":43,"green":54,"blue":113,"alpha":255}"#);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(
            Color::parse(" 10, 20,30,255 "),
            Some(Color::from_components(10, 20, 30, 255))
        );
        assert_eq!(Color::parse("10,20,30"), None);
        assert_eq!(Color::parse("red"), None);
    }

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.items_per_page, 2);
        assert_eq!(config.description_lines_max, 3);
        assert_eq!(config.text_resource(AIM_RESOURCE), Some("Ziel:"));
        assert_eq!(config.text_resource(SPRINT_GOAL_RESOURCE), Some("Sprintziel"));
        assert!(config.categories.contains_key(FEATURE_CATEGORY));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_release_tag_label() {
        let config = Configuration::default();
        let tags = vec!["iOS".to_string(), "Web".to_string(), "Android".to_string()];
        assert_eq!(config.release_tag_label(&tags, |_| true), "🍏 Web 🤖");
        assert_eq!(config.release_tag_label(&tags, |glyph| glyph.is_ascii()), "iOS Web Android");
        assert_eq!(config.release_tag_label(&[], |_| true), "");
    }

    #[test]
    fn test_validate_rejects_zero_items_per_page() {
        let config = Configuration {
            items_per_page: 0,
            ..Configuration::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_broken_pattern() {
        let mut config = Configuration::default();
        config
            .description_patterns
            .push(DescriptionPattern::new("(unclosed", r"\n"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_json_round_trip() {
        let config = Configuration::default();
        let json = serde_json::to_string(&config).unwrap();
        let decoded: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_insets_scaled() {
        let insets = Insets::new(4.0, 8.0, 12.0, 16.0).scaled(0.5);
        assert_eq!(insets, Insets::new(2.0, 4.0, 6.0, 8.0));
    }
}
