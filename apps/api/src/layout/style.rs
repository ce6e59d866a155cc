//! Page geometry, colors and type sizes. All lengths are PDF points; y grows downward
//! from the top edge of the page.

use super::font_metrics::FontWeight;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

// A4
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

pub const MARGIN_X: f32 = 56.0;
pub const MARGIN_TOP: f32 = 64.0;
pub const MARGIN_BOTTOM: f32 = 72.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
/// Lowest baseline body content may use.
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN_BOTTOM;
/// Slack kept below every element before a page break is forced.
pub const BREAK_THRESHOLD: f32 = 12.0;

pub const FOOTER_RULE_Y: f32 = PAGE_HEIGHT - 48.0;
pub const FOOTER_BASELINE: f32 = PAGE_HEIGHT - 34.0;

pub const LINE_SPACING: f32 = 1.45;
pub const PARAGRAPH_GAP: f32 = 6.0;
pub const SECTION_GAP: f32 = 14.0;
pub const BULLET_INDENT: f32 = 14.0;
pub const FIELD_LABEL_WIDTH: f32 = 120.0;

pub const COVER_BAND_HEIGHT: f32 = 220.0;

// Progress bars
pub const BAR_LABEL_WIDTH: f32 = 150.0;
pub const BAR_VALUE_WIDTH: f32 = 36.0;
pub const BAR_TRACK_WIDTH: f32 = CONTENT_WIDTH - BAR_LABEL_WIDTH - BAR_VALUE_WIDTH;
pub const BAR_HEIGHT: f32 = 9.0;
pub const BAR_ROW_HEIGHT: f32 = 22.0;

pub const INK: Rgb = Rgb::new(0.13, 0.14, 0.17);
pub const MUTED: Rgb = Rgb::new(0.42, 0.45, 0.50);
pub const ACCENT: Rgb = Rgb::new(0.17, 0.34, 0.62);
pub const TRACK: Rgb = Rgb::new(0.90, 0.91, 0.93);
pub const RULE: Rgb = Rgb::new(0.80, 0.82, 0.86);
pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(weight: FontWeight, size: f32, color: Rgb) -> Self {
        Self {
            weight,
            size,
            color,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_SPACING
    }

    pub const fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }
}

pub const COVER_TITLE: TextStyle = TextStyle::new(FontWeight::Bold, 28.0, WHITE);
pub const COVER_SUBTITLE: TextStyle = TextStyle::new(FontWeight::Regular, 13.0, WHITE);
pub const SECTION_TITLE: TextStyle = TextStyle::new(FontWeight::Bold, 20.0, ACCENT);
pub const SUBHEADING: TextStyle = TextStyle::new(FontWeight::Bold, 13.0, INK);
pub const BODY: TextStyle = TextStyle::new(FontWeight::Regular, 10.5, INK);
pub const BODY_BOLD: TextStyle = TextStyle::new(FontWeight::Bold, 10.5, INK);
pub const SMALL: TextStyle = TextStyle::new(FontWeight::Regular, 8.5, MUTED);
