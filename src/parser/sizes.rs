//! Width and height extraction from inline styles
//!
//! Editors usually report sizes in pixels. The caller can ask for them to be
//! converted to a percentage of the rendered table or to `em` units, which
//! keeps the rendered table proportional regardless of the viewer's width.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ParseRequest, SizeUnits};

// ============================================================================
// Static Patterns (compiled once at first use)
// ============================================================================

static WIDTH_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|;)\s*width\s*:\s*([0-9][^;]*)")
        .expect("BUG: hardcoded width regex is statically valid")
});

static HEIGHT_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|;)\s*height\s*:\s*([0-9][^;]*)")
        .expect("BUG: hardcoded height regex is statically valid")
});

/// Conversion settings taken from a parse request
#[derive(Debug, Clone, Copy)]
pub struct SizeContext<'a> {
    pub units: SizeUnits,
    pub table_width: i32,
    pub table_height: i32,
    pub em_height: f32,
    /// Literal removed from every value before conversion
    pub ignore: &'a str,
}

impl<'a> SizeContext<'a> {
    #[must_use]
    pub fn from_request(request: &'a ParseRequest) -> Self {
        Self {
            units: request.size_units(),
            table_width: request.current_table_width,
            table_height: request.current_table_height,
            em_height: request.single_em_height,
            ignore: &request.column_width_to_ignore,
        }
    }

    /// Width declared in an inline style, converted to the requested unit
    #[must_use]
    pub fn width(&self, style: &str) -> String {
        self.extract(&WIDTH_DECLARATION, style, self.table_width)
    }

    /// Height declared in an inline style, converted to the requested unit
    #[must_use]
    pub fn height(&self, style: &str) -> String {
        self.extract(&HEIGHT_DECLARATION, style, self.table_height)
    }

    fn extract(&self, pattern: &Regex, style: &str, table_extent: i32) -> String {
        if self.units == SizeUnits::Auto {
            return String::new();
        }
        let Some(value) = pattern.captures(style).and_then(|c| c.get(1)) else {
            return String::new();
        };

        let mut value = value.as_str().trim().to_string();
        if !self.ignore.is_empty() {
            value = value.replace(self.ignore, "").trim().to_string();
        }

        let converted = match value.strip_suffix("px").map(|px| px.trim().parse::<f32>()) {
            Some(Ok(pixels)) => self.convert_pixels(pixels, table_extent),
            _ => None,
        };
        trim_trailing_zeros(&converted.unwrap_or(value))
    }

    #[allow(clippy::cast_precision_loss)]
    fn convert_pixels(&self, pixels: f32, table_extent: i32) -> Option<String> {
        match self.units {
            SizeUnits::Percent if table_extent > 0 => {
                Some(format!("{:.1}%", pixels / table_extent as f32 * 100.0))
            }
            SizeUnits::Em if self.em_height > 0.0 => {
                Some(format!("{:.2}em", pixels / self.em_height))
            }
            _ => None,
        }
    }
}

/// `50.0%` becomes `50%`, `2.50em` becomes `2.5em`
fn trim_trailing_zeros(value: &str) -> String {
    for unit in ["%", "em"] {
        if let Some(number) = value.strip_suffix(unit)
            && number.contains('.')
        {
            let trimmed = number.trim_end_matches('0').trim_end_matches('.');
            return format!("{trimmed}{unit}");
        }
    }
    value.to_string()
}
