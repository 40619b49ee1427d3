//! Cell alignment values
//!
//! Alignments travel on the wire as plain strings (`"Top"`, `"Left"`, ...).
//! Unknown or empty strings decode to "no alignment" rather than failing the
//! request, so a client sending an unexpected value still gets a table back.

use serde::{Deserialize, Deserializer, Serialize};

/// Horizontal or vertical alignment of a row, column or cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Alignment {
    Top,
    Middle,
    Bottom,
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// All alignments in the order the parser tries their classes
    pub const ALL: [Alignment; 7] = [
        Alignment::Top,
        Alignment::Middle,
        Alignment::Bottom,
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Justify,
    ];

    /// Look up an alignment by its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Top" => Some(Alignment::Top),
            "Middle" => Some(Alignment::Middle),
            "Bottom" => Some(Alignment::Bottom),
            "Left" => Some(Alignment::Left),
            "Center" => Some(Alignment::Center),
            "Right" => Some(Alignment::Right),
            "Justify" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// Wire name of the alignment
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Top => "Top",
            Alignment::Middle => "Middle",
            Alignment::Bottom => "Bottom",
            Alignment::Left => "Left",
            Alignment::Center => "Center",
            Alignment::Right => "Right",
            Alignment::Justify => "Justify",
        }
    }

    /// CSS class used by the HTML renderer
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Alignment::Top => "align-top",
            Alignment::Middle => "align-middle",
            Alignment::Bottom => "align-bottom",
            Alignment::Left => "align-left",
            Alignment::Center => "align-center",
            Alignment::Right => "align-right",
            Alignment::Justify => "align-justify",
        }
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Alignment::Top | Alignment::Middle | Alignment::Bottom)
    }

    #[must_use]
    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient decoding for optional alignment fields.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Alignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|name| {
        let alignment = Alignment::from_name(name);
        if alignment.is_none() && !name.is_empty() {
            tracing::debug!("ignoring unknown alignment value '{}'", name);
        }
        alignment
    }))
}
