//! Instruction kinds of a filter list.

use std::fmt;

/// What a single filter record does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Emits a line break.
    NewLine,
    /// Emits a tab character.
    Tabulator,
    /// Emits a single space.
    Space,
    /// Emits the stored text verbatim.
    Text,
    /// Evaluates the stored arithmetic expression.
    Expression,
    /// Looks up the stored selector in the statistics.
    Xml,
    /// Switches to system notation (`.` decimal separator, full precision).
    FormatSystem,
    /// Switches to local notation.
    FormatLocal,
    /// Shows values as plain fractions.
    FormatFraction,
    /// Shows values as percentages.
    FormatPercent,
    /// Shows values as `HH:MM:SS` times.
    FormatTime,
    /// Shows values as numbers.
    FormatNumber,
}

impl FilterMode {
    /// Every mode, in menu order.
    pub const ALL: [Self; 12] = [
        Self::NewLine,
        Self::Tabulator,
        Self::Space,
        Self::Text,
        Self::Expression,
        Self::Xml,
        Self::FormatSystem,
        Self::FormatLocal,
        Self::FormatFraction,
        Self::FormatPercent,
        Self::FormatTime,
        Self::FormatNumber,
    ];

    /// Tag written to saved filter lists. Must never change.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::NewLine => "NewLine",
            Self::Tabulator => "Tabulator",
            Self::Space => "Space",
            Self::Text => "Text",
            Self::Expression => "Expression",
            Self::Xml => "XML",
            Self::FormatSystem => "FormatSystem",
            Self::FormatLocal => "FormatLocal",
            Self::FormatFraction => "FormatFraction",
            Self::FormatPercent => "FormatPercent",
            Self::FormatTime => "FormatTime",
            Self::FormatNumber => "FormatNumber",
        }
    }

    /// Parses a saved tag; surrounding whitespace and case are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.tag().eq_ignore_ascii_case(tag))
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewLine => "Line break",
            Self::Tabulator => "Tabulator",
            Self::Space => "Space",
            Self::Text => "Text",
            Self::Expression => "Expression",
            Self::Xml => "XML value",
            Self::FormatSystem => "Format: system notation",
            Self::FormatLocal => "Format: local notation",
            Self::FormatFraction => "Format: fraction",
            Self::FormatPercent => "Format: percent",
            Self::FormatTime => "Format: time",
            Self::FormatNumber => "Format: number",
        }
    }

    /// Whether records of this mode carry a text payload.
    pub const fn has_text(self) -> bool {
        matches!(self, Self::Text | Self::Expression | Self::Xml)
    }

    /// Whether this mode only changes the output format.
    pub const fn is_format_toggle(self) -> bool {
        matches!(
            self,
            Self::FormatSystem
                | Self::FormatLocal
                | Self::FormatFraction
                | Self::FormatPercent
                | Self::FormatTime
                | Self::FormatNumber
        )
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
