//! Decimal and grouping separators.

use serde::{Deserialize, Serialize};

/// Separators used when rendering numbers in local notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl NumberLocale {
    /// System notation: `.` for decimals, `,` for thousands.
    #[must_use]
    pub const fn system() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }

    /// English local notation (same separators as system notation).
    #[must_use]
    pub const fn english() -> Self {
        Self::system()
    }

    /// German local notation: `,` for decimals, `.` for thousands.
    #[must_use]
    pub const fn german() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }

    /// Looks up a preset by language code (`en`, `de`).
    pub fn from_language(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" | "system" => Some(Self::english()),
            "de" | "german" | "deutsch" => Some(Self::german()),
            _ => None,
        }
    }

    /// Returns true when local and system notation render identically.
    pub fn is_system(&self) -> bool {
        self.decimal_separator == '.'
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::english()
    }
}
