//! Favorite color selection.

use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// Error returned when a value is not one of the seven color tokens.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid favorite color: {0}")]
pub struct ColorError(pub String);

/// The registrant's favorite color, one of the seven rainbow colors.
///
/// Tokens are matched exactly (`"BLUE"`, not `"blue"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "favorite_color", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum FavoriteColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl FavoriteColor {
    /// Every color, in rainbow order.
    pub const ALL: [Self; 7] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Indigo,
        Self::Violet,
    ];

    /// The wire token for this color.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::Indigo => "INDIGO",
            Self::Violet => "VIOLET",
        }
    }

    /// Human-readable name in the given locale.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Self::Red) => "Vermelho",
            (Locale::PtBr, Self::Orange) => "Laranja",
            (Locale::PtBr, Self::Yellow) => "Amarelo",
            (Locale::PtBr, Self::Green) => "Verde",
            (Locale::PtBr, Self::Blue) => "Azul",
            (Locale::PtBr, Self::Indigo) => "Índigo",
            (Locale::PtBr, Self::Violet) => "Violeta",
            (Locale::En, Self::Red) => "Red",
            (Locale::En, Self::Orange) => "Orange",
            (Locale::En, Self::Yellow) => "Yellow",
            (Locale::En, Self::Green) => "Green",
            (Locale::En, Self::Blue) => "Blue",
            (Locale::En, Self::Indigo) => "Indigo",
            (Locale::En, Self::Violet) => "Violet",
        }
    }

    /// Swatch color as a CSS hex value.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::Orange => "#f97316",
            Self::Yellow => "#eab308",
            Self::Green => "#22c55e",
            Self::Blue => "#3b82f6",
            Self::Indigo => "#6366f1",
            Self::Violet => "#8b5cf6",
        }
    }
}

impl std::fmt::Display for FavoriteColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FavoriteColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| ColorError(s.to_owned()))
    }
}
