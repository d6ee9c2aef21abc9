//! Unlockable visual themes
//!
//! Each theme is a palette plus an ambient weather kind. The catalog is fixed;
//! the first entry is owned by every player and costs nothing.

use serde::{Deserialize, Serialize};

/// RGBA color in 0..1 space
pub type Color = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Color {
    rgba(hex, 1.0)
}

/// Build a color from a 0xRRGGBB literal and an alpha
pub const fn rgba(hex: u32, alpha: f32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Theme identifiers as stored in the progress record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeId {
    #[default]
    NeonCity,
    MarsColony,
    DigitalVoid,
    MidnightTokyo,
}

impl ThemeId {
    /// Every theme, in shop order
    pub const ALL: [ThemeId; 4] = [
        ThemeId::NeonCity,
        ThemeId::MarsColony,
        ThemeId::DigitalVoid,
        ThemeId::MidnightTokyo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::NeonCity => "neon_city",
            ThemeId::MarsColony => "mars_colony",
            ThemeId::DigitalVoid => "digital_void",
            ThemeId::MidnightTokyo => "midnight_tokyo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Catalog entry for this id
    pub fn theme(&self) -> &'static Theme {
        match self {
            ThemeId::NeonCity => &NEON_CITY,
            ThemeId::MarsColony => &MARS_COLONY,
            ThemeId::DigitalVoid => &DIGITAL_VOID,
            ThemeId::MidnightTokyo => &MIDNIGHT_TOKYO,
        }
    }
}

/// Ambient weather drawn behind the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Clear,
    Embers,
    Matrix,
    Rain,
}

/// Colors used by the renderer and HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg_top: Color,
    pub bg_bottom: Color,
    pub accent: Color,
    pub secondary: Color,
    pub danger: Color,
    pub grid: Color,
    pub sun_top: Color,
    pub sun_bottom: Color,
}

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    pub palette: Palette,
    pub weather: WeatherKind,
    pub cost: u32,
}

pub const NEON_CITY: Theme = Theme {
    id: ThemeId::NeonCity,
    name: "NEON CITY",
    palette: Palette {
        bg_top: rgb(0x0b0b14),
        bg_bottom: rgb(0x2d1b4e),
        accent: rgb(0x00f3ff),
        secondary: rgb(0xbc13fe),
        danger: rgb(0xff2a6d),
        grid: rgba(0xbc13fe, 0.3),
        sun_top: rgb(0xffbd2a),
        sun_bottom: rgb(0xff2a6d),
    },
    weather: WeatherKind::Clear,
    cost: 0,
};

pub const MARS_COLONY: Theme = Theme {
    id: ThemeId::MarsColony,
    name: "MARS COLONY",
    palette: Palette {
        bg_top: rgb(0x1f0c0c),
        bg_bottom: rgb(0x4e1b1b),
        accent: rgb(0xffaa00),
        secondary: rgb(0xff5500),
        danger: rgb(0xffffff),
        grid: rgba(0xff5500, 0.3),
        sun_top: rgb(0xffffff),
        sun_bottom: rgb(0xffaa00),
    },
    weather: WeatherKind::Embers,
    cost: 500,
};

pub const DIGITAL_VOID: Theme = Theme {
    id: ThemeId::DigitalVoid,
    name: "DIGITAL VOID",
    palette: Palette {
        bg_top: rgb(0x000000),
        bg_bottom: rgb(0x001100),
        accent: rgb(0x00ff00),
        secondary: rgb(0x008800),
        danger: rgb(0xff0000),
        grid: rgba(0x00ff00, 0.2),
        sun_top: rgb(0x00ff00),
        sun_bottom: rgb(0x003300),
    },
    weather: WeatherKind::Matrix,
    cost: 1000,
};

pub const MIDNIGHT_TOKYO: Theme = Theme {
    id: ThemeId::MidnightTokyo,
    name: "MIDNIGHT TOKYO",
    palette: Palette {
        bg_top: rgb(0x050510),
        bg_bottom: rgb(0x100520),
        accent: rgb(0xff00ff),
        secondary: rgb(0x00ffff),
        danger: rgb(0xffff00),
        grid: rgba(0xff00ff, 0.2),
        sun_top: rgb(0xff00ff),
        sun_bottom: rgb(0x550055),
    },
    weather: WeatherKind::Rain,
    cost: 2000,
};

/// The full catalog in shop order
pub fn catalog() -> impl Iterator<Item = &'static Theme> {
    ThemeId::ALL.into_iter().map(|id| id.theme())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_free() {
        let theme = ThemeId::default().theme();
        assert_eq!(theme.cost, 0);
        assert_eq!(theme.weather, WeatherKind::Clear);
        assert!(catalog().filter(|t| t.cost == 0).count() == 1);
    }

    #[test]
    fn test_id_strings_match_serde() {
        for id in ThemeId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            assert_eq!(ThemeId::from_str(id.as_str()), Some(id));
            assert_eq!(id.theme().id, id);
        }
        assert_eq!(ThemeId::from_str("vaporwave"), None);
    }

    #[test]
    fn test_rgb_unpacks_channels() {
        let c = rgba(0xff8000, 0.5);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert!(c[2].abs() < 1e-6);
        assert!((c[3] - 0.5).abs() < 1e-6);
    }
}
