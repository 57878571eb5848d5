use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub id: String,
    pub name: String,
    pub primary: String,
    pub secondary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

/// Static preset entry.
#[derive(Debug, Clone, Copy)]
pub struct PresetTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl PresetTheme {
    pub fn to_theme(&self) -> ColorTheme {
        ColorTheme {
            id: self.id.to_string(),
            name: self.name.to_string(),
            primary: self.primary.to_string(),
            secondary: self.secondary.to_string(),
            accent: None,
        }
    }
}

pub const PRESET_THEMES: [PresetTheme; 8] = [
    PresetTheme {
        id: "wellness-green",
        name: "Wellness Green",
        primary: "#4CAF50",
        secondary: "#81C784",
    },
    PresetTheme {
        id: "energy-orange",
        name: "Energy Orange",
        primary: "#FF9800",
        secondary: "#FFB74D",
    },
    PresetTheme {
        id: "calm-blue",
        name: "Calm Blue",
        primary: "#2196F3",
        secondary: "#64B5F6",
    },
    PresetTheme {
        id: "vitality-red",
        name: "Vitality Red",
        primary: "#F44336",
        secondary: "#E57373",
    },
    PresetTheme {
        id: "nature-teal",
        name: "Nature Teal",
        primary: "#009688",
        secondary: "#4DB6AC",
    },
    PresetTheme {
        id: "premium-purple",
        name: "Premium Purple",
        primary: "#9C27B0",
        secondary: "#BA68C8",
    },
    PresetTheme {
        id: "modern-gray",
        name: "Modern Gray",
        primary: "#607D8B",
        secondary: "#90A4AE",
    },
    PresetTheme {
        id: "fresh-mint",
        name: "Fresh Mint",
        primary: "#26A69A",
        secondary: "#80CBC4",
    },
];

pub fn default_theme() -> ColorTheme {
    PRESET_THEMES[0].to_theme()
}

pub fn preset_themes() -> Vec<ColorTheme> {
    PRESET_THEMES.iter().map(PresetTheme::to_theme).collect()
}

/// Theme built from user-picked colors.
pub fn custom_theme(primary: &str, secondary: &str) -> Result<ColorTheme, AppError> {
    let theme = ColorTheme {
        id: "custom".to_string(),
        name: "Custom".to_string(),
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        accent: None,
    };
    validate_theme(&theme)?;
    Ok(theme)
}

const HEX_COLOR_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$";

fn hex_color() -> Result<&'static Regex, AppError> {
    static HEX_COLOR: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    HEX_COLOR
        .get_or_init(|| Regex::new(HEX_COLOR_PATTERN))
        .as_ref()
        .map_err(|e| AppError::Internal(e.clone().into()))
}

/// Every color of a theme must be a `#rgb` or `#rrggbb` hex code.
pub fn validate_theme(theme: &ColorTheme) -> Result<(), AppError> {
    let hex = hex_color()?;
    let colors = [Some(&theme.primary), Some(&theme.secondary), theme.accent.as_ref()];
    for color in colors.into_iter().flatten() {
        if !hex.is_match(color) {
            return Err(AppError::Validation(format!(
                "'{color}' is not a hex color code"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_unique_and_valid() {
        let themes = preset_themes();
        assert_eq!(themes.len(), 8);
        let mut ids: Vec<_> = themes.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        for theme in &themes {
            validate_theme(theme).unwrap();
        }
        assert_eq!(default_theme().primary, "#4CAF50");
    }

    #[test]
    fn test_hex_pattern_is_compiled_once() {
        let first = hex_color().unwrap();
        let second = hex_color().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("#4CAF50"));
        assert!(!first.is_match("#4CAF5"));
    }

    #[test]
    fn test_custom_theme() {
        let theme = custom_theme("#123456", "#abc").unwrap();
        assert_eq!(theme.id, "custom");
        assert!(custom_theme("blue", "#abc").is_err());
        assert!(custom_theme("#12345", "#abc").is_err());
    }
}
