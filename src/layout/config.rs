//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a layout configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration options for layout computation.
///
/// Grid columns are `card_width + h_gap` apart, generations
/// `card_height + v_gap` apart; `padding` is the minimum distance any card
/// keeps from the canvas origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Person card size in pixels
    pub card_width: f64,
    pub card_height: f64,

    /// Horizontal gap between adjacent slots
    pub h_gap: f64,

    /// Vertical gap between generation levels
    pub v_gap: f64,

    /// Minimum distance from the canvas origin
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 140.0,
            card_height: 80.0,
            h_gap: 24.0,
            v_gap: 48.0,
            padding: 16.0,
        }
    }
}

/// TOML structure for overlaying a layout configuration
#[derive(Deserialize)]
struct TomlLayoutConfig {
    card: Option<TomlCard>,
    spacing: Option<TomlSpacing>,
}

#[derive(Deserialize)]
struct TomlCard {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Deserialize)]
struct TomlSpacing {
    horizontal: Option<f64>,
    vertical: Option<f64>,
    padding: Option<f64>,
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the card dimensions
    pub fn with_card_size(mut self, width: f64, height: f64) -> Self {
        self.card_width = width;
        self.card_height = height;
        self
    }

    /// Set the gaps between slots and levels
    pub fn with_gaps(mut self, horizontal: f64, vertical: f64) -> Self {
        self.h_gap = horizontal;
        self.v_gap = vertical;
        self
    }

    /// Set the canvas-origin padding
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Load a configuration overlay from a TOML file.
    ///
    /// Missing keys keep their default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration overlay from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlLayoutConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(card) = parsed.card {
            if let Some(width) = card.width {
                config.card_width = width;
            }
            if let Some(height) = card.height {
                config.card_height = height;
            }
        }
        if let Some(spacing) = parsed.spacing {
            if let Some(horizontal) = spacing.horizontal {
                config.h_gap = horizontal;
            }
            if let Some(vertical) = spacing.vertical {
                config.v_gap = vertical;
            }
            if let Some(padding) = spacing.padding {
                config.padding = padding;
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = LayoutConfig::new()
            .with_card_size(100.0, 60.0)
            .with_gaps(10.0, 20.0)
            .with_padding(4.0);
        assert_eq!(config.card_width, 100.0);
        assert_eq!(config.card_height, 60.0);
        assert_eq!(config.h_gap, 10.0);
        assert_eq!(config.v_gap, 20.0);
        assert_eq!(config.padding, 4.0);
    }

    #[test]
    fn test_toml_overlay_keeps_defaults_for_missing_keys() {
        let config = LayoutConfig::from_toml_str(
            r#"
            [card]
            width = 200.0

            [spacing]
            padding = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(config.card_width, 200.0);
        assert_eq!(config.card_height, LayoutConfig::default().card_height);
        assert_eq!(config.padding, 8.0);
        assert_eq!(config.h_gap, LayoutConfig::default().h_gap);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let err = LayoutConfig::from_toml_str("card = not toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
