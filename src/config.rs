use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// 既定値 / Defaults
pub const DEFAULT_TICK_RATE: u32 = 360;
pub const DEFAULT_MIN_DIRECTION: f32 = 0.25;
pub const DEFAULT_POINT_RADIUS: f32 = 8.0;
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
pub const DEFAULT_SPEED_RANGE: (u32, u32) = (10, 20);

/// Floor for the link distance threshold.
pub const MIN_LINK_DISTANCE: f32 = 60.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dot count must be positive")]
    ZeroDotCount,
    #[error("point radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("line width must be positive, got {0}")]
    NonPositiveLineWidth(f32),
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("speed multiplier must be positive, got {0}")]
    NonPositiveSpeed(f32),
    #[error("speed range {0}..={1} is empty or starts at zero")]
    InvalidSpeedRange(u32, u32),
    #[error("link distance {distance} is below the floor of {floor}")]
    LinkDistanceBelowFloor { distance: f32, floor: f32 },
    #[error("alpha {0} is outside 0..=1")]
    AlphaOutOfRange(f32),
    #[error("alpha bounds inverted: min {min} > max {max}")]
    InvertedAlpha { min: f32, max: f32 },
    #[error("minimum direction {0} is outside (0, 1]")]
    InvalidMinDirection(f32),
    #[error("failed to read settings file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file")]
    Parse(#[from] serde_json::Error),
}

/// Drawable area in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb` (case-insensitive). Anything else is `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Hex first, then a CSS color name such as `red` or `CornflowerBlue`.
    pub fn from_css(css: &str) -> Option<Self> {
        if let Some(rgb) = Self::from_hex(css) {
            return Some(rgb);
        }
        // CSS の色名は大文字小文字を区別しない / CSS color names are case-insensitive
        let named = nannou::color::named::from_str(&css.trim().to_ascii_lowercase())?;
        Some(Self::new(named.red, named.green, named.blue))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Everything a frame needs to know. Replaced wholesale on apply, never
/// mutated mid-tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub dot_count: usize,
    pub link_distance: f32,
    pub speed_multiplier: f32,
    pub tick_rate: u32,
    pub min_direction: f32,
    pub speed_range: (u32, u32),
    pub point_radius: f32,
    pub line_width: f32,
    pub color: Rgb,
    pub background: Rgb,
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub dynamic_alpha: bool,
    pub refresh_every_frame: bool,
}

impl SimulationConfig {
    /// Scales the population, link reach and speed with the window width.
    pub fn for_viewport(viewport: Viewport) -> Self {
        let w = viewport.width;
        Self {
            dot_count: ((w * 0.05).round() as usize).max(1),
            link_distance: (w * 0.045).round().max(MIN_LINK_DISTANCE),
            speed_multiplier: (w * 0.002).round().max(1.0),
            tick_rate: DEFAULT_TICK_RATE,
            min_direction: DEFAULT_MIN_DIRECTION,
            speed_range: DEFAULT_SPEED_RANGE,
            point_radius: DEFAULT_POINT_RADIUS,
            line_width: DEFAULT_LINE_WIDTH,
            color: Rgb::WHITE,
            background: Rgb::BLACK,
            min_alpha: 0.0,
            max_alpha: 1.0,
            dynamic_alpha: true,
            refresh_every_frame: true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dot_count == 0 {
            return Err(ConfigError::ZeroDotCount);
        }
        if !(self.point_radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.point_radius));
        }
        if !(self.line_width > 0.0) {
            return Err(ConfigError::NonPositiveLineWidth(self.line_width));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if !(self.speed_multiplier > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.speed_multiplier));
        }
        let (lo, hi) = self.speed_range;
        if lo == 0 || lo > hi {
            return Err(ConfigError::InvalidSpeedRange(lo, hi));
        }
        if !(self.link_distance >= MIN_LINK_DISTANCE) {
            return Err(ConfigError::LinkDistanceBelowFloor {
                distance: self.link_distance,
                floor: MIN_LINK_DISTANCE,
            });
        }
        for alpha in [self.min_alpha, self.max_alpha] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ConfigError::AlphaOutOfRange(alpha));
            }
        }
        if self.min_alpha > self.max_alpha {
            return Err(ConfigError::InvertedAlpha {
                min: self.min_alpha,
                max: self.max_alpha,
            });
        }
        if !(self.min_direction > 0.0 && self.min_direction <= 1.0) {
            return Err(ConfigError::InvalidMinDirection(self.min_direction));
        }
        Ok(())
    }

    /// Builds the config that results from applying the settings form.
    ///
    /// Malformed colors keep the current ones. The background also accepts
    /// CSS color names. The link distance is raised to
    /// the floor rather than rejected.
    pub fn with_settings(&self, settings: &Settings) -> Result<Self, ConfigError> {
        let next = Self {
            dot_count: settings.dot_count as usize,
            speed_multiplier: settings.speed_multiplier,
            link_distance: settings.link_distance.max(MIN_LINK_DISTANCE),
            point_radius: settings.point_radius as f32,
            line_width: settings.line_width as f32,
            color: Rgb::from_hex(&settings.fill_color).unwrap_or(self.color),
            background: Rgb::from_css(&settings.background_color).unwrap_or(self.background),
            dynamic_alpha: settings.dynamic_alpha,
            refresh_every_frame: settings.refresh_every_frame,
            ..self.clone()
        };
        next.validate()?;
        Ok(next)
    }

    /// Applies a (possibly partial) JSON settings file on top of this config.
    pub fn with_settings_file(&self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let settings = Settings::from(self).merged_with_json(&text)?;
        self.with_settings(&settings)
    }
}

// 設定一覧 / Settings summary, logged after every change
impl fmt::Display for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "current settings")?;
        writeln!(f, "Dot radius: {}", self.point_radius)?;
        writeln!(f, "Line width: {}", self.line_width)?;
        writeln!(f, "Color: {}", self.color)?;
        writeln!(f, "Background: {}", self.background)?;
        writeln!(f, "Dot count: {}", self.dot_count)?;
        writeln!(f, "Ticks per second: {}", self.tick_rate)?;
        writeln!(f, "Speed multiplier: {}", self.speed_multiplier)?;
        writeln!(f, "Link distance: {}", self.link_distance)?;
        writeln!(f, "Dynamic line opacity enabled: {}", self.dynamic_alpha)?;
        write!(f, "Refresh screen every frame: {}", self.refresh_every_frame)
    }
}

/// The user-editable fields, as the settings panel holds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub dot_count: u32,
    pub speed_multiplier: f32,
    pub link_distance: f32,
    pub point_radius: u32,
    pub line_width: u32,
    pub fill_color: String,
    pub background_color: String,
    pub dynamic_alpha: bool,
    pub refresh_every_frame: bool,
}

impl Settings {
    /// Overlays the keys present in `json` onto these settings.
    pub fn merged_with_json(&self, json: &str) -> Result<Self, serde_json::Error> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut base = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut base {
            fields.extend(overrides);
        }
        serde_json::from_value(base)
    }
}

impl From<&SimulationConfig> for Settings {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            dot_count: config.dot_count as u32,
            speed_multiplier: config.speed_multiplier,
            link_distance: config.link_distance,
            point_radius: config.point_radius.round() as u32,
            line_width: config.line_width.round() as u32,
            fill_color: config.color.to_hex(),
            background_color: config.background.to_hex(),
            dynamic_alpha: config.dynamic_alpha,
            refresh_every_frame: config.refresh_every_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_defaults_scale_with_width() {
        let config = SimulationConfig::for_viewport(Viewport::new(2000.0, 1000.0));
        assert_eq!(config.dot_count, 100);
        assert_eq!(config.link_distance, 90.0);
        assert_eq!(config.speed_multiplier, 4.0);
        assert_eq!(config.tick_rate, DEFAULT_TICK_RATE);
        config.validate().unwrap();
    }

    #[test]
    fn test_small_viewport_keeps_floors() {
        let config = SimulationConfig::for_viewport(Viewport::new(100.0, 100.0));
        assert_eq!(config.dot_count, 5);
        assert_eq!(config.link_distance, MIN_LINK_DISTANCE);
        assert_eq!(config.speed_multiplier, 1.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("00FFaa"), Some(Rgb::new(0, 255, 170)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::from_hex("red"), None);
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_validate_rejects_inverted_alpha() {
        let mut config = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        config.min_alpha = 0.8;
        config.max_alpha = 0.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedAlpha { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_values() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));

        let mut config = base.clone();
        config.dot_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDotCount)));

        let mut config = base.clone();
        config.point_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveRadius(_))
        ));

        let mut config = base.clone();
        config.tick_rate = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTickRate)));

        let mut config = base;
        config.max_alpha = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AlphaOutOfRange(_))
        ));
    }

    #[test]
    fn test_with_settings_replaces_fields() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let mut settings = Settings::from(&base);
        settings.dot_count = 12;
        settings.link_distance = 20.0;
        settings.fill_color = "#102030".to_string();
        settings.background_color = "not a color".to_string();

        let next = base.with_settings(&settings).unwrap();
        assert_eq!(next.dot_count, 12);
        assert_eq!(next.link_distance, MIN_LINK_DISTANCE);
        assert_eq!(next.color, Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(next.background, base.background);
        assert_eq!(next.tick_rate, base.tick_rate);
    }

    #[test]
    fn test_with_settings_rejects_zero_radius() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let mut settings = Settings::from(&base);
        settings.point_radius = 0;
        assert!(base.with_settings(&settings).is_err());
    }

    #[test]
    fn test_partial_json_settings() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let settings = Settings::from(&base)
            .merged_with_json(r##"{ "dot_count": 7, "fill_color": "#00ff00" }"##)
            .unwrap();
        assert_eq!(settings.dot_count, 7);
        assert_eq!(settings.fill_color, "#00ff00");
        assert_eq!(settings.line_width, 2);
    }

    #[test]
    fn test_background_accepts_css_names() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let mut settings = Settings::from(&base);
        settings.background_color = "red".to_string();
        let next = base.with_settings(&settings).unwrap();
        assert_eq!(next.background, Rgb::new(255, 0, 0));
        assert_eq!(next.background.to_string(), "rgb(255, 0, 0)");

        settings.background_color = "notacolor".to_string();
        let after = next.with_settings(&settings).unwrap();
        assert_eq!(after.background, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_css_parsing() {
        assert_eq!(Rgb::from_css("#102030"), Some(Rgb::new(16, 32, 48)));
        assert_eq!(Rgb::from_css("Navy"), Some(Rgb::new(0, 0, 128)));
        assert_eq!(Rgb::from_css("notacolor"), None);
    }

    #[test]
    fn test_fill_color_ignores_css_names() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let mut settings = Settings::from(&base);
        settings.fill_color = "red".to_string();
        assert_eq!(base.with_settings(&settings).unwrap().color, base.color);
    }

    #[test]
    fn test_unknown_json_key_is_rejected() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let merged = Settings::from(&base).merged_with_json(r#"{ "dotCount": 7 }"#);
        assert!(merged.is_err());
    }

    // 一時ファイルに書き出す / Write `contents` to a per-test file under the temp dir
    fn settings_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "dot-links-{}-{}.json",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_settings_file_merges_onto_config() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let path = settings_file(
            "merge",
            r##"{ "dot_count": 33, "background_color": "#203040", "dynamic_alpha": false }"##,
        );
        let next = base.with_settings_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(next.dot_count, 33);
        assert_eq!(next.background, Rgb::new(0x20, 0x30, 0x40));
        assert!(!next.dynamic_alpha);
        assert_eq!(next.point_radius, base.point_radius);
        assert_eq!(next.link_distance, base.link_distance);
    }

    #[test]
    fn test_settings_file_missing() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let path = std::env::temp_dir().join("dot-links-does-not-exist.json");
        assert!(matches!(
            base.with_settings_file(&path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_settings_file_garbage() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        for (name, contents) in [("garbage", "dots please"), ("array", "[1, 2, 3]")] {
            let path = settings_file(name, contents);
            let result = base.with_settings_file(&path);
            std::fs::remove_file(&path).ok();
            assert!(matches!(result, Err(ConfigError::Parse(_))), "{name}");
        }
    }

    #[test]
    fn test_settings_file_failing_validation() {
        let base = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let path = settings_file("zero-radius", r#"{ "point_radius": 0 }"#);
        let result = base.with_settings_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::NonPositiveRadius(_))));
    }

    #[test]
    fn test_summary_mentions_every_setting() {
        let config = SimulationConfig::for_viewport(Viewport::new(800.0, 600.0));
        let summary = config.to_string();
        assert!(summary.contains("Dot count: 40"));
        assert!(summary.contains("Color: rgb(255, 255, 255)"));
        assert!(summary.contains("Refresh screen every frame: true"));
    }
}
