//! Runtime configuration (window, scan, ring visuals). Loaded from config.ron
//! at startup.

use serde::{Deserialize, Serialize};

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Master switch for the danger ring.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Meters to scan for hostiles targeting the player.
    #[serde(default = "default_scan_radius")]
    pub scan_radius: f32,
    /// How often to rescan, in seconds (floored at 0.02 when used).
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: f32,
    /// Arrow glyph size in pixels.
    #[serde(default = "default_arrow_size")]
    pub arrow_size: f32,
    /// Distance in pixels from the screen anchor to each arrow.
    #[serde(default = "default_ring_radius")]
    pub ring_radius_px: f32,
    /// Arrow opacity 0..1.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
}

fn default_true() -> bool {
    true
}
fn default_scan_radius() -> f32 {
    50.0
}
fn default_refresh_seconds() -> f32 {
    0.2
}
fn default_arrow_size() -> f32 {
    18.0
}
fn default_ring_radius() -> f32 {
    110.0
}
fn default_opacity() -> f32 {
    0.95
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            scan_radius: default_scan_radius(),
            refresh_seconds: default_refresh_seconds(),
            arrow_size: default_arrow_size(),
            ring_radius_px: default_ring_radius(),
            opacity: default_opacity(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid,
    /// returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}
