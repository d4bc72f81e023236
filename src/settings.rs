//! Player settings and preferences
//!
//! Persisted separately from game history in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low -> Medium -> High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Particles drawn per splash/sparkle burst
    pub fn particles_per_effect(&self) -> usize {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 20,
            QualityPreset::High => 30,
        }
    }

    /// Whether falling entities are drawn spinning
    pub fn rotation_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Red splash when a dagger hits
    pub splash: bool,
    /// Sparkle burst when a token is collected
    pub sparkles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the big countdown before each speed-up
    pub show_countdown: bool,

    // === Accessibility ===
    /// Reduced motion (no spinning sprites, no particle bursts)
    pub reduced_motion: bool,
    /// Pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            splash: true,
            sparkles: true,

            show_fps: false,
            show_countdown: true,

            reduced_motion: false,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "moxie_mining_settings";

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low keeps only the hit feedback
        self.sparkles = preset != QualityPreset::Low;
    }

    /// Particles per effect burst (0 when bursts are off)
    pub fn particles_for(&self, kind: crate::sim::EffectKind) -> usize {
        use crate::sim::EffectKind;

        let enabled = match kind {
            EffectKind::Splash => self.splash,
            EffectKind::Sparkle => self.sparkles,
        };
        if !enabled || self.reduced_motion {
            0
        } else {
            self.quality.particles_per_effect()
        }
    }

    /// Effective sprite rotation (respects reduced_motion)
    pub fn effective_rotation(&self) -> bool {
        self.quality.rotation_enabled() && !self.reduced_motion
    }

    /// Load settings from storage, defaults if missing or corrupt
    pub fn load() -> Self {
        match platform::load_json(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from storage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self) {
        if platform::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EffectKind;

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::Low.as_str(), "Low");
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_preset_cycle() {
        assert_eq!(QualityPreset::Low.next(), QualityPreset::Medium);
        assert_eq!(QualityPreset::High.next(), QualityPreset::Low);
    }

    #[test]
    fn test_low_preset_drops_sparkles() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert_eq!(settings.particles_for(EffectKind::Sparkle), 0);
        assert!(settings.particles_for(EffectKind::Splash) > 0);
        assert!(!settings.effective_rotation());

        // Cycling back up restores them
        settings.apply_preset(QualityPreset::Low.next());
        assert!(settings.particles_for(EffectKind::Sparkle) > 0);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert_eq!(settings.particles_for(EffectKind::Splash), 0);
        assert!(!settings.effective_rotation());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_fps": true }"#).unwrap();
        assert!(settings.show_fps);
        assert!(settings.splash);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_native_load_falls_back() {
        assert_eq!(Settings::load(), Settings::default());
    }
}
