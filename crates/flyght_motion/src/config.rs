//! Motion configuration file handling
//!
//! Tunables live in a `flyght.toml`. Every field is optional:
//!
//! ```toml
//! [pointer]
//! smoothing = 0.12
//! parallax_ease = "power2.out"
//!
//! [scroll]
//! trigger_band = 0.85
//! direction = "both"
//! ```

use std::fs;
use std::path::Path;

use flyght_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};

/// Top-level motion configuration (flyght.toml)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MotionConfig {
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub intro: IntroConfig,
}

/// Cursor follow and parallax
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PointerConfig {
    /// Fraction of the remaining distance a follower covers each frame
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_parallax_factor")]
    pub parallax_factor: f32,
    #[serde(default = "default_parallax_duration")]
    pub parallax_duration: f32,
    #[serde(default = "default_parallax_ease")]
    pub parallax_ease: String,
}

fn default_smoothing() -> f32 {
    0.12
}

fn default_parallax_factor() -> f32 {
    0.015
}

fn default_parallax_duration() -> f32 {
    2.0
}

fn default_parallax_ease() -> String {
    "power2.out".to_string()
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
            parallax_factor: default_parallax_factor(),
            parallax_duration: default_parallax_duration(),
            parallax_ease: default_parallax_ease(),
        }
    }
}

/// Which band crossings fire a scroll trigger
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerDirection {
    /// Element top moves up through the band (scrolling down)
    #[default]
    Forward,
    /// Element top moves back down through the band (scrolling up)
    Backward,
    Both,
}

impl TriggerDirection {
    pub fn accepts(self, crossing: TriggerDirection) -> bool {
        self == TriggerDirection::Both || self == crossing
    }
}

/// Scroll-triggered reveals
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScrollConfig {
    /// Band position as a fraction of viewport height from the top
    #[serde(default = "default_trigger_band")]
    pub trigger_band: f32,
    #[serde(default = "default_true")]
    pub once: bool,
    #[serde(default)]
    pub direction: TriggerDirection,
    #[serde(default = "default_reveal_duration")]
    pub reveal_duration: f32,
    #[serde(default = "default_reveal_ease")]
    pub reveal_ease: String,
    /// Distance revealed elements slide up from
    #[serde(default = "default_reveal_offset")]
    pub reveal_offset: f32,
}

fn default_trigger_band() -> f32 {
    0.85
}

fn default_true() -> bool {
    true
}

fn default_reveal_duration() -> f32 {
    0.9
}

fn default_reveal_ease() -> String {
    "power3.out".to_string()
}

fn default_reveal_offset() -> f32 {
    40.0
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            trigger_band: default_trigger_band(),
            once: true,
            direction: TriggerDirection::default(),
            reveal_duration: default_reveal_duration(),
            reveal_ease: default_reveal_ease(),
            reveal_offset: default_reveal_offset(),
        }
    }
}

/// Click-to-leave page transition
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TransitionConfig {
    /// Path requested once the sequence finishes
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default = "default_liftoff_duration")]
    pub liftoff_duration: f32,
    /// Gap between lift-off and the giant sweep
    #[serde(default = "default_pause")]
    pub pause: f32,
    #[serde(default = "default_sweep_duration")]
    pub sweep_duration: f32,
    /// Hold after the sweep before navigating
    #[serde(default = "default_exit_delay")]
    pub exit_delay: f32,
}

fn default_destination() -> String {
    "/".to_string()
}

fn default_liftoff_duration() -> f32 {
    1.2
}

fn default_pause() -> f32 {
    0.2
}

fn default_sweep_duration() -> f32 {
    1.0
}

fn default_exit_delay() -> f32 {
    0.3
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            liftoff_duration: default_liftoff_duration(),
            pause: default_pause(),
            sweep_duration: default_sweep_duration(),
            exit_delay: default_exit_delay(),
        }
    }
}

/// Hero intro sequence
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IntroConfig {
    #[serde(default = "default_intro_ease")]
    pub default_ease: String,
    #[serde(default = "default_counter_duration")]
    pub counter_duration: f32,
    #[serde(default = "default_letter_stagger")]
    pub letter_stagger: f32,
}

fn default_intro_ease() -> String {
    "power3.inOut".to_string()
}

fn default_counter_duration() -> f32 {
    2.0
}

fn default_letter_stagger() -> f32 {
    0.07
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            default_ease: default_intro_ease(),
            counter_duration: default_counter_duration(),
            letter_stagger: default_letter_stagger(),
        }
    }
}

fn check_seconds(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MotionError::Config(format!("{field} must be a non-negative number of seconds, got {value}")))
    }
}

fn check_fraction(field: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MotionError::Config(format!("{field} must be within 0..=1, got {value}")))
    }
}

impl MotionConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| MotionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "motion config loaded");
        Ok(config)
    }

    /// Parse and validate a configuration document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MotionConfig =
            toml::from_str(content).map_err(|e| MotionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check easing names and ranges
    pub fn validate(&self) -> Result<()> {
        for ease in [
            &self.pointer.parallax_ease,
            &self.scroll.reveal_ease,
            &self.intro.default_ease,
        ] {
            ease.parse::<Easing>()?;
        }

        if !(self.pointer.smoothing > 0.0 && self.pointer.smoothing <= 1.0) {
            return Err(MotionError::Config(format!(
                "pointer.smoothing must be within (0, 1], got {}",
                self.pointer.smoothing
            )));
        }
        if !self.pointer.parallax_factor.is_finite() {
            return Err(MotionError::Config("pointer.parallax_factor must be finite".into()));
        }
        check_seconds("pointer.parallax_duration", self.pointer.parallax_duration)?;
        check_fraction("scroll.trigger_band", self.scroll.trigger_band)?;
        check_seconds("scroll.reveal_duration", self.scroll.reveal_duration)?;
        if !self.scroll.reveal_offset.is_finite() {
            return Err(MotionError::Config("scroll.reveal_offset must be finite".into()));
        }
        check_seconds("transition.liftoff_duration", self.transition.liftoff_duration)?;
        check_seconds("transition.pause", self.transition.pause)?;
        check_seconds("transition.sweep_duration", self.transition.sweep_duration)?;
        check_seconds("transition.exit_delay", self.transition.exit_delay)?;
        check_seconds("intro.counter_duration", self.intro.counter_duration)?;
        check_seconds("intro.letter_stagger", self.intro.letter_stagger)?;
        Ok(())
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MotionError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyght_animation::AnimationError;

    #[test]
    fn test_empty_document_is_default() {
        let config = MotionConfig::from_toml("").unwrap();
        assert_eq!(config, MotionConfig::default());
        assert_eq!(config.pointer.smoothing, 0.12);
        assert_eq!(config.scroll.trigger_band, 0.85);
        assert!(config.scroll.once);
        assert_eq!(config.scroll.direction, TriggerDirection::Forward);
        assert_eq!(config.transition.destination, "/");
        assert_eq!(config.intro.default_ease, "power3.inOut");
    }

    #[test]
    fn test_partial_sections() {
        let config = MotionConfig::from_toml(
            r#"
            [scroll]
            direction = "both"
            once = false

            [transition]
            destination = "/films"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.direction, TriggerDirection::Both);
        assert!(!config.scroll.once);
        assert_eq!(config.scroll.reveal_duration, 0.9);
        assert_eq!(config.transition.destination, "/films");
        assert_eq!(config.transition.liftoff_duration, 1.2);
    }

    #[test]
    fn test_round_trip() {
        let config = MotionConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(MotionConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_easing_fails() {
        let err = MotionConfig::from_toml("[pointer]\nparallax_ease = \"wobbly\"").unwrap_err();
        assert!(matches!(
            err,
            MotionError::Animation(AnimationError::UnknownEasing(ref name)) if name == "wobbly"
        ));
    }

    #[test]
    fn test_out_of_range_values_fail() {
        assert!(MotionConfig::from_toml("[scroll]\ntrigger_band = 1.5").is_err());
        assert!(MotionConfig::from_toml("[transition]\npause = -0.2").is_err());
        assert!(MotionConfig::from_toml("[pointer]\nsmoothing = 0.0").is_err());
        assert!(MotionConfig::from_toml("[scroll]\ndirection = \"sideways\"").is_err());
    }

    #[test]
    fn test_direction_accepts() {
        assert!(TriggerDirection::Both.accepts(TriggerDirection::Backward));
        assert!(TriggerDirection::Forward.accepts(TriggerDirection::Forward));
        assert!(!TriggerDirection::Forward.accepts(TriggerDirection::Backward));
    }
}
