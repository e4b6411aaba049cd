use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PadsError, Result};

/// Number of steps per episode at the end of the curriculum
const EPISODE_LENGTH: u32 = 100;

/// Number of training episodes
const TRAINING_LENGTH: u32 = 1000;

/// How the simulator scores and terminates non-landing steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Reward is always 0, episodes end only on landing
    Free,
    /// Out-of-bounds and undone loops end the episode with -1,
    /// landings are scored by distance to the target
    Strict,
}

/// A named drop zone, used to anchor displayed trajectories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Target {
    fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
        }
    }
}

/// Progressive growth of the episode step budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurriculumConfig {
    /// Step budget installed when the wrapper is created
    pub initial_max_steps: u32,
    /// Steps added each time the period elapses
    pub increment: u32,
    /// Number of resets between two increments
    pub period: u32,
}

impl CurriculumConfig {
    /// Grows the budget in ten stages up to `episode_length`,
    /// spread evenly over `training_length` episodes, each value at least 1
    pub fn from_lengths(episode_length: u32, training_length: u32) -> Self {
        Self {
            initial_max_steps: (episode_length / 10).max(1),
            increment: (episode_length / 10).max(1),
            period: (training_length / 10).max(1),
        }
    }
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self::from_lengths(EPISODE_LENGTH, TRAINING_LENGTH)
    }
}

/// Simulation constants, in units per step unless stated otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescentConfig {
    /// The agent cannot be further away from the target than this
    pub space_limit: f64,
    /// Landing error that still counts as on target
    pub landing_tolerance: f64,
    /// Landing error tolerated for display purposes
    pub landing_target: f64,
    /// Radius from which training episodes start
    pub start_limit: f64,
    /// Default start radius for evaluation runs
    pub rho_init: f64,
    /// Default start angle for evaluation runs
    pub theta_init: f64,
    /// Nominal starting altitude
    pub z_init: f64,
    /// Forward distance covered per step
    pub speed_rho: f64,
    /// Heading at reset, also the gain of the loop detector
    pub speed_angle: f64,
    /// Altitude lost per step
    pub speed_z: f64,
    /// Heading change for a full-scale action
    pub max_angle: f64,
    pub episode_length: u32,
    pub training_length: u32,
    /// Metres per simulation unit
    pub move_to_meters: f64,
    /// Delay between displayed frames, in seconds
    pub frame_delay: f64,
    pub reward_mode: RewardMode,
    pub curriculum: CurriculumConfig,
    pub targets: Vec<Target>,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            space_limit: 250.0,
            landing_tolerance: 10.0,
            landing_target: 50.0,
            start_limit: 250.0,
            rho_init: 10.0,
            theta_init: PI / 2.0,
            z_init: 100.0,
            speed_rho: 5.0,
            speed_angle: 0.0,
            speed_z: 1.0,
            max_angle: PI / 3.0,
            episode_length: EPISODE_LENGTH,
            training_length: TRAINING_LENGTH,
            move_to_meters: 8.0,
            frame_delay: 0.2,
            reward_mode: RewardMode::Strict,
            curriculum: CurriculumConfig::default(),
            targets: vec![
                Target::new("Paris", 48.865879, 2.319827),
                Target::new("Fonsorbes", 43.54, 1.25),
                Target::new("San Francisco", 37.7737283, -122.4342383),
            ],
        }
    }
}

impl DescentConfig {
    /// Loads a configuration from a YAML file, missing keys take their default value.
    /// Without a `curriculum` section the curriculum follows the loaded
    /// `episode_length` and `training_length`.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let value: serde_yaml::Value = serde_yaml::from_reader(file)?;
        Self::from_yaml_value(value)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::from_yaml_value(value)
    }

    fn from_yaml_value(value: serde_yaml::Value) -> Result<Self> {
        let has_curriculum = value.get("curriculum").is_some();
        let mut config: Self = serde_yaml::from_value(value)?;
        if !has_curriculum {
            config.curriculum =
                CurriculumConfig::from_lengths(config.episode_length, config.training_length);
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects constants the dynamics cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("space_limit", self.space_limit),
            ("landing_tolerance", self.landing_tolerance),
            ("z_init", self.z_init),
            ("speed_z", self.speed_z),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PadsError::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        let non_negative = [
            ("start_limit", self.start_limit),
            ("speed_rho", self.speed_rho),
            ("max_angle", self.max_angle),
            ("move_to_meters", self.move_to_meters),
            ("frame_delay", self.frame_delay),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PadsError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }

        if self.curriculum.period == 0 {
            return Err(PadsError::InvalidConfig(
                "curriculum.period must be at least 1".to_string(),
            ));
        }
        if self.curriculum.increment == 0 {
            return Err(PadsError::InvalidConfig(
                "curriculum.increment must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Looks a target up by name, ignoring case
    pub fn target(&self, name: &str) -> Result<&Target> {
        self.targets
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PadsError::UnknownTarget(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let config = DescentConfig::default();
        assert_eq!(config.space_limit, 250.0);
        assert_eq!(config.landing_tolerance, 10.0);
        assert_eq!(config.z_init, 100.0);
        assert_eq!(config.speed_rho, 5.0);
        assert_eq!(config.speed_z, 1.0);
        assert_eq!(config.max_angle, PI / 3.0);
        assert_eq!(config.curriculum.initial_max_steps, 10);
        assert_eq!(config.curriculum.increment, 10);
        assert_eq!(config.curriculum.period, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = DescentConfig::from_yaml_str("landing_tolerance: 20.0\nreward_mode: free\n")
            .unwrap();
        assert_eq!(config.landing_tolerance, 20.0);
        assert_eq!(config.reward_mode, RewardMode::Free);
        assert_eq!(config.space_limit, 250.0);
        assert_eq!(config.targets.len(), 3);
    }

    #[test]
    fn rejects_zero_descent_rate() {
        let err = DescentConfig::from_yaml_str("speed_z: 0.0\n").unwrap_err();
        assert!(matches!(err, PadsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_curriculum_period() {
        let err = DescentConfig::from_yaml_str("curriculum:\n  period: 0\n").unwrap_err();
        assert!(matches!(err, PadsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_curriculum_increment() {
        let err = DescentConfig::from_yaml_str("curriculum:\n  increment: 0\n").unwrap_err();
        assert!(matches!(err, PadsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_infinite_frame_delay() {
        let err = DescentConfig::from_yaml_str("frame_delay: .inf\n").unwrap_err();
        assert!(matches!(err, PadsError::InvalidConfig(_)));
        let err = DescentConfig::from_yaml_str("frame_delay: -0.5\n").unwrap_err();
        assert!(matches!(err, PadsError::InvalidConfig(_)));
    }

    #[test]
    fn curriculum_follows_loaded_lengths() {
        let config =
            DescentConfig::from_yaml_str("episode_length: 200\ntraining_length: 5000\n").unwrap();
        assert_eq!(config.curriculum.initial_max_steps, 20);
        assert_eq!(config.curriculum.increment, 20);
        assert_eq!(config.curriculum.period, 500);
    }

    #[test]
    fn short_lengths_keep_a_usable_curriculum() {
        let config =
            DescentConfig::from_yaml_str("episode_length: 5\ntraining_length: 3\n").unwrap();
        assert_eq!(config.curriculum.increment, 1);
        assert_eq!(config.curriculum.period, 1);
    }

    #[test]
    fn explicit_curriculum_wins_over_lengths() {
        let yaml = "episode_length: 200\ncurriculum:\n  increment: 5\n";
        let config = DescentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.curriculum.increment, 5);
        assert_eq!(config.curriculum.initial_max_steps, 10);
        assert_eq!(config.curriculum.period, 100);
    }

    #[test]
    fn finds_targets_by_name() {
        let config = DescentConfig::default();
        assert_eq!(config.target("paris").unwrap().lon, 2.319827);
        assert!(matches!(
            config.target("Atlantis"),
            Err(PadsError::UnknownTarget(_))
        ));
    }
}
