use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::config::DescentConfig;
use crate::env::Observation;
use crate::error::{PadsError, Result};
use crate::polar::angle_diff;

/// Decision function mapping an observation to a steering action in [-1, 1]
pub trait Policy {
    fn name(&self) -> &str;
    fn act(&mut self, obs: &Observation) -> f64;
}

/// Never steers
pub struct ZeroPolicy;

impl Policy for ZeroPolicy {
    fn name(&self) -> &str {
        "zero"
    }

    fn act(&mut self, _obs: &Observation) -> f64 {
        0.0
    }
}

/// Points the heading at the target, then circles once close enough
pub struct HomingPolicy {
    /// Heading change of a full-scale action
    max_angle: f64,
    /// Normalized distance below which the policy loiters
    loiter_distance: f64,
}

impl HomingPolicy {
    pub fn new(max_angle: f64, loiter_distance: f64) -> Self {
        Self {
            max_angle,
            loiter_distance,
        }
    }

    /// Loiters within half the landing tolerance
    pub fn from_config(config: &DescentConfig) -> Self {
        Self::new(
            config.max_angle,
            0.5 * config.landing_tolerance / config.space_limit,
        )
    }
}

impl Policy for HomingPolicy {
    fn name(&self) -> &str {
        "homing"
    }

    fn act(&mut self, obs: &Observation) -> f64 {
        if obs[0] < self.loiter_distance || self.max_angle <= 0.0 {
            return 1.0;
        }

        // Un-normalize the bearing of the agent and its heading
        let bearing = obs[1] * TAU;
        let heading = obs[2] * TAU;

        let desired = bearing + PI;
        (angle_diff(desired, heading) / self.max_angle).clamp(-1.0, 1.0)
    }
}

/// Uniform random steering, seeded for reproducible rollouts
pub struct RandomPolicy {
    rng: StdRng,
    distribution: Uniform<f64>,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Result<Self> {
        let distribution =
            Uniform::new_inclusive(-1.0, 1.0).map_err(|e| PadsError::Sampling(e.to_string()))?;
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            distribution,
        })
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _obs: &Observation) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

/// Builds one of the bundled policies from its name
pub fn by_name(name: &str, config: &DescentConfig, seed: u64) -> Result<Box<dyn Policy>> {
    match name {
        "zero" => Ok(Box::new(ZeroPolicy)),
        "homing" => Ok(Box::new(HomingPolicy::from_config(config))),
        "random" => Ok(Box::new(RandomPolicy::new(seed)?)),
        other => Err(PadsError::UnknownPolicy(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn homing_turns_toward_target() {
        let mut policy = HomingPolicy::new(PI / 3.0, 0.0);
        // agent due north of the target, flying east: turn right
        let obs = Observation::new(0.5, 0.25, 0.0, 0.0);
        assert_eq!(policy.act(&obs), -1.0);
        // agent due east, flying north: turn left
        let obs = Observation::new(0.5, 0.0, 0.25, 0.0);
        assert_eq!(policy.act(&obs), 1.0);
        // agent due east, flying west: keep going
        let obs = Observation::new(0.5, 0.0, 0.5, 0.0);
        assert_relative_eq!(policy.act(&obs), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn homing_loiters_near_target() {
        let mut policy = HomingPolicy::new(PI / 3.0, 0.1);
        let obs = Observation::new(0.05, 0.0, 0.5, 0.0);
        assert_eq!(policy.act(&obs), 1.0);
    }

    #[test]
    fn builds_policies_by_name() {
        let config = DescentConfig::default();
        for name in ["zero", "homing", "random"] {
            assert_eq!(by_name(name, &config, 0).unwrap().name(), name);
        }
        assert!(matches!(
            by_name("ppo", &config, 0),
            Err(PadsError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn random_policy_is_bounded_and_seeded() {
        let mut a = RandomPolicy::new(11).unwrap();
        let mut b = RandomPolicy::new(11).unwrap();
        let obs = Observation::zeros();
        for _ in 0..1000 {
            let action = a.act(&obs);
            assert!((-1.0..=1.0).contains(&action));
            assert_eq!(action, b.act(&obs));
        }
    }
}
