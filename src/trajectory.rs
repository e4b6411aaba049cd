use std::f64::consts::TAU;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::env::{Environment, ResetMode, Termination};
use crate::error::Result;
use crate::policy::Policy;
use crate::polar::from_polar;

/// Point of a displayed path, in metres around the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub step: u32,
    pub rho: f64,
    pub theta: f64,
    pub altitude: f64,
}

impl Waypoint {
    /// East/north offset from the target
    pub fn offset(&self) -> Vector2<f64> {
        from_polar(self.rho, self.theta)
    }
}

/// A flown episode, ready for display
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub waypoints: Vec<Waypoint>,
    /// Reward of the terminal step, if the episode ended within the budget
    pub final_reward: Option<f64>,
    pub termination: Option<Termination>,
}

impl Trajectory {
    pub fn landing(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }
}

/// Flies one evaluation episode from `(rho, theta, z)` with a frozen policy.
///
/// Stops when the environment reports `done` or after `z` steps. Waypoints are
/// rebuilt from the observations, the altitude from the step count, and all
/// lengths are scaled to metres.
pub fn fly<E: Environment, P: Policy + ?Sized>(
    env: &mut E,
    policy: &mut P,
    rho: f64,
    theta: f64,
    z: f64,
) -> Result<Trajectory> {
    let config = env.config();
    let meters = config.move_to_meters;
    let space_limit = config.space_limit;

    // evaluation resets never sample
    let mut rng = StdRng::seed_from_u64(0);
    let mut obs = env.reset(ResetMode::Evaluation { rho, theta, z }, &mut rng)?;

    let mut waypoints = vec![Waypoint {
        step: 0,
        rho: meters * rho,
        theta,
        altitude: meters * z,
    }];
    let mut final_reward = None;
    let mut termination = None;

    let budget = z.ceil() as u32;
    let mut step = 0;
    while step < budget {
        step += 1;
        let action = policy.act(&obs);
        let result = env.step(action)?;
        obs = result.observation;

        waypoints.push(Waypoint {
            step,
            rho: meters * obs[0] * space_limit,
            theta: obs[1] * TAU,
            altitude: meters * (z - step as f64),
        });

        if result.done {
            final_reward = Some(result.reward);
            termination = result.termination;
            break;
        }
    }

    debug!(
        policy = policy.name(),
        steps = step,
        ?termination,
        ?final_reward,
        "trajectory flown"
    );
    Ok(Trajectory {
        waypoints,
        final_reward,
        termination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DescentConfig, RewardMode};
    use crate::env::DescentEnv;
    use crate::policy::ZeroPolicy;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn env(config: DescentConfig) -> DescentEnv {
        DescentEnv::new(config, &mut StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn stops_on_landing() {
        let mut env = env(DescentConfig {
            reward_mode: RewardMode::Free,
            ..Default::default()
        });
        let trajectory = fly(&mut env, &mut ZeroPolicy, 10.0, PI / 2.0, 20.0).unwrap();
        assert_eq!(trajectory.waypoints.len(), 21);
        assert_eq!(trajectory.termination, Some(Termination::Landed));
        assert_eq!(trajectory.final_reward, Some(0.0));
        assert_relative_eq!(trajectory.landing().unwrap().altitude, 0.0);
    }

    #[test]
    fn stops_when_leaving_the_space() {
        let mut env = env(DescentConfig::default());
        let trajectory = fly(&mut env, &mut ZeroPolicy, 251.0, 0.0, 100.0).unwrap();
        assert_eq!(trajectory.waypoints.len(), 2);
        assert_eq!(trajectory.termination, Some(Termination::OutOfBounds));
        assert_eq!(trajectory.final_reward, Some(-1.0));
    }

    #[test]
    fn budget_caps_fractional_altitude() {
        // 2.5 units of altitude: landing happens on the third step
        let mut env = env(DescentConfig {
            reward_mode: RewardMode::Free,
            ..Default::default()
        });
        let trajectory = fly(&mut env, &mut ZeroPolicy, 0.0, 0.0, 2.5).unwrap();
        assert_eq!(trajectory.waypoints.len(), 4);
        assert_eq!(trajectory.termination, Some(Termination::Landed));
    }

    #[test]
    fn waypoints_are_in_metres() {
        let mut env = env(DescentConfig::default());
        let trajectory = fly(&mut env, &mut ZeroPolicy, 10.0, PI / 2.0, 100.0).unwrap();
        let start = trajectory.waypoints[0];
        assert_relative_eq!(start.rho, 80.0);
        assert_relative_eq!(start.altitude, 800.0);

        // first step flies 5 units east of (0, 10)
        let first = trajectory.waypoints[1];
        let offset = first.offset();
        assert_relative_eq!(offset.x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(offset.y, 80.0, epsilon = 1e-9);
        assert_relative_eq!(first.altitude, 792.0);
    }
}
