use std::collections::HashMap;
use std::f64::consts::{E, PI, TAU};

use nalgebra::{Vector2, Vector4};
use rand::Rng;
use tracing::{debug, trace};

pub use crate::config::RewardMode;
use crate::config::DescentConfig;
use crate::error::{PadsError, Result};
use crate::polar::{angle, from_polar, magnitude, rotate, turn_fraction};

/// Normalized view of the agent: distance to target, bearing of the agent,
/// heading of the agent, fraction of the nominal descent consumed
pub type Observation = Vector4<f64>;

/// Auxiliary data returned with every step, currently always empty
pub type Info = HashMap<String, f64>;

/// How a reset chooses the starting point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetMode {
    /// Random start within the start limit, altitude sized to the step budget
    Training,
    /// Caller-supplied start, in polar coordinates around the target
    Evaluation { rho: f64, theta: f64, z: f64 },
}

impl ResetMode {
    /// Evaluation start using the default position of the configuration
    pub fn default_evaluation(config: &DescentConfig) -> Self {
        Self::Evaluation {
            rho: config.rho_init,
            theta: config.theta_init,
            z: config.z_init,
        }
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Altitude reached zero
    Landed,
    /// Left the glide cone or the space limit
    OutOfBounds,
    /// Undid a full loop
    Loop,
}

/// Result of a single step
#[derive(Debug, Clone)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
    pub termination: Option<Termination>,
}

/// Anything that can be driven like the descent simulator
pub trait Environment {
    /// Starts a new episode and returns its first observation
    fn reset<R: Rng + ?Sized>(&mut self, mode: ResetMode, rng: &mut R) -> Result<Observation>;

    /// Advances the episode by one step with an action in [-1, 1]
    fn step(&mut self, action: f64) -> Result<Step>;

    fn observation(&self) -> Observation;

    fn config(&self) -> &DescentConfig;

    /// Step budget used to size the altitude of training episodes
    fn max_steps(&self) -> u32;

    fn set_max_steps(&mut self, max_steps: u32);
}

/// Reward for landing `distance` units away from the target:
/// 1 on target, 2/e - 1 at the tolerance radius, tending to -1 far away
pub fn landing_reward(distance: f64, landing_tolerance: f64) -> f64 {
    2.0 * ((1.0 - distance / landing_tolerance).exp() / E) - 1.0
}

#[derive(Debug, Clone)]
struct AgentState {
    position: Vector2<f64>,
    previous_position: Vector2<f64>,
    /// Constant length, only its angle changes
    speed: Vector2<f64>,
    z: f64,
    step_index: u32,
    rotation: f64,
    full_rotation: bool,
}

impl AgentState {
    fn new(config: &DescentConfig, rho: f64, theta: f64, z: f64) -> Self {
        let position = from_polar(rho, theta);
        Self {
            position,
            previous_position: position,
            speed: from_polar(config.speed_rho, config.speed_angle),
            z,
            step_index: 0,
            rotation: 0.0,
            full_rotation: false,
        }
    }
}

/// The steerable parachute descending toward a target at the origin
#[derive(Debug, Clone)]
pub struct DescentEnv {
    config: DescentConfig,
    max_steps: u32,
    state: AgentState,
    /// False until the first reset
    ready: bool,
}

impl DescentEnv {
    /// Creates the simulator with a random position within the space limit.
    /// The episode only starts with the first call to `reset`.
    pub fn new<R: Rng + ?Sized>(config: DescentConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let rho = rng.random::<f64>() * config.space_limit;
        let theta = rng.random::<f64>() * TAU - PI;
        let state = AgentState::new(&config, rho, theta, config.z_init);
        Ok(Self {
            max_steps: config.episode_length,
            config,
            state,
            ready: false,
        })
    }

    pub fn position(&self) -> Vector2<f64> {
        self.state.position
    }

    /// Position before the most recent step
    pub fn previous_position(&self) -> Vector2<f64> {
        self.state.previous_position
    }

    pub fn speed(&self) -> Vector2<f64> {
        self.state.speed
    }

    pub fn altitude(&self) -> f64 {
        self.state.z
    }

    pub fn step_index(&self) -> u32 {
        self.state.step_index
    }

    /// Signed sum of the heading changes requested since the reset
    pub fn rotation(&self) -> f64 {
        self.state.rotation
    }

    pub fn completed_loop(&self) -> bool {
        self.state.full_rotation
    }

    /// Whether the agent is outside the glide cone or the space limit.
    /// The cone narrows with altitude: with a fixed glide ratio the agent
    /// can cover at most `z * speed_rho / speed_z` before landing.
    pub fn out_of_bounds(&self) -> bool {
        let low_boundary =
            self.config.landing_tolerance + self.state.z * self.config.speed_rho / self.config.speed_z;
        let mid_boundary = self.config.space_limit;
        low_boundary.min(mid_boundary) < magnitude(&self.state.position)
    }

    fn is_strict(&self) -> bool {
        self.config.reward_mode == RewardMode::Strict
    }
}

impl Environment for DescentEnv {
    fn reset<R: Rng + ?Sized>(&mut self, mode: ResetMode, rng: &mut R) -> Result<Observation> {
        let (rho, theta, z) = match mode {
            ResetMode::Training => (
                rng.random::<f64>() * self.config.start_limit,
                PI - rng.random::<f64>() * TAU,
                self.max_steps as f64 * self.config.speed_z,
            ),
            ResetMode::Evaluation { rho, theta, z } => {
                let valid = rho.is_finite() && rho >= 0.0 && theta.is_finite() && z.is_finite() && z >= 0.0;
                if !valid {
                    return Err(PadsError::InvalidStart { rho, theta, z });
                }
                (rho, theta, z)
            }
        };

        self.state = AgentState::new(&self.config, rho, theta, z);
        self.ready = true;
        trace!(rho, theta, z, "reset");
        Ok(self.observation())
    }

    fn step(&mut self, action: f64) -> Result<Step> {
        if !self.ready {
            return Err(PadsError::NotReset);
        }
        if !(action.is_finite() && (-1.0..=1.0).contains(&action)) {
            return Err(PadsError::ActionOutOfRange(action));
        }

        let strict = self.is_strict();
        {
            let config = &self.config;
            let state = &mut self.state;
            state.step_index += 1;

            state.speed = rotate(&state.speed, config.max_angle * action);
            state.previous_position = state.position;
            state.position += state.speed;
            state.z -= config.speed_z;

            if strict {
                state.rotation += action * config.speed_angle;
                if TAU < state.rotation.abs() {
                    state.full_rotation = true;
                }
            }
        }

        let distance = magnitude(&self.state.position);
        let (reward, termination) = if self.state.z <= 0.0 {
            let reward = if strict {
                landing_reward(distance, self.config.landing_tolerance)
            } else {
                0.0
            };
            (reward, Some(Termination::Landed))
        } else if strict && self.out_of_bounds() {
            (-1.0, Some(Termination::OutOfBounds))
        } else if strict && self.state.rotation == 0.0 && self.state.full_rotation {
            // a full loop must not be undone: no figure-eights
            (-1.0, Some(Termination::Loop))
        } else {
            (0.0, None)
        };

        let done = termination.is_some();
        trace!(
            step = self.state.step_index,
            action,
            distance,
            z = self.state.z,
            "step"
        );
        if let Some(cause) = termination {
            debug!(
                step = self.state.step_index,
                ?cause,
                distance,
                reward,
                "episode over"
            );
        }

        Ok(Step {
            observation: self.observation(),
            reward,
            done,
            info: Info::new(),
            termination,
        })
    }

    fn observation(&self) -> Observation {
        let distance = magnitude(&self.state.position) / self.config.space_limit;
        let bearing = turn_fraction(angle(&self.state.position));
        let heading = turn_fraction(angle(&self.state.speed));
        let progress = (self.config.z_init - self.state.z) / self.config.z_init;
        Observation::new(distance, bearing, heading, progress)
    }

    fn config(&self) -> &DescentConfig {
        &self.config
    }

    fn max_steps(&self) -> u32 {
        self.max_steps
    }

    fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps;
    }
}
