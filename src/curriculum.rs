use rand::Rng;
use tracing::info;

use crate::config::{CurriculumConfig, DescentConfig};
use crate::env::{Environment, Observation, ResetMode, Step};
use crate::error::{PadsError, Result};

/// Wraps an environment and grows its step budget as resets accumulate,
/// so that training starts with short episodes
#[derive(Debug, Clone)]
pub struct Curriculum<E> {
    env: E,
    config: CurriculumConfig,
    resets: u64,
}

impl<E: Environment> Curriculum<E> {
    /// Installs the initial step budget on the wrapped environment
    pub fn new(mut env: E, config: CurriculumConfig) -> Result<Self> {
        if config.period == 0 {
            return Err(PadsError::InvalidConfig(
                "curriculum.period must be at least 1".to_string(),
            ));
        }
        env.set_max_steps(config.initial_max_steps);
        Ok(Self {
            env,
            config,
            resets: 0,
        })
    }

    /// Number of resets seen so far
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Current stage, 0 before the first increment
    pub fn stage(&self) -> u64 {
        self.resets / self.config.period as u64
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Environment> Environment for Curriculum<E> {
    fn reset<R: Rng + ?Sized>(&mut self, mode: ResetMode, rng: &mut R) -> Result<Observation> {
        self.resets += 1;
        if self.resets % self.config.period as u64 == 0 {
            let max_steps = self.env.max_steps().saturating_add(self.config.increment);
            self.env.set_max_steps(max_steps);
            info!(resets = self.resets, max_steps, "curriculum step budget raised");
        }
        self.env.reset(mode, rng)
    }

    fn step(&mut self, action: f64) -> Result<Step> {
        self.env.step(action)
    }

    fn observation(&self) -> Observation {
        self.env.observation()
    }

    fn config(&self) -> &DescentConfig {
        self.env.config()
    }

    fn max_steps(&self) -> u32 {
        self.env.max_steps()
    }

    fn set_max_steps(&mut self, max_steps: u32) {
        self.env.set_max_steps(max_steps);
    }
}
