use rand::Rng;
use statrs::statistics::Statistics;
use tracing::info;

use crate::env::{Environment, ResetMode, Termination};
use crate::error::Result;
use crate::policy::Policy;

/// Outcome of a single episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    pub steps: u32,
    pub reward: f64,
    /// Distance to the target at the end of the episode, in units
    pub miss_distance: f64,
    pub termination: Option<Termination>,
}

/// Reward statistics over a batch of episodes
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub episodes: usize,
    pub mean_reward: f64,
    pub std_reward: f64,
    pub best_reward: f64,
    pub worst_reward: f64,
    /// Landings within the landing tolerance
    pub on_target: usize,
    pub out_of_bounds: usize,
}

/// Runs episodes until done, or until `max_episode_steps` steps have passed
pub fn run_episode<E, P, R>(
    env: &mut E,
    policy: &mut P,
    mode: ResetMode,
    rng: &mut R,
    max_episode_steps: u32,
) -> Result<EpisodeOutcome>
where
    E: Environment,
    P: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let mut obs = env.reset(mode, rng)?;
    let mut steps = 0;
    let mut reward = 0.0;
    let mut termination = None;

    while steps < max_episode_steps {
        steps += 1;
        let step = env.step(policy.act(&obs))?;
        obs = step.observation;
        reward += step.reward;
        if step.done {
            termination = step.termination;
            break;
        }
    }

    Ok(EpisodeOutcome {
        steps,
        reward,
        miss_distance: obs[0] * env.config().space_limit,
        termination,
    })
}

/// Summarizes a batch of episode outcomes
pub fn summarize(outcomes: &[EpisodeOutcome], landing_tolerance: f64) -> Summary {
    let rewards: Vec<f64> = outcomes.iter().map(|o| o.reward).collect();
    let on_target = outcomes
        .iter()
        .filter(|o| {
            o.termination == Some(Termination::Landed) && o.miss_distance <= landing_tolerance
        })
        .count();
    let out_of_bounds = outcomes
        .iter()
        .filter(|o| o.termination == Some(Termination::OutOfBounds))
        .count();

    Summary {
        episodes: outcomes.len(),
        mean_reward: rewards.iter().mean(),
        std_reward: rewards.iter().std_dev(),
        best_reward: Statistics::max(rewards.iter()),
        worst_reward: Statistics::min(rewards.iter()),
        on_target,
        out_of_bounds,
    }
}

/// Runs `episodes` training-mode episodes and summarizes their rewards
pub fn evaluate<E, P, R>(
    env: &mut E,
    policy: &mut P,
    rng: &mut R,
    episodes: usize,
) -> Result<Summary>
where
    E: Environment,
    P: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let mut outcomes = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        // the altitude of a training episode is sized to the step budget
        let budget = env.max_steps().saturating_add(1);
        outcomes.push(run_episode(env, policy, ResetMode::Training, rng, budget)?);
    }

    let summary = summarize(&outcomes, env.config().landing_tolerance);
    info!(
        policy = policy.name(),
        episodes,
        mean_reward = summary.mean_reward,
        on_target = summary.on_target,
        "evaluation done"
    );
    Ok(summary)
}
