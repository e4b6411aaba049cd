use anyhow::Context;
use clap::Parser;
use pads::evaluate::{run_episode, summarize, EpisodeOutcome};
use pads::{by_name, Curriculum, DescentConfig, DescentEnv, Environment, ResetMode};
use rand::{rngs::StdRng, SeedableRng};

/// A simple CLI for passing arguments
#[derive(Parser, Debug)]
#[command(name = "curriculum")]
struct Args {
    /// YAML configuration, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// zero, homing or random
    #[arg(short, long, default_value = "random")]
    policy: String,

    /// Number of episodes, defaults to the configured training length
    #[arg(short, long)]
    episodes: Option<u32>,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

// Drives training-mode episodes through the curriculum and reports
// reward statistics for every stage of the step budget
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => DescentConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load {path}"))?,
        None => DescentConfig::default(),
    };
    let episodes = args.episodes.unwrap_or(config.training_length);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let env = DescentEnv::new(config.clone(), &mut rng)?;
    let mut env = Curriculum::new(env, config.curriculum)?;
    let mut policy = by_name(&args.policy, &config, args.seed)?;

    // (step budget, outcomes) per curriculum stage
    let mut stages: Vec<(u32, Vec<EpisodeOutcome>)> = Vec::new();
    for _ in 0..episodes {
        // training altitude is sized to the step budget, so every episode lands
        let outcome = run_episode(
            &mut env,
            policy.as_mut(),
            ResetMode::Training,
            &mut rng,
            u32::MAX,
        )?;
        let budget = env.max_steps();
        if stages.last().map(|(b, _)| *b) != Some(budget) {
            stages.push((budget, Vec::new()));
        }
        if let Some((_, outcomes)) = stages.last_mut() {
            outcomes.push(outcome);
        }
    }

    println!("------------------------- Input -------------------------");
    println!("Policy:                       {}", policy.name());
    println!("Episodes:                     {}", episodes);
    println!("Reward mode:                  {:?}", config.reward_mode);
    println!("Curriculum:                   {:?}", config.curriculum);
    println!("\n------------------------- Stages ------------------------");
    for (budget, outcomes) in &stages {
        let summary = summarize(outcomes, config.landing_tolerance);
        println!(
            "steps {:>4}    episodes {:>5}    mean {:>7.4}    std {:>7.4}    on target {:>4}    out {:>4}",
            budget,
            summary.episodes,
            summary.mean_reward,
            summary.std_reward,
            summary.on_target,
            summary.out_of_bounds
        );
    }

    Ok(())
}
