use clap::Parser;
use pads::{DescentConfig, DescentEnv, Environment, HomingPolicy, Policy, ResetMode};
use rand::{rngs::StdRng, SeedableRng};

/// Seed of the simulator construction
const SEED: u64 = 42;

/// A simple CLI for passing arguments
#[derive(Parser, Debug)]
#[command(name = "pads")]
struct Args {
    /// YAML configuration, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,
}

// Flies one evaluation episode from the default start with the homing policy
// and prints every step
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match args.config {
        Some(path) => DescentConfig::from_yaml_file(path)?,
        None => DescentConfig::default(),
    };

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut env = DescentEnv::new(config.clone(), &mut rng)?;
    let mut policy = HomingPolicy::from_config(&config);

    let mut obs = env.reset(ResetMode::default_evaluation(&config), &mut rng)?;
    println!("start obs:    {:.4?}", obs.as_slice());

    let mut step = 0;
    loop {
        step += 1;
        let action = policy.act(&obs);
        let result = env.step(action)?;
        obs = result.observation;
        println!(
            "step {:>4}    action {:>7.3}    obs {:.4?}    reward {:.4}",
            step,
            action,
            obs.as_slice(),
            result.reward
        );
        if result.done {
            println!("\nend of the episode: {:?}", result.termination);
            println!("reward:       {:.4}", result.reward);
            println!("position:     {:.2?}", env.position().as_slice());
            break;
        }
    }

    Ok(())
}
