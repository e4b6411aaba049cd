use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pads::{by_name, fly, plot, DescentConfig, DescentEnv, Environment};
use rand::{rngs::StdRng, SeedableRng};

/// Name of the plot
const NAME: &str = "PADS Trajectory";

/// A simple CLI for passing arguments
#[derive(Parser, Debug)]
#[command(name = "fly")]
struct Args {
    /// YAML configuration, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Drop zone the trajectory is anchored to
    #[arg(short, long, default_value = "Paris")]
    target: String,

    /// zero, homing or random
    #[arg(short, long, default_value = "homing")]
    policy: String,

    /// Start distance to the target, in units (defaults to the configuration)
    #[arg(long)]
    rho: Option<f64>,

    /// Start bearing from the target, in radians
    #[arg(long)]
    theta: Option<f64>,

    /// Start altitude, in units
    #[arg(long)]
    z: Option<f64>,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Pause between printed waypoints, as a live display would
    #[arg(long)]
    animate: bool,

    /// Skip writing the PNG chart
    #[arg(long)]
    no_plot: bool,
}

// Renders the trajectory of a frozen policy from a chosen release point
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
    let target = config.target(&args.target)?.clone();
    let rho = args.rho.unwrap_or(config.rho_init);
    let theta = args.theta.unwrap_or(config.theta_init);
    let z = args.z.unwrap_or(config.z_init);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut env = DescentEnv::new(config, &mut rng)?;
    let mut policy = by_name(&args.policy, env.config(), args.seed)?;

    let trajectory = fly(&mut env, policy.as_mut(), rho, theta, z)?;

    println!("------------------------- Target -------------------------");
    println!("Name:                         {}", target.name);
    println!("Latitude:                     {:?}", target.lat);
    println!("Longitude:                    {:?}", target.lon);
    println!("\n----------------------- Waypoints ------------------------");
    let delay = Duration::from_secs_f64(env.config().frame_delay.max(0.0));
    for waypoint in &trajectory.waypoints {
        let offset = waypoint.offset();
        println!(
            "step {:>4}    east {:>9.1} m    north {:>9.1} m    altitude {:>7.1} m",
            waypoint.step, offset.x, offset.y, waypoint.altitude
        );
        if args.animate {
            thread::sleep(delay);
        }
    }
    println!("\n------------------------- Result -------------------------");
    println!("Policy:                       {}", policy.name());
    println!("Termination:                  {:?}", trajectory.termination);
    println!("Reward:                       {:?}", trajectory.final_reward);
    if let Some(landing) = trajectory.landing() {
        println!("Miss distance:                {:.1} m", landing.rho);
    }

    if !args.no_plot {
        let landing_radius = env.config().landing_tolerance * env.config().move_to_meters;
        let path = plot(NAME, &trajectory, landing_radius)
            .map_err(|e| anyhow::anyhow!("failed to plot trajectory: {e}"))?;
        println!("Plot:                         {}", path.display());
    }

    Ok(())
}
