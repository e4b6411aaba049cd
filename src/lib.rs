pub mod config;
pub mod curriculum;
pub mod env;
pub mod error;
pub mod evaluate;
pub mod plot;
pub mod polar;
pub mod policy;
pub mod trajectory;

pub use config::{CurriculumConfig, DescentConfig, RewardMode, Target};
pub use curriculum::Curriculum;
pub use env::{
    landing_reward, DescentEnv, Environment, Info, Observation, ResetMode, Step, Termination,
};
pub use error::{PadsError, Result};
pub use plot::plot;
pub use policy::{by_name, HomingPolicy, Policy, RandomPolicy, ZeroPolicy};
pub use trajectory::{fly, Trajectory, Waypoint};
