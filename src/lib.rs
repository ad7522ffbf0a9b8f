pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use api::{build_router, AppState};
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    planner::{PlannerConfig, WeeklyPlanner},
    wardrobe::WardrobeService,
};
pub use utils::error::{Result, WardrobeError};
