pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{file::FileConfig, sysfs::SysfsBus, ResolvedSettings};
pub use core::{Engine, RetryPolicy};
pub use domain::model::{Outcome, Reply, Request};
pub use utils::error::{Result, WireError};
pub use utils::logger::TracingEvents;
