pub mod codec;
pub mod engine;
pub mod family;
pub mod port2;
pub mod port8;
pub mod retry;
pub mod temperature;

pub use crate::domain::model::{Outcome, Reply, Request, StatusReport};
pub use crate::domain::ports::{EventSink, SettingsProvider, WireBus};
pub use crate::utils::error::Result;
pub use engine::Engine;
pub use retry::RetryPolicy;
