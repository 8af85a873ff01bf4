//! Control module - settings and deferred sensor configuration.
//!
//! [`BridgeConfig`] holds the user-facing switches. Changes that must
//! reach the sensor (policy flags) go through the [`ControlQueue`], so
//! callbacks arriving on other threads never touch the sensor directly.

mod config;
mod deferred;

pub use config::BridgeConfig;
pub use deferred::{ControlHandle, ControlMessage, ControlQueue};
