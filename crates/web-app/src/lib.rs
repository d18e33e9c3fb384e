#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod config;
pub mod log;
pub mod notification;
mod service;
mod settings;
pub mod workouts;

pub use config::{Config, ConfigError};
pub use service::Service;
pub use settings::{Settings, SettingsRepository, SettingsService};
