//! Configuration: endpoint settings, the settings file and the process
//! environment.
//!
//! Settings edits are persisted straight away but only restart a transport
//! once they have been quiet for
//! [`RECONFIGURE_DEBOUNCE`](crate::core::constants::RECONFIGURE_DEBOUNCE).

mod debounce;
mod env;
mod settings;
mod store;

pub use debounce::Debouncer;
pub use env::{LogFormat, RuntimeConfig};
pub use settings::{Reconfigure, Settings, SettingsField};
pub use store::{DEFAULT_SETTINGS_PATH, SettingsStore, SettingsWatcher};
