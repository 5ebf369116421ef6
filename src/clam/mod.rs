pub mod core;
pub mod error;
pub mod settings;
pub mod rewards;
pub mod placement;
pub mod registry;
pub mod cooldown;
pub mod respawn;
pub mod host;
pub mod event;
pub mod tasks;
pub mod plugin;

pub use event::{ClamEvent, ClamHost, EventConfig, InteractionOutcome, ReloadReport, StartReport};
pub use plugin::ClamPlugin;
