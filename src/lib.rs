// Squad Shuffle - Player rotation for team-based pickup games
//
// This is the library crate containing the rotation engine, the roster
// session and the roster store. Presentation layers sit on top of
// SessionManager and subscribe to its change events.

pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use error::ShuffleError;
pub use models::{GameSettings, Notice, Player, PlayerStatus, RotationResult};
pub use services::RotationEngine;
pub use state::{SessionChange, SessionManager};
pub use store::{MemoryRosterStore, RosterStore, YamlRosterStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
