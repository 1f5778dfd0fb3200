//! Data models for Squad Shuffle.
//!
//! - [`Player`]: A roster entry with its rotation status and play/sit streak
//! - [`GameSettings`]: Game configuration loaded from `Game Settings.yaml`
//! - [`RotationResult`]: Teams per game and sitting players produced by a rotation
//! - [`Notice`]: Advisories returned alongside successful operations
//! - [`SessionState`]: Roster, settings and reroll state held by
//!   [`SessionManager`](crate::state::SessionManager)
//!
//! All records are plain data. The rotation engine borrows players mutably for
//! the duration of one call; persistence goes through
//! [`RosterStore`](crate::store::RosterStore).

pub mod player;
pub mod rotation;
pub mod session_state;
pub mod settings;

pub use player::{Player, PlayerStatus};
pub use rotation::{Notice, RotationResult, SITTING_LABEL, Team, game_label};
pub use session_state::SessionState;
pub use settings::{GameSettings, SettingsFile};
