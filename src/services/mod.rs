//! Services module - Pure rotation logic.
//!
//! This module holds the player-rotation algorithm. It has no storage or UI
//! dependencies: every input is an explicit parameter and every outcome is a
//! return value.
//!
//! # Components
//!
//! - [`RotationEngine`]: Runs a rotation over a borrowed roster:
//!   - Feasibility check against the required player count
//!   - Sitter selection (manual out, auto out, then a shuffled fill that
//!     protects manual in and, on the first pass, auto in)
//!   - Streak and status updates for every participant
//!   - Team distribution into `Game N` buckets
//!
//! - [`SitterSelection`]: The sit/play partition, as roster indices
//!
//! # Usage Example
//!
//! ```
//! use squad_shuffle::models::{GameSettings, Player};
//! use squad_shuffle::services::RotationEngine;
//!
//! let mut roster: Vec<Player> = ["Ana", "Ben", "Cy"]
//!     .into_iter()
//!     .map(|name| {
//!         let mut player = Player::new(name);
//!         player.is_selected = true;
//!         player
//!     })
//!     .collect();
//!
//! let mut engine = RotationEngine::with_seed(1);
//! let result = engine.generate(&mut roster, &GameSettings::default()).unwrap();
//!
//! assert_eq!(result.playing_count(), 2);
//! assert_eq!(result.sitting_count(), 1);
//! ```

pub mod rotation;

pub use rotation::{RotationEngine, RotationPhase, SitterSelection};
