//! Roster persistence.
//!
//! [`RosterStore`] is the durable key-value contract the session persists
//! through. Two implementations ship with the crate:
//! - [`YamlRosterStore`]: `Players.yaml` and `Game Settings.yaml` in a data directory
//! - [`MemoryRosterStore`]: process-local, for tests and hosts with their own durability

pub mod yaml;

pub use yaml::{PlayersFile, YamlRosterStore};

use crate::error::ShuffleError;
use crate::models::{GameSettings, Player};
use uuid::Uuid;

/// Load/save contract for player and game-settings records.
///
/// Calls are synchronous. Implementations wrap their own failures in
/// [`ShuffleError::Storage`].
#[cfg_attr(test, mockall::automock)]
pub trait RosterStore {
    /// All players in insertion order.
    fn load_all_players(&self) -> Result<Vec<Player>, ShuffleError>;

    /// The game settings, creating and persisting the defaults on first access.
    fn load_settings(&mut self) -> Result<GameSettings, ShuffleError>;

    /// Create a player. Fails with `DuplicateName` if the name is taken.
    fn add_player(&mut self, name: &str) -> Result<Player, ShuffleError>;

    /// Remove a player. Fails with `PlayerNotFound` for an unknown id.
    fn delete_player(&mut self, id: Uuid) -> Result<(), ShuffleError>;

    /// Overwrite every stored record with the given state.
    fn save(&mut self, players: &[Player], settings: &GameSettings) -> Result<(), ShuffleError>;
}

/// In-memory [`RosterStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryRosterStore {
    players: Vec<Player>,
    settings: Option<GameSettings>,
    saves: usize,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records.
    pub fn with_records(players: Vec<Player>, settings: GameSettings) -> Self {
        Self {
            players,
            settings: Some(settings),
            saves: 0,
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl RosterStore for MemoryRosterStore {
    fn load_all_players(&self) -> Result<Vec<Player>, ShuffleError> {
        Ok(self.players.clone())
    }

    fn load_settings(&mut self) -> Result<GameSettings, ShuffleError> {
        Ok(self.settings.get_or_insert_with(GameSettings::default).clone())
    }

    fn add_player(&mut self, name: &str) -> Result<Player, ShuffleError> {
        if self.players.iter().any(|p| p.name == name) {
            return Err(ShuffleError::DuplicateName(name.to_string()));
        }
        let player = Player::new(name);
        self.players.push(player.clone());
        Ok(player)
    }

    fn delete_player(&mut self, id: Uuid) -> Result<(), ShuffleError> {
        let position = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(ShuffleError::PlayerNotFound(id))?;
        self.players.remove(position);
        Ok(())
    }

    fn save(&mut self, players: &[Player], settings: &GameSettings) -> Result<(), ShuffleError> {
        self.players = players.to_vec();
        self.settings = Some(settings.clone());
        self.saves += 1;
        Ok(())
    }
}
