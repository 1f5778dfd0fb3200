use crate::error::ShuffleError;
use crate::models::{GameSettings, Player, SettingsFile};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use uuid::Uuid;

use super::RosterStore;

/// Persisted roster file (`Players.yaml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayersFile {
    #[serde(rename = "Players", default)]
    pub players: Vec<Player>,
}

/// YAML-backed roster store.
///
/// Manages two files in a data directory:
/// - `Players.yaml`: every player record, in insertion order
/// - `Game Settings.yaml`: the game settings singleton
#[derive(Debug, Clone)]
pub struct YamlRosterStore {
    data_dir: Utf8PathBuf,
    players_path: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl YamlRosterStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create data directory: {}", data_dir))?;
        }

        Ok(Self {
            players_path: data_dir.join("Players.yaml"),
            settings_path: data_dir.join("Game Settings.yaml"),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    fn read_players(&self) -> Result<Vec<Player>> {
        if !self.players_path.exists() {
            tracing::debug!("No roster file at {}, starting empty", self.players_path);
            return Ok(Vec::new());
        }

        let file_contents = fs::read_to_string(&self.players_path)
            .with_context(|| format!("Failed to read roster: {}", self.players_path))?;

        let file: PlayersFile = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse roster: {}", self.players_path))?;

        Ok(file.players)
    }

    fn write_players(&self, players: &[Player]) -> Result<()> {
        let file = PlayersFile {
            players: players.to_vec(),
        };
        let yaml_string =
            serde_yaml_ng::to_string(&file).context("Failed to serialize roster to YAML")?;

        fs::write(&self.players_path, yaml_string)
            .with_context(|| format!("Failed to write roster: {}", self.players_path))?;

        tracing::debug!("Wrote {} players to {}", players.len(), self.players_path);
        Ok(())
    }

    fn write_settings(&self, settings: &GameSettings) -> Result<()> {
        let file = SettingsFile {
            game_settings: settings.clone(),
        };
        let yaml_string =
            serde_yaml_ng::to_string(&file).context("Failed to serialize game settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write game settings: {}", self.settings_path))?;

        Ok(())
    }
}

impl RosterStore for YamlRosterStore {
    fn load_all_players(&self) -> Result<Vec<Player>, ShuffleError> {
        let players = self.read_players()?;
        tracing::info!("Loaded {} players from {}", players.len(), self.players_path);
        Ok(players)
    }

    fn load_settings(&mut self) -> Result<GameSettings, ShuffleError> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Game settings not found at {}, creating defaults",
                self.settings_path
            );
            let settings = GameSettings::default();
            self.write_settings(&settings)?;
            return Ok(settings);
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read game settings: {}", self.settings_path))?;

        let file: SettingsFile = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse game settings: {}", self.settings_path))?;

        tracing::info!("Loaded game settings from {}", self.settings_path);
        Ok(file.game_settings)
    }

    fn add_player(&mut self, name: &str) -> Result<Player, ShuffleError> {
        let mut players = self.read_players()?;
        if players.iter().any(|p| p.name == name) {
            return Err(ShuffleError::DuplicateName(name.to_string()));
        }

        let player = Player::new(name);
        players.push(player.clone());
        self.write_players(&players)?;

        tracing::info!("Added player {}", name);
        Ok(player)
    }

    fn delete_player(&mut self, id: Uuid) -> Result<(), ShuffleError> {
        let mut players = self.read_players()?;
        let position = players
            .iter()
            .position(|p| p.id == id)
            .ok_or(ShuffleError::PlayerNotFound(id))?;

        let removed = players.remove(position);
        self.write_players(&players)?;

        tracing::info!("Deleted player {}", removed.name);
        Ok(())
    }

    fn save(&mut self, players: &[Player], settings: &GameSettings) -> Result<(), ShuffleError> {
        self.write_players(players)?;
        self.write_settings(settings)?;
        tracing::debug!("Saved roster and settings to {}", self.data_dir);
        Ok(())
    }
}
