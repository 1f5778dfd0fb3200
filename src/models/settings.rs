use serde::{Deserialize, Serialize};

use crate::error::ShuffleError;

/// Persisted settings file (`Game Settings.yaml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "Game_Settings", default)]
    pub game_settings: GameSettings,
}

/// Game configuration.
///
/// `use_auto_in` and `use_auto_out` are mutually exclusive; go through
/// [`set_use_auto_in`](Self::set_use_auto_in) and
/// [`set_use_auto_out`](Self::set_use_auto_out) to keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(rename = "Games", default = "default_num_games")]
    pub num_games: u32,

    #[serde(rename = "Teams Per Game", default = "default_num_teams")]
    pub num_teams: u32,

    #[serde(rename = "Players Per Team", default = "default_players_per_team")]
    pub players_per_team: u32,

    #[serde(rename = "Use Auto In", default)]
    pub use_auto_in: bool,

    #[serde(rename = "Use Auto Out", default)]
    pub use_auto_out: bool,

    #[serde(rename = "Sit Limit", default = "default_sit_limit")]
    pub sit_limit: u32,

    #[serde(rename = "Play Limit", default = "default_play_limit")]
    pub play_limit: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            num_games: default_num_games(),
            num_teams: default_num_teams(),
            players_per_team: default_players_per_team(),
            use_auto_in: false,
            use_auto_out: false,
            sit_limit: default_sit_limit(),
            play_limit: default_play_limit(),
        }
    }
}

fn default_num_games() -> u32 {
    1
}

fn default_num_teams() -> u32 {
    2
}

fn default_players_per_team() -> u32 {
    1
}

fn default_sit_limit() -> u32 {
    2
}

fn default_play_limit() -> u32 {
    3
}

impl GameSettings {
    /// Number of players needed to fill every team of every game.
    ///
    /// Saturates at `usize::MAX`; [`validate`](Self::validate) rejects
    /// settings whose product does not fit.
    pub fn required_players(&self) -> usize {
        self.checked_required_players().unwrap_or(usize::MAX)
    }

    fn checked_required_players(&self) -> Option<usize> {
        usize::try_from(self.num_games)
            .ok()?
            .checked_mul(usize::try_from(self.num_teams).ok()?)?
            .checked_mul(usize::try_from(self.players_per_team).ok()?)
    }

    /// Enable or disable auto-in. Enabling it disables auto-out.
    pub fn set_use_auto_in(&mut self, enabled: bool) {
        self.use_auto_in = enabled;
        if enabled {
            self.use_auto_out = false;
        }
    }

    /// Enable or disable auto-out. Enabling it disables auto-in.
    pub fn set_use_auto_out(&mut self, enabled: bool) {
        self.use_auto_out = enabled;
        if enabled {
            self.use_auto_in = false;
        }
    }

    /// Check field ranges and flag exclusivity.
    pub fn validate(&self) -> Result<(), ShuffleError> {
        if self.num_games < 1 {
            return Err(ShuffleError::InvalidSettings(
                "at least one game is required".to_string(),
            ));
        }
        if self.num_teams < 2 {
            return Err(ShuffleError::InvalidSettings(
                "each game needs at least two teams".to_string(),
            ));
        }
        if self.players_per_team < 1 {
            return Err(ShuffleError::InvalidSettings(
                "each team needs at least one player".to_string(),
            ));
        }
        if self.sit_limit < 1 || self.play_limit < 1 {
            return Err(ShuffleError::InvalidSettings(
                "streak limits must be at least 1".to_string(),
            ));
        }
        if self.checked_required_players().is_none() {
            return Err(ShuffleError::InvalidSettings(
                "too many players required per round".to_string(),
            ));
        }
        if i32::try_from(self.sit_limit).is_err() || i32::try_from(self.play_limit).is_err() {
            return Err(ShuffleError::InvalidSettings(format!(
                "streak limits must not exceed {}",
                i32::MAX
            )));
        }
        if self.use_auto_in && self.use_auto_out {
            return Err(ShuffleError::InvalidSettings(
                "auto in and auto out cannot both be enabled".to_string(),
            ));
        }
        Ok(())
    }
}
