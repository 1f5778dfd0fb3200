use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::settings::GameSettings;

/// Rotation designation of a player for the next round.
///
/// Manual designations are set by the user and last one round. Auto
/// designations are applied once a streak limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerStatus {
    #[default]
    None,
    ManualIn,
    ManualOut,
    AutoIn,
    AutoOut,
}

impl PlayerStatus {
    pub fn is_manual(self) -> bool {
        matches!(self, Self::ManualIn | Self::ManualOut)
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Self::AutoIn | Self::AutoOut)
    }
}

/// A roster entry.
///
/// `streak` is signed: positive counts consecutive rounds played, negative
/// counts consecutive rounds sat, zero is neutral. `previous_status` and
/// `previous_streak` hold the values from before the last rotation so that
/// a reroll can undo it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub status: PlayerStatus,
    #[serde(default)]
    pub previous_status: PlayerStatus,
    #[serde(default)]
    pub streak: i32,
    #[serde(default)]
    pub previous_streak: i32,
    pub last_used: DateTime<Utc>,
}

impl Player {
    /// Create an unselected player with a fresh id and neutral rotation state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_selected: false,
            status: PlayerStatus::None,
            previous_status: PlayerStatus::None,
            streak: 0,
            previous_streak: 0,
            last_used: Utc::now(),
        }
    }

    /// Clear rotation state. Used when a player leaves the roster or when
    /// all participants are reset.
    pub fn reset(&mut self, is_selected: bool) {
        self.status = PlayerStatus::None;
        self.previous_status = PlayerStatus::None;
        self.streak = 0;
        self.previous_streak = 0;
        self.is_selected = is_selected;
    }

    /// Apply a sat-out round.
    ///
    /// A play streak drops straight to -1; a sit streak keeps decreasing.
    /// Sit designations are consumed, and AutoIn is applied once the sit
    /// limit is reached.
    pub fn record_sit(&mut self, settings: &GameSettings, now: DateTime<Utc>) {
        self.snapshot(now);

        self.streak = if self.streak > 0 {
            -1
        } else {
            self.streak.saturating_sub(1)
        };

        if matches!(self.status, PlayerStatus::AutoOut | PlayerStatus::ManualOut) {
            self.status = PlayerStatus::None;
        }

        if settings.use_auto_in && i64::from(self.streak) <= -i64::from(settings.sit_limit) {
            self.status = PlayerStatus::AutoIn;
        }
    }

    /// Apply a played round. Mirror image of [`record_sit`](Self::record_sit).
    pub fn record_play(&mut self, settings: &GameSettings, now: DateTime<Utc>) {
        self.snapshot(now);

        self.streak = if self.streak < 0 {
            1
        } else {
            self.streak.saturating_add(1)
        };

        if matches!(self.status, PlayerStatus::AutoIn | PlayerStatus::ManualIn) {
            self.status = PlayerStatus::None;
        }

        if settings.use_auto_out && i64::from(self.streak) >= i64::from(settings.play_limit) {
            self.status = PlayerStatus::AutoOut;
        }
    }

    /// Undo the last rotation's status and streak changes.
    pub fn restore_previous(&mut self) {
        self.status = self.previous_status;
        self.streak = self.previous_streak;
    }

    fn snapshot(&mut self, now: DateTime<Utc>) {
        self.last_used = now;
        self.previous_streak = self.streak;
        self.previous_status = self.status;
    }
}
