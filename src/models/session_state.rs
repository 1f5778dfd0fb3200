use uuid::Uuid;

use super::player::{Player, PlayerStatus};
use super::rotation::RotationResult;
use super::settings::GameSettings;

/// Single source of truth for a roster session.
///
/// Wrapped by [`crate::state::SessionManager`], which diffs it before and
/// after each mutation to produce [`SessionChange`](crate::state::SessionChange)
/// events. Mutate it through the manager, not directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    /// Every known player, selected or not, in insertion order.
    pub players: Vec<Player>,
    pub settings: GameSettings,

    /// True only right after a successful rotation; any roster or settings
    /// change clears it so a stale snapshot is never rerolled.
    pub can_reroll: bool,
    pub last_rotation: Option<RotationResult>,
}

impl SessionState {
    pub fn participants(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_selected)
    }

    pub fn participant_count(&self) -> usize {
        self.participants().count()
    }

    pub fn required_players(&self) -> usize {
        self.settings.required_players()
    }

    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: Uuid) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Manual designations are meaningless when every participant must play.
    pub fn manual_assignment_available(&self) -> bool {
        self.participant_count() != self.required_players()
    }

    /// Drop AutoIn/AutoOut statuses that the current settings no longer allow.
    pub fn clear_disabled_auto_statuses(&mut self) {
        let use_auto_in = self.settings.use_auto_in;
        let use_auto_out = self.settings.use_auto_out;

        for player in self.players.iter_mut().filter(|p| p.is_selected) {
            let stale = match player.status {
                PlayerStatus::AutoIn => !use_auto_in,
                PlayerStatus::AutoOut => !use_auto_out,
                _ => false,
            };
            if stale {
                player.status = PlayerStatus::None;
            }
        }
    }
}
