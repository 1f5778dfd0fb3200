use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::player::Player;

/// Label reserved for the players sitting out a round.
pub const SITTING_LABEL: &str = "Sitting";

/// Label of the game at the 1-based `index`.
pub fn game_label(index: usize) -> String {
    format!("Game {}", index)
}

/// A team: an ordered list of players.
pub type Team = Vec<Player>;

/// Informational conditions raised alongside a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// More players reached the play limit than could sit; the excess play.
    PlayLimitOverflow { kept_playing: usize },

    /// Not enough undesignated players to sit; some sit-limited players sat anyway.
    SitLimitOverflow { forced_to_sit: usize },

    /// Every participant is required to play, so manual designations are refused.
    ManualAssignmentUnavailable,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Self::PlayLimitOverflow { .. } => "Too Many Play Limits Reached",
            Self::SitLimitOverflow { .. } => "Too Many Sit Limits Reached",
            Self::ManualAssignmentUnavailable => "Manual Assignment Unavailable",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PlayLimitOverflow { .. } => {
                "Too many players have reached the Play Limit. Some of them will play to fulfill match requirements. Manually designated players will still sit. Consider adjusting your game settings if this issue is recurring."
            }
            Self::SitLimitOverflow { .. } => {
                "Too many players have reached the Sit Limit. Some of them will sit to fulfill match requirements. Manually designated players will still play. Consider adjusting your game settings if this issue is recurring."
            }
            Self::ManualAssignmentUnavailable => {
                "Due to the number of participants and your saved match settings, all players are required to play."
            }
        }
    }
}

/// Outcome of one rotation: teams per game, who sits, and any advisories.
///
/// Players are snapshots taken after their streaks and statuses were updated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationResult {
    /// Game label ("Game 1", "Game 2", ...) to its teams, in game order.
    pub games: IndexMap<String, Vec<Team>>,

    /// Present only when at least one player sits this round.
    pub sitting: Option<Vec<Player>>,

    pub notices: Vec<Notice>,
}

impl RotationResult {
    /// Game labels ordered by game number, so "Game 10" follows "Game 9".
    pub fn game_labels_sorted(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.games.keys().map(String::as_str).collect();
        labels.sort_by_key(|label| {
            label
                .rsplit(' ')
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX)
        });
        labels
    }

    /// Section headings in display order: games by number, then
    /// [`SITTING_LABEL`] when anyone sits.
    pub fn section_labels(&self) -> Vec<&str> {
        let mut labels = self.game_labels_sorted();
        if self.sitting.is_some() {
            labels.push(SITTING_LABEL);
        }
        labels
    }

    /// Players listed under a section heading, teams flattened in order.
    pub fn section_players(&self, label: &str) -> Option<Vec<&Player>> {
        if label == SITTING_LABEL {
            return self.sitting.as_ref().map(|players| players.iter().collect());
        }
        self.games
            .get(label)
            .map(|teams| teams.iter().flatten().collect())
    }

    pub fn teams(&self, label: &str) -> Option<&[Team]> {
        self.games.get(label).map(Vec::as_slice)
    }

    pub fn sitting_players(&self) -> &[Player] {
        self.sitting.as_deref().unwrap_or(&[])
    }

    /// Every player placed on a team, across all games.
    pub fn playing_players(&self) -> impl Iterator<Item = &Player> {
        self.games.values().flatten().flatten()
    }

    pub fn playing_count(&self) -> usize {
        self.playing_players().count()
    }

    pub fn sitting_count(&self) -> usize {
        self.sitting_players().len()
    }
}
