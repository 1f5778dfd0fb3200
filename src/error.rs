use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the rotation engine, the roster store and the session.
///
/// Rotation errors (`NotEnoughParticipants`, `TooManySitting`, `TooManyPlaying`,
/// `PoolExhausted`) are raised before any player is mutated, so a failed
/// rotation leaves the roster untouched.
#[derive(Error, Debug)]
pub enum ShuffleError {
    #[error("Not enough participants: {selected} selected, {required} required")]
    NotEnoughParticipants { selected: usize, required: usize },

    #[error("Too many participants set to sit: {designated} designated, {capacity} may sit")]
    TooManySitting { designated: usize, capacity: usize },

    #[error("Too many participants set to play: {needed} must sit, only {sat} could")]
    TooManyPlaying { needed: usize, sat: usize },

    #[error("Not enough players left to fill teams: {needed} needed, {available} available")]
    PoolExhausted { needed: usize, available: usize },

    #[error("Player {0} already exists")]
    DuplicateName(String),

    #[error("Player {0} not found")]
    PlayerNotFound(Uuid),

    #[error("Invalid game settings: {0}")]
    InvalidSettings(String),

    #[error("Nothing to reroll")]
    RerollUnavailable,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ShuffleError {
    /// Short user-facing explanation of what to change to get past the error.
    pub fn failure_reason(&self) -> String {
        match self {
            Self::NotEnoughParticipants { .. } => "Not enough participants to continue. Please adjust your game settings or select more participants.".to_string(),
            Self::TooManySitting { .. } => "Too many participants set to sit. Please adjust your game settings or designate fewer participants.".to_string(),
            Self::TooManyPlaying { .. } => "Too many participants set to play. Please adjust your game settings or designate fewer participants.".to_string(),
            Self::PoolExhausted { .. } => "The roster changed while teams were being formed. Please try again.".to_string(),
            Self::DuplicateName(name) => format!("A player named \"{}\" already exists. Please choose a different name.", name),
            Self::PlayerNotFound(_) => "That player no longer exists.".to_string(),
            Self::InvalidSettings(detail) => format!("Game settings are invalid: {}.", detail),
            Self::RerollUnavailable => "Generate teams before rerolling.".to_string(),
            Self::Storage(err) => format!("An unexpected storage error occurred: {:#}", err),
        }
    }

    /// True for errors raised by feasibility checks or sitter selection.
    pub fn is_rotation_error(&self) -> bool {
        matches!(
            self,
            Self::NotEnoughParticipants { .. }
                | Self::TooManySitting { .. }
                | Self::TooManyPlaying { .. }
                | Self::PoolExhausted { .. }
        )
    }
}
