// Session management module
//
// This module provides the SessionManager which owns the in-memory roster,
// runs rotations through the RotationEngine, persists through a RosterStore,
// and emits change events for presentation layers.

use crate::error::ShuffleError;
use crate::models::{GameSettings, Notice, Player, PlayerStatus, RotationResult, SessionState};
use crate::services::RotationEngine;
use crate::store::RosterStore;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Change events emitted when the session is modified
///
/// Returned from every mutating call and broadcast to subscribers, so a
/// presentation layer can react without polling.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionChange {
    /// Players were added, removed, selected, designated or rotated
    RosterChanged {
        players: usize,
        participants: usize,
    },

    /// Game settings were updated
    SettingsChanged {
        required_players: usize,
    },

    /// Reroll became available or unavailable
    RerollAvailabilityChanged {
        can_reroll: bool,
    },

    /// A rotation completed
    RotationGenerated {
        games: usize,
        playing: usize,
        sitting: usize,
    },

    /// An advisory was raised
    NoticeRaised(Notice),
}

/// Roster session with change-event emission
///
/// The session is the application-level owner of the roster:
/// - Holds [`SessionState`] (players, settings, reroll flag, last rotation)
/// - Runs rotations with a [`RotationEngine`] on a copy of the roster, so a
///   failed rotation changes nothing
/// - Persists after every mutation through its [`RosterStore`]
/// - Diffs state before and after each mutation into [`SessionChange`] events
///
/// All calls are synchronous and take `&mut self`; callers must not rotate
/// the same roster concurrently.
pub struct SessionManager<S: RosterStore> {
    store: S,
    engine: RotationEngine,
    state: SessionState,

    /// Broadcast channel for emitting change events
    state_tx: broadcast::Sender<SessionChange>,
}

impl<S: RosterStore> SessionManager<S> {
    /// Open a session over `store`, loading settings (created on first
    /// access) and players.
    pub fn open(store: S) -> Result<Self, ShuffleError> {
        Self::open_with_engine(store, RotationEngine::new())
    }

    /// Open a session with a specific engine, e.g. a seeded one.
    ///
    /// Fails with `InvalidSettings` if the stored settings are out of range.
    pub fn open_with_engine(mut store: S, engine: RotationEngine) -> Result<Self, ShuffleError> {
        let settings = store.load_settings()?;
        settings
            .validate()
            .inspect_err(|e| tracing::error!("Stored settings rejected: {}", e))?;
        let players = store.load_all_players()?;
        let (state_tx, _) = broadcast::channel(100);

        tracing::info!(
            "Session opened: {} players, {} participants",
            players.len(),
            players.iter().filter(|p| p.is_selected).count()
        );

        Ok(Self {
            store,
            engine,
            state: SessionState {
                players,
                settings,
                can_reroll: false,
                last_rotation: None,
            },
            state_tx,
        })
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn participants(&self) -> Vec<&Player> {
        self.state.participants().collect()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.state.settings
    }

    pub fn required_players(&self) -> usize {
        self.state.required_players()
    }

    pub fn can_reroll(&self) -> bool {
        self.state.can_reroll
    }

    pub fn last_rotation(&self) -> Option<&RotationResult> {
        self.state.last_rotation.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribe to change events
    ///
    /// Returns a receiver that will get notified of all future changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.state_tx.subscribe()
    }

    /// Create a player. Fails with `DuplicateName` if the name is taken.
    pub fn add_player(&mut self, name: &str) -> Result<Vec<SessionChange>, ShuffleError> {
        let player = self.store.add_player(name)?;

        Ok(self.update(|state| {
            state.players.push(player);
            state.can_reroll = false;
        }))
    }

    /// Delete a player permanently.
    pub fn delete_player(&mut self, id: Uuid) -> Result<Vec<SessionChange>, ShuffleError> {
        self.store.delete_player(id)?;

        Ok(self.update(|state| {
            state.players.retain(|p| p.id != id);
            state.can_reroll = false;
        }))
    }

    /// Select an unselected player, or deselect and reset a selected one.
    pub fn toggle_selected(&mut self, id: Uuid) -> Result<Vec<SessionChange>, ShuffleError> {
        self.require_player(id)?;

        self.mutate_and_save(|state| {
            if let Some(player) = state.player_mut(id) {
                if player.is_selected {
                    player.reset(false);
                } else {
                    player.is_selected = true;
                }
            }
            state.can_reroll = false;
        })
    }

    /// Deselect and reset the given participants. Unknown ids are ignored.
    pub fn remove_participants(&mut self, ids: &[Uuid]) -> Result<Vec<SessionChange>, ShuffleError> {
        self.mutate_and_save(|state| {
            for player in state.players.iter_mut().filter(|p| ids.contains(&p.id)) {
                player.reset(false);
            }
            state.can_reroll = false;
        })
    }

    /// Clear streaks and designations of every participant, keeping them selected.
    pub fn reset_all_participants(&mut self) -> Result<Vec<SessionChange>, ShuffleError> {
        self.mutate_and_save(|state| {
            for player in state.players.iter_mut().filter(|p| p.is_selected) {
                player.reset(true);
            }
            state.can_reroll = false;
        })
    }

    /// Deselect and reset every participant.
    pub fn remove_all_participants(&mut self) -> Result<Vec<SessionChange>, ShuffleError> {
        self.mutate_and_save(|state| {
            for player in state.players.iter_mut().filter(|p| p.is_selected) {
                player.reset(false);
            }
            state.can_reroll = false;
        })
    }

    /// Replace the game settings.
    ///
    /// Auto statuses that the new settings disable are cleared from participants.
    pub fn update_settings(
        &mut self,
        settings: GameSettings,
    ) -> Result<Vec<SessionChange>, ShuffleError> {
        settings.validate()?;

        self.mutate_and_save(|state| {
            state.settings = settings;
            state.clear_disabled_auto_statuses();
            state.can_reroll = false;
        })
    }

    /// Toggle a player between ManualIn and None.
    pub fn toggle_manual_in(&mut self, id: Uuid) -> Result<Vec<SessionChange>, ShuffleError> {
        self.toggle_manual(id, PlayerStatus::ManualIn)
    }

    /// Toggle a player between ManualOut and None.
    pub fn toggle_manual_out(&mut self, id: Uuid) -> Result<Vec<SessionChange>, ShuffleError> {
        self.toggle_manual(id, PlayerStatus::ManualOut)
    }

    /// Run a rotation over the participants.
    ///
    /// On failure nothing changes, including the reroll flag.
    pub fn generate(&mut self) -> Result<RotationResult, ShuffleError> {
        let mut players = self.state.players.clone();
        let result = self.engine.generate(&mut players, &self.state.settings)?;
        self.apply_rotation(players, result)
    }

    /// Undo the last rotation and rotate again from the same starting point.
    ///
    /// Fails with `RerollUnavailable` unless the previous call was a
    /// successful `generate` or `reroll`.
    pub fn reroll(&mut self) -> Result<RotationResult, ShuffleError> {
        if !self.state.can_reroll {
            return Err(ShuffleError::RerollUnavailable);
        }

        let mut players = self.state.players.clone();
        let result = self.engine.reroll(&mut players, &self.state.settings)?;
        self.apply_rotation(players, result)
    }

    fn toggle_manual(
        &mut self,
        id: Uuid,
        designation: PlayerStatus,
    ) -> Result<Vec<SessionChange>, ShuffleError> {
        self.require_player(id)?;

        if !self.state.manual_assignment_available() {
            tracing::info!("Manual assignment refused: every participant must play");
            let notice = SessionChange::NoticeRaised(Notice::ManualAssignmentUnavailable);
            let _ = self.state_tx.send(notice.clone());
            return Ok(vec![notice]);
        }

        self.mutate_and_save(|state| {
            if let Some(player) = state.player_mut(id) {
                player.status = if player.status == designation {
                    PlayerStatus::None
                } else {
                    designation
                };
            }
            state.can_reroll = false;
        })
    }

    /// Save the rotated roster, then commit it. A failed save commits nothing.
    fn apply_rotation(
        &mut self,
        players: Vec<Player>,
        result: RotationResult,
    ) -> Result<RotationResult, ShuffleError> {
        self.store
            .save(&players, &self.state.settings)
            .inspect_err(|e| tracing::error!("Failed to save rotation: {}", e))?;

        let mut changes = self.update(|state| {
            state.players = players;
            state.can_reroll = true;
            state.last_rotation = Some(result.clone());
        });

        for notice in &result.notices {
            let event = SessionChange::NoticeRaised(notice.clone());
            let _ = self.state_tx.send(event.clone());
            changes.push(event);
        }

        tracing::debug!("Rotation applied with {} change events", changes.len());
        Ok(result)
    }

    fn require_player(&self, id: Uuid) -> Result<(), ShuffleError> {
        self.state
            .player(id)
            .map(|_| ())
            .ok_or(ShuffleError::PlayerNotFound(id))
    }

    fn mutate_and_save<F>(&mut self, update_fn: F) -> Result<Vec<SessionChange>, ShuffleError>
    where
        F: FnOnce(&mut SessionState),
    {
        let changes = self.update(update_fn);
        self.persist()?;
        Ok(changes)
    }

    fn persist(&mut self) -> Result<(), ShuffleError> {
        self.store
            .save(&self.state.players, &self.state.settings)
            .inspect_err(|e| tracing::error!("Failed to save roster: {}", e))
    }

    /// Apply `update_fn`, then diff and broadcast the changes.
    fn update<F>(&mut self, update_fn: F) -> Vec<SessionChange>
    where
        F: FnOnce(&mut SessionState),
    {
        let old_state = self.state.clone();

        update_fn(&mut self.state);

        let changes = Self::detect_changes(&old_state, &self.state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    fn detect_changes(old: &SessionState, new: &SessionState) -> Vec<SessionChange> {
        let mut changes = Vec::new();

        if old.players != new.players {
            changes.push(SessionChange::RosterChanged {
                players: new.players.len(),
                participants: new.participant_count(),
            });
        }

        if old.settings != new.settings {
            changes.push(SessionChange::SettingsChanged {
                required_players: new.required_players(),
            });
        }

        if old.can_reroll != new.can_reroll {
            changes.push(SessionChange::RerollAvailabilityChanged {
                can_reroll: new.can_reroll,
            });
        }

        if old.last_rotation != new.last_rotation {
            if let Some(rotation) = &new.last_rotation {
                changes.push(SessionChange::RotationGenerated {
                    games: rotation.games.len(),
                    playing: rotation.playing_count(),
                    sitting: rotation.sitting_count(),
                });
            }
        }

        changes
    }
}
