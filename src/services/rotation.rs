use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::error::ShuffleError;
use crate::models::{GameSettings, Notice, Player, PlayerStatus, RotationResult, game_label};

/// Where the engine is in a rotation. After a call returns it is either
/// `Complete` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPhase {
    #[default]
    Idle,
    Validating,
    Selecting,
    Updating,
    Distributing,
    Complete,
    Failed,
}

/// Partition of the participants into sitters and players.
///
/// Both lists hold indices into the roster slice the selection was made
/// from. `playing` keeps the shuffled order; teams are taken from its tail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SitterSelection {
    pub sitting: Vec<usize>,
    pub playing: Vec<usize>,
    pub notices: Vec<Notice>,
}

/// Decides who sits and who plays each round and splits the players into teams.
///
/// The engine does not own the roster: each call borrows the full player
/// list, looks only at selected players, and mutates them in place. A call
/// either updates every participant and returns a result, or fails without
/// touching anyone.
///
/// The only randomness is a single shuffle of the participants at the start
/// of each rotation. Use [`with_seed`](Self::with_seed) for reproducible runs.
#[derive(Debug, Clone)]
pub struct RotationEngine {
    rng: ChaCha8Rng,
    phase: RotationPhase,
}

impl RotationEngine {
    /// Create an engine seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            phase: RotationPhase::Idle,
        }
    }

    /// Create an engine whose shuffles are fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: RotationPhase::Idle,
        }
    }

    /// Phase reached by the most recent rotation.
    pub fn phase(&self) -> RotationPhase {
        self.phase
    }

    pub fn required_players(settings: &GameSettings) -> usize {
        settings.required_players()
    }

    /// Returns the number of participants who must sit.
    pub fn validate_feasibility(selected: usize, required: usize) -> Result<usize, ShuffleError> {
        selected
            .checked_sub(required)
            .ok_or(ShuffleError::NotEnoughParticipants { selected, required })
    }

    /// Choose exactly `num_sitting` sitters from `order`.
    ///
    /// Priority: ManualOut, then AutoOut while room remains, then a backward
    /// pass over the rest that skips ManualIn and AutoIn, then a second pass
    /// that only skips ManualIn. `order` is scanned from its end, so passing
    /// a shuffled order makes the undesignated picks random.
    pub fn select_sitters(
        roster: &[Player],
        order: Vec<usize>,
        num_sitting: usize,
    ) -> Result<SitterSelection, ShuffleError> {
        let mut available = order;
        let mut sitting = Vec::with_capacity(num_sitting);
        let mut notices = Vec::new();

        if let Some(notice) = sit_designated(roster, &mut available, &mut sitting, num_sitting)? {
            notices.push(notice);
        }
        if let Some(notice) = sit_remaining(roster, &mut available, &mut sitting, num_sitting)? {
            notices.push(notice);
        }

        debug!(
            "Selected {} sitting and {} playing participants",
            sitting.len(),
            available.len()
        );

        Ok(SitterSelection {
            sitting,
            playing: available,
            notices,
        })
    }

    /// Apply the round to every participant. Sitters are updated first.
    pub fn update_statuses_and_streaks(
        roster: &mut [Player],
        selection: &SitterSelection,
        settings: &GameSettings,
        now: DateTime<Utc>,
    ) {
        for &idx in &selection.sitting {
            roster[idx].record_sit(settings, now);
        }
        for &idx in &selection.playing {
            roster[idx].record_play(settings, now);
        }
    }

    /// Split the selected players into `num_games` games of `num_teams` teams.
    ///
    /// Each team takes `players_per_team` players off the tail of
    /// `selection.playing`. Fails with `PoolExhausted` rather than producing
    /// short teams.
    pub fn distribute_into_teams(
        roster: &[Player],
        selection: &SitterSelection,
        settings: &GameSettings,
    ) -> Result<RotationResult, ShuffleError> {
        let needed = settings.required_players();
        ensure_pool(needed, selection.playing.len())?;

        let mut pool = selection.playing.clone();
        let mut result = RotationResult::default();

        for game_index in 1..=settings.num_games as usize {
            let mut teams = Vec::with_capacity(settings.num_teams as usize);

            for _ in 0..settings.num_teams {
                let mut team = Vec::with_capacity(settings.players_per_team as usize);
                for _ in 0..settings.players_per_team {
                    if let Some(idx) = pool.pop() {
                        team.push(roster[idx].clone());
                    }
                }
                teams.push(team);
            }

            result.games.insert(game_label(game_index), teams);
        }

        if !selection.sitting.is_empty() {
            result.sitting = Some(
                selection
                    .sitting
                    .iter()
                    .map(|&idx| roster[idx].clone())
                    .collect(),
            );
        }

        Ok(result)
    }

    /// Run a full rotation over the selected players in `roster`.
    pub fn generate(
        &mut self,
        roster: &mut [Player],
        settings: &GameSettings,
    ) -> Result<RotationResult, ShuffleError> {
        let outcome = self.run(roster, settings);
        if let Err(err) = &outcome {
            self.phase = RotationPhase::Failed;
            warn!("Rotation failed: {}", err);
        }
        outcome
    }

    /// Undo the previous rotation for every participant, then rotate again.
    ///
    /// If the new rotation fails, the roster is left exactly as it was
    /// before the call.
    pub fn reroll(
        &mut self,
        roster: &mut [Player],
        settings: &GameSettings,
    ) -> Result<RotationResult, ShuffleError> {
        let snapshot = roster.to_vec();

        for player in roster.iter_mut().filter(|p| p.is_selected) {
            player.restore_previous();
        }

        self.generate(roster, settings).inspect_err(|_| {
            roster.clone_from_slice(&snapshot);
        })
    }

    fn run(
        &mut self,
        roster: &mut [Player],
        settings: &GameSettings,
    ) -> Result<RotationResult, ShuffleError> {
        self.phase = RotationPhase::Validating;
        settings.validate()?;
        let required = Self::required_players(settings);
        let mut order: Vec<usize> = roster
            .iter()
            .enumerate()
            .filter(|(_, player)| player.is_selected)
            .map(|(idx, _)| idx)
            .collect();
        let num_sitting = Self::validate_feasibility(order.len(), required)?;

        self.phase = RotationPhase::Selecting;
        order.shuffle(&mut self.rng);
        let selection = Self::select_sitters(roster, order, num_sitting)?;
        ensure_pool(required, selection.playing.len())?;

        self.phase = RotationPhase::Updating;
        Self::update_statuses_and_streaks(roster, &selection, settings, Utc::now());

        self.phase = RotationPhase::Distributing;
        let mut result = Self::distribute_into_teams(roster, &selection, settings)?;
        result.notices = selection.notices;

        self.phase = RotationPhase::Complete;
        info!(
            "Rotation complete: {} games, {} playing, {} sitting",
            settings.num_games,
            result.playing_count(),
            result.sitting_count()
        );
        Ok(result)
    }
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_pool(needed: usize, available: usize) -> Result<(), ShuffleError> {
    if available < needed {
        return Err(ShuffleError::PoolExhausted { needed, available });
    }
    Ok(())
}

/// Sit ManualOut players, then AutoOut players while room remains.
fn sit_designated(
    roster: &[Player],
    available: &mut Vec<usize>,
    sitting: &mut Vec<usize>,
    num_sitting: usize,
) -> Result<Option<Notice>, ShuffleError> {
    let designated = available
        .iter()
        .filter(|&&idx| roster[idx].status == PlayerStatus::ManualOut)
        .count();

    let mut i = available.len();
    while i > 0 {
        i -= 1;
        if roster[available[i]].status != PlayerStatus::ManualOut {
            continue;
        }
        if sitting.len() >= num_sitting {
            return Err(ShuffleError::TooManySitting {
                designated,
                capacity: num_sitting,
            });
        }
        sitting.push(available.remove(i));
    }

    let mut kept_playing = 0;
    let mut i = available.len();
    while i > 0 {
        i -= 1;
        if roster[available[i]].status != PlayerStatus::AutoOut {
            continue;
        }
        if sitting.len() < num_sitting {
            sitting.push(available.remove(i));
        } else {
            kept_playing += 1;
        }
    }

    if kept_playing > 0 {
        warn!("{} players over the play limit will play this round", kept_playing);
        return Ok(Some(Notice::PlayLimitOverflow { kept_playing }));
    }
    Ok(None)
}

/// Fill the rest of the sit quota walking backward through `available`.
///
/// ManualIn players never sit. AutoIn players are skipped on the first pass
/// and become eligible on a second pass if the quota is still unmet.
fn sit_remaining(
    roster: &[Player],
    available: &mut Vec<usize>,
    sitting: &mut Vec<usize>,
    num_sitting: usize,
) -> Result<Option<Notice>, ShuffleError> {
    let mut sit_auto_in = false;
    let mut forced_to_sit = 0;

    loop {
        let mut i = available.len();
        while sitting.len() < num_sitting && i > 0 {
            i -= 1;
            match roster[available[i]].status {
                PlayerStatus::ManualIn => {}
                PlayerStatus::AutoIn if !sit_auto_in => {}
                status => {
                    if status == PlayerStatus::AutoIn {
                        forced_to_sit += 1;
                    }
                    sitting.push(available.remove(i));
                }
            }
        }

        if sitting.len() >= num_sitting {
            break;
        }
        if sit_auto_in {
            return Err(ShuffleError::TooManyPlaying {
                needed: num_sitting,
                sat: sitting.len(),
            });
        }
        debug!("Sit quota unmet after first pass, allowing AutoIn players to sit");
        sit_auto_in = true;
    }

    if sit_auto_in {
        warn!("{} players over the sit limit will sit this round", forced_to_sit);
        return Ok(Some(Notice::SitLimitOverflow { forced_to_sit }));
    }
    Ok(None)
}
