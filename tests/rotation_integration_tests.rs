//! Integration tests for RotationEngine
//!
//! These tests verify:
//! - The documented rotation scenarios (sitting counts, designation errors, limits)
//! - Partition invariants over random rosters and settings
//! - Streak direction after each round
//! - Failed rotations leave the roster untouched

use proptest::prelude::*;
use squad_shuffle::models::{GameSettings, Notice, Player, PlayerStatus, SITTING_LABEL};
use squad_shuffle::services::RotationEngine;
use squad_shuffle::ShuffleError;
use std::collections::HashSet;
use uuid::Uuid;

fn selected_roster(count: usize) -> Vec<Player> {
    (1..=count)
        .map(|i| {
            let mut player = Player::new(format!("Player {}", i));
            player.is_selected = true;
            player
        })
        .collect()
}

fn settings(num_games: u32, num_teams: u32, players_per_team: u32) -> GameSettings {
    GameSettings {
        num_games,
        num_teams,
        players_per_team,
        ..GameSettings::default()
    }
}

#[test]
fn test_required_players() {
    assert_eq!(RotationEngine::required_players(&settings(1, 2, 1)), 2);
    assert_eq!(RotationEngine::required_players(&settings(3, 2, 5)), 30);
}

#[test]
fn test_feasibility_is_repeatable() {
    let first = RotationEngine::validate_feasibility(3, 4);
    let second = RotationEngine::validate_feasibility(3, 4);
    assert!(matches!(first, Err(ShuffleError::NotEnoughParticipants { .. })));
    assert!(matches!(second, Err(ShuffleError::NotEnoughParticipants { .. })));

    assert_eq!(RotationEngine::validate_feasibility(6, 4).unwrap(), 2);
    assert_eq!(RotationEngine::validate_feasibility(6, 4).unwrap(), 2);
}

#[test]
fn test_five_players_one_game_two_teams_of_two() {
    let mut roster = selected_roster(5);
    let mut engine = RotationEngine::with_seed(2024);

    let result = engine.generate(&mut roster, &settings(1, 2, 2)).unwrap();

    assert_eq!(result.games.len(), 1);
    let teams = result.teams("Game 1").expect("Game 1 should exist");
    assert_eq!(teams.len(), 2);
    for team in teams {
        assert_eq!(team.len(), 2);
    }
    assert_eq!(result.sitting_count(), 1);
    assert!(result.notices.is_empty());
    assert!(result.teams(SITTING_LABEL).is_none());
    assert_eq!(result.section_labels(), vec!["Game 1", SITTING_LABEL]);
    assert_eq!(result.section_players(SITTING_LABEL).map(|p| p.len()), Some(1));
    assert_eq!(result.section_players("Game 1").map(|p| p.len()), Some(4));
}

#[test]
fn test_exact_roster_has_no_sitting_list() {
    let mut roster = selected_roster(4);
    let mut engine = RotationEngine::with_seed(1);

    let result = engine.generate(&mut roster, &settings(1, 2, 2)).unwrap();

    assert!(result.sitting.is_none());
    assert_eq!(result.section_labels(), vec!["Game 1"]);
    assert!(result.section_players(SITTING_LABEL).is_none());
    assert!(roster.iter().all(|p| p.streak == 1));
}

#[test]
fn test_all_manual_out_is_too_many_sitting() {
    let mut roster = selected_roster(3);
    roster.iter_mut().for_each(|p| p.status = PlayerStatus::ManualOut);

    let order = (0..roster.len()).collect();
    let err = RotationEngine::select_sitters(&roster, order, 2).unwrap_err();

    assert!(matches!(err, ShuffleError::TooManySitting { .. }));
}

#[test]
fn test_all_manual_in_is_too_many_playing() {
    let mut roster = selected_roster(4);
    roster.iter_mut().for_each(|p| p.status = PlayerStatus::ManualIn);

    let order = (0..roster.len()).collect();
    let err = RotationEngine::select_sitters(&roster, order, 2).unwrap_err();

    assert!(matches!(err, ShuffleError::TooManyPlaying { .. }));
}

#[test]
fn test_not_enough_participants() {
    let mut roster = selected_roster(1);
    let mut engine = RotationEngine::with_seed(1);

    let err = engine.generate(&mut roster, &settings(1, 2, 2)).unwrap_err();

    assert!(matches!(
        err,
        ShuffleError::NotEnoughParticipants {
            selected: 1,
            required: 4
        }
    ));
    assert_eq!(roster[0].streak, 0);
}

#[test]
fn test_play_limit_sets_auto_out() {
    let mut config = settings(1, 2, 1);
    config.set_use_auto_out(true);
    config.play_limit = 3;

    let mut roster = selected_roster(2);
    roster[0].streak = 2;
    let mut engine = RotationEngine::with_seed(8);

    engine.generate(&mut roster, &config).unwrap();

    assert_eq!(roster[0].streak, 3);
    assert_eq!(roster[0].status, PlayerStatus::AutoOut);
}

#[test]
fn test_sit_limit_sets_auto_in() {
    let mut config = settings(1, 2, 1);
    config.set_use_auto_in(true);
    config.sit_limit = 2;

    let mut roster = selected_roster(3);
    roster[0].streak = -1;
    roster[0].status = PlayerStatus::ManualOut;
    let mut engine = RotationEngine::with_seed(8);

    let result = engine.generate(&mut roster, &config).unwrap();

    assert_eq!(result.sitting_players()[0].id, roster[0].id);
    assert_eq!(roster[0].streak, -2);
    assert_eq!(roster[0].status, PlayerStatus::AutoIn);
}

#[test]
fn test_auto_in_player_plays_next_round() {
    let mut config = settings(1, 2, 1);
    config.set_use_auto_in(true);
    config.sit_limit = 1;

    let mut roster = selected_roster(3);
    roster[1].status = PlayerStatus::AutoIn;
    roster[1].streak = -1;
    let mut engine = RotationEngine::with_seed(99);

    engine.generate(&mut roster, &config).unwrap();

    assert_eq!(roster[1].streak, 1);
    assert_eq!(roster[1].status, PlayerStatus::None);
}

#[test]
fn test_excess_auto_out_raises_notice() {
    let mut config = settings(1, 2, 1);
    config.set_use_auto_out(true);

    let mut roster = selected_roster(3);
    for player in &mut roster {
        player.status = PlayerStatus::AutoOut;
        player.streak = 3;
    }
    let mut engine = RotationEngine::with_seed(4);

    let result = engine.generate(&mut roster, &config).unwrap();

    assert_eq!(result.sitting_count(), 1);
    assert_eq!(
        result.notices,
        vec![Notice::PlayLimitOverflow { kept_playing: 2 }]
    );
}

#[test]
fn test_excess_auto_in_raises_notice() {
    let mut config = settings(1, 2, 1);
    config.set_use_auto_in(true);

    let mut roster = selected_roster(4);
    for player in &mut roster {
        player.status = PlayerStatus::AutoIn;
    }
    let mut engine = RotationEngine::with_seed(4);

    let result = engine.generate(&mut roster, &config).unwrap();

    assert_eq!(result.sitting_count(), 2);
    assert_eq!(
        result.notices,
        vec![Notice::SitLimitOverflow { forced_to_sit: 2 }]
    );
}

#[test]
fn test_reroll_starts_from_previous_snapshot() {
    let mut roster = selected_roster(6);
    for (i, player) in roster.iter_mut().enumerate() {
        player.streak = i as i32 - 2;
    }
    let starting_streaks: Vec<i32> = roster.iter().map(|p| p.streak).collect();
    let config = settings(1, 2, 2);
    let mut engine = RotationEngine::with_seed(31);

    engine.generate(&mut roster, &config).unwrap();
    engine.reroll(&mut roster, &config).unwrap();

    let previous: Vec<i32> = roster.iter().map(|p| p.previous_streak).collect();
    assert_eq!(previous, starting_streaks);
}

#[test]
fn test_labels_cover_every_game() {
    let mut roster = selected_roster(13);
    let mut engine = RotationEngine::with_seed(6);

    let result = engine.generate(&mut roster, &settings(3, 2, 2)).unwrap();

    assert_eq!(
        result.game_labels_sorted(),
        vec!["Game 1", "Game 2", "Game 3"]
    );
    assert_eq!(result.sitting_count(), 1);
}

fn status_strategy() -> impl Strategy<Value = PlayerStatus> {
    prop_oneof![
        4 => Just(PlayerStatus::None),
        1 => Just(PlayerStatus::ManualIn),
        1 => Just(PlayerStatus::ManualOut),
        1 => Just(PlayerStatus::AutoIn),
        1 => Just(PlayerStatus::AutoOut),
    ]
}

fn case_strategy() -> impl Strategy<Value = (GameSettings, Vec<(PlayerStatus, i32, bool)>, u64)> {
    (1u32..=3, 2u32..=3, 1u32..=3).prop_flat_map(|(games, teams, per_team)| {
        let required = (games * teams * per_team) as usize;
        (
            Just(settings(games, teams, per_team)),
            prop::collection::vec(
                (status_strategy(), -4i32..=4, prop::bool::weighted(0.9)),
                required.saturating_sub(2)..=required + 6,
            ),
            any::<u64>(),
        )
    })
}

fn build_roster(entries: &[(PlayerStatus, i32, bool)]) -> Vec<Player> {
    entries
        .iter()
        .enumerate()
        .map(|(i, &(status, streak, selected))| {
            let mut player = Player::new(format!("P{}", i));
            player.status = status;
            player.streak = streak;
            player.is_selected = selected;
            player
        })
        .collect()
}

proptest! {
    /// Property: Every participant lands in exactly one place
    /// A successful rotation fills every team exactly and sits the rest.
    #[test]
    fn prop_rotation_partitions_participants((config, entries, seed) in case_strategy()) {
        let mut roster = build_roster(&entries);
        let before = roster.clone();
        let selected: HashSet<Uuid> = roster.iter().filter(|p| p.is_selected).map(|p| p.id).collect();
        let mut engine = RotationEngine::with_seed(seed);

        match engine.generate(&mut roster, &config) {
            Ok(result) => {
                let playing: Vec<Uuid> = result.playing_players().map(|p| p.id).collect();
                let sitting: Vec<Uuid> = result.sitting_players().iter().map(|p| p.id).collect();

                prop_assert_eq!(playing.len() + sitting.len(), selected.len());
                prop_assert_eq!(playing.len(), config.required_players());

                let placed: HashSet<Uuid> = playing.iter().chain(sitting.iter()).copied().collect();
                prop_assert_eq!(placed, selected);

                for teams in result.games.values() {
                    prop_assert_eq!(teams.len(), config.num_teams as usize);
                    for team in teams {
                        prop_assert_eq!(team.len(), config.players_per_team as usize);
                    }
                }
            }
            Err(err) => {
                prop_assert!(err.is_rotation_error());
                prop_assert_eq!(roster, before);
            }
        }
    }

    /// Property: Streak direction
    /// Players move toward positive, sitters toward negative, and unselected players are untouched.
    #[test]
    fn prop_streaks_follow_outcome((config, entries, seed) in case_strategy()) {
        let mut roster = build_roster(&entries);
        let before = roster.clone();
        let mut engine = RotationEngine::with_seed(seed);

        if let Ok(result) = engine.generate(&mut roster, &config) {
            let sitting: HashSet<Uuid> = result.sitting_players().iter().map(|p| p.id).collect();

            for (old, new) in before.iter().zip(&roster) {
                if !old.is_selected {
                    prop_assert_eq!(old, new);
                    continue;
                }
                if sitting.contains(&new.id) {
                    prop_assert_eq!(new.streak, if old.streak > 0 { -1 } else { old.streak - 1 });
                    prop_assert_ne!(new.status, PlayerStatus::ManualOut);
                } else {
                    prop_assert_eq!(new.streak, if old.streak < 0 { 1 } else { old.streak + 1 });
                    prop_assert_ne!(new.status, PlayerStatus::ManualIn);
                }
                prop_assert_eq!(new.previous_streak, old.streak);
            }
        }
    }
}
