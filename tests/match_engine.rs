use hand_cricket::cricket::{
    BallOutcome, EngineError, MatchEnding, MatchEngine, MatchOutcome, Phase, SeededRandom,
    SequenceRandom, Side,
};
use hand_cricket::store::{MemoryStore, Persistence, Scorebook};
use proptest::prelude::*;

fn engine(draws: &[u8]) -> MatchEngine<SequenceRandom, Scorebook<MemoryStore>> {
    MatchEngine::new(SequenceRandom::new(draws.to_vec()), Scorebook::new(MemoryStore::new()))
}

#[test]
fn test_user_bats_then_is_bowled_out() {
    let mut engine = engine(&[1, 2, 3, 4]);
    engine.select_role(true);

    for _ in 0..3 {
        engine.resolve_ball(4).unwrap();
    }
    let outcome = engine.resolve_ball(4).unwrap();

    assert_eq!(
        outcome,
        BallOutcome::Out {
            side: Side::User,
            score_at_out: 12,
            target: 13
        }
    );
    let state = engine.state();
    assert_eq!(state.innings, 2);
    assert_eq!(state.target, Some(13));
    assert_eq!(state.balls_bowled, 0);
    assert_eq!(state.batting_side(), Side::Computer);
}

#[test]
fn test_chase_ends_without_dismissal() {
    // Computer scores 5+5 then is out, user chases 11 with 6+5.
    let mut engine = engine(&[5, 5, 3, 1, 1]);
    engine.select_role(false);

    engine.resolve_ball(1).unwrap();
    engine.resolve_ball(1).unwrap();
    let out = engine.resolve_ball(3).unwrap();
    assert!(matches!(out, BallOutcome::Out { target: 11, .. }));

    assert!(matches!(engine.resolve_ball(6).unwrap(), BallOutcome::Scored { runs: 6, .. }));
    let ended = engine.resolve_ball(5).unwrap();

    match ended {
        BallOutcome::MatchEnded { result, ending } => {
            assert_eq!(result.result, MatchOutcome::Win);
            assert_eq!(result.user_score, 11);
            assert_eq!(ending, MatchEnding::TargetReached { side: Side::User, runs: 5 });
        }
        other => panic!("expected match end, got {other:?}"),
    }
    assert_eq!(engine.state().phase, Phase::Result);
    assert_eq!(engine.best_score(), 11);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_level_scores_are_a_tie() {
    // User makes 3 and is out; computer makes 3 and is out.
    let mut engine = engine(&[1, 3, 3, 2]);
    engine.select_role(true);
    engine.resolve_ball(3).unwrap();
    assert!(engine.resolve_ball(3).unwrap().is_dismissal());
    engine.resolve_ball(1).unwrap();

    let ended = engine.resolve_ball(2).unwrap();
    assert!(ended.is_dismissal());
    let result = ended.match_result().copied().expect("match over");
    assert_eq!(result.result, MatchOutcome::Tie);
    assert_eq!((result.user_score, result.comp_score), (3, 3));
}

#[test]
fn test_finished_match_rejects_balls() {
    let mut engine = engine(&[1, 1]);
    engine.select_role(true);
    engine.resolve_ball(1).unwrap();
    engine.resolve_ball(1).unwrap();

    assert_eq!(engine.state().phase, Phase::Result);
    let err = engine.resolve_ball(2).unwrap_err();
    assert!(matches!(err, EngineError::IllegalState { .. }));
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_pending_ball_invalidated_by_new_match() {
    let mut engine = engine(&[2, 3]);
    engine.select_role(true);
    let stale = engine.begin_ball(5).unwrap();

    engine.select_role(false);
    let err = engine.complete_ball(stale).unwrap_err();
    assert!(matches!(err, EngineError::StaleTurn { .. }));
    assert_eq!(engine.state().balls_bowled, 0);
    assert!(!engine.is_resolving());
}

fn play_out(
    user_bats_first: bool,
    seed: u64,
    picks: &[u8],
) -> Result<(), TestCaseError> {
    let mut engine = MatchEngine::new(SeededRandom::new(seed), Scorebook::new(MemoryStore::new()));
    engine.select_role(user_bats_first);

    let mut target = None;
    let mut resets = 0;

    for &pick in picks {
        if engine.state().phase != Phase::InProgress {
            break;
        }
        let before = engine.state().clone();
        let batting = before.batting_side();
        let outcome = engine.resolve_ball(pick).unwrap();
        let after = engine.state();

        prop_assert!(after.user_score >= before.user_score);
        prop_assert!(after.comp_score >= before.comp_score);
        prop_assert!(after.innings >= before.innings);

        if after.last_user_choice == after.last_comp_choice {
            prop_assert_eq!(after.score(batting), before.score(batting));
        }
        if before.innings == 1 && after.innings == 2 {
            resets += 1;
            prop_assert_eq!(after.balls_bowled, 0);
            prop_assert_eq!(after.target, Some(before.score(batting) + 1));
        }
        if let Some(fixed) = target {
            prop_assert_eq!(after.target, Some(fixed));
        }
        target = after.target;

        if let Some(result) = outcome.match_result() {
            prop_assert_eq!(
                result.result,
                MatchOutcome::from_scores(after.user_score, after.comp_score)
            );
            prop_assert!(after.game_over);
        }
    }

    prop_assert!(resets <= 1);
    let recorded = engine.history().len();
    if engine.state().phase == Phase::Result {
        prop_assert_eq!(recorded, 1);
        prop_assert_eq!(engine.store().best_score(), engine.state().user_score);
    } else {
        prop_assert_eq!(recorded, 0);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_match_invariants(
        user_bats_first in any::<bool>(),
        seed in any::<u64>(),
        picks in prop::collection::vec(1u8..=6, 1..120),
    ) {
        play_out(user_bats_first, seed, &picks)?;
    }

    #[test]
    fn prop_out_of_range_never_changes_state(choice in 7u8..=255) {
        let mut engine = engine(&[3]);
        engine.select_role(true);
        let before = engine.state().clone();
        prop_assert_eq!(
            engine.resolve_ball(choice).unwrap_err(),
            EngineError::InvalidInput { choice }
        );
        prop_assert_eq!(engine.state(), &before);
    }
}
