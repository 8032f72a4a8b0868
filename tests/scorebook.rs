use std::fs;

use hand_cricket::cricket::{MatchEngine, MatchOutcome, SequenceRandom};
use hand_cricket::store::{keys, JsonFileStore, KeyValueStore, Persistence, Scorebook, HISTORY_LIMIT};

fn open(path: &std::path::Path) -> Scorebook<JsonFileStore> {
    Scorebook::new(JsonFileStore::open(path).unwrap())
}

#[test]
fn test_finished_match_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    // User scores 5, is out, computer is out first ball: win.
    let mut engine = MatchEngine::new(SequenceRandom::new(vec![1, 2, 2]), open(&path));
    engine.select_role(true);
    engine.resolve_ball(5).unwrap();
    engine.resolve_ball(2).unwrap();
    let ended = engine.resolve_ball(2).unwrap();
    assert_eq!(ended.match_result().unwrap().result, MatchOutcome::Win);
    drop(engine);

    let book = open(&path);
    assert_eq!(book.best_score(), 5);
    let history = book.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_score, 5);
    assert_eq!(history[0].comp_score, 0);
    assert!(history[0].user_bat_first);
}

#[test]
fn test_history_is_capped_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let mut engine = MatchEngine::new(SequenceRandom::new(vec![1]), open(&path));
    for _ in 0..HISTORY_LIMIT + 3 {
        engine.select_role(true);
        engine.resolve_ball(1).unwrap();
        engine.resolve_ball(1).unwrap();
    }
    drop(engine);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let history: Vec<serde_json::Value> =
        serde_json::from_str(raw[keys::HISTORY].as_str().unwrap()).unwrap();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0]["result"], "tie");
    assert!(history[0].get("userBatFirst").is_some());
}

#[test]
fn test_corrupt_store_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    fs::write(&path, "{ not json").unwrap();

    let mut book = open(&path);
    assert_eq!(book.best_score(), 0);
    assert!(book.history().is_empty());
    assert!(book.sound_enabled());

    book.set_sound_enabled(false).unwrap();
    assert!(!open(&path).sound_enabled());
}

#[test]
fn test_garbled_history_value_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set(keys::HISTORY, "[{\"broken\":".into()).unwrap();
    store.set(keys::BEST, "17".into()).unwrap();

    let book = open(&path);
    assert!(book.history().is_empty());
    assert_eq!(book.best_score(), 17);
}
