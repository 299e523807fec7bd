//! Difficulty adapter tests

use tui_match3::core::{Budget, DifficultyAdapter, PerformanceSample};

fn sample(level: u32, moves_used: u32, score: u32, time_used: f64) -> PerformanceSample {
    PerformanceSample {
        level,
        moves_used,
        score,
        time_used,
    }
}

fn budget(move_limit: u32, time_limit_secs: u32) -> Budget {
    Budget {
        move_limit,
        time_limit_secs,
    }
}

fn assert_within_clamps(b: Budget) {
    assert!((10..=30).contains(&b.move_limit), "{b:?}");
    assert!((30..=120).contains(&b.time_limit_secs), "{b:?}");
}

#[test]
fn test_defaults_without_history() {
    let adapter = DifficultyAdapter::new();
    assert!(adapter.history().is_empty());
    assert_eq!(adapter.calculate_difficulty(), budget(20, 60));
}

#[test]
fn test_single_sample_keeps_defaults() {
    let mut adapter = DifficultyAdapter::new();
    adapter.record(sample(1, 5, 1000, 40.0));

    let b = adapter.calculate_difficulty();
    assert_eq!(b, budget(20, 60));
    assert_within_clamps(b);
}

#[test]
fn test_second_sample_trains_both_models() {
    let mut adapter = DifficultyAdapter::new();
    assert!(!adapter.record(sample(1, 5, 1000, 40.0)));
    assert!(adapter.record(sample(2, 14, 1100, 52.5)));
    assert!(adapter.is_trained());
    assert!(adapter.move_model().is_some());
    assert!(adapter.time_model().is_some());

    // Later samples retrain without reporting a first training.
    assert!(!adapter.record(sample(3, 9, 1050, 47.0)));
    assert_eq!(adapter.history().len(), 3);
    assert_within_clamps(adapter.calculate_difficulty());
}

#[test]
fn test_exact_linear_history_predicts_next_level() {
    // moves = score / 100 + level, time = score / 50 + 10 * level
    let mut adapter = DifficultyAdapter::new();
    adapter.record(sample(1, 11, 1000, 30.0));
    adapter.record(sample(2, 7, 500, 30.0));
    adapter.record(sample(3, 11, 800, 46.0));

    // Next level is predicted at (score 800, level 4): 12 moves, 56 s.
    assert_eq!(adapter.calculate_difficulty(), budget(13, 66));
}

#[test]
fn test_predictions_are_clamped() {
    let mut slow = DifficultyAdapter::new();
    slow.record(sample(1, 100, 0, 500.0));
    slow.record(sample(2, 200, 0, 600.0));
    assert_eq!(slow.calculate_difficulty(), budget(30, 120));

    let mut fast = DifficultyAdapter::new();
    fast.record(sample(1, 0, 0, 0.0));
    fast.record(sample(2, 0, 0, 0.0));
    assert_eq!(fast.calculate_difficulty(), budget(10, 30));
}
