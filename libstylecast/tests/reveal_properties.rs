//! Behavioral properties of the typewriter reveal
//!
//! Driven through `RevealDriver` with a `ManualScheduler` so every tick is
//! explicit, plus one run on real (paused) tokio time.

use std::time::Duration;

use libstylecast::error::RevealError;
use libstylecast::reveal::{
    ManualScheduler, RevealController, RevealDriver, RevealStatus, RevealTick, TickOutcome,
    TokioScheduler,
};

fn driver() -> RevealDriver<ManualScheduler> {
    RevealDriver::new(
        RevealController::new(Duration::from_millis(30)),
        ManualScheduler::new(),
    )
}

/// Deliver the armed tick until the scheduler disarms, recording every
/// visible prefix length
fn drain(driver: &mut RevealDriver<ManualScheduler>) -> Vec<usize> {
    let mut lengths = Vec::new();
    while let Some(tick) = driver.scheduler().pending_tick() {
        driver.on_tick(tick);
        lengths.push(driver.snapshot().revealed_len);
    }
    lengths
}

#[test]
fn reveal_lengths_increase_by_one_until_full() {
    let mut driver = driver();
    let text = "Monotone reveal, ünïcödé included.";
    driver.start(text, true);

    let lengths = drain(&mut driver);
    let expected: Vec<usize> = (1..=text.chars().count()).collect();
    assert_eq!(lengths, expected);
}

#[test]
fn completed_reveal_equals_input() {
    for text in ["a", "Hello.", "multi\nline\ttext", "emoji 🚀 and 中文"] {
        let mut driver = driver();
        driver.start(text, true);
        drain(&mut driver);

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.status, RevealStatus::Completed);
        assert_eq!(snapshot.revealed_text, text);
        assert_eq!(snapshot.revealed_len, snapshot.total_len);
    }
}

#[test]
fn every_visible_text_is_a_prefix() {
    let mut driver = driver();
    let text = "prefix check";
    driver.start(text, true);

    while let Some(tick) = driver.scheduler().pending_tick() {
        driver.on_tick(tick);
        assert!(text.starts_with(&driver.snapshot().revealed_text));
    }
}

#[test]
fn retry_is_idempotent() {
    let mut driver = driver();
    driver.start("Hello.", true);
    drain(&mut driver);
    let first = driver.snapshot();

    for _ in 0..3 {
        driver.retry().unwrap();
        assert_eq!(driver.snapshot().revealed_len, 0);
        drain(&mut driver);

        let again = driver.snapshot();
        assert_eq!(again.status, RevealStatus::Completed);
        assert_eq!(again.revealed_len, 6);
        assert_eq!(again.revealed_text, "Hello.");
        assert_eq!(again.revealed_text, first.revealed_text);
    }
    assert_eq!(driver.controller().last_result(), "Hello.");
}

#[test]
fn restart_mid_reveal_shows_only_new_text() {
    let mut driver = driver();
    driver.start("AAAAAAAA", true);
    let stale = driver.scheduler().pending_tick().unwrap();
    driver.on_tick(stale);
    driver.on_tick(stale);

    driver.start("B", true);

    // A timer from the first session firing late changes nothing
    assert_eq!(driver.on_tick(stale), TickOutcome::Stale);
    assert_eq!(driver.snapshot().revealed_text, "");

    drain(&mut driver);
    let snapshot = driver.snapshot();
    assert_eq!(snapshot.revealed_text, "B");
    assert_eq!(snapshot.status, RevealStatus::Completed);
    assert!(!snapshot.revealed_text.contains('A'));
}

#[test]
fn no_animate_completes_without_ticks() {
    let mut driver = driver();
    let snapshot = driver.start("Instant output", false);

    assert_eq!(snapshot.status, RevealStatus::Completed);
    assert_eq!(snapshot.revealed_text, "Instant output");
    assert_eq!(driver.scheduler().arm_count(), 0);
    assert!(driver.scheduler().pending_tick().is_none());
}

#[test]
fn empty_text_completes_without_ticks() {
    let mut driver = driver();
    let snapshot = driver.start("", true);

    assert_eq!(snapshot.status, RevealStatus::Completed);
    assert_eq!(snapshot.revealed_text, "");
    assert_eq!(driver.scheduler().arm_count(), 0);
}

#[test]
fn retry_without_result_is_rejected_and_changes_nothing() {
    let mut driver = driver();
    let before = driver.snapshot();

    assert_eq!(driver.retry(), Err(RevealError::NothingToReplay));
    assert_eq!(driver.snapshot(), before);
    assert_eq!(driver.controller().last_result(), "");
    assert_eq!(driver.scheduler().arm_count(), 0);
}

#[test]
fn clear_resets_everything() {
    let mut driver = driver();
    driver.start("Some output", true);
    let tick = driver.scheduler().pending_tick().unwrap();
    driver.on_tick(tick);

    let snapshot = driver.clear();
    assert_eq!(snapshot.status, RevealStatus::Idle);
    assert_eq!(snapshot.revealed_len, 0);
    assert_eq!(snapshot.revealed_text, "");
    assert!(!snapshot.can_retry);

    assert_eq!(driver.retry(), Err(RevealError::NothingToReplay));
    assert_eq!(driver.on_tick(tick), TickOutcome::Stale);
}

#[test]
fn cancel_keeps_partial_text_and_allows_retry() {
    let mut driver = driver();
    driver.start("abcdef", true);
    let tick = driver.scheduler().pending_tick().unwrap();
    driver.on_tick(tick);
    driver.on_tick(tick);

    let snapshot = driver.cancel();
    assert_eq!(snapshot.status, RevealStatus::Cancelled);
    assert_eq!(snapshot.revealed_text, "ab");
    assert!(!driver.scheduler().is_armed());

    // Cancel is a no-op once nothing runs
    assert_eq!(driver.cancel(), snapshot);

    driver.retry().unwrap();
    drain(&mut driver);
    assert_eq!(driver.snapshot().revealed_text, "abcdef");
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_reveals_at_cadence() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<RevealTick>();
    let scheduler = TokioScheduler::with_channel(tokio::runtime::Handle::current(), tx);
    let mut driver = RevealDriver::new(RevealController::new(Duration::from_millis(30)), scheduler);

    let started = tokio::time::Instant::now();
    driver.start("Hello.", true);

    let mut frames = Vec::new();
    while let Some(tick) = rx.recv().await {
        match driver.on_tick(tick) {
            TickOutcome::Stale => continue,
            TickOutcome::Advanced => frames.push(driver.snapshot().revealed_text),
            TickOutcome::Completed => {
                frames.push(driver.snapshot().revealed_text);
                break;
            }
        }
    }

    assert_eq!(frames, vec!["H", "He", "Hel", "Hell", "Hello", "Hello."]);
    assert_eq!(started.elapsed(), Duration::from_millis(180));
    assert!(!driver.scheduler().is_armed());
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_restart_drops_old_session() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<RevealTick>();
    let scheduler = TokioScheduler::with_channel(tokio::runtime::Handle::current(), tx);
    let mut driver = RevealDriver::new(RevealController::new(Duration::from_millis(10)), scheduler);

    driver.start("first session text", true);
    let tick = rx.recv().await.unwrap();
    driver.on_tick(tick);

    driver.start("second", true);
    while let Some(tick) = rx.recv().await {
        if driver.on_tick(tick) == TickOutcome::Completed {
            break;
        }
    }
    assert_eq!(driver.snapshot().revealed_text, "second");
}
