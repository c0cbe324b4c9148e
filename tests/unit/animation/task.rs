use super::*;

fn draw(start: u64, duration: u64) -> AnimationTask {
    AnimationTask {
        target: 3,
        kind: AnimationKind::Draw,
        started_at: Millis(start),
        duration: Millis(duration),
        ease: Ease::Linear,
    }
}

#[test]
fn progress_tracks_elapsed_time() {
    let t = draw(1_000, 400);
    assert_eq!(t.progress(Millis(900)), 0.0);
    assert_eq!(t.progress(Millis(1_200)), 0.5);
    assert_eq!(t.progress(Millis(5_000)), 1.0);
    assert!(!t.is_finished(Millis(1_399)));
    assert!(t.is_finished(Millis(1_400)));
}

#[test]
fn zero_duration_is_complete() {
    assert_eq!(draw(10, 0).progress(Millis(10)), 1.0);
}

#[test]
fn lock_is_busy_until_duration_plus_grace() {
    let mut lock = AnimationLock::new(Millis(100));
    assert!(!lock.is_busy(Millis(0)));

    let release = lock.acquire(draw(0, 700));
    assert_eq!(release, Millis(800));
    assert!(lock.is_busy(Millis(0)));
    assert!(lock.is_busy(Millis(799)));
    assert!(!lock.is_busy(Millis(800)));
}

#[test]
fn acquire_replaces_held_task() {
    let mut lock = AnimationLock::new(Millis(100));
    lock.acquire(draw(0, 700));
    let release = lock.acquire(draw(300, 700));
    assert_eq!(release, Millis(1_100));
    assert_eq!(lock.in_flight().map(|t| t.started_at), Some(Millis(300)));
    assert!(lock.release().is_some());
    assert!(!lock.is_busy(Millis(300)));
}
