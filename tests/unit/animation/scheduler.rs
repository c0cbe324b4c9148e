use super::*;

#[test]
fn pops_in_deadline_then_schedule_order() {
    let mut s = Scheduler::new();
    s.schedule(Millis(300), "c");
    s.schedule(Millis(100), "a");
    s.schedule(Millis(100), "b");

    assert_eq!(s.next_deadline(), Some(Millis(100)));
    let order: Vec<&str> = std::iter::from_fn(|| s.pop_due(Millis(1_000)).map(|(_, _, p)| p))
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert!(s.is_empty());
}

#[test]
fn nothing_fires_before_deadline() {
    let mut s = Scheduler::new();
    s.schedule(Millis(500), ());
    assert!(s.pop_due(Millis(499)).is_none());
    assert!(s.pop_due(Millis(500)).is_some());
}

#[test]
fn cancel_removes_pending_timer_once() {
    let mut s = Scheduler::new();
    let id = s.schedule(Millis(10), 1u32);
    s.schedule(Millis(20), 2u32);
    assert!(s.is_pending(id));
    assert_eq!(s.cancel(id), Some(1));
    assert_eq!(s.cancel(id), None);
    assert!(!s.is_pending(id));
    assert_eq!(s.len(), 1);
}

#[test]
fn cancel_where_filters_by_payload() {
    let mut s = Scheduler::new();
    for v in 0..6u32 {
        s.schedule(Millis(u64::from(v)), v);
    }
    assert_eq!(s.cancel_where(|v| v % 2 == 0), vec![0, 2, 4]);
    let left: Vec<u32> = std::iter::from_fn(|| s.pop_due(Millis(100)).map(|(_, _, p)| p)).collect();
    assert_eq!(left, vec![1, 3, 5]);
}
