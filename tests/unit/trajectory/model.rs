use super::*;

#[test]
fn movement_type_accepts_both_vocabularies() {
    let a: MovementType = serde_json::from_str("\"long-move\"").unwrap();
    let b: MovementType = serde_json::from_str("\"长途移动\"").unwrap();
    assert_eq!(a, MovementType::LongMove);
    assert_eq!(b, MovementType::LongMove);
    let c: MovementType = serde_json::from_str("\"原地活动\"").unwrap();
    assert_eq!(c, MovementType::InPlaceActivity);
    assert!(c.is_stationary());
    assert!(!a.is_stationary());
}

#[test]
fn raw_event_reads_data_file_field_names() {
    let json = r#"{
        "date": "1893-12-26",
        "age": 0,
        "movementType": "出生",
        "event": "born",
        "coordinates": { "start": { "province": "湖南省", "city": "湘潭市" } }
    }"#;
    let ev: RawEvent = serde_json::from_str(json).unwrap();
    assert_eq!(ev.movement_type, MovementType::Birth);
    assert_eq!(ev.description, "born");
    assert_eq!(ev.age, Some(0));
    assert!(ev.coordinates.end.is_none());
    assert!(ev.coordinates.transit.is_empty());
}

#[test]
fn trajectory_rejects_empty() {
    assert!(Trajectory::new(Vec::new()).is_err());
}

#[test]
fn trajectory_reindexes_and_defaults_end_to_start() {
    let t = Trajectory::new(vec![
        Event::new("1900", MovementType::Birth, "a").starting_at(LngLat::new(1.0, 2.0)),
        Event::new("1901", MovementType::ShortMove, "b")
            .starting_at(LngLat::new(1.0, 2.0))
            .ending_at(LngLat::new(3.0, 4.0)),
    ])
    .unwrap();

    assert_eq!(t.len(), 2);
    assert_eq!(t.last_index(), 1);
    assert_eq!(t.get(1).unwrap().index, 1);
    assert_eq!(t.get(0).unwrap().end, Some(LngLat::new(1.0, 2.0)));
    assert_eq!(t.up_to(99).len(), 2);
    assert_eq!(t.up_to(0).len(), 1);
}

#[test]
fn segment_requires_both_ends_and_movement() {
    let a = LngLat::new(10.0, 10.0);
    let b = LngLat::new(20.0, 20.0);
    let mid = LngLat::new(15.0, 12.0);

    let mv = Event::new("x", MovementType::LongMove, "m")
        .starting_at(a)
        .via(mid)
        .ending_at(b);
    assert_eq!(mv.segment_points(), Some(vec![a, mid, b]));

    let act = Event::new("x", MovementType::InPlaceActivity, "m")
        .starting_at(b)
        .ending_at(b);
    assert!(!act.has_segment());

    let birth = Event::new("x", MovementType::Birth, "m")
        .starting_at(a)
        .ending_at(a);
    assert!(!birth.has_segment());

    let half = Event::new("x", MovementType::ShortMove, "m").ending_at(b);
    assert!(half.segment_points().is_none());
}
