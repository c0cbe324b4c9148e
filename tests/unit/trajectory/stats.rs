use super::*;
use crate::foundation::core::LngLat;
use crate::trajectory::model::Event;

fn at(mut e: Event, name: &str) -> Event {
    e.start = Some(LngLat::new(0.0, 0.0));
    e.start_location = Some(name.to_string());
    e
}

#[test]
fn counts_movements_places_and_span() {
    let t = Trajectory::new(vec![
        at(
            Event::new("1893-12-26", MovementType::Birth, "born"),
            "湖南省 湘潭市",
        ),
        at(
            Event::new("1911-03-01", MovementType::ShortMove, "school"),
            "湖南省 长沙市",
        ),
        at(
            Event::new("1918-08-15", MovementType::LongMove, "north"),
            "北京市",
        ),
        at(
            Event::new("1949-12-06", MovementType::InternationalMove, "abroad"),
            "俄罗斯 莫斯科",
        ),
        at(
            Event::new("1950-02-17", MovementType::InPlaceActivity, "talks"),
            "俄罗斯 莫斯科",
        ),
    ])
    .unwrap();

    let s = TrajectoryStats::compute(&t);
    assert_eq!(s.total_events, 5);
    assert_eq!(s.movement_count, 3);
    assert_eq!(s.international_count, 1);
    // 湖南省 (twice), 北京市, 俄罗斯 莫斯科
    assert_eq!(s.visited_places, 3);
    assert_eq!(s.time_span_years, Some(57));
}

#[test]
fn undated_events_have_no_span() {
    let t = Trajectory::new(vec![Event::new(
        "unknown",
        MovementType::Birth,
        "born",
    )])
    .unwrap();
    let s = TrajectoryStats::compute(&t);
    assert_eq!(s.time_span_years, None);
    assert_eq!(s.visited_places, 0);
}
