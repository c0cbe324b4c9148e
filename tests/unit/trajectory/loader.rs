use super::*;
use crate::foundation::core::LngLat;
use crate::trajectory::model::MovementType;

fn gazetteer() -> Gazetteer {
    let mut g = Gazetteer::builtin();
    g.insert("湖南省 湘潭市", LngLat::new(112.94, 27.83));
    g.insert("湖南省 长沙市", LngLat::new(112.94, 28.23));
    g.insert("北京市 北京市", LngLat::new(116.41, 39.90));
    g
}

#[test]
fn resolves_start_end_and_transit() {
    let json = r#"{ "events": [
        { "date": "1893-12-26", "age": 0, "movementType": "出生", "event": "born",
          "coordinates": { "start": { "province": "湖南省", "city": "湘潭市" } } },
        { "date": "1911-01-01", "age": 17, "movementType": "长途移动", "event": "to Beijing",
          "coordinates": {
            "start": { "province": "湖南省", "city": "湘潭市" },
            "transit": [ { "province": "湖南省", "city": "长沙市" }, { "province": "无", "city": "无" } ],
            "end": { "province": "北京市", "city": "北京市" } } }
    ] }"#;

    let t = parse_trajectory(json, &gazetteer()).unwrap();
    assert_eq!(t.len(), 2);

    let birth = t.get(0).unwrap();
    assert_eq!(birth.movement_type, MovementType::Birth);
    assert_eq!(birth.end, Some(LngLat::new(112.94, 27.83)));
    assert_eq!(birth.end_location.as_deref(), Some("湖南省 湘潭市"));

    let mv = t.get(1).unwrap();
    assert_eq!(mv.end, Some(LngLat::new(116.41, 39.90)));
    assert_eq!(mv.end_location.as_deref(), Some("北京市"));
    assert_eq!(mv.transit, vec![LngLat::new(112.94, 28.23)]);
    assert_eq!(mv.transit_locations.len(), 1);
}

#[test]
fn unresolved_locations_degrade_to_none() {
    let json = r#"{ "events": [
        { "date": "1900", "movementType": "short-move", "event": "lost",
          "coordinates": { "start": { "province": "nowhere" }, "end": { "province": "nowhere either" } } }
    ] }"#;
    let t = parse_trajectory(json, &gazetteer()).unwrap();
    let e = t.get(0).unwrap();
    assert_eq!(e.start, None);
    assert_eq!(e.end, None);
    assert!(!e.has_segment());
}

#[test]
fn empty_and_malformed_inputs_are_errors() {
    let g = gazetteer();
    let empty = parse_trajectory(r#"{ "events": [] }"#, &g).unwrap_err();
    assert!(matches!(empty, GeostoryError::Data(_)));

    let malformed = parse_trajectory("{ not json", &g).unwrap_err();
    assert!(matches!(malformed, GeostoryError::Serde(_)));

    let missing = parse_trajectory(r#"{ "people": [] }"#, &g).unwrap_err();
    assert!(matches!(missing, GeostoryError::Serde(_)));
}

#[test]
fn missing_gazetteer_file_degrades_to_builtins() {
    let g = load_gazetteer(Some(Path::new("does/not/exist.json")));
    assert!(g.get("俄罗斯 莫斯科").is_some());
    assert_eq!(g.len(), 1);
}

#[test]
fn missing_events_file_is_a_data_error() {
    let err = load_trajectory(Path::new("does/not/exist.json"), &gazetteer()).unwrap_err();
    assert!(matches!(err, GeostoryError::Data(_)));
}
