use super::*;

fn domestic(province: &str, city: &str, district: Option<&str>) -> LocationInfo {
    LocationInfo {
        province: Some(province.to_string()),
        city: Some(city.to_string()),
        district: district.map(str::to_string),
        ..LocationInfo::default()
    }
}

#[test]
fn domestic_path_drops_repeated_district() {
    let info = domestic("湖南省", "长沙市", Some("长沙市"));
    assert_eq!(full_location_path(&info).as_deref(), Some("湖南省 长沙市"));

    let info = domestic("湖南省", "长沙市", Some("开福区"));
    assert_eq!(
        full_location_path(&info).as_deref(),
        Some("湖南省 长沙市 开福区")
    );
}

#[test]
fn foreign_path_uses_country_and_city() {
    let info = LocationInfo {
        country: Some("俄罗斯".to_string()),
        city: Some("莫斯科".to_string()),
        province: Some("ignored".to_string()),
        ..LocationInfo::default()
    };
    assert_eq!(full_location_path(&info).as_deref(), Some("俄罗斯 莫斯科"));

    let g = Gazetteer::builtin();
    assert_eq!(
        g.resolve(&info).coordinates,
        Some(LngLat::new(37.6176, 55.7558))
    );
}

#[test]
fn municipality_name_is_written_once_but_path_keeps_both() {
    let info = domestic("北京市", "北京市", None);
    assert_eq!(format_location_name(&info), "北京市");
    assert_eq!(full_location_path(&info).as_deref(), Some("北京市 北京市"));
}

#[test]
fn empty_location_has_no_path() {
    let info = LocationInfo::default();
    assert_eq!(full_location_path(&info), None);
    assert_eq!(format_location_name(&info), UNKNOWN_LOCATION);
}

#[test]
fn inline_coordinates_take_precedence() {
    let mut g = Gazetteer::builtin();
    g.insert("湖南省 长沙市", LngLat::new(112.9, 28.2));
    let mut info = domestic("湖南省", "长沙市", None);
    info.coordinates = Some(LngLat::new(1.0, 2.0));
    assert_eq!(g.resolve(&info).coordinates, Some(LngLat::new(1.0, 2.0)));
}

#[test]
fn regions_file_skips_malformed_entries_and_keeps_builtins() {
    let json = r#"{ "regions": [
        { "ext_path": "湖南省 长沙市", "coordinates": [112.9388, 28.2282] },
        { "ext_path": "broken", "coordinates": [1.0] },
        { "coordinates": [3.0, 4.0] }
    ] }"#;
    let g = Gazetteer::from_regions_json(json).unwrap();
    assert_eq!(g.get("湖南省 长沙市"), Some(LngLat::new(112.9388, 28.2282)));
    assert_eq!(g.get("broken"), None);
    assert!(g.get("俄罗斯 莫斯科").is_some());
    assert_eq!(g.len(), 2);
}

#[test]
fn unresolved_lookup_yields_none_with_name() {
    let g = Gazetteer::builtin();
    let r = g.resolve(&domestic("湖南省", "湘潭市", Some("韶山冲")));
    assert_eq!(r.coordinates, None);
    assert_eq!(r.name, "湖南省 湘潭市 韶山冲");
}
