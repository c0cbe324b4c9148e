use super::*;

#[test]
fn default_config_is_valid() {
    let cfg = PlaybackConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.lock_grace, Millis(100));
    assert_eq!(cfg.follow_padding.y1, 100.0);
}

#[test]
fn path_duration_derivation() {
    let cfg = PlaybackConfig::default();
    assert_eq!(cfg.path_duration_for(Millis(1000)), Millis(700));
    assert_eq!(cfg.path_duration_for(Millis(400)), Millis(200));
    assert_eq!(cfg.path_duration_for(Millis(100)), Millis(200));
    assert_eq!(cfg.path_duration_for(Millis(5000)), Millis(4700));
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = PlaybackConfig::from_json_str(r#"{ "lock_grace": 250, "max_fit_zoom": 10.0 }"#)
        .unwrap();
    assert_eq!(cfg.lock_grace, Millis(250));
    assert_eq!(cfg.max_fit_zoom, 10.0);
    assert_eq!(cfg.highlight_duration, Millis(4000));
}

#[test]
fn unknown_fields_and_bad_values_are_rejected() {
    assert!(matches!(
        PlaybackConfig::from_json_str(r#"{ "lock_grce": 1 }"#),
        Err(GeostoryError::Serde(_))
    ));
    assert!(matches!(
        PlaybackConfig::from_json_str(r#"{ "highlight_dim_factor": 2.0 }"#),
        Err(GeostoryError::Validation(_))
    ));
    assert!(matches!(
        PlaybackConfig::from_json_str(r#"{ "default_play_speed": 0 }"#),
        Err(GeostoryError::Validation(_))
    ));
}
