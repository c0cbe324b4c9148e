use super::*;

const ALL: [Ease; 2] = [Ease::Linear, Ease::InOutQuart];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn in_out_quart_is_symmetric_around_midpoint() {
    let e = Ease::InOutQuart;
    assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((e.apply(0.2) + e.apply(0.8) - 1.0).abs() < 1e-12);
    assert!(e.apply(0.25) < 0.25);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InOutQuart.apply(-3.0), 0.0);
    assert_eq!(Ease::Linear.apply(7.0), 1.0);
}

#[test]
fn serde_names_are_kebab_case() {
    assert_eq!(
        serde_json::to_string(&Ease::InOutQuart).unwrap(),
        "\"in-out-quart\""
    );
}
