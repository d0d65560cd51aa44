use approx::assert_relative_eq;
use line_chart::render::{Transition, TransitionTarget, ease_cubic_in_out, interpolate_string};

#[test]
fn path_data_interpolates_number_by_number() {
    assert_eq!(interpolate_string("M0,0L10,10", "M10,20L30,50", 0.5), "M5,10L20,30");
    assert_eq!(interpolate_string("M0,0L10,10", "M10,20L30,50", 0.0), "M0,0L10,10");
    assert_eq!(interpolate_string("M0,0", "M10,20L30,50", 1.0), "M10,20L30,50");
}

#[test]
fn numbers_without_a_counterpart_keep_their_target_value() {
    assert_eq!(interpolate_string("M0,0", "M10,20L30,50", 0.5), "M5,10L30,50");
    assert_eq!(interpolate_string("", "translate(4,8)", 0.25), "translate(4,8)");
}

#[test]
fn opacity_styles_settle_on_their_target() {
    let transition = Transition {
        key: "a".to_owned(),
        target: TransitionTarget::Style("stroke-opacity".to_owned()),
        from: "1e-6".to_owned(),
        to: "1".to_owned(),
        duration_ms: 250,
    };
    let start: f64 = transition.value_at(0.0).parse().expect("number");
    let middle: f64 = transition.value_at(0.5).parse().expect("number");
    assert_relative_eq!(start, 1e-6);
    assert_relative_eq!(middle, 0.5, epsilon = 1e-5);
    assert_eq!(transition.value_at(1.0), "1");
    assert!(!transition.is_noop());
}

#[test]
fn easing_is_symmetric_and_clamped() {
    assert_relative_eq!(ease_cubic_in_out(0.0), 0.0);
    assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
    assert_relative_eq!(ease_cubic_in_out(1.0), 1.0);
    assert_relative_eq!(ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75), 1.0);
    assert_relative_eq!(ease_cubic_in_out(-3.0), 0.0);
    assert_relative_eq!(ease_cubic_in_out(7.0), 1.0);
}
