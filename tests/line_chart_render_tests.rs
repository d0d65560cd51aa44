use line_chart::api::LineChart;
use line_chart::core::{MarginUpdate, Point, Series};
use line_chart::render::{Element, NullRenderer, Renderer, TransitionTarget, to_svg_string};
use serde_json::json;

fn series(key: &str, values: &[(f64, f64)]) -> Series<Point> {
    Series::new(key, values.iter().copied().map(Point::from).collect())
}

fn line_path<'a>(root: &'a Element, key: &str) -> Option<&'a str> {
    root.select_all("g", "nv-group")
        .into_iter()
        .find(|group| {
            group.data_key() == Some(key) && group.select_child("path", "nv-line").is_some()
        })
        .and_then(|group| group.select_child("path", "nv-line"))
        .and_then(|path| path.attr("d"))
}

fn line_wrap(root: &Element) -> &Element {
    root.select_child("g", "nvd3 nv-wrap nv-line").expect("line wrap")
}

#[test]
fn gap_in_the_middle_splits_the_line() {
    let mut chart = LineChart::<Point>::new();
    let mut svg = Element::svg(960.0, 500.0);
    let data = vec![Series::new(
        "a",
        vec![Point::new(0.0, 0.0), Point::missing(1.0), Point::new(2.0, 2.0)],
    )];

    chart.render(&mut svg, &data).expect("render");

    assert_eq!(line_path(&svg, "a"), Some("M0,500ZM960,0Z"));
    assert_eq!(svg.select_all("circle", "nv-point").len(), 2);
}

#[test]
fn second_identical_render_changes_nothing() {
    let mut chart = LineChart::<Point>::new();
    chart.set_clip_edge(true);
    chart.set_margin(MarginUpdate::default().top(10.0).left(40.0));
    let mut svg = Element::svg(960.0, 500.0);
    let data = vec![
        series("a", &[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]),
        series("b", &[(0.0, 2.0), (1.0, 1.0), (2.0, 4.0)]),
    ];

    chart.render(&mut svg, &data).expect("first render");
    let first = to_svg_string(&svg);
    let report = chart.render(&mut svg, &data).expect("second render");
    let second = to_svg_string(&svg);

    assert_eq!(first, second);
    assert!(report.entered.is_empty());
    assert_eq!(report.updated, vec!["a".to_owned(), "b".to_owned()]);
    assert!(report.transitions.iter().all(|t| t.is_noop()));
    assert_eq!(svg.select_all("g", "nvd3 nv-wrap nv-line").len(), 1);
    assert_eq!(svg.select_all("path", "nv-line").len(), 2);
}

#[test]
fn removed_and_added_keys_change_exactly_those_groups() {
    let mut chart = LineChart::<Point>::new();
    let mut svg = Element::svg(960.0, 500.0);
    let mut renderer = NullRenderer::default();

    chart
        .render(
            &mut svg,
            &[series("a", &[(0.0, 0.0), (1.0, 1.0)]), series("b", &[(0.0, 1.0), (1.0, 0.0)])],
        )
        .expect("render");
    renderer.render(&svg).expect("valid scene");
    assert_eq!(renderer.last_group_count, 2);

    let report = chart
        .render(
            &mut svg,
            &[series("b", &[(0.0, 1.0), (1.0, 0.0)]), series("c", &[(0.0, 0.5), (1.0, 0.5)])],
        )
        .expect("render");
    renderer.render(&svg).expect("valid scene");

    assert_eq!(report.removed, vec!["a".to_owned()]);
    assert_eq!(report.entered, vec!["c".to_owned()]);
    assert_eq!(renderer.last_group_count, 2);
    assert_eq!(renderer.last_line_count, 2);
    assert!(line_path(&svg, "a").is_none());
    assert!(line_path(&svg, "b").is_some());
    assert!(line_path(&svg, "c").is_some());
}

#[test]
fn out_of_domain_log_values_are_drawn_at_zero() {
    let mut chart = LineChart::<Point>::new();
    chart.set_use_log_scale(true);
    chart.set_option("yDomain", json!([1.0, 100.0])).expect("yDomain");
    let mut svg = Element::svg(960.0, 500.0);

    chart
        .render(
            &mut svg,
            &[series("a", &[(0.0, 1.0), (1.0, -5.0), (2.0, 100.0)])],
        )
        .expect("render");

    let d = line_path(&svg, "a").expect("path");
    assert_eq!(d, "M0,500L480,0L960,0");
    assert!(!d.contains("NaN") && !d.contains("inf"));
    NullRenderer::default().render(&svg).expect("scene has only finite numbers");
}

#[test]
fn clip_edge_sets_and_clears_both_references() {
    let mut chart = LineChart::<Point>::new();
    chart.set_clip_edge(true);
    let mut svg = Element::svg(960.0, 500.0);
    let data = [series("a", &[(0.0, 0.0), (1.0, 1.0)])];
    chart.render(&mut svg, &data).expect("render");

    let clip_id = format!("nv-edge-clip-{}", chart.scatter().id());
    let expected = format!("url(#{clip_id})");
    let inner = line_wrap(&svg).select_child("g", "").expect("inner group");
    let scatter_wrap = inner.select_child("g", "nv-scatterWrap").expect("scatter wrap");
    assert_eq!(inner.attr("clip-path"), Some(expected.as_str()));
    assert_eq!(scatter_wrap.attr("clip-path"), Some(expected.as_str()));
    assert_eq!(
        svg.find_by_id(&clip_id).map(Element::tag),
        Some("clipPath")
    );

    chart.set_clip_edge(false);
    chart.render(&mut svg, &data).expect("render");
    let inner = line_wrap(&svg).select_child("g", "").expect("inner group");
    assert_eq!(inner.attr("clip-path"), None);
    assert_eq!(
        inner
            .select_child("g", "nv-scatterWrap")
            .and_then(|wrap| wrap.attr("clip-path")),
        None
    );
}

#[test]
fn margins_translate_the_wrap_and_size_the_clip_rect() {
    let mut chart = LineChart::<Point>::new();
    chart.set_margin(
        MarginUpdate::default()
            .top(10.0)
            .right(30.0)
            .bottom(40.0)
            .left(20.0),
    );
    let mut svg = Element::svg(960.0, 500.0);
    chart
        .render(&mut svg, &[series("a", &[(0.0, 0.0), (1.0, 1.0)])])
        .expect("render");

    let wrap = line_wrap(&svg);
    assert_eq!(wrap.attr("transform"), Some("translate(20,10)"));
    let clip_id = format!("nv-edge-clip-{}", chart.scatter().id());
    let rect = svg
        .find_by_id(&clip_id)
        .and_then(|clip| clip.select_child("rect", ""))
        .expect("clip rect");
    assert_eq!(rect.attr("width"), Some("910"));
    assert_eq!(rect.attr("height"), Some("450"));
    assert_eq!(line_path(&svg, "a"), Some("M0,450L910,0"));
}

#[test]
fn margins_larger_than_the_chart_clamp_the_clip_rect() {
    let mut chart = LineChart::<Point>::new();
    chart.set_height(30.0);
    chart.set_margin(MarginUpdate::default().top(20.0).bottom(20.0));
    let mut svg = Element::svg(960.0, 30.0);
    chart
        .render(&mut svg, &[series("a", &[(0.0, 0.0), (1.0, 1.0)])])
        .expect("negative plot height still renders");

    let clip_id = format!("nv-edge-clip-{}", chart.scatter().id());
    let rect = svg
        .find_by_id(&clip_id)
        .and_then(|clip| clip.select_child("rect", ""))
        .expect("clip rect");
    assert_eq!(rect.attr("height"), Some("0"));
}

#[test]
fn group_classes_colors_and_opacity_follow_the_series() {
    let mut chart = LineChart::<Point>::new();
    let mut svg = Element::svg(960.0, 500.0);
    let data = vec![
        series("a", &[(0.0, 0.0), (1.0, 1.0)])
            .with_classed("dashed")
            .with_hover(true)
            .with_stroke_width(3.0),
        series("b", &[(0.0, 1.0), (1.0, 0.0)]).with_disabled(true),
        series("c", &[(0.0, 0.5), (1.0, 0.5)]).with_fill_opacity(0.0),
    ];
    chart.render(&mut svg, &data).expect("render");

    let groups: Vec<&Element> = line_wrap(&svg)
        .select_all("g", "nv-group")
        .into_iter()
        .filter(|g| g.select_child("path", "nv-line").is_some())
        .collect();
    assert_eq!(groups.len(), 2);

    let a = groups[0];
    assert_eq!(
        a.classes().collect::<Vec<_>>(),
        vec!["dashed", "nv-group", "nv-series-0", "hover"]
    );
    assert_eq!(a.style("stroke"), Some("#1f77b4"));
    assert_eq!(a.style("stroke-width"), Some("3"));
    assert_eq!(a.style("fill-opacity"), Some("0.5"));

    let c = groups[1];
    assert!(c.has_class("nv-series-2"));
    assert_eq!(c.style("stroke"), Some("#ff7f0e"));
    assert_eq!(c.style("stroke-width"), Some("1.5"));
    assert_eq!(c.style("fill-opacity"), Some("0"));
    assert_eq!(c.style("stroke-opacity"), Some("1"));
}

#[test]
fn entering_line_starts_from_previous_scales() {
    let mut chart = LineChart::<Point>::new();
    let mut svg = Element::svg(960.0, 500.0);
    chart
        .render(&mut svg, &[series("a", &[(0.0, 0.0), (1.0, 1.0)])])
        .expect("render");

    let report = chart
        .render(
            &mut svg,
            &[series("a", &[(0.0, 0.0), (1.0, 1.0)]), series("b", &[(0.0, 0.0), (2.0, 2.0)])],
        )
        .expect("render");

    let path_transition = |key: &str| {
        report
            .transitions
            .iter()
            .find(|t| t.key == key && t.target == TransitionTarget::Attribute("d".to_owned()))
            .expect("path transition")
    };
    let a = path_transition("a");
    assert_eq!(a.from, "M0,500L960,0");
    assert_eq!(a.to, "M0,500L480,250");
    assert_eq!(a.value_at(1.0), a.to);

    let b = path_transition("b");
    assert_eq!(b.from, "M0,500L1920,-500");
    assert_eq!(b.to, "M0,500L960,0");
    assert_eq!(b.duration_ms, 250);
    assert_eq!(line_path(&svg, "b"), Some("M0,500L960,0"));
}

#[test]
fn series_without_defined_points_has_no_path_data() {
    let mut chart = LineChart::<Point>::new();
    let mut svg = Element::svg(960.0, 500.0);
    chart
        .render(
            &mut svg,
            &[series("a", &[(0.0, 0.0), (1.0, 1.0)]), Series::new("empty", vec![Point::missing(0.0)])],
        )
        .expect("render");

    assert!(line_path(&svg, "a").is_some());
    assert_eq!(line_path(&svg, "empty"), None);
    assert_eq!(svg.select_all("path", "nv-line").len(), 2);
}
