use approx::assert_abs_diff_eq;
use chart_bars::core::{BarMode, CartesianAxis, Trace};
use chart_bars::{BarLayoutConfig, Subplot, cross_trace_calc, layout_subplots};

#[test]
fn only_visible_traces_on_the_subplot_are_laid_out() {
    let mut x = CartesianAxis::linear("x");
    let mut y = CartesianAxis::linear("y");
    let mut traces = vec![
        Trace::vertical(&[0.0, 1.0], &[1.0, 2.0]).with_name("shown"),
        Trace::vertical(&[0.0, 1.0], &[1.0, 2.0]).with_visible(false),
        Trace::vertical(&[0.0, 1.0], &[1.0, 2.0]).with_axes("x2", "y"),
        Trace::horizontal(&[0.0, 1.0], &[1.0, 2.0]).with_name("sideways"),
    ];

    let layout = cross_trace_calc(&mut traces, &mut x, &mut y, &BarLayoutConfig::default())
        .expect("subplot layout");

    assert_eq!(layout.vertical.as_ref().map(|group| group.trace_count), Some(1));
    assert_eq!(layout.horizontal.as_ref().map(|group| group.trace_count), Some(1));
    assert_abs_diff_eq!(traces[0].bars[0].w, 0.8, epsilon = 1e-12);
    assert_eq!(traces[1].bars[0].w, 0.0);
    assert_eq!(traces[2].bars[0].w, 0.0);
    assert_abs_diff_eq!(traces[3].bars[0].w, 0.8, epsilon = 1e-12);
}

#[test]
fn horizontal_bars_use_y_as_position_axis() {
    let mut x = CartesianAxis::linear("x");
    let mut y = CartesianAxis::linear("y");
    let mut traces = vec![Trace::horizontal(&[0.0, 3.0, 6.0], &[1.0, 2.0, 3.0])];

    let layout = cross_trace_calc(
        &mut traces,
        &mut x,
        &mut y,
        &BarLayoutConfig::new(BarMode::Stack),
    )
    .expect("subplot layout");

    assert!(layout.vertical.is_none());
    assert_eq!(y.forced_min_dtick(), Some(3.0));
    assert_eq!(x.forced_min_dtick(), None);
    let size = traces[0].extremes.size.expect("size extents");
    assert_eq!(size.max, 3.0);
}

#[test]
fn subplot_axis_ranges_merge_trace_extents() {
    let mut subplot = Subplot::new(CartesianAxis::linear("x"), CartesianAxis::linear("y"))
        .with_trace(Trace::vertical(&[0.0, 1.0, 2.0], &[2.0, 1.0, 2.0]))
        .with_trace(Trace::vertical(&[0.0, 1.0, 2.0], &[3.0, 1.0, 2.0]));

    subplot
        .layout(&BarLayoutConfig::new(BarMode::Stack))
        .expect("subplot layout");

    let (low, high) = subplot.axis_range("y").expect("y range");
    assert_eq!(low, 0.0);
    assert_abs_diff_eq!(high, 5.25, epsilon = 1e-12);

    let (left, right) = subplot.axis_range("x").expect("x range");
    assert_eq!(left, -0.5);
    assert_eq!(right, 2.5);

    assert!(subplot.axis_range("x2").is_none());
}

#[test]
fn repeated_layout_passes_are_deterministic() {
    let subplot = Subplot::new(CartesianAxis::linear("x"), CartesianAxis::linear("y"))
        .with_trace(Trace::vertical(&[0.0, 1.0], &[1.0, -2.0]))
        .with_trace(Trace::vertical(&[0.0, 1.0], &[4.0, 3.0]));
    let mut subplots = vec![subplot.clone(), subplot];
    let config = BarLayoutConfig::new(BarMode::Relative);

    let first = layout_subplots(&mut subplots, &config).expect("first pass");
    let second = layout_subplots(&mut subplots, &config).expect("second pass");

    assert_eq!(first, second);
    assert_eq!(subplots[0], subplots[1]);
    assert_eq!(subplots[0].xaxis.forced_min_dtick(), Some(1.0));
}

#[test]
fn failing_config_aborts_before_touching_subplots() {
    let mut subplots = vec![
        Subplot::new(CartesianAxis::linear("x"), CartesianAxis::linear("y"))
            .with_trace(Trace::vertical(&[0.0], &[1.0])),
    ];

    let err = layout_subplots(
        &mut subplots,
        &BarLayoutConfig::default().with_group_gap(2.0),
    )
    .expect_err("group gap above one must fail");

    assert!(matches!(err, chart_bars::LayoutError::InvalidConfig(_)));
    assert_eq!(subplots[0].traces[0].bars[0].w, 0.0);
}

#[test]
fn subplot_fixture_loads_from_json() {
    let fixture = r#"{
        "xaxis": {"id": "x", "kind": "category", "categories": ["a", "b"]},
        "yaxis": {"id": "y", "kind": "linear"},
        "traces": [
            {"name": "sales", "bars": [{"p": 0, "s": 2}, {"p": 1, "s": null}]},
            {"name": "costs", "bars": [{"p": 0, "s": 1}, {"p": 1, "s": 3}], "base": [null, "0.5"]}
        ]
    }"#;
    let mut subplot = Subplot::from_json_str(fixture).expect("parse subplot fixture");

    subplot
        .layout(&BarLayoutConfig::default())
        .expect("subplot layout");

    let sales = &subplot.traces[0];
    assert!(!sales.bars[1].has_size());
    assert_abs_diff_eq!(sales.bars[0].w, 0.4, epsilon = 1e-12);

    let costs = &subplot.traces[1];
    assert!(!costs.bars[0].has_b);
    assert_eq!(costs.bars[1].b, 0.5);
    assert_eq!(costs.bars[1].top, 3.5);

    let json = subplot.to_json_pretty().expect("serialize subplot");
    assert!(json.contains("\"s\": null"));
}

#[test]
fn malformed_subplot_json_is_invalid_data() {
    let err = Subplot::from_json_str("{\"xaxis\": 1}").expect_err("malformed fixture");
    assert!(matches!(err, chart_bars::LayoutError::InvalidData(_)));
}

#[cfg(feature = "parallel-layout")]
#[test]
fn parallel_layout_matches_sequential_layout() {
    let subplot = Subplot::new(CartesianAxis::linear("x"), CartesianAxis::linear("y"))
        .with_trace(Trace::vertical(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]))
        .with_trace(Trace::vertical(&[0.0, 1.0, 2.0], &[3.0, 2.0, 1.0]));
    let mut sequential = vec![subplot.clone(); 4];
    let mut parallel = sequential.clone();
    let config = BarLayoutConfig::new(BarMode::Stack);

    let expected = layout_subplots(&mut sequential, &config).expect("sequential");
    let actual =
        chart_bars::api::layout_subplots_parallel(&mut parallel, &config).expect("parallel");

    assert_eq!(expected, actual);
    assert_eq!(sequential, parallel);
}
