use approx::assert_abs_diff_eq;
use chart_bars::core::{AxisKind, BarMode, CartesianAxis, PerPoint, Trace};
use chart_bars::{BarLayoutConfig, set_group_positions};

#[test]
fn grouped_traces_split_the_slot_in_declaration_order() {
    let mut x = CartesianAxis::linear("x");
    let y = CartesianAxis::linear("y");
    let mut traces: Vec<Trace> = (0..3)
        .map(|_| Trace::vertical(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]))
        .collect();
    let mut refs: Vec<&mut Trace> = traces.iter_mut().collect();

    let config = BarLayoutConfig::new(BarMode::Group).with_group_gap(0.1);
    set_group_positions(&mut x, &y, &mut refs, &config).expect("group layout");

    let slot = 0.8 / 3.0;
    for (index, trace) in traces.iter().enumerate() {
        for bar in &trace.bars {
            assert_abs_diff_eq!(bar.w, slot * 0.9, epsilon = 1e-12);
            let expected_center = bar.p + (index as f64 - 1.0) * slot;
            assert_abs_diff_eq!(bar.center, expected_center, epsilon = 1e-12);
        }
    }
}

#[test]
fn single_grouped_trace_keeps_full_slot() {
    let mut x = CartesianAxis::linear("x");
    let y = CartesianAxis::linear("y");
    let mut trace = Trace::vertical(&[0.0, 2.0, 4.0], &[1.0, 1.0, 1.0]);

    set_group_positions(&mut x, &y, &mut [&mut trace], &BarLayoutConfig::default())
        .expect("group layout");

    assert_abs_diff_eq!(trace.meta.bardelta, 2.0, epsilon = 1e-12);
    for bar in &trace.bars {
        assert_abs_diff_eq!(bar.w, 1.6, epsilon = 1e-12);
        assert_abs_diff_eq!(bar.center, bar.p, epsilon = 1e-12);
    }
}

#[test]
fn width_override_array_is_repaired_against_default() {
    let mut x = CartesianAxis::linear("x");
    let y = CartesianAxis::linear("y");
    let mut trace = Trace::vertical(&[0.0, 1.0, 2.0], &[1.0, 1.0, 1.0])
        .with_width(vec![None, Some(1.0), Some(0.8)]);

    set_group_positions(&mut x, &y, &mut [&mut trace], &BarLayoutConfig::default())
        .expect("group layout");

    let PerPoint::Array(widths) = &trace.meta.barwidth else {
        panic!("width override must stay per point");
    };
    assert_eq!(widths.len(), 3);
    for (width, expected) in widths.iter().zip([0.8, 1.0, 0.8]) {
        assert_abs_diff_eq!(*width, expected, epsilon = 1e-12);
    }
    for bar in &trace.bars {
        assert_abs_diff_eq!(bar.center, bar.p, epsilon = 1e-12);
    }
}

#[test]
fn offset_override_opts_trace_out_of_grouping() {
    let mut x = CartesianAxis::linear("x");
    let y = CartesianAxis::linear("y");
    let mut first = Trace::vertical(&[0.0, 1.0], &[1.0, 1.0]);
    let mut shifted = Trace::vertical(&[0.0, 1.0], &[1.0, 1.0]).with_offset(0.1);
    let mut third = Trace::vertical(&[0.0, 1.0], &[1.0, 1.0]);

    set_group_positions(
        &mut x,
        &y,
        &mut [&mut first, &mut shifted, &mut third],
        &BarLayoutConfig::default(),
    )
    .expect("group layout");

    for bar in &shifted.bars {
        assert_abs_diff_eq!(bar.w, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(bar.p0, bar.p + 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(bar.center, bar.p + 0.5, epsilon = 1e-12);
    }
    for bar in &first.bars {
        assert_abs_diff_eq!(bar.w, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(bar.center, bar.p - 0.2, epsilon = 1e-12);
    }
    for bar in &third.bars {
        assert_abs_diff_eq!(bar.center, bar.p + 0.2, epsilon = 1e-12);
    }
}

#[test]
fn categorical_position_axis_pins_slot_unit_to_one() {
    let mut x = CartesianAxis::new("x", AxisKind::Category);
    let y = CartesianAxis::linear("y");
    let mut trace = Trace::vertical(&[0.0, 3.0], &[1.0, 1.0]);

    set_group_positions(&mut x, &y, &mut [&mut trace], &BarLayoutConfig::default())
        .expect("group layout");

    assert_eq!(trace.meta.bardelta, 1.0);
    assert_abs_diff_eq!(trace.bars[0].w, 0.8, epsilon = 1e-12);
    assert_eq!(x.forced_min_dtick(), Some(0.0));
}

#[test]
fn width_hint_sets_slot_for_a_single_position() {
    let mut x = CartesianAxis::linear("x");
    let y = CartesianAxis::linear("y");
    let mut trace = Trace::vertical(&[5.0], &[3.0]).with_width_hint(0.25);

    set_group_positions(&mut x, &y, &mut [&mut trace], &BarLayoutConfig::default())
        .expect("group layout");

    assert_eq!(trace.meta.bardelta, 0.25);
    assert_abs_diff_eq!(trace.bars[0].w, 0.2, epsilon = 1e-12);
}

#[test]
fn duplicate_positions_within_a_grouped_trace_do_not_hide_each_other() {
    let mut x = CartesianAxis::linear("x");
    let y = CartesianAxis::linear("y");
    let mut trace = Trace::vertical(&[1.0, 1.0], &[2.0, 3.0]);

    set_group_positions(&mut x, &y, &mut [&mut trace], &BarLayoutConfig::default())
        .expect("group layout");

    assert_eq!(trace.bars[0].b, 0.0);
    assert_eq!(trace.bars[1].b, 2.0);
    assert_eq!(trace.bars[1].top, 5.0);
}
