//! Impedance propagation through owned trees: guards climbing to the root
//! and defer scopes coalescing recomputation.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use common::series_s;
use wdfkernel::circuits::BassmanTonestack;
use wdfkernel::rtype::{RtypeAdaptor, ScatteringMatrix};
use wdfkernel::wdft::{
    IdealVoltageSource, Resistor, ScopedDeferImpedancePropagation, WdfNode, WdfParallel,
    WdfSeries,
};

fn par(a: f64, b: f64) -> f64 {
    a * b / (a + b)
}

#[test]
fn leaf_change_climbs_to_the_root() {
    let mut vs: IdealVoltageSource<f64, _> = IdealVoltageSource::new(WdfSeries::new(
        Resistor::new(100.0),
        WdfParallel::new(
            Resistor::new(1_000.0),
            WdfSeries::new(Resistor::new(500.0), Resistor::new(500.0)),
        ),
    ));
    assert!((vs.wdf().r - 600.0).abs() < 1e-9);

    vs.next_mut()
        .port2_mut()
        .port2_mut()
        .port1_mut()
        .set_resistance_value(1_500.0);

    let expected = 100.0 + par(1_000.0, 2_000.0);
    assert!((vs.next().port2().port2().wdf().r - 2_000.0).abs() < 1e-9);
    assert_relative_eq!(vs.next().wdf().r, expected, max_relative = 1e-12);
    assert_relative_eq!(vs.wdf().r, expected, max_relative = 1e-12);
    assert_relative_eq!(vs.wdf().g * expected, 1.0, epsilon = 1e-12);
}

#[test]
fn defer_scope_recomputes_once() {
    let calls = Rc::new(Cell::new(0_usize));
    let counter = Rc::clone(&calls);
    let rt: RtypeAdaptor<f64, _, _, 3> = RtypeAdaptor::new(
        (Resistor::new(1_000.0), Resistor::new(2_000.0)),
        0,
        move |down: &[f64], s: &mut ScatteringMatrix<f64, 3>| {
            counter.set(counter.get() + 1);
            let up = down[0] + down[1];
            s.set_s_matrix_data(&series_s([up, down[0], down[1]]));
            up
        },
    );
    let mut vs = IdealVoltageSource::new(rt);
    assert_eq!(calls.get(), 1);

    // one guard per change: the junction re-adapts each time
    vs.next_mut().ports_mut().0.set_resistance_value(1_500.0);
    vs.next_mut().ports_mut().1.set_resistance_value(2_500.0);
    assert_eq!(calls.get(), 3);
    assert!((vs.wdf().r - 4_000.0).abs() < 1e-9);

    {
        let mut rt = vs.next_mut();
        let mut scope = ScopedDeferImpedancePropagation::<f64, _>::new((&mut *rt,));
        scope.0.ports_mut().0.set_resistance_value(3_000.0);
        scope.0.ports_mut().1.set_resistance_value(4_000.0);
        assert_eq!(calls.get(), 3);
        assert!((scope.0.wdf().r - 4_000.0).abs() < 1e-9);
    }
    assert_eq!(calls.get(), 4);
    assert!((vs.next().wdf().r - 7_000.0).abs() < 1e-9);

    // the scope stops at the deferred node; the root re-adapts on request
    assert!((vs.wdf().r - 4_000.0).abs() < 1e-9);
    vs.propagate_impedance_change();
    assert!((vs.wdf().r - 7_000.0).abs() < 1e-9);
}

#[test]
fn tonestack_knobs_land_in_one_update() {
    let fs = 48_000.0;
    let mut ts = BassmanTonestack::new(fs);
    ts.set_params(0.25, 0.5, 0.75);

    let r = ts.port_impedances();
    let cap = |c: f64| 1.0 / (2.0 * c * fs);
    assert!((r[0] - (1.0 + 0.75 * 25e3)).abs() < 1e-6);
    assert!((r[1] - (0.5 * 1e6 + 0.25 * 25e3)).abs() < 1e-6);
    assert!((r[2] - (cap(250e-12) + 250e3)).abs() < 1e-6);
    assert!((r[3] - cap(20e-9)).abs() < 1e-9);
    assert_eq!(r[4], 56e3);
}
