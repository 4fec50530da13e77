//! R-type junctions: equivalence with binary trees, the unconfigured
//! failure mode, and the Bassman tone stack.

mod common;

use common::{gain_db, parallel_s, series_s};
use wdfkernel::circuits::BassmanTonestack;
use wdfkernel::rtype::{RootRtypeAdaptor, RtypeAdaptor, ScatteringMatrix};
use wdfkernel::wdft::{
    voltage, Capacitor, DiodePair, IdealVoltageSource, PolarityInverter, ResistiveVoltageSource,
    Resistor, Root, WdfNode, WdfParallel, WdfSeries,
};
use wdfkernel::WdfError;

const FS: f64 = 48_000.0;

fn series_calc(down: &[f64], s: &mut ScatteringMatrix<f64, 3>) -> f64 {
    let up = down[0] + down[1];
    s.set_s_matrix_data(&series_s([up, down[0], down[1]]));
    up
}

fn parallel_calc(down: &[f64], s: &mut ScatteringMatrix<f64, 3>) -> f64 {
    let up = down[0] * down[1] / (down[0] + down[1]);
    s.set_s_matrix_data(&parallel_s([up, down[0], down[1]]));
    up
}

// ---------------------------------------------------------------------------
// Equivalence with binary adaptors
// ---------------------------------------------------------------------------

#[test]
fn series_rtype_matches_series_adaptor() {
    let rt: RtypeAdaptor<f64, _, _, 3> = RtypeAdaptor::new(
        (Resistor::new(1_000.0), Capacitor::new(1.0e-6, FS)),
        0,
        series_calc,
    );
    let mut via_rtype = IdealVoltageSource::new(PolarityInverter::new(rt));
    let mut via_tree = IdealVoltageSource::new(PolarityInverter::new(WdfSeries::new(
        Resistor::new(1_000.0),
        Capacitor::new(1.0e-6, FS),
    )));
    assert!((via_rtype.wdf().r - via_tree.wdf().r).abs() < 1e-9);

    for n in 0..1_000 {
        let x = common::sine(300.0, n, FS);
        via_rtype.set_voltage(x);
        via_rtype.process();
        via_tree.set_voltage(x);
        via_tree.process();

        let v_rt = voltage(&via_rtype.next().port1().ports().1);
        let v_tree = voltage(via_tree.next().port1().port2());
        assert!((v_rt - v_tree).abs() < 1e-4, "n = {n}: {v_rt} vs {v_tree}");
    }
}

#[test]
fn parallel_rtype_drives_a_diode_pair_like_the_tree() {
    let source = |r: f64| WdfSeries::new(ResistiveVoltageSource::new(1.0e-9), Resistor::new(r));

    let rt: RtypeAdaptor<f64, _, _, 3> = RtypeAdaptor::new(
        (source(4_700.0), Capacitor::new(47.0e-9, FS)),
        0,
        parallel_calc,
    );
    let mut via_rtype = DiodePair::new(PolarityInverter::new(rt), 2.52e-9);
    let mut via_tree = DiodePair::new(
        PolarityInverter::new(WdfParallel::new(source(4_700.0), Capacitor::new(47.0e-9, FS))),
        2.52e-9,
    );

    for n in 0..2_000 {
        let x = 3.0 * common::sine(200.0, n, FS);
        {
            let mut inv = via_rtype.next_mut();
            let mut rt = inv.port1_mut();
            rt.ports_mut().0.port1_mut().set_voltage(x);
        }
        via_tree.next_mut().port1_mut().port1_mut().port1_mut().set_voltage(x);
        via_rtype.process();
        via_tree.process();

        let v_rt = voltage(&via_rtype.next().port1().ports().1);
        let v_tree = voltage(via_tree.next().port1().port2());
        assert!((v_rt - v_tree).abs() < 1e-4, "n = {n}: {v_rt} vs {v_tree}");
    }
}

#[test]
fn rtype_readapts_when_a_port_changes() {
    let rt: RtypeAdaptor<f64, _, _, 3> = RtypeAdaptor::new(
        (Resistor::new(1_000.0), Resistor::new(3_000.0)),
        0,
        series_calc,
    );
    let mut vs = IdealVoltageSource::new(rt);
    assert!((vs.wdf().r - 4_000.0).abs() < 1e-9);

    vs.next_mut().ports_mut().1.set_resistance_value(9_000.0);
    assert!((vs.wdf().r - 10_000.0).abs() < 1e-9);
    assert!((vs.next().scattering_matrix().get(0, 0)).abs() < 1e-12);

    // series port voltages sum to minus the source voltage
    vs.set_voltage(10.0);
    vs.process();
    assert!((voltage(&vs.next().ports().1) + 9.0).abs() < 1e-9);
}

#[test]
fn root_rtype_series_loop_settles_to_divider() {
    // 5 V behind 1 kΩ driving 4 kΩ around a single loop
    let mut src = ResistiveVoltageSource::new(1_000.0);
    src.set_voltage(5.0);
    let mut root: RootRtypeAdaptor<f64, _, _, 2> = RootRtypeAdaptor::new(
        (src, Resistor::new(4_000.0)),
        |r: &[f64; 2], s: &mut ScatteringMatrix<f64, 2>| {
            let total = r[0] + r[1];
            s.set_s_matrix_data(&[
                [1.0 - 2.0 * r[0] / total, -2.0 * r[0] / total],
                [-2.0 * r[1] / total, 1.0 - 2.0 * r[1] / total],
            ]);
        },
    );
    // the first compute scatters the waves reflected before the source was set
    root.compute();
    root.compute();
    assert!((voltage(&root.ports().1) + 4.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Unconfigured junctions
// ---------------------------------------------------------------------------

fn unconfigured_root() -> RootRtypeAdaptor<
    f64,
    (Resistor<f64>, Resistor<f64>),
    fn(&[f64; 2], &mut ScatteringMatrix<f64, 2>),
    2,
> {
    fn no_matrix(_: &[f64; 2], _: &mut ScatteringMatrix<f64, 2>) {}
    RootRtypeAdaptor::new(
        (Resistor::new(1.0), Resistor::new(2.0)),
        no_matrix as fn(&[f64; 2], &mut ScatteringMatrix<f64, 2>),
    )
}

#[test]
#[should_panic(expected = "before set_s_matrix_data")]
fn unconfigured_root_panics_on_compute() {
    let mut root = unconfigured_root();
    assert!(!root.is_configured());
    root.compute();
}

#[test]
fn unconfigured_root_reports_on_try_compute() {
    let mut root = unconfigured_root();
    assert!(matches!(root.try_compute(), Err(WdfError::ScatteringMatrixUnset)));

    root.set_s_matrix_data(&[[0.0, 1.0], [1.0, 0.0]]);
    assert!(root.is_configured());
    assert!(root.try_compute().is_ok());
}

#[test]
#[should_panic(expected = "before set_s_matrix_data")]
fn unconfigured_adaptor_panics_on_incident() {
    let rt: RtypeAdaptor<f64, _, _, 3> = RtypeAdaptor::new(
        (Resistor::new(1.0), Resistor::new(1.0)),
        0,
        |down: &[f64], _: &mut ScatteringMatrix<f64, 3>| down[0] + down[1],
    );
    let mut vs = IdealVoltageSource::new(rt);
    vs.process();
}

// ---------------------------------------------------------------------------
// Bassman tone stack
// ---------------------------------------------------------------------------

fn bassman_gain_db(high: f64, low: f64, mid: f64, freq: f64) -> f64 {
    let mut ts = BassmanTonestack::new(FS);
    ts.prepare(FS);
    ts.set_params(high, low, mid);
    gain_db(freq, FS, 1001, FS as usize - 1001, |x| ts.process_sample(x))
}

#[test]
fn bassman_bass_response() {
    let db = bassman_gain_db(0.001, 0.5, 1.0, 60.0);
    assert!((db + 9.0).abs() < 0.5, "60 Hz: {db:.2} dB");
}

#[test]
fn bassman_treble_response() {
    let db = bassman_gain_db(0.999, 0.999, 1.0, 15_000.0);
    assert!((db - 5.0).abs() < 0.5, "15 kHz: {db:.2} dB");
}
