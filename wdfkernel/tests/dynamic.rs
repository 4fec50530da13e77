//! Shared-handle trees against their owned counterparts.

mod common;

use wdfkernel::circuits::{bassman_s_matrix, BassmanTonestack, DiodeClipper, RcLowpass};
use wdfkernel::rtype::DynScatteringMatrix;
use wdfkernel::wdf;

const FS: f64 = 48_000.0;

#[test]
fn divider_reads_the_same_either_way() {
    let r1: wdf::Resistor<f64> = wdf::Resistor::new(10_000.0);
    let r2 = wdf::Resistor::new(30_000.0);
    let s = wdf::WdfSeries::new(r1.port(), r2.port());
    let inv = wdf::PolarityInverter::new(s.port());
    let vs = wdf::IdealVoltageSource::new(inv.port());

    vs.set_voltage(8.0);
    vs.process();
    assert!((r2.voltage() - 6.0).abs() < 1e-9);
    assert!((r1.voltage() - 2.0).abs() < 1e-9);

    // changing a leaf re-adapts the root through the parent handles
    r1.set_resistance_value(50_000.0);
    assert!((vs.impedance() - 80_000.0).abs() < 1e-9);
    vs.process();
    assert!((r2.voltage() - 3.0).abs() < 1e-9);
}

#[test]
fn rc_lowpass_matches_owned_tree() {
    let c = 1.0e-6;
    let mut owned = RcLowpass::new(1_000.0, c, FS);
    let r_value = owned.resistor().resistance_value();

    let r = wdf::Resistor::new(r_value);
    let cap = wdf::Capacitor::new(c, FS);
    let s = wdf::WdfSeries::new(r.port(), cap.port());
    let inv = wdf::PolarityInverter::new(s.port());
    let vs = wdf::IdealVoltageSource::new(inv.port());

    for n in 0..2_000 {
        let x = common::sine(700.0, n, FS);
        let y = owned.process_sample(x);
        vs.set_voltage(x);
        vs.process();
        assert!((cap.voltage() - y).abs() < 1e-12, "n = {n}");
    }
}

#[test]
fn diode_clipper_matches_owned_tree() {
    let mut owned = DiodeClipper::new(FS);

    let rvs = wdf::ResistiveVoltageSource::new(4_700.0);
    let cap = wdf::Capacitor::new(47.0e-9, FS);
    let p = wdf::WdfParallel::new(rvs.port(), cap.port());
    let inv = wdf::PolarityInverter::new(p.port());
    let dp = wdf::DiodePair::new(inv.port(), 2.52e-9);

    for n in 0..4_800 {
        let x = 4.0 * common::sine(100.0, n, FS);
        let y = owned.process_sample(x);
        rvs.set_voltage(x);
        dp.process();
        assert!((cap.voltage() - y).abs() < 1e-12, "n = {n}");
    }
}

/// Bassman tone stack wired from shared handles.
struct DynTonestack {
    rvs: wdf::ResistiveVoltageSource<f64>,
    res1m: wdf::Resistor<f64>,
    res1p: wdf::Resistor<f64>,
    res2: wdf::Resistor<f64>,
    res3m: wdf::Resistor<f64>,
    res3p: wdf::Resistor<f64>,
    s1: wdf::WdfSeries<f64>,
    s2: wdf::WdfSeries<f64>,
    s3: wdf::WdfSeries<f64>,
    root: wdf::RootRtypeAdaptor<f64>,
}

impl DynTonestack {
    fn new() -> Self {
        let rvs = wdf::ResistiveVoltageSource::new(1.0);
        let res3m = wdf::Resistor::new(0.5 * 25e3);
        let s1 = wdf::WdfSeries::new(rvs.port(), res3m.port());
        let res2 = wdf::Resistor::new(0.5 * 1e6);
        let res3p = wdf::Resistor::new(0.5 * 25e3);
        let s3 = wdf::WdfSeries::new(res2.port(), res3p.port());
        let res1p = wdf::Resistor::new(0.5 * 250e3);
        let res1m = wdf::Resistor::new(0.5 * 250e3);
        let s4 = wdf::WdfSeries::new(res1p.port(), res1m.port());
        let c1 = wdf::CapacitorAlpha::new(250e-12, FS, 1.0);
        let s2 = wdf::WdfSeries::new(c1.port(), s4.port());
        let c2 = wdf::CapacitorAlpha::new(20e-9, FS, 1.0);
        let r4 = wdf::Resistor::new(56e3);
        let c3 = wdf::CapacitorAlpha::new(20e-9, FS, 1.0);

        let root = wdf::RootRtypeAdaptor::new(
            6,
            vec![s1.port(), s3.port(), s2.port(), c2.port(), r4.port(), c3.port()],
            |r: &[f64], s: &mut DynScatteringMatrix<f64>| {
                let r = <[f64; 6]>::try_from(r).unwrap();
                s.set_s_matrix_data(&bassman_s_matrix(&r)).unwrap();
            },
        )
        .unwrap();

        Self {
            rvs,
            res1m,
            res1p,
            res2,
            res3m,
            res3p,
            s1,
            s2,
            s3,
            root,
        }
    }

    fn set_params(&self, high: f64, low: f64, mid: f64) {
        {
            let _defer = wdf::ScopedDeferImpedancePropagation::new([
                self.s1.port(),
                self.s2.port(),
                self.s3.port(),
            ]);
            self.res1m.set_resistance_value(high * 250e3);
            self.res1p.set_resistance_value((1.0 - high) * 250e3);
            self.res2.set_resistance_value((1.0 - low) * 1e6);
            self.res3m.set_resistance_value(mid * 25e3);
            self.res3p.set_resistance_value((1.0 - mid) * 25e3);
        }
        self.root.propagate_impedance_change();
    }

    fn process(&self, x: f64) -> f64 {
        self.rvs.set_voltage(x);
        self.root.compute();
        self.res1m.voltage() + self.s2.voltage() + self.res3m.voltage()
    }
}

#[test]
fn tonestack_matches_owned_tree() {
    let mut owned = BassmanTonestack::new(FS);
    let shared = DynTonestack::new();
    assert!(shared.root.is_configured());

    for n in 0..4_000 {
        if n == 2_000 {
            owned.set_params(0.8, 0.2, 0.3);
            shared.set_params(0.8, 0.2, 0.3);
        }
        let x = common::sine(250.0, n, FS) + 0.5 * common::sine(3_100.0, n, FS);
        let (y, y_dyn) = (owned.process_sample(x), shared.process(x));
        assert!((y - y_dyn).abs() < 1e-9, "n = {n}: {y} vs {y_dyn}");
    }
}
