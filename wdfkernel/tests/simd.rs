//! SIMD lanes against the scalar trees they vectorise.

use wdfkernel::circuits::{BassmanTonestack, DiodeClipper};
use wdfkernel::wdft::{
    voltage, CapacitorAlpha, Diode, PolarityInverter, ResistiveVoltageSource, Resistor, Root,
    WdfParallel, WdfSeries,
};
use wdfkernel::Sample;
use wide::{f32x4, f64x2};

const INPUTS: [f64; 5] = [1.0, 0.5, 0.0, -0.5, -1.0];

#[test]
fn diode_clipper_f64x2_matches_scalar() {
    let fs = 44_100.0;
    let mut lanes = DiodeClipper::<f64x2>::with_params(
        f64x2::splat(4_700.0),
        f64x2::splat(47.0e-9),
        f64x2::splat(2.52e-9),
        f64x2::splat(fs),
    );
    let mut scalar = [
        DiodeClipper::<f64>::with_params(4_700.0, 47.0e-9, 2.52e-9, fs),
        DiodeClipper::<f64>::with_params(4_700.0, 47.0e-9, 2.52e-9, fs),
    ];

    for x in INPUTS {
        let drive = [x, -3.0 * x];
        let y = lanes.process_sample(f64x2::new(drive));
        for (i, clipper) in scalar.iter_mut().enumerate() {
            let expected = clipper.process_sample(drive[i]);
            assert!((y.lane(i) - expected).abs() < 1e-6, "lane {i}, x = {x}");
        }
    }
}

#[test]
fn diode_clipper_f32x4_matches_scalar() {
    let fs = 44_100.0_f32;
    let gains = [1.0_f32, 0.25, -2.0, 8.0];
    let mut lanes = DiodeClipper::<f32x4>::new(f32x4::splat(fs));
    let mut scalar: Vec<DiodeClipper<f32>> = (0..4).map(|_| DiodeClipper::new(fs)).collect();

    for x in INPUTS {
        let drive = gains.map(|g| g * x as f32);
        let y = lanes.process_sample(f32x4::new(drive));
        for (i, clipper) in scalar.iter_mut().enumerate() {
            let expected = clipper.process_sample(drive[i]);
            assert!((y.lane(i) - expected).abs() < 1e-4, "lane {i}, x = {x}");
        }
    }
}

type Preamp<T> = Diode<
    T,
    WdfParallel<
        T,
        PolarityInverter<T, Resistor<T>>,
        WdfSeries<T, ResistiveVoltageSource<T>, WdfParallel<T, CapacitorAlpha<T>, Resistor<T>>>,
    >,
>;

/// Diode across a resistor, fed through an RC network from a voltage source.
fn preamp<T: Sample>(fs: f64) -> Preamp<T> {
    let c = |x: f64| T::from_f64(x);
    let p1 = WdfParallel::new(
        CapacitorAlpha::new(c(0.015e-6), c(fs), c(0.029)),
        Resistor::new(c(100e3)),
    );
    let s1 = WdfSeries::new(ResistiveVoltageSource::new(c(1.0e-9)), p1);
    let p2 = WdfParallel::new(PolarityInverter::new(Resistor::new(c(4_700.0))), s1);
    Diode::new(p2, c(2.52e-9))
}

fn preamp_step<T: Sample>(d: &mut Preamp<T>, x: T) -> T {
    d.next_mut().port2_mut().port1_mut().set_voltage(x);
    d.process();
    voltage(d.next().port1().port1())
}

#[test]
fn static_tree_f64x2_matches_scalar() {
    let fs = 48_000.0;
    let mut lanes = preamp::<f64x2>(fs);
    let mut scalar = [preamp::<f64>(fs), preamp::<f64>(fs)];

    for n in 0..256 {
        let t = n as f64 / fs;
        let drive = [(2.0 * std::f64::consts::PI * 440.0 * t).sin(), INPUTS[n % 5]];
        let y = preamp_step(&mut lanes, f64x2::new(drive));
        for (i, d) in scalar.iter_mut().enumerate() {
            let expected = preamp_step(d, drive[i]);
            assert!((y.lane(i) - expected).abs() < 1e-6, "lane {i}, n = {n}");
        }
    }
}

#[test]
fn tonestack_f64x2_matches_scalar() {
    let fs = 48_000.0;
    let mut lanes = BassmanTonestack::<f64x2>::new(f64x2::splat(fs));
    lanes.set_params(f64x2::splat(0.75), f64x2::splat(0.25), f64x2::splat(1.0));
    let mut scalar = BassmanTonestack::<f64>::new(fs);
    scalar.set_params(0.75, 0.25, 1.0);

    for n in 0..1_000 {
        let x = (2.0 * std::f64::consts::PI * 100.0 * n as f64 / fs).sin();
        let y = lanes.process_sample(f64x2::splat(x));
        let expected = scalar.process_sample(x);
        for i in 0..2 {
            assert!((y.lane(i) - expected).abs() < 1e-9, "lane {i}, n = {n}");
        }
    }
}
