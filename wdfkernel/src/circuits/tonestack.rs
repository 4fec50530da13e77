//! Fender Bassman tone stack on a six-port root R-type junction.
//!
//! Port order: `S1` (input source + mid pot lower leg), `S3` (bass pot +
//! mid upper leg), `S2` (treble cap + treble pot), `C2`, `R4`, `C3`.
//! The scattering matrix was derived by nodal analysis of the bridged
//! network; `N` is the symmetric numerator and `D` the shared determinant.

use crate::math::Sample;
use crate::rtype::{RootImpedanceCalculator, RootRtypeAdaptor, ScatteringMatrix};
use crate::wdft::{
    voltage, CapacitorAlpha, ResistiveVoltageSource, Resistor, ScopedDeferImpedancePropagation,
    WdfNode, WdfSeries,
};
use crate::CircuitProcessor;

const R1: f64 = 250e3;
const R2: f64 = 1e6;
const R3: f64 = 25e3;
const R4: f64 = 56e3;
const C1: f64 = 250e-12;
const C2: f64 = 20e-9;
const C3: f64 = 20e-9;

type S1<T> = WdfSeries<T, ResistiveVoltageSource<T>, Resistor<T>>;
type S3<T> = WdfSeries<T, Resistor<T>, Resistor<T>>;
type S4<T> = WdfSeries<T, Resistor<T>, Resistor<T>>;
type S2<T> = WdfSeries<T, CapacitorAlpha<T>, S4<T>>;
type Ports<T> = (S1<T>, S3<T>, S2<T>, CapacitorAlpha<T>, Resistor<T>, CapacitorAlpha<T>);

/// Bassman scattering matrix for port resistances `r`.
pub fn bassman_s_matrix<T: Sample>(r: &[T; 6]) -> [[T; 6]; 6] {
    let one = T::from_f64(1.0);
    let [ga, gb, gc, gd, ge, gf] = r.map(|ri| one / ri);

    let abcd = ga * gb * gc * gd;
    let abce = ga * gb * gc * ge;
    let abcf = ga * gb * gc * gf;
    let abde = ga * gb * gd * ge;
    let abdf = ga * gb * gd * gf;
    let abef = ga * gb * ge * gf;
    let acde = ga * gc * gd * ge;
    let acdf = ga * gc * gd * gf;
    let acef = ga * gc * ge * gf;
    let adef = ga * gd * ge * gf;
    let bcde = gb * gc * gd * ge;
    let bcdf = gb * gc * gd * gf;
    let bcef = gb * gc * ge * gf;
    let bdef = gb * gd * ge * gf;
    let cdef = gc * gd * ge * gf;

    let d = ga * gb * gd
        + ga * gb * ge
        + ga * gb * gf
        + ga * gc * gd
        + ga * gc * ge
        + ga * gc * gf
        + ga * gd * ge
        + ga * gd * gf
        + gb * gc * gd
        + gb * gc * ge
        + gb * gc * gf
        + gb * gd * ge
        + gb * ge * gf
        + gc * gd * gf
        + gc * ge * gf
        + gd * ge * gf;

    let n01 = abcd + abce + abcf + abde;
    let n02 = abcd + abce + abcf + acdf;
    let n03 = abde - acdf;
    let n04 = -(abde + abef + acef + adef);
    let n05 = -(abef + acdf + acef + adef);
    let n12 = -(abcd + abce + abcf + bcef);
    let n13 = -(abde + abdf + bcdf + bdef);
    let n14 = abde - bcef;
    let n15 = -(abdf + bcdf + bcef + bdef);
    let n23 = acde + acdf + bcde + cdef;
    let n24 = -(acde + bcde + bcef + cdef);
    let n25 = acdf - bcef;
    let n34 = abde + acde + bcde + cdef;
    let n35 = -(abdf + acdf + bcdf + bdef);
    let n45 = -(abef + acef + adef + bcef);

    let n = [
        [
            -(abcd + abce + abcf + abde + abef + acdf + acef + adef),
            n01,
            n02,
            n03,
            n04,
            n05,
        ],
        [
            n01,
            -(abcd + abce + abcf + abde + abdf + bcdf + bcef + bdef),
            n12,
            n13,
            n14,
            n15,
        ],
        [
            n02,
            n12,
            -(abcd + abce + abcf + acde + acdf + bcde + bcef + cdef),
            n23,
            n24,
            n25,
        ],
        [
            n03,
            n13,
            n23,
            -(abde + abdf + acde + acdf + bcde + bcdf + bdef + cdef),
            n34,
            n35,
        ],
        [
            n04,
            n14,
            n24,
            n34,
            -(abde + abef + acde + acef + adef + bcde + bcef + cdef),
            n45,
        ],
        [
            n05,
            n15,
            n25,
            n35,
            n45,
            -(abdf + abef + acdf + acef + adef + bcdf + bcef + bdef),
        ],
    ];

    let two = T::from_f64(2.0);
    let mut s = [[T::default(); 6]; 6];
    for (i, row) in s.iter_mut().enumerate() {
        let scale = two * r[i] / d;
        for (j, v) in row.iter_mut().enumerate() {
            *v = scale * n[i][j];
            if i == j {
                *v = *v + one;
            }
        }
    }
    s
}

/// Loads [`bassman_s_matrix`] whenever a port impedance changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BassmanImpedanceCalc;

impl<T: Sample> RootImpedanceCalculator<T, 6> for BassmanImpedanceCalc {
    fn calc_impedance(&mut self, impedances: &[T; 6], s: &mut ScatteringMatrix<T, 6>) {
        s.set_s_matrix_data(&bassman_s_matrix(impedances));
    }
}

/// Passive three-knob tone stack.
pub struct BassmanTonestack<T: Sample = f64> {
    rtype: RootRtypeAdaptor<T, Ports<T>, BassmanImpedanceCalc, 6>,
}

impl<T: Sample> BassmanTonestack<T> {
    /// Knobs start at 0.5 each.
    pub fn new(sample_rate: T) -> Self {
        let alpha = T::from_f64(1.0);
        let half = T::from_f64(0.5);
        let s1 = WdfSeries::new(
            ResistiveVoltageSource::new(T::from_f64(1.0)),
            Resistor::new(half * T::from_f64(R3)),
        );
        let s3 = WdfSeries::new(
            Resistor::new(half * T::from_f64(R2)),
            Resistor::new(half * T::from_f64(R3)),
        );
        let s4 = WdfSeries::new(
            Resistor::new(half * T::from_f64(R1)),
            Resistor::new(half * T::from_f64(R1)),
        );
        let s2 = WdfSeries::new(
            CapacitorAlpha::new(T::from_f64(C1), sample_rate, alpha),
            s4,
        );
        let ports = (
            s1,
            s3,
            s2,
            CapacitorAlpha::new(T::from_f64(C2), sample_rate, alpha),
            Resistor::new(T::from_f64(R4)),
            CapacitorAlpha::new(T::from_f64(C3), sample_rate, alpha),
        );
        Self {
            rtype: RootRtypeAdaptor::new(ports, BassmanImpedanceCalc),
        }
    }

    /// Knob positions in `[0, 1]`. The matrix is recomputed once.
    pub fn set_params(&mut self, high: T, low: T, mid: T) {
        let one = T::from_f64(1.0);
        {
            let mut ports = self.rtype.ports_mut();
            let (s1, s3, s2, _, _, _) = &mut *ports;
            let mut scope = ScopedDeferImpedancePropagation::<T, _>::new((s1, s3, s2));
            let (s1, s3, s2) = &mut *scope;

            s2.port2_mut()
                .port2_mut()
                .set_resistance_value(high * T::from_f64(R1));
            s2.port2_mut()
                .port1_mut()
                .set_resistance_value((one - high) * T::from_f64(R1));

            s3.port1_mut()
                .set_resistance_value((one - low) * T::from_f64(R2));

            s1.port2_mut().set_resistance_value(mid * T::from_f64(R3));
            s3.port2_mut()
                .set_resistance_value((one - mid) * T::from_f64(R3));
        }
        self.rtype.propagate_impedance_change();
        log::debug!("tonestack knobs set: high {high:?} low {low:?} mid {mid:?}");
    }

    pub fn prepare(&mut self, sample_rate: T) {
        let mut ports = self.rtype.ports_mut();
        let (_, _, s2, c2, _, c3) = &mut *ports;
        s2.port1_mut().prepare(sample_rate);
        c2.prepare(sample_rate);
        c3.prepare(sample_rate);
    }

    pub fn reset(&mut self) {
        self.rtype.reset();
    }

    pub fn port_impedances(&self) -> [T; 6] {
        self.rtype.port_impedances()
    }

    #[inline]
    pub fn process_sample(&mut self, x: T) -> T {
        {
            let mut ports = self.rtype.ports_mut();
            ports.0.port1_mut().set_voltage(x);
        }
        self.rtype.compute();

        let (s1, _, s2, _, _, _) = self.rtype.ports();
        voltage(s2.port2().port2()) + voltage(s2) + voltage(s1.port2())
    }
}

impl CircuitProcessor for BassmanTonestack<f64> {
    fn process(&mut self, input: f64) -> f64 {
        self.process_sample(input)
    }

    fn set_sample_rate(&mut self, rate: f64) {
        self.prepare(rate);
    }

    fn reset(&mut self) {
        BassmanTonestack::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_matrix_is_reciprocal() {
        // R_j S_ij = R_i S_ji for i != j
        let r: [f64; 6] = [1.0e3, 2.0e5, 4.7e4, 800.0, 5.6e4, 800.0];
        let s = bassman_s_matrix(&r);
        for i in 0..6 {
            for j in 0..6 {
                if i != j {
                    assert!((r[j] * s[i][j] - r[i] * s[j][i]).abs() < 1e-6 * r[i].max(r[j]));
                }
            }
        }
    }

    #[test]
    fn knobs_move_port_impedances() {
        let mut ts = BassmanTonestack::new(48_000.0);
        ts.set_params(1.0, 0.0, 1.0);
        let r = ts.port_impedances();
        assert!((r[0] - (1.0 + R3)).abs() < 1e-6);
        assert!((r[1] - R2).abs() < 1e-6);
        assert!(ts.rtype.is_configured());
    }
}
