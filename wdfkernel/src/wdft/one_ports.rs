//! Linear one-port leaves: resistor, reactive elements and combined RC parts.
//!
//! Reactive elements are discretized with the bilinear transform. The
//! `*Alpha` variants use the alpha transform instead, which blends bilinear
//! (`α = 1`) with backward Euler (`α = 0`) to tame high-frequency warping.

use super::{wdf_members, WdfMembers, WdfNode};
use crate::math::Sample;

// ---------------------------------------------------------------------------
// Resistor
// ---------------------------------------------------------------------------

/// Ideal resistor: a matched termination that reflects nothing.
///
/// `R = value`, `b = 0`
#[derive(Debug, Clone)]
pub struct Resistor<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    r_value: T,
}

impl<T: Sample> Resistor<T> {
    pub fn new(resistance: T) -> Self {
        let mut r = Self {
            wdf: WdfMembers::default(),
            r_value: resistance,
        };
        r.calc_impedance();
        r
    }

    pub fn resistance_value(&self) -> T {
        self.r_value
    }

    pub fn set_resistance_value(&mut self, resistance: T) {
        if resistance.all_eq(self.r_value) {
            return;
        }
        self.r_value = resistance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for Resistor<T> {
    wdf_members!();

    #[inline]
    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(self.r_value);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = T::default();
        self.wdf.b
    }
}

// ---------------------------------------------------------------------------
// Capacitor
// ---------------------------------------------------------------------------

/// Capacitor, bilinear transform.
///
/// `R = 1 / (2 * fs * C)`, `b[n] = a[n-1]`
#[derive(Debug, Clone)]
pub struct Capacitor<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    c_value: T,
    fs: T,
    z: T,
}

impl<T: Sample> Capacitor<T> {
    pub fn new(capacitance: T, sample_rate: T) -> Self {
        let mut c = Self {
            wdf: WdfMembers::default(),
            c_value: capacitance,
            fs: sample_rate,
            z: T::default(),
        };
        c.calc_impedance();
        c
    }

    /// Change the sample rate, propagate the new impedance and clear state.
    pub fn prepare(&mut self, sample_rate: T) {
        self.fs = sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    pub fn capacitance_value(&self) -> T {
        self.c_value
    }

    pub fn set_capacitance_value(&mut self, capacitance: T) {
        if capacitance.all_eq(self.c_value) {
            return;
        }
        self.c_value = capacitance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for Capacitor<T> {
    wdf_members!();

    #[inline]
    fn calc_impedance(&mut self) {
        self.wdf
            .set_impedance(T::from_f64(1.0) / (T::from_f64(2.0) * self.c_value * self.fs));
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.z = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.z;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}

// ---------------------------------------------------------------------------
// Capacitor (alpha transform)
// ---------------------------------------------------------------------------

/// Capacitor discretized with the alpha transform.
///
/// `R = 1 / ((1 + α) * fs * C)`
/// `b[n] = (1 - α)/2 * b[n-1] + (1 + α)/2 * a[n-1]`
#[derive(Debug, Clone)]
pub struct CapacitorAlpha<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    c_value: T,
    fs: T,
    alpha: T,
    b_coef: T,
    a_coef: T,
    z: T,
}

impl<T: Sample> CapacitorAlpha<T> {
    pub fn new(capacitance: T, sample_rate: T, alpha: T) -> Self {
        let (b_coef, a_coef) = alpha_coefs(alpha);
        let mut c = Self {
            wdf: WdfMembers::default(),
            c_value: capacitance,
            fs: sample_rate,
            alpha,
            b_coef,
            a_coef,
            z: T::default(),
        };
        c.calc_impedance();
        c
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.fs = sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    /// Always propagates, even when `alpha` is unchanged.
    pub fn set_alpha(&mut self, alpha: T) {
        self.alpha = alpha;
        (self.b_coef, self.a_coef) = alpha_coefs(alpha);
        self.propagate_impedance_change();
    }

    pub fn set_capacitance_value(&mut self, capacitance: T) {
        if capacitance.all_eq(self.c_value) {
            return;
        }
        self.c_value = capacitance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for CapacitorAlpha<T> {
    wdf_members!();

    #[inline]
    fn calc_impedance(&mut self) {
        let one = T::from_f64(1.0);
        self.wdf
            .set_impedance(one / ((one + self.alpha) * self.c_value * self.fs));
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.z = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.b_coef * self.wdf.b + self.a_coef * self.z;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}

#[inline]
fn alpha_coefs<T: Sample>(alpha: T) -> (T, T) {
    let one = T::from_f64(1.0);
    let half = T::from_f64(0.5);
    ((one - alpha) * half, (one + alpha) * half)
}

// ---------------------------------------------------------------------------
// Inductor
// ---------------------------------------------------------------------------

/// Inductor, bilinear transform.
///
/// `R = 2 * fs * L`, `b[n] = -a[n-1]`
#[derive(Debug, Clone)]
pub struct Inductor<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    l_value: T,
    fs: T,
    z: T,
}

impl<T: Sample> Inductor<T> {
    pub fn new(inductance: T, sample_rate: T) -> Self {
        let mut l = Self {
            wdf: WdfMembers::default(),
            l_value: inductance,
            fs: sample_rate,
            z: T::default(),
        };
        l.calc_impedance();
        l
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.fs = sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    pub fn set_inductance_value(&mut self, inductance: T) {
        if inductance.all_eq(self.l_value) {
            return;
        }
        self.l_value = inductance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for Inductor<T> {
    wdf_members!();

    #[inline]
    fn calc_impedance(&mut self) {
        self.wdf
            .set_impedance(T::from_f64(2.0) * self.l_value * self.fs);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.z = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = -self.z;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}

// ---------------------------------------------------------------------------
// Inductor (alpha transform)
// ---------------------------------------------------------------------------

/// Inductor discretized with the alpha transform.
///
/// `R = (1 + α) * fs * L`
/// `b[n] = (1 - α)/2 * b[n-1] - (1 + α)/2 * a[n-1]`
#[derive(Debug, Clone)]
pub struct InductorAlpha<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    l_value: T,
    fs: T,
    alpha: T,
    b_coef: T,
    a_coef: T,
    z: T,
}

impl<T: Sample> InductorAlpha<T> {
    pub fn new(inductance: T, sample_rate: T, alpha: T) -> Self {
        let (b_coef, a_coef) = alpha_coefs(alpha);
        let mut l = Self {
            wdf: WdfMembers::default(),
            l_value: inductance,
            fs: sample_rate,
            alpha,
            b_coef,
            a_coef,
            z: T::default(),
        };
        l.calc_impedance();
        l
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.fs = sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    pub fn set_alpha(&mut self, alpha: T) {
        self.alpha = alpha;
        (self.b_coef, self.a_coef) = alpha_coefs(alpha);
        self.propagate_impedance_change();
    }

    pub fn set_inductance_value(&mut self, inductance: T) {
        if inductance.all_eq(self.l_value) {
            return;
        }
        self.l_value = inductance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for InductorAlpha<T> {
    wdf_members!();

    #[inline]
    fn calc_impedance(&mut self) {
        self.wdf
            .set_impedance((T::from_f64(1.0) + self.alpha) * self.l_value * self.fs);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.z = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.b_coef * self.wdf.b - self.a_coef * self.z;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}

// ---------------------------------------------------------------------------
// Resistor + capacitor in series
// ---------------------------------------------------------------------------

/// Resistor and capacitor in series, collapsed into one port.
///
/// `R = T/(2C) + Rv`, `k = T / (2*C*Rv + T)`, `b[n] = b[n-1] + k*(a[n-1] - b[n-1])`
#[derive(Debug, Clone)]
pub struct ResistorCapacitorSeries<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    r_value: T,
    c_value: T,
    tt: T,
    k: T,
    z: T,
}

impl<T: Sample> ResistorCapacitorSeries<T> {
    pub fn new(resistance: T, capacitance: T, sample_rate: T) -> Self {
        let mut rc = Self {
            wdf: WdfMembers::default(),
            r_value: resistance,
            c_value: capacitance,
            tt: T::from_f64(1.0) / sample_rate,
            k: T::default(),
            z: T::default(),
        };
        rc.calc_impedance();
        rc
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.tt = T::from_f64(1.0) / sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    pub fn set_resistance_value(&mut self, resistance: T) {
        if resistance.all_eq(self.r_value) {
            return;
        }
        self.r_value = resistance;
        self.propagate_impedance_change();
    }

    pub fn set_capacitance_value(&mut self, capacitance: T) {
        if capacitance.all_eq(self.c_value) {
            return;
        }
        self.c_value = capacitance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for ResistorCapacitorSeries<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let two_c = T::from_f64(2.0) * self.c_value;
        self.wdf.set_impedance(self.tt / two_c + self.r_value);
        self.k = self.tt / (two_c * self.r_value + self.tt);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.z = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.wdf.b + self.k * (self.z - self.wdf.b);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}

// ---------------------------------------------------------------------------
// Resistor + capacitor in parallel
// ---------------------------------------------------------------------------

/// Resistor and capacitor in parallel, collapsed into one port.
///
/// `R = Rv*T / (2*Rv*C + T)`, `k = 2*Rv*C / (2*Rv*C + T)`,
/// `b[n] = k*(b[n-1] + a[n-1]) - b[n-1]`
#[derive(Debug, Clone)]
pub struct ResistorCapacitorParallel<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    r_value: T,
    c_value: T,
    tt: T,
    k: T,
    z: T,
}

impl<T: Sample> ResistorCapacitorParallel<T> {
    pub fn new(resistance: T, capacitance: T, sample_rate: T) -> Self {
        let mut rc = Self {
            wdf: WdfMembers::default(),
            r_value: resistance,
            c_value: capacitance,
            tt: T::from_f64(1.0) / sample_rate,
            k: T::default(),
            z: T::default(),
        };
        rc.calc_impedance();
        rc
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.tt = T::from_f64(1.0) / sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    pub fn set_resistance_value(&mut self, resistance: T) {
        if resistance.all_eq(self.r_value) {
            return;
        }
        self.r_value = resistance;
        self.propagate_impedance_change();
    }

    pub fn set_capacitance_value(&mut self, capacitance: T) {
        if capacitance.all_eq(self.c_value) {
            return;
        }
        self.c_value = capacitance;
        self.propagate_impedance_change();
    }
}

impl<T: Sample> WdfNode<T> for ResistorCapacitorParallel<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let two_rc = T::from_f64(2.0) * self.c_value * self.r_value;
        self.wdf
            .set_impedance(self.r_value * self.tt / (two_rc + self.tt));
        self.k = two_rc / (two_rc + self.tt);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.z = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.k * (self.wdf.b + self.z) - self.wdf.b;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}

// ---------------------------------------------------------------------------
// Open / short
// ---------------------------------------------------------------------------

/// Open circuit: no current flows, the wave reflects unchanged.
#[derive(Debug, Clone)]
pub struct Open<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
}

impl<T: Sample> Default for Open<T> {
    fn default() -> Self {
        let mut o = Self {
            wdf: WdfMembers::default(),
        };
        o.calc_impedance();
        o
    }
}

impl<T: Sample> WdfNode<T> for Open<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(T::from_f64(1.0e15));
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.wdf.a;
        self.wdf.b
    }
}

/// Short circuit: zero voltage, the wave reflects inverted.
#[derive(Debug, Clone)]
pub struct Short<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
}

impl<T: Sample> Default for Short<T> {
    fn default() -> Self {
        let mut s = Self {
            wdf: WdfMembers::default(),
        };
        s.calc_impedance();
        s
    }
}

impl<T: Sample> WdfNode<T> for Short<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(T::from_f64(1.0e-15));
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = -self.wdf.a;
        self.wdf.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f64 = 48_000.0;

    #[test]
    fn reactive_impedances() {
        let c = Capacitor::new(1.0e-6, FS);
        assert!((c.wdf().r - 1.0 / (2.0 * 1.0e-6 * FS)).abs() < 1e-9);
        let l = Inductor::new(0.5, FS);
        assert_eq!(l.wdf().r, 2.0 * 0.5 * FS);
        let ca = CapacitorAlpha::new(1.0e-6, FS, 0.5);
        assert!((ca.wdf().r - 1.0 / (1.5 * 1.0e-6 * FS)).abs() < 1e-9);
        let la = InductorAlpha::new(1.0, FS, 0.5);
        assert!((la.wdf().r - 1.5 * FS).abs() < 1e-9);
    }

    #[test]
    fn alpha_one_matches_bilinear() {
        let mut plain = Capacitor::new(2.2e-6, FS);
        let mut alpha = CapacitorAlpha::new(2.2e-6, FS, 1.0);
        assert!((plain.wdf().r - alpha.wdf().r).abs() < 1e-9);
        for x in [0.3, -1.0, 0.7, 0.0, 2.5] {
            plain.incident(x);
            alpha.incident(x);
            assert_eq!(plain.reflected(), alpha.reflected());
        }
    }

    #[test]
    fn capacitor_delays_one_sample() {
        let mut c = Capacitor::new(1.0e-6, FS);
        c.incident(0.25);
        assert_eq!(c.reflected(), 0.25);
        c.reset();
        assert_eq!(c.reflected(), 0.0);
    }

    #[test]
    fn inductor_inverts_delayed_wave() {
        let mut l = Inductor::new(1.0e-3, FS);
        l.incident(0.25);
        assert_eq!(l.reflected(), -0.25);
    }

    #[test]
    fn prepare_rescales_impedance() {
        let mut c = Capacitor::new(1.0e-6, FS);
        c.incident(1.0);
        c.prepare(96_000.0);
        assert!((c.wdf().r - 1.0 / (2.0 * 1.0e-6 * 96_000.0)).abs() < 1e-9);
        assert_eq!(c.reflected(), 0.0);
    }

    #[test]
    fn setter_with_same_value_is_a_no_op() {
        let mut r = Resistor::new(220.0);
        r.set_resistance_value(220.0);
        assert!(!r.wdf().changed);
        r.set_resistance_value(330.0);
        assert!(r.wdf().changed);
        assert_eq!(r.wdf().r, 330.0);
    }

    #[test]
    fn combined_rc_impedances() {
        let tt = 1.0 / FS;
        let s = ResistorCapacitorSeries::new(1000.0, 1.0e-6, FS);
        assert!((s.wdf().r - (tt / 2.0e-6 + 1000.0)).abs() < 1e-9);
        let p = ResistorCapacitorParallel::new(1000.0, 1.0e-6, FS);
        let two_rc = 2.0 * 1000.0 * 1.0e-6;
        assert!((p.wdf().r - 1000.0 * tt / (two_rc + tt)).abs() < 1e-9);
    }

    #[test]
    fn open_and_short_reflect() {
        let mut o = Open::<f64>::default();
        o.incident(0.4);
        assert_eq!(o.reflected(), 0.4);
        let mut s = Short::<f64>::default();
        s.incident(0.4);
        assert_eq!(s.reflected(), -0.4);
    }
}
