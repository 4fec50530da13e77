//! Voltage and current sources.
//!
//! Ideal sources cannot be adapted, so they are roots and own the subtree
//! they drive. Sources with a series or parallel resistance are ordinary
//! leaves.

use super::{impl_root_process, wdf_members, PortMut, WdfMembers, WdfNode};
use crate::math::Sample;

// ---------------------------------------------------------------------------
// Ideal voltage source (root)
// ---------------------------------------------------------------------------

/// Ideal voltage source terminating a tree.
///
/// `b = -a + 2 * Vs`
#[derive(Debug, Clone)]
pub struct IdealVoltageSource<T: Sample, N: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    next: N,
    vs: T,
}

impl<T: Sample, N: WdfNode<T>> IdealVoltageSource<T, N> {
    pub fn new(mut next: N) -> Self {
        next.wdf_mut().take_changed();
        let mut src = Self {
            wdf: WdfMembers::default(),
            next,
            vs: T::default(),
        };
        src.calc_impedance();
        src
    }

    pub fn set_voltage(&mut self, voltage: T) {
        self.vs = voltage;
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    pub fn next_mut(&mut self) -> PortMut<'_, T, Self, N> {
        PortMut::node(self, |s| &s.next, |s| &mut s.next)
    }
}

impl<T: Sample, N: WdfNode<T>> WdfNode<T> for IdealVoltageSource<T, N> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(self.next.wdf().r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = -self.wdf.a + T::from_f64(2.0) * self.vs;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.reset();
    }
}

impl_root_process!(IdealVoltageSource<N>);

// ---------------------------------------------------------------------------
// Ideal current source (root)
// ---------------------------------------------------------------------------

/// Ideal current source terminating a tree.
///
/// `b = 2 * R_next * Is + a`
#[derive(Debug, Clone)]
pub struct IdealCurrentSource<T: Sample, N: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    next: N,
    is: T,
    two_r: T,
    two_r_is: T,
}

impl<T: Sample, N: WdfNode<T>> IdealCurrentSource<T, N> {
    pub fn new(mut next: N) -> Self {
        next.wdf_mut().take_changed();
        let mut src = Self {
            wdf: WdfMembers::default(),
            next,
            is: T::default(),
            two_r: T::default(),
            two_r_is: T::default(),
        };
        src.calc_impedance();
        src
    }

    pub fn set_current(&mut self, current: T) {
        self.is = current;
        self.two_r_is = self.two_r * current;
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    pub fn next_mut(&mut self) -> PortMut<'_, T, Self, N> {
        PortMut::node(self, |s| &s.next, |s| &mut s.next)
    }
}

impl<T: Sample, N: WdfNode<T>> WdfNode<T> for IdealCurrentSource<T, N> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.wdf().r;
        self.wdf.set_impedance(r);
        self.two_r = T::from_f64(2.0) * r;
        self.two_r_is = self.two_r * self.is;
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.two_r_is + self.wdf.a;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.reset();
    }
}

impl_root_process!(IdealCurrentSource<N>);

// ---------------------------------------------------------------------------
// Resistive voltage source
// ---------------------------------------------------------------------------

/// Voltage source with a series resistance.
///
/// `R = Rs`, `b = Vs`
#[derive(Debug, Clone)]
pub struct ResistiveVoltageSource<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    r_value: T,
    vs: T,
}

impl<T: Sample> Default for ResistiveVoltageSource<T> {
    /// Near-ideal: 1 nΩ series resistance.
    fn default() -> Self {
        Self::new(T::from_f64(1.0e-9))
    }
}

impl<T: Sample> ResistiveVoltageSource<T> {
    pub fn new(resistance: T) -> Self {
        let mut src = Self {
            wdf: WdfMembers::default(),
            r_value: resistance,
            vs: T::default(),
        };
        src.calc_impedance();
        src
    }

    pub fn set_resistance_value(&mut self, resistance: T) {
        if resistance.all_eq(self.r_value) {
            return;
        }
        self.r_value = resistance;
        self.propagate_impedance_change();
    }

    #[inline]
    pub fn set_voltage(&mut self, voltage: T) {
        self.vs = voltage;
    }
}

impl<T: Sample> WdfNode<T> for ResistiveVoltageSource<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(self.r_value);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.vs;
        self.wdf.b
    }
}

// ---------------------------------------------------------------------------
// Resistive current source
// ---------------------------------------------------------------------------

/// Current source with a parallel resistance.
///
/// `R = Rp`, `b = Rp * Is`
#[derive(Debug, Clone)]
pub struct ResistiveCurrentSource<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    r_value: T,
    is: T,
}

impl<T: Sample> Default for ResistiveCurrentSource<T> {
    /// Near-ideal: 1 GΩ parallel resistance.
    fn default() -> Self {
        Self::new(T::from_f64(1.0e9))
    }
}

impl<T: Sample> ResistiveCurrentSource<T> {
    pub fn new(resistance: T) -> Self {
        let mut src = Self {
            wdf: WdfMembers::default(),
            r_value: resistance,
            is: T::default(),
        };
        src.calc_impedance();
        src
    }

    pub fn set_resistance_value(&mut self, resistance: T) {
        if resistance.all_eq(self.r_value) {
            return;
        }
        self.r_value = resistance;
        self.propagate_impedance_change();
    }

    #[inline]
    pub fn set_current(&mut self, current: T) {
        self.is = current;
    }
}

impl<T: Sample> WdfNode<T> for ResistiveCurrentSource<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(self.r_value);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.wdf.r * self.is;
        self.wdf.b
    }
}

// ---------------------------------------------------------------------------
// Capacitive voltage source
// ---------------------------------------------------------------------------

/// Voltage source in series with a capacitor.
///
/// `R = 1 / (2 * fs * C)`, `b[n] = a[n-1] + v[n] - v[n-1]`
#[derive(Debug, Clone)]
pub struct CapacitiveVoltageSource<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    c_value: T,
    fs: T,
    z: T,
    v0: T,
    v1: T,
}

impl<T: Sample> Default for CapacitiveVoltageSource<T> {
    /// 1 µF at 48 kHz.
    fn default() -> Self {
        Self::new(T::from_f64(1.0e-6), T::from_f64(48_000.0))
    }
}

impl<T: Sample> CapacitiveVoltageSource<T> {
    pub fn new(capacitance: T, sample_rate: T) -> Self {
        let mut src = Self {
            wdf: WdfMembers::default(),
            c_value: capacitance,
            fs: sample_rate,
            z: T::default(),
            v0: T::default(),
            v1: T::default(),
        };
        src.calc_impedance();
        src
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.fs = sample_rate;
        self.propagate_impedance_change();
        self.reset();
    }

    pub fn set_capacitance_value(&mut self, capacitance: T) {
        if capacitance.all_eq(self.c_value) {
            return;
        }
        self.c_value = capacitance;
        self.propagate_impedance_change();
    }

    #[inline]
    pub fn set_voltage(&mut self, voltage: T) {
        self.v0 = voltage;
    }
}

impl<T: Sample> WdfNode<T> for CapacitiveVoltageSource<T> {
    wdf_members!();

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
        self.wdf.b = self.z + self.v0 - self.v1;
        self.v1 = self.v0;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.v1 = T::default();
        self.wdf.clear_waves();
    }
}

// ---------------------------------------------------------------------------
// Resistive-capacitive voltage source
// ---------------------------------------------------------------------------

/// Voltage source in series with a resistor and a capacitor.
///
/// `R = T/(2C) + Rv`, `k = T / (2*C*Rv)`
/// incident: `z -= k * (a - b)`, reflected: `b = -(z + Vs)`
#[derive(Debug, Clone)]
pub struct ResistiveCapacitiveVoltageSource<T: Sample> {
    pub(crate) wdf: WdfMembers<T>,
    r_value: T,
    c_value: T,
    tt: T,
    k: T,
    z: T,
    vs: T,
}

impl<T: Sample> ResistiveCapacitiveVoltageSource<T> {
    pub fn new(resistance: T, capacitance: T, sample_rate: T) -> Self {
        let mut src = Self {
            wdf: WdfMembers::default(),
            r_value: resistance,
            c_value: capacitance,
            tt: T::from_f64(1.0) / sample_rate,
            k: T::default(),
            z: T::default(),
            vs: T::default(),
        };
        src.calc_impedance();
        src
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

    #[inline]
    pub fn set_voltage(&mut self, voltage: T) {
        self.vs = voltage;
    }
}

impl<T: Sample> WdfNode<T> for ResistiveCapacitiveVoltageSource<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let two_c = T::from_f64(2.0) * self.c_value;
        self.wdf.set_impedance(self.tt / two_c + self.r_value);
        self.k = self.tt / (two_c * self.r_value);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.z = self.z - self.k * (x - self.wdf.b);
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = -(self.z + self.vs);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.z = T::default();
        self.wdf.clear_waves();
    }
}
