//! Shared-handle sources: resistive leaves and ideal roots.

use super::one_ports::shared_leaf;
use super::{make_root, DynRoot, Port, Wdf};
use crate::math::Sample;
use crate::wdft::{self, wdf_members, WdfMembers, WdfNode};

shared_leaf!(
    ResistiveVoltageSource,
    "resistive_voltage_source",
    new(resistance),
    set_resistance_value,
    set_voltage,
);

shared_leaf!(
    ResistiveCurrentSource,
    "resistive_current_source",
    new(resistance),
    set_resistance_value,
    set_current,
);

shared_leaf!(
    CapacitiveVoltageSource,
    "capacitive_voltage_source",
    new(capacitance, sample_rate),
    set_capacitance_value,
    set_voltage,
    prepare,
);

shared_leaf!(
    ResistiveCapacitiveVoltageSource,
    "rc_voltage_source",
    new(resistance, capacitance, sample_rate),
    set_resistance_value,
    set_capacitance_value,
    set_voltage,
    prepare,
);

// ---------------------------------------------------------------------------
// Ideal voltage source (root)
// ---------------------------------------------------------------------------

pub struct IdealVoltageSourceNode<T: Sample> {
    wdf: WdfMembers<T>,
    next: Port<T>,
    vs: T,
}

/// Ideal voltage source closing a shared-handle tree.
pub type IdealVoltageSource<T> = Wdf<T, IdealVoltageSourceNode<T>>;

impl<T: Sample> Wdf<T, IdealVoltageSourceNode<T>> {
    pub fn new(next: Port<T>) -> Self {
        let mut element = IdealVoltageSourceNode {
            wdf: WdfMembers::default(),
            next: next.clone(),
            vs: T::default(),
        };
        element.calc_impedance();
        make_root(element, "ideal_voltage_source", &next)
    }

    pub fn set_voltage(&self, voltage: T) {
        self.update(|e| e.vs = voltage);
    }
}

impl<T: Sample> WdfNode<T> for IdealVoltageSourceNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.borrow().element.wdf().r;
        self.wdf.set_impedance(r);
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
        self.next.borrow_mut().element.reset();
    }
}

impl<T: Sample> DynRoot<T> for IdealVoltageSourceNode<T> {
    fn next_port(&self) -> &Port<T> {
        &self.next
    }
}

// ---------------------------------------------------------------------------
// Ideal current source (root)
// ---------------------------------------------------------------------------

pub struct IdealCurrentSourceNode<T: Sample> {
    wdf: WdfMembers<T>,
    next: Port<T>,
    is: T,
    two_r: T,
}

/// Ideal current source closing a shared-handle tree.
pub type IdealCurrentSource<T> = Wdf<T, IdealCurrentSourceNode<T>>;

impl<T: Sample> Wdf<T, IdealCurrentSourceNode<T>> {
    pub fn new(next: Port<T>) -> Self {
        let mut element = IdealCurrentSourceNode {
            wdf: WdfMembers::default(),
            next: next.clone(),
            is: T::default(),
            two_r: T::default(),
        };
        element.calc_impedance();
        make_root(element, "ideal_current_source", &next)
    }

    pub fn set_current(&self, current: T) {
        self.update(|e| e.is = current);
    }
}

impl<T: Sample> WdfNode<T> for IdealCurrentSourceNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.borrow().element.wdf().r;
        self.wdf.set_impedance(r);
        self.two_r = T::from_f64(2.0) * r;
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.two_r * self.is + self.wdf.a;
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.borrow_mut().element.reset();
    }
}

impl<T: Sample> DynRoot<T> for IdealCurrentSourceNode<T> {
    fn next_port(&self) -> &Port<T> {
        &self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wdf::Resistor;

    #[test]
    fn voltage_source_drives_a_resistor() {
        let r: Resistor<f64> = Resistor::new(1000.0);
        let vs = IdealVoltageSource::new(r.port());
        vs.set_voltage(3.0);
        vs.process();
        assert!((r.voltage() - 3.0).abs() < 1e-12);
        assert!((r.current() - 3.0e-3).abs() < 1e-12);
    }

    #[test]
    fn current_source_tracks_load_changes() {
        let r: Resistor<f64> = Resistor::new(1000.0);
        let is = IdealCurrentSource::new(r.port());
        is.set_current(2.0e-3);
        is.process();
        assert!((r.voltage() - 2.0).abs() < 1e-9);

        r.set_resistance_value(500.0);
        assert_eq!(is.impedance(), 500.0);
        is.process();
        assert!((r.voltage() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn resistive_source_into_resistor() {
        let rvs = ResistiveVoltageSource::new(1000.0);
        let load: Resistor<f64> = Resistor::new(1000.0);
        let s = crate::wdf::WdfSeries::new(rvs.port(), load.port());
        let root = crate::wdf::Switch::new(s.port());
        rvs.set_voltage(2.0);
        root.process();
        assert!((load.voltage() + 1.0).abs() < 1e-9);
    }
}
