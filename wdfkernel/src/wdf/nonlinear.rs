//! Shared-handle nonlinear roots. The wave solvers are shared with the
//! owned tree.

use super::{make_root, DynRoot, Port, Wdf};
use crate::math::Sample;
use crate::wdft::{
    wdf_members, DiodeModel, DiodePairSolver, DiodeQuality, DiodeSolver, WdfMembers, WdfNode,
    THERMAL_VOLTAGE,
};

macro_rules! root_plumbing {
    ($node:ident) => {
        impl<T: Sample> DynRoot<T> for $node<T> {
            fn next_port(&self) -> &Port<T> {
                &self.next
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Diode pair
// ---------------------------------------------------------------------------

pub struct DiodePairNode<T: Sample> {
    wdf: WdfMembers<T>,
    next: Port<T>,
    solver: DiodePairSolver<T>,
}

pub type DiodePair<T> = Wdf<T, DiodePairNode<T>>;

impl<T: Sample> Wdf<T, DiodePairNode<T>> {
    pub fn new(next: Port<T>, is: T) -> Self {
        Self::with_params(
            next,
            is,
            T::from_f64(THERMAL_VOLTAGE),
            T::from_f64(1.0),
            DiodeQuality::Best,
        )
    }

    pub fn with_params(next: Port<T>, is: T, vt: T, n_diodes: T, quality: DiodeQuality) -> Self {
        let mut element = DiodePairNode {
            wdf: WdfMembers::default(),
            next: next.clone(),
            solver: DiodePairSolver::new(is, vt, n_diodes, quality),
        };
        element.calc_impedance();
        make_root(element, "diode_pair", &next)
    }

    pub fn with_model(next: Port<T>, model: DiodeModel, n_diodes: T, quality: DiodeQuality) -> Self {
        Self::with_params(
            next,
            T::from_f64(model.is),
            T::from_f64(model.n_vt),
            n_diodes,
            quality,
        )
    }

    pub fn set_diode_parameters(&self, is: T, vt: T, n_diodes: T) {
        self.update(|e| {
            e.solver.set_parameters(is, vt, n_diodes);
            e.calc_impedance();
        });
    }

    pub fn set_quality(&self, quality: DiodeQuality) {
        self.update(|e| e.solver.set_quality(quality));
    }
}

impl<T: Sample> WdfNode<T> for DiodePairNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.borrow().element.wdf().r;
        self.wdf.set_impedance(r);
        self.solver.adapt(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.solver.reflect(self.wdf.a);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.borrow_mut().element.reset();
    }
}

root_plumbing!(DiodePairNode);

// ---------------------------------------------------------------------------
// Diode
// ---------------------------------------------------------------------------

pub struct DiodeNode<T: Sample> {
    wdf: WdfMembers<T>,
    next: Port<T>,
    solver: DiodeSolver<T>,
}

pub type Diode<T> = Wdf<T, DiodeNode<T>>;

impl<T: Sample> Wdf<T, DiodeNode<T>> {
    pub fn new(next: Port<T>, is: T) -> Self {
        Self::with_params(next, is, T::from_f64(THERMAL_VOLTAGE), T::from_f64(1.0))
    }

    pub fn with_params(next: Port<T>, is: T, vt: T, n_diodes: T) -> Self {
        let mut element = DiodeNode {
            wdf: WdfMembers::default(),
            next: next.clone(),
            solver: DiodeSolver::new(is, vt, n_diodes),
        };
        element.calc_impedance();
        make_root(element, "diode", &next)
    }

    pub fn set_diode_parameters(&self, is: T, vt: T, n_diodes: T) {
        self.update(|e| {
            e.solver.set_parameters(is, vt, n_diodes);
            e.calc_impedance();
        });
    }
}

impl<T: Sample> WdfNode<T> for DiodeNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.borrow().element.wdf().r;
        self.wdf.set_impedance(r);
        self.solver.adapt(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.solver.reflect(self.wdf.a);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.borrow_mut().element.reset();
    }
}

root_plumbing!(DiodeNode);

// ---------------------------------------------------------------------------
// Switch
// ---------------------------------------------------------------------------

pub struct SwitchNode<T: Sample> {
    wdf: WdfMembers<T>,
    next: Port<T>,
    closed: bool,
}

pub type Switch<T> = Wdf<T, SwitchNode<T>>;

impl<T: Sample> Wdf<T, SwitchNode<T>> {
    /// Starts closed.
    pub fn new(next: Port<T>) -> Self {
        let mut element = SwitchNode {
            wdf: WdfMembers::default(),
            next: next.clone(),
            closed: true,
        };
        element.calc_impedance();
        make_root(element, "switch", &next)
    }

    pub fn set_closed(&self, closed: bool) {
        self.update(|e| e.closed = closed);
    }

    pub fn is_closed(&self) -> bool {
        self.with(|e| e.closed)
    }
}

impl<T: Sample> WdfNode<T> for SwitchNode<T> {
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
        self.wdf.b = if self.closed { -self.wdf.a } else { self.wdf.a };
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.borrow_mut().element.reset();
    }
}

root_plumbing!(SwitchNode);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wdf::{PolarityInverter, ResistiveCurrentSource, ResistiveVoltageSource, Resistor};

    #[test]
    fn shockley_diode_current() {
        let is = 1.0e-7;
        let v = -0.35;
        let vs = ResistiveVoltageSource::new(1.0e-9);
        let inv = PolarityInverter::new(vs.port());
        let d = Diode::new(inv.port(), is);

        vs.set_voltage(v);
        d.process();
        let expected = is * ((-v / THERMAL_VOLTAGE).exp() - 1.0);
        assert!((d.current() - expected).abs() < 1.0e-3);
    }

    #[test]
    fn switch_gates_a_current_source() {
        let r1: Resistor<f64> = Resistor::new(10_000.0);
        let src = ResistiveCurrentSource::new(1.0e9);
        let s1 = crate::wdf::WdfSeries::new(r1.port(), src.port());
        let sw = Switch::new(s1.port());

        src.set_current(1.0);
        sw.set_closed(true);
        sw.process();
        assert!((r1.current() + 1.0).abs() < 1.0e-3);

        sw.set_closed(false);
        sw.process();
        assert_eq!(r1.current(), 0.0);
        assert!(!sw.is_closed());
    }
}
