//! Shared-handle adaptors. The scattering arithmetic is the same
//! [`junction`](crate::junction) kernel the owned adaptors use.

use super::{connect, Port, Wdf};
use crate::junction::{ParallelJunction, SeriesJunction, YParameterJunction};
use crate::math::Sample;
use crate::wdft::{wdf_members, WdfMembers, WdfNode};

#[inline]
fn child_r<T: Sample>(p: &Port<T>) -> T {
    p.borrow().element.wdf().r
}

#[inline]
fn child_g<T: Sample>(p: &Port<T>) -> T {
    p.borrow().element.wdf().g
}

#[inline]
fn child_b<T: Sample>(p: &Port<T>) -> T {
    p.borrow().element.wdf().b
}

#[inline]
fn child_incident<T: Sample>(p: &Port<T>, x: T) {
    p.borrow_mut().element.incident(x);
}

#[inline]
fn child_reflected<T: Sample>(p: &Port<T>) -> T {
    p.borrow_mut().element.reflected()
}

/// Wire `children` under a freshly built adaptor and adapt it once.
fn adopt<T: Sample, E: WdfNode<T> + 'static>(
    element: E,
    kind: &'static str,
    children: &[&Port<T>],
) -> Wdf<T, E> {
    let node = Wdf::leaf(element, kind);
    let port = node.port();
    for child in children {
        connect(child, &port);
    }
    node.update(|e| e.calc_impedance());
    log::trace!("built {kind} adaptor, R = {:?}", node.impedance());
    node
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

pub struct SeriesNode<T: Sample> {
    wdf: WdfMembers<T>,
    port1: Port<T>,
    port2: Port<T>,
    junction: SeriesJunction<T>,
}

pub type WdfSeries<T> = Wdf<T, SeriesNode<T>>;

impl<T: Sample> Wdf<T, SeriesNode<T>> {
    pub fn new(port1: Port<T>, port2: Port<T>) -> Self {
        let element = SeriesNode {
            wdf: WdfMembers::default(),
            port1: port1.clone(),
            port2: port2.clone(),
            junction: SeriesJunction::default(),
        };
        adopt(element, "series", &[&port1, &port2])
    }
}

impl<T: Sample> WdfNode<T> for SeriesNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self
            .junction
            .adapt(child_r(&self.port1), child_r(&self.port2));
        self.wdf.set_impedance(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        let (a1, a2) = self
            .junction
            .incident(x, child_b(&self.port1), child_b(&self.port2));
        child_incident(&self.port1, a1);
        child_incident(&self.port2, a2);
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        let b1 = child_reflected(&self.port1);
        let b2 = child_reflected(&self.port2);
        self.wdf.b = SeriesJunction::reflected(b1, b2);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.borrow_mut().element.reset();
        self.port2.borrow_mut().element.reset();
    }
}

// ---------------------------------------------------------------------------
// Parallel
// ---------------------------------------------------------------------------

pub struct ParallelNode<T: Sample> {
    wdf: WdfMembers<T>,
    port1: Port<T>,
    port2: Port<T>,
    junction: ParallelJunction<T>,
}

pub type WdfParallel<T> = Wdf<T, ParallelNode<T>>;

impl<T: Sample> Wdf<T, ParallelNode<T>> {
    pub fn new(port1: Port<T>, port2: Port<T>) -> Self {
        let element = ParallelNode {
            wdf: WdfMembers::default(),
            port1: port1.clone(),
            port2: port2.clone(),
            junction: ParallelJunction::default(),
        };
        adopt(element, "parallel", &[&port1, &port2])
    }
}

impl<T: Sample> WdfNode<T> for ParallelNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let g = self
            .junction
            .adapt(child_g(&self.port1), child_g(&self.port2));
        self.wdf.set_admittance(g);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        let (a1, a2) = self.junction.incident(x);
        child_incident(&self.port1, a1);
        child_incident(&self.port2, a2);
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        let b1 = child_reflected(&self.port1);
        let b2 = child_reflected(&self.port2);
        self.wdf.b = self.junction.reflected(b1, b2);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.borrow_mut().element.reset();
        self.port2.borrow_mut().element.reset();
    }
}

// ---------------------------------------------------------------------------
// Polarity inverter
// ---------------------------------------------------------------------------

pub struct InverterNode<T: Sample> {
    wdf: WdfMembers<T>,
    port1: Port<T>,
}

pub type PolarityInverter<T> = Wdf<T, InverterNode<T>>;

impl<T: Sample> Wdf<T, InverterNode<T>> {
    pub fn new(port1: Port<T>) -> Self {
        let element = InverterNode {
            wdf: WdfMembers::default(),
            port1: port1.clone(),
        };
        adopt(element, "inverter", &[&port1])
    }
}

impl<T: Sample> WdfNode<T> for InverterNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = child_r(&self.port1);
        self.wdf.set_impedance(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        child_incident(&self.port1, -x);
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = -child_reflected(&self.port1);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.borrow_mut().element.reset();
    }
}

// ---------------------------------------------------------------------------
// Y-parameter
// ---------------------------------------------------------------------------

pub struct YParameterNode<T: Sample> {
    wdf: WdfMembers<T>,
    port1: Port<T>,
    junction: YParameterJunction<T>,
}

pub type YParameter<T> = Wdf<T, YParameterNode<T>>;

impl<T: Sample> Wdf<T, YParameterNode<T>> {
    pub fn new(port1: Port<T>, y11: T, y12: T, y21: T, y22: T) -> Self {
        let element = YParameterNode {
            wdf: WdfMembers::default(),
            port1: port1.clone(),
            junction: YParameterJunction::new(y11, y12, y21, y22),
        };
        adopt(element, "y_parameter", &[&port1])
    }
}

impl<T: Sample> WdfNode<T> for YParameterNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.junction.adapt(child_r(&self.port1));
        self.wdf.set_impedance(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        let a1 = self.junction.incident(x, child_b(&self.port1));
        child_incident(&self.port1, a1);
    }

    #[inline]
    fn reflected(&mut self) -> T {
        let b1 = child_reflected(&self.port1);
        self.wdf.b = self.junction.reflected(b1);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.borrow_mut().element.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wdf::{IdealVoltageSource, Resistor};

    #[test]
    fn voltage_divider() {
        let r1: Resistor<f64> = Resistor::new(10_000.0);
        let r2 = Resistor::new(10_000.0);
        let s = WdfSeries::new(r1.port(), r2.port());
        let inv = PolarityInverter::new(s.port());
        let vs = IdealVoltageSource::new(inv.port());

        vs.set_voltage(10.0);
        vs.process();
        assert_eq!(r2.voltage(), 5.0);

        r2.set_resistance_value(30_000.0);
        assert_eq!(vs.impedance(), 40_000.0);
        vs.process();
        assert!((r2.voltage() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn current_divider() {
        let r1: Resistor<f64> = Resistor::new(30.0);
        let r2 = Resistor::new(30.0);
        let p = WdfParallel::new(r1.port(), r2.port());
        let is = crate::wdf::IdealCurrentSource::new(p.port());
        is.set_current(1.0);
        is.process();
        assert!((r2.current() - 0.5).abs() < 1e-9);
    }
}
