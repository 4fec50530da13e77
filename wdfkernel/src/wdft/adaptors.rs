//! Two-port adaptors that join subtrees into one port.
//!
//! Each adaptor owns its children. Mutable access goes through
//! `port1_mut()` / `port2_mut()`, whose guards recompute this adaptor's
//! impedance when a child's impedance changes.

use super::{wdf_members, PortMut, WdfMembers, WdfNode};
use crate::junction::{ParallelJunction, SeriesJunction, YParameterJunction};
use crate::math::Sample;

// ---------------------------------------------------------------------------
// Series adaptor
// ---------------------------------------------------------------------------

/// Series connection of two ports.
#[derive(Debug, Clone)]
pub struct WdfSeries<T: Sample, P1: WdfNode<T>, P2: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    port1: P1,
    port2: P2,
    junction: SeriesJunction<T>,
}

impl<T: Sample, P1: WdfNode<T>, P2: WdfNode<T>> WdfSeries<T, P1, P2> {
    pub fn new(mut port1: P1, mut port2: P2) -> Self {
        port1.wdf_mut().take_changed();
        port2.wdf_mut().take_changed();
        let mut s = Self {
            wdf: WdfMembers::default(),
            port1,
            port2,
            junction: SeriesJunction::default(),
        };
        s.calc_impedance();
        s
    }

    pub fn port1(&self) -> &P1 {
        &self.port1
    }

    pub fn port2(&self) -> &P2 {
        &self.port2
    }

    pub fn port1_mut(&mut self) -> PortMut<'_, T, Self, P1> {
        PortMut::node(self, |s| &s.port1, |s| &mut s.port1)
    }

    pub fn port2_mut(&mut self) -> PortMut<'_, T, Self, P2> {
        PortMut::node(self, |s| &s.port2, |s| &mut s.port2)
    }

    /// Both children, bypassing propagation. Pair with a defer scope.
    pub fn ports_mut_unchecked(&mut self) -> (&mut P1, &mut P2) {
        (&mut self.port1, &mut self.port2)
    }
}

impl<T: Sample, P1: WdfNode<T>, P2: WdfNode<T>> WdfNode<T> for WdfSeries<T, P1, P2> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self
            .junction
            .adapt(self.port1.wdf().r, self.port2.wdf().r);
        self.wdf.set_impedance(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        let (a1, a2) = self
            .junction
            .incident(x, self.port1.wdf().b, self.port2.wdf().b);
        self.port1.incident(a1);
        self.port2.incident(a2);
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        let b1 = self.port1.reflected();
        let b2 = self.port2.reflected();
        self.wdf.b = SeriesJunction::reflected(b1, b2);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.reset();
        self.port2.reset();
    }
}

// ---------------------------------------------------------------------------
// Parallel adaptor
// ---------------------------------------------------------------------------

/// Parallel connection of two ports.
#[derive(Debug, Clone)]
pub struct WdfParallel<T: Sample, P1: WdfNode<T>, P2: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    port1: P1,
    port2: P2,
    junction: ParallelJunction<T>,
}

impl<T: Sample, P1: WdfNode<T>, P2: WdfNode<T>> WdfParallel<T, P1, P2> {
    pub fn new(mut port1: P1, mut port2: P2) -> Self {
        port1.wdf_mut().take_changed();
        port2.wdf_mut().take_changed();
        let mut p = Self {
            wdf: WdfMembers::default(),
            port1,
            port2,
            junction: ParallelJunction::default(),
        };
        p.calc_impedance();
        p
    }

    pub fn port1(&self) -> &P1 {
        &self.port1
    }

    pub fn port2(&self) -> &P2 {
        &self.port2
    }

    pub fn port1_mut(&mut self) -> PortMut<'_, T, Self, P1> {
        PortMut::node(self, |s| &s.port1, |s| &mut s.port1)
    }

    pub fn port2_mut(&mut self) -> PortMut<'_, T, Self, P2> {
        PortMut::node(self, |s| &s.port2, |s| &mut s.port2)
    }

    pub fn ports_mut_unchecked(&mut self) -> (&mut P1, &mut P2) {
        (&mut self.port1, &mut self.port2)
    }
}

impl<T: Sample, P1: WdfNode<T>, P2: WdfNode<T>> WdfNode<T> for WdfParallel<T, P1, P2> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let g = self
            .junction
            .adapt(self.port1.wdf().g, self.port2.wdf().g);
        self.wdf.set_admittance(g);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        let (a1, a2) = self.junction.incident(x);
        self.port1.incident(a1);
        self.port2.incident(a2);
        self.wdf.a = x;
    }

    #[inline]
    fn reflected(&mut self) -> T {
        let b1 = self.port1.reflected();
        let b2 = self.port2.reflected();
        self.wdf.b = self.junction.reflected(b1, b2);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.reset();
        self.port2.reset();
    }
}

// ---------------------------------------------------------------------------
// Polarity inverter
// ---------------------------------------------------------------------------

/// Flips the sign of both waves. Impedance passes through unchanged.
#[derive(Debug, Clone)]
pub struct PolarityInverter<T: Sample, P: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    port1: P,
}

impl<T: Sample, P: WdfNode<T>> PolarityInverter<T, P> {
    pub fn new(mut port1: P) -> Self {
        port1.wdf_mut().take_changed();
        let mut inv = Self {
            wdf: WdfMembers::default(),
            port1,
        };
        inv.calc_impedance();
        inv
    }

    pub fn port1(&self) -> &P {
        &self.port1
    }

    pub fn port1_mut(&mut self) -> PortMut<'_, T, Self, P> {
        PortMut::node(self, |s| &s.port1, |s| &mut s.port1)
    }
}

impl<T: Sample, P: WdfNode<T>> WdfNode<T> for PolarityInverter<T, P> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        self.wdf.set_impedance(self.port1.wdf().r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        self.port1.incident(-x);
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = -self.port1.reflected();
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.reset();
    }
}

// ---------------------------------------------------------------------------
// Y-parameter two-port
// ---------------------------------------------------------------------------

/// Linear two-port defined by admittance parameters, wrapping one child.
#[derive(Debug, Clone)]
pub struct YParameter<T: Sample, P: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    port1: P,
    junction: YParameterJunction<T>,
}

impl<T: Sample, P: WdfNode<T>> YParameter<T, P> {
    pub fn new(mut port1: P, y11: T, y12: T, y21: T, y22: T) -> Self {
        port1.wdf_mut().take_changed();
        let mut y = Self {
            wdf: WdfMembers::default(),
            port1,
            junction: YParameterJunction::new(y11, y12, y21, y22),
        };
        y.calc_impedance();
        y
    }

    pub fn port1(&self) -> &P {
        &self.port1
    }

    pub fn port1_mut(&mut self) -> PortMut<'_, T, Self, P> {
        PortMut::node(self, |s| &s.port1, |s| &mut s.port1)
    }
}

impl<T: Sample, P: WdfNode<T>> WdfNode<T> for YParameter<T, P> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.junction.adapt(self.port1.wdf().r);
        self.wdf.set_impedance(r);
    }

    #[inline]
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
        let a1 = self.junction.incident(x, self.port1.wdf().b);
        self.port1.incident(a1);
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.wdf.b = self.junction.reflected(self.port1.reflected());
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.port1.reset();
    }
}
