//! Nonlinear roots: diodes, diode pairs and an ideal switch.
//!
//! The Shockley diode has an explicit wave-domain solution in terms of the
//! Wright omega function (Werner et al., "An Improved and Generalized Diode
//! Clipper Model for Wave Digital Filters", AES 2015). With `omega4` in place
//! of an iterative solver every sample costs the same, which keeps the tree
//! real-time safe.

use super::{impl_root_process, wdf_members, PortMut, WdfMembers, WdfNode};
use crate::math::omega::omega4;
use crate::math::Sample;

/// Room-temperature thermal voltage (V).
pub const THERMAL_VOLTAGE: f64 = 25.85e-3;

// ---------------------------------------------------------------------------
// Diode Models
// ---------------------------------------------------------------------------

/// Shockley parameters for common clipping diodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiodeModel {
    /// Saturation current (A).
    pub is: f64,
    /// Thermal voltage times ideality factor (V).
    pub n_vt: f64,
}

impl DiodeModel {
    /// 1N4148-class small-signal silicon diode.
    pub fn silicon() -> Self {
        Self {
            is: 2.52e-9,
            n_vt: 1.752 * THERMAL_VOLTAGE,
        }
    }

    /// 1N34A-class germanium diode. Softer knee around 0.3 V.
    pub fn germanium() -> Self {
        Self {
            is: 1.0e-6,
            n_vt: 1.3 * THERMAL_VOLTAGE,
        }
    }

    /// Red LED, forward voltage near 1.7 V.
    pub fn led() -> Self {
        Self {
            is: 4.5e-17,
            n_vt: 2.0 * THERMAL_VOLTAGE,
        }
    }

    /// Look up a preset by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "silicon" | "1n4148" => Some(Self::silicon()),
            "germanium" | "1n34a" => Some(Self::germanium()),
            "led" => Some(Self::led()),
            _ => None,
        }
    }
}

/// Accuracy of the diode-pair closed form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiodeQuality {
    /// One omega evaluation per sample (Werner eqn. 18).
    Good,
    /// Two omega evaluations, symmetric in `a` (Werner eqn. 39).
    #[default]
    Best,
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

/// Diode-pair wave solver, shared by the owned and shared-handle trees.
#[derive(Debug, Clone, Copy)]
pub struct DiodePairSolver<T: Sample> {
    is: T,
    vt: T,
    two_vt: T,
    one_over_vt: T,
    r_is: T,
    r_is_over_vt: T,
    log_r_is_over_vt: T,
    quality: DiodeQuality,
}

impl<T: Sample> DiodePairSolver<T> {
    pub fn new(is: T, vt: T, n_diodes: T, quality: DiodeQuality) -> Self {
        let mut s = Self {
            is,
            vt,
            two_vt: T::default(),
            one_over_vt: T::default(),
            r_is: T::default(),
            r_is_over_vt: T::default(),
            log_r_is_over_vt: T::default(),
            quality,
        };
        s.set_parameters(is, vt, n_diodes);
        s
    }

    /// Store the parameters. Call [`adapt`](Self::adapt) afterwards.
    pub fn set_parameters(&mut self, is: T, vt: T, n_diodes: T) {
        self.is = is;
        self.vt = n_diodes * vt;
        self.two_vt = T::from_f64(2.0) * self.vt;
        self.one_over_vt = T::from_f64(1.0) / self.vt;
    }

    pub fn set_quality(&mut self, quality: DiodeQuality) {
        self.quality = quality;
    }

    /// Precompute the impedance-dependent terms for a port resistance `r`.
    #[inline]
    pub fn adapt(&mut self, r: T) {
        self.r_is = r * self.is;
        self.r_is_over_vt = self.r_is * self.one_over_vt;
        self.log_r_is_over_vt = self.r_is_over_vt.simd_ln();
    }

    #[inline]
    pub fn reflect(&self, a: T) -> T {
        let lambda = a.sign();
        match self.quality {
            DiodeQuality::Good => {
                let arg = self.log_r_is_over_vt + lambda * a * self.one_over_vt + self.r_is_over_vt;
                a + T::from_f64(2.0) * lambda * (self.r_is - self.vt * omega4(arg))
            }
            DiodeQuality::Best => {
                let lambda_a_over_vt = lambda * a * self.one_over_vt;
                a - self.two_vt
                    * lambda
                    * (omega4(self.log_r_is_over_vt + lambda_a_over_vt)
                        - omega4(self.log_r_is_over_vt - lambda_a_over_vt))
            }
        }
    }
}

/// Single-diode wave solver.
#[derive(Debug, Clone, Copy)]
pub struct DiodeSolver<T: Sample> {
    is: T,
    two_vt: T,
    one_over_vt: T,
    two_r_is: T,
    r_is_over_vt: T,
    log_r_is_over_vt: T,
}

impl<T: Sample> DiodeSolver<T> {
    pub fn new(is: T, vt: T, n_diodes: T) -> Self {
        let mut s = Self {
            is,
            two_vt: T::default(),
            one_over_vt: T::default(),
            two_r_is: T::default(),
            r_is_over_vt: T::default(),
            log_r_is_over_vt: T::default(),
        };
        s.set_parameters(is, vt, n_diodes);
        s
    }

    pub fn set_parameters(&mut self, is: T, vt: T, n_diodes: T) {
        let vt = n_diodes * vt;
        self.is = is;
        self.two_vt = T::from_f64(2.0) * vt;
        self.one_over_vt = T::from_f64(1.0) / vt;
    }

    #[inline]
    pub fn adapt(&mut self, r: T) {
        self.two_r_is = T::from_f64(2.0) * r * self.is;
        self.r_is_over_vt = r * self.is * self.one_over_vt;
        self.log_r_is_over_vt = self.r_is_over_vt.simd_ln();
    }

    #[inline]
    pub fn reflect(&self, a: T) -> T {
        a + self.two_r_is
            - self.two_vt * omega4(self.log_r_is_over_vt + a * self.one_over_vt + self.r_is_over_vt)
    }
}

// ---------------------------------------------------------------------------
// Diode pair (root)
// ---------------------------------------------------------------------------

/// Two anti-parallel diodes closing a tree: the classic symmetric clipper.
#[derive(Debug, Clone)]
pub struct DiodePair<T: Sample, N: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    next: N,
    solver: DiodePairSolver<T>,
}

impl<T: Sample, N: WdfNode<T>> DiodePair<T, N> {
    /// Single diode per direction at room temperature, best quality.
    pub fn new(next: N, is: T) -> Self {
        Self::with_params(
            next,
            is,
            T::from_f64(THERMAL_VOLTAGE),
            T::from_f64(1.0),
            DiodeQuality::Best,
        )
    }

    pub fn with_params(mut next: N, is: T, vt: T, n_diodes: T, quality: DiodeQuality) -> Self {
        next.wdf_mut().take_changed();
        let mut dp = Self {
            wdf: WdfMembers::default(),
            next,
            solver: DiodePairSolver::new(is, vt, n_diodes, quality),
        };
        dp.calc_impedance();
        dp
    }

    pub fn with_model(next: N, model: DiodeModel, n_diodes: T, quality: DiodeQuality) -> Self {
        Self::with_params(
            next,
            T::from_f64(model.is),
            T::from_f64(model.n_vt),
            n_diodes,
            quality,
        )
    }

    /// `vt` is per diode; `n_diodes` in series multiplies it.
    pub fn set_diode_parameters(&mut self, is: T, vt: T, n_diodes: T) {
        self.solver.set_parameters(is, vt, n_diodes);
        self.calc_impedance();
    }

    pub fn set_quality(&mut self, quality: DiodeQuality) {
        self.solver.set_quality(quality);
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    pub fn next_mut(&mut self) -> PortMut<'_, T, Self, N> {
        PortMut::node(self, |s| &s.next, |s| &mut s.next)
    }
}

impl<T: Sample, N: WdfNode<T>> WdfNode<T> for DiodePair<T, N> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.wdf().r;
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
        self.next.reset();
    }
}

impl_root_process!(DiodePair<N>);

// ---------------------------------------------------------------------------
// Diode (root)
// ---------------------------------------------------------------------------

/// Single Shockley diode closing a tree.
#[derive(Debug, Clone)]
pub struct Diode<T: Sample, N: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    next: N,
    solver: DiodeSolver<T>,
}

impl<T: Sample, N: WdfNode<T>> Diode<T, N> {
    pub fn new(next: N, is: T) -> Self {
        Self::with_params(next, is, T::from_f64(THERMAL_VOLTAGE), T::from_f64(1.0))
    }

    pub fn with_params(mut next: N, is: T, vt: T, n_diodes: T) -> Self {
        next.wdf_mut().take_changed();
        let mut d = Self {
            wdf: WdfMembers::default(),
            next,
            solver: DiodeSolver::new(is, vt, n_diodes),
        };
        d.calc_impedance();
        d
    }

    pub fn set_diode_parameters(&mut self, is: T, vt: T, n_diodes: T) {
        self.solver.set_parameters(is, vt, n_diodes);
        self.calc_impedance();
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    pub fn next_mut(&mut self) -> PortMut<'_, T, Self, N> {
        PortMut::node(self, |s| &s.next, |s| &mut s.next)
    }
}

impl<T: Sample, N: WdfNode<T>> WdfNode<T> for Diode<T, N> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.next.wdf().r;
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
        self.next.reset();
    }
}

impl_root_process!(Diode<N>);

// ---------------------------------------------------------------------------
// Switch (root)
// ---------------------------------------------------------------------------

/// Ideal switch closing a tree. Closed acts as a short, open as an open
/// circuit.
#[derive(Debug, Clone)]
pub struct Switch<T: Sample, N: WdfNode<T>> {
    pub(crate) wdf: WdfMembers<T>,
    next: N,
    closed: bool,
}

impl<T: Sample, N: WdfNode<T>> Switch<T, N> {
    /// Starts closed.
    pub fn new(mut next: N) -> Self {
        next.wdf_mut().take_changed();
        let mut sw = Self {
            wdf: WdfMembers::default(),
            next,
            closed: true,
        };
        sw.calc_impedance();
        sw
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    pub fn next_mut(&mut self) -> PortMut<'_, T, Self, N> {
        PortMut::node(self, |s| &s.next, |s| &mut s.next)
    }
}

impl<T: Sample, N: WdfNode<T>> WdfNode<T> for Switch<T, N> {
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
        self.wdf.b = if self.closed { -self.wdf.a } else { self.wdf.a };
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.next.reset();
    }
}

impl_root_process!(Switch<N>);
