//! Adaptable R-type junction: N ports, one of them facing the parent.

use super::matrix::ScatteringMatrix;
use super::ports::PortTuple;
use crate::math::Sample;
use crate::wdft::{wdf_members, PortMut, WdfMembers, WdfNode};

/// Recomputes an adaptable junction from its down-port impedances.
///
/// Receives the `N - 1` down impedances in tuple order, should load the
/// scattering matrix and returns the resistance that adapts the up port.
pub trait ImpedanceCalculator<T: Sample, const N: usize> {
    fn calc_impedance(&mut self, down: &[T], s: &mut ScatteringMatrix<T, N>) -> T;
}

impl<T: Sample, const N: usize, F> ImpedanceCalculator<T, N> for F
where
    F: FnMut(&[T], &mut ScatteringMatrix<T, N>) -> T,
{
    fn calc_impedance(&mut self, down: &[T], s: &mut ScatteringMatrix<T, N>) -> T {
        self(down, s)
    }
}

/// R-type junction used as an ordinary port inside a larger tree.
///
/// Matrix slot `up` faces the parent; tuple entry `i` maps to slot `i` below
/// `up` and `i + 1` from `up` onwards.
pub struct RtypeAdaptor<T, P, C, const N: usize>
where
    T: Sample,
    P: PortTuple<T>,
    C: ImpedanceCalculator<T, N>,
{
    pub(crate) wdf: WdfMembers<T>,
    ports: P,
    calculator: C,
    up: usize,
    s: ScatteringMatrix<T, N>,
    a: [T; N],
    b: [T; N],
}

impl<T, P, C, const N: usize> RtypeAdaptor<T, P, C, N>
where
    T: Sample,
    P: PortTuple<T>,
    C: ImpedanceCalculator<T, N>,
{
    /// # Panics
    ///
    /// If `up >= N`.
    pub fn new(mut ports: P, up: usize, calculator: C) -> Self {
        const { assert!(P::LEN + 1 == N, "port tuple must hold N - 1 down ports") };
        assert!(up < N, "up port index {up} out of range for {N} ports");
        ports.take_changed();
        let mut rt = Self {
            wdf: WdfMembers::default(),
            ports,
            calculator,
            up,
            s: ScatteringMatrix::default(),
            a: [T::default(); N],
            b: [T::default(); N],
        };
        rt.calc_impedance();
        rt
    }

    pub fn up_port(&self) -> usize {
        self.up
    }

    pub fn set_s_matrix_data(&mut self, s: &[[T; N]; N]) {
        self.s.set_s_matrix_data(s);
    }

    pub fn scattering_matrix(&self) -> &ScatteringMatrix<T, N> {
        &self.s
    }

    pub fn is_configured(&self) -> bool {
        self.s.is_configured()
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> PortMut<'_, T, Self, P> {
        PortMut::new(self, |s| &s.ports, |s| &mut s.ports, P::take_changed)
    }
}

impl<T, P, C, const N: usize> WdfNode<T> for RtypeAdaptor<T, P, C, N>
where
    T: Sample,
    P: PortTuple<T>,
    C: ImpedanceCalculator<T, N>,
{
    wdf_members!();

    fn calc_impedance(&mut self) {
        let mut down = [T::default(); N];
        self.ports.impedances(&mut down);
        let r = self.calculator.calc_impedance(&down[..N - 1], &mut self.s);
        self.wdf.set_impedance(r);
    }

    /// # Panics
    ///
    /// If no scattering matrix has been set.
    #[inline]
    fn incident(&mut self, x: T) {
        assert!(
            self.s.is_configured(),
            "RtypeAdaptor::incident called before set_s_matrix_data"
        );
        self.wdf.a = x;
        self.a[self.up] = x;
        self.s.scatter(&self.a, &mut self.b);
        self.ports.incident_down(&self.b, self.up);
    }

    #[inline]
    fn reflected(&mut self) -> T {
        self.ports.reflected_down(&mut self.a, self.up);
        // the up row ignores a[up] once the port is adapted
        self.wdf.b = self.s.scatter_row(self.up, &self.a);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.a = [T::default(); N];
        self.b = [T::default(); N];
        self.ports.reset_all();
    }
}
