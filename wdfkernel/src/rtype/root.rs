//! Non-adaptable R-type junction closing a tree.

use super::matrix::ScatteringMatrix;
use super::ports::PortTuple;
use crate::error::{Result, WdfError};
use crate::math::Sample;
use crate::wdft::{wdf_members, PortMut, Root, WdfMembers, WdfNode};

/// Recomputes a root junction's scattering matrix from its port impedances.
pub trait RootImpedanceCalculator<T: Sample, const N: usize> {
    fn calc_impedance(&mut self, impedances: &[T; N], s: &mut ScatteringMatrix<T, N>);
}

impl<T: Sample, const N: usize, F> RootImpedanceCalculator<T, N> for F
where
    F: FnMut(&[T; N], &mut ScatteringMatrix<T, N>),
{
    fn calc_impedance(&mut self, impedances: &[T; N], s: &mut ScatteringMatrix<T, N>) {
        self(impedances, s)
    }
}

/// R-type junction with every port facing down.
///
/// Each [`compute`](Self::compute) scatters the waves collected on the
/// previous sample and then exchanges one wave with every port.
pub struct RootRtypeAdaptor<T, P, C, const N: usize>
where
    T: Sample,
    P: PortTuple<T>,
    C: RootImpedanceCalculator<T, N>,
{
    pub(crate) wdf: WdfMembers<T>,
    ports: P,
    calculator: C,
    s: ScatteringMatrix<T, N>,
    a: [T; N],
    b: [T; N],
}

impl<T, P, C, const N: usize> RootRtypeAdaptor<T, P, C, N>
where
    T: Sample,
    P: PortTuple<T>,
    C: RootImpedanceCalculator<T, N>,
{
    /// Takes ownership of the ports and runs the calculator once.
    pub fn new(mut ports: P, calculator: C) -> Self {
        const { assert!(P::LEN == N, "port tuple length must equal N") };
        ports.take_changed();
        let mut rt = Self {
            wdf: WdfMembers::default(),
            ports,
            calculator,
            s: ScatteringMatrix::default(),
            a: [T::default(); N],
            b: [T::default(); N],
        };
        rt.calc_impedance();
        rt
    }

    /// Down-port impedances in tuple order.
    pub fn port_impedances(&self) -> [T; N] {
        let mut r = [T::default(); N];
        self.ports.impedances(&mut r);
        r
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

    /// Scatter, then exchange waves with every port.
    ///
    /// # Panics
    ///
    /// If no scattering matrix has been set.
    #[inline]
    pub fn compute(&mut self) {
        assert!(
            self.s.is_configured(),
            "RootRtypeAdaptor::compute called before set_s_matrix_data"
        );
        self.s.scatter(&self.a, &mut self.b);
        self.ports.compute_root(&self.b, &mut self.a);
    }

    /// [`compute`](Self::compute) that reports an unset matrix instead of panicking.
    pub fn try_compute(&mut self) -> Result<()> {
        if !self.s.is_configured() {
            return Err(WdfError::ScatteringMatrixUnset);
        }
        self.compute();
        Ok(())
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    /// Mutable access to the ports. Recomputes the matrix on drop if any
    /// port's impedance changed.
    pub fn ports_mut(&mut self) -> PortMut<'_, T, Self, P> {
        PortMut::new(self, |s| &s.ports, |s| &mut s.ports, P::take_changed)
    }
}

impl<T, P, C, const N: usize> WdfNode<T> for RootRtypeAdaptor<T, P, C, N>
where
    T: Sample,
    P: PortTuple<T>,
    C: RootImpedanceCalculator<T, N>,
{
    wdf_members!();

    fn calc_impedance(&mut self) {
        let r = self.port_impedances();
        self.calculator.calc_impedance(&r, &mut self.s);
    }

    /// Roots are not driven from above; stored for probing only.
    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    fn reflected(&mut self) -> T {
        self.wdf.b
    }

    fn reset(&mut self) {
        self.a = [T::default(); N];
        self.b = [T::default(); N];
        self.ports.reset_all();
    }
}

impl<T, P, C, const N: usize> Root<T> for RootRtypeAdaptor<T, P, C, N>
where
    T: Sample,
    P: PortTuple<T>,
    C: RootImpedanceCalculator<T, N>,
{
    #[inline]
    fn process(&mut self) {
        self.compute();
    }
}
