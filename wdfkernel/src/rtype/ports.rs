//! Heterogeneous port lists for fixed-size R-type junctions.
//!
//! An R-type junction owns its down-facing ports as a tuple, so every port
//! keeps its concrete type and the per-sample loop unrolls at compile time.

use crate::math::Sample;
use crate::wdft::WdfNode;

/// Matrix index of tuple entry `i` when port `up` faces the parent.
#[inline(always)]
pub(crate) const fn port_index(i: usize, up: usize) -> usize {
    if i < up {
        i
    } else {
        i + 1
    }
}

/// A tuple of WDF ports attached to one R-type junction.
pub trait PortTuple<T: Sample> {
    const LEN: usize;

    /// Write each port's resistance into `out[i]`.
    fn impedances(&self, out: &mut [T]);

    /// Root step: hand `b[i]` to port `i`, then collect its reflection into `a[i]`.
    fn compute_root(&mut self, b: &[T], a: &mut [T]);

    /// Hand each port its incident wave, skipping matrix slot `up`.
    fn incident_down(&mut self, b: &[T], up: usize);

    /// Collect each port's reflection, skipping matrix slot `up`.
    fn reflected_down(&mut self, a: &mut [T], up: usize);

    fn reset_all(&mut self);

    /// Consume every port's change flag. True if any port changed.
    fn take_changed(&mut self) -> bool;
}

macro_rules! impl_port_tuple {
    ($len:expr; $($name:ident : $idx:tt),+) => {
        impl<T: Sample, $($name: WdfNode<T>),+> PortTuple<T> for ($($name,)+) {
            const LEN: usize = $len;

            #[inline]
            fn impedances(&self, out: &mut [T]) {
                $(out[$idx] = self.$idx.wdf().r;)+
            }

            #[inline]
            fn compute_root(&mut self, b: &[T], a: &mut [T]) {
                $(
                    self.$idx.incident(b[$idx]);
                    a[$idx] = self.$idx.reflected();
                )+
            }

            #[inline]
            fn incident_down(&mut self, b: &[T], up: usize) {
                $(self.$idx.incident(b[port_index($idx, up)]);)+
            }

            #[inline]
            fn reflected_down(&mut self, a: &mut [T], up: usize) {
                $(a[port_index($idx, up)] = self.$idx.reflected();)+
            }

            fn reset_all(&mut self) {
                $(self.$idx.reset();)+
            }

            fn take_changed(&mut self) -> bool {
                let mut any = false;
                $(any |= self.$idx.wdf_mut().take_changed();)+
                any
            }
        }
    };
}

impl_port_tuple!(1; A: 0);
impl_port_tuple!(2; A: 0, B: 1);
impl_port_tuple!(3; A: 0, B: 1, C: 2);
impl_port_tuple!(4; A: 0, B: 1, C: 2, D: 3);
impl_port_tuple!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_port_tuple!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_port_tuple!(7; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_port_tuple!(8; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wdft::{Capacitor, Resistor};

    #[test]
    fn up_port_is_skipped() {
        assert_eq!(port_index(0, 1), 0);
        assert_eq!(port_index(1, 1), 2);
        assert_eq!(port_index(2, 0), 3);
    }

    #[test]
    fn tuple_reports_impedances_and_changes() {
        let mut ports: (Resistor<f64>, Capacitor<f64>) = (Resistor::new(10.0), Capacitor::new(1.0e-6, 50_000.0));
        assert_eq!(<(Resistor<f64>, Capacitor<f64>) as PortTuple<f64>>::LEN, 2);
        let mut r = [0.0; 2];
        ports.impedances(&mut r);
        assert_eq!(r[0], 10.0);
        assert!((r[1] - 10.0).abs() < 1e-9);

        assert!(!ports.take_changed());
        ports.0.set_resistance_value(20.0);
        assert!(ports.take_changed());
        assert!(!ports.take_changed());
    }
}
