//! Batched impedance updates.
//!
//! Some adaptors are expensive to re-adapt (an R-type junction recomputes a
//! full scattering matrix). When several pots change at once, hold their
//! common ancestors in a [`ScopedDeferImpedancePropagation`]: changes below
//! them stop at the deferred node. When the scope drops, each deferred node
//! recomputes once, and the caller propagates from the shared ancestor:
//!
//! ```
//! use wdfkernel::wdft::*;
//!
//! let mut s = WdfSeries::new(Resistor::new(1000.0), Resistor::new(1000.0));
//! {
//!     let (r1, r2) = s.ports_mut_unchecked();
//!     let mut scope = ScopedDeferImpedancePropagation::<f64, _>::new((r1, r2));
//!     scope.0.set_resistance_value(2000.0);
//!     scope.1.set_resistance_value(3000.0);
//! }
//! s.propagate_impedance_change();
//! assert_eq!(s.wdf().r, 5000.0);
//! ```

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use super::WdfNode;
use crate::math::Sample;

/// A node, or a tuple of nodes, that a defer scope can hold.
pub trait DeferTargets<T: Sample> {
    fn set_deferred(&mut self, deferred: bool);
    fn calc_impedances(&mut self);
}

impl<T: Sample, N: WdfNode<T> + ?Sized> DeferTargets<T> for &mut N {
    fn set_deferred(&mut self, deferred: bool) {
        self.wdf_mut().deferred = deferred;
    }

    fn calc_impedances(&mut self) {
        self.calc_impedance();
    }
}

macro_rules! impl_defer_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<T: Sample, $($name: DeferTargets<T>),+> DeferTargets<T> for ($($name,)+) {
            fn set_deferred(&mut self, deferred: bool) {
                $(self.$idx.set_deferred(deferred);)+
            }

            fn calc_impedances(&mut self) {
                $(self.$idx.calc_impedances();)+
            }
        }
    };
}

impl_defer_tuple!(A: 0);
impl_defer_tuple!(A: 0, B: 1);
impl_defer_tuple!(A: 0, B: 1, C: 2);
impl_defer_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_defer_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_defer_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Holds its targets deferred for as long as it lives.
///
/// Dereferences to the targets, so setters can be reached through it.
/// Dropping the scope (on any exit path) re-activates every target and
/// recomputes its impedance once. It does not notify anything above the
/// targets.
pub struct ScopedDeferImpedancePropagation<T: Sample, D: DeferTargets<T>> {
    targets: D,
    _sample: PhantomData<T>,
}

impl<T: Sample, D: DeferTargets<T>> ScopedDeferImpedancePropagation<T, D> {
    pub fn new(mut targets: D) -> Self {
        targets.set_deferred(true);
        Self {
            targets,
            _sample: PhantomData,
        }
    }
}

impl<T: Sample, D: DeferTargets<T>> Deref for ScopedDeferImpedancePropagation<T, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.targets
    }
}

impl<T: Sample, D: DeferTargets<T>> DerefMut for ScopedDeferImpedancePropagation<T, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.targets
    }
}

impl<T: Sample, D: DeferTargets<T>> Drop for ScopedDeferImpedancePropagation<T, D> {
    fn drop(&mut self) {
        self.targets.set_deferred(false);
        self.targets.calc_impedances();
        log::trace!("deferred impedance scope released");
    }
}

#[cfg(test)]
mod tests {
    use crate::wdft::*;

    #[test]
    fn deferred_node_holds_stale_impedance_until_release() {
        let inner = WdfSeries::new(Resistor::new(100.0), Resistor::new(100.0));
        let mut outer = WdfParallel::new(inner, Resistor::new(200.0));
        {
            let (inner, _) = outer.ports_mut_unchecked();
            let mut scope = ScopedDeferImpedancePropagation::<f64, _>::new((inner,));
            scope.0.port1_mut().set_resistance_value(300.0);
            scope.0.port2_mut().set_resistance_value(300.0);
            // the series adaptor has not re-adapted yet
            assert_eq!(scope.0.wdf().r, 200.0);
            assert!(scope.0.wdf().is_deferred());
        }
        assert_eq!(outer.port1().wdf().r, 600.0);
        assert!(!outer.port1().wdf().is_deferred());
        // nothing above the scope moved
        assert!((outer.wdf().r - 100.0).abs() < 1e-9);

        outer.propagate_impedance_change();
        assert!((outer.wdf().r - 150.0).abs() < 1e-9);
    }
}
