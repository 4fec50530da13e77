//! Batch parameter changes on a shared-handle tree.

use super::Port;
use crate::math::Sample;

/// Holds back upward propagation from a set of nodes until dropped.
///
/// While the scope is alive, changes below any held node stop at that node.
/// On drop each node recomputes its impedance once; the caller then
/// re-adapts the common ancestor with
/// [`Wdf::propagate_impedance_change`](super::Wdf::propagate_impedance_change).
///
/// ```
/// use wdfkernel::wdf::{Resistor, ScopedDeferImpedancePropagation, WdfSeries};
///
/// let r1 = Resistor::new(100.0);
/// let r2 = Resistor::new(100.0);
/// let s = WdfSeries::new(r1.port(), r2.port());
/// {
///     let _defer = ScopedDeferImpedancePropagation::new([s.port()]);
///     r1.set_resistance_value(200.0);
///     r2.set_resistance_value(300.0);
///     assert_eq!(s.impedance(), 200.0);
/// }
/// assert_eq!(s.impedance(), 500.0);
/// ```
pub struct ScopedDeferImpedancePropagation<T: Sample> {
    nodes: Vec<Port<T>>,
}

impl<T: Sample> ScopedDeferImpedancePropagation<T> {
    pub fn new(nodes: impl IntoIterator<Item = Port<T>>) -> Self {
        let nodes: Vec<Port<T>> = nodes.into_iter().collect();
        for n in &nodes {
            n.borrow_mut().element.wdf_mut().deferred = true;
        }
        Self { nodes }
    }
}

impl<T: Sample> Drop for ScopedDeferImpedancePropagation<T> {
    fn drop(&mut self) {
        for n in &self.nodes {
            let mut node = n.borrow_mut();
            node.element.wdf_mut().deferred = false;
            node.element.calc_impedance();
        }
        log::trace!("released {} deferred nodes", self.nodes.len());
    }
}
