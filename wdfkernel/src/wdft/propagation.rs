//! Upward impedance-change notification for owned trees.
//!
//! A statically composed tree has no parent pointers: every adaptor owns its
//! children outright. Mutable access to a child is therefore handed out
//! through a [`PortMut`] guard borrowed from the parent. Setters on the child
//! recompute its impedance and raise its `changed` flag; when the guard drops
//! it consumes the flag and runs the same protocol on the parent. Nested
//! guards unwind innermost first, so a change at a leaf climbs the tree one
//! level per guard until it reaches the root, or a deferred node.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use super::WdfNode;
use crate::math::Sample;

/// Mutable access to a child port that notifies the parent on drop.
pub struct PortMut<'a, T: Sample, P: WdfNode<T>, C> {
    parent: &'a mut P,
    get: fn(&P) -> &C,
    get_mut: fn(&mut P) -> &mut C,
    take_changed: fn(&mut C) -> bool,
    _sample: PhantomData<T>,
}

fn node_changed<T: Sample, C: WdfNode<T>>(child: &mut C) -> bool {
    child.wdf_mut().take_changed()
}

impl<'a, T: Sample, P: WdfNode<T>, C> PortMut<'a, T, P, C> {
    /// Guard over an arbitrary child shape with a custom change check.
    pub(crate) fn new(
        parent: &'a mut P,
        get: fn(&P) -> &C,
        get_mut: fn(&mut P) -> &mut C,
        take_changed: fn(&mut C) -> bool,
    ) -> Self {
        Self {
            parent,
            get,
            get_mut,
            take_changed,
            _sample: PhantomData,
        }
    }
}

impl<'a, T: Sample, P: WdfNode<T>, C: WdfNode<T>> PortMut<'a, T, P, C> {
    /// Guard over a single child port.
    pub(crate) fn node(
        parent: &'a mut P,
        get: fn(&P) -> &C,
        get_mut: fn(&mut P) -> &mut C,
    ) -> Self {
        Self::new(parent, get, get_mut, node_changed::<T, C>)
    }
}

impl<T: Sample, P: WdfNode<T>, C> Deref for PortMut<'_, T, P, C> {
    type Target = C;

    #[inline]
    fn deref(&self) -> &C {
        (self.get)(&*self.parent)
    }
}

impl<T: Sample, P: WdfNode<T>, C> DerefMut for PortMut<'_, T, P, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut C {
        (self.get_mut)(&mut *self.parent)
    }
}

impl<T: Sample, P: WdfNode<T>, C> Drop for PortMut<'_, T, P, C> {
    fn drop(&mut self) {
        let child = (self.get_mut)(&mut *self.parent);
        if (self.take_changed)(child) {
            self.parent.propagate_impedance_change();
        }
    }
}
