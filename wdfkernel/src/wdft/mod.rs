//! Statically composed WDF trees.
//!
//! Every adaptor owns its children by value, so a whole circuit is a single
//! nested type (`WdfSeries<T, Resistor<T>, Capacitor<T>>` and so on) that the
//! compiler can inline end to end. The tree is processed one sample at a time:
//!
//! 1. **reflected** (bottom-up): leaves produce `b`, adaptors combine them.
//! 2. **root**: the root element resolves the one remaining degree of
//!    freedom and sends a wave back down.
//! 3. **incident** (top-down): adaptors split the incident wave between their
//!    children; reactive elements latch it as state.
//!
//! Roots own their child and run steps 1 to 3 in [`Root::process`].
//!
//! Parameter changes travel upward through [`PortMut`] guards.

mod adaptors;
mod defer;
mod nonlinear;
mod one_ports;
mod propagation;
mod sources;

pub use adaptors::*;
pub use defer::{DeferTargets, ScopedDeferImpedancePropagation};
pub use nonlinear::*;
pub use one_ports::*;
pub use propagation::PortMut;
pub use sources::*;

use crate::math::Sample;

// ---------------------------------------------------------------------------
// Shared port state
// ---------------------------------------------------------------------------

/// Port impedance and wave pair carried by every element.
#[derive(Debug, Clone, Copy)]
pub struct WdfMembers<T: Sample> {
    /// Port resistance (Ω).
    pub r: T,
    /// Port conductance, always `1 / r`.
    pub g: T,
    /// Incident wave.
    pub a: T,
    /// Reflected wave.
    pub b: T,
    pub(crate) deferred: bool,
    pub(crate) changed: bool,
}

impl<T: Sample> Default for WdfMembers<T> {
    fn default() -> Self {
        let r = T::from_f64(1.0e-9);
        Self {
            r,
            g: T::from_f64(1.0) / r,
            a: T::default(),
            b: T::default(),
            deferred: false,
            changed: false,
        }
    }
}

impl<T: Sample> WdfMembers<T> {
    #[inline]
    pub fn set_impedance(&mut self, r: T) {
        self.r = r;
        self.g = T::from_f64(1.0) / r;
    }

    #[inline]
    pub fn set_admittance(&mut self, g: T) {
        self.g = g;
        self.r = T::from_f64(1.0) / g;
    }

    /// Whether impedance propagation is currently held back by a defer scope.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Consume the "impedance was recomputed" notification.
    #[inline]
    pub(crate) fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub(crate) fn clear_waves(&mut self) {
        self.a = T::default();
        self.b = T::default();
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A WDF port: leaf element, adaptor or root.
pub trait WdfNode<T: Sample> {
    fn wdf(&self) -> &WdfMembers<T>;
    fn wdf_mut(&mut self) -> &mut WdfMembers<T>;

    /// Recompute the port impedance from the current parameters and, for
    /// adaptors, from the children's impedances.
    fn calc_impedance(&mut self);

    /// Accept the incident wave from the parent.
    fn incident(&mut self, x: T);

    /// Compute, store and return the reflected wave.
    fn reflected(&mut self) -> T;

    /// Zero internal state. Adaptors forward to their children.
    fn reset(&mut self) {
        self.wdf_mut().clear_waves();
    }

    /// Recompute the impedance unless deferred, and flag the change so the
    /// guard that handed out this node notifies the parent.
    fn propagate_impedance_change(&mut self) {
        if self.wdf().deferred {
            return;
        }
        self.calc_impedance();
        self.wdf_mut().changed = true;
    }
}

/// A non-adaptable termination that closes a tree.
pub trait Root<T: Sample>: WdfNode<T> {
    /// Run one sample through the whole tree below this root.
    fn process(&mut self);
}

/// Accessors for a `wdf: WdfMembers<T>` field.
macro_rules! wdf_members {
    () => {
        #[inline]
        fn wdf(&self) -> &crate::wdft::WdfMembers<T> {
            &self.wdf
        }
        #[inline]
        fn wdf_mut(&mut self) -> &mut crate::wdft::WdfMembers<T> {
            &mut self.wdf
        }
    };
}
pub(crate) use wdf_members;

/// Drive a root against the child it owns.
macro_rules! impl_root_process {
    ($ty:ident < $($gen:ident),+ >) => {
        impl<T: crate::math::Sample, $($gen: crate::wdft::WdfNode<T>),+> crate::wdft::Root<T>
            for $ty<T, $($gen),+>
        {
            #[inline]
            fn process(&mut self) {
                let b = self.next.reflected();
                self.incident(b);
                let a = self.reflected();
                self.next.incident(a);
            }
        }
    };
}
pub(crate) use impl_root_process;

// ---------------------------------------------------------------------------
// Probes
// ---------------------------------------------------------------------------

/// Voltage across an element: `(a + b) / 2`.
#[inline]
pub fn voltage<T: Sample, N: WdfNode<T> + ?Sized>(node: &N) -> T {
    let w = node.wdf();
    (w.a + w.b) * T::from_f64(0.5)
}

/// Current through an element: `(a - b) / (2R)`.
#[inline]
pub fn current<T: Sample, N: WdfNode<T> + ?Sized>(node: &N) -> T {
    let w = node.wdf();
    (w.a - w.b) * (T::from_f64(0.5) * w.g)
}
