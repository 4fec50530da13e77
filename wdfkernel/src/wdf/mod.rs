//! Runtime-composed WDF trees over shared handles.
//!
//! Where [`wdft`](crate::wdft) fixes a circuit's shape in its type, this
//! module builds it at runtime: every element lives in an
//! `Rc<RefCell<Node>>` and adaptors hold type-erased [`Port`] handles to
//! their children. Children keep a `Weak` handle to their parent, used only
//! to walk impedance changes upward.
//!
//! Leaves wrap the owned element types directly and adaptors reuse the same
//! scattering kernels, so both variants produce identical waves.
//!
//! Handles are `!Send`: a tree belongs to one thread.

mod adaptors;
mod defer;
mod nonlinear;
mod one_ports;
mod rtype;
mod sources;

pub use adaptors::*;
pub use defer::ScopedDeferImpedancePropagation;
pub use nonlinear::*;
pub use one_ports::*;
pub use rtype::*;
pub use sources::*;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::math::Sample;
use crate::wdft::{self, WdfNode};

/// A tree node: element plus the bookkeeping for upward notification.
pub struct Node<T: Sample, E: ?Sized> {
    parent: Option<Weak<RefCell<Node<T, dyn WdfNode<T>>>>>,
    root: bool,
    kind: &'static str,
    pub(crate) element: E,
}

/// Type-erased shared handle to any node in a tree.
pub type Port<T> = Rc<RefCell<Node<T, dyn WdfNode<T>>>>;

impl<T: Sample, E: ?Sized> Node<T, E> {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.root
    }
}

/// Recompute `start` and every ancestor above it, stopping at a deferred
/// node or the root.
pub(crate) fn propagate<T: Sample>(start: Port<T>) {
    let mut current = Some(start);
    while let Some(port) = current.take() {
        let mut node = port.borrow_mut();
        if node.element.wdf().is_deferred() {
            return;
        }
        node.element.calc_impedance();
        if node.root {
            return;
        }
        current = node.parent.as_ref().and_then(Weak::upgrade);
    }
}

/// Register `parent` as the node to notify when `child` changes.
pub(crate) fn connect<T: Sample>(child: &Port<T>, parent: &Port<T>) {
    let mut c = child.borrow_mut();
    if c.root {
        log::warn!(
            "{} is a root and cannot be connected under {}; ignoring",
            c.kind,
            parent.borrow().kind
        );
        return;
    }
    if c.parent.is_some() {
        log::debug!("{} re-parented under {}", c.kind, parent.borrow().kind);
    }
    c.parent = Some(Rc::downgrade(parent));
}

// ---------------------------------------------------------------------------
// Typed handle
// ---------------------------------------------------------------------------

/// Typed shared handle to one element in a runtime tree.
///
/// Cloning shares the element. [`port`](Self::port) erases the type so the
/// handle can be wired under an adaptor.
pub struct Wdf<T: Sample, E: WdfNode<T> + 'static> {
    node: Rc<RefCell<Node<T, E>>>,
}

impl<T: Sample, E: WdfNode<T> + 'static> Clone for Wdf<T, E> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T: Sample, E: WdfNode<T> + 'static> Wdf<T, E> {
    pub(crate) fn leaf(element: E, kind: &'static str) -> Self {
        Self::with_role(element, kind, false)
    }

    pub(crate) fn with_role(element: E, kind: &'static str, root: bool) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                parent: None,
                root,
                kind,
                element,
            })),
        }
    }

    /// Type-erased handle for wiring under an adaptor or root.
    pub fn port(&self) -> Port<T> {
        self.node.clone()
    }

    pub fn kind(&self) -> &'static str {
        self.node.borrow().kind
    }

    pub fn voltage(&self) -> T {
        wdft::voltage(&self.node.borrow().element)
    }

    pub fn current(&self) -> T {
        wdft::current(&self.node.borrow().element)
    }

    /// Port resistance.
    pub fn impedance(&self) -> T {
        self.node.borrow().element.wdf().r
    }

    pub fn incident(&self, x: T) {
        self.node.borrow_mut().element.incident(x);
    }

    pub fn reflected(&self) -> T {
        self.node.borrow_mut().element.reflected()
    }

    pub fn reset(&self) {
        self.node.borrow_mut().element.reset();
    }

    /// Read-only access to the element.
    pub fn with<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.node.borrow().element)
    }

    /// Mutate the element, then notify ancestors if its impedance changed.
    ///
    /// The element's borrow is released before the walk upward, so parents
    /// are free to read it while re-adapting.
    pub fn update<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        let (out, parent) = {
            let mut node = self.node.borrow_mut();
            let out = f(&mut node.element);
            let changed = node.element.wdf_mut().take_changed();
            let parent = if changed && !node.root {
                node.parent.as_ref().and_then(Weak::upgrade)
            } else {
                None
            };
            (out, parent)
        };
        if let Some(parent) = parent {
            propagate(parent);
        }
        out
    }

    /// Recompute this node and walk the change upward. Used after a defer
    /// scope to re-adapt the shared ancestor.
    pub fn propagate_impedance_change(&self) {
        propagate(self.port());
    }
}

/// Runtime root: an element that drives the single port below it.
pub trait DynRoot<T: Sample>: WdfNode<T> {
    fn next_port(&self) -> &Port<T>;
}

impl<T: Sample, E: DynRoot<T> + 'static> Wdf<T, E> {
    /// Run one sample through the tree below this root.
    pub fn process(&self) {
        let mut node = self.node.borrow_mut();
        let b = node.element.next_port().borrow_mut().element.reflected();
        node.element.incident(b);
        let a = node.element.reflected();
        node.element.next_port().borrow_mut().element.incident(a);
    }
}

/// Build a root node over `next` and wire `next` to notify it.
pub(crate) fn make_root<T: Sample, E: WdfNode<T> + 'static>(
    element: E,
    kind: &'static str,
    next: &Port<T>,
) -> Wdf<T, E> {
    let root = Wdf::with_role(element, kind, true);
    connect(next, &root.port());
    root
}
