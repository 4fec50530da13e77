//! Shared-handle R-type junctions sized at runtime.
//!
//! Storage is allocated once at construction. Calculators are boxed
//! closures receiving the down-port impedances in port order.

use super::{connect, Port, Wdf};
use crate::error::{Result, WdfError};
use crate::math::Sample;
use crate::rtype::{port_index, DynScatteringMatrix};
use crate::wdft::{wdf_members, WdfMembers, WdfNode};

/// Root calculator: impedances of every port, matrix to load.
pub type DynRootCalculator<T> = Box<dyn FnMut(&[T], &mut DynScatteringMatrix<T>)>;

/// Adaptable calculator: down-port impedances, matrix to load; returns the
/// up-port resistance.
pub type DynCalculator<T> = Box<dyn FnMut(&[T], &mut DynScatteringMatrix<T>) -> T>;

fn adopt_all<T: Sample>(ports: &[Port<T>], parent: &Port<T>) {
    for p in ports {
        connect(p, parent);
    }
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

pub struct RootRtypeNode<T: Sample> {
    wdf: WdfMembers<T>,
    ports: Vec<Port<T>>,
    calculator: DynRootCalculator<T>,
    s: DynScatteringMatrix<T>,
    r: Vec<T>,
    a: Vec<T>,
    b: Vec<T>,
}

/// Root R-type junction over `n` runtime ports.
pub type RootRtypeAdaptor<T> = Wdf<T, RootRtypeNode<T>>;

impl<T: Sample> RootRtypeNode<T> {
    fn compute(&mut self) {
        self.s.scatter(&self.a, &mut self.b);
        for (i, p) in self.ports.iter().enumerate() {
            let mut node = p.borrow_mut();
            node.element.incident(self.b[i]);
            self.a[i] = node.element.reflected();
        }
    }
}

impl<T: Sample> Wdf<T, RootRtypeNode<T>> {
    /// `num_ports` must equal `ports.len()`.
    pub fn new(
        num_ports: usize,
        ports: Vec<Port<T>>,
        calculator: impl FnMut(&[T], &mut DynScatteringMatrix<T>) + 'static,
    ) -> Result<Self> {
        if num_ports == 0 || ports.len() != num_ports {
            return Err(WdfError::PortCount {
                expected: num_ports.max(1),
                found: ports.len(),
            });
        }
        let element = RootRtypeNode {
            wdf: WdfMembers::default(),
            ports,
            calculator: Box::new(calculator),
            s: DynScatteringMatrix::new(num_ports),
            r: vec![T::default(); num_ports],
            a: vec![T::default(); num_ports],
            b: vec![T::default(); num_ports],
        };
        let root = Wdf::with_role(element, "root_rtype", true);
        let port = root.port();
        root.with(|e| adopt_all(&e.ports, &port));
        root.update(|e| e.calc_impedance());
        Ok(root)
    }

    pub fn set_s_matrix_data<R: AsRef<[T]>>(&self, s: &[R]) -> Result<()> {
        self.update(|e| e.s.set_s_matrix_data(s))
    }

    pub fn is_configured(&self) -> bool {
        self.with(|e| e.s.is_configured())
    }

    /// # Panics
    ///
    /// If no scattering matrix has been set.
    pub fn compute(&self) {
        self.update(|e| {
            assert!(
                e.s.is_configured(),
                "RootRtypeAdaptor::compute called before set_s_matrix_data"
            );
            e.compute();
        });
    }

    pub fn try_compute(&self) -> Result<()> {
        self.update(|e| {
            if !e.s.is_configured() {
                return Err(WdfError::ScatteringMatrixUnset);
            }
            e.compute();
            Ok(())
        })
    }
}

impl<T: Sample> WdfNode<T> for RootRtypeNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        for (r, p) in self.r.iter_mut().zip(&self.ports) {
            *r = p.borrow().element.wdf().r;
        }
        (self.calculator)(&self.r, &mut self.s);
    }

    fn incident(&mut self, x: T) {
        self.wdf.a = x;
    }

    fn reflected(&mut self) -> T {
        self.wdf.b
    }

    fn reset(&mut self) {
        self.a.fill(T::default());
        self.b.fill(T::default());
        for p in &self.ports {
            p.borrow_mut().element.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Adaptable
// ---------------------------------------------------------------------------

pub struct RtypeNode<T: Sample> {
    wdf: WdfMembers<T>,
    ports: Vec<Port<T>>,
    calculator: DynCalculator<T>,
    up: usize,
    s: DynScatteringMatrix<T>,
    r: Vec<T>,
    a: Vec<T>,
    b: Vec<T>,
}

/// Adaptable R-type junction: `ports.len() + 1` matrix slots, slot `up`
/// facing the parent.
pub type RtypeAdaptor<T> = Wdf<T, RtypeNode<T>>;

impl<T: Sample> Wdf<T, RtypeNode<T>> {
    /// `num_ports` counts the up port, so `ports.len()` must be
    /// `num_ports - 1`.
    pub fn new(
        num_ports: usize,
        ports: Vec<Port<T>>,
        up: usize,
        calculator: impl FnMut(&[T], &mut DynScatteringMatrix<T>) -> T + 'static,
    ) -> Result<Self> {
        if num_ports < 2 || ports.len() + 1 != num_ports {
            return Err(WdfError::PortCount {
                expected: num_ports.saturating_sub(1).max(1),
                found: ports.len(),
            });
        }
        if up >= num_ports {
            return Err(WdfError::InvalidParameter {
                name: "up_port",
                value: up as f64,
            });
        }
        let element = RtypeNode {
            wdf: WdfMembers::default(),
            ports,
            calculator: Box::new(calculator),
            up,
            s: DynScatteringMatrix::new(num_ports),
            r: vec![T::default(); num_ports - 1],
            a: vec![T::default(); num_ports],
            b: vec![T::default(); num_ports],
        };
        let node = Wdf::leaf(element, "rtype");
        let port = node.port();
        node.with(|e| adopt_all(&e.ports, &port));
        node.update(|e| e.calc_impedance());
        Ok(node)
    }

    pub fn set_s_matrix_data<R: AsRef<[T]>>(&self, s: &[R]) -> Result<()> {
        self.update(|e| e.s.set_s_matrix_data(s))
    }

    pub fn is_configured(&self) -> bool {
        self.with(|e| e.s.is_configured())
    }

    pub fn up_port(&self) -> usize {
        self.with(|e| e.up)
    }
}

impl<T: Sample> WdfNode<T> for RtypeNode<T> {
    wdf_members!();

    fn calc_impedance(&mut self) {
        for (r, p) in self.r.iter_mut().zip(&self.ports) {
            *r = p.borrow().element.wdf().r;
        }
        let r = (self.calculator)(&self.r, &mut self.s);
        self.wdf.set_impedance(r);
    }

    /// # Panics
    ///
    /// If no scattering matrix has been set.
    fn incident(&mut self, x: T) {
        assert!(
            self.s.is_configured(),
            "RtypeAdaptor::incident called before set_s_matrix_data"
        );
        self.wdf.a = x;
        self.a[self.up] = x;
        self.s.scatter(&self.a, &mut self.b);
        for (i, p) in self.ports.iter().enumerate() {
            p.borrow_mut()
                .element
                .incident(self.b[port_index(i, self.up)]);
        }
    }

    fn reflected(&mut self) -> T {
        for (i, p) in self.ports.iter().enumerate() {
            self.a[port_index(i, self.up)] = p.borrow_mut().element.reflected();
        }
        self.wdf.b = self.s.scatter_row(self.up, &self.a);
        self.wdf.b
    }

    fn reset(&mut self) {
        self.wdf.clear_waves();
        self.a.fill(T::default());
        self.b.fill(T::default());
        for p in &self.ports {
            p.borrow_mut().element.reset();
        }
    }
}

impl<T: Sample> RootRtypeNode<T> {
    pub fn ports(&self) -> &[Port<T>] {
        &self.ports
    }
}

impl<T: Sample> RtypeNode<T> {
    pub fn ports(&self) -> &[Port<T>] {
        &self.ports
    }
}
