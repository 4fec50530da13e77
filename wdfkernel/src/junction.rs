//! Scattering kernels for the two-port adaptors.
//!
//! The owned (`wdft`) and shared-handle (`wdf`) trees differ only in how they
//! reach their children. The wave algebra lives here once and both variants
//! call into it, so they cannot drift apart numerically.

use crate::math::Sample;

// ---------------------------------------------------------------------------
// Series junction
// ---------------------------------------------------------------------------

/// Three-port series junction with the parent port adapted.
///
/// Port resistance: `R = R1 + R2`
/// Scattering coefficient: `k1 = R1 / R`
///
///   reflected: `b = -(b1 + b2)`
///   incident:  `a1 = b1 - k1 * (x + b1 + b2)`, `a2 = -(x + a1)`
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesJunction<T: Sample> {
    port1_reflect: T,
}

impl<T: Sample> SeriesJunction<T> {
    /// Recompute the coefficient and return the upward port resistance.
    #[inline]
    pub fn adapt(&mut self, r1: T, r2: T) -> T {
        let r = r1 + r2;
        self.port1_reflect = r1 / r;
        r
    }

    #[inline]
    pub fn reflected(b1: T, b2: T) -> T {
        -(b1 + b2)
    }

    /// Incident waves for `(port1, port2)`.
    #[inline]
    pub fn incident(&self, x: T, b1: T, b2: T) -> (T, T) {
        let a1 = b1 - self.port1_reflect * (x + b1 + b2);
        (a1, -(x + a1))
    }
}

// ---------------------------------------------------------------------------
// Parallel junction
// ---------------------------------------------------------------------------

/// Three-port parallel junction with the parent port adapted.
///
/// Port conductance: `G = G1 + G2`
/// Scattering coefficient: `k1 = G1 / G`
///
/// The reflected pass caches `b2 - b1` and the correction term so the
/// incident pass is two additions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelJunction<T: Sample> {
    port1_reflect: T,
    b_temp: T,
    b_diff: T,
}

impl<T: Sample> ParallelJunction<T> {
    /// Recompute the coefficient and return the upward port conductance.
    #[inline]
    pub fn adapt(&mut self, g1: T, g2: T) -> T {
        let g = g1 + g2;
        self.port1_reflect = g1 / g;
        g
    }

    #[inline]
    pub fn reflected(&mut self, b1: T, b2: T) -> T {
        self.b_diff = b2 - b1;
        self.b_temp = -self.port1_reflect * self.b_diff;
        b2 + self.b_temp
    }

    #[inline]
    pub fn incident(&self, x: T) -> (T, T) {
        let b2 = x + self.b_temp;
        (self.b_diff + b2, b2)
    }
}

// ---------------------------------------------------------------------------
// Y-parameter two-port
// ---------------------------------------------------------------------------

/// Linear two-port described by its admittance matrix `[[y11, y12], [y21, y22]]`.
#[derive(Debug, Clone, Copy)]
pub struct YParameterJunction<T: Sample> {
    y: [[T; 2]; 2],
    a_coef: T,
    b_coef: T,
    c_coef: T,
}

impl<T: Sample> YParameterJunction<T> {
    pub fn new(y11: T, y12: T, y21: T, y22: T) -> Self {
        let one = T::from_f64(1.0);
        Self {
            y: [[y11, y12], [y21, y22]],
            a_coef: one,
            b_coef: one,
            c_coef: one,
        }
    }

    /// Recompute the wave coefficients for a child of resistance `r1` and
    /// return the upward port resistance.
    pub fn adapt(&mut self, r1: T) -> T {
        let one = T::from_f64(1.0);
        let [[y11, y12], [y21, y22]] = self.y;
        let den = y22 + r1 * y11 * y22 - r1 * y12 * y21;
        let r1y11 = r1 * y11 + one;
        let r_sq = r1 * r1;

        self.a_coef = (-y22 * r_sq * y11 * y11 + y12 * y21 * r_sq * y11 + y22) / (den * r1y11);
        self.b_coef = -r1 * y12 / r1y11;
        self.c_coef = -y21 / den;
        r1y11 / den
    }

    /// Incident wave for the child.
    #[inline]
    pub fn incident(&self, x: T, child_b: T) -> T {
        self.a_coef * child_b + self.b_coef * x
    }

    #[inline]
    pub fn reflected(&self, child_b: T) -> T {
        self.c_coef * child_b
    }
}
