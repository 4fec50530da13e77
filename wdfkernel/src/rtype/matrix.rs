//! Scattering matrix storage for R-type junctions.
//!
//! Matrices are supplied as `S[row][col]` with `b[row] = Σ_col S[row][col] * a[col]`
//! and stored transposed, so the scatter walks contiguous memory one input
//! port at a time.

use crate::error::{Result, WdfError};
use crate::math::Sample;

// ---------------------------------------------------------------------------
// Fixed size
// ---------------------------------------------------------------------------

/// `N x N` scattering matrix with its port count fixed at compile time.
#[derive(Debug, Clone)]
pub struct ScatteringMatrix<T: Sample, const N: usize> {
    s_t: [[T; N]; N],
    configured: bool,
}

impl<T: Sample, const N: usize> Default for ScatteringMatrix<T, N> {
    fn default() -> Self {
        Self {
            s_t: [[T::default(); N]; N],
            configured: false,
        }
    }
}

impl<T: Sample, const N: usize> ScatteringMatrix<T, N> {
    /// Load `S[row][col]`. Marks the matrix configured.
    pub fn set_s_matrix_data(&mut self, s: &[[T; N]; N]) {
        for (r, row) in s.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                self.s_t[c][r] = v;
            }
        }
        if !self.configured {
            log::debug!("{N}-port scattering matrix configured");
        }
        self.configured = true;
    }

    /// Whether a matrix has been loaded since construction.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// `S[row][col]` as supplied.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.s_t[col][row]
    }

    /// `b = S·a`
    #[inline]
    pub fn scatter(&self, a: &[T; N], b: &mut [T; N]) {
        T::rtype_scatter(self.s_t.as_flattened(), a, b);
    }

    /// One output of the scatter: `Σ_col S[row][col] * a[col]`.
    #[inline]
    pub fn scatter_row(&self, row: usize, a: &[T; N]) -> T {
        self.s_t
            .iter()
            .zip(a)
            .fold(T::default(), |acc, (col, &ac)| acc + col[row] * ac)
    }
}

// ---------------------------------------------------------------------------
// Runtime size
// ---------------------------------------------------------------------------

/// Scattering matrix whose port count is chosen at runtime.
///
/// Allocates once in [`new`](Self::new); loading and scattering reuse it.
#[derive(Debug, Clone)]
pub struct DynScatteringMatrix<T: Sample> {
    n: usize,
    s_t: Vec<T>,
    configured: bool,
}

impl<T: Sample> DynScatteringMatrix<T> {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            s_t: vec![T::default(); n * n],
            configured: false,
        }
    }

    pub fn num_ports(&self) -> usize {
        self.n
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Load `S[row][col]`, rejecting anything that is not `n x n`.
    pub fn set_s_matrix_data<R: AsRef<[T]>>(&mut self, s: &[R]) -> Result<()> {
        if s.len() != self.n {
            return Err(WdfError::MatrixShape {
                ports: self.n,
                rows: s.len(),
            });
        }
        for (r, row) in s.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != self.n {
                return Err(WdfError::MatrixShape {
                    ports: self.n,
                    rows: row.len(),
                });
            }
            for (c, &v) in row.iter().enumerate() {
                self.s_t[c * self.n + r] = v;
            }
        }
        if !self.configured {
            log::debug!("{}-port scattering matrix configured", self.n);
        }
        self.configured = true;
        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.s_t[col * self.n + row]
    }

    #[inline]
    pub fn scatter(&self, a: &[T], b: &mut [T]) {
        T::rtype_scatter(&self.s_t, a, b);
    }

    #[inline]
    pub fn scatter_row(&self, row: usize, a: &[T]) -> T {
        self.s_t
            .chunks_exact(self.n)
            .zip(a)
            .fold(T::default(), |acc, (col, &ac)| acc + col[row] * ac)
    }
}
