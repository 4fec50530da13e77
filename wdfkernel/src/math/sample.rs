//! Sample types the WDF elements are generic over.
//!
//! Scalars (`f32`, `f64`) and `wide` SIMD lanes (`f32x4`, `f64x2`) implement
//! one trait, so a whole tree can be instantiated once per lane width. Every
//! element in a tree uses the same sample type; mixing them is a type error.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::Float;
use wide::{f32x4, f64x2, f64x4, CmpEq, CmpGt, CmpLt};

/// Numeric type carried on every wave and impedance in a tree.
pub trait Sample:
    Copy
    + Default
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Per-lane scalar type.
    type Scalar: Float + Debug + Default + 'static;
    /// Result of a lane-wise comparison.
    type Mask: Copy;
    /// Number of independent lanes.
    const LANES: usize;

    fn splat(x: Self::Scalar) -> Self;
    /// Broadcast an `f64` constant into every lane.
    fn from_f64(x: f64) -> Self;
    fn lane(self, i: usize) -> Self::Scalar;

    fn simd_lt(self, rhs: Self) -> Self::Mask;
    fn simd_gt(self, rhs: Self) -> Self::Mask;
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;
    /// True only if every lane compares equal.
    fn all_eq(self, rhs: Self) -> bool;

    fn simd_max(self, rhs: Self) -> Self;
    fn simd_abs(self) -> Self;
    /// `self * m + a`. Fused where the lane type has hardware support.
    fn mul_add(self, m: Self, a: Self) -> Self;
    fn simd_ln(self) -> Self;
    fn simd_exp(self) -> Self;
    fn simd_trunc(self) -> Self;

    /// Splits a positive value into `(exponent, mantissa)` with the mantissa
    /// in `[1, 2)`, reading the IEEE-754 bits directly.
    fn frexp2(self) -> (Self, Self);
    /// `2^l` for an integer-valued `l`, built from the exponent bits.
    fn exp2_int(self) -> Self;

    /// `-1`, `0` or `1` per lane. Zero maps to zero, unlike `f64::signum`.
    #[inline]
    fn sign(self) -> Self {
        let zero = Self::from_f64(0.0);
        let one = Self::from_f64(1.0);
        let positive = Self::select(zero.simd_lt(self), one, zero);
        let negative = Self::select(self.simd_lt(zero), one, zero);
        positive - negative
    }

    /// Dense `b = S·a` over `n = a.len()` ports.
    ///
    /// `s_t` holds the transposed matrix row-major, so
    /// `b[c] = Σ_r s_t[r * n + c] · a[r]`.
    #[inline]
    fn rtype_scatter(s_t: &[Self], a: &[Self], b: &mut [Self]) {
        scalar_scatter(s_t, a, b);
    }
}

/// Plain column loop shared by every sample type.
#[inline]
pub(crate) fn scalar_scatter<T: Sample>(s_t: &[T], a: &[T], b: &mut [T]) {
    let n = a.len();
    for (c, out) in b.iter_mut().enumerate().take(n) {
        *out = a
            .iter()
            .enumerate()
            .fold(T::default(), |acc, (r, &ar)| acc + s_t[r * n + c] * ar);
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl Sample for f64 {
    type Scalar = f64;
    type Mask = bool;
    const LANES: usize = 1;

    #[inline]
    fn splat(x: f64) -> Self {
        x
    }
    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }
    #[inline]
    fn lane(self, _i: usize) -> f64 {
        self
    }
    #[inline]
    fn simd_lt(self, rhs: Self) -> bool {
        self < rhs
    }
    #[inline]
    fn simd_gt(self, rhs: Self) -> bool {
        self > rhs
    }
    #[inline]
    fn select(mask: bool, if_true: Self, if_false: Self) -> Self {
        if mask {
            if_true
        } else {
            if_false
        }
    }
    #[inline]
    fn all_eq(self, rhs: Self) -> bool {
        self == rhs
    }
    #[inline]
    fn simd_max(self, rhs: Self) -> Self {
        f64::max(self, rhs)
    }
    #[inline]
    fn simd_abs(self) -> Self {
        f64::abs(self)
    }
    #[inline]
    fn mul_add(self, m: Self, a: Self) -> Self {
        // libm's software fma is far slower than mul + add without target support
        self * m + a
    }
    #[inline]
    fn simd_ln(self) -> Self {
        f64::ln(self)
    }
    #[inline]
    fn simd_exp(self) -> Self {
        f64::exp(self)
    }
    #[inline]
    fn simd_trunc(self) -> Self {
        f64::trunc(self)
    }

    #[inline]
    fn frexp2(self) -> (Self, Self) {
        let bits = self.to_bits();
        let ex = bits & 0x7ff0_0000_0000_0000;
        let e = (ex >> 52) as i64 - 1023;
        let mantissa = f64::from_bits((bits - ex) | 0x3ff0_0000_0000_0000);
        (e as f64, mantissa)
    }

    #[inline]
    fn exp2_int(self) -> Self {
        // biased exponent 0 gives 0.0 and 2047 gives +inf
        let biased = (self as i64 + 1023).clamp(0, 2047) as u64;
        f64::from_bits(biased << 52)
    }

    fn rtype_scatter(s_t: &[Self], a: &[Self], b: &mut [Self]) {
        let n = a.len();
        let full = n - n % 4;
        for c in (0..full).step_by(4) {
            let mut acc = f64x4::ZERO;
            for (r, &ar) in a.iter().enumerate() {
                let row = &s_t[r * n + c..r * n + c + 4];
                let col = f64x4::new([row[0], row[1], row[2], row[3]]);
                acc = col.mul_add(f64x4::splat(ar), acc);
            }
            b[c..c + 4].copy_from_slice(&acc.to_array());
        }
        for c in full..n {
            b[c] = a
                .iter()
                .enumerate()
                .fold(0.0, |acc, (r, &ar)| acc + s_t[r * n + c] * ar);
        }
    }
}

impl Sample for f32 {
    type Scalar = f32;
    type Mask = bool;
    const LANES: usize = 1;

    #[inline]
    fn splat(x: f32) -> Self {
        x
    }
    #[inline]
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    #[inline]
    fn lane(self, _i: usize) -> f32 {
        self
    }
    #[inline]
    fn simd_lt(self, rhs: Self) -> bool {
        self < rhs
    }
    #[inline]
    fn simd_gt(self, rhs: Self) -> bool {
        self > rhs
    }
    #[inline]
    fn select(mask: bool, if_true: Self, if_false: Self) -> Self {
        if mask {
            if_true
        } else {
            if_false
        }
    }
    #[inline]
    fn all_eq(self, rhs: Self) -> bool {
        self == rhs
    }
    #[inline]
    fn simd_max(self, rhs: Self) -> Self {
        f32::max(self, rhs)
    }
    #[inline]
    fn simd_abs(self) -> Self {
        f32::abs(self)
    }
    #[inline]
    fn mul_add(self, m: Self, a: Self) -> Self {
        self * m + a
    }
    #[inline]
    fn simd_ln(self) -> Self {
        f32::ln(self)
    }
    #[inline]
    fn simd_exp(self) -> Self {
        f32::exp(self)
    }
    #[inline]
    fn simd_trunc(self) -> Self {
        f32::trunc(self)
    }

    #[inline]
    fn frexp2(self) -> (Self, Self) {
        let bits = self.to_bits();
        let ex = bits & 0x7f80_0000;
        let e = (ex >> 23) as i32 - 127;
        let mantissa = f32::from_bits((bits - ex) | 0x3f80_0000);
        (e as f32, mantissa)
    }

    #[inline]
    fn exp2_int(self) -> Self {
        let biased = (self as i32 + 127).clamp(0, 255) as u32;
        f32::from_bits(biased << 23)
    }

    fn rtype_scatter(s_t: &[Self], a: &[Self], b: &mut [Self]) {
        let n = a.len();
        let full = n - n % 4;
        for c in (0..full).step_by(4) {
            let mut acc = f32x4::ZERO;
            for (r, &ar) in a.iter().enumerate() {
                let row = &s_t[r * n + c..r * n + c + 4];
                let col = f32x4::new([row[0], row[1], row[2], row[3]]);
                acc = col.mul_add(f32x4::splat(ar), acc);
            }
            b[c..c + 4].copy_from_slice(&acc.to_array());
        }
        for c in full..n {
            b[c] = a
                .iter()
                .enumerate()
                .fold(0.0, |acc, (r, &ar)| acc + s_t[r * n + c] * ar);
        }
    }
}

// ---------------------------------------------------------------------------
// SIMD lanes
// ---------------------------------------------------------------------------

/// Apply a scalar bit-level operation lane by lane.
macro_rules! per_lane {
    ($v:expr, $lanes:expr, $simd:ty, |$x:ident| $body:expr) => {{
        let src = $v.to_array();
        let mut out = [Default::default(); $lanes];
        for (dst, &$x) in out.iter_mut().zip(src.iter()) {
            *dst = $body;
        }
        <$simd>::new(out)
    }};
}

macro_rules! impl_simd_sample {
    ($simd:ty, $scalar:ty, $lanes:expr, $all:expr) => {
        impl Sample for $simd {
            type Scalar = $scalar;
            type Mask = $simd;
            const LANES: usize = $lanes;

            #[inline]
            fn splat(x: $scalar) -> Self {
                <$simd>::splat(x)
            }
            #[inline]
            fn from_f64(x: f64) -> Self {
                <$simd>::splat(x as $scalar)
            }
            #[inline]
            fn lane(self, i: usize) -> $scalar {
                self.to_array()[i]
            }
            #[inline]
            fn simd_lt(self, rhs: Self) -> Self {
                self.cmp_lt(rhs)
            }
            #[inline]
            fn simd_gt(self, rhs: Self) -> Self {
                self.cmp_gt(rhs)
            }
            #[inline]
            fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
                mask.blend(if_true, if_false)
            }
            #[inline]
            fn all_eq(self, rhs: Self) -> bool {
                self.cmp_eq(rhs).move_mask() == $all
            }
            #[inline]
            fn simd_max(self, rhs: Self) -> Self {
                <$simd>::max(self, rhs)
            }
            #[inline]
            fn simd_abs(self) -> Self {
                <$simd>::abs(self)
            }
            #[inline]
            fn mul_add(self, m: Self, a: Self) -> Self {
                <$simd>::mul_add(self, m, a)
            }
            #[inline]
            fn simd_ln(self) -> Self {
                <$simd>::ln(self)
            }
            #[inline]
            fn simd_exp(self) -> Self {
                <$simd>::exp(self)
            }
            #[inline]
            fn simd_trunc(self) -> Self {
                per_lane!(self, $lanes, $simd, |x| x.trunc())
            }
            #[inline]
            fn frexp2(self) -> (Self, Self) {
                let exponent = per_lane!(self, $lanes, $simd, |x| Sample::frexp2(x).0);
                let mantissa = per_lane!(self, $lanes, $simd, |x| Sample::frexp2(x).1);
                (exponent, mantissa)
            }
            #[inline]
            fn exp2_int(self) -> Self {
                per_lane!(self, $lanes, $simd, |x| Sample::exp2_int(x))
            }
        }
    };
}

impl_simd_sample!(f32x4, f32, 4, 0b1111);
impl_simd_sample!(f64x2, f64, 2, 0b11);
