//! Cheap approximations of the Wright omega function.
//!
//! `ω(x)` solves `ω + ln ω = x`. The wave-domain diode models are closed-form
//! in ω, so evaluating it quickly decides how fast a clipper runs. The four
//! approximations trade accuracy for speed: `omega1` is a plain ramp,
//! `omega4` adds a Newton-style correction on top of `omega3`.
//!
//! Polynomial coefficients come from S. D'Angelo, "Fast Approximation of the
//! Lambert W Function for Virtual Analog Modelling" (DAFx 2019).

use super::sample::Sample;

const LN_2: f64 = 0.693147180559945;
const LOG2_E: f64 = 1.442695040888963;

/// Evaluates a polynomial with Estrin's scheme.
///
/// Coefficients are ordered highest degree first: `[a_n, ..., a_1, a_0]`.
#[inline(always)]
pub fn estrin<T: Sample, const N: usize>(coeffs: &[f64; N], x: T) -> T {
    let mut c: [T; N] = coeffs.map(T::from_f64);
    let mut len = N;
    let mut xp = x;
    while len > 1 {
        let order = len - 1;
        // pairs are folded lowest index first so the writes never clobber unread input
        let mut n = if order % 2 == 0 { 2 } else { 1 };
        while n <= order {
            c[n / 2] = c[n - 1].mul_add(xp, c[n]);
            n += 2;
        }
        len = order / 2 + 1;
        xp = xp * xp;
    }
    c[0]
}

/// `log2(x)`, tuned for `x` in `[1, 2]`.
#[inline]
pub fn log2_approx<T: Sample>(x: T) -> T {
    estrin(
        &[
            0.1640425613334452,
            -1.098865286222744,
            3.148297929334117,
            -2.213475204444817,
        ],
        x,
    )
}

/// Natural log for positive `x`.
///
/// The exponent is read from the float bits and the mantissa goes through
/// [`log2_approx`].
#[inline]
pub fn log_approx<T: Sample>(x: T) -> T {
    let (exponent, mantissa) = x.frexp2();
    T::from_f64(LN_2) * (exponent + log2_approx(mantissa))
}

/// `2^x`, tuned for `x` in `[0, 1]`.
#[inline]
pub fn pow2_approx<T: Sample>(x: T) -> T {
    estrin(
        &[
            0.07944154167983575,
            0.2274112777602189,
            0.6931471805599453,
            1.0,
        ],
        x,
    )
}

/// `e^x`. The argument is clamped so the result underflows to a tiny
/// positive value instead of wrapping the exponent bits.
#[inline]
pub fn exp_approx<T: Sample>(x: T) -> T {
    let x = T::from_f64(-126.0).simd_max(T::from_f64(LOG2_E) * x);
    let xi = x.simd_trunc();
    let l = T::select(x.simd_lt(T::default()), xi - T::from_f64(1.0), xi);
    let frac = x - l;
    l.exp2_int() * pow2_approx(frac)
}

/// First-order approximation: `max(x, 0)`.
#[inline]
pub fn omega1<T: Sample>(x: T) -> T {
    x.simd_max(T::default())
}

/// Second-order approximation: cubic between two breakpoints.
#[inline]
pub fn omega2<T: Sample>(x: T) -> T {
    const X1: f64 = -3.684303659906469;
    const X2: f64 = 1.972967391708859;
    let poly = estrin(
        &[
            9.451797158780131e-3,
            1.126446405111627e-1,
            4.451353886588814e-1,
            5.836596684310648e-1,
        ],
        x,
    );
    let upper = T::select(x.simd_gt(T::from_f64(X2)), x, poly);
    T::select(x.simd_lt(T::from_f64(X1)), T::default(), upper)
}

/// Third-order approximation: cubic core with an asymptotic `x - ln x` tail.
#[inline]
pub fn omega3<T: Sample>(x: T) -> T {
    const X1: f64 = -3.341459552768620;
    const X2: f64 = 8.0;
    let poly = estrin(
        &[
            -1.314293149877800e-3,
            4.775931364975583e-2,
            3.631952663804445e-1,
            6.313183464296682e-1,
        ],
        x,
    );
    let upper = T::select(x.simd_lt(T::from_f64(X2)), poly, x - log_approx(x));
    T::select(x.simd_lt(T::from_f64(X1)), T::default(), upper)
}

/// Fourth-order approximation: one correction step applied to [`omega3`].
#[inline]
pub fn omega4<T: Sample>(x: T) -> T {
    let y = omega3(x);
    y - (y - exp_approx(x - y)) / (y + T::from_f64(1.0))
}

/// Wright omega to full double precision, by Newton iteration.
///
/// Slow; used as ground truth by the CLI accuracy table and the tests.
pub fn wright_omega(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut w = if x < -2.0 {
        x.exp()
    } else if x > 1.0 {
        x - x.ln()
    } else {
        omega2(x)
    };
    if w <= 0.0 {
        // exp underflow far left of the origin
        return 0.0;
    }
    for _ in 0..64 {
        let next = w * (1.0 + x - w.ln()) / (1.0 + w);
        if (next - w).abs() <= 1e-15 * w.abs().max(1e-300) {
            return next;
        }
        w = next;
    }
    w
}
