//! Wright omega approximations against the reference table.

mod common;

use common::WRIGHT_OMEGA_TABLE;
use wdfkernel::math::omega::{omega1, omega2, omega3, omega4, wright_omega};

fn errors(f: fn(f64) -> f64) -> Vec<f64> {
    WRIGHT_OMEGA_TABLE
        .iter()
        .map(|&(x, w)| (f(x) - w).abs())
        .collect()
}

fn max(e: &[f64]) -> f64 {
    e.iter().copied().fold(0.0, f64::max)
}

fn mean(e: &[f64]) -> f64 {
    e.iter().sum::<f64>() / e.len() as f64
}

#[test]
fn each_order_meets_its_tolerance() {
    let cases: [(&str, fn(f64) -> f64, f64); 4] = [
        ("omega1", omega1::<f64>, 2.1),
        ("omega2", omega2::<f64>, 2.1),
        ("omega3", omega3::<f64>, 0.3),
        ("omega4", omega4::<f64>, 0.05),
    ];
    for (name, f, tol) in cases {
        for &(x, w) in &WRIGHT_OMEGA_TABLE {
            let err = (f(x) - w).abs();
            assert!(err <= tol, "{name}({x}) = {}, expected {w} ± {tol}", f(x));
        }
    }
}

#[test]
fn single_precision_meets_the_same_tolerances() {
    let cases: [(fn(f32) -> f32, f32); 4] = [
        (omega1::<f32>, 2.1),
        (omega2::<f32>, 2.1),
        (omega3::<f32>, 0.3),
        (omega4::<f32>, 0.05),
    ];
    for (f, tol) in cases {
        for &(x, w) in &WRIGHT_OMEGA_TABLE {
            let err = (f(x as f32) - w as f32).abs();
            assert!(err <= tol, "x = {x}, err = {err}");
        }
    }
}

#[test]
fn higher_orders_are_more_accurate_overall() {
    let e = [
        errors(omega1::<f64>),
        errors(omega2::<f64>),
        errors(omega3::<f64>),
        errors(omega4::<f64>),
    ];
    for k in 1..4 {
        assert!(max(&e[k]) <= max(&e[k - 1]), "max error of order {} vs {}", k + 1, k);
        assert!(mean(&e[k]) <= mean(&e[k - 1]), "mean error of order {} vs {}", k + 1, k);
    }
}

#[test]
fn omega4_never_loses_to_omega3() {
    let e3 = errors(omega3::<f64>);
    let e4 = errors(omega4::<f64>);
    for ((&(x, _), a), b) in WRIGHT_OMEGA_TABLE.iter().zip(&e4).zip(&e3) {
        assert!(a <= b, "x = {x}: omega4 err {a} > omega3 err {b}");
    }
}

#[test]
fn reference_solver_reproduces_the_table() {
    for &(x, w) in &WRIGHT_OMEGA_TABLE {
        let r = wright_omega(x);
        assert!((r - w).abs() <= 1e-12 * w.max(1.0), "x = {x}: {r} vs {w}");
    }
}
