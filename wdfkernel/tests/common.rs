//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;

/// Wright omega reference values on [-10, 10], step 0.5 (scipy).
pub const WRIGHT_OMEGA_TABLE: [(f64, f64); 41] = [
    (-10.0, 4.539786874921544e-05),
    (-9.5, 7.484622772024869e-05),
    (-9.0, 0.00012339457692560975),
    (-8.5, 0.00020342698226408345),
    (-8.0, 0.000335350149321062),
    (-7.5, 0.0005527787213627528),
    (-7.0, 0.0009110515723789146),
    (-6.5, 0.0015011839473879653),
    (-6.0, 0.002472630709097278),
    (-5.5, 0.004070171383753891),
    (-5.0, 0.0066930004977309955),
    (-4.5, 0.010987603420879434),
    (-4.0, 0.017989102828531025),
    (-3.5, 0.029324711813756815),
    (-3.0, 0.04747849102486547),
    (-2.5, 0.07607221340790257),
    (-2.0, 0.1200282389876412),
    (-1.5, 0.1853749184489398),
    (-1.0, 0.27846454276107374),
    (-0.5, 0.4046738485459385),
    (0.0, 0.5671432904097838),
    (0.5, 0.7662486081617502),
    (1.0, 1.0),
    (1.5, 1.2649597201255005),
    (2.0, 1.5571455989976113),
    (2.5, 1.8726470404165942),
    (3.0, 2.207940031569323),
    (3.5, 2.559994780412122),
    (4.0, 2.926271062443501),
    (4.5, 3.3046649181693253),
    (5.0, 3.6934413589606496),
    (5.5, 4.091169202271799),
    (6.0, 4.4966641730061605),
    (6.5, 4.908941634486258),
    (7.0, 5.327178301371093),
    (7.5, 5.750681611147114),
    (8.0, 6.178865346308128),
    (8.5, 6.611230244734983),
    (9.0, 7.047348546597604),
    (9.5, 7.486851633496902),
    (10.0, 7.9294200950196965),
];

/// Unit-amplitude sine sample `n` at `freq` Hz.
pub fn sine(freq: f64, n: usize, fs: f64) -> f64 {
    (2.0 * PI * freq * n as f64 / fs).sin()
}

/// Peak gain in dB of `process` driven by a unit sine, measured over
/// `measure` samples after `settle` samples.
pub fn gain_db(
    freq: f64,
    fs: f64,
    settle: usize,
    measure: usize,
    mut process: impl FnMut(f64) -> f64,
) -> f64 {
    let mut peak = 0.0_f64;
    for n in 0..settle + measure {
        let y = process(sine(freq, n, fs));
        if n >= settle {
            peak = peak.max(y.abs());
        }
    }
    20.0 * peak.log10()
}

pub fn db(gain: f64) -> f64 {
    20.0 * gain.abs().log10()
}

/// Series junction, port 0 adapted: `S = I - 2 R_i / ΣR`, scaled per row.
pub fn series_s(r: [f64; 3]) -> [[f64; 3]; 3] {
    let total: f64 = r.iter().sum();
    let mut s = [[0.0; 3]; 3];
    for (i, row) in s.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = if i == j { 1.0 } else { 0.0 } - 2.0 * r[i] / total;
        }
    }
    s
}

/// Parallel junction, port 0 adapted: `S = 2 G_j / ΣG - I`.
pub fn parallel_s(r: [f64; 3]) -> [[f64; 3]; 3] {
    let g = r.map(|ri| 1.0 / ri);
    let total: f64 = g.iter().sum();
    let mut s = [[0.0; 3]; 3];
    for (i, row) in s.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = 2.0 * g[j] / total - if i == j { 1.0 } else { 0.0 };
        }
    }
    s
}
