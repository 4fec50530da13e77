//! Shared-handle one-port leaves.
//!
//! Each leaf is the owned element from [`wdft`](crate::wdft) behind a
//! [`Wdf`] handle. Setters go through [`Wdf::update`], so a value change
//! re-adapts every ancestor up to the root.

use super::Wdf;
use crate::math::Sample;
use crate::wdft;

/// Declare a handle alias over a `wdft` leaf with its constructor and
/// propagating setters.
macro_rules! shared_leaf {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, new($($arg:ident),*) $(, $setter:ident)* $(,)?
    ) => {
        $(#[$meta])*
        pub type $name<T> = Wdf<T, wdft::$name<T>>;

        impl<T: Sample> Wdf<T, wdft::$name<T>> {
            pub fn new($($arg: T),*) -> Self {
                Wdf::leaf(wdft::$name::new($($arg),*), $kind)
            }

            $(
                pub fn $setter(&self, value: T) {
                    self.update(|e| e.$setter(value));
                }
            )*
        }
    };
}
pub(crate) use shared_leaf;

shared_leaf!(Resistor, "resistor", new(resistance), set_resistance_value);

shared_leaf!(
    Capacitor,
    "capacitor",
    new(capacitance, sample_rate),
    set_capacitance_value,
    prepare,
);

shared_leaf!(
    /// Capacitor discretised with the alpha transform.
    CapacitorAlpha,
    "capacitor_alpha",
    new(capacitance, sample_rate, alpha),
    set_capacitance_value,
    set_alpha,
    prepare,
);

shared_leaf!(
    Inductor,
    "inductor",
    new(inductance, sample_rate),
    set_inductance_value,
    prepare,
);

shared_leaf!(
    InductorAlpha,
    "inductor_alpha",
    new(inductance, sample_rate, alpha),
    set_inductance_value,
    set_alpha,
    prepare,
);

shared_leaf!(
    ResistorCapacitorSeries,
    "rc_series",
    new(resistance, capacitance, sample_rate),
    set_resistance_value,
    set_capacitance_value,
    prepare,
);

shared_leaf!(
    ResistorCapacitorParallel,
    "rc_parallel",
    new(resistance, capacitance, sample_rate),
    set_resistance_value,
    set_capacitance_value,
    prepare,
);

/// Open circuit.
pub type Open<T> = Wdf<T, wdft::Open<T>>;

impl<T: Sample> Wdf<T, wdft::Open<T>> {
    pub fn new() -> Self {
        Wdf::leaf(wdft::Open::default(), "open")
    }
}

/// Short circuit.
pub type Short<T> = Wdf<T, wdft::Short<T>>;

impl<T: Sample> Wdf<T, wdft::Short<T>> {
    pub fn new() -> Self {
        Wdf::leaf(wdft::Short::default(), "short")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_reach_the_element() {
        let r = Resistor::new(100.0);
        r.set_resistance_value(220.0);
        assert_eq!(r.impedance(), 220.0);
        assert_eq!(r.with(|e| e.resistance_value()), 220.0);
        assert_eq!(r.kind(), "resistor");

        let c: Capacitor<f64> = Capacitor::new(1.0e-6, 48_000.0);
        c.prepare(96_000.0);
        assert!((c.impedance() - 1.0 / (2.0 * 1.0e-6 * 96_000.0)).abs() < 1e-9);
    }

    #[test]
    fn open_and_short_extremes() {
        let o = Open::<f64>::new();
        let s = Short::<f64>::new();
        assert!(o.impedance() > 1.0e12);
        assert!(s.impedance() < 1.0e-12);
    }
}
