//! Diode clipper: resistive source across a capacitor, clipped by an
//! anti-parallel diode pair.

use crate::math::Sample;
use crate::wdft::{
    voltage, Capacitor, DiodeModel, DiodePair, DiodeQuality, PolarityInverter, ResistiveVoltageSource, Root,
    WdfNode, WdfParallel, THERMAL_VOLTAGE,
};
use crate::CircuitProcessor;

type Tree<T> =
    DiodePair<T, PolarityInverter<T, WdfParallel<T, ResistiveVoltageSource<T>, Capacitor<T>>>>;

pub const DEFAULT_RESISTANCE: f64 = 4700.0;
pub const DEFAULT_CAPACITANCE: f64 = 47.0e-9;
pub const DEFAULT_SATURATION_CURRENT: f64 = 2.52e-9;

pub struct DiodeClipper<T: Sample = f64> {
    root: Tree<T>,
}

impl<T: Sample> DiodeClipper<T> {
    /// 4.7 kΩ, 47 nF, 1N4148-style diodes.
    pub fn new(sample_rate: T) -> Self {
        Self::with_params(
            T::from_f64(DEFAULT_RESISTANCE),
            T::from_f64(DEFAULT_CAPACITANCE),
            T::from_f64(DEFAULT_SATURATION_CURRENT),
            sample_rate,
        )
    }

    pub fn with_params(resistance: T, capacitance: T, is: T, sample_rate: T) -> Self {
        let p = WdfParallel::new(
            ResistiveVoltageSource::new(resistance),
            Capacitor::new(capacitance, sample_rate),
        );
        Self {
            root: DiodePair::new(PolarityInverter::new(p), is),
        }
    }

    pub fn set_resistance(&mut self, resistance: T) {
        self.root
            .next_mut()
            .port1_mut()
            .port1_mut()
            .set_resistance_value(resistance);
    }

    pub fn set_capacitance(&mut self, capacitance: T) {
        self.root
            .next_mut()
            .port1_mut()
            .port2_mut()
            .set_capacitance_value(capacitance);
    }

    /// `n_diodes` in series per direction.
    pub fn set_diodes(&mut self, is: T, n_diodes: T) {
        self.root
            .set_diode_parameters(is, T::from_f64(THERMAL_VOLTAGE), n_diodes);
    }

    /// Load a diode preset. `n_vt` already carries the ideality factor.
    pub fn set_model(&mut self, model: DiodeModel, n_diodes: T) {
        self.root.set_diode_parameters(
            T::from_f64(model.is),
            T::from_f64(model.n_vt),
            n_diodes,
        );
    }

    pub fn set_quality(&mut self, quality: DiodeQuality) {
        self.root.set_quality(quality);
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.root
            .next_mut()
            .port1_mut()
            .port2_mut()
            .prepare(sample_rate);
    }

    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn capacitor(&self) -> &Capacitor<T> {
        self.root.next().port1().port2()
    }

    #[inline]
    pub fn process_sample(&mut self, x: T) -> T {
        self.root
            .next_mut()
            .port1_mut()
            .port1_mut()
            .set_voltage(x);
        self.root.process();
        voltage(self.capacitor())
    }
}

impl CircuitProcessor for DiodeClipper<f64> {
    fn process(&mut self, input: f64) -> f64 {
        self.process_sample(input)
    }

    fn set_sample_rate(&mut self, rate: f64) {
        self.prepare(rate);
    }

    fn reset(&mut self) {
        DiodeClipper::reset(self);
    }
}
