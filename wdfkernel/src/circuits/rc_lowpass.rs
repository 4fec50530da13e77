//! First-order RC lowpass.

use std::f64::consts::PI;

use crate::math::Sample;
use crate::wdft::{
    voltage, Capacitor, IdealVoltageSource, PolarityInverter, Resistor, Root, WdfNode, WdfSeries,
};
use crate::CircuitProcessor;

type Tree<T> = IdealVoltageSource<T, PolarityInverter<T, WdfSeries<T, Resistor<T>, Capacitor<T>>>>;

/// Resistor in series with a capacitor, driven by an ideal source. The
/// output is the capacitor voltage.
pub struct RcLowpass<T: Sample = f64> {
    root: Tree<T>,
    capacitance: T,
}

impl<T: Sample> RcLowpass<T> {
    pub fn new(cutoff: T, capacitance: T, sample_rate: T) -> Self {
        let r = Self::resistance_for(cutoff, capacitance);
        let series = WdfSeries::new(Resistor::new(r), Capacitor::new(capacitance, sample_rate));
        Self {
            root: IdealVoltageSource::new(PolarityInverter::new(series)),
            capacitance,
        }
    }

    /// `R = 1 / (2π fc C)`
    fn resistance_for(cutoff: T, capacitance: T) -> T {
        T::from_f64(1.0) / (T::from_f64(2.0 * PI) * cutoff * capacitance)
    }

    pub fn set_cutoff(&mut self, cutoff: T) {
        let r = Self::resistance_for(cutoff, self.capacitance);
        self.root
            .next_mut()
            .port1_mut()
            .port1_mut()
            .set_resistance_value(r);
    }

    pub fn prepare(&mut self, sample_rate: T) {
        self.root
            .next_mut()
            .port1_mut()
            .port2_mut()
            .prepare(sample_rate);
    }

    /// Clear the capacitor state without touching parameters.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn resistor(&self) -> &Resistor<T> {
        self.root.next().port1().port1()
    }

    pub fn capacitor(&self) -> &Capacitor<T> {
        self.root.next().port1().port2()
    }

    #[inline]
    pub fn process_sample(&mut self, x: T) -> T {
        self.root.set_voltage(x);
        self.root.process();
        voltage(self.capacitor())
    }
}

impl CircuitProcessor for RcLowpass<f64> {
    fn process(&mut self, input: f64) -> f64 {
        self.process_sample(input)
    }

    fn set_sample_rate(&mut self, rate: f64) {
        self.prepare(rate);
    }

    fn reset(&mut self) {
        RcLowpass::reset(self);
    }
}
