//! wdfkernel: Wave Digital Filter building blocks for modeling analog
//! circuits one sample at a time.
//!
//! # Modules
//!
//! - [`math`]: the `Sample` abstraction and the Wright-Omega approximations
//! - [`wdft`]: statically composed trees: elements, adaptors, roots
//! - [`rtype`]: R-type junctions driven by a precomputed scattering matrix
//! - [`wdf`]: the same algebra over runtime-composed shared handles
//! - [`circuits`]: RC lowpass, diode clipper and Bassman tone stack
//! - [`config`]: YAML render configuration
//! - [`wav`]: WAV file I/O for offline rendering

pub mod circuits;
pub mod config;
pub mod error;
pub mod junction;
pub mod math;
pub mod rtype;
pub mod wav;
pub mod wdf;
pub mod wdft;

pub use error::{Result, WdfError};
pub use math::Sample;

/// A mono circuit that turns one input sample into one output sample.
pub trait CircuitProcessor {
    /// Process a single sample.
    fn process(&mut self, input: f64) -> f64;

    /// Set sample rate (call before processing).
    fn set_sample_rate(&mut self, rate: f64);

    /// Reset all internal state.
    fn reset(&mut self);
}

impl<P: CircuitProcessor + ?Sized> CircuitProcessor for Box<P> {
    fn process(&mut self, input: f64) -> f64 {
        (**self).process(input)
    }

    fn set_sample_rate(&mut self, rate: f64) {
        (**self).set_sample_rate(rate);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
