//! Reference circuits built on the owned tree.
//!
//! Each circuit maps its knobs to element values and implements
//! [`CircuitProcessor`](crate::CircuitProcessor) at `f64`. The generic
//! `process_sample` also runs on SIMD lanes.

mod diode_clipper;
mod rc_lowpass;
mod tonestack;

pub use diode_clipper::{
    DiodeClipper, DEFAULT_CAPACITANCE, DEFAULT_RESISTANCE, DEFAULT_SATURATION_CURRENT,
};
pub use rc_lowpass::RcLowpass;
pub use tonestack::{bassman_s_matrix, BassmanImpedanceCalc, BassmanTonestack};
