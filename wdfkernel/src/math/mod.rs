//! Numeric building blocks: the generic sample type and the fast
//! transcendental approximations the diode models depend on.

pub mod omega;
pub mod sample;

pub use sample::Sample;
