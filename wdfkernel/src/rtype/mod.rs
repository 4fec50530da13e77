//! R-type junctions for topologies that do not split into series and
//! parallel pairs (bridged-T networks, tone stacks, multi-winding
//! transformers).
//!
//! A junction scatters all of its ports at once through a dense matrix:
//! `b = S · a`. The matrix depends on the port impedances, so it is computed
//! outside the junction, by an impedance calculator, and injected with
//! `set_s_matrix_data`. Until that happens the junction is unconfigured and
//! refuses to run.
//!
//! **Reference:** K. J. Werner, "Virtual Analog Modeling of Audio Circuitry
//! Using Wave Digital Filters", PhD thesis, Stanford 2016, chapter 2.

mod adaptor;
mod matrix;
mod ports;
mod root;

pub use adaptor::{ImpedanceCalculator, RtypeAdaptor};
pub use matrix::{DynScatteringMatrix, ScatteringMatrix};
pub(crate) use ports::port_index;
pub use ports::PortTuple;
pub use root::{RootImpedanceCalculator, RootRtypeAdaptor};
