//! YAML render configuration.
//!
//! A render config names one of the reference circuits, its knob values and
//! the sample rate the CLI renders at.
//!
//! ```yaml
//! sample_rate: 48000
//! output_gain_db: -6.0
//! circuit:
//!   type: diode_clipper
//!   cutoff_hz: 720.0
//!   model: germanium
//!   n_diodes: 2
//!   quality: good
//! ```
//!
//! ```rust
//! use wdfkernel::config::{CircuitConfig, RenderConfig};
//!
//! let config: RenderConfig = serde_yaml::from_str(
//!     "circuit:\n  type: tonestack\n  high: 0.8\n",
//! ).unwrap();
//! assert_eq!(config.sample_rate, 48_000.0);
//! assert!(matches!(config.circuit, CircuitConfig::Tonestack { low, .. } if low == 0.5));
//! config.validate().unwrap();
//! ```

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::circuits::{BassmanTonestack, DiodeClipper, RcLowpass, DEFAULT_CAPACITANCE};
use crate::error::{Result, WdfError};
use crate::wdft::{DiodeModel, DiodeQuality};
use crate::CircuitProcessor;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    /// Applied after the circuit. Unity when absent.
    #[serde(default)]
    pub output_gain_db: Option<f64>,
    pub circuit: CircuitConfig,
}

/// Which circuit to render, with its knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CircuitConfig {
    RcLowpass {
        #[serde(default = "default_cutoff")]
        cutoff_hz: f64,
        #[serde(default = "default_rc_capacitance")]
        capacitance: f64,
    },
    /// `cutoff_hz` sets the input resistor against the fixed 47 nF cap.
    DiodeClipper {
        #[serde(default = "default_cutoff")]
        cutoff_hz: f64,
        #[serde(default = "default_model")]
        model: String,
        #[serde(default = "default_n_diodes")]
        n_diodes: f64,
        #[serde(default)]
        quality: Quality,
    },
    Tonestack {
        #[serde(default = "default_knob")]
        high: f64,
        #[serde(default = "default_knob")]
        low: f64,
        #[serde(default = "default_knob")]
        mid: f64,
    },
}

/// Serializable mirror of [`DiodeQuality`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Good,
    #[default]
    Best,
}

impl From<Quality> for DiodeQuality {
    fn from(q: Quality) -> Self {
        match q {
            Quality::Good => DiodeQuality::Good,
            Quality::Best => DiodeQuality::Best,
        }
    }
}

fn default_sample_rate() -> f64 { 48_000.0 }
fn default_cutoff() -> f64 { 1_000.0 }
fn default_rc_capacitance() -> f64 { 1.0e-6 }
fn default_model() -> String { "silicon".to_string() }
fn default_n_diodes() -> f64 { 1.0 }
fn default_knob() -> f64 { 0.5 }

impl RenderConfig {
    /// Load configuration from a YAML file and check its ranges.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        log::debug!("loaded render config from {}: {:?}", path.display(), config.circuit);
        Ok(config)
    }

    /// Diode clipper at the default cutoff.
    pub fn default_config() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            output_gain_db: None,
            circuit: CircuitConfig::DiodeClipper {
                cutoff_hz: default_cutoff(),
                model: default_model(),
                n_diodes: default_n_diodes(),
                quality: Quality::default(),
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        positive("sample_rate", self.sample_rate)?;
        if let Some(db) = self.output_gain_db {
            if !db.is_finite() {
                return Err(WdfError::InvalidParameter { name: "output_gain_db", value: db });
            }
        }

        let nyquist = 0.5 * self.sample_rate;
        match &self.circuit {
            CircuitConfig::RcLowpass { cutoff_hz, capacitance } => {
                below_nyquist(*cutoff_hz, nyquist)?;
                positive("capacitance", *capacitance)?;
            }
            CircuitConfig::DiodeClipper { cutoff_hz, model, n_diodes, .. } => {
                below_nyquist(*cutoff_hz, nyquist)?;
                positive("n_diodes", *n_diodes)?;
                if DiodeModel::from_name(model).is_none() {
                    return Err(WdfError::UnknownDiodeModel(model.clone()));
                }
            }
            CircuitConfig::Tonestack { high, low, mid } => {
                knob("high", *high)?;
                knob("low", *low)?;
                knob("mid", *mid)?;
            }
        }
        Ok(())
    }

    /// Linear output gain.
    pub fn output_gain(&self) -> f64 {
        self.output_gain_db.map_or(1.0, |db| 10f64.powf(db / 20.0))
    }

    /// Instantiate the configured circuit at `sample_rate`.
    pub fn build(&self) -> Result<Box<dyn CircuitProcessor>> {
        self.validate()?;
        let fs = self.sample_rate;
        let circuit: Box<dyn CircuitProcessor> = match &self.circuit {
            CircuitConfig::RcLowpass { cutoff_hz, capacitance } => {
                Box::new(RcLowpass::new(*cutoff_hz, *capacitance, fs))
            }
            CircuitConfig::DiodeClipper { cutoff_hz, model, n_diodes, quality } => {
                let diode = DiodeModel::from_name(model)
                    .ok_or_else(|| WdfError::UnknownDiodeModel(model.clone()))?;
                let r = 1.0 / (2.0 * PI * cutoff_hz * DEFAULT_CAPACITANCE);
                let mut dc = DiodeClipper::new(fs);
                dc.set_resistance(r);
                dc.set_model(diode, *n_diodes);
                dc.set_quality((*quality).into());
                Box::new(dc)
            }
            CircuitConfig::Tonestack { high, low, mid } => {
                let mut ts = BassmanTonestack::new(fs);
                ts.set_params(*high, *low, *mid);
                Box::new(ts)
            }
        };

        match self.output_gain_db {
            None => Ok(circuit),
            Some(_) => Ok(Box::new(OutputGain {
                inner: circuit,
                gain: self.output_gain(),
            })),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WdfError::InvalidParameter { name, value })
    }
}

fn below_nyquist(cutoff_hz: f64, nyquist: f64) -> Result<()> {
    positive("cutoff_hz", cutoff_hz)?;
    if cutoff_hz >= nyquist {
        return Err(WdfError::InvalidParameter { name: "cutoff_hz", value: cutoff_hz });
    }
    Ok(())
}

fn knob(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WdfError::InvalidParameter { name, value })
    }
}

struct OutputGain {
    inner: Box<dyn CircuitProcessor>,
    gain: f64,
}

impl CircuitProcessor for OutputGain {
    fn process(&mut self, input: f64) -> f64 {
        self.gain * self.inner.process(input)
    }

    fn set_sample_rate(&mut self, rate: f64) {
        self.inner.set_sample_rate(rate);
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: RenderConfig =
            serde_yaml::from_str("circuit:\n  type: diode_clipper\n").unwrap();
        assert_eq!(cfg.sample_rate, 48_000.0);
        assert!(cfg.output_gain_db.is_none());
        match cfg.circuit {
            CircuitConfig::DiodeClipper { cutoff_hz, model, n_diodes, quality } => {
                assert_eq!(cutoff_hz, 1_000.0);
                assert_eq!(model, "silicon");
                assert_eq!(n_diodes, 1.0);
                assert_eq!(quality, Quality::Best);
            }
            other => panic!("unexpected circuit {other:?}"),
        }
    }

    #[test]
    fn pots_out_of_range_are_rejected() {
        let cfg: RenderConfig =
            serde_yaml::from_str("circuit:\n  type: tonestack\n  low: 1.5\n").unwrap();
        match cfg.validate() {
            Err(WdfError::InvalidParameter { name, value }) => {
                assert_eq!(name, "low");
                assert_eq!(value, 1.5);
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn cutoff_must_be_below_nyquist() {
        let cfg: RenderConfig = serde_yaml::from_str(
            "sample_rate: 8000\ncircuit:\n  type: rc_lowpass\n  cutoff_hz: 4000\n",
        )
        .unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(WdfError::InvalidParameter { name: "cutoff_hz", .. })
        ));
    }

    #[test]
    fn unknown_model_is_reported() {
        let cfg: RenderConfig = serde_yaml::from_str(
            "circuit:\n  type: diode_clipper\n  model: unobtainium\n",
        )
        .unwrap();
        assert!(matches!(cfg.build().err(), Some(WdfError::UnknownDiodeModel(m)) if m == "unobtainium"));
    }

    #[test]
    fn output_gain_scales_the_circuit() {
        let mut cfg: RenderConfig = serde_yaml::from_str(
            "circuit:\n  type: rc_lowpass\n  cutoff_hz: 1000\n",
        )
        .unwrap();
        let mut plain = cfg.build().unwrap();
        cfg.output_gain_db = Some(-20.0);
        let mut quiet = cfg.build().unwrap();
        for _ in 0..100 {
            let a = plain.process(1.0);
            let b = quiet.process(1.0);
            assert!((0.1 * a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn default_config_survives_yaml() {
        let yaml = RenderConfig::default_config().to_yaml().unwrap();
        let back: RenderConfig = serde_yaml::from_str(&yaml).unwrap();
        back.validate().unwrap();
        assert!(matches!(back.circuit, CircuitConfig::DiodeClipper { .. }));
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "sample_rate: 44100\ncircuit:\n  type: tonestack\n").unwrap();
        let cfg = RenderConfig::load(&path).unwrap();
        assert_eq!(cfg.sample_rate, 44_100.0);
        assert!(RenderConfig::load(dir.path().join("missing.yaml")).is_err());
    }
}
