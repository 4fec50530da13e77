//! WAV file I/O for offline rendering.
//!
//! Circuits are auditioned by rendering a WAV through them with `hound`.
//! Output is always mono 32-bit float.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::Result;
use crate::CircuitProcessor;

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Sine test signal at amplitude 0.5.
pub fn sine_wave(freq_hz: f64, duration_secs: f64, sample_rate: u32) -> Vec<f64> {
    let n = (duration_secs * sample_rate as f64) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            0.5 * (2.0 * std::f64::consts::PI * freq_hz * t).sin()
        })
        .collect()
}

/// Read a WAV file as mono `f64` in `[-1, 1]`, averaging channels.
///
/// Returns the samples and the file's sample rate.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f64>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect();
    Ok((mono, spec.sample_rate))
}

/// Write raw samples to a mono WAV file.
pub fn write_wav(samples: &[f64], path: &Path, sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, wav_spec(sample_rate))?;
    for &s in samples {
        writer.write_sample(s as f32)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Run `input` through `circuit` and write the result.
///
/// The circuit is prepared for `sample_rate` and reset first. Returns the
/// rendered samples.
pub fn render_to_wav<P: CircuitProcessor + ?Sized>(
    circuit: &mut P,
    input: &[f64],
    path: &Path,
    sample_rate: u32,
) -> Result<Vec<f64>> {
    circuit.set_sample_rate(sample_rate as f64);
    circuit.reset();

    let output: Vec<f64> = input.iter().map(|&x| circuit.process(x)).collect();
    write_wav(&output, path, sample_rate)?;
    log::debug!("rendered {} samples to {}", output.len(), path.display());
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
