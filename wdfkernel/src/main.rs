//! wdfkernel CLI
//!
//! Offline rendering and accuracy reports for the reference circuits.
//!
//! ```bash
//! # Write a starter config
//! wdfkernel init clipper.yaml
//!
//! # Render a WAV through the configured circuit
//! wdfkernel render clipper.yaml guitar.wav out.wav
//!
//! # Wright-Omega approximation errors on [-10, 10]
//! wdfkernel omega --step 0.01
//!
//! # Small-signal magnitude response
//! wdfkernel sweep tonestack.yaml
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use wdfkernel::config::RenderConfig;
use wdfkernel::math::omega::{omega1, omega2, omega3, omega4, wright_omega};
use wdfkernel::wav::{read_wav_mono, render_to_wav};

#[derive(Parser)]
#[command(name = "wdfkernel")]
#[command(about = "Wave Digital Filter circuit renderer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the configured circuit
    Render {
        config: PathBuf,
        input: PathBuf,
        output: PathBuf,
    },

    /// Print absolute errors of the Wright-Omega approximations
    Omega {
        #[arg(long, default_value = "-10.0", allow_hyphen_values = true)]
        min: f64,
        #[arg(long, default_value = "10.0", allow_hyphen_values = true)]
        max: f64,
        #[arg(long, default_value = "0.1")]
        step: f64,
    },

    /// Print the magnitude response of the configured circuit
    Sweep {
        config: PathBuf,
        /// Test tone amplitude (keep small for the diode clipper)
        #[arg(long, default_value = "0.01")]
        amplitude: f64,
    },

    /// Write a default render config
    Init {
        #[arg(default_value = "render.yaml")]
        path: PathBuf,
    },
}

const SWEEP_FREQS: [f64; 10] = [
    30.0, 60.0, 120.0, 250.0, 500.0, 1_000.0, 2_000.0, 4_000.0, 8_000.0, 15_000.0,
];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    match &cli.command {
        Commands::Render { config, input, output } => render(config, input, output),
        Commands::Omega { min, max, step } => omega_report(*min, *max, *step),
        Commands::Sweep { config, amplitude } => sweep(config, *amplitude),
        Commands::Init { path } => init_config(path),
    }
}

fn render(config: &Path, input: &Path, output: &Path) -> anyhow::Result<()> {
    let mut cfg = RenderConfig::load(config)
        .with_context(|| format!("loading {}", config.display()))?;
    let (samples, sample_rate) =
        read_wav_mono(input).with_context(|| format!("reading {}", input.display()))?;
    println!(
        "{} Input: {} ({} samples, {} Hz)",
        "▶".blue(),
        input.display(),
        samples.len(),
        sample_rate
    );

    if cfg.sample_rate != sample_rate as f64 {
        println!(
            "  {} Config sample rate {} overridden by the input file",
            "⚠".yellow(),
            cfg.sample_rate
        );
        cfg.sample_rate = sample_rate as f64;
    }

    let mut circuit = cfg.build().context("building circuit")?;
    let rendered = render_to_wav(&mut circuit, &samples, output, sample_rate)
        .with_context(|| format!("writing {}", output.display()))?;

    let peak = rendered.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    println!(
        "{} Wrote {} (peak {:.3}, {:.1} dBFS)",
        "✓".green(),
        output.display(),
        peak,
        20.0 * peak.max(1e-12).log10()
    );
    Ok(())
}

fn omega_report(min: f64, max: f64, step: f64) -> anyhow::Result<()> {
    if step.is_nan() || step <= 0.0 || max < min {
        anyhow::bail!("need min <= max and a positive step, got [{min}, {max}] by {step}");
    }

    let approximations: [(&str, fn(f64) -> f64); 4] = [
        ("omega1", omega1::<f64>),
        ("omega2", omega2::<f64>),
        ("omega3", omega3::<f64>),
        ("omega4", omega4::<f64>),
    ];
    let steps = ((max - min) / step).round() as usize;

    println!("{}", "Wright-Omega approximation error".bold());
    println!("{}", "─".repeat(50));
    println!("{:<8} {:>14} {:>14} {:>10}", "order", "max |err|", "mean |err|", "at x");

    for (name, f) in approximations {
        let mut max_err = 0.0_f64;
        let mut worst_x = min;
        let mut sum = 0.0;
        for i in 0..=steps {
            let x = min + i as f64 * step;
            let err = (f(x) - wright_omega(x)).abs();
            sum += err;
            if err > max_err {
                max_err = err;
                worst_x = x;
            }
        }
        println!(
            "{:<8} {:>14.6e} {:>14.6e} {:>10.3}",
            name.green(),
            max_err,
            sum / (steps + 1) as f64,
            worst_x
        );
    }
    Ok(())
}

fn sweep(config: &Path, amplitude: f64) -> anyhow::Result<()> {
    let cfg = RenderConfig::load(config)
        .with_context(|| format!("loading {}", config.display()))?;
    let fs = cfg.sample_rate;
    let mut circuit = cfg.build().context("building circuit")?;

    println!("{} {:?} at {} Hz", "▶".blue(), cfg.circuit, fs);
    println!("{:>10} {:>10}", "freq (Hz)", "dB");

    for freq in SWEEP_FREQS.into_iter().filter(|f| *f < 0.5 * fs) {
        circuit.reset();
        // settle for 200 ms, then measure over the next 100 ms
        let settle = (0.2 * fs) as usize;
        let total = settle + (0.1 * fs) as usize;
        let mut peak = 0.0_f64;
        for n in 0..total {
            let x = amplitude * (2.0 * std::f64::consts::PI * freq * n as f64 / fs).sin();
            let y = circuit.process(x);
            if n >= settle {
                peak = peak.max(y.abs());
            }
        }
        println!("{:>10.0} {:>10.2}", freq, 20.0 * (peak / amplitude).max(1e-12).log10());
    }
    Ok(())
}

fn init_config(path: &Path) -> anyhow::Result<()> {
    let yaml = RenderConfig::default_config().to_yaml()?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    println!("{} Created default config at: {}", "✓".green(), path.display());
    Ok(())
}
