use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use pendula::config::{PendulumMode, SimConfig};
use pendula::control::SimCommand;
use pendula::simulation::{DoublePendulumSim, SinglePendulumSim};
use pendula::viz::window;

struct Options {
    config_path: Option<PathBuf>,
    mode: Option<PendulumMode>,
    headless: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();

    let options = parse_args()?;
    let mut config = match &options.config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(mode) = options.mode {
        config.mode = mode;
    }
    config.validate()?;

    match options.headless {
        Some(frames) => run_headless(&config, frames),
        None => window::run(config),
    }
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        config_path: None,
        mode: None,
        headless: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--single" => options.mode = Some(PendulumMode::Single),
            "--double" => options.mode = Some(PendulumMode::Double),
            "--headless" => {
                let frames = args.next().context("--headless needs a frame count")?;
                options.headless = Some(
                    frames
                        .parse()
                        .with_context(|| format!("invalid frame count {frames}"))?,
                );
            }
            other if !other.starts_with('-') => options.config_path = Some(other.into()),
            other => bail!("unknown argument {other} (expected [config.ron] [--single|--double] [--headless N])"),
        }
    }
    Ok(options)
}

/// Advances the configured system for a fixed number of frames without a
/// window. Useful as a smoke check on machines without a GPU.
fn run_headless(config: &SimConfig, frames: u64) -> Result<()> {
    println!("--- pendula (headless) ---");

    let start = std::time::Instant::now();
    match config.mode {
        PendulumMode::Single => {
            let mut sim = SinglePendulumSim::from_config(config)?;
            for i in 0..frames {
                sim.advance(None);
                if i % 60 == 0 {
                    print!(".");
                    use std::io::Write;
                    std::io::stdout().flush().ok();
                }
            }
            let state = sim.state();
            println!("\nSimulated {frames} frames in {:.2?}", start.elapsed());
            println!(
                "t={:.1} theta={:.4} omega={:.4} trail={} halted={}",
                sim.time(),
                state.theta,
                state.omega,
                sim.trail().len(),
                sim.is_halted()
            );
        }
        PendulumMode::Double => {
            let mut sim = DoublePendulumSim::from_config(config)?;
            // The double pendulum starts idle.
            sim.apply(SimCommand::Resume);
            for i in 0..frames {
                sim.advance();
                if i % 60 == 0 {
                    print!(".");
                    use std::io::Write;
                    std::io::stdout().flush().ok();
                }
            }
            let state = sim.state();
            let (inner, outer) = sim.trails();
            println!("\nSimulated {frames} frames in {:.2?}", start.elapsed());
            println!(
                "t={:.1} theta1={:.4} theta2={:.4} trails=({}, {}) halted={}",
                sim.time(),
                state.theta1,
                state.theta2,
                inner.len(),
                outer.len(),
                sim.is_halted()
            );
        }
    }
    Ok(())
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}
