//! Headless random walk over the turgles buffers.
//!
//! Usage: `turgles-walk [turtles] [frames]`

mod walk;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use turgles_engine::logging::{init_logging, LoggingConfig};

use walk::{Walk, WalkConfig};

const REPORT_EVERY: u32 = 60;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = parse_args(std::env::args().skip(1))?;
    log::info!(
        "turgles-walk: {} turtles, {} frames, {} shapes",
        config.turtles,
        config.frames,
        config.shapes.len()
    );

    let frames = config.frames;
    let churn_every = config.churn_every.max(1);

    let started = Instant::now();
    let mut walk = Walk::new(config)?;
    log::info!("spawned in {:.1} ms", ms(started.elapsed()));

    let mut update_total = Duration::ZERO;
    for frame in 1..=frames {
        let t = Instant::now();
        walk.step()?;
        if frame % churn_every == 0 {
            walk.churn()?;
        }
        update_total += t.elapsed();

        if frame % REPORT_EVERY == 0 || frame == frames {
            report(&walk, frame, update_total);
        }
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<WalkConfig> {
    let mut config = WalkConfig::default();
    if let Some(arg) = args.next() {
        config.turtles = arg
            .parse()
            .with_context(|| format!("invalid turtle count '{arg}'"))?;
    }
    if let Some(arg) = args.next() {
        config.frames = arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'"))?;
    }
    Ok(config)
}

fn report(walk: &Walk, frame: u32, update_total: Duration) {
    log::info!(
        "frame {frame}: avg update {:.3} ms, upload {} KiB",
        ms(update_total) / frame as f64,
        walk.upload_bytes() / 1024
    );

    let mut shapes: Vec<_> = walk.manager().shapes().collect();
    shapes.sort_by(|a, b| a.shape().cmp(b.shape()));
    for shape in shapes {
        log::debug!(
            "  {:<10} {:>7} / {:<7}",
            shape.shape(),
            shape.count(),
            shape.size()
        );
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
