//! Traffic control example: run the shaping queue and print per-class delays.
//!
//! Three lanes of traffic (voip, video, data) feed a queue that releases
//! one packet per interval. Run it once with `--mode priority` and once
//! with `--mode fifo` to compare the queueing delay of each class.
//!
//! Run with:
//!   cargo run --example traffic_control -p qos-sim -- --mode fifo --duration 2m

use anyhow::{Context as _, Result};
use clap::Parser;
use indicatif::ProgressBar;
use qos_core::parse_duration;
use qos_sim::{QueueMode, ReleaseInterval, TrafficClass, TrafficControl};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Priority queue traffic shaping simulation")]
struct Args {
    /// Ordering of the shaping queue (`priority` or `fifo`).
    #[arg(long, default_value_t = QueueMode::Priority)]
    mode: QueueMode,

    /// Minimum time between two releases of the queue.
    #[arg(long, default_value_t = ReleaseInterval::from_millis(500))]
    release_interval: ReleaseInterval,

    /// Simulated time to run for.
    #[arg(long, default_value = "60s", value_parser = parse_duration)]
    duration: Duration,

    /// Duration of one simulation frame.
    #[arg(long, default_value = "16ms", value_parser = parse_duration)]
    frame: Duration,

    /// Seed of the traffic generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log a warning when the queue holds that many packets.
    #[arg(long)]
    depth_warning: Option<usize>,

    /// Log every released packet.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut builder = TrafficControl::builder()
        .set_mode(args.mode)
        .set_release_interval(args.release_interval)
        .set_frame(args.frame)
        .set_seed(args.seed);
    if let Some(threshold) = args.depth_warning {
        builder = builder.set_depth_warning(threshold);
    }
    let mut sim = builder
        .build()
        .context("Failed to configure the simulation")?;

    info!(
        mode = %args.mode,
        release_interval = %args.release_interval,
        seed = args.seed,
        "Starting traffic control simulation..."
    );

    let pb = ProgressBar::new(sim.frames_in(args.duration));
    sim.run_for_with(args.duration, |_| pb.inc(1));
    pb.finish_with_message("Simulation complete");

    let stats = sim.stats();
    println!(
        "{mode} queue, {interval} release interval, {now} simulated",
        mode = args.mode,
        interval = args.release_interval,
        now = stats.now,
    );
    println!(
        "{:<12} {:>9} {:>9} {:>8} {:>12} {:>12}",
        "class", "generated", "released", "waiting", "mean delay", "max delay"
    );
    for class in TrafficClass::LANES {
        let class_stats = stats.class(class);
        let mean = class_stats
            .mean_delay()
            .map(|delay| format!("{}ms", delay.as_millis()))
            .unwrap_or_else(|| "-".to_owned());
        println!(
            "{:<12} {:>9} {:>9} {:>8} {:>12} {:>12}",
            class.to_string(),
            class_stats.generated,
            class_stats.released,
            class_stats.waiting,
            mean,
            format!("{}ms", class_stats.max_delay.as_millis()),
        );
    }
    println!(
        "queue depth: {depth} (high water mark: {hwm})",
        depth = stats.queue.depth,
        hwm = stats.queue.high_water_mark,
    );

    Ok(())
}
