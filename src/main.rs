//! Report all intersections of the segments in a file, and the input
//! points that lie on a common line.
//!
//! Usage:
//!   line-crossings segments.txt out.txt points.txt
//!
//! Enable logging with `RUST_LOG`:
//!   RUST_LOG=debug line-crossings segments.txt out.txt points.txt
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;

use line_crossings::{
    collinear_points, io, largest_common_set, Sweep, SweepConfig, VerticalPolicy,
};

/// Find all intersection points of a set of line segments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Segments file: a count, then one `x1 y1 x2 y2` line per segment
    segments: PathBuf,

    /// Report file to write the intersection points to
    output: PathBuf,

    /// Points file: a count, then the point coordinates
    points: PathBuf,

    /// Tolerance for coordinate comparisons
    #[arg(long, default_value = "1e-6")]
    eps: f64,

    /// Decimal digits in the report
    #[arg(long, default_value = "3")]
    digits: usize,

    /// Drop vertical segments instead of intersecting them
    #[arg(long)]
    exclude_vertical: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(
        args.eps.is_finite() && args.eps >= 0.,
        "tolerance must be finite and non-negative, got {}",
        args.eps
    );

    let vertical = if args.exclude_vertical {
        VerticalPolicy::Exclude
    } else {
        VerticalPolicy::Include
    };
    let config = SweepConfig::default()
        .with_eps(args.eps)
        .with_output_digits(args.digits)
        .with_vertical(vertical);

    let segments = io::read_segments(&args.segments).context("reading segments")?;
    info!("sweeping {} segments", segments.len());
    let crossings = Sweep::new(segments, config.clone()).run();
    info!("{} intersection points", crossings.len());

    io::write_report_file(&args.output, &crossings, config.output_digits)
        .context("writing report")?;

    let points = io::read_points(&args.points).context("reading points")?;
    match largest_common_set(&crossings) {
        Some(set) => {
            info!(
                "{} segments meet at ({}, {})",
                set.indices.len(),
                set.point.x(),
                set.point.y()
            );
            println!("Largest subset of points that lie on a common line ::");
            for p in collinear_points(&set, &points) {
                println!("{:?}, {:?}", p.x, p.y);
            }
        }
        None => println!("No segment intersections found."),
    }
    Ok(())
}
