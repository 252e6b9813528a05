//! Curvelab demo: evaluates a plot, a Koch snowflake, a sequence and a
//! small dataset, rendering onto an in-memory surface and printing what
//! was drawn.
//!
//! Usage:
//! ```text
//! cargo run --example plot                          # built-in curves
//! cargo run --example plot -- "sin(x)/x" "x**3"     # explicit curves
//! RUST_LOG=curvelab=debug cargo run --example plot  # per-curve detail
//! ```

use curvelab::curve::CurveSpec;
use curvelab::fractal::KochSnowflake;
use curvelab::plot::{Plot, PlotSettings};
use curvelab::render::{palette_color, RecordingSurface, StrokeStyle};
use curvelab::sequence::Sequence;
use curvelab::stats::{
    histogram, parse_dataset, sample_dataset_text, suggested_bins, BoxPlot, Summary,
};
use curvelab::Result;

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for curvelab.
    // Override with RUST_LOG env var (e.g. RUST_LOG=curvelab=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("curvelab=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    plot_curves()?;
    snowflake()?;
    sequence()?;
    statistics()
}

fn plot_curves() -> Result<()> {
    let mut plot = Plot::new(PlotSettings::default())?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        plot.add_curve(CurveSpec::explicit("sin(x)"));
        plot.add_curve(CurveSpec::explicit("1/x"));
        plot.add_curve(CurveSpec::implicit("x**2 + y**2 - 25"));
        plot.add_curve(CurveSpec::parametric("3*cos(t)", "2*sin(t)", 0.0, std::f64::consts::TAU));
        plot.add_curve(CurveSpec::polar("2*cos(3*theta)"));
    } else {
        for expr in args {
            plot.add_curve(CurveSpec::explicit(expr));
        }
    }

    let mut surface = RecordingSurface::new();
    let outcome = plot.render(&mut surface)?;
    println!(
        "plot: x [{}], y [{}]",
        outcome.viewport.x, outcome.viewport.y
    );
    for trace in &outcome.traces {
        let lines = trace.data.polylines();
        let points: usize = lines.iter().map(|l| l.len()).sum();
        println!(
            "  {} {:<28} {} polylines, {} points",
            trace.style.color().to_hex(),
            trace.label,
            lines.len(),
            points
        );
    }
    for failure in &outcome.failures {
        println!("  skipped {}: {}", failure.label, failure.error);
    }
    Ok(())
}

fn snowflake() -> Result<()> {
    let style = StrokeStyle::new(1.5, palette_color(0))?;
    for depth in 0..=4 {
        let flake = KochSnowflake::new(2.0, depth)?.execute()?;
        let mut surface = RecordingSurface::new();
        flake.render(&mut surface, &style);
        println!(
            "snowflake depth {depth}: {} segments, perimeter {:.6}",
            flake.segment_count(),
            flake.perimeter()
        );
    }
    Ok(())
}

fn sequence() -> Result<()> {
    let seq = Sequence::new("(1 + 1/n)**n", 1, 20)?;
    println!(
        "sequence (1 + 1/n)^n, n = 1..20: sum {:.6}, {:?}",
        seq.sum(),
        seq.convergence()
    );
    Ok(())
}

fn statistics() -> Result<()> {
    let data = parse_dataset(&sample_dataset_text(2024)?)?;
    let summary = Summary::compute(&data)?;
    println!(
        "stats: n {}, mean {:.3}, median {:.3}, std {:.3}, IQR {:.3}",
        summary.count,
        summary.mean,
        summary.median,
        summary.std_dev.unwrap_or(f64::NAN),
        summary.iqr
    );
    let hist = histogram(&data, suggested_bins(data.len()))?;
    println!("  histogram {:?}", hist.counts);
    let boxplot = BoxPlot::compute(&data)?;
    println!(
        "  box [{:.2}, {:.2}] whiskers [{:.2}, {:.2}], {} outliers",
        boxplot.q1,
        boxplot.q3,
        boxplot.whisker_low,
        boxplot.whisker_high,
        boxplot.outliers.len()
    );
    Ok(())
}
