use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kurbo::Point;
use myofinder_core::io::image_io::save_frame;
use myofinder_core::io::processing::ProcessingResult;
use myofinder_core::workspace::Workspace;

use super::load_config;

/// A wheel step applied at a cursor position, given as `cx,cy,delta`.
#[derive(Clone, Copy, Debug)]
pub struct ZoomStep {
    pub cursor: Point,
    pub delta: f64,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Input image file
    pub file: PathBuf,

    /// Output PNG of the rendered frame
    #[arg(short, long)]
    pub output: PathBuf,

    /// Processing result JSON whose first entry is drawn as markers
    #[arg(short, long)]
    pub markers: Option<PathBuf>,

    /// Viewer config TOML
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Zoom at a screen position, e.g. `400,300,-100` (repeatable)
    #[arg(long, value_parser = parse_zoom, allow_hyphen_values = true)]
    pub zoom: Vec<ZoomStep>,

    /// Pan by a screen offset after zooming, e.g. `-20,15`
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    pub pan: Option<(f64, f64)>,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut workspace = Workspace::new(config);
    let id = workspace
        .open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    if let Some(ref path) = args.markers {
        let result = ProcessingResult::load(path)
            .with_context(|| format!("Failed to read processing result {}", path.display()))?;
        // A single-image render takes the first entry whatever its key.
        if let Some((_, layer)) = result.layers().first() {
            if let Some(surface) = workspace.surface_mut(id) {
                surface.add_nuclei_batch(&layer.nuclei);
                surface.add_fibers_batch(&layer.fibers);
            }
        }
    }

    let surface = workspace
        .surface_mut(id)
        .context("Surface disappeared after opening")?;
    for step in &args.zoom {
        surface.zoom_at(step.cursor, step.delta);
    }
    if let Some((dx, dy)) = args.pan {
        surface.pan(dx, dy);
    }

    save_frame(surface.frame(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let snapshot = surface.snapshot();
    println!("Frame:        {}", args.output.display());
    println!("Scale:        {:.4}", surface.engine().scale());
    println!("Nuclei:       {}", snapshot.total);
    println!("Positive:     {}", snapshot.positive_count);
    println!("Fusion index: {}", snapshot.ratio_label());
    println!("Fiber ratio:  {}", snapshot.fiber_area_ratio);

    Ok(())
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got '{s}'"));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a number"))?;
    }
    Ok(out)
}

fn parse_zoom(s: &str) -> Result<ZoomStep, String> {
    let [x, y, delta] = parse_numbers::<3>(s)?;
    Ok(ZoomStep {
        cursor: Point::new(x, y),
        delta,
    })
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let [dx, dy] = parse_numbers::<2>(s)?;
    Ok((dx, dy))
}
