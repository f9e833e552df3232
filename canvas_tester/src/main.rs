use anyhow::Context;
use digit_canvas::core_modules::recenter::ScalingPolicy;
use digit_canvas::core_modules::utils::image_helper::image_helper;
use digit_canvas::{CanvasError, DrawingSession, Grid, NormalizationPipeline, PipelineConfig, ProcessedDigit};
use std::env;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// On-screen canvas the pointer coordinates are expressed in (28 cells of 15px).
const CANVAS_SIZE: f64 = 420.0;
const PREVIEW_SCALE: u32 = 15;

/// Message type for the canvas actor that owns the live drawing.
#[derive(Debug)]
enum CanvasMessage {
    Stamp(i32, i32),
    Snapshot(oneshot::Sender<Grid>),
    Clear,
    Shutdown,
}

/// Spawns a task that owns the `DrawingSession`; all strokes go through its channel.
fn spawn_canvas_actor(mut session: DrawingSession) -> mpsc::Sender<CanvasMessage> {
    let (tx, mut rx) = mpsc::channel::<CanvasMessage>(64);
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                CanvasMessage::Stamp(col, row) => session.stamp(col, row),
                CanvasMessage::Snapshot(reply) => {
                    let _ = reply.send(session.snapshot());
                }
                CanvasMessage::Clear => session.clear(),
                CanvasMessage::Shutdown => break,
            }
        }
    });
    tx
}

/// Pointer position in canvas pixels -> grid cell, the way the drawing front-end does it.
fn to_cell(px: f64, grid_size: usize) -> i32 {
    let cell_size = CANVAS_SIZE / grid_size as f64;
    (px / cell_size).floor() as i32
}

/// A pen path for a "7", sampled like pointer-move events, in canvas pixels.
/// The last few samples run off the canvas on purpose.
fn seven_stroke() -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let mut x = 40.0;
    while x <= 260.0 {
        points.push((x, 50.0));
        x += 9.0;
    }
    let mut t = 0.0;
    while t <= 1.0 {
        points.push((260.0 - 150.0 * t, 50.0 + 330.0 * t));
        t += 0.03;
    }
    points.extend([(100.0, 400.0), (95.0, 430.0), (90.0, 460.0)]);
    points
}

fn load_config(path: Option<&String>) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    let config: PipelineConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing config {path}"))?;
    config.validate()?;
    Ok(config)
}

fn process_with(config: &PipelineConfig, scaling: ScalingPolicy, grid: &Grid) -> Result<ProcessedDigit, CanvasError> {
    NormalizationPipeline::new(PipelineConfig {
        scaling,
        ..config.clone()
    })?
    .process(grid)
}

fn preview_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.png"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: canvas_tester [output_dir] [config.json]");
        return Ok(());
    }
    let output_dir = PathBuf::from(args.get(1).map_or(".", String::as_str));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let config = load_config(args.get(2))?;
    info!(grid_size = config.grid_size, scaling = ?config.scaling, "configuration loaded");

    // --- 2. Drawing ---
    let canvas = spawn_canvas_actor(DrawingSession::new(config.clone())?);
    for (x, y) in seven_stroke() {
        let (col, row) = (to_cell(x, config.grid_size), to_cell(y, config.grid_size));
        canvas.send(CanvasMessage::Stamp(col, row)).await?;
    }

    // --- 3. Snapshot, then keep drawing while it is processed ---
    let (reply, snapshot_rx) = oneshot::channel();
    canvas.send(CanvasMessage::Snapshot(reply)).await?;
    let snapshot = snapshot_rx.await.context("canvas actor dropped the snapshot")?;
    canvas.send(CanvasMessage::Stamp(1, 1)).await?;

    image_helper::save(preview_path(&output_dir, "raw"), &snapshot, PREVIEW_SCALE)?;

    // --- 4. Normalize under both recenter policies ---
    let variants = [
        ("translated", ScalingPolicy::Disabled),
        ("configured", config.scaling),
    ];
    let mut payload = None;
    for (name, scaling) in variants {
        let digit = process_with(&config, scaling, &snapshot)?;
        if digit.is_empty() {
            warn!(variant = name, "nothing above threshold, payload is blank");
        }
        if let (Some(bbox), Some(centroid)) = (digit.bounding_box, digit.centroid) {
            info!(
                variant = name,
                width = bbox.width(),
                height = bbox.height(),
                centroid_x = centroid.x,
                centroid_y = centroid.y,
                "digit normalized"
            );
        }
        let path = preview_path(&output_dir, name);
        image_helper::save(&path, &digit.grid, PREVIEW_SCALE)?;
        info!(path = %path.display(), "preview written");
        if scaling == config.scaling {
            payload = Some(digit.payload());
        }
    }

    canvas.send(CanvasMessage::Clear).await?;
    canvas.send(CanvasMessage::Shutdown).await?;

    // --- 5. Payload for the classification endpoint ---
    let payload = payload.context("configured policy produced no payload")?;
    println!("{}", serde_json::to_string(&payload)?);
    Ok(())
}
