//! Headless destruction session driven at 60 Hz

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tatter_core::{DestroyConfig, DestroyMode, Rect};
use tatter_destroy::{CardFace, DestructionController, EngineStats, PaperCard};
use tatter_raster::Canvas;
use tatter_runtime::SessionEvent;

use super::script::Script;

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after a minute of simulated time
const MAX_FRAMES: u64 = 60 * 60;

pub struct SimulateArgs {
    pub mode: DestroyMode,
    pub seed: u64,
    pub card: (u32, u32),
    pub viewport: (u32, u32),
    pub config: Option<String>,
    pub frames_dir: Option<String>,
    pub every: u32,
    pub flipped: bool,
    pub title: String,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    mode: DestroyMode,
    seed: u64,
    session: u64,
    frames: u64,
    simulated_ms: f64,
    finished: bool,
    haptics: usize,
    frames_written: usize,
    peak: EngineStats,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DestroyConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path))?,
        None => DestroyConfig::default(),
    };

    let (vw, vh) = args.viewport;
    let (cw, ch) = args.card;
    if cw > vw || ch > vh {
        bail!("Card {}x{} does not fit the {}x{} viewport", cw, ch, vw, vh);
    }
    let rect = Rect::new(
        ((vw - cw) / 2) as f32,
        ((vh - ch) / 2) as f32,
        cw as f32,
        ch as f32,
    );

    let frames_dir = match &args.frames_dir {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            Some(dir)
        }
        None => None,
    };
    let every = u64::from(args.every.max(1));

    let mut controller =
        DestructionController::new(config, Box::new(PaperCard::default())).with_seed(args.seed);
    controller.set_surface_ready(vw, vh);

    let face = CardFace {
        flipped: args.flipped,
        title: args.title.clone(),
        ..CardFace::default()
    };
    let session = controller
        .trigger(args.mode, rect, &face)
        .context("Failed to start session")?;

    let mut script = Script::for_mode(args.mode, rect, args.seed, FRAME_MS);
    let mut canvas = Canvas::new(vw, vh);
    let mut peak = EngineStats::default();
    let mut haptics = 0;
    let mut finished = false;
    let mut frames_written = 0;
    let mut frame = 0;

    while frame < MAX_FRAMES {
        for (_, event) in script.due(frame) {
            controller.pointer(event);
        }
        if let Some(stats) = controller.stats() {
            peak = merge_peak(peak, stats);
        }
        let running = controller.step(FRAME_MS, &mut canvas);

        if let Some(dir) = &frames_dir {
            if frame % every == 0 || !running {
                let path = dir.join(format!("frame_{:05}.png", frame));
                canvas
                    .save_png(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                frames_written += 1;
            }
        }

        for event in controller.drain_events() {
            match event {
                SessionEvent::Haptic { .. } => haptics += 1,
                SessionEvent::Finished { .. } => finished = true,
                _ => {}
            }
        }
        frame += 1;
        if !running {
            break;
        }
    }

    if !finished {
        log::warn!("Session {} still running after {} frames", session, frame);
        controller.cancel();
    }

    let summary = Summary {
        mode: args.mode,
        seed: args.seed,
        session: session.raw(),
        frames: frame,
        simulated_ms: frame as f64 * FRAME_MS,
        finished,
        haptics,
        frames_written,
        peak,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Mode:      {}", summary.mode);
        println!("Session:   {}", session);
        println!("Frames:    {}", summary.frames);
        println!("Simulated: {:.0} ms", summary.simulated_ms);
        println!("Finished:  {}", summary.finished);
        println!("Haptics:   {}", summary.haptics);
        println!(
            "Peak:      {} particles, {} holes, {} pieces, {} shards",
            peak.particles, peak.holes, peak.polygons, peak.shards
        );
        if let Some(dir) = &frames_dir {
            println!("Wrote {} frame(s) to {}", frames_written, dir.display());
        }
    }
    Ok(())
}

fn merge_peak(a: EngineStats, b: EngineStats) -> EngineStats {
    EngineStats {
        particles: a.particles.max(b.particles),
        holes: a.holes.max(b.holes),
        polygons: a.polygons.max(b.polygons),
        shards: a.shards.max(b.shards),
        scale: b.scale,
    }
}
