//! Headless host: one scene per screen, stepped at a fixed frame rate

use anyhow::{ensure, Context, Result};
use confetti_core::{Configuration, SceneSize};
use confetti_particles::{EffectContext, SceneTree, SpriteInstance, TextureCache};
use confetti_runtime::{FrameStats, PlaybackMode, SceneDriver};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub struct HostOptions {
    pub screens: Vec<SceneSize>,
    pub fps: u32,
    pub loops: Option<u32>,
    pub report: bool,
    pub dump: Option<PathBuf>,
}

impl HostOptions {
    fn playback_mode(&self) -> PlaybackMode {
        match self.loops {
            Some(n) => PlaybackMode::Loop {
                max_restarts: Some(n),
            },
            None => PlaybackMode::Once,
        }
    }
}

/// Final state of one screen, as written by `--dump`
#[derive(Serialize)]
struct ScreenDump {
    screen: String,
    stats: FrameStats,
    sprites: Vec<SpriteInstance>,
}

/// Play `config` on every screen until all of them have finished
pub fn play(config: Configuration, options: &HostOptions) -> Result<()> {
    config.validate().context("invalid configuration")?;
    ensure!(options.fps > 0, "--fps must be at least 1");
    ensure!(!options.screens.is_empty(), "at least one screen is required");

    let config = Arc::new(config);
    // one glyph cache for the whole process, shared by every screen
    let textures = Arc::new(TextureCache::headless());
    let mut drivers: Vec<SceneDriver> = options
        .screens
        .iter()
        .map(|&size| {
            let ctx = EffectContext::new(Arc::clone(&config), size, textures.clone());
            SceneDriver::new(SceneTree::new(), ctx, options.playback_mode())
        })
        .collect();

    let fps = options.fps as u64;
    let step = 1.0 / options.fps as f64;
    let runs = options.loops.unwrap_or(0) as f64 + 1.0;
    // one run, its grace period and the priming frame, per restart
    let max_frames = ((config.duration + 1.0) * runs * options.fps as f64).ceil() as u64 + 2;

    log::info!(
        "playing {} for {:.1}s on {} screen(s) at {} fps",
        config.style,
        config.duration,
        drivers.len(),
        options.fps
    );

    if options.report {
        println!(
            "{:>6}  {:>10}  {:>8}  {:>6}  {:>6}",
            "time", "screen", "visible", "nodes", "alpha"
        );
    }

    let mut frame = 0u64;
    while frame < max_frames && !drivers.iter().all(|d| d.is_finished()) {
        let now = frame as f64 * step;
        for driver in &mut drivers {
            driver.tick(now);
        }
        if options.report && frame % fps == 0 {
            for (driver, size) in drivers.iter().zip(&options.screens) {
                print_row(now, size, &driver.stats());
            }
        }
        frame += 1;
    }

    if !drivers.iter().all(|d| d.is_finished()) {
        log::warn!("stopped after {frame} frames before every screen finished");
    }
    for (driver, size) in drivers.iter().zip(&options.screens) {
        let stats = driver.stats();
        log::info!(
            "{size}: {} frames, {} restarts, {} nodes left, {} visible",
            stats.frame,
            stats.restarts,
            stats.live_nodes,
            stats.visible_nodes
        );
    }
    log::debug!("glyph cache holds {} drawables", textures.len());

    if let Some(path) = &options.dump {
        write_dump(path, &drivers, &options.screens)?;
        println!("Wrote final frame to {}", path.display());
    }
    Ok(())
}

fn print_row(time: f64, size: &SceneSize, stats: &FrameStats) {
    println!(
        "{:>6.1}  {:>10}  {:>8}  {:>6}  {:>6.2}",
        time,
        size.to_string(),
        stats.visible_nodes,
        stats.live_nodes,
        stats.max_alpha
    );
}

fn write_dump(path: &PathBuf, drivers: &[SceneDriver], screens: &[SceneSize]) -> Result<()> {
    let dumps: Vec<ScreenDump> = drivers
        .iter()
        .zip(screens)
        .map(|(driver, size)| {
            let mut sprites = Vec::new();
            driver.scene().pack_instances(&mut sprites);
            ScreenDump {
                screen: size.to_string(),
                stats: driver.stats(),
                sprites,
            }
        })
        .collect();
    let json = serde_json::to_string_pretty(&dumps).context("failed to serialize final frame")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
