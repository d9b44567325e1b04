//! List available presets

use super::preset::load_presets;
use anyhow::Result;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let file = load_presets(path)?;
    let presets = file.merged_with_builtins();

    println!("{:<16} {:<14} {:>8} {:>6}  glyphs", "title", "style", "duration", "count");
    for preset in &presets {
        let config = &preset.config;
        println!(
            "{:<16} {:<14} {:>7.1}s {:>6}  {}",
            preset.title,
            config.style.as_str(),
            config.duration,
            config.particle_count(),
            config.glyphs.join(" ")
        );
    }
    println!("\n{} preset(s)", presets.len());
    Ok(())
}
