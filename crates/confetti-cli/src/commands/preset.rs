//! Run a named preset

use super::host::{self, HostOptions};
use anyhow::{Context, Result};
use confetti_core::{default_presets_path, Preset, PresetFile};
use std::path::{Path, PathBuf};

pub struct PresetArgs {
    pub title: String,
    pub presets_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub host: HostOptions,
}

/// Load the presets file. An explicit path must exist; the default location is optional.
pub fn load_presets(path: Option<&Path>) -> Result<PresetFile> {
    if let Some(path) = path {
        return PresetFile::load(path)
            .with_context(|| format!("failed to load presets from {}", path.display()));
    }
    match default_presets_path() {
        Some(path) if path.exists() => {
            log::debug!("loading presets from {}", path.display());
            PresetFile::load(&path)
                .with_context(|| format!("failed to load presets from {}", path.display()))
        }
        _ => Ok(PresetFile::default()),
    }
}

pub fn find_preset(path: Option<&Path>, title: &str) -> Result<Preset> {
    let file = load_presets(path)?;
    let preset = file.find(title)?;
    Ok(preset)
}

pub fn run(args: PresetArgs) -> Result<()> {
    let preset = find_preset(args.presets_file.as_deref(), &args.title)?;
    println!("Playing preset '{}' ({})", preset.title, preset.config.style);

    let mut config = preset.config;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    host::play(config.sanitized(), &args.host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use confetti_core::EffectStyle;

    #[test]
    fn builtin_found_without_a_file() {
        let preset = find_preset(None, "maple");
        // a user file may shadow it, but the title must resolve either way
        assert!(preset.is_ok());
    }

    #[test]
    fn file_preset_shadows_builtin() {
        let path = std::env::temp_dir().join(format!("confetti-presets-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[preset]]\ntitle = \"Snow\"\nstyle = \"bubbles\"\nduration = 2.0\n",
        )
        .unwrap();
        let preset = find_preset(Some(&path), "snow").unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(preset.config.style, EffectStyle::Bubbles);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = find_preset(Some(Path::new("/nonexistent/presets.toml")), "snow").unwrap_err();
        assert!(err.to_string().contains("failed to load presets"));
    }

    #[test]
    fn unknown_title_is_an_error() {
        let err = find_preset(None, "definitely-not-a-preset").unwrap_err();
        assert!(err.to_string().contains("Preset not found"));
    }
}
