//! Confetti CLI - headless host for the particle effects

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{host::HostOptions, preset, presets, run};
use confetti_core::{ConfettiError, Density, DensityProfile, Easing, EffectStyle, SceneSize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "confetti")]
#[command(about = "Screen-filling particle animations, simulated frame by frame", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one effect from command-line settings
    Run {
        /// Animation style
        #[arg(long, value_parser = parse_style, default_value = "confetti")]
        style: EffectStyle,

        /// Glyphs, comma separated or one per character
        #[arg(long)]
        emojis: Option<String>,

        /// Particle density (low, medium, high)
        #[arg(long, value_parser = parse_density, default_value = "medium")]
        density: Density,

        /// Density table (overlay or showcase)
        #[arg(long, value_parser = parse_density_profile, default_value = "showcase")]
        density_profile: DensityProfile,

        /// Speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// Easing curve (linear, ease-in, ease-out, ease-in-out)
        #[arg(long, value_parser = parse_easing, default_value = "linear")]
        easing: Easing,

        /// Easing curve order
        #[arg(long, default_value = "2.0")]
        easing_exponent: f64,

        /// Animation length in seconds
        #[arg(long, default_value = "5.0")]
        duration: f64,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        host: HostArgs,
    },

    /// Run a built-in or file preset
    Preset {
        /// Preset title (case-insensitive)
        title: String,

        /// Presets file (defaults to <config dir>/confetti/presets.toml)
        #[arg(long)]
        presets_file: Option<PathBuf>,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        host: HostArgs,
    },

    /// List available presets
    Presets {
        /// Presets file (defaults to <config dir>/confetti/presets.toml)
        #[arg(long)]
        presets_file: Option<PathBuf>,
    },
}

/// How the headless host drives the scenes
#[derive(Args)]
struct HostArgs {
    /// Screen size, repeat for one scene per screen
    #[arg(long = "screen", value_parser = parse_screen, default_value = "1920x1080")]
    screens: Vec<SceneSize>,

    /// Simulated frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Loop the effect, restarting it this many times
    #[arg(long = "loop")]
    loops: Option<u32>,

    /// Print visible particle counts once per simulated second
    #[arg(long)]
    report: bool,

    /// Write the final frame's sprite instances as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

impl From<HostArgs> for HostOptions {
    fn from(args: HostArgs) -> Self {
        HostOptions {
            screens: args.screens,
            fps: args.fps,
            loops: args.loops,
            report: args.report,
            dump: args.dump,
        }
    }
}

fn parse_named<T: FromStr<Err = ConfettiError>>(s: &str) -> Result<T, String> {
    s.parse().map_err(|e: ConfettiError| e.to_string())
}

fn parse_style(s: &str) -> Result<EffectStyle, String> {
    parse_named(s).map_err(|e| {
        let valid: Vec<&str> = EffectStyle::ALL.iter().map(|s| s.as_str()).collect();
        format!("{e}; valid values: {}", valid.join(", "))
    })
}

fn parse_density(s: &str) -> Result<Density, String> {
    parse_named(s)
}

fn parse_density_profile(s: &str) -> Result<DensityProfile, String> {
    parse_named(s)
}

fn parse_easing(s: &str) -> Result<Easing, String> {
    parse_named(s)
}

fn parse_screen(s: &str) -> Result<SceneSize, String> {
    parse_named(s)
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            style,
            emojis,
            density,
            density_profile,
            speed,
            easing,
            easing_exponent,
            duration,
            seed,
            host,
        } => run::run(run::RunArgs {
            style,
            emojis,
            density,
            density_profile,
            speed,
            easing,
            easing_exponent,
            duration,
            seed,
            host: host.into(),
        }),
        Commands::Preset {
            title,
            presets_file,
            seed,
            host,
        } => preset::run(preset::PresetArgs {
            title,
            presets_file,
            seed,
            host: host.into(),
        }),
        Commands::Presets { presets_file } => presets::run(presets_file.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_flags() {
        let cli = Cli::try_parse_from([
            "confetti",
            "-vv",
            "run",
            "--style",
            "meteor-shower",
            "--screen",
            "800x600",
            "--screen",
            "1024x768",
            "--loop",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run { style, host, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(style, EffectStyle::MeteorShower);
        assert_eq!(host.screens, vec![SceneSize::new(800.0, 600.0), SceneSize::new(1024.0, 768.0)]);
        assert_eq!(host.loops, Some(2));
    }

    #[test]
    fn default_screen_is_full_hd() {
        let cli = Cli::try_parse_from(["confetti", "run"]).unwrap();
        let Commands::Run { host, density, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(host.screens, vec![SceneSize::new(1920.0, 1080.0)]);
        assert_eq!(density, Density::Medium);
        assert_eq!(host.fps, 60);
    }

    #[test]
    fn unknown_style_lists_choices() {
        let err = parse_style("glitter").unwrap_err();
        assert!(err.contains("falling-leaves"));
        assert!(Cli::try_parse_from(["confetti", "run", "--style", "glitter"]).is_err());
    }
}
