//! Command-line viewer: `skyscape [--config FILE] [--mobile] [--sprite IMG] <cubemap-dir>`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use skyscape::engine::loader::CubeFaces;
use skyscape::options::{ImageSource, Options};
use skyscape::Viewer;

/// Show a cubemap skybox with an optional particle effect.
#[derive(Parser)]
#[command(name = "skyscape", version)]
struct Args {
    /// Options preset (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use device-orientation camera control.
    #[arg(long)]
    mobile: bool,

    /// Particle sprite image; enables the particle effect.
    #[arg(long)]
    sprite: Option<String>,

    /// Extension of the face images in the cubemap directory.
    #[arg(long, default_value = "jpg")]
    ext: String,

    /// Frame cap (0 = uncapped).
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Directory holding px, nx, py, ny, pz and nz face images.
    cubemap_dir: PathBuf,
}

fn load_options(args: &Args) -> Result<Options, skyscape::SkyscapeError> {
    let mut options = match &args.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if args.mobile {
        options.environment.mobile = true;
    }
    if let Some(sprite) = &args.sprite {
        options.particles.sprite = Some(ImageSource::from(sprite.as_str()));
    }
    Ok(options)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if !args.cubemap_dir.is_dir() {
        log::error!("not a directory: {}", args.cubemap_dir.display());
        return ExitCode::FAILURE;
    }

    let options = match load_options(&args) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = Viewer::builder()
        .with_cubemap(CubeFaces::from_directory(&args.cubemap_dir, &args.ext))
        .with_options(options)
        .with_target_fps(args.fps)
        .build()
        .run();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
