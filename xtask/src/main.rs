//! Workspace build tasks: `cargo xtask <command>`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

const WASM_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Parser)]
#[command(name = "xtask", about = "Build tasks for skyscape")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the web package (wasm module plus JS bindings).
    BuildWeb {
        /// Build without optimizations.
        #[arg(long)]
        debug: bool,
        /// Output directory for the generated package.
        #[arg(long, default_value = "pkg")]
        out_dir: PathBuf,
    },
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn run(command: &mut Command) -> Result<()> {
    eprintln!("running {command:?}");
    let status = command
        .status()
        .with_context(|| format!("failed to spawn {command:?}"))?;
    if !status.success() {
        bail!("{command:?} exited with {status}");
    }
    Ok(())
}

fn build_web(debug: bool, out_dir: &Path) -> Result<()> {
    let root = workspace_root()?;
    let profile = if debug { "debug" } else { "release" };

    let mut cargo = Command::new(env!("CARGO"));
    let _ = cargo.current_dir(&root).args([
        "rustc",
        "--lib",
        "--target",
        WASM_TARGET,
        "--no-default-features",
        "--features",
        "web",
    ]);
    if !debug {
        let _ = cargo.arg("--release");
    }
    let _ = cargo.args(["--", "--crate-type=cdylib"]);
    run(&mut cargo)?;

    let wasm = root
        .join("target")
        .join(WASM_TARGET)
        .join(profile)
        .join("skyscape.wasm");
    if !wasm.exists() {
        bail!("expected wasm output at {}", wasm.display());
    }

    let mut bindgen = Command::new("wasm-bindgen");
    let _ = bindgen
        .current_dir(&root)
        .arg(&wasm)
        .args(["--target", "web", "--out-dir"])
        .arg(out_dir);
    run(&mut bindgen).context("is wasm-bindgen-cli installed?")?;

    eprintln!("web package written to {}", root.join(out_dir).display());
    Ok(())
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Task::BuildWeb { debug, out_dir } => build_web(debug, &out_dir),
    }
}
