// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Skybox, particle effect and camera control on top of wgpu.
//!
//! Skyscape wires a cubemap background, an optional sprite particle effect
//! and either a pointer-orbit or a device-orientation camera into a host
//! surface: a winit window natively, a page element on the web.
//!
//! # Key entry points
//!
//! - [`EnvironmentController`] - owns the scene and runs the frame loop
//!   (`load_cubemap`, `init_particle_effect`, `start`, `stop`, `resize`,
//!   `dispose`)
//! - [`options::Options`] - runtime configuration (host, camera, particles)
//!   with TOML presets
//! - [`gpu::WgpuRenderer`] - the wgpu [`engine::RenderBackend`]
//! - `Viewer` - standalone window (feature `viewer`)
//!
//! # Architecture
//!
//! The controller talks to its surroundings only through traits: a
//! [`platform::Host`] for geometry, a [`platform::FrameScheduler`] for
//! frame callbacks, an [`engine::loader::ImageLoader`] for asynchronous
//! image decoding and [`platform::OrientationEvents`] for the sensor. Each
//! frame it delivers finished loads, advances the camera control and
//! particles by a fixed 16 ms step, and renders.

pub mod camera;
pub mod control;
pub mod engine;
pub mod environment;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod platform;
pub mod util;

#[cfg(feature = "viewer")]
mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use environment::{EnvironmentController, Platform};
pub use error::SkyscapeError;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
