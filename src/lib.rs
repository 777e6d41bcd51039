//! Options store and scenario dashboard glue for Covasim-style epidemic
//! simulations
//!
//! This crate does not model disease spread. It provides the two pieces that
//! sit around an external simulation engine:
//!
//! * An [`options::Options`] store: the process-wide source of truth for
//!   settings that parameterize downstream numeric code (arithmetic
//!   precision, kernel parallelism and caching) and the global render state
//!   (backend, style, resolution, fonts). It is seeded from `COVASIM_*`
//!   environment variables, keeps immutable defaults for safe resets, and
//!   pushes render-affecting changes into an injected [`render::RenderGlobals`]
//!   collaborator while bumping a generation counter that
//!   [`kernels`] consumers check before reusing specialized code paths.
//! * A [`dashboard`] that turns user inputs into plain scenario parameter
//!   bundles ([`scenarios`]) and delegates the actual epidemic modeling to an
//!   [`engine::ScenarioEngine`] implementation supplied by the host.
//!
//! The store is intended for single-threaded use; mutating it concurrently
//! from multiple threads is unsupported.

pub mod dashboard;
pub mod engine;
pub mod error;
pub mod kernels;
pub mod log;
pub mod options;
pub mod render;
pub mod scenarios;

pub use error::DashError;
pub use options::{OptionInfo, OptionValue, Options, Overrides};
pub use render::{rc_covasim, rc_simple, InProcessRender, RcParams, RcValue, RenderGlobals};
