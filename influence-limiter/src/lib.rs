//! # Influence Limiter
//!
//! Caps the number of skinning-joint influences on each vertex of a rigged
//! mesh, zeroing the lightest weights and renormalizing the rest.
//!
//! The pruning decision is pure: [`PrunePlan::compute`] looks at one vertex's
//! [`WeightTable`] and returns requests (zero these influences, then
//! renormalize). Everything that touches the scene goes through the
//! [`host::SkinHost`] trait, so the same code drives a live host or the
//! in-memory scene used in tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use influence_limiter::{host::SkinHost, Limiter, MaxInfluences};
//!
//! fn limit_to_four<H: SkinHost>(host: &mut H) -> influence_limiter::Result<()> {
//!     let report = Limiter::new(MaxInfluences::new(4)?).run(host)?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! This crate is built on top of `influence-limiter-host`, which defines the
//! host contract and identifier types. A run is:
//!
//! - **Selection**: read and classify the host selection as meshes or vertices
//! - **Expansion**: parse vertex expressions and expand them into vertices
//! - **Deformers**: locate every mesh's skin deformer before mutating anything
//! - **Pruning**: plan and apply each vertex, one at a time

#![warn(missing_docs)]

pub use influence_limiter_host as host;

// Re-export common types for convenience
pub use crate::{
    config::LimiterConfig,
    error::{Error, ErrorKind, Result},
    limiter::{
        LimitReport, Limiter, LimiterBuilder, VertexOutcome, apply_requests,
        limit_selected_influences,
    },
    pruner::{MaxInfluences, PrunePlan, PruneRequest, plan_pruning},
    range::{VertexRange, VertexSelector, expand_expressions},
    selection::{Selection, SelectionMode, classify_selection},
    weights::{InfluenceWeight, WeightTable},
};

// Re-export logging functionality
pub use crate::logging::{DefaultLogStreams, LogLevel, LogStream, Logger, MemoryLogStream};

// Re-export progress functionality
pub use crate::progress::{PrintProgressHandler, ProgressHandler, SilentProgressHandler};

// Re-export the tool window
pub use crate::ui::{Notification, Notifier, RecordingNotifier, ToolState, ToolWindow};

#[cfg(feature = "memory-host")]
pub use crate::host::MemoryScene;

// Core modules
pub mod error;
pub mod pruner;
pub mod weights;

// Selection handling
pub mod range;
pub mod selection;

// Running against a host
pub mod config;
pub mod limiter;
pub mod logging;
pub mod progress;
pub mod ui;

/// Version information
pub mod version {
    /// Version of this crate
    pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Version of the host contract crate
    pub const HOST_CONTRACT_VERSION: &str = crate::host::CRATE_VERSION;
}
