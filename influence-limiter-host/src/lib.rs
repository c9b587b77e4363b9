//! Host scene contract for the influence limiter
//!
//! This crate describes the small slice of a 3D-animation host that the
//! limiter needs: the current selection, skin deformer lookup, and per-vertex
//! weight queries and mutations. For the pruning logic itself, use the
//! `influence-limiter` crate instead.
//!
//! Everything a host exposes is fallible and returns [`HostResult`], so a
//! scene can be driven from tests without a live host session. The `memory`
//! feature provides [`MemoryScene`], an in-memory implementation.

use thiserror::Error;

pub mod types;

pub use crate::types::{DeformerHandle, InfluenceId, MeshId, NodeKind, VertexId};

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use crate::memory::{MemoryScene, Mutation};

/// Version information for this crate
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for host calls
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Failures reported by the host itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// The named scene node does not exist
    #[error("No such node: {name}")]
    NoSuchNode { name: String },

    /// The vertex index is outside the mesh
    #[error("Vertex out of range: {vertex}")]
    VertexOutOfRange { vertex: String },

    /// The influence is not bound to the deformer
    #[error("Influence {influence} is not bound to {deformer}")]
    UnknownInfluence { deformer: String, influence: String },

    /// The deformer handle does not refer to a live deformer
    #[error("Unknown deformer: {deformer}")]
    UnknownDeformer { deformer: String },

    /// A weight outside [0, 1] was written
    #[error("Weight {weight} for {influence} is outside [0, 1]")]
    WeightOutOfRange { influence: String, weight: f64 },

    /// Any other host-side failure
    #[error("{message}")]
    Other { message: String },
}

impl HostError {
    /// Create a generic host error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Access to the host scene graph and its skin deformers
///
/// Calls are synchronous. Queries take `&self`; mutations take `&mut self`, so
/// a limiter run holding `&mut H` is the only writer for its duration.
pub trait SkinHost {
    /// The identifiers currently selected by the user, in selection order
    fn resolve_selection(&self) -> HostResult<Vec<String>>;

    /// Classify a single selection identifier
    fn classify(&self, id: &str) -> HostResult<NodeKind>;

    /// Find the skin deformer bound to a mesh, if any
    fn find_skin_deformer(&self, mesh: &MeshId) -> HostResult<Option<DeformerHandle>>;

    /// Number of vertices in a mesh
    fn vertex_count(&self, mesh: &MeshId) -> HostResult<u32>;

    /// The ordered (influence, weight) pairs affecting a vertex
    fn query_weight_table(
        &self,
        deformer: &DeformerHandle,
        vertex: &VertexId,
    ) -> HostResult<Vec<(InfluenceId, f64)>>;

    /// Overwrite one influence's weight on a vertex
    fn set_influence_weight(
        &mut self,
        deformer: &DeformerHandle,
        vertex: &VertexId,
        influence: &InfluenceId,
        weight: f64,
    ) -> HostResult<()>;

    /// Rescale a vertex's weights so they sum to 1.0
    fn renormalize(&mut self, deformer: &DeformerHandle, vertex: &VertexId) -> HostResult<()>;
}

// Include tests
mod test;
