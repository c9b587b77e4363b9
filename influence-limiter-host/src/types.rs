//! Identifier types shared between the host and the limiter
//!
//! The host hands out opaque string names; these newtypes keep meshes,
//! joints and deformers from being mixed up at call sites.

use std::fmt;

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Wrap a host name
            #[inline]
            pub fn new<S: Into<String>>(name: S) -> Self {
                Self(name.into())
            }

            /// The host name as a string slice
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

name_type!(
    /// Name of a mesh node in the host scene
    MeshId
);

name_type!(
    /// Name of a joint influencing skinned vertices
    InfluenceId
);

name_type!(
    /// Handle of a skin deformer bound to a mesh
    DeformerHandle
);

/// A single vertex of a mesh, written `mesh.vtx[index]` by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    /// The mesh owning the vertex
    pub mesh: MeshId,
    /// Zero-based vertex index
    pub index: u32,
}

impl VertexId {
    /// Create a new vertex identifier
    pub fn new<M: Into<MeshId>>(mesh: M, index: u32) -> Self {
        Self {
            mesh: mesh.into(),
            index,
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.vtx[{}]", self.mesh, self.index)
    }
}

/// What the host says a selection identifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A whole mesh object
    Mesh,
    /// One vertex or a compact vertex range of a mesh
    Vertex,
    /// Anything else (cameras, joints, faces, ...)
    Other,
}
