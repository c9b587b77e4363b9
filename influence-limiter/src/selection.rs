//! Selection classification
//!
//! A run works either on whole meshes or on vertices, never both. The mode is
//! decided from every selected identifier at once.

use std::fmt;

use crate::{
    error::{Error, Result},
    host::{MeshId, NodeKind, SkinHost},
    range::VertexSelector,
};

/// What a selection as a whole refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Whole mesh objects
    Meshes,
    /// Vertices or vertex ranges
    Vertices,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meshes => f.write_str("mesh"),
            Self::Vertices => f.write_str("vertex"),
        }
    }
}

/// A validated selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every vertex of each mesh
    Meshes(Vec<MeshId>),
    /// The listed vertex expressions
    Vertices(Vec<VertexSelector>),
}

impl Selection {
    /// Read the host's selection and classify it
    pub fn from_host<H: SkinHost + ?Sized>(host: &H) -> Result<Self> {
        let ids = host.resolve_selection()?;
        let mut classified = Vec::with_capacity(ids.len());
        for id in ids {
            let kind = host.classify(&id)?;
            classified.push((id, kind));
        }
        classify_selection(classified)
    }

    /// The selection mode
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Meshes(_) => SelectionMode::Meshes,
            Self::Vertices(_) => SelectionMode::Vertices,
        }
    }

    /// Distinct meshes touched by the selection, in first-seen order
    pub fn meshes(&self) -> Vec<MeshId> {
        let mut meshes: Vec<MeshId> = Vec::new();
        let mut push = |mesh: &MeshId| {
            if !meshes.contains(mesh) {
                meshes.push(mesh.clone());
            }
        };
        match self {
            Self::Meshes(ids) => ids.iter().for_each(&mut push),
            Self::Vertices(selectors) => selectors
                .iter()
                .for_each(|selector| push(selector.mesh())),
        }
        meshes
    }
}

/// Classify host identifiers, each paired with the host's [`NodeKind`]
///
/// Fails with [`Error::EmptySelection`] for no identifiers, and with
/// [`Error::InvalidSelection`] when meshes and vertices are mixed or an
/// identifier is neither. Vertex identifiers are parsed only once the whole
/// selection is known to be vertices, so a malformed one in an otherwise
/// valid vertex selection fails with [`Error::ParseError`].
pub fn classify_selection<I, S>(items: I) -> Result<Selection>
where
    I: IntoIterator<Item = (S, NodeKind)>,
    S: AsRef<str>,
{
    let mut meshes = Vec::new();
    let mut vertices = Vec::new();
    let mut other: Option<String> = None;

    for (id, kind) in items {
        let id = id.as_ref();
        match kind {
            NodeKind::Mesh => meshes.push(id.to_owned()),
            NodeKind::Vertex => vertices.push(id.to_owned()),
            NodeKind::Other => {
                other.get_or_insert_with(|| id.to_owned());
            }
        }
    }

    if let Some(id) = other {
        return Err(Error::invalid_selection(format!(
            "'{id}' is neither a mesh nor vertices; select either meshes or vertices"
        )));
    }

    match (meshes.is_empty(), vertices.is_empty()) {
        (true, true) => Err(Error::EmptySelection),
        (false, true) => Ok(Selection::Meshes(meshes.into_iter().map(MeshId::new).collect())),
        (true, false) => vertices
            .iter()
            .map(|id| VertexSelector::parse(id))
            .collect::<Result<Vec<_>>>()
            .map(Selection::Vertices),
        (false, false) => Err(Error::invalid_selection(
            "selection mixes meshes and vertices; select either meshes or vertices",
        )),
    }
}
