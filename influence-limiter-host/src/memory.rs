//! In-memory host scene
//!
//! [`MemoryScene`] keeps meshes, skin deformers and a selection in plain
//! collections and records every mutation it receives. It behaves like a
//! minimal host: weight queries skip zero weights and renormalization rescales
//! the remaining weights proportionally.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    DeformerHandle, HostError, HostResult, InfluenceId, MeshId, NodeKind, SkinHost, VertexId,
};

/// A mutation received by a [`MemoryScene`]
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// `set_influence_weight` was called
    SetWeight {
        /// Target deformer
        deformer: DeformerHandle,
        /// Target vertex
        vertex: VertexId,
        /// Influence whose weight was written
        influence: InfluenceId,
        /// The written weight
        weight: f64,
    },
    /// `renormalize` was called
    Renormalize {
        /// Target deformer
        deformer: DeformerHandle,
        /// Target vertex
        vertex: VertexId,
    },
}

#[derive(Debug, Clone)]
struct MemoryMesh {
    vertex_count: u32,
    deformer: Option<DeformerHandle>,
}

#[derive(Debug, Clone)]
struct MemoryDeformer {
    mesh: MeshId,
    influences: Vec<InfluenceId>,
    weights: HashMap<u32, Vec<(InfluenceId, f64)>>,
}

/// A host scene living entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    meshes: BTreeMap<MeshId, MemoryMesh>,
    deformers: HashMap<DeformerHandle, MemoryDeformer>,
    other_nodes: HashSet<String>,
    selection: Vec<String>,
    mutations: Vec<Mutation>,
}

impl MemoryScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh with the given number of vertices
    pub fn add_mesh<M: Into<MeshId>>(&mut self, mesh: M, vertex_count: u32) -> &mut Self {
        self.meshes.insert(
            mesh.into(),
            MemoryMesh {
                vertex_count,
                deformer: None,
            },
        );
        self
    }

    /// Add a node that is neither a mesh nor a vertex (a camera, a joint, ...)
    pub fn add_node<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.other_nodes.insert(name.into());
        self
    }

    /// Bind a skin deformer with the given joints to an existing mesh
    pub fn bind_skin<M, D>(&mut self, mesh: M, deformer: D, influences: &[&str]) -> HostResult<()>
    where
        M: Into<MeshId>,
        D: Into<DeformerHandle>,
    {
        let mesh = mesh.into();
        let deformer = deformer.into();
        let entry = self
            .meshes
            .get_mut(&mesh)
            .ok_or_else(|| HostError::NoSuchNode {
                name: mesh.to_string(),
            })?;
        entry.deformer = Some(deformer.clone());
        self.deformers.insert(
            deformer,
            MemoryDeformer {
                mesh,
                influences: influences.iter().map(|&name| InfluenceId::new(name)).collect(),
                weights: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Replace the full weight table of one vertex
    pub fn set_vertex_weights<D: Into<DeformerHandle>>(
        &mut self,
        deformer: D,
        index: u32,
        weights: &[(&str, f64)],
    ) -> HostResult<()> {
        let handle = deformer.into();
        let vertex_count = self.deformer(&handle)?;
        let skin = self.deformer_mut(&handle)?;
        let vertex = VertexId::new(skin.mesh.clone(), index);
        if index >= vertex_count {
            return Err(HostError::VertexOutOfRange {
                vertex: vertex.to_string(),
            });
        }

        let mut table = Vec::with_capacity(weights.len());
        for &(name, weight) in weights {
            let influence = InfluenceId::new(name);
            if !skin.influences.contains(&influence) {
                return Err(HostError::UnknownInfluence {
                    deformer: handle.to_string(),
                    influence: influence.to_string(),
                });
            }
            table.push((influence, weight));
        }
        skin.weights.insert(index, table);
        Ok(())
    }

    /// Replace the current selection
    pub fn select<I, S>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = ids.into_iter().map(Into::into).collect();
        self
    }

    /// The full weight table of a vertex, zero weights included
    pub fn weights(&self, vertex: &VertexId) -> Option<&[(InfluenceId, f64)]> {
        let handle = self.meshes.get(&vertex.mesh)?.deformer.as_ref()?;
        self.deformers
            .get(handle)?
            .weights
            .get(&vertex.index)
            .map(Vec::as_slice)
    }

    /// The weight of one influence on a vertex (0.0 when absent)
    pub fn weight_of(&self, vertex: &VertexId, influence: &str) -> f64 {
        self.weights(vertex)
            .and_then(|table| {
                table
                    .iter()
                    .find(|(id, _)| id.as_str() == influence)
                    .map(|&(_, weight)| weight)
            })
            .unwrap_or(0.0)
    }

    /// Every mutation received so far, in order
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Forget recorded mutations
    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    // Returns the vertex count of the mesh the deformer is bound to.
    fn deformer(&self, handle: &DeformerHandle) -> HostResult<u32> {
        let skin = self
            .deformers
            .get(handle)
            .ok_or_else(|| HostError::UnknownDeformer {
                deformer: handle.to_string(),
            })?;
        self.meshes
            .get(&skin.mesh)
            .map(|mesh| mesh.vertex_count)
            .ok_or_else(|| HostError::NoSuchNode {
                name: skin.mesh.to_string(),
            })
    }

    fn deformer_mut(&mut self, handle: &DeformerHandle) -> HostResult<&mut MemoryDeformer> {
        self.deformers
            .get_mut(handle)
            .ok_or_else(|| HostError::UnknownDeformer {
                deformer: handle.to_string(),
            })
    }

    fn check_vertex(&self, handle: &DeformerHandle, vertex: &VertexId) -> HostResult<()> {
        let vertex_count = self.deformer(handle)?;
        let bound_mesh = &self.deformers[handle].mesh;
        if &vertex.mesh != bound_mesh || vertex.index >= vertex_count {
            return Err(HostError::VertexOutOfRange {
                vertex: vertex.to_string(),
            });
        }
        Ok(())
    }
}

impl SkinHost for MemoryScene {
    fn resolve_selection(&self) -> HostResult<Vec<String>> {
        Ok(self.selection.clone())
    }

    fn classify(&self, id: &str) -> HostResult<NodeKind> {
        if let Some((mesh, _)) = id.split_once(".vtx") {
            if self.meshes.contains_key(&MeshId::new(mesh)) {
                return Ok(NodeKind::Vertex);
            }
            return Err(HostError::NoSuchNode {
                name: mesh.to_string(),
            });
        }
        if self.meshes.contains_key(&MeshId::new(id)) {
            Ok(NodeKind::Mesh)
        } else if self.other_nodes.contains(id) {
            Ok(NodeKind::Other)
        } else {
            Err(HostError::NoSuchNode {
                name: id.to_string(),
            })
        }
    }

    fn find_skin_deformer(&self, mesh: &MeshId) -> HostResult<Option<DeformerHandle>> {
        self.meshes
            .get(mesh)
            .map(|entry| entry.deformer.clone())
            .ok_or_else(|| HostError::NoSuchNode {
                name: mesh.to_string(),
            })
    }

    fn vertex_count(&self, mesh: &MeshId) -> HostResult<u32> {
        self.meshes
            .get(mesh)
            .map(|entry| entry.vertex_count)
            .ok_or_else(|| HostError::NoSuchNode {
                name: mesh.to_string(),
            })
    }

    fn query_weight_table(
        &self,
        deformer: &DeformerHandle,
        vertex: &VertexId,
    ) -> HostResult<Vec<(InfluenceId, f64)>> {
        self.check_vertex(deformer, vertex)?;
        let table = self.deformers[deformer]
            .weights
            .get(&vertex.index)
            .map(|table| {
                table
                    .iter()
                    .filter(|(_, weight)| *weight > 0.0)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(table)
    }

    fn set_influence_weight(
        &mut self,
        deformer: &DeformerHandle,
        vertex: &VertexId,
        influence: &InfluenceId,
        weight: f64,
    ) -> HostResult<()> {
        self.check_vertex(deformer, vertex)?;
        if !(0.0..=1.0).contains(&weight) {
            return Err(HostError::WeightOutOfRange {
                influence: influence.to_string(),
                weight,
            });
        }

        let skin = self.deformer_mut(deformer)?;
        if !skin.influences.contains(influence) {
            return Err(HostError::UnknownInfluence {
                deformer: deformer.to_string(),
                influence: influence.to_string(),
            });
        }
        let table = skin.weights.entry(vertex.index).or_default();
        match table.iter_mut().find(|(id, _)| id == influence) {
            Some(entry) => entry.1 = weight,
            None => table.push((influence.clone(), weight)),
        }

        self.mutations.push(Mutation::SetWeight {
            deformer: deformer.clone(),
            vertex: vertex.clone(),
            influence: influence.clone(),
            weight,
        });
        Ok(())
    }

    fn renormalize(&mut self, deformer: &DeformerHandle, vertex: &VertexId) -> HostResult<()> {
        self.check_vertex(deformer, vertex)?;
        let skin = self.deformer_mut(deformer)?;
        if let Some(table) = skin.weights.get_mut(&vertex.index) {
            let total: f64 = table.iter().map(|(_, weight)| *weight).sum();
            if total > 0.0 {
                for (_, weight) in table.iter_mut() {
                    *weight /= total;
                }
            }
        }

        self.mutations.push(Mutation::Renormalize {
            deformer: deformer.clone(),
            vertex: vertex.clone(),
        });
        Ok(())
    }
}
