//! Vertex expressions and their expansion
//!
//! Hosts select vertices compactly: `body.vtx[12]`, `body.vtx[3:17]` or
//! `body.vtx[*]`. [`VertexSelector::parse`] validates such an expression into
//! a typed value before anything is expanded; [`VertexRange::expand`] then
//! yields every [`VertexId`] the inclusive range denotes.

use std::str::FromStr;

use crate::{
    error::{Error, Result},
    host::{MeshId, VertexId},
};

const VERTEX_COMPONENT: &str = ".vtx[";

/// An inclusive range of vertex indices on one mesh
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexRange {
    mesh: MeshId,
    start: u32,
    end: u32,
}

impl VertexRange {
    /// Create a range, rejecting `start > end`
    pub fn new<M: Into<MeshId>>(mesh: M, start: u32, end: u32) -> Result<Self> {
        let mesh = mesh.into();
        if start > end {
            return Err(Error::parse_error(
                format!("{mesh}{VERTEX_COMPONENT}{start}:{end}]"),
                "range start is after its end",
            ));
        }
        Ok(Self { mesh, start, end })
    }

    /// A range covering one vertex
    pub fn single<M: Into<MeshId>>(mesh: M, index: u32) -> Self {
        Self {
            mesh: mesh.into(),
            start: index,
            end: index,
        }
    }

    /// A range covering every vertex of a mesh, `None` for a mesh without vertices
    pub fn whole_mesh<M: Into<MeshId>>(mesh: M, vertex_count: u32) -> Option<Self> {
        let end = vertex_count.checked_sub(1)?;
        Some(Self {
            mesh: mesh.into(),
            start: 0,
            end,
        })
    }

    /// The mesh owning the vertices
    pub fn mesh(&self) -> &MeshId {
        &self.mesh
    }

    /// First index, inclusive
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last index, inclusive
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of vertices in the range
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Ranges always hold at least one vertex
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` falls inside the range
    pub fn contains(&self, index: u32) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Every vertex in the range, in ascending index order
    pub fn expand(&self) -> impl Iterator<Item = VertexId> + '_ {
        (self.start..=self.end).map(move |index| VertexId::new(self.mesh.clone(), index))
    }
}

/// A parsed vertex expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VertexSelector {
    /// `mesh.vtx[i]` or `mesh.vtx[a:b]`
    Range(VertexRange),
    /// `mesh.vtx[*]`, resolved against the host's vertex count
    AllOf(MeshId),
}

impl VertexSelector {
    /// Parse a host vertex expression
    pub fn parse(expression: &str) -> Result<Self> {
        let fail = |message: &str| Error::parse_error(expression, message);

        let (mesh, rest) = expression
            .split_once(VERTEX_COMPONENT)
            .ok_or_else(|| fail("expected '<mesh>.vtx[<indices>]'"))?;
        if mesh.is_empty() {
            return Err(fail("missing mesh name"));
        }
        let body = rest
            .strip_suffix(']')
            .ok_or_else(|| fail("missing closing ']'"))?;
        if body.contains(['[', ']']) {
            return Err(fail("unexpected bracket inside the index list"));
        }

        if body == "*" {
            return Ok(Self::AllOf(MeshId::new(mesh)));
        }
        let range = match body.split_once(':') {
            Some((start, end)) => {
                let start = parse_index(start).map_err(|message| fail(message))?;
                let end = parse_index(end).map_err(|message| fail(message))?;
                if start > end {
                    return Err(fail("range start is after its end"));
                }
                VertexRange {
                    mesh: MeshId::new(mesh),
                    start,
                    end,
                }
            }
            None => {
                let index = parse_index(body).map_err(|message| fail(message))?;
                VertexRange::single(mesh, index)
            }
        };
        Ok(Self::Range(range))
    }

    /// The mesh the expression refers to
    pub fn mesh(&self) -> &MeshId {
        match self {
            Self::Range(range) => range.mesh(),
            Self::AllOf(mesh) => mesh,
        }
    }

    /// Turn the selector into a concrete range given the mesh's vertex count
    ///
    /// Explicit ranges reaching past the last vertex are rejected; a wildcard
    /// on a mesh without vertices resolves to `None`.
    pub fn resolve(self, vertex_count: u32) -> Result<Option<VertexRange>> {
        match self {
            Self::AllOf(mesh) => Ok(VertexRange::whole_mesh(mesh, vertex_count)),
            Self::Range(range) if range.end >= vertex_count => Err(Error::parse_error(
                format!("{}{VERTEX_COMPONENT}{}:{}]", range.mesh, range.start, range.end),
                format!("mesh has only {vertex_count} vertices"),
            )),
            Self::Range(range) => Ok(Some(range)),
        }
    }
}

impl FromStr for VertexSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_index(digits: &str) -> std::result::Result<u32, &'static str> {
    if digits.is_empty() {
        return Err("missing vertex index");
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("vertex index must be a non-negative integer");
    }
    digits.parse().map_err(|_| "vertex index is too large")
}

/// Expand explicit vertex expressions into individual vertices, in order
///
/// Wildcards need the host's vertex count and are rejected here.
pub fn expand_expressions<I, S>(expressions: I) -> Result<Vec<VertexId>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut vertices = Vec::new();
    for expression in expressions {
        let expression = expression.as_ref();
        match VertexSelector::parse(expression)? {
            VertexSelector::Range(range) => vertices.extend(range.expand()),
            VertexSelector::AllOf(_) => {
                return Err(Error::parse_error(
                    expression,
                    "wildcard needs the mesh's vertex count",
                ));
            }
        }
    }
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(vertices: &[VertexId]) -> Vec<u32> {
        vertices.iter().map(|vertex| vertex.index).collect()
    }

    #[test]
    fn test_range_expands_inclusive() {
        let vertices = expand_expressions(["mesh.vtx[3:7]"]).unwrap();
        assert_eq!(vertices.len(), 5);
        assert_eq!(indices(&vertices), [3, 4, 5, 6, 7]);
        assert!(vertices.iter().all(|vertex| vertex.mesh.as_str() == "mesh"));
        assert_eq!(vertices[0].to_string(), "mesh.vtx[3]");
    }

    #[test]
    fn test_single_and_mixed_expressions() {
        let vertices = expand_expressions(["arm.vtx[0]", "arm.vtx[4:5]", "leg.vtx[2]"]).unwrap();
        assert_eq!(indices(&vertices), [0, 4, 5, 2]);
        assert_eq!(vertices[3].mesh.as_str(), "leg");
    }

    #[test]
    fn test_degenerate_range_is_one_vertex() {
        let selector = VertexSelector::parse("m.vtx[9:9]").unwrap();
        let VertexSelector::Range(range) = selector else {
            panic!("expected a range");
        };
        assert_eq!(range.len(), 1);
        assert!(range.contains(9));
    }

    #[test]
    fn test_namespaced_mesh_names() {
        let selector: VertexSelector = "rig:body|geo.vtx[1:2]".parse().unwrap();
        assert_eq!(selector.mesh().as_str(), "rig:body|geo");
    }

    #[test]
    fn test_wildcard_resolution() {
        let selector = VertexSelector::parse("body.vtx[*]").unwrap();
        assert_eq!(selector, VertexSelector::AllOf(MeshId::new("body")));

        let range = selector.clone().resolve(3).unwrap().unwrap();
        assert_eq!((range.start(), range.end()), (0, 2));
        assert_eq!(selector.resolve(0).unwrap(), None);
        assert!(expand_expressions(["body.vtx[*]"]).is_err());
    }

    #[test]
    fn test_range_past_mesh_end_rejected() {
        let selector = VertexSelector::parse("body.vtx[2:8]").unwrap();
        assert!(matches!(
            selector.resolve(8),
            Err(Error::ParseError { .. })
        ));
    }

    #[test]
    fn test_malformed_expressions() {
        for expression in [
            "body",
            ".vtx[1]",
            "body.vtx[1",
            "body.vtx[]",
            "body.vtx[a:3]",
            "body.vtx[-1]",
            "body.vtx[7:3]",
            "body.vtx[1:]",
            "body.vtx[1:2:3]",
            "body.vtx[1][2]",
            "body.vtx[ 1]",
            "body.vtx[99999999999]",
        ] {
            let result = VertexSelector::parse(expression);
            assert!(
                matches!(result, Err(Error::ParseError { .. })),
                "{expression} should not parse"
            );
        }
    }

    #[test]
    fn test_new_rejects_reversed_bounds() {
        assert!(VertexRange::new("m", 4, 2).is_err());
        assert_eq!(VertexRange::new("m", 2, 4).unwrap().len(), 3);
        assert_eq!(VertexRange::whole_mesh("m", 0), None);
    }
}
