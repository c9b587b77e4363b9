#[cfg(test)]
mod tests {
    use crate::{HostError, MeshId, VertexId};

    #[test]
    fn test_vertex_id_display() {
        let vertex = VertexId::new("body", 12);
        assert_eq!(vertex.to_string(), "body.vtx[12]");
        assert_eq!(vertex.mesh, MeshId::new("body"));
    }

    #[test]
    fn test_name_conversions() {
        let mesh: MeshId = "arm_geo".into();
        assert_eq!(mesh.as_str(), "arm_geo");
        assert_eq!(MeshId::from(String::from("arm_geo")), mesh);
    }

    #[test]
    fn test_vertex_ordering_follows_mesh_then_index() {
        let mut vertices = vec![
            VertexId::new("b", 0),
            VertexId::new("a", 3),
            VertexId::new("a", 1),
        ];
        vertices.sort();
        assert_eq!(vertices[0], VertexId::new("a", 1));
        assert_eq!(vertices[2], VertexId::new("b", 0));
    }

    #[test]
    fn test_host_error_messages() {
        let error = HostError::VertexOutOfRange {
            vertex: "body.vtx[99]".to_string(),
        };
        assert_eq!(error.to_string(), "Vertex out of range: body.vtx[99]");
        assert_eq!(HostError::other("boom").to_string(), "boom");
    }
}
