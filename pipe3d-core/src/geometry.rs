//! Model-space geometry
use crate::vector::Vector3;

/// An immutable, ordered sequence of model-space points.
///
/// Every consecutive run of three points is one triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vector3>,
}

impl Mesh {
    /// # Panics
    ///
    /// If the vertex count is not a multiple of 3.
    pub fn new(vertices: Vec<Vector3>) -> Self {
        assert!(vertices.len() % 3 == 0, "mesh vertex count must be a multiple of 3");
        Self { vertices }
    }

    /// The single local triangle drawn by the demo
    pub fn triangle() -> Self {
        Self::new(vec![
            Vector3::new(40.0, 0.0, 0.0),
            Vector3::new(-40.0, 0.0, 0.0),
            Vector3::new(0.0, 30.0, 0.0),
        ])
    }

    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vector3; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::triangle()
    }
}
