/// Geometry storage: vertex and index buffers
use nalgebra::{Point3, Vector3};

/// An object-space vertex position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

/// A triangle resolved to three positions, ready for a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self {
            positions: [p0, p1, p2],
        }
    }

    /// Calculate the face normal from the triangle's positions.
    ///
    /// Degenerate triangles yield a zero vector instead of NaN.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [p0, p1, p2] = self.positions;

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// Vertex list plus a flat index list grouped in triples.
///
/// Vertices are addressed by declaration order (0-based). Indices are not
/// checked against the vertex count when they are added; a store may hold
/// references to vertices that never existed, or an index count that is not
/// a multiple of three. Both are detected when a frame is composed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryStore {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw buffers without validating them
    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub(crate) fn push_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub(crate) fn push_triangle(&mut self, indices: [u32; 3]) {
        self.indices.extend_from_slice(&indices);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex(&self, index: u32) -> Option<&Vertex> {
        self.vertices.get(index as usize)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of complete index triples
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Axis-aligned bounds of all vertices, referenced or not
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }

    /// A small tetrahedron, shown when no mesh file is given
    pub fn pyramid() -> Self {
        Self::from_parts(
            vec![
                Vertex::new(0.0, 0.5, 0.0),   // Top
                Vertex::new(-0.5, -0.5, 0.5), // Front-left
                Vertex::new(0.5, -0.5, 0.5),  // Front-right
                Vertex::new(0.0, -0.5, -0.5), // Back
            ],
            vec![
                0, 1, 2, // Front
                0, 2, 3, // Right
                0, 3, 1, // Left
                1, 2, 3, // Bottom
            ],
        )
    }
}
