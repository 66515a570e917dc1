mod face;

pub use face::{FaceData, FaceId};

use slotmap::SlotMap;

use crate::error::{MeshError, Result};
use crate::math::{Point3, Vector3};

/// Supplies the ordered `(face, normal)` pairs a clustering run consumes.
///
/// Implemented by [`PolyMesh`] and by host-application adapters. Normals
/// need not be unit length. Failures from a host adapter should be wrapped
/// with [`UnwrapError::collaborator`](crate::UnwrapError::collaborator).
pub trait MeshSource {
    /// Opaque face handle handed back to the projector.
    type Face: Clone;

    /// Enumerates every face with its geometric normal, in mesh order.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh cannot be read.
    fn face_normals(&self) -> Result<Vec<(Self::Face, Vector3)>>;
}

/// A polygon mesh with shared vertex positions and arena-owned faces.
///
/// Faces are referenced by [`FaceId`] (a generational index), so handles
/// stay valid while other faces are removed.
#[derive(Debug, Default)]
pub struct PolyMesh {
    vertices: Vec<Point3>,
    faces: SlotMap<FaceId, FaceData>,
}

impl PolyMesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, point: Point3) -> usize {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    /// Inserts a polygon over existing vertex indices.
    ///
    /// Vertices are expected in counter-clockwise order seen from outside,
    /// so that the computed normal points outward.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon has fewer than 3 vertices or
    /// references a vertex that does not exist.
    pub fn add_face(&mut self, vertices: impl Into<Vec<usize>>) -> Result<FaceId> {
        let vertices = vertices.into();
        if vertices.len() < 3 {
            return Err(MeshError::TooFewVertices(vertices.len()).into());
        }
        let count = self.vertices.len();
        if let Some(&index) = vertices.iter().find(|&&i| i >= count) {
            return Err(MeshError::VertexOutOfRange { index, count }.into());
        }
        Ok(self.faces.insert(FaceData::new(vertices)))
    }

    /// Removes a face, returning its data.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not in the mesh.
    pub fn remove_face(&mut self, id: FaceId) -> Result<FaceData> {
        self.faces
            .remove(id)
            .ok_or_else(|| MeshError::FaceNotFound.into())
    }

    /// Returns the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not in the mesh.
    pub fn face(&self, id: FaceId) -> Result<&FaceData> {
        self.faces
            .get(id)
            .ok_or_else(|| MeshError::FaceNotFound.into())
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterates over all faces in mesh order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Computes the (non-normalized) normal of a face with Newell's method.
    ///
    /// The magnitude is twice the polygon's area, so zero-area faces
    /// yield a zero vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not in the mesh.
    pub fn face_normal(&self, id: FaceId) -> Result<Vector3> {
        let face = self.face(id)?;
        Ok(face.newell_normal(&self.vertices))
    }

    /// Builds an axis-aligned box with six outward-facing quads.
    ///
    /// Faces are created in the order `-Z`, `+Z`, `-Y`, `+Y`, `-X`, `+X`.
    #[must_use]
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let mut mesh = Self::new();
        for i in 0..8 {
            let x = if i & 1 == 0 { min.x } else { max.x };
            let y = if i & 2 == 0 { min.y } else { max.y };
            let z = if i & 4 == 0 { min.z } else { max.z };
            mesh.add_vertex(Point3::new(x, y, z));
        }
        let quads: [[usize; 4]; 6] = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        for quad in quads {
            mesh.faces.insert(FaceData::new(quad.to_vec()));
        }
        mesh
    }
}

impl MeshSource for PolyMesh {
    type Face = FaceId;

    fn face_normals(&self) -> Result<Vec<(FaceId, Vector3)>> {
        Ok(self
            .faces
            .iter()
            .map(|(id, face)| (id, face.newell_normal(&self.vertices)))
            .collect())
    }
}
