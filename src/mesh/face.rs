use crate::math::{Point3, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a face in a [`PolyMesh`](super::PolyMesh).
    pub struct FaceId;
}

/// Data associated with a polygon face.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Indices into the mesh vertex list, counter-clockwise from outside.
    pub vertices: Vec<usize>,
}

impl FaceData {
    /// Creates a face over the given vertex indices.
    #[must_use]
    pub fn new(vertices: Vec<usize>) -> Self {
        Self { vertices }
    }

    /// Newell's method: sum of `p_i x p_(i+1)` around the polygon.
    ///
    /// Robust for non-planar and concave polygons. Every index must be
    /// valid for `points`, which [`PolyMesh::add_face`](super::PolyMesh::add_face)
    /// guarantees.
    pub(crate) fn newell_normal(&self, points: &[Point3]) -> Vector3 {
        let n = self.vertices.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let a = &points[self.vertices[i]];
            let b = &points[self.vertices[(i + 1) % n]];
            normal += a.coords.cross(&b.coords);
        }
        normal
    }
}
