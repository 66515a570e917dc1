use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::{NormalError, Result};
use crate::math::{NormalTolerance, UnitNormal, Vector3};

/// An ordered group of faces sharing a representative normal.
///
/// The first face is the representative; the rest follow in the order
/// they were absorbed.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGroup<F> {
    normal: UnitNormal,
    faces: Vec<F>,
}

impl<F> FaceGroup<F> {
    /// Returns the face whose normal seeded the group.
    #[must_use]
    pub fn representative(&self) -> &F {
        &self.faces[0]
    }

    /// Returns the normalized normal of the representative face.
    #[must_use]
    pub fn representative_normal(&self) -> &Vector3 {
        self.normal.as_vector()
    }

    /// Returns all member faces, representative first.
    #[must_use]
    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    /// Returns the number of faces in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always `false`: a group holds at least its representative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Consumes the group, returning its faces.
    #[must_use]
    pub fn into_faces(self) -> Vec<F> {
        self.faces
    }
}

/// The ordered set of disjoint face groups produced by one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<F> {
    groups: Vec<FaceGroup<F>>,
}

impl<F> Default for Partition<F> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<F> Partition<F> {
    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the partition has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the groups in representative order.
    #[must_use]
    pub fn groups(&self) -> &[FaceGroup<F>] {
        &self.groups
    }

    /// Iterates over the groups in representative order.
    pub fn iter(&self) -> std::slice::Iter<'_, FaceGroup<F>> {
        self.groups.iter()
    }

    /// Total number of faces across all groups.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.groups.iter().map(FaceGroup::len).sum()
    }

    /// Consumes the partition, returning the groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<FaceGroup<F>> {
        self.groups
    }
}

impl<F> IntoIterator for Partition<F> {
    type Item = FaceGroup<F>;
    type IntoIter = std::vec::IntoIter<FaceGroup<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a, F> IntoIterator for &'a Partition<F> {
    type Item = &'a FaceGroup<F>;
    type IntoIter = std::slice::Iter<'a, FaceGroup<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partitions faces into groups of equivalent normals.
///
/// Greedy and order-sensitive: the first pending face seeds a group, then
/// one front-to-back scan absorbs every pending face whose normal is
/// equivalent to the seed's. Membership is tested against the seed only,
/// so two members of one group may differ by up to twice the tolerance.
/// Runs in O(n²).
#[derive(Debug, Clone, Copy)]
pub struct ClusterNormals {
    tolerance: NormalTolerance,
}

impl ClusterNormals {
    /// Creates a new `ClusterNormals` operation.
    #[must_use]
    pub fn new(tolerance: NormalTolerance) -> Self {
        Self { tolerance }
    }

    /// Returns the tolerance used for normal comparisons.
    #[must_use]
    pub fn tolerance(&self) -> NormalTolerance {
        self.tolerance
    }

    /// Executes the clustering over `(face, normal)` pairs.
    ///
    /// The input is only borrowed; faces are cloned into the result.
    ///
    /// # Errors
    ///
    /// Returns [`NormalError::Degenerate`] if any normal cannot be
    /// normalized. No partition is produced in that case.
    pub fn execute<F: Clone>(&self, faces: &[(F, Vector3)]) -> Result<Partition<F>> {
        debug!(
            faces = faces.len(),
            tolerance = self.tolerance.value(),
            "clustering face normals"
        );

        let mut pending = faces
            .iter()
            .enumerate()
            .map(|(index, (face, normal))| {
                UnitNormal::new(*normal)
                    .map(|unit| (face, unit))
                    .ok_or_else(|| NormalError::Degenerate {
                        index,
                        magnitude: normal.norm(),
                    })
            })
            .collect::<std::result::Result<VecDeque<_>, _>>()?;

        let mut groups = Vec::new();
        while let Some((seed, normal)) = pending.pop_front() {
            let mut members = vec![F::clone(seed)];
            pending.retain(|(face, candidate)| {
                if normal.is_equivalent(candidate, self.tolerance) {
                    members.push(F::clone(face));
                    false
                } else {
                    true
                }
            });
            trace!(group = groups.len(), size = members.len(), "face group closed");
            groups.push(FaceGroup {
                normal,
                faces: members,
            });
        }

        debug!(groups = groups.len(), "clustering finished");
        Ok(Partition { groups })
    }
}

/// Clusters `(face, normal)` pairs with the given tolerance.
///
/// Shorthand for `ClusterNormals::new(tolerance).execute(faces)`.
///
/// # Errors
///
/// See [`ClusterNormals::execute`].
pub fn cluster<F: Clone>(
    faces: &[(F, Vector3)],
    tolerance: NormalTolerance,
) -> Result<Partition<F>> {
    ClusterNormals::new(tolerance).execute(faces)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UnwrapError;
    use std::collections::HashSet;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn deg(degrees: f64) -> NormalTolerance {
        NormalTolerance::from_degrees(degrees).unwrap()
    }

    /// Unit normal in the XZ plane, `degrees` away from +Z towards +X.
    fn tilted(degrees: f64) -> Vector3 {
        let a = degrees.to_radians();
        v(a.sin(), 0.0, a.cos())
    }

    /// Faces `0..19` with normals fanned out every 10 degrees from +Z.
    fn fan() -> Vec<(usize, Vector3)> {
        (0..19).map(|i| (i, tilted(10.0 * i as f64))).collect()
    }

    fn ids<F: Clone>(partition: &Partition<F>) -> Vec<Vec<F>> {
        partition.iter().map(|g| g.faces().to_vec()).collect()
    }

    #[test]
    fn empty_input_gives_empty_partition() {
        let faces: Vec<(u32, Vector3)> = Vec::new();
        let partition = cluster(&faces, deg(10.0)).unwrap();
        assert!(partition.is_empty());
        assert_eq!(partition.face_count(), 0);
    }

    #[test]
    fn single_face() {
        let partition = cluster(&[(7u32, v(0.0, 0.0, 2.0))], deg(0.0)).unwrap();
        assert_eq!(ids(&partition), vec![vec![7]]);
        assert_eq!(partition.groups()[0].representative_normal(), &Vector3::z());
    }

    #[test]
    fn covers_every_face_exactly_once() {
        let faces = fan();
        for degrees in [0.0, 5.0, 25.0, 60.0, 95.0, 150.0, 180.0] {
            let partition = cluster(&faces, deg(degrees)).unwrap();
            let mut seen = HashSet::new();
            for group in &partition {
                assert!(!group.is_empty());
                for face in group.faces() {
                    assert!(seen.insert(*face), "face {face} appears twice");
                }
            }
            assert_eq!(seen.len(), faces.len());
            assert_eq!(partition.face_count(), faces.len());
        }
    }

    #[test]
    fn deterministic() {
        let faces = fan();
        let a = cluster(&faces, deg(35.0)).unwrap();
        let b = cluster(&faces, deg(35.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn more_tolerance_never_adds_groups() {
        let faces = fan();
        let counts: Vec<usize> = [0.0, 5.0, 15.0, 25.0, 45.0, 95.0, 135.0, 180.0]
            .into_iter()
            .map(|d| cluster(&faces, deg(d)).unwrap().len())
            .collect();

        assert!(counts.windows(2).all(|w| w[1] <= w[0]), "{counts:?}");
        assert_eq!(counts.first(), Some(&19));
        assert_eq!(counts.last(), Some(&1));
        // 15 degrees absorbs one neighbour per seed.
        assert_eq!(counts[2], 10);
    }

    #[test]
    fn more_tolerance_never_adds_groups_for_unsorted_input() {
        let angles = [
            73.0, 12.0, 151.0, 0.0, 98.0, 37.0, 164.0, 55.0, 121.0, 22.0, 140.0, 86.0, -30.0,
            105.0,
        ];
        let faces: Vec<(usize, Vector3)> = angles
            .iter()
            .enumerate()
            .map(|(i, &a)| (i, tilted(a)))
            .collect();
        let counts: Vec<usize> = [0.0, 8.0, 20.0, 40.0, 70.0, 110.0, 180.0]
            .into_iter()
            .map(|d| cluster(&faces, deg(d)).unwrap().len())
            .collect();

        assert_eq!(counts, vec![14, 13, 7, 4, 3, 1, 1]);
        assert_eq!(
            ids(&cluster(&faces, deg(20.0)).unwrap()),
            vec![
                vec![0, 7, 11],
                vec![1, 3, 9],
                vec![2, 6, 10],
                vec![4, 13],
                vec![5],
                vec![8],
                vec![12],
            ]
        );
    }

    #[test]
    fn zero_tolerance_keeps_nearly_parallel_normals_apart() {
        let faces = [(0, v(0.0, 0.0, 1.0)), (1, v(1e-9, 0.0, 1.0))];
        let partition = cluster(&faces, NormalTolerance::EXACT).unwrap();
        assert_eq!(ids(&partition), vec![vec![0], vec![1]]);
    }

    #[test]
    fn zero_tolerance_gives_singletons() {
        let faces = fan();
        let partition = cluster(&faces, NormalTolerance::EXACT).unwrap();
        assert_eq!(partition.len(), faces.len());
        assert!(partition.iter().all(|g| g.len() == 1));
        let order: Vec<usize> = partition.iter().map(|g| *g.representative()).collect();
        assert_eq!(order, (0..19).collect::<Vec<_>>());
    }

    #[test]
    fn zero_tolerance_merges_identical_normals() {
        let n = v(0.2, 0.5, -0.8);
        let faces = [(0, n), (1, v(1.0, 0.0, 0.0)), (2, n * 2.0)];
        let partition = cluster(&faces, NormalTolerance::EXACT).unwrap();
        assert_eq!(ids(&partition), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn maximal_tolerance_gives_one_group() {
        let mut faces = fan();
        faces.push((19, -Vector3::z()));
        faces.push((20, v(0.0, -3.0, 0.0)));
        let partition = cluster(&faces, NormalTolerance::ANY).unwrap();
        assert_eq!(ids(&partition), vec![(0..21).collect::<Vec<_>>()]);
    }

    #[test]
    fn membership_is_not_transitive() {
        // n2 and n3 are each 40 degrees from n1 but 80 degrees apart.
        let tol = deg(45.0);
        let (n1, n2, n3) = (tilted(0.0), tilted(40.0), tilted(-40.0));
        assert!(!UnitNormal::new(n2)
            .unwrap()
            .is_equivalent(&UnitNormal::new(n3).unwrap(), tol));

        let partition = cluster(&[("f1", n1), ("f2", n2), ("f3", n3)], tol).unwrap();
        assert_eq!(ids(&partition), vec![vec!["f1", "f2", "f3"]]);
    }

    #[test]
    fn seed_order_decides_grouping() {
        // Same normals, but seeding with n2 leaves n3 out of its group.
        let tol = deg(45.0);
        let faces = [("f2", tilted(40.0)), ("f1", tilted(0.0)), ("f3", tilted(-40.0))];
        let partition = cluster(&faces, tol).unwrap();
        assert_eq!(ids(&partition), vec![vec!["f2", "f1"], vec!["f3"]]);
    }

    #[test]
    fn absorbed_faces_keep_encounter_order() {
        let up = Vector3::z();
        let side = Vector3::x();
        let faces = [("f1", up), ("f2", up * 0.5), ("f3", side), ("f4", tilted(3.0))];
        let partition = cluster(&faces, deg(10.0)).unwrap();

        assert_eq!(ids(&partition), vec![vec!["f1", "f2", "f4"], vec!["f3"]]);
        assert_eq!(partition.groups()[1].representative(), &"f3");
    }

    #[test]
    fn groups_follow_first_unconsumed_face() {
        let faces = [
            (0, Vector3::x()),
            (1, Vector3::y()),
            (2, Vector3::x()),
            (3, Vector3::z()),
            (4, Vector3::y()),
        ];
        let partition = cluster(&faces, deg(1.0)).unwrap();
        assert_eq!(ids(&partition), vec![vec![0, 2], vec![1, 4], vec![3]]);
    }

    #[test]
    fn normals_need_not_be_unit_length() {
        let faces = [(0, v(0.0, 0.0, 10.0)), (1, tilted(5.0) * 0.01), (2, v(7.0, 0.0, 0.0))];
        let partition = cluster(&faces, deg(10.0)).unwrap();
        assert_eq!(ids(&partition), vec![vec![0, 1], vec![2]]);
        assert_eq!(partition.groups()[1].representative_normal(), &Vector3::x());
    }

    #[test]
    fn degenerate_normal_aborts_run() {
        let faces = [
            (0, Vector3::z()),
            (1, Vector3::z()),
            (2, v(0.0, 1e-13, 0.0)),
            (3, Vector3::x()),
        ];
        let result = cluster(&faces, deg(10.0));
        assert!(matches!(
            result,
            Err(UnwrapError::Normal(NormalError::Degenerate { index: 2, .. }))
        ));
    }

    #[test]
    fn lone_degenerate_normal_is_still_rejected() {
        let result = cluster(&[(0, Vector3::zeros())], NormalTolerance::ANY);
        assert!(result.is_err());
    }

    #[test]
    fn input_is_left_untouched() {
        let faces = fan();
        let before = faces.clone();
        let _ = cluster(&faces, deg(30.0)).unwrap();
        assert_eq!(faces, before);
    }
}
