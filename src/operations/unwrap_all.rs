use tracing::info;

use crate::error::Result;
use crate::math::NormalTolerance;
use crate::mesh::MeshSource;

use super::cluster::{ClusterNormals, FaceGroup, Partition};

/// Applies a planar UV projection to one group of faces.
///
/// Called once per group, in partition order. The projector never sees
/// faces from two groups in the same call and is responsible for any
/// selection state it needs to reset between calls.
pub trait PlanarProjector<F> {
    /// Projects a single group.
    ///
    /// # Errors
    ///
    /// Returns an error if the projection fails; the run stops there.
    fn project(&mut self, group: &FaceGroup<F>) -> Result<()>;
}

impl<F, T> PlanarProjector<F> for T
where
    T: FnMut(&FaceGroup<F>) -> Result<()>,
{
    fn project(&mut self, group: &FaceGroup<F>) -> Result<()> {
        self(group)
    }
}

/// Packs the UV shells of a fully projected partition.
pub trait LayoutPacker<F> {
    /// Lays out all shells without overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if packing fails.
    fn pack(&mut self, partition: &Partition<F>) -> Result<()>;
}

/// A packer that leaves the projected shells where they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLayout;

impl<F> LayoutPacker<F> for NoLayout {
    fn pack(&mut self, _partition: &Partition<F>) -> Result<()> {
        Ok(())
    }
}

/// Parameters for a planar unwrap run.
#[derive(Debug, Clone, Copy)]
pub struct UnwrapConfig {
    /// Maximum angle in degrees between a face normal and its group's
    /// representative normal.
    pub separation_angle: f64,
}

impl Default for UnwrapConfig {
    fn default() -> Self {
        Self {
            separation_angle: 5.0,
        }
    }
}

impl UnwrapConfig {
    /// Sets the separation angle in degrees.
    #[must_use]
    pub fn with_separation_angle(mut self, degrees: f64) -> Self {
        self.separation_angle = degrees;
        self
    }

    /// Derives the normal tolerance from the separation angle.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle is outside `[0, 180]` degrees.
    pub fn tolerance(&self) -> Result<NormalTolerance> {
        Ok(NormalTolerance::from_degrees(self.separation_angle)?)
    }
}

/// Groups every face of a mesh by normal and projects each group onto
/// its own plane, then packs the resulting shells.
///
/// The tolerance is validated before the mesh is read. Any failure stops
/// the run and is returned as-is; no partial result is reported.
pub struct PlanarUnwrapAll {
    config: UnwrapConfig,
}

impl PlanarUnwrapAll {
    /// Creates a new `PlanarUnwrapAll` operation.
    #[must_use]
    pub fn new(config: UnwrapConfig) -> Self {
        Self { config }
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &UnwrapConfig {
        &self.config
    }

    /// Executes the unwrap, returning the partition that was projected.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is invalid, a normal is
    /// degenerate, or any collaborator fails.
    pub fn execute<M, P, L>(
        &self,
        mesh: &M,
        projector: &mut P,
        packer: &mut L,
    ) -> Result<Partition<M::Face>>
    where
        M: MeshSource,
        P: PlanarProjector<M::Face>,
        L: LayoutPacker<M::Face>,
    {
        let tolerance = self.config.tolerance()?;
        let faces = mesh.face_normals()?;
        let partition = ClusterNormals::new(tolerance).execute(&faces)?;

        for group in &partition {
            projector.project(group)?;
        }
        packer.pack(&partition)?;

        info!(
            angle = self.config.separation_angle,
            tolerance = tolerance.value(),
            faces = partition.face_count(),
            groups = partition.len(),
            "planar unwrap finished"
        );
        Ok(partition)
    }
}
