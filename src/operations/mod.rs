mod cluster;
mod unwrap_all;

pub use cluster::{cluster, ClusterNormals, FaceGroup, Partition};
pub use unwrap_all::{LayoutPacker, NoLayout, PlanarProjector, PlanarUnwrapAll, UnwrapConfig};
