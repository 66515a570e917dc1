//! Planar unwrap demo on a bevelled box.
//!
//! Usage:
//! ```text
//! cargo run --example unwrap_cube              # default 5 degree separation
//! cargo run --example unwrap_cube -- 50        # separation angle in degrees
//! RUST_LOG=planar_unwrap=trace cargo run --example unwrap_cube
//! ```

use planar_unwrap::math::Point3;
use planar_unwrap::mesh::{FaceId, PolyMesh};
use planar_unwrap::operations::{FaceGroup, NoLayout, PlanarUnwrapAll, UnwrapConfig};
use planar_unwrap::Result;

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for planar_unwrap.
    // Override with RUST_LOG env var (e.g. RUST_LOG=planar_unwrap=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("planar_unwrap=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut config = UnwrapConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        // Unparsable input is reported as an invalid angle.
        config = config.with_separation_angle(arg.parse().unwrap_or(f64::NAN));
    }

    let mesh = bevelled_box()?;
    let mut projector = |group: &FaceGroup<FaceId>| -> Result<()> {
        let n = group.representative_normal();
        println!(
            "shell of {:>2} faces, normal ({:+.3}, {:+.3}, {:+.3})",
            group.len(),
            n.x,
            n.y,
            n.z
        );
        Ok(())
    };

    let partition = PlanarUnwrapAll::new(config).execute(&mesh, &mut projector, &mut NoLayout)?;
    println!(
        "{} faces in {} shells at {} degrees",
        partition.face_count(),
        partition.len(),
        config.separation_angle
    );
    Ok(())
}

/// A box with its top four edges chamfered at 45 degrees.
fn bevelled_box() -> Result<PolyMesh> {
    let mut mesh = PolyMesh::new();
    let mut v = |x: f64, y: f64, z: f64| mesh.add_vertex(Point3::new(x, y, z));

    // Bottom ring, top ring (inset by the chamfer), then mid ring.
    let b = [v(0.0, 0.0, 0.0), v(4.0, 0.0, 0.0), v(4.0, 4.0, 0.0), v(0.0, 4.0, 0.0)];
    let m = [v(0.0, 0.0, 3.0), v(4.0, 0.0, 3.0), v(4.0, 4.0, 3.0), v(0.0, 4.0, 3.0)];
    let t = [v(1.0, 1.0, 4.0), v(3.0, 1.0, 4.0), v(3.0, 3.0, 4.0), v(1.0, 3.0, 4.0)];

    mesh.add_face([b[0], b[3], b[2], b[1]])?;
    mesh.add_face([t[0], t[1], t[2], t[3]])?;
    for i in 0..4 {
        let j = (i + 1) % 4;
        mesh.add_face([b[i], b[j], m[j], m[i]])?;
        mesh.add_face([m[i], m[j], t[j], t[i]])?;
    }
    Ok(mesh)
}
