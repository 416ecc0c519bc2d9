//! Runs the full pipeline on a synthetic limb volume and reports what each
//! viewport would draw.
//!
//! The volume fakes a scanned limb segment: intensity falls off with
//! distance from a vertical axis, with a dip halfway up so the "bone"
//! splits into two pieces around a joint gap.

use glam::{UVec3, Vec3};
use osteoview::{build_frame, CameraParameters, Geometry, PipelineConfig, VolumetricField};

fn limb_intensity(p: Vec3, axis: Vec3, joint_z: f32) -> f32 {
    let radial = (Vec3::new(p.x, p.y, 0.0) - Vec3::new(axis.x, axis.y, 0.0)).length();
    let gap = 25.0 * (-((p.z - joint_z) / 8.0).powi(2)).exp();
    100.0 - 2.0 * radial - gap
}

fn main() -> osteoview::Result<()> {
    osteoview::init_logging();

    let dims = UVec3::new(64, 64, 96);
    let axis = Vec3::new(32.0, 32.0, 0.0);
    let joint_z = 48.0;

    let mut samples = Vec::with_capacity((dims.x * dims.y * dims.z) as usize);
    for i in 0..dims.x {
        for j in 0..dims.y {
            for k in 0..dims.z {
                let p = Vec3::new(i as f32, j as f32, k as f32);
                samples.push(limb_intensity(p, axis, joint_z));
            }
        }
    }
    let field = VolumetricField::new(dims, Vec3::ONE, Vec3::ZERO, samples)?;

    let config = PipelineConfig {
        sphere_center: Vec3::new(32.0, 44.0, 48.0),
        sphere_radius: 16.0,
        camera: CameraParameters::new(
            Vec3::new(-150.0, 32.0, 60.0),
            Vec3::new(32.0, 32.0, 48.0),
            -90.0,
        ),
        tube_sides: 32,
        sphere_sample_dims: 48,
        sphere_sample_extent: 120.0,
        cache_path: std::env::temp_dir().join("osteoview-demo-distance.json"),
        ..PipelineConfig::default()
    };

    let frame = build_frame(&field, &config)?;

    let (w, h) = frame.size();
    println!("frame {w}x{h}, camera at {:?}", frame.camera().position);
    for viewport in frame.viewports() {
        let mut triangles = 0;
        let mut segments = 0;
        for drawable in viewport.root.flatten() {
            match &drawable.geometry {
                Geometry::Surface(mesh) => triangles += mesh.num_triangles(),
                Geometry::Lines(lines) => segments += lines.len(),
            }
        }
        println!(
            "  [{:.2},{:.2}]x[{:.2},{:.2}] {:<22} {triangles:>8} triangles, {segments} outline segments",
            viewport.rect.x0,
            viewport.rect.y0,
            viewport.rect.x1,
            viewport.rect.y1,
            viewport.root.name(),
        );
    }

    Ok(())
}
