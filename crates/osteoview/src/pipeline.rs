//! The four view recipes and the frame-building entry point.
//!
//! Each recipe consumes the shared bone and skin surfaces read-only and
//! produces one scene tree; none of them touches state used by another, so
//! their order is irrelevant. Everything tunable arrives through the
//! [`PipelineConfig`] passed in explicitly.

use std::sync::Arc;

use glam::{UVec3, Vec3};
use osteoview_core::color_map::ColorMap;
use osteoview_core::error::Result;
use osteoview_core::implicit::ImplicitPrimitive;
use osteoview_core::PipelineConfig;
use osteoview_geometry::mesh::Mesh;
use osteoview_geometry::volume::VolumetricField;
use osteoview_geometry::{clip, contour, distance, marching_cubes, tube};

use crate::cache::{self, CacheKey};
use crate::scene::{DrawStyle, Drawable, FaceCulling, SceneNode};
use crate::viewport::{quad_layout, Frame, Viewport};

/// Runs the whole pipeline: extracts the bone and skin surfaces, builds the
/// four view scenes and composes them into a camera-synchronized frame.
///
/// The viewports land in layout order: sphere reveal bottom-left, distance
/// coloring bottom-right, tube cross-sections top-left, semi-transparency
/// top-right.
pub fn build_frame(field: &VolumetricField, config: &PipelineConfig) -> Result<Frame> {
    let bone = Arc::new(marching_cubes::extract(field, config.bone_threshold));
    let skin = Arc::new(marching_cubes::extract(field, config.skin_threshold));
    log::info!(
        "extracted bone ({} triangles) and skin ({} triangles)",
        bone.num_triangles(),
        skin.num_triangles()
    );

    let sphere = ImplicitPrimitive::sphere(config.sphere_center, config.sphere_radius);
    let outline = outline_box(field.bound_min(), field.bound_max());

    let scenes = [
        sphere_reveal_scene(&bone, &skin, &sphere, &outline, config)?,
        distance_scene(field, &bone, &skin, &outline, config)?,
        tube_cross_section_scene(field, &bone, &skin, &outline, config),
        semi_transparency_scene(&bone, &skin, &sphere, &outline, config),
    ];

    let rects = quad_layout();
    let [s0, s1, s2, s3] = scenes;
    let viewports = [
        Viewport::new(rects[0], config.backgrounds[0], s0),
        Viewport::new(rects[1], config.backgrounds[1], s1),
        Viewport::new(rects[2], config.backgrounds[2], s2),
        Viewport::new(rects[3], config.backgrounds[3], s3),
    ];

    Frame::compose(viewports, config.camera, config.render_size)
}

/// The twelve edges of the axis-aligned box spanning `min` to `max`.
#[must_use]
pub fn outline_box(min: Vec3, max: Vec3) -> Vec<[Vec3; 2]> {
    let corner = |i: u32| {
        Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };
    let mut edges = Vec::with_capacity(12);
    for i in 0..8_u32 {
        for axis in [1_u32, 2, 4] {
            if i & axis == 0 {
                edges.push([corner(i), corner(i | axis)]);
            }
        }
    }
    edges
}

/// Number of horizontal cross-section bands: one per `band_spacing`
/// physical units of scan height, derived from the physical bounds.
#[must_use]
pub fn band_count(field: &VolumetricField, band_spacing: f32) -> u32 {
    let height = field.bound_max().z - field.bound_min().z;
    (height / band_spacing).floor() as u32 + 1
}

/// Top-left view: the skin reduced to evenly spaced horizontal tube
/// slices, over the unmodified bone.
fn tube_cross_section_scene(
    field: &VolumetricField,
    bone: &Arc<Mesh>,
    skin: &Arc<Mesh>,
    outline: &[[Vec3; 2]],
    config: &PipelineConfig,
) -> SceneNode {
    let (bmin, bmax) = (field.bound_min(), field.bound_max());
    let plane = ImplicitPrimitive::plane(Vec3::ZERO, Vec3::Z);
    let high = plane.eval(Vec3::new(
        (bmin.x + bmax.x) / 2.0,
        (bmin.y + bmax.y) / 2.0,
        bmax.z,
    ));

    let count = band_count(field, config.band_spacing);
    let contours = contour::generate_values(skin, &plane, count, 0.0, high);
    log::debug!("cut {} skin contours across {count} bands", contours.len());

    let tubes: Vec<Mesh> = contours
        .iter()
        .map(|c| tube::tube(c, config.tube_radius, config.tube_sides))
        .collect();
    let tubes = Arc::new(Mesh::merged(&tubes));

    SceneNode::with_parts(
        "tube cross-sections",
        vec![
            Drawable::surface(tubes, DrawStyle::solid(config.skin_color)),
            Drawable::surface(bone.clone(), DrawStyle::solid(config.bone_color)),
            Drawable::lines(outline.to_vec(), DrawStyle::solid(config.outline_color)),
        ],
    )
}

/// Top-right view: skin clipped open at the sphere, rendered twice from
/// one clip result - the front-culled copy opaque, the back-culled copy
/// half transparent - to keep depth cues around the revealed joint.
fn semi_transparency_scene(
    bone: &Arc<Mesh>,
    skin: &Arc<Mesh>,
    sphere: &ImplicitPrimitive,
    outline: &[[Vec3; 2]],
    config: &PipelineConfig,
) -> SceneNode {
    let clipped = Arc::new(clip::clip(skin, sphere, false));

    SceneNode::with_parts(
        "semi-transparent skin",
        vec![
            Drawable::surface(
                clipped.clone(),
                DrawStyle::solid(config.skin_color)
                    .with_culling(FaceCulling::Back)
                    .with_opacity(config.skin_back_opacity),
            ),
            Drawable::surface(
                clipped,
                DrawStyle::solid(config.skin_color).with_culling(FaceCulling::Front),
            ),
            Drawable::surface(bone.clone(), DrawStyle::solid(config.bone_color)),
            Drawable::lines(outline.to_vec(), DrawStyle::solid(config.outline_color)),
        ],
    )
}

/// Bottom-left view: skin clipped at the sphere, with the clip sphere
/// itself contoured from a dense implicit sampling and shown as a faint
/// translucent surface so the cut boundary stays visible in context.
fn sphere_reveal_scene(
    bone: &Arc<Mesh>,
    skin: &Arc<Mesh>,
    sphere: &ImplicitPrimitive,
    outline: &[[Vec3; 2]],
    config: &PipelineConfig,
) -> Result<SceneNode> {
    let clipped = Arc::new(clip::clip(skin, sphere, false));

    let reveal = ImplicitPrimitive::Difference(vec![sphere.clone()]);
    let extent = config.sphere_sample_extent;
    let grid = VolumetricField::sample_implicit(
        &reveal,
        Vec3::splat(-extent),
        Vec3::splat(extent),
        UVec3::splat(config.sphere_sample_dims),
    )?;
    let sphere_surface = Arc::new(marching_cubes::extract(&grid, 0.0));

    Ok(SceneNode::with_parts(
        "sphere reveal",
        vec![
            Drawable::surface(clipped, DrawStyle::solid(config.skin_color)),
            Drawable::surface(bone.clone(), DrawStyle::solid(config.bone_color)),
            Drawable::surface(
                sphere_surface,
                DrawStyle::solid(config.sphere_color).with_opacity(config.sphere_opacity),
            ),
            Drawable::lines(outline.to_vec(), DrawStyle::solid(config.outline_color)),
        ],
    ))
}

/// Bottom-right view: the bone alone, colored by its distance to the skin
/// through a blue-to-red hue sweep over the field's true range,
/// double-sided. The distance field comes from the cache when a valid
/// artifact exists.
fn distance_scene(
    field: &VolumetricField,
    bone: &Arc<Mesh>,
    skin: &Arc<Mesh>,
    outline: &[[Vec3; 2]],
    config: &PipelineConfig,
) -> Result<SceneNode> {
    let key = CacheKey::derive(config, field);
    let colored = cache::load_or_compute(&config.cache_path, &key, || {
        distance::compute_distance(bone, skin)
    })?;

    Ok(SceneNode::with_parts(
        "bone-skin distance",
        vec![
            Drawable::surface(
                Arc::new(colored),
                DrawStyle::solid(config.bone_color)
                    .with_color_map(ColorMap::hue_range(2.0 / 3.0, 0.0)),
            ),
            Drawable::lines(outline.to_vec(), DrawStyle::solid(config.outline_color)),
        ],
    ))
}
