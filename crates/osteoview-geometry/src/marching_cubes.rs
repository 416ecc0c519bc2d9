//! Marching-cubes isosurface extraction.
//!
//! Walks every grid cell whose corner samples straddle the threshold and
//! emits triangles approximating the surface where the trilinearly
//! interpolated field equals the threshold, using the standard 256-entry
//! topology table (packed form ported from the public-domain
//! `MarchingCubeCpp` library). Edge vertices are shared between adjacent
//! cells through a two-slab index buffer, so the result is watertight
//! wherever the field is smooth relative to the grid resolution.

#![allow(
    clippy::unreadable_literal,
    clippy::too_many_lines,
    clippy::too_many_arguments,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use glam::Vec3;

use crate::mesh::Mesh;
use crate::volume::VolumetricField;

/// Extracts the isosurface of `field` at `threshold`.
///
/// Cells entirely above or entirely below the threshold emit nothing, so a
/// field with all samples on one side of the threshold yields an empty
/// mesh. A field with fewer than 2 nodes on any axis has no cells at all
/// and likewise yields an empty mesh rather than an error. The result is
/// deterministic: the same field and threshold always produce the same
/// mesh.
#[must_use]
pub fn extract(field: &VolumetricField, threshold: f32) -> Mesh {
    let dims = field.dims();
    if dims.min_element() < 2 {
        return Mesh::empty();
    }
    let (nx, ny, nz) = (dims.x, dims.y, dims.z);

    let mut vertices: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Per-(x, y) edge vertex indices for the current and previous z slab,
    // one slot per edge axis. Modular z indexing reuses the two slabs.
    let slab_len = nx as usize * ny as usize * 2;
    let mut slab_inds: Vec<[u32; 3]> = vec![[0; 3]; slab_len];

    let mut vs = [0.0_f32; 8];
    let mut edge_indices = [0_u32; 12];

    for z in 0..nz - 1 {
        for y in 0..ny - 1 {
            for x in 0..nx - 1 {
                // Corner samples, shifted so the surface sits at zero.
                vs[0] = field.sample(x, y, z) - threshold;
                vs[1] = field.sample(x + 1, y, z) - threshold;
                vs[2] = field.sample(x, y + 1, z) - threshold;
                vs[3] = field.sample(x + 1, y + 1, z) - threshold;
                vs[4] = field.sample(x, y, z + 1) - threshold;
                vs[5] = field.sample(x + 1, y, z + 1) - threshold;
                vs[6] = field.sample(x, y + 1, z + 1) - threshold;
                vs[7] = field.sample(x + 1, y + 1, z + 1) - threshold;

                // 8-bit cube configuration from corner signs.
                let config_n = (i32::from(vs[0] < 0.0))
                    | (i32::from(vs[1] < 0.0) << 1)
                    | (i32::from(vs[2] < 0.0) << 2)
                    | (i32::from(vs[3] < 0.0) << 3)
                    | (i32::from(vs[4] < 0.0) << 4)
                    | (i32::from(vs[5] < 0.0) << 5)
                    | (i32::from(vs[6] < 0.0) << 6)
                    | (i32::from(vs[7] < 0.0) << 7);

                if config_n == 0 || config_n == 255 {
                    continue;
                }

                // Edge vertices along x. Edges on the cell's low faces were
                // produced by a neighboring cell except on the grid border.
                if y == 0 && z == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[0], vs[1], 0, x, y, z, nx, ny);
                }
                if z == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[2], vs[3], 0, x, y + 1, z, nx, ny);
                }
                if y == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[4], vs[5], 0, x, y, z + 1, nx, ny);
                }
                emit_edge(&mut slab_inds, &mut vertices, vs[6], vs[7], 0, x, y + 1, z + 1, nx, ny);

                // Edge vertices along y.
                if x == 0 && z == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[0], vs[2], 1, x, y, z, nx, ny);
                }
                if z == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[1], vs[3], 1, x + 1, y, z, nx, ny);
                }
                if x == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[4], vs[6], 1, x, y, z + 1, nx, ny);
                }
                emit_edge(&mut slab_inds, &mut vertices, vs[5], vs[7], 1, x + 1, y, z + 1, nx, ny);

                // Edge vertices along z.
                if x == 0 && y == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[0], vs[4], 2, x, y, z, nx, ny);
                }
                if y == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[1], vs[5], 2, x + 1, y, z, nx, ny);
                }
                if x == 0 {
                    emit_edge(&mut slab_inds, &mut vertices, vs[2], vs[6], 2, x, y + 1, z, nx, ny);
                }
                emit_edge(&mut slab_inds, &mut vertices, vs[3], vs[7], 2, x + 1, y + 1, z, nx, ny);

                // Gather the 12 candidate edge indices for this cell.
                edge_indices[0] = slab_inds[slab_index(x, y, z, nx, ny)][0];
                edge_indices[1] = slab_inds[slab_index(x, y + 1, z, nx, ny)][0];
                edge_indices[2] = slab_inds[slab_index(x, y, z + 1, nx, ny)][0];
                edge_indices[3] = slab_inds[slab_index(x, y + 1, z + 1, nx, ny)][0];
                edge_indices[4] = slab_inds[slab_index(x, y, z, nx, ny)][1];
                edge_indices[5] = slab_inds[slab_index(x + 1, y, z, nx, ny)][1];
                edge_indices[6] = slab_inds[slab_index(x, y, z + 1, nx, ny)][1];
                edge_indices[7] = slab_inds[slab_index(x + 1, y, z + 1, nx, ny)][1];
                edge_indices[8] = slab_inds[slab_index(x, y, z, nx, ny)][2];
                edge_indices[9] = slab_inds[slab_index(x + 1, y, z, nx, ny)][2];
                edge_indices[10] = slab_inds[slab_index(x, y + 1, z, nx, ny)][2];
                edge_indices[11] = slab_inds[slab_index(x + 1, y + 1, z, nx, ny)][2];

                // Emit the triangles for this configuration.
                let config = MC_TRIS[config_n as usize];
                let n_indices = (config & 0xF) as usize * 3;

                let mut offset = 4;
                for _ in 0..n_indices {
                    let edge = ((config >> offset) & 0xF) as usize;
                    indices.push(edge_indices[edge]);
                    offset += 4;
                }
            }
        }
    }

    // Vertices so far live in grid-index space; move them to world space.
    let origin = field.origin();
    let spacing = field.spacing();
    for v in &mut vertices {
        *v = origin + *v * spacing;
    }

    let triangles = indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    Mesh::new(vertices, triangles)
}

/// Converts `(x, y)` plus a modular z to a slab slot.
#[inline]
fn slab_index(x: u32, y: u32, z: u32, nx: u32, ny: u32) -> usize {
    nx as usize * ny as usize * (z as usize % 2) + y as usize * nx as usize + x as usize
}

/// Emits the interpolated vertex where the surface crosses the edge at
/// `(x, y, z)` along `axis`, if the endpoint values have opposite signs,
/// and records its index in the slab buffer.
#[inline]
fn emit_edge(
    slab_inds: &mut [[u32; 3]],
    vertices: &mut Vec<Vec3>,
    va: f32,
    vb: f32,
    axis: usize,
    x: u32,
    y: u32,
    z: u32,
    nx: u32,
    ny: u32,
) {
    if (va < 0.0) == (vb < 0.0) {
        return;
    }
    let mut v = Vec3::new(x as f32, y as f32, z as f32);
    v[axis] += va / (va - vb);
    let idx = vertices.len() as u32;
    slab_inds[slab_index(x, y, z, nx, ny)][axis] = idx;
    vertices.push(v);
}

/// Look-up table for triangle configurations (256 entries, one per cube
/// configuration).
///
/// Each entry is a `u64` encoding:
/// - Bits `[3:0]`: Number of triangles (0-5)
/// - Bits `[7:4]`, `[11:8]`, ...: Edge indices (0-11) for each triangle vertex, 4 bits each
///
/// Ported from `MarchingCubeCpp` (public domain).
#[rustfmt::skip]
static MC_TRIS: [u64; 256] = [
    0, 33793, 36945, 159668546,
    18961, 144771090, 5851666, 595283255635,
    20913, 67640146, 193993474, 655980856339,
    88782242, 736732689667, 797430812739, 194554754,
    26657, 104867330, 136709522, 298069416227,
    109224258, 8877909667, 318136408323, 1567994331701604,
    189884450, 350847647843, 559958167731, 3256298596865604,
    447393122899, 651646838401572, 2538311371089956, 737032694307,
    29329, 43484162, 91358498, 374810899075,
    158485010, 178117478419, 88675058979, 433581536604804,
    158486962, 649105605635, 4866906995, 3220959471609924,
    649165714851, 3184943915608436, 570691368417972, 595804498035,
    124295042, 431498018963, 508238522371, 91518530,
    318240155763, 291789778348404, 1830001131721892, 375363605923,
    777781811075, 1136111028516116, 3097834205243396, 508001629971,
    2663607373704004, 680242583802939237, 333380770766129845, 179746658,
    42545, 138437538, 93365810, 713842853011,
    73602098, 69575510115, 23964357683, 868078761575828,
    28681778, 713778574611, 250912709379, 2323825233181284,
    302080811955, 3184439127991172, 1694042660682596, 796909779811,
    176306722, 150327278147, 619854856867, 1005252473234484,
    211025400963, 36712706, 360743481544788, 150627258963,
    117482600995, 1024968212107700, 2535169275963444, 4734473194086550421,
    628107696687956, 9399128243, 5198438490361643573, 194220594,
    104474994, 566996932387, 427920028243, 2014821863433780,
    492093858627, 147361150235284, 2005882975110676, 9671606099636618005,
    777701008947, 3185463219618820, 482784926917540, 2900953068249785909,
    1754182023747364, 4274848857537943333, 13198752741767688709, 2015093490989156,
    591272318771, 2659758091419812, 1531044293118596, 298306479155,
    408509245114388, 210504348563, 9248164405801223541, 91321106,
    2660352816454484, 680170263324308757, 8333659837799955077, 482966828984116,
    4274926723105633605, 3184439197724820, 192104450, 15217,
    45937, 129205250, 129208402, 529245952323,
    169097138, 770695537027, 382310500883, 2838550742137652,
    122763026, 277045793139, 81608128403, 1991870397907988,
    362778151475, 2059003085103236, 2132572377842852, 655681091891,
    58419234, 239280858627, 529092143139, 1568257451898804,
    447235128115, 679678845236084, 2167161349491220, 1554184567314086709,
    165479003923, 1428768988226596, 977710670185060, 10550024711307499077,
    1305410032576132, 11779770265620358997, 333446212255967269, 978168444447012,
    162736434, 35596216627, 138295313843, 891861543990356,
    692616541075, 3151866750863876, 100103641866564, 6572336607016932133,
    215036012883, 726936420696196, 52433666, 82160664963,
    2588613720361524, 5802089162353039525, 214799000387, 144876322,
    668013605731, 110616894681956, 1601657732871812, 430945547955,
    3156382366321172, 7644494644932993285, 3928124806469601813, 3155990846772900,
    339991010498708, 10743689387941597493, 5103845475, 105070898,
    3928064910068824213, 156265010, 1305138421793636, 27185,
    195459938, 567044449971, 382447549283, 2175279159592324,
    443529919251, 195059004769796, 2165424908404116, 1554158691063110021,
    504228368803, 1436350466655236, 27584723588724, 1900945754488837749,
    122971970, 443829749251, 302601798803, 108558722,
    724700725875, 43570095105972, 2295263717447940, 2860446751369014181,
    2165106202149444, 69275726195, 2860543885641537797, 2165106320445780,
    2280890014640004, 11820349930268368933, 8721082628082003989, 127050770,
    503707084675, 122834978, 2538193642857604, 10129,
    801441490467, 2923200302876740, 1443359556281892, 2901063790822564949,
    2728339631923524, 7103874718248233397, 12775311047932294245, 95520290,
    2623783208098404, 1900908618382410757, 137742672547, 2323440239468964,
    362478212387, 727199575803140, 73425410, 34337,
    163101314, 668566030659, 801204361987, 73030562,
    591509145619, 162574594, 100608342969108, 5553,
    724147968595, 1436604830452292, 176259090, 42001,
    143955266, 2385, 18433, 0,
];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;

    fn field_from_fn(n: u32, f: impl Fn(Vec3) -> f32) -> VolumetricField {
        let mut samples = Vec::with_capacity((n * n * n) as usize);
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    samples.push(f(Vec3::new(i as f32, j as f32, k as f32)));
                }
            }
        }
        VolumetricField::new(UVec3::splat(n), Vec3::ONE, Vec3::ZERO, samples).unwrap()
    }

    #[test]
    fn test_all_above_threshold_yields_empty_mesh() {
        let field = field_from_fn(3, |_| 10.0);
        assert!(extract(&field, 0.0).is_empty());
    }

    #[test]
    fn test_all_below_threshold_yields_empty_mesh() {
        let field = field_from_fn(3, |_| -10.0);
        assert!(extract(&field, 0.0).is_empty());
    }

    #[test]
    fn test_degenerate_dims_yield_empty_mesh() {
        let field =
            VolumetricField::new(UVec3::new(1, 4, 4), Vec3::ONE, Vec3::ZERO, vec![0.0; 16])
                .unwrap();
        assert!(extract(&field, 0.5).is_empty());
    }

    #[test]
    fn test_single_inside_corner_emits_one_triangle() {
        let mut samples = vec![1.0_f32; 8];
        samples[0] = -1.0;
        let field =
            VolumetricField::new(UVec3::splat(2), Vec3::ONE, Vec3::ZERO, samples).unwrap();
        let mesh = extract(&field, 0.0);
        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.num_vertices(), 3);
    }

    #[test]
    fn test_sphere_in_small_grid() {
        // 4x4x4 grid holding a sphere of radius 1.5 around the grid center,
        // sampled as (distance - 1.0) so that threshold 0.5 separates
        // inside from outside at distance 1.5.
        let center = Vec3::splat(1.5);
        let field = field_from_fn(4, |p| (p - center).length() - 1.0);
        let mesh = extract(&field, 0.5);

        assert!(mesh.num_vertices() > 0);
        for v in mesh.vertices() {
            let dist = (*v - center).length();
            assert!(
                (dist - 1.5).abs() < 0.25,
                "vertex {v:?} is {dist} from center, expected about 1.5"
            );
        }
    }

    #[test]
    fn test_world_space_transform() {
        // Same field, shifted origin and doubled spacing: vertices follow.
        let center = Vec3::splat(1.5);
        let mut samples = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    let p = Vec3::new(i as f32, j as f32, k as f32);
                    samples.push((p - center).length() - 1.0);
                }
            }
        }
        let origin = Vec3::new(100.0, 0.0, -50.0);
        let field = VolumetricField::new(
            UVec3::splat(4),
            Vec3::splat(2.0),
            origin,
            samples,
        )
        .unwrap();
        let mesh = extract(&field, 0.5);
        let world_center = origin + center * 2.0;
        for v in mesh.vertices() {
            let dist = (*v - world_center).length();
            assert!((dist - 3.0).abs() < 0.5);
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let center = Vec3::splat(4.5);
        let field = field_from_fn(10, |p| (p - center).length() - 3.0);
        let a = extract(&field, 0.0);
        let b = extract(&field, 0.0);
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.triangles(), b.triangles());
    }

    #[test]
    fn test_indices_within_bounds() {
        let center = Vec3::splat(4.5);
        let field = field_from_fn(10, |p| (p - center).length() - 3.0);
        let mesh = extract(&field, 0.0);
        assert!(mesh.num_triangles() > 100);
        for tri in mesh.triangles() {
            for &i in tri {
                assert!((i as usize) < mesh.num_vertices());
            }
        }
    }
}
