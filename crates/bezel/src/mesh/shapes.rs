//! # Shapes — Parametric Primitive Builders
//!
//! Each builder appends one primitive to a shared [`GeometryBuffer`]: a
//! self-contained run of vertices, one flat color, and the triangles over
//! them. Nothing is returned except the [`PrimitiveRange`] describing what was
//! appended; the buffer captures the index base itself.
//!
//! ## The Builders
//!
//! - [`cuboid`]: 8 shared corners, 12 triangles. Corners are shared between
//!   faces because there is no normal attribute to split them over.
//! - [`box_face`]: only the front (+Z) face of a box. Thin parts where a
//!   single face is ever visible (screen panel, bezel front) use this.
//! - [`cylinder`]: Y-axis cylinder with two cap fans. The rim is sampled
//!   `segments + 1` times so the last sample lands on the first angle again.
//! - [`curved_back_panel`]: a grid bulging backwards along X with a cosine
//!   profile, plus four walls stitching its rim to a flat front rectangle.
//!
//! ## Winding
//!
//! Winding is consistent within a primitive but not across them; the
//! renderer draws without back-face culling.
//!
//! ## Degenerate Input
//!
//! Dimensions are not validated. Zero or negative sizes produce collapsed or
//! inside-out geometry, never a panic. Segment counts are clamped to the
//! smallest value that still forms the shape.

use glam::{Vec2, Vec3};

use super::geometry::{GeometryBuffer, PrimitiveRange, Rgba};

/// Smallest number of rim segments a cylinder is built with.
pub const MIN_CYLINDER_SEGMENTS: u32 = 3;

/// Smallest grid resolution for the curved back panel (needs a middle column).
///
/// Odd counts are rounded up to the next even one so a grid column always
/// sits at `u = 0.5`, where the shell reaches its full depth.
pub const MIN_PANEL_SEGMENTS: u32 = 2;

/// Corner-to-index mapping of a cuboid. Corners 0-3 are the front (+Z) face,
/// 4-7 the back face, both listed bottom-left, bottom-right, top-right,
/// top-left.
const CUBOID_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    3, 2, 6, 3, 6, 7, // top
    0, 1, 5, 0, 5, 4, // bottom
    4, 0, 3, 4, 3, 7, // left
    1, 5, 6, 1, 6, 2, // right
];

/// Append an axis-aligned box of `size` centered at `center`.
///
/// 8 vertices, 36 indices.
pub fn cuboid(
    buffer: &mut GeometryBuffer,
    size: Vec3,
    color: Rgba,
    center: Vec3,
) -> PrimitiveRange {
    let h = size * 0.5;
    let corners = [
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
    ];

    buffer.append(color, |w| {
        for corner in corners {
            w.vertex(center + corner);
        }
        for tri in CUBOID_INDICES.chunks_exact(3) {
            w.triangle(tri[0], tri[1], tri[2]);
        }
    })
}

/// Append only the front face of a box of `size` centered at `center`.
///
/// 4 vertices at `z = center.z + size.z / 2`, 6 indices. The depth moves the
/// face plane; no back face is created.
pub fn box_face(
    buffer: &mut GeometryBuffer,
    size: Vec3,
    color: Rgba,
    center: Vec3,
) -> PrimitiveRange {
    let h = size * 0.5;
    buffer.append(color, |w| {
        let bl = w.vertex(center + Vec3::new(-h.x, -h.y, h.z));
        let br = w.vertex(center + Vec3::new(h.x, -h.y, h.z));
        let tr = w.vertex(center + Vec3::new(h.x, h.y, h.z));
        let tl = w.vertex(center + Vec3::new(-h.x, h.y, h.z));
        w.quad(bl, br, tr, tl);
    })
}

/// Append a Y-axis cylinder of `radius` and `height` centered at `center`.
///
/// Layout: top center, bottom center, then `segments + 1` (top rim, bottom
/// rim) pairs at angle `i / segments * 2π`. The final pair repeats angle 0 so
/// the side closes without a gap.
///
/// Vertices: `2 + 2 * (segments + 1)`. Indices: `12 * segments`.
pub fn cylinder(
    buffer: &mut GeometryBuffer,
    radius: f32,
    height: f32,
    segments: u32,
    color: Rgba,
    center: Vec3,
) -> PrimitiveRange {
    let seg = segments.max(MIN_CYLINDER_SEGMENTS);
    let h = height * 0.5;
    let tau = std::f32::consts::TAU;

    buffer.append(color, |w| {
        let top_center = w.vertex(center + Vec3::new(0.0, h, 0.0));
        let bottom_center = w.vertex(center + Vec3::new(0.0, -h, 0.0));

        for i in 0..=seg {
            let angle = i as f32 / seg as f32 * tau;
            let x = radius * angle.cos();
            let z = radius * angle.sin();
            w.vertex(center + Vec3::new(x, h, z));
            w.vertex(center + Vec3::new(x, -h, z));
        }

        for i in 0..seg as u16 {
            let top1 = 2 + i * 2;
            let bottom1 = top1 + 1;
            let top2 = top1 + 2;
            let bottom2 = top2 + 1;

            // Side quad
            w.triangle(top1, bottom1, top2);
            w.triangle(bottom1, bottom2, top2);
            // Caps
            w.triangle(top_center, top1, top2);
            w.triangle(bottom_center, bottom2, bottom1);
        }
    })
}

/// Depth of the back panel surface below its front plane at horizontal
/// parameter `u` in `[0, 1]`: zero at both edges, `max_depth` at `u = 0.5`.
pub fn panel_depth(u: f32, max_depth: f32) -> f32 {
    max_depth * ((u - 0.5) * std::f32::consts::PI).cos()
}

/// Append a curved back shell of `size` (width, height) centered at `center`.
///
/// A `(segments + 1)²` grid is laid over `u, v ∈ [0, 1]`, mapped linearly to
/// the width and height. Each grid point sits at
/// `z = center.z - panel_depth(u, max_depth)`, so the shell bulges backwards
/// along X and is constant along Y. Grid vertex `(row, col)` has local number
/// `row * (segments + 1) + col`, where `row` follows `v` and `col` follows `u`.
///
/// After the grid come four front corners at `z = center.z` (bottom-left,
/// bottom-right, top-right, top-left) and four walls stitching them to the
/// first/last grid row and column. Each wall fans its lower half from one
/// corner, its upper half from the other, and closes with a triangle over
/// both corners and the edge's middle vertex; that triangle carries the
/// straight front edge, so a front face over the same rectangle seals the
/// volume.
///
/// `segments` is rounded up to an even count of at least
/// [`MIN_PANEL_SEGMENTS`]. With that count as `s`, vertices: `(s + 1)² + 4`,
/// indices: `6 * s² + 12 * (s + 1)`.
pub fn curved_back_panel(
    buffer: &mut GeometryBuffer,
    size: Vec2,
    max_depth: f32,
    segments: u32,
    color: Rgba,
    center: Vec3,
) -> PrimitiveRange {
    let seg = segments.max(MIN_PANEL_SEGMENTS).next_multiple_of(2) as usize;
    let stride = seg + 1;
    let half = size * 0.5;

    buffer.append(color, |w| {
        // ── Grid ──
        for row in 0..=seg {
            let v = row as f32 / seg as f32;
            for col in 0..=seg {
                let u = col as f32 / seg as f32;
                w.vertex(Vec3::new(
                    center.x + (u - 0.5) * size.x,
                    center.y + (v - 0.5) * size.y,
                    center.z - panel_depth(u, max_depth),
                ));
            }
        }

        let at = |row: usize, col: usize| (row * stride + col) as u16;

        for row in 0..seg {
            for col in 0..seg {
                let a = at(row, col);
                let b = at(row, col + 1);
                let d = at(row + 1, col);
                let e = at(row + 1, col + 1);
                // Faces -Z: counter-clockwise seen from behind.
                w.triangle(a, d, b);
                w.triangle(b, d, e);
            }
        }

        // ── Front corners ──
        let bl = w.vertex(center + Vec3::new(-half.x, -half.y, 0.0));
        let br = w.vertex(center + Vec3::new(half.x, -half.y, 0.0));
        let tr = w.vertex(center + Vec3::new(half.x, half.y, 0.0));
        let tl = w.vertex(center + Vec3::new(-half.x, half.y, 0.0));

        // ── Walls ──
        let bottom: Vec<u16> = (0..=seg).map(|col| at(0, col)).collect();
        let top: Vec<u16> = (0..=seg).map(|col| at(seg, col)).collect();
        let left: Vec<u16> = (0..=seg).map(|row| at(row, 0)).collect();
        let right: Vec<u16> = (0..=seg).map(|row| at(row, seg)).collect();

        stitch_wall(w, bl, br, &bottom);
        stitch_wall(w, tl, tr, &top);
        stitch_wall(w, bl, tl, &left);
        stitch_wall(w, br, tr, &right);
    })
}

/// Join the straight edge `near → far` to the polyline `edge`, which runs
/// from near's end to far's end.
fn stitch_wall(w: &mut super::geometry::PrimitiveWriter<'_>, near: u16, far: u16, edge: &[u16]) {
    let last = edge.len() - 1;
    let mid = last / 2;
    for k in 0..last {
        let apex = if k < mid { near } else { far };
        w.triangle(apex, edge[k], edge[k + 1]);
    }
    w.triangle(near, edge[mid], far);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const GRAY: Rgba = [0.5, 0.5, 0.5, 1.0];

    /// Count how many triangles use each undirected edge. Vertices are welded
    /// by position first, and triangles that collapse after welding are
    /// skipped.
    fn welded_edge_counts(buffer: &GeometryBuffer) -> HashMap<(usize, usize), usize> {
        let mut ids: HashMap<[i64; 3], usize> = HashMap::new();
        let welded: Vec<usize> = buffer
            .positions()
            .iter()
            .map(|p| {
                let key = p.map(|c| (c * 1.0e5).round() as i64);
                let next = ids.len();
                *ids.entry(key).or_insert(next)
            })
            .collect();

        let mut counts = HashMap::new();
        for tri in buffer.indices().chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| welded[tri[k] as usize]);
            if a == b || b == c || a == c {
                continue;
            }
            for (x, y) in [(a, b), (b, c), (c, a)] {
                *counts.entry((x.min(y), x.max(y))).or_insert(0) += 1;
            }
        }
        counts
    }

    fn assert_closed(buffer: &GeometryBuffer) {
        let counts = welded_edge_counts(buffer);
        assert!(!counts.is_empty());
        for (edge, count) in counts {
            assert_eq!(count, 2, "edge {edge:?} used by {count} triangles");
        }
    }

    #[test]
    fn cuboid_has_correct_counts() {
        let mut buffer = GeometryBuffer::new();
        let range = cuboid(&mut buffer, Vec3::new(0.7, 0.42, 0.05), GRAY, Vec3::ZERO);
        assert_eq!(range.vertex_count(), 8);
        assert_eq!(range.index_count(), 36);
        assert_eq!(buffer.triangle_count(), 12);
    }

    #[test]
    fn cuboid_is_closed() {
        let mut buffer = GeometryBuffer::new();
        cuboid(&mut buffer, Vec3::new(2.0, 1.0, 0.5), GRAY, Vec3::new(0.3, -0.2, 1.0));
        assert_closed(&buffer);
    }

    #[test]
    fn cuboid_corners_surround_center() {
        let mut buffer = GeometryBuffer::new();
        let center = Vec3::new(1.0, 2.0, 3.0);
        cuboid(&mut buffer, Vec3::new(2.0, 4.0, 6.0), GRAY, center);
        let p = buffer.positions();
        assert_eq!(p[0], [0.0, 0.0, 6.0]);
        assert_eq!(p[6], [2.0, 4.0, 0.0]);
    }

    #[test]
    fn box_face_is_single_front_quad() {
        let mut buffer = GeometryBuffer::new();
        let range = box_face(&mut buffer, Vec3::new(1.0, 1.0, 0.2), GRAY, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(range.vertex_count(), 4);
        assert_eq!(range.index_count(), 6);
        for p in buffer.positions() {
            assert!((p[2] - 1.1).abs() < 1e-6, "face should sit at z = 1.1, got {}", p[2]);
        }
    }

    #[test]
    fn cylinder_counts_match_segments() {
        for s in [3u32, 20, 30] {
            let mut buffer = GeometryBuffer::new();
            let range = cylinder(&mut buffer, 0.2, 0.03, s, GRAY, Vec3::ZERO);
            assert_eq!(range.vertex_count(), (2 + 2 * (s + 1)) as usize);
            assert_eq!(range.index_count(), (12 * s) as usize);
        }
    }

    #[test]
    fn cylinder_clamps_segments() {
        let mut buffer = GeometryBuffer::new();
        let range = cylinder(&mut buffer, 1.0, 1.0, 1, GRAY, Vec3::ZERO);
        assert_eq!(range.index_count(), 36);
    }

    #[test]
    fn cylinder_rim_closes_at_seam() {
        let s = 20u32;
        let mut buffer = GeometryBuffer::new();
        let center = Vec3::new(0.5, -0.1, 0.25);
        cylinder(&mut buffer, 0.04, 0.25, s, GRAY, center);
        let p = buffer.positions();
        let first_top = p[2];
        let last_top = p[2 + 2 * s as usize];
        assert!((first_top[0] - last_top[0]).abs() < 1e-5);
        assert!((first_top[2] - last_top[2]).abs() < 1e-5);
        assert_eq!(first_top[1], last_top[1]);
    }

    #[test]
    fn cylinder_rim_lies_on_radius() {
        let mut buffer = GeometryBuffer::new();
        cylinder(&mut buffer, 0.2, 0.03, 30, GRAY, Vec3::ZERO);
        for p in &buffer.positions()[2..] {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - 0.2).abs() < 1e-5, "rim point off radius: {r}");
        }
    }

    #[test]
    fn cylinder_indices_in_range() {
        let mut buffer = GeometryBuffer::new();
        cylinder(&mut buffer, 0.5, 0.5, 32, GRAY, Vec3::ZERO);
        assert_eq!(buffer.validate(), Ok(()));
    }

    #[test]
    fn panel_depth_profile() {
        assert!(panel_depth(0.0, 0.12).abs() < 1e-6);
        assert!(panel_depth(1.0, 0.12).abs() < 1e-6);
        assert_eq!(panel_depth(0.5, 0.12), 0.12);
    }

    #[test]
    fn curved_panel_counts() {
        let s = 8u32;
        let mut buffer = GeometryBuffer::new();
        let range = curved_back_panel(&mut buffer, Vec2::new(0.7, 0.42), 0.1, s, GRAY, Vec3::ZERO);
        assert_eq!(range.vertex_count(), ((s + 1) * (s + 1) + 4) as usize);
        assert_eq!(range.index_count(), (6 * s * s + 12 * (s + 1)) as usize);
        assert_eq!(buffer.validate(), Ok(()));
    }

    #[test]
    fn odd_panel_segments_round_up_to_reach_full_depth() {
        let max_depth = 0.2;
        let mut buffer = GeometryBuffer::new();
        let range =
            curved_back_panel(&mut buffer, Vec2::new(1.0, 1.0), max_depth, 3, GRAY, Vec3::ZERO);
        assert_eq!(range.vertex_count(), 5 * 5 + 4);
        assert_eq!(range.index_count(), 6 * 4 * 4 + 12 * 5);

        let deepest = buffer.positions().iter().map(|p| p[2]).fold(0.0f32, f32::min);
        assert_eq!(deepest, -max_depth);
        assert_eq!(buffer.validate(), Ok(()));
    }

    #[test]
    fn curved_panel_edges_are_flat_and_center_is_deepest() {
        let s = 8usize;
        let max_depth = 0.12;
        let mut buffer = GeometryBuffer::new();
        curved_back_panel(&mut buffer, Vec2::new(0.7, 0.42), max_depth, s as u32, GRAY, Vec3::ZERO);
        let p = buffer.positions();
        let stride = s + 1;
        for row in 0..=s {
            let left = p[row * stride];
            let right = p[row * stride + s];
            let middle = p[row * stride + s / 2];
            assert!(left[2].abs() < 1e-6, "left edge displaced: {}", left[2]);
            assert!(right[2].abs() < 1e-6, "right edge displaced: {}", right[2]);
            assert_eq!(middle[2], -max_depth);
        }
    }

    #[test]
    fn curved_panel_is_constant_along_vertical() {
        let s = 6usize;
        let mut buffer = GeometryBuffer::new();
        curved_back_panel(
            &mut buffer,
            Vec2::new(1.0, 1.0),
            0.3,
            s as u32,
            GRAY,
            Vec3::new(0.0, 0.0, 0.5),
        );
        let p = buffer.positions();
        for col in 0..=s {
            let z0 = p[col][2];
            for row in 1..=s {
                assert_eq!(p[row * (s + 1) + col][2], z0);
            }
        }
    }

    #[test]
    fn curved_panel_spans_its_size() {
        let s = 4usize;
        let center = Vec3::new(0.0, 0.35, 0.025);
        let mut buffer = GeometryBuffer::new();
        curved_back_panel(&mut buffer, Vec2::new(0.7, 0.42), 0.1, s as u32, GRAY, center);
        let p = buffer.positions();
        let last = (s + 1) * (s + 1) - 1;
        assert!((p[0][0] + 0.35).abs() < 1e-6);
        assert!((p[0][1] - (0.35 - 0.21)).abs() < 1e-6);
        assert!((p[last][0] - 0.35).abs() < 1e-6);
        assert!((p[last][1] - (0.35 + 0.21)).abs() < 1e-6);
    }

    #[test]
    fn curved_panel_walls_reference_grid_rim() {
        let s = 4usize;
        let stride = s + 1;
        let mut buffer = GeometryBuffer::new();
        curved_back_panel(&mut buffer, Vec2::new(1.0, 1.0), 0.2, s as u32, GRAY, Vec3::ZERO);

        let grid_indices = 6 * s * s;
        let corners = (stride * stride) as u16..(stride * stride + 4) as u16;
        let rim: Vec<u16> = (0..stride)
            .flat_map(|k| [k, s * stride + k, k * stride, k * stride + s])
            .map(|i| i as u16)
            .collect();

        for tri in buffer.indices()[grid_indices..].chunks_exact(3) {
            for &i in tri {
                assert!(
                    corners.contains(&i) || rim.contains(&i),
                    "wall uses interior grid vertex {i}"
                );
            }
        }
    }

    #[test]
    fn curved_panel_with_front_face_is_closed() {
        for s in [2u32, 3, 8, 16] {
            let size = Vec2::new(0.7, 0.42);
            let center = Vec3::new(0.0, 0.35, 0.025);
            let mut buffer = GeometryBuffer::new();
            curved_back_panel(&mut buffer, size, 0.12, s, GRAY, center);
            box_face(&mut buffer, size.extend(0.0), GRAY, center);
            assert_closed(&buffer);
        }
    }

    #[test]
    fn curved_panel_without_front_face_is_open() {
        let mut buffer = GeometryBuffer::new();
        curved_back_panel(&mut buffer, Vec2::new(0.7, 0.42), 0.12, 8, GRAY, Vec3::ZERO);
        let open = welded_edge_counts(&buffer).values().filter(|&&n| n == 1).count();
        assert_eq!(open, 4, "only the four front edges should be open");
    }
}
