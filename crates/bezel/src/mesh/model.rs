//! Monitor model assembly.
//!
//! Both variants stack the same parts along Y: screen on top, a thin stand
//! below it, and a wide flat base under the stand with a small gap.
//!
//! ```text
//!        ┌──────────────┐   screen (centered at SCREEN_Y)
//!        │              │
//!        └──────┬───────┘   screen bottom = SCREEN_Y - height / 2
//!               │           stand: center = screen bottom - STAND_HEIGHT / 2
//!               │
//!                           gap BASE_GAP
//!          ▁▁▁▁▁▁▁▁▁▁▁▁     base: center = stand bottom - BASE_HEIGHT / 2 - BASE_GAP
//! ```
//!
//! The simple variant builds the screen from two boxes. The detailed variant
//! uses flat front faces for bezel and panel, a curved back shell, and moves
//! the stand and base backwards by half the shell depth so they sit under
//! the shell instead of under the front plane.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::{GeometryBuffer, Rgba};
use super::shapes::{box_face, cuboid, curved_back_panel, cylinder};

pub const BEZEL_COLOR: Rgba = [0.2, 0.2, 0.2, 1.0];
pub const PANEL_COLOR: Rgba = [0.05, 0.05, 0.05, 1.0];
pub const SHELL_COLOR: Rgba = [0.25, 0.25, 0.25, 1.0];
pub const STAND_COLOR: Rgba = [0.5, 0.5, 0.5, 1.0];
pub const BASE_COLOR: Rgba = [0.3, 0.3, 0.3, 1.0];

pub const SCREEN_WIDTH: f32 = 0.7;
pub const SCREEN_HEIGHT: f32 = 0.42;
pub const SCREEN_DEPTH: f32 = 0.05;
/// Vertical center of the screen; lifts the whole model around the origin.
pub const SCREEN_Y: f32 = 0.35;

/// Panel size relative to the bezel.
pub const PANEL_WIDTH_RATIO: f32 = 0.92;
pub const PANEL_HEIGHT_RATIO: f32 = 0.88;
pub const PANEL_DEPTH: f32 = 0.01;

pub const SHELL_MAX_DEPTH: f32 = 0.12;
pub const SHELL_SEGMENTS: u32 = 16;

pub const STAND_RADIUS: f32 = 0.04;
pub const STAND_HEIGHT: f32 = 0.25;
pub const STAND_SEGMENTS: u32 = 20;

pub const BASE_RADIUS: f32 = 0.2;
pub const BASE_HEIGHT: f32 = 0.03;
pub const BASE_SEGMENTS: u32 = 30;
pub const BASE_GAP: f32 = 0.015;

/// Which monitor to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Box bezel, box panel, cylinder stand and base.
    Simple,
    /// Flat bezel and panel faces over a curved back shell.
    #[default]
    Detailed,
}

impl ModelVariant {
    pub fn name(self) -> &'static str {
        match self {
            ModelVariant::Simple => "simple",
            ModelVariant::Detailed => "detailed",
        }
    }

    /// Build the full model into a fresh buffer.
    pub fn assemble(self) -> GeometryBuffer {
        let mut buffer = GeometryBuffer::new();
        match self {
            ModelVariant::Simple => assemble_simple(&mut buffer),
            ModelVariant::Detailed => assemble_detailed(&mut buffer),
        }
        log::debug!(
            "assembled {} monitor: {} vertices, {} triangles",
            self.name(),
            buffer.vertex_count(),
            buffer.triangle_count()
        );
        buffer
    }
}

/// Vertical centers of the stand and base, derived from the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLayout {
    pub stand_y: f32,
    pub base_y: f32,
}

impl StackLayout {
    pub fn new(screen_y: f32, screen_height: f32) -> Self {
        let stand_y = screen_y - screen_height / 2.0 - STAND_HEIGHT / 2.0;
        let base_y = stand_y - STAND_HEIGHT / 2.0 - BASE_HEIGHT / 2.0 - BASE_GAP;
        Self { stand_y, base_y }
    }
}

fn panel_size() -> Vec2 {
    Vec2::new(SCREEN_WIDTH * PANEL_WIDTH_RATIO, SCREEN_HEIGHT * PANEL_HEIGHT_RATIO)
}

fn assemble_simple(buffer: &mut GeometryBuffer) {
    let screen_center = Vec3::new(0.0, SCREEN_Y, 0.0);

    cuboid(
        buffer,
        Vec3::new(SCREEN_WIDTH, SCREEN_HEIGHT, SCREEN_DEPTH),
        BEZEL_COLOR,
        screen_center,
    );
    cuboid(
        buffer,
        panel_size().extend(PANEL_DEPTH),
        PANEL_COLOR,
        screen_center + Vec3::new(0.0, 0.0, SCREEN_DEPTH / 2.0 + PANEL_DEPTH / 2.0),
    );

    add_stand_and_base(buffer, 0.0);
}

fn assemble_detailed(buffer: &mut GeometryBuffer) {
    let screen_center = Vec3::new(0.0, SCREEN_Y, 0.0);
    let front_z = SCREEN_DEPTH / 2.0;

    box_face(
        buffer,
        Vec3::new(SCREEN_WIDTH, SCREEN_HEIGHT, SCREEN_DEPTH),
        BEZEL_COLOR,
        screen_center,
    );
    // Sits just in front of the bezel face.
    box_face(
        buffer,
        panel_size().extend(PANEL_DEPTH),
        PANEL_COLOR,
        screen_center + Vec3::new(0.0, 0.0, front_z),
    );
    curved_back_panel(
        buffer,
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        SHELL_MAX_DEPTH,
        SHELL_SEGMENTS,
        SHELL_COLOR,
        screen_center + Vec3::new(0.0, 0.0, front_z),
    );

    add_stand_and_base(buffer, front_z - SHELL_MAX_DEPTH / 2.0);
}

fn add_stand_and_base(buffer: &mut GeometryBuffer, z: f32) {
    let layout = StackLayout::new(SCREEN_Y, SCREEN_HEIGHT);
    cylinder(
        buffer,
        STAND_RADIUS,
        STAND_HEIGHT,
        STAND_SEGMENTS,
        STAND_COLOR,
        Vec3::new(0.0, layout.stand_y, z),
    );
    cylinder(
        buffer,
        BASE_RADIUS,
        BASE_HEIGHT,
        BASE_SEGMENTS,
        BASE_COLOR,
        Vec3::new(0.0, layout.base_y, z),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder_vertices(segments: u32) -> usize {
        (2 + 2 * (segments + 1)) as usize
    }

    #[test]
    fn both_variants_satisfy_buffer_invariants() {
        for variant in [ModelVariant::Simple, ModelVariant::Detailed] {
            let buffer = variant.assemble();
            assert!(!buffer.is_empty());
            assert_eq!(buffer.positions().len(), buffer.colors().len());
            assert_eq!(buffer.validate(), Ok(()), "{variant:?}");
        }
    }

    #[test]
    fn simple_variant_part_counts() {
        let buffer = ModelVariant::Simple.assemble();
        let expected = 8 + 8 + cylinder_vertices(STAND_SEGMENTS) + cylinder_vertices(BASE_SEGMENTS);
        assert_eq!(buffer.vertex_count(), expected);
        assert_eq!(
            buffer.index_count(),
            36 + 36 + 12 * (STAND_SEGMENTS + BASE_SEGMENTS) as usize
        );
    }

    #[test]
    fn detailed_variant_part_counts() {
        let buffer = ModelVariant::Detailed.assemble();
        let s = SHELL_SEGMENTS as usize;
        let shell = (s + 1) * (s + 1) + 4;
        let expected = 4
            + 4
            + shell
            + cylinder_vertices(STAND_SEGMENTS)
            + cylinder_vertices(BASE_SEGMENTS);
        assert_eq!(buffer.vertex_count(), expected);
    }

    #[test]
    fn stack_layout_matches_part_heights() {
        let layout = StackLayout::new(0.35, 0.42);
        assert!((layout.stand_y - 0.015).abs() < 1e-6);
        assert!((layout.base_y - (0.015 - 0.125 - 0.015 - 0.015)).abs() < 1e-6);
    }

    #[test]
    fn stand_touches_screen_bottom() {
        let buffer = ModelVariant::Simple.assemble();
        // Stand starts after the two boxes; its first vertex is the top center.
        let stand_top = buffer.positions()[16];
        assert!((stand_top[1] - (SCREEN_Y - SCREEN_HEIGHT / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn detailed_stand_sits_behind_front_plane() {
        let buffer = ModelVariant::Detailed.assemble();
        let s = SHELL_SEGMENTS as usize;
        let stand_top = buffer.positions()[8 + (s + 1) * (s + 1) + 4];
        let expected_z = SCREEN_DEPTH / 2.0 - SHELL_MAX_DEPTH / 2.0;
        assert!((stand_top[2] - expected_z).abs() < 1e-6);
        assert!(stand_top[2] < 0.0);
    }

    #[test]
    fn detailed_panel_is_in_front_of_bezel() {
        let buffer = ModelVariant::Detailed.assemble();
        let bezel_z = buffer.positions()[0][2];
        let panel_z = buffer.positions()[4][2];
        assert!(panel_z > bezel_z);
    }

    #[test]
    fn variant_parses_lowercase() {
        let v: ModelVariant = serde_json::from_str("\"simple\"").unwrap();
        assert_eq!(v, ModelVariant::Simple);
        assert_eq!(ModelVariant::default(), ModelVariant::Detailed);
    }
}
