//! Procedural geometry for props that have no bitmap.

use glam::Vec2;

use crate::{Color, Shape};

const DARK_BROWN: Color = Color::from_rgb_u8(101, 67, 33);
const MEDIUM_BROWN: Color = Color::from_rgb_u8(139, 90, 43);
const LIGHT_BROWN: Color = Color::from_rgb_u8(160, 110, 60);

const TUMBLEWEED_SIZE: f32 = 40.0;
const BLOCK: f32 = 6.0;
const RING_RADII: [f32; 3] = [24.0, 30.0, 36.0];
const SPOKE_DISTANCES: [f32; 3] = [6.0, 18.0, 30.0];
const SPOKES: u32 = 10;
const FRAGMENTS: u32 = 12;
const FRAGMENT_SIZE: f32 = 4.0;

/// Builds the hollow, blocky tumbleweed centered on `center`.
///
/// The outer ring alternates dark and medium brown as it turns, the spokes
/// lighten towards the middle, and a loose band of fragments spins at half
/// the rotation speed.
#[must_use]
pub fn tumbleweed_shapes(center: Vec2, rotation_degrees: f32) -> Vec<Shape> {
    let center = truncate(center);
    let mut shapes = Vec::new();

    for angle in (0..360).step_by(20) {
        let turned = angle as f32 + rotation_degrees;
        let color = if turned.rem_euclid(40.0) < 20.0 {
            DARK_BROWN
        } else {
            MEDIUM_BROWN
        };
        for radius in RING_RADII {
            shapes.push(Shape::Circle {
                center: polar(center, radius, turned),
                radius: BLOCK / 2.0,
                color,
            });
        }
    }

    for spoke in 0..SPOKES {
        let angle = 360.0 / SPOKES as f32 * spoke as f32 + rotation_degrees;
        for distance in SPOKE_DISTANCES {
            let color = if distance < TUMBLEWEED_SIZE * 0.5 {
                LIGHT_BROWN
            } else if distance < TUMBLEWEED_SIZE * 0.75 {
                MEDIUM_BROWN
            } else {
                DARK_BROWN
            };
            shapes.push(Shape::Rect {
                top_left: polar(center, distance, angle) - Vec2::splat(BLOCK / 2.0),
                size: Vec2::splat(BLOCK),
                color,
            });
        }
    }

    for fragment in 0..FRAGMENTS {
        let angle = 360.0 / FRAGMENTS as f32 * fragment as f32 + rotation_degrees * 0.5;
        shapes.push(Shape::Rect {
            top_left: polar(center, TUMBLEWEED_SIZE * 0.7, angle)
                - Vec2::splat(FRAGMENT_SIZE / 2.0),
            size: Vec2::splat(FRAGMENT_SIZE),
            color: MEDIUM_BROWN,
        });
    }

    shapes
}

fn polar(center: Vec2, distance: f32, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    center + truncate(Vec2::new(distance * cos, distance * sin))
}

fn truncate(point: Vec2) -> Vec2 {
    Vec2::new(point.x.trunc(), point.y.trunc())
}

/// Samples `segments` points around an axis-aligned ellipse, counter-clockwise
/// from the positive x axis. Fewer than three segments yield three.
#[must_use]
pub fn ellipse_points(center: Vec2, radii: Vec2, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|index| {
            let theta = std::f32::consts::TAU * index as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            center + Vec2::new(radii.x * cos, radii.y * sin)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rects(shapes: &[Shape]) -> Vec<(Vec2, Vec2, Color)> {
        shapes
            .iter()
            .filter_map(|shape| match *shape {
                Shape::Rect {
                    top_left,
                    size,
                    color,
                } => Some((top_left, size, color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn tumbleweed_has_ring_spokes_and_fragments() {
        let shapes = tumbleweed_shapes(Vec2::new(100.0, 100.0), 0.0);
        let circles = shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Circle { .. }))
            .count();
        assert_eq!(circles, 18 * 3);
        assert_eq!(rects(&shapes).len(), 10 * 3 + 12);
    }

    #[test]
    fn spoke_colors_darken_outwards() {
        let shapes = tumbleweed_shapes(Vec2::ZERO, 0.0);
        let spokes = rects(&shapes);
        // First spoke points along +x: distances 6, 18 and 30.
        assert_eq!(spokes[0], (Vec2::new(3.0, -3.0), Vec2::splat(6.0), LIGHT_BROWN));
        assert_eq!(spokes[1].2, LIGHT_BROWN);
        assert_eq!(spokes[2], (Vec2::new(27.0, -3.0), Vec2::splat(6.0), DARK_BROWN));
    }

    #[test]
    fn ring_color_alternates_with_rotation() {
        let color_of_first = |rotation: f32| match tumbleweed_shapes(Vec2::ZERO, rotation)[0] {
            Shape::Circle { color, .. } => color,
            _ => unreachable!("ring is emitted first"),
        };
        assert_eq!(color_of_first(0.0), DARK_BROWN);
        assert_eq!(color_of_first(20.0), MEDIUM_BROWN);
        assert_eq!(color_of_first(40.0), DARK_BROWN);
    }

    #[test]
    fn center_is_snapped_to_whole_pixels() {
        let snapped = tumbleweed_shapes(Vec2::new(10.7, 20.2), 0.0);
        let reference = tumbleweed_shapes(Vec2::new(10.0, 20.0), 0.0);
        assert_eq!(snapped, reference);
    }

    #[test]
    fn ellipse_points_lie_on_the_curve() {
        let points = ellipse_points(Vec2::new(5.0, 5.0), Vec2::new(30.0, 20.0), 32);
        assert_eq!(points.len(), 32);
        assert_eq!(points[0], Vec2::new(35.0, 5.0));
        for point in points {
            let offset = point - Vec2::new(5.0, 5.0);
            let normalised = (offset.x / 30.0).powi(2) + (offset.y / 20.0).powi(2);
            assert!((normalised - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn degenerate_segment_counts_are_raised() {
        assert_eq!(ellipse_points(Vec2::ZERO, Vec2::ONE, 0).len(), 3);
    }
}
