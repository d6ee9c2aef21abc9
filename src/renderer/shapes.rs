//! Shape generation for 2D primitives
//!
//! Every builder appends triangles (three vertices each) to `out`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, mix};
use crate::sim::Rect;
use crate::theme::Color;

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Color; 4]) {
    let [a, b, c, d] = corners;
    let [ca, cb, cc, cd] = colors;
    out.push(Vertex::new(a.x, a.y, ca));
    out.push(Vertex::new(b.x, b.y, cb));
    out.push(Vertex::new(c.x, c.y, cc));

    out.push(Vertex::new(c.x, c.y, cc));
    out.push(Vertex::new(d.x, d.y, cd));
    out.push(Vertex::new(a.x, a.y, ca));
}

/// Filled axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, r: &Rect, color: Color) {
    gradient_rect(out, r, color, color);
}

/// Rectangle shaded from `top` to `bottom`
pub fn gradient_rect(out: &mut Vec<Vertex>, r: &Rect, top: Color, bottom: Color) {
    let corners = [
        Vec2::new(r.left(), r.top()),
        Vec2::new(r.right(), r.top()),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.left(), r.bottom()),
    ];
    quad(out, corners, [top, top, bottom, bottom]);
}

/// Rectangle outline of stroke `width`, drawn inside the bounds
pub fn rect_outline(out: &mut Vec<Vertex>, r: &Rect, width: f32, color: Color) {
    let w = width.min(r.size.x / 2.0).min(r.size.y / 2.0);
    rect(out, &Rect::new(r.left(), r.top(), r.size.x, w), color);
    rect(out, &Rect::new(r.left(), r.bottom() - w, r.size.x, w), color);
    rect(out, &Rect::new(r.left(), r.top() + w, w, r.size.y - 2.0 * w), color);
    rect(out, &Rect::new(r.right() - w, r.top() + w, w, r.size.y - 2.0 * w), color);
}

/// Square of half-extent `half` rotated by `angle` radians about `center`
pub fn rotated_square(out: &mut Vec<Vertex>, center: Vec2, half: Vec2, angle: f32, color: Color) {
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));
    quad(out, corners, [color; 4]);
}

/// Line segment of the given width
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: Color) {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(out, [a + perp, b + perp, b - perp, a - perp], [color; 4]);
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color, segments: u32) {
    gradient_circle(out, center, radius, color, color, segments);
}

/// Filled circle shaded vertically from `top` to `bottom`
pub fn gradient_circle(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    top: Color,
    bottom: Color,
    segments: u32,
) {
    let shade = |y: f32| mix(top, bottom, (y - (center.y - radius)) / (2.0 * radius));
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let p1 = center + Vec2::from_angle(theta1) * radius;
        let p2 = center + Vec2::from_angle(theta2) * radius;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, shade(center.y)));
        out.push(Vertex::new(p1.x, p1.y, shade(p1.y)));
        out.push(Vertex::new(p2.x, p2.y, shade(p2.y)));
    }
}

/// Ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) {
    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);
        let corners = [
            center + d1 * inner_radius,
            center + d1 * outer_radius,
            center + d2 * outer_radius,
            center + d2 * inner_radius,
        ];
        quad(out, corners, [color; 4]);
    }
}
