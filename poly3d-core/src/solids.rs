/// Procedural builders for the three solids.
///
/// Each builder is a pure function of its parameters. All trigonometry runs in
/// `f64` and is narrowed to `f32` only when a vertex lands in [`GeometryData`];
/// the dodecahedron relies on trigonometric identities lining faces up exactly.
use std::f64::consts::PI;

use nalgebra::{Rotation3, Vector3};

use crate::geometry::{GeometryData, Rgba};

/// Which solid a mesh was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolidKind {
    Pyramid,
    Dodecahedron,
    Octahedron,
}

/// Shape parameters for one solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solid {
    Pyramid(PyramidParams),
    Dodecahedron(DodecahedronParams),
    Octahedron(OctahedronParams),
}

impl Solid {
    pub fn kind(&self) -> SolidKind {
        match self {
            Solid::Pyramid(_) => SolidKind::Pyramid,
            Solid::Dodecahedron(_) => SolidKind::Dodecahedron,
            Solid::Octahedron(_) => SolidKind::Octahedron,
        }
    }

    pub fn build(&self) -> GeometryData {
        match self {
            Solid::Pyramid(params) => pyramid(params),
            Solid::Dodecahedron(params) => dodecahedron(params),
            Solid::Octahedron(params) => octahedron(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidParams {
    pub radius: f64,
    pub triangle_count: u32,
    pub apex_height: f64,
}

impl Default for PyramidParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            triangle_count: 5,
            apex_height: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodecahedronParams {
    pub radius: f64,
}

impl Default for DodecahedronParams {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctahedronParams {
    pub radius: f64,
}

impl Default for OctahedronParams {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Base fan triangles first, then the sides.
pub const PYRAMID_COLORS: [Rgba; 10] = [
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [0.5, 0.5, 0.0, 1.0],
    [0.5, 1.0, 1.0, 1.0],
    [0.5, 1.0, 0.0, 1.0],
    [0.0, 1.0, 0.5, 1.0],
    [0.5, 1.0, 0.5, 1.0],
];

pub const OCTAHEDRON_COLORS: [Rgba; 8] = [
    [0.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [0.5, 0.5, 0.0, 1.0],
];

/// One color per pentagonal face, in generation order.
pub const DODECAHEDRON_COLORS: [Rgba; 12] = [
    [0.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [0.5, 0.5, 0.0, 1.0],
    [0.5, 1.0, 1.0, 1.0],
    [0.5, 1.0, 0.0, 1.0],
    [0.0, 1.0, 0.5, 1.0],
    [0.5, 1.0, 0.5, 1.0],
];

const PENTAGON_SIDES: u32 = 5;
const PENTAGON_VERTICES: usize = PENTAGON_SIDES as usize * 3;

/// Point `i` of `sides` evenly spaced on the XZ circle of `radius` at height `y`
fn rim_point(i: u32, sides: u32, radius: f64, y: f64) -> Vector3<f64> {
    let angle = 2.0 * PI / sides as f64 * i as f64;
    Vector3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Triangle fan from `(0, y, 0)` around a regular polygon in the XZ plane
fn polygon_fan(sides: u32, radius: f64, y: f64) -> Vec<Vector3<f64>> {
    let center = Vector3::new(0.0, y, 0.0);
    (0..sides)
        .flat_map(|i| {
            [
                center,
                rim_point(i, sides, radius, y),
                rim_point(i + 1, sides, radius, y),
            ]
        })
        .collect()
}

/// Pentagonal pyramid (by default): a base fan plus one side triangle per rim edge.
pub fn pyramid(params: &PyramidParams) -> GeometryData {
    let sides = params.triangle_count;
    let apex = Vector3::new(0.0, params.apex_height, 0.0);

    let mut corners = polygon_fan(sides, params.radius, 0.0);
    for i in 0..sides {
        corners.push(rim_point(i, sides, params.radius, 0.0));
        corners.push(rim_point(i + 1, sides, params.radius, 0.0));
        corners.push(apex);
    }

    GeometryData::from_corners(&corners, &PYRAMID_COLORS, 3)
}

/// Two square pyramids joined at the XZ equator.
pub fn octahedron(params: &OctahedronParams) -> GeometryData {
    let r = params.radius;
    let top = Vector3::new(0.0, r, 0.0);
    let bottom = Vector3::new(0.0, -r, 0.0);
    let east = Vector3::new(r, 0.0, 0.0);
    let west = Vector3::new(-r, 0.0, 0.0);
    let front = Vector3::new(0.0, 0.0, r);
    let back = Vector3::new(0.0, 0.0, -r);

    #[rustfmt::skip]
    let corners = [
        top, east, front,
        top, west, front,
        bottom, west, front,
        bottom, east, front,
        top, east, back,
        top, west, back,
        bottom, west, back,
        bottom, east, back,
    ];

    GeometryData::from_corners(&corners, &OCTAHEDRON_COLORS, 3)
}

/// Measurements shared by every face of the dodecahedron
#[derive(Debug, Clone, Copy)]
struct PentagonLayout {
    radius: f64,
    /// Distance from the pentagon center to the middle of an edge
    apothem: f64,
    /// Height of the bottom face below the solid's center
    offset_y: f64,
}

impl PentagonLayout {
    fn new(radius: f64) -> Self {
        let step = 2.0 * PI / PENTAGON_SIDES as f64;
        let dx = radius - radius * step.cos();
        let dz = radius * step.sin();
        let half_edge = (dx * dx + dz * dz).sqrt() / 2.0;

        Self {
            radius,
            apothem: (radius * radius - half_edge * half_edge).sqrt(),
            offset_y: radius + half_edge / 2.0,
        }
    }
}

/// Fan for one side face, hinged on the bottom face's edge and turned `turn` about Y.
fn side_face(layout: &PentagonLayout, turn: f64) -> Vec<Vector3<f64>> {
    let dihedral = (-1.0 / 5.0_f64.sqrt()).acos();
    let tilt = Rotation3::from_axis_angle(&Vector3::z_axis(), dihedral);
    let seat = Vector3::new(
        -layout.apothem + layout.apothem * dihedral.cos(),
        layout.apothem * (PI - dihedral).sin(),
        0.0,
    );
    let spin = Rotation3::from_axis_angle(&Vector3::y_axis(), turn);
    let drop = Vector3::new(0.0, -layout.offset_y, 0.0);

    polygon_fan(PENTAGON_SIDES, layout.radius, 0.0)
        .into_iter()
        .map(|v| spin * (tilt * v + seat) + drop)
        .collect()
}

/// Twelve pentagon fans: the bottom face and five tilted sides make the lower
/// half, and the upper half is that shell turned half a revolution about Z.
pub fn dodecahedron(params: &DodecahedronParams) -> GeometryData {
    let layout = PentagonLayout::new(params.radius);

    let mut corners = Vec::with_capacity(12 * PENTAGON_VERTICES);
    corners.extend(polygon_fan(PENTAGON_SIDES, layout.radius, -layout.offset_y));
    for k in 0..PENTAGON_SIDES {
        let turn = 2.0 * PI / PENTAGON_SIDES as f64 * k as f64;
        corners.extend(side_face(&layout, turn));
    }

    let flip = Rotation3::from_axis_angle(&Vector3::z_axis(), PI);
    let upper: Vec<_> = corners.iter().map(|&v| flip * v).collect();
    corners.extend(upper);

    GeometryData::from_corners(&corners, &DODECAHEDRON_COLORS, PENTAGON_VERTICES)
}
