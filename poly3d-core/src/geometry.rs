/// Flat, GPU-ready geometry produced by the solid builders
use nalgebra::Vector3;

/// Floats per vertex position (xyz)
pub const POSITION_COMPONENTS: usize = 3;
/// Floats per vertex color (rgba)
pub const COLOR_COMPONENTS: usize = 4;

/// RGBA color in `[0, 1]`
pub type Rgba = [f32; 4];

/// Unshared triangle list: one position and one color per triangle corner.
///
/// `indices` is always the identity sequence `0..vertex_count`, so the
/// index buffer only exists to match the indexed draw path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * POSITION_COMPONENTS),
            colors: Vec::with_capacity(vertices * COLOR_COMPONENTS),
            indices: Vec::with_capacity(vertices),
        }
    }

    /// Build from a triangle-corner list and a per-triangle color lookup.
    ///
    /// `vertices_per_color` corners share each consecutive color: 3 gives one
    /// color per triangle, 15 one color per five-triangle pentagon fan.
    pub fn from_corners(
        corners: &[Vector3<f64>],
        palette: &[Rgba],
        vertices_per_color: usize,
    ) -> Self {
        let mut data = Self::with_capacity(corners.len());
        for (i, corner) in corners.iter().enumerate() {
            let color = if palette.is_empty() || vertices_per_color == 0 {
                [1.0; 4]
            } else {
                palette[(i / vertices_per_color) % palette.len()]
            };
            data.push_vertex(corner, color);
        }
        data
    }

    /// Append one vertex; the new index is the previous vertex count.
    pub fn push_vertex(&mut self, position: &Vector3<f64>, color: Rgba) {
        let index = self.vertex_count() as u32;
        self.positions.extend([position.x as f32, position.y as f32, position.z as f32]);
        self.colors.extend(color);
        self.indices.push(index);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> Vector3<f32> {
        let p = &self.positions[i * POSITION_COMPONENTS..(i + 1) * POSITION_COMPONENTS];
        Vector3::new(p[0], p[1], p[2])
    }

    /// Color of vertex `i`
    pub fn color(&self, i: usize) -> Rgba {
        let c = &self.colors[i * COLOR_COMPONENTS..(i + 1) * COLOR_COMPONENTS];
        [c[0], c[1], c[2], c[3]]
    }

    /// Check the layout invariants; returns a reason on failure
    pub fn check(&self) -> Result<(), String> {
        if self.positions.len() % POSITION_COMPONENTS != 0 {
            return Err(format!("{} position floats is not xyz-aligned", self.positions.len()));
        }
        if self.colors.len() % COLOR_COMPONENTS != 0 {
            return Err(format!("{} color floats is not rgba-aligned", self.colors.len()));
        }
        let vertices = self.vertex_count();
        if self.colors.len() / COLOR_COMPONENTS != vertices {
            return Err(format!(
                "{} colors for {} vertices",
                self.colors.len() / COLOR_COMPONENTS,
                vertices
            ));
        }
        if vertices % 3 != 0 {
            return Err(format!("{} vertices do not form whole triangles", vertices));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(format!("index {} out of range for {} vertices", bad, vertices));
        }
        Ok(())
    }
}
