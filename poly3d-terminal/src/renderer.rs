/// Character-cell rasterizer implementing the core render device
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use poly3d_core::{Camera, DrawCall, RenderDevice, Result, Uniform, Viewport};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: u32 = 2;

type Rgba = [f32; 4];

/// Handle to a buffer stored inside the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferId(usize);

#[derive(Debug, Default)]
struct BufferData {
    floats: Vec<f32>,
    indices: Vec<u32>,
}

/// Screen-space corner of a triangle being rasterized
#[derive(Debug, Clone, Copy)]
struct Corner {
    x: f32,
    y: f32,
    depth: f32,
    color: Rgba,
}

/// Software device drawing into a grid of colored characters
pub struct TerminalDevice {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    color_buffer: Vec<Option<Rgba>>,
    buffers: Vec<BufferData>,
    projection: Matrix4<f32>,
    model_view: Matrix4<f32>,
}

impl TerminalDevice {
    pub fn new(columns: usize, rows: usize) -> Self {
        let size = columns * rows;
        Self {
            width: columns,
            height: rows,
            depth_buffer: vec![f32::INFINITY; size],
            color_buffer: vec![None; size],
            buffers: Vec::new(),
            projection: Matrix4::identity(),
            model_view: Matrix4::identity(),
        }
    }

    /// Viewport whose aspect matches what the terminal shows
    pub fn viewport_for(columns: u16, rows: u16) -> Viewport {
        Viewport::new(columns as u32, rows as u32 * CELL_ASPECT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color drawn at a cell, if any
    pub fn cell(&self, x: usize, y: usize) -> Option<Rgba> {
        self.color_buffer.get(y * self.width + x).copied().flatten()
    }

    fn corner(
        &self,
        call: &DrawCall<'_, BufferId>,
        positions: &[f32],
        colors: &[f32],
        index: usize,
    ) -> Option<Corner> {
        let (pn, cn) = (call.position_components, call.color_components);
        let p = positions.get(index * pn..index * pn + 3)?;
        let c = colors.get(index * cn..index * cn + 4)?;
        let ndc = Camera::project_to_ndc(
            &Point3::new(p[0], p[1], p[2]),
            &self.model_view,
            &self.projection,
        )?;
        let (x, y, depth) = Camera::ndc_to_screen(&ndc, self.width as u32, self.height as u32);
        Some(Corner {
            x,
            y,
            depth,
            color: [c[0], c[1], c[2], c[3]],
        })
    }

    fn rasterize_triangle(&mut self, v0: Corner, v1: Corner, v2: Corner) {
        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // Outside the near/far planes
                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.color_buffer[idx] = Some(std::array::from_fn(|i| {
                        w0 * v0.color[i] + w1 * v1.color[i] + w2 * v2.color[i]
                    }));
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                match self.color_buffer[y * self.width + x] {
                    Some(color) => {
                        writer.queue(SetForegroundColor(terminal_color(color)))?;
                        writer.queue(Print(shade(color)))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            // No newline after the bottom row, or the screen scrolls
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderDevice for TerminalDevice {
    type Buffer = BufferId;

    fn create_buffer(&mut self) -> Result<BufferId> {
        self.buffers.push(BufferData::default());
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn upload_vertex_data(&mut self, buffer: &BufferId, data: &[f32]) {
        if let Some(slot) = self.buffers.get_mut(buffer.0) {
            slot.floats = data.to_vec();
        }
    }

    fn upload_index_data(&mut self, buffer: &BufferId, data: &[u32]) {
        if let Some(slot) = self.buffers.get_mut(buffer.0) {
            slot.indices = data.to_vec();
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        let width = viewport.width as usize;
        let height = (viewport.height / CELL_ASPECT) as usize;
        if (width, height) != (self.width, self.height) {
            *self = Self {
                buffers: std::mem::take(&mut self.buffers),
                ..Self::new(width, height)
            };
        }
    }

    fn bind_shader_program(&mut self) {}

    fn set_uniform(&mut self, uniform: Uniform, value: &Matrix4<f32>) {
        match uniform {
            Uniform::Projection => self.projection = *value,
            Uniform::ModelView => self.model_view = *value,
        }
    }

    fn draw_indexed_triangles(&mut self, call: DrawCall<'_, BufferId>) {
        // Uploaded data is only read here, so take it out while rasterizing.
        let positions = std::mem::take(&mut self.buffers[call.vertex_buffer.0].floats);
        let colors = std::mem::take(&mut self.buffers[call.color_buffer.0].floats);
        let indices = std::mem::take(&mut self.buffers[call.index_buffer.0].indices);

        let count = call.index_count.min(indices.len());
        for triangle in indices[..count].chunks_exact(3) {
            let corners: Option<Vec<Corner>> = triangle
                .iter()
                .map(|&i| self.corner(&call, &positions, &colors, i as usize))
                .collect();
            // None when any corner is behind the camera
            if let Some(&[v0, v1, v2]) = corners.as_deref() {
                self.rasterize_triangle(v0, v1, v2);
            }
        }

        self.buffers[call.vertex_buffer.0].floats = positions;
        self.buffers[call.color_buffer.0].floats = colors;
        self.buffers[call.index_buffer.0].indices = indices;
    }

    fn clear_frame(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.color_buffer.fill(None);
    }
}

fn terminal_color(color: Rgba) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color[0]),
        g: channel(color[1]),
        b: channel(color[2]),
    }
}

/// Ramp character for a color's perceived brightness
fn shade(color: Rgba) -> char {
    let luma = 0.2126 * color[0] + 0.7152 * color[1] + 0.0722 * color[2];
    let char_index = (luma.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
