/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Drawable area in pixels (or character cells for the terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a zero dimension counts as one
    pub fn aspect(&self) -> f64 {
        self.width.max(1) as f64 / self.height.max(1) as f64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Fixed perspective camera looking down -Z from `distance` units away
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub distance: f64,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            fov_y: std::f64::consts::PI / 4.0, // 45 degrees
            aspect: viewport.aspect(),
            near: 1.0,
            far: 100.0,
            distance: 5.0,
        }
    }

    /// Perspective projection with the camera pull-back folded in.
    ///
    /// Objects' model matrices are multiplied on the right, so this is the
    /// only view transform in the pipeline.
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let perspective = Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far);
        perspective * Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.distance))
    }

    /// Project a model-space point to normalized device coordinates.
    ///
    /// Returns `None` only behind the camera. Points beside the view come back
    /// with coordinates outside `[-1, 1]`; clipping is left to the rasterizer.
    pub fn project_to_ndc(
        point: &Point3<f32>,
        model_view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Option<Point3<f32>> {
        let clip = projection * model_view * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w <= 1e-6 {
            return None;
        }

        Some(Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
    }

    /// Map normalized device coordinates to screen space, origin top-left.
    pub fn ndc_to_screen(ndc: &Point3<f32>, width: u32, height: u32) -> (f32, f32, f32) {
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        (screen_x, screen_y, ndc.z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
