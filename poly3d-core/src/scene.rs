/// The animated scene: projection, viewport and the meshes in render order
use log::{debug, info};
use nalgebra::Matrix4;

use crate::animation::{Animation, Spin};
use crate::config::SceneConfig;
use crate::device::{RenderDevice, Uniform};
use crate::error::Result;
use crate::mesh::{GpuMesh, MeshObject};
use crate::projection::Viewport;
use crate::transform::Transform;

pub struct Scene<B> {
    projection: Matrix4<f64>,
    viewport: Viewport,
    objects: Vec<MeshObject<B>>,
}

impl<B> Scene<B> {
    /// Empty scene with a fixed projection
    pub fn new(projection: Matrix4<f64>, viewport: Viewport) -> Self {
        Self {
            projection,
            viewport,
            objects: Vec::new(),
        }
    }

    /// Build the projection, set the viewport and upload every configured solid.
    ///
    /// `now_ms` seeds each object's update clock.
    pub fn setup<D>(device: &mut D, config: &SceneConfig, now_ms: f64) -> Result<Self>
    where
        D: RenderDevice<Buffer = B>,
    {
        config.validate()?;

        let projection = config.camera().projection_matrix();
        device.set_viewport(config.viewport);
        debug!(
            "projection for {}x{} viewport, aspect {:.3}",
            config.viewport.width,
            config.viewport.height,
            config.viewport.aspect()
        );

        let mut scene = Self::new(projection, config.viewport);
        for placement in &config.placements {
            let kind = placement.solid.kind();
            let geometry = placement.solid.build();
            let mesh = GpuMesh::upload(device, kind, &geometry)?;
            let spin = Spin::new(placement.axis, config.rotation_period_ms);
            let animation = Animation::for_solid(kind, spin, config.bob);
            scene.add(MeshObject::new(kind, mesh, &placement.translation, animation, now_ms));
        }

        info!("scene ready with {} objects", scene.objects.len());
        Ok(scene)
    }

    pub fn add(&mut self, object: MeshObject<B>) {
        self.objects.push(object);
    }

    pub fn projection(&self) -> &Matrix4<f64> {
        &self.projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn objects(&self) -> &[MeshObject<B>] {
        &self.objects
    }

    /// Advance every object to `now_ms`
    pub fn update(&mut self, now_ms: f64) {
        for object in &mut self.objects {
            object.advance_to(now_ms);
        }
    }

    /// Clear, bind the shared program once, then one draw per object
    pub fn draw<D>(&self, device: &mut D)
    where
        D: RenderDevice<Buffer = B>,
    {
        device.clear_frame();
        device.bind_shader_program();

        let projection = Transform::to_gpu(&self.projection);
        for object in &self.objects {
            device.set_uniform(Uniform::Projection, &projection);
            device.set_uniform(Uniform::ModelView, &Transform::to_gpu(&object.transform));
            device.draw_indexed_triangles(object.mesh.draw_call());
        }
    }

    /// One full frame: update, then draw
    pub fn render_frame<D>(&mut self, device: &mut D, now_ms: f64)
    where
        D: RenderDevice<Buffer = B>,
    {
        self.update(now_ms);
        self.draw(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::recording::{Call, RecordingDevice};
    use crate::error::Error;
    use crate::solids::SolidKind;

    fn setup(device: &mut RecordingDevice, now_ms: f64) -> Scene<usize> {
        Scene::setup(device, &SceneConfig::with_viewport(Viewport::new(800, 600)), now_ms).unwrap()
    }

    #[test]
    fn test_setup_uploads_every_solid() {
        let mut device = RecordingDevice::default();
        let scene = setup(&mut device, 0.0);

        let kinds: Vec<_> = scene.objects().iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![SolidKind::Pyramid, SolidKind::Dodecahedron, SolidKind::Octahedron]);
        assert_eq!(device.buffers.len(), 9);
        let counts: Vec<_> = scene.objects().iter().map(|o| o.mesh.index_count).collect();
        assert_eq!(counts, vec![30, 180, 24]);
        assert_eq!(device.calls[0], Call::SetViewport(Viewport::new(800, 600)));
    }

    #[test]
    fn test_projection_embeds_aspect() {
        let mut device = RecordingDevice::default();
        let scene = setup(&mut device, 0.0);
        let p = scene.projection();
        assert!((p[(1, 1)] / p[(0, 0)] - 800.0 / 600.0).abs() < 1e-12);
        // camera pulled back by five units
        assert!((p[(3, 3)] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_frame_clears_without_drawing() {
        let mut device = RecordingDevice::default();
        let projection = SceneConfig::default().camera().projection_matrix();
        let mut scene: Scene<usize> = Scene::new(projection, Viewport::new(800, 600));

        scene.render_frame(&mut device, 16.0);

        assert_eq!(device.clears(), 1);
        assert_eq!(device.draws(), 0);
    }

    #[test]
    fn test_frame_binds_once_and_draws_each_object() {
        let mut device = RecordingDevice::default();
        let mut scene = setup(&mut device, 0.0);
        device.calls.clear();

        scene.render_frame(&mut device, 16.0);

        assert_eq!(device.calls[0], Call::Clear);
        assert_eq!(device.calls[1], Call::BindProgram);
        let binds = device.calls.iter().filter(|c| **c == Call::BindProgram).count();
        assert_eq!(binds, 1);
        assert_eq!(device.draws(), 3);

        let draws: Vec<_> = device
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { vertex, color, index, count } => Some((*vertex, *color, *index, *count)),
                _ => None,
            })
            .collect();
        assert_eq!(draws, vec![(0, 1, 2, 30), (3, 4, 5, 180), (6, 7, 8, 24)]);
    }

    #[test]
    fn test_model_view_uniforms_follow_transforms() {
        let mut device = RecordingDevice::default();
        let mut scene = setup(&mut device, 1000.0);
        device.calls.clear();

        scene.render_frame(&mut device, 1500.0);

        let uploaded = device.model_views();
        assert_eq!(uploaded.len(), 3);
        for (object, model_view) in scene.objects().iter().zip(&uploaded) {
            assert!((object.transform.cast::<f32>() - model_view).norm() < 1e-6);
        }
        // every object moved
        let start = SceneConfig::default_placements();
        for (object, placement) in scene.objects().iter().zip(&start) {
            assert!((object.transform - Transform::placed_at(&placement.translation)).norm() > 1e-3);
        }
    }

    #[test]
    fn test_first_frame_has_no_jump() {
        let mut device = RecordingDevice::default();
        let mut scene = setup(&mut device, 50_000.0);
        let before: Vec<_> = scene.objects().iter().map(|o| o.transform).collect();

        scene.update(50_000.0);

        for (object, start) in scene.objects().iter().zip(&before) {
            if object.kind == SolidKind::Octahedron {
                continue;
            }
            assert!((object.transform - start).norm() < 1e-12);
        }
    }

    #[test]
    fn test_setup_fails_on_allocation_error() {
        let mut device = RecordingDevice {
            buffer_limit: Some(4),
            ..RecordingDevice::default()
        };
        let result = Scene::setup(&mut device, &SceneConfig::default(), 0.0);
        assert!(matches!(result, Err(Error::BufferAllocation(_))));
    }

    #[test]
    fn test_setup_rejects_invalid_config() {
        let mut device = RecordingDevice::default();
        let config = SceneConfig::with_viewport(Viewport::new(800, 0));
        assert!(matches!(
            Scene::setup(&mut device, &config, 0.0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(device.calls.is_empty());
    }
}
