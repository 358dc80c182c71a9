/// Animated meshes living on the device
use log::debug;
use nalgebra::{Matrix4, Vector3};

use crate::animation::Animation;
use crate::device::{DrawCall, RenderDevice};
use crate::error::{Error, Result};
use crate::geometry::{GeometryData, COLOR_COMPONENTS, POSITION_COMPONENTS};
use crate::solids::SolidKind;
use crate::transform::Transform;

/// Device buffers holding one uploaded [`GeometryData`]
#[derive(Debug)]
pub struct GpuMesh<B> {
    pub vertex_buffer: B,
    pub color_buffer: B,
    pub index_buffer: B,
    pub vertex_count: usize,
    pub index_count: usize,
}

impl<B> GpuMesh<B> {
    pub fn upload<D>(device: &mut D, kind: SolidKind, geometry: &GeometryData) -> Result<Self>
    where
        D: RenderDevice<Buffer = B>,
    {
        geometry
            .check()
            .map_err(|reason| Error::InvalidGeometry { kind, reason })?;

        let vertex_buffer = device.create_buffer()?;
        device.upload_vertex_data(&vertex_buffer, &geometry.positions);

        let color_buffer = device.create_buffer()?;
        device.upload_vertex_data(&color_buffer, &geometry.colors);

        let index_buffer = device.create_buffer()?;
        device.upload_index_data(&index_buffer, &geometry.indices);

        debug!(
            "uploaded {:?}: {} vertices, {} indices",
            kind,
            geometry.vertex_count(),
            geometry.index_count()
        );

        Ok(Self {
            vertex_buffer,
            color_buffer,
            index_buffer,
            vertex_count: geometry.vertex_count(),
            index_count: geometry.index_count(),
        })
    }

    pub fn draw_call(&self) -> DrawCall<'_, B> {
        DrawCall {
            vertex_buffer: &self.vertex_buffer,
            color_buffer: &self.color_buffer,
            index_buffer: &self.index_buffer,
            position_components: POSITION_COMPONENTS,
            color_components: COLOR_COMPONENTS,
            index_count: self.index_count,
        }
    }
}

/// A solid on the device plus its model transform and per-frame behavior
#[derive(Debug)]
pub struct MeshObject<B> {
    pub kind: SolidKind,
    pub mesh: GpuMesh<B>,
    pub transform: Matrix4<f64>,
    pub animation: Animation,
    /// Timestamp of the previous update, seeded at construction
    last_update_ms: f64,
}

impl<B> MeshObject<B> {
    pub fn new(
        kind: SolidKind,
        mesh: GpuMesh<B>,
        translation: &Vector3<f64>,
        animation: Animation,
        now_ms: f64,
    ) -> Self {
        Self {
            kind,
            mesh,
            transform: Transform::placed_at(translation),
            animation,
            last_update_ms: now_ms,
        }
    }

    /// Advance the animation by `elapsed_ms`
    pub fn update(&mut self, elapsed_ms: f64) {
        self.animation.update(&mut self.transform, elapsed_ms);
    }

    /// Advance to the wall-clock time `now_ms`; time never runs backwards.
    pub fn advance_to(&mut self, now_ms: f64) {
        let elapsed = (now_ms - self.last_update_ms).max(0.0);
        self.last_update_ms = self.last_update_ms.max(now_ms);
        self.update(elapsed);
    }

    pub fn last_update_ms(&self) -> f64 {
        self.last_update_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Bob, BobParams, BobPhase, Spin, DEFAULT_ROTATION_PERIOD_MS};
    use crate::device::recording::{Call, RecordingDevice};
    use crate::solids::{self, OctahedronParams, PyramidParams};

    fn spin(axis: Vector3<f64>) -> Spin {
        Spin::new(axis, DEFAULT_ROTATION_PERIOD_MS)
    }

    fn object(device: &mut RecordingDevice, kind: SolidKind, now_ms: f64) -> MeshObject<usize> {
        let geometry = match kind {
            SolidKind::Octahedron => solids::octahedron(&OctahedronParams::default()),
            _ => solids::pyramid(&PyramidParams::default()),
        };
        let mesh = GpuMesh::upload(device, kind, &geometry).unwrap();
        let spin = spin(Vector3::new(0.0, 1.0, 1.0));
        let animation = Animation::for_solid(kind, spin, BobParams::default());
        MeshObject::new(kind, mesh, &Vector3::zeros(), animation, now_ms)
    }

    fn bob_phase(object: &MeshObject<usize>) -> Option<BobPhase> {
        match object.animation {
            Animation::SpinAndBob(_, Bob { phase, .. }) => Some(phase),
            Animation::Spin(_) => None,
        }
    }

    #[test]
    fn test_upload_creates_three_buffers() {
        let mut device = RecordingDevice::default();
        let geometry = solids::pyramid(&PyramidParams::default());
        let mesh = GpuMesh::upload(&mut device, SolidKind::Pyramid, &geometry).unwrap();

        assert_eq!(mesh.vertex_count, 30);
        assert_eq!(mesh.index_count, 30);
        assert_eq!(device.buffers[mesh.vertex_buffer].len(), 90);
        assert_eq!(device.buffers[mesh.color_buffer].len(), 120);
        assert_eq!(device.indices[mesh.index_buffer], (0..30).collect::<Vec<u32>>());
        assert_eq!(device.calls[0], Call::CreateBuffer(0));
    }

    #[test]
    fn test_upload_rejects_broken_geometry() {
        let mut device = RecordingDevice::default();
        let mut geometry = solids::pyramid(&PyramidParams::default());
        geometry.colors.pop();
        let err = GpuMesh::upload(&mut device, SolidKind::Pyramid, &geometry).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { kind: SolidKind::Pyramid, .. }));
        assert!(device.calls.is_empty());
    }

    #[test]
    fn test_update_zero_is_noop() {
        let mut device = RecordingDevice::default();
        let mut pyramid = object(&mut device, SolidKind::Pyramid, 0.0);
        pyramid.transform = Transform::rotate(&pyramid.transform, 0.7, &Vector3::x());
        let before = pyramid.transform;
        pyramid.update(0.0);
        assert!((pyramid.transform - before).norm() < 1e-12);
    }

    #[test]
    fn test_update_is_additive() {
        let mut device = RecordingDevice::default();
        let mut split = object(&mut device, SolidKind::Pyramid, 0.0);
        let mut whole = object(&mut device, SolidKind::Pyramid, 0.0);

        split.update(120.0);
        split.update(380.0);
        whole.update(500.0);

        assert!((split.transform - whole.transform).norm() < 1e-9);
    }

    #[test]
    fn test_advance_uses_construction_time() {
        let mut device = RecordingDevice::default();
        let mut pyramid = object(&mut device, SolidKind::Pyramid, 10_000.0);
        let start = pyramid.transform;

        pyramid.advance_to(10_000.0);
        assert!((pyramid.transform - start).norm() < 1e-12);

        // running backwards is treated as no time passing
        pyramid.advance_to(9_000.0);
        assert!((pyramid.transform - start).norm() < 1e-12);
        assert_eq!(pyramid.last_update_ms(), 10_000.0);

        pyramid.advance_to(12_500.0);
        let mut reference = object(&mut device, SolidKind::Pyramid, 0.0);
        reference.update(2_500.0);
        assert!((pyramid.transform - reference.transform).norm() < 1e-9);
    }

    #[test]
    fn test_octahedron_bobs_between_bounds() {
        let mut device = RecordingDevice::default();
        let mut octahedron = object(&mut device, SolidKind::Octahedron, 0.0);

        for _ in 0..40 {
            octahedron.update(16.0);
        }
        assert!(Transform::translation_y(&octahedron.transform) >= 2.0 - 1e-9);
        assert_eq!(bob_phase(&octahedron), Some(BobPhase::Falling));

        for _ in 0..80 {
            octahedron.update(16.0);
        }
        assert!(Transform::translation_y(&octahedron.transform) <= -2.0 + 1e-9);
        assert_eq!(bob_phase(&octahedron), Some(BobPhase::Rising));
    }

    #[test]
    fn test_pyramid_does_not_bob() {
        let mut device = RecordingDevice::default();
        let mut pyramid = object(&mut device, SolidKind::Pyramid, 0.0);
        for _ in 0..10 {
            pyramid.update(16.0);
        }
        assert_eq!(Transform::translation_y(&pyramid.transform), 0.0);
    }
}
