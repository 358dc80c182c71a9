/// Scene configuration
use nalgebra::Vector3;

use crate::animation::{BobParams, DEFAULT_ROTATION_PERIOD_MS};
use crate::error::{Error, Result};
use crate::projection::{Camera, Viewport};
use crate::solids::{DodecahedronParams, OctahedronParams, PyramidParams, Solid};

/// Where a solid starts and which axis it spins about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub solid: Solid,
    pub translation: Vector3<f64>,
    pub axis: Vector3<f64>,
}

impl Placement {
    pub fn new(solid: Solid, translation: Vector3<f64>, axis: Vector3<f64>) -> Self {
        Self {
            solid,
            translation,
            axis,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub viewport: Viewport,
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
    /// How far the camera sits back along +Z
    pub camera_distance: f64,
    /// Time for one full revolution of every object
    pub rotation_period_ms: f64,
    pub bob: BobParams,
    /// Render order
    pub placements: Vec<Placement>,
}

impl SceneConfig {
    /// Defaults with the given viewport
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// The three solids side by side: pyramid, dodecahedron, octahedron.
    pub fn default_placements() -> Vec<Placement> {
        vec![
            Placement::new(
                Solid::Pyramid(PyramidParams::default()),
                Vector3::new(-1.8, -0.75, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ),
            Placement::new(
                Solid::Dodecahedron(DodecahedronParams::default()),
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.2),
            ),
            Placement::new(
                Solid::Octahedron(OctahedronParams::default()),
                Vector3::new(1.8, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ),
        ]
    }

    pub fn camera(&self) -> Camera {
        Camera {
            fov_y: self.fov_y,
            aspect: self.viewport.aspect(),
            near: self.near,
            far: self.far,
            distance: self.camera_distance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "viewport {}x{} has no area",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(self.fov_y > 0.0 && self.fov_y < std::f64::consts::PI) {
            return Err(Error::InvalidConfig(format!("field of view {} out of range", self.fov_y)));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(Error::InvalidConfig(format!(
                "clip planes near={} far={} are not ordered",
                self.near, self.far
            )));
        }
        if !(self.camera_distance > 0.0 && self.camera_distance.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "camera distance {} must be positive",
                self.camera_distance
            )));
        }
        if !(self.rotation_period_ms > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "rotation period {}ms must be positive",
                self.rotation_period_ms
            )));
        }
        if !(self.bob.lower < self.bob.upper && self.bob.step > 0.0) {
            return Err(Error::InvalidConfig(format!("bob bounds {:?} are empty", self.bob)));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            viewport: Viewport::default(),
            fov_y: camera.fov_y,
            near: camera.near,
            far: camera.far,
            camera_distance: camera.distance,
            rotation_period_ms: DEFAULT_ROTATION_PERIOD_MS,
            bob: BobParams::default(),
            placements: Self::default_placements(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solids::SolidKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        let kinds: Vec<_> = config.placements.iter().map(|p| p.solid.kind()).collect();
        assert_eq!(
            kinds,
            vec![SolidKind::Pyramid, SolidKind::Dodecahedron, SolidKind::Octahedron]
        );
    }

    #[test]
    fn test_camera_follows_config() {
        let config = SceneConfig::with_viewport(Viewport::new(1024, 512));
        let camera = config.camera();
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.distance, 5.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SceneConfig::with_viewport(Viewport::new(0, 600));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.viewport = Viewport::new(800, 600);
        config.near = 100.0;
        assert!(config.validate().is_err());

        config.near = 1.0;
        config.rotation_period_ms = 0.0;
        assert!(config.validate().is_err());

        config.rotation_period_ms = 5000.0;
        config.bob.lower = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut config = SceneConfig::default();
        config.rotation_period_ms = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.bob.step = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.bob.upper = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.camera_distance = f64::NAN;
        assert!(config.validate().is_err());

        config.camera_distance = -5.0;
        assert!(config.validate().is_err());
    }
}
