/// poly3d Core Library - Procedural solids and the frame loop that animates them
///
/// This library holds everything that does not touch a real graphics API:
/// geometry builders, model transforms, the projection, per-object animation
/// and the scene/frame loop, all written against the [`RenderDevice`] trait.

pub mod animation;
pub mod config;
pub mod device;
pub mod error;
pub mod frame_loop;
pub mod geometry;
pub mod mesh;
pub mod projection;
pub mod scene;
pub mod solids;
pub mod transform;

// Re-export commonly used types
pub use animation::{Animation, Bob, BobParams, BobPhase, Spin};
pub use config::{Placement, SceneConfig};
pub use device::{DrawCall, RenderDevice, Uniform, COLOR_ATTRIBUTE, POSITION_ATTRIBUTE};
pub use error::{Error, Result, ShaderStage};
pub use frame_loop::{FrameLoop, FrameScheduler};
pub use geometry::GeometryData;
pub use mesh::{GpuMesh, MeshObject};
pub use projection::{Camera, Viewport};
pub use scene::Scene;
pub use solids::{DodecahedronParams, OctahedronParams, PyramidParams, Solid, SolidKind};
pub use transform::Transform;
