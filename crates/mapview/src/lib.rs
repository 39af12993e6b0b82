//! Marker reconciliation and viewport management over an abstract map
//! surface.
//!
//! `MapRenderer` owns exactly one surface per mount and reconciles the
//! displayed markers against each new list (full replace). `MountRegistry`
//! keys renderers by mount id so repeated renders reuse the surface
//! instead of recreating it.

pub mod marker;
pub mod memory_surface;
pub mod mounts;
pub mod renderer;
pub mod surface;
pub mod viewport;

pub use marker::{Marker, MarkerHandle, PopupContent};
pub use memory_surface::{MemorySurface, SharedMemorySurface, SurfaceOp};
pub use mounts::{MountRegistry, MountSpec, SurfaceFactory};
pub use renderer::{MapRenderer, RenderConfig};
pub use surface::{MapSurface, TileLayer};
pub use viewport::{ViewportPlan, plan_viewport};
