//! Geographic primitives shared across the location subsystem: points,
//! bounding boxes, viewports and resolved addresses. Dependency-free.

pub mod address;
pub mod bounds;
pub mod point;
pub mod viewport;

pub use address::*;
pub use bounds::*;
pub use point::*;
pub use viewport::*;
