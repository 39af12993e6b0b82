//! Facade wiring the location subsystem together: source priority,
//! shared configuration, map mounts and the anchor attempt, behind one
//! context handle a dashboard holds.

pub mod config;
pub mod context;

pub use config::LocationConfig;
pub use context::LocationContext;
