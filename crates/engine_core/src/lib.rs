//! Core scene types for Danger Ring.
//!
//! This crate provides the foundational types shared by the scanner and the
//! demo scene:
//! - Transform and spatial components
//! - Time management
//! - Common component types for ECS

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
