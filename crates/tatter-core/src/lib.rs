//! Tatter Core - Foundational types for the card destruction engine
//!
//! This crate provides the types that all other Tatter crates depend on:
//! - `SessionId`, `SessionIds` - Session identifiers and their per-controller allocator
//! - `Rect`, `Color`, `Vec2` - Spatial and color types
//! - `DestroyMode` - The three destruction styles
//! - `DestroyConfig` - Tunable constants loaded from TOML
//! - Error types and Result alias

mod config;
mod error;
mod id;
mod types;

pub use config::{
    BurnConfig, CrushConfig, DestroyConfig, ParticleConfig, SessionConfig, TearConfig,
};
pub use error::{Result, TatterError};
pub use glam::Vec2;
pub use id::{SessionId, SessionIds};
pub use types::{Color, DestroyMode, Rect};
