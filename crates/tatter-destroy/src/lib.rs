//! Tatter Destroy - the card destruction effects
//!
//! Each effect is an [`Engine`] with an explicit `update(dt)` / `draw(surface)`
//! pair. The [`DestructionController`] owns the single active session: it
//! snapshots the card through a [`CardRenderer`], builds the engine for the
//! requested mode, drives it once per frame, and emits exactly one
//! `Finished` event when the engine completes.

mod burn;
mod card;
mod controller;
mod crush;
mod engine;
mod tear;

pub use burn::{BurnEngine, BurnPhase, Hole};
pub use card::{CardFace, CardRenderer, PaperCard};
pub use controller::DestructionController;
pub use crush::CrushEngine;
pub use engine::{Engine, EngineStats, Feedback};
pub use tear::{Shard, TearEngine};
