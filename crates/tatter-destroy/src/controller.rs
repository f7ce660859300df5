//! The destruction session controller
//!
//! One session at a time. The host reports when its drawing surface is
//! ready, triggers a mode on a card rect, forwards pointer events, and calls
//! [`DestructionController::tick`] once per display refresh. Completion is
//! signalled through the event queue, exactly once per session.

use log::{debug, info, warn};
use tatter_core::{
    DestroyConfig, DestroyMode, Rect, Result, SessionId, SessionIds, TatterError,
};
use tatter_particles::ParticleRng;
use tatter_raster::{RasterImage, Surface};
use tatter_runtime::{EventBus, FrameClock, PointerEvent, SessionEvent, SessionState};

use crate::burn::BurnEngine;
use crate::card::{CardFace, CardRenderer};
use crate::crush::CrushEngine;
use crate::engine::{Engine, EngineStats, Feedback};
use crate::tear::TearEngine;

/// Everything owned for the lifetime of one session
struct Session {
    id: SessionId,
    mode: DestroyMode,
    card: RasterImage,
    state: SessionState,
    engine: Box<dyn Engine>,
    clock: FrameClock,
    /// Opacity of the fade tail, 1.0 until `Finishing`
    fade: f32,
}

pub struct DestructionController {
    config: DestroyConfig,
    renderer: Box<dyn CardRenderer>,
    viewport: Option<(u32, u32)>,
    session: Option<Session>,
    events: EventBus,
    ids: SessionIds,
    seed: u64,
}

impl DestructionController {
    pub fn new(config: DestroyConfig, renderer: Box<dyn CardRenderer>) -> Self {
        Self {
            config,
            renderer,
            viewport: None,
            session: None,
            events: EventBus::new(),
            ids: SessionIds::new(),
            seed: 0x5EED,
        }
    }

    /// Base seed for the per-session random streams
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &DestroyConfig {
        &self.config
    }

    /// The host's drawing surface finished initialising
    pub fn set_surface_ready(&mut self, width: u32, height: u32) {
        debug!("Surface ready at {width}x{height}");
        self.viewport = Some((width, height));
    }

    pub fn is_surface_ready(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn active_mode(&self) -> Option<DestroyMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Lifecycle state of the current session, `Idle` when there is none
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, |s| s.state)
    }

    pub fn stats(&self) -> Option<EngineStats> {
        self.session.as_ref().map(|s| s.engine.stats())
    }

    /// Simulated time of the current session
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.clock.elapsed_ms)
    }

    /// Start destroying the card at `rect`.
    ///
    /// Fails with `SurfaceNotReady` before [`set_surface_ready`](Self::set_surface_ready)
    /// (retry shortly) and with `AlreadyActive` while a session runs; neither
    /// changes any state.
    pub fn trigger(
        &mut self,
        mode: DestroyMode,
        rect: Rect,
        face: &CardFace,
    ) -> Result<SessionId> {
        let (_, viewport_height) = self.check_ready()?;
        rect.validate()?;

        // Ids count triggers on this controller, so a seed replays exactly
        let id = self.ids.allocate();
        let rng =
            ParticleRng::from_seed_u64(self.seed ^ id.raw().wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let engine: Box<dyn Engine> = match mode {
            DestroyMode::Burn => Box::new(BurnEngine::new(
                rect,
                self.config.burn.clone(),
                &self.config.particles,
                rng,
            )),
            DestroyMode::Tear => Box::new(TearEngine::new(
                rect,
                viewport_height as f32,
                self.config.tear.clone(),
                rng,
            )),
            DestroyMode::Crush => Box::new(CrushEngine::new(rect, self.config.crush.clone())),
        };
        self.start(id, engine, rect, face)
    }

    /// Start a session driven by a caller-supplied engine
    pub fn trigger_with(
        &mut self,
        engine: Box<dyn Engine>,
        rect: Rect,
        face: &CardFace,
    ) -> Result<SessionId> {
        self.check_ready()?;
        rect.validate()?;
        let id = self.ids.allocate();
        self.start(id, engine, rect, face)
    }

    fn check_ready(&self) -> Result<(u32, u32)> {
        let viewport = self.viewport.ok_or(TatterError::SurfaceNotReady)?;
        if let Some(active) = &self.session {
            debug!("Trigger ignored, session {} still running", active.id);
            return Err(TatterError::AlreadyActive);
        }
        Ok(viewport)
    }

    fn start(
        &mut self,
        id: SessionId,
        engine: Box<dyn Engine>,
        rect: Rect,
        face: &CardFace,
    ) -> Result<SessionId> {
        let (width, height) = (rect.width.round() as u32, rect.height.round() as u32);
        let card = self.renderer.render(face, width, height)?;

        let mode = engine.mode();
        let mut state = SessionState::Idle;
        state.transition(SessionState::Active);
        self.session = Some(Session {
            id,
            mode,
            card,
            state,
            engine,
            clock: FrameClock::with_max_frame(self.config.session.max_frame_ms),
            fade: 1.0,
        });

        info!(
            "{mode} session {id} started on {}x{} card at ({}, {})",
            width, height, rect.x, rect.y
        );
        self.events.push(SessionEvent::Started { session: id, mode });
        self.events.push(SessionEvent::Haptic { session: id });
        Ok(id)
    }

    /// Forward a pointer event to the active engine
    pub fn pointer(&mut self, event: &PointerEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state != SessionState::Active {
            return;
        }
        match session.engine.handle_pointer(event) {
            Ok(Feedback::Haptic) => {
                self.events.push(SessionEvent::Haptic {
                    session: session.id,
                });
            }
            Ok(Feedback::None) => {}
            Err(err @ TatterError::InputOutOfBounds { .. }) => debug!("Pointer ignored: {err}"),
            Err(err) => warn!("{} session {} rejected input: {err}", session.mode, session.id),
        }
    }

    /// Run one frame at host timestamp `now_ms`. Returns true while a session runs.
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn Surface) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let delta = session.clock.tick(now_ms);
        self.advance(delta, surface)
    }

    /// Run one frame of `dt_ms` simulated time
    pub fn step(&mut self, dt_ms: f64, surface: &mut dyn Surface) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let delta = session.clock.step(dt_ms);
        self.advance(delta, surface)
    }

    fn advance(&mut self, delta: f64, surface: &mut dyn Surface) -> bool {
        let fade_step = self.config.session.fade_tail_step;
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let finished = match session.state {
            SessionState::Active => match session.engine.update(delta) {
                Err(err) => {
                    warn!(
                        "{} session {} failed, forcing completion: {err}",
                        session.mode, session.id
                    );
                    surface.clear();
                    true
                }
                Ok(()) => {
                    surface.clear();
                    session.engine.draw(surface, &session.card, 1.0);
                    if !session.engine.is_complete() {
                        false
                    } else if session.engine.wants_fade_tail() {
                        session.state.transition(SessionState::Finishing);
                        debug!("{} session {} fading out", session.mode, session.id);
                        false
                    } else {
                        true
                    }
                }
            },
            SessionState::Finishing => {
                session.fade -= fade_step;
                surface.clear();
                if session.fade <= 0.0 {
                    true
                } else {
                    session.engine.draw(surface, &session.card, session.fade);
                    false
                }
            }
            SessionState::Idle | SessionState::Done => true,
        };

        if finished {
            self.finish();
            false
        } else {
            true
        }
    }

    fn finish(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.state.transition(SessionState::Done);
        info!(
            "{} session {} finished after {:.0} ms ({} frames)",
            session.mode, session.id, session.clock.elapsed_ms, session.clock.frame
        );
        if !self.events.push(SessionEvent::Finished {
            session: session.id,
            mode: session.mode,
        }) {
            warn!("{} session {} ended twice", session.mode, session.id);
        }
    }

    /// Stop the active session and release its engine. Emits `Cancelled`.
    pub fn cancel(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        info!("{} session {} cancelled", session.mode, session.id);
        self.events.push(SessionEvent::Cancelled {
            session: session.id,
        });
        true
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }
}
