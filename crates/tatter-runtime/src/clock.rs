//! Frame clock driven by the host's refresh callback

/// Tracks session time from externally supplied frame timestamps.
///
/// The host calls [`FrameClock::tick`] once per display refresh with its own
/// monotonic timestamp; headless drivers use [`FrameClock::step`] instead.
pub struct FrameClock {
    /// Total elapsed session time in milliseconds
    pub elapsed_ms: f64,
    /// Time since last frame in milliseconds
    pub delta_ms: f64,
    /// Upper bound on a single frame delta
    pub max_frame_ms: f64,
    /// Number of frames ticked so far
    pub frame: u64,
    last_timestamp: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            elapsed_ms: 0.0,
            delta_ms: 0.0,
            max_frame_ms: 250.0,
            frame: 0,
            last_timestamp: None,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with a custom frame delta clamp
    pub fn with_max_frame(max_frame_ms: f64) -> Self {
        Self {
            max_frame_ms,
            ..Self::default()
        }
    }

    /// Advance to the host timestamp `now_ms`. Returns the frame delta.
    ///
    /// The first tick yields zero. Timestamps that go backwards or are not
    /// finite produce a zero delta rather than rewinding time.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            None => 0.0,
            Some(last) => {
                let d = now_ms - last;
                if d.is_finite() && d > 0.0 {
                    d.min(self.max_frame_ms)
                } else {
                    0.0
                }
            }
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }
        self.advance(delta)
    }

    /// Advance by a simulated delta, clamped like `tick`
    pub fn step(&mut self, delta_ms: f64) -> f64 {
        let delta = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, self.max_frame_ms)
        } else {
            0.0
        };
        self.advance(delta)
    }

    fn advance(&mut self, delta: f64) -> f64 {
        self.delta_ms = delta;
        self.elapsed_ms += delta;
        self.frame += 1;
        delta
    }
}
