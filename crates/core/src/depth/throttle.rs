/// Coalesces raw scroll notifications into at most one evaluation per
/// animation frame.
///
/// The host calls [`notify`](ScrollThrottle::notify) from its scroll handler
/// and requests an animation frame only when it returns `true`. The frame
/// callback then calls [`take`](ScrollThrottle::take) to get the latest
/// offset.
#[derive(Debug, Clone, Default)]
pub struct ScrollThrottle {
    pending: Option<f64>,
    frame_requested: bool,
}

impl ScrollThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the newest offset. Returns `true` when no frame is outstanding.
    pub fn notify(&mut self, offset: f64) -> bool {
        self.pending = Some(offset);
        if self.frame_requested {
            false
        } else {
            self.frame_requested = true;
            true
        }
    }

    /// Consume the latest offset, if any arrived since the last frame.
    pub fn take(&mut self) -> Option<f64> {
        self.frame_requested = false;
        self.pending.take()
    }

    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }
}
