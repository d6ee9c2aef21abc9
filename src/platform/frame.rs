//! Frame scheduling bookkeeping
//!
//! Mirrors the host's display-refresh primitive: at most one frame is pending
//! at a time, cancelling hands the pending token back, and a token that is no
//! longer pending is ignored when it fires.

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

#[derive(Debug, Default)]
pub struct FrameLoop {
    next_id: u64,
    pending: Option<FrameToken>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the next frame. Returns `None` if one is already pending.
    pub fn schedule(&mut self) -> Option<FrameToken> {
        if self.pending.is_some() {
            return None;
        }
        let token = FrameToken(self.next_id);
        self.next_id += 1;
        self.pending = Some(token);
        Some(token)
    }

    /// Drop the pending request, if any
    pub fn cancel(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    /// Consume `token` if it is the pending frame
    pub fn fire(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}
