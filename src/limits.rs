//! Decode-side resource limits.
//!
//! The codec itself holds no configuration; callers that accept untrusted
//! input pick a [`Limits`] value per decode call.

/// Default maximum nesting of composite values during decode.
pub const DEFAULT_MAX_DEPTH: u32 = 200;

/// Bounds applied to a single decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// How many struct/union levels may be entered before decoding fails
    /// with [`Error::DepthLimitExceeded`](crate::Error::DepthLimitExceeded).
    pub depth: u32,
    /// Total bytes the reader may consume before failing with
    /// [`Error::LimitExceeded`](crate::Error::LimitExceeded).
    pub len: usize,
}

impl Limits {
    /// No depth or length bound at all.
    pub const fn none() -> Self {
        Limits {
            depth: u32::MAX,
            len: usize::MAX,
        }
    }

    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub const fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            depth: DEFAULT_MAX_DEPTH,
            len: usize::MAX,
        }
    }
}
