use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out prompt request codes in `1..=65535`, wrapping around.
///
/// Codes only need to tell the current prompt's answer apart from a stale
/// one, so sequential allocation is enough.
#[derive(Debug, Default)]
pub struct RequestCodeAllocator {
    next: AtomicU32,
}

static GLOBAL: RequestCodeAllocator = RequestCodeAllocator::new();

impl RequestCodeAllocator {
    /// A fresh allocator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
        }
    }

    /// The process-wide allocator.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Next code.
    pub fn next_code(&self) -> u16 {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let code = n.wrapping_rem(u32::from(u16::MAX)).wrapping_add(1);
        u16::try_from(code).unwrap_or(1)
    }
}
