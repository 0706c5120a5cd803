//! Single-use delivery slot.
//!
//! The slot owns the caller's callback. It is spent by the first successful
//! [`DeliverySlot::deliver`] and disarmed when the host reports destruction,
//! whichever comes first; after that the callback is gone and nothing can
//! fire it.

use std::sync::{Mutex, MutexGuard};

use permflow_core::Outcome;
use tracing::warn;

type Callback = Box<dyn FnOnce(Outcome) + Send>;

enum SlotState {
    Armed(Callback),
    Spent,
    Disarmed,
}

/// Holds a callback that fires at most once.
pub struct DeliverySlot {
    state: Mutex<SlotState>,
}

impl std::fmt::Debug for DeliverySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.lock() {
            SlotState::Armed(_) => "armed",
            SlotState::Spent => "spent",
            SlotState::Disarmed => "disarmed",
        };
        f.debug_struct("DeliverySlot").field("state", &state).finish()
    }
}

impl DeliverySlot {
    /// Arms a slot with `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self {
            state: Mutex::new(SlotState::Armed(Box::new(callback))),
        }
    }

    /// Fires the callback with `outcome` if the slot is still armed.
    ///
    /// The callback runs after the internal lock is released, so it may
    /// start another request. Returns whether the callback ran.
    pub fn deliver(&self, outcome: Outcome) -> bool {
        let callback = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, SlotState::Spent) {
                SlotState::Armed(callback) => callback,
                other => {
                    *state = other;
                    return false;
                },
            }
        };
        callback(outcome);
        true
    }

    /// Drops the callback without firing it. Returns whether it was armed.
    pub fn disarm(&self) -> bool {
        let mut state = self.lock();
        match &*state {
            SlotState::Armed(_) => {
                *state = SlotState::Disarmed;
                true
            },
            SlotState::Spent | SlotState::Disarmed => false,
        }
    }

    /// Whether the callback can still fire.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(&*self.lock(), SlotState::Armed(_))
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|e| {
            warn!("Delivery slot lock poisoned, recovering");
            e.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use permflow_core::{RequestSet, names};

    use super::*;

    fn counting_slot() -> (DeliverySlot, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let slot = DeliverySlot::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (slot, count)
    }

    fn outcome() -> Outcome {
        Outcome::all_granted(&RequestSet::from_iter([names::CAMERA]))
    }

    #[test]
    fn test_delivers_once() {
        let (slot, count) = counting_slot();
        assert!(slot.is_armed());
        assert!(slot.deliver(outcome()));
        assert!(!slot.deliver(outcome()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_disarm_prevents_delivery() {
        let (slot, count) = counting_slot();
        assert!(slot.disarm());
        assert!(!slot.deliver(outcome()));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!slot.disarm());
    }

    #[test]
    fn test_disarm_after_delivery_is_noop() {
        let (slot, count) = counting_slot();
        assert!(slot.deliver(outcome()));
        assert!(!slot.disarm());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_receives_outcome() {
        let seen = Arc::new(Mutex::new(None));
        let s = Arc::clone(&seen);
        let slot = DeliverySlot::new(move |o| {
            if let Ok(mut guard) = s.lock() {
                *guard = Some(o);
            }
        });
        slot.deliver(outcome());
        let guard = seen.lock().unwrap();
        assert_eq!(guard.as_ref(), Some(&outcome()));
    }

    #[test]
    fn test_callback_may_reenter_slot() {
        let slot = Arc::new(DeliverySlot::new(|_| {}));
        let inner = Arc::clone(&slot);
        let outer = DeliverySlot::new(move |o| {
            // Would deadlock if the lock were held during the callback.
            inner.deliver(o);
        });
        assert!(outer.deliver(outcome()));
        assert!(!slot.is_armed());
    }
}
