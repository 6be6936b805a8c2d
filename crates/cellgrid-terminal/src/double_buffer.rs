//! Two-slot buffer arena with an atomic front index.
//!
//! The producing side of a stage fills the back slot while the consuming
//! side reads the front slot, and [`DoubleBuffer::swap`] exchanges them.
//! The pipeline's handoff flags guarantee that a swap only happens while
//! the consumer is idle, so each slot has exactly one user at a time and
//! its mutex is never contended.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A pair of `T` where one is "front" and the other is "back".
#[derive(Debug, Default)]
pub struct DoubleBuffer<T> {
    slots: [Mutex<T>; 2],
    front: AtomicUsize,
}

impl<T> DoubleBuffer<T> {
    /// Create from two initial values. `front` starts as the front slot.
    pub fn new(front: T, back: T) -> Self {
        Self {
            slots: [Mutex::new(front), Mutex::new(back)],
            front: AtomicUsize::new(0),
        }
    }

    /// Lock the slot currently in front.
    pub fn front(&self) -> MutexGuard<'_, T> {
        lock(&self.slots[self.front.load(Ordering::Acquire)])
    }

    /// Lock the slot currently in back.
    pub fn back(&self) -> MutexGuard<'_, T> {
        lock(&self.slots[1 - self.front.load(Ordering::Acquire)])
    }

    /// Exchange front and back.
    pub fn swap(&self) {
        self.front.fetch_xor(1, Ordering::AcqRel);
    }

    /// Apply `f` to both slots.
    pub fn for_each(&self, mut f: impl FnMut(&mut T)) {
        for slot in &self.slots {
            f(&mut lock(slot));
        }
    }
}

/// Lock a slot, ignoring poison: slots hold plain buffers with no
/// cross-field invariant.
fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_front_and_back_start_distinct() {
        let buf = DoubleBuffer::new(1, 2);
        assert_eq!(*buf.front(), 1);
        assert_eq!(*buf.back(), 2);
    }

    #[test]
    fn test_swap_exchanges_roles() {
        let buf = DoubleBuffer::new("a", "b");
        buf.swap();
        assert_eq!(*buf.front(), "b");
        assert_eq!(*buf.back(), "a");
        buf.swap();
        assert_eq!(*buf.front(), "a");
    }

    #[test]
    fn test_back_writes_become_front_after_swap() {
        let buf = DoubleBuffer::new(Vec::new(), Vec::new());
        buf.back().push(7u8);
        assert!(buf.front().is_empty());
        buf.swap();
        assert_eq!(*buf.front(), vec![7]);
    }

    #[test]
    fn test_for_each_touches_both() {
        let buf = DoubleBuffer::new(1, 2);
        buf.for_each(|v| *v *= 10);
        assert_eq!(*buf.front(), 10);
        assert_eq!(*buf.back(), 20);
    }

    #[test]
    fn test_poisoned_slot_is_recovered() {
        let buf = Arc::new(DoubleBuffer::new(0, 0));
        let clone = Arc::clone(&buf);
        let _ = thread::spawn(move || {
            let _guard = clone.front();
            panic!("poison the front slot");
        })
        .join();
        *buf.front() = 5;
        assert_eq!(*buf.front(), 5);
    }
}
