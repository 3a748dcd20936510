//! Per-thread scratch buffers for the hot ε-closure / move-set path.
//!
//! Each thread driving a match keeps its own set of reusable scratch
//! vectors so that the NFA/DFA layer never allocates per character. Buffers
//! are handed out cleared and must be returned (via `Drop`) before another
//! caller on the same thread can borrow the same slot.

use std::cell::RefCell;

use super::StateID;

thread_local! {
    static CLOSURE_SCRATCH: RefCell<Vec<Vec<StateID>>> = const { RefCell::new(Vec::new()) };
    static MOVE_SCRATCH: RefCell<Vec<Vec<StateID>>> = const { RefCell::new(Vec::new()) };
}

/// A borrowed, cleared `Vec<StateID>` that returns itself to the thread-local
/// pool when dropped.
pub(crate) struct ScratchStates {
    buf: Vec<StateID>,
    pool: &'static std::thread::LocalKey<RefCell<Vec<Vec<StateID>>>>,
}

impl ScratchStates {
    #[inline]
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<StateID> {
        &mut self.buf
    }
}

impl std::ops::Deref for ScratchStates {
    type Target = Vec<StateID>;
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl std::ops::DerefMut for ScratchStates {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for ScratchStates {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        self.pool.with(|pool| pool.borrow_mut().push(buf));
    }
}

/// Borrow a cleared scratch buffer for ε-closure computation.
pub(crate) fn closure_scratch() -> ScratchStates {
    let buf = CLOSURE_SCRATCH.with(|pool| pool.borrow_mut().pop().unwrap_or_default());
    ScratchStates {
        buf,
        pool: &CLOSURE_SCRATCH,
    }
}

/// Borrow a cleared scratch buffer for move-set computation.
pub(crate) fn move_scratch() -> ScratchStates {
    let buf = MOVE_SCRATCH.with(|pool| pool.borrow_mut().pop().unwrap_or_default());
    ScratchStates {
        buf,
        pool: &MOVE_SCRATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_is_cleared_and_reused() {
        {
            let mut s = closure_scratch();
            s.as_mut_vec().push(StateID::new(3));
            assert_eq!(s.len(), 1);
        }
        let s = closure_scratch();
        assert!(s.is_empty());
    }
}
