//! Allocation failure policy.
//!
//! Slot value arrays, growth of a [`DStr`](crate::DStr) and the scratch
//! space of [`mgsort`](crate::mgsort) go through the helpers here. When an
//! allocation cannot be satisfied the installed failure handler runs. The
//! default handler reports the problem and terminates the process; a caller
//! may install one that returns, in which case the operation that failed is
//! abandoned and the affected data is left as it was.

use std::sync::RwLock;

use crate::error::{Error, Result};

/// Failure handler signature.
pub type PanicFn = fn(&str);

static PANIC: RwLock<PanicFn> = RwLock::new(default_panic);

fn default_panic(msg: &str) {
    tracing::error!("{}", msg);
    eprintln!("{}", msg);
    std::process::exit(1);
}

/// Install `f` as the allocation failure handler and return the previous one.
pub fn set_panic(f: PanicFn) -> PanicFn {
    let mut guard = PANIC.write().unwrap_or_else(|e| e.into_inner());
    std::mem::replace(&mut *guard, f)
}

/// Restore the default (terminating) failure handler.
pub fn reset_panic() {
    set_panic(default_panic);
}

pub(crate) fn panic(msg: &str) {
    let f = *PANIC.read().unwrap_or_else(|e| e.into_inner());
    f(msg);
}

/// Allocate an empty string able to hold `cap` bytes.
pub(crate) fn xstring(cap: usize) -> Result<String> {
    let mut s = String::new();
    if injected_failure() || s.try_reserve_exact(cap).is_err() {
        panic("Out of memory!");
        return Err(Error::OutOfMemory);
    }
    Ok(s)
}

/// Allocate an empty vector able to hold `cap` elements.
pub(crate) fn xvec<T>(cap: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    if injected_failure() || v.try_reserve_exact(cap).is_err() {
        panic("Out of memory!");
        return Err(Error::OutOfMemory);
    }
    Ok(v)
}

/// A vector holding `len` copies of `value`.
pub(crate) fn xfilled<T: Clone>(value: T, len: usize) -> Result<Vec<T>> {
    let mut v = xvec(len)?;
    v.resize(len, value);
    Ok(v)
}

#[cfg(not(test))]
#[inline]
fn injected_failure() -> bool {
    false
}

#[cfg(test)]
thread_local! {
    static FAIL_AFTER: std::cell::Cell<Option<usize>> = const { std::cell::Cell::new(None) };
}

#[cfg(test)]
fn injected_failure() -> bool {
    FAIL_AFTER.with(|left| match left.get() {
        Some(0) => {
            left.set(None);
            true
        }
        Some(n) => {
            left.set(Some(n - 1));
            false
        }
        None => false,
    })
}

/// Make the allocation after the next `n` on this thread fail.
#[cfg(test)]
pub(crate) fn fail_allocation_after(n: usize) {
    FAIL_AFTER.with(|left| left.set(Some(n)));
}

/// Serialises tests that swap the global failure handler.
#[cfg(test)]
static HANDLER_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Run `f` with a failure handler that returns instead of exiting.
#[cfg(test)]
pub(crate) fn with_quiet_handler<R>(f: impl FnOnce() -> R) -> R {
    fn quiet(_: &str) {}
    let _guard = HANDLER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let prev = set_panic(quiet);
    let out = f();
    set_panic(prev);
    FAIL_AFTER.with(|left| left.set(None));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_allocations_succeed() {
        assert!(xstring(64).unwrap().capacity() >= 64);
        assert!(xvec::<u64>(16).unwrap().capacity() >= 16);
        assert_eq!(xfilled(7u8, 3).unwrap(), vec![7, 7, 7]);
    }

    #[test]
    fn impossible_allocation_reports_out_of_memory() {
        let r = with_quiet_handler(|| xvec::<u64>(usize::MAX / 2));
        assert!(matches!(r, Err(Error::OutOfMemory)));
        let r = with_quiet_handler(|| xfilled(String::new(), usize::MAX / 2));
        assert!(matches!(r, Err(Error::OutOfMemory)));
    }

    #[test]
    fn injected_failure_hits_the_chosen_allocation() {
        with_quiet_handler(|| {
            fail_allocation_after(1);
            assert!(xstring(8).is_ok());
            assert!(matches!(xstring(8), Err(Error::OutOfMemory)));
            assert!(xstring(8).is_ok());
        });
    }
}
