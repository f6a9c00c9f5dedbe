//! Re-entrancy guard for programmatic tree writes.

use std::cell::Cell;

/// Set while the editor tree is being replaced programmatically.
///
/// Update notifications that arrive while the guard is active come from
/// that replacement, not from the user, and must not reach extraction.
#[derive(Debug, Default)]
pub struct ConversionGuard {
    active: Cell<bool>,
}

impl ConversionGuard {
    pub const fn new() -> Self {
        Self {
            active: Cell::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Activate the guard until the returned scope is dropped.
    ///
    /// Dropping the scope restores the previous value, so nested scopes
    /// and early returns both leave the guard consistent.
    pub fn enter(&self) -> GuardScope<'_> {
        let previous = self.active.replace(true);
        GuardScope {
            guard: self,
            previous,
        }
    }
}

/// Keeps a [`ConversionGuard`] active while alive.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct GuardScope<'a> {
    guard: &'a ConversionGuard,
    previous: bool,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.active.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_starts_inactive() {
        assert!(!ConversionGuard::new().is_active());
    }

    #[test]
    fn test_scope_activates_and_releases() {
        let guard = ConversionGuard::new();
        {
            let _scope = guard.enter();
            assert!(guard.is_active());
        }
        assert!(!guard.is_active());
    }

    #[test]
    fn test_nested_scopes_restore_outer_state() {
        let guard = ConversionGuard::new();
        let outer = guard.enter();
        {
            let _inner = guard.enter();
            assert!(guard.is_active());
        }
        assert!(guard.is_active(), "inner scope must not clear the outer one");
        drop(outer);
        assert!(!guard.is_active());
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn failing(guard: &ConversionGuard) -> Result<(), &'static str> {
            let _scope = guard.enter();
            Err("render failed")
        }

        let guard = ConversionGuard::new();
        assert!(failing(&guard).is_err());
        assert!(!guard.is_active());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let guard = ConversionGuard::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = guard.enter();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!guard.is_active());
    }
}
