//! Structural self-checks for triangulations, laminations and encodings.
//!
//! Expensive checks run only in debug builds or with the `strict-invariants`
//! / `check-invariants` features; [`DebugInvariants::validate_invariants`]
//! is always available for callers that want to verify inputs up front.

use crate::surface_error::SurfaceError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), SurfaceError>;

    /// Validates and hands back `self` for chaining.
    fn validated(&self) -> Result<&Self, SurfaceError>
    where
        Self: Sized,
    {
        self.validate_invariants().map(|()| self)
    }
}

/// Helper macro to run a fallible check and panic on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Returns `SurfaceError::InvariantViolation` from the enclosing function
/// when `cond` is false.
#[macro_export]
macro_rules! ensure_invariant {
    ($cond:expr, $($fmt:tt)+) => {
        if !$cond {
            return Err($crate::surface_error::SurfaceError::InvariantViolation(format!($($fmt)+)));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Even(u32);

    impl DebugInvariants for Even {
        fn debug_assert_invariants(&self) {
            crate::debug_invariants!(self.validate_invariants(), "Even");
        }
        fn validate_invariants(&self) -> Result<(), SurfaceError> {
            crate::ensure_invariant!(self.0 % 2 == 0, "{} is odd", self.0);
            Ok(())
        }
    }

    #[test]
    fn ensure_reports_message() {
        assert_eq!(
            Even(3).validate_invariants(),
            Err(SurfaceError::InvariantViolation("3 is odd".into()))
        );
        assert!(Even(4).validated().is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    fn debug_assert_panics_in_debug_builds() {
        assert!(std::panic::catch_unwind(|| Even(5).debug_assert_invariants()).is_err());
        Even(6).debug_assert_invariants();
    }
}
