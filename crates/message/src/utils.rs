//! Utility macros shared by the message model.

/// Returns early with an error if a condition is not met.
///
/// Like `assert!`, but returns `Err($error)` instead of panicking. Used for the
/// validation checks of uri components, methods and stream states.
///
/// ```ignore
/// ensure!(!self.closed, StreamError::Detached);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
