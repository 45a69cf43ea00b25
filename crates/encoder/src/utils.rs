//! Utility macros and functions for the encoder crate.
//!
//! This module provides helper macros and functions that are used internally
//! by the encoder implementation.

use bytes::{Buf, BufMut, Bytes};

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(headers.len() <= max_header_num, EncodeError::too_many_headers(max_header_num));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Copies as much of `src` as `dst` can take and advances `src` past the copied bytes.
///
/// Returns `true` once `src` is fully drained, so callers can resume from the
/// exact next byte on the following call when it returns `false`.
pub(crate) fn write_some<B: BufMut>(src: &mut Bytes, dst: &mut B) -> bool {
    let n = src.len().min(dst.remaining_mut());
    if n > 0 {
        dst.put_slice(&src[..n]);
        src.advance(n);
    }
    src.is_empty()
}
