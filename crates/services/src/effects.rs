//! Non-critical side effects.
//!
//! History writes and object-storage cleanup must never fail the main
//! operation; they are logged at error level and swallowed here.

use std::fmt::Display;
use std::future::Future;

/// Await a side effect, logging and discarding any error.
pub async fn best_effort<F, T, E>(what: &'static str, fut: F)
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    if let Err(e) = fut.await {
        tracing::error!(error = %e, what, "non-critical side effect failed");
    }
}
