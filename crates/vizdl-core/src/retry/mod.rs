//! Retry with a fixed delay.
//!
//! Wraps any fallible, repeatable operation (a catalog page fetch or an
//! artifact download) so that the pagination loop only sees the final
//! outcome. Every failure is treated as transient; the policy decides how
//! many more attempts are allowed and how long to wait between them.

mod error;
mod operation;
mod policy;
mod run;

pub use error::{FetchError, RetryExhausted};
pub use operation::Operation;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
