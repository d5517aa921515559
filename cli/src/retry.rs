//! Bounded retry loop

/// Errors that may succeed when the operation is attempted again
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Result of a retried operation that did not fail fatally
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Done(T),
    /// Every attempt failed with a retryable error; holds the last one
    Exhausted(E),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// A policy allowing `max_attempts` tries (at least one)
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    #[inline]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, fails fatally, or runs out of attempts.
    ///
    /// `op` receives the 1-based attempt number. After a retryable failure
    /// that still leaves attempts, `on_retry` gets the number of attempts left
    /// and the error.
    pub fn run<T, E, F, N>(&self, mut op: F, mut on_retry: N) -> Result<Outcome<T, E>, E>
    where
        E: Retryable,
        F: FnMut(u32) -> Result<T, E>,
        N: FnMut(u32, &E),
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(Outcome::Done(value)),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    let left = self.max_attempts - attempt;
                    if left == 0 {
                        return Ok(Outcome::Exhausted(err));
                    }
                    on_retry(left, &err);
                    attempt += 1;
                }
            }
        }
    }
}
