//! Constant-delay retry around a single transport attempt.

use std::thread;

use log::debug;

use crate::request::RequestConfig;
use crate::{Error, Result};

/// Run `attempt` up to `max_retries + 1` times.
///
/// Only transport-class failures ([`Error::is_transient`]) are replayed;
/// everything else aborts immediately. The delay between attempts is
/// constant — there is no backoff growth. Once the budget is spent, the last
/// failure is wrapped in [`Error::RetriesExhausted`] with the total attempt
/// count.
pub fn run_with_retry<T>(
    config: &RequestConfig,
    mut attempt: impl FnMut() -> Result<T>,
) -> Result<T> {
    let total = config.max_retries.saturating_add(1);
    let mut round: u32 = 0;
    loop {
        round += 1;
        let err = match attempt() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => err,
            Err(err) => return Err(err),
        };
        if round >= total {
            return Err(Error::RetriesExhausted {
                attempts: total,
                source: Box::new(err),
            });
        }
        debug!("attempt {round}/{total} failed, retrying: {err}");
        if !config.retry_delay.is_zero() {
            thread::sleep(config.retry_delay);
        }
    }
}
