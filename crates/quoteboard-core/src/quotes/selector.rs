//! Random quote selection.

use rand::Rng;
use thiserror::Error;

use super::types::Quote;

/// Message shown when a category has nothing to pick from.
pub const NO_QUOTES_MESSAGE: &str = "No quotes available in this category.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("No quotes available in this category.")]
    Empty,
}

/// Pick one quote uniformly at random.
///
/// The index is drawn from `[0, pool.len())`. Pass `rand::thread_rng()` for
/// normal use or a seeded RNG for reproducible runs.
pub fn pick_random<'a, R: Rng + ?Sized>(
    pool: &'a [Quote],
    rng: &mut R,
) -> Result<&'a Quote, SelectorError> {
    if pool.is_empty() {
        return Err(SelectorError::Empty);
    }
    let index = rng.gen_range(0..pool.len());
    Ok(&pool[index])
}
