//! Move selection policy.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Hard cap on move associations per creature.
pub const MOVE_LIMIT: usize = 4;

/// Bounds a candidate move list to [`MOVE_LIMIT`] entries.
///
/// Lists within the bound come back unchanged, in their given order. Longer
/// lists are sampled uniformly without replacement; the order of the sample
/// is unspecified. Pure in its inputs: all randomness comes from `rng`.
pub fn select_moves<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Vec<String> {
    if candidates.len() <= MOVE_LIMIT {
        return candidates.to_vec();
    }

    candidates
        .choose_multiple(rng, MOVE_LIMIT)
        .cloned()
        .collect()
}
