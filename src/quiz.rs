//! Random selection of the next unseen quiz question

use rand::Rng;
use std::collections::HashSet;

use crate::store::Question;

/// Category id meaning "questions from every category"
pub const ALL_CATEGORIES: i32 = 0;

/// Pick a random question from `pool` whose id is not in `previous`.
///
/// Returns `None` once every pool member has been served, including
/// when the pool is empty. Selection resamples until it lands on an
/// unseen question, which is fine for classroom-sized pools.
pub fn pick_question<'a, R: Rng + ?Sized>(
    pool: &'a [Question],
    previous: &HashSet<i32>,
    rng: &mut R,
) -> Option<&'a Question> {
    if pool.is_empty() {
        return None;
    }

    let served = pool.iter().filter(|q| previous.contains(&q.id)).count();
    if served == pool.len() {
        return None;
    }

    loop {
        let candidate = &pool[rng.gen_range(0..pool.len())];
        if !previous.contains(&candidate.id) {
            return Some(candidate);
        }
    }
}
