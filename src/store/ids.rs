//! Short human-typeable item references (`LF-1234`).

use std::collections::HashSet;

use rand::Rng;

pub const ID_PREFIX: &str = "LF-";
const ID_MIN: u16 = 1000;
const ID_MAX: u16 = 9999;

/// Random draws before falling back to a scan for the lowest free number.
const MAX_RANDOM_ATTEMPTS: usize = 32;

fn format_id(n: u16) -> String {
    format!("{}{}", ID_PREFIX, n)
}

/// Pick an id not present in `taken`.
///
/// Returns `None` only when all 9000 references are in use.
pub fn generate_item_id<R: Rng + ?Sized>(rng: &mut R, taken: &HashSet<&str>) -> Option<String> {
    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let candidate = format_id(rng.gen_range(ID_MIN..=ID_MAX));
        if !taken.contains(candidate.as_str()) {
            return Some(candidate);
        }
    }

    tracing::debug!(
        taken = taken.len(),
        "Random item ids kept colliding, scanning for a free one"
    );

    (ID_MIN..=ID_MAX)
        .map(format_id)
        .find(|candidate| !taken.contains(candidate.as_str()))
}
