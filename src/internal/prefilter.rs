//! First-character index: a map from a candidate start character to the set
//! of patterns that can legally begin a match there.
//!
//! `start_chars(p)` can denote "every character except a handful" for
//! patterns built on `.` or negated classes, so this is not a literal
//! `HashMap<char, Vec<PatternID>>` over all of Unicode (§4.3): ASCII code
//! points get a dense 128-entry table, anything above that falls back to
//! evaluating each pattern's own start-character predicate.

use std::sync::Arc;

use super::PatternID;

/// A pattern's start-character predicate, shared so it can be consulted
/// both while building the dense ASCII table and as the non-ASCII fallback.
pub(crate) type StartCharPredicate = Arc<dyn Fn(char) -> bool + Send + Sync>;

#[derive(Clone)]
pub(crate) struct FirstCharIndex {
    ascii: Vec<Vec<PatternID>>,
    predicates: Vec<(PatternID, StartCharPredicate)>,
}

impl FirstCharIndex {
    pub(crate) fn build(predicates: Vec<(PatternID, StartCharPredicate)>) -> Self {
        let mut ascii = vec![Vec::new(); 128];
        for (id, predicate) in &predicates {
            for (b, bucket) in ascii.iter_mut().enumerate() {
                if let Some(c) = char::from_u32(b as u32) {
                    if predicate(c) {
                        bucket.push(*id);
                    }
                }
            }
        }
        Self { ascii, predicates }
    }

    /// The patterns that may legally start a match at `c`.
    pub(crate) fn candidates(&self, c: char) -> Vec<PatternID> {
        if (c as u32) < 128 {
            self.ascii[c as usize].clone()
        } else {
            self.predicates
                .iter()
                .filter(|(_, predicate)| predicate(c))
                .map(|(id, _)| *id)
                .collect()
        }
    }
}
