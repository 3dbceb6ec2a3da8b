/*!
A quick way to reject haystacks that cannot possibly match a byte pattern.

Every atom that is not repeated consumes exactly one haystack byte, and the
atoms consume bytes in order. So if a pattern has literal atoms that are not
repeated, those bytes must appear in the haystack in the same order. The
number of non-repeated atoms is also a lower bound on the haystack length,
and a pattern without any repetition matches only haystacks of exactly its
own length.

A prefilter never reports a false negative: if it says a match is
impossible, then no engine would have found one. It is only ever used to
skip running an engine.
*/

use alloc::vec::Vec;

use crate::util::pattern::Pattern;

/// A necessary condition for a byte pattern to match a haystack.
#[derive(Clone, Debug)]
pub struct Prefilter {
    /// The literal bytes of non-repeated atoms, in pattern order.
    needles: Vec<u8>,
    /// The number of non-repeated atoms.
    min_len: usize,
    /// The exact haystack length required, when the pattern has no
    /// repetition.
    exact_len: Option<usize>,
}

impl Prefilter {
    /// Build a prefilter for the given pattern.
    ///
    /// When the pattern places no constraint on the haystack at all (for
    /// example, `.*`), there is nothing to check and `None` is returned.
    pub fn new(pattern: &Pattern<u8>) -> Option<Prefilter> {
        let needles: Vec<u8> = pattern
            .atoms()
            .filter(|a| !a.is_repeated())
            .filter_map(|a| a.token().literal().copied())
            .collect();
        let min_len = pattern.min_len();
        let exact_len =
            if pattern.has_repetition() { None } else { Some(pattern.len()) };
        if needles.is_empty() && min_len == 0 && exact_len.is_none() {
            debug!("prefilter building failed: pattern can match anything");
            return None;
        }
        debug!(
            "prefilter built: {} required literal bytes, min length {}",
            needles.len(),
            min_len,
        );
        Some(Prefilter { needles, min_len, exact_len })
    }

    /// Returns false only when the given haystack cannot match the pattern
    /// this prefilter was built from.
    pub fn is_possible(&self, haystack: &[u8]) -> bool {
        if haystack.len() < self.min_len {
            return false;
        }
        if self.exact_len.map_or(false, |len| len != haystack.len()) {
            return false;
        }
        let mut at = 0;
        for &needle in self.needles.iter() {
            match memchr::memchr(needle, &haystack[at..]) {
                None => return false,
                Some(i) => at += i + 1,
            }
        }
        true
    }

    /// Returns the heap memory, in bytes, used by this prefilter.
    pub fn memory_usage(&self) -> usize {
        self.needles.len()
    }
}
