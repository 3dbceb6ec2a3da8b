use crate::util::escape::DebugSymbol;

/// An error that occurs when a pattern is constructed or parsed.
///
/// This error does not provide many introspection capabilities. There are
/// generally only two things you can do with it:
///
/// * Obtain a human readable message via its `std::fmt::Display` impl.
/// * Ask for the offset of the token that caused the error, if there is one,
/// via [`BuildError::offset`].
///
/// A pattern is rejected when its repetition token has nothing to repeat,
/// i.e., when the very first token is a repetition or when a repetition
/// immediately follows another repetition. A [`syntax::Config`] is rejected
/// when its reserved symbols cannot be told apart from each other.
///
/// [`syntax::Config`]: crate::util::syntax::Config
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildError {
    kind: BuildErrorKind,
}

/// The kind of error that occurred while building a pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
enum BuildErrorKind {
    /// The pattern starts with a repetition token.
    LeadingRepetition,
    /// A repetition token directly follows another repetition token. The
    /// offset points at the second one.
    RepeatedRepetition { offset: usize },
    /// The wildcard and repetition symbols of a syntax configuration are
    /// the same symbol.
    ReservedConflict { symbol: u8 },
    /// A reserved symbol is not ASCII, which means it cannot be recognized
    /// as a single byte when parsing a byte oriented pattern.
    NonAsciiReserved { symbol: u8 },
}

impl BuildError {
    /// Returns the offset of the pattern token responsible for this error.
    ///
    /// Errors that come from a bad syntax configuration rather than a bad
    /// pattern have no offset.
    pub fn offset(&self) -> Option<usize> {
        match self.kind {
            BuildErrorKind::LeadingRepetition => Some(0),
            BuildErrorKind::RepeatedRepetition { offset } => Some(offset),
            BuildErrorKind::ReservedConflict { .. }
            | BuildErrorKind::NonAsciiReserved { .. } => None,
        }
    }

    /// Returns true if and only if this error was caused by a malformed
    /// pattern, as opposed to an invalid syntax configuration.
    pub fn is_malformed_pattern(&self) -> bool {
        match self.kind {
            BuildErrorKind::LeadingRepetition
            | BuildErrorKind::RepeatedRepetition { .. } => true,
            _ => false,
        }
    }

    pub(crate) fn leading_repetition() -> BuildError {
        BuildError { kind: BuildErrorKind::LeadingRepetition }
    }

    pub(crate) fn repeated_repetition(offset: usize) -> BuildError {
        BuildError { kind: BuildErrorKind::RepeatedRepetition { offset } }
    }

    pub(crate) fn reserved_conflict(symbol: u8) -> BuildError {
        BuildError { kind: BuildErrorKind::ReservedConflict { symbol } }
    }

    pub(crate) fn non_ascii_reserved(symbol: u8) -> BuildError {
        BuildError { kind: BuildErrorKind::NonAsciiReserved { symbol } }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            BuildErrorKind::LeadingRepetition => write!(
                f,
                "malformed pattern: repetition at offset 0 has no \
                 preceding atom to repeat",
            ),
            BuildErrorKind::RepeatedRepetition { offset } => write!(
                f,
                "malformed pattern: repetition at offset {} directly \
                 follows another repetition",
                offset,
            ),
            BuildErrorKind::ReservedConflict { symbol } => write!(
                f,
                "wildcard and repetition symbols must differ, but both \
                 are {:?}",
                DebugSymbol(symbol),
            ),
            BuildErrorKind::NonAsciiReserved { symbol } => write!(
                f,
                "reserved symbol {:?} is not ASCII",
                DebugSymbol(symbol),
            ),
        }
    }
}

/// An error that occurs when a search could not run to completion.
///
/// Searches are total over well formed patterns, so the only way to see
/// this error is to configure a limit on the size of the table a search is
/// permitted to allocate. The default configuration of [`Backtracker`] and
/// [`TableMatcher`] has no limit and never returns an error. The default
/// configuration of [`meta::Regex`] does set a limit.
///
/// [`Backtracker`]: crate::backtrack::Backtracker
/// [`TableMatcher`]: crate::table::TableMatcher
/// [`meta::Regex`]: crate::meta::Regex
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MatchError {
    /// The search would need a table with more cells than the configured
    /// limit. A table has `(haystack_len + 1) * (pattern_len + 1)` cells.
    TableTooBig {
        /// The number of cells the search would have needed.
        cells: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl MatchError {
    /// Checks the table shape implied by the given lengths against an
    /// optional limit.
    pub(crate) fn check_table(
        haystack_len: usize,
        pattern_len: usize,
        limit: Option<usize>,
    ) -> Result<usize, MatchError> {
        // Saturate so that absurd lengths trip the limit instead of
        // wrapping around to something small.
        let cells = haystack_len
            .saturating_add(1)
            .saturating_mul(pattern_len.saturating_add(1));
        match limit {
            Some(limit) if cells > limit => {
                Err(MatchError::TableTooBig { cells, limit })
            }
            _ => Ok(cells),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            MatchError::TableTooBig { cells, limit } => write!(
                f,
                "search needs a table of {} cells, which exceeds the \
                 limit of {}",
                cells, limit,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets() {
        assert_eq!(Some(0), BuildError::leading_repetition().offset());
        assert_eq!(Some(3), BuildError::repeated_repetition(3).offset());
        assert_eq!(None, BuildError::reserved_conflict(b'.').offset());
        assert!(!BuildError::non_ascii_reserved(0xFF).is_malformed_pattern());
    }

    #[test]
    fn table_limit() {
        assert_eq!(Ok(12), MatchError::check_table(2, 3, None));
        assert_eq!(Ok(12), MatchError::check_table(2, 3, Some(12)));
        assert_eq!(
            Err(MatchError::TableTooBig { cells: 12, limit: 11 }),
            MatchError::check_table(2, 3, Some(11)),
        );
        assert_eq!(
            Err(MatchError::TableTooBig { cells: usize::MAX, limit: 100 }),
            MatchError::check_table(usize::MAX, 5, Some(100)),
        );
    }

    #[test]
    fn display() {
        let msg = BuildError::non_ascii_reserved(0xFF).to_string();
        assert_eq!(r"reserved symbol b'\xFF' is not ASCII", msg);
        let msg = BuildError::reserved_conflict(b'*').to_string();
        assert!(msg.ends_with("both are b'*'"), "{}", msg);
    }
}
