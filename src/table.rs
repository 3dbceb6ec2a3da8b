/*!
A bottom-up dynamic programming engine.

The [`TableMatcher`] fills a table with one row per haystack prefix length
and one column per pattern prefix length. Cell `(i, j)` records whether the
first `i` haystack symbols match the first `j` pattern tokens. The answer is
the cell in the last row and last column.

This engine always fills every cell, so it does more work than the
[`Backtracker`](crate::backtrack::Backtracker) on most inputs. Its appeal is
that it is trivially iterative with a fixed memory footprint, and that it
computes the same answer in a completely different way. The test suite runs
both engines over the same inputs and requires them to agree.

# Example

```
use regex_dotstar::{table::TableMatcher, util::syntax};

let re = TableMatcher::new(syntax::parse_bytes(b".*c")?);
assert!(re.is_match(b"abc"));
assert!(!re.is_match(b"ab"));
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use alloc::vec::Vec;

use crate::{
    error::{BuildError, MatchError},
    util::{
        pattern::{Pattern, Token},
        syntax,
    },
};

/// Returns true if and only if the given pattern matches all of `haystack`,
/// using the tabular engine.
pub fn is_match<T: PartialEq>(haystack: &[T], pattern: &Pattern<T>) -> bool {
    TableMatcher::new(pattern.clone()).is_match(haystack)
}

/// The configuration used for building a [`TableMatcher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    table_size_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set a limit on the number of cells a single search may fill.
    ///
    /// By default, there is no limit.
    pub fn table_size_limit(self, limit: Option<usize>) -> Config {
        Config { table_size_limit: Some(limit), ..self }
    }

    /// Returns the table size limit, if one is set.
    pub fn get_table_size_limit(&self) -> Option<usize> {
        self.table_size_limit.unwrap_or(None)
    }

    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config {
            table_size_limit: o.table_size_limit.or(self.table_size_limit),
        }
    }
}

/// A builder for a [`TableMatcher`].
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    syntax: syntax::Config,
}

impl Builder {
    /// Create a new builder with its default configuration.
    pub fn new() -> Builder {
        Builder {
            config: Config::default(),
            syntax: syntax::Config::default(),
        }
    }

    /// Build a table matcher from an already constructed pattern.
    pub fn build<T>(&self, pattern: Pattern<T>) -> TableMatcher<T> {
        TableMatcher { config: self.config, pattern }
    }

    /// Parse the given pattern string and build a table matcher over
    /// `char`s.
    pub fn build_str(
        &self,
        pattern: &str,
    ) -> Result<TableMatcher<char>, BuildError> {
        let pattern = syntax::parse_with(&self.syntax, pattern)?;
        Ok(self.build(pattern))
    }

    /// Parse the given pattern and build a table matcher over bytes.
    pub fn build_bytes(
        &self,
        pattern: &[u8],
    ) -> Result<TableMatcher<u8>, BuildError> {
        let pattern = syntax::parse_bytes_with(&self.syntax, pattern)?;
        Ok(self.build(pattern))
    }

    /// Apply the given table configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax configuration used when building from a string.
    pub fn syntax(&mut self, config: syntax::Config) -> &mut Builder {
        self.syntax = self.syntax.overwrite(config);
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

/// A tabular matcher for a single pattern.
///
/// Like the backtracker, a table matcher is immutable and keeps all search
/// state in a [`Cache`].
#[derive(Clone, Debug)]
pub struct TableMatcher<T> {
    config: Config,
    pattern: Pattern<T>,
}

impl<T> TableMatcher<T> {
    /// Create a table matcher for the given pattern with the default
    /// configuration.
    pub fn new(pattern: Pattern<T>) -> TableMatcher<T> {
        Builder::new().build(pattern)
    }

    /// Create a new cache for this table matcher.
    pub fn create_cache(&self) -> Cache {
        Cache::new()
    }

    /// Returns the pattern this table matcher matches.
    pub fn pattern(&self) -> &Pattern<T> {
        &self.pattern
    }

    /// Returns the configuration this table matcher was built with.
    pub fn get_config(&self) -> &Config {
        &self.config
    }
}

impl<T: PartialEq> TableMatcher<T> {
    /// Returns true if and only if this matcher's pattern matches the entire
    /// haystack.
    ///
    /// # Panics
    ///
    /// This panics if the search exceeds the configured
    /// [table size limit](Config::table_size_limit).
    ///
    /// The fallible version of this routine is
    /// [`try_is_match`](TableMatcher::try_is_match).
    pub fn is_match(&self, haystack: &[T]) -> bool {
        self.try_is_match(&mut self.create_cache(), haystack).unwrap()
    }

    /// Returns true if and only if this matcher's pattern matches the entire
    /// haystack, using the given cache for the table.
    pub fn try_is_match(
        &self,
        cache: &mut Cache,
        haystack: &[T],
    ) -> Result<bool, MatchError> {
        let tokens = self.pattern.tokens();
        let cells = MatchError::check_table(
            haystack.len(),
            tokens.len(),
            self.config.get_table_size_limit(),
        )?;
        let stride = tokens.len() + 1;
        cache.setup(cells);
        let table = &mut cache.table;

        // The empty haystack matches the empty pattern, and any pattern
        // prefix whose atoms are all repeated, since each of those atoms can
        // be taken zero times.
        table[0] = true;
        for j in 2..stride {
            if tokens[j - 1].is_repeat() {
                table[j] = table[j - 2];
            }
        }
        for i in 1..=haystack.len() {
            let sym = &haystack[i - 1];
            let (prev_row, row) = table[(i - 1) * stride..(i + 1) * stride]
                .split_at_mut(stride);
            for j in 1..stride {
                row[j] = match tokens[j - 1] {
                    // Patterns never start with a repetition, so j >= 2.
                    Token::Repeat => {
                        row[j - 2]
                            || (tokens[j - 2].matches(sym) && prev_row[j])
                    }
                    ref tok => tok.matches(sym) && prev_row[j - 1],
                };
            }
        }
        trace!("table search filled {} cells", cells);
        Ok(table[haystack.len() * stride + tokens.len()])
    }
}

/// Scratch space for a [`TableMatcher`] search.
///
/// The table is cleared at the start of every search.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    table: Vec<bool>,
}

impl Cache {
    /// Create a new empty cache.
    pub fn new() -> Cache {
        Cache::default()
    }

    /// Returns the heap memory, in bytes, used by this cache.
    pub fn memory_usage(&self) -> usize {
        self.table.capacity()
    }

    fn setup(&mut self, cells: usize) {
        self.table.clear();
        self.table.resize(cells, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(pattern: &str, haystack: &str) -> bool {
        let re = Builder::new().build_bytes(pattern.as_bytes()).unwrap();
        re.is_match(haystack.as_bytes())
    }

    #[test]
    fn examples() {
        assert!(bytes("", ""));
        assert!(!bytes("", "a"));
        assert!(!bytes("a", ""));
        assert!(bytes("a*", "aa"));
        assert!(!bytes("a*", "ab"));
        assert!(bytes(".*", "ab"));
        assert!(!bytes("mis*is*p*.", "mississippi"));
        assert!(!bytes(".*c", "ab"));
        assert!(bytes(".*c", "abc"));
        assert!(bytes("a*b*c*", ""));
        assert!(!bytes("a*b*c", ""));
    }

    #[test]
    fn empty_row_chain() {
        // The zero occurrence chain in the first row must stop at the first
        // atom that is not repeated, even when repeated atoms follow it.
        assert!(!bytes("a*bc*", ""));
        assert!(bytes("a*bc*", "b"));
        assert!(bytes("a*.*", ""));
    }

    #[test]
    fn cache_reuse() {
        let re = Builder::new().build_bytes(b"x.*y").unwrap();
        let mut cache = re.create_cache();
        assert_eq!(Ok(true), re.try_is_match(&mut cache, b"x123y"));
        assert_eq!(Ok(false), re.try_is_match(&mut cache, b"xy1"));
        assert_eq!(Ok(true), re.try_is_match(&mut cache, b"xy"));
        assert_eq!(Ok(false), re.try_is_match(&mut cache, b""));
        assert!(cache.memory_usage() >= 3 * 5);
    }

    #[test]
    fn table_size_limit() {
        let mut builder = Builder::new();
        builder.configure(Config::new().table_size_limit(Some(9)));
        let re = builder.build_str("a.").unwrap();
        let mut cache = re.create_cache();
        assert_eq!(Ok(true), re.try_is_match(&mut cache, &['a', 'b']));
        assert_eq!(
            Err(MatchError::TableTooBig { cells: 12, limit: 9 }),
            re.try_is_match(&mut cache, &['a', 'b', 'c']),
        );
    }
}
