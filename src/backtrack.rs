/*!
A memoized backtracking engine.

The [`Backtracker`] answers "does the pattern match the entire haystack?" by
case analysis over search states. A state is a pair of a haystack offset and
a pattern offset. From each state the engine either accepts, rejects or
moves to one or two successor states:

* At the end of the pattern, the state accepts only at the end of the
haystack.
* When the atom at the pattern offset is repeated, the state accepts if
skipping the atom entirely accepts, or if the atom matches the next haystack
symbol and the state one symbol further along (with the same pattern offset)
accepts. The second branch is only explored when the first one fails.
* Otherwise, the atom must match the next haystack symbol and the state
advanced by one in both the haystack and the pattern must accept.

Every state's verdict is recorded in a [`Cache`] the first time it is
computed, so each state is evaluated at most once. This bounds a search to
`O(haystack_len * pattern_len)` time and memory, where a naive backtracker
would take exponential time on patterns like `a*a*a*a*b`.

The search does not recurse on the call stack. Pending states are kept on an
explicit stack inside the cache, so long haystacks cannot overflow the
thread's stack.

# Example

```
use regex_dotstar::{backtrack::Backtracker, util::syntax};

let re = Backtracker::new(syntax::parse_bytes(b"mis*is*ip*.")?);
assert!(re.is_match(b"mississippi"));
assert!(!re.is_match(b"mississippiz"));
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use alloc::vec::Vec;

use crate::{
    error::{BuildError, MatchError},
    util::{pattern::Pattern, syntax},
};

/// Returns true if and only if the given pattern matches all of `haystack`,
/// using the memoized backtracker.
///
/// This allocates a fresh cache for the search. To amortize allocation over
/// many searches, build a [`Backtracker`] and use
/// [`Backtracker::try_is_match`] with a reused [`Cache`].
///
/// # Example
///
/// ```
/// use regex_dotstar::{backtrack, util::syntax};
///
/// let pat = syntax::parse("a*b*c*")?;
/// let empty: &[char] = &[];
/// assert!(backtrack::is_match(empty, &pat));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn is_match<T: PartialEq>(haystack: &[T], pattern: &Pattern<T>) -> bool {
    Backtracker::new(pattern.clone()).is_match(haystack)
}

/// The configuration used for building a [`Backtracker`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    table_size_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default backtracker configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set a limit on the number of memo table entries a single search may
    /// use.
    ///
    /// A search needs `(haystack_len + 1) * (pattern_len + 1)` entries. When
    /// a search would exceed this limit, it fails with
    /// [`MatchError::TableTooBig`] before allocating anything.
    ///
    /// By default, there is no limit.
    pub fn table_size_limit(self, limit: Option<usize>) -> Config {
        Config { table_size_limit: Some(limit), ..self }
    }

    /// Returns the table size limit, if one is set.
    pub fn get_table_size_limit(&self) -> Option<usize> {
        self.table_size_limit.unwrap_or(None)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config {
            table_size_limit: o.table_size_limit.or(self.table_size_limit),
        }
    }
}

/// A builder for a [`Backtracker`].
///
/// The builder carries a backtracker [`Config`] and a [`syntax::Config`],
/// the latter being used only when building from a pattern string.
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    syntax: syntax::Config,
}

impl Builder {
    /// Create a new backtracker builder with its default configuration.
    pub fn new() -> Builder {
        Builder {
            config: Config::default(),
            syntax: syntax::Config::default(),
        }
    }

    /// Build a backtracker from an already constructed pattern.
    pub fn build<T>(&self, pattern: Pattern<T>) -> Backtracker<T> {
        Backtracker { config: self.config, pattern }
    }

    /// Parse the given pattern string and build a backtracker over `char`s.
    pub fn build_str(
        &self,
        pattern: &str,
    ) -> Result<Backtracker<char>, BuildError> {
        let pattern = syntax::parse_with(&self.syntax, pattern)?;
        Ok(self.build(pattern))
    }

    /// Parse the given pattern and build a backtracker over bytes.
    pub fn build_bytes(
        &self,
        pattern: &[u8],
    ) -> Result<Backtracker<u8>, BuildError> {
        let pattern = syntax::parse_bytes_with(&self.syntax, pattern)?;
        Ok(self.build(pattern))
    }

    /// Apply the given backtracker configuration options to this builder.
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

/// A memoized backtracking matcher for a single pattern.
///
/// A backtracker is immutable once built. All mutable state used during a
/// search lives in a [`Cache`], so a single backtracker may be shared by
/// many threads as long as each thread uses its own cache.
#[derive(Clone, Debug)]
pub struct Backtracker<T> {
    config: Config,
    pattern: Pattern<T>,
}

impl<T> Backtracker<T> {
    /// Create a backtracker for the given pattern with the default
    /// configuration.
    pub fn new(pattern: Pattern<T>) -> Backtracker<T> {
        Builder::new().build(pattern)
    }

    /// Create a new cache for this backtracker.
    ///
    /// The cache starts empty and grows to fit the first search it is used
    /// with.
    pub fn create_cache(&self) -> Cache {
        Cache::new()
    }

    /// Returns the pattern this backtracker matches.
    pub fn pattern(&self) -> &Pattern<T> {
        &self.pattern
    }

    /// Returns the configuration this backtracker was built with.
    pub fn get_config(&self) -> &Config {
        &self.config
    }
}

impl<T: PartialEq> Backtracker<T> {
    /// Returns true if and only if this backtracker's pattern matches the
    /// entire haystack.
    ///
    /// This allocates a fresh cache for every call. Use
    /// [`Backtracker::try_is_match`] to reuse one.
    ///
    /// # Panics
    ///
    /// This panics if the search exceeds the configured
    /// [table size limit](Config::table_size_limit). This never happens with
    /// the default configuration.
    ///
    /// The fallible version of this routine is
    /// [`try_is_match`](Backtracker::try_is_match).
    pub fn is_match(&self, haystack: &[T]) -> bool {
        self.try_is_match(&mut self.create_cache(), haystack).unwrap()
    }

    /// Returns true if and only if this backtracker's pattern matches the
    /// entire haystack, using the given cache for scratch space.
    ///
    /// Whatever the cache holds from a previous search is discarded before
    /// this search starts, so a cache may be reused with any haystack.
    ///
    /// # Errors
    ///
    /// This returns [`MatchError::TableTooBig`] if the search needs more
    /// memo entries than the configured limit allows.
    pub fn try_is_match(
        &self,
        cache: &mut Cache,
        haystack: &[T],
    ) -> Result<bool, MatchError> {
        let tokens = self.pattern.len();
        let cells = MatchError::check_table(
            haystack.len(),
            tokens,
            self.config.get_table_size_limit(),
        )?;
        cache.setup(cells, tokens + 1);
        cache.stack.push((0, 0));
        #[cfg(feature = "logging")]
        let mut evaluated = 0;
        while let Some(&(at, pc)) = cache.stack.last() {
            if cache.get(at, pc).is_some() {
                cache.stack.pop();
                continue;
            }
            match self.step(cache, haystack, at, pc) {
                Step::Done(yes) => {
                    cache.set(at, pc, yes);
                    cache.stack.pop();
                    #[cfg(feature = "logging")]
                    {
                        evaluated += 1;
                    }
                }
                Step::Need(next_at, next_pc) => {
                    cache.stack.push((next_at, next_pc));
                }
            }
        }
        trace!(
            "backtrack search evaluated {} of {} states",
            evaluated,
            cells,
        );
        Ok(cache.get(0, 0) == Some(true))
    }

    /// Computes the verdict for the given state if every state it depends on
    /// already has one. Otherwise, returns the next state that must be
    /// evaluated first.
    ///
    /// Every successor state advances the haystack offset, the pattern
    /// offset or both. So the pending states on the stack can never form a
    /// cycle.
    fn step(
        &self,
        cache: &Cache,
        haystack: &[T],
        at: usize,
        pc: usize,
    ) -> Step {
        let tokens = self.pattern.tokens();
        if pc == tokens.len() {
            return Step::Done(at == haystack.len());
        }
        let first =
            haystack.get(at).map_or(false, |sym| tokens[pc].matches(sym));
        if self.pattern.is_repeated(pc) {
            // Zero occurrences: skip over the atom and its repetition.
            match cache.get(at, pc + 2) {
                None => return Step::Need(at, pc + 2),
                Some(true) => return Step::Done(true),
                Some(false) => {}
            }
            if !first {
                return Step::Done(false);
            }
            // One more occurrence, staying on the same atom.
            Step::after(cache, at + 1, pc)
        } else {
            if !first {
                return Step::Done(false);
            }
            Step::after(cache, at + 1, pc + 1)
        }
    }
}

/// The outcome of looking at a single search state.
#[derive(Clone, Copy, Debug)]
enum Step {
    /// The verdict of the state.
    Done(bool),
    /// The state whose verdict is needed before this one can be decided.
    Need(usize, usize),
}

impl Step {
    /// The state's verdict is exactly the verdict of the given successor.
    fn after(cache: &Cache, at: usize, pc: usize) -> Step {
        match cache.get(at, pc) {
            None => Step::Need(at, pc),
            Some(yes) => Step::Done(yes),
        }
    }
}

/// Scratch space for a [`Backtracker`] search.
///
/// A cache holds the memo table of verdicts and the stack of pending states.
/// It is reset at the start of every search, so verdicts never leak from one
/// search into another. Its allocations are kept though, which is the only
/// reason to reuse a cache.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    /// Pending (haystack offset, pattern offset) states.
    stack: Vec<(usize, usize)>,
    /// The verdict of each state, row-major by haystack offset. `None`
    /// means the state has not been evaluated yet.
    memo: Vec<Option<bool>>,
    /// The number of pattern offsets per haystack offset.
    stride: usize,
}

impl Cache {
    /// Create a new empty cache.
    pub fn new() -> Cache {
        Cache::default()
    }

    /// Returns the heap memory, in bytes, used by this cache.
    pub fn memory_usage(&self) -> usize {
        use core::mem::size_of;

        self.stack.capacity() * size_of::<(usize, usize)>()
            + self.memo.capacity() * size_of::<Option<bool>>()
    }

    fn setup(&mut self, cells: usize, stride: usize) {
        self.stack.clear();
        self.memo.clear();
        self.memo.resize(cells, None);
        self.stride = stride;
    }

    #[inline]
    fn get(&self, at: usize, pc: usize) -> Option<bool> {
        self.memo[at * self.stride + pc]
    }

    #[inline]
    fn set(&mut self, at: usize, pc: usize, yes: bool) {
        let slot = &mut self.memo[at * self.stride + pc];
        debug_assert!(slot.is_none(), "memo entries are written once");
        *slot = Some(yes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;

    use crate::util::pattern::Token;

    fn bytes(pattern: &str, haystack: &str) -> bool {
        let re = Builder::new().build_bytes(pattern.as_bytes()).unwrap();
        re.is_match(haystack.as_bytes())
    }

    #[test]
    fn examples() {
        assert!(bytes("", ""));
        assert!(!bytes("", "a"));
        assert!(bytes("a*", "aa"));
        assert!(!bytes("a*", "ab"));
        assert!(bytes(".*", "ab"));
        assert!(bytes("a*", ""));
        assert!(!bytes("mis*is*p*.", "mississippi"));
        assert!(bytes("mis*is*ip*.", "mississippi"));
        assert!(!bytes(".*c", "ab"));
        assert!(bytes(".*c", "abc"));
        assert!(bytes("a*b*c*", ""));
        assert!(!bytes("a*b*c", ""));
        assert!(bytes("c*a*b", "aab"));
    }

    #[test]
    fn cache_reuse() {
        let re = Builder::new().build_bytes(b"a*b.").unwrap();
        let mut cache = re.create_cache();
        // Alternate between haystacks of different lengths so that a stale
        // memo table would give the wrong answer.
        for _ in 0..3 {
            assert_eq!(Ok(true), re.try_is_match(&mut cache, b"aaabx"));
            assert_eq!(Ok(false), re.try_is_match(&mut cache, b"ab"));
            assert_eq!(Ok(true), re.try_is_match(&mut cache, b"by"));
            assert_eq!(Ok(false), re.try_is_match(&mut cache, b"aaaa"));
        }
        assert!(cache.memory_usage() > 0);
    }

    #[test]
    fn table_size_limit() {
        let mut builder = Builder::new();
        builder.configure(Config::new().table_size_limit(Some(9)));
        let re = builder.build_bytes(b"a*").unwrap();
        let mut cache = re.create_cache();
        // (2 + 1) * (2 + 1) == 9
        assert_eq!(Ok(true), re.try_is_match(&mut cache, b"aa"));
        assert_eq!(
            Err(MatchError::TableTooBig { cells: 12, limit: 9 }),
            re.try_is_match(&mut cache, b"aaa"),
        );
    }

    #[test]
    #[should_panic]
    fn table_size_limit_panics() {
        let mut builder = Builder::new();
        builder.configure(Config::new().table_size_limit(Some(1)));
        builder.build_bytes(b"a").unwrap().is_match(b"a");
    }

    #[test]
    fn generic_symbols() {
        let pat = Pattern::new(vec![
            Token::Literal(1u32),
            Token::Any,
            Token::Repeat,
            Token::Literal(3),
        ])
        .unwrap();
        let re = Backtracker::new(pat);
        assert!(re.is_match(&[1, 3]));
        assert!(re.is_match(&[1, 2, 2, 9, 3]));
        assert!(!re.is_match(&[2, 3]));
        assert!(!re.is_match(&[1, 3, 4]));

        let re = Builder::new().build_str("δ*.").unwrap();
        assert!(re.is_match(&['δ', 'δ', 'x']));
        assert!(re.is_match(&['x']));
        assert!(!re.is_match(&[]));
    }

    #[test]
    fn pathological() {
        // Without memoization this takes exponential time.
        let pattern = "a*".repeat(30) + "b";
        let haystack = "a".repeat(200);
        assert!(!bytes(&pattern, &haystack));
        assert!(bytes(&pattern, &(haystack + "b")));
    }

    #[test]
    fn deep_haystack() {
        // Long enough that a recursive implementation would need a very
        // deep call stack.
        let haystack = vec![b'a'; 200_000];
        let re = Builder::new().build_bytes(b"a*").unwrap();
        assert!(re.is_match(&haystack));
    }

    #[test]
    fn free_function() {
        let pat = syntax::parse_bytes(b"a.c").unwrap();
        assert!(is_match(b"abc", &pat));
        assert!(!is_match(b"abcd", &pat));
    }
}
