use alloc::sync::Arc;

use crate::{
    backtrack,
    error::{BuildError, MatchError},
    meta::strategy::{self, Strategy},
    table,
    util::{pattern::Pattern, prefilter::Prefilter, syntax},
};

/// A compiled pattern for matching entire byte strings.
///
/// A `Regex` is the main entry point of this crate. It validates its pattern
/// when it is built, picks a matching strategy, and can then be used to test
/// any number of haystacks. A haystack matches only if the pattern describes
/// all of it: there is no searching for a match somewhere inside the
/// haystack.
///
/// # Synchronization and cloning
///
/// A `Regex` is immutable once built and may be shared freely between
/// threads. Searching requires mutable scratch space held in a [`Cache`].
/// [`Regex::is_match`] creates one for every call. For repeated searches,
/// create a cache once per thread with [`Regex::create_cache`] and use
/// [`Regex::try_is_match`].
///
/// Cloning a `Regex` is cheap, since its internals are reference counted.
///
/// # Example
///
/// ```
/// use regex_dotstar::meta::Regex;
///
/// let re = Regex::new("mis*is*ip*.")?;
/// assert!(re.is_match("mississippi"));
/// assert!(!re.is_match("mississippi!"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    config: Config,
    pattern: Pattern<u8>,
    pre: Option<Prefilter>,
    strat: Arc<dyn Strategy>,
}

impl Regex {
    /// Parse the given pattern and build a regex with the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// This returns an error if the pattern begins with a repetition, or if
    /// a repetition directly follows another one.
    ///
    /// ```
    /// use regex_dotstar::meta::Regex;
    ///
    /// assert!(Regex::new("*a").is_err());
    /// assert!(Regex::new("a**").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Regex, BuildError> {
        Regex::builder().build(pattern)
    }

    /// Return a builder for configuring the construction of a `Regex`.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Return a default configuration for a `Regex`.
    pub fn config() -> Config {
        Config::new()
    }

    /// Create a new cache for use with [`Regex::try_is_match`].
    pub fn create_cache(&self) -> Cache {
        Cache::new()
    }

    /// Returns true if and only if this regex matches the entire haystack.
    ///
    /// # Panics
    ///
    /// This panics if the search needs a larger table than the configured
    /// [table size limit](Config::table_size_limit) allows. This never
    /// happens with the default configuration. The fallible
    /// version of this routine is [`try_is_match`](Regex::try_is_match).
    ///
    /// # Example
    ///
    /// ```
    /// use regex_dotstar::meta::Regex;
    ///
    /// let re = Regex::new(".*c")?;
    /// assert!(re.is_match("abc"));
    /// assert!(!re.is_match("abcd"));
    /// assert!(!re.is_match(b"ab"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn is_match<H: AsRef<[u8]>>(&self, haystack: H) -> bool {
        let mut cache = self.create_cache();
        self.try_is_match(&mut cache, haystack.as_ref()).unwrap()
    }

    /// Returns true if and only if this regex matches the entire haystack,
    /// using the given cache for scratch space.
    ///
    /// # Errors
    ///
    /// This returns [`MatchError::TableTooBig`] when the chosen strategy
    /// would need more table cells than the configured limit. Haystacks
    /// rejected by the prefilter never produce this error.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_dotstar::{meta::Regex, MatchError};
    ///
    /// let re = Regex::builder()
    ///     .configure(Regex::config().table_size_limit(Some(12)))
    ///     .build("a*")?;
    /// let mut cache = re.create_cache();
    /// assert_eq!(Ok(true), re.try_is_match(&mut cache, b"aaa"));
    /// assert_eq!(
    ///     Err(MatchError::TableTooBig { cells: 18, limit: 12 }),
    ///     re.try_is_match(&mut cache, b"aaaaa"),
    /// );
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_is_match(
        &self,
        cache: &mut Cache,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        if let Some(ref pre) = self.pre {
            if !pre.is_possible(haystack) {
                trace!("prefilter rejected {} byte haystack", haystack.len());
                return Ok(false);
            }
        }
        self.strat.try_is_match(cache, haystack)
    }

    /// Returns the validated pattern this regex was built from.
    pub fn pattern(&self) -> &Pattern<u8> {
        &self.pattern
    }

    /// Returns the configuration used to build this regex.
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Returns the name of the strategy this regex searches with.
    ///
    /// This is one of `literal`, `fixed`, `backtrack` or `table`. It is
    /// meant for debugging output, and the names may change.
    pub fn strategy_name(&self) -> &'static str {
        self.strat.name()
    }

    /// Returns the heap memory, in bytes, used by this regex. This does not
    /// include the memory used by any [`Cache`].
    pub fn memory_usage(&self) -> usize {
        self.strat.memory_usage()
            + self.pre.as_ref().map_or(0, |pre| pre.memory_usage())
    }
}

/// Which engine a [`Regex`] uses for patterns that need one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Engine {
    /// Pick the cheapest strategy for each pattern. Patterns with a
    /// repetition use the backtracker.
    Auto,
    /// Always use the memoized [`backtrack::Backtracker`].
    Backtrack,
    /// Always use the tabular [`table::TableMatcher`].
    Table,
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::Auto
    }
}

/// An object describing the configuration of a [`Regex`].
///
/// Every knob is optional, so that one configuration can be layered on top
/// of another with [`Builder::configure`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    engine: Option<Engine>,
    prefilter: Option<bool>,
    table_size_limit: Option<Option<usize>>,
}

impl Config {
    /// Create a new configuration object for a `Regex`.
    pub fn new() -> Config {
        Config::default()
    }

    /// Choose the engine used to search. The default is [`Engine::Auto`].
    pub fn engine(self, engine: Engine) -> Config {
        Config { engine: Some(engine), ..self }
    }

    /// Whether to reject impossible haystacks before running an engine.
    ///
    /// This is enabled by default. Disabling it never changes a match
    /// result, but it can change which haystacks run into the
    /// [table size limit](Config::table_size_limit).
    pub fn prefilter(self, yes: bool) -> Config {
        Config { prefilter: Some(yes), ..self }
    }

    /// Set the largest table a single search may use, measured in cells.
    /// A search needs `(haystack_len + 1) * (pattern_len + 1)` cells.
    ///
    /// `None` removes the limit, which is the default. With no limit, every
    /// search succeeds.
    pub fn table_size_limit(self, limit: Option<usize>) -> Config {
        Config { table_size_limit: Some(limit), ..self }
    }

    pub fn get_engine(&self) -> Engine {
        self.engine.unwrap_or_default()
    }

    pub fn get_prefilter(&self) -> bool {
        self.prefilter.unwrap_or(true)
    }

    pub fn get_table_size_limit(&self) -> Option<usize> {
        self.table_size_limit.unwrap_or(None)
    }

    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config {
            engine: o.engine.or(self.engine),
            prefilter: o.prefilter.or(self.prefilter),
            table_size_limit: o.table_size_limit.or(self.table_size_limit),
        }
    }
}

/// A builder for configuring and constructing a [`Regex`].
///
/// # Example
///
/// This builds a regex that uses `?` as its wildcard and always searches
/// with the tabular engine.
///
/// ```
/// use regex_dotstar::{meta::{Engine, Regex}, util::syntax};
///
/// let re = Regex::builder()
///     .syntax(syntax::Config::new().wildcard(b'?'))
///     .configure(Regex::config().engine(Engine::Table))
///     .build("a?*.")?;
/// assert!(re.is_match("abc."));
/// assert!(!re.is_match("abcd"));
/// assert_eq!("table", re.strategy_name());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
    syntax: syntax::Config,
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Parse and validate the given pattern, then build a `Regex` from it.
    pub fn build(&self, pattern: &str) -> Result<Regex, BuildError> {
        self.build_bytes(pattern.as_bytes())
    }

    /// Like [`Builder::build`], but for a pattern that need not be UTF-8.
    pub fn build_bytes(&self, pattern: &[u8]) -> Result<Regex, BuildError> {
        let pattern = syntax::parse_bytes_with(&self.syntax, pattern)?;
        Ok(self.build_from_pattern(pattern))
    }

    /// Build a `Regex` from an already validated pattern.
    ///
    /// The syntax configuration of this builder is not used.
    pub fn build_from_pattern(&self, pattern: Pattern<u8>) -> Regex {
        let config = self.config;
        let pre = if config.get_prefilter() {
            Prefilter::new(&pattern)
        } else {
            None
        };
        let strat = strategy::new(&config, pattern.clone());
        Regex { config, pattern, pre, strat }
    }

    /// Apply the given configuration on top of this builder's current one.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Set the syntax used to parse patterns given to [`Builder::build`]
    /// and [`Builder::build_bytes`].
    pub fn syntax(&mut self, config: syntax::Config) -> &mut Builder {
        self.syntax = self.syntax.overwrite(config);
        self
    }
}

/// Mutable scratch space for a [`Regex`] search.
///
/// A cache may be used with any `Regex`, not only the one that created it.
/// It holds the scratch space of every engine, but only the engine a search
/// actually runs allocates anything.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    pub(super) backtrack: backtrack::Cache,
    pub(super) table: table::Cache,
}

impl Cache {
    /// Create a new empty cache.
    pub fn new() -> Cache {
        Cache::default()
    }

    /// Returns the heap memory, in bytes, used by this cache.
    pub fn memory_usage(&self) -> usize {
        self.backtrack.memory_usage() + self.table.memory_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_engine(engine: Engine, pattern: &str) -> Regex {
        Regex::builder()
            .configure(Regex::config().engine(engine))
            .build(pattern)
            .unwrap()
    }

    #[test]
    fn strategy_choice() {
        assert_eq!("literal", Regex::new("abc").unwrap().strategy_name());
        assert_eq!("literal", Regex::new("").unwrap().strategy_name());
        assert_eq!("fixed", Regex::new("a.c").unwrap().strategy_name());
        assert_eq!("backtrack", Regex::new("a*").unwrap().strategy_name());
        assert_eq!("table", with_engine(Engine::Table, "abc").strategy_name());
        assert_eq!(
            "backtrack",
            with_engine(Engine::Backtrack, "a.c").strategy_name()
        );
    }

    #[test]
    fn engines_agree() {
        let cases = &[
            ("a", "aa", false),
            ("a*", "aa", true),
            (".*", "ab", true),
            ("mis*is*p*.", "mississippi", false),
            ("mis*is*ip*.", "mississippi", true),
            (".*c", "ab", false),
            ("a*b*c*", "", true),
            ("a.c", "abc", true),
            ("a.c", "ac", false),
            ("abc", "abc", true),
            ("abc", "abd", false),
            ("", "", true),
        ];
        for engine in &[Engine::Auto, Engine::Backtrack, Engine::Table] {
            for &(pattern, haystack, expected) in cases {
                let re = with_engine(*engine, pattern);
                assert_eq!(
                    expected,
                    re.is_match(haystack),
                    "engine {:?}, pattern {:?}, haystack {:?}",
                    engine,
                    pattern,
                    haystack,
                );
            }
        }
    }

    #[test]
    fn prefilter_skips_limit() {
        let config = Regex::config().table_size_limit(Some(4));
        let re = Regex::builder().configure(config).build("a*b").unwrap();
        let mut cache = re.create_cache();
        // No 'b', so the prefilter answers before any table is needed.
        assert_eq!(Ok(false), re.try_is_match(&mut cache, b"aaaaaaaa"));
        assert!(re.try_is_match(&mut cache, b"aaaaaaab").is_err());

        let config = config.prefilter(false);
        let re = Regex::builder().configure(config).build("a*b").unwrap();
        assert!(re.try_is_match(&mut cache, b"aaaaaaaa").is_err());
    }

    #[test]
    fn config_layering() {
        let mut builder = Regex::builder();
        builder.configure(Regex::config().engine(Engine::Table));
        builder.configure(Regex::config().prefilter(false));
        let re = builder.build("x*").unwrap();
        assert_eq!(Engine::Table, re.get_config().get_engine());
        assert!(!re.get_config().get_prefilter());
        assert_eq!(None, re.get_config().get_table_size_limit());
    }

    #[test]
    fn invalid_patterns() {
        let err = Regex::new("*").unwrap_err();
        assert_eq!(Some(0), err.offset());
        let err = Regex::new("ab**").unwrap_err();
        assert_eq!(Some(3), err.offset());
        assert!(err.is_malformed_pattern());
    }

    #[test]
    fn bytes_and_caches() {
        let re = Regex::builder().build_bytes(b"\xFF.*").unwrap();
        let mut cache = Cache::new();
        assert_eq!(Ok(true), re.try_is_match(&mut cache, b"\xFF\x00\x01"));
        assert_eq!(Ok(false), re.try_is_match(&mut cache, b"\x00\xFF"));
        assert!(cache.memory_usage() > 0);
    }
}
