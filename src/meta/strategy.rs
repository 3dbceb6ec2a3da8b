use core::{
    fmt::Debug,
    panic::{RefUnwindSafe, UnwindSafe},
};

use alloc::{sync::Arc, vec::Vec};

use crate::{
    backtrack::{self, Backtracker},
    error::MatchError,
    meta::regex::{Cache, Config, Engine},
    table::{self, TableMatcher},
    util::pattern::{Pattern, Token},
};

pub(super) trait Strategy:
    Debug + Send + Sync + RefUnwindSafe + UnwindSafe + 'static
{
    /// A short name for debug output and logging.
    fn name(&self) -> &'static str;

    fn try_is_match(
        &self,
        cache: &mut Cache,
        haystack: &[u8],
    ) -> Result<bool, MatchError>;

    fn memory_usage(&self) -> usize;
}

/// Picks the cheapest strategy that can decide the given pattern, unless
/// the configuration asks for a specific engine.
pub(super) fn new(config: &Config, pattern: Pattern<u8>) -> Arc<dyn Strategy> {
    let limit = config.get_table_size_limit();
    let strat: Arc<dyn Strategy> = match config.get_engine() {
        Engine::Backtrack => Arc::new(Backtrack::new(pattern, limit)),
        Engine::Table => Arc::new(Table::new(pattern, limit)),
        Engine::Auto => {
            if pattern.is_literal() {
                Arc::new(Literal::new(&pattern))
            } else if !pattern.has_repetition() {
                Arc::new(Fixed { pattern })
            } else {
                Arc::new(Backtrack::new(pattern, limit))
            }
        }
    };
    debug!("meta strategy chosen: {}", strat.name());
    strat
}

/// A pattern of nothing but literals matches exactly one haystack.
#[derive(Debug)]
struct Literal {
    bytes: Vec<u8>,
}

impl Literal {
    fn new(pattern: &Pattern<u8>) -> Literal {
        let bytes =
            pattern.tokens().iter().filter_map(|t| t.literal().copied());
        Literal { bytes: bytes.collect() }
    }
}

impl Strategy for Literal {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn try_is_match(
        &self,
        _cache: &mut Cache,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        Ok(haystack == &*self.bytes)
    }

    fn memory_usage(&self) -> usize {
        self.bytes.len()
    }
}

/// A pattern without repetition consumes exactly one haystack byte per
/// token, so no table is needed.
#[derive(Debug)]
struct Fixed {
    pattern: Pattern<u8>,
}

impl Strategy for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn try_is_match(
        &self,
        _cache: &mut Cache,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        let tokens = self.pattern.tokens();
        Ok(tokens.len() == haystack.len()
            && tokens.iter().zip(haystack).all(|(t, b)| t.matches(b)))
    }

    fn memory_usage(&self) -> usize {
        self.pattern.len() * core::mem::size_of::<Token<u8>>()
    }
}

#[derive(Debug)]
struct Backtrack(Backtracker<u8>);

impl Backtrack {
    fn new(pattern: Pattern<u8>, limit: Option<usize>) -> Backtrack {
        let mut builder = backtrack::Builder::new();
        builder.configure(backtrack::Config::new().table_size_limit(limit));
        Backtrack(builder.build(pattern))
    }
}

impl Strategy for Backtrack {
    fn name(&self) -> &'static str {
        "backtrack"
    }

    fn try_is_match(
        &self,
        cache: &mut Cache,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        self.0.try_is_match(&mut cache.backtrack, haystack)
    }

    fn memory_usage(&self) -> usize {
        self.0.pattern().len() * core::mem::size_of::<Token<u8>>()
    }
}

#[derive(Debug)]
struct Table(TableMatcher<u8>);

impl Table {
    fn new(pattern: Pattern<u8>, limit: Option<usize>) -> Table {
        let mut builder = table::Builder::new();
        builder.configure(table::Config::new().table_size_limit(limit));
        Table(builder.build(pattern))
    }
}

impl Strategy for Table {
    fn name(&self) -> &'static str {
        "table"
    }

    fn try_is_match(
        &self,
        cache: &mut Cache,
        haystack: &[u8],
    ) -> Result<bool, MatchError> {
        self.0.try_is_match(&mut cache.table, haystack)
    }

    fn memory_usage(&self) -> usize {
        self.0.pattern().len() * core::mem::size_of::<Token<u8>>()
    }
}
