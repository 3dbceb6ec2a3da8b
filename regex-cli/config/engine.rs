use {
    lexopt::{Arg, Parser},
    regex_dotstar::meta,
};

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// Exposes the knobs of a meta regex as flags.
#[derive(Debug, Default)]
pub struct Config {
    meta: meta::Config,
}

impl Config {
    /// Return the regex configuration built from the flags given.
    pub fn meta(&self) -> meta::Config {
        self.meta
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('e') | Arg::Long("engine") => {
                let name: String = args::parse(p, "-e/--engine")?;
                let engine = match &*name {
                    "auto" => meta::Engine::Auto,
                    "backtrack" => meta::Engine::Backtrack,
                    "table" => meta::Engine::Table,
                    unk => anyhow::bail!(
                        "unrecognized engine '{}', must be one of auto, \
                         backtrack or table",
                        unk,
                    ),
                };
                self.meta = self.meta.engine(engine);
            }
            Arg::Long("no-prefilter") => {
                self.meta = self.meta.prefilter(false);
            }
            Arg::Long("table-size-limit") => {
                let limit = args::parse_maybe(p, "--table-size-limit")?;
                self.meta = self.meta.table_size_limit(limit);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-e, --engine <engine>",
                "One of: auto, backtrack, table.",
                r#"
Choose the engine used to match. 'auto' picks the cheapest strategy for the
pattern: a direct comparison for literal patterns, a position by position check
for patterns without repetition, and the memoized backtracker otherwise.
'backtrack' and 'table' force the memoized backtracker or the dynamic
programming table, respectively.

The default is 'auto'.
"#,
            ),
            Usage::new(
                "--no-prefilter",
                "Disable the prefilter.",
                r#"
Disable the check that rejects haystacks missing a literal the pattern
requires, or too short to match, before any engine runs.
"#,
            ),
            Usage::new(
                "--table-size-limit <cells>",
                "Limit the table size per search.",
                r#"
Set the largest number of table cells a single search may use. A search needs
(haystack length + 1) * (pattern length + 1) cells. Use 'none' for no limit.

The default is 'none'.
"#,
            ),
        ];
        USAGES
    }
}
