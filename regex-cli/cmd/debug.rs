use std::io::{stdout, Write};

use {
    lexopt::{Arg, Parser, ValueExt},
    regex_dotstar::{meta::Regex, util::prefilter::Prefilter},
};

use crate::{
    args::{self, Usage},
    config::{self, common, engine, syntax, Configurable},
    util::{self, Table},
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of patterns and regexes.

USAGE:
    regex-cli debug <command> ...

COMMANDS:
    pattern    Print the debug representation of a parsed pattern.
    regex      Print the debug representation of a meta regex.
";

    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "pattern" => run_pattern(p),
        "regex" => run_regex(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}

fn run_pattern(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of a parsed pattern, along with some of its
properties.

USAGE:
    regex-cli debug pattern <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut syntax = syntax::Config::default();
    let mut pattern = OnePattern::default();
    config::configure(
        p,
        USAGE,
        &mut [&mut common, &mut syntax, &mut pattern],
    )?;

    let pattern = pattern.get()?;
    let (pat, time) = util::timeitr(|| syntax.pattern(pattern))?;
    let mut table = Table::empty();
    table.add("parse time", time);
    table.add("tokens", pat.len());
    table.add("atoms", pat.atoms().count());
    table.add("minimum length", pat.min_len());
    table.add("has repetition", pat.has_repetition());
    table.add("is literal", pat.is_literal());
    table.add("prefilter", Prefilter::new(&pat).is_some());
    table.print(stdout())?;
    if !common.quiet {
        writeln!(stdout(), "\n{:#?}", pat.tokens())?;
    }
    Ok(())
}

fn run_regex(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the debug representation of a meta regex, along with the strategy it
chose for its pattern.

USAGE:
    regex-cli debug regex <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut syntax = syntax::Config::default();
    let mut engine = engine::Config::default();
    let mut pattern = OnePattern::default();
    config::configure(
        p,
        USAGE,
        &mut [&mut common, &mut syntax, &mut engine, &mut pattern],
    )?;

    let (re, time) = util::timeitr(|| -> anyhow::Result<Regex> {
        let pat = syntax.pattern(pattern.get()?)?;
        Ok(Regex::builder().configure(engine.meta()).build_from_pattern(pat))
    })?;
    let mut table = Table::empty();
    table.add("build time", time);
    table.add("strategy", re.strategy_name());
    table.add("memory", re.memory_usage());
    table.print(stdout())?;
    if !common.quiet {
        writeln!(stdout(), "\n{:#?}", re)?;
    }
    Ok(())
}

/// A single positional pattern.
#[derive(Debug, Default)]
struct OnePattern {
    pattern: Option<String>,
}

impl OnePattern {
    fn get(&self) -> anyhow::Result<&str> {
        match self.pattern {
            None => anyhow::bail!("missing pattern, see -h for usage"),
            Some(ref pattern) => Ok(pattern),
        }
    }
}

impl Configurable for OnePattern {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Value(ref mut v) => {
                anyhow::ensure!(
                    self.pattern.is_none(),
                    "only one pattern is allowed"
                );
                let v = std::mem::take(v);
                self.pattern = Some(v.string()?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[]
    }
}
