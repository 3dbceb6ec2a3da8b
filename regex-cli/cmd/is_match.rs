use std::io::{stdout, Write};

use {
    lexopt::{Arg, Parser, ValueExt},
    regex_dotstar::meta::Regex,
};

use crate::{
    args::Usage,
    config::{self, common, engine, syntax, Configurable},
    util::{self, Table},
};

const USAGE: &'static str = "\
Reports whether a pattern matches each of the given haystacks in full.

For each haystack, 'yes' or 'no' is printed along with the haystack. The exit
status is 0 when every haystack matches, 1 when at least one does not and 2
when an error occurs.

USAGE:
    regex-cli match [options] <pattern> <haystack>...

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    let mut common = common::Config::default();
    let mut syntax = syntax::Config::default();
    let mut engine = engine::Config::default();
    let mut positional = Positional::default();
    config::configure(
        p,
        USAGE,
        &mut [&mut common, &mut syntax, &mut engine, &mut positional],
    )?;
    let (pattern, haystacks) = positional.get()?;

    let (re, time) = util::timeitr(|| -> anyhow::Result<Regex> {
        let pattern = syntax.pattern(pattern)?;
        Ok(Regex::builder()
            .configure(engine.meta())
            .build_from_pattern(pattern))
    })?;
    if common.verbose {
        let mut table = Table::empty();
        table.add("build time", time);
        table.add("strategy", re.strategy_name());
        table.print(stdout())?;
    }

    let mut cache = re.create_cache();
    let mut all = true;
    for haystack in haystacks.iter() {
        let (result, time) =
            util::timeit(|| re.try_is_match(&mut cache, haystack.as_bytes()));
        let yes = result?;
        all = all && yes;
        if common.quiet {
            continue;
        }
        let answer = if yes { "yes" } else { "no" };
        if common.verbose {
            writeln!(stdout(), "{}\t{}\t{:?}", answer, haystack, time)?;
        } else {
            writeln!(stdout(), "{}\t{}", answer, haystack)?;
        }
    }
    if !all {
        std::process::exit(1);
    }
    Ok(())
}

/// The pattern followed by the haystacks, in that order.
#[derive(Debug, Default)]
struct Positional {
    values: Vec<String>,
}

impl Positional {
    fn get(&self) -> anyhow::Result<(&str, &[String])> {
        match self.values.split_first() {
            None => anyhow::bail!("missing pattern, see -h for usage"),
            Some((_, [])) => {
                anyhow::bail!("at least one haystack must be given")
            }
            Some((pattern, haystacks)) => Ok((pattern.as_str(), haystacks)),
        }
    }
}

impl Configurable for Positional {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Value(ref mut v) => {
                let v = std::mem::take(v);
                self.values.push(v.string()?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[]
    }
}
