use crate::args;

mod debug;
mod is_match;

const USAGE: &'static str = "\
A tool for matching whole inputs against wildcard patterns on the command
line.

USAGE:
    regex-cli <command> ...

COMMANDS:
    debug    Print the debug representation of patterns and regexes.
    match    Report whether a pattern matches each given haystack.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "debug" => debug::run(p),
        "match" => is_match::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
