use {
    anyhow::Context,
    lexopt::{Arg, Parser},
    regex_dotstar::util::{pattern::Pattern, syntax},
};

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// Exposes the reserved pattern symbols as flags.
#[derive(Debug, Default)]
pub struct Config {
    syntax: syntax::Config,
}

impl Config {
    /// Return the syntax configuration built from the flags given.
    pub fn syntax(&self) -> syntax::Config {
        self.syntax
    }

    /// Parses and validates the given pattern.
    pub fn pattern(&self, pattern: &str) -> anyhow::Result<Pattern<u8>> {
        syntax::parse_bytes_with(&self.syntax, pattern.as_bytes())
            .with_context(|| format!("failed to parse pattern '{}'", pattern))
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("wildcard") => {
                let byte = args::parse_byte(p, "--wildcard")?;
                self.syntax = self.syntax.wildcard(byte);
            }
            Arg::Long("repetition") => {
                let byte = args::parse_byte(p, "--repetition")?;
                self.syntax = self.syntax.repetition(byte);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "--wildcard <char>",
                "Set the symbol matching any one byte.",
                r#"
Set the ASCII character that matches any single haystack byte. Once changed,
'.' is an ordinary literal.

The default is '.'.
"#,
            ),
            Usage::new(
                "--repetition <char>",
                "Set the repetition symbol.",
                r#"
Set the ASCII character that repeats the preceding literal or wildcard zero or
more times. It must differ from the wildcard.

The default is '*'.
"#,
            ),
        ];
        USAGES
    }
}
