use lexopt::{Arg, Parser};

use crate::{args::Usage, config::Configurable};

/// Flags shared by every command.
#[derive(Debug, Default)]
pub struct Config {
    pub quiet: bool,
    pub verbose: bool,
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.quiet = true;
            }
            Arg::Long("verbose") => {
                self.verbose = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Suppress some output.",
                r#"
This is a generic flag that suppresses some (but not all) output. With
'regex-cli match', nothing is printed and only the exit status reports the
result. With 'regex-cli debug', only the summary table is printed.
"#,
            ),
            Usage::new(
                "--verbose",
                "Add more output.",
                r#"
This is a generic flag that expands output beyond the "normal" amount. With
'regex-cli match', timings and the chosen strategy are printed as well.
"#,
            ),
        ];
        USAGES
    }
}
