/*!
A byte oriented regex that picks a matching strategy for its pattern.

The [`Regex`] type in this module is the most convenient way to use this
crate. It parses a pattern string, inspects it and chooses how to search:

* A pattern made only of literals is compared directly with the haystack.
* A pattern without any repetition has a fixed length, so it is checked
position by position without allocating anything.
* Every other pattern is handed to the memoized
[`Backtracker`](crate::backtrack::Backtracker).

Before any of that, a [`Prefilter`](crate::util::prefilter::Prefilter) may
reject haystacks that cannot possibly match.

The strategy can also be forced with [`Config::engine`], which is mostly
useful for testing and benchmarking the individual engines.
*/

pub use self::regex::{Builder, Cache, Config, Engine, Regex};

mod regex;
mod strategy;
