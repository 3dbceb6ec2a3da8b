/*!
This crate decides whether a pattern matches the *entire* input, where a
pattern is a sequence of literal symbols, a wildcard (`.`) that matches any
single symbol, and a repetition operator (`*`) that lets the preceding
symbol or wildcard occur zero or more times.

There is no searching for a match inside the input, no alternation, no
grouping and no escaping. In exchange, every search runs in time and memory
bounded by the product of the input length and the pattern length.

# Overview

* [`meta::Regex`] parses a pattern, picks a matching strategy for it and
matches byte strings. This is what most uses should reach for.
* [`backtrack::Backtracker`] is a memoized backtracking engine. It explores
only the search states it needs, recording each verdict so that no state is
ever evaluated twice.
* [`table::TableMatcher`] is a bottom-up dynamic programming engine that
fills a table of every search state.
* [`util::syntax`] parses pattern strings, and [`util::pattern`] describes
validated patterns. Both engines are generic over the symbol type, so a
[`Pattern`](util::pattern::Pattern) may be built over `u8`, `char` or any
other type with equality.

The two engines always agree. The test suite checks this property over both
hand written and randomly generated inputs.

# Example

```
use regex_dotstar::meta::Regex;

let re = Regex::new("mis*is*ip*.")?;
assert!(re.is_match("mississippi"));
assert!(!re.is_match("mississippian"));

let re = Regex::new(".*c")?;
assert!(!re.is_match("ab"));
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Example: pattern errors

A pattern may not start with a repetition, and a repetition may not follow
another one. Such patterns are rejected when they are built.

```
use regex_dotstar::meta::Regex;

let err = Regex::new("a**").unwrap_err();
assert_eq!(Some(2), err.offset());
```

# Example: matching symbols other than bytes

```
use regex_dotstar::{backtrack::Backtracker, util::pattern::{Pattern, Token}};

let pat = Pattern::new(vec![
    Token::Literal(1u32),
    Token::Any,
    Token::Repeat,
    Token::Literal(9),
])?;
let re = Backtracker::new(pat);
assert!(re.is_match(&[1, 5, 5, 5, 9]));
assert!(!re.is_match(&[1, 5, 5, 5]));
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **std** - Enabled by default. Adds `std::error::Error` impls and lets
`memchr` use the standard library. Without it, this crate is `no_std` but
still needs `alloc`.
* **logging** - Emits `log` messages when strategies and prefilters are
built, and trace messages for each search.
*/

#![deny(missing_debug_implementations)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use crate::error::{BuildError, MatchError};

#[macro_use]
mod macros;

pub mod backtrack;
mod error;
pub mod meta;
pub mod table;
pub mod util;

/// Returns true if and only if `pattern` matches all of `text`.
///
/// This is a convenience routine that parses the pattern over `char`s and
/// runs the memoized backtracker. It is useful for one-off matches. When a
/// pattern is used more than once, build a [`meta::Regex`] instead.
///
/// # Errors
///
/// This returns an error if the pattern is malformed.
///
/// # Example
///
/// ```
/// assert_eq!(Ok(true), regex_dotstar::is_match("aab", "c*a*b"));
/// assert_eq!(Ok(false), regex_dotstar::is_match("ab", ".*c"));
/// assert!(regex_dotstar::is_match("a", "*a").is_err());
/// ```
pub fn is_match(text: &str, pattern: &str) -> Result<bool, BuildError> {
    let pattern = util::syntax::parse(pattern)?;
    let haystack: alloc::vec::Vec<char> = text.chars().collect();
    Ok(backtrack::is_match(&haystack, &pattern))
}
