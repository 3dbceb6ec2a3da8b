/*!
Utilities for turning pattern strings into [`Pattern`] values.

The textual syntax is deliberately tiny. Two symbols are reserved: the
wildcard (`.` by default) and the repetition operator (`*` by default).
Every other symbol is a literal. There are no escapes, so a reserved symbol
can never be matched literally. Use a [`Config`] to pick different reserved
symbols when that matters.

# Example

```
use regex_dotstar::util::{pattern::Token, syntax};

let pat = syntax::parse("a*.")?;
assert_eq!(
    &[Token::Literal('a'), Token::Repeat, Token::Any],
    pat.tokens(),
);

let config = syntax::Config::new().wildcard(b'?').repetition(b'+');
let pat = syntax::parse_bytes_with(&config, b"a+?.")?;
assert_eq!(
    &[Token::Literal(b'a'), Token::Repeat, Token::Any, Token::Literal(b'.')],
    pat.tokens(),
);
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use crate::{
    error::BuildError,
    util::pattern::{Pattern, Token},
};

/// Parse the given pattern string with the default configuration into a
/// pattern over `char`s.
pub fn parse(pattern: &str) -> Result<Pattern<char>, BuildError> {
    parse_with(&Config::default(), pattern)
}

/// Parse the given pattern string with the given configuration into a
/// pattern over `char`s.
pub fn parse_with(
    config: &Config,
    pattern: &str,
) -> Result<Pattern<char>, BuildError> {
    let (wildcard, repetition) = config.reserved()?;
    let (wildcard, repetition) =
        (char::from(wildcard), char::from(repetition));
    Pattern::new(pattern.chars().map(|ch| {
        if ch == wildcard {
            Token::Any
        } else if ch == repetition {
            Token::Repeat
        } else {
            Token::Literal(ch)
        }
    }))
}

/// Parse the given pattern with the default configuration into a pattern
/// over bytes.
///
/// The pattern need not be valid UTF-8. Every byte other than a reserved
/// one is a literal.
pub fn parse_bytes(pattern: &[u8]) -> Result<Pattern<u8>, BuildError> {
    parse_bytes_with(&Config::default(), pattern)
}

/// Parse the given pattern with the given configuration into a pattern
/// over bytes.
pub fn parse_bytes_with(
    config: &Config,
    pattern: &[u8],
) -> Result<Pattern<u8>, BuildError> {
    let (wildcard, repetition) = config.reserved()?;
    Pattern::new(pattern.iter().map(|&b| {
        if b == wildcard {
            Token::Any
        } else if b == repetition {
            Token::Repeat
        } else {
            Token::Literal(b)
        }
    }))
}

/// The configuration of the pattern parser.
///
/// Both reserved symbols must be ASCII and must differ from one another.
/// This is checked when a pattern is parsed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    // Knobs are options so that "not set" can be distinguished from
    // "default" when two configurations are combined. See 'overwrite'.
    wildcard: Option<u8>,
    repetition: Option<u8>,
}

impl Config {
    /// Return a new default syntax configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the symbol that matches any single haystack symbol.
    ///
    /// By default, this is `.`.
    pub fn wildcard(self, symbol: u8) -> Config {
        Config { wildcard: Some(symbol), ..self }
    }

    /// Set the symbol that repeats the preceding atom zero or more times.
    ///
    /// By default, this is `*`.
    pub fn repetition(self, symbol: u8) -> Config {
        Config { repetition: Some(symbol), ..self }
    }

    /// Returns the wildcard symbol.
    pub fn get_wildcard(&self) -> u8 {
        self.wildcard.unwrap_or(b'.')
    }

    /// Returns the repetition symbol.
    pub fn get_repetition(&self) -> u8 {
        self.repetition.unwrap_or(b'*')
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config {
            wildcard: o.wildcard.or(self.wildcard),
            repetition: o.repetition.or(self.repetition),
        }
    }

    /// Returns the reserved (wildcard, repetition) pair, or an error if the
    /// pair cannot be used to parse anything unambiguously.
    fn reserved(&self) -> Result<(u8, u8), BuildError> {
        let (wildcard, repetition) =
            (self.get_wildcard(), self.get_repetition());
        if !wildcard.is_ascii() {
            return Err(BuildError::non_ascii_reserved(wildcard));
        }
        if !repetition.is_ascii() {
            return Err(BuildError::non_ascii_reserved(repetition));
        }
        if wildcard == repetition {
            return Err(BuildError::reserved_conflict(wildcard));
        }
        Ok((wildcard, repetition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::util::pattern::Token::{Any, Literal as Lit, Repeat};

    #[test]
    fn default_syntax() {
        let pat = parse("mis*is*p*.").unwrap();
        assert_eq!(10, pat.len());
        assert_eq!(Lit('m'), pat.tokens()[0]);
        assert_eq!(Repeat, pat.tokens()[3]);
        assert_eq!(Any, pat.tokens()[9]);

        let pat = parse_bytes(b"\xFF.*").unwrap();
        assert_eq!(&[Lit(0xFF), Any, Repeat], pat.tokens());

        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn non_ascii_literals() {
        let pat = parse("δ*.").unwrap();
        assert_eq!(&[Lit('δ'), Repeat, Any], pat.tokens());
        // In byte mode the two UTF-8 bytes of 'δ' are separate literals, so
        // the repetition only applies to the second one.
        let pat = parse_bytes("δ*".as_bytes()).unwrap();
        assert_eq!(&[Lit(0xCE), Lit(0xB4), Repeat], pat.tokens());
    }

    #[test]
    fn malformed() {
        let err = parse("*a").unwrap_err();
        assert_eq!(Some(0), err.offset());
        let err = parse("a**").unwrap_err();
        assert_eq!(Some(2), err.offset());
        let err = parse_bytes(b"ab.**").unwrap_err();
        assert_eq!(Some(4), err.offset());
        assert!(err.is_malformed_pattern());
    }

    #[test]
    fn custom_reserved() {
        let config = Config::new().wildcard(b'?').repetition(b'+');
        let pat = parse_with(&config, "a+?*").unwrap();
        assert_eq!(&[Lit('a'), Repeat, Any, Lit('*')], pat.tokens());
    }

    #[test]
    fn bad_config() {
        let config = Config::new().wildcard(b'*');
        let err = parse_with(&config, "a").unwrap_err();
        assert!(!err.is_malformed_pattern());
        assert_eq!(None, err.offset());

        let config = Config::new().repetition(0xE9);
        assert!(parse_bytes_with(&config, b"a").is_err());
    }

    #[test]
    fn overwrite() {
        let base = Config::new().wildcard(b'?');
        let merged = base.overwrite(Config::new().repetition(b'+'));
        assert_eq!(b'?', merged.get_wildcard());
        assert_eq!(b'+', merged.get_repetition());
        let merged = base.overwrite(Config::new().wildcard(b'_'));
        assert_eq!(b'_', merged.get_wildcard());
        assert_eq!(b'*', merged.get_repetition());
    }
}
