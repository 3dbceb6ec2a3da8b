/*!
The token representation of a pattern shared by every engine in this crate.

A [`Pattern`] is a sequence of [`Token`]s. Each token is a literal symbol,
the wildcard or the repetition operator. The repetition operator applies to
the token immediately before it, and the pair is called an [`Atom`]. A
`Pattern` can only be constructed when every repetition has an atom to
repeat, so the engines never need to check this themselves.

Patterns are generic over their symbol type. In practice this is usually a
`u8` (see [`syntax::parse_bytes`](crate::util::syntax::parse_bytes)) or a
`char` (see [`syntax::parse`](crate::util::syntax::parse)), but any type
that implements `PartialEq` works.
*/

use alloc::{sync::Arc, vec::Vec};

use crate::error::BuildError;

/// A single pattern token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token<T> {
    /// Matches exactly one symbol equal to the one given.
    Literal(T),
    /// Matches any single symbol.
    Any,
    /// Matches zero or more occurrences of the preceding token.
    Repeat,
}

impl<T> Token<T> {
    /// Returns true if this token is the repetition operator.
    #[inline]
    pub fn is_repeat(&self) -> bool {
        matches!(*self, Token::Repeat)
    }

    /// Returns true if this token is the wildcard.
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(*self, Token::Any)
    }

    /// Returns the literal symbol of this token, if it is a literal.
    #[inline]
    pub fn literal(&self) -> Option<&T> {
        match *self {
            Token::Literal(ref sym) => Some(sym),
            _ => None,
        }
    }
}

impl<T: PartialEq> Token<T> {
    /// Returns true if and only if this token, taken as an atom, consumes
    /// the given symbol.
    ///
    /// A literal matches an equal symbol, the wildcard matches every symbol
    /// and the repetition operator matches nothing on its own.
    ///
    /// This is the only symbol comparison performed by the engines in this
    /// crate.
    #[inline]
    pub fn matches(&self, symbol: &T) -> bool {
        match *self {
            Token::Literal(ref lit) => lit == symbol,
            Token::Any => true,
            Token::Repeat => false,
        }
    }
}

/// A well formed sequence of tokens.
///
/// A pattern never starts with [`Token::Repeat`] and never contains two
/// consecutive [`Token::Repeat`] tokens. This is checked when the pattern
/// is built.
///
/// Patterns are internally reference counted, so cloning one is cheap.
///
/// # Example
///
/// ```
/// use regex_dotstar::util::pattern::{Pattern, Token};
///
/// let pat = Pattern::new(vec![
///     Token::Literal(b'a'),
///     Token::Repeat,
///     Token::Any,
/// ])?;
/// assert_eq!(3, pat.len());
/// assert_eq!(2, pat.atoms().count());
/// assert_eq!(1, pat.min_len());
///
/// assert!(Pattern::new(vec![Token::<u8>::Repeat]).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Eq, Hash, PartialEq)]
pub struct Pattern<T> {
    tokens: Arc<[Token<T>]>,
}

// Cloning only bumps a reference count, so symbols need not be 'Clone'.
impl<T> Clone for Pattern<T> {
    fn clone(&self) -> Pattern<T> {
        Pattern { tokens: Arc::clone(&self.tokens) }
    }
}

impl<T> Pattern<T> {
    /// Build a pattern from a sequence of tokens.
    ///
    /// This returns an error if the first token is a repetition or if any
    /// repetition directly follows another one.
    pub fn new<I>(tokens: I) -> Result<Pattern<T>, BuildError>
    where
        I: IntoIterator<Item = Token<T>>,
    {
        let tokens: Vec<Token<T>> = tokens.into_iter().collect();
        for (offset, tok) in tokens.iter().enumerate() {
            if !tok.is_repeat() {
                continue;
            }
            if offset == 0 {
                return Err(BuildError::leading_repetition());
            }
            if tokens[offset - 1].is_repeat() {
                return Err(BuildError::repeated_repetition(offset));
            }
        }
        Ok(Pattern { tokens: Arc::from(tokens) })
    }

    /// Returns the empty pattern, which only matches the empty haystack.
    pub fn empty() -> Pattern<T> {
        Pattern { tokens: Arc::from(Vec::new()) }
    }

    /// Returns the tokens of this pattern.
    #[inline]
    pub fn tokens(&self) -> &[Token<T>] {
        &self.tokens
    }

    /// Returns the number of tokens in this pattern.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if this pattern has no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns true when the token following the given offset is a
    /// repetition, i.e., when the token at `offset` starts a repeated atom.
    #[inline]
    pub fn is_repeated(&self, offset: usize) -> bool {
        self.tokens.get(offset + 1).map_or(false, |t| t.is_repeat())
    }

    /// Returns an iterator over the atoms of this pattern, in order.
    pub fn atoms(&self) -> Atoms<'_, T> {
        Atoms { tokens: &self.tokens, offset: 0 }
    }

    /// Returns the number of atoms that are not repeated. Every such atom
    /// consumes exactly one symbol, so no haystack shorter than this can
    /// match.
    pub fn min_len(&self) -> usize {
        self.atoms().filter(|a| !a.is_repeated()).count()
    }

    /// Returns true if this pattern contains at least one repetition.
    pub fn has_repetition(&self) -> bool {
        self.tokens.iter().any(|t| t.is_repeat())
    }

    /// Returns true if every token in this pattern is a literal. Such a
    /// pattern matches exactly one haystack.
    pub fn is_literal(&self) -> bool {
        self.tokens.iter().all(|t| t.literal().is_some())
    }
}

impl<T: Clone> Pattern<T> {
    /// Build a pattern that matches exactly the given sequence of symbols.
    ///
    /// This cannot fail since literal tokens are always well formed.
    pub fn literal(symbols: &[T]) -> Pattern<T> {
        let tokens: Vec<Token<T>> =
            symbols.iter().cloned().map(Token::Literal).collect();
        Pattern { tokens: Arc::from(tokens) }
    }
}

/// A literal or wildcard token, and whether a repetition follows it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Atom<'a, T> {
    offset: usize,
    token: &'a Token<T>,
    repeated: bool,
}

impl<'a, T> Atom<'a, T> {
    /// The offset of this atom's token in its pattern.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The token quantified by this atom. This is never
    /// [`Token::Repeat`].
    pub fn token(&self) -> &'a Token<T> {
        self.token
    }

    /// Whether this atom may match zero or more symbols instead of exactly
    /// one.
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }
}

/// An iterator over the atoms of a pattern.
///
/// This is created by [`Pattern::atoms`].
#[derive(Clone, Debug)]
pub struct Atoms<'a, T> {
    tokens: &'a [Token<T>],
    offset: usize,
}

impl<'a, T> Iterator for Atoms<'a, T> {
    type Item = Atom<'a, T>;

    fn next(&mut self) -> Option<Atom<'a, T>> {
        let token = self.tokens.get(self.offset)?;
        let offset = self.offset;
        let repeated =
            self.tokens.get(offset + 1).map_or(false, |t| t.is_repeat());
        self.offset += if repeated { 2 } else { 1 };
        Some(Atom { offset, token, repeated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;

    use super::Token::{Any, Literal as Lit, Repeat};

    #[test]
    fn validation() {
        assert!(Pattern::<u8>::new(vec![]).is_ok());
        assert!(Pattern::new(vec![Lit(b'a'), Repeat, Any, Repeat]).is_ok());

        let err = Pattern::<u8>::new(vec![Repeat]).unwrap_err();
        assert_eq!(Some(0), err.offset());
        assert!(err.is_malformed_pattern());

        let err = Pattern::new(vec![Lit(b'a'), Repeat, Repeat]).unwrap_err();
        assert_eq!(Some(2), err.offset());

        let err = Pattern::new(vec![Any, Lit(b'b'), Repeat, Repeat, Any])
            .unwrap_err();
        assert_eq!(Some(3), err.offset());
    }

    #[test]
    fn atoms() {
        let pat =
            Pattern::new(vec![Lit('m'), Lit('i'), Repeat, Any, Any, Repeat])
                .unwrap();
        let got: Vec<(usize, bool)> =
            pat.atoms().map(|a| (a.offset(), a.is_repeated())).collect();
        assert_eq!(vec![(0, false), (1, true), (3, false), (4, true)], got);
        assert!(pat.atoms().all(|a| !a.token().is_repeat()));
        assert_eq!(2, pat.min_len());
        assert!(pat.has_repetition());
        assert!(!pat.is_literal());
    }

    #[test]
    fn literal() {
        let pat = Pattern::literal(b"abc");
        assert_eq!(3, pat.len());
        assert_eq!(3, pat.min_len());
        assert!(pat.is_literal());
        assert!(!pat.has_repetition());

        let empty = Pattern::<u8>::empty();
        assert!(empty.is_empty());
        assert!(empty.is_literal());
        assert_eq!(0, empty.atoms().count());
    }

    #[test]
    fn predicate() {
        assert!(Lit(b'a').matches(&b'a'));
        assert!(!Lit(b'a').matches(&b'b'));
        assert!(Any.matches(&b'z'));
        assert!(!Token::<u8>::Repeat.matches(&b'*'));
    }

    #[test]
    fn is_repeated() {
        let pat = Pattern::new(vec![Lit(1u32), Repeat, Lit(2)]).unwrap();
        assert!(pat.is_repeated(0));
        assert!(!pat.is_repeated(1));
        assert!(!pat.is_repeated(2));
        assert!(!pat.is_repeated(10));
    }
}
