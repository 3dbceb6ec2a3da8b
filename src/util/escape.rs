/*!
Helpers for printing symbols in error messages and debug output.
*/

use core::fmt;

/// Prints a byte in a Rust byte literal form, e.g., `b'a'` or `b'\xFF'`.
///
/// Hex escapes are always written with uppercase digits.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct DebugSymbol(pub u8);

impl fmt::Debug for DebugSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "b'")?;
        for (i, mut b) in core::ascii::escape_default(self.0).enumerate() {
            // capitalize \xab to \xAB
            if i >= 2 && b'a' <= b && b <= b'f' {
                b -= 32;
            }
            write!(f, "{}", char::from(b))?;
        }
        write!(f, "'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes() {
        assert_eq!("b'a'", format!("{:?}", DebugSymbol(b'a')));
        assert_eq!(r"b'\n'", format!("{:?}", DebugSymbol(b'\n')));
        assert_eq!(r"b'\xFF'", format!("{:?}", DebugSymbol(0xFF)));
        assert_eq!(r"b'\xAB'", format!("{:?}", DebugSymbol(0xAB)));
    }
}
