use bstr::ByteSlice;

/// Escapes the given bytes for display in a failure report. Valid UTF-8 is
/// shown as is, except for ASCII control bytes and backslashes.
pub fn escape(bytes: &[u8]) -> String {
    let mut escaped = String::new();
    for (start, end, ch) in bytes.char_indices() {
        if ch == '\u{FFFD}' && &bytes[start..end] != "\u{FFFD}".as_bytes() {
            for &b in &bytes[start..end] {
                escape_byte(b, &mut escaped);
            }
        } else if ch.is_ascii() {
            escape_byte(ch as u8, &mut escaped);
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

/// Resolves `\xNN`, `\n`, `\r`, `\t` and `\\` escapes. Anything else that
/// follows a backslash is kept verbatim, backslash included.
pub fn unescape<B: AsRef<[u8]>>(s: B) -> Vec<u8> {
    let s = s.as_ref();
    let mut bytes = vec![];
    let mut i = 0;
    while i < s.len() {
        if s[i] != b'\\' {
            bytes.push(s[i]);
            i += 1;
            continue;
        }
        match s.get(i + 1) {
            Some(b'\\') => bytes.push(b'\\'),
            Some(b'n') => bytes.push(b'\n'),
            Some(b'r') => bytes.push(b'\r'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'x') => match hex_byte(s.get(i + 2..i + 4)) {
                Some(b) => {
                    bytes.push(b);
                    i += 4;
                    continue;
                }
                None => {
                    bytes.extend_from_slice(b"\\x");
                }
            },
            Some(&other) => {
                bytes.push(b'\\');
                bytes.push(other);
            }
            None => {
                bytes.push(b'\\');
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    bytes
}

fn hex_byte(digits: Option<&[u8]>) -> Option<u8> {
    let digits = std::str::from_utf8(digits?).ok()?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

fn escape_byte(byte: u8, into: &mut String) {
    match byte {
        0x20..=0x5B | 0x5D..=0x7E => into.push(byte as char),
        b'\n' => into.push_str(r"\n"),
        b'\r' => into.push_str(r"\r"),
        b'\t' => into.push_str(r"\t"),
        b'\\' => into.push_str(r"\\"),
        _ => into.push_str(&format!(r"\x{:02X}", byte)),
    }
}
