//! CSS Identifiers — name code points used to guard literal boundaries.
//! Spec: <https://www.w3.org/TR/css-syntax-3/#name-code-point>

/// True if `byte` may appear inside an identifier (`[A-Za-z0-9_-]`, an escape,
/// or any byte of a non-ASCII code point).
#[inline]
pub const fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'\\') || !byte.is_ascii()
}

/// True if a literal starting right after `byte` would continue a preceding
/// identifier, hash, or number instead of starting a new token.
#[inline]
pub const fn continues_word(byte: u8) -> bool {
    is_name_byte(byte) || matches!(byte, b'.' | b'#')
}

#[cfg(test)]
mod tests {
    use super::{continues_word, is_name_byte};

    #[test]
    fn name_bytes() {
        assert!(is_name_byte(b'a'));
        assert!(is_name_byte(b'Z'));
        assert!(is_name_byte(b'7'));
        assert!(is_name_byte(b'-'));
        assert!(is_name_byte(0xC3));
        assert!(!is_name_byte(b' '));
        assert!(!is_name_byte(b'('));
        assert!(!is_name_byte(b','));
    }

    #[test]
    fn hash_and_dot_continue_words() {
        assert!(continues_word(b'#'));
        assert!(continues_word(b'.'));
        assert!(!continues_word(b':'));
        assert!(!continues_word(b'%'));
    }
}
