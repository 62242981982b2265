//! CSS Values & Units Level 3 — §6 Dimensions (absolute `px` lengths)
//! Spec: <https://www.w3.org/TR/css-values-3/#absolute-lengths>

use crate::chapter_3_identifiers::{continues_word, is_name_byte};
use crate::chapter_4_numbers::scan_number;

/// The unit suffix recognised by [`pixel_tokens`]. Matching is case-sensitive.
pub const PIXEL_UNIT: &str = "px";

/// Explicit sign written in front of a pixel literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Source text of the sign.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

/// A `<number>px` literal located in a value string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelToken {
    /// Byte offset of the sign, or of the first digit when unsigned.
    pub start: usize,
    /// Byte offset one past the `px` suffix.
    pub end: usize,
    /// Sign written before the number, if any.
    pub sign: Option<Sign>,
    /// Unsigned numeric value.
    pub magnitude: f64,
}

/// Lazy iterator over the pixel literals of a string, in source order.
///
/// Quoted strings and `url(...)` bodies are skipped. The iterator is `Clone`,
/// so a scan can be restarted from any point by cloning it.
#[derive(Clone, Debug)]
pub struct PixelTokens<'input> {
    input: &'input str,
    cursor: usize,
}

/// Scan `input` for pixel literals.
///
/// A literal is an optional sign, `digits* ('.' digits+)?`, and the exact suffix
/// `px`. It must not continue a preceding identifier, hash or number, and the
/// suffix must not be the start of a longer identifier (`1pxa`, `--gap-2px`).
pub const fn pixel_tokens(input: &str) -> PixelTokens<'_> {
    PixelTokens { input, cursor: 0 }
}

impl Iterator for PixelTokens<'_> {
    type Item = PixelToken;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();
        while let Some(&byte) = bytes.get(self.cursor) {
            let pos = self.cursor;
            match byte {
                b'"' | b'\'' => self.cursor = skip_quoted(bytes, pos),
                b'u' | b'U' if starts_url(bytes, pos) => self.cursor = skip_url(bytes, pos),
                b'+' | b'-' | b'.' | b'0'..=b'9' => {
                    if let Some(token) = self.token_at(pos) {
                        self.cursor = token.end;
                        return Some(token);
                    }
                    self.cursor = skip_number_run(bytes, pos);
                }
                _ => self.cursor += 1,
            }
        }
        None
    }
}

impl PixelTokens<'_> {
    fn token_at(&self, pos: usize) -> Option<PixelToken> {
        let bytes = self.input.as_bytes();
        if pos > 0 && bytes.get(pos - 1).copied().is_some_and(continues_word) {
            return None;
        }
        let (sign, number_start) = match bytes.get(pos) {
            Some(b'+') => (Some(Sign::Plus), pos + 1),
            Some(b'-') => (Some(Sign::Minus), pos + 1),
            _ => (None, pos),
        };
        let literal = scan_number(self.input, number_start)?;
        let unit_end = literal.end + PIXEL_UNIT.len();
        if self.input.get(literal.end..unit_end) != Some(PIXEL_UNIT) {
            return None;
        }
        if bytes.get(unit_end).copied().is_some_and(is_name_byte) {
            return None;
        }
        Some(PixelToken {
            start: pos,
            end: unit_end,
            sign,
            magnitude: literal.value,
        })
    }
}

/// Skip a quoted string starting at `pos` (which holds the quote), honouring
/// backslash escapes. An unterminated string runs to the end of input.
fn skip_quoted(bytes: &[u8], pos: usize) -> usize {
    let Some(&quote) = bytes.get(pos) else {
        return pos;
    };
    let mut cursor = pos + 1;
    while let Some(&byte) = bytes.get(cursor) {
        match byte {
            b'\\' => cursor += 2,
            _ if byte == quote => return cursor + 1,
            _ => cursor += 1,
        }
    }
    bytes.len()
}

fn starts_url(bytes: &[u8], pos: usize) -> bool {
    if pos > 0 && bytes.get(pos - 1).copied().is_some_and(is_name_byte) {
        return false;
    }
    bytes
        .get(pos..pos + 4)
        .is_some_and(|head| head.eq_ignore_ascii_case(b"url("))
}

/// Skip `url(` up to and including the matching `)`.
fn skip_url(bytes: &[u8], pos: usize) -> usize {
    let mut cursor = pos + 4;
    while let Some(&byte) = bytes.get(cursor) {
        match byte {
            b'"' | b'\'' => cursor = skip_quoted(bytes, cursor),
            b')' => return cursor + 1,
            _ => cursor += 1,
        }
    }
    bytes.len()
}

/// Move past a rejected sign or a run of digits and dots so that its tail is
/// never picked up as a literal of its own.
fn skip_number_run(bytes: &[u8], pos: usize) -> usize {
    if matches!(bytes.get(pos), Some(b'+' | b'-')) {
        return pos + 1;
    }
    let mut cursor = pos + 1;
    while bytes
        .get(cursor)
        .is_some_and(|byte| byte.is_ascii_digit() || *byte == b'.')
    {
        cursor += 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::{PixelToken, Sign, pixel_tokens};

    fn spans(input: &str) -> Vec<&str> {
        pixel_tokens(input)
            .map(|token| &input[token.start..token.end])
            .collect()
    }

    #[test]
    fn single_literal() {
        let tokens: Vec<PixelToken> = pixel_tokens("16px").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 4));
        assert_eq!(tokens[0].sign, None);
        assert!((tokens[0].magnitude - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shorthand_with_signs() {
        assert_eq!(
            spans("0 -8px +4px .5px 1.25px"),
            vec!["-8px", "+4px", ".5px", "1.25px"]
        );
        let signs: Vec<Option<Sign>> = pixel_tokens("-8px +4px 2px").map(|token| token.sign).collect();
        assert_eq!(signs, vec![Some(Sign::Minus), Some(Sign::Plus), None]);
    }

    #[test]
    fn sign_is_kept_apart_from_magnitude() {
        let token = pixel_tokens("translate(-3px)").next().unwrap();
        assert_eq!(token.sign, Some(Sign::Minus));
        assert!((token.magnitude - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn function_arguments() {
        assert_eq!(spans("calc(100% - 20px)"), vec!["20px"]);
        assert_eq!(spans("rgba(0,0,0,.5) 0 2px 4px"), vec!["2px", "4px"]);
    }

    #[test]
    fn unit_must_end_the_word() {
        assert!(spans("1pxa").is_empty());
        assert!(spans("10px-wide").is_empty());
        assert!(spans("16PX").is_empty());
        assert!(spans("2em").is_empty());
    }

    #[test]
    fn literal_must_not_continue_a_word() {
        assert!(spans("var(--gap-16px)").is_empty());
        assert!(spans("item16px").is_empty());
        assert!(spans("1e3px").is_empty());
        assert!(spans("1.5.5px").is_empty());
        assert!(spans("#10px").is_empty());
    }

    #[test]
    fn quoted_strings_and_urls_are_skipped() {
        assert_eq!(spans(r#""12px" 3px"#), vec!["3px"]);
        assert_eq!(spans("'a\\'12px' 5px"), vec!["5px"]);
        assert_eq!(spans("url(img-20px.png) 6px"), vec!["6px"]);
        assert_eq!(spans("URL(\"a)1px\") 7px"), vec!["7px"]);
        assert!(spans("\"unterminated 4px").is_empty());
    }

    #[test]
    fn no_literals() {
        assert_eq!(pixel_tokens("auto").count(), 0);
        assert_eq!(pixel_tokens("").count(), 0);
        assert_eq!(pixel_tokens("px").count(), 0);
    }

    #[test]
    fn restartable_by_clone() {
        let mut tokens = pixel_tokens("1px 2px 3px");
        let _first = tokens.next();
        let rest: Vec<PixelToken> = tokens.clone().collect();
        assert_eq!(rest.len(), 2);
        assert_eq!(tokens.count(), 2);
    }
}
