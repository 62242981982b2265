//! CSS Values & Units Level 3 — §4 Numbers
//! Spec: <https://www.w3.org/TR/css-values-3/#numeric-types>

/// An unsigned decimal literal found inside a larger string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericLiteral {
    /// Byte offset of the first character of the literal.
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
    /// Parsed value of the literal.
    pub value: f64,
}

/// Scan an unsigned decimal (`digits* ('.' digits+)?`, at least one digit) at `start`.
///
/// Exponents are not part of the grammar here: `1e3` scans as `1`.
/// Returns `None` when no digit is found at `start`.
pub fn scan_number(input: &str, start: usize) -> Option<NumericLiteral> {
    let bytes = input.as_bytes();
    let int_end = skip_digits(bytes, start);
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, int_end + 1);
        if frac_end > int_end + 1 {
            end = frac_end;
        }
    }
    if end == start {
        return None;
    }
    let value = input.get(start..end)?.parse::<f64>().ok()?;
    Some(NumericLiteral { start, end, value })
}

fn skip_digits(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}
