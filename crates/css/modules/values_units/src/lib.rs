//! CSS Values and Units Module Level 3 — lexical scanning of numbers and pixel lengths.
//! Spec: <https://www.w3.org/TR/css-values-3/>
//!
//! This crate does not build a token stream for whole stylesheets; it only finds
//! `<number>px` literals inside raw declaration values so that callers can splice
//! rewritten text back into the original string.

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the CSS Values and Units table of contents.
pub mod chapter_3_identifiers;
pub mod chapter_4_numbers;
pub mod chapter_6_dimensions;

// Re-exports for ergonomic access from other crates.
pub use chapter_3_identifiers::{continues_word, is_name_byte};
pub use chapter_4_numbers::{NumericLiteral, scan_number};
pub use chapter_6_dimensions::{PIXEL_UNIT, PixelToken, PixelTokens, Sign, pixel_tokens};
