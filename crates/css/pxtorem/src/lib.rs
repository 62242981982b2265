//! Pixel to `rem` conversion for stylesheet declarations.
//!
//! Every `<number>px` literal in a qualifying declaration value is rewritten as
//! `value / rootValue` followed by `rem`, rounded to `unitPrecision` digits.
//! Which declarations qualify is decided by property rules (`propList`), a
//! selector blacklist and an optional per-file exclusion; `@media` preludes can
//! be converted as well.
//!
//! ```
//! use css_pxtorem::{ConversionConfig, convert_css};
//! use serde_json::json;
//!
//! let config = ConversionConfig::from_json(&json!({ "propList": ["*"] })).unwrap();
//! let css = convert_css(".a { margin: 0 6px }", None, &config).unwrap();
//! assert_eq!(css, ".a {\n  margin: 0 0.375rem;\n}\n");
//! ```

#![forbid(unsafe_code)]

mod config;
mod converter;
mod driver;
mod options;
mod prop_list;
mod selector_filter;
mod tree;

pub use config::ConversionConfig;
pub use converter::{MAX_UNIT_PRECISION, PxConverter, REM_UNIT, to_fixed};
pub use driver::{TransformReport, px_to_rem};
pub use options::{
    DEFAULT_PROP_LIST, ExcludeFn, FileExclusion, LEGACY_OPTION_NAMES, PxToRemOptions, RootValue,
    RootValueFn, SourceInput, normalize_legacy_options,
};
pub use prop_list::{MatchRule, PropListMatcher, PropRule, classify_rule};
pub use selector_filter::{SelectorFilter, SelectorRule};
pub use tree::{DeclarationBlock, StyleTree};

use anyhow::Result;
use std::path::Path;

/// Parse `css`, convert it, and serialize the result.
///
/// `file` is the path used for the exclusion rule and a dynamic root value.
///
/// # Errors
/// See [`px_to_rem`].
pub fn convert_css(css: &str, file: Option<&Path>, config: &ConversionConfig) -> Result<String> {
    let mut sheet = css_syntax::parse_stylesheet(css);
    sheet.source = file.map(Path::to_path_buf);
    let report = px_to_rem(&mut sheet, config)?;
    log::debug!(
        target: "css_pxtorem",
        "{:?}: {} replaced, {} inserted, {} media queries",
        file,
        report.replaced,
        report.inserted,
        report.media_queries
    );
    Ok(sheet.to_css())
}
