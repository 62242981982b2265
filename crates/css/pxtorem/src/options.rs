//! User-facing options and their JSON form.
//!
//! JSON options use the canonical camel-case names (`rootValue`, `unitPrecision`,
//! `selectorBlackList`, `propList`, `replace`, `mediaQuery`, `minPixelValue`,
//! `exclude`). Older snake-case names are rewritten first, see
//! [`normalize_legacy_options`]. Unknown keys are ignored.

use crate::selector_filter::SelectorRule;
use anyhow::{Context as _, Result, anyhow};
use core::fmt;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Legacy option names and the canonical names they stand for.
pub const LEGACY_OPTION_NAMES: [(&str, &str); 6] = [
    ("root_value", "rootValue"),
    ("unit_precision", "unitPrecision"),
    ("selector_black_list", "selectorBlackList"),
    ("prop_white_list", "propList"),
    ("media_query", "mediaQuery"),
    ("propWhiteList", "propList"),
];

const CANONICAL_OPTION_NAMES: [&str; 8] = [
    "rootValue",
    "unitPrecision",
    "selectorBlackList",
    "propList",
    "replace",
    "mediaQuery",
    "minPixelValue",
    "exclude",
];

/// Properties converted when `propList` is not given.
pub const DEFAULT_PROP_LIST: [&str; 4] = ["font", "font-size", "line-height", "letter-spacing"];

/// The stylesheet being processed, as seen by a dynamic root value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceInput {
    /// Path of the source file, when the stylesheet came from one.
    pub file: Option<PathBuf>,
}

impl SourceInput {
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
        }
    }
}

pub type RootValueFn = dyn Fn(&SourceInput) -> f64 + Send + Sync;
pub type ExcludeFn = dyn Fn(Option<&Path>) -> Result<bool> + Send + Sync;

/// Pixel size of `1rem`.
#[derive(Clone)]
pub enum RootValue {
    Fixed(f64),
    /// Evaluated once per stylesheet.
    Dynamic(Arc<RootValueFn>),
}

impl RootValue {
    pub fn dynamic(resolve: impl Fn(&SourceInput) -> f64 + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(resolve))
    }

    pub fn resolve(&self, source: &SourceInput) -> f64 {
        match self {
            Self::Fixed(value) => *value,
            Self::Dynamic(resolve) => resolve(source),
        }
    }
}

impl Default for RootValue {
    fn default() -> Self {
        Self::Fixed(16.0)
    }
}

impl fmt::Debug for RootValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => formatter.debug_tuple("Fixed").field(value).finish(),
            Self::Dynamic(_) => formatter.write_str("Dynamic(..)"),
        }
    }
}

/// Which source files are skipped entirely.
#[derive(Clone, Default)]
pub enum FileExclusion {
    #[default]
    None,
    /// Skip files whose path contains this text.
    Substring(String),
    /// Skip files whose path matches this regular expression.
    Pattern(String),
    /// Skip files for which the predicate returns `true`. Errors propagate to
    /// the caller of the transform.
    Predicate(Arc<ExcludeFn>),
}

impl FileExclusion {
    pub fn predicate(
        decide: impl Fn(Option<&Path>) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Self::Predicate(Arc::new(decide))
    }
}

impl fmt::Debug for FileExclusion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => formatter.write_str("None"),
            Self::Substring(text) => formatter.debug_tuple("Substring").field(text).finish(),
            Self::Pattern(source) => formatter.debug_tuple("Pattern").field(source).finish(),
            Self::Predicate(_) => formatter.write_str("Predicate(..)"),
        }
    }
}

/// Options for the px to rem transform, with canonical names.
#[derive(Clone, Debug)]
pub struct PxToRemOptions {
    pub root_value: RootValue,
    /// Decimal digits kept in converted values.
    pub unit_precision: u32,
    pub selector_black_list: Vec<SelectorRule>,
    pub prop_list: Vec<String>,
    /// Overwrite values in place instead of adding a converted copy after each declaration.
    pub replace: bool,
    /// Also convert `@media` preludes.
    pub media_query: bool,
    /// Literals below this many pixels are left alone.
    pub min_pixel_value: f64,
    pub exclude: FileExclusion,
}

impl Default for PxToRemOptions {
    fn default() -> Self {
        Self {
            root_value: RootValue::default(),
            unit_precision: 5,
            selector_black_list: Vec::new(),
            prop_list: DEFAULT_PROP_LIST.iter().map(|prop| (*prop).to_owned()).collect(),
            replace: true,
            media_query: false,
            min_pixel_value: 0.0,
            exclude: FileExclusion::None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawExclusion {
    Substring(String),
    Pattern { pattern: String },
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOptions {
    root_value: f64,
    unit_precision: u32,
    selector_black_list: Vec<SelectorRule>,
    prop_list: Vec<String>,
    replace: bool,
    media_query: bool,
    min_pixel_value: f64,
    exclude: Option<RawExclusion>,
}

impl Default for RawOptions {
    fn default() -> Self {
        let defaults = PxToRemOptions::default();
        Self {
            root_value: 16.0,
            unit_precision: defaults.unit_precision,
            selector_black_list: defaults.selector_black_list,
            prop_list: defaults.prop_list,
            replace: defaults.replace,
            media_query: defaults.media_query,
            min_pixel_value: defaults.min_pixel_value,
            exclude: None,
        }
    }
}

impl From<RawOptions> for PxToRemOptions {
    fn from(raw: RawOptions) -> Self {
        Self {
            root_value: RootValue::Fixed(raw.root_value),
            unit_precision: raw.unit_precision,
            selector_black_list: raw.selector_black_list,
            prop_list: raw.prop_list,
            replace: raw.replace,
            media_query: raw.media_query,
            min_pixel_value: raw.min_pixel_value,
            exclude: match raw.exclude {
                None => FileExclusion::None,
                Some(RawExclusion::Substring(text)) => FileExclusion::Substring(text),
                Some(RawExclusion::Pattern { pattern }) => FileExclusion::Pattern(pattern),
            },
        }
    }
}

impl PxToRemOptions {
    /// Read options from a JSON object, accepting legacy option names.
    ///
    /// # Errors
    /// Returns an error if `options` is not an object or an option has the wrong type.
    pub fn from_json(options: &Value) -> Result<Self> {
        let mut map = options
            .as_object()
            .cloned()
            .ok_or_else(|| anyhow!("options must be a JSON object"))?;
        normalize_legacy_options(&mut map);
        for key in map.keys() {
            if !CANONICAL_OPTION_NAMES.contains(&key.as_str()) {
                log::debug!(target: "css_pxtorem", "ignoring unknown option {key:?}");
            }
        }
        let raw: RawOptions =
            serde_json::from_value(Value::Object(map)).context("invalid px to rem options")?;
        Ok(raw.into())
    }

    /// Read options from JSON text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON or [`Self::from_json`] rejects it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("options are not valid JSON")?;
        Self::from_json(&value)
    }
}

/// Rewrite legacy option names to canonical ones, in place.
///
/// An empty `prop_white_list` / `propWhiteList` with no `propList` means
/// "convert every property" and becomes `propList: ["*"]`. Otherwise each legacy
/// key replaces its canonical counterpart.
pub fn normalize_legacy_options(options: &mut Map<String, Value>) {
    let empty_white_list = ["prop_white_list", "propWhiteList"].iter().any(|key| {
        options
            .get(*key)
            .and_then(Value::as_array)
            .is_some_and(Vec::is_empty)
    });
    if empty_white_list && !options.contains_key("propList") {
        options.insert("propList".to_owned(), Value::from(vec!["*"]));
        options.remove("prop_white_list");
        options.remove("propWhiteList");
    }
    for (legacy, canonical) in LEGACY_OPTION_NAMES {
        if let Some(value) = options.remove(legacy) {
            options.insert(canonical.to_owned(), value);
        }
    }
}
