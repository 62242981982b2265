//! Validated, compiled options shared by every stylesheet of a run.

use crate::converter::PxConverter;
use crate::options::{ExcludeFn, FileExclusion, PxToRemOptions, RootValue, SourceInput};
use crate::prop_list::PropListMatcher;
use crate::selector_filter::SelectorFilter;
use anyhow::{Context as _, Result};
use core::fmt;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
enum CompiledExclusion {
    None,
    Substring(String),
    Pattern(Regex),
    Predicate(Arc<ExcludeFn>),
}

impl fmt::Debug for CompiledExclusion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => formatter.write_str("None"),
            Self::Substring(text) => formatter.debug_tuple("Substring").field(text).finish(),
            Self::Pattern(regex) => formatter.debug_tuple("Pattern").field(regex).finish(),
            Self::Predicate(_) => formatter.write_str("Predicate(..)"),
        }
    }
}

/// Immutable configuration: options validated once, with the property rules,
/// selector blacklist and exclusion pattern compiled.
///
/// It holds no per-file state and can be shared across threads.
#[derive(Clone, Debug)]
pub struct ConversionConfig {
    root_value: RootValue,
    unit_precision: u32,
    min_pixel_value: f64,
    props: PropListMatcher,
    selectors: SelectorFilter,
    replace: bool,
    media_query: bool,
    exclude: CompiledExclusion,
}

impl ConversionConfig {
    /// Validate and compile `options`.
    ///
    /// # Errors
    /// Returns an error for a static root value that is not positive, a negative
    /// minimum pixel value, a precision that is too large, or an invalid pattern.
    pub fn new(options: PxToRemOptions) -> Result<Self> {
        // A dynamic root value is checked once it is resolved for a file.
        let probe_root = match &options.root_value {
            RootValue::Fixed(root_value) => *root_value,
            RootValue::Dynamic(_) => 1.0,
        };
        PxConverter::new(probe_root, options.unit_precision, options.min_pixel_value)?;
        let exclude = match options.exclude {
            FileExclusion::None => CompiledExclusion::None,
            FileExclusion::Substring(text) => CompiledExclusion::Substring(text),
            FileExclusion::Pattern(source) => CompiledExclusion::Pattern(
                Regex::new(&source).with_context(|| format!("invalid exclude pattern {source:?}"))?,
            ),
            FileExclusion::Predicate(decide) => CompiledExclusion::Predicate(decide),
        };
        Ok(Self {
            root_value: options.root_value,
            unit_precision: options.unit_precision,
            min_pixel_value: options.min_pixel_value,
            props: PropListMatcher::new(&options.prop_list),
            selectors: SelectorFilter::new(&options.selector_black_list)?,
            replace: options.replace,
            media_query: options.media_query,
            exclude,
        })
    }

    /// Build from JSON options (legacy names accepted).
    ///
    /// # Errors
    /// See [`PxToRemOptions::from_json`] and [`Self::new`].
    pub fn from_json(options: &Value) -> Result<Self> {
        Self::new(PxToRemOptions::from_json(options)?)
    }

    /// Decide how one stylesheet is processed: `None` when the file is excluded,
    /// otherwise a converter bound to the root value resolved for this file.
    ///
    /// # Errors
    /// Propagates an error from an exclusion predicate, and rejects a dynamic
    /// root value that resolves to a non-positive number.
    pub fn for_source(&self, source: &SourceInput) -> Result<Option<PxConverter>> {
        if self.is_excluded(source)? {
            debug!(target: "css_pxtorem", "skipping excluded file {:?}", source.file);
            return Ok(None);
        }
        let root_value = self.root_value.resolve(source);
        debug!(target: "css_pxtorem", "root value {root_value} for {:?}", source.file);
        let converter = PxConverter::new(root_value, self.unit_precision, self.min_pixel_value)
            .with_context(|| format!("resolving root value for {:?}", source.file))?;
        Ok(Some(converter))
    }

    fn is_excluded(&self, source: &SourceInput) -> Result<bool> {
        let path = source.file.as_deref();
        let path_text = path.map(|file| file.to_string_lossy());
        Ok(match &self.exclude {
            CompiledExclusion::None => false,
            CompiledExclusion::Substring(text) => path_text.is_some_and(|file| file.contains(text.as_str())),
            CompiledExclusion::Pattern(regex) => path_text.is_some_and(|file| regex.is_match(&file)),
            CompiledExclusion::Predicate(decide) => decide(path)?,
        })
    }

    /// Whether declarations of `prop` are converted.
    pub fn matches_property(&self, prop: &str) -> bool {
        self.props.matches(prop)
    }

    /// Whether declarations under `selector` are left alone.
    pub fn is_selector_blacklisted(&self, selector: Option<&str>) -> bool {
        self.selectors.is_blacklisted(selector)
    }

    pub const fn replace(&self) -> bool {
        self.replace
    }

    pub const fn media_query(&self) -> bool {
        self.media_query
    }
}
