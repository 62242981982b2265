//! Selector blacklist (`selectorBlackList`).

use anyhow::{Context as _, Result};
use regex::Regex;
use serde::Deserialize;

/// A blacklist entry as written in options.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SelectorRule {
    /// Skips selectors containing this text.
    Literal(String),
    /// Skips selectors matching this regular expression.
    Pattern { pattern: String },
}

impl SelectorRule {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: source.into(),
        }
    }
}

#[derive(Clone, Debug)]
enum CompiledRule {
    Literal(String),
    Pattern(Regex),
}

/// Compiled blacklist.
#[derive(Clone, Debug, Default)]
pub struct SelectorFilter {
    rules: Vec<CompiledRule>,
}

impl SelectorFilter {
    /// # Errors
    /// Returns an error if a pattern rule is not a valid regular expression.
    pub fn new(rules: &[SelectorRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| match rule {
                SelectorRule::Literal(text) => Ok(CompiledRule::Literal(text.clone())),
                SelectorRule::Pattern { pattern } => Regex::new(pattern)
                    .map(CompiledRule::Pattern)
                    .with_context(|| format!("invalid selector pattern {pattern:?}")),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Whether declarations under `selector` must be left alone.
    ///
    /// Declarations without a selector (`@font-face`, `@page`) are never blacklisted.
    pub fn is_blacklisted(&self, selector: Option<&str>) -> bool {
        let Some(selector) = selector else {
            return false;
        };
        self.rules.iter().any(|rule| match rule {
            CompiledRule::Literal(text) => selector.contains(text.as_str()),
            CompiledRule::Pattern(regex) => regex.is_match(selector),
        })
    }
}
