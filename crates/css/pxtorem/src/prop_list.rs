//! Property-name rules (`propList`).
//!
//! Rule syntax, classified by shape:
//! - `*` alone: every property
//! - `*pos*`: property name contains `pos`
//! - `*-width`: property name ends with `-width`
//! - `font*`: property name starts with `font`
//! - `!rule`: any of the above, negated; negation always wins
//! - anything else: exact property name

/// How a single rule compares against a property name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchRule {
    /// `*`: matches everything.
    Wildcard,
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl MatchRule {
    fn pattern(&self) -> Option<&str> {
        match self {
            Self::Wildcard => None,
            Self::Exact(text) | Self::Prefix(text) | Self::Suffix(text) | Self::Contains(text) => {
                Some(text.as_str())
            }
        }
    }

    fn matches(&self, prop: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Exact(name) => prop == name,
            Self::Prefix(head) => prop.starts_with(head.as_str()),
            Self::Suffix(tail) => prop.ends_with(tail.as_str()),
            Self::Contains(part) => prop.contains(part.as_str()),
        }
    }
}

/// A classified rule: inclusion or (with a leading `!`) exclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropRule {
    Include(MatchRule),
    Exclude(MatchRule),
}

/// Classify one raw rule string.
///
/// Returns `None` for rules that can never match anything (`""`, `!`, `!*`,
/// a `*` in the middle of a name).
pub fn classify_rule(raw: &str) -> Option<PropRule> {
    if let Some(body) = raw.strip_prefix('!') {
        return match classify_body(body)? {
            MatchRule::Wildcard => None,
            rule => Some(PropRule::Exclude(rule)),
        };
    }
    classify_body(raw).map(PropRule::Include)
}

fn classify_body(body: &str) -> Option<MatchRule> {
    if body == "*" {
        return Some(MatchRule::Wildcard);
    }
    let rule = if let Some(inner) = body
        .strip_prefix('*')
        .and_then(|rest| rest.strip_suffix('*'))
    {
        MatchRule::Contains(inner.to_owned())
    } else if let Some(tail) = body.strip_prefix('*') {
        MatchRule::Suffix(tail.to_owned())
    } else if let Some(head) = body.strip_suffix('*') {
        MatchRule::Prefix(head.to_owned())
    } else {
        MatchRule::Exact(body.to_owned())
    };
    if rule
        .pattern()
        .is_some_and(|text| text.is_empty() || text.contains('*'))
    {
        return None;
    }
    Some(rule)
}

/// Compiled `propList`: the rules bucketed once, then queried per declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropListMatcher {
    /// `*` is the only rule.
    match_all: bool,
    /// `*` appears among the rules.
    has_wildcard: bool,
    include: Vec<MatchRule>,
    exclude: Vec<MatchRule>,
}

impl PropListMatcher {
    /// Compile a list of raw rules.
    pub fn new<S: AsRef<str>>(rules: &[S]) -> Self {
        let mut matcher = Self {
            match_all: rules.len() == 1 && rules.iter().all(|rule| rule.as_ref() == "*"),
            ..Self::default()
        };
        for raw in rules {
            match classify_rule(raw.as_ref()) {
                Some(PropRule::Include(MatchRule::Wildcard)) => matcher.has_wildcard = true,
                Some(PropRule::Include(rule)) => matcher.include.push(rule),
                Some(PropRule::Exclude(rule)) => matcher.exclude.push(rule),
                None => {
                    log::debug!(target: "css_pxtorem", "ignoring property rule {:?}", raw.as_ref());
                }
            }
        }
        matcher
    }

    /// Whether `prop` passes the rules.
    pub fn matches(&self, prop: &str) -> bool {
        if self.match_all {
            return true;
        }
        let included =
            self.has_wildcard || self.include.iter().any(|rule| rule.matches(prop));
        included && !self.exclude.iter().any(|rule| rule.matches(prop))
    }
}
