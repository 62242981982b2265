//! CSS Syntax Module Level 3 — Parsing and tokenization.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Rules keep their raw prelude text and declarations keep their raw value
//! text. Serialization reproduces whatever a transform left untouched.

mod serialize;

pub use serialize::serialize_stylesheet;

use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use cssparser::Token;
use log::debug;
use std::path::PathBuf;

/// At-rules whose block holds declarations rather than nested rules.
const DECLARATION_BLOCK_AT_RULES: [&str; 6] = [
    "font-face",
    "page",
    "counter-style",
    "property",
    "viewport",
    "font-palette-values",
];

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name (custom properties keep their case).
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

impl Declaration {
    /// A declaration without `!important`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }
}

/// A single style rule with a raw prelude and parsed declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Raw prelude text (typically the selector list).
    pub prelude: String,
    /// Declarations within the rule block.
    pub declarations: Vec<Declaration>,
    /// Nested rules (`&:hover { ... }`, `@media ... { ... }`), after the declarations.
    pub rules: Vec<Rule>,
}

/// Contents of an at-rule block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtRuleBlock {
    /// Nested rules, as in `@media` or `@supports`.
    Rules(Vec<Rule>),
    /// Declarations, as in `@font-face` or `@page`.
    Declarations(Vec<Declaration>),
    /// Body of a conditional rule nested in a style rule: declarations that
    /// apply to the enclosing selector, then further nested rules.
    Nested {
        declarations: Vec<Declaration>,
        rules: Vec<Rule>,
    },
}

/// An at-rule such as `@media (min-width: 10px) { ... }` or `@import "a.css";`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Lowercased name without the `@`.
    pub name: String,
    /// Raw prelude text (the media query list for `@media`).
    pub prelude: String,
    /// Block contents, `None` for statement at-rules ending in `;`.
    pub block: Option<AtRuleBlock>,
}

/// A rule in a stylesheet or in a nested at-rule block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Style(StyleRule),
    At(AtRule),
}

/// A parsed stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// File the stylesheet was read from, when known.
    pub source: Option<PathBuf>,
    /// Top-level rules in source order.
    pub rules: Vec<Rule>,
    /// Number of rules and declarations that failed to parse and were dropped.
    pub dropped: usize,
}

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(pos) = trimmed.rfind("!important")
        && let Some(prefix) = trimmed.get(..pos)
        && trimmed.get(pos..).is_some_and(|tail| tail == "!important")
    {
        let head = prefix.trim_end();
        return (head.to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

fn normalize_property_name(name: &str) -> String {
    if name.starts_with("--") {
        name.to_owned()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Consume the rest of `input` and return its trimmed source text.
fn consume_raw<'input>(input: &mut Parser<'input, '_>) -> String {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start).trim().to_owned()
}

/// An item of a style rule body.
enum BodyItem {
    Declaration(Declaration),
    Rule(Rule),
}

/// Contents of a declaration block: declarations, nested rules, dropped item count.
type Body = (Vec<Declaration>, Vec<Rule>, usize);

/// A body parser that records declarations with their raw value and, when
/// `nested` is set, nested style rules and at-rules.
struct BodyDeclParser {
    nested: bool,
    dropped: usize,
}

impl CssDeclarationParser<'_> for BodyDeclParser {
    type Declaration = BodyItem;
    type Error = ();

    fn parse_value<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let start = input.position();
        let mut has_block = false;
        // Consume until end of the declaration item.
        while let Ok(token) = input.next_including_whitespace_and_comments() {
            has_block |= matches!(token, Token::CurlyBracketBlock);
        }
        // `a:hover { ... }` is a nested rule, not a declaration. Custom
        // properties may hold blocks.
        if has_block && self.nested && !name.starts_with("--") {
            return Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid));
        }
        let raw = input.slice_from(start);
        let (value, important) = split_important_tail(raw);
        Ok(BodyItem::Declaration(Declaration {
            name: normalize_property_name(&name),
            value,
            important,
        }))
    }
}

impl CssAtRuleParser<'_> for BodyDeclParser {
    type Prelude = (String, String); // (lowercased name, raw prelude)
    type AtRule = BodyItem;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok((name.to_ascii_lowercase(), consume_raw(input)))
    }

    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        if !self.nested {
            return Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid));
        }
        let (name, prelude_text) = prelude;
        let block = if DECLARATION_BLOCK_AT_RULES.contains(&name.as_str()) {
            let (declarations, _, dropped) = parse_body(input, false);
            self.dropped += dropped;
            AtRuleBlock::Declarations(declarations)
        } else {
            let (declarations, rules, dropped) = parse_body(input, true);
            self.dropped += dropped;
            AtRuleBlock::Nested {
                declarations,
                rules,
            }
        };
        Ok(BodyItem::Rule(Rule::At(AtRule {
            name,
            prelude: prelude_text,
            block: Some(block),
        })))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        if !self.nested {
            return Err(());
        }
        let (name, prelude_text) = prelude;
        Ok(BodyItem::Rule(Rule::At(AtRule {
            name,
            prelude: prelude_text,
            block: None,
        })))
    }
}

impl CssQualifiedRuleParser<'_> for BodyDeclParser {
    type Prelude = String; // raw selector/prelude
    type QualifiedRule = BodyItem;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        if !self.nested {
            return Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid));
        }
        Ok(consume_raw(input))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let (declarations, rules, dropped) = parse_body(input, true);
        self.dropped += dropped;
        Ok(BodyItem::Rule(Rule::Style(StyleRule {
            prelude,
            declarations,
            rules,
        })))
    }
}

impl CssRuleBodyItemParser<'_, BodyItem, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        self.nested
    }
}

/// Parser for rule lists, used both at the top level and inside at-rule blocks.
#[derive(Default)]
struct RuleListParser {
    dropped: usize,
}

impl CssAtRuleParser<'_> for RuleListParser {
    type Prelude = (String, String); // (lowercased name, raw prelude)
    type AtRule = Rule;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok((name.to_ascii_lowercase(), consume_raw(input)))
    }

    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        let (name, prelude_text) = prelude;
        let block = if DECLARATION_BLOCK_AT_RULES.contains(&name.as_str()) {
            let (declarations, _, dropped) = parse_body(input, false);
            self.dropped += dropped;
            AtRuleBlock::Declarations(declarations)
        } else {
            let (rules, dropped) = parse_rules_from_block(input);
            self.dropped += dropped;
            AtRuleBlock::Rules(rules)
        };
        Ok(Rule::At(AtRule {
            name,
            prelude: prelude_text,
            block: Some(block),
        }))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        let (name, prelude_text) = prelude;
        Ok(Rule::At(AtRule {
            name,
            prelude: prelude_text,
            block: None,
        }))
    }
}

impl CssQualifiedRuleParser<'_> for RuleListParser {
    type Prelude = String; // raw selector/prelude
    type QualifiedRule = Rule;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(consume_raw(input))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let (declarations, rules, dropped) = parse_body(input, true);
        self.dropped += dropped;
        Ok(Rule::Style(StyleRule {
            prelude,
            declarations,
            rules,
        }))
    }
}

impl CssDeclarationParser<'_> for RuleListParser {
    type Declaration = Rule; // Not produced
    type Error = ();

    fn parse_value<'input>(
        &mut self,
        _name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl CssRuleBodyItemParser<'_, Rule, ()> for RuleListParser {
    fn parse_declarations(&self) -> bool {
        false
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Parse a declaration block using `cssparser` body parser. Nested rules are
/// only accepted when `nested` is set (style rule bodies).
fn parse_body(block: &mut Parser, nested: bool) -> Body {
    let mut declarations: Vec<Declaration> = Vec::new();
    let mut rules: Vec<Rule> = Vec::new();
    let mut body = BodyDeclParser { nested, dropped: 0 };
    let mut dropped = 0;
    for item in CssRuleBodyParser::new(block, &mut body) {
        match item {
            Ok(BodyItem::Declaration(decl)) => declarations.push(decl),
            Ok(BodyItem::Rule(rule)) => rules.push(rule),
            Err((_, source)) => {
                debug!(target: "css_syntax", "dropping invalid declaration: {source:?}");
                dropped += 1;
            }
        }
    }
    (declarations, rules, dropped + body.dropped)
}

/// Parse a nested rule list (the block of `@media`, `@supports`, ...).
fn parse_rules_from_block(block: &mut Parser) -> (Vec<Rule>, usize) {
    let mut out: Vec<Rule> = Vec::new();
    let mut nested = RuleListParser::default();
    let mut dropped = 0;
    for item in CssRuleBodyParser::new(block, &mut nested) {
        match item {
            Ok(rule) => out.push(rule),
            Err((_, source)) => {
                debug!(target: "css_syntax", "dropping invalid nested rule: {source:?}");
                dropped += 1;
            }
        }
    }
    (out, dropped + nested.dropped)
}

/// Parse a full stylesheet into a `Stylesheet` using cssparser.
///
/// Parsing never fails; items that cannot be parsed are dropped and counted in
/// [`Stylesheet::dropped`].
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = RuleListParser::default();
    let mut sheet = Stylesheet::default();
    for item in StyleSheetParser::new(&mut parser, &mut top) {
        match item {
            Ok(rule) => sheet.rules.push(rule),
            Err((_, source)) => {
                debug!(target: "css_syntax", "dropping invalid rule: {source:?}");
                sheet.dropped += 1;
            }
        }
    }
    sheet.dropped += top.dropped;
    sheet
}

#[cfg(test)]
mod tests {
    use super::{AtRuleBlock, Declaration, Rule, parse_stylesheet, split_important_tail};

    #[test]
    fn important_tail() {
        assert_eq!(split_important_tail("10px !important"), ("10px".to_owned(), true));
        assert_eq!(split_important_tail(" 10px "), ("10px".to_owned(), false));
        assert_eq!(
            split_important_tail("\"!important\" x"),
            ("\"!important\" x".to_owned(), false)
        );
    }

    #[test]
    fn style_rules_and_declarations() {
        let sheet = parse_stylesheet(".a, .b { Font-Size: 16px; margin: 0 2px !important }");
        assert_eq!(sheet.rules.len(), 1);
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected a style rule");
        };
        assert_eq!(rule.prelude, ".a, .b");
        assert_eq!(
            rule.declarations,
            vec![
                Declaration::new("font-size", "16px"),
                Declaration {
                    name: "margin".to_owned(),
                    value: "0 2px".to_owned(),
                    important: true,
                },
            ]
        );
    }

    #[test]
    fn custom_property_keeps_case() {
        let sheet = parse_stylesheet(":root { --Gap: 4px }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected a style rule");
        };
        assert_eq!(rule.declarations[0].name, "--Gap");
    }

    #[test]
    fn media_block_holds_rules() {
        let sheet = parse_stylesheet("@media (min-width: 750px) { .a { width: 75px } }");
        let Rule::At(at) = &sheet.rules[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(at.name, "media");
        assert_eq!(at.prelude, "(min-width: 750px)");
        let Some(AtRuleBlock::Rules(nested)) = &at.block else {
            panic!("expected nested rules");
        };
        assert_eq!(nested.len(), 1);
    }

    #[test]
    fn font_face_block_holds_declarations() {
        let sheet = parse_stylesheet("@font-face { font-family: x; src: url(a.woff) }");
        let Rule::At(at) = &sheet.rules[0] else {
            panic!("expected an at-rule");
        };
        let Some(AtRuleBlock::Declarations(decls)) = &at.block else {
            panic!("expected declarations");
        };
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].value, "url(a.woff)");
    }

    #[test]
    fn statement_at_rule() {
        let sheet = parse_stylesheet("@import url(\"a.css\") screen;");
        let Rule::At(at) = &sheet.rules[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(at.name, "import");
        assert!(at.block.is_none());
    }

    #[test]
    fn nested_rules_are_kept() {
        let sheet = parse_stylesheet(
            ".a { top: 1px; &:hover { top: 2px } b:focus { top: 3px } @media print { top: 4px } }",
        );
        assert_eq!(sheet.dropped, 0);
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected a style rule");
        };
        assert_eq!(rule.declarations, vec![Declaration::new("top", "1px")]);
        assert_eq!(rule.rules.len(), 3);
        let Rule::Style(hover) = &rule.rules[0] else {
            panic!("expected a nested style rule");
        };
        assert_eq!(hover.prelude, "&:hover");
        assert_eq!(hover.declarations, vec![Declaration::new("top", "2px")]);
        let Rule::Style(focus) = &rule.rules[1] else {
            panic!("expected a nested style rule");
        };
        assert_eq!(focus.prelude, "b:focus");
        let Rule::At(media) = &rule.rules[2] else {
            panic!("expected a nested at-rule");
        };
        assert_eq!(
            media.block,
            Some(AtRuleBlock::Nested {
                declarations: vec![Declaration::new("top", "4px")],
                rules: Vec::new(),
            })
        );
    }

    #[test]
    fn custom_property_may_hold_a_block() {
        let sheet = parse_stylesheet(".a { --mixin: { top: 1px }; left: 2px }");
        let Rule::Style(rule) = &sheet.rules[0] else {
            panic!("expected a style rule");
        };
        assert!(rule.rules.is_empty());
        assert_eq!(rule.declarations[0].name, "--mixin");
        assert_eq!(rule.declarations[1], Declaration::new("left", "2px"));
    }

    #[test]
    fn font_face_rejects_nested_rules() {
        let sheet = parse_stylesheet("@font-face { font-family: x; .a { top: 1px } }");
        let Rule::At(at) = &sheet.rules[0] else {
            panic!("expected an at-rule");
        };
        let Some(AtRuleBlock::Declarations(decls)) = &at.block else {
            panic!("expected declarations");
        };
        assert_eq!(decls, &vec![Declaration::new("font-family", "x")]);
        assert_eq!(sheet.dropped, 1);
    }

    #[test]
    fn invalid_items_are_counted() {
        let sheet = parse_stylesheet(".a { color: red; ; 12 } .b { top: 1px }");
        assert_eq!(sheet.rules.len(), 2);
        assert!(sheet.dropped >= 1);
    }
}
