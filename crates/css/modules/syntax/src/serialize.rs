//! Serialization of the parsed tree back to CSS text.
//! Spec: <https://www.w3.org/TR/cssom-1/#serializing-css-values>

use crate::{AtRule, AtRuleBlock, Declaration, Rule, Stylesheet};

const INDENT: &str = "  ";

impl Stylesheet {
    /// Serialize to CSS text, one declaration per line, two-space indentation.
    pub fn to_css(&self) -> String {
        serialize_stylesheet(self)
    }
}

/// Serialize a stylesheet to CSS text.
pub fn serialize_stylesheet(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_rules(&mut out, &sheet.rules, 0);
    out
}

fn write_rules(out: &mut String, rules: &[Rule], depth: usize) {
    for rule in rules {
        match rule {
            Rule::Style(style) => {
                write_block_open(out, &style.prelude, depth);
                write_declarations(out, &style.declarations, depth + 1);
                write_rules(out, &style.rules, depth + 1);
                write_block_close(out, depth);
            }
            Rule::At(at) => write_at_rule(out, at, depth),
        }
    }
}

fn write_at_rule(out: &mut String, at: &AtRule, depth: usize) {
    let mut head = format!("@{}", at.name);
    if !at.prelude.is_empty() {
        head.push(' ');
        head.push_str(&at.prelude);
    }
    match &at.block {
        None => {
            push_indent(out, depth);
            out.push_str(&head);
            out.push_str(";\n");
        }
        Some(AtRuleBlock::Rules(rules)) => {
            write_block_open(out, &head, depth);
            write_rules(out, rules, depth + 1);
            write_block_close(out, depth);
        }
        Some(AtRuleBlock::Declarations(decls)) => {
            write_block_open(out, &head, depth);
            write_declarations(out, decls, depth + 1);
            write_block_close(out, depth);
        }
        Some(AtRuleBlock::Nested {
            declarations,
            rules,
        }) => {
            write_block_open(out, &head, depth);
            write_declarations(out, declarations, depth + 1);
            write_rules(out, rules, depth + 1);
            write_block_close(out, depth);
        }
    }
}

fn write_declarations(out: &mut String, decls: &[Declaration], depth: usize) {
    for decl in decls {
        push_indent(out, depth);
        out.push_str(&decl.name);
        out.push_str(": ");
        out.push_str(&decl.value);
        if decl.important {
            out.push_str(" !important");
        }
        out.push_str(";\n");
    }
}

fn write_block_open(out: &mut String, head: &str, depth: usize) {
    push_indent(out, depth);
    out.push_str(head);
    out.push_str(" {\n");
}

fn write_block_close(out: &mut String, depth: usize) {
    push_indent(out, depth);
    out.push_str("}\n");
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_stylesheet;

    #[test]
    fn style_rule_layout() {
        let sheet = parse_stylesheet(".a{font-size:16px;margin:0 !important}");
        assert_eq!(
            sheet.to_css(),
            ".a {\n  font-size: 16px;\n  margin: 0 !important;\n}\n"
        );
    }

    #[test]
    fn nested_and_statement_at_rules() {
        let sheet = parse_stylesheet(
            "@charset \"utf-8\";@media screen and (max-width:100px){.b{top:1px}}@font-face{font-family:x}",
        );
        assert_eq!(
            sheet.to_css(),
            "@charset \"utf-8\";\n\
             @media screen and (max-width:100px) {\n  .b {\n    top: 1px;\n  }\n}\n\
             @font-face {\n  font-family: x;\n}\n"
        );
    }

    #[test]
    fn nested_style_rules() {
        let sheet = parse_stylesheet(".a{top:1px;&:hover{top:2px}@media print{top:3px;.b{top:4px}}}");
        assert_eq!(
            sheet.to_css(),
            ".a {\n  top: 1px;\n  &:hover {\n    top: 2px;\n  }\n  @media print {\n    top: 3px;\n    .b {\n      top: 4px;\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn reparse_is_stable() {
        let css = "@media print { .a { left: 2px } } .c { padding: 1px 2px; & > .d { top: 0 } }";
        let once = parse_stylesheet(css).to_css();
        let twice = parse_stylesheet(&once).to_css();
        assert_eq!(once, twice);
    }
}
