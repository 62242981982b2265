//! What the transform needs from a stylesheet tree, and the implementation for
//! [`css_syntax::Stylesheet`].

use css_syntax::{AtRuleBlock, Declaration, Rule, Stylesheet};
use std::path::Path;

/// An ordered, mutable list of sibling declarations.
pub trait DeclarationBlock {
    fn len(&self) -> usize;

    /// `(property, value)` of the declaration at `index`.
    fn get(&self, index: usize) -> Option<(&str, &str)>;

    /// Overwrite the value at `index`. Out-of-range indices are ignored.
    fn set_value(&mut self, index: usize, value: String);

    /// Insert a copy of the declaration at `index`, carrying `value`, right after it.
    /// Out-of-range indices are ignored.
    fn insert_after(&mut self, index: usize, value: String);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether some declaration has exactly this property and value.
    fn contains(&self, property: &str, value: &str) -> bool {
        (0..self.len()).any(|index| self.get(index) == Some((property, value)))
    }
}

/// A stylesheet the transform can walk and edit.
pub trait StyleTree {
    type Block: DeclarationBlock;

    /// File the stylesheet came from, if any.
    fn source_file(&self) -> Option<&Path>;

    /// Visit every declaration block in document order, with the selector of the
    /// rule owning it (`None` for blocks such as `@font-face`).
    fn walk_declaration_blocks<F>(&mut self, visit: &mut F)
    where
        F: FnMut(Option<&str>, &mut Self::Block);

    /// Visit the prelude of every at-rule called `name` (ASCII case-insensitive),
    /// in document order, including at-rules nested in other at-rules.
    fn walk_at_rules<F>(&mut self, name: &str, visit: &mut F)
    where
        F: FnMut(&mut String);
}

impl DeclarationBlock for Vec<Declaration> {
    fn len(&self) -> usize {
        <[Declaration]>::len(self)
    }

    fn get(&self, index: usize) -> Option<(&str, &str)> {
        <[Declaration]>::get(self, index).map(|decl| (decl.name.as_str(), decl.value.as_str()))
    }

    fn set_value(&mut self, index: usize, value: String) {
        if let Some(decl) = self.get_mut(index) {
            decl.value = value;
        }
    }

    fn insert_after(&mut self, index: usize, value: String) {
        let Some(original) = <[Declaration]>::get(self, index) else {
            return;
        };
        let copy = Declaration {
            value,
            ..original.clone()
        };
        self.insert(index + 1, copy);
    }
}

impl StyleTree for Stylesheet {
    type Block = Vec<Declaration>;

    fn source_file(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn walk_declaration_blocks<F>(&mut self, visit: &mut F)
    where
        F: FnMut(Option<&str>, &mut Self::Block),
    {
        walk_blocks(&mut self.rules, None, visit);
    }

    fn walk_at_rules<F>(&mut self, name: &str, visit: &mut F)
    where
        F: FnMut(&mut String),
    {
        walk_named_at_rules(&mut self.rules, name, visit);
    }
}

fn walk_blocks<F>(rules: &mut [Rule], parent: Option<&str>, visit: &mut F)
where
    F: FnMut(Option<&str>, &mut Vec<Declaration>),
{
    for rule in rules {
        match rule {
            Rule::Style(style) => {
                visit(Some(style.prelude.as_str()), &mut style.declarations);
                walk_blocks(&mut style.rules, Some(style.prelude.as_str()), visit);
            }
            Rule::At(at) => match &mut at.block {
                Some(AtRuleBlock::Rules(nested)) => walk_blocks(nested, parent, visit),
                Some(AtRuleBlock::Declarations(decls)) => visit(None, decls),
                // Declarations of `.a { @media ... { top: 1px } }` belong to `.a`.
                Some(AtRuleBlock::Nested {
                    declarations,
                    rules: nested,
                }) => {
                    visit(parent, declarations);
                    walk_blocks(nested, parent, visit);
                }
                None => {}
            },
        }
    }
}

fn walk_named_at_rules<F>(rules: &mut [Rule], name: &str, visit: &mut F)
where
    F: FnMut(&mut String),
{
    for rule in rules {
        let nested = match rule {
            Rule::Style(style) => &mut style.rules,
            Rule::At(at) => {
                if at.name.eq_ignore_ascii_case(name) {
                    visit(&mut at.prelude);
                }
                match &mut at.block {
                    Some(AtRuleBlock::Rules(nested) | AtRuleBlock::Nested { rules: nested, .. }) => {
                        nested
                    }
                    Some(AtRuleBlock::Declarations(_)) | None => continue,
                }
            }
        };
        walk_named_at_rules(nested, name, visit);
    }
}
