//! Applying the conversion to a whole stylesheet.

use crate::config::ConversionConfig;
use crate::converter::PxConverter;
use crate::options::SourceInput;
use crate::tree::{DeclarationBlock, StyleTree};
use anyhow::Result;
use css_values_units::PIXEL_UNIT;
use log::trace;

/// What a transform run changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// The file matched the exclusion rule and was not touched.
    pub excluded: bool,
    /// Declarations whose value was overwritten.
    pub replaced: usize,
    /// Converted copies inserted after their original declaration.
    pub inserted: usize,
    /// Declarations skipped because a sibling already carried the converted value.
    pub already_present: usize,
    /// `@media` preludes rewritten.
    pub media_queries: usize,
}

/// Convert pixel values in `tree` according to `config`.
///
/// Declarations are visited in document order. A declaration is converted when
/// its value mentions `px`, its property passes the property rules and its rule's
/// selector is not blacklisted. The converted value then either replaces the
/// original or is inserted as a copy right after it, unless a sibling with the
/// same property already has exactly that value. `@media` preludes are converted
/// afterwards when enabled.
///
/// # Errors
/// Propagates errors from the exclusion predicate and rejects a dynamic root
/// value that resolves to a non-positive number.
pub fn px_to_rem<T: StyleTree>(tree: &mut T, config: &ConversionConfig) -> Result<TransformReport> {
    let source = SourceInput {
        file: tree.source_file().map(ToOwned::to_owned),
    };
    let Some(converter) = config.for_source(&source)? else {
        return Ok(TransformReport {
            excluded: true,
            ..TransformReport::default()
        });
    };

    let mut report = TransformReport::default();
    tree.walk_declaration_blocks(&mut |selector: Option<&str>, block: &mut T::Block| {
        if config.is_selector_blacklisted(selector) {
            trace!(target: "css_pxtorem", "selector {selector:?} is blacklisted");
            return;
        }
        convert_block(config, &converter, block, &mut report);
    });

    if config.media_query() {
        tree.walk_at_rules("media", &mut |prelude: &mut String| {
            if !prelude.contains(PIXEL_UNIT) {
                return;
            }
            let converted = converter.convert(prelude);
            if converted != *prelude {
                trace!(target: "css_pxtorem", "@media {prelude} -> {converted}");
                *prelude = converted;
                report.media_queries += 1;
            }
        });
    }
    Ok(report)
}

fn convert_block<B: DeclarationBlock + ?Sized>(
    config: &ConversionConfig,
    converter: &PxConverter,
    block: &mut B,
    report: &mut TransformReport,
) {
    if block.is_empty() {
        return;
    }
    let mut index = 0;
    while let Some((property, value)) = block.get(index) {
        if !value.contains(PIXEL_UNIT) || !config.matches_property(property) {
            index += 1;
            continue;
        }
        let converted = converter.convert(value);
        if converted == value {
            index += 1;
            continue;
        }
        if block.contains(property, &converted) {
            trace!(target: "css_pxtorem", "{property}: {converted} already present");
            report.already_present += 1;
            index += 1;
            continue;
        }
        trace!(target: "css_pxtorem", "{property}: {value} -> {converted}");
        if config.replace() {
            block.set_value(index, converted);
            report.replaced += 1;
            index += 1;
        } else {
            block.insert_after(index, converted);
            report.inserted += 1;
            index += 2;
        }
    }
}
