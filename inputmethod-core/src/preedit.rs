//! Conversion of public preedit attributes into the engine's representation

use crate::engine::CoreAttribute;
use crate::types::PreeditAttribute;

/// Converts a preedit attribute list into engine attributes, consuming it.
///
/// Order and the per-segment tuples are preserved exactly.
pub fn convert_attributes(attributes: Vec<PreeditAttribute>) -> Vec<CoreAttribute> {
    attributes
        .into_iter()
        .map(|attr| CoreAttribute {
            start: attr.start,
            length: attr.length,
            kind: attr.kind as u32,
            value: attr.value.bits(),
        })
        .collect()
}
