//! Field extraction: turns noisy OCR text into packaging metadata.
//!
//! Extraction is driven by an ordered list of [`FieldRule`] records. Each
//! rule names a field, the label phrasings that mark it on a package, and
//! the grammar of the value that follows. A small generic matcher compiles
//! the rules and searches the flattened text once per rule.

pub mod extractor;
pub mod rules;

pub use extractor::{extract_fields, flatten, FieldExtractor};
pub use rules::{standard_rules, FieldRule, LabelField, ValueGrammar};
