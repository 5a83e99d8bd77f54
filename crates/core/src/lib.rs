//! Pure domain logic for validating beneficiary-registry (PUB) spreadsheets.
//!
//! Nothing in this crate performs I/O, spawns tasks, or logs. Decoding and
//! encoding of spreadsheet files and fuzzy text matching sit behind the
//! [`codec::TableCodec`] and [`matcher::TextMatcher`] traits and are provided
//! by the `padron-validator` crate.

pub mod codec;
pub mod duplicates;
pub mod error;
pub mod export;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod rules;
pub mod schema;
pub mod table;
