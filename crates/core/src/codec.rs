//! Boundary to spreadsheet file formats.

use crate::error::CoreError;
use crate::export::Sheet;
use crate::table::RawTable;

/// Decodes uploaded bytes into a [`RawTable`] and encodes export sheets.
///
/// Implementations own the binary format entirely; the validator only
/// sees rows of text.
pub trait TableCodec {
    /// File extension of encoded artifacts, without the dot.
    fn extension(&self) -> &'static str;

    /// Decode the first sheet of an uploaded file. A file without rows is
    /// [`CoreError::EmptyTable`]; a malformed file is [`CoreError::Decode`].
    fn decode(&self, bytes: &[u8]) -> Result<RawTable, CoreError>;

    fn encode(&self, sheets: &[Sheet]) -> Result<Vec<u8>, CoreError>;
}
