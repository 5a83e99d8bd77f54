//! Upload decoding (XLSX workbook, CSV, previous export) and ZIP-of-CSV
//! export encoding.

use std::io::{Cursor, Read, Write};

use calamine::{Data, Reader, Xlsx};
use padron_core::codec::TableCodec;
use padron_core::error::CoreError;
use padron_core::export::{Sheet, ORIGINAL_SHEET};
use padron_core::table::RawTable;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const UTF8_BOM: char = '\u{feff}';

/// Reads XLSX and CSV uploads and writes each export sheet as `<NAME>.csv`
/// inside a ZIP archive.
///
/// An `.xlsx` upload yields its first worksheet. Decoding a previously
/// exported archive reads back its `ORIGINAL` sheet, so an export can be
/// corrected and uploaded again.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvZipCodec;

impl CsvZipCodec {
    fn decode_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if let Some(first) = rows.first_mut().and_then(|r| r.first_mut()) {
            if first.starts_with(UTF8_BOM) {
                first.remove(0);
            }
        }
        Ok(rows)
    }

    /// Both workbooks and exports are ZIP containers; a workbook is told
    /// apart by its `xl/workbook.xml` part.
    fn decode_archive(bytes: &[u8]) -> Result<Vec<Vec<String>>, DecodeError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        if archive.index_for_name(WORKBOOK_PART).is_some() {
            return Self::decode_first_worksheet(bytes);
        }

        let mut entry = archive.by_name(&sheet_file_name(ORIGINAL_SHEET))?;
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        Ok(Self::decode_csv(&buf)?)
    }

    fn decode_first_worksheet(bytes: &[u8]) -> Result<Vec<Vec<String>>, DecodeError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DecodeError::NoWorksheet)??;

        // The range starts at the first used cell; pad back to column A.
        let leading = range.start().map_or(0, |(_, col)| col as usize);
        let rows: Vec<Vec<String>> = range
            .rows()
            .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|cells| {
                std::iter::repeat(String::new())
                    .take(leading)
                    .chain(cells.iter().map(ToString::to_string))
                    .collect()
            })
            .collect();
        Ok(rows)
    }

    fn encode_zip(sheets: &[Sheet]) -> Result<Vec<u8>, EncodeError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for sheet in sheets {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(Vec::new());
            for row in &sheet.rows {
                writer.write_record(row)?;
            }
            let data = writer
                .into_inner()
                .map_err(|e| EncodeError::Io(e.into_error()))?;

            zip.start_file(sheet_file_name(&sheet.name), options)?;
            zip.write_all(&data)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

impl TableCodec for CsvZipCodec {
    fn extension(&self) -> &'static str {
        "zip"
    }

    fn decode(&self, bytes: &[u8]) -> Result<RawTable, CoreError> {
        let rows = if bytes.starts_with(ZIP_MAGIC) {
            Self::decode_archive(bytes)
        } else {
            Self::decode_csv(bytes).map_err(DecodeError::from)
        }
        .map_err(|e| CoreError::Decode(e.to_string()))?;

        RawTable::new(rows)
    }

    fn encode(&self, sheets: &[Sheet]) -> Result<Vec<u8>, CoreError> {
        Self::encode_zip(sheets).map_err(|e| CoreError::Encode(e.to_string()))
    }
}

fn sheet_file_name(sheet: &str) -> String {
    format!("{sheet}.csv")
}

#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Xlsx(#[from] calamine::XlsxError),
    #[error("workbook has no worksheets")]
    NoWorksheet,
}

#[derive(Debug, thiserror::Error)]
enum EncodeError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
