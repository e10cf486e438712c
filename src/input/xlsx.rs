//! XLSX worksheet reader
//!
//! An XLSX workbook is a zip package of XML parts. Reading one worksheet's
//! cells takes four of them:
//!
//! ```text
//! xl/workbook.xml              sheet name  → relationship id
//! xl/_rels/workbook.xml.rels   relationship id → part path
//! xl/sharedStrings.xml         string table (optional)
//! xl/worksheets/sheetN.xml     <row r="..."><c r="C2" t="..."><v>...</v></c></row>
//! ```
//!
//! Only cell values are read; styles, formulas and comments are ignored.
//! A formula cell yields its cached value.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::ZipArchive;

use super::{Cell, CellValue, ColumnSource, InputError};

/// One worksheet of an XLSX workbook
pub struct XlsxSheet<R: Read + Seek> {
    archive: ZipArchive<R>,
    sheet_path: String,
    shared_strings: Vec<String>,
}

impl XlsxSheet<BufReader<File>> {
    /// Open worksheet `sheet` of the workbook at `path`
    pub fn open(path: impl AsRef<Path>, sheet: &str) -> Result<Self, InputError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), sheet)
    }
}

impl<R: Read + Seek> XlsxSheet<R> {
    /// Locate worksheet `sheet` in a workbook read from `reader`
    ///
    /// # Errors
    ///
    /// - [`InputError::MissingPart`] if the package lacks `xl/workbook.xml`,
    ///   its relationships, or the worksheet part
    /// - [`InputError::SheetNotFound`] if no sheet carries that name
    pub fn from_reader(reader: R, sheet: &str) -> Result<Self, InputError> {
        let mut archive = ZipArchive::new(reader)?;

        let sheets = read_workbook_sheets(&mut archive)?;
        let rels = read_workbook_rels(&mut archive)?;

        let r_id = sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, r_id)| r_id.clone())
            .ok_or_else(|| InputError::SheetNotFound {
                name: sheet.to_string(),
                available: sheets
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let sheet_path = rels
            .get(&r_id)
            .cloned()
            .ok_or_else(|| InputError::MissingPart(format!("worksheet for {}", r_id)))?;

        let shared_strings = read_shared_strings(&mut archive)?;

        debug!(
            "Sheet '{}' is {} ({} shared strings)",
            sheet,
            sheet_path,
            shared_strings.len()
        );

        Ok(Self {
            archive,
            sheet_path,
            shared_strings,
        })
    }

    /// Resolve a raw `<v>` payload by the cell's `t` attribute
    fn resolve(&self, cell_ref: &str, cell_type: Option<&str>, raw: &str) -> Result<CellValue, InputError> {
        let value = match cell_type {
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    InputError::InvalidCellReference(format!("{} (shared string '{}')", cell_ref, raw))
                })?;
                let s = self.shared_strings.get(idx).ok_or_else(|| {
                    InputError::InvalidCellReference(format!(
                        "{} (shared string index {} out of bounds)",
                        cell_ref, idx
                    ))
                })?;
                CellValue::Text(s.clone())
            }
            Some("b") => CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true")),
            Some("e") => CellValue::Error(raw.to_string()),
            Some("str") | Some("inlineStr") | Some("d") => CellValue::Text(raw.to_string()),
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(v) => CellValue::Number(v),
                Err(_) => CellValue::Text(raw.to_string()),
            },
            Some(_) => CellValue::Text(raw.to_string()),
        };
        Ok(value)
    }
}

impl<R: Read + Seek> ColumnSource for XlsxSheet<R> {
    fn cells(&mut self) -> Result<Vec<Cell>, InputError> {
        // Raw cells first: the archive borrow must end before shared strings are used
        let raw_cells = {
            let file = self
                .archive
                .by_name(&self.sheet_path)
                .map_err(|_| InputError::MissingPart(self.sheet_path.clone()))?;
            read_sheet_cells(BufReader::new(file))?
        };

        let mut cells = Vec::with_capacity(raw_cells.len());
        for raw in raw_cells {
            let value = match raw.value {
                Some(ref v) => self.resolve(&raw.reference, raw.cell_type.as_deref(), v)?,
                None => CellValue::Empty,
            };
            if value == CellValue::Empty {
                continue;
            }
            cells.push(Cell {
                row: raw.row,
                column: raw.column,
                value,
            });
        }

        Ok(cells)
    }
}

// =================================================================================================
// Package Parts
// =================================================================================================

/// `(name, r:id)` of every sheet, in workbook order
fn read_workbook_sheets<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<(String, String)>, InputError> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| InputError::MissingPart("xl/workbook.xml".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attribute(&e, b"name");
                let r_id = attribute(&e, b"r:id");
                if let (Some(name), Some(r_id)) = (name, r_id) {
                    sheets.push((name, r_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Relationship id → worksheet part path
fn read_workbook_rels<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<HashMap<String, String>, InputError> {
    let file = archive
        .by_name("xl/_rels/workbook.xml.rels")
        .map_err(|_| InputError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attribute(&e, b"Id");
                let target = attribute(&e, b"Target");
                let rel_type = attribute(&e, b"Type");

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        // Targets are relative to xl/ unless absolute
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{}", target),
                        };
                        rels.insert(id, full_path);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Shared string table; absent table is valid
fn read_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<String>, InputError> {
    let mut strings = Vec::new();

    let file = match archive.by_name("xl/sharedStrings.xml") {
        Ok(f) => f,
        Err(_) => return Ok(strings),
    };

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"t" => in_t = false,
                _ => {}
            },
            Event::Text(e) if in_t => {
                current.push_str(&e.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

// =================================================================================================
// Worksheet
// =================================================================================================

/// Cell as found in the sheet XML, before type resolution
#[derive(Debug, Default)]
struct RawCell {
    reference: String,
    row: u32,
    column: usize,
    cell_type: Option<String>,
    value: Option<String>,
}

/// Collect every `<c>` of `<sheetData>` in document (row) order
fn read_sheet_cells<B: std::io::BufRead>(reader: B) -> Result<Vec<RawCell>, InputError> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut cells = Vec::new();

    let mut current_row: u32 = 0;
    let mut next_column: usize = 0;
    let mut current: Option<RawCell> = None;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e, current_row)?;
                    next_column = 0;
                }
                b"c" => {
                    let cell = start_cell(&e, current_row, next_column)?;
                    next_column = cell.column + 1;
                    current = Some(cell);
                }
                b"v" if current.is_some() => in_value = true,
                b"t" if current.is_some() => in_inline_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_number(&e, current_row)?;
                    next_column = 0;
                }
                b"c" => {
                    let cell = start_cell(&e, current_row, next_column)?;
                    next_column = cell.column + 1;
                    cells.push(cell);
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(cell) = current.take() {
                        cells.push(cell);
                    }
                }
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Event::Text(e) if in_value || in_inline_text => {
                if let Some(cell) = current.as_mut() {
                    let text = e.unescape()?;
                    cell.value
                        .get_or_insert_with(String::new)
                        .push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

/// Row number from `<row r="...">`, or the next row when absent
fn row_number(e: &BytesStart, previous: u32) -> Result<u32, InputError> {
    match attribute(e, b"r") {
        Some(r) => r
            .parse::<u32>()
            .map_err(|_| InputError::InvalidCellReference(format!("row {}", r))),
        None => Ok(previous + 1),
    }
}

fn start_cell(e: &BytesStart, row: u32, next_column: usize) -> Result<RawCell, InputError> {
    let reference = attribute(e, b"r");
    let cell_type = attribute(e, b"t");

    let (row, column, reference) = match reference {
        Some(r) => {
            let (column, parsed_row) = parse_cell_reference(&r)?;
            (parsed_row, column, r)
        }
        None => (row, next_column, format!("R{}C{}", row, next_column + 1)),
    };

    Ok(RawCell {
        reference,
        row,
        column,
        cell_type,
        value: None,
    })
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Split an A1-style reference into `(0-based column, 1-based row)`
///
/// ```text
/// "A1"   → (0, 1)
/// "C12"  → (2, 12)
/// "AA3"  → (26, 3)
/// ```
pub fn parse_cell_reference(reference: &str) -> Result<(usize, u32), InputError> {
    let invalid = || InputError::InvalidCellReference(reference.to_string());

    let reference = reference.replace('$', "");
    let split = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (letters, digits) = reference.split_at(split);

    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    let column = letters
        .chars()
        .fold(0usize, |acc, c| acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1))
        - 1;
    let row = digits.parse::<u32>().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    Ok((column, row))
}

// =================================================================================================
// Tests
// =================================================================================================
