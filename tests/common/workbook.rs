//! Minimal measurement sheets on disk
//!
//! `write_xlsx_sheet` produces the smallest package the reader accepts:
//! workbook, its relationships and one worksheet with inline-string headers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// One sheet column: header plus cells, `None` for an empty cell
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub cells: Vec<Option<f64>>,
}

impl Column {
    pub fn new(header: &str, values: &[f64]) -> Self {
        Self {
            header: header.to_string(),
            cells: values.iter().copied().map(Some).collect(),
        }
    }

    pub fn with_gaps(header: &str, cells: &[Option<f64>]) -> Self {
        Self {
            header: header.to_string(),
            cells: cells.to_vec(),
        }
    }
}

fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn sheet_xml(columns: &[Column]) -> String {
    let rows = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (i, column) in columns.iter().enumerate() {
        xml.push_str(&format!(
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letter(i),
            column.header
        ));
    }
    xml.push_str("</row>");

    for r in 0..rows {
        let row = r + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, row));
        for (i, column) in columns.iter().enumerate() {
            if let Some(Some(v)) = column.cells.get(r) {
                xml.push_str(&format!(r#"<c r="{}{}"><v>{:?}</v></c>"#, column_letter(i), row, v));
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Write a workbook whose only worksheet is `sheet_name`
pub fn write_xlsx_sheet(path: &Path, sheet_name: &str, columns: &[Column]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        sheet_name
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#)
        .unwrap();

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(sheet_xml(columns).as_bytes()).unwrap();

    zip.finish().unwrap();
}

/// Write the same columns as a comma-separated sheet
pub fn write_csv_sheet(path: &Path, columns: &[Column]) {
    let rows = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
    let mut out = String::new();

    let headers: Vec<&str> = columns.iter().map(|c| c.header.as_str()).collect();
    out.push_str(&headers.join(","));
    out.push('\n');

    for r in 0..rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| match c.cells.get(r) {
                Some(Some(v)) => format!("{:?}", v),
                _ => String::new(),
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    std::fs::write(path, out).unwrap();
}
