//! Spreadsheet export of all registrations.
//!
//! Export happens in two steps. [`ExportPlan::from_records`] lays out cells,
//! decodes signature images and sizes columns; [`ExportPlan::render`] writes
//! the xlsx workbook. A signature that fails either step is logged and left
//! out; the rest of the export goes ahead.

use crate::error::ServerError;
use crate::record::Registration;
use crate::signature;
use rust_xlsxwriter::{Color, Format, FormatAlign, Image, ObjectMovement, Workbook};
use tracing::{debug, warn};

/// Media type of the exported workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `Content-Disposition` of the export download.
pub const EXPORT_DISPOSITION: &str = "attachment; filename=registrations.xlsx";

pub const WORKSHEET_NAME: &str = "Registrations";

pub const HEADERS: [&str; COLUMNS] = [
    "Name",
    "Grade",
    "Section",
    "LRN",
    "Emergency",
    "Address",
    "Contact",
    "Birthdate",
    "Condition",
    "Signature",
    "Image Code",
    "Entry Time",
];

pub const COLUMNS: usize = 12;

/// Zero-based column holding signature images.
pub const SIGNATURE_COLUMN: u16 = 9;

/// Longest text a worksheet cell accepts, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

const SIGNATURE_COLUMN_WIDTH: f64 = 30.0;
const MIN_TEXT_WIDTH: usize = 12;
const MAX_COLUMN_WIDTH: f64 = 255.0;
const WIDTH_PADDING: usize = 2;
const HEADER_ROW_HEIGHT: f64 = 25.0;
const DATA_ROW_HEIGHT: f64 = 80.0;
const HEADER_BACKGROUND: u32 = 0x1976D2;

/// A decoded signature anchored to a worksheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedImage {
    /// Zero-based worksheet row
    pub row: u32,
    pub bytes: Vec<u8>,
}

/// Cell layout of the export, ready to render.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    rows: Vec<[String; COLUMNS]>,
    images: Vec<PlacedImage>,
    widths: [f64; COLUMNS],
}

/// A rendered workbook.
#[derive(Debug)]
pub struct Export {
    pub bytes: Vec<u8>,
    /// Worksheet rows written, header included
    pub rows: usize,
    /// Signature images embedded
    pub images: usize,
}

impl ExportPlan {
    /// Lay out one row per record, in store order.
    pub fn from_records(records: &[Registration]) -> Self {
        let mut rows = Vec::with_capacity(records.len());
        let mut images = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let row = index as u32 + 1;
            rows.push(cells(record, row));

            if record.signature.is_empty() {
                continue;
            }
            match signature::decode(&record.signature) {
                Ok(bytes) => images.push(PlacedImage { row, bytes }),
                Err(e) => warn!(row, name = %record.name, "Failed to decode signature: {}", e),
            }
        }

        let widths = column_widths(&rows);
        Self {
            rows,
            images,
            widths,
        }
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[[String; COLUMNS]] {
        &self.rows
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn column_widths(&self) -> &[f64; COLUMNS] {
        &self.widths
    }

    /// Write the workbook.
    pub fn render(&self) -> Result<Export, ServerError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(WORKSHEET_NAME)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_BACKGROUND))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        for (col, label) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *label, &header_format)?;
        }
        worksheet.set_row_height(0, HEADER_ROW_HEIGHT)?;

        for (index, cells) in self.rows.iter().enumerate() {
            let row = index as u32 + 1;
            for (col, value) in cells.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(row, col as u16, value)?;
                }
            }
            worksheet.set_row_height(row, DATA_ROW_HEIGHT)?;
        }

        let mut embedded = 0;
        for placed in &self.images {
            let image = match Image::new_from_buffer(&placed.bytes) {
                Ok(image) => image.set_object_movement(ObjectMovement::MoveButDontSizeWithCells),
                Err(e) => {
                    warn!(row = placed.row, "Failed to insert signature image: {}", e);
                    continue;
                }
            };
            match worksheet.insert_image_fit_to_cell(placed.row, SIGNATURE_COLUMN, &image, false) {
                Ok(_) => embedded += 1,
                Err(e) => warn!(row = placed.row, "Failed to insert signature image: {}", e),
            }
        }

        for (col, width) in self.widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(
            rows = self.rows.len() + 1,
            images = embedded,
            bytes = bytes.len(),
            "Workbook rendered"
        );

        Ok(Export {
            bytes,
            rows: self.rows.len() + 1,
            images: embedded,
        })
    }
}

/// Convenience wrapper: plan and render in one go.
pub fn export_registrations(records: &[Registration]) -> Result<Export, ServerError> {
    ExportPlan::from_records(records).render()
}

fn cells(record: &Registration, row: u32) -> [String; COLUMNS] {
    let mut cells = [
        record.name.clone(),
        record.grade.clone(),
        record.section.clone(),
        record.lrn.clone(),
        record.emergency.clone(),
        record.address.clone(),
        record.contact.clone(),
        record.birthdate.clone(),
        record.condition.clone(),
        String::new(),
        record.image_code.clone(),
        record.entry_time.clone(),
    ];

    for (col, value) in cells.iter_mut().enumerate() {
        if let Some((end, _)) = value.char_indices().nth(MAX_CELL_CHARS) {
            warn!(
                row,
                column = HEADERS[col],
                chars = value.chars().count(),
                "Cell text too long, truncating"
            );
            value.truncate(end);
        }
    }
    cells
}

fn column_widths(rows: &[[String; COLUMNS]]) -> [f64; COLUMNS] {
    let mut widths = [0.0; COLUMNS];
    for (col, width) in widths.iter_mut().enumerate() {
        if col as u16 == SIGNATURE_COLUMN {
            *width = SIGNATURE_COLUMN_WIDTH;
            continue;
        }
        let longest = rows
            .iter()
            .map(|cells| cells[col].chars().count())
            .chain(std::iter::once(HEADERS[col].chars().count()))
            .fold(MIN_TEXT_WIDTH, usize::max);
        *width = ((longest + WIDTH_PADDING) as f64).min(MAX_COLUMN_WIDTH);
    }
    widths
}
