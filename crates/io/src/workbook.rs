//! Two-sheet XLSX workbook export.
//!
//! Sheet 1 ("Report"): merged title banner, run-date subtitle, styled
//! header row, one row per campaign. Sheet 2 ("Data"): styled header row,
//! one row per reconciled contact. The two-sheet separation and
//! header-before-data ordering are a contract for downstream consumers;
//! the styling itself is cosmetic.

use chrono::Utc;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook, Worksheet,
};

use mailbridge_recon::{EngagementStatus, ReconciledRow, ReportRow};

use crate::delimited::data_headers;
use crate::error::ExportError;

const HEADER_FILL: Color = Color::RGB(0x4472C4);
const TITLE: &str = "Campaign Engagement Report";

// Report sheet rows: banner, subtitle, spacer, header, then data.
const REPORT_HEADER_ROW: u32 = 3;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(HEADER_FILL)
        .set_border(FormatBorder::Thin)
}

fn title_format() -> Format {
    Format::new().set_bold().set_font_size(14).set_align(FormatAlign::Center)
}

fn subtitle_format() -> Format {
    Format::new().set_italic().set_align(FormatAlign::Center)
}

fn percent_format() -> Format {
    Format::new().set_num_format("0.0%")
}

/// Build the workbook and return it as in-memory XLSX bytes.
pub fn to_workbook(
    rows: &[ReconciledRow],
    report: &[ReportRow],
    custom_field: Option<&str>,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = XlsxWorkbook::new();

    let report_sheet = workbook
        .add_worksheet()
        .set_name("Report")
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    write_report_sheet(report_sheet, report).map_err(ExportError::Xlsx)?;

    let data_sheet = workbook
        .add_worksheet()
        .set_name("Data")
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    write_data_sheet(data_sheet, rows, custom_field).map_err(ExportError::Xlsx)?;

    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Xlsx(e.to_string()))
}

fn report_headers() -> Vec<String> {
    let mut headers = vec!["Campaign ID".to_string(), "Campaign".to_string()];
    for status in EngagementStatus::ALL {
        headers.push(status.label().to_string());
    }
    for status in EngagementStatus::ALL {
        headers.push(format!("% {}", status.label()));
    }
    headers.push("Blacklist".to_string());
    headers.push("Total".to_string());
    headers
}

fn write_report_sheet(sheet: &mut Worksheet, report: &[ReportRow]) -> Result<(), String> {
    let headers = report_headers();
    let last_col = (headers.len() - 1) as u16;

    sheet
        .merge_range(0, 0, 0, last_col, TITLE, &title_format())
        .map_err(|e| e.to_string())?;
    let subtitle = format!("Generated {}", Utc::now().format("%Y-%m-%d"));
    sheet
        .merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format())
        .map_err(|e| e.to_string())?;

    let header = header_format();
    for (col, text) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(REPORT_HEADER_ROW, col as u16, text, &header)
            .map_err(|e| e.to_string())?;
    }

    let percent = percent_format();
    for (i, row) in report.iter().enumerate() {
        let r = REPORT_HEADER_ROW + 1 + i as u32;
        sheet
            .write_number(r, 0, row.campaign_id as f64)
            .map_err(|e| e.to_string())?;
        sheet
            .write_string(r, 1, &row.campaign_name)
            .map_err(|e| e.to_string())?;

        let mut col = 2u16;
        for status in EngagementStatus::ALL {
            sheet
                .write_number(r, col, f64::from(row.count(status)))
                .map_err(|e| e.to_string())?;
            col += 1;
        }
        for status in EngagementStatus::ALL {
            sheet
                .write_number_with_format(r, col, row.percentage(status), &percent)
                .map_err(|e| e.to_string())?;
            col += 1;
        }
        sheet
            .write_number(r, col, f64::from(row.blacklist_count))
            .map_err(|e| e.to_string())?;
        sheet
            .write_number(r, col + 1, f64::from(row.total))
            .map_err(|e| e.to_string())?;
    }

    // Fixed widths: id, campaign name, then uniform stat columns.
    sheet.set_column_width(0, 12.0).map_err(|e| e.to_string())?;
    sheet.set_column_width(1, 32.0).map_err(|e| e.to_string())?;
    for col in 2..=last_col {
        sheet.set_column_width(col, 14.0).map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn write_data_sheet(
    sheet: &mut Worksheet,
    rows: &[ReconciledRow],
    custom_field: Option<&str>,
) -> Result<(), String> {
    let headers = data_headers(custom_field);
    let header = header_format();
    for (col, text) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, text, &header)
            .map_err(|e| e.to_string())?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = 1 + i as u32;
        let mut col = 0u16;

        if let Some(contact) = &row.contact {
            sheet
                .write_number(r, col, contact.id as f64)
                .map_err(|e| e.to_string())?;
            sheet
                .write_string(r, col + 1, &contact.name)
                .map_err(|e| e.to_string())?;
            sheet
                .write_string(r, col + 2, &contact.first_name)
                .map_err(|e| e.to_string())?;
        }
        col += 3;

        if custom_field.is_some() {
            if let Some(value) = row.contact.as_ref().and_then(|c| c.custom_field.as_deref()) {
                sheet.write_string(r, col, value).map_err(|e| e.to_string())?;
            }
            col += 1;
        }

        sheet.write_string(r, col, &row.email).map_err(|e| e.to_string())?;
        sheet
            .write_string(r, col + 1, row.status.label())
            .map_err(|e| e.to_string())?;
        sheet
            .write_boolean(r, col + 2, row.blacklisted)
            .map_err(|e| e.to_string())?;
        sheet
            .write_number(r, col + 3, row.campaign_id as f64)
            .map_err(|e| e.to_string())?;
        sheet
            .write_string(r, col + 4, &row.campaign_name)
            .map_err(|e| e.to_string())?;
    }

    for (col, _) in headers.iter().enumerate() {
        let width = match headers[col].as_str() {
            "id" | "blacklist" => 10.0,
            "campaign_id" => 12.0,
            "first_name" | "engagement_status" => 18.0,
            "name" | "email" | "campaign_name" => 30.0,
            _ => 18.0,
        };
        sheet
            .set_column_width(col as u16, width)
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}
