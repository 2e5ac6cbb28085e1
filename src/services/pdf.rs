use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::models::report::DailyReport;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Render a daily report as a single PDF document (A4, built-in Helvetica,
/// one line per entry, new pages as needed).
pub fn render_daily_report(report: &DailyReport) -> anyhow::Result<Vec<u8>> {
    let title = format!("Daily report - {}", report.child_name);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    current.use_text(&title, 16.0, Mm(MARGIN_MM), Mm(y), &font_bold);
    y -= LINE_HEIGHT_MM * 1.5;
    current.use_text(
        report.date.format("%A, %B %-d, %Y").to_string(),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= LINE_HEIGHT_MM * 2.0;

    if report.entries.is_empty() {
        current.use_text("No events recorded.", 11.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    for entry in &report.entries {
        if y < MARGIN_MM {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        current.use_text(&entry.line, 11.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    if y < MARGIN_MM {
        let (next_page, next_layer) =
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        current = doc.get_page(next_page).get_layer(next_layer);
        y = PAGE_HEIGHT_MM - MARGIN_MM;
    }
    current.use_text(
        format!("Total events: {}", report.summary.total_events),
        11.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font_bold,
    );

    let bytes = doc.save_to_bytes()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{DailyReportEntry, ReportSummary};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn renders_a_valid_pdf() {
        let report = DailyReport {
            child_id: Uuid::new_v4(),
            child_name: "Maya".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            entries: vec![DailyReportEntry {
                occurred_at: Utc.with_ymd_and_hms(2025, 6, 10, 7, 30, 0).unwrap(),
                event_type: "feeding".to_string(),
                line: "7:30 AM: formula - 120 ml".to_string(),
            }],
            summary: ReportSummary {
                total_events: 1,
                events_by_type: Default::default(),
                stats: Default::default(),
            },
        };

        let bytes = render_daily_report(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn empty_day_still_renders() {
        let report = DailyReport {
            child_id: Uuid::new_v4(),
            child_name: "Leo".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            entries: vec![],
            summary: ReportSummary {
                total_events: 0,
                events_by_type: Default::default(),
                stats: Default::default(),
            },
        };

        let bytes = render_daily_report(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
