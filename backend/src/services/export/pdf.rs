//! PDF rendering of the weekly report with `genpdf`.
//!
//! The document is rendered into memory and only then returned to the client.

use super::attachment;
use super::report::{Report, TITLE};
use crate::error::ApiError;
use crate::services::parse_week;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Document, Element};
use std::path::{Path, PathBuf};

/// Family tried when the configured one is missing.
const FALLBACK_FONT_FAMILY: &str = "LiberationSans";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no usable font family '{family}' in {}: {source}", dir.display())]
    Font {
        dir: PathBuf,
        family: String,
        source: genpdf::error::Error,
    },
    #[error("cannot render PDF: {0}")]
    Render(#[from] genpdf::error::Error),
    #[error("cannot encode snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("export task was cancelled")]
    Cancelled,
}

pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let week = parse_week(&path)?;
    let config = state.store.load_config()?;
    let submissions = state.store.submissions_for_week(week)?;
    let report = Report::build(week, &config, &submissions, Utc::now());

    let settings = state.settings.clone();
    let bytes = web::block(move || {
        render(&report, &settings.fonts_dir, &settings.font_family)
    })
    .await
    .map_err(|_| ExportError::Cancelled)??;

    log::info!(
        "exported PDF for week {} ({} locations, {} bytes)",
        week,
        submissions.len(),
        bytes.len()
    );
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment(Report::filename(week)))
        .body(bytes))
}

/// Loads `family` from `dir`, falling back to LiberationSans.
fn load_font(dir: &Path, family: &str) -> Result<FontFamily<FontData>, ExportError> {
    if let Ok(fonts) = genpdf::fonts::from_files(dir, family, None) {
        return Ok(fonts);
    }
    genpdf::fonts::from_files(dir, FALLBACK_FONT_FAMILY, None).map_err(|source| {
        ExportError::Font {
            dir: dir.to_path_buf(),
            family: family.to_string(),
            source,
        }
    })
}

fn configure_document(fonts: FontFamily<FontData>) -> Document {
    let mut doc = Document::new(fonts);
    doc.set_title(TITLE);
    doc.set_font_size(10);
    doc.set_line_spacing(1.2);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(14);
    doc.set_page_decorator(decorator);
    doc
}

/// Two-column table of `(label, value)` rows, optionally with a header row.
fn table(
    rows: &[(String, String)],
    header: Option<(&str, &str)>,
    framed: bool,
) -> Result<TableLayout, ExportError> {
    let mut table = TableLayout::new(vec![3, 1]);
    if framed {
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    }
    if let Some((left, right)) = header {
        let bold = Style::new().bold();
        table
            .row()
            .element(Paragraph::new(left).styled(bold).padded(1))
            .element(Paragraph::new(right).styled(bold).padded(1))
            .push()?;
    }
    let label_style = if framed { Style::new() } else { Style::new().bold() };
    for (label, value) in rows {
        table
            .row()
            .element(Paragraph::new(label.as_str()).styled(label_style).padded(1))
            .element(Paragraph::new(value.as_str()).padded(1))
            .push()?;
    }
    Ok(table)
}

/// Renders `report` to PDF bytes.
pub fn render(report: &Report, fonts_dir: &Path, family: &str) -> Result<Vec<u8>, ExportError> {
    let mut doc = configure_document(load_font(fonts_dir, family)?);

    doc.push(Paragraph::new(TITLE).styled(Style::new().bold().with_font_size(18)));
    doc.push(Paragraph::new(format!("Week Ending: {}", report.week_ending)));
    doc.push(Paragraph::new(format!("Generated: {}", report.generated)));
    doc.push(Break::new(1));

    doc.push(Paragraph::new("Summary").styled(Style::new().bold().with_font_size(14)));
    doc.push(table(&report.summary, Some(("Metric", "Value")), true)?);

    for location in &report.locations {
        doc.push(Break::new(1.5));
        doc.push(
            Paragraph::new(location.heading.as_str())
                .styled(Style::new().bold().with_font_size(12)),
        );
        doc.push(Paragraph::new(location.status_line.as_str()));
        doc.push(table(&location.metrics, None, false)?);

        for (label, text) in &location.notes {
            doc.push(Break::new(0.5));
            doc.push(Paragraph::new(format!("{}:", label)).styled(Style::new().bold()));
            for line in text.lines() {
                doc.push(Paragraph::new(line));
            }
        }
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerSettings;
    use crate::services::export::configure_routes;
    use crate::services::testing;
    use crate::state::AppState;
    use crate::store::Store;
    use actix_web::test::{call_service, init_service, TestRequest};
    use actix_web::App;

    #[test]
    fn missing_fonts_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report {
            week_ending: "Jan 10, 2025".into(),
            generated: "Jan 10, 2025".into(),
            summary: Vec::new(),
            locations: Vec::new(),
        };
        let err = render(&report, dir.path(), "Arial").unwrap_err();
        assert!(matches!(err, ExportError::Font { .. }));
        assert!(err.to_string().contains("Arial"));
    }

    #[actix_web::test]
    async fn failed_export_returns_error_without_document() {
        let fonts = tempfile::tempdir().unwrap();
        let settings = ServerSettings {
            fonts_dir: fonts.path().to_path_buf(),
            ..ServerSettings::default()
        };
        let state = AppState::new(Store::open_in_memory().unwrap(), settings);
        let app = init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = TestRequest::get()
            .uri("/api/export/pdf/2025-01-10")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 500);
        assert!(resp.headers().get("content-disposition").is_none());
        assert!(testing::body_text(resp).await.starts_with("export failed"));
    }
}
