//! Label rows for the label printing software.
//!
//! Each emitted label becomes one row of `2 + 6·K + 1` quoted, semicolon
//! separated fields: the callsigns, six columns per QSO slot and a free-text
//! block that ends up in the label's QR code.

use crate::domain::model::{Contact, LabelCapacity, LabelTable, LabelUnit};
use crate::utils::error::{EtlError, Result};
use std::io::Write;

pub const STROKE_ZERO: char = 'Ø';

const SLOT_COLUMNS: [&str; 6] = ["D", "T", "F", "M", "R", "Q"];

/// Labels are printed either for manager-routed QSLs or for direct ones, never both.
pub fn should_emit(unit: &LabelUnit, via_manager: bool) -> bool {
    unit.is_via_manager() == via_manager
}

pub fn stroke_zero(call: &str) -> String {
    call.replace('0', &STROKE_ZERO.to_string())
}

/// Splits `YYYYMMDD` into year, month and day.
fn date_parts(date: &str) -> Result<(&str, &str, &str)> {
    match (date.get(..4), date.get(4..6), date.get(6..)) {
        (Some(y), Some(m), Some(d)) if d.len() == 2 && date.is_ascii() => Ok((y, m, d)),
        _ => Err(EtlError::RenderError {
            message: format!("date '{}' is not in YYYYMMDD form", date),
        }),
    }
}

/// `HHMM` -> `HH:MM`
fn clock_time(time: &str) -> Result<String> {
    match (time.get(..2), time.get(2..)) {
        (Some(h), Some(m)) if m.len() == 2 && time.is_ascii() => Ok(format!("{}:{}", h, m)),
        _ => Err(EtlError::RenderError {
            message: format!("time '{}' is not in HHMM form", time),
        }),
    }
}

/// `YYYYMMDD` -> `YYYY-MM-DD`
fn iso_date(date: &str) -> Result<String> {
    let (y, m, d) = date_parts(date)?;
    Ok(format!("{}-{}-{}", y, m, d))
}

/// `YYYYMMDD` -> `DD.MM.YY`
fn short_date(date: &str) -> Result<String> {
    let (y, m, d) = date_parts(date)?;
    Ok(format!("{}.{}.{}", d, m, &y[2..]))
}

pub fn render_header(capacity: LabelCapacity) -> Vec<String> {
    let mut header = vec!["To".to_string(), "Via".to_string()];
    for slot in 1..=capacity.get() {
        header.extend(SLOT_COLUMNS.iter().map(|col| format!("{}{}", col, slot)));
    }
    header.push("QR_Data".to_string());
    header
}

fn slot_fields(contact: &Contact) -> Result<[String; 6]> {
    Ok([
        iso_date(&contact.date)?,
        clock_time(&contact.time)?,
        contact.freq.clone(),
        contact.mode.clone(),
        contact.rst.clone(),
        contact.qsl_status.display().to_string(),
    ])
}

pub fn render_row(unit: &LabelUnit, capacity: LabelCapacity) -> Result<Vec<String>> {
    if unit.qsos_on_label() > capacity.get() {
        return Err(EtlError::RenderError {
            message: format!(
                "label for {} holds {} QSOs but only {} fit",
                unit.to_call,
                unit.qsos_on_label(),
                capacity
            ),
        });
    }

    let mut row = Vec::with_capacity(capacity.column_count());
    row.push(stroke_zero(&unit.to_call));
    row.push(stroke_zero(&unit.via_call));

    for contact in &unit.contacts {
        row.extend(slot_fields(contact)?);
    }

    // Unused slots stay empty so every row has the same width.
    row.resize(capacity.column_count() - 1, String::new());
    row.push(render_summary(unit)?);

    Ok(row)
}

pub fn render_summary(unit: &LabelUnit) -> Result<String> {
    let mut heading = format!("From: {} ", unit.from_call);
    if unit.is_via_manager() {
        heading.push_str(&format!("Via: {} ", unit.via_call));
    }
    heading.push_str(&format!("To: {}", unit.to_call));

    let mut lines = vec![heading];
    for qso in &unit.contacts {
        lines.push(format!(
            "Date: {} Time: {} Band: {} Mode: {} RST: {} QSL: {}",
            short_date(&qso.date)?,
            clock_time(&qso.time)?,
            qso.band.to_lowercase(),
            qso.mode,
            qso.rst,
            qso.qsl_status.display()
        ));
    }

    Ok(lines.join("\n"))
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub table: LabelTable,
    pub emitted: usize,
    pub filtered: usize,
}

pub fn render_table(
    units: &[LabelUnit],
    capacity: LabelCapacity,
    via_manager: bool,
) -> Result<RenderOutcome> {
    let mut rows = Vec::new();
    let mut filtered = 0;

    for unit in units {
        if !should_emit(unit, via_manager) {
            tracing::debug!(
                "Skipping label for {} (via manager: {})",
                unit.to_call,
                unit.is_via_manager()
            );
            filtered += 1;
            continue;
        }

        let row = render_row(unit, capacity)?;
        tracing::debug!("Label row: {}", row[..row.len() - 1].join(";"));
        rows.push(row);
    }

    Ok(RenderOutcome {
        emitted: rows.len(),
        table: LabelTable {
            header: render_header(capacity),
            rows,
        },
        filtered,
    })
}

/// Semicolon separated, every field double-quoted, `\n` line endings.
pub fn write_table<W: Write>(table: &LabelTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(&table.header)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}
