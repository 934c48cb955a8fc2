//! Plain-text CSV export of habit history.
//!
//! Layout:
//!
//! ```text
//! <title>,<today>
//!
//! <habit label>
//! Date,Count,Score,Qualified
//! 2024-06-01,3,6,Yes
//! ,,,
//! Total,3,6,1 days
//! ,,,
//!
//! ```

use chrono::NaiveDate;

use super::history::HabitHistory;
use crate::error::ExportError;

pub const DEFAULT_EXPORT_TITLE: &str = "Embers Habit Export";

const HEADER: [&str; 4] = ["Date", "Count", "Score", "Qualified"];
const SPACER: [&str; 4] = ["", "", "", ""];

/// Shortest decimal rendering; negative zero prints as `0`.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Encode one row, quoting fields that contain a comma, quote or line break.
fn encode_row<S: AsRef<str>>(fields: &[S]) -> Result<String, ExportError> {
    if let [only] = fields {
        if only.as_ref().is_empty() {
            return Ok(String::new());
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|field| field.as_ref()))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;

    let mut line = String::from_utf8(bytes)?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Render `history` as CSV text, stamped with `title` and `today`.
pub fn generate_csv(
    history: &[HabitHistory],
    title: &str,
    today: NaiveDate,
) -> Result<String, ExportError> {
    let mut rows = Vec::new();
    rows.push(encode_row(&[title.to_string(), today.format("%Y-%m-%d").to_string()])?);
    rows.push(String::new());

    for habit in history {
        rows.push(encode_row(&[habit.label.as_str()])?);
        rows.push(encode_row(&HEADER)?);

        for day in &habit.daily_records {
            rows.push(encode_row(&[
                day.date.format("%Y-%m-%d").to_string(),
                format_number(day.count),
                format_number(day.score),
                if day.qualified { "Yes" } else { "No" }.to_string(),
            ])?);
        }

        rows.push(encode_row(&SPACER)?);
        rows.push(encode_row(&[
            "Total".to_string(),
            format_number(habit.total_count),
            format_number(habit.total_score),
            format!("{} days", habit.days_active),
        ])?);
        rows.push(encode_row(&SPACER)?);
        rows.push(String::new());
    }

    Ok(rows.join("\n"))
}
