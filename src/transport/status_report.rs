//! Delivery-status report decoding (`getMessageStatus`).
//!
//! The gateway returns a text block with two sections separated by a
//! blank-line pair:
//!
//! ```text
//! Nadawca: TEST
//! Data wysyłki: 2021-01-01 10:00:00
//!
//!
//! Numer;Status;Data wysłania
//! 48500600700;Dostarczono;2021-01-01 10:00:05
//! ```
//!
//! The first section is a list of `key: value` lines, the second a
//! semicolon-separated table whose first row names the columns. Labels keep
//! the order they appear in.

use tracing::warn;

use crate::domain::{ReportFields, StatusReport, ValidationError, normalize_datetime};

/// Header label whose value is normalized as a date ("send date").
pub const SEND_DATE_LABEL: &str = "Data wysyłki";

const SECTION_SEPARATOR: &str = "\n\n\n";

/// Position of the send timestamp in every table row.
const TABLE_DATE_COLUMN: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("expected 2 report sections separated by a blank-line pair, found {found}")]
    Sections { found: usize },

    #[error("invalid report table: {0}")]
    Csv(#[from] csv::Error),

    #[error("report row {row} has {actual} columns, header has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("report header has no send date column")]
    MissingDateColumn,

    #[error("invalid date in report: {0}")]
    Date(#[from] ValidationError),
}

pub fn parse_status_report(text: &str) -> Result<StatusReport, ReportError> {
    let text = text.replace("\r\n", "\n");
    let sections = text.split(SECTION_SEPARATOR).collect::<Vec<_>>();
    let [header, table] = sections.as_slice() else {
        return Err(ReportError::Sections {
            found: sections.len(),
        });
    };

    Ok(StatusReport {
        from: parse_header(header)?,
        to: parse_table(table)?,
    })
}

/// Lines without a `key: value` separator are skipped.
fn parse_header(section: &str) -> Result<ReportFields, ReportError> {
    let mut fields = ReportFields::new();
    for line in non_empty_lines(section) {
        let Some((key, value)) = split_header_line(line) else {
            warn!(line, "skipping report header line without `key: value` separator");
            continue;
        };
        if fields.contains(key) {
            continue;
        }
        let value = if key == SEND_DATE_LABEL {
            normalize_cell(value)?
        } else {
            value.to_owned()
        };
        fields.insert_first(key, value);
    }
    Ok(fields)
}

/// Split on the first `:` that is followed by whitespace.
fn split_header_line(line: &str) -> Option<(&str, &str)> {
    line.match_indices(':').find_map(|(idx, _)| {
        let rest = &line[idx + 1..];
        rest.starts_with(char::is_whitespace)
            .then(|| (&line[..idx], rest.trim_start()))
    })
}

fn parse_table(section: &str) -> Result<Vec<ReportFields>, ReportError> {
    let lines = non_empty_lines(section).collect::<Vec<_>>().join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .quote(b'"')
        .escape(None)
        .has_headers(false)
        .flexible(true)
        .from_reader(lines.as_bytes());

    let mut records = reader.records();
    let Some(columns) = records.next().transpose()? else {
        return Ok(Vec::new());
    };
    let columns = columns.iter().map(str::to_owned).collect::<Vec<_>>();

    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        let record = record?;
        if record.len() != columns.len() {
            return Err(ReportError::RowLength {
                row: idx + 1,
                expected: columns.len(),
                actual: record.len(),
            });
        }
        if columns.len() <= TABLE_DATE_COLUMN {
            return Err(ReportError::MissingDateColumn);
        }

        let mut row = ReportFields::new();
        for (col, (name, value)) in columns.iter().zip(record.iter()).enumerate() {
            let value = if col == TABLE_DATE_COLUMN {
                normalize_cell(value)?
            } else {
                value.to_owned()
            };
            row.set(name.as_str(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Normalize a date cell; blank cells (not sent yet) pass through unchanged.
fn normalize_cell(value: &str) -> Result<String, ReportError> {
    if value.trim().is_empty() {
        return Ok(value.to_owned());
    }
    Ok(normalize_datetime(value)?)
}

fn non_empty_lines(section: &str) -> impl Iterator<Item = &str> {
    section.split('\n').filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Nadawca: TEST\n\
                          Data wysyłki: 2021-01-01 10:00\n\
                          Treść: Hello: world\n\
                          \n\n\
                          Numer;Status;Data wysłania;Uwagi\n\
                          48500600700;Dostarczono;01.01.2021 10:00:05;\"a;b\"\n\
                          48500600701;\"W trakcie\";2021-01-01 10:00:06;\n";

    #[test]
    fn parses_header_and_table() {
        let report = parse_status_report(REPORT).unwrap();

        assert_eq!(report.from.get("Nadawca"), Some("TEST"));
        assert_eq!(report.from.get(SEND_DATE_LABEL), Some("2021-01-01 10:00:00"));
        assert_eq!(report.from.get("Treść"), Some("Hello: world"));

        assert_eq!(report.to.len(), 2);
        let first = &report.to[0];
        assert_eq!(first.get("Numer"), Some("48500600700"));
        assert_eq!(first.get("Status"), Some("Dostarczono"));
        assert_eq!(first.get("Data wysłania"), Some("2021-01-01 10:00:05"));
        assert_eq!(first.get("Uwagi"), Some("a;b"));

        let second = &report.to[1];
        assert_eq!(second.get("Status"), Some("W trakcie"));
        assert_eq!(second.get("Data wysłania"), Some("2021-01-01 10:00:06"));
        assert_eq!(second.get("Uwagi"), Some(""));
    }

    #[test]
    fn labels_keep_report_order() {
        let report = parse_status_report(REPORT).unwrap();
        assert_eq!(
            report.from.labels().collect::<Vec<_>>(),
            vec!["Nadawca", SEND_DATE_LABEL, "Treść"]
        );
        assert_eq!(
            report.to[0].labels().collect::<Vec<_>>(),
            vec!["Numer", "Status", "Data wysłania", "Uwagi"]
        );
    }

    #[test]
    fn header_date_is_normalized() {
        let text = "Data wysyłki: 2021-01-01 10:00:00\n\n\n\
                    Numer;Status;Data\n\
                    111;OK;2021-01-01 10:00:00\n\
                    222;OK;2021-01-01 10:01:00\n";
        let report = parse_status_report(text).unwrap();
        assert_eq!(report.from.get("Data wysyłki"), Some("2021-01-01 10:00:00"));
        assert_eq!(report.to.len(), 2);
        assert_eq!(report.to[1].get("Numer"), Some("222"));
        assert_eq!(report.to[1].get("Data"), Some("2021-01-01 10:01:00"));
    }

    #[test]
    fn dates_in_a_dst_gap_are_kept() {
        let text = "Data wysyłki: 2021-03-14 02:30:00\n\n\nA;B;C\n1;2;2021-03-14 02:30:00\n";
        let report = parse_status_report(text).unwrap();
        assert_eq!(report.from.get(SEND_DATE_LABEL), Some("2021-03-14 02:30:00"));
        assert_eq!(report.to[0].get("C"), Some("2021-03-14 02:30:00"));
    }

    #[test]
    fn first_header_value_wins() {
        let text = "Klucz: a\nKlucz: b\n\n\nA;B;C\n";
        let report = parse_status_report(text).unwrap();
        assert_eq!(report.from.get("Klucz"), Some("a"));
        assert_eq!(report.from.len(), 1);
        assert!(report.to.is_empty());
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let text = "Nadawca: TEST\r\n\r\n\r\nA;B;C\r\n1;2;2021-01-01 00:00:00\r\n";
        let report = parse_status_report(text).unwrap();
        assert_eq!(report.from.get("Nadawca"), Some("TEST"));
        assert_eq!(report.to[0].get("C"), Some("2021-01-01 00:00:00"));
    }

    #[test]
    fn blank_date_cell_passes_through() {
        let text = "Nadawca: TEST\n\n\nA;B;C\n1;2;\n";
        let report = parse_status_report(text).unwrap();
        assert_eq!(report.to[0].get("C"), Some(""));
    }

    #[test]
    fn missing_or_repeated_boundary_is_rejected() {
        assert!(matches!(
            parse_status_report("Nadawca: TEST\nA;B;C\n"),
            Err(ReportError::Sections { found: 1 })
        ));
        assert!(matches!(
            parse_status_report("a: b\n\n\nA;B;C\n\n\nx"),
            Err(ReportError::Sections { found: 3 })
        ));
    }

    #[test]
    fn row_length_mismatch_is_rejected() {
        let text = "Nadawca: TEST\n\n\nA;B;C\n1;2;2021-01-01 00:00:00;extra\n";
        assert!(matches!(
            parse_status_report(text),
            Err(ReportError::RowLength {
                row: 1,
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn header_lines_without_separator_are_skipped() {
        let text = "Treść: pierwsza linia\ndruga linia\nNadawca: TEST\n\n\nA;B;C\n";
        let report = parse_status_report(text).unwrap();
        assert_eq!(report.from.get("Treść"), Some("pierwsza linia"));
        assert_eq!(report.from.get("Nadawca"), Some("TEST"));
        assert_eq!(report.from.len(), 2);
    }

    #[test]
    fn invalid_dates_are_rejected() {
        let text = "Data wysyłki: wczoraj\n\n\nA;B;C\n";
        assert!(matches!(
            parse_status_report(text),
            Err(ReportError::Date(_))
        ));

        let text = "Nadawca: TEST\n\n\nA;B;C\n1;2;wczoraj\n";
        assert!(matches!(
            parse_status_report(text),
            Err(ReportError::Date(_))
        ));
    }

    #[test]
    fn narrow_table_has_no_date_column() {
        let text = "Nadawca: TEST\n\n\nA;B\n1;2\n";
        assert!(matches!(
            parse_status_report(text),
            Err(ReportError::MissingDateColumn)
        ));
    }
}
