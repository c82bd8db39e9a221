//! Rendered HTML document for human review.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use cardio_model::{CheckDetails, CheckResult, QualityReport};

/// Offending rows listed per check before the list is truncated.
const MAX_LISTED_ROWS: usize = 25;

const STYLE: &str = concat!(
    "body { font-family: sans-serif; margin: 40px; background: #f5f5f5; color: #333; }\n",
    ".section { background: white; padding: 20px; margin: 15px 0; border-radius: 6px; }\n",
    "table { border-collapse: collapse; }\n",
    "th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }\n",
    ".pass { color: #2e8b57; font-weight: bold; }\n",
    ".fail { color: #c0392b; font-weight: bold; }\n",
    "h1, h2 { color: #2c3e50; }",
);

/// Render the report as a standalone HTML page.
pub fn render_html(report: &QualityReport) -> Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_page(&mut xml, report)?;
    let mut text = String::from_utf8(xml.into_inner()).context("HTML report is not UTF-8")?;
    text.push('\n');
    Ok(text)
}

fn write_page<W: Write>(xml: &mut Writer<W>, report: &QualityReport) -> Result<()> {
    xml.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    let mut root = BytesStart::new("html");
    root.push_attribute(("lang", "en"));
    xml.write_event(Event::Start(root))?;

    xml.write_event(Event::Start(BytesStart::new("head")))?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "UTF-8"));
    xml.write_event(Event::Empty(meta))?;
    write_text_element(xml, "title", None, "Data Quality Report")?;
    write_text_element(xml, "style", None, STYLE)?;
    xml.write_event(Event::End(BytesEnd::new("head")))?;

    xml.write_event(Event::Start(BytesStart::new("body")))?;
    write_text_element(xml, "h1", None, "Data Quality Report")?;
    let generated = report
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    write_text_element(xml, "p", None, &format!("Generated: {generated}"))?;

    write_summary(xml, report)?;
    write_check_overview(xml, report)?;
    for check in &report.checks {
        write_check_section(xml, check)?;
    }

    xml.write_event(Event::End(BytesEnd::new("body")))?;
    xml.write_event(Event::End(BytesEnd::new("html")))?;
    Ok(())
}

fn write_summary<W: Write>(xml: &mut Writer<W>, report: &QualityReport) -> Result<()> {
    start_section(xml)?;
    write_text_element(xml, "h2", None, "Summary")?;

    let score = &report.score;
    let score_class = match score.meets_threshold {
        Some(true) => "pass",
        Some(false) => "fail",
        None if report.all_passed() => "pass",
        None => "fail",
    };
    write_text_element(
        xml,
        "p",
        Some(score_class),
        &format!("Overall data quality score: {:.1}%", score.overall),
    )?;

    let mut rows = vec![
        vec![
            "Source".to_string(),
            report.dataset.source.clone().unwrap_or_else(|| "-".to_string()),
        ],
        vec!["Rows".to_string(), report.dataset.rows.to_string()],
        vec!["Columns".to_string(), report.dataset.columns.to_string()],
        vec![
            "Checks passed".to_string(),
            format!("{} / {}", score.checks_passed, score.checks_total),
        ],
        vec![
            "Clean rows".to_string(),
            format!(
                "{} ({:.1}%)",
                score.clean_rows,
                100.0 * score.clean_row_rate
            ),
        ],
        vec!["Formula".to_string(), score.formula.clone()],
    ];
    if let Some(threshold) = score.threshold {
        rows.push(vec!["Threshold".to_string(), format!("{threshold:.1}")]);
    }
    write_table(xml, &[], &rows)?;

    end_section(xml)
}

fn write_check_overview<W: Write>(xml: &mut Writer<W>, report: &QualityReport) -> Result<()> {
    start_section(xml)?;
    write_text_element(xml, "h2", None, "Checks")?;

    write_table_open(
        xml,
        &["Check", "Rule", "Evaluated", "Passed", "Failed", "Pass rate", "Status"],
    )?;
    for check in &report.checks {
        xml.write_event(Event::Start(BytesStart::new("tr")))?;
        write_text_element(xml, "td", None, check.check.label())?;
        write_text_element(xml, "td", None, &check.description)?;
        write_text_element(xml, "td", None, &check.evaluated.to_string())?;
        write_text_element(xml, "td", None, &check.passed.to_string())?;
        write_text_element(xml, "td", None, &check.failed.to_string())?;
        write_text_element(xml, "td", None, &percent(check.pass_rate))?;
        let (class, status) = status(check);
        write_text_element(xml, "td", Some(class), status)?;
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    write_table_close(xml)?;

    end_section(xml)
}

fn write_check_section<W: Write>(xml: &mut Writer<W>, check: &CheckResult) -> Result<()> {
    let mut section = BytesStart::new("div");
    section.push_attribute(("class", "section"));
    section.push_attribute(("id", check.check.as_str()));
    xml.write_event(Event::Start(section))?;

    write_text_element(xml, "h2", None, check.check.label())?;
    write_text_element(xml, "p", None, &check.description)?;
    let (class, status) = status(check);
    write_text_element(
        xml,
        "p",
        Some(class),
        &format!(
            "{status}: {} of {} failed ({} pass rate)",
            check.failed,
            check.evaluated,
            percent(check.pass_rate)
        ),
    )?;

    write_details(xml, &check.details)?;
    write_offending(xml, check)?;

    end_section(xml)
}

fn write_details<W: Write>(xml: &mut Writer<W>, details: &CheckDetails) -> Result<()> {
    match details {
        CheckDetails::Missingness { fields } => {
            let rows: Vec<Vec<String>> = fields
                .iter()
                .map(|f| {
                    vec![
                        f.field.clone(),
                        f.missing.to_string(),
                        format!("{:.1}%", f.percent),
                    ]
                })
                .collect();
            write_table(xml, &["Field", "Missing", "Percent of rows"], &rows)
        }
        CheckDetails::Range { fields } => {
            let rows: Vec<Vec<String>> = fields
                .iter()
                .map(|t| {
                    vec![
                        t.field.clone(),
                        format!("{} to {}", t.bounds.min, t.bounds.max),
                        t.missing.to_string(),
                        t.below.to_string(),
                        t.above.to_string(),
                    ]
                })
                .collect();
            write_table(xml, &["Field", "Bounds", "Missing", "Below", "Above"], &rows)
        }
        CheckDetails::Consistency {
            skipped,
            min_pulse_pressure,
        } => {
            let rows = vec![
                vec!["Rows skipped (missing reading)".to_string(), skipped.to_string()],
                vec![
                    "Minimum pulse pressure".to_string(),
                    min_pulse_pressure.map_or_else(|| "-".to_string(), |v| v.to_string()),
                ],
            ];
            write_table(xml, &[], &rows)
        }
        CheckDetails::Uniqueness {
            unique_patient_ids,
            duplicate_patient_ids,
            groups,
        } => {
            let rows = vec![
                vec![
                    "Unique patient ids".to_string(),
                    unique_patient_ids.to_string(),
                ],
                vec![
                    "Duplicate patient ids".to_string(),
                    duplicate_patient_ids.to_string(),
                ],
            ];
            write_table(xml, &[], &rows)?;
            if groups.is_empty() {
                return Ok(());
            }
            let group_rows: Vec<Vec<String>> = groups
                .iter()
                .map(|g| {
                    let members: Vec<String> = g.rows.iter().map(usize::to_string).collect();
                    vec![g.patient_id.clone(), members.join(", ")]
                })
                .collect();
            write_table(xml, &["patient_id", "Rows"], &group_rows)
        }
        CheckDetails::CategoryValidity { fields } => {
            let rows: Vec<Vec<String>> = fields
                .iter()
                .map(|f| vec![f.field.clone(), f.count.to_string()])
                .collect();
            write_table(xml, &["Field", "Invalid rows"], &rows)
        }
    }
}

fn write_offending<W: Write>(xml: &mut Writer<W>, check: &CheckResult) -> Result<()> {
    if check.offending.is_empty() {
        return Ok(());
    }
    write_text_element(
        xml,
        "h3",
        None,
        &format!("Offending rows ({})", check.offending.len()),
    )?;
    xml.write_event(Event::Start(BytesStart::new("ul")))?;
    for row in check.offending.iter().take(MAX_LISTED_ROWS) {
        write_text_element(
            xml,
            "li",
            None,
            &format!("row {}: {}", row.row, row.patient_id),
        )?;
    }
    xml.write_event(Event::End(BytesEnd::new("ul")))?;
    if check.offending.len() > MAX_LISTED_ROWS {
        write_text_element(
            xml,
            "p",
            None,
            &format!("and {} more", check.offending.len() - MAX_LISTED_ROWS),
        )?;
    }
    Ok(())
}

fn status(check: &CheckResult) -> (&'static str, &'static str) {
    if check.is_pass() {
        ("pass", "PASS")
    } else {
        ("fail", "FAIL")
    }
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", 100.0 * rate)
}

fn start_section<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    let mut section = BytesStart::new("div");
    section.push_attribute(("class", "section"));
    xml.write_event(Event::Start(section))?;
    Ok(())
}

fn end_section<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new("div")))?;
    Ok(())
}

fn write_table_open<W: Write>(xml: &mut Writer<W>, headers: &[&str]) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("table")))?;
    if !headers.is_empty() {
        xml.write_event(Event::Start(BytesStart::new("tr")))?;
        for header in headers {
            write_text_element(xml, "th", None, header)?;
        }
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    Ok(())
}

fn write_table_close<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new("table")))?;
    Ok(())
}

fn write_table<W: Write>(
    xml: &mut Writer<W>,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    write_table_open(xml, headers)?;
    for row in rows {
        xml.write_event(Event::Start(BytesStart::new("tr")))?;
        for cell in row {
            write_text_element(xml, "td", None, cell)?;
        }
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    write_table_close(xml)
}

/// Write a text element, optionally with a class attribute.
fn write_text_element<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    class: Option<&str>,
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(class) = class {
        start.push_attribute(("class", class));
    }
    xml.write_event(Event::Start(start))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
