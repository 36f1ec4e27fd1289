//! # Report Export
//!
//! Renders a period summary plus its three detail tables into a
//! paginated plain-text document and writes it to an operator-chosen
//! path. Rendering is pure (string in, string out); only the final write
//! touches the filesystem. Page layout (margins, fonts, PDF drawing) is
//! the shell's concern - this is the data document behind it.

use std::fs;
use std::path::Path;

use chrono::Utc;

use caja_core::format::{format_amount, format_rate, Locale};
use caja_core::{Money, OperationStatus, SaleStatus};

use crate::detail::PeriodDetails;
use crate::error::ReportResult;
use crate::summary::PeriodSummary;

/// Lines per page before a break is inserted.
const PAGE_LINES: usize = 60;

const RULE: &str =
    "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

// =============================================================================
// Paginator
// =============================================================================

/// Accumulates lines and stamps a footer every [`PAGE_LINES`] lines.
struct Paginator {
    lines: Vec<String>,
    page: usize,
    lines_on_page: usize,
}

impl Paginator {
    fn new() -> Self {
        Paginator {
            lines: Vec::new(),
            page: 1,
            lines_on_page: 0,
        }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        self.lines_on_page += 1;
        if self.lines_on_page >= PAGE_LINES {
            self.break_page();
        }
    }

    fn blank(&mut self) {
        self.push("");
    }

    fn break_page(&mut self) {
        self.lines.push(String::new());
        self.lines.push(format!("{:>80}", format!("Page {}", self.page)));
        self.lines.push(RULE.to_string());
        self.page += 1;
        self.lines_on_page = 0;
    }

    fn finish(mut self) -> String {
        self.lines.push(String::new());
        self.lines
            .push(format!("{:>80}", format!("Page {}", self.page)));
        self.lines.join("\n")
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the full report document.
pub fn render_report(
    store_name: &str,
    summary: &PeriodSummary,
    details: &PeriodDetails,
    locale: Locale,
) -> String {
    let mut page = Paginator::new();

    // Header
    page.push(RULE);
    page.push(store_name.to_uppercase());
    page.push("Executive Transaction Report");
    page.push(format!(
        "Period: {} to {}",
        summary.start_day, summary.end_day
    ));
    match summary.headline_rate {
        Some(rate) => page.push(format!(
            "Rate used for conversions: 1 USD = Bs. {}",
            format_rate(rate, locale)
        )),
        None => page.push("Rate used for conversions: unavailable"),
    }
    page.push(format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")));
    page.push(RULE);
    page.blank();

    // I. Summary
    page.push("I. PERIOD SUMMARY");
    page.push(THIN_RULE);
    page.push(format!(
        "{:<34} {:>20} {:>20}",
        "CONCEPT", "TOTAL Bs.", "TOTAL USD"
    ));
    for (label, bucket) in summary.buckets() {
        page.push(format!(
            "{:<34} {:>20} {:>20}",
            label,
            format_local(bucket.local, locale),
            format_local(bucket.usd, locale),
        ));
    }
    let grand = summary.grand_total();
    page.push(THIN_RULE);
    page.push(format!(
        "{:<34} {:>20} {:>20}",
        "GRAND TOTAL (NET)",
        format_local(grand.local, locale),
        format_local(grand.usd, locale),
    ));
    page.blank();

    // II. Sales and returns
    page.push("II. SALES AND RETURNS");
    page.push(THIN_RULE);
    page.push(format!(
        "{:<10} {:<20} {:<16} {:>15} {:>15}",
        "ID", "DATE/TIME", "STATUS", "TOTAL Bs.", "TOTAL USD"
    ));
    for row in &details.transactions {
        page.push(format!(
            "{:<10} {:<20} {:<16} {:>15} {:>15}",
            short_id(&row.id),
            row.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            sale_status_label(row.status),
            format_local(row.local_total, locale),
            format_amount(Money::from_cents(row.total_cents), locale),
        ));
    }
    if details.transactions.is_empty() {
        page.push("  (no movements)");
    }
    page.blank();

    // III. Cash advances
    page.push("III. CASH ADVANCES");
    page.push(THIN_RULE);
    page.push(format!(
        "{:<10} {:<20} {:<12} {:>13} {:>13} {:>10} {:>10}",
        "ID", "DATE/TIME", "STATUS", "PRINC. Bs.", "COMM. Bs.", "PRINC. $", "COMM. $"
    ));
    for line in &details.advances {
        page.push(format!(
            "{:<10} {:<20} {:<12} {:>13} {:>13} {:>10} {:>10}",
            short_id(&line.record.id),
            line.record.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            operation_status_label(line.record.status),
            format_amount(line.record.principal(), locale),
            format_amount(line.record.commission(), locale),
            format_local(line.principal_usd, locale),
            format_local(line.commission_usd, locale),
        ));
    }
    if details.advances.is_empty() {
        page.push("  (no movements)");
    }
    page.blank();

    // IV. Phone recharges
    page.push("IV. PHONE RECHARGES");
    page.push(THIN_RULE);
    page.push(format!(
        "{:<10} {:<20} {:<13} {:<12} {:>12} {:>11} {:>12}",
        "ID", "DATE/TIME", "NUMBER", "STATUS", "BASE Bs.", "COMM. Bs.", "TOTAL Bs."
    ));
    for row in &details.recharges {
        page.push(format!(
            "{:<10} {:<20} {:<13} {:<12} {:>12} {:>11} {:>12}",
            short_id(&row.id),
            row.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            row.phone_number,
            operation_status_label(row.status),
            format_amount(row.base(), locale),
            format_amount(row.commission(), locale),
            format_amount(row.total(), locale),
        ));
    }
    if details.recharges.is_empty() {
        page.push("  (no movements)");
    }

    page.finish()
}

/// Renders and writes the report to `path`.
pub fn write_report(
    path: &Path,
    store_name: &str,
    summary: &PeriodSummary,
    details: &PeriodDetails,
    locale: Locale,
) -> ReportResult<()> {
    let document = render_report(store_name, summary, details, locale);
    fs::write(path, document)?;
    Ok(())
}

fn sale_status_label(status: SaleStatus) -> &'static str {
    match status {
        SaleStatus::Completed => "Completed",
        SaleStatus::Cancelled => "Cancelled",
        SaleStatus::ForcedClosure => "Forced closure",
        SaleStatus::Return => "Return",
    }
}

fn operation_status_label(status: OperationStatus) -> &'static str {
    match status {
        OperationStatus::Concretized => "Concretized",
        OperationStatus::Cancelled => "Cancelled",
    }
}

/// First UUID segment - plenty to eyeball a row against the store.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Report columns carry derived f64 figures (rate conversions); render
/// them through the same cent-based formatter.
fn format_local(value: f64, locale: Locale) -> String {
    format_amount(Money::from_cents((value * 100.0).round() as i64), locale)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::AdvanceLine;
    use crate::summary::BucketTotal;
    use caja_core::{AdvanceRecord, PaymentMethod};
    use chrono::NaiveDate;

    fn sample_summary() -> PeriodSummary {
        PeriodSummary {
            start_day: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_day: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            headline_rate: Some(36.5),
            net_sales: BucketTotal {
                local: 3650.0,
                usd: 100.0,
            },
            returns: BucketTotal {
                local: -365.0,
                usd: -10.0,
            },
            advance_principal: BucketTotal {
                local: 200.0,
                usd: 2.0,
            },
            advance_commission: BucketTotal {
                local: 40.0,
                usd: 0.4,
            },
            recharge_base: BucketTotal::default(),
            recharge_commission: BucketTotal::default(),
        }
    }

    fn advance_line(i: usize) -> AdvanceLine {
        AdvanceLine {
            record: AdvanceRecord {
                id: format!("{i:08}-aaaa-bbbb-cccc-dddddddddddd"),
                principal_cents: 10_000,
                commission_cents: 2_000,
                total_cents: 12_000,
                payment_method: PaymentMethod::CardTerminal,
                status: OperationStatus::Concretized,
                recorded_at: Utc::now(),
            },
            principal_usd: 2.0,
            commission_usd: 0.4,
        }
    }

    #[test]
    fn report_contains_all_four_sections() {
        let document = render_report(
            "Inversiones El Centro",
            &sample_summary(),
            &PeriodDetails::default(),
            Locale::EnUs,
        );

        assert!(document.contains("INVERSIONES EL CENTRO"));
        assert!(document.contains("I. PERIOD SUMMARY"));
        assert!(document.contains("II. SALES AND RETURNS"));
        assert!(document.contains("III. CASH ADVANCES"));
        assert!(document.contains("IV. PHONE RECHARGES"));
        assert!(document.contains("GRAND TOTAL (NET)"));
        assert!(document.contains("1 USD = Bs. 36.5000"));
        assert!(document.contains("Page 1"));
    }

    #[test]
    fn returns_render_negative() {
        let document = render_report(
            "Test",
            &sample_summary(),
            &PeriodDetails::default(),
            Locale::EnUs,
        );
        assert!(document.contains("-365.00"));
        assert!(document.contains("-10.00"));
    }

    #[test]
    fn long_detail_tables_paginate() {
        let details = PeriodDetails {
            transactions: Vec::new(),
            advances: (0..120).map(advance_line).collect(),
            recharges: Vec::new(),
        };
        let document = render_report("Test", &sample_summary(), &details, Locale::EnUs);
        assert!(document.contains("Page 2"));
        assert!(document.contains("Page 3"));
    }

    #[test]
    fn write_report_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        write_report(
            &path,
            "Test",
            &sample_summary(),
            &PeriodDetails::default(),
            Locale::EsVe,
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("I. PERIOD SUMMARY"));
        // es-VE separators in the rendered amounts
        assert!(contents.contains("3.650,00"));
    }
}
