use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use colored::Colorize;
use regex::Regex;

use crate::error::{FcstatError, Result};
use crate::fmt::money;
use crate::importer::{read_statement, statement_files};
use crate::reports::{self, ProfitLoss};
use crate::settings::{load_settings, Settings};

const LABEL_WIDTH: usize = 46;
const BANNER: &str = "====================";

pub fn run(path: Option<String>) -> Result<()> {
    let settings = load_settings();
    let path = path
        .or_else(|| settings.statements_dir.clone())
        .unwrap_or_else(|| ".".to_string());
    let path = PathBuf::from(path);

    if path.is_dir() {
        print!("{}", report_dir(&path, &settings)?);
    } else if path.is_file() {
        print!("{}", report_file(&path, &settings)?);
    } else {
        return Err(FcstatError::NotFound(path));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Data-fetching + formatting wrappers
// ---------------------------------------------------------------------------

pub fn report_file(path: &Path, settings: &Settings) -> Result<String> {
    let statement = read_statement(path)?;
    let data = reports::get_profit_loss(&statement)?;
    Ok(format_summary(&data, settings))
}

/// Every statement in `dir`, each under a month heading. Stops at the first
/// statement that fails, naming the file.
pub fn report_dir(dir: &Path, settings: &Settings) -> Result<String> {
    let mut out = String::new();
    for path in statement_files(dir)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let heading = statement_heading(&file_name).unwrap_or_else(|| {
            log::warn!("cannot derive a month from {file_name}");
            file_name.clone()
        });
        let summary = report_file(&path, settings).map_err(|e| FcstatError::Statement {
            path: path.clone(),
            source: Box::new(e),
        })?;
        out.push_str(&format!("{BANNER}  {}  {BANNER}\n", heading.as_str().bold()));
        out.push_str(&summary);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Pure formatting functions
// ---------------------------------------------------------------------------

fn heading_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^statement_(\d{4})-(\d{2})_").expect("valid regex"))
}

/// `statement_2017-03_...csv` → `2017  March`.
pub fn statement_heading(file_name: &str) -> Option<String> {
    let caps = heading_pattern().captures(file_name)?;
    let year = &caps[1];
    let month: u8 = caps[2].parse().ok()?;
    let month = chrono::Month::try_from(month).ok()?;
    Some(format!("{year}  {}", month.name()))
}

fn line(label: &str, amount: f64, symbol: &str) -> String {
    format!("  {label:<width$}{}\n", money(amount, symbol), width = LABEL_WIDTH)
}

fn rule() -> String {
    format!("{:width$}--------\n", "", width = LABEL_WIDTH + 2)
}

pub fn format_summary(pl: &ProfitLoss, settings: &Settings) -> String {
    let t = &pl.totals;
    let sym = settings.currency_symbol.as_str();
    let platform = settings.platform_name.as_str();
    let mut out = String::new();

    out.push('\n');
    out.push_str("Outgoings:\n");
    out.push_str(&line("Total loans/loan parts purchased:", pl.total_loans_purchased, sym));
    out.push_str(&line("Interest paid due to loan part purchases:", t.loan_parts.interest, sym));
    out.push_str(&line(&format!("Fees paid to {platform}:"), t.fees, sym));
    out.push_str(&rule());
    out.push_str(&line("Total outgoings:", pl.total_outgoings, sym));
    out.push('\n');

    out.push_str("Incomings:\n");
    out.push_str(&line("Principal repaid:", t.repayments.principal, sym));
    out.push_str(&line("Interest received:", t.repayments.interest, sym));
    out.push_str(&line("Bad debt recovery:", t.repayments.recovery, sym));
    out.push_str(&line("Transfer Payment:", t.loan_parts.transfer_payment, sym));
    out.push_str(&rule());
    out.push_str(&line("Total incomings:", pl.total_incomings, sym));
    out.push('\n');

    out.push_str("Totals:\n");
    out.push_str(&line(
        &format!("Monies transferred in to {platform}:"),
        t.transfers.transfer_in,
        sym,
    ));
    out.push_str(&line(
        &format!("Monies transferred out of {platform}:"),
        t.transfers.transfer_out,
        sym,
    ));
    out.push_str(&rule());
    out.push_str(&line("Capital difference in account:", pl.capital_difference, sym));
    out.push('\n');
    out.push_str(&line("Net interest:", pl.profit_before_fees, sym));
    out.push_str(&line(" + Bad debt recovery:", t.repayments.recovery, sym));
    out.push_str(&line(" + Transfer Payment:", t.loan_parts.transfer_payment, sym));
    out.push_str(&line(" - Fees paid:", t.fees, sym));
    out.push_str(&rule());
    out.push_str(&line("Monthly profit/loss:", pl.monthly_profit, sym));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Statement, Totals};

    const HEADER: &str = "Date,Description,Paid In,Paid Out\n";

    fn write_statement(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("{HEADER}{body}")).unwrap();
        path
    }

    fn amounts(text: &str) -> Vec<String> {
        text.lines()
            .filter_map(|l| l.split_whitespace().last())
            .filter(|w| w.starts_with('£') || w.starts_with("-£"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_statement_heading() {
        assert_eq!(
            statement_heading("statement_2017-03_2017-04-01_00-00-00.csv").as_deref(),
            Some("2017  March")
        );
        assert_eq!(statement_heading("statement_2016-12_x.csv").as_deref(), Some("2016  December"));
        assert_eq!(statement_heading("statement_2016-13_x.csv"), None);
        assert_eq!(statement_heading("export.csv"), None);
    }

    #[test]
    fn test_zero_report_reads_zero_everywhere() {
        let pl = ProfitLoss::from_totals(&Totals::default());
        let text = format_summary(&pl, &Settings::default());
        let values = amounts(&text);
        assert_eq!(values.len(), 17);
        assert!(values.iter().all(|v| v == "£0.00"), "{text}");
    }

    #[test]
    fn test_summary_lines() {
        let statement = Statement::from_records(&[
            &["Date", "Description", "Paid In", "Paid Out"],
            &["2000-01-01", "TRANSFERIN 0001", "10000.00", ""],
            &["2000-01-02", "Servicing fee", "", "0.04"],
            &["2000-01-03", "Interest repayment for loan part 1", "1.04", ""],
            &["2000-01-20", "TRANSFEROUT 0002", "", "5000.00"],
        ]);
        let pl = reports::get_profit_loss(&statement).unwrap();
        let text = format_summary(&pl, &Settings::default());
        assert!(text.contains(&format!(
            "  {:<46}£10,000.00\n",
            "Monies transferred in to Funding Circle:"
        )));
        assert!(text.contains("Capital difference in account:"));
        assert!(text.contains("£5,000.00\n"));
        assert!(text.contains(&format!("  {:<46}£0.04\n", "Fees paid to Funding Circle:")));
        assert!(text.contains(&format!("  {:<46}£1.00\n", "Monthly profit/loss:")));
    }

    #[test]
    fn test_summary_uses_settings() {
        let settings = Settings {
            currency_symbol: "€".to_string(),
            platform_name: "Lendco".to_string(),
            statements_dir: None,
        };
        let text = format_summary(&ProfitLoss::from_totals(&Totals::default()), &settings);
        assert!(text.contains("Fees paid to Lendco:"));
        assert!(text.contains("€0.00"));
        assert!(!text.contains('£'));
    }

    #[test]
    fn test_report_file_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            "s.csv",
            "2000-01-01,Principal repayment for loan part 12345678,0.38,\n\
             2000-01-01,Interest repayment for loan part 12345678,0.03,\n",
        );
        let first = report_file(&path, &Settings::default()).unwrap();
        let second = report_file(&path, &Settings::default()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains(&format!("  {:<46}£0.38\n", "Principal repaid:")));
        assert!(first.contains(&format!("  {:<46}£0.03\n", "Interest received:")));
    }

    #[test]
    fn test_report_dir_headings_in_order() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        write_statement(dir.path(), "statement_2017-02_a.csv", "");
        write_statement(dir.path(), "statement_2017-01_a.csv", "");
        std::fs::write(dir.path().join("readme.txt"), "ignore me").unwrap();
        let text = report_dir(dir.path(), &Settings::default()).unwrap();
        let headings: Vec<&str> = text.lines().filter(|l| l.starts_with(BANNER)).collect();
        assert_eq!(
            headings,
            vec![
                "====================  2017  January  ====================",
                "====================  2017  February  ====================",
            ]
        );
    }

    #[test]
    fn test_report_dir_names_failing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_statement(dir.path(), "statement_2017-01_a.csv", "");
        let bad = write_statement(
            dir.path(),
            "statement_2017-02_a.csv",
            "2017-02-03,Servicing fee,,\n",
        );
        match report_dir(dir.path(), &Settings::default()) {
            Err(FcstatError::Statement { path, source }) => {
                assert_eq!(path, bad);
                assert!(matches!(*source, FcstatError::MalformedRow { line: 2, .. }));
            }
            other => panic!("expected Statement error, got {other:?}"),
        }
    }

    #[test]
    fn test_report_dir_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            report_dir(&dir.path().join("gone"), &Settings::default()),
            Err(FcstatError::NotFound(_))
        ));
    }
}
