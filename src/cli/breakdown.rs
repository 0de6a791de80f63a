use std::collections::HashSet;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::categorizer::{classify_description, classify_loan_parts, loan_part_amounts, loan_part_id};
use crate::error::Result;
use crate::fmt::money;
use crate::importer::read_statement;
use crate::models::{Column, Statement};
use crate::settings::load_settings;

pub struct BreakdownRow {
    pub line: usize,
    pub date: String,
    pub description: String,
    pub label: String,
    pub amount: Option<f64>,
    pub counted: bool,
}

/// One entry per row that some classifier claims, with the amount it adds.
pub fn breakdown_rows(statement: &Statement) -> Result<Vec<BreakdownRow>> {
    let counted_lines: HashSet<usize> = classify_loan_parts(statement)?
        .counted_lines
        .into_iter()
        .collect();
    let mut out = Vec::new();

    for row in &statement.rows {
        let description = row.description()?;
        let Some(classifier) = classify_description(description) else {
            continue;
        };
        let (label, amount, counted) = match classifier.target() {
            Some((column, _)) => (classifier.key().to_string(), Some(row.amount(column)?), true),
            None => {
                let id = loan_part_id(description).unwrap_or_default();
                let counted = counted_lines.contains(&row.line);
                let amount = counted.then(|| {
                    let parts = loan_part_amounts(description);
                    parts.interest + parts.principal + parts.transfer_payment
                });
                (format!("{} {id}", classifier.key()), amount, counted)
            }
        };
        out.push(BreakdownRow {
            line: row.line,
            date: row.field(Column::Date)?.to_string(),
            description: description.to_string(),
            label,
            amount,
            counted,
        });
    }
    Ok(out)
}

pub fn run(file: &str) -> Result<()> {
    let settings = load_settings();
    let statement = read_statement(&PathBuf::from(file))?;
    let rows = breakdown_rows(&statement)?;

    let mut table = Table::new();
    table.set_header(vec!["Line", "Date", "Category", "Amount", "Description"]);
    for r in &rows {
        let label = if r.counted {
            Cell::new(r.label.as_str().green())
        } else {
            Cell::new(format!("{} (duplicate)", r.label).as_str().dimmed())
        };
        table.add_row(vec![
            Cell::new(r.line),
            Cell::new(&r.date),
            label,
            Cell::new(
                r.amount
                    .map(|a| money(a, &settings.currency_symbol))
                    .unwrap_or_default(),
            ),
            Cell::new(&r.description),
        ]);
    }

    println!("{table}");
    println!(
        "{} of {} rows classified",
        rows.len(),
        statement.rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_skips_unclassified_rows() {
        let statement = Statement::from_records(&[
            &["Date", "Description", "Paid In", "Paid Out"],
            &["2000-01-01", "Servicing fee", "", "0.04"],
            &["2000-01-02", "Something unrelated", "", ""],
        ]);
        let rows = breakdown_rows(&statement).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].label, "servicing_fee");
        assert_eq!(rows[0].amount, Some(0.04));
        assert!(rows[0].counted);
    }

    #[test]
    fn test_breakdown_marks_repeated_loan_parts() {
        let statement = Statement::from_records(&[
            &["2000-01-05", "Loan Part ID 999 : Principal 20.00, Interest 0.10", "", "20.10"],
            &["2000-01-06", "Loan Part ID 999 : Principal 20.00, Interest 0.50", "", "20.50"],
        ]);
        let rows = breakdown_rows(&statement).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "loan_part 999");
        assert!(rows[0].counted);
        assert!((rows[0].amount.unwrap() - 20.10).abs() < 1e-9);
        assert!(!rows[1].counted);
        assert_eq!(rows[1].amount, None);
    }

    #[test]
    fn test_breakdown_loan_part_amount_includes_transfer_payment() {
        let statement = Statement::from_records(&[&[
            "2000-01-05",
            "Loan Part ID 5 : Principal 10.00, Interest 0.20, Transfer Payment -0.05",
            "",
            "10.15",
        ]]);
        let rows = breakdown_rows(&statement).unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].amount.unwrap() - 10.25).abs() < 1e-9);
    }
}
