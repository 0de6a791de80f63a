use crate::error::{FcstatError, Result};

/// Minimum number of fields a row needs before any column can be read.
pub const MIN_FIELDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Description,
    PaidIn,
    PaidOut,
}

impl Column {
    pub fn index(&self) -> usize {
        match self {
            Self::Date => 0,
            Self::Description => 1,
            Self::PaidIn => 2,
            Self::PaidOut => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::PaidIn => "Paid In",
            Self::PaidOut => "Paid Out",
        }
    }
}

/// One line of a statement export, fields kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn field(&self, column: Column) -> Result<&str> {
        if self.fields.len() < MIN_FIELDS {
            return Err(FcstatError::ShortRow {
                line: self.line,
                fields: self.fields.len(),
            });
        }
        Ok(self.fields[column.index()].as_str())
    }

    pub fn description(&self) -> Result<&str> {
        self.field(Column::Description)
    }

    /// Amount in `column`, required to be present because the row matched.
    pub fn amount(&self, column: Column) -> Result<f64> {
        let raw = self.field(column)?;
        crate::importer::parse_amount(raw).ok_or_else(|| FcstatError::MalformedRow {
            line: self.line,
            column: column.name(),
            value: raw.to_string(),
            description: self.fields[Column::Description.index()].clone(),
        })
    }
}

/// The rows of one export, in file order. Never modified after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub rows: Vec<Row>,
}

impl Statement {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    #[cfg(test)]
    pub fn from_records(records: &[&[&str]]) -> Self {
        let rows = records
            .iter()
            .enumerate()
            .map(|(i, fields)| Row::new(i + 1, fields.iter().map(|f| f.to_string()).collect()))
            .collect();
        Self { rows }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoanParts {
    pub interest: f64,
    pub principal: f64,
    pub transfer_payment: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Repayments {
    pub interest: f64,
    pub principal: f64,
    pub recovery: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transfers {
    pub transfer_in: f64,
    pub transfer_out: f64,
}

/// Running totals for every category a statement is broken down into.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub fees: f64,
    pub loans: f64,
    pub loan_parts: LoanParts,
    pub repayments: Repayments,
    pub transfers: Transfers,
}

/// A single accumulator field inside [`Totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Fees,
    Loans,
    LoanPartInterest,
    LoanPartPrincipal,
    LoanPartTransferPayment,
    RepaymentInterest,
    RepaymentPrincipal,
    RepaymentRecovery,
    TransferIn,
    TransferOut,
}

impl Totals {
    pub fn add(&mut self, bucket: Bucket, amount: f64) {
        let slot = match bucket {
            Bucket::Fees => &mut self.fees,
            Bucket::Loans => &mut self.loans,
            Bucket::LoanPartInterest => &mut self.loan_parts.interest,
            Bucket::LoanPartPrincipal => &mut self.loan_parts.principal,
            Bucket::LoanPartTransferPayment => &mut self.loan_parts.transfer_payment,
            Bucket::RepaymentInterest => &mut self.repayments.interest,
            Bucket::RepaymentPrincipal => &mut self.repayments.principal,
            Bucket::RepaymentRecovery => &mut self.repayments.recovery,
            Bucket::TransferIn => &mut self.transfers.transfer_in,
            Bucket::TransferOut => &mut self.transfers.transfer_out,
        };
        *slot += amount;
    }

    pub fn get(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Fees => self.fees,
            Bucket::Loans => self.loans,
            Bucket::LoanPartInterest => self.loan_parts.interest,
            Bucket::LoanPartPrincipal => self.loan_parts.principal,
            Bucket::LoanPartTransferPayment => self.loan_parts.transfer_payment,
            Bucket::RepaymentInterest => self.repayments.interest,
            Bucket::RepaymentPrincipal => self.repayments.principal,
            Bucket::RepaymentRecovery => self.repayments.recovery,
            Bucket::TransferIn => self.transfers.transfer_in,
            Bucket::TransferOut => self.transfers.transfer_out,
        }
    }

    pub fn merge(&mut self, other: &Totals) {
        for bucket in ALL_BUCKETS {
            self.add(*bucket, other.get(*bucket));
        }
    }
}

pub const ALL_BUCKETS: &[Bucket] = &[
    Bucket::Fees,
    Bucket::Loans,
    Bucket::LoanPartInterest,
    Bucket::LoanPartPrincipal,
    Bucket::LoanPartTransferPayment,
    Bucket::RepaymentInterest,
    Bucket::RepaymentPrincipal,
    Bucket::RepaymentRecovery,
    Bucket::TransferIn,
    Bucket::TransferOut,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_row_rejected_on_field_access() {
        let row = Row::new(7, vec!["2000-01-01".into(), "Servicing fee".into()]);
        match row.description() {
            Err(FcstatError::ShortRow { line, fields }) => {
                assert_eq!(line, 7);
                assert_eq!(fields, 2);
            }
            other => panic!("expected ShortRow, got {other:?}"),
        }
    }

    #[test]
    fn test_amount_reports_malformed_value() {
        let row = Row::new(3, vec!["2000-01-01".into(), "Servicing fee".into(), "".into(), "n/a".into()]);
        match row.amount(Column::PaidOut) {
            Err(FcstatError::MalformedRow { line, column, value, description }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "Paid Out");
                assert_eq!(value, "n/a");
                assert_eq!(description, "Servicing fee");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_amount_is_malformed() {
        let row = Row::new(1, vec!["d".into(), "Loan offer".into(), "".into(), "".into()]);
        assert!(matches!(
            row.amount(Column::PaidOut),
            Err(FcstatError::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_merge_adds_every_bucket() {
        let mut a = Totals::default();
        a.add(Bucket::Fees, 1.5);
        a.add(Bucket::TransferIn, 10.0);
        let mut b = Totals::default();
        b.add(Bucket::Fees, 0.5);
        b.add(Bucket::LoanPartTransferPayment, 2.25);
        a.merge(&b);
        assert_eq!(a.fees, 2.0);
        assert_eq!(a.transfers.transfer_in, 10.0);
        assert_eq!(a.loan_parts.transfer_payment, 2.25);
        assert_eq!(a.repayments, Repayments::default());
    }
}
