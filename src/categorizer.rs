use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::models::{Bucket, Column, LoanParts, Statement, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Contains,
    StartsWith,
}

fn matches(description: &str, pattern: &str, match_type: MatchType) -> bool {
    match match_type {
        MatchType::Contains => description.contains(pattern),
        MatchType::StartsWith => description.starts_with(pattern),
    }
}

// ---------------------------------------------------------------------------
// Classifier kinds: enum dispatch, evaluated in ALL_CLASSIFIERS order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    TransferIn,
    TransferOut,
    LoanPurchase,
    ServicingFee,
    InterestRepayment,
    PrincipalRepayment,
    RecoveryRepayment,
    LoanPart,
}

impl Classifier {
    pub fn key(&self) -> &'static str {
        match self {
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::LoanPurchase => "loan_purchase",
            Self::ServicingFee => "servicing_fee",
            Self::InterestRepayment => "interest_repayment",
            Self::PrincipalRepayment => "principal_repayment",
            Self::RecoveryRepayment => "recovery_repayment",
            Self::LoanPart => "loan_part",
        }
    }

    /// Description patterns, any of which selects the row.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::TransferIn => &["TRANSFERIN"],
            Self::TransferOut => &["TRANSFEROUT"],
            Self::LoanPurchase => &["Loan offer"],
            Self::ServicingFee => &["Servicing fee"],
            Self::InterestRepayment => &["Interest repayment", "Early interest repayment"],
            Self::PrincipalRepayment => &["Principal repayment", "Early principal repayment"],
            Self::RecoveryRepayment => &[
                "Interest recovery repayment",
                "Principal recovery repayment",
            ],
            Self::LoanPart => &["Loan Part ID "],
        }
    }

    pub fn match_type(&self) -> MatchType {
        match self {
            Self::TransferIn | Self::TransferOut => MatchType::Contains,
            _ => MatchType::StartsWith,
        }
    }

    /// Column holding the amount and the bucket it is added to. Loan parts
    /// carry their amounts inside the description instead.
    pub fn target(&self) -> Option<(Column, Bucket)> {
        match self {
            Self::TransferIn => Some((Column::PaidIn, Bucket::TransferIn)),
            Self::TransferOut => Some((Column::PaidOut, Bucket::TransferOut)),
            Self::LoanPurchase => Some((Column::PaidOut, Bucket::Loans)),
            Self::ServicingFee => Some((Column::PaidOut, Bucket::Fees)),
            Self::InterestRepayment => Some((Column::PaidIn, Bucket::RepaymentInterest)),
            Self::PrincipalRepayment => Some((Column::PaidIn, Bucket::RepaymentPrincipal)),
            Self::RecoveryRepayment => Some((Column::PaidIn, Bucket::RepaymentRecovery)),
            Self::LoanPart => None,
        }
    }

    pub fn is_match(&self, description: &str) -> bool {
        match self {
            Self::LoanPart => loan_part_id(description).is_some(),
            _ => self
                .patterns()
                .iter()
                .any(|p| matches(description, p, self.match_type())),
        }
    }

    /// Run this classifier over every row, returning only its own totals.
    pub fn classify(&self, statement: &Statement) -> Result<Totals> {
        let mut totals = Totals::default();
        let Some((column, bucket)) = self.target() else {
            let result = classify_loan_parts(statement)?;
            log::debug!("{} distinct loan parts", result.ids.len());
            totals.loan_parts = result.totals;
            return Ok(totals);
        };
        for row in &statement.rows {
            if !self.is_match(row.description()?) {
                continue;
            }
            let amount = row.amount(column)?;
            log::debug!(
                "line {} ({}): {} {:.2}",
                row.line,
                row.field(Column::Date)?,
                self.key(),
                amount
            );
            totals.add(bucket, amount);
        }
        Ok(totals)
    }
}

pub const ALL_CLASSIFIERS: &[Classifier] = &[
    Classifier::TransferIn,
    Classifier::TransferOut,
    Classifier::LoanPurchase,
    Classifier::ServicingFee,
    Classifier::InterestRepayment,
    Classifier::PrincipalRepayment,
    Classifier::RecoveryRepayment,
    Classifier::LoanPart,
];

/// First classifier, in `ALL_CLASSIFIERS` order, that claims this description.
pub fn classify_description(description: &str) -> Option<Classifier> {
    ALL_CLASSIFIERS.iter().find(|c| c.is_match(description)).copied()
}

// ---------------------------------------------------------------------------
// Loan parts
// ---------------------------------------------------------------------------

struct LoanPartPatterns {
    header: Regex,
    interest: Regex,
    principal: Regex,
    transfer_payment: Regex,
}

fn loan_part_patterns() -> &'static LoanPartPatterns {
    static PATTERNS: OnceLock<LoanPartPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| LoanPartPatterns {
        header: Regex::new(r"^Loan Part ID (\d+)").expect("valid regex"),
        interest: Regex::new(r"Interest \p{Sc}?(\d+\.\d+)").expect("valid regex"),
        principal: Regex::new(r"Principal \p{Sc}?(\d+\.\d+)").expect("valid regex"),
        transfer_payment: Regex::new(r"Transfer Payment \p{Sc}?-\p{Sc}?(\d+\.\d+)")
            .expect("valid regex"),
    })
}

/// The ID from a description starting with `Loan Part ID <digits>`.
pub fn loan_part_id(description: &str) -> Option<&str> {
    loan_part_patterns()
        .header
        .captures(description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn capture_amount(re: &Regex, description: &str) -> Option<f64> {
    re.captures(description)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Amounts named inside a single loan part description. Missing labels are zero.
pub fn loan_part_amounts(description: &str) -> LoanParts {
    let p = loan_part_patterns();
    LoanParts {
        interest: capture_amount(&p.interest, description).unwrap_or(0.0),
        principal: capture_amount(&p.principal, description).unwrap_or(0.0),
        transfer_payment: capture_amount(&p.transfer_payment, description).unwrap_or(0.0),
    }
}

/// True when `id` occurs in `text` as a whole number, not as part of a
/// longer digit run or a decimal amount.
pub fn contains_id(text: &str, id: &str) -> bool {
    let is_number_char = |c: char| c.is_ascii_digit() || c == '.';
    text.match_indices(id).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + id.len()..].chars().next();
        !before.map_or(false, is_number_char) && !after.map_or(false, is_number_char)
    })
}

pub struct LoanPartResult {
    pub totals: LoanParts,
    /// IDs in the order they were first seen.
    pub ids: Vec<String>,
    /// Line of the description each ID was taken from, one per ID.
    pub counted_lines: Vec<usize>,
}

pub fn classify_loan_parts(statement: &Statement) -> Result<LoanPartResult> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids: Vec<&str> = Vec::new();
    let mut descriptions: Vec<(usize, &str)> = Vec::new();

    for row in &statement.rows {
        let description = row.description()?;
        if let Some(id) = loan_part_id(description) {
            descriptions.push((row.line, description));
            if seen.insert(id) {
                ids.push(id);
            } else {
                log::debug!("line {}: loan part {id} already seen", row.line);
            }
        }
    }

    let mut totals = LoanParts::default();
    let mut counted_lines = Vec::new();
    for id in &ids {
        let Some(&(line, description)) = descriptions.iter().find(|(_, d)| contains_id(d, id))
        else {
            continue;
        };
        counted_lines.push(line);
        let amounts = loan_part_amounts(description);
        log::debug!(
            "loan part {id}: interest {:.2}, principal {:.2}, transfer payment {:.2}",
            amounts.interest,
            amounts.principal,
            amounts.transfer_payment
        );
        totals.interest += amounts.interest;
        totals.principal += amounts.principal;
        totals.transfer_payment += amounts.transfer_payment;
    }

    Ok(LoanPartResult {
        totals,
        ids: ids.into_iter().map(str::to_string).collect(),
        counted_lines,
    })
}
