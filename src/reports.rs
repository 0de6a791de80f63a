use crate::categorizer::ALL_CLASSIFIERS;
use crate::error::Result;
use crate::models::{Statement, Totals};

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Run every classifier over the statement and merge their totals.
pub fn tally(statement: &Statement) -> Result<Totals> {
    let mut totals = Totals::default();
    for classifier in ALL_CLASSIFIERS {
        let slice = classifier.classify(statement)?;
        totals.merge(&slice);
    }
    Ok(totals)
}

// ---------------------------------------------------------------------------
// Profit & loss
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitLoss {
    pub totals: Totals,
    pub total_loans_purchased: f64,
    pub profit_before_fees: f64,
    pub total_outgoings: f64,
    pub total_incomings: f64,
    pub capital_difference: f64,
    pub monthly_profit: f64,
}

impl ProfitLoss {
    pub fn from_totals(totals: &Totals) -> Self {
        let loan_parts = &totals.loan_parts;
        let repayments = &totals.repayments;
        let transfers = &totals.transfers;

        let total_loans_purchased = totals.loans + loan_parts.principal;
        let profit_before_fees = repayments.interest - loan_parts.interest;

        Self {
            totals: *totals,
            total_loans_purchased,
            profit_before_fees,
            total_outgoings: total_loans_purchased + loan_parts.interest + totals.fees,
            total_incomings: repayments.principal
                + repayments.interest
                + repayments.recovery
                + loan_parts.transfer_payment,
            capital_difference: transfers.transfer_in - transfers.transfer_out,
            monthly_profit: profit_before_fees - totals.fees
                + repayments.recovery
                + loan_parts.transfer_payment,
        }
    }
}

pub fn get_profit_loss(statement: &Statement) -> Result<ProfitLoss> {
    Ok(ProfitLoss::from_totals(&tally(statement)?))
}
