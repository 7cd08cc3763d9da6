//! Equated monthly installment (EMI) amortization.
//!
//! Standard annuity formula evaluated in `rust_decimal::Decimal`. Rounding to
//! two decimal places is applied only to the figures returned to the caller,
//! never inside the growth factor.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AffordError;
use crate::types::{round2, Money, Percent};
use crate::AffordResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Loan parameters as supplied by a caller (tenure still in years).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentInput {
    pub principal: Money,
    /// Annual interest rate in percent (e.g., 11 for 11%).
    pub annual_rate_percent: Percent,
    pub tenure_years: u32,
}

/// Validated loan terms. Construct with [`LoanTerms::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentResult {
    /// Monthly installment, rounded to 2 dp.
    pub installment: Money,
    /// Installment x tenure months (principal when the rate is zero).
    pub total_payment: Money,
    pub total_interest: Money,
    pub tenure_months: u32,
    pub principal: Money,
    pub annual_rate_percent: Percent,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        tenure_years: u32,
    ) -> AffordResult<Self> {
        if tenure_years == 0 {
            return Err(AffordError::invalid(
                "tenure_years",
                "Tenure must be at least 1 year.",
            ));
        }
        let tenure_months = tenure_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or_else(|| AffordError::invalid("tenure_years", "Tenure is too long."))?;
        Self::from_months(principal, annual_rate_percent, tenure_months)
    }

    pub fn from_months(
        principal: Money,
        annual_rate_percent: Percent,
        tenure_months: u32,
    ) -> AffordResult<Self> {
        if principal <= Decimal::ZERO {
            return Err(AffordError::invalid(
                "principal",
                "Loan principal must be positive.",
            ));
        }
        if annual_rate_percent < Decimal::ZERO {
            return Err(AffordError::invalid(
                "annual_rate_percent",
                "Interest rate cannot be negative.",
            ));
        }
        if tenure_months == 0 {
            return Err(AffordError::invalid(
                "tenure_months",
                "Tenure must be at least 1 month.",
            ));
        }
        Ok(LoanTerms {
            principal,
            annual_rate_percent,
            tenure_months,
        })
    }

    /// Periodic rate as a fraction (11% p.a. -> 0.00916...).
    pub fn monthly_rate(&self) -> Decimal {
        self.annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly installment, total payment and total interest for a loan.
pub fn compute_installment(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_years: u32,
) -> AffordResult<InstallmentResult> {
    let terms = LoanTerms::new(principal, annual_rate_percent, tenure_years)?;
    amortize(&terms)
}

/// [`compute_installment`] over a deserialised input.
pub fn calculate_installment(input: &InstallmentInput) -> AffordResult<InstallmentResult> {
    compute_installment(input.principal, input.annual_rate_percent, input.tenure_years)
}

/// Amortize already-validated terms.
pub fn amortize(terms: &LoanTerms) -> AffordResult<InstallmentResult> {
    let months = Decimal::from(terms.tenure_months);

    let (installment, total_payment, total_interest) = if terms.annual_rate_percent.is_zero() {
        (
            round2(terms.principal / months),
            round2(terms.principal),
            Decimal::ZERO,
        )
    } else {
        let installment = round2(annuity_payment(terms)?);
        let total_payment = installment
            .checked_mul(months)
            .ok_or_else(|| out_of_range("principal"))?;
        (
            installment,
            total_payment,
            round2(total_payment - terms.principal),
        )
    };

    if installment.is_zero() {
        return Err(AffordError::invalid(
            "principal",
            "Loan principal is too small to produce a non-zero installment.",
        ));
    }

    Ok(InstallmentResult {
        installment,
        total_payment,
        total_interest,
        tenure_months: terms.tenure_months,
        principal: terms.principal,
        annual_rate_percent: terms.annual_rate_percent,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// P * r * (1+r)^n / ((1+r)^n - 1), unrounded.
fn annuity_payment(terms: &LoanTerms) -> AffordResult<Decimal> {
    let r = terms.monthly_rate();
    let growth = (Decimal::ONE + r)
        .checked_powu(u64::from(terms.tenure_months))
        .ok_or_else(|| {
            AffordError::invalid(
                "annual_rate_percent",
                format!(
                    "Rate of {}% over {} months exceeds the supported numeric range.",
                    terms.annual_rate_percent, terms.tenure_months
                ),
            )
        })?;

    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(AffordError::invalid(
            "annual_rate_percent",
            "Interest rate is too small to amortize at decimal precision.",
        ));
    }

    terms
        .principal
        .checked_mul(r)
        .and_then(|pr| pr.checked_mul(growth / denominator))
        .ok_or_else(|| out_of_range("principal"))
}

fn out_of_range(field: &str) -> AffordError {
    AffordError::invalid(field, "Principal exceeds the supported numeric range.")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
