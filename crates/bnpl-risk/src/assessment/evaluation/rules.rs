use super::super::domain::ApplicantInput;
use super::super::features::DerivedRatios;
use super::config::DecisionPolicy;
use super::policy::{ApprovalCondition, RiskReason};

/// Raw and derived values the recommendation and reason rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DecisionSignals {
    pub installment_to_income: f64,
    pub purchase_amount: f64,
    pub monthly_income: f64,
    pub avg_overdue_days: f64,
    pub missed_payments: f64,
    pub previous_bnpl_loans: f64,
}

impl DecisionSignals {
    pub(crate) fn new(input: &ApplicantInput, ratios: &DerivedRatios) -> Self {
        Self {
            installment_to_income: ratios.installment_to_income,
            purchase_amount: input.purchase_amount,
            monthly_income: input.monthly_income,
            avg_overdue_days: input.avg_overdue_days,
            missed_payments: input.missed_payments,
            previous_bnpl_loans: input.previous_bnpl_loans,
        }
    }
}

struct Rule<E> {
    applies: fn(&DecisionSignals, &DecisionPolicy) -> bool,
    effect: fn(&DecisionPolicy) -> E,
}

impl<E> Rule<E> {
    fn fire(&self, signals: &DecisionSignals, policy: &DecisionPolicy) -> Option<E> {
        if (self.applies)(signals, policy) {
            Some((self.effect)(policy))
        } else {
            None
        }
    }
}

const CONDITION_RULES: [Rule<ApprovalCondition>; 3] = [
    Rule {
        applies: |signals, policy| {
            signals.installment_to_income > policy.reduce_installments_above_ratio
        },
        effect: |policy| ApprovalCondition::ReduceInstallments {
            max_installments: policy.max_reduced_installments,
        },
    },
    Rule {
        applies: |signals, policy| {
            signals.purchase_amount > signals.monthly_income * policy.purchase_income_share
        },
        effect: |_| ApprovalCondition::LowerPurchaseAmount,
    },
    Rule {
        applies: |_, _| true,
        effect: |policy| ApprovalCondition::UpfrontPayment {
            percent: policy.upfront_payment_pct,
        },
    },
];

const REASON_RULES: [Rule<RiskReason>; 4] = [
    Rule {
        applies: |signals, policy| signals.installment_to_income > policy.high_installment_ratio,
        effect: |_| RiskReason::HighInstallmentBurden,
    },
    Rule {
        applies: |signals, policy| signals.avg_overdue_days > policy.overdue_days_limit,
        effect: |_| RiskReason::FrequentPaymentDelays,
    },
    Rule {
        applies: |signals, policy| signals.missed_payments > policy.missed_payments_limit,
        effect: |_| RiskReason::MultipleMissedPayments,
    },
    Rule {
        applies: |signals, policy| signals.previous_bnpl_loans > policy.previous_loans_limit,
        effect: |_| RiskReason::ExcessiveBnplHistory,
    },
];

pub(crate) fn conditions_for(
    signals: &DecisionSignals,
    policy: &DecisionPolicy,
) -> Vec<ApprovalCondition> {
    CONDITION_RULES
        .iter()
        .filter_map(|rule| rule.fire(signals, policy))
        .collect()
}

pub(crate) fn reasons_for(signals: &DecisionSignals, policy: &DecisionPolicy) -> Vec<RiskReason> {
    let reasons: Vec<RiskReason> = REASON_RULES
        .iter()
        .filter_map(|rule| rule.fire(signals, policy))
        .collect();

    if reasons.is_empty() {
        vec![RiskReason::NoMajorRiskFactors]
    } else {
        reasons
    }
}
