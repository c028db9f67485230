use serde::Deserialize;
use std::io::Read;

use super::super::domain::{ApplicantInput, InstallmentPlan, ValidationError};

#[derive(Debug)]
pub(crate) struct ParsedRow {
    pub(crate) line: u64,
    pub(crate) input: Result<ApplicantInput, RowProblem>,
}

#[derive(Debug)]
pub(crate) enum RowProblem {
    Malformed(String),
    Invalid(ValidationError),
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ParsedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let input = match record.deserialize::<ApplicantRow>(Some(&headers)) {
            Ok(row) => row.into_input(),
            Err(err) => Err(RowProblem::Malformed(err.to_string())),
        };

        rows.push(ParsedRow { line, input });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    age: u8,
    monthly_income: f64,
    purchase_amount: f64,
    installments: u8,
    employment_status: String,
    avg_overdue_days: f64,
    missed_payments: f64,
    previous_bnpl_loans: f64,
}

impl ApplicantRow {
    fn into_input(self) -> Result<ApplicantInput, RowProblem> {
        let installments =
            InstallmentPlan::try_from(self.installments).map_err(RowProblem::Invalid)?;
        let employment_status = self.employment_status.parse().map_err(RowProblem::Invalid)?;

        Ok(ApplicantInput {
            age: self.age,
            monthly_income: self.monthly_income,
            purchase_amount: self.purchase_amount,
            installments,
            employment_status,
            avg_overdue_days: self.avg_overdue_days,
            missed_payments: self.missed_payments,
            previous_bnpl_loans: self.previous_bnpl_loans,
        })
    }
}
