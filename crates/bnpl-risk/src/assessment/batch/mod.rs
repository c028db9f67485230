mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::evaluation::Decision;
use super::service::{Assessment, AssessmentError, RiskAssessmentService};
use parser::RowProblem;

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read applicant batch: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Failure confined to a single batch row.
#[derive(Debug, thiserror::Error)]
pub enum BatchRowError {
    #[error("malformed row: {0}")]
    Malformed(String),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}

#[derive(Debug)]
pub struct BatchEntry {
    /// Line number within the CSV source.
    pub line: u64,
    pub outcome: Result<Assessment, BatchRowError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.entries.len(),
            ..BatchSummary::default()
        };

        for entry in &self.entries {
            match &entry.outcome {
                Ok(assessment) => match assessment.result.decision {
                    Decision::Approve => summary.approved += 1,
                    Decision::Conditional => summary.conditional += 1,
                    Decision::Reject => summary.rejected += 1,
                },
                Err(_) => summary.failed += 1,
            }
        }

        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub conditional: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Assesses every applicant row of a CSV export.
pub struct BatchAssessor<'a> {
    service: &'a RiskAssessmentService,
}

impl<'a> BatchAssessor<'a> {
    pub fn new(service: &'a RiskAssessmentService) -> Self {
        Self { service }
    }

    pub fn assess_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchReport, BatchImportError> {
        let file = std::fs::File::open(path)?;
        self.assess_reader(file)
    }

    pub fn assess_reader<R: Read>(&self, reader: R) -> Result<BatchReport, BatchImportError> {
        let mut report = BatchReport::default();

        for row in parser::parse_rows(reader)? {
            let outcome = match row.input {
                Ok(input) => self.service.assess(&input).map_err(BatchRowError::from),
                Err(RowProblem::Malformed(detail)) => Err(BatchRowError::Malformed(detail)),
                Err(RowProblem::Invalid(err)) => Err(AssessmentError::from(err).into()),
            };

            if let Err(err) = &outcome {
                warn!(line = row.line, error = %err, "skipping batch row");
            }

            report.entries.push(BatchEntry {
                line: row.line,
                outcome,
            });
        }

        let summary = report.summary();
        info!(
            total = summary.total,
            approved = summary.approved,
            conditional = summary.conditional,
            rejected = summary.rejected,
            failed = summary.failed,
            "applicant batch assessed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AssessmentContext, DecisionPolicy, ModelArtifacts};

    fn service() -> RiskAssessmentService {
        let artifacts = ModelArtifacts::reference().expect("reference bundle");
        let context = AssessmentContext::from_artifacts(&artifacts).expect("context builds");
        RiskAssessmentService::new(context, DecisionPolicy::default())
    }

    #[test]
    fn bad_rows_do_not_abort_the_batch() {
        let csv = "age,monthly_income,purchase_amount,installments,employment_status,avg_overdue_days,missed_payments,previous_bnpl_loans\n\
25,50000,20000,6,Salaried,0,0,0\n\
40,30000,10000,4,Salaried,0,0,0\n\
33,abc,10000,6,Salaried,0,0,0\n\
12,30000,10000,6,Salaried,0,0,0\n\
29,30000,10000,3,Retired,0,0,0\n";

        let service = service();
        let report = BatchAssessor::new(&service)
            .assess_reader(csv.as_bytes())
            .expect("batch reads");

        assert_eq!(report.entries.len(), 5);
        assert!(report.entries[0].outcome.is_ok());
        assert_eq!(report.entries[0].line, 2);
        assert!(matches!(
            report.entries[1].outcome,
            Err(BatchRowError::Assessment(AssessmentError::Validation(_)))
        ));
        assert!(matches!(
            report.entries[2].outcome,
            Err(BatchRowError::Malformed(_))
        ));
        assert!(matches!(
            report.entries[3].outcome,
            Err(BatchRowError::Assessment(AssessmentError::Validation(_)))
        ));
        assert!(matches!(
            report.entries[4].outcome,
            Err(BatchRowError::Assessment(AssessmentError::Validation(_)))
        ));

        let summary = report.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.failed, 4);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let service = service();
        match BatchAssessor::new(&service).assess_path("does/not/exist.csv") {
            Err(BatchImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
