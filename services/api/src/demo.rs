use crate::cli::ModelArgs;
use crate::infra::build_service;
use crate::routes::BatchResponse;
use bnpl_risk::assessment::{
    ApplicantInput, Assessment, BatchAssessor, EmploymentStatus, InstallmentPlan,
    RiskAssessmentService,
};
use bnpl_risk::error::AppError;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Applicant age in years (18-70)
    #[arg(long)]
    pub(crate) age: u8,
    /// Monthly income
    #[arg(long)]
    pub(crate) monthly_income: f64,
    /// Purchase amount to be financed
    #[arg(long)]
    pub(crate) purchase_amount: f64,
    /// Installment count (3, 6, 9 or 12)
    #[arg(long, value_parser = parse_installments)]
    pub(crate) installments: InstallmentPlan,
    /// Employment status: Salaried, Self-Employed or Unemployed
    #[arg(long)]
    pub(crate) employment: EmploymentStatus,
    /// Average days overdue on previous repayments
    #[arg(long, default_value_t = 0.0)]
    pub(crate) avg_overdue_days: f64,
    /// Number of missed payments
    #[arg(long, default_value_t = 0.0)]
    pub(crate) missed_payments: f64,
    /// Number of previous BNPL loans
    #[arg(long, default_value_t = 0.0)]
    pub(crate) previous_bnpl_loans: f64,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

impl AssessArgs {
    pub(crate) fn applicant(&self) -> ApplicantInput {
        ApplicantInput {
            age: self.age,
            monthly_income: self.monthly_income,
            purchase_amount: self.purchase_amount,
            installments: self.installments,
            employment_status: self.employment,
            avg_overdue_days: self.avg_overdue_days,
            missed_payments: self.missed_payments,
            previous_bnpl_loans: self.previous_bnpl_loans,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one applicant per row
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the full per-row result as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

pub(crate) fn parse_installments(raw: &str) -> Result<InstallmentPlan, String> {
    let count: u8 = raw
        .trim()
        .parse()
        .map_err(|err| format!("'{raw}' is not an installment count ({err})"))?;
    InstallmentPlan::try_from(count).map_err(|err| err.to_string())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let service = build_service(&args.model.assessment_config())?;
    let assessment = service.assess(&args.applicant())?;
    print!("{}", render_assessment(&assessment));
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = build_service(&args.model.assessment_config())?;
    let report = BatchAssessor::new(&service).assess_path(&args.input)?;

    if args.json {
        let response = BatchResponse::from_report(&report, Utc::now());
        let rendered = serde_json::to_string_pretty(&response).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Batch assessment for {}", args.input.display());
    for entry in &report.entries {
        match &entry.outcome {
            Ok(assessment) => println!(
                "- line {}: {:.2}% {} -> {}",
                entry.line,
                assessment.result.probability * 100.0,
                assessment.result.risk_level.label(),
                assessment.result.decision.label()
            ),
            Err(err) => println!("- line {}: skipped ({err})", entry.line),
        }
    }

    let summary = report.summary();
    println!(
        "\n{} rows | {} approved | {} conditional | {} rejected | {} failed",
        summary.total, summary.approved, summary.conditional, summary.rejected, summary.failed
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service(&args.model.assessment_config())?;
    let model = service.model_info();

    println!("BNPL risk assessment demo");
    println!(
        "Model {} | {} features | cutoff {:.2}",
        model.version,
        model.feature_names.len(),
        model.cutoff
    );

    for (title, applicant) in demo_applicants() {
        println!("\n=== {title} ===");
        render_applicant(&applicant);
        demo_assessment(&service, &applicant);
    }

    Ok(())
}

fn demo_assessment(service: &RiskAssessmentService, applicant: &ApplicantInput) {
    match service.assess(applicant) {
        Ok(assessment) => print!("{}", render_assessment(&assessment)),
        Err(err) => println!("  Assessment unavailable: {}", err),
    }
}

fn demo_applicants() -> Vec<(&'static str, ApplicantInput)> {
    vec![
        (
            "Established salaried applicant",
            ApplicantInput {
                age: 25,
                monthly_income: 50_000.0,
                purchase_amount: 20_000.0,
                installments: InstallmentPlan::Six,
                employment_status: EmploymentStatus::Salaried,
                avg_overdue_days: 0.0,
                missed_payments: 0.0,
                previous_bnpl_loans: 0.0,
            },
        ),
        (
            "Self-employed applicant with light delays",
            ApplicantInput {
                age: 30,
                monthly_income: 30_000.0,
                purchase_amount: 15_000.0,
                installments: InstallmentPlan::Six,
                employment_status: EmploymentStatus::SelfEmployed,
                avg_overdue_days: 6.0,
                missed_payments: 1.0,
                previous_bnpl_loans: 2.0,
            },
        ),
        (
            "Over-extended applicant",
            ApplicantInput {
                age: 35,
                monthly_income: 50_000.0,
                purchase_amount: 90_000.0,
                installments: InstallmentPlan::Three,
                employment_status: EmploymentStatus::Salaried,
                avg_overdue_days: 20.0,
                missed_payments: 5.0,
                previous_bnpl_loans: 4.0,
            },
        ),
    ]
}

fn render_applicant(applicant: &ApplicantInput) {
    println!(
        "Applicant: age {} | {} | income {:.0} | purchase {:.0} over {} installments",
        applicant.age,
        applicant.employment_status.label(),
        applicant.monthly_income,
        applicant.purchase_amount,
        applicant.installments.count()
    );
    println!(
        "History: {:.0} avg overdue days | {:.0} missed payments | {:.0} previous BNPL loans",
        applicant.avg_overdue_days, applicant.missed_payments, applicant.previous_bnpl_loans
    );
}

pub(crate) fn render_assessment(assessment: &Assessment) -> String {
    let result = &assessment.result;
    let ratios = &assessment.ratios;
    let mut out = String::new();

    out.push_str("Risk assessment result\n");
    out.push_str(&format!(
        "- Probability of default: {:.2}%\n",
        result.probability * 100.0
    ));
    out.push_str(&format!("- Risk category: {}\n", result.risk_level.label()));
    out.push_str(&format!("- {}\n", result.decision.summary()));
    out.push_str(&format!(
        "- Installment {:.2} | {:.1}% of monthly income | payment risk score {:.1}\n",
        ratios.installment_amount,
        ratios.installment_to_income * 100.0,
        ratios.payment_risk_score
    ));

    if !result.conditions.is_empty() {
        out.push_str("Recommended conditions\n");
        for condition in &result.conditions {
            out.push_str(&format!("  - {}\n", condition.message()));
        }
    }

    out.push_str("Decision explanation\n");
    for reason in &result.reasons {
        out.push_str(&format!("  - {}\n", reason.message()));
    }

    out.push_str("Model explanation (top contributions)\n");
    for attribution in &result.attributions {
        out.push_str(&format!(
            "  - {}: {:+.4} ({})\n",
            attribution.feature,
            attribution.value,
            attribution.impact.label()
        ));
    }

    out
}
