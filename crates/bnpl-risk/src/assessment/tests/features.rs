use super::common::*;
use crate::assessment::domain::{EmploymentStatus, InstallmentPlan, ValidationError};
use crate::assessment::features::{
    derive_features, FeatureSchema, SchemaMismatchError, ASSEMBLED_FEATURES, EPSILON,
    INCOME_PURCHASE_RATIO, INSTALLMENT_AMOUNT, INSTALLMENT_TO_INCOME, IS_SELF_EMPLOYED,
    IS_UNEMPLOYED, PAYMENT_RISK_SCORE,
};

#[test]
fn canonical_schema_produces_every_feature_in_order() {
    let schema = FeatureSchema::canonical();
    let derived = derive_features(&prime_applicant(), &schema).expect("schema resolves");

    let names: Vec<&str> = derived.vector.names().iter().map(String::as_str).collect();
    assert_eq!(names, ASSEMBLED_FEATURES.to_vec());
    assert_eq!(
        derived.vector.values(),
        &[
            25.0,
            50_000.0,
            20_000.0,
            6.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            2.5,
            20_000.0 / 6.0,
            (20_000.0 / 6.0) / 50_000.0,
            0.0,
        ]
    );
}

#[test]
fn vector_follows_declared_schema_order() {
    let schema = FeatureSchema::new([PAYMENT_RISK_SCORE, "age", IS_UNEMPLOYED, "installments"])
        .expect("valid schema");
    let mut applicant = stretched_applicant();
    applicant.employment_status = EmploymentStatus::Unemployed;

    let derived = derive_features(&applicant, &schema).expect("schema resolves");

    assert_eq!(derived.vector.names(), schema.names());
    assert_eq!(derived.vector.values(), &[14.0, 35.0, 1.0, 3.0]);
}

#[test]
fn unknown_schema_feature_is_a_mismatch() {
    let schema = FeatureSchema::new(["age", "credit_score"]).expect("structurally valid");

    match derive_features(&prime_applicant(), &schema) {
        Err(SchemaMismatchError::UnknownFeature(name)) => assert_eq!(name, "credit_score"),
        other => panic!("expected schema mismatch, got {other:?}"),
    }
    assert_eq!(
        schema.ensure_derivable(),
        Err(SchemaMismatchError::UnknownFeature("credit_score".to_string()))
    );
}

#[test]
fn schema_rejects_duplicates_and_empty_lists() {
    assert_eq!(
        FeatureSchema::new(["age", "age"]),
        Err(SchemaMismatchError::DuplicateFeature("age".to_string()))
    );
    assert_eq!(
        FeatureSchema::new(Vec::<String>::new()),
        Err(SchemaMismatchError::Empty)
    );
}

#[test]
fn zero_income_and_purchase_stay_finite() {
    let mut applicant = prime_applicant();
    applicant.monthly_income = 0.0;
    applicant.purchase_amount = 0.0;

    let derived = derive_features(&applicant, &FeatureSchema::canonical()).expect("resolves");

    assert_eq!(derived.ratios.income_purchase_ratio, 1.0);
    assert_eq!(derived.ratios.installment_amount, 0.0);
    assert_eq!(derived.ratios.installment_to_income, 0.0);
    assert!(derived.vector.values().iter().all(|value| value.is_finite()));
}

#[test]
fn zero_income_uses_epsilon_divisor() {
    let mut applicant = prime_applicant();
    applicant.monthly_income = 0.0;
    applicant.purchase_amount = 3_000.0;
    applicant.installments = InstallmentPlan::Three;

    let derived = derive_features(&applicant, &FeatureSchema::canonical()).expect("resolves");

    assert_eq!(derived.ratios.income_purchase_ratio, EPSILON / 3_000.0);
    assert_eq!(derived.ratios.installment_amount, 1_000.0);
    assert_eq!(derived.ratios.installment_to_income, 1_000.0 / EPSILON);
    assert!(derived.ratios.installment_to_income.is_finite());
}

#[test]
fn employment_flags_are_one_hot_with_salaried_baseline() {
    let schema = FeatureSchema::new([IS_SELF_EMPLOYED, IS_UNEMPLOYED]).expect("valid schema");
    let cases = [
        (EmploymentStatus::Salaried, [0.0, 0.0]),
        (EmploymentStatus::SelfEmployed, [1.0, 0.0]),
        (EmploymentStatus::Unemployed, [0.0, 1.0]),
    ];

    for (status, expected) in cases {
        let mut applicant = prime_applicant();
        applicant.employment_status = status;
        let derived = derive_features(&applicant, &schema).expect("resolves");
        assert_eq!(derived.vector.values(), &expected, "{status:?}");
    }
}

#[test]
fn derived_ratios_match_stretched_applicant() {
    let derived =
        derive_features(&stretched_applicant(), &FeatureSchema::canonical()).expect("resolves");

    assert_eq!(derived.vector.get(INSTALLMENT_AMOUNT), Some(30_000.0));
    assert_eq!(derived.vector.get(INSTALLMENT_TO_INCOME), Some(0.6));
    assert_eq!(
        derived.vector.get(INCOME_PURCHASE_RATIO),
        Some(50_000.0 / 90_000.0)
    );
    assert_eq!(derived.vector.get(PAYMENT_RISK_SCORE), Some(14.0));
}

#[test]
fn ratio_overflow_is_reported_by_field() {
    let mut applicant = prime_applicant();
    applicant.monthly_income = 1e303;
    applicant.purchase_amount = 0.0;

    let derived = derive_features(&applicant, &FeatureSchema::canonical()).expect("resolves");

    assert!(derived.ratios.income_purchase_ratio.is_infinite());
    assert_eq!(
        derived.ratios.ensure_finite(),
        Err(ValidationError::NotFinite {
            field: INCOME_PURCHASE_RATIO
        })
    );
    assert_eq!(
        derive_features(&prime_applicant(), &FeatureSchema::canonical())
            .expect("resolves")
            .ratios
            .ensure_finite(),
        Ok(())
    );
}
