//! Service catalogue: the form definition behind every e-service, its
//! conditional document requirements, and the submission pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::FormRecord;
use crate::validation::autocorrect::auto_correct_record;
use crate::validation::dates::{
    calculate_age, parse_date, validate_date_consistency, validate_marriage_ages,
    validate_not_future,
};
use crate::validation::evaluator::validate_fields;
use crate::validation::field_types::FieldType;
use crate::validation::field_types::FieldType as T;
use crate::validation::rules::{FieldRule, FormRules, ValidationResult};
use crate::wizard::{visible_fields, FormStep};

// ---------------------------------------------------------------------------
// Service types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    BirthCertificate,
    DeathCertificate,
    MarriageCertificate,
    BplCertificate,
    IncomeCertificate,
    AgricultureSubsidy,
    BuildingPermit,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        Self::BirthCertificate,
        Self::DeathCertificate,
        Self::MarriageCertificate,
        Self::BplCertificate,
        Self::IncomeCertificate,
        Self::AgricultureSubsidy,
        Self::BuildingPermit,
    ];

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown service type '{s}'")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BirthCertificate => "birth_certificate",
            Self::DeathCertificate => "death_certificate",
            Self::MarriageCertificate => "marriage_certificate",
            Self::BplCertificate => "bpl_certificate",
            Self::IncomeCertificate => "income_certificate",
            Self::AgricultureSubsidy => "agriculture_subsidy",
            Self::BuildingPermit => "building_permit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BirthCertificate => "Birth Certificate",
            Self::DeathCertificate => "Death Certificate",
            Self::MarriageCertificate => "Marriage Certificate",
            Self::BplCertificate => "BPL Certificate",
            Self::IncomeCertificate => "Income Certificate",
            Self::AgricultureSubsidy => "Agriculture Subsidy",
            Self::BuildingPermit => "Building Permit",
        }
    }

    /// The form a citizen fills in for this service.
    pub fn form(self) -> FormDefinition {
        match self {
            Self::BirthCertificate => birth_certificate_form(),
            Self::DeathCertificate => death_certificate_form(),
            Self::MarriageCertificate => marriage_certificate_form(),
            Self::BplCertificate => bpl_certificate_form(),
            Self::IncomeCertificate => income_certificate_form(),
            Self::AgricultureSubsidy => agriculture_subsidy_form(),
            Self::BuildingPermit => building_permit_form(),
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Form definitions
// ---------------------------------------------------------------------------

/// Steps and rules of one service's form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDefinition {
    pub service_type: ServiceType,
    pub title: &'static str,
    pub steps: Vec<FormStep>,
    pub rules: FormRules,
}

fn rules(pairs: &[(&str, FieldRule)]) -> FormRules {
    pairs.iter().map(|(k, r)| (k.to_string(), *r)).collect()
}

const fn req(t: FieldType) -> FieldRule {
    FieldRule::required(t)
}

const fn opt(t: FieldType) -> FieldRule {
    FieldRule::optional(t)
}

fn contact_step() -> FormStep {
    FormStep::new(
        "contact",
        "Contact & Address",
        &["applicant_mobile", "applicant_email", "address", "pincode"],
    )
}

fn contact_rules() -> [(&'static str, FieldRule); 4] {
    [
        ("applicant_mobile", req(T::Mobile)),
        ("applicant_email", opt(T::Email)),
        ("address", req(T::Address)),
        ("pincode", req(T::Pincode)),
    ]
}

fn form(
    service_type: ServiceType,
    mut steps: Vec<FormStep>,
    own_rules: &[(&str, FieldRule)],
) -> FormDefinition {
    let mut all = rules(own_rules);
    all.extend(rules(&contact_rules()));
    steps.push(contact_step());
    FormDefinition {
        service_type,
        title: service_type.label(),
        steps,
        rules: all,
    }
}

fn birth_certificate_form() -> FormDefinition {
    form(
        ServiceType::BirthCertificate,
        vec![
            FormStep::new(
                "child",
                "Child Details",
                &["child_name", "birth_date", "gender", "place_of_birth"],
            ),
            FormStep::new("hospital", "Hospital Details", &["hospital_name"])
                .skip_when("place_of_birth", "home"),
            FormStep::new(
                "parents",
                "Parent Details",
                &["father_name", "mother_name", "father_aadhaar", "mother_aadhaar"],
            ),
        ],
        &[
            ("child_name", req(T::Name)),
            ("birth_date", req(T::Date)),
            ("gender", req(T::Text)),
            ("place_of_birth", req(T::Text)),
            ("hospital_name", req(T::Text)),
            ("father_name", req(T::Name)),
            ("mother_name", req(T::Name)),
            ("father_aadhaar", opt(T::Aadhaar)),
            ("mother_aadhaar", opt(T::Aadhaar)),
        ],
    )
}

fn death_certificate_form() -> FormDefinition {
    form(
        ServiceType::DeathCertificate,
        vec![
            FormStep::new(
                "deceased",
                "Deceased Details",
                &["deceased_name", "birth_date", "death_date", "gender", "place_of_death"],
            ),
            FormStep::new(
                "informant",
                "Informant Details",
                &["informant_name", "relationship", "informant_aadhaar"],
            ),
        ],
        &[
            ("deceased_name", req(T::Name)),
            ("birth_date", opt(T::Date)),
            ("death_date", req(T::Date)),
            ("gender", req(T::Text)),
            ("place_of_death", req(T::Text)),
            ("informant_name", req(T::Name)),
            ("relationship", req(T::Text)),
            ("informant_aadhaar", req(T::Aadhaar)),
        ],
    )
}

fn marriage_certificate_form() -> FormDefinition {
    form(
        ServiceType::MarriageCertificate,
        vec![
            FormStep::new(
                "groom",
                "Groom Details",
                &["groom_name", "groom_birth_date", "groom_aadhaar"],
            ),
            FormStep::new(
                "bride",
                "Bride Details",
                &["bride_name", "bride_birth_date", "bride_aadhaar"],
            ),
            FormStep::new("marriage", "Marriage Details", &["marriage_date", "marriage_place"]),
        ],
        &[
            ("groom_name", req(T::Name)),
            ("groom_birth_date", req(T::Date)),
            ("groom_aadhaar", req(T::Aadhaar)),
            ("bride_name", req(T::Name)),
            ("bride_birth_date", req(T::Date)),
            ("bride_aadhaar", req(T::Aadhaar)),
            ("marriage_date", req(T::Date)),
            ("marriage_place", req(T::Text)),
        ],
    )
}

fn bpl_certificate_form() -> FormDefinition {
    form(
        ServiceType::BplCertificate,
        vec![
            FormStep::new(
                "household",
                "Household Head",
                &["head_name", "head_aadhaar", "ration_card_number"],
            ),
            FormStep::new(
                "family",
                "Family Members & Income",
                &["family_members", "annual_income"],
            ),
        ],
        &[
            ("head_name", req(T::Name)),
            ("head_aadhaar", req(T::Aadhaar)),
            ("ration_card_number", opt(T::Text)),
            ("family_members", req(T::Text)),
            ("annual_income", req(T::Amount)),
        ],
    )
}

fn income_certificate_form() -> FormDefinition {
    form(
        ServiceType::IncomeCertificate,
        vec![
            FormStep::new(
                "applicant",
                "Applicant Details",
                &["applicant_name", "birth_date", "aadhaar", "pan"],
            ),
            FormStep::new(
                "income",
                "Income Details",
                &["occupation", "annual_income", "purpose"],
            ),
        ],
        &[
            ("applicant_name", req(T::Name)),
            ("birth_date", req(T::Date)),
            ("aadhaar", req(T::Aadhaar)),
            ("pan", opt(T::Pan)),
            ("occupation", req(T::Text)),
            ("annual_income", req(T::Amount)),
            ("purpose", req(T::Text)),
        ],
    )
}

fn agriculture_subsidy_form() -> FormDefinition {
    form(
        ServiceType::AgricultureSubsidy,
        vec![
            FormStep::new("farmer", "Farmer Details", &["applicant_name", "aadhaar"]),
            FormStep::new(
                "land",
                "Land Details",
                &["land_ownership", "survey_number", "land_area_acres"],
            ),
            FormStep::new("lease", "Lease Details", &["lessor_name", "lease_years"])
                .skip_when("land_ownership", "own"),
            FormStep::new(
                "bank",
                "Bank Details",
                &["account_holder_name", "bank_account", "ifsc_code", "subsidy_amount"],
            ),
        ],
        &[
            ("applicant_name", req(T::Name)),
            ("aadhaar", req(T::Aadhaar)),
            ("land_ownership", req(T::Text)),
            ("survey_number", req(T::Text)),
            ("land_area_acres", req(T::Number)),
            ("lessor_name", req(T::Name)),
            ("lease_years", req(T::Number)),
            ("account_holder_name", req(T::Name)),
            ("bank_account", req(T::BankAccount)),
            ("ifsc_code", req(T::IfscCode)),
            ("subsidy_amount", req(T::Amount)),
        ],
    )
}

fn building_permit_form() -> FormDefinition {
    form(
        ServiceType::BuildingPermit,
        vec![
            FormStep::new("owner", "Owner Details", &["applicant_name", "aadhaar", "pan"]),
            FormStep::new(
                "plot",
                "Plot & Construction",
                &["survey_number", "plot_area_sqft", "construction_type", "estimated_cost"],
            ),
        ],
        &[
            ("applicant_name", req(T::Name)),
            ("aadhaar", req(T::Aadhaar)),
            ("pan", opt(T::Pan)),
            ("survey_number", req(T::Text)),
            ("plot_area_sqft", req(T::Number)),
            ("construction_type", req(T::Text)),
            ("estimated_cost", req(T::Amount)),
        ],
    )
}

// ---------------------------------------------------------------------------
// Document requirements
// ---------------------------------------------------------------------------

/// A supporting document the applicant must (or may) upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRequirement {
    pub category: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Every document category any service may ask for.
pub const DOCUMENT_CATEGORIES: &[&str] = &[
    "identity_proof",
    "birth_declaration",
    "hospital_record",
    "parent_id_proof",
    "medical_certificate",
    "age_proof",
    "marriage_photo",
    "witness_id",
    "income_proof",
    "ration_card",
    "land_record",
    "lease_agreement",
    "bank_passbook",
    "site_plan",
    "ownership_proof",
];

pub fn is_document_category(category: &str) -> bool {
    DOCUMENT_CATEGORIES.contains(&category)
}

const fn doc(category: &'static str, label: &'static str, required: bool) -> DocumentRequirement {
    DocumentRequirement {
        category,
        label,
        required,
    }
}

fn field_is(record: &FormRecord, field: &str, expected: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
}

/// Documents needed for `service` given the answers entered so far.
pub fn required_documents(service: ServiceType, record: &FormRecord) -> Vec<DocumentRequirement> {
    let mut docs = vec![doc("identity_proof", "Applicant identity proof (Aadhaar)", true)];
    match service {
        ServiceType::BirthCertificate => {
            if field_is(record, "place_of_birth", "home") {
                docs.push(doc("birth_declaration", "Declaration of home birth", true));
            } else {
                docs.push(doc("hospital_record", "Hospital discharge summary", true));
            }
            docs.push(doc("parent_id_proof", "Parents' identity proof", true));
        }
        ServiceType::DeathCertificate => {
            docs.push(doc("medical_certificate", "Medical certificate of cause of death", false));
            if field_is(record, "place_of_death", "hospital") {
                docs.push(doc("hospital_record", "Hospital death record", true));
            }
        }
        ServiceType::MarriageCertificate => {
            docs.push(doc("age_proof", "Age proof of groom and bride", true));
            docs.push(doc("marriage_photo", "Marriage photograph", true));
            docs.push(doc("witness_id", "Witness identity proof", true));
        }
        ServiceType::BplCertificate => {
            docs.push(doc("income_proof", "Income proof", true));
            docs.push(doc("ration_card", "Ration card", false));
        }
        ServiceType::IncomeCertificate => {
            docs.push(doc("income_proof", "Salary slip or income declaration", true));
        }
        ServiceType::AgricultureSubsidy => {
            docs.push(doc("land_record", "Land record (RTC extract)", true));
            if field_is(record, "land_ownership", "leased") {
                docs.push(doc("lease_agreement", "Registered lease agreement", true));
            }
            docs.push(doc("bank_passbook", "Bank passbook front page", true));
        }
        ServiceType::BuildingPermit => {
            docs.push(doc("site_plan", "Approved site plan", true));
            docs.push(doc("ownership_proof", "Plot ownership proof", true));
        }
    }
    docs
}

// ---------------------------------------------------------------------------
// Submission pipeline
// ---------------------------------------------------------------------------

/// A record ready to be persisted, with its validation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSubmission {
    pub record: FormRecord,
    pub result: ValidationResult,
}

fn record_date(record: &FormRecord, field: &str) -> Option<NaiveDate> {
    record.get(field).and_then(Value::as_str).and_then(parse_date)
}

/// Insert `age` / `<prefix>_age` for every parseable `*birth_date` field.
///
/// The age is taken at the matching `*death_date` when one is recorded,
/// otherwise at `today`.
pub fn derive_ages(record: &mut FormRecord, today: NaiveDate) {
    let derived: Vec<(String, u32)> = record
        .keys()
        .filter_map(|field| {
            let prefix = field.strip_suffix("birth_date")?;
            let as_of = record_date(record, &format!("{prefix}death_date")).unwrap_or(today);
            let age = calculate_age(record_date(record, field), as_of)?;
            Some((format!("{prefix}age"), age))
        })
        .collect();
    for (field, age) in derived {
        record.insert(field, Value::from(age));
    }
}

fn cross_field_errors(
    service: ServiceType,
    form: &FormDefinition,
    record: &FormRecord,
    today: NaiveDate,
) -> std::collections::BTreeMap<String, String> {
    let dated: Vec<(&str, Option<NaiveDate>)> = form
        .rules
        .iter()
        .filter(|(_, rule)| rule.field_type == FieldType::Date)
        .map(|(field, _)| (field.as_str(), record_date(record, field)))
        .collect();
    let mut errors = validate_not_future(&dated, today);

    errors.extend(validate_date_consistency(
        record_date(record, "birth_date"),
        record_date(record, "death_date"),
        record_date(record, "marriage_date"),
    ));

    if service == ServiceType::MarriageCertificate {
        errors.extend(validate_marriage_ages(
            record_date(record, "groom_birth_date"),
            record_date(record, "bride_birth_date"),
            record_date(record, "marriage_date"),
        ));
    }
    errors
}

/// Auto-correct, strip hidden-step answers, validate and derive ages.
///
/// Only fields on visible steps are validated and kept; cross-field date
/// errors are merged in for fields that passed their own rule.
pub fn prepare_submission(
    service: ServiceType,
    record: &FormRecord,
    today: NaiveDate,
) -> PreparedSubmission {
    let form = service.form();
    let corrected = auto_correct_record(record, &form.rules);

    let visible = visible_fields(&form.steps, &corrected);
    let hidden: Vec<&str> = form
        .steps
        .iter()
        .flat_map(|s| s.fields.iter().map(String::as_str))
        .filter(|f| !visible.contains(f))
        .collect();
    let mut record: FormRecord = corrected
        .into_iter()
        .filter(|(field, _)| !hidden.contains(&field.as_str()))
        .collect();

    let mut result = validate_fields(&record, &form.rules, &visible);
    result.merge(cross_field_errors(service, &form, &record, today));

    derive_ages(&mut record, today);

    PreparedSubmission { record, result }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
