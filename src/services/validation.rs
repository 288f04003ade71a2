//! Sign-up validation pipeline.
//!
//! A submission first has to clear the transport, syntax and schema checks in
//! [`decode_submission`]. The decoded request then runs through an ordered list
//! of [`Validator`]s that stops at the first failure. Store-backed checks sit
//! at the end of the list so malformed input never reaches the database.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::config::{
    Config, MAX_CUSTOMER_NAME_LENGTH, MAX_EMAIL_LENGTH, MAX_PLAN_NAME_LENGTH, SIGN_UP_ATTRIBUTES,
};
use crate::domain::SignUpRequest;
use crate::errors::{AppError, AppResult};
use crate::infra::{BlacklistRepository, CustomerRepository};

const JSON_ESSENCE: &str = "application/json";

/// Raw sign-up submission as received from the transport.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Submission {
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: Some(JSON_ESSENCE.to_string()),
            body: body.into(),
        }
    }
}

/// Transport, syntax and schema checks.
///
/// The content type is checked before the body is looked at.
pub fn decode_submission(submission: &Submission) -> AppResult<SignUpRequest> {
    check_content_type(submission.content_type.as_deref())?;

    let value: Value = serde_json::from_slice(&submission.body)
        .map_err(|_| AppError::validation("Invalid Json Format"))?;

    let Value::Object(fields) = value else {
        return Err(AppError::validation(
            "Invalid Schema. Payload must be a JSON object.",
        ));
    };

    check_attributes(&fields)?;

    Ok(SignUpRequest {
        customer_name: text_field(&fields, "customer_name")?,
        email_address: text_field(&fields, "email_address")?,
        insurance_plan_name: text_field(&fields, "insurance_plan_name")?,
        insured_amount: integral_field(&fields, "insured_amount")?,
    })
}

fn check_content_type(content_type: Option<&str>) -> AppResult<()> {
    let accepted = content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .is_some_and(|mime| mime.essence_str().eq_ignore_ascii_case(JSON_ESSENCE));

    if accepted {
        return Ok(());
    }

    Err(AppError::validation(format!(
        "content-type {} is not supported. Expected content type is '{}'",
        content_type.unwrap_or("none"),
        JSON_ESSENCE
    )))
}

fn check_attributes(fields: &Map<String, Value>) -> AppResult<()> {
    if let Some(missing) = SIGN_UP_ATTRIBUTES.iter().find(|a| !fields.contains_key(**a)) {
        return Err(AppError::validation(format!(
            "Invalid Schema. '{}' is a required attribute.",
            missing
        )));
    }

    if let Some(extra) = fields
        .keys()
        .find(|k| !SIGN_UP_ATTRIBUTES.contains(&k.as_str()))
    {
        return Err(AppError::validation(format!(
            "Invalid Schema. Attribute '{}' is not expected.",
            extra
        )));
    }

    Ok(())
}

fn type_error(attribute: &str, expected: &str) -> AppError {
    AppError::validation(format!(
        "Invalid Schema. Data type of attribute '{}' should be {}.",
        attribute, expected
    ))
}

fn text_field(fields: &Map<String, Value>, attribute: &str) -> AppResult<String> {
    match fields.get(attribute) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(type_error(attribute, "string")),
    }
}

fn integral_field(fields: &Map<String, Value>, attribute: &str) -> AppResult<i64> {
    match fields.get(attribute) {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
            // Values past i64 are clamped and then fail the ceiling check
            Ok(n.as_i64().unwrap_or(i64::MAX))
        }
        // Integer literals past u64 arrive as whole floats
        Some(Value::Number(n)) if n.as_f64().is_some_and(is_oversized_whole) => {
            Ok(if n.as_f64().is_some_and(|f| f < 0.0) { i64::MIN } else { i64::MAX })
        }
        _ => Err(type_error(attribute, "integer")),
    }
}

fn is_oversized_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() >= i64::MAX as f64
}

/// One stage of the business-rule pipeline.
///
/// A stage may normalize the request in place (e.g. the email address).
#[async_trait]
pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()>;
}

pub struct NameRule {
    max_spaces: usize,
}

impl NameRule {
    pub fn new(max_spaces: usize) -> Self {
        Self { max_spaces }
    }
}

#[async_trait]
impl Validator for NameRule {
    fn name(&self) -> &'static str {
        "customer_name"
    }

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()> {
        let name = &request.customer_name;
        let invalid = |msg: String| {
            AppError::validation(format!(
                "Invalid Data in 'customer_name' attribute. {}",
                msg
            ))
        };

        // Tabs and newlines separate name parts as well
        let spaces = name.chars().filter(|c| c.is_whitespace()).count();
        if spaces > self.max_spaces {
            return Err(invalid(format!(
                "'{}' Spaces found. Max '{}' spaces are allowed.",
                spaces, self.max_spaces
            )));
        }

        if name.trim().is_empty() {
            return Err(invalid("Customer Name must not be empty.".to_string()));
        }

        let length = name.chars().count();
        if length > MAX_CUSTOMER_NAME_LENGTH {
            return Err(invalid(format!(
                "Customer Name too long with '{}' characters. Max '{}' characters are allowed.",
                length, MAX_CUSTOMER_NAME_LENGTH
            )));
        }

        Ok(())
    }
}

pub struct PlanNameRule;

#[async_trait]
impl Validator for PlanNameRule {
    fn name(&self) -> &'static str {
        "insurance_plan_name"
    }

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()> {
        let plan = &request.insurance_plan_name;

        if plan.trim().is_empty() {
            return Err(AppError::validation(
                "Invalid Data. Insurance Plan Name must not be empty.",
            ));
        }

        if plan.chars().count() > MAX_PLAN_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Invalid Data. Max length should be '{}'.",
                MAX_PLAN_NAME_LENGTH
            )));
        }

        Ok(())
    }
}

pub struct InsuredAmountRule {
    ceiling: i64,
}

impl InsuredAmountRule {
    pub fn new(ceiling: i64) -> Self {
        Self { ceiling }
    }
}

#[async_trait]
impl Validator for InsuredAmountRule {
    fn name(&self) -> &'static str {
        "insured_amount"
    }

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()> {
        if request.insured_amount < 0 {
            return Err(AppError::validation(
                "Invalid Data. Insured amount must not be negative.",
            ));
        }

        if request.insured_amount > self.ceiling {
            return Err(AppError::validation(format!(
                "Invalid Data. Max value should be '{}'.",
                self.ceiling
            )));
        }

        Ok(())
    }
}

/// Currency-specific amount check. Accepts every amount for now.
pub struct CurrencyRule;

#[async_trait]
impl Validator for CurrencyRule {
    fn name(&self) -> &'static str {
        "insured_amount_currency"
    }

    async fn validate(&self, _request: &mut SignUpRequest) -> AppResult<()> {
        Ok(())
    }
}

/// Syntax check and normalization of the email address.
pub struct EmailRule;

impl EmailRule {
    /// Trim surrounding whitespace and lower-case the domain part.
    pub fn normalize(email: &str) -> String {
        let email = email.trim();
        match email.rsplit_once('@') {
            Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
            None => email.to_string(),
        }
    }
}

#[async_trait]
impl Validator for EmailRule {
    fn name(&self) -> &'static str {
        "email_address"
    }

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()> {
        let normalized = Self::normalize(&request.email_address);

        let length = normalized.chars().count();
        if length > MAX_EMAIL_LENGTH {
            return Err(AppError::validation(format!(
                "Invalid Email Address. Email too long with '{}' characters. Max '{}' characters are allowed.",
                length, MAX_EMAIL_LENGTH
            )));
        }

        if !normalized.validate_email() {
            return Err(AppError::validation(
                "Invalid Email Address. The email address is not valid.",
            ));
        }

        request.email_address = normalized;
        Ok(())
    }
}

pub struct BlacklistCheck {
    blacklist: Arc<dyn BlacklistRepository>,
}

impl BlacklistCheck {
    pub fn new(blacklist: Arc<dyn BlacklistRepository>) -> Self {
        Self { blacklist }
    }
}

#[async_trait]
impl Validator for BlacklistCheck {
    fn name(&self) -> &'static str {
        "blacklist"
    }

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()> {
        if self
            .blacklist
            .find_by_email(&request.email_address)
            .await?
            .is_some()
        {
            tracing::info!(email = %request.email_address, "Blacklisted email rejected");
            return Err(AppError::Blacklisted);
        }
        Ok(())
    }
}

pub struct DuplicateCheck {
    customers: Arc<dyn CustomerRepository>,
}

impl DuplicateCheck {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl Validator for DuplicateCheck {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    async fn validate(&self, request: &mut SignUpRequest) -> AppResult<()> {
        if self
            .customers
            .find_by_email(&request.email_address)
            .await?
            .is_some()
        {
            tracing::info!(email = %request.email_address, "Email is already registered");
            return Err(AppError::AlreadyRegistered(request.email_address.clone()));
        }
        Ok(())
    }
}

/// Ordered, short-circuiting list of validators.
#[derive(Clone)]
pub struct ValidationPipeline {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidationPipeline {
    pub fn new(validators: Vec<Arc<dyn Validator>>) -> Self {
        Self { validators }
    }

    /// Field rules, then email format, then blacklist, then duplicates.
    pub fn standard(
        config: &Config,
        customers: Arc<dyn CustomerRepository>,
        blacklist: Arc<dyn BlacklistRepository>,
    ) -> Self {
        Self::new(vec![
            Arc::new(NameRule::new(config.max_name_spaces)),
            Arc::new(PlanNameRule),
            Arc::new(InsuredAmountRule::new(config.max_insured_amount)),
            Arc::new(CurrencyRule),
            Arc::new(EmailRule),
            Arc::new(BlacklistCheck::new(blacklist)),
            Arc::new(DuplicateCheck::new(customers)),
        ])
    }

    /// Run every validator in order, returning the normalized request.
    pub async fn run(&self, mut request: SignUpRequest) -> AppResult<SignUpRequest> {
        for validator in &self.validators {
            if let Err(e) = validator.validate(&mut request).await {
                tracing::debug!(validator = validator.name(), error = %e, "Validation failed");
                return Err(e);
            }
        }
        Ok(request)
    }

    /// Decode a raw submission and run the pipeline on it.
    pub async fn accept(&self, submission: &Submission) -> AppResult<SignUpRequest> {
        let request = decode_submission(submission)?;
        self.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlacklistEntry, Customer};
    use crate::infra::{MockBlacklistRepository, MockCustomerRepository};

    fn jane() -> &'static str {
        r#"{"customer_name": "Jane Doe", "email_address": "jane@example.com",
            "insurance_plan_name": "Family", "insured_amount": 300000}"#
    }

    fn request() -> SignUpRequest {
        SignUpRequest {
            customer_name: "Jane Doe".into(),
            email_address: "jane@example.com".into(),
            insurance_plan_name: "Family".into(),
            insured_amount: 300000,
        }
    }

    fn reason(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn open_pipeline() -> ValidationPipeline {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_email().returning(|_| Ok(None));
        let mut blacklist = MockBlacklistRepository::new();
        blacklist.expect_find_by_email().returning(|_| Ok(None));

        ValidationPipeline::standard(
            &Config::with_secret("x".repeat(32)),
            Arc::new(customers),
            Arc::new(blacklist),
        )
    }

    #[test]
    fn test_decodes_valid_submission() {
        let decoded = decode_submission(&Submission::json(jane())).unwrap();
        assert_eq!(decoded, request());
    }

    #[test]
    fn test_content_type_essence_is_matched() {
        for ct in ["application/json", "Application/JSON", "application/json; charset=utf-8"] {
            let submission = Submission {
                content_type: Some(ct.to_string()),
                body: jane().into(),
            };
            assert!(decode_submission(&submission).is_ok(), "{}", ct);
        }
    }

    #[test]
    fn test_wrong_content_type_rejected_before_parsing() {
        let submission = Submission {
            content_type: Some("text/html".into()),
            body: b"not json at all".to_vec(),
        };

        let msg = reason(decode_submission(&submission).unwrap_err());
        assert_eq!(
            msg,
            "content-type text/html is not supported. Expected content type is 'application/json'"
        );

        let missing = Submission {
            content_type: None,
            body: jane().into(),
        };
        assert!(reason(decode_submission(&missing).unwrap_err()).contains("content-type none"));
    }

    #[test]
    fn test_malformed_json() {
        let msg = reason(decode_submission(&Submission::json("{\"customer_name\": ")).unwrap_err());
        assert_eq!(msg, "Invalid Json Format");
    }

    #[test]
    fn test_schema_attributes() {
        let missing = r#"{"customer_name": "Jane Doe", "email_address": "jane@example.com",
            "insurance_plan_name": "Family"}"#;
        assert_eq!(
            reason(decode_submission(&Submission::json(missing)).unwrap_err()),
            "Invalid Schema. 'insured_amount' is a required attribute."
        );

        let extra = r#"{"customer_name": "Jane Doe", "email_address": "jane@example.com",
            "insurance_plan_name": "Family", "insured_amount": 1, "age": 30}"#;
        assert_eq!(
            reason(decode_submission(&Submission::json(extra)).unwrap_err()),
            "Invalid Schema. Attribute 'age' is not expected."
        );

        assert!(decode_submission(&Submission::json("[1, 2]")).is_err());
    }

    #[test]
    fn test_schema_types() {
        let float = r#"{"customer_name": "Jane Doe", "email_address": "jane@example.com",
            "insurance_plan_name": "Family", "insured_amount": 3000.5}"#;
        assert_eq!(
            reason(decode_submission(&Submission::json(float)).unwrap_err()),
            "Invalid Schema. Data type of attribute 'insured_amount' should be integer."
        );

        let number_name = r#"{"customer_name": 42, "email_address": "jane@example.com",
            "insurance_plan_name": "Family", "insured_amount": 1}"#;
        assert!(reason(decode_submission(&Submission::json(number_name)).unwrap_err())
            .contains("'customer_name' should be string"));
    }

    #[tokio::test]
    async fn test_name_rule() {
        let rule = NameRule::new(2);

        let mut ok = request();
        ok.customer_name = "Jane Mary Doe".into();
        assert!(rule.validate(&mut ok).await.is_ok());

        let mut spaced = request();
        spaced.customer_name = "Jane Mary Ann Doe".into();
        assert_eq!(
            reason(rule.validate(&mut spaced).await.unwrap_err()),
            "Invalid Data in 'customer_name' attribute. '3' Spaces found. Max '2' spaces are allowed."
        );

        let mut tabbed = request();
        tabbed.customer_name = "Jane\tMary\nAnn Doe".into();
        assert_eq!(
            reason(rule.validate(&mut tabbed).await.unwrap_err()),
            "Invalid Data in 'customer_name' attribute. '3' Spaces found. Max '2' spaces are allowed."
        );

        let mut empty = request();
        empty.customer_name = String::new();
        assert!(rule.validate(&mut empty).await.is_err());

        let mut long = request();
        long.customer_name = "J".repeat(51);
        assert!(reason(rule.validate(&mut long).await.unwrap_err()).contains("'51' characters"));
    }

    #[tokio::test]
    async fn test_plan_and_amount_rules() {
        let mut long_plan = request();
        long_plan.insurance_plan_name = "p".repeat(201);
        assert_eq!(
            reason(PlanNameRule.validate(&mut long_plan).await.unwrap_err()),
            "Invalid Data. Max length should be '200'."
        );

        let amount = InsuredAmountRule::new(5_000_000);

        let mut at_ceiling = request();
        at_ceiling.insured_amount = 5_000_000;
        assert!(amount.validate(&mut at_ceiling).await.is_ok());

        let mut zero = request();
        zero.insured_amount = 0;
        assert!(amount.validate(&mut zero).await.is_ok());

        let mut over = request();
        over.insured_amount = 5_000_001;
        assert_eq!(
            reason(amount.validate(&mut over).await.unwrap_err()),
            "Invalid Data. Max value should be '5000000'."
        );

        let mut negative = request();
        negative.insured_amount = -1;
        assert!(amount.validate(&mut negative).await.is_err());
    }

    #[tokio::test]
    async fn test_email_rule_normalizes() {
        let mut req = request();
        req.email_address = "  Jane.Doe@Example.COM ".into();

        EmailRule.validate(&mut req).await.unwrap();
        assert_eq!(req.email_address, "Jane.Doe@example.com");
    }

    #[tokio::test]
    async fn test_email_rule_rejects() {
        let mut invalid = request();
        invalid.email_address = "jane.example.com".into();
        assert!(reason(EmailRule.validate(&mut invalid).await.unwrap_err())
            .starts_with("Invalid Email Address."));

        let mut long = request();
        long.email_address = format!("{}@example.com", "j".repeat(40));
        assert!(reason(EmailRule.validate(&mut long).await.unwrap_err()).contains("too long"));
    }

    #[tokio::test]
    async fn test_amount_past_u64_hits_ceiling() {
        let huge = jane().replace("300000", "99999999999999999999");
        let err = open_pipeline().accept(&Submission::json(huge)).await.unwrap_err();
        assert_eq!(reason(err), "Invalid Data. Max value should be '5000000'.");

        let below = jane().replace("300000", "-99999999999999999999");
        let err = open_pipeline().accept(&Submission::json(below)).await.unwrap_err();
        assert!(reason(err).contains("must not be negative"));
    }

    #[tokio::test]
    async fn test_pipeline_accepts_and_normalizes() {
        let mut submission = Submission::json(jane());
        submission.body = jane().replace("jane@example.com", "jane@EXAMPLE.com").into_bytes();

        let accepted = open_pipeline().accept(&submission).await.unwrap();
        assert_eq!(accepted.email_address, "jane@example.com");
    }

    #[tokio::test]
    async fn test_blacklist_checked_with_normalized_email() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_email().never();

        let mut blacklist = MockBlacklistRepository::new();
        blacklist
            .expect_find_by_email()
            .withf(|email| email.to_string() == "jane@example.com")
            .returning(|email| {
                Ok(Some(BlacklistEntry {
                    id: uuid::Uuid::new_v4(),
                    email_address: email.to_string(),
                    reason: Some("fraud".into()),
                    created_at: chrono::Utc::now(),
                }))
            });

        let pipeline = ValidationPipeline::standard(
            &Config::with_secret("x".repeat(32)),
            Arc::new(customers),
            Arc::new(blacklist),
        );

        let mut req = request();
        req.email_address = "jane@Example.com".into();
        let err = pipeline.run(req).await.unwrap_err();
        assert!(matches!(err, AppError::Blacklisted));
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_email().returning(|email| {
            Ok(Some(Customer {
                id: uuid::Uuid::new_v4(),
                customer_name: "Jane Doe".into(),
                email_address: email.to_string(),
                password_hash: "hash".into(),
                created_at: chrono::Utc::now(),
            }))
        });
        let mut blacklist = MockBlacklistRepository::new();
        blacklist.expect_find_by_email().returning(|_| Ok(None));

        let pipeline = ValidationPipeline::standard(
            &Config::with_secret("x".repeat(32)),
            Arc::new(customers),
            Arc::new(blacklist),
        );

        let err = pipeline.run(request()).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyRegistered(email) if email == "jane@example.com"));
    }

    #[tokio::test]
    async fn test_field_rules_run_before_store_checks() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_email().never();
        let mut blacklist = MockBlacklistRepository::new();
        blacklist.expect_find_by_email().never();

        let pipeline = ValidationPipeline::standard(
            &Config::with_secret("x".repeat(32)),
            Arc::new(customers),
            Arc::new(blacklist),
        );

        let mut req = request();
        req.insured_amount = 10_000_000;
        assert!(matches!(pipeline.run(req).await, Err(AppError::Validation(_))));
    }
}
