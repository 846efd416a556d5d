use serde::{Deserialize, Serialize, Serializer};

pub mod config;

pub const FORM_ID: &str = "churn-form";
pub const PREDICT_BUTTON_ID: &str = "predict-btn";
pub const RESULT_ID: &str = "result";

pub const CREDIT_SCORE: &str = "CreditScore";
pub const GEOGRAPHY: &str = "Geography";
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const TENURE: &str = "Tenure";
pub const BALANCE: &str = "Balance";
pub const NUM_OF_PRODUCTS: &str = "NumOfProducts";
pub const HAS_CR_CARD: &str = "HasCrCard";
pub const IS_ACTIVE_MEMBER: &str = "IsActiveMember";
pub const ESTIMATED_SALARY: &str = "EstimatedSalary";

/// Input identifiers in form order. They double as the payload keys.
pub const FIELD_IDS: [&str; 10] = [
    CREDIT_SCORE,
    GEOGRAPHY,
    GENDER,
    AGE,
    TENURE,
    BALANCE,
    NUM_OF_PRODUCTS,
    HAS_CR_CARD,
    IS_ACTIVE_MEMBER,
    ESTIMATED_SALARY,
];

pub const GEOGRAPHY_CODES: [&str; 3] = ["France", "Germany", "Spain"];
pub const GENDER_CODES: [&str; 2] = ["Male", "Female"];
pub const FLAG_CODES: [&str; 2] = ["0", "1"];

/// Body of `POST /predict`.
///
/// Numeric fields are `None` when the raw input did not parse (the browser's
/// NaN). JSON has no NaN, so those go out as `null`, the same bytes a browser's
/// `JSON.stringify` produces. Non-finite floats are written as `null` too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    #[serde(rename = "CreditScore")]
    pub credit_score: Option<i64>,
    #[serde(rename = "Geography")]
    pub geography: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<i64>,
    #[serde(rename = "Tenure")]
    pub tenure: Option<i64>,
    #[serde(rename = "Balance", serialize_with = "finite_or_null")]
    pub balance: Option<f64>,
    #[serde(rename = "NumOfProducts")]
    pub num_of_products: Option<i64>,
    #[serde(rename = "HasCrCard")]
    pub has_cr_card: Option<i64>,
    #[serde(rename = "IsActiveMember")]
    pub is_active_member: Option<i64>,
    #[serde(rename = "EstimatedSalary", serialize_with = "finite_or_null")]
    pub estimated_salary: Option<f64>,
}

impl PredictionRequest {
    /// Payload keys whose value will be sent as `null`.
    pub fn null_fields(&self) -> Vec<&'static str> {
        let ints = [
            (CREDIT_SCORE, self.credit_score.is_none()),
            (AGE, self.age.is_none()),
            (TENURE, self.tenure.is_none()),
            (NUM_OF_PRODUCTS, self.num_of_products.is_none()),
            (HAS_CR_CARD, self.has_cr_card.is_none()),
            (IS_ACTIVE_MEMBER, self.is_active_member.is_none()),
        ];
        let floats = [
            (BALANCE, !is_finite(self.balance)),
            (ESTIMATED_SALARY, !is_finite(self.estimated_salary)),
        ];
        let strings = [
            (GEOGRAPHY, self.geography.is_none()),
            (GENDER, self.gender.is_none()),
        ];
        let mut fields: Vec<&'static str> = ints
            .into_iter()
            .chain(floats)
            .chain(strings)
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name)
            .collect();
        fields.sort_by_key(|name| FIELD_IDS.iter().position(|id| id == name));
        fields
    }
}

fn is_finite(value: Option<f64>) -> bool {
    value.map(f64::is_finite).unwrap_or(false)
}

fn finite_or_null<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) if value.is_finite() => serializer.serialize_f64(*value),
        _ => serializer.serialize_none(),
    }
}

/// Body returned by the prediction endpoint. Unknown keys are ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub churn_prediction: i64,
    pub churn_probability: f64,
}

impl PredictionResponse {
    pub fn is_churn(&self) -> bool {
        self.churn_prediction == 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
