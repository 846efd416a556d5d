use crate::dom::FormFields;
use crate::numeric::{parse_float, parse_int};
use churn_protocol::{
    PredictionRequest, AGE, BALANCE, CREDIT_SCORE, ESTIMATED_SALARY, GENDER, GEOGRAPHY,
    HAS_CR_CARD, IS_ACTIVE_MEMBER, NUM_OF_PRODUCTS, TENURE,
};

/// Reads the ten churn inputs and coerces them. Nothing is validated; text
/// that does not read as a number becomes NaN and is sent anyway.
pub fn build_request(fields: &dyn FormFields) -> PredictionRequest {
    let int = |id: &str| fields.field_value(id).as_deref().and_then(parse_int);
    let float = |id: &str| fields.field_value(id).as_deref().and_then(parse_float);
    PredictionRequest {
        credit_score: int(CREDIT_SCORE),
        geography: fields.field_value(GEOGRAPHY),
        gender: fields.field_value(GENDER),
        age: int(AGE),
        tenure: int(TENURE),
        balance: float(BALANCE),
        num_of_products: int(NUM_OF_PRODUCTS),
        has_cr_card: int(HAS_CR_CARD),
        is_active_member: int(IS_ACTIVE_MEMBER),
        estimated_salary: float(ESTIMATED_SALARY),
    }
}
