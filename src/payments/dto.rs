use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Body of `POST /payment`. Fields are optional so missing ones surface
/// as a validation error instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    pub course_id: Option<Uuid>,
    pub amount: Option<i64>,
    pub return_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    pub approval_url: String,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
}

/// Body of `POST /payment/verify`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub user_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub amount: Option<i64>,
    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One row of the admin payment listing, with the payer and course
/// resolved to display fields.
#[derive(Debug, Serialize)]
pub struct PaymentListItem {
    pub id: Uuid,
    pub amount: i64,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: PaymentUser,
    pub course: PaymentCourse,
}

#[derive(Debug, Serialize)]
pub struct PaymentUser {
    pub username: String,
    pub contact: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentCourse {
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_request_accepts_camel_case_keys() {
        let req: VerifyPaymentRequest = serde_json::from_value(serde_json::json!({
            "userId": "6f9619ff-8b86-4d01-b42d-00cf4fc964ff",
            "courseId": "7f9619ff-8b86-4d01-b42d-00cf4fc964ff",
            "amount": 100,
            "paymentId": "PAY-1"
        }))
        .unwrap();
        assert_eq!(req.amount, Some(100));
        assert_eq!(req.payment_id.as_deref(), Some("PAY-1"));
        assert!(req.user_id.is_some());
        assert!(req.course_id.is_some());
    }

    #[test]
    fn verify_request_tolerates_missing_fields() {
        let req: VerifyPaymentRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.user_id.is_none());
        assert!(req.payment_id.is_none());
    }

    #[test]
    fn initiate_response_uses_payment_id_key() {
        let json = serde_json::to_string(&InitiatePaymentResponse {
            approval_url: "https://paypal.example/approve".into(),
            payment_id: "ORDER-1".into(),
        })
        .unwrap();
        assert!(json.contains("\"paymentId\":\"ORDER-1\""));
        assert!(json.contains("approval_url"));
    }
}
