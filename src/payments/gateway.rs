use axum::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::PayPalConfig;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment provider request failed: {0}")]
    Http(String),
    #[error("payment provider returned HTTP {0}")]
    Status(u16),
    #[error("payment provider response could not be parsed: {0}")]
    Malformed(String),
    #[error("payment provider response missing approval link or order id")]
    MissingApproval,
    #[error("order was not captured by the provider (status {status})")]
    NotCaptured { status: String },
}

/// A freshly created gateway order, ready for client-side redirect.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub order_id: String,
    pub approval_url: String,
}

/// The provider's view of an order after capture.
#[derive(Debug, Clone)]
pub struct CapturedOrder {
    pub order_id: String,
    pub status: String,
    pub amount: i64,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order for immediate capture and returns the approval
    /// link the buyer must be redirected to. The external order cannot be
    /// cancelled from here if the surrounding flow later fails.
    async fn create_order(
        &self,
        amount: i64,
        return_url: &str,
    ) -> Result<GatewayOrder, GatewayError>;

    /// Captures a previously approved order and reports the authoritative
    /// captured amount and status.
    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder, GatewayError>;
}

#[derive(Clone)]
pub struct PayPalGateway {
    http: reqwest::Client,
    client_id: String,
    secret: String,
    api_base: String,
}

impl PayPalGateway {
    pub fn new(cfg: &PayPalConfig) -> Result<Self, GatewayError> {
        // Hard timeout so a hung provider call fails the request instead
        // of hanging it.
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(Self {
            http,
            client_id: cfg.client_id.clone(),
            secret: cfg.secret.clone(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json(&self, url: String, body: Option<Value>) -> Result<Value, GatewayError> {
        let mut req = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.json(&body);
        } else {
            req = req.body("{}");
        }
        let res = req
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        res.json::<Value>()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    async fn create_order(
        &self,
        amount: i64,
        return_url: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [
                {
                    "amount": {
                        "currency_code": "USD",
                        "value": amount.to_string(),
                    }
                }
            ],
            "application_context": {
                "return_url": return_url,
                "cancel_url": return_url,
            }
        });

        let raw = self
            .post_json(format!("{}/v2/checkout/orders", self.api_base), Some(body))
            .await?;
        let order = extract_order(&raw)?;
        debug!(order_id = %order.order_id, "paypal order created");
        Ok(order)
    }

    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder, GatewayError> {
        let raw = self
            .post_json(
                format!("{}/v2/checkout/orders/{}/capture", self.api_base, order_id),
                None,
            )
            .await?;
        let captured = extract_capture(&raw)?;
        debug!(order_id = %captured.order_id, status = %captured.status, "paypal order captured");
        Ok(captured)
    }
}

#[derive(Debug, Deserialize)]
struct OrderLink {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: Option<String>,
    #[serde(default)]
    links: Vec<OrderLink>,
}

#[derive(Debug, Deserialize)]
struct Money {
    value: String,
}

#[derive(Debug, Deserialize)]
struct Capture {
    amount: Money,
}

#[derive(Debug, Deserialize)]
struct CapturePayments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct CaptureUnit {
    payments: Option<CapturePayments>,
}

#[derive(Debug, Deserialize)]
struct CaptureOrderResponse {
    id: Option<String>,
    status: Option<String>,
    #[serde(default)]
    purchase_units: Vec<CaptureUnit>,
}

fn extract_order(raw: &Value) -> Result<GatewayOrder, GatewayError> {
    let parsed: CreateOrderResponse =
        serde_json::from_value(raw.clone()).map_err(|e| GatewayError::Malformed(e.to_string()))?;

    let order_id = parsed
        .id
        .filter(|id| !id.is_empty())
        .ok_or(GatewayError::MissingApproval)?;
    let approval_url = parsed
        .links
        .into_iter()
        .find(|l| l.rel == "approve")
        .map(|l| l.href)
        .ok_or(GatewayError::MissingApproval)?;

    Ok(GatewayOrder {
        order_id,
        approval_url,
    })
}

fn extract_capture(raw: &Value) -> Result<CapturedOrder, GatewayError> {
    let parsed: CaptureOrderResponse =
        serde_json::from_value(raw.clone()).map_err(|e| GatewayError::Malformed(e.to_string()))?;

    let order_id = parsed
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GatewayError::Malformed("capture response missing order id".into()))?;
    let status = parsed.status.unwrap_or_default();

    let amount = parsed
        .purchase_units
        .into_iter()
        .filter_map(|u| u.payments)
        .flat_map(|p| p.captures)
        .next()
        .and_then(|c| whole_units(&c.amount.value))
        .ok_or_else(|| GatewayError::Malformed("capture response missing captured amount".into()))?;

    Ok(CapturedOrder {
        order_id,
        status,
        amount,
    })
}

/// Truncates a provider money string ("100.00") to whole currency units,
/// matching the integer comparison the rest of the flow uses.
pub(crate) fn whole_units(value: &str) -> Option<i64> {
    value.trim().split('.').next()?.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whole_units_truncates_decimals() {
        assert_eq!(whole_units("100.00"), Some(100));
        assert_eq!(whole_units("99"), Some(99));
        assert_eq!(whole_units(" 42.50 "), Some(42));
        assert_eq!(whole_units("abc"), None);
        assert_eq!(whole_units(""), None);
    }

    #[test]
    fn extract_order_finds_approve_link() {
        let raw = json!({
            "id": "5O190127TN364715T",
            "status": "CREATED",
            "links": [
                { "rel": "self", "href": "https://api.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T", "method": "GET" },
                { "rel": "approve", "href": "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T", "method": "GET" }
            ]
        });
        let order = extract_order(&raw).expect("order should parse");
        assert_eq!(order.order_id, "5O190127TN364715T");
        assert!(order.approval_url.contains("checkoutnow"));
    }

    #[test]
    fn extract_order_rejects_missing_approve_link() {
        let raw = json!({
            "id": "5O190127TN364715T",
            "links": [{ "rel": "self", "href": "https://example.com", "method": "GET" }]
        });
        assert!(matches!(
            extract_order(&raw),
            Err(GatewayError::MissingApproval)
        ));
    }

    #[test]
    fn extract_order_rejects_missing_id() {
        let raw = json!({
            "links": [{ "rel": "approve", "href": "https://example.com", "method": "GET" }]
        });
        assert!(matches!(
            extract_order(&raw),
            Err(GatewayError::MissingApproval)
        ));
    }

    #[test]
    fn extract_capture_reads_status_and_amount() {
        let raw = json!({
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "purchase_units": [
                {
                    "payments": {
                        "captures": [
                            { "amount": { "currency_code": "USD", "value": "150.00" } }
                        ]
                    }
                }
            ]
        });
        let captured = extract_capture(&raw).expect("capture should parse");
        assert_eq!(captured.status, "COMPLETED");
        assert_eq!(captured.amount, 150);
    }

    #[test]
    fn extract_capture_rejects_missing_amount() {
        let raw = json!({ "id": "X", "status": "COMPLETED", "purchase_units": [] });
        assert!(matches!(
            extract_capture(&raw),
            Err(GatewayError::Malformed(_))
        ));
    }
}
