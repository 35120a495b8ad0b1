use crate::dto::payments::normalize_payment_methods;
use crate::error::ClientResult;
use crate::models::PaymentMethod;

use super::HttpClient;

/// Payment methods the backend currently offers.
///
/// Checkout must stay usable when this endpoint is down, so any failure
/// falls back to the locally known methods instead of erroring.
pub async fn available_methods(http: &HttpClient) -> ClientResult<Vec<PaymentMethod>> {
    match http.get_value("payments/available-methods/").await {
        Ok(raw) => Ok(normalize_payment_methods(&raw)),
        Err(e) => {
            tracing::warn!(error = %e, "payment methods unavailable, using defaults");
            Ok(vec![PaymentMethod::Cash, PaymentMethod::Vnpay])
        }
    }
}
