//! Request signing for the MEXC spot API
//!
//! The exchange recomputes the HMAC over the query string it receives, so the
//! string signed here must be byte-for-byte the string that is transmitted.

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

use crate::common::errors::SignatureError;
use crate::common::types::{format_decimal, OrderRequest};

type HmacSha256 = Hmac<Sha256>;

/// Build the canonical parameter string: sorted by key, `key=value` joined with `&`
///
/// The sort is stable, so repeated keys keep their relative order.
pub fn canonical_query<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut sorted: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the lower-case hex HMAC-SHA256 of a payload
pub fn hmac_hex(secret: &str, payload: &str) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Sign a parameter set: HMAC-SHA256 of its canonical string
pub fn sign<K, V>(params: &[(K, V)], secret: &str) -> Result<String, SignatureError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    hmac_hex(secret, &canonical_query(params))
}

/// A canonical query string together with its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub canonical: String,
    pub signature: String,
}

impl SignedRequest {
    /// Canonicalize and sign a parameter set
    pub fn new<K, V>(params: &[(K, V)], secret: &str) -> Result<Self, SignatureError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let canonical = canonical_query(params);
        let signature = hmac_hex(secret, &canonical)?;
        Ok(Self {
            canonical,
            signature,
        })
    }

    /// Query string to transmit: the signed string with the signature appended
    pub fn query_string(&self) -> String {
        format!("{}&signature={}", self.canonical, self.signature)
    }
}

/// Parameters of a new-order request, with decimals rendered exactly as sent
///
/// Refuses requests that break the order invariants.
pub fn order_params(order: &OrderRequest) -> Result<Vec<(&'static str, String)>, SignatureError> {
    if order.quantity <= Decimal::ZERO {
        return Err(SignatureError::InvalidRequest(format!(
            "quantity must be positive, got {}",
            order.quantity
        )));
    }
    if order.price <= Decimal::ZERO {
        return Err(SignatureError::InvalidRequest(format!(
            "limit price must be positive, got {}",
            order.price
        )));
    }
    if order.symbol.is_empty() {
        return Err(SignatureError::InvalidRequest("symbol is empty".to_string()));
    }

    Ok(vec![
        ("symbol", order.symbol.clone()),
        ("side", order.side.as_str().to_string()),
        ("type", order.order_type.as_str().to_string()),
        ("timeInForce", order.time_in_force.as_str().to_string()),
        ("quantity", format_decimal(order.quantity)),
        ("price", format_decimal(order.price)),
        ("timestamp", order.timestamp.to_string()),
        ("recvWindow", order.recv_window.to_string()),
    ])
}

/// Parameters of an order-status query
pub fn query_params(
    symbol: &str,
    order_id: &str,
    timestamp: i64,
    recv_window: u64,
) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("orderId", order_id.to_string()),
        ("timestamp", timestamp.to_string()),
        ("recvWindow", recv_window.to_string()),
    ]
}
