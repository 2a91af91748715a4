//! MEXC REST response types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::errors::ExchangeError;
use crate::common::types::OrderStatus;

/// Response from `GET /api/v3/ticker/bookTicker`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTickerResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    pub bid_price: String,
    pub bid_qty: String,
    pub ask_price: String,
    pub ask_qty: String,
}

/// Order identifiers come back as strings, but older responses used numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderIdValue {
    Text(String),
    Number(u64),
}

impl std::fmt::Display for OrderIdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderIdValue::Text(id) => f.write_str(id),
            OrderIdValue::Number(id) => write!(f, "{}", id),
        }
    }
}

/// Response from `POST /api/v3/order`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderResponse {
    pub order_id: OrderIdValue,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub transact_time: Option<i64>,
}

/// Response from `GET /api/v3/order`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOrderResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderIdValue>,
    pub status: OrderStatus,
    #[serde(default)]
    pub executed_qty: Option<String>,
}

/// Parse a decimal string field from an exchange payload
pub fn parse_decimal(field: &str, value: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_str(value.trim())
        .map_err(|e| ExchangeError::InvalidResponse(format!("Invalid {}: {:?} ({})", field, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_ticker_deserialization() {
        let json = r#"{"symbol":"XRPUSDT","bidPrice":"0.49","bidQty":"1200.5","askPrice":"0.50","askQty":"800"}"#;
        let ticker: BookTickerResponse = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.bid_price, "0.49");
        assert_eq!(ticker.ask_qty, "800");
    }

    #[test]
    fn test_order_id_as_string_or_number() {
        let text: NewOrderResponse =
            serde_json::from_str(r#"{"orderId":"C02__4437","symbol":"XRPUSDT"}"#).unwrap();
        assert_eq!(text.order_id.to_string(), "C02__4437");

        let number: NewOrderResponse = serde_json::from_str(r#"{"orderId":123456}"#).unwrap();
        assert_eq!(number.order_id.to_string(), "123456");
    }

    #[test]
    fn test_query_order_deserialization() {
        let json = r#"{"symbol":"XRPUSDT","orderId":"C02__4437","status":"FILLED","executedQty":"100"}"#;
        let response: QueryOrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, OrderStatus::Filled);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("bidPrice", "abc").is_err());
        assert_eq!(parse_decimal("bidPrice", " 0.49 ").unwrap().to_string(), "0.49");
    }
}
