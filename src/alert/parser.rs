//! Alert message parser

use rust_decimal::Decimal;
use std::str::FromStr;

use super::format::{AlertFormat, FieldRole, FormatDescriptor};
use super::types::{Instruction, Sizing};
use crate::common::errors::ParseError;
use crate::common::types::Side;

/// Decodes raw alert text into an [`Instruction`]
///
/// Formats are tried in the configured order; the first one whose field
/// count matches and whose fields all decode wins.
#[derive(Debug, Clone)]
pub struct AlertParser {
    formats: Vec<AlertFormat>,
}

impl AlertParser {
    pub fn new(formats: Vec<AlertFormat>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[AlertFormat] {
        &self.formats
    }

    /// Parse an alert message
    ///
    /// When a format matched the field count but a field failed to decode,
    /// that format's error is returned; if no format matched the field count
    /// the result is [`ParseError::InvalidFormat`].
    pub fn parse(&self, raw: &str) -> Result<Instruction, ParseError> {
        let message = raw.trim();
        if message.is_empty() {
            return Err(ParseError::InvalidFormat("empty alert".to_string()));
        }

        let mut first_error = None;

        for format in &self.formats {
            let descriptor = format.descriptor();
            let parts: Vec<&str> = message.split(descriptor.delimiter).collect();
            if parts.len() != descriptor.fields.len() {
                continue;
            }

            match decode(descriptor, &parts) {
                Ok(instruction) => return Ok(instruction),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            ParseError::InvalidFormat(format!(
                "{:?} does not match any of: {}",
                message,
                self.formats
                    .iter()
                    .map(|f| f.descriptor().template())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }))
    }
}

impl Default for AlertParser {
    fn default() -> Self {
        Self::new(AlertFormat::default_priority().to_vec())
    }
}

#[derive(Default)]
struct Fields {
    action: Option<Side>,
    symbol: Option<String>,
    price: Option<Decimal>,
    notional: Option<Decimal>,
    quantity: Option<Decimal>,
}

fn decode(descriptor: &FormatDescriptor, parts: &[&str]) -> Result<Instruction, ParseError> {
    let mut fields = Fields::default();

    for (role, raw) in descriptor.fields.iter().zip(parts) {
        let value = raw.trim();
        match role {
            FieldRole::Action => fields.action = Some(parse_action(value)?),
            FieldRole::Symbol => fields.symbol = Some(parse_symbol(value)?),
            FieldRole::Price => fields.price = Some(parse_positive("price", value)?),
            FieldRole::Notional => fields.notional = Some(parse_positive("size", value)?),
            FieldRole::Quantity => fields.quantity = Some(parse_positive("quantity", value)?),
        }
    }

    let (action, symbol) = match (fields.action, fields.symbol) {
        (Some(action), Some(symbol)) => (action, symbol),
        _ => {
            return Err(ParseError::InvalidFormat(format!(
                "format {} lacks an action or symbol",
                descriptor.name
            )))
        }
    };

    let sizing = match (fields.notional, fields.quantity, fields.price) {
        (Some(amount), None, None) => Sizing::Notional { amount },
        (None, Some(quantity), Some(reference_price)) => Sizing::FixedQuantity {
            quantity,
            reference_price,
        },
        (None, None, Some(reference_price)) => Sizing::RiskBudget { reference_price },
        _ => {
            return Err(ParseError::InvalidFormat(format!(
                "format {} has no usable sizing fields",
                descriptor.name
            )))
        }
    };

    Ok(Instruction {
        action,
        symbol,
        sizing,
    })
}

fn parse_action(value: &str) -> Result<Side, ParseError> {
    match value.to_uppercase().as_str() {
        "BUY" => Ok(Side::Buy),
        "SELL" => Ok(Side::Sell),
        other => Err(ParseError::InvalidFormat(format!("unknown action {:?}", other))),
    }
}

fn parse_symbol(value: &str) -> Result<String, ParseError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::InvalidFormat(format!("invalid symbol {:?}", value)));
    }
    Ok(value.to_ascii_uppercase())
}

fn parse_positive(field: &'static str, value: &str) -> Result<Decimal, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    };

    let number = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid())?;

    if number <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(number)
}
