//! Alert format descriptors
//!
//! Every message shape the strategy side has ever emitted is described by a
//! delimiter and an ordered list of field roles. The parser walks these
//! descriptors in priority order instead of branching per format version.

use serde::{Deserialize, Serialize};

/// Meaning of one delimited field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Action,
    Symbol,
    /// Strategy price
    Price,
    /// Order size in quote currency
    Notional,
    Quantity,
}

/// Static description of one alert shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub name: &'static str,
    pub delimiter: char,
    pub fields: &'static [FieldRole],
}

impl FormatDescriptor {
    /// Human-readable template, e.g. `ACTION:SYMBOL:PRICE`
    pub fn template(&self) -> String {
        self.fields
            .iter()
            .map(|role| match role {
                FieldRole::Action => "ACTION",
                FieldRole::Symbol => "SYMBOL",
                FieldRole::Price => "PRICE",
                FieldRole::Notional => "SIZE_USDT",
                FieldRole::Quantity => "QUANTITY",
            })
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string())
    }
}

const QUANTITY_PRICE: FormatDescriptor = FormatDescriptor {
    name: "quantity_price",
    delimiter: ':',
    fields: &[
        FieldRole::Action,
        FieldRole::Symbol,
        FieldRole::Quantity,
        FieldRole::Price,
    ],
};

const NOTIONAL: FormatDescriptor = FormatDescriptor {
    name: "notional",
    delimiter: ':',
    fields: &[FieldRole::Action, FieldRole::Symbol, FieldRole::Notional],
};

const PIPE_PRICE: FormatDescriptor = FormatDescriptor {
    name: "pipe_price",
    delimiter: '|',
    fields: &[FieldRole::Action, FieldRole::Symbol, FieldRole::Price],
};

const PRICE: FormatDescriptor = FormatDescriptor {
    name: "price",
    delimiter: ':',
    fields: &[FieldRole::Action, FieldRole::Symbol, FieldRole::Price],
};

/// Supported alert formats
///
/// `Notional` and `Price` share the same shape, so only whichever comes
/// first in the configured order can ever match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertFormat {
    /// `ACTION:SYMBOL:QUANTITY:PRICE`
    QuantityPrice,
    /// `ACTION:SYMBOL:SIZE_USDT`
    Notional,
    /// `ACTION|SYMBOL|PRICE`
    PipePrice,
    /// `ACTION:SYMBOL:PRICE`
    Price,
}

impl AlertFormat {
    pub fn descriptor(&self) -> &'static FormatDescriptor {
        match self {
            AlertFormat::QuantityPrice => &QUANTITY_PRICE,
            AlertFormat::Notional => &NOTIONAL,
            AlertFormat::PipePrice => &PIPE_PRICE,
            AlertFormat::Price => &PRICE,
        }
    }

    /// Priority used when nothing is configured
    pub fn default_priority() -> &'static [AlertFormat] {
        &[
            AlertFormat::QuantityPrice,
            AlertFormat::Notional,
            AlertFormat::PipePrice,
        ]
    }
}
