//! Alert decoding
//!
//! Turns the text a charting tool posts to the webhook into a typed
//! [`Instruction`]. The accepted shapes live in a descriptor table
//! ([`AlertFormat`]) rather than in per-version branching:
//!
//! | Format           | Shape                          | Sizing          |
//! |------------------|--------------------------------|-----------------|
//! | `quantity_price` | `ACTION:SYMBOL:QUANTITY:PRICE` | fixed quantity  |
//! | `notional`       | `ACTION:SYMBOL:SIZE_USDT`      | quote notional  |
//! | `pipe_price`     | `ACTION\|SYMBOL\|PRICE`        | risk budget     |
//! | `price`          | `ACTION:SYMBOL:PRICE`          | risk budget     |

pub mod envelope;
mod format;
mod parser;
mod types;

pub use envelope::{extract_message, ExtractedMessage, MessageSource, MESSAGE_KEYS};
pub use format::{AlertFormat, FieldRole, FormatDescriptor};
pub use parser::AlertParser;
pub use types::{Instruction, Sizing};
