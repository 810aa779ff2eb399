use crate::order::OrderStatus;

/// A field-scoped input failure. Validation never mutates state; the caller
/// re-prompts with the offending field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("{collection} record not found: {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("sale order is {0:?}, no further transition is permitted")]
    InvalidTransition(OrderStatus),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("store failure: {0}")]
    Store(#[from] sled::Error),
    #[error("codec failure: {0}")]
    Codec(String),
}

// Ledger operations abort sled transactions with a LedgerError; unwrap the
// abort so callers only ever see the crate's own taxonomy.
impl From<sled::transaction::TransactionError<LedgerError>> for LedgerError {
    fn from(err: sled::transaction::TransactionError<LedgerError>) -> Self {
        match err {
            sled::transaction::TransactionError::Abort(err) => err,
            sled::transaction::TransactionError::Storage(err) => LedgerError::Store(err),
        }
    }
}
