use chrono::Utc;

use crate::error::LedgerError;
use crate::time::TimeStamp;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Completed,
    #[n(2)]
    Cancelled,
}

impl OrderStatus {
    /// Completed and Cancelled permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// A sale order. Born Pending with the stock already reserved; only the
/// lifecycle methods below may move its status.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SaleOrder {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub product_id: String,
    #[n(2)]
    pub product_name: String, // denormalized at creation time
    #[n(3)]
    pub quantity: u32,
    #[n(4)]
    pub total_price_cents: u64, // unit price x quantity, captured at order time
    #[n(5)]
    pub sale_date: TimeStamp<Utc>,
    #[n(6)]
    pub status: OrderStatus,
}

impl SaleOrder {
    pub fn new(
        id: String,
        product_id: String,
        product_name: String,
        quantity: u32,
        total_price_cents: u64,
    ) -> Self {
        Self {
            id,
            product_id,
            product_name,
            quantity,
            total_price_cents,
            sale_date: TimeStamp::new(),
            status: OrderStatus::Pending,
        }
    }

    /// Pending -> Cancelled. Cancelling from a terminal state is rejected,
    /// including Cancelled -> Cancelled, which would otherwise re-release the
    /// reservation and double-credit stock.
    pub fn cancel(&mut self) -> Result<(), LedgerError> {
        match self.status {
            OrderStatus::Pending => {
                self.status = OrderStatus::Cancelled;
                Ok(())
            }
            current => Err(LedgerError::InvalidTransition(current)),
        }
    }

    /// Pending -> Completed. No stock effect; the reservation already
    /// happened at creation.
    pub fn complete(&mut self) -> Result<(), LedgerError> {
        match self.status {
            OrderStatus::Pending => {
                self.status = OrderStatus::Completed;
                Ok(())
            }
            current => Err(LedgerError::InvalidTransition(current)),
        }
    }
}
