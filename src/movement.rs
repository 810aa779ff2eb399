use chrono::Utc;

use crate::error::ValidationError;
use crate::time::TimeStamp;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementType {
    #[n(0)]
    In,
    #[n(1)]
    Out,
}

/// An append-only ledger entry for stock entering or leaving inventory
/// outside the sale-order flow. Never updated or deleted once written.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub product_id: String,
    #[n(2)]
    pub quantity: u32,
    #[n(3)]
    pub movement_type: MovementType,
    #[n(4)]
    pub notes: Option<String>,
    #[n(5)]
    pub recorded_at: TimeStamp<Utc>,
}

// used for constructing drafts before the store is touched
#[derive(Default, Debug)]
pub struct MovementDraft {
    product_id: Option<String>,
    quantity: u32,
    movement_type: Option<MovementType>,
    notes: Option<String>,
}

impl MovementDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_product(mut self, product_id: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self
    }
    pub fn set_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
    pub fn set_movement_type(mut self, movement_type: MovementType) -> Self {
        self.movement_type = Some(movement_type);
        self
    }
    pub fn set_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Checks fields, then shapes the draft into a record ready for insert.
    /// The timestamp is issued here; movement records are immutable after.
    pub fn finalise(&self, id: String) -> Result<StockMovement, ValidationError> {
        let product_id = self
            .product_id
            .clone()
            .ok_or_else(|| ValidationError::new("product", "product reference is required"))?;
        if self.quantity == 0 {
            return Err(ValidationError::new(
                "quantity",
                "quantity must be greater than zero",
            ));
        }
        let movement_type = self
            .movement_type
            .ok_or_else(|| ValidationError::new("movement_type", "movement type is required"))?;

        Ok(StockMovement {
            id,
            product_id,
            quantity: self.quantity,
            movement_type,
            notes: self.notes.clone(),
            recorded_at: TimeStamp::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_is_rejected() {
        let err = MovementDraft::new()
            .set_product("prod_1")
            .set_movement_type(MovementType::In)
            .set_quantity(0)
            .finalise("mov_1".into());

        assert_eq!(err.unwrap_err().field, "quantity");
    }

    #[test]
    fn notes_are_optional() {
        let movement = MovementDraft::new()
            .set_product("prod_1")
            .set_movement_type(MovementType::Out)
            .set_quantity(3)
            .finalise("mov_1".into())
            .unwrap();

        assert_eq!(movement.notes, None);
        assert_eq!(movement.movement_type, MovementType::Out);
    }
}
