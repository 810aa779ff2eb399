//! Stock ledger: the single authority for changing a product's stock
//!
//! Movement handling and order handling share the same non-negativity
//! invariant and the same two-write atomicity requirement, so both funnel
//! through here. Each operation is one sled transaction over the product
//! tree and the companion tree: the current stock is re-read inside the
//! transaction, and either both writes land or neither does. sled re-runs
//! the closure when a concurrent writer conflicts, so two Out-movements or
//! two orders racing on the same product cannot lose an update.

use sled::Transactional;
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree,
};

use crate::error::{LedgerError, ValidationError};
use crate::movement::{MovementType, StockMovement};
use crate::order::SaleOrder;
use crate::product::Product;
use crate::store::{self, RecordStore};

pub struct StockLedger {
    products: sled::Tree,
    movements: sled::Tree,
    orders: sled::Tree,
}

impl StockLedger {
    pub fn new(store: &RecordStore) -> Self {
        Self {
            products: store.products().tree().clone(),
            movements: store.movements().tree().clone(),
            orders: store.orders().tree().clone(),
        }
    }

    /// Persist a movement record and apply its stock effect as one atomic
    /// unit. `In` has no upper bound; `Out` past the current stock aborts
    /// with `InsufficientStock` and leaves both trees untouched.
    pub fn apply_movement(&self, movement: &StockMovement) -> Result<Product, LedgerError> {
        let updated = (&self.products, &self.movements).transaction(|(products, movements)| {
            let mut product = load_product(products, &movement.product_id)?;
            product.stock_quantity = next_stock(&product, movement.quantity, movement.movement_type)?;

            movements.insert(movement.id.as_bytes(), tx_encode(movement)?)?;
            products.insert(product.id.as_bytes(), tx_encode(&product)?)?;

            Ok(product)
        })?;

        Ok(updated)
    }

    /// Eagerly decrement stock and persist the Pending order as one atomic
    /// unit, so concurrently created orders cannot oversell.
    pub fn reserve_for_sale(&self, order: &SaleOrder) -> Result<Product, LedgerError> {
        let updated = (&self.products, &self.orders).transaction(|(products, orders)| {
            let mut product = load_product(products, &order.product_id)?;
            let remaining = product.stock_quantity.checked_sub(order.quantity).ok_or_else(|| {
                ConflictableTransactionError::Abort(LedgerError::InsufficientStock {
                    requested: order.quantity,
                    available: product.stock_quantity,
                })
            })?;
            product.stock_quantity = remaining;

            orders.insert(order.id.as_bytes(), tx_encode(order)?)?;
            products.insert(product.id.as_bytes(), tx_encode(&product)?)?;

            Ok(product)
        })?;

        Ok(updated)
    }

    /// Cancel a Pending order and return its reserved quantity to inventory
    /// as one atomic unit. The order's persisted status is re-read inside
    /// the transaction, same as the stock is, so two racing cancels cannot
    /// both pass the Pending check and double-credit the release. The stock
    /// increment itself has no upper bound check; this mirrors a
    /// cancellation handing reserved stock back.
    pub fn release_from_sale(&self, order_id: &str) -> Result<(SaleOrder, Product), LedgerError> {
        let released = (&self.products, &self.orders).transaction(|(products, orders)| {
            let mut order = load_order(orders, order_id)?;
            order.cancel().map_err(ConflictableTransactionError::Abort)?;

            let mut product = load_product(products, &order.product_id)?;
            product.stock_quantity = checked_add(product.stock_quantity, order.quantity)?;

            orders.insert(order.id.as_bytes(), tx_encode(&order)?)?;
            products.insert(product.id.as_bytes(), tx_encode(&product)?)?;

            Ok((order, product))
        })?;

        Ok(released)
    }
}

fn load_product(
    products: &TransactionalTree,
    product_id: &str,
) -> ConflictableTransactionResult<Product, LedgerError> {
    let bytes = products.get(product_id.as_bytes())?.ok_or_else(|| {
        ConflictableTransactionError::Abort(LedgerError::NotFound {
            collection: "products",
            id: product_id.to_string(),
        })
    })?;

    store::decode(&bytes).map_err(ConflictableTransactionError::Abort)
}

fn load_order(
    orders: &TransactionalTree,
    order_id: &str,
) -> ConflictableTransactionResult<SaleOrder, LedgerError> {
    let bytes = orders.get(order_id.as_bytes())?.ok_or_else(|| {
        ConflictableTransactionError::Abort(LedgerError::NotFound {
            collection: "sale_orders",
            id: order_id.to_string(),
        })
    })?;

    store::decode(&bytes).map_err(ConflictableTransactionError::Abort)
}

fn next_stock(
    product: &Product,
    quantity: u32,
    movement_type: MovementType,
) -> ConflictableTransactionResult<u32, LedgerError> {
    match movement_type {
        MovementType::In => checked_add(product.stock_quantity, quantity),
        MovementType::Out => product.stock_quantity.checked_sub(quantity).ok_or_else(|| {
            ConflictableTransactionError::Abort(LedgerError::InsufficientStock {
                requested: quantity,
                available: product.stock_quantity,
            })
        }),
    }
}

fn checked_add(current: u32, quantity: u32) -> ConflictableTransactionResult<u32, LedgerError> {
    current.checked_add(quantity).ok_or_else(|| {
        ConflictableTransactionError::Abort(LedgerError::Validation(ValidationError::new(
            "quantity",
            "stock quantity overflow",
        )))
    })
}

fn tx_encode<T: minicbor::Encode<()>>(
    record: &T,
) -> ConflictableTransactionResult<Vec<u8>, LedgerError> {
    store::encode(record).map_err(ConflictableTransactionError::Abort)
}
