//! Service layer API for inventory operations

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{LedgerError, ValidationError};
use crate::ledger::StockLedger;
use crate::movement::{MovementDraft, MovementType, StockMovement};
use crate::order::{OrderStatus, SaleOrder};
use crate::product::{Product, ProductDraft};
use crate::store::RecordStore;
use crate::supplier::{Supplier, SupplierDraft};
use crate::utils;

pub struct InventoryService {
    store: RecordStore,
    ledger: StockLedger,
}

impl InventoryService {
    pub fn new(instance: Arc<sled::Db>) -> Result<Self, LedgerError> {
        let store = RecordStore::open(&instance)?;
        let ledger = StockLedger::new(&store);
        Ok(Self { store, ledger })
    }

    /// Register a new supplier
    pub fn add_supplier(&self, draft: SupplierDraft) -> Result<Supplier, LedgerError> {
        let id = utils::new_uuid_to_bech32("sup_")?;
        let supplier = draft.finalise(id)?;

        // email is unique across suppliers
        if self
            .store
            .suppliers()
            .find_one(|existing| existing.email == supplier.email)?
            .is_some()
        {
            return Err(ValidationError::new("email", "supplier email already registered").into());
        }

        self.store.suppliers().insert(&supplier)?;

        Ok(supplier)
    }

    /// Register a new product, denormalizing the supplier name onto it
    pub fn add_product(&self, draft: ProductDraft) -> Result<Product, LedgerError> {
        // Resolve the supplier reference first; the draft carries only its id
        let supplier_id = draft
            .supplier_id()
            .ok_or_else(|| ValidationError::new("supplier", "supplier reference is required"))?;
        let supplier = self
            .store
            .suppliers()
            .find_by_id(supplier_id)?
            .ok_or_else(|| LedgerError::NotFound {
                collection: "suppliers",
                id: supplier_id.to_string(),
            })?;

        let id = utils::new_uuid_to_bech32("prod_")?;
        let product = draft.finalise(id, supplier.name)?;

        // product names are unique
        if self
            .store
            .products()
            .find_one(|existing| existing.name == product.name)?
            .is_some()
        {
            return Err(ValidationError::new("name", "product name already exists").into());
        }

        self.store.products().insert(&product)?;

        Ok(product)
    }

    pub fn find_product(&self, product_id: &str) -> Result<Product, LedgerError> {
        self.store
            .products()
            .find_by_id(product_id)?
            .ok_or_else(|| LedgerError::NotFound {
                collection: "products",
                id: product_id.to_string(),
            })
    }

    pub fn find_sale_order(&self, order_id: &str) -> Result<SaleOrder, LedgerError> {
        self.store
            .orders()
            .find_by_id(order_id)?
            .ok_or_else(|| LedgerError::NotFound {
                collection: "sale_orders",
                id: order_id.to_string(),
            })
    }

    /// List products, optionally filtered to one category
    pub fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, LedgerError> {
        match category {
            Some(category) => self
                .store
                .products()
                .find_many(|product| product.category == category),
            None => self.store.products().find_many(|_| true),
        }
    }

    /// Distinct categories across all products, for the category filter
    pub fn product_categories(&self) -> Result<BTreeSet<String>, LedgerError> {
        self.store
            .products()
            .distinct_values(|product| product.category.clone())
    }

    pub fn list_suppliers(&self) -> Result<Vec<Supplier>, LedgerError> {
        self.store.suppliers().find_many(|_| true)
    }

    /// Record a stock movement and apply its effect to the product.
    pub fn record_movement(
        &self,
        draft: MovementDraft,
    ) -> Result<(StockMovement, Product), LedgerError> {
        let id = utils::new_uuid_to_bech32("mov_")?;
        let movement = draft.finalise(id)?;

        // pre-flight check for a clean error; the transaction re-checks
        let product = self.find_product(&movement.product_id)?;
        if movement.movement_type == MovementType::Out && movement.quantity > product.stock_quantity
        {
            return Err(LedgerError::InsufficientStock {
                requested: movement.quantity,
                available: product.stock_quantity,
            });
        }

        let updated = self.ledger.apply_movement(&movement)?;

        Ok((movement, updated))
    }

    /// Movement history for one product, oldest first by insertion scan
    pub fn movements_for_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<StockMovement>, LedgerError> {
        self.store
            .movements()
            .find_many(|movement| movement.product_id == product_id)
    }

    /// Create a Pending sale order, reserving its quantity out of stock.
    pub fn create_sale_order(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<SaleOrder, LedgerError> {
        if quantity == 0 {
            return Err(
                ValidationError::new("quantity", "quantity must be greater than zero").into(),
            );
        }

        let product = self.find_product(product_id)?;

        // pre-flight check for a clean error; the transaction re-checks
        if quantity > product.stock_quantity {
            return Err(LedgerError::InsufficientStock {
                requested: quantity,
                available: product.stock_quantity,
            });
        }

        // unit price is captured at order time, not re-derived later
        let total_price_cents = product
            .price_cents
            .checked_mul(u64::from(quantity))
            .ok_or_else(|| ValidationError::new("quantity", "total price overflow"))?;

        let id = utils::new_uuid_to_bech32("ord_")?;
        let order = SaleOrder::new(
            id,
            product.id.clone(),
            product.name.clone(),
            quantity,
            total_price_cents,
        );

        self.ledger.reserve_for_sale(&order)?;

        Ok(order)
    }

    /// Cancel a Pending order, returning its reservation to stock. The
    /// Pending check runs against the persisted order inside the ledger
    /// transaction, so a cancel racing another status write cannot release
    /// the reservation twice.
    pub fn cancel_sale_order(&self, order_id: &str) -> Result<SaleOrder, LedgerError> {
        let (order, _) = self.ledger.release_from_sale(order_id)?;

        Ok(order)
    }

    /// Complete a Pending order. Stock was already decremented at creation,
    /// so only the status changes; the write is a compare-and-swap so a
    /// cancel landing between the read and the write cannot be overwritten.
    pub fn complete_sale_order(&self, order_id: &str) -> Result<SaleOrder, LedgerError> {
        loop {
            let current = self.find_sale_order(order_id)?;

            let mut completed = current.clone();
            completed.complete()?;

            if self.store.orders().compare_and_swap(&current, &completed)? {
                return Ok(completed);
            }
            // lost a race with another status write, re-read and re-check
        }
    }

    /// List sale orders, optionally filtered to one status
    pub fn list_sale_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<SaleOrder>, LedgerError> {
        match status {
            Some(status) => self.store.orders().find_many(|order| order.status == status),
            None => self.store.orders().find_many(|_| true),
        }
    }

    /// Current stock level per product name
    pub fn stock_levels(&self) -> Result<Vec<(String, u32)>, LedgerError> {
        let products = self.store.products().find_many(|_| true)?;
        Ok(products
            .into_iter()
            .map(|product| (product.name, product.stock_quantity))
            .collect())
    }
}
