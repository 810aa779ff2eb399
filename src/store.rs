//! Typed record collections over sled trees
//!
//! One tree per collection, keyed by the record id, values encoded as CBOR.
//! The store handle is injected into the service rather than living in a
//! process-wide global.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::error::LedgerError;
use crate::movement::StockMovement;
use crate::order::SaleOrder;
use crate::product::Product;
use crate::supplier::Supplier;

/// A record that knows which collection it lives in and what its key is.
pub trait Document: minicbor::Encode<()> + for<'b> minicbor::Decode<'b, ()> {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Supplier {
    const COLLECTION: &'static str = "suppliers";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for StockMovement {
    const COLLECTION: &'static str = "stock_movements";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for SaleOrder {
    const COLLECTION: &'static str = "sale_orders";

    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn encode<T: minicbor::Encode<()>>(record: &T) -> Result<Vec<u8>, LedgerError> {
    minicbor::to_vec(record).map_err(|err| LedgerError::Codec(err.to_string()))
}

pub(crate) fn decode<T: for<'b> minicbor::Decode<'b, ()>>(bytes: &[u8]) -> Result<T, LedgerError> {
    minicbor::decode(bytes).map_err(|err| LedgerError::Codec(err.to_string()))
}

pub struct Collection<T> {
    tree: sled::Tree,
    _record: PhantomData<T>,
}

impl<T: Document> Collection<T> {
    fn open(db: &sled::Db) -> Result<Self, LedgerError> {
        Ok(Self {
            tree: db.open_tree(T::COLLECTION)?,
            _record: PhantomData,
        })
    }

    // The stock ledger needs the raw tree to scope its transactions.
    pub(crate) fn tree(&self) -> &sled::Tree {
        &self.tree
    }

    /// Insert by id. Writing an existing id overwrites the record, which is
    /// how status updates are persisted.
    pub fn insert(&self, record: &T) -> Result<(), LedgerError> {
        self.tree.insert(record.id().as_bytes(), encode(record)?)?;
        Ok(())
    }

    /// Write `updated` only if the stored record still matches `current`.
    /// Returns false when a concurrent writer got there first; the caller
    /// re-reads and re-checks.
    pub fn compare_and_swap(&self, current: &T, updated: &T) -> Result<bool, LedgerError> {
        let swap = self.tree.compare_and_swap(
            current.id().as_bytes(),
            Some(encode(current)?),
            Some(encode(updated)?),
        )?;
        Ok(swap.is_ok())
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<T>, LedgerError> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn find_one(&self, filter: impl Fn(&T) -> bool) -> Result<Option<T>, LedgerError> {
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            let record: T = decode(&bytes)?;
            if filter(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    pub fn find_many(&self, filter: impl Fn(&T) -> bool) -> Result<Vec<T>, LedgerError> {
        let mut records = Vec::new();
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            let record: T = decode(&bytes)?;
            if filter(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Distinct values of one projected field, e.g. product categories for a
    /// filter dropdown.
    pub fn distinct_values(
        &self,
        field: impl Fn(&T) -> String,
    ) -> Result<BTreeSet<String>, LedgerError> {
        let mut values = BTreeSet::new();
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            let record: T = decode(&bytes)?;
            values.insert(field(&record));
        }
        Ok(values)
    }
}

/// The four collections backing the inventory system.
pub struct RecordStore {
    products: Collection<Product>,
    suppliers: Collection<Supplier>,
    movements: Collection<StockMovement>,
    orders: Collection<SaleOrder>,
}

impl RecordStore {
    pub fn open(db: &sled::Db) -> Result<Self, LedgerError> {
        Ok(Self {
            products: Collection::open(db)?,
            suppliers: Collection::open(db)?,
            movements: Collection::open(db)?,
            orders: Collection::open(db)?,
        })
    }

    pub fn products(&self) -> &Collection<Product> {
        &self.products
    }
    pub fn suppliers(&self) -> &Collection<Supplier> {
        &self.suppliers
    }
    pub fn movements(&self) -> &Collection<StockMovement> {
        &self.movements
    }
    pub fn orders(&self) -> &Collection<SaleOrder> {
        &self.orders
    }
}
