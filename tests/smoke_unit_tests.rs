//! Smoke screen unit tests for the inventory system components
//!
//! These tests span the codebase, testing behavior in isolation from the
//! full workflow scenarios. They are intended as a smoke screen and
//! generally cover the happy path plus the first line of failure handling.

use std::sync::Arc;

use stock_ledger::{
    error::LedgerError,
    ledger::StockLedger,
    movement::{MovementDraft, MovementType},
    order::{OrderStatus, SaleOrder},
    product::ProductDraft,
    store::RecordStore,
    supplier::SupplierDraft,
    utils::new_uuid_to_bech32,
};
use tempfile::tempdir;

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Ids come out bech32-encoded with the collection's human-readable
    /// prefix in front
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32("prod_").unwrap();

        assert!(encoded.starts_with("prod_1"));
        assert!(encoded.len() > 10); // UUID should produce substantial output
    }

    #[test]
    fn handles_empty_hrp() {
        // Empty string should fail
        let result = new_uuid_to_bech32("");
        assert!(result.is_err());
    }

    #[test]
    fn generates_unique_ids() {
        let id1 = new_uuid_to_bech32("ord_").unwrap();
        let id2 = new_uuid_to_bech32("ord_").unwrap();
        let id3 = new_uuid_to_bech32("ord_").unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn different_hrps_produce_different_encodings() {
        let product_id = new_uuid_to_bech32("prod_").unwrap();
        let supplier_id = new_uuid_to_bech32("sup_").unwrap();

        assert!(product_id.starts_with("prod_"));
        assert!(supplier_id.starts_with("sup_"));
        assert_ne!(product_id, supplier_id);
    }
}

// STORE MODULE TESTS
#[cfg(test)]
mod store_tests {
    use super::*;

    fn open_store(db_name: &str) -> (tempfile::TempDir, RecordStore) {
        let temp_dir = tempdir().unwrap();
        let db = sled::open(temp_dir.path().join(db_name)).unwrap();
        let store = RecordStore::open(&db).unwrap();
        (temp_dir, store)
    }

    fn sample_supplier(name: &str, email: &str) -> stock_ledger::supplier::Supplier {
        SupplierDraft::new()
            .set_name(name)
            .set_email(email)
            .set_phone("0123456789")
            .set_address("1 Warehouse Way")
            .finalise(new_uuid_to_bech32("sup_").unwrap())
            .unwrap()
    }

    #[test]
    fn insert_then_find_by_id_round_trips() {
        let (_dir, store) = open_store("store_roundtrip.db");
        let supplier = sample_supplier("Acme Beans", "orders@acme.example");

        store.suppliers().insert(&supplier).unwrap();
        let loaded = store.suppliers().find_by_id(&supplier.id).unwrap().unwrap();

        assert_eq!(supplier, loaded);
    }

    #[test]
    fn find_by_id_misses_cleanly() {
        let (_dir, store) = open_store("store_miss.db");

        assert!(store.suppliers().find_by_id("sup_missing").unwrap().is_none());
    }

    #[test]
    fn find_one_and_find_many_filter() {
        let (_dir, store) = open_store("store_filters.db");
        store
            .suppliers()
            .insert(&sample_supplier("Acme Beans", "orders@acme.example"))
            .unwrap();
        store
            .suppliers()
            .insert(&sample_supplier("Bulk Roasters", "sales@bulk.example"))
            .unwrap();

        let hit = store
            .suppliers()
            .find_one(|s| s.email == "sales@bulk.example")
            .unwrap();
        assert_eq!(hit.unwrap().name, "Bulk Roasters");

        let all = store.suppliers().find_many(|_| true).unwrap();
        assert_eq!(all.len(), 2);

        let none = store
            .suppliers()
            .find_many(|s| s.email.ends_with("@nowhere.example"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn distinct_values_deduplicate() {
        let (_dir, store) = open_store("store_distinct.db");
        store
            .suppliers()
            .insert(&sample_supplier("Acme Beans", "orders@acme.example"))
            .unwrap();
        store
            .suppliers()
            .insert(&sample_supplier("Acme Equipment", "kit@acme.example"))
            .unwrap();

        let addresses = store
            .suppliers()
            .distinct_values(|s| s.address.clone())
            .unwrap();

        // both records share one address
        assert_eq!(addresses.len(), 1);
    }
}

// LEDGER MODULE TESTS
#[cfg(test)]
mod ledger_tests {
    use super::*;

    #[test]
    fn movement_against_missing_product_aborts() {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(sled::open(temp_dir.path().join("ledger_missing.db")).unwrap());
        let store = RecordStore::open(&db).unwrap();
        let ledger = StockLedger::new(&store);

        let movement = MovementDraft::new()
            .set_product("prod_missing")
            .set_movement_type(MovementType::In)
            .set_quantity(5)
            .finalise(new_uuid_to_bech32("mov_").unwrap())
            .unwrap();

        let err = ledger.apply_movement(&movement).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                collection: "products",
                ..
            }
        ));

        // the aborted transaction must not have written the movement either
        assert!(store.movements().find_by_id(&movement.id).unwrap().is_none());
    }

    /// The Pending check runs against the persisted order inside the
    /// release transaction, so a second release finds Cancelled and aborts
    /// instead of crediting the stock again.
    #[test]
    fn release_checks_the_persisted_status() {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(sled::open(temp_dir.path().join("ledger_release.db")).unwrap());
        let store = RecordStore::open(&db).unwrap();
        let ledger = StockLedger::new(&store);

        let product = ProductDraft::new()
            .set_name("Ledger Product")
            .set_description("release test")
            .set_category("coffee")
            .set_price_cents(500)
            .set_stock_quantity(10)
            .set_supplier("sup_1")
            .finalise(new_uuid_to_bech32("prod_").unwrap(), "Acme Beans".into())
            .unwrap();
        store.products().insert(&product).unwrap();

        let order = SaleOrder::new(
            new_uuid_to_bech32("ord_").unwrap(),
            product.id.clone(),
            product.name.clone(),
            3,
            1_500,
        );
        ledger.reserve_for_sale(&order).unwrap();

        let (cancelled, restocked) = ledger.release_from_sale(&order.id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(restocked.stock_quantity, 10);

        // releasing again must abort on the stored status
        let err = ledger.release_from_sale(&order.id).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition(OrderStatus::Cancelled)
        ));
        assert_eq!(
            store
                .products()
                .find_by_id(&product.id)
                .unwrap()
                .unwrap()
                .stock_quantity,
            10
        );
    }
}

// DRAFT VALIDATION TESTS
#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn product_draft_reports_the_missing_field() {
        let err = ProductDraft::new()
            .set_description("no name set")
            .set_category("coffee")
            .set_price_cents(100)
            .set_supplier("sup_1")
            .finalise("prod_1".into(), "Acme Beans".into())
            .unwrap_err();
        assert_eq!(err.field, "name");

        let err = ProductDraft::new()
            .set_name("Espresso Blend")
            .set_category("coffee")
            .set_price_cents(100)
            .set_supplier("sup_1")
            .finalise("prod_1".into(), "Acme Beans".into())
            .unwrap_err();
        assert_eq!(err.field, "description");

        let err = ProductDraft::new()
            .set_name("Espresso Blend")
            .set_description("1kg bag")
            .set_price_cents(100)
            .set_supplier("sup_1")
            .finalise("prod_1".into(), "Acme Beans".into())
            .unwrap_err();
        assert_eq!(err.field, "category");
    }

    #[test]
    fn movement_draft_requires_a_type() {
        let err = MovementDraft::new()
            .set_product("prod_1")
            .set_quantity(2)
            .finalise("mov_1".into())
            .unwrap_err();
        assert_eq!(err.field, "movement_type");
    }

    #[test]
    fn supplier_draft_requires_every_field() {
        let err = SupplierDraft::new().finalise("sup_1".into()).unwrap_err();
        assert_eq!(err.field, "name");

        let err = SupplierDraft::new()
            .set_name("Acme Beans")
            .finalise("sup_1".into())
            .unwrap_err();
        assert_eq!(err.field, "email");
    }
}
