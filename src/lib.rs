pub mod error;
pub mod ledger;
pub mod movement;
pub mod order;
pub mod product;
pub mod service;
pub mod store;
pub mod supplier;
pub mod time;
pub mod utils;
