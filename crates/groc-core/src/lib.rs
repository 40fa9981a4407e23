//! Core types and the purchase import pipeline for groc.
//!
//! This crate is free of database dependencies. Storage backends implement
//! [`store::PurchaseStore`]; the CLI drives the pipeline through
//! [`import::insert_one`] and [`import::add_from_path`].

pub mod engine;
pub mod error;
pub mod import;
pub mod money;
pub mod normalize;
pub mod purchase;
pub mod row;
pub mod store;

pub use error::{Error, InsertFailure, Result};
pub use money::Cents;
