//! # Repository Implementations
//!
//! One repository per aggregate, each a thin struct around the shared
//! `SqlitePool`:
//!
//! - [`tenant`] - approval rules and billing configuration
//! - [`price_override`] - write-once override audit records
//! - [`suggestion`] - suggestion lifecycle with conditional-update resolution
//! - [`bill`] - write-once finalized bills and their line items
//! - [`pin`] - manager/owner PIN hashes for the authorizer

pub mod bill;
pub mod pin;
pub mod price_override;
pub mod suggestion;
pub mod tenant;
