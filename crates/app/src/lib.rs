//! # hearthbook-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RecordRepository`: CRUD, filtered listings and order snapshots for records
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RecordService`: create, read, patch, delete, list, client history
//!   - `SalesService`: sales summary over a filtered set of records
//!   - `WarrantyService`: warranty counts and warranty-based listings
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `hearthbook-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
