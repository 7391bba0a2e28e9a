//! # hearthbook-domain
//!
//! Pure domain model for the hearthbook service and sales ledger.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Records** (one delivered heater: installation, client and sale details)
//! - Define **Filters** and **Pages** used to select and order records
//! - Define **Warranty** rules (one year from delivery)
//! - Compute the **Sales summary** (totals, breakdowns, monthly trend, projection)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod filter;
pub mod page;
pub mod record;
pub mod sales;
pub mod warranty;
