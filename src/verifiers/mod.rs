//! The layered verification pipeline.
//!
//! Leaves first: [`common`] holds the predicates every chain check is
//! built from, [`crl`] validates revocation lists against their issuers,
//! [`pck_cert`] and [`tcb_signing`] compose them into chain verdicts,
//! [`tcb_info`] and [`enclave_identity`] validate the signed JSON
//! collateral, and [`quote`] ties everything together over a quote.
//!
//! Within each verifier the check order is part of the contract:
//! structural defects outrank signature defects, which outrank
//! revocation, which outranks expiration. Callers depend on getting the
//! status of the first rule violated.

pub mod common;
pub mod crl;
pub mod enclave_identity;
pub mod pck_cert;
pub mod quote;
pub mod tcb_info;
pub mod tcb_signing;
