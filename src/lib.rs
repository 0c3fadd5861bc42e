//! # dcap-attest
//!
//! Verification of Intel SGX DCAP ECDSA attestation evidence in pure Rust.
//! Given a quote and its collateral — the PCK certificate chain, the root
//! and intermediate CRLs, the signed TCB Info and QE identity documents,
//! and a trusted root certificate — the crate reduces the evidence to a
//! single [`Status`] from a closed, ABI-stable taxonomy.
//!
//! Verification is layered: certificate chains are checked for structure,
//! trust anchoring, revocation and expiration; the signed JSON collateral
//! is checked against the TCB signing chain over its exact signed bytes;
//! and finally the quote's signatures, attestation key binding, TCB level
//! and QE identity match are evaluated. The first violated rule decides
//! the status.
//!
//! # Example
//!
//! ```no_run
//! use dcap_attest::{
//!     parse_certificate_chain, parse_crl, verify_quote, Certificate, EnclaveIdentityV2, TcbInfo,
//! };
//!
//! let read = |path| std::fs::read_to_string(path).unwrap();
//! let pck_chain = parse_certificate_chain(&read("pck_chain.pem")).unwrap();
//! let tcb_chain = parse_certificate_chain(&read("tcb_chain.pem")).unwrap();
//! let root_crl = parse_crl(&read("root_crl.pem")).unwrap();
//! let intermediate_crl = parse_crl(&read("intermediate_crl.pem")).unwrap();
//! let trusted_root = Certificate::parse(&read("root_ca.pem")).unwrap();
//! let tcb_info = TcbInfo::parse(&read("tcb_info.json")).unwrap();
//! let qe_identity = EnclaveIdentityV2::parse(&read("qe_identity.json")).unwrap();
//! let quote = std::fs::read("quote.bin").unwrap();
//!
//! let now = std::time::SystemTime::now()
//!     .duration_since(std::time::UNIX_EPOCH)
//!     .unwrap()
//!     .as_secs();
//! let status = verify_quote(
//!     &quote,
//!     &pck_chain,
//!     &tcb_chain,
//!     &root_crl,
//!     &intermediate_crl,
//!     &trusted_root,
//!     &tcb_info,
//!     &qe_identity,
//!     now,
//! );
//! println!("{status}");
//! ```

mod constants;
mod utils;

pub mod chain;
pub mod crl;
pub mod crypto;
pub mod enclave_identity;
pub mod error;
pub mod oids;
pub mod pck;
pub mod quote;
pub mod status;
pub mod tcb_info;
pub mod verifiers;
pub mod x509;

pub use chain::CertificateChain;
pub use crl::CrlStore;
pub use enclave_identity::EnclaveIdentityV2;
pub use error::ParseError;
pub use pck::{PckCertificate, PckVariant, SgxType};
pub use status::{describe, Status};
pub use tcb_info::TcbInfo;
pub use x509::Certificate;

use verifiers::enclave_identity::EnclaveIdentityVerifier;
use verifiers::pck_cert::PckCertVerifier;
use verifiers::quote::QuoteVerifier;
use verifiers::tcb_info::TcbInfoVerifier;

/// Parse a PEM-encoded PCK certificate, accepting either PCK profile.
pub fn parse_pck_certificate(pem_input: &str) -> Result<PckCertificate, ParseError> {
    PckCertificate::parse(pem_input)
}

/// Parse a concatenated PEM bundle into a classified certificate chain.
pub fn parse_certificate_chain(pem_bundle: &str) -> Result<CertificateChain, ParseError> {
    CertificateChain::parse(pem_bundle)
}

/// Parse a PEM-encoded certificate revocation list.
pub fn parse_crl(pem_input: &str) -> Result<CrlStore, ParseError> {
    CrlStore::parse(pem_input)
}

/// Verify a Root / Intermediate / PCK certificate chain against its CRLs
/// and a trusted root. `expiration_date` is the instant (seconds since the
/// Unix epoch) every certificate and CRL must still be valid at.
pub fn verify_pck_certificate_chain(
    chain: &CertificateChain,
    root_ca_crl: &CrlStore,
    intermediate_crl: &CrlStore,
    trusted_root: &Certificate,
    expiration_date: u64,
) -> Status {
    PckCertVerifier::new().verify(
        chain,
        root_ca_crl,
        intermediate_crl,
        trusted_root,
        expiration_date,
    )
}

/// Verify a TCB Info document against its signing chain.
pub fn verify_tcb_info(
    tcb_info: &TcbInfo,
    chain: &CertificateChain,
    root_ca_crl: &CrlStore,
    trusted_root: &Certificate,
    expiration_date: u64,
) -> Status {
    TcbInfoVerifier::new().verify(tcb_info, chain, root_ca_crl, trusted_root, expiration_date)
}

/// Verify an Enclave Identity document against its signing chain.
pub fn verify_enclave_identity(
    identity: &EnclaveIdentityV2,
    chain: &CertificateChain,
    root_ca_crl: &CrlStore,
    trusted_root: &Certificate,
    expiration_date: u64,
) -> Status {
    EnclaveIdentityVerifier::new().verify(
        identity,
        chain,
        root_ca_crl,
        trusted_root,
        expiration_date,
    )
}

/// Verify a quote together with all of its collateral.
///
/// Runs the full pipeline: the PCK chain, the TCB Info and enclave
/// identity (each against the TCB signing chain), the quote's QE report
/// binding and signatures, TCB level selection and QE identity matching.
/// On success the result is the selected TCB level's status, which may be
/// [`Status::Ok`] or a degraded value such as [`Status::TcbOutOfDate`].
#[allow(clippy::too_many_arguments)]
pub fn verify_quote(
    raw_quote: &[u8],
    pck_chain: &CertificateChain,
    tcb_signing_chain: &CertificateChain,
    root_ca_crl: &CrlStore,
    intermediate_crl: &CrlStore,
    trusted_root: &Certificate,
    tcb_info: &TcbInfo,
    qe_identity: &EnclaveIdentityV2,
    expiration_date: u64,
) -> Status {
    QuoteVerifier::new().verify(
        raw_quote,
        pck_chain,
        tcb_signing_chain,
        root_ca_crl,
        intermediate_crl,
        trusted_root,
        tcb_info,
        qe_identity,
        expiration_date,
    )
}
