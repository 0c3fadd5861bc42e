//! Revocation list verification.

use log::error;

use crate::crl::CrlStore;
use crate::crypto::{CryptoProvider, P256Provider};
use crate::oids;
use crate::status::Status;
use crate::x509::Certificate;

/// CRL verification capability, injected into the chain verifiers.
pub trait CrlVerification {
    /// Verify that `crl` was issued and signed by `issuer` and carries the
    /// mandatory X.509 v2 CRL extensions.
    fn verify(&self, crl: &CrlStore, issuer: &Certificate) -> Status;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PckCrlVerifier<C: CryptoProvider = P256Provider> {
    crypto: C,
}

impl PckCrlVerifier {
    pub fn new() -> Self {
        Self::with_provider(P256Provider)
    }
}

impl<C: CryptoProvider> PckCrlVerifier<C> {
    pub fn with_provider(crypto: C) -> Self {
        PckCrlVerifier { crypto }
    }
}

impl<C: CryptoProvider> CrlVerification for PckCrlVerifier<C> {
    fn verify(&self, crl: &CrlStore, issuer: &Certificate) -> Status {
        if crl.issuer() != issuer.subject() {
            error!(
                "CRL issuer '{}' does not match certificate subject '{}'",
                crl.issuer().text(),
                issuer.subject().text()
            );
            return Status::SgxCrlUnknownIssuer;
        }

        if !crl.has_extension(&oids::CRL_NUMBER)
            || !crl.has_extension(&oids::AUTHORITY_KEY_IDENTIFIER)
        {
            error!("CRL is missing mandatory v2 extensions");
            return Status::SgxCrlInvalidExtensions;
        }

        if !self
            .crypto
            .verify_sha256_ecdsa(issuer.public_key(), crl.tbs(), crl.signature().raw_der())
        {
            error!("CRL signature is invalid");
            return Status::SgxCrlInvalidSignature;
        }

        Status::Ok
    }
}
