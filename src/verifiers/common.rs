//! Base predicates and the common certificate verifier.

use log::error;

use crate::crypto::{encode_as_der, CryptoProvider, P256Provider};
use crate::oids;
use crate::status::Status;
use crate::x509::{Certificate, DistinguishedName};

/// Stateless predicates shared by the chain verifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseVerifier;

impl BaseVerifier {
    /// Whether the CN component of a name contains the given phrase.
    pub fn common_name_contains(&self, name: &DistinguishedName, phrase: &str) -> bool {
        name.common_name()
            .map(|cn| cn.contains(phrase))
            .unwrap_or(false)
    }

    pub fn is_self_signed(&self, certificate: &Certificate) -> bool {
        certificate.subject() == certificate.issuer()
    }
}

/// Certificate-level verification capability, injected into the chain
/// verifiers so they can be unit-tested against mocks.
pub trait CommonVerification {
    fn verify_root_ca_cert(&self, root: &Certificate) -> Status;
    fn verify_intermediate(&self, intermediate: &Certificate, root: &Certificate) -> Status;
    /// Whether `certificate` is signed by `issuer`'s key.
    fn check_signature(&self, certificate: &Certificate, issuer: &Certificate) -> bool;
    /// Whether `signature` (raw `r‖s` or DER) verifies over the SHA-256
    /// digest of `body` under the given uncompressed public key.
    fn check_sha256_ecdsa_signature(
        &self,
        signature: &[u8],
        body: &[u8],
        public_key: &[u8],
    ) -> bool;
}

/// Default implementation over a [`CryptoProvider`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CommonVerifier<C: CryptoProvider = P256Provider> {
    crypto: C,
    base: BaseVerifier,
}

impl CommonVerifier {
    pub fn new() -> Self {
        Self::with_provider(P256Provider)
    }
}

impl<C: CryptoProvider> CommonVerifier<C> {
    pub fn with_provider(crypto: C) -> Self {
        CommonVerifier {
            crypto,
            base: BaseVerifier,
        }
    }

    fn has_standard_ca_extensions(&self, certificate: &Certificate) -> bool {
        certificate.has_extension(&oids::KEY_USAGE)
            && certificate.has_extension(&oids::BASIC_CONSTRAINTS)
    }
}

impl<C: CryptoProvider> CommonVerification for CommonVerifier<C> {
    fn verify_root_ca_cert(&self, root: &Certificate) -> Status {
        if !self.has_standard_ca_extensions(root) {
            error!("Root CA is missing required key-usage or basic-constraints extensions");
            return Status::SgxRootCaInvalidExtensions;
        }
        if !self.base.is_self_signed(root) {
            error!("Root CA subject does not match its issuer");
            return Status::SgxRootCaInvalidIssuer;
        }
        if !self.check_signature(root, root) {
            error!("Root CA self-signature is invalid");
            return Status::SgxRootCaInvalidIssuer;
        }
        Status::Ok
    }

    fn verify_intermediate(&self, intermediate: &Certificate, root: &Certificate) -> Status {
        if !self.has_standard_ca_extensions(intermediate) {
            error!("Intermediate CA is missing required key-usage or basic-constraints extensions");
            return Status::SgxIntermediateCaInvalidExtensions;
        }
        if intermediate.issuer() != root.subject() {
            error!("Intermediate CA issuer does not match the root subject");
            return Status::SgxIntermediateCaInvalidIssuer;
        }
        if !self.check_signature(intermediate, root) {
            error!("Intermediate CA signature is invalid");
            return Status::SgxIntermediateCaInvalidIssuer;
        }
        Status::Ok
    }

    fn check_signature(&self, certificate: &Certificate, issuer: &Certificate) -> bool {
        self.crypto.verify_sha256_ecdsa(
            issuer.public_key(),
            certificate.tbs(),
            certificate.signature().raw_der(),
        )
    }

    fn check_sha256_ecdsa_signature(
        &self,
        signature: &[u8],
        body: &[u8],
        public_key: &[u8],
    ) -> bool {
        // Collateral signatures arrive as raw r‖s; X.509 ones as DER.
        let der;
        let signature = if signature.len() == 64 {
            der = match encode_as_der(signature) {
                Ok(der) => der,
                Err(_) => return false,
            };
            &der[..]
        } else {
            signature
        };
        self.crypto.verify_sha256_ecdsa(public_key, body, signature)
    }
}
