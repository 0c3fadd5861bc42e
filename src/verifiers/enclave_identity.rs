//! Enclave Identity collateral verification.

use log::error;

use crate::chain::CertificateChain;
use crate::crl::CrlStore;
use crate::enclave_identity::EnclaveIdentityV2;
use crate::status::Status;
use crate::verifiers::common::{CommonVerification, CommonVerifier};
use crate::verifiers::tcb_signing::{TcbSigningChain, TcbSigningChainVerification};
use crate::x509::Certificate;

/// Verifies an Enclave Identity document against its signing chain, the
/// root CRL, a trusted root and an expiration instant. Same shape as the
/// TCB Info verifier, with the identity's own status kinds.
#[derive(Clone, Debug, Default)]
pub struct EnclaveIdentityVerifier<V = CommonVerifier, S = TcbSigningChain> {
    common: V,
    signing_chain: S,
}

impl EnclaveIdentityVerifier {
    pub fn new() -> Self {
        Self::with_collaborators(CommonVerifier::new(), TcbSigningChain::new())
    }
}

impl<V: CommonVerification, S: TcbSigningChainVerification> EnclaveIdentityVerifier<V, S> {
    pub fn with_collaborators(common: V, signing_chain: S) -> Self {
        EnclaveIdentityVerifier {
            common,
            signing_chain,
        }
    }

    pub fn verify(
        &self,
        identity: &EnclaveIdentityV2,
        chain: &CertificateChain,
        root_ca_crl: &CrlStore,
        trusted_root: &Certificate,
        expiration_date: u64,
    ) -> Status {
        if identity.version() != 2 {
            error!("Unsupported enclave identity version: {}", identity.version());
            return Status::SgxEnclaveIdentityUnsupportedVersion;
        }

        let chain_status = self.signing_chain.verify(chain, root_ca_crl, trusted_root);
        if !chain_status.is_ok() {
            return chain_status;
        }

        let Some(tcb_signing) = chain.tcb_signing_cert() else {
            return Status::SgxTcbSigningCertMissing;
        };

        if !self.common.check_sha256_ecdsa_signature(
            identity.signature(),
            identity.body(),
            tcb_signing.public_key(),
        ) {
            error!("Enclave identity signature verification failure");
            return Status::SgxEnclaveIdentityInvalidSignature;
        }

        let signing_not_after = tcb_signing.validity().not_after();
        if expiration_date > signing_not_after {
            error!(
                "TCB signing certificate is expired. Expiration date: {expiration_date}, validity: {signing_not_after}"
            );
            return Status::SgxSigningCertChainExpired;
        }

        let Some(root) = chain.root_cert() else {
            return Status::SgxRootCaMissing;
        };
        let root_not_after = root.validity().not_after();
        if expiration_date > root_not_after {
            error!(
                "TCB signing chain root CA is expired. Expiration date: {expiration_date}, validity: {root_not_after}"
            );
            return Status::SgxSigningCertChainExpired;
        }

        if root_ca_crl.expired(expiration_date) {
            error!(
                "Root CA CRL is expired. Expiration date: {expiration_date}, validity range: {} to {}",
                root_ca_crl.not_before_time(),
                root_ca_crl.not_after_time()
            );
            return Status::SgxCrlExpired;
        }

        if expiration_date > identity.next_update() {
            error!(
                "Enclave identity is expired. Expiration date: {expiration_date}, next update: {}",
                identity.next_update()
            );
            return Status::SgxEnclaveIdentityExpired;
        }

        Status::Ok
    }
}
