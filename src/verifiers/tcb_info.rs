//! TCB Info collateral verification.

use log::error;

use crate::chain::CertificateChain;
use crate::crl::CrlStore;
use crate::status::Status;
use crate::tcb_info::TcbInfo;
use crate::verifiers::common::{CommonVerification, CommonVerifier};
use crate::verifiers::tcb_signing::{TcbSigningChain, TcbSigningChainVerification};
use crate::x509::Certificate;

/// Verifies a TCB Info document against its signing chain, the root CRL,
/// a trusted root and an expiration instant. The signature check consumes
/// the exact body bytes that were signed.
#[derive(Clone, Debug, Default)]
pub struct TcbInfoVerifier<V = CommonVerifier, S = TcbSigningChain> {
    common: V,
    signing_chain: S,
}

impl TcbInfoVerifier {
    pub fn new() -> Self {
        Self::with_collaborators(CommonVerifier::new(), TcbSigningChain::new())
    }
}

impl<V: CommonVerification, S: TcbSigningChainVerification> TcbInfoVerifier<V, S> {
    pub fn with_collaborators(common: V, signing_chain: S) -> Self {
        TcbInfoVerifier {
            common,
            signing_chain,
        }
    }

    pub fn verify(
        &self,
        tcb_info: &TcbInfo,
        chain: &CertificateChain,
        root_ca_crl: &CrlStore,
        trusted_root: &Certificate,
        expiration_date: u64,
    ) -> Status {
        let chain_status = self.signing_chain.verify(chain, root_ca_crl, trusted_root);
        if !chain_status.is_ok() {
            return chain_status;
        }

        let Some(tcb_signing) = chain.tcb_signing_cert() else {
            return Status::SgxTcbSigningCertMissing;
        };

        if !self.common.check_sha256_ecdsa_signature(
            tcb_info.signature(),
            tcb_info.body(),
            tcb_signing.public_key(),
        ) {
            error!("TCB Info signature verification failure");
            return Status::TcbInfoInvalidSignature;
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

        if expiration_date > tcb_info.next_update() {
            error!(
                "TCB Info is expired. Expiration date: {expiration_date}, next update: {}",
                tcb_info.next_update()
            );
            return Status::SgxTcbInfoExpired;
        }

        Status::Ok
    }
}
