//! TCB signing chain verification.

use log::error;

use crate::chain::CertificateChain;
use crate::constants::{SGX_ROOT_CA_CN_PHRASE, SGX_TCB_SIGNING_CN_PHRASE};
use crate::crl::CrlStore;
use crate::status::Status;
use crate::verifiers::common::{BaseVerifier, CommonVerification, CommonVerifier};
use crate::verifiers::crl::{CrlVerification, PckCrlVerifier};
use crate::x509::Certificate;

/// Verification capability over a two-certificate TCB signing chain,
/// injected into the collateral verifiers.
pub trait TcbSigningChainVerification {
    fn verify(
        &self,
        chain: &CertificateChain,
        root_ca_crl: &CrlStore,
        trusted_root: &Certificate,
    ) -> Status;
}

/// Verifies a Root / TCB-Signing chain: root integrity, issuance and
/// signature of the signing certificate, trust anchoring by raw signature
/// bytes, root CRL correctness and non-revocation of the signer.
#[derive(Clone, Debug, Default)]
pub struct TcbSigningChain<V = CommonVerifier, R = PckCrlVerifier> {
    common: V,
    crl_verifier: R,
    base: BaseVerifier,
}

impl TcbSigningChain {
    pub fn new() -> Self {
        Self::with_collaborators(CommonVerifier::new(), PckCrlVerifier::new())
    }
}

impl<V: CommonVerification, R: CrlVerification> TcbSigningChain<V, R> {
    pub fn with_collaborators(common: V, crl_verifier: R) -> Self {
        TcbSigningChain {
            common,
            crl_verifier,
            base: BaseVerifier,
        }
    }
}

impl<V: CommonVerification, R: CrlVerification> TcbSigningChainVerification
    for TcbSigningChain<V, R>
{
    fn verify(
        &self,
        chain: &CertificateChain,
        root_ca_crl: &CrlStore,
        trusted_root: &Certificate,
    ) -> Status {
        let Some(root) = chain.root_cert() else {
            error!("ROOT CA is missing");
            return Status::SgxRootCaMissing;
        };
        if !self.base.common_name_contains(root.subject(), SGX_ROOT_CA_CN_PHRASE) {
            error!("Root CA CN does not contain the '{SGX_ROOT_CA_CN_PHRASE}' phrase");
            return Status::SgxRootCaMissing;
        }

        let Some(tcb_signing) = chain.tcb_signing_cert() else {
            error!("TCB signing certificate is missing");
            return Status::SgxTcbSigningCertMissing;
        };
        if !self
            .base
            .common_name_contains(tcb_signing.subject(), SGX_TCB_SIGNING_CN_PHRASE)
        {
            error!("TCB signing cert CN does not contain the '{SGX_TCB_SIGNING_CN_PHRASE}' phrase");
            return Status::SgxTcbSigningCertMissing;
        }

        let root_status = self.common.verify_root_ca_cert(root);
        if !root_status.is_ok() {
            error!("Root CA verification failed: {root_status}");
            return root_status;
        }

        if tcb_signing.issuer() != root.subject() {
            error!("TCB signing certificate is not issued by the root CA");
            return Status::SgxTcbSigningCertInvalidIssuer;
        }
        if !self.common.check_signature(tcb_signing, root) {
            error!("TCB signing certificate signature is invalid");
            return Status::SgxTcbSigningCertInvalidIssuer;
        }

        if trusted_root.subject() != trusted_root.issuer() {
            error!("Trusted root CA is not self signed");
            return Status::TrustedRootCaInvalid;
        }

        if root.signature().raw_der() != trusted_root.signature().raw_der() {
            error!("Signature of the trusted root does not match the chain root; chain is not trusted");
            return Status::SgxTcbSigningCertChainUntrusted;
        }

        let crl_status = self.crl_verifier.verify(root_ca_crl, root);
        if !crl_status.is_ok() {
            error!("Root CA CRL verification failed: {crl_status}");
            return crl_status;
        }

        if root_ca_crl.is_revoked(tcb_signing) {
            error!("TCB signing certificate is revoked by the root CA");
            return Status::SgxTcbSigningCertRevoked;
        }

        Status::Ok
    }
}
