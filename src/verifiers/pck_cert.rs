//! PCK certificate chain verification.

use log::error;

use crate::chain::CertificateChain;
use crate::constants::{SGX_INTERMEDIATE_CN_PHRASE, SGX_PCK_CN_PHRASE, SGX_ROOT_CA_CN_PHRASE};
use crate::crl::CrlStore;
use crate::pck::PckCertificate;
use crate::status::Status;
use crate::verifiers::common::{BaseVerifier, CommonVerification, CommonVerifier};
use crate::verifiers::crl::{CrlVerification, PckCrlVerifier};
use crate::x509::Certificate;

/// Verifies a Root / Intermediate / PCK chain against its CRLs and an
/// externally trusted root certificate.
///
/// The check order is contractual: slot presence and CN classification,
/// then per-certificate integrity, then trust anchoring, then CRL
/// correctness, then revocation, then expiration. The first violated rule
/// decides the status.
#[derive(Clone, Debug, Default)]
pub struct PckCertVerifier<V = CommonVerifier, R = PckCrlVerifier> {
    common: V,
    crl_verifier: R,
    base: BaseVerifier,
}

impl PckCertVerifier {
    pub fn new() -> Self {
        Self::with_collaborators(CommonVerifier::new(), PckCrlVerifier::new())
    }
}

impl<V: CommonVerification, R: CrlVerification> PckCertVerifier<V, R> {
    pub fn with_collaborators(common: V, crl_verifier: R) -> Self {
        PckCertVerifier {
            common,
            crl_verifier,
            base: BaseVerifier,
        }
    }

    pub fn verify(
        &self,
        chain: &CertificateChain,
        root_ca_crl: &CrlStore,
        intermediate_crl: &CrlStore,
        trusted_root: &Certificate,
        expiration_date: u64,
    ) -> Status {
        let Some(root) = chain.root_cert() else {
            error!("ROOT CA is missing");
            return Status::SgxRootCaMissing;
        };
        if !self.base.common_name_contains(root.subject(), SGX_ROOT_CA_CN_PHRASE) {
            error!("Root CA CN does not contain the '{SGX_ROOT_CA_CN_PHRASE}' phrase");
            return Status::SgxRootCaMissing;
        }

        let Some(intermediate) = chain.intermediate_cert() else {
            error!("Intermediate CA is missing");
            return Status::SgxIntermediateCaMissing;
        };
        if !self
            .base
            .common_name_contains(intermediate.subject(), SGX_INTERMEDIATE_CN_PHRASE)
        {
            error!("Intermediate CA CN does not contain the '{SGX_INTERMEDIATE_CN_PHRASE}' phrase");
            return Status::SgxIntermediateCaMissing;
        }

        let Some(pck) = chain.pck_cert() else {
            error!("PCK cert is missing");
            return Status::SgxPckMissing;
        };
        if !self
            .base
            .common_name_contains(pck.certificate().subject(), SGX_PCK_CN_PHRASE)
        {
            error!("PCK cert CN does not contain the '{SGX_PCK_CN_PHRASE}' phrase");
            return Status::SgxPckMissing;
        }

        let root_status = self.common.verify_root_ca_cert(root);
        if !root_status.is_ok() {
            error!("Root CA verification failed: {root_status}");
            return root_status;
        }

        let intermediate_status = self.common.verify_intermediate(intermediate, root);
        if !intermediate_status.is_ok() {
            error!("Intermediate CA verification failed: {intermediate_status}");
            return intermediate_status;
        }

        let pck_status = self.verify_pck_cert(pck, intermediate);
        if !pck_status.is_ok() {
            error!("PCK certificate verification failed: {pck_status}");
            return pck_status;
        }

        if trusted_root.subject() != trusted_root.issuer() {
            error!("Trusted root CA is not self signed");
            return Status::TrustedRootCaInvalid;
        }

        // Trust anchoring is raw-byte equality of the two signatures: it
        // proves both refer to the same root object, not merely to
        // equivalent names.
        if root.signature().raw_der() != trusted_root.signature().raw_der() {
            error!("Signature of the trusted root does not match the chain root; chain is not trusted");
            return Status::SgxPckCertChainUntrusted;
        }

        let root_crl_status = self.crl_verifier.verify(root_ca_crl, root);
        if !root_crl_status.is_ok() {
            error!("Root CA CRL verification failed: {root_crl_status}");
            return root_crl_status;
        }

        let intermediate_crl_status = self.crl_verifier.verify(intermediate_crl, intermediate);
        if !intermediate_crl_status.is_ok() {
            error!("Intermediate CA CRL verification failed: {intermediate_crl_status}");
            return intermediate_crl_status;
        }

        if root_ca_crl.is_revoked(intermediate) {
            error!("Intermediate CA certificate is revoked by the root CA");
            return Status::SgxIntermediateCaRevoked;
        }

        if intermediate_crl.is_revoked(pck.certificate()) {
            error!("PCK certificate is revoked by the intermediate CA");
            return Status::SgxPckRevoked;
        }

        for (what, certificate) in [
            ("Root CA", root),
            ("Intermediate CA", intermediate),
            ("PCK cert", pck.certificate()),
        ] {
            let not_after = certificate.validity().not_after();
            if expiration_date > not_after {
                error!(
                    "PCK cert chain {what} is expired. Expiration date: {expiration_date}, validity: {not_after}"
                );
                return Status::SgxPckCertChainExpired;
            }
        }

        if root_ca_crl.expired(expiration_date) {
            error!(
                "Root CA CRL is expired. Expiration date: {expiration_date}, validity range: {} to {}",
                root_ca_crl.not_before_time(),
                root_ca_crl.not_after_time()
            );
            return Status::SgxCrlExpired;
        }

        if intermediate_crl.expired(expiration_date) {
            error!(
                "Intermediate CA CRL is expired. Expiration date: {expiration_date}, validity range: {} to {}",
                intermediate_crl.not_before_time(),
                intermediate_crl.not_after_time()
            );
            return Status::SgxCrlExpired;
        }

        Status::Ok
    }

    fn verify_pck_cert(&self, pck: &PckCertificate, intermediate: &Certificate) -> Status {
        if pck.certificate().issuer() != intermediate.subject() {
            error!("PCK cert is not issued by the intermediate CA");
            return Status::SgxPckInvalidIssuer;
        }
        if !self.common.check_signature(pck.certificate(), intermediate) {
            error!("PCK cert signature is invalid");
            return Status::SgxPckInvalidIssuer;
        }
        Status::Ok
    }
}
