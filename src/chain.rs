//! Certificate chain classification.
//!
//! A chain arrives as a concatenated PEM bundle in no particular order.
//! Each certificate is classified into a slot by the CN phrase of its
//! subject: the root CA, an intermediate CA, the PCK leaf, or the TCB
//! signing certificate. A slot may be filled at most once, and every
//! certificate must land in a slot; anything else fails construction.

use crate::constants::{
    SGX_INTERMEDIATE_CN_PHRASE, SGX_PCK_CN_PHRASE, SGX_ROOT_CA_CN_PHRASE,
    SGX_TCB_SIGNING_CN_PHRASE,
};
use crate::error::ParseError;
use crate::pck::PckCertificate;
use crate::x509::Certificate;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CertificateChain {
    root: Option<Certificate>,
    intermediate: Option<Certificate>,
    pck: Option<PckCertificate>,
    tcb_signing: Option<Certificate>,
}

impl CertificateChain {
    /// Parse a concatenated PEM bundle and classify each certificate.
    pub fn parse(pem_bundle: &str) -> Result<Self, ParseError> {
        let der_certs = crate::x509::extract_der_certs(pem_bundle)?;
        if der_certs.is_empty() {
            return Err(ParseError::InvalidChain("no certificates found".into()));
        }

        let mut chain = CertificateChain::default();
        for der in &der_certs {
            let certificate = Certificate::from_der(der)?;
            chain.place(certificate)?;
        }
        Ok(chain)
    }

    fn place(&mut self, certificate: Certificate) -> Result<(), ParseError> {
        let cn = certificate.subject().common_name().unwrap_or_default().to_string();

        if cn.contains(SGX_ROOT_CA_CN_PHRASE) {
            Self::fill(&mut self.root, certificate, "root CA")
        } else if cn.contains(SGX_PCK_CN_PHRASE) {
            let pck = PckCertificate::from_certificate(certificate)?;
            if self.pck.replace(pck).is_some() {
                return Err(ParseError::InvalidChain("duplicate PCK certificate".into()));
            }
            Ok(())
        } else if cn.contains(SGX_TCB_SIGNING_CN_PHRASE) {
            Self::fill(&mut self.tcb_signing, certificate, "TCB signing certificate")
        } else if cn.contains(SGX_INTERMEDIATE_CN_PHRASE) {
            Self::fill(&mut self.intermediate, certificate, "intermediate CA")
        } else {
            Err(ParseError::InvalidChain(format!(
                "unclassified certificate with CN '{cn}'"
            )))
        }
    }

    fn fill(
        slot: &mut Option<Certificate>,
        certificate: Certificate,
        what: &str,
    ) -> Result<(), ParseError> {
        if slot.replace(certificate).is_some() {
            return Err(ParseError::InvalidChain(format!("duplicate {what}")));
        }
        Ok(())
    }

    pub fn root_cert(&self) -> Option<&Certificate> {
        self.root.as_ref()
    }

    pub fn intermediate_cert(&self) -> Option<&Certificate> {
        self.intermediate.as_ref()
    }

    pub fn pck_cert(&self) -> Option<&PckCertificate> {
        self.pck.as_ref()
    }

    pub fn tcb_signing_cert(&self) -> Option<&Certificate> {
        self.tcb_signing.as_ref()
    }

    /// The certificate farthest from the root, for chains without a PCK
    /// slot (a TCB signing chain's topmost certificate is the signer).
    pub fn topmost_cert(&self) -> Option<&Certificate> {
        self.pck
            .as_ref()
            .map(PckCertificate::certificate)
            .or(self.tcb_signing.as_ref())
            .or(self.intermediate.as_ref())
            .or(self.root.as_ref())
    }
}
