//! Top-level quote verification.
//!
//! Composes the chain and collateral verifiers, then checks the quote
//! itself: the QE report's binding to the attestation key, the quote
//! signature over the quote body, TCB level selection against the PCK's
//! SVNs, and the QE report's match against the enclave identity. When
//! every check passes the result is the selected TCB level's status,
//! which may still be a degraded-but-valid value such as
//! `STATUS_TCB_OUT_OF_DATE`.

use log::{debug, error};
use scale::Decode;
use sha2::{Digest, Sha256};

use crate::chain::CertificateChain;
use crate::constants::{
    ATTESTATION_KEY_TYPE_ECDSA256_WITH_P256_CURVE, ECDSA_PUBKEY_BYTE_LEN,
    ENCLAVE_REPORT_DATA_BYTE_LEN, PCK_ID_PCK_CERT_CHAIN,
};
use crate::crl::CrlStore;
use crate::enclave_identity::EnclaveIdentityV2;
use crate::pck::PckCertificate;
use crate::quote::{AuthDataV3, EnclaveReport, Quote};
use crate::status::Status;
use crate::tcb_info::{TcbInfo, TcbLevelStatus};
use crate::verifiers::common::{CommonVerification, CommonVerifier};
use crate::verifiers::enclave_identity::EnclaveIdentityVerifier;
use crate::verifiers::pck_cert::PckCertVerifier;
use crate::verifiers::tcb_info::TcbInfoVerifier;
use crate::x509::Certificate;

#[derive(Clone, Debug, Default)]
pub struct QuoteVerifier<V = CommonVerifier> {
    common: V,
    pck_verifier: PckCertVerifier,
    tcb_info_verifier: TcbInfoVerifier,
    identity_verifier: EnclaveIdentityVerifier,
}

impl QuoteVerifier {
    pub fn new() -> Self {
        Self::with_common(CommonVerifier::new())
    }
}

impl<V: CommonVerification> QuoteVerifier<V> {
    pub fn with_common(common: V) -> Self {
        QuoteVerifier {
            common,
            pck_verifier: PckCertVerifier::new(),
            tcb_info_verifier: TcbInfoVerifier::new(),
            identity_verifier: EnclaveIdentityVerifier::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn verify(
        &self,
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
        let Ok(quote) = Quote::parse(raw_quote) else {
            error!("Failed to decode quote");
            return Status::UnsupportedQuoteFormat;
        };
        if quote.header.attestation_key_type != ATTESTATION_KEY_TYPE_ECDSA256_WITH_P256_CURVE {
            error!("Unsupported attestation key type");
            return Status::UnsupportedQuoteFormat;
        }

        let pck_chain_status = self.pck_verifier.verify(
            pck_chain,
            root_ca_crl,
            intermediate_crl,
            trusted_root,
            expiration_date,
        );
        if !pck_chain_status.is_ok() {
            error!("PCK certificate chain verification failed: {pck_chain_status}");
            return pck_chain_status;
        }

        let tcb_info_status = self.tcb_info_verifier.verify(
            tcb_info,
            tcb_signing_chain,
            root_ca_crl,
            trusted_root,
            expiration_date,
        );
        if !tcb_info_status.is_ok() {
            error!("TCB Info verification failed: {tcb_info_status}");
            return tcb_info_status;
        }

        let identity_status = self.identity_verifier.verify(
            qe_identity,
            tcb_signing_chain,
            root_ca_crl,
            trusted_root,
            expiration_date,
        );
        if !identity_status.is_ok() {
            error!("Enclave identity verification failed: {identity_status}");
            return identity_status;
        }

        let Some(pck) = pck_chain.pck_cert() else {
            return Status::SgxPckMissing;
        };

        if pck.fmspc() != tcb_info.fmspc() {
            error!("PCK FMSPC does not match TCB Info FMSPC");
            return Status::TcbInfoMismatch;
        }
        if pck.pce_id() != tcb_info.pce_id() {
            error!("PCK PCEID does not match TCB Info PCEID");
            return Status::TcbInfoMismatch;
        }

        if let Err(status) = check_certification_data(&quote, pck) {
            return status;
        }

        let auth_data = &quote.auth_data;
        if !self.common.check_sha256_ecdsa_signature(
            &auth_data.qe_report_signature,
            &auth_data.qe_report,
            pck.certificate().public_key(),
        ) {
            error!("QE report signature is invalid");
            return Status::InvalidQeReportSignature;
        }

        let Ok(qe_report) = EnclaveReport::decode(&mut &auth_data.qe_report[..]) else {
            error!("Failed to decode QE report");
            return Status::SgxEnclaveReportUnsupportedFormat;
        };

        if !verify_qe_report_data(&qe_report, auth_data) {
            error!("QE report data does not bind the attestation key");
            return Status::InvalidQeReportData;
        }

        let Some(signed_body) = raw_quote.get(..quote.signed_length()) else {
            return Status::UnsupportedQuoteFormat;
        };
        let mut attestation_key = [0x04u8; 1 + ECDSA_PUBKEY_BYTE_LEN];
        attestation_key[1..].copy_from_slice(&auth_data.ecdsa_attestation_key);
        if !self.common.check_sha256_ecdsa_signature(
            &auth_data.ecdsa_signature,
            signed_body,
            &attestation_key,
        ) {
            error!("Quote signature is invalid");
            return Status::InvalidQuoteSignature;
        }

        let tcb_level_status = select_tcb_level(tcb_info, pck);
        if !tcb_level_status.is_tcb_level_status() {
            error!("TCB level selection failed: {tcb_level_status}");
            return tcb_level_status;
        }

        if qe_identity.data().id != "QE" {
            error!("Enclave identity id '{}' is not a QE identity", qe_identity.data().id);
            return Status::QeIdentityMismatch;
        }

        let report_status = verify_enclave_report(qe_identity, &qe_report);
        if !report_status.is_ok() {
            error!("QE report does not match the enclave identity: {report_status}");
            return report_status;
        }

        debug!("Quote verification finished with {tcb_level_status}");
        tcb_level_status
    }
}

fn check_certification_data(quote: &Quote, pck: &PckCertificate) -> Result<(), Status> {
    let cert_data = &quote.auth_data.certification_data;
    if cert_data.cert_type != PCK_ID_PCK_CERT_CHAIN {
        error!(
            "Unsupported certification data type: {}",
            cert_data.cert_type
        );
        return Err(Status::UnsupportedQeCertificationDataType);
    }
    if cert_data.body.data.is_empty() {
        return Err(Status::InvalidQeCertificationDataSize);
    }
    let Ok(pem_bundle) = core::str::from_utf8(&cert_data.body.data) else {
        return Err(Status::UnsupportedQeCertification);
    };
    let Ok(quote_chain) = CertificateChain::parse(pem_bundle) else {
        return Err(Status::UnsupportedQeCertification);
    };
    let Some(quote_pck) = quote_chain.pck_cert() else {
        return Err(Status::UnsupportedQeCertification);
    };
    if quote_pck.certificate().der() != pck.certificate().der() {
        error!("PCK certificate does not match the quote's certification data");
        return Err(Status::PckCertMismatch);
    }
    Ok(())
}

fn verify_qe_report_data(qe_report: &EnclaveReport, auth_data: &AuthDataV3) -> bool {
    let mut hash_input =
        Vec::with_capacity(auth_data.ecdsa_attestation_key.len() + auth_data.qe_auth_data.data.len());
    hash_input.extend_from_slice(&auth_data.ecdsa_attestation_key);
    hash_input.extend_from_slice(&auth_data.qe_auth_data.data);
    let digest = Sha256::digest(&hash_input);

    let mut expected = [0u8; ENCLAVE_REPORT_DATA_BYTE_LEN];
    expected[..digest.len()].copy_from_slice(&digest);
    qe_report.report_data == expected
}

/// Walk the TCB levels in document order and select the first level whose
/// every component SVN and PCESVN are covered by the PCK's values.
fn select_tcb_level(tcb_info: &TcbInfo, pck: &PckCertificate) -> Status {
    let cpu_svn = pck.tcb().cpu_svn();
    let pce_svn = pck.tcb().pce_svn();

    for level in tcb_info.tcb_levels() {
        let given = level.tcb.sgx_components.len();
        if given != cpu_svn.len() {
            error!("TCB level carries {given} SGX components, expected {}", cpu_svn.len());
            return Status::UnsupportedTcbInfoFormat;
        }
    }

    match tcb_info.select_level(cpu_svn, pce_svn) {
        Some(level) => tcb_level_to_status(level.tcb_status),
        None => Status::TcbNotSupported,
    }
}

fn tcb_level_to_status(status: TcbLevelStatus) -> Status {
    match status {
        TcbLevelStatus::UpToDate => Status::Ok,
        TcbLevelStatus::SWHardeningNeeded => Status::TcbSwHardeningNeeded,
        TcbLevelStatus::ConfigurationNeeded => Status::TcbConfigurationNeeded,
        TcbLevelStatus::ConfigurationAndSWHardeningNeeded => {
            Status::TcbConfigurationAndSwHardeningNeeded
        }
        TcbLevelStatus::OutOfDate => Status::TcbOutOfDate,
        TcbLevelStatus::OutOfDateConfigurationNeeded => Status::TcbOutOfDateConfigurationNeeded,
        TcbLevelStatus::Revoked => Status::TcbRevoked,
        TcbLevelStatus::Unrecognized => Status::TcbUnrecognizedStatus,
    }
}

/// Match the QE report against the enclave identity: masked MISCSELECT and
/// ATTRIBUTES, MRENCLAVE when pinned, MRSIGNER, ISVPRODID, then the
/// ISVSVN-keyed TCB levels.
fn verify_enclave_report(identity: &EnclaveIdentityV2, qe_report: &EnclaveReport) -> Status {
    let data = identity.data();

    let miscselect_mask = u32::from_le_bytes(data.miscselect_mask);
    let expected_miscselect = u32::from_le_bytes(data.miscselect) & miscselect_mask;
    if qe_report.misc_select & miscselect_mask != expected_miscselect {
        return Status::SgxEnclaveReportMiscselectMismatch;
    }

    let attributes_match = data
        .attributes
        .iter()
        .zip(data.attributes_mask.iter())
        .zip(qe_report.attributes.iter())
        .all(|((&expected, &mask), &actual)| expected & mask == actual & mask);
    if !attributes_match {
        return Status::SgxEnclaveReportAttributesMismatch;
    }

    if let Some(mrenclave) = data.mrenclave {
        if mrenclave != qe_report.mr_enclave {
            return Status::SgxEnclaveReportMrenclaveMismatch;
        }
    }

    if data.mrsigner != qe_report.mr_signer {
        return Status::SgxEnclaveReportMrsignerMismatch;
    }

    if data.isvprodid != qe_report.isv_prod_id {
        return Status::SgxEnclaveReportIsvprodidMismatch;
    }

    for level in identity.tcb_levels() {
        if qe_report.isv_svn >= level.tcb.isvsvn {
            return match level.tcb_status {
                TcbLevelStatus::UpToDate => Status::Ok,
                TcbLevelStatus::Revoked => Status::SgxEnclaveReportIsvsvnRevoked,
                _ => Status::SgxEnclaveReportIsvsvnOutOfDate,
            };
        }
    }

    Status::SgxEnclaveReportIsvsvnOutOfDate
}
