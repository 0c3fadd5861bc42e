//! Certificate revocation lists.
//!
//! A [`CrlStore`] keeps the pieces the verifiers consult: issuer name,
//! validity window, the revoked serial set, the CRL extensions and the
//! signed bytes. Revocation is a plain serial-number membership test; the
//! CRL's own authenticity is established separately by the CRL verifier.

use anyhow::{bail, Context, Result};
use der::Decode;
use x509_cert::crl::CertificateList;

use crate::error::ParseError;
use crate::x509::{
    extract_first_sequence_element, Certificate, DistinguishedName, Extension, Signature,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrlStore {
    issuer: DistinguishedName,
    not_before: u64,
    not_after: u64,
    revoked_serials: Vec<Vec<u8>>,
    extensions: Vec<Extension>,
    signature: Signature,
    tbs: Vec<u8>,
}

impl CrlStore {
    /// Parse a PEM-encoded CRL.
    pub fn parse(pem_input: &str) -> Result<Self, ParseError> {
        let block = pem::parse(pem_input).map_err(ParseError::pem)?;
        Self::from_der(block.contents())
    }

    /// Parse a DER-encoded CRL.
    pub fn from_der(der_encoded: &[u8]) -> Result<Self, ParseError> {
        parse_crl(der_encoded).map_err(ParseError::der)
    }

    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    /// `thisUpdate`, seconds since the Unix epoch.
    pub fn not_before_time(&self) -> u64 {
        self.not_before
    }

    /// `nextUpdate`, seconds since the Unix epoch.
    pub fn not_after_time(&self) -> u64 {
        self.not_after
    }

    /// Whether the CRL is no longer current at the given instant.
    pub fn expired(&self, at: u64) -> bool {
        at > self.not_after
    }

    /// Whether the certificate's serial number is listed as revoked.
    pub fn is_revoked(&self, certificate: &Certificate) -> bool {
        self.revoked_serials
            .iter()
            .any(|serial| serial == certificate.serial_number())
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn has_extension(&self, oid: &const_oid::ObjectIdentifier) -> bool {
        let dotted = oid.to_string();
        self.extensions.iter().any(|e| e.oid == dotted)
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The `tbsCertList` bytes the signature covers.
    pub fn tbs(&self) -> &[u8] {
        &self.tbs
    }
}

fn parse_crl(der_encoded: &[u8]) -> Result<CrlStore> {
    let crl =
        CertificateList::from_der(der_encoded).context("Failed to decode CRL")?;
    let (tbs, _) = extract_first_sequence_element(der_encoded)?;

    let tbs_list = &crl.tbs_cert_list;
    let issuer = DistinguishedName::from_name(&tbs_list.issuer)?;

    let not_before = time_secs(&tbs_list.this_update);
    let Some(next_update) = &tbs_list.next_update else {
        bail!("CRL nextUpdate is missing");
    };
    let not_after = time_secs(next_update);

    let revoked_serials = tbs_list
        .revoked_certificates
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|entry| entry.serial_number.as_bytes().to_vec())
        .collect();

    let extensions = tbs_list
        .crl_extensions
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|e| Extension {
            oid: e.extn_id.to_string(),
            critical: e.critical,
            value: e.extn_value.as_bytes().to_vec(),
        })
        .collect();

    Ok(CrlStore {
        issuer,
        not_before,
        not_after,
        revoked_serials,
        extensions,
        signature: Signature::from_raw_der(crl.signature.raw_bytes().to_vec()),
        tbs,
    })
}

fn time_secs(time: &x509_cert::time::Time) -> u64 {
    match time {
        x509_cert::time::Time::UtcTime(t) => t.to_unix_duration().as_secs(),
        x509_cert::time::Time::GeneralTime(t) => t.to_unix_duration().as_secs(),
    }
}
