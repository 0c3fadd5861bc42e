//! X.509 certificate value objects.
//!
//! Certificates are parsed once into immutable values carrying every field
//! the verifiers look at: distinguished names, the validity window, the
//! uncompressed EC public key, the raw DER signature and the TBS bytes the
//! signature covers. The heavy lifting is delegated to `x509-cert`; only
//! the TBS slice is carved out of the raw DER by hand so that signature
//! checks operate on the exact bytes that were signed.

use anyhow::{bail, Context, Result};
use der::{Decode, Encode};
use x509_cert::Certificate as X509Certificate;

use crate::error::ParseError;
use crate::oids;

/// An X.500 distinguished name. Equality is over the DER encoding, so two
/// names compare equal exactly when their encoded bytes match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistinguishedName {
    raw: Vec<u8>,
    text: String,
    common_name: Option<String>,
}

impl DistinguishedName {
    pub(crate) fn from_name(name: &x509_cert::name::Name) -> Result<Self> {
        let raw = name.to_der().context("Failed to encode name")?;
        let mut common_name = None;
        for rdn in name.0.iter() {
            for atv in rdn.0.iter() {
                if atv.oid == oids::COMMON_NAME {
                    common_name = attribute_string(&atv.value);
                }
            }
        }
        Ok(DistinguishedName {
            raw,
            text: name.to_string(),
            common_name,
        })
    }

    /// DER encoding of the name.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// RFC 4514 string form, for diagnostics.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The CN component, if one is present.
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }
}

fn attribute_string(value: &der::Any) -> Option<String> {
    if let Ok(s) = value.decode_as::<der::asn1::Utf8StringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<der::asn1::PrintableStringRef<'_>>() {
        return Some(s.to_string());
    }
    None
}

/// Certificate validity window, in seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    not_before: u64,
    not_after: u64,
}

impl Validity {
    pub fn not_before(&self) -> u64 {
        self.not_before
    }

    pub fn not_after(&self) -> u64 {
        self.not_after
    }

    /// Whether the window covers the given instant.
    pub fn contains(&self, at: u64) -> bool {
        self.not_before <= at && at <= self.not_after
    }
}

/// A single X.509 extension, OID rendered in dotted form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension {
    pub oid: String,
    pub critical: bool,
    pub value: Vec<u8>,
}

/// A certificate signature. The raw DER bytes (the full `Ecdsa-Sig-Value`
/// as it appears inside the BIT STRING) are kept verbatim: trust anchoring
/// compares these bytes directly, which catches re-encoded signatures that
/// a parsed comparison would miss.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    raw_der: Vec<u8>,
}

impl Signature {
    pub(crate) fn from_raw_der(raw_der: Vec<u8>) -> Self {
        Signature { raw_der }
    }

    pub fn raw_der(&self) -> &[u8] {
        &self.raw_der
    }
}

/// A parsed X.509 certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    version: u32,
    serial_number: Vec<u8>,
    subject: DistinguishedName,
    issuer: DistinguishedName,
    validity: Validity,
    public_key: Vec<u8>,
    signature: Signature,
    extensions: Vec<Extension>,
    tbs: Vec<u8>,
    der: Vec<u8>,
}

impl Certificate {
    /// Parse a single PEM-encoded certificate.
    pub fn parse(pem_input: &str) -> Result<Self, ParseError> {
        let block = pem::parse(pem_input).map_err(ParseError::pem)?;
        Self::from_der(block.contents())
    }

    /// Parse a DER-encoded certificate.
    pub fn from_der(der_encoded: &[u8]) -> Result<Self, ParseError> {
        parse_certificate(der_encoded).map_err(ParseError::der)
    }

    /// X.509 version number as displayed (v3 certificates report 3).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Serial number content bytes, big endian.
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number
    }

    pub fn subject(&self) -> &DistinguishedName {
        &self.subject
    }

    pub fn issuer(&self) -> &DistinguishedName {
        &self.issuer
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Uncompressed SEC1 EC point bytes of the subject public key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn has_extension(&self, oid: &const_oid::ObjectIdentifier) -> bool {
        let dotted = oid.to_string();
        self.extensions.iter().any(|e| e.oid == dotted)
    }

    /// The `tbsCertificate` bytes the signature covers.
    pub fn tbs(&self) -> &[u8] {
        &self.tbs
    }

    /// The full DER encoding this certificate was parsed from.
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

fn parse_certificate(der_encoded: &[u8]) -> Result<Certificate> {
    let cert: X509Certificate =
        X509Certificate::from_der(der_encoded).context("Failed to decode certificate")?;
    let (tbs, _) = extract_first_sequence_element(der_encoded)?;

    let tbs_cert = &cert.tbs_certificate;
    let subject = DistinguishedName::from_name(&tbs_cert.subject)?;
    let issuer = DistinguishedName::from_name(&tbs_cert.issuer)?;

    let not_before = time_secs(&tbs_cert.validity.not_before);
    let not_after = time_secs(&tbs_cert.validity.not_after);
    if not_before >= not_after {
        bail!("Certificate validity window is empty");
    }

    let extensions = tbs_cert
        .extensions
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|e| Extension {
            oid: e.extn_id.to_string(),
            critical: e.critical,
            value: e.extn_value.as_bytes().to_vec(),
        })
        .collect();

    Ok(Certificate {
        version: tbs_cert.version as u32 + 1,
        serial_number: tbs_cert.serial_number.as_bytes().to_vec(),
        subject,
        issuer,
        validity: Validity {
            not_before,
            not_after,
        },
        public_key: tbs_cert
            .subject_public_key_info
            .subject_public_key
            .raw_bytes()
            .to_vec(),
        signature: Signature {
            raw_der: cert.signature.raw_bytes().to_vec(),
        },
        extensions,
        tbs,
        der: der_encoded.to_vec(),
    })
}

fn time_secs(time: &x509_cert::time::Time) -> u64 {
    match time {
        x509_cert::time::Time::UtcTime(t) => t.to_unix_duration().as_secs(),
        x509_cert::time::Time::GeneralTime(t) => t.to_unix_duration().as_secs(),
    }
}

/// Parse a DER length octet sequence, returning `(length, bytes_consumed)`.
pub(crate) fn parse_der_length(data: &[u8]) -> Result<(usize, usize)> {
    if data.is_empty() {
        bail!("Empty data for DER length");
    }
    let first = data[0];
    if first < 0x80 {
        Ok((first as usize, 1))
    } else if first == 0x80 {
        bail!("Indefinite length not supported");
    } else {
        let num_bytes = (first & 0x7F) as usize;
        if num_bytes > 4 || data.len() < 1 + num_bytes {
            bail!("Invalid DER length encoding");
        }
        let mut length = 0usize;
        for i in 0..num_bytes {
            length = (length << 8) | (data[1 + i] as usize);
        }
        Ok((length, 1 + num_bytes))
    }
}

/// Extract the first element of an outer DER SEQUENCE, with its header.
/// For certificates and CRLs this is the to-be-signed structure.
pub(crate) fn extract_first_sequence_element(data: &[u8]) -> Result<(Vec<u8>, usize)> {
    if data.is_empty() || data[0] != 0x30 {
        bail!("Expected SEQUENCE");
    }

    let (_outer_len, outer_len_bytes) = parse_der_length(&data[1..])?;
    let content_start = 1 + outer_len_bytes;

    let tbs_data = data.get(content_start..).unwrap_or(&[]);
    if tbs_data.is_empty() || tbs_data[0] != 0x30 {
        bail!("Expected TBS SEQUENCE");
    }

    let (tbs_len, tbs_len_bytes) = parse_der_length(&tbs_data[1..])?;
    let tbs_total_len = 1 + tbs_len_bytes + tbs_len;
    if tbs_data.len() < tbs_total_len {
        bail!("Truncated TBS SEQUENCE");
    }

    Ok((
        tbs_data[..tbs_total_len].to_vec(),
        content_start + tbs_total_len,
    ))
}

/// Split a concatenated PEM bundle into DER certificates, in input order.
pub(crate) fn extract_der_certs(pem_bundle: &str) -> Result<Vec<Vec<u8>>, ParseError> {
    let blocks = pem::parse_many(pem_bundle).map_err(ParseError::pem)?;
    Ok(blocks.iter().map(|b| b.contents().to_vec()).collect())
}
