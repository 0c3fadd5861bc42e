//! PCK certificates and the Intel SGX X.509 extension.
//!
//! A PCK certificate is an ordinary X.509 certificate carrying the Intel
//! SGX extension: an ordered SEQUENCE of OID-tagged entries with the
//! platform's PPID, TCB (per-component SVNs, PCESVN, CPUSVN), PCEID, FMSPC
//! and SGX type. Processor-CA certificates carry exactly five entries;
//! platform-CA certificates add the platform instance id and the
//! configuration flags for a total of seven. Anything else fails parsing.

use anyhow::{anyhow, bail, Context, Result};
use asn1_der::{
    typed::{DerDecodable, Sequence},
    DerObject,
};
use const_oid::ObjectIdentifier;

use crate::constants::{PLATFORM_CA_EXTENSION_COUNT, PROCESSOR_CA_EXTENSION_COUNT};
use crate::error::ParseError;
use crate::oids;
use crate::x509::Certificate;

/// SGX platform type carried by the extension.
///
/// Ref: Intel SGX PCK Certificate and CRL Specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SgxType {
    Standard,
    Scalable,
    ScalableWithIntegrity,
}

impl TryFrom<u64> for SgxType {
    type Error = anyhow::Error;

    fn try_from(value: u64) -> Result<Self> {
        match value {
            0 => Ok(SgxType::Standard),
            1 => Ok(SgxType::Scalable),
            2 => Ok(SgxType::ScalableWithIntegrity),
            _ => bail!("Unknown SGX type: {value}"),
        }
    }
}

/// Which PCK certificate profile the extension matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PckVariant {
    Processor,
    Platform,
}

impl PckVariant {
    fn extension_count(self) -> usize {
        match self {
            PckVariant::Processor => PROCESSOR_CA_EXTENSION_COUNT,
            PckVariant::Platform => PLATFORM_CA_EXTENSION_COUNT,
        }
    }
}

/// The TCB record inside the SGX extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PckTcb {
    components: [u8; 16],
    pce_svn: u16,
    cpu_svn: [u8; 16],
}

impl PckTcb {
    /// The sixteen per-component SVN values.
    pub fn components(&self) -> &[u8; 16] {
        &self.components
    }

    pub fn pce_svn(&self) -> u16 {
        self.pce_svn
    }

    pub fn cpu_svn(&self) -> &[u8; 16] {
        &self.cpu_svn
    }
}

/// Platform-profile additions: instance id plus configuration flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformData {
    platform_instance_id: Vec<u8>,
    dynamic_platform: bool,
    cached_keys: bool,
    smt_enabled: bool,
}

impl PlatformData {
    pub fn platform_instance_id(&self) -> &[u8] {
        &self.platform_instance_id
    }

    pub fn dynamic_platform(&self) -> bool {
        self.dynamic_platform
    }

    pub fn cached_keys(&self) -> bool {
        self.cached_keys
    }

    pub fn smt_enabled(&self) -> bool {
        self.smt_enabled
    }
}

/// Parsed values of the Intel SGX extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SgxExtensions {
    ppid: Vec<u8>,
    tcb: PckTcb,
    pce_id: Vec<u8>,
    fmspc: Vec<u8>,
    sgx_type: SgxType,
    platform: Option<PlatformData>,
}

/// A certificate that carries a well-formed Intel SGX extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PckCertificate {
    certificate: Certificate,
    sgx: SgxExtensions,
}

impl PckCertificate {
    /// Parse a PEM certificate, accepting either PCK profile.
    pub fn parse(pem_input: &str) -> Result<Self, ParseError> {
        Self::from_certificate(Certificate::parse(pem_input)?)
    }

    /// Parse a PEM certificate that must match the processor profile
    /// (exactly five extension entries).
    pub fn parse_processor(pem_input: &str) -> Result<Self, ParseError> {
        Self::with_expected(Certificate::parse(pem_input)?, Some(PckVariant::Processor))
    }

    /// Parse a PEM certificate that must match the platform profile
    /// (exactly seven extension entries).
    pub fn parse_platform(pem_input: &str) -> Result<Self, ParseError> {
        Self::with_expected(Certificate::parse(pem_input)?, Some(PckVariant::Platform))
    }

    /// Re-parse the SGX extension of an already-parsed certificate.
    pub fn from_certificate(certificate: Certificate) -> Result<Self, ParseError> {
        Self::with_expected(certificate, None)
    }

    fn with_expected(
        certificate: Certificate,
        expected: Option<PckVariant>,
    ) -> Result<Self, ParseError> {
        let sgx = parse_sgx_extensions(&certificate, expected)
            .map_err(|e| ParseError::InvalidExtension(format!("{e:#}")))?;
        Ok(PckCertificate { certificate, sgx })
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn variant(&self) -> PckVariant {
        if self.sgx.platform.is_some() {
            PckVariant::Platform
        } else {
            PckVariant::Processor
        }
    }

    pub fn ppid(&self) -> &[u8] {
        &self.sgx.ppid
    }

    pub fn tcb(&self) -> &PckTcb {
        &self.sgx.tcb
    }

    pub fn pce_id(&self) -> &[u8] {
        &self.sgx.pce_id
    }

    pub fn fmspc(&self) -> &[u8] {
        &self.sgx.fmspc
    }

    pub fn sgx_type(&self) -> SgxType {
        self.sgx.sgx_type
    }

    pub fn platform(&self) -> Option<&PlatformData> {
        self.sgx.platform.as_ref()
    }
}

fn sgx_extension_bytes(certificate: &Certificate) -> Result<Vec<u8>> {
    let dotted = oids::SGX_EXTENSION.to_string();
    let mut matching = certificate.extensions().iter().filter(|e| e.oid == dotted);
    let extension = matching.next().context("Intel extension not found")?;
    if matching.next().is_some() {
        bail!("Intel extension ambiguity");
    }
    Ok(extension.value.clone())
}

fn parse_sgx_extensions(
    certificate: &Certificate,
    expected: Option<PckVariant>,
) -> Result<SgxExtensions> {
    let raw = sgx_extension_bytes(certificate)?;
    let obj = DerObject::decode(&raw).context("Failed to decode SGX extension")?;
    let seq = Sequence::load(obj).context("SGX extension is not a sequence")?;

    let variant = match seq.len() {
        PROCESSOR_CA_EXTENSION_COUNT => PckVariant::Processor,
        PLATFORM_CA_EXTENSION_COUNT => PckVariant::Platform,
        given => bail!(
            "OID [{}] expected to contain [{}] or [{}] elements when given [{}]",
            oids::SGX_EXTENSION,
            PROCESSOR_CA_EXTENSION_COUNT,
            PLATFORM_CA_EXTENSION_COUNT,
            given
        ),
    };
    if let Some(expected) = expected {
        if expected != variant {
            bail!(
                "OID [{}] expected to contain [{}] elements when given [{}]",
                oids::SGX_EXTENSION,
                expected.extension_count(),
                seq.len()
            );
        }
    }

    let ppid = fixed_bytes(required(&seq, &oids::PPID)?, 16).context("Failed to decode Ppid")?;
    let tcb = parse_tcb(required(&seq, &oids::TCB)?)?;
    let pce_id = fixed_bytes(required(&seq, &oids::PCEID)?, 2).context("Failed to decode PceId")?;
    let fmspc = fixed_bytes(required(&seq, &oids::FMSPC)?, 6).context("Failed to decode Fmspc")?;
    let sgx_type = decode_enumerated(required(&seq, &oids::SGX_TYPE)?.value())?.try_into()?;

    let platform = match variant {
        PckVariant::Processor => None,
        PckVariant::Platform => {
            let platform_instance_id =
                fixed_bytes(required(&seq, &oids::PLATFORM_INSTANCE_ID)?, 16)
                    .context("Failed to decode PlatformInstanceId")?;
            let configuration = required(&seq, &oids::CONFIGURATION)?;
            let config_seq =
                Sequence::load(configuration).context("Configuration is not a sequence")?;
            Some(PlatformData {
                platform_instance_id,
                dynamic_platform: optional_bool(&config_seq, &oids::DYNAMIC_PLATFORM)?,
                cached_keys: optional_bool(&config_seq, &oids::CACHED_KEYS)?,
                smt_enabled: optional_bool(&config_seq, &oids::SMT_ENABLED)?,
            })
        }
    };

    Ok(SgxExtensions {
        ppid,
        tcb,
        pce_id,
        fmspc,
        sgx_type,
        platform,
    })
}

fn parse_tcb(tcb_obj: DerObject<'_>) -> Result<PckTcb> {
    let tcb_seq = Sequence::load(tcb_obj).context("TCB is not a sequence")?;

    let mut components = [0u8; 16];
    for (i, oid) in oids::TCB_COMPONENTS.iter().enumerate() {
        let value = required(&tcb_seq, oid)
            .with_context(|| format!("TCB component {} is missing", i + 1))?;
        components[i] = decode_svn(value.value())?;
    }

    let pce_svn = decode_u16(required(&tcb_seq, &oids::PCESVN)?.value())
        .context("Failed to decode PceSvn")?;

    let cpu_svn_bytes =
        fixed_bytes(required(&tcb_seq, &oids::CPUSVN)?, 16).context("Failed to decode CpuSvn")?;
    let mut cpu_svn = [0u8; 16];
    cpu_svn.copy_from_slice(&cpu_svn_bytes);

    Ok(PckTcb {
        components,
        pce_svn,
        cpu_svn,
    })
}

fn lookup<'a>(seq: &Sequence<'a>, oid: &ObjectIdentifier) -> Result<Option<DerObject<'a>>> {
    for idx in 0..seq.len() {
        let entry = seq.get(idx).context("Failed to read extension entry")?;
        let entry_seq = Sequence::load(entry).context("Extension entry is not a sequence")?;
        let name = entry_seq.get(0).context("Failed to read entry OID")?;
        let value = entry_seq.get(1).context("Failed to read entry value")?;
        if name.value() == oid.as_bytes() {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn required<'a>(seq: &Sequence<'a>, oid: &ObjectIdentifier) -> Result<DerObject<'a>> {
    lookup(seq, oid)?.ok_or_else(|| anyhow!("OID [{oid}] is missing"))
}

fn fixed_bytes(obj: DerObject<'_>, len: usize) -> Result<Vec<u8>> {
    let value = obj.value();
    if value.len() != len {
        bail!("Expected [{len}] bytes when given [{}]", value.len());
    }
    Ok(value.to_vec())
}

fn decode_svn(bytes: &[u8]) -> Result<u8> {
    match bytes[..] {
        [byte0] => Ok(byte0),
        [0x00, byte1] if byte1 >= 0x80 => Ok(byte1),
        _ => bail!("Unexpected SVN encoding"),
    }
}

fn decode_u16(bytes: &[u8]) -> Result<u16> {
    match bytes[..] {
        [byte0] => Ok(u16::from(byte0)),
        [byte0, byte1] => Ok(u16::from_be_bytes([byte0, byte1])),
        [0x00, byte1, byte2] if byte1 >= 0x80 => Ok(u16::from_be_bytes([byte1, byte2])),
        _ => bail!("Unexpected integer encoding"),
    }
}

fn decode_enumerated(bytes: &[u8]) -> Result<u64> {
    match bytes[..] {
        [byte0] => Ok(u64::from(byte0)),
        [byte0, byte1] => Ok(u64::from(u16::from_be_bytes([byte0, byte1]))),
        _ => bail!("Unexpected ENUMERATED length"),
    }
}

fn optional_bool(seq: &Sequence<'_>, oid: &ObjectIdentifier) -> Result<bool> {
    match lookup(seq, oid)? {
        Some(obj) => {
            let value = obj.value();
            if value.len() != 1 {
                bail!("Unexpected BOOLEAN encoding");
            }
            Ok(value[0] != 0)
        }
        None => Ok(false),
    }
}
