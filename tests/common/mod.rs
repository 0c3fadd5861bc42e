//! Deterministic test evidence: certificates, CRLs, signed collateral and
//! quotes, built from fixed keys so every run produces the same bytes.

#![allow(dead_code)]

use p256::ecdsa::{signature::Signer, Signature, SigningKey};
use scale::Encode;
use sha2::{Digest, Sha256};

use dcap_attest::quote::{AuthDataV3, CertificationData, Data, EnclaveReport, Header, Quote};

pub const SERIAL: [u8; 20] = [
    0x40, 0x66, 0xB0, 0x01, 0x4B, 0x71, 0x7C, 0xF7, 0x01, 0xD5, 0xB7, 0xD8, 0xF1, 0x36, 0xB1,
    0x99, 0xE9, 0x73, 0x96, 0xC8,
];
pub const PPID: [u8; 16] = [0xaa; 16];
pub const CPUSVN: [u8; 16] = [0x09; 16];
pub const PCESVN: u16 = 0x03F2;
pub const PCEID: [u8; 2] = [0x04, 0xf3];
pub const FMSPC: [u8; 6] = [0x05, 0xf4, 0x44, 0x45, 0xaa, 0x00];
pub const QE_MRSIGNER: [u8; 32] = [
    0x8C, 0x4F, 0x57, 0x75, 0xD7, 0x96, 0x50, 0x3E, 0x96, 0x13, 0x7F, 0x77, 0xC6, 0x8A, 0x82,
    0x9A, 0x00, 0x56, 0xAC, 0x8D, 0xED, 0x70, 0x14, 0x0B, 0x08, 0x1B, 0x09, 0x44, 0x90, 0xC5,
    0x7B, 0xFF,
];

/// 2026-01-01T00:00:00Z; certificates and CRLs are valid for one hour.
pub const NOT_BEFORE: u64 = 1_767_225_600;
pub const NOT_AFTER: u64 = NOT_BEFORE + 3600;
/// An instant inside every validity window.
pub const VERIFICATION_TIME: u64 = NOT_BEFORE + 600;

pub const ROOT_CN: &str = "Intel SGX Root CA";
pub const INTERMEDIATE_CN: &str = "Intel SGX PCK Processor CA";
pub const PCK_CN: &str = "Intel SGX PCK Certificate";
pub const TCB_SIGNING_CN: &str = "Intel SGX TCB Signing";

pub struct Keys {
    pub root: SigningKey,
    pub intermediate: SigningKey,
    pub pck: SigningKey,
    pub tcb_signing: SigningKey,
    pub attestation: SigningKey,
}

pub fn keys() -> Keys {
    Keys {
        root: SigningKey::from_slice(&[0x11; 32]).unwrap(),
        intermediate: SigningKey::from_slice(&[0x22; 32]).unwrap(),
        pck: SigningKey::from_slice(&[0x33; 32]).unwrap(),
        tcb_signing: SigningKey::from_slice(&[0x44; 32]).unwrap(),
        attestation: SigningKey::from_slice(&[0x55; 32]).unwrap(),
    }
}

pub fn public_point(key: &SigningKey) -> Vec<u8> {
    key.verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .to_vec()
}

pub fn sign_raw(key: &SigningKey, message: &[u8]) -> [u8; 64] {
    let signature: Signature = key.sign(message);
    signature.to_bytes().as_slice().try_into().unwrap()
}

fn sign_der(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    let signature: Signature = key.sign(message);
    signature.to_der().as_bytes().to_vec()
}

// ── minimal DER writer ──────────────────────────────────────────────────

fn der_len(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else if len <= 0xFF {
        vec![0x81, len as u8]
    } else {
        vec![0x82, (len >> 8) as u8, len as u8]
    }
}

pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(der_len(content.len()));
    out.extend_from_slice(content);
    out
}

pub fn seq(parts: &[&[u8]]) -> Vec<u8> {
    tlv(0x30, &parts.concat())
}

fn set_of(parts: &[&[u8]]) -> Vec<u8> {
    tlv(0x31, &parts.concat())
}

fn explicit(slot: u8, inner: &[u8]) -> Vec<u8> {
    tlv(0xA0 | slot, inner)
}

pub fn oid_der(dotted: &str) -> Vec<u8> {
    let arcs: Vec<u64> = dotted.split('.').map(|a| a.parse().unwrap()).collect();
    let mut content = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        let mut bytes = vec![(arc & 0x7F) as u8];
        let mut rest = arc >> 7;
        while rest > 0 {
            bytes.push(((rest & 0x7F) | 0x80) as u8);
            rest >>= 7;
        }
        bytes.reverse();
        content.extend(bytes);
    }
    tlv(0x06, &content)
}

/// INTEGER from unsigned big-endian content bytes.
pub fn int_der(bytes: &[u8]) -> Vec<u8> {
    let mut content = bytes.to_vec();
    while content.len() > 1 && content[0] == 0 && content[1] < 0x80 {
        content.remove(0);
    }
    if content.is_empty() {
        content.push(0);
    }
    if content[0] >= 0x80 {
        content.insert(0, 0);
    }
    tlv(0x02, &content)
}

pub fn int_u64(value: u64) -> Vec<u8> {
    int_der(&value.to_be_bytes())
}

pub fn octet(bytes: &[u8]) -> Vec<u8> {
    tlv(0x04, bytes)
}

fn bit_string(bytes: &[u8]) -> Vec<u8> {
    let mut content = vec![0x00];
    content.extend_from_slice(bytes);
    tlv(0x03, &content)
}

fn utf8(text: &str) -> Vec<u8> {
    tlv(0x0C, text.as_bytes())
}

fn boolean(value: bool) -> Vec<u8> {
    tlv(0x01, &[if value { 0xFF } else { 0x00 }])
}

fn enumerated(value: u8) -> Vec<u8> {
    tlv(0x0A, &[value])
}

fn utctime(secs: u64) -> Vec<u8> {
    let time = chrono::DateTime::from_timestamp(secs as i64, 0).unwrap();
    let text = time.format("%y%m%d%H%M%SZ").to_string();
    tlv(0x17, text.as_bytes())
}

fn name_der(cn: &str) -> Vec<u8> {
    seq(&[&set_of(&[&seq(&[&oid_der("2.5.4.3"), &utf8(cn)])])])
}

fn algorithm_ecdsa_sha256() -> Vec<u8> {
    seq(&[&oid_der("1.2.840.10045.4.3.2")])
}

fn spki(public_point: &[u8]) -> Vec<u8> {
    seq(&[
        &seq(&[
            &oid_der("1.2.840.10045.2.1"),
            &oid_der("1.2.840.10045.3.1.7"),
        ]),
        &bit_string(public_point),
    ])
}

fn extension(oid: &str, critical: bool, value: &[u8]) -> Vec<u8> {
    if critical {
        seq(&[&oid_der(oid), &boolean(true), &octet(value)])
    } else {
        seq(&[&oid_der(oid), &octet(value)])
    }
}

fn key_usage_extension() -> Vec<u8> {
    // keyCertSign | cRLSign
    extension("2.5.29.15", true, &tlv(0x03, &[0x01, 0x06]))
}

fn basic_constraints_extension(is_ca: bool) -> Vec<u8> {
    let value = if is_ca {
        seq(&[&boolean(true)])
    } else {
        seq(&[])
    };
    extension("2.5.29.19", true, &value)
}

// ── SGX extension ───────────────────────────────────────────────────────

fn sgx_entry(oid: &str, value: &[u8]) -> Vec<u8> {
    seq(&[&oid_der(oid), value])
}

fn sgx_tcb(cpusvn: &[u8; 16], pcesvn: u16) -> Vec<u8> {
    let mut entries: Vec<Vec<u8>> = Vec::new();
    for (i, &svn) in cpusvn.iter().enumerate() {
        entries.push(sgx_entry(
            &format!("1.2.840.113741.1.13.1.2.{}", i + 1),
            &int_der(&[svn]),
        ));
    }
    entries.push(sgx_entry(
        "1.2.840.113741.1.13.1.2.17",
        &int_der(&pcesvn.to_be_bytes()),
    ));
    entries.push(sgx_entry("1.2.840.113741.1.13.1.2.18", &octet(cpusvn)));
    let refs: Vec<&[u8]> = entries.iter().map(Vec::as_slice).collect();
    seq(&refs)
}

/// The processor-profile SGX extension value (five entries).
pub fn sgx_extension_processor(
    ppid: &[u8; 16],
    cpusvn: &[u8; 16],
    pcesvn: u16,
    pceid: &[u8; 2],
    fmspc: &[u8; 6],
) -> Vec<u8> {
    let entries = [
        sgx_entry("1.2.840.113741.1.13.1.1", &octet(ppid)),
        sgx_entry("1.2.840.113741.1.13.1.2", &sgx_tcb(cpusvn, pcesvn)),
        sgx_entry("1.2.840.113741.1.13.1.3", &octet(pceid)),
        sgx_entry("1.2.840.113741.1.13.1.4", &octet(fmspc)),
        sgx_entry("1.2.840.113741.1.13.1.5", &enumerated(0)),
    ];
    let refs: Vec<&[u8]> = entries.iter().map(Vec::as_slice).collect();
    seq(&refs)
}

/// The platform-profile SGX extension value (seven entries).
pub fn sgx_extension_platform(
    ppid: &[u8; 16],
    cpusvn: &[u8; 16],
    pcesvn: u16,
    pceid: &[u8; 2],
    fmspc: &[u8; 6],
) -> Vec<u8> {
    let configuration = seq(&[
        &sgx_entry("1.2.840.113741.1.13.1.7.1", &boolean(true)),
        &sgx_entry("1.2.840.113741.1.13.1.7.2", &boolean(true)),
        &sgx_entry("1.2.840.113741.1.13.1.7.3", &boolean(false)),
    ]);
    let entries = [
        sgx_entry("1.2.840.113741.1.13.1.1", &octet(ppid)),
        sgx_entry("1.2.840.113741.1.13.1.2", &sgx_tcb(cpusvn, pcesvn)),
        sgx_entry("1.2.840.113741.1.13.1.3", &octet(pceid)),
        sgx_entry("1.2.840.113741.1.13.1.4", &octet(fmspc)),
        sgx_entry("1.2.840.113741.1.13.1.5", &enumerated(1)),
        sgx_entry("1.2.840.113741.1.13.1.6", &octet(&[0xCC; 16])),
        sgx_entry("1.2.840.113741.1.13.1.7", &configuration),
    ];
    let refs: Vec<&[u8]> = entries.iter().map(Vec::as_slice).collect();
    seq(&refs)
}

// ── certificate / CRL builders ──────────────────────────────────────────

pub struct CertParams<'a> {
    pub version: u8,
    pub serial: &'a [u8],
    pub subject_cn: &'a str,
    pub issuer_cn: &'a str,
    pub not_before: u64,
    pub not_after: u64,
    pub is_ca: bool,
    pub sgx_extension: Option<Vec<u8>>,
}

impl<'a> CertParams<'a> {
    pub fn ca(subject_cn: &'a str, issuer_cn: &'a str) -> Self {
        CertParams {
            version: 3,
            serial: &SERIAL,
            subject_cn,
            issuer_cn,
            not_before: NOT_BEFORE,
            not_after: NOT_AFTER,
            is_ca: true,
            sgx_extension: None,
        }
    }

    pub fn leaf(subject_cn: &'a str, issuer_cn: &'a str) -> Self {
        CertParams {
            is_ca: false,
            ..Self::ca(subject_cn, issuer_cn)
        }
    }
}

pub fn make_cert_der(params: &CertParams<'_>, subject_key: &SigningKey, issuer_key: &SigningKey) -> Vec<u8> {
    let mut extensions = vec![key_usage_extension(), basic_constraints_extension(params.is_ca)];
    if let Some(sgx) = &params.sgx_extension {
        extensions.push(extension("1.2.840.113741.1.13.1", false, sgx));
    }
    let ext_refs: Vec<&[u8]> = extensions.iter().map(Vec::as_slice).collect();
    let extensions_der = explicit(3, &seq(&ext_refs));

    let tbs = seq(&[
        &explicit(0, &int_der(&[params.version - 1])),
        &int_der(params.serial),
        &algorithm_ecdsa_sha256(),
        &name_der(params.issuer_cn),
        &seq(&[&utctime(params.not_before), &utctime(params.not_after)]),
        &name_der(params.subject_cn),
        &spki(&public_point(subject_key)),
        &extensions_der,
    ]);

    let signature = sign_der(issuer_key, &tbs);
    seq(&[&tbs, &algorithm_ecdsa_sha256(), &bit_string(&signature)])
}

pub fn make_cert_pem(params: &CertParams<'_>, subject_key: &SigningKey, issuer_key: &SigningKey) -> String {
    to_pem("CERTIFICATE", &make_cert_der(params, subject_key, issuer_key))
}

pub fn make_crl_pem(
    issuer_cn: &str,
    this_update: u64,
    next_update: u64,
    revoked: &[&[u8]],
    issuer_key: &SigningKey,
) -> String {
    let mut tbs_parts: Vec<Vec<u8>> = vec![
        int_der(&[1]),
        algorithm_ecdsa_sha256(),
        name_der(issuer_cn),
        utctime(this_update),
        utctime(next_update),
    ];
    if !revoked.is_empty() {
        let entries: Vec<Vec<u8>> = revoked
            .iter()
            .map(|serial| seq(&[&int_der(serial), &utctime(this_update)]))
            .collect();
        let refs: Vec<&[u8]> = entries.iter().map(Vec::as_slice).collect();
        tbs_parts.push(seq(&refs));
    }
    let crl_extensions = seq(&[
        &extension("2.5.29.20", false, &int_u64(1)),
        &extension("2.5.29.35", false, &seq(&[&tlv(0x80, &[0xAB; 20])])),
    ]);
    tbs_parts.push(explicit(0, &crl_extensions));

    let refs: Vec<&[u8]> = tbs_parts.iter().map(Vec::as_slice).collect();
    let tbs = seq(&refs);
    let signature = sign_der(issuer_key, &tbs);
    let crl = seq(&[&tbs, &algorithm_ecdsa_sha256(), &bit_string(&signature)]);
    to_pem("X509 CRL", &crl)
}

pub fn to_pem(tag: &str, der: &[u8]) -> String {
    pem::encode(&pem::Pem::new(tag, der.to_vec()))
}

// ── reference evidence set ──────────────────────────────────────────────

pub fn root_ca_pem(keys: &Keys) -> String {
    make_cert_pem(&CertParams::ca(ROOT_CN, ROOT_CN), &keys.root, &keys.root)
}

pub fn intermediate_pem(keys: &Keys) -> String {
    make_cert_pem(
        &CertParams::ca(INTERMEDIATE_CN, ROOT_CN),
        &keys.intermediate,
        &keys.root,
    )
}

pub fn pck_pem(keys: &Keys) -> String {
    let params = CertParams {
        sgx_extension: Some(sgx_extension_processor(
            &PPID, &CPUSVN, PCESVN, &PCEID, &FMSPC,
        )),
        ..CertParams::leaf(PCK_CN, INTERMEDIATE_CN)
    };
    make_cert_pem(&params, &keys.pck, &keys.intermediate)
}

pub fn platform_pck_pem(keys: &Keys) -> String {
    let params = CertParams {
        sgx_extension: Some(sgx_extension_platform(
            &PPID, &CPUSVN, PCESVN, &PCEID, &FMSPC,
        )),
        ..CertParams::leaf(PCK_CN, INTERMEDIATE_CN)
    };
    make_cert_pem(&params, &keys.pck, &keys.intermediate)
}

pub fn tcb_signing_pem(keys: &Keys) -> String {
    make_cert_pem(
        &CertParams::leaf(TCB_SIGNING_CN, ROOT_CN),
        &keys.tcb_signing,
        &keys.root,
    )
}

pub fn pck_chain_pem(keys: &Keys) -> String {
    format!("{}{}{}", pck_pem(keys), intermediate_pem(keys), root_ca_pem(keys))
}

pub fn tcb_signing_chain_pem(keys: &Keys) -> String {
    format!("{}{}", tcb_signing_pem(keys), root_ca_pem(keys))
}

pub fn root_crl_pem(keys: &Keys, revoked: &[&[u8]]) -> String {
    make_crl_pem(ROOT_CN, NOT_BEFORE, NOT_AFTER, revoked, &keys.root)
}

pub fn intermediate_crl_pem(keys: &Keys, revoked: &[&[u8]]) -> String {
    make_crl_pem(
        INTERMEDIATE_CN,
        NOT_BEFORE,
        NOT_AFTER,
        revoked,
        &keys.intermediate,
    )
}

// ── signed JSON collateral ──────────────────────────────────────────────

pub fn default_tcb_levels() -> String {
    tcb_level_json(9, PCESVN, "UpToDate")
}

pub fn tcb_level_json(svn: u8, pcesvn: u16, status: &str) -> String {
    let components = (0..16)
        .map(|_| format!(r#"{{"svn":{svn}}}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"tcb":{{"sgxtcbcomponents":[{components}],"pcesvn":{pcesvn}}},"tcbDate":"2025-11-01T00:00:00Z","tcbStatus":"{status}"}}"#
    )
}

pub fn tcb_info_json(keys: &Keys, levels: &str) -> String {
    tcb_info_json_with(keys, levels, &hex::encode(FMSPC), "2026-01-01T01:00:00Z")
}

pub fn tcb_info_json_with(keys: &Keys, levels: &str, fmspc_hex: &str, next_update: &str) -> String {
    let body = format!(
        r#"{{"version":2,"issueDate":"2026-01-01T00:00:00Z","nextUpdate":"{next_update}","fmspc":"{fmspc_hex}","pceId":"{}","tcbType":0,"tcbEvaluationDataNumber":5,"tcbLevels":[{levels}]}}"#,
        hex::encode(PCEID)
    );
    let signature = hex::encode(sign_raw(&keys.tcb_signing, body.as_bytes()));
    format!(r#"{{"tcbInfo":{body},"signature":"{signature}"}}"#)
}

pub fn qe_identity_json(keys: &Keys) -> String {
    qe_identity_json_with(keys, "2026-01-01T01:00:00Z", 8)
}

pub fn qe_identity_json_with(keys: &Keys, next_update: &str, min_isvsvn: u16) -> String {
    let body = format!(
        r#"{{"id":"QE","version":2,"issueDate":"2026-01-01T00:00:00Z","nextUpdate":"{next_update}","tcbEvaluationDataNumber":5,"miscselect":"00000000","miscselectMask":"FFFFFFFF","attributes":"11000000000000000000000000000000","attributesMask":"FBFFFFFFFFFFFFFF0000000000000000","mrsigner":"{}","isvprodid":1,"tcbLevels":[{{"tcb":{{"isvsvn":{min_isvsvn}}},"tcbDate":"2025-11-01T00:00:00Z","tcbStatus":"UpToDate"}}]}}"#,
        hex::encode_upper(QE_MRSIGNER)
    );
    let signature = hex::encode(sign_raw(&keys.tcb_signing, body.as_bytes()));
    format!(r#"{{"enclaveIdentity":{body},"signature":"{signature}"}}"#)
}

// ── quote synthesis ─────────────────────────────────────────────────────

pub fn sgx_report(report_data: [u8; 64]) -> EnclaveReport {
    EnclaveReport {
        cpu_svn: CPUSVN,
        misc_select: 0,
        reserved1: [0u8; 28],
        attributes: {
            let mut attributes = [0u8; 16];
            attributes[0] = 0x11;
            attributes
        },
        mr_enclave: [0x01; 32],
        reserved2: [0u8; 32],
        mr_signer: QE_MRSIGNER,
        reserved3: [0u8; 96],
        isv_prod_id: 1,
        isv_svn: 8,
        reserved4: [0u8; 60],
        report_data,
    }
}

/// Build a well-formed v3 SGX quote over the reference chain.
pub fn build_quote(keys: &Keys) -> Vec<u8> {
    build_quote_with(keys, &pck_chain_pem(keys))
}

pub fn build_quote_with(keys: &Keys, certification_pem: &str) -> Vec<u8> {
    let header = Header {
        version: 3,
        attestation_key_type: 2,
        tee_type: 0,
        qe_svn: 1,
        pce_svn: 1,
        qe_vendor_id: [0u8; 16],
        user_data: [0u8; 20],
    };
    let isv_report = sgx_report([0x07; 64]);

    // Attestation public key, without the 0x04 prefix.
    let mut attestation_key = [0u8; 64];
    attestation_key.copy_from_slice(&public_point(&keys.attestation)[1..]);

    let qe_auth_data = vec![0x0A; 32];

    // QE report data binds the attestation key.
    let mut hash_input = Vec::new();
    hash_input.extend_from_slice(&attestation_key);
    hash_input.extend_from_slice(&qe_auth_data);
    let digest = Sha256::digest(&hash_input);
    let mut qe_report_data = [0u8; 64];
    qe_report_data[..32].copy_from_slice(&digest);

    let qe_report = sgx_report(qe_report_data);
    let qe_report_bytes: [u8; 384] = qe_report.encode().try_into().unwrap();
    let qe_report_signature = sign_raw(&keys.pck, &qe_report_bytes);

    let mut signed_body = header.encode();
    signed_body.extend(isv_report.encode());
    let ecdsa_signature = sign_raw(&keys.attestation, &signed_body);

    let quote = Quote {
        header,
        report: isv_report,
        auth_data: AuthDataV3 {
            ecdsa_signature,
            ecdsa_attestation_key: attestation_key,
            qe_report: qe_report_bytes,
            qe_report_signature,
            qe_auth_data: Data::new(qe_auth_data),
            certification_data: CertificationData {
                cert_type: 5,
                body: Data::new(certification_pem.as_bytes().to_vec()),
            },
        },
    };
    quote.encode()
}
