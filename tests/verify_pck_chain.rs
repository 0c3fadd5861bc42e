mod common;

use common::*;
use dcap_attest::{
    parse_certificate_chain, parse_crl, verify_pck_certificate_chain, Certificate, CrlStore,
    Status,
};
use p256::ecdsa::SigningKey;

struct Fixture {
    chain: dcap_attest::CertificateChain,
    root_crl: CrlStore,
    intermediate_crl: CrlStore,
    trusted_root: Certificate,
}

fn fixture() -> Fixture {
    let keys = keys();
    Fixture {
        chain: parse_certificate_chain(&pck_chain_pem(&keys)).unwrap(),
        root_crl: parse_crl(&root_crl_pem(&keys, &[])).unwrap(),
        intermediate_crl: parse_crl(&intermediate_crl_pem(&keys, &[])).unwrap(),
        trusted_root: Certificate::parse(&root_ca_pem(&keys)).unwrap(),
    }
}

fn verify(fixture: &Fixture, expiration_date: u64) -> Status {
    verify_pck_certificate_chain(
        &fixture.chain,
        &fixture.root_crl,
        &fixture.intermediate_crl,
        &fixture.trusted_root,
        expiration_date,
    )
}

#[test]
fn well_formed_chain_verifies() {
    assert_eq!(verify(&fixture(), VERIFICATION_TIME), Status::Ok);
}

#[test]
fn expiration_past_the_chain_window() {
    assert_eq!(
        verify(&fixture(), NOT_AFTER + 1),
        Status::SgxPckCertChainExpired
    );
}

#[test]
fn intermediate_listed_in_root_crl() {
    let keys = keys();
    let mut f = fixture();
    f.root_crl = parse_crl(&root_crl_pem(&keys, &[&SERIAL])).unwrap();
    assert_eq!(
        verify(&f, VERIFICATION_TIME),
        Status::SgxIntermediateCaRevoked
    );
}

#[test]
fn pck_listed_in_intermediate_crl() {
    let keys = keys();
    let mut f = fixture();
    f.intermediate_crl = parse_crl(&intermediate_crl_pem(&keys, &[&SERIAL])).unwrap();
    assert_eq!(verify(&f, VERIFICATION_TIME), Status::SgxPckRevoked);
}

#[test]
fn trusted_root_with_a_different_signature_is_untrusted() {
    // Same subject, different key: the raw DER signature bytes differ.
    let other_key = SigningKey::from_slice(&[0x77; 32]).unwrap();
    let other_root = make_cert_pem(
        &CertParams::ca(ROOT_CN, ROOT_CN),
        &other_key,
        &other_key,
    );
    let mut f = fixture();
    f.trusted_root = Certificate::parse(&other_root).unwrap();
    assert_eq!(
        verify(&f, VERIFICATION_TIME),
        Status::SgxPckCertChainUntrusted
    );
}

#[test]
fn trusted_root_must_be_self_signed() {
    let keys = keys();
    // Issued by the intermediate: subject != issuer.
    let cross = make_cert_pem(
        &CertParams::ca(ROOT_CN, INTERMEDIATE_CN),
        &keys.root,
        &keys.intermediate,
    );
    let mut f = fixture();
    f.trusted_root = Certificate::parse(&cross).unwrap();
    assert_eq!(verify(&f, VERIFICATION_TIME), Status::TrustedRootCaInvalid);
}

#[test]
fn pck_signed_by_the_wrong_key() {
    let keys = keys();
    // PCK signed by the root instead of the intermediate; the issuer DN
    // still names the intermediate, so only the signature fails.
    let forged_pck = make_cert_pem(
        &CertParams {
            sgx_extension: Some(sgx_extension_processor(
                &PPID, &CPUSVN, PCESVN, &PCEID, &FMSPC,
            )),
            ..CertParams::leaf(PCK_CN, INTERMEDIATE_CN)
        },
        &keys.pck,
        &keys.root,
    );
    let bundle = format!(
        "{}{}{}",
        forged_pck,
        intermediate_pem(&keys),
        root_ca_pem(&keys)
    );
    let mut f = fixture();
    f.chain = parse_certificate_chain(&bundle).unwrap();
    assert_eq!(verify(&f, VERIFICATION_TIME), Status::SgxPckInvalidIssuer);
}

#[test]
fn intermediate_issued_by_a_stranger() {
    let keys = keys();
    let stranger = SigningKey::from_slice(&[0x66; 32]).unwrap();
    let stray_intermediate = make_cert_pem(
        &CertParams::ca(INTERMEDIATE_CN, "Some Other Root CA"),
        &keys.intermediate,
        &stranger,
    );
    let bundle = format!(
        "{}{}{}",
        pck_pem(&keys),
        stray_intermediate,
        root_ca_pem(&keys)
    );
    let mut f = fixture();
    f.chain = parse_certificate_chain(&bundle).unwrap();
    assert_eq!(
        verify(&f, VERIFICATION_TIME),
        Status::SgxIntermediateCaInvalidIssuer
    );
}

#[test]
fn expired_crl_is_reported_after_certificates() {
    let keys = keys();
    // CRL window ends before the verification instant; certificates
    // remain valid until NOT_AFTER.
    let stale = make_crl_pem(
        ROOT_CN,
        NOT_BEFORE,
        VERIFICATION_TIME - 1,
        &[],
        &keys.root,
    );
    let mut f = fixture();
    f.root_crl = parse_crl(&stale).unwrap();
    assert_eq!(verify(&f, VERIFICATION_TIME), Status::SgxCrlExpired);
}

#[test]
fn revocation_outranks_expiration() {
    let keys = keys();
    let mut f = fixture();
    f.intermediate_crl = parse_crl(&intermediate_crl_pem(&keys, &[&SERIAL])).unwrap();
    // Both the revocation and the expiration rules are violated; the
    // earlier rule decides.
    assert_eq!(verify(&f, NOT_AFTER + 1), Status::SgxPckRevoked);
}

#[test]
fn crl_from_an_unknown_issuer() {
    let keys = keys();
    let mut f = fixture();
    // A CRL issued under a different DN than the chain's root.
    f.root_crl = parse_crl(&make_crl_pem(
        "Some Other Root CA",
        NOT_BEFORE,
        NOT_AFTER,
        &[],
        &keys.root,
    ))
    .unwrap();
    assert_eq!(verify(&f, VERIFICATION_TIME), Status::SgxCrlUnknownIssuer);
}

#[test]
fn crl_with_a_forged_signature() {
    let keys = keys();
    let forger = SigningKey::from_slice(&[0x66; 32]).unwrap();
    let mut f = fixture();
    f.root_crl = parse_crl(&make_crl_pem(ROOT_CN, NOT_BEFORE, NOT_AFTER, &[], &forger)).unwrap();
    assert_eq!(
        verify(&f, VERIFICATION_TIME),
        Status::SgxCrlInvalidSignature
    );
}
