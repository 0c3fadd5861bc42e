//! ECDSA-P256 verification primitives.
//!
//! Everything that touches key material goes through [`CryptoProvider`] so
//! verifiers can be unit-tested against a stub instead of real curve math.
//! The default provider is backed by the `p256` crate; message digests are
//! SHA-256 throughout.

use anyhow::{Context, Result};
use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};

/// Signature verification capability injected into the verifiers.
///
/// Implementations must be safe to share across threads; concurrent verify
/// calls may run in parallel on independent inputs.
pub trait CryptoProvider: Send + Sync {
    /// Verify a DER-encoded `Ecdsa-Sig-Value` over the SHA-256 digest of
    /// `message` with an uncompressed SEC1 public key.
    fn verify_sha256_ecdsa(&self, public_key: &[u8], message: &[u8], signature_der: &[u8])
        -> bool;
}

/// Default provider over the `p256` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct P256Provider;

impl CryptoProvider for P256Provider {
    fn verify_sha256_ecdsa(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature_der: &[u8],
    ) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_der(signature_der) else {
            return false;
        };
        verifying_key.verify(message, &signature).is_ok()
    }
}

/// Encode a raw `r‖s` signature (two 32-byte scalars) as a DER
/// `Ecdsa-Sig-Value`. Collateral signatures and quote signatures arrive in
/// the raw fixed form; X.509 machinery wants DER.
pub fn encode_as_der(data: &[u8]) -> Result<Vec<u8>> {
    let (first, second) = data
        .split_at_checked(32)
        .context("Invalid signature length")?;
    if second.len() != 32 {
        anyhow::bail!("Invalid signature length");
    }
    let mut sequence = der::asn1::SequenceOf::<der::asn1::UintRef, 2>::new();
    let r = der::asn1::UintRef::new(first).context("Failed to encode r")?;
    sequence.add(r).context("Failed to add r")?;
    let s = der::asn1::UintRef::new(second).context("Failed to encode s")?;
    sequence.add(s).context("Failed to add s")?;
    // 72 bytes is the worst case: 2 + 2 x (32 + 3)
    let mut asn1 = vec![0u8; 72];
    let mut writer = der::SliceWriter::new(&mut asn1);
    writer
        .encode(&sequence)
        .context("Failed to encode sequence")?;
    Ok(writer.finish().context("Failed to finish writer")?.to_vec())
}
