//! Wire-format sizes and well-known values shared across the crate.

// Quote layout (DCAP quote format, version 3).
pub const QUOTE_VERSION_3: u16 = 3;
pub const TEE_TYPE_SGX: u32 = 0x0000_0000;
pub const ATTESTATION_KEY_TYPE_ECDSA256_WITH_P256_CURVE: u16 = 2;

pub const HEADER_BYTE_LEN: usize = 48;
pub const ENCLAVE_REPORT_BYTE_LEN: usize = 384;
pub const ECDSA_SIGNATURE_BYTE_LEN: usize = 64;
pub const ECDSA_PUBKEY_BYTE_LEN: usize = 64;
pub const QE_REPORT_SIG_BYTE_LEN: usize = 64;
pub const ENCLAVE_REPORT_DATA_BYTE_LEN: usize = 64;

/// Certification data type carrying a PEM-encoded PCK certificate chain.
pub const PCK_ID_PCK_CERT_CHAIN: u16 = 5;

// Common-name phrases used to classify certificates inside a chain.
pub const SGX_ROOT_CA_CN_PHRASE: &str = "SGX Root CA";
pub const SGX_INTERMEDIATE_CN_PHRASE: &str = "CA";
pub const SGX_PCK_CN_PHRASE: &str = "SGX PCK Certificate";
pub const SGX_TCB_SIGNING_CN_PHRASE: &str = "SGX TCB Signing";

// Entry counts of the Intel SGX extension, by PCK certificate variant.
pub const PROCESSOR_CA_EXTENSION_COUNT: usize = 5;
pub const PLATFORM_CA_EXTENSION_COUNT: usize = 7;
