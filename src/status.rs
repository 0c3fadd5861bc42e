//! Verification verdicts.
//!
//! Every verification entry point reduces to a single [`Status`]. The
//! integer values form a stable ABI with non-Rust callers; new values are
//! only ever appended. [`Status::Ok`] is the sole success value, everything
//! else names the defect and the layer it was found at.

use core::fmt;

/// Outcome of a verification operation.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Status {
    Ok = 0,
    UnsupportedCertFormat = 1,

    SgxRootCaMissing = 2,
    SgxRootCaInvalid = 3,
    SgxRootCaInvalidExtensions = 4,
    SgxRootCaInvalidIssuer = 5,
    SgxRootCaUntrusted = 6,

    SgxIntermediateCaMissing = 7,
    SgxIntermediateCaInvalid = 8,
    SgxIntermediateCaInvalidExtensions = 9,
    SgxIntermediateCaInvalidIssuer = 10,
    SgxIntermediateCaRevoked = 11,

    SgxPckMissing = 12,
    SgxPckInvalid = 13,
    SgxPckInvalidExtensions = 14,
    SgxPckInvalidIssuer = 15,
    SgxPckRevoked = 16,

    TrustedRootCaInvalid = 17,
    SgxPckCertChainUntrusted = 18,

    SgxTcbInfoUnsupportedFormat = 19,
    SgxTcbInfoInvalid = 20,
    TcbInfoInvalidSignature = 21,

    SgxTcbSigningCertMissing = 22,
    SgxTcbSigningCertInvalid = 23,
    SgxTcbSigningCertInvalidExtensions = 24,
    SgxTcbSigningCertInvalidIssuer = 25,
    SgxTcbSigningCertChainUntrusted = 26,
    SgxTcbSigningCertRevoked = 27,

    SgxCrlUnsupportedFormat = 28,
    SgxCrlUnknownIssuer = 29,
    SgxCrlInvalid = 30,
    SgxCrlInvalidExtensions = 31,
    SgxCrlInvalidSignature = 32,

    SgxCaCertUnsupportedFormat = 33,
    SgxCaCertInvalid = 34,
    TrustedRootCaUnsupportedFormat = 35,

    MissingParameters = 36,

    UnsupportedQuoteFormat = 37,
    UnsupportedPckCertFormat = 38,
    InvalidPckCert = 39,
    UnsupportedPckRlFormat = 40,
    InvalidPckCrl = 41,
    UnsupportedTcbInfoFormat = 42,
    PckRevoked = 43,
    TcbInfoMismatch = 44,
    TcbOutOfDate = 45,
    TcbRevoked = 46,
    TcbConfigurationNeeded = 47,
    TcbOutOfDateConfigurationNeeded = 48,
    TcbNotSupported = 49,
    TcbUnrecognizedStatus = 50,
    UnsupportedQeCertification = 51,
    InvalidQeCertificationDataSize = 52,
    UnsupportedQeCertificationDataType = 53,
    PckCertMismatch = 54,
    InvalidQeReportSignature = 55,
    InvalidQeReportData = 56,
    InvalidQuoteSignature = 57,

    SgxQeIdentityUnsupportedFormat = 58,
    SgxQeIdentityInvalid = 59,
    SgxQeIdentityInvalidSignature = 60,

    SgxEnclaveReportUnsupportedFormat = 61,
    SgxEnclaveIdentityUnsupportedFormat = 62,
    SgxEnclaveIdentityInvalid = 63,
    SgxEnclaveIdentityUnsupportedVersion = 64,
    SgxEnclaveIdentityOutOfDate = 65,
    SgxEnclaveReportMiscselectMismatch = 66,
    SgxEnclaveReportAttributesMismatch = 67,
    SgxEnclaveReportMrenclaveMismatch = 68,
    SgxEnclaveReportMrsignerMismatch = 69,
    SgxEnclaveReportIsvprodidMismatch = 70,
    SgxEnclaveReportIsvsvnOutOfDate = 71,

    UnsupportedQeIdentityFormat = 72,
    QeIdentityOutOfDate = 73,
    QeIdentityMismatch = 74,
    SgxTcbInfoExpired = 75,
    SgxEnclaveIdentityInvalidSignature = 76,
    InvalidParameter = 77,
    SgxPckCertChainExpired = 78,
    SgxCrlExpired = 79,
    SgxSigningCertChainExpired = 80,
    SgxEnclaveIdentityExpired = 81,
    TcbSwHardeningNeeded = 82,
    TcbConfigurationAndSwHardeningNeeded = 83,
    SgxEnclaveReportIsvsvnRevoked = 84,
}

/// Status-to-name table, keyed by enum value.
const STATUS_NAMES: [&str; 85] = [
    "STATUS_OK",
    "STATUS_UNSUPPORTED_CERT_FORMAT",
    "STATUS_SGX_ROOT_CA_MISSING",
    "STATUS_SGX_ROOT_CA_INVALID",
    "STATUS_SGX_ROOT_CA_INVALID_EXTENSIONS",
    "STATUS_SGX_ROOT_CA_INVALID_ISSUER",
    "STATUS_SGX_ROOT_CA_UNTRUSTED",
    "STATUS_SGX_INTERMEDIATE_CA_MISSING",
    "STATUS_SGX_INTERMEDIATE_CA_INVALID",
    "STATUS_SGX_INTERMEDIATE_CA_INVALID_EXTENSIONS",
    "STATUS_SGX_INTERMEDIATE_CA_INVALID_ISSUER",
    "STATUS_SGX_INTERMEDIATE_CA_REVOKED",
    "STATUS_SGX_PCK_MISSING",
    "STATUS_SGX_PCK_INVALID",
    "STATUS_SGX_PCK_INVALID_EXTENSIONS",
    "STATUS_SGX_PCK_INVALID_ISSUER",
    "STATUS_SGX_PCK_REVOKED",
    "STATUS_TRUSTED_ROOT_CA_INVALID",
    "STATUS_SGX_PCK_CERT_CHAIN_UNTRUSTED",
    "STATUS_SGX_TCB_INFO_UNSUPPORTED_FORMAT",
    "STATUS_SGX_TCB_INFO_INVALID",
    "STATUS_TCB_INFO_INVALID_SIGNATURE",
    "STATUS_SGX_TCB_SIGNING_CERT_MISSING",
    "STATUS_SGX_TCB_SIGNING_CERT_INVALID",
    "STATUS_SGX_TCB_SIGNING_CERT_INVALID_EXTENSIONS",
    "STATUS_SGX_TCB_SIGNING_CERT_INVALID_ISSUER",
    "STATUS_SGX_TCB_SIGNING_CERT_CHAIN_UNTRUSTED",
    "STATUS_SGX_TCB_SIGNING_CERT_REVOKED",
    "STATUS_SGX_CRL_UNSUPPORTED_FORMAT",
    "STATUS_SGX_CRL_UNKNOWN_ISSUER",
    "STATUS_SGX_CRL_INVALID",
    "STATUS_SGX_CRL_INVALID_EXTENSIONS",
    "STATUS_SGX_CRL_INVALID_SIGNATURE",
    "STATUS_SGX_CA_CERT_UNSUPPORTED_FORMAT",
    "STATUS_SGX_CA_CERT_INVALID",
    "STATUS_TRUSTED_ROOT_CA_UNSUPPORTED_FORMAT",
    "STATUS_MISSING_PARAMETERS",
    "STATUS_UNSUPPORTED_QUOTE_FORMAT",
    "STATUS_UNSUPPORTED_PCK_CERT_FORMAT",
    "STATUS_INVALID_PCK_CERT",
    "STATUS_UNSUPPORTED_PCK_RL_FORMAT",
    "STATUS_INVALID_PCK_CRL",
    "STATUS_UNSUPPORTED_TCB_INFO_FORMAT",
    "STATUS_PCK_REVOKED",
    "STATUS_TCB_INFO_MISMATCH",
    "STATUS_TCB_OUT_OF_DATE",
    "STATUS_TCB_REVOKED",
    "STATUS_TCB_CONFIGURATION_NEEDED",
    "STATUS_TCB_OUT_OF_DATE_CONFIGURATION_NEEDED",
    "STATUS_TCB_NOT_SUPPORTED",
    "STATUS_TCB_UNRECOGNIZED_STATUS",
    "STATUS_UNSUPPORTED_QE_CERTIFICATION",
    "STATUS_INVALID_QE_CERTIFICATION_DATA_SIZE",
    "STATUS_UNSUPPORTED_QE_CERTIFICATION_DATA_TYPE",
    "STATUS_PCK_CERT_MISMATCH",
    "STATUS_INVALID_QE_REPORT_SIGNATURE",
    "STATUS_INVALID_QE_REPORT_DATA",
    "STATUS_INVALID_QUOTE_SIGNATURE",
    "STATUS_SGX_QE_IDENTITY_UNSUPPORTED_FORMAT",
    "STATUS_SGX_QE_IDENTITY_INVALID",
    "STATUS_SGX_QE_IDENTITY_INVALID_SIGNATURE",
    "STATUS_SGX_ENCLAVE_REPORT_UNSUPPORTED_FORMAT",
    "STATUS_SGX_ENCLAVE_IDENTITY_UNSUPPORTED_FORMAT",
    "STATUS_SGX_ENCLAVE_IDENTITY_INVALID",
    "STATUS_SGX_ENCLAVE_IDENTITY_UNSUPPORTED_VERSION",
    "STATUS_SGX_ENCLAVE_IDENTITY_OUT_OF_DATE",
    "STATUS_SGX_ENCLAVE_REPORT_MISCSELECT_MISMATCH",
    "STATUS_SGX_ENCLAVE_REPORT_ATTRIBUTES_MISMATCH",
    "STATUS_SGX_ENCLAVE_REPORT_MRENCLAVE_MISMATCH",
    "STATUS_SGX_ENCLAVE_REPORT_MRSIGNER_MISMATCH",
    "STATUS_SGX_ENCLAVE_REPORT_ISVPRODID_MISMATCH",
    "STATUS_SGX_ENCLAVE_REPORT_ISVSVN_OUT_OF_DATE",
    "STATUS_UNSUPPORTED_QE_IDENTITY_FORMAT",
    "STATUS_QE_IDENTITY_OUT_OF_DATE",
    "STATUS_QE_IDENTITY_MISMATCH",
    "STATUS_SGX_TCB_INFO_EXPIRED",
    "STATUS_SGX_ENCLAVE_IDENTITY_INVALID_SIGNATURE",
    "STATUS_INVALID_PARAMETER",
    "STATUS_SGX_PCK_CERT_CHAIN_EXPIRED",
    "STATUS_SGX_CRL_EXPIRED",
    "STATUS_SGX_SIGNING_CERT_CHAIN_EXPIRED",
    "STATUS_SGX_ENCLAVE_IDENTITY_EXPIRED",
    "STATUS_TCB_SW_HARDENING_NEEDED",
    "STATUS_TCB_CONFIGURATION_AND_SW_HARDENING_NEEDED",
    "STATUS_SGX_ENCLAVE_REPORT_ISVSVN_REVOKED",
];

/// All variants, keyed by enum value. Must stay in sync with the
/// discriminants above.
const ALL_STATUSES: [Status; 85] = [
    Status::Ok,
    Status::UnsupportedCertFormat,
    Status::SgxRootCaMissing,
    Status::SgxRootCaInvalid,
    Status::SgxRootCaInvalidExtensions,
    Status::SgxRootCaInvalidIssuer,
    Status::SgxRootCaUntrusted,
    Status::SgxIntermediateCaMissing,
    Status::SgxIntermediateCaInvalid,
    Status::SgxIntermediateCaInvalidExtensions,
    Status::SgxIntermediateCaInvalidIssuer,
    Status::SgxIntermediateCaRevoked,
    Status::SgxPckMissing,
    Status::SgxPckInvalid,
    Status::SgxPckInvalidExtensions,
    Status::SgxPckInvalidIssuer,
    Status::SgxPckRevoked,
    Status::TrustedRootCaInvalid,
    Status::SgxPckCertChainUntrusted,
    Status::SgxTcbInfoUnsupportedFormat,
    Status::SgxTcbInfoInvalid,
    Status::TcbInfoInvalidSignature,
    Status::SgxTcbSigningCertMissing,
    Status::SgxTcbSigningCertInvalid,
    Status::SgxTcbSigningCertInvalidExtensions,
    Status::SgxTcbSigningCertInvalidIssuer,
    Status::SgxTcbSigningCertChainUntrusted,
    Status::SgxTcbSigningCertRevoked,
    Status::SgxCrlUnsupportedFormat,
    Status::SgxCrlUnknownIssuer,
    Status::SgxCrlInvalid,
    Status::SgxCrlInvalidExtensions,
    Status::SgxCrlInvalidSignature,
    Status::SgxCaCertUnsupportedFormat,
    Status::SgxCaCertInvalid,
    Status::TrustedRootCaUnsupportedFormat,
    Status::MissingParameters,
    Status::UnsupportedQuoteFormat,
    Status::UnsupportedPckCertFormat,
    Status::InvalidPckCert,
    Status::UnsupportedPckRlFormat,
    Status::InvalidPckCrl,
    Status::UnsupportedTcbInfoFormat,
    Status::PckRevoked,
    Status::TcbInfoMismatch,
    Status::TcbOutOfDate,
    Status::TcbRevoked,
    Status::TcbConfigurationNeeded,
    Status::TcbOutOfDateConfigurationNeeded,
    Status::TcbNotSupported,
    Status::TcbUnrecognizedStatus,
    Status::UnsupportedQeCertification,
    Status::InvalidQeCertificationDataSize,
    Status::UnsupportedQeCertificationDataType,
    Status::PckCertMismatch,
    Status::InvalidQeReportSignature,
    Status::InvalidQeReportData,
    Status::InvalidQuoteSignature,
    Status::SgxQeIdentityUnsupportedFormat,
    Status::SgxQeIdentityInvalid,
    Status::SgxQeIdentityInvalidSignature,
    Status::SgxEnclaveReportUnsupportedFormat,
    Status::SgxEnclaveIdentityUnsupportedFormat,
    Status::SgxEnclaveIdentityInvalid,
    Status::SgxEnclaveIdentityUnsupportedVersion,
    Status::SgxEnclaveIdentityOutOfDate,
    Status::SgxEnclaveReportMiscselectMismatch,
    Status::SgxEnclaveReportAttributesMismatch,
    Status::SgxEnclaveReportMrenclaveMismatch,
    Status::SgxEnclaveReportMrsignerMismatch,
    Status::SgxEnclaveReportIsvprodidMismatch,
    Status::SgxEnclaveReportIsvsvnOutOfDate,
    Status::UnsupportedQeIdentityFormat,
    Status::QeIdentityOutOfDate,
    Status::QeIdentityMismatch,
    Status::SgxTcbInfoExpired,
    Status::SgxEnclaveIdentityInvalidSignature,
    Status::InvalidParameter,
    Status::SgxPckCertChainExpired,
    Status::SgxCrlExpired,
    Status::SgxSigningCertChainExpired,
    Status::SgxEnclaveIdentityExpired,
    Status::TcbSwHardeningNeeded,
    Status::TcbConfigurationAndSwHardeningNeeded,
    Status::SgxEnclaveReportIsvsvnRevoked,
];

impl Status {
    /// Stable integer value of this status.
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Look up a status by its stable integer value.
    pub fn from_raw(raw: u32) -> Option<Status> {
        ALL_STATUSES.get(raw as usize).copied()
    }

    /// The `STATUS_*` name of this status.
    pub fn as_str(self) -> &'static str {
        STATUS_NAMES[self as usize]
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Whether this status is a TCB-level policy outcome rather than a hard
    /// verification failure. These are the values a quote verification can
    /// end with when every cryptographic check passed.
    pub fn is_tcb_level_status(self) -> bool {
        matches!(
            self,
            Status::Ok
                | Status::TcbOutOfDate
                | Status::TcbRevoked
                | Status::TcbConfigurationNeeded
                | Status::TcbOutOfDateConfigurationNeeded
                | Status::TcbSwHardeningNeeded
                | Status::TcbConfigurationAndSwHardeningNeeded
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Status> for u32 {
    fn from(status: Status) -> u32 {
        status.as_raw()
    }
}

/// Render an integer status for humans, e.g. `STATUS_OK(0)`.
///
/// Values outside the taxonomy render as `Unknown status(<n>)` rather than
/// failing; callers routinely feed this raw integers that crossed an ABI.
pub fn describe(raw: u32) -> String {
    match Status::from_raw(raw) {
        Some(status) => format!("{}({})", status.as_str(), raw),
        None => format!("Unknown status({})", raw),
    }
}
