//! Object identifiers used by the SGX PCK certificate profile.

use const_oid::ObjectIdentifier;

const fn oid(s: &str) -> ObjectIdentifier {
    ObjectIdentifier::new_unwrap(s)
}

pub const SGX_EXTENSION: ObjectIdentifier = oid("1.2.840.113741.1.13.1");
pub const PPID: ObjectIdentifier = oid("1.2.840.113741.1.13.1.1");
pub const TCB: ObjectIdentifier = oid("1.2.840.113741.1.13.1.2");
pub const PCEID: ObjectIdentifier = oid("1.2.840.113741.1.13.1.3");
pub const FMSPC: ObjectIdentifier = oid("1.2.840.113741.1.13.1.4");
pub const SGX_TYPE: ObjectIdentifier = oid("1.2.840.113741.1.13.1.5");
pub const PLATFORM_INSTANCE_ID: ObjectIdentifier = oid("1.2.840.113741.1.13.1.6");
pub const CONFIGURATION: ObjectIdentifier = oid("1.2.840.113741.1.13.1.7");
pub const DYNAMIC_PLATFORM: ObjectIdentifier = oid("1.2.840.113741.1.13.1.7.1");
pub const CACHED_KEYS: ObjectIdentifier = oid("1.2.840.113741.1.13.1.7.2");
pub const SMT_ENABLED: ObjectIdentifier = oid("1.2.840.113741.1.13.1.7.3");
pub const PCESVN: ObjectIdentifier = oid("1.2.840.113741.1.13.1.2.17");
pub const CPUSVN: ObjectIdentifier = oid("1.2.840.113741.1.13.1.2.18");

/// The sixteen per-component TCB SVN entries inside the TCB sequence.
pub const TCB_COMPONENTS: [ObjectIdentifier; 16] = [
    oid("1.2.840.113741.1.13.1.2.1"),
    oid("1.2.840.113741.1.13.1.2.2"),
    oid("1.2.840.113741.1.13.1.2.3"),
    oid("1.2.840.113741.1.13.1.2.4"),
    oid("1.2.840.113741.1.13.1.2.5"),
    oid("1.2.840.113741.1.13.1.2.6"),
    oid("1.2.840.113741.1.13.1.2.7"),
    oid("1.2.840.113741.1.13.1.2.8"),
    oid("1.2.840.113741.1.13.1.2.9"),
    oid("1.2.840.113741.1.13.1.2.10"),
    oid("1.2.840.113741.1.13.1.2.11"),
    oid("1.2.840.113741.1.13.1.2.12"),
    oid("1.2.840.113741.1.13.1.2.13"),
    oid("1.2.840.113741.1.13.1.2.14"),
    oid("1.2.840.113741.1.13.1.2.15"),
    oid("1.2.840.113741.1.13.1.2.16"),
];

// Standard X.509 extensions the verifiers look for.
pub const KEY_USAGE: ObjectIdentifier = oid("2.5.29.15");
pub const BASIC_CONSTRAINTS: ObjectIdentifier = oid("2.5.29.19");
pub const CRL_NUMBER: ObjectIdentifier = oid("2.5.29.20");
pub const AUTHORITY_KEY_IDENTIFIER: ObjectIdentifier = oid("2.5.29.35");

pub const COMMON_NAME: ObjectIdentifier = oid("2.5.4.3");
