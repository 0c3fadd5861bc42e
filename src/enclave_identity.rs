//! QE / Enclave Identity collateral.
//!
//! Same envelope shape as TCB Info: a signed `enclaveIdentity` subtree plus
//! a detached hex signature over the subtree's exact bytes. The identity
//! pins the reference Quoting Enclave: MRSIGNER, ISVPRODID, masked
//! MISCSELECT/ATTRIBUTES, and the ISVSVN-keyed TCB levels.

use serde::Deserialize;

use crate::error::ParseError;
use crate::tcb_info::TcbLevelStatus;
use crate::utils::{parse_rfc3339_secs, serde_hex};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct QeTcb {
    pub isvsvn: u16,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QeTcbLevel {
    pub tcb: QeTcb,
    #[serde(default)]
    pub tcb_date: String,
    pub tcb_status: TcbLevelStatus,
    #[serde(rename = "advisoryIDs", default)]
    pub advisory_ids: Vec<String>,
}

/// The signed `enclaveIdentity` subtree.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnclaveIdentityData {
    pub id: String,
    pub version: u32,
    pub issue_date: String,
    pub next_update: String,
    #[serde(default)]
    pub tcb_evaluation_data_number: u32,
    #[serde(with = "serde_hex")]
    pub miscselect: [u8; 4],
    #[serde(with = "serde_hex")]
    pub miscselect_mask: [u8; 4],
    #[serde(with = "serde_hex")]
    pub attributes: [u8; 16],
    #[serde(with = "serde_hex")]
    pub attributes_mask: [u8; 16],
    #[serde(with = "serde_hex")]
    pub mrsigner: [u8; 32],
    #[serde(default, with = "serde_hex::opt")]
    pub mrenclave: Option<[u8; 32]>,
    pub isvprodid: u16,
    pub tcb_levels: Vec<QeTcbLevel>,
}

/// A parsed Enclave Identity document with the verbatim signed body.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EnclaveIdentityV2 {
    data: EnclaveIdentityData,
    body: Vec<u8>,
    signature: Vec<u8>,
    issue_date: u64,
    next_update: u64,
}

impl EnclaveIdentityV2 {
    /// Parse the full signed envelope.
    pub fn parse(json: &str) -> Result<Self, ParseError> {
        #[derive(Deserialize)]
        struct Envelope<'a> {
            #[serde(rename = "enclaveIdentity", borrow)]
            enclave_identity: &'a serde_json::value::RawValue,
            signature: String,
        }

        let envelope: Envelope<'_> =
            serde_json::from_str(json).map_err(ParseError::json)?;
        let body = envelope.enclave_identity.get().as_bytes().to_vec();
        let data: EnclaveIdentityData =
            serde_json::from_str(envelope.enclave_identity.get()).map_err(ParseError::json)?;
        let signature = hex::decode(&envelope.signature).map_err(ParseError::json)?;

        let issue_date = parse_rfc3339_secs(&data.issue_date).map_err(ParseError::json)?;
        let next_update = parse_rfc3339_secs(&data.next_update).map_err(ParseError::json)?;

        Ok(EnclaveIdentityV2 {
            data,
            body,
            signature,
            issue_date,
            next_update,
        })
    }

    pub fn data(&self) -> &EnclaveIdentityData {
        &self.data
    }

    /// The exact bytes the signature covers.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Raw `r‖s` signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn version(&self) -> u32 {
        self.data.version
    }

    pub fn issue_date(&self) -> u64 {
        self.issue_date
    }

    pub fn next_update(&self) -> u64 {
        self.next_update
    }

    pub fn tcb_levels(&self) -> &[QeTcbLevel] {
        &self.data.tcb_levels
    }
}
