//! TCB Info collateral.
//!
//! TCB Info is a signed JSON document: an envelope holding a `tcbInfo`
//! subtree plus a detached hex `signature`. The signature covers the exact
//! bytes of the subtree as they appear in the envelope, so parsing keeps
//! those bytes verbatim — the body is never re-serialized.

use serde::Deserialize;

use crate::error::ParseError;
use crate::utils::parse_rfc3339_secs;

/// Status string attached to a TCB level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub enum TcbLevelStatus {
    UpToDate,
    SWHardeningNeeded,
    ConfigurationNeeded,
    ConfigurationAndSWHardeningNeeded,
    OutOfDate,
    OutOfDateConfigurationNeeded,
    Revoked,
    /// Any status string this implementation does not know.
    #[serde(other)]
    Unrecognized,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct TcbComponent {
    pub svn: u8,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tcb {
    #[serde(rename = "sgxtcbcomponents")]
    pub sgx_components: Vec<TcbComponent>,
    #[serde(rename = "pcesvn")]
    pub pce_svn: u16,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcbLevel {
    pub tcb: Tcb,
    #[serde(default)]
    pub tcb_date: String,
    pub tcb_status: TcbLevelStatus,
    #[serde(rename = "advisoryIDs", default)]
    pub advisory_ids: Vec<String>,
}

/// The signed `tcbInfo` subtree.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcbInfoData {
    #[serde(default)]
    pub id: Option<String>,
    pub version: u32,
    pub issue_date: String,
    pub next_update: String,
    pub fmspc: String,
    pub pce_id: String,
    #[serde(default)]
    pub tcb_type: u32,
    #[serde(default)]
    pub tcb_evaluation_data_number: u32,
    pub tcb_levels: Vec<TcbLevel>,
}

/// A parsed TCB Info document with the verbatim signed body.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TcbInfo {
    data: TcbInfoData,
    body: Vec<u8>,
    signature: Vec<u8>,
    issue_date: u64,
    next_update: u64,
    fmspc: Vec<u8>,
    pce_id: Vec<u8>,
}

impl TcbInfo {
    /// Parse the full signed envelope.
    pub fn parse(json: &str) -> Result<Self, ParseError> {
        #[derive(Deserialize)]
        struct Envelope<'a> {
            #[serde(rename = "tcbInfo", borrow)]
            tcb_info: &'a serde_json::value::RawValue,
            signature: String,
        }

        let envelope: Envelope<'_> =
            serde_json::from_str(json).map_err(ParseError::json)?;
        let body = envelope.tcb_info.get().as_bytes().to_vec();
        let data: TcbInfoData =
            serde_json::from_str(envelope.tcb_info.get()).map_err(ParseError::json)?;
        let signature = hex::decode(&envelope.signature).map_err(ParseError::json)?;

        let issue_date = parse_rfc3339_secs(&data.issue_date).map_err(ParseError::json)?;
        let next_update = parse_rfc3339_secs(&data.next_update).map_err(ParseError::json)?;
        let fmspc = hex::decode(&data.fmspc).map_err(ParseError::json)?;
        let pce_id = hex::decode(&data.pce_id).map_err(ParseError::json)?;

        Ok(TcbInfo {
            data,
            body,
            signature,
            issue_date,
            next_update,
            fmspc,
            pce_id,
        })
    }

    pub fn data(&self) -> &TcbInfoData {
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

    pub fn issue_date(&self) -> u64 {
        self.issue_date
    }

    pub fn next_update(&self) -> u64 {
        self.next_update
    }

    pub fn fmspc(&self) -> &[u8] {
        &self.fmspc
    }

    pub fn pce_id(&self) -> &[u8] {
        &self.pce_id
    }

    pub fn tcb_levels(&self) -> &[TcbLevel] {
        &self.data.tcb_levels
    }

    /// Select the first TCB level, in document order, whose every
    /// component SVN and PCESVN are covered by the given platform values.
    pub fn select_level(&self, cpu_svn: &[u8; 16], pce_svn: u16) -> Option<&TcbLevel> {
        self.data.tcb_levels.iter().find(|level| {
            let components = &level.tcb.sgx_components;
            components.len() == cpu_svn.len()
                && components
                    .iter()
                    .zip(cpu_svn.iter())
                    .all(|(component, &svn)| component.svn <= svn)
                && level.tcb.pce_svn <= pce_svn
        })
    }
}
