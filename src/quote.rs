//! DCAP quote binary format (version 3, SGX ECDSA-P256).
//!
//! The quote is a packed little-endian structure: a 48-byte header, the
//! 384-byte ISV enclave report, then a length-prefixed auth-data blob with
//! the attestation key, the QE report and its signature, the QE auth data
//! and the certification data. Decoding uses the SCALE codec, whose fixed
//! arrays and little-endian integers match the wire layout exactly; Encode
//! is kept so tests can synthesize evidence.

use scale::{Decode, Encode, Input};

use crate::constants::*;

/// Length-prefixed byte blob; `T` is the integer type of the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data<T> {
    pub data: Vec<u8>,
    _marker: core::marker::PhantomData<T>,
}

impl<T> Data<T> {
    pub fn new(data: Vec<u8>) -> Self {
        Data {
            data,
            _marker: core::marker::PhantomData,
        }
    }
}

impl<T: Decode + Into<u64>> Decode for Data<T> {
    fn decode<I: Input>(input: &mut I) -> Result<Self, scale::Error> {
        let len = T::decode(input)?;
        let mut data = vec![0u8; len.into() as usize];
        input.read(&mut data)?;
        Ok(Data::new(data))
    }
}

impl<T> Encode for Data<T>
where
    T: Encode + TryFrom<usize>,
    <T as TryFrom<usize>>::Error: core::fmt::Debug,
{
    fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::new();
        let len = T::try_from(self.data.len()).expect("Length conversion failed");
        encoded.extend(len.encode());
        encoded.extend(&self.data);
        encoded
    }
}

#[derive(Decode, Encode, PartialEq, Eq, Debug, Clone)]
pub struct Header {
    pub version: u16,
    pub attestation_key_type: u16,
    pub tee_type: u32,
    pub qe_svn: u16,
    pub pce_svn: u16,
    pub qe_vendor_id: [u8; 16],
    pub user_data: [u8; 20],
}

impl Header {
    pub fn is_sgx(&self) -> bool {
        self.tee_type == TEE_TYPE_SGX
    }
}

/// SGX enclave report body, as produced by EREPORT.
#[derive(Decode, Encode, PartialEq, Eq, Debug, Clone)]
pub struct EnclaveReport {
    pub cpu_svn: [u8; 16],
    pub misc_select: u32,
    pub reserved1: [u8; 28],
    pub attributes: [u8; 16],
    pub mr_enclave: [u8; 32],
    pub reserved2: [u8; 32],
    pub mr_signer: [u8; 32],
    pub reserved3: [u8; 96],
    pub isv_prod_id: u16,
    pub isv_svn: u16,
    pub reserved4: [u8; 60],
    pub report_data: [u8; 64],
}

#[derive(Decode, Encode, PartialEq, Eq)]
pub struct CertificationData {
    pub cert_type: u16,
    pub body: Data<u32>,
}

impl core::fmt::Debug for CertificationData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let body_str = String::from_utf8_lossy(&self.body.data);
        f.debug_struct("CertificationData")
            .field("cert_type", &self.cert_type)
            .field("body", &body_str)
            .finish()
    }
}

#[derive(Decode, Encode, PartialEq, Eq, Debug)]
pub struct AuthDataV3 {
    pub ecdsa_signature: [u8; ECDSA_SIGNATURE_BYTE_LEN],
    pub ecdsa_attestation_key: [u8; ECDSA_PUBKEY_BYTE_LEN],
    pub qe_report: [u8; ENCLAVE_REPORT_BYTE_LEN],
    pub qe_report_signature: [u8; QE_REPORT_SIG_BYTE_LEN],
    pub qe_auth_data: Data<u16>,
    pub certification_data: CertificationData,
}

#[derive(Debug)]
pub struct Quote {
    pub header: Header,
    pub report: EnclaveReport,
    pub auth_data: AuthDataV3,
}

impl Decode for Quote {
    fn decode<I: Input>(input: &mut I) -> Result<Self, scale::Error> {
        let header = Header::decode(input)?;
        if header.version != QUOTE_VERSION_3 {
            return Err(scale::Error::from("unsupported quote version"));
        }
        if header.tee_type != TEE_TYPE_SGX {
            return Err(scale::Error::from("invalid tee type"));
        }
        let report = EnclaveReport::decode(input)?;
        let data = Data::<u32>::decode(input)?;
        let auth_data = AuthDataV3::decode(&mut &data.data[..])?;
        Ok(Quote {
            header,
            report,
            auth_data,
        })
    }
}

impl Encode for Quote {
    fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::new();
        encoded.extend(self.header.encode());
        encoded.extend(self.report.encode());
        let auth_data = Data::<u32>::new(self.auth_data.encode());
        encoded.extend(auth_data.encode());
        encoded
    }
}

impl Quote {
    /// Parse a quote from a byte slice.
    pub fn parse(quote: &[u8]) -> Result<Self, scale::Error> {
        let mut input = quote;
        Quote::decode(&mut input)
    }

    /// The PEM certification data embedded in the quote.
    pub fn raw_cert_chain(&self) -> &[u8] {
        &self.auth_data.certification_data.body.data
    }

    /// The length of the signed portion (header plus report).
    pub fn signed_length(&self) -> usize {
        HEADER_BYTE_LEN + ENCLAVE_REPORT_BYTE_LEN
    }
}
