//! The DER layer behind [`Request`](crate::Request).
//!
//! [`RequestCodec`] parses raw bytes and hands out [`RequestGenerator`]s that
//! assemble and encode a `TimeStampReq`. [`DerCodec`] is the implementation
//! backed by the `der` and `x509-cert` crates. Any other implementation can be
//! passed to [`Request::encode_with`](crate::Request::encode_with) and
//! [`Request::decode_with`](crate::Request::decode_with).

use der::{
    asn1::{Int, Null, OctetString},
    oid::ObjectIdentifier,
    Any, Decode, Encode, Tag, Tagged,
};
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::{
    asn1_types::{MessageImprint, TimeStampReq},
    errors::{TsReqError, TsReqErrorKind, TsReqResult},
};

pub const TS_REQ_VERSION_1: u64 = 1;

/// Fields of a `TimeStampReq` as read off the wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedRequest {
    pub version: u64,
    pub algorithm_oid: String,
    pub digest: Vec<u8>,
    pub req_policy: Option<String>,
    pub nonce: Option<Int>,
    pub cert_req: bool,
}

impl From<TimeStampReq> for ParsedRequest {
    fn from(value: TimeStampReq) -> Self {
        let hash_algorithm = value.message_imprint.hash_algorithm;

        if let Some(parameters) = &hash_algorithm.parameters {
            if parameters.tag() != Tag::Null {
                log::warn!(
                    "dropping {:?} parameters of hash algorithm {}",
                    parameters.tag(),
                    hash_algorithm.oid
                );
            }
        }
        if let Some(extensions) = &value.extensions {
            log::warn!(
                "dropping {} request extension(s): {}",
                extensions.len(),
                extensions
                    .iter()
                    .map(|ext| ext.extn_id.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            );
        }

        Self {
            version: value.version,
            algorithm_oid: hash_algorithm.oid.to_string(),
            digest: value.message_imprint.hashed_message.as_bytes().to_vec(),
            req_policy: value.req_policy.map(|oid| oid.to_string()),
            nonce: value.nonce,
            cert_req: value.cert_req,
        }
    }
}

pub trait RequestGenerator {
    fn set_cert_req(&mut self, cert_req: bool);

    fn set_req_policy(&mut self, req_policy: &str);

    fn set_version(&mut self, version: u64);

    /// Encodes a request without a nonce.
    fn generate(&self, algorithm_oid: &str, digest: &[u8]) -> Result<Vec<u8>, TsReqError>;

    /// Encodes a request carrying `nonce`.
    fn generate_with_nonce(
        &self,
        algorithm_oid: &str,
        digest: &[u8],
        nonce: &Int,
    ) -> Result<Vec<u8>, TsReqError>;
}

pub trait RequestCodec {
    type Generator: RequestGenerator;

    /// Parses a DER `TimeStampReq`.
    ///
    /// Fails with [`TsReqErrorKind::MalformedEncoding`] on anything that is not
    /// exactly one well-formed request.
    fn parse(&self, bytes: &[u8]) -> Result<ParsedRequest, TsReqError>;

    fn new_generator(&self) -> Self::Generator;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DerCodec;

impl RequestCodec for DerCodec {
    type Generator = TimeStampReqGenerator;

    fn parse(&self, bytes: &[u8]) -> Result<ParsedRequest, TsReqError> {
        let req = TimeStampReq::from_der(bytes).map_app_err(TsReqErrorKind::MalformedEncoding)?;

        // der 的解码比 DER 宽松（例如显式编码的 certReq FALSE），重新编码比对
        if req.to_der().map_app_err(TsReqErrorKind::MalformedEncoding)? != bytes {
            return Err(TsReqError::new(
                TsReqErrorKind::MalformedEncoding,
                "non-canonical DER encoding",
            ));
        }

        log::debug!("parsed {} byte time-stamp request", bytes.len());

        Ok(req.into())
    }

    fn new_generator(&self) -> Self::Generator {
        TimeStampReqGenerator::new()
    }
}

/// Builds [`TimeStampReq`] values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeStampReqGenerator {
    version: u64,
    cert_req: bool,
    req_policy: Option<String>,
}

impl Default for TimeStampReqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeStampReqGenerator {
    pub fn new() -> Self {
        Self {
            version: TS_REQ_VERSION_1,
            cert_req: false,
            req_policy: None,
        }
    }

    pub fn build(
        &self,
        algorithm_oid: &str,
        digest: &[u8],
        nonce: Option<&Int>,
    ) -> Result<TimeStampReq, TsReqError> {
        let hash_algorithm = AlgorithmIdentifierOwned {
            oid: parse_oid(algorithm_oid, "hash algorithm")?,
            parameters: Some(Any::encode_from(&Null).map_app_err(TsReqErrorKind::EncodeError)?),
        };
        let hashed_message =
            OctetString::new(digest).map_app_err(TsReqErrorKind::EncodeError)?;
        let req_policy = match &self.req_policy {
            Some(policy) => Some(parse_oid(policy, "policy")?),
            None => None,
        };

        Ok(TimeStampReq {
            version: self.version,
            message_imprint: MessageImprint {
                hash_algorithm,
                hashed_message,
            },
            req_policy,
            nonce: nonce.cloned(),
            cert_req: self.cert_req,
            extensions: None,
        })
    }

    fn encode(&self, req: TimeStampReq) -> Result<Vec<u8>, TsReqError> {
        let bytes = req.to_der().map_app_err(TsReqErrorKind::EncodeError)?;

        log::debug!("encoded {} byte time-stamp request", bytes.len());

        Ok(bytes)
    }
}

impl RequestGenerator for TimeStampReqGenerator {
    fn set_cert_req(&mut self, cert_req: bool) {
        self.cert_req = cert_req;
    }

    fn set_req_policy(&mut self, req_policy: &str) {
        self.req_policy = Some(req_policy.to_owned());
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn generate(&self, algorithm_oid: &str, digest: &[u8]) -> Result<Vec<u8>, TsReqError> {
        self.encode(self.build(algorithm_oid, digest, None)?)
    }

    fn generate_with_nonce(
        &self,
        algorithm_oid: &str,
        digest: &[u8],
        nonce: &Int,
    ) -> Result<Vec<u8>, TsReqError> {
        self.encode(self.build(algorithm_oid, digest, Some(nonce))?)
    }
}

fn parse_oid(oid: &str, what: &str) -> Result<ObjectIdentifier, TsReqError> {
    ObjectIdentifier::new(oid).map_err(|err| TsReqError {
        kind: TsReqErrorKind::InvalidObjectIdentifier,
        message: format!("{} {:?}: {}", what, oid, err),
    })
}
