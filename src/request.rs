use std::fmt::Display;

use der::{asn1::Int, Decode, Encode};

use crate::{
    algorithm::AlgorithmIdentifier,
    asn1_types::TimeStampReq,
    codec::{DerCodec, ParsedRequest, RequestCodec, RequestGenerator, TS_REQ_VERSION_1},
    errors::{TsReqError, TsReqErrorKind},
    message_imprint::MessageImprint,
    nonce::{int_to_nonce, nonce_to_int},
    utils::{to_hex_str, IndentString},
};

/// RFC 3161 time-stamp request.
///
/// ```text
/// TimeStampReq ::= SEQUENCE {
/// version INTEGER { v1(1) },
/// messageImprint MessageImprint,
/// reqPolicy TSAPolicyId OPTIONAL,
/// nonce INTEGER OPTIONAL,
/// certReq BOOLEAN DEFAULT FALSE,
/// extensions [0] IMPLICIT Extensions OPTIONAL }
/// ```
///
/// A `Request` is immutable. `extensions` is not modeled: requests decoded
/// with extensions lose them.
///
/// # Example
///
/// ```
/// use tspreq::Request;
///
/// let digest = [0x11u8; 32];
/// let req = Request::builder(digest.to_vec(), "2.16.840.1.101.3.4.2.1")
///     .nonce(vec![0x01, 0x02, 0x03, 0x04])
///     .cert_req(true)
///     .build();
///
/// let der = req.encode().unwrap();
/// let decoded = Request::decode(&der).unwrap();
///
/// assert_eq!(decoded, req);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Request {
    version: u64,
    message_imprint: MessageImprint,
    req_policy: Option<String>,
    nonce: Option<Vec<u8>>,
    cert_req: bool,
}

impl Request {
    pub fn new(
        hashed_message: impl Into<Vec<u8>>,
        hash_algorithm: impl Into<String>,
        nonce: Option<Vec<u8>>,
        req_policy: Option<String>,
        cert_req: bool,
        version: u64,
    ) -> Self {
        Self {
            version,
            message_imprint: MessageImprint::new(hashed_message, hash_algorithm),
            req_policy,
            nonce,
            cert_req,
        }
    }

    /// Starts a request with `nonce` and `req_policy` unset, `cert_req` false
    /// and version 1.
    pub fn builder(
        hashed_message: impl Into<Vec<u8>>,
        hash_algorithm: impl Into<String>,
    ) -> RequestBuilder {
        RequestBuilder {
            hashed_message: hashed_message.into(),
            hash_algorithm: hash_algorithm.into(),
            nonce: None,
            req_policy: None,
            cert_req: false,
            version: TS_REQ_VERSION_1,
        }
    }

    /// Same as [`Request::new`] with the algorithm taken from an
    /// [`AlgorithmIdentifier`].
    ///
    /// Fails with [`TsReqErrorKind::InvalidArgument`] when `hash_algorithm` is
    /// `None`.
    pub fn from_algorithm_identifier(
        hashed_message: impl Into<Vec<u8>>,
        hash_algorithm: Option<&AlgorithmIdentifier>,
        nonce: Option<Vec<u8>>,
        req_policy: Option<String>,
        cert_req: bool,
        version: u64,
    ) -> Result<Self, TsReqError> {
        let hash_algorithm = hash_algorithm.ok_or_else(|| TsReqError {
            kind: TsReqErrorKind::InvalidArgument,
            message: "hash algorithm identifier is required".to_owned(),
        })?;

        Ok(Self::new(
            hashed_message,
            hash_algorithm.oid.as_str(),
            nonce,
            req_policy,
            cert_req,
            version,
        ))
    }

    /// Version number as constructed or decoded.
    ///
    /// Only `1` is defined, but any value is kept: decoding accepts `0` or
    /// anything above `1`, and encoding writes the value back unchanged.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn message_imprint(&self) -> &MessageImprint {
        &self.message_imprint
    }

    /// Dotted OID of the hash algorithm, read from the message imprint.
    pub fn hash_algorithm(&self) -> &str {
        self.message_imprint.hash_algorithm()
    }

    pub fn hashed_message(&self) -> &[u8] {
        self.message_imprint.hashed_message()
    }

    pub fn req_policy(&self) -> Option<&str> {
        self.req_policy.as_deref()
    }

    pub fn nonce(&self) -> Option<&[u8]> {
        self.nonce.as_deref()
    }

    pub fn cert_req(&self) -> bool {
        self.cert_req
    }

    /// Parses a DER `TimeStampReq`.
    ///
    /// A nonce comes back in canonical two's-complement form, see
    /// [`canonical_nonce`](crate::nonce::canonical_nonce).
    pub fn decode(bytes: &[u8]) -> Result<Self, TsReqError> {
        Self::decode_with(&DerCodec, bytes)
    }

    pub fn decode_with<C: RequestCodec>(codec: &C, bytes: &[u8]) -> Result<Self, TsReqError> {
        Ok(codec.parse(bytes)?.into())
    }

    /// Encodes to DER.
    ///
    /// Fails only when the hash algorithm or policy is not a valid OID.
    pub fn encode(&self) -> Result<Vec<u8>, TsReqError> {
        self.encode_with(&DerCodec)
    }

    pub fn encode_with<C: RequestCodec>(&self, codec: &C) -> Result<Vec<u8>, TsReqError> {
        let mut generator = codec.new_generator();
        let nonce = self.prepare(&mut generator)?;

        match &nonce {
            None => generator.generate(self.hash_algorithm(), self.hashed_message()),
            Some(nonce) => {
                generator.generate_with_nonce(self.hash_algorithm(), self.hashed_message(), nonce)
            }
        }
    }

    /// Copies version, certReq and policy into `generator` and converts the
    /// nonce.
    fn prepare<G: RequestGenerator>(&self, generator: &mut G) -> Result<Option<Int>, TsReqError> {
        generator.set_version(self.version);
        generator.set_cert_req(self.cert_req);
        // Some("") 视为未设置
        if let Some(policy) = self.req_policy().filter(|policy| !policy.is_empty()) {
            generator.set_req_policy(policy);
        }

        self.nonce.as_deref().map(nonce_to_int).transpose()
    }
}

impl From<ParsedRequest> for Request {
    fn from(value: ParsedRequest) -> Self {
        Self::new(
            value.digest,
            value.algorithm_oid,
            value.nonce.as_ref().map(int_to_nonce),
            value.req_policy,
            value.cert_req,
            value.version,
        )
    }
}

impl From<TimeStampReq> for Request {
    fn from(value: TimeStampReq) -> Self {
        ParsedRequest::from(value).into()
    }
}

impl TryFrom<&Request> for TimeStampReq {
    type Error = TsReqError;

    fn try_from(value: &Request) -> Result<Self, Self::Error> {
        let mut generator = DerCodec.new_generator();
        let nonce = value.prepare(&mut generator)?;

        generator.build(value.hash_algorithm(), value.hashed_message(), nonce.as_ref())
    }
}

fn to_der_error(err: TsReqError) -> der::Error {
    // der::Error 无法携带原始信息
    log::debug!("time-stamp request encoding failed: {}", err);
    der::Error::new(der::ErrorKind::Failed, der::Length::ZERO)
}

impl Encode for Request {
    fn encoded_len(&self) -> der::Result<der::Length> {
        TimeStampReq::try_from(self)
            .map_err(to_der_error)?
            .encoded_len()
    }

    fn encode(&self, encoder: &mut impl der::Writer) -> der::Result<()> {
        TimeStampReq::try_from(self)
            .map_err(to_der_error)?
            .encode(encoder)
    }
}

impl<'a> Decode<'a> for Request {
    fn decode<R: der::Reader<'a>>(decoder: &mut R) -> der::Result<Self> {
        Ok(TimeStampReq::decode(decoder)?.into())
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Time-Stamp Request:")?;
        writeln!(f, "{}", format!("Version: {}", self.version).indent(4))?;
        writeln!(f, "{}", self.message_imprint.to_string().indent(4))?;
        writeln!(
            f,
            "{}",
            format!("Policy OID: {}", self.req_policy().unwrap_or("unspecified")).indent(4)
        )?;
        writeln!(
            f,
            "{}",
            match &self.nonce {
                Some(nonce) => format!("Nonce: 0x{}", to_hex_str(nonce)),
                None => "Nonce: unspecified".to_owned(),
            }
            .indent(4)
        )?;
        write!(
            f,
            "{}",
            format!(
                "Certificate required: {}",
                if self.cert_req { "yes" } else { "no" }
            )
            .indent(4)
        )
    }
}

/// Builder returned by [`Request::builder`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestBuilder {
    hashed_message: Vec<u8>,
    hash_algorithm: String,
    nonce: Option<Vec<u8>>,
    req_policy: Option<String>,
    cert_req: bool,
    version: u64,
}

impl RequestBuilder {
    pub fn nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn req_policy(mut self, req_policy: impl Into<String>) -> Self {
        self.req_policy = Some(req_policy.into());
        self
    }

    pub fn cert_req(mut self, cert_req: bool) -> Self {
        self.cert_req = cert_req;
        self
    }

    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> Request {
        Request::new(
            self.hashed_message,
            self.hash_algorithm,
            self.nonce,
            self.req_policy,
            self.cert_req,
            self.version,
        )
    }
}
