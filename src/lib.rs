//! RFC 3161 time-stamp requests.
//!
//! [`Request`] holds the logical fields of a `TimeStampReq` and converts them
//! to and from canonical DER. The DER work itself goes through a
//! [`RequestCodec`]; [`DerCodec`] is the default one.

pub mod algorithm;
pub mod asn1_types;
pub mod codec;
pub mod errors;
pub mod message_imprint;
pub mod nonce;
pub mod request;
pub mod utils;
pub use der;

pub use algorithm::{AlgorithmIdentifier, HashAlgorithm};
pub use codec::{DerCodec, ParsedRequest, RequestCodec, RequestGenerator, TimeStampReqGenerator};
pub use errors::{TsReqError, TsReqErrorKind, TsReqResult};
pub use message_imprint::MessageImprint;
pub use request::{Request, RequestBuilder};
