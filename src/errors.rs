use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TsReqErrorKind {
    /// Required argument missing or not recognized.
    InvalidArgument,

    /// Bytes are not a valid DER TimeStampReq.
    MalformedEncoding,

    /// Object identifier string cannot be encoded.
    InvalidObjectIdentifier,

    /// DER writer failure.
    EncodeError,

    /// Unknown Error.
    Unknown,
}

#[derive(Debug)]
pub struct TsReqError {
    pub kind: TsReqErrorKind,
    pub message: String,
}

impl TsReqError {
    pub fn new(kind: TsReqErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TsReqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{:?}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for TsReqError {}

pub trait TsReqResult<T> {
    fn map_app_err(self, kind: TsReqErrorKind) -> Result<T, TsReqError>;
    fn map_unknown_err(self) -> Result<T, TsReqError>;
}

impl<T, E> TsReqResult<T> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn map_app_err(self, kind: TsReqErrorKind) -> Result<T, TsReqError> {
        self.map_err(|err| TsReqError {
            kind,
            message: err.to_string(),
        })
    }

    fn map_unknown_err(self) -> Result<T, TsReqError> {
        self.map_app_err(TsReqErrorKind::Unknown)
    }
}
