use std::fmt::Display;

use der::oid::{
    db::rfc5912::{ID_SHA_1, ID_SHA_224, ID_SHA_256, ID_SHA_384, ID_SHA_512},
    ObjectIdentifier,
};

use crate::errors::{TsReqError, TsReqErrorKind};

pub const ID_MD_5: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.2.5");
pub const ID_SHA_3_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.8");
pub const ID_SHA_3_384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.9");
pub const ID_SHA_3_512: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.10");

/// Hash algorithms commonly found in a message imprint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Unsupported(String),
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_384 => "sha3-384",
            HashAlgorithm::Sha3_512 => "sha3-512",
            HashAlgorithm::Unsupported(oid) => oid.as_str(),
        };

        write!(f, "{}", name)
    }
}

impl From<ObjectIdentifier> for HashAlgorithm {
    fn from(value: ObjectIdentifier) -> Self {
        match value {
            ID_MD_5 => Self::Md5,
            ID_SHA_1 => Self::Sha1,
            ID_SHA_224 => Self::Sha224,
            ID_SHA_256 => Self::Sha256,
            ID_SHA_384 => Self::Sha384,
            ID_SHA_512 => Self::Sha512,
            ID_SHA_3_256 => Self::Sha3_256,
            ID_SHA_3_384 => Self::Sha3_384,
            ID_SHA_3_512 => Self::Sha3_512,
            oid => Self::Unsupported(oid.to_string()),
        }
    }
}

impl From<&str> for HashAlgorithm {
    fn from(value: &str) -> Self {
        match ObjectIdentifier::new(value) {
            Ok(oid) => oid.into(),
            Err(_) => Self::Unsupported(value.to_owned()),
        }
    }
}

impl HashAlgorithm {
    /// Looks up a friendly name such as `SHA-256`, `sha256` or `SHA3_384`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "MD5" => Some(Self::Md5),
            "SHA1" => Some(Self::Sha1),
            "SHA224" | "SHA2224" => Some(Self::Sha224),
            "SHA256" | "SHA2256" => Some(Self::Sha256),
            "SHA384" | "SHA2384" => Some(Self::Sha384),
            "SHA512" | "SHA2512" => Some(Self::Sha512),
            "SHA3256" => Some(Self::Sha3_256),
            "SHA3384" => Some(Self::Sha3_384),
            "SHA3512" => Some(Self::Sha3_512),
            _ => None,
        }
    }

    pub fn oid(&self) -> Option<ObjectIdentifier> {
        match self {
            HashAlgorithm::Md5 => Some(ID_MD_5),
            HashAlgorithm::Sha1 => Some(ID_SHA_1),
            HashAlgorithm::Sha224 => Some(ID_SHA_224),
            HashAlgorithm::Sha256 => Some(ID_SHA_256),
            HashAlgorithm::Sha384 => Some(ID_SHA_384),
            HashAlgorithm::Sha512 => Some(ID_SHA_512),
            HashAlgorithm::Sha3_256 => Some(ID_SHA_3_256),
            HashAlgorithm::Sha3_384 => Some(ID_SHA_3_384),
            HashAlgorithm::Sha3_512 => Some(ID_SHA_3_512),
            HashAlgorithm::Unsupported(_) => None,
        }
    }
}

/// Identifier of the hash algorithm used for a message imprint.
///
/// Only the object identifier is carried; hash parameters are always encoded
/// as `NULL`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AlgorithmIdentifier {
    pub oid: String,
}

impl AlgorithmIdentifier {
    pub fn new(oid: impl Into<String>) -> Self {
        Self { oid: oid.into() }
    }

    pub fn from_name(name: &str) -> Result<Self, TsReqError> {
        HashAlgorithm::from_name(name)
            .and_then(|alg| alg.oid())
            .map(|oid| Self::new(oid.to_string()))
            .ok_or_else(|| TsReqError {
                kind: TsReqErrorKind::InvalidArgument,
                message: format!("unknown hash algorithm: {}", name),
            })
    }

    // 名称或点分 OID 均可
    pub fn lookup(name_or_oid: &str) -> Result<Self, TsReqError> {
        match Self::from_name(name_or_oid) {
            Ok(alg) => Ok(alg),
            Err(err) => match ObjectIdentifier::new(name_or_oid) {
                Ok(oid) => Ok(Self::new(oid.to_string())),
                Err(_) => Err(err),
            },
        }
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.oid.as_str().into()
    }
}

impl From<ObjectIdentifier> for AlgorithmIdentifier {
    fn from(value: ObjectIdentifier) -> Self {
        Self::new(value.to_string())
    }
}

impl Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.hash_algorithm() {
            HashAlgorithm::Unsupported(oid) => write!(f, "{}", oid),
            alg => write!(f, "{} ({})", alg, self.oid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_friendly_name() {
        assert_eq!(
            AlgorithmIdentifier::from_name("SHA-256").unwrap().oid,
            "2.16.840.1.101.3.4.2.1"
        );
        assert_eq!(
            AlgorithmIdentifier::from_name("sha1").unwrap().oid,
            "1.3.14.3.2.26"
        );
        assert_eq!(
            AlgorithmIdentifier::from_name("SHA3_512").unwrap().oid,
            "2.16.840.1.101.3.4.2.10"
        );
    }

    #[test]
    fn unknown_name_is_invalid_argument() {
        let err = AlgorithmIdentifier::from_name("whirlpool").unwrap_err();
        assert_eq!(err.kind, TsReqErrorKind::InvalidArgument);
    }

    #[test]
    fn lookup_accepts_dotted_oid() {
        assert_eq!(
            AlgorithmIdentifier::lookup("1.2.3.4").unwrap().oid,
            "1.2.3.4"
        );
        assert_eq!(
            AlgorithmIdentifier::lookup("sha384").unwrap().oid,
            "2.16.840.1.101.3.4.2.2"
        );
        assert!(AlgorithmIdentifier::lookup("not an oid").is_err());
    }

    #[test]
    fn classify_oid() {
        assert_eq!(HashAlgorithm::from(ID_SHA_512), HashAlgorithm::Sha512);
        assert_eq!(
            HashAlgorithm::from("1.2.3.4"),
            HashAlgorithm::Unsupported("1.2.3.4".to_owned())
        );
        assert_eq!(
            HashAlgorithm::from(""),
            HashAlgorithm::Unsupported("".to_owned())
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            AlgorithmIdentifier::new("2.16.840.1.101.3.4.2.1").to_string(),
            "sha256 (2.16.840.1.101.3.4.2.1)"
        );
        assert_eq!(AlgorithmIdentifier::new("1.2.3").to_string(), "1.2.3");
    }
}
