use der::{
    asn1::{Int, OctetString},
    oid::ObjectIdentifier,
    Sequence,
};
use x509_cert::{ext::Extensions, spki::AlgorithmIdentifierOwned};

/// ```text
/// MessageImprint ::= SEQUENCE {
/// hashAlgorithm AlgorithmIdentifier,
/// hashedMessage OCTET STRING }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct MessageImprint {
    pub hash_algorithm: AlgorithmIdentifierOwned,
    pub hashed_message: OctetString,
}

/// ```text
/// TimeStampReq ::= SEQUENCE {
/// version INTEGER { v1(1) },
/// messageImprint MessageImprint,
/// reqPolicy TSAPolicyId OPTIONAL,
/// nonce INTEGER OPTIONAL,
/// certReq BOOLEAN DEFAULT FALSE,
/// extensions [0] IMPLICIT Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct TimeStampReq {
    pub version: u64,
    pub message_imprint: MessageImprint,
    #[asn1(optional = "true")]
    pub req_policy: Option<ObjectIdentifier>,
    #[asn1(optional = "true")]
    pub nonce: Option<Int>,
    #[asn1(default = "default_false")]
    pub cert_req: bool,
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", optional = "true")]
    pub extensions: Option<Extensions>,
}

fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use der::{
        oid::db::rfc5912::ID_SHA_256,
        Decode, Encode,
    };

    use super::*;

    #[test]
    fn parse_openssl_request_without_nonce() {
        let bytes = include_bytes!("./fixtures/sha256_plain.tsq");
        let req = TimeStampReq::from_der(bytes).unwrap();

        assert_eq!(req.version, 1);
        assert_eq!(req.message_imprint.hash_algorithm.oid, ID_SHA_256);
        assert_eq!(
            req.message_imprint.hashed_message.as_bytes(),
            &(1..=32).collect::<Vec<u8>>()[..]
        );
        assert!(req.req_policy.is_none());
        assert!(req.nonce.is_none());
        assert!(!req.cert_req);
        assert!(req.extensions.is_none());
        assert_eq!(req.to_der().unwrap(), bytes);
    }

    #[test]
    fn parse_openssl_request_with_all_fields() {
        let bytes = include_bytes!("./fixtures/sha256_policy_nonce_cert.tsq");
        let req = TimeStampReq::from_der(bytes).unwrap();

        assert_eq!(
            req.req_policy,
            Some(ObjectIdentifier::new_unwrap("1.2.3.4.1"))
        );
        assert_eq!(
            req.nonce.as_ref().unwrap().as_bytes(),
            &[0x00, 0xe0, 0x26, 0x61, 0x30, 0x95, 0x8b, 0xeb, 0x35]
        );
        assert!(req.cert_req);
        assert_eq!(req.to_der().unwrap(), bytes);
    }

    #[test]
    fn parse_request_with_extensions() {
        let bytes = include_bytes!("./fixtures/sha256_with_extensions.tsq");
        let req = TimeStampReq::from_der(bytes).unwrap();
        let extensions = req.extensions.as_ref().unwrap();

        assert_eq!(extensions.len(), 1);
        assert_eq!(
            extensions[0].extn_id,
            ObjectIdentifier::new_unwrap("1.2.3.5")
        );
        assert_eq!(extensions[0].extn_value.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn reject_trailing_data() {
        let mut bytes = include_bytes!("./fixtures/sha256_plain.tsq").to_vec();
        bytes.push(0x00);

        assert!(TimeStampReq::from_der(&bytes).is_err());
    }
}
