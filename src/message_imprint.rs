use std::fmt::Display;

use crate::{
    algorithm::AlgorithmIdentifier,
    utils::{to_hex_str, IndentString},
};

/// Hash algorithm identifier together with the digest it produced.
///
/// Both values are stored verbatim. The digest length is not checked against
/// the algorithm and empty values are accepted.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MessageImprint {
    hash_algorithm: String,
    hashed_message: Vec<u8>,
}

impl MessageImprint {
    pub fn new(hashed_message: impl Into<Vec<u8>>, hash_algorithm: impl Into<String>) -> Self {
        Self {
            hash_algorithm: hash_algorithm.into(),
            hashed_message: hashed_message.into(),
        }
    }

    /// Dotted OID of the hash algorithm.
    pub fn hash_algorithm(&self) -> &str {
        &self.hash_algorithm
    }

    pub fn hashed_message(&self) -> &[u8] {
        &self.hashed_message
    }
}

impl Display for MessageImprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Message Imprint:")?;
        writeln!(
            f,
            "{}",
            format!(
                "Hash Algorithm: {}",
                AlgorithmIdentifier::new(self.hash_algorithm.as_str())
            )
            .indent(4)
        )?;
        write!(
            f,
            "{}",
            format!("Message Data: {}", to_hex_str(&self.hashed_message)).indent(4)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_fields_verbatim() {
        let imprint = MessageImprint::new(vec![0xaa; 20], "1.3.14.3.2.26");

        assert_eq!(imprint.hash_algorithm(), "1.3.14.3.2.26");
        assert_eq!(imprint.hashed_message(), &[0xaa; 20][..]);
    }

    #[test]
    fn accepts_empty_values() {
        let imprint = MessageImprint::new(Vec::new(), "");

        assert_eq!(imprint.hash_algorithm(), "");
        assert!(imprint.hashed_message().is_empty());
    }

    #[test]
    fn display() {
        let imprint = MessageImprint::new(vec![0x01, 0x02], "2.16.840.1.101.3.4.2.1");

        assert_eq!(
            imprint.to_string(),
            "Message Imprint:\n    Hash Algorithm: sha256 (2.16.840.1.101.3.4.2.1)\n    Message Data: 0102"
        );
    }
}
