use alloy::primitives::Address;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Wrapper around `[u8; 20]` representing an address as stored in
/// `FixedString(20)` columns.
///
/// Storing raw bytes makes the key canonical: two spellings of the same hex
/// address always map to the same row.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Deref,
    ToSchema,
)]
#[schema(
    value_type = String,
    format = "hex",
    description = "20-byte address as lowercase hex string",
    example = "0x35efa4699edd7b468cbbf4fff7b6e7afc0a7ada6"
)]
pub struct AddressBytes(pub [u8; 20]);

impl From<[u8; 20]> for AddressBytes {
    fn from(value: [u8; 20]) -> Self {
        Self(value)
    }
}

impl From<Address> for AddressBytes {
    fn from(value: Address) -> Self {
        Self(value.into_array())
    }
}

impl From<AddressBytes> for Address {
    fn from(value: AddressBytes) -> Self {
        Self::from(value.0)
    }
}

impl AsRef<[u8]> for AddressBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl fmt::Display for AddressBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl AddressBytes {
    /// Hex form without the `0x` prefix, as accepted by `unhex()`.
    pub fn to_unprefixed_hex(&self) -> String {
        hex::encode(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lowercase_hex() {
        let addr: Address = "0x35EfA4699EdD7b468CBBf4FfF7B6e7AFC0A7aDa6".parse().unwrap();
        let bytes = AddressBytes::from(addr);
        assert_eq!(bytes.to_string(), "0x35efa4699edd7b468cbbf4fff7b6e7afc0a7ada6");
        assert_eq!(bytes.to_unprefixed_hex(), "35efa4699edd7b468cbbf4fff7b6e7afc0a7ada6");
        assert_eq!(Address::from(bytes), addr);
    }

    #[test]
    fn mixed_case_spellings_share_a_key() {
        let upper: Address = "0xBE01179F2291773D220EAE55EE85B417F40342D0".parse().unwrap();
        let lower: Address = "0xbe01179f2291773d220eae55ee85b417f40342d0".parse().unwrap();
        assert_eq!(AddressBytes::from(upper), AddressBytes::from(lower));
    }
}
