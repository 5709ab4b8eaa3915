use thiserror::Error;

/// Failures of a manual, single-address points calculation.
///
/// The `Display` strings are user-facing.
#[derive(Debug, Error)]
pub enum PointsError {
    /// The input was empty.
    #[error("Please enter an address")]
    MissingAddress,
    /// The input is not a 20-byte hex address.
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),
    /// The input is the reserved pool address.
    #[error("This address is not eligible for points tracking")]
    IneligibleAddress,
    /// A display name was empty after trimming.
    #[error("Display name must not be empty")]
    EmptyDisplayName,
    /// Reading chain state failed.
    #[error("Error fetching data. Please check the address and try again.")]
    ChainRead(eyre::Report),
    /// Writing to the store failed.
    #[error("Failed to save changes. Please try again later.")]
    Store(eyre::Report),
}

impl PointsError {
    /// Whether the caller supplied bad input, as opposed to a backend failure.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MissingAddress
                | Self::InvalidAddress(_)
                | Self::IneligibleAddress
                | Self::EmptyDisplayName
        )
    }
}
