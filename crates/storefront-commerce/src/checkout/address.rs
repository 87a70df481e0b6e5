//! Address types.

use serde::{Deserialize, Serialize};

/// Default country for new shipping forms.
pub const DEFAULT_COUNTRY: &str = "United States";

/// A postal address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    /// Create a new address.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            country: country.into(),
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Format as multi-line ("City, State Zip" on the second line).
    pub fn multi_line(&self) -> String {
        format!(
            "{}\n{}, {} {}\n{}",
            self.street, self.city, self.state, self.zip_code, self.country
        )
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        !self.street.is_empty()
            && !self.city.is_empty()
            && !self.state.is_empty()
            && !self.zip_code.is_empty()
            && !self.country.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_formatting() {
        let addr = Address::new("123 Main St", "Springfield", "IL", "62701", DEFAULT_COUNTRY);
        assert!(addr.is_complete());
        assert_eq!(
            addr.one_line(),
            "123 Main St, Springfield, IL, 62701, United States"
        );
        assert_eq!(
            addr.multi_line(),
            "123 Main St\nSpringfield, IL 62701\nUnited States"
        );
    }

    #[test]
    fn test_incomplete_address() {
        let addr = Address {
            street: "1 Elm".to_string(),
            ..Address::default()
        };
        assert!(!addr.is_complete());
        assert_eq!(addr.one_line(), "1 Elm");
    }
}
