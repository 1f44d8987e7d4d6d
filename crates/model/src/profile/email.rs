use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Email address which has `local-part@domain` format and
/// at least one dot inside the domain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress {
    address: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailAddressError {
    #[error("email is not a valid address")]
    Invalid,
}

impl EmailAddress {
    pub fn parse(value: &str) -> Result<Self, EmailAddressError> {
        let value = value.trim();
        let address = lettre::Address::from_str(value).map_err(|_| EmailAddressError::Invalid)?;
        let domain = address.domain();
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailAddressError::Invalid);
        }

        Ok(Self {
            address: value.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.address
    }
}
