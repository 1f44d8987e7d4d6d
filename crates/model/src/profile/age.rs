use serde::{Deserialize, Serialize};

/// Profile age. Values outside `[ProfileAge::MIN, ProfileAge::MAX]`
/// can not be constructed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "i64")]
pub struct ProfileAge {
    value: u8,
}

impl ProfileAge {
    pub const MIN: u8 = 18;
    pub const MAX: u8 = 120;

    pub fn value(&self) -> u8 {
        self.value
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAgeError {
    #[error(
        "age must be between {min} and {max}, {0} is below the minimum",
        min = ProfileAge::MIN,
        max = ProfileAge::MAX
    )]
    BelowMinimum(i64),
    #[error(
        "age must be between {min} and {max}, {0} is above the maximum",
        min = ProfileAge::MIN,
        max = ProfileAge::MAX
    )]
    AboveMaximum(u64),
}

impl TryFrom<i64> for ProfileAge {
    type Error = ProfileAgeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < Self::MIN as i64 {
            Err(ProfileAgeError::BelowMinimum(value))
        } else if value > Self::MAX as i64 {
            Err(ProfileAgeError::AboveMaximum(value as u64))
        } else {
            Ok(Self { value: value as u8 })
        }
    }
}

impl From<ProfileAge> for i64 {
    fn from(value: ProfileAge) -> Self {
        value.value.into()
    }
}
