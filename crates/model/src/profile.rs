use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

mod age;
mod email;

pub use age::*;
pub use email::*;

/// Profile of one account.
///
/// All values in this type are valid because [ProfileAge] and
/// [EmailAddress] can be created only from valid values.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct Profile {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub email: Option<EmailAddress>,
    /// Min value for this field is 18 and max value is 120.
    #[schema(value_type = Option<i64>, minimum = 18, maximum = 120)]
    pub age: Option<ProfileAge>,
    pub bio: Option<String>,
}

/// Partial profile update. Fields which are missing or `null` are not
/// changed. Other fields are ignored.
///
/// This type only documents the request body. Handlers read the body
/// as [ProfileUpdateJson], so that every invalid field can be reported.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Min value for this field is 18 and max value is 120.
    #[schema(minimum = 18, maximum = 120)]
    pub age: Option<i64>,
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub const NAME: &'static str = "name";
    pub const EMAIL: &'static str = "email";
    pub const AGE: &'static str = "age";
    pub const BIO: &'static str = "bio";

    pub const FIELDS: [&'static str; 4] = [Self::NAME, Self::EMAIL, Self::AGE, Self::BIO];
}

/// Request body of a profile update before validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProfileUpdateJson(pub Map<String, Value>);

impl ProfileUpdateJson {
    /// Keys which are not profile fields.
    pub fn unknown_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !ProfileUpdate::FIELDS.contains(k))
    }

    fn value(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    fn text(&self, field: &'static str, errors: &mut ValidationErrors) -> Option<String> {
        match self.value(field)? {
            Value::String(text) => Some(text.clone()),
            _ => {
                errors.push(field, format!("{field} must be a string"));
                None
            }
        }
    }

    fn email(&self, errors: &mut ValidationErrors) -> Option<EmailAddress> {
        let field = ProfileUpdate::EMAIL;
        match self.value(field)? {
            Value::String(text) => match EmailAddress::parse(text) {
                Ok(email) => Some(email),
                Err(e) => {
                    errors.push(field, e.to_string());
                    None
                }
            },
            _ => {
                errors.push(field, "email must be a string");
                None
            }
        }
    }

    fn age(&self, errors: &mut ValidationErrors) -> Option<ProfileAge> {
        let field = ProfileUpdate::AGE;
        let number = match self.value(field)? {
            Value::Number(number) => number,
            _ => {
                errors.push(field, "age must be an integer");
                return None;
            }
        };

        let result = match (number.as_i64(), number.as_u64()) {
            (Some(value), _) => ProfileAge::try_from(value),
            (None, Some(value)) => Err(ProfileAgeError::AboveMaximum(value)),
            (None, None) => {
                errors.push(field, "age must be an integer");
                return None;
            }
        };

        match result {
            Ok(age) => Some(age),
            Err(e) => {
                errors.push(field, e.to_string());
                None
            }
        }
    }

    /// Check every profile field of the update. All invalid fields are
    /// reported, not only the first one.
    pub fn validate(&self) -> Result<ProfileUpdateValidated, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.text(ProfileUpdate::NAME, &mut errors);
        let email = self.email(&mut errors);
        let age = self.age(&mut errors);
        let bio = self.text(ProfileUpdate::BIO, &mut errors);

        if errors.is_empty() {
            Ok(ProfileUpdateValidated {
                name,
                email,
                age,
                bio,
            })
        } else {
            Err(errors)
        }
    }
}

/// Profile fields which passed validation. `None` means that the field
/// is not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdateValidated {
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub age: Option<ProfileAge>,
    pub bio: Option<String>,
}

impl ProfileUpdateValidated {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none() && self.bio.is_none()
    }

    pub fn apply_to(&self, target: &mut Profile) {
        if let Some(name) = &self.name {
            target.name = Some(name.clone());
        }
        if let Some(email) = &self.email {
            target.email = Some(email.clone());
        }
        if let Some(age) = self.age {
            target.age = Some(age);
        }
        if let Some(bio) = &self.bio {
            target.bio = Some(bio.clone());
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the invalid field.
    pub field: String,
    /// Human readable description of the error.
    pub reason: String,
}

/// Error response body for invalid requests.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, reason);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}
