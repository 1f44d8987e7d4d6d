use std::{
    io::Write,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use error_stack::{Report, Result, ResultExt};
use model::{AccessToken, AccountId, EmailAddress, Profile, ProfileAge};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "profile_backend.toml";

// Optional configs not in default file for safety:
// debug = false

pub const DEFAULT_CONFIG_FILE_TEXT: &str = r#"

# [general]
# log_timestamp = true

[socket]
public_api = "127.0.0.1:3000"

[auth]
# Requests without access token are handled as requests from this account.
# Remove to require the access token header.
default_account = "user1"

[[profile]]
account_id = "user1"
access_token = "user1-access-token"
name = "Alice"
email = "alice@example.com"
age = 29
bio = "Backend developer."

[[profile]]
account_id = "user2"
access_token = "user2-access-token"
name = "Bob"
email = "bob@example.com"
age = 42
bio = "DevOps engineer."

"#;

#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    #[error("Save config file failed")]
    Save,
    #[error("Save default")]
    SaveDefault,
    #[error("Not a directory")]
    NotDirectory,
    #[error("Load config file")]
    LoadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,
    pub socket: SocketConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Profiles which are added when server starts.
    #[serde(default)]
    pub profile: Vec<SeedProfileConfig>,
}

impl ConfigFile {
    pub fn load(dir: impl AsRef<Path>) -> Result<ConfigFile, ConfigFileError> {
        let config_string =
            ConfigFileUtils::load_string(dir, CONFIG_FILE_NAME, DEFAULT_CONFIG_FILE_TEXT)?;
        Self::parse(&config_string)
    }

    pub fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        toml::from_str(text).change_context(ConfigFileError::LoadConfig)
    }
}

pub struct ConfigFileUtils;

impl ConfigFileUtils {
    pub fn save_string(file_path: impl AsRef<Path>, text: &str) -> Result<(), ConfigFileError> {
        let mut file = std::fs::File::create(file_path).change_context(ConfigFileError::Save)?;
        file.write_all(text.as_bytes())
            .change_context(ConfigFileError::Save)?;
        Ok(())
    }

    pub fn join_dir_path_and_file_name(
        dir: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<PathBuf, ConfigFileError> {
        if !dir.as_ref().is_dir() {
            return Err(Report::new(ConfigFileError::NotDirectory))
                .attach_printable(dir.as_ref().display().to_string());
        }
        let mut file_path = dir.as_ref().to_path_buf();
        file_path.push(file_name);
        Ok(file_path)
    }

    /// Read file. If the file does not exist, save the default file first.
    pub fn load_string(
        dir: impl AsRef<Path>,
        file_name: &str,
        default: &str,
    ) -> Result<String, ConfigFileError> {
        let file_path = Self::join_dir_path_and_file_name(&dir, file_name)
            .change_context(ConfigFileError::LoadConfig)?;
        if !file_path.exists() {
            Self::save_string(&file_path, default).change_context(ConfigFileError::SaveDefault)?;
        }

        std::fs::read_to_string(&file_path).change_context(ConfigFileError::LoadConfig)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub debug: Option<bool>,
    /// Write timestamp to log messages. Enabled by default.
    pub log_timestamp: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocketConfig {
    pub public_api: SocketAddr,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Account for requests which do not have the access token header.
    pub default_account: Option<AccountId>,
}

/// Email and age values are validated when the file is parsed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedProfileConfig {
    pub account_id: AccountId,
    pub access_token: Option<AccessToken>,
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub age: Option<ProfileAge>,
    pub bio: Option<String>,
}

impl SeedProfileConfig {
    pub fn profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            bio: self.bio.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigFile, DEFAULT_CONFIG_FILE_TEXT};

    #[test]
    fn default_config_file_is_valid() {
        let file = ConfigFile::parse(DEFAULT_CONFIG_FILE_TEXT).unwrap();
        assert_eq!(file.socket.public_api.port(), 3000);
        assert_eq!(
            file.auth.default_account.as_ref().map(|v| v.as_str()),
            Some("user1")
        );
        assert_eq!(file.profile.len(), 2);

        let alice = file.profile[0].profile();
        assert_eq!(alice.name.as_deref(), Some("Alice"));
        assert_eq!(
            alice.email.as_ref().map(|v| v.as_str()),
            Some("alice@example.com")
        );
        assert_eq!(alice.age.map(|v| v.value()), Some(29));
    }

    #[test]
    fn optional_sections_can_be_missing() {
        let file = ConfigFile::parse(
            r#"
            [socket]
            public_api = "127.0.0.1:4000"
            "#,
        )
        .unwrap();
        assert!(file.profile.is_empty());
        assert!(file.auth.default_account.is_none());
        assert!(file.general.debug.is_none());
    }

    #[test]
    fn seed_profile_fields_are_optional() {
        let file = ConfigFile::parse(
            r#"
            [socket]
            public_api = "127.0.0.1:4000"

            [[profile]]
            account_id = "u1"
            "#,
        )
        .unwrap();
        let profile = file.profile[0].profile();
        assert!(profile.name.is_none() && profile.email.is_none());
        assert!(profile.age.is_none() && profile.bio.is_none());
        assert!(file.profile[0].access_token.is_none());
    }

    #[test]
    fn invalid_seed_email_is_rejected() {
        let result = ConfigFile::parse(
            r#"
            [socket]
            public_api = "127.0.0.1:4000"

            [[profile]]
            account_id = "u1"
            email = "bademail"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_seed_age_is_rejected() {
        let result = ConfigFile::parse(
            r#"
            [socket]
            public_api = "127.0.0.1:4000"

            [[profile]]
            account_id = "u1"
            age = 15
            "#,
        );
        assert!(result.is_err());
    }
}
