#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

pub mod args;
pub mod file;

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
};

use args::ArgsConfig;
use error_stack::{Report, Result, ResultExt};
use file::{ConfigFile, SeedProfileConfig};
use model::{AccessToken, AccountId};

pub use self::file::ConfigFileError;

#[derive(thiserror::Error, Debug)]
pub enum GetConfigError {
    #[error("Get working directory error")]
    GetWorkingDir,
    #[error("File loading failed")]
    LoadFileError,
    #[error("Invalid configuration")]
    InvalidConfiguration,
}

#[derive(Debug, Clone)]
pub struct Config {
    file: ConfigFile,
    public_api: SocketAddr,
    access_tokens: HashMap<AccessToken, AccountId>,
}

impl Config {
    /// Check config file contents and apply command line overrides.
    pub fn new(file: ConfigFile, args: ArgsConfig) -> Result<Self, GetConfigError> {
        let mut account_ids = HashSet::new();
        let mut access_tokens = HashMap::new();
        for p in &file.profile {
            let id = &p.account_id;
            if !account_ids.insert(id.clone()) {
                return Err(Report::new(GetConfigError::InvalidConfiguration))
                    .attach_printable(format!("Duplicate profile account ID: {id}"));
            }
            if let Some(token) = &p.access_token {
                if token.as_str().trim().is_empty() {
                    return Err(Report::new(GetConfigError::InvalidConfiguration))
                        .attach_printable(format!("Empty access token for account {id}"));
                }
                if access_tokens.insert(token.clone(), id.clone()).is_some() {
                    return Err(Report::new(GetConfigError::InvalidConfiguration))
                        .attach_printable(format!("Access token of account {id} is already used"));
                }
            }
        }

        let public_api = args.public_api.unwrap_or(file.socket.public_api);

        Ok(Self {
            file,
            public_api,
            access_tokens,
        })
    }

    /// Server should run in debug mode.
    ///
    /// Debug mode changes:
    /// * Swagger UI is enabled on public API port.
    /// * HTTP requests are logged.
    pub fn debug_mode(&self) -> bool {
        self.file.general.debug.unwrap_or(false)
    }

    pub fn log_timestamp(&self) -> bool {
        self.file.general.log_timestamp.unwrap_or(true)
    }

    pub fn public_api(&self) -> SocketAddr {
        self.public_api
    }

    pub fn default_account(&self) -> Option<&AccountId> {
        self.file.auth.default_account.as_ref()
    }

    pub fn seed_profiles(&self) -> &[SeedProfileConfig] {
        &self.file.profile
    }

    pub fn access_tokens(&self) -> &HashMap<AccessToken, AccountId> {
        &self.access_tokens
    }
}

/// Read config file from the directory given in arguments or from
/// current directory.
pub fn get_config(args: ArgsConfig) -> Result<Config, GetConfigError> {
    let dir = match args.config_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().change_context(GetConfigError::GetWorkingDir)?,
    };
    let file = ConfigFile::load(&dir)
        .change_context(GetConfigError::LoadFileError)
        .attach_printable_lazy(|| format!("Config directory: {}", dir.display()))?;
    Config::new(file, args)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use model::AccessToken;

    use crate::{
        Config, GetConfigError,
        args::ArgsConfig,
        file::{ConfigFile, DEFAULT_CONFIG_FILE_TEXT},
    };

    fn file(text: &str) -> ConfigFile {
        ConfigFile::parse(text).unwrap()
    }

    #[test]
    fn default_config() {
        let config = Config::new(file(DEFAULT_CONFIG_FILE_TEXT), ArgsConfig::default()).unwrap();
        assert!(!config.debug_mode());
        assert!(config.log_timestamp());
        assert_eq!(
            config.public_api(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.seed_profiles().len(), 2);
        assert_eq!(
            config
                .access_tokens()
                .get(&AccessToken::new("user2-access-token".to_string()))
                .map(|v| v.as_str()),
            Some("user2")
        );
    }

    #[test]
    fn public_api_argument_overrides_file() {
        let args = ArgsConfig {
            public_api: Some("0.0.0.0:8080".parse().unwrap()),
            ..Default::default()
        };
        let config = Config::new(file(DEFAULT_CONFIG_FILE_TEXT), args).unwrap();
        assert_eq!(config.public_api().port(), 8080);
    }

    #[test]
    fn duplicate_account_id_is_rejected() {
        let text = r#"
            [socket]
            public_api = "127.0.0.1:4000"

            [[profile]]
            account_id = "u1"

            [[profile]]
            account_id = "u1"
            "#;
        let error = Config::new(file(text), ArgsConfig::default()).unwrap_err();
        assert!(matches!(
            error.current_context(),
            GetConfigError::InvalidConfiguration
        ));
    }

    #[test]
    fn shared_access_token_is_rejected() {
        let text = r#"
            [socket]
            public_api = "127.0.0.1:4000"

            [[profile]]
            account_id = "u1"
            access_token = "token"

            [[profile]]
            account_id = "u2"
            access_token = "token"
            "#;
        assert!(Config::new(file(text), ArgsConfig::default()).is_err());
    }
}
