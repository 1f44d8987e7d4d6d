use std::collections::HashMap;

use config::Config;
use model::{AccessToken, AccountId};
use server_api::app::AuthResolver;
use tracing::debug;

/// Access token resolver which uses static tokens from config file.
///
/// Requests without token are mapped to the default account
/// if it is configured.
#[derive(Debug, Clone, Default)]
pub struct MockAccessTokenResolver {
    tokens: HashMap<AccessToken, AccountId>,
    default_account: Option<AccountId>,
}

impl MockAccessTokenResolver {
    pub fn new(
        tokens: HashMap<AccessToken, AccountId>,
        default_account: Option<AccountId>,
    ) -> Self {
        Self {
            tokens,
            default_account,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.access_tokens().clone(),
            config.default_account().cloned(),
        )
    }
}

impl AuthResolver for MockAccessTokenResolver {
    async fn resolve_account(&self, token: Option<&AccessToken>) -> Option<AccountId> {
        match token {
            Some(token) => {
                let account = self.tokens.get(token).cloned();
                if account.is_none() {
                    debug!("Unknown access token");
                }
                account
            }
            None => self.default_account.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use model::{AccessToken, AccountId};
    use server_api::app::AuthResolver;

    use super::MockAccessTokenResolver;

    fn token(value: &str) -> AccessToken {
        AccessToken::new(value.to_string())
    }

    fn resolver(default_account: Option<AccountId>) -> MockAccessTokenResolver {
        MockAccessTokenResolver::new(
            HashMap::from([(token("t1"), AccountId::from("u1"))]),
            default_account,
        )
    }

    #[tokio::test]
    async fn known_token_resolves_to_its_account() {
        let resolver = resolver(Some("u2".into()));
        assert_eq!(
            resolver.resolve_account(Some(&token("t1"))).await,
            Some(AccountId::from("u1"))
        );
    }

    #[tokio::test]
    async fn unknown_token_does_not_use_default_account() {
        let resolver = resolver(Some("u2".into()));
        assert_eq!(resolver.resolve_account(Some(&token("other"))).await, None);
    }

    #[tokio::test]
    async fn missing_token_uses_default_account_if_configured() {
        assert_eq!(
            resolver(Some("u2".into())).resolve_account(None).await,
            Some(AccountId::from("u2"))
        );
        assert_eq!(resolver(None).resolve_account(None).await, None);
    }
}
