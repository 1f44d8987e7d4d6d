use std::{collections::HashMap, sync::Arc};

use error_stack::{Report, Result, ResultExt};
use model::{AccountId, Profile, ProfileUpdateValidated};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{DataError, ProfileStore};

/// Profiles stored in RAM. Contents are lost when the server quits.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<AccountId, Arc<RwLock<Profile>>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile_if_not_exists(
        &self,
        id: AccountId,
        profile: Profile,
    ) -> Result<(), DataError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&id) {
            return Err(Report::new(DataError::AlreadyExists))
                .attach_printable(format!("Account ID: {id}"));
        }
        profiles.insert(id, Arc::new(RwLock::new(profile)));
        Ok(())
    }

    pub async fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.profiles.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn entry(&self, id: &AccountId) -> Result<Arc<RwLock<Profile>>, DataError> {
        self.profiles
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Report::new(DataError::NotFound))
            .attach_printable_lazy(|| format!("Account ID: {id}"))
    }
}

impl ProfileStore for InMemoryProfileStore {
    async fn profile(&self, id: &AccountId) -> Result<Profile, DataError> {
        let entry = self.entry(id).await?;
        let profile = entry.read().await.clone();
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: &AccountId,
        update: ProfileUpdateValidated,
    ) -> Result<Profile, DataError> {
        let entry = self.entry(id).await?;
        let mut profile = entry.write().await;
        if update.is_empty() {
            debug!("Empty profile update for {id}");
        } else {
            update.apply_to(&mut profile);
        }
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use model::{AccountId, EmailAddress, Profile, ProfileAge, ProfileUpdateValidated};

    use super::InMemoryProfileStore;
    use crate::{DataError, ProfileStore};

    fn alice() -> Profile {
        Profile {
            name: Some("Alice".to_string()),
            email: Some(EmailAddress::parse("a@example.com").unwrap()),
            age: Some(ProfileAge::try_from(30i64).unwrap()),
            bio: Some(String::new()),
        }
    }

    fn bob() -> Profile {
        Profile {
            name: Some("Bob".to_string()),
            email: Some(EmailAddress::parse("bob@example.com").unwrap()),
            age: Some(ProfileAge::try_from(42i64).unwrap()),
            bio: Some("DevOps engineer.".to_string()),
        }
    }

    async fn store() -> InMemoryProfileStore {
        let store = InMemoryProfileStore::new();
        store
            .insert_profile_if_not_exists("u1".into(), alice())
            .await
            .unwrap();
        store
            .insert_profile_if_not_exists("u2".into(), bob())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn get_returns_seeded_profile() {
        let store = store().await;
        assert_eq!(store.profile(&"u1".into()).await.unwrap(), alice());
        assert_eq!(store.profile(&"u2".into()).await.unwrap(), bob());
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let store = store().await;
        let error = store.profile(&"u3".into()).await.unwrap_err();
        assert_eq!(*error.current_context(), DataError::NotFound);
        let error = store
            .update_profile(&"u3".into(), ProfileUpdateValidated::default())
            .await
            .unwrap_err();
        assert_eq!(*error.current_context(), DataError::NotFound);
    }

    #[tokio::test]
    async fn duplicate_seed_is_rejected() {
        let store = store().await;
        let error = store
            .insert_profile_if_not_exists("u1".into(), bob())
            .await
            .unwrap_err();
        assert_eq!(*error.current_context(), DataError::AlreadyExists);
        assert_eq!(store.profile(&"u1".into()).await.unwrap(), alice());
    }

    #[tokio::test]
    async fn update_changes_only_given_fields_of_one_account() {
        let store = store().await;
        let update = ProfileUpdateValidated {
            age: Some(ProfileAge::try_from(25i64).unwrap()),
            email: Some(EmailAddress::parse("a@new.com").unwrap()),
            ..Default::default()
        };
        let updated = store.update_profile(&"u1".into(), update).await.unwrap();

        let expected = Profile {
            age: Some(ProfileAge::try_from(25i64).unwrap()),
            email: Some(EmailAddress::parse("a@new.com").unwrap()),
            ..alice()
        };
        assert_eq!(updated, expected);
        assert_eq!(store.profile(&"u1".into()).await.unwrap(), expected);
        assert_eq!(store.profile(&"u2".into()).await.unwrap(), bob());
    }

    #[tokio::test]
    async fn account_ids_are_sorted() {
        let store = store().await;
        assert_eq!(
            store.account_ids().await,
            vec![AccountId::from("u1"), AccountId::from("u2")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_applied_as_a_whole() {
        let store = Arc::new(store().await);
        let mut tasks = vec![];
        for i in 0..50u8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let age = ProfileAge::try_from(20 + i64::from(i)).unwrap();
                for _ in 0..20 {
                    let update = ProfileUpdateValidated {
                        name: Some(format!("name{i}")),
                        age: Some(age),
                        ..Default::default()
                    };
                    store.update_profile(&"u1".into(), update).await.unwrap();
                    tokio::task::yield_now().await;
                }
            }));
        }

        let mut updated_reads = 0;
        loop {
            let writers_done = tasks.iter().all(|t| t.is_finished());
            let profile = store.profile(&"u1".into()).await.unwrap();
            let name = profile.name.unwrap();
            let age = profile.age.unwrap().value();
            if name == "Alice" {
                assert_eq!(age, 30);
            } else {
                assert_eq!(name, format!("name{}", age - 20));
                updated_reads += 1;
            }
            if writers_done {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(updated_reads > 0);

        for t in tasks {
            t.await.unwrap();
        }
    }
}
