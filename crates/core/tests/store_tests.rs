// ═══════════════════════════════════════════════════════════════════
// Store Tests — snapshot format, LocalStore, profiles, RemoteStore
// ═══════════════════════════════════════════════════════════════════

use chrono::Utc;

use subscription_tracker_core::errors::CoreError;
use subscription_tracker_core::models::subscription::{
    Category, SubscriptionFields, SubscriptionPatch,
};
use subscription_tracker_core::store::format::{self, CURRENT_VERSION, HEADER_SIZE, MAGIC};
use subscription_tracker_core::store::local::LocalStore;
use subscription_tracker_core::store::remote::{RemoteStore, RemoteStoreConfig};
use subscription_tracker_core::store::traits::SubscriptionStore;

fn netflix() -> SubscriptionFields {
    SubscriptionFields::new("Netflix", 17000.0, 15, Category::Ott)
}

fn spotify() -> SubscriptionFields {
    SubscriptionFields::new("Spotify", 10900.0, 20, Category::Music)
}

// ═══════════════════════════════════════════════════════════════════
// Snapshot format
// ═══════════════════════════════════════════════════════════════════

mod format_tests {
    use super::*;

    #[test]
    fn header_layout() {
        let data = format::write_file(CURRENT_VERSION, b"payload");
        assert_eq!(&data[0..4], MAGIC);
        assert_eq!(data.len(), HEADER_SIZE + 7);

        let (header, payload) = format::read_file(&data).unwrap();
        assert_eq!(header.version, CURRENT_VERSION);
        assert_eq!(header.payload_len, 7);
        assert_eq!(payload, b"payload");
    }

    #[test]
    fn too_small() {
        let result = format::read_file(b"SUBT");
        assert!(matches!(result, Err(CoreError::InvalidFileFormat(_))));
    }

    #[test]
    fn bad_magic() {
        let mut data = format::write_file(CURRENT_VERSION, b"x");
        data[0] = b'X';
        assert!(matches!(
            format::read_file(&data),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn unsupported_versions() {
        let future = format::write_file(CURRENT_VERSION + 1, b"x");
        assert!(matches!(
            format::read_file(&future),
            Err(CoreError::UnsupportedVersion(v)) if v == CURRENT_VERSION + 1
        ));

        let zero = format::write_file(0, b"x");
        assert!(matches!(
            format::read_file(&zero),
            Err(CoreError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn truncated_payload() {
        let mut data = format::write_file(CURRENT_VERSION, b"0123456789");
        data.truncate(HEADER_SIZE + 4);
        assert!(matches!(
            format::read_file(&data),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// LocalStore — collections
// ═══════════════════════════════════════════════════════════════════

mod local_store_tests {
    use super::*;

    #[tokio::test]
    async fn create_and_list() {
        let store = LocalStore::in_memory();
        let id = store.create("user_a", netflix()).await.unwrap();
        store.create("user_a", spotify()).await.unwrap();

        let subs = store.list("user_a").await.unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].id, id);
        assert!(id.starts_with("sub_"));
        assert_eq!(subs[0].name, "Netflix");
        assert_eq!(subs[1].name, "Spotify");
    }

    #[tokio::test]
    async fn owners_are_isolated() {
        let store = LocalStore::in_memory();
        store.create("user_a", netflix()).await.unwrap();
        assert!(store.list("user_b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = LocalStore::in_memory();
        let id = store.create("user_a", netflix()).await.unwrap();
        let before = store.list("user_a").await.unwrap()[0].clone();

        let patch = SubscriptionPatch {
            cost: Some(13500.0),
            ..SubscriptionPatch::default()
        };
        store.update("user_a", &id, &patch).await.unwrap();

        let after = store.list("user_a").await.unwrap()[0].clone();
        assert_eq!(after.cost, 13500.0);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.name, before.name);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = LocalStore::in_memory();
        store.create("user_a", netflix()).await.unwrap();

        let update = store.update("user_a", "sub_missing", &SubscriptionPatch::pause(true)).await;
        assert!(matches!(update, Err(CoreError::SubscriptionNotFound(_))));

        let delete = store.delete("user_a", "sub_missing").await;
        assert!(matches!(delete, Err(CoreError::SubscriptionNotFound(_))));

        let other_owner = store.delete("user_b", "sub_missing").await;
        assert!(matches!(other_owner, Err(CoreError::SubscriptionNotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_one() {
        let store = LocalStore::in_memory();
        let id = store.create("user_a", netflix()).await.unwrap();
        store.create("user_a", spotify()).await.unwrap();

        store.delete("user_a", &id).await.unwrap();
        let subs = store.list("user_a").await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name, "Spotify");
    }

    #[tokio::test]
    async fn bulk_import_and_clear() {
        let store = LocalStore::in_memory();
        let count = store
            .bulk_import("user_a", vec![netflix(), spotify()])
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.list("user_a").await.unwrap().len(), 2);

        store.clear_all("user_a").await.unwrap();
        assert!(store.list("user_a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn snapshot_bytes_round_trip() {
        let store = LocalStore::in_memory();
        store.create("user_a", netflix()).await.unwrap();
        store.create_profile("Alice", Utc::now()).unwrap();

        let bytes = store.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], MAGIC);

        let restored = LocalStore::from_bytes(&bytes).unwrap();
        assert_eq!(
            restored.list("user_a").await.unwrap(),
            store.list("user_a").await.unwrap()
        );
        assert_eq!(restored.profiles(), store.profiles());
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        assert!(LocalStore::from_bytes(b"definitely not a snapshot").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// LocalStore — file write-through
// ═══════════════════════════════════════════════════════════════════

mod local_file_tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("subs.subt")).unwrap();
        assert!(store.list("user_a").await.unwrap().is_empty());
        assert!(store.profiles().is_empty());
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.subt");

        let id = {
            let store = LocalStore::open(&path).unwrap();
            let id = store.create("user_a", netflix()).await.unwrap();
            store.update("user_a", &id, &SubscriptionPatch::pause(true)).await.unwrap();
            id
        };
        assert!(path.exists());

        let reopened = LocalStore::open(&path).unwrap();
        let subs = reopened.list("user_a").await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].id, id);
        assert!(subs[0].is_paused);
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.subt");
        std::fs::write(&path, b"garbage").unwrap();
        assert!(matches!(
            LocalStore::open(&path),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[tokio::test]
    async fn failed_write_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("subs.subt");
        let store = LocalStore::open(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = store.create("user_a", netflix()).await;
        assert!(matches!(result, Err(CoreError::Persistence { .. })));
        assert!(result.unwrap_err().is_persistence());
        assert!(store.list("user_a").await.unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// LocalStore — profiles
// ═══════════════════════════════════════════════════════════════════

mod profile_tests {
    use super::*;

    #[test]
    fn create_rename_delete() {
        let store = LocalStore::in_memory();
        let profile = store.create_profile("  Alice  ", Utc::now()).unwrap();
        assert!(profile.id.starts_with("user_"));
        assert_eq!(profile.display_name, "Alice");

        let renamed = store.rename_profile(&profile.id, "Alicia").unwrap();
        assert_eq!(renamed.display_name, "Alicia");
        assert_eq!(store.profiles()[0].display_name, "Alicia");

        store.delete_profile(&profile.id).unwrap();
        assert!(store.profiles().is_empty());
    }

    #[test]
    fn empty_name_rejected() {
        let store = LocalStore::in_memory();
        assert!(matches!(
            store.create_profile("   ", Utc::now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn unknown_profile() {
        let store = LocalStore::in_memory();
        assert!(matches!(
            store.rename_profile("user_missing", "X"),
            Err(CoreError::ProfileNotFound(_))
        ));
        assert!(matches!(
            store.delete_profile("user_missing"),
            Err(CoreError::ProfileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_profile_drops_its_subscriptions() {
        let store = LocalStore::in_memory();
        let profile = store.create_profile("Alice", Utc::now()).unwrap();
        store.create(&profile.id, netflix()).await.unwrap();

        store.delete_profile(&profile.id).unwrap();
        assert!(store.list(&profile.id).await.unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// RemoteStore
// ═══════════════════════════════════════════════════════════════════

mod remote_store_tests {
    use super::*;

    #[test]
    fn builds_collection_urls() {
        let store = RemoteStore::new(RemoteStoreConfig::new("https://store.example.com/v1")).unwrap();
        assert_eq!(
            store.collection_url("user_a").as_str(),
            "https://store.example.com/v1/users/user_a/subscriptions"
        );
        assert_eq!(
            store.document_url("user_a", "sub_1").as_str(),
            "https://store.example.com/v1/users/user_a/subscriptions/sub_1"
        );
    }

    #[test]
    fn trailing_slash_and_encoding() {
        let store = RemoteStore::new(RemoteStoreConfig::new("https://store.example.com/")).unwrap();
        assert_eq!(
            store.collection_url("a b").as_str(),
            "https://store.example.com/users/a%20b/subscriptions"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(
            RemoteStore::new(RemoteStoreConfig::new("not a url")),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            RemoteStore::new(RemoteStoreConfig::new("mailto:someone@example.com")),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn config_builders() {
        let config = RemoteStoreConfig::new("https://store.example.com")
            .with_auth_token("secret")
            .with_timeout_secs(5);
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(RemoteStoreConfig::new("x").timeout_secs, 30);
    }

    #[test]
    fn config_from_env() {
        use subscription_tracker_core::store::remote::{ENV_TIMEOUT, ENV_TOKEN, ENV_URL};

        std::env::remove_var(ENV_URL);
        assert!(matches!(
            RemoteStoreConfig::from_env(),
            Err(CoreError::Validation(_))
        ));

        std::env::set_var(ENV_URL, "https://store.example.com");
        std::env::set_var(ENV_TOKEN, "secret");
        std::env::set_var(ENV_TIMEOUT, "12");
        let config = RemoteStoreConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://store.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 12);

        std::env::set_var(ENV_TIMEOUT, "soon");
        assert!(RemoteStoreConfig::from_env().is_err());

        for key in [ENV_URL, ENV_TOKEN, ENV_TIMEOUT] {
            std::env::remove_var(key);
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let config = RemoteStoreConfig::new("http://127.0.0.1:9").with_timeout_secs(5);
        let store = RemoteStore::new(config).unwrap();
        assert_eq!(store.name(), "remote");

        let err = store.list("user_a").await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
        assert!(err.is_persistence());
    }
}
