// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use subscription_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn validation() {
        let err = CoreError::Validation("name must not be empty".into());
        assert_eq!(err.to_string(), "Validation failed: name must not be empty");
    }

    #[test]
    fn subscription_not_found() {
        let err = CoreError::SubscriptionNotFound("sub_1".into());
        assert_eq!(err.to_string(), "Subscription not found: sub_1");
    }

    #[test]
    fn profile_not_found() {
        let err = CoreError::ProfileNotFound("user_1".into());
        assert_eq!(err.to_string(), "Profile not found: user_1");
    }

    #[test]
    fn session_expired() {
        assert_eq!(
            CoreError::SessionExpired.to_string(),
            "Session expired — sign in again"
        );
    }

    #[test]
    fn persistence() {
        let err = CoreError::Persistence {
            store: "remote".into(),
            message: "HTTP 403 Forbidden: quota".into(),
        };
        assert_eq!(err.to_string(), "Store error (remote): HTTP 403 Forbidden: quota");
    }

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid file format: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(99);
        assert_eq!(err.to_string(), "Unsupported file version: 99");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn serialization_and_file_io() {
        assert_eq!(
            CoreError::Serialization("x".into()).to_string(),
            "Serialization error: x"
        );
        assert_eq!(
            CoreError::Deserialization("y".into()).to_string(),
            "Deserialization error: y"
        );
        assert_eq!(CoreError::FileIO("z".into()).to_string(), "File I/O error: z");
    }
}

// ── Classification ──────────────────────────────────────────────────

mod classification {
    use super::*;

    #[test]
    fn persistence_kinds() {
        assert!(CoreError::Persistence {
            store: "local".into(),
            message: "disk full".into()
        }
        .is_persistence());
        assert!(CoreError::Network("timeout".into()).is_persistence());
        assert!(CoreError::FileIO("denied".into()).is_persistence());
    }

    #[test]
    fn non_persistence_kinds() {
        assert!(!CoreError::Validation("x".into()).is_persistence());
        assert!(!CoreError::SubscriptionNotFound("x".into()).is_persistence());
        assert!(!CoreError::SessionExpired.is_persistence());
        assert!(!CoreError::UnsupportedVersion(2).is_persistence());
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("missing")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_bincode_error() {
        let bin_err = bincode::deserialize::<String>(&[0xFF]).unwrap_err();
        let err: CoreError = bin_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }
}
