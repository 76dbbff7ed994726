// ═══════════════════════════════════════════════════════════════════
// Storage Tests — key derivation, PLSS envelope, session stores
// ═══════════════════════════════════════════════════════════════════

use chrono::Utc;
use portfolio_lens_core::errors::CoreError;
use portfolio_lens_core::models::credential::Credential;
use portfolio_lens_core::storage::cipher::{random_bytes, KdfParams, SessionKey, NONCE_LEN, SALT_LEN};
use portfolio_lens_core::storage::envelope::{SessionEnvelope, CURRENT_VERSION, HEADER_LEN, MAGIC};
use portfolio_lens_core::storage::session::{
    EncryptedFileSessionStore, MemorySessionStore, SessionStore, StoredSession,
};

fn credential(token: &str) -> Credential {
    Credential::from_token(token.to_string()).unwrap()
}

fn sample_envelope() -> SessionEnvelope {
    SessionEnvelope {
        version: CURRENT_VERSION,
        kdf_params: KdfParams::minimal(),
        salt: [7u8; SALT_LEN],
        nonce: [9u8; NONCE_LEN],
        ciphertext: vec![1, 2, 3, 4, 5],
    }
}

// ═══════════════════════════════════════════════════════════════════
// Key derivation & cipher
// ═══════════════════════════════════════════════════════════════════

mod cipher {
    use super::*;

    #[test]
    fn default_params() {
        let p = KdfParams::default();
        assert_eq!(p.memory_cost, 19_456);
        assert_eq!(p.time_cost, 2);
        assert_eq!(p.parallelism, 1);
    }

    #[test]
    fn seal_then_open() {
        let salt = [1u8; SALT_LEN];
        let key = SessionKey::derive("passphrase", &salt, &KdfParams::minimal()).unwrap();
        let (nonce, ciphertext) = key.seal(b"token-123").unwrap();
        assert_ne!(ciphertext.as_slice(), b"token-123");
        assert_eq!(key.open(&nonce, &ciphertext).unwrap(), b"token-123");
    }

    #[test]
    fn wrong_passphrase_fails_to_open() {
        let salt = [1u8; SALT_LEN];
        let key = SessionKey::derive("right", &salt, &KdfParams::minimal()).unwrap();
        let other = SessionKey::derive("wrong", &salt, &KdfParams::minimal()).unwrap();
        let (nonce, ciphertext) = key.seal(b"secret").unwrap();
        assert!(matches!(
            other.open(&nonce, &ciphertext),
            Err(CoreError::Decryption)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails_to_open() {
        let salt = [2u8; SALT_LEN];
        let key = SessionKey::derive("pw", &salt, &KdfParams::minimal()).unwrap();
        let (nonce, mut ciphertext) = key.seal(b"secret").unwrap();
        ciphertext[0] ^= 0xff;
        assert!(matches!(
            key.open(&nonce, &ciphertext),
            Err(CoreError::Decryption)
        ));
    }

    #[test]
    fn nonces_are_fresh() {
        let key = SessionKey::derive("pw", &[3u8; SALT_LEN], &KdfParams::minimal()).unwrap();
        let (n1, _) = key.seal(b"x").unwrap();
        let (n2, _) = key.seal(b"x").unwrap();
        assert_ne!(n1, n2);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = KdfParams {
            memory_cost: 1,
            time_cost: 1,
            parallelism: 1,
        };
        assert!(matches!(
            SessionKey::derive("pw", &[0u8; SALT_LEN], &params),
            Err(CoreError::Encryption(_))
        ));
    }

    #[test]
    fn random_bytes_differ() {
        let a = random_bytes::<SALT_LEN>().unwrap();
        let b = random_bytes::<SALT_LEN>().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_hides_key() {
        let key = SessionKey::derive("pw", &[4u8; SALT_LEN], &KdfParams::minimal()).unwrap();
        assert_eq!(format!("{key:?}"), "SessionKey(<redacted>)");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Envelope format
// ═══════════════════════════════════════════════════════════════════

mod envelope {
    use super::*;

    #[test]
    fn layout_starts_with_magic_and_version() {
        let bytes = sample_envelope().to_bytes();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CURRENT_VERSION);
        assert_eq!(bytes.len(), HEADER_LEN + 5);
    }

    #[test]
    fn parses_what_it_writes() {
        let env = sample_envelope();
        assert_eq!(SessionEnvelope::from_bytes(&env.to_bytes()).unwrap(), env);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let env = sample_envelope();
        let mut bytes = env.to_bytes();
        bytes.extend_from_slice(b"junk");
        assert_eq!(SessionEnvelope::from_bytes(&bytes).unwrap().ciphertext, env.ciphertext);
    }

    #[test]
    fn too_short() {
        assert!(matches!(
            SessionEnvelope::from_bytes(b"PLSS"),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn bad_magic() {
        let mut bytes = sample_envelope().to_bytes();
        bytes[0] = b'X';
        let err = SessionEnvelope::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(ref m) if m.contains("magic")));
    }

    #[test]
    fn future_version() {
        let mut env = sample_envelope();
        env.version = CURRENT_VERSION + 1;
        assert!(matches!(
            SessionEnvelope::from_bytes(&env.to_bytes()),
            Err(CoreError::UnsupportedVersion(v)) if v == CURRENT_VERSION + 1
        ));
    }

    #[test]
    fn version_zero() {
        let mut env = sample_envelope();
        env.version = 0;
        assert!(matches!(
            SessionEnvelope::from_bytes(&env.to_bytes()),
            Err(CoreError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn absurd_kdf_cost_is_rejected() {
        let mut env = sample_envelope();
        env.kdf_params.time_cost = 1000;
        assert!(matches!(
            SessionEnvelope::from_bytes(&env.to_bytes()),
            Err(CoreError::InvalidFileFormat(_))
        ));

        let mut env = sample_envelope();
        env.kdf_params.memory_cost = u32::MAX;
        assert!(SessionEnvelope::from_bytes(&env.to_bytes()).is_err());
    }

    #[test]
    fn truncated_ciphertext() {
        let mut bytes = sample_envelope().to_bytes();
        bytes.truncate(bytes.len() - 2);
        let err = SessionEnvelope::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(ref m) if m.contains("truncated")));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StoredSession
// ═══════════════════════════════════════════════════════════════════

mod stored_session {
    use super::*;

    #[test]
    fn seal_and_open() {
        let stored = StoredSession {
            token: "tok-1".into(),
            saved_at: Utc::now(),
        };
        let bytes = stored.seal("pw", KdfParams::minimal()).unwrap();
        assert_eq!(&bytes[..4], MAGIC);

        let opened = StoredSession::open(&bytes, "pw").unwrap();
        assert_eq!(opened.token, "tok-1");
        assert_eq!(opened.saved_at, stored.saved_at);
    }

    #[test]
    fn kdf_params_travel_with_the_file() {
        let stored = StoredSession {
            token: "tok-1".into(),
            saved_at: Utc::now(),
        };
        let bytes = stored.seal("pw", KdfParams::minimal()).unwrap();
        let env = SessionEnvelope::from_bytes(&bytes).unwrap();
        assert_eq!(env.kdf_params, KdfParams::minimal());
    }

    #[test]
    fn wrong_passphrase() {
        let stored = StoredSession {
            token: "tok-1".into(),
            saved_at: Utc::now(),
        };
        let bytes = stored.seal("pw", KdfParams::minimal()).unwrap();
        assert!(matches!(
            StoredSession::open(&bytes, "not-pw"),
            Err(CoreError::Decryption)
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// EncryptedFileSessionStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    fn store(dir: &tempfile::TempDir, passphrase: &str) -> EncryptedFileSessionStore {
        EncryptedFileSessionStore::new(dir.path().join("nested/session.plss"), passphrase)
            .with_kdf_params(KdfParams::minimal())
    }

    #[test]
    fn missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir, "pw").load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "pw");
        s.save(&credential("abc.def")).unwrap();
        assert!(s.path().exists());
        assert_eq!(s.load().unwrap(), Some(credential("abc.def")));
    }

    #[test]
    fn file_does_not_contain_plaintext_token() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "pw");
        s.save(&credential("very-recognizable-token")).unwrap();
        let raw = std::fs::read(s.path()).unwrap();
        let needle = b"very-recognizable-token";
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "pw");
        s.save(&credential("first")).unwrap();
        s.save(&credential("second")).unwrap();
        assert_eq!(s.load().unwrap().unwrap().token(), "second");
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "pw");
        s.save(&credential("tok")).unwrap();
        s.clear().unwrap();
        assert!(!s.path().exists());
        assert!(s.load().unwrap().is_none());
        s.clear().unwrap();
    }

    #[test]
    fn other_passphrase_cannot_load() {
        let dir = tempfile::tempdir().unwrap();
        store(&dir, "pw").save(&credential("tok")).unwrap();
        assert!(matches!(
            store(&dir, "other").load(),
            Err(CoreError::Decryption)
        ));
    }

    #[test]
    fn garbage_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "pw");
        std::fs::create_dir_all(s.path().parent().unwrap()).unwrap();
        std::fs::write(s.path(), b"not a session file").unwrap();
        assert!(matches!(s.load(), Err(CoreError::InvalidFileFormat(_))));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir, "pw");
        s.save(&credential("tok")).unwrap();
        let mode = std::fs::metadata(s.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

// ═══════════════════════════════════════════════════════════════════
// MemorySessionStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn starts_empty() {
        assert!(MemorySessionStore::new().load().unwrap().is_none());
    }

    #[test]
    fn save_load_clear() {
        let s = MemorySessionStore::new();
        s.save(&credential("tok")).unwrap();
        assert_eq!(s.load().unwrap(), Some(credential("tok")));
        s.clear().unwrap();
        assert!(s.load().unwrap().is_none());
    }

    #[test]
    fn with_credential_starts_logged_in() {
        let s = MemorySessionStore::with_credential(credential("tok"));
        assert_eq!(s.load().unwrap().unwrap().token(), "tok");
    }
}
