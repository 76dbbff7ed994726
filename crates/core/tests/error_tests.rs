// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError display messages and conversions
// ═══════════════════════════════════════════════════════════════════

use portfolio_lens_core::errors::CoreError;

mod display {
    use super::*;

    #[test]
    fn invalid_input() {
        let e = CoreError::InvalidInput("bad token".into());
        assert_eq!(e.to_string(), "Invalid input: bad token");
    }

    #[test]
    fn portfolio_not_found_lists_available() {
        let e = CoreError::PortfolioNotFound {
            query: "nope".into(),
            available: "Main, Trading".into(),
        };
        assert_eq!(
            e.to_string(),
            "Portfolio 'nope' not found. Available portfolios: Main, Trading"
        );
    }

    #[test]
    fn unauthenticated_points_at_login() {
        let msg = CoreError::Unauthenticated.to_string();
        assert!(msg.starts_with("Not logged in."));
        assert!(msg.contains("login"));
    }

    #[test]
    fn upstream_includes_status() {
        let e = CoreError::Upstream {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(e.to_string(), "Upstream request failed (HTTP 503): maintenance");
    }

    #[test]
    fn data_contract() {
        let e = CoreError::DataContract("2 supply legs but 1 receive rates".into());
        assert_eq!(
            e.to_string(),
            "Data contract violation: 2 supply legs but 1 receive rates"
        );
    }

    #[test]
    fn unsupported_version() {
        assert_eq!(
            CoreError::UnsupportedVersion(7).to_string(),
            "Unsupported session file version: 7"
        );
    }

    #[test]
    fn decryption_mentions_passphrase() {
        assert!(CoreError::Decryption.to_string().contains("wrong passphrase"));
    }

    #[test]
    fn file_io_and_format() {
        assert_eq!(
            CoreError::FileIO("denied".into()).to_string(),
            "File I/O error: denied"
        );
        assert_eq!(
            CoreError::InvalidFileFormat("too short".into()).to_string(),
            "Invalid session file: too short"
        );
    }
}

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: CoreError = io.into();
        assert!(matches!(e, CoreError::FileIO(ref m) if m.contains("denied")));
    }

    #[test]
    fn from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: CoreError = err.into();
        assert!(matches!(e, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_bincode_error() {
        let err = bincode::deserialize::<String>(&[0xff]).unwrap_err();
        let e: CoreError = err.into();
        assert!(matches!(e, CoreError::Serialization(_)));
    }

    #[test]
    fn from_aes_gcm_error() {
        let e: CoreError = aes_gcm::Error.into();
        assert!(matches!(e, CoreError::Decryption));
    }

    #[test]
    fn question_mark_propagates() {
        fn parse() -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str("[1, 2")?)
        }
        assert!(matches!(parse(), Err(CoreError::Deserialization(_))));
    }
}

mod traits {
    use super::*;

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CoreError>();
    }

    #[test]
    fn converts_into_anyhow_style_box() {
        let boxed: Box<dyn std::error::Error> = Box::new(CoreError::Unauthenticated);
        assert!(boxed.to_string().contains("Not logged in"));
    }
}
