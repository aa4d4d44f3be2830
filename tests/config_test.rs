//! Tests for loading configuration and secrets from disk.

use std::fs;
use std::io::Write;

use vetgate::config::{Config, Secrets};
use vetgate::{InferenceRequest, Vetgate};

#[test]
fn load_explicit_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [gateway]
        attempt_timeout_secs = 12

        [providers.primary]
        models = ["only-model"]
        "#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.gateway.attempt_timeout_secs, 12);
    assert_eq!(
        config.providers.primary.unwrap().models,
        Some(vec!["only-model".to_string()])
    );
}

#[test]
fn malformed_config_is_configuration_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[gateway\nattempt_timeout_secs = ").unwrap();

    let err = Config::load(Some(file.path())).unwrap_err().to_string();
    assert!(err.contains("Failed to parse config file"));
}

#[test]
fn applied_config_builds_a_gateway() {
    let toml = r#"
        [providers.primary]
        models = ["m1"]

        [catalog]
        limit = 1
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    let gateway = config
        .apply(Vetgate::builder().primary("pk"))
        .build()
        .unwrap();

    let provider = gateway.select_provider().unwrap();
    assert_eq!(provider.name, "openrouter");
    assert_eq!(provider.models, vec!["m1"]);
}

#[test]
fn applied_config_with_empty_models_is_rejected() {
    let toml = r#"
        [providers.secondary]
        models = []
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    assert!(config.apply(Vetgate::builder()).build().is_err());
}

#[cfg(unix)]
mod secrets {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn secrets_file(mode: u32) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [primary]
            api_key = "sk-or-from-file"
            "#
        )
        .unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(mode)).unwrap();
        file
    }

    #[test]
    fn private_secrets_file_is_accepted() {
        let file = secrets_file(0o600);
        let secrets = Secrets::load_from(file.path()).unwrap();
        assert_eq!(
            secrets.credentials().primary.as_deref(),
            Some("sk-or-from-file")
        );
    }

    #[test]
    fn world_readable_secrets_file_is_rejected() {
        let file = secrets_file(0o644);
        let err = Secrets::load_from(file.path()).unwrap_err().to_string();
        assert!(err.contains("insecure permissions"));
    }
}

#[tokio::test]
async fn gateway_without_credentials_rejects_miss() {
    let gateway = Config::default().apply(Vetgate::builder()).build().unwrap();
    let err = gateway
        .diagnose(&InferenceRequest::new("U1").symptom("toux"))
        .await
        .unwrap_err();
    assert!(matches!(err, vetgate::VetgateError::ProviderConfigMissing));
}
