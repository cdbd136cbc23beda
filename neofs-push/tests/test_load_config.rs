use neofs_push::cli::{NetworkArgs, PushArgs};
use neofs_push::load_config::{
    load_config, read_password, FileConfig, NetworkSection, PublishSection, PASSWORD_ENV_NAME,
};
use neofs_push_core::reconcile::ReplaceMode;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

#[test]
fn test_load_config_full_file() {
    let file = config_file(
        r#"
network:
  domain: st1.storage.fs.neo.org
  wallet: ./wallet.json
  cid: HXSaMJXk2g8C14ht8HSi7BBaiYZ1HeWh2xnWPGQCg4H6
publish:
  files_dir: ./public
  attributes: Type=site,Master=true
  url_path_prefix: 96-1697035975
  lifetime: 10
  put_timeout: 300
  strip_prefix: true
  replace_objects: false
  replace_container_contents: true
"#,
    );

    let config = load_config(file.path()).expect("Config should load");
    assert_eq!(config.network.domain.as_deref(), Some("st1.storage.fs.neo.org"));
    assert_eq!(config.network.wallet.as_deref(), Some("./wallet.json"));
    assert_eq!(config.publish.files_dir, Some(PathBuf::from("./public")));
    assert_eq!(config.publish.attributes.as_deref(), Some("Type=site,Master=true"));
    assert_eq!(config.publish.lifetime, Some(10));
    assert_eq!(config.publish.put_timeout, Some(300));
    assert_eq!(config.publish.strip_prefix, Some(true));
    assert_eq!(config.publish.replace_objects, Some(false));
    assert_eq!(config.publish.replace_container_contents, Some(true));
}

#[test]
fn test_load_config_empty_file_is_default() {
    let file = config_file("");
    assert_eq!(load_config(file.path()).unwrap(), FileConfig::default());
}

#[test]
fn test_load_config_partial_sections() {
    let file = config_file("publish:\n  lifetime: 5\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.network, NetworkSection::default());
    assert_eq!(config.publish.lifetime, Some(5));
    assert_eq!(config.publish.files_dir, None);
}

#[test]
fn test_load_config_rejects_unknown_fields() {
    let file = config_file("publish:\n  files_directory: ./public\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config YAML"), "{err}");
}

#[test]
fn test_load_config_missing_file() {
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"), "{err}");
}

#[test]
#[serial]
fn test_read_password_from_env() {
    env::set_var(PASSWORD_ENV_NAME, "s3cret");
    assert_eq!(read_password().as_deref(), Some("s3cret"));
    env::remove_var(PASSWORD_ENV_NAME);
    assert_eq!(read_password(), None);
}

#[test]
fn flags_override_file_values() {
    let file = PublishSection {
        files_dir: Some("./from-file".into()),
        attributes: Some("Type=file".into()),
        lifetime: Some(3),
        put_timeout: Some(100),
        strip_prefix: Some(true),
        ..PublishSection::default()
    };
    let args = PushArgs {
        files_dir: Some("./from-flag".into()),
        lifetime: Some(7),
        strip_prefix: Some(false),
        ..PushArgs::default()
    };

    let config = args.publish_config(&file).unwrap();
    assert_eq!(config.directory, PathBuf::from("./from-flag"));
    assert_eq!(config.attributes.as_deref(), Some("Type=file"));
    assert_eq!(config.lifetime, Some(7));
    assert_eq!(config.put_timeout_secs, 100);
    assert!(!config.strip_prefix);
}

#[test]
fn publish_defaults_apply_when_unset() {
    let args = PushArgs {
        files_dir: Some("./public".into()),
        ..PushArgs::default()
    };
    let config = args.publish_config(&PublishSection::default()).unwrap();
    assert_eq!(config.put_timeout_secs, 600);
    assert!(!config.strip_prefix);
    assert_eq!(config.lifetime, None);
    assert_eq!(config.replace, ReplaceMode::SamePath);
}

#[test]
fn container_replacement_wins_over_per_path() {
    let args = PushArgs {
        files_dir: Some("./public".into()),
        replace_container_contents: Some(true),
        ..PushArgs::default()
    };
    let config = args.publish_config(&PublishSection::default()).unwrap();
    assert_eq!(config.replace, ReplaceMode::WholeContainer);

    let args = PushArgs {
        files_dir: Some("./public".into()),
        replace_objects: Some(false),
        ..PushArgs::default()
    };
    let config = args.publish_config(&PublishSection::default()).unwrap();
    assert_eq!(config.replace, ReplaceMode::Disabled);
}

#[test]
fn missing_files_dir_is_an_error() {
    let err = PushArgs::default()
        .publish_config(&PublishSection::default())
        .unwrap_err();
    assert!(err.to_string().contains("--files-dir is required"));
}

#[test]
fn network_resolves_from_file_and_flags() {
    let file = NetworkSection {
        domain: Some("st1.storage.fs.neo.org".into()),
        wallet: Some("file-wallet.json".into()),
        cid: Some("FILECID".into()),
    };
    let args = NetworkArgs {
        cid: Some("FLAGCID".into()),
        ..NetworkArgs::default()
    };
    let network = args.resolve(&file).unwrap();
    assert_eq!(network.endpoint, "st1.storage.fs.neo.org:8080");
    assert_eq!(network.wallet, "file-wallet.json");
    assert_eq!(network.container_id, "FLAGCID");
}

#[test]
fn network_reports_first_missing_value() {
    let err = NetworkArgs::default()
        .resolve(&NetworkSection::default())
        .unwrap_err();
    assert!(err.to_string().contains("--neofs-domain is required"));

    let args = NetworkArgs {
        neofs_domain: Some("d".into()),
        ..NetworkArgs::default()
    };
    let err = args.resolve(&NetworkSection::default()).unwrap_err();
    assert!(err.to_string().contains("--wallet is required"));
}
