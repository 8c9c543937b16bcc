use super::*;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.network.attempts, 2);
    assert_eq!(settings.materialize.frame_offset(), Duration::from_secs(10));
    assert!(settings.paths.rewrite().is_none());
}

#[test]
fn test_partial_file_fills_defaults() {
    let toml = r#"
[paths]
rewrite_from = "/Volumes/media"
rewrite_to = "/mnt/nas"

[network]
attempts = 4
user_agent = "curator/1.0"
"#;
    let settings = Settings::from_toml_str(toml, Path::new("settings.toml")).unwrap();

    let rewrite = settings.paths.rewrite().unwrap();
    assert_eq!(rewrite.apply("/Volumes/media/a.mp4"), "/mnt/nas/a.mp4");

    let client = settings.network.client_config();
    assert_eq!(client.retry.max_attempts, 4);
    assert_eq!(client.retry.delay, Duration::from_secs(5));
    assert_eq!(client.timeout, Duration::from_secs(5));
    assert_eq!(client.user_agent, "curator/1.0");
    assert_eq!(client.politeness.min, Duration::from_millis(1000));
    assert_eq!(settings.materialize, MaterializeSettings::default());
}

#[test]
fn test_rewrite_needs_both_ends() {
    let paths = PathSettings {
        rewrite_from: Some("/a".to_string()),
        rewrite_to: None,
    };
    assert!(paths.rewrite().is_none());
    let empty_from = PathSettings {
        rewrite_from: Some(String::new()),
        rewrite_to: Some("/b".to_string()),
    };
    assert!(empty_from.rewrite().is_none());
}

#[test]
fn test_invalid_toml_is_settings_error() {
    let err = Settings::from_toml_str("[network]\nattempts = \"many\"", Path::new("s.toml")).unwrap_err();
    assert!(matches!(err, ShelfError::Settings { .. }));
}

#[test]
fn test_negative_frame_offset_falls_back() {
    let settings = MaterializeSettings {
        frame_offset_secs: -3.0,
        ffmpeg: None,
    };
    assert_eq!(settings.frame_offset(), DEFAULT_FRAME_OFFSET);
    let custom = MaterializeSettings {
        frame_offset_secs: 2.5,
        ffmpeg: None,
    };
    assert_eq!(custom.frame_offset(), Duration::from_millis(2500));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut settings = Settings::default();
    settings.paths.rewrite_from = Some("/src".to_string());
    settings.paths.rewrite_to = Some("/dst".to_string());
    settings.materialize.ffmpeg = Some(PathBuf::from("/usr/local/bin/ffmpeg"));

    settings.save(&path).unwrap();

    assert!(!path.with_extension("toml.tmp").exists());
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn test_materialize_options_from_settings() {
    let mut settings = Settings::default();
    settings.paths.rewrite_from = Some("/src".to_string());
    settings.paths.rewrite_to = Some("/dst".to_string());
    let options = settings.materialize_options(true);
    assert!(options.overwrite);
    assert_eq!(options.path_rewrite, Some(PathRewrite::new("/src", "/dst")));
    assert_eq!(options.frame_offset, DEFAULT_FRAME_OFFSET);
}
