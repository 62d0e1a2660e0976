//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed working directories and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use tw_config::TrackwayConfig;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/trackway/progress.db"

[auth]
token_bytes = 48

[general]
default_limit = 50
"#,
        )?;

        let config: TrackwayConfig = Figment::from(Serialized::defaults(TrackwayConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/trackway/progress.db");
        assert_eq!(config.auth.token_bytes, 48);
        assert_eq!(config.general.default_limit, 50);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".trackway")).expect("mkdir .trackway");
        jail.create_file(
            ".trackway/config.toml",
            r#"
[database]
path = ":memory:"
"#,
        )?;

        let config = TrackwayConfig::load().expect("config loads");
        assert!(config.database.is_in_memory());
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".trackway")).expect("mkdir .trackway");
        jail.create_file(
            ".trackway/config.toml",
            r#"
[general]
default_limit = 5
"#,
        )?;
        jail.set_env("TRACKWAY_GENERAL__DEFAULT_LIMIT", "7");
        jail.set_env("TRACKWAY_DATABASE__PATH", "from-env.db");

        let config = TrackwayConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 7);
        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.set_env("TRACKWAY_AUTH__TOKEN_BYTES", "8");
        let result = TrackwayConfig::load();
        assert!(result.is_err());
        Ok(())
    });
}
