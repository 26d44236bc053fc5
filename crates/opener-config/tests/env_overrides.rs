use figment::Jail;
use opener_config::OpenerConfig;

#[test]
fn prefixed_env_fills_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENER_JIRA__URL", "https://env.atlassian.net");
        jail.set_env("OPENER_JIRA__PROJECT", "OPS");
        jail.set_env("OPENER_RECEIVER__PORT", "7000");

        let config = OpenerConfig::load(None).expect("config loads");
        assert_eq!(config.jira.url, "https://env.atlassian.net");
        assert_eq!(config.jira.project, "OPS");
        assert_eq!(config.receiver.port, 7000);
        Ok(())
    });
}

#[test]
fn legacy_flat_names_are_honored() {
    Jail::expect_with(|jail| {
        jail.set_env("JIRA_URL", "https://legacy.atlassian.net");
        jail.set_env("JIRA_USER", "legacy-bot");
        jail.set_env("JIRA_TOKEN", "legacy-token");
        jail.set_env("JIRA_PROJECT", "LEG");
        jail.set_env("ISSUE_TYPE", "Task");
        jail.set_env("PORT", "8181");

        let config = OpenerConfig::load(None).expect("config loads");
        assert_eq!(config.jira.url, "https://legacy.atlassian.net");
        assert_eq!(config.jira.user, "legacy-bot");
        assert_eq!(config.jira.token, "legacy-token");
        assert_eq!(config.jira.project, "LEG");
        assert_eq!(config.jira.issue_type, "Task");
        assert_eq!(config.receiver.port, 8181);
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_legacy_env() {
    Jail::expect_with(|jail| {
        jail.set_env("JIRA_PROJECT", "LEG");
        jail.set_env("OPENER_JIRA__PROJECT", "NEW");

        let config = OpenerConfig::load(None).expect("config loads");
        assert_eq!(config.jira.project, "NEW");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("opener.toml", "[jira]\ntoken = \"from-toml\"\n")?;
        jail.set_env("OPENER_JIRA__TOKEN", "from-env");

        let config = OpenerConfig::load(None).expect("config loads");
        assert_eq!(config.jira.token, "from-env");
        Ok(())
    });
}

#[test]
fn unrelated_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("JIRA_URL_BACKUP", "https://backup.example");
        jail.set_env("SERVICE_PORT", "1");

        let config = OpenerConfig::load(None).expect("config loads");
        assert_ne!(config.jira.url, "https://backup.example");
        assert_ne!(config.receiver.port, 1);
        Ok(())
    });
}
