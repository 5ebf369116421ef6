use std::io::Write;

use lucky_clam::clam::error::{ConfigError, SettingsError};
use lucky_clam::clam::settings::{ClamSettings, CooldownDef};
use lucky_clam::clam::EventConfig;

#[test]
fn shipped_settings_file_is_valid() {
    let settings = ClamSettings::load("assets/luckyclam.ron").unwrap();
    let (config, rejected) = EventConfig::from_settings(&settings).unwrap();
    assert!(rejected.is_empty());
    assert_eq!(config.world, "atlantic");
    assert_eq!(config.rewards.len(), 4);
    assert!(config.rewards.total_chance() <= 100.0);
}

#[test]
fn loads_from_disk_and_keeps_reward_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"#![enable(implicit_some)]
(
    world: "reef",
    seed: 42,
    cooldown: (min: 1, max: 2, unit_secs: 5),
    rewards: [
        (type: "command", chance: 10.0, command: "say hi %player%"),
        (type: "item", chance: 30.0, material: "minecraft:gold_ingot", amount: 4),
    ],
)"#
    )
    .unwrap();

    let settings = ClamSettings::load(file.path()).unwrap();
    assert_eq!(settings.seed, Some(42));
    let (config, _) = EventConfig::from_settings(&settings).unwrap();
    let windows: Vec<_> = config.rewards.iter().map(|r| r.window()).collect();
    assert_eq!(windows, vec![0.0..10.0, 10.0..40.0]);
    assert_eq!(config.cooldown.max().as_secs(), 10);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClamSettings::load(dir.path().join("absent.ron")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}

#[test]
fn oversized_cooldown_unit_is_rejected_at_load() {
    let settings = ClamSettings {
        cooldown: CooldownDef { min: 3, max: 4, unit_secs: u64::MAX / 2 },
        ..ClamSettings::default()
    };
    assert!(matches!(
        EventConfig::from_settings(&settings),
        Err(ConfigError::CooldownOverflow { max: 4, .. })
    ));
}
