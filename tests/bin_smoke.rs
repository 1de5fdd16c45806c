use naspanel::{
    app::{App, AppConfig, LogLevel},
    cli::{Command, RunOptions},
    config::{DEFAULT_STANDBY_SECS, DEFAULT_TICK_MS},
};

// CLI and config guardrails, library-level to avoid hardware dependency.

#[test]
fn prints_version() {
    let args = vec!["--version".to_string()];
    let cmd = Command::parse(&args).unwrap();
    assert!(matches!(cmd, Command::ShowVersion));
    assert!(!env!("CARGO_PKG_VERSION").is_empty());
}

#[test]
fn help_lists_core_flags() {
    let help = Command::help();
    for flag in [
        "--standby-secs",
        "--tick-ms",
        "--log-level",
        "--log-file",
        "--stub-display",
    ] {
        assert!(
            help.contains(flag),
            "help output missing flag {flag}: {help}"
        );
    }
}

#[test]
fn run_options_merge_over_defaults() {
    let args = vec![
        "run".to_string(),
        "--standby-secs".to_string(),
        "120".to_string(),
        "--log-level".to_string(),
        "debug".to_string(),
    ];
    let opts = match Command::parse(&args).unwrap() {
        Command::Run(opts) => opts,
        other => panic!("expected run command, got {other:?}"),
    };
    let cfg = AppConfig::from_options(opts).unwrap();
    assert_eq!(cfg.standby_secs, 120);
    assert_eq!(cfg.tick_ms, DEFAULT_TICK_MS);
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert!(!cfg.stub_display);
}

#[test]
fn rejects_zero_tick_before_startup() {
    let opts = RunOptions {
        tick_ms: Some(0),
        ..RunOptions::default()
    };
    let err = App::from_options(opts)
        .err()
        .expect("expected zero tick-ms to be rejected");
    assert!(
        format!("{err}").contains("tick-ms"),
        "error did not mention tick-ms: {err}"
    );
}

#[test]
fn default_standby_matches_documented_value() {
    let cfg = AppConfig::from_options(RunOptions::default()).unwrap();
    assert_eq!(cfg.standby_secs, DEFAULT_STANDBY_SECS);
}
