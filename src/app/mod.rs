use std::str::FromStr;
use std::sync::mpsc;

use crate::{
    cli::RunOptions,
    config::{DEFAULT_STANDBY_SECS, DEFAULT_TICK_MS},
    display::{Backgrounds, Panel},
    fan::FanPwm,
    metrics::Sampler,
    Error, Result,
};

mod input;
mod lifecycle;
mod logger;
pub mod run_loop;

use input::Buttons;
pub use logger::{LogLevel, Logger};
use run_loop::{run_tick_loop, sample, update_fan};

/// Config for the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub standby_secs: u32,
    pub tick_ms: u64,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub stub_display: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            standby_secs: DEFAULT_STANDBY_SECS,
            tick_ms: DEFAULT_TICK_MS,
            log_level: LogLevel::default(),
            log_file: None,
            stub_display: false,
        }
    }
}

impl AppConfig {
    pub fn from_options(opts: RunOptions) -> Result<Self> {
        let tick_ms = opts.tick_ms.unwrap_or(DEFAULT_TICK_MS);
        if tick_ms == 0 {
            return Err(Error::InvalidArgs("tick-ms must be at least 1".into()));
        }
        Ok(Self {
            standby_secs: opts.standby_secs.unwrap_or(DEFAULT_STANDBY_SECS),
            tick_ms,
            log_level: opts
                .log_level
                .as_deref()
                .and_then(|s| LogLevel::from_str(s).ok())
                .unwrap_or_default(),
            log_file: opts.log_file,
            stub_display: opts.stub_display,
        })
    }
}

pub struct App {
    config: AppConfig,
    logger: Logger,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let logger = Logger::new(config.log_level, config.log_file.clone());
        Self { config, logger }
    }

    pub fn from_options(opts: RunOptions) -> Result<Self> {
        Ok(Self::new(AppConfig::from_options(opts)?))
    }

    /// Entry point for the daemon: bring up the hardware, take the first
    /// round of samples, then hand over to the tick loop until a signal
    /// flips the shutdown flag.
    pub fn run(&self) -> Result<()> {
        // Hardware init failure is fatal here, before anything is running.
        let mut panel = if self.config.stub_display {
            self.logger.info("stub display: no panel/GPIO hardware");
            Panel::stub()
        } else {
            Panel::open()?
        };
        let mut fan = if self.config.stub_display {
            FanPwm::stub()
        } else {
            FanPwm::claim()?
        };
        let backgrounds = Backgrounds::render();
        self.logger.info(format!(
            "daemon start (tick={}ms, standby={}s)",
            self.config.tick_ms, self.config.standby_secs
        ));

        let (events_tx, events_rx) = mpsc::channel();
        let _buttons = if self.config.stub_display {
            None
        } else {
            match Buttons::claim(events_tx) {
                Ok(buttons) => Some(buttons),
                Err(err) => {
                    self.logger.warn(format!("buttons unavailable: {err}"));
                    None
                }
            }
        };

        let mut sampler = Sampler::new();
        sample(&self.logger, "cpu temp", sampler.refresh_cpu_temp());
        sample(&self.logger, "memory", sampler.refresh_memory());
        sample(&self.logger, "filesystems", sampler.refresh_filesystems());
        sample(&self.logger, "network", sampler.refresh_network());
        // Prime the load counters; the first delta spans all of uptime and
        // is thrown away.
        sample(&self.logger, "cpu load", sampler.refresh_cpu_load());
        // First drive reading seeds the min/max history and sets the fan.
        update_fan(&mut sampler, &mut fan, &self.logger);

        let running = lifecycle::create_shutdown_flag()?;

        run_tick_loop(
            &mut panel,
            &mut fan,
            &mut sampler,
            &backgrounds,
            &self.config,
            &self.logger,
            &events_rx,
            &running,
        )
    }
}
