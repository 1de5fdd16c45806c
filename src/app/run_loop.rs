use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::Receiver,
    Arc,
};
use std::thread;
use std::time::Duration;

use super::{AppConfig, Logger};
use crate::{
    config::{BACKLIGHT_FULL, SLOW_REFRESH_TICKS, TEMP_REDRAW_TICKS},
    display::{screens, Backgrounds, Panel},
    fan::{duty_for_drives, FanPwm},
    metrics::Sampler,
    state::{ButtonEvent, DisplayState, Screen},
    Result,
};

/// Everything the loop carries between ticks: the screen state machine,
/// the last fan command, and the redraw/slow-refresh counters.
pub struct LoopState {
    state: DisplayState,
    fan_duty: u8,
    temp_ticks: u32,
    slow_ticks: u32,
}

impl LoopState {
    pub fn new(standby_secs: u32, fan_duty: u8) -> Self {
        Self {
            state: DisplayState::new(standby_secs),
            fan_duty,
            // Start past the threshold so the first Temperature tick draws.
            temp_ticks: TEMP_REDRAW_TICKS,
            slow_ticks: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }
}

/// Drive the main tick loop: push the splash, light the backlight, then
/// run one iteration per tick until the running flag drops. One fixed
/// sleep per iteration; cadences are tick-counted rather than wall-clock,
/// so slow sampling calls stretch the tick.
#[allow(clippy::too_many_arguments)]
pub fn run_tick_loop(
    panel: &mut Panel,
    fan: &mut FanPwm,
    sampler: &mut Sampler,
    backgrounds: &Backgrounds,
    config: &AppConfig,
    logger: &Logger,
    buttons: &Receiver<ButtonEvent>,
    running: &Arc<AtomicBool>,
) -> Result<()> {
    let tick = Duration::from_millis(config.tick_ms);
    let fan_duty = duty_for_drives(&sampler.snapshot().drive_temps_c);
    let mut loop_state = LoopState::new(config.standby_secs, fan_duty);

    panel.push(&backgrounds.splash)?;
    panel.set_backlight(BACKLIGHT_FULL)?;

    while running.load(Ordering::SeqCst) {
        run_one_tick(
            panel,
            fan,
            sampler,
            backgrounds,
            config,
            logger,
            buttons,
            &mut loop_state,
        )?;
        thread::sleep(tick);
    }

    super::lifecycle::shutdown_panel(panel)?;
    logger.info("daemon exiting");
    Ok(())
}

/// One loop iteration, without the sleep: drain button events, redraw the
/// active screen on its cadence (Stats every call, Temperature every 6th),
/// advance the standby clock, and run the slow sampling block every 31st
/// call.
#[allow(clippy::too_many_arguments)]
pub fn run_one_tick(
    panel: &mut Panel,
    fan: &mut FanPwm,
    sampler: &mut Sampler,
    backgrounds: &Backgrounds,
    config: &AppConfig,
    logger: &Logger,
    buttons: &Receiver<ButtonEvent>,
    loop_state: &mut LoopState,
) -> Result<()> {
    while let Ok(event) = buttons.try_recv() {
        logger.debug(format!("button: {event:?}"));
        let before = loop_state.state.screen();
        if loop_state.state.handle_button(event) {
            logger.info("waking from standby");
            panel.set_backlight(BACKLIGHT_FULL)?;
        }
        // Only a press that landed on a new screen skips the redraw
        // counter; the reserved right button must not force redraws.
        if loop_state.state.screen() != before {
            loop_state.temp_ticks = TEMP_REDRAW_TICKS;
        }
    }

    match loop_state.state.screen() {
        Screen::Stats => {
            sample(logger, "cpu load", sampler.refresh_cpu_load());
            sample(logger, "memory", sampler.refresh_memory());
            let frame = screens::compose_stats(&backgrounds.stats, sampler.snapshot());
            panel.push(&frame)?;
        }
        Screen::Temperature => {
            loop_state.temp_ticks += 1;
            if loop_state.temp_ticks >= TEMP_REDRAW_TICKS {
                loop_state.fan_duty = update_fan(sampler, fan, logger);
                let frame = screens::compose_temperature(
                    &backgrounds.temperature,
                    sampler.snapshot(),
                    sampler.history(),
                    loop_state.fan_duty,
                );
                panel.push(&frame)?;
                loop_state.temp_ticks = 0;
            }
        }
        Screen::Splash => {
            panel.push(&backgrounds.splash)?;
        }
        Screen::Standby => {}
    }

    if loop_state.state.tick() {
        logger.info(format!("standby after {}s idle", config.standby_secs));
        panel.set_backlight(0)?;
    }

    loop_state.slow_ticks += 1;
    if loop_state.slow_ticks >= SLOW_REFRESH_TICKS {
        loop_state.fan_duty = update_fan(sampler, fan, logger);
        sample(logger, "cpu temp", sampler.refresh_cpu_temp());
        sample(logger, "filesystems", sampler.refresh_filesystems());
        sample(logger, "network", sampler.refresh_network());
        loop_state.slow_ticks = 0;
        logger.debug("slow refresh done");
    }

    Ok(())
}

/// Re-sample the drive temperatures and issue one PWM command for the
/// hottest drive. PWM trouble is logged, not fatal; the next cadence
/// retries anyway.
pub(super) fn update_fan(sampler: &mut Sampler, fan: &mut FanPwm, logger: &Logger) -> u8 {
    sample(logger, "drive temps", sampler.refresh_drive_temps());
    let duty = duty_for_drives(&sampler.snapshot().drive_temps_c);
    if let Err(err) = fan.set_duty(duty) {
        logger.warn(format!("fan pwm: {err}"));
    }
    duty
}

/// Sampling is best-effort: failures keep the previous reading and only
/// show up at debug level.
pub(super) fn sample(logger: &Logger, what: &str, result: Result<()>) {
    if let Err(err) = result {
        logger.debug(format!("{what} sample failed: {err}"));
    }
}
