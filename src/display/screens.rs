//! Per-screen composition: clone the pre-rendered background, overlay the
//! live numbers/bars, and hand the finished frame to the panel. Coordinates
//! follow the panel art laid out for the 240x320 portrait orientation.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_9X15},
        MonoFont, MonoTextStyleBuilder,
    },
    pixelcolor::Rgb565,
    prelude::*,
    text::{Baseline, Text},
};

use crate::display::frame::Frame;
use crate::metrics::{DriveTempHistory, SystemSnapshot};

const BAR_X: i32 = 65;
const BAR_FULL_PX: i32 = 150;
const BAR_HEIGHT: i32 = 12;

const LOAD_BAR_Y: [i32; 4] = [70, 84, 98, 112];
const LOAD_BAR_COLORS: [Rgb565; 4] = [
    Rgb565::BLUE,
    Rgb565::CSS_GRAY,
    Rgb565::CSS_MAGENTA,
    Rgb565::CSS_BROWN,
];

const CPU_TEMP_BAR_Y: i32 = 142;
const STORAGE_BAR_Y: [i32; 3] = [203, 217, 231];
const IP_X: i32 = 59;
const ETH_Y: i32 = 280;
const WLAN_Y: i32 = 296;

const TEMP_COL_X: [i32; 3] = [90, 140, 190];
const TEMP_ROW_Y: [i32; 4] = [115, 141, 169, 196];
const FAN_Y: i32 = 258;

/// Static chrome for each screen, rendered once at startup and cloned as
/// the base of every redraw.
pub struct Backgrounds {
    pub splash: Frame,
    pub stats: Frame,
    pub temperature: Frame,
}

impl Backgrounds {
    pub fn render() -> Self {
        Self {
            splash: render_splash(),
            stats: render_stats_background(),
            temperature: render_temperature_background(),
        }
    }
}

fn render_splash() -> Frame {
    let mut frame = Frame::new(Rgb565::BLACK);
    draw_text(&mut frame, 60, 130, "NASpanel", &FONT_10X20, Rgb565::WHITE);
    draw_text(&mut frame, 50, 160, "NAS status panel", &FONT_9X15, Rgb565::CSS_GRAY);
    frame
}

fn render_stats_background() -> Frame {
    let mut frame = Frame::new(Rgb565::BLACK);
    draw_text(&mut frame, 8, 48, "SYSTEM", &FONT_10X20, Rgb565::WHITE);
    for (core, &y) in LOAD_BAR_Y.iter().enumerate() {
        let label = ["cpu0", "cpu1", "cpu2", "cpu3"][core];
        draw_text(&mut frame, 8, y, label, &FONT_9X15, Rgb565::WHITE);
    }
    draw_text(&mut frame, 8, CPU_TEMP_BAR_Y, "temp", &FONT_9X15, Rgb565::WHITE);
    draw_text(&mut frame, 8, 178, "STORAGE", &FONT_10X20, Rgb565::WHITE);
    draw_text(&mut frame, 8, STORAGE_BAR_Y[0], "sd", &FONT_9X15, Rgb565::WHITE);
    draw_text(&mut frame, 8, STORAGE_BAR_Y[1], "hdd", &FONT_9X15, Rgb565::WHITE);
    draw_text(&mut frame, 8, STORAGE_BAR_Y[2], "ssd", &FONT_9X15, Rgb565::WHITE);
    draw_text(&mut frame, 8, 256, "NETWORK", &FONT_10X20, Rgb565::WHITE);
    draw_text(&mut frame, 8, ETH_Y, "eth", &FONT_9X15, Rgb565::WHITE);
    draw_text(&mut frame, 8, WLAN_Y, "wlan", &FONT_9X15, Rgb565::WHITE);
    frame
}

fn render_temperature_background() -> Frame {
    let mut frame = Frame::new(Rgb565::BLACK);
    draw_text(&mut frame, 8, 48, "DRIVE TEMPS", &FONT_10X20, Rgb565::WHITE);
    draw_text(&mut frame, TEMP_COL_X[0], 92, "min", &FONT_9X15, Rgb565::CSS_GRAY);
    draw_text(&mut frame, TEMP_COL_X[1], 92, "cur", &FONT_9X15, Rgb565::CSS_GRAY);
    draw_text(&mut frame, TEMP_COL_X[2], 92, "max", &FONT_9X15, Rgb565::CSS_GRAY);
    for (slot, &y) in TEMP_ROW_Y.iter().enumerate() {
        let label = ["sda", "sdb", "sdc", "sdd"][slot];
        draw_text(&mut frame, 30, y, label, &FONT_9X15, Rgb565::WHITE);
    }
    draw_text(&mut frame, 40, FAN_Y, "FAN", &FONT_10X20, Rgb565::WHITE);
    frame
}

/// Stats screen: load/temperature/storage bars plus interface addresses.
pub fn compose_stats(background: &Frame, snapshot: &SystemSnapshot) -> Frame {
    let mut frame = background.clone();

    for core in 0..4 {
        let width = bar_px(snapshot.cpu_load_pct[core].into());
        frame.fill_rect(
            BAR_X,
            LOAD_BAR_Y[core],
            BAR_X + width,
            LOAD_BAR_Y[core] + BAR_HEIGHT,
            LOAD_BAR_COLORS[core],
        );
    }

    // 20-80 C full scale, green below 55, red from 70.
    let temp = snapshot.cpu_temp_c;
    let color = if temp < 55 {
        Rgb565::GREEN
    } else if temp < 70 {
        Rgb565::YELLOW
    } else {
        Rgb565::RED
    };
    let width = ((temp - 20) * BAR_FULL_PX / 60).clamp(0, BAR_FULL_PX);
    frame.fill_rect(
        BAR_X,
        CPU_TEMP_BAR_Y,
        BAR_X + width,
        CPU_TEMP_BAR_Y + BAR_HEIGHT,
        color,
    );

    let width = bar_px(snapshot.sdcard_used_pct.into());
    frame.fill_rect(
        BAR_X,
        STORAGE_BAR_Y[0],
        BAR_X + width,
        STORAGE_BAR_Y[0] + BAR_HEIGHT,
        Rgb565::BLUE,
    );
    // Absent pools draw nothing; present ones get at least one pixel column.
    if let Some(pct) = snapshot.hdd_used_pct {
        let width = bar_px(pct.into()) + 1;
        frame.fill_rect(
            BAR_X,
            STORAGE_BAR_Y[1],
            BAR_X + width,
            STORAGE_BAR_Y[1] + BAR_HEIGHT,
            Rgb565::BLUE,
        );
    }
    if let Some(pct) = snapshot.ssd_used_pct {
        let width = bar_px(pct.into()) + 1;
        frame.fill_rect(
            BAR_X,
            STORAGE_BAR_Y[2],
            BAR_X + width,
            STORAGE_BAR_Y[2] + BAR_HEIGHT,
            Rgb565::BLUE,
        );
    }

    draw_text(&mut frame, IP_X, ETH_Y, &snapshot.eth_ip, &FONT_9X15, Rgb565::WHITE);
    draw_text(&mut frame, IP_X, WLAN_Y, &snapshot.wlan_ip, &FONT_9X15, Rgb565::WHITE);
    frame
}

/// Temperature screen: min/current/max per drive slot and the fan duty.
pub fn compose_temperature(
    background: &Frame,
    snapshot: &SystemSnapshot,
    history: &DriveTempHistory,
    fan_duty: u8,
) -> Frame {
    let mut frame = background.clone();

    for (slot, &y) in TEMP_ROW_Y.iter().enumerate() {
        draw_num(&mut frame, TEMP_COL_X[0], y, history.min_c(slot));
        draw_num(&mut frame, TEMP_COL_X[1], y, snapshot.drive_temps_c[slot]);
        draw_num(&mut frame, TEMP_COL_X[2], y, history.max_c(slot));
    }

    if fan_duty == 0 {
        draw_text(&mut frame, 110, FAN_Y, "OFF", &FONT_10X20, Rgb565::WHITE);
    } else {
        draw_num(&mut frame, 125, FAN_Y, fan_duty.into());
    }
    frame
}

fn bar_px(percent: i32) -> i32 {
    (percent * BAR_FULL_PX / 100).clamp(0, BAR_FULL_PX)
}

fn draw_text(frame: &mut Frame, x: i32, y: i32, text: &str, font: &'static MonoFont<'_>, color: Rgb565) {
    let style = MonoTextStyleBuilder::new()
        .font(font)
        .text_color(color)
        .background_color(Rgb565::BLACK)
        .build();
    let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(frame);
}

fn draw_num(frame: &mut Frame, x: i32, y: i32, value: i32) {
    draw_text(frame, x, y, &value.to_string(), &FONT_10X20, Rgb565::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SystemSnapshot;

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot {
            cpu_temp_c: 50,
            cpu_load_pct: [10, 50, 90, 100],
            mem_used_pct: 40,
            sdcard_used_pct: 60,
            hdd_used_pct: Some(80),
            ssd_used_pct: None,
            eth_ip: "192.168.1.2".into(),
            wlan_ip: String::new(),
            drive_temps_c: [36, 0, 41, 0],
        }
    }

    #[test]
    fn load_bars_scale_with_percentage() {
        let bg = Frame::new(Rgb565::BLACK);
        let frame = compose_stats(&bg, &snapshot());
        // cpu3 at 100% extends to the full 150px; cpu0 at 10% stops early.
        assert_eq!(frame.pixel((BAR_X + 150) as u32, LOAD_BAR_Y[3] as u32), LOAD_BAR_COLORS[3]);
        assert_eq!(frame.pixel((BAR_X + 15) as u32, LOAD_BAR_Y[0] as u32), LOAD_BAR_COLORS[0]);
        assert_eq!(frame.pixel((BAR_X + 30) as u32, LOAD_BAR_Y[0] as u32), Rgb565::BLACK);
    }

    #[test]
    fn cpu_temp_bar_color_follows_thresholds() {
        let bg = Frame::new(Rgb565::BLACK);
        let mut snap = snapshot();

        snap.cpu_temp_c = 40;
        let frame = compose_stats(&bg, &snap);
        assert_eq!(frame.pixel(BAR_X as u32, CPU_TEMP_BAR_Y as u32), Rgb565::GREEN);

        snap.cpu_temp_c = 60;
        let frame = compose_stats(&bg, &snap);
        assert_eq!(frame.pixel(BAR_X as u32, CPU_TEMP_BAR_Y as u32), Rgb565::YELLOW);

        snap.cpu_temp_c = 75;
        let frame = compose_stats(&bg, &snap);
        assert_eq!(frame.pixel(BAR_X as u32, CPU_TEMP_BAR_Y as u32), Rgb565::RED);
    }

    #[test]
    fn absent_volume_draws_no_bar() {
        let bg = Frame::new(Rgb565::BLACK);
        let frame = compose_stats(&bg, &snapshot());
        // hdd pool present -> bar; ssd pool absent -> row stays background.
        assert_eq!(frame.pixel(BAR_X as u32, STORAGE_BAR_Y[1] as u32), Rgb565::BLUE);
        assert_eq!(frame.pixel(BAR_X as u32, STORAGE_BAR_Y[2] as u32), Rgb565::BLACK);
    }

    #[test]
    fn composition_does_not_mutate_the_background() {
        let bg = render_stats_background();
        let before = bg.clone();
        let _ = compose_stats(&bg, &snapshot());
        assert!(bg == before);
    }

    #[test]
    fn temperature_screen_renders_without_history_samples() {
        let bg = render_temperature_background();
        let history = DriveTempHistory::default();
        let frame = compose_temperature(&bg, &snapshot(), &history, 0);
        assert_eq!(frame.pixels().count(), bg.pixels().count());
    }
}
