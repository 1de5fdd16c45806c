//! Fixed hardware assignments and cadences for the NAS build this daemon
//! targets. There is deliberately no config file: the board, wiring, and
//! drive bays never change underneath a deployed unit.

/// Left button GPIO (BCM numbering), cycles screens.
pub const BUTTON_LEFT_PIN: u8 = 21;
/// Right button GPIO, reserved for future screens.
pub const BUTTON_RIGHT_PIN: u8 = 20;
/// Fan PWM GPIO. The fan input is active-low (see `fan::FanPwm`).
pub const FAN_PWM_PIN: u8 = 4;
/// Software PWM carrier for the fan.
pub const FAN_PWM_HZ: f64 = 100.0;

/// Panel data/command select GPIO.
pub const PANEL_DC_PIN: u8 = 25;
/// Panel reset GPIO.
pub const PANEL_RST_PIN: u8 = 27;
/// Panel backlight GPIO, driven by software PWM for intensity control.
pub const PANEL_BACKLIGHT_PIN: u8 = 18;
/// SPI clock for the panel.
pub const PANEL_SPI_HZ: u32 = 40_000_000;
/// Full-scale backlight intensity.
pub const BACKLIGHT_FULL: u16 = 1023;

/// Raw GPIO edges must hold this long before a button press is reported.
pub const BUTTON_DEBOUNCE_MS: u64 = 200;

/// Nominal length of one main-loop tick.
pub const DEFAULT_TICK_MS: u64 = 1_000;
/// Idle seconds before the panel drops into standby (5 minutes).
pub const DEFAULT_STANDBY_SECS: u32 = 300;
/// Temperature screen redraws every this many ticks.
pub const TEMP_REDRAW_TICKS: u32 = 6;
/// CPU temperature, filesystems, network, and the fan refresh on this cadence.
pub const SLOW_REFRESH_TICKS: u32 = 31;

/// CPU cores sampled from /proc/stat.
pub const CPU_CORES: usize = 4;
/// SMART device slots in the drive cage.
pub const DRIVE_SLOTS: usize = 4;

pub const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";
pub const PROC_STAT_PATH: &str = "/proc/stat";
pub const MEMINFO_PATH: &str = "/proc/meminfo";

/// The four fixed SMART slots, in display order.
pub const DRIVE_DEVICES: [&str; DRIVE_SLOTS] =
    ["/dev/sda", "/dev/sdb", "/dev/sdc", "/dev/sdd"];

/// Root filesystem (SD card) is always reported.
pub const ROOT_MOUNT: &str = "/";
/// LVM volume backing the HDD pool; absent node means no pool.
pub const HDD_VOLUME: &str = "/dev/dm-0";
/// LVM volume backing the SSD pool.
pub const SSD_VOLUME: &str = "/dev/dm-1";
