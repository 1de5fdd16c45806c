//! Fan duty curve and the PWM output behind it. The curve maps the hottest
//! drive to a duty percentage; the output facade owns the single GPIO used
//! for the fan.

use crate::config::{DRIVE_SLOTS, FAN_PWM_HZ, FAN_PWM_PIN};
use crate::Result;

/// Duty percentage for one drive temperature.
///
/// Up to 35 C is the ideal range and needs no airflow; 43 C and above runs
/// the fan flat out. Drives reporting 0 (absent) fall in the ideal range.
pub fn duty_for_temp(temp_c: i32) -> u8 {
    match temp_c {
        t if t <= 35 => 0,
        36..=38 => 50,
        39 => 60,
        40 => 70,
        41 => 80,
        42 => 90,
        _ => 100,
    }
}

/// Duty percentage for the whole cage: the hottest drive wins.
pub fn duty_for_drives(temps_c: &[i32; DRIVE_SLOTS]) -> u8 {
    temps_c
        .iter()
        .map(|&t| duty_for_temp(t))
        .max()
        .unwrap_or(0)
}

/// Software PWM output on the fan GPIO. Falls back to a recording stub off
/// Linux or when requested, so the control path is testable without a fan.
pub struct FanPwm {
    output: Output,
}

enum Output {
    #[cfg(target_os = "linux")]
    Pin(rppal::gpio::OutputPin),
    Stub(Vec<u8>),
}

impl FanPwm {
    /// Claim the fan GPIO. The fan is commanded to 100% until the first
    /// drive-temperature reading arrives.
    #[cfg(target_os = "linux")]
    pub fn claim() -> Result<Self> {
        let gpio = rppal::gpio::Gpio::new().map_err(map_gpio_err)?;
        let pin = gpio
            .get(FAN_PWM_PIN)
            .map_err(map_gpio_err)?
            .into_output_low();
        let mut fan = Self {
            output: Output::Pin(pin),
        };
        fan.set_duty(100)?;
        Ok(fan)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn claim() -> Result<Self> {
        let mut fan = Self::stub();
        fan.set_duty(100)?;
        Ok(fan)
    }

    pub fn stub() -> Self {
        Self {
            output: Output::Stub(Vec::new()),
        }
    }

    /// Issue one PWM command for the given duty percentage. Always writes,
    /// even when the duty is unchanged.
    ///
    /// Hardware contract: the fan input is active-low, so the complement of
    /// the requested duty goes onto the pin. The inversion stays here; the
    /// curve and callers deal only in plain duty percentages.
    pub fn set_duty(&mut self, duty: u8) -> Result<()> {
        let duty = duty.min(100);
        match &mut self.output {
            #[cfg(target_os = "linux")]
            Output::Pin(pin) => {
                let inverted = f64::from(100 - duty) / 100.0;
                pin.set_pwm_frequency(FAN_PWM_HZ, inverted)
                    .map_err(map_gpio_err)?;
            }
            Output::Stub(history) => history.push(duty),
        }
        Ok(())
    }

    /// Duty commands issued so far; empty on the hardware path.
    pub fn stub_history(&self) -> &[u8] {
        match &self.output {
            Output::Stub(history) => history,
            #[cfg(target_os = "linux")]
            Output::Pin(_) => &[],
        }
    }
}

#[cfg(target_os = "linux")]
fn map_gpio_err(err: rppal::gpio::Error) -> crate::Error {
    crate::Error::Io(std::io::Error::other(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_breakpoints() {
        assert_eq!(duty_for_temp(0), 0);
        assert_eq!(duty_for_temp(35), 0);
        assert_eq!(duty_for_temp(36), 50);
        assert_eq!(duty_for_temp(38), 50);
        assert_eq!(duty_for_temp(39), 60);
        assert_eq!(duty_for_temp(40), 70);
        assert_eq!(duty_for_temp(41), 80);
        assert_eq!(duty_for_temp(42), 90);
        assert_eq!(duty_for_temp(43), 100);
        assert_eq!(duty_for_temp(60), 100);
    }

    #[test]
    fn negative_reading_stays_in_ideal_range() {
        assert_eq!(duty_for_temp(-1), 0);
    }

    #[test]
    fn hottest_drive_wins() {
        assert_eq!(duty_for_drives(&[30, 36, 41, 20]), 80);
        assert_eq!(duty_for_drives(&[0, 0, 0, 0]), 0);
        assert_eq!(duty_for_drives(&[43, 0, 0, 0]), 100);
    }

    #[test]
    fn curve_is_monotone_in_temperature() {
        let mut last = 0;
        for t in -5..60 {
            let duty = duty_for_temp(t);
            assert!(duty >= last, "duty dropped at {t} C");
            last = duty;
        }
    }

    #[test]
    fn stub_records_every_command() {
        let mut fan = FanPwm::stub();
        fan.set_duty(0).unwrap();
        fan.set_duty(70).unwrap();
        fan.set_duty(70).unwrap();
        fan.set_duty(120).unwrap();
        assert_eq!(fan.stub_history(), &[0, 70, 70, 100]);
    }
}
