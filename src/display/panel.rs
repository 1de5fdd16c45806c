//! Panel facade over the vendor display stack (ILI9341 over SPI via
//! mipidsi). The core only ever seeds a frame, overlays, and pushes it; the
//! wire protocol, init sequence, and orientation handling all live behind
//! this boundary. A recording stub backs tests and `--stub-display` runs.

use embedded_graphics::pixelcolor::Rgb565;

use crate::config::BACKLIGHT_FULL;
use crate::display::frame::Frame;
use crate::Result;

#[cfg(target_os = "linux")]
use crate::display::frame::{HEIGHT, WIDTH};
#[cfg(target_os = "linux")]
use embedded_graphics::draw_target::DrawTarget;

pub struct Panel {
    inner: Inner,
}

enum Inner {
    #[cfg(target_os = "linux")]
    Hardware(Hardware),
    Stub(Stub),
}

#[derive(Default)]
struct Stub {
    pushes: usize,
    clears: usize,
    last_frame: Option<Frame>,
    backlight: Vec<u16>,
}

#[cfg(target_os = "linux")]
type HwDisplay = mipidsi::Display<
    display_interface_spi::SPIInterface<rppal::spi::SimpleHalSpiDevice, rppal::gpio::OutputPin>,
    mipidsi::models::ILI9341Rgb565,
    rppal::gpio::OutputPin,
>;

#[cfg(target_os = "linux")]
struct Hardware {
    display: HwDisplay,
    backlight: rppal::gpio::OutputPin,
}

impl Panel {
    /// Bring up the SPI panel. Orientation is fixed at 180 degrees for the
    /// way the module is mounted in the case; it is applied once here, not
    /// per frame. Failure here is fatal at startup.
    #[cfg(target_os = "linux")]
    pub fn open() -> Result<Self> {
        use crate::config::{PANEL_BACKLIGHT_PIN, PANEL_DC_PIN, PANEL_RST_PIN, PANEL_SPI_HZ};
        use display_interface_spi::SPIInterface;
        use mipidsi::options::{Orientation, Rotation};
        use rppal::gpio::Gpio;
        use rppal::spi::{Bus, Mode, SimpleHalSpiDevice, SlaveSelect, Spi};

        let gpio = Gpio::new().map_err(map_gpio_err)?;
        let dc = gpio.get(PANEL_DC_PIN).map_err(map_gpio_err)?.into_output();
        let rst = gpio.get(PANEL_RST_PIN).map_err(map_gpio_err)?.into_output();
        let backlight = gpio
            .get(PANEL_BACKLIGHT_PIN)
            .map_err(map_gpio_err)?
            .into_output_low();

        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, PANEL_SPI_HZ, Mode::Mode0)
            .map_err(|e| crate::Error::Io(std::io::Error::other(e.to_string())))?;
        let di = SPIInterface::new(SimpleHalSpiDevice::new(spi), dc);

        let mut delay = rppal::hal::Delay::new();
        let display = mipidsi::Builder::new(mipidsi::models::ILI9341Rgb565, di)
            .reset_pin(rst)
            .display_size(WIDTH as u16, HEIGHT as u16)
            .orientation(Orientation::new().rotate(Rotation::Deg180))
            .init(&mut delay)
            .map_err(|e| crate::Error::Io(std::io::Error::other(format!("panel init: {e:?}"))))?;

        Ok(Self {
            inner: Inner::Hardware(Hardware { display, backlight }),
        })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open() -> Result<Self> {
        Err(crate::Error::InvalidArgs(
            "panel hardware is only available on Linux targets; use --stub-display".into(),
        ))
    }

    pub fn stub() -> Self {
        Self {
            inner: Inner::Stub(Stub::default()),
        }
    }

    /// Transfer one composed frame to the panel.
    pub fn push(&mut self, frame: &Frame) -> Result<()> {
        match &mut self.inner {
            #[cfg(target_os = "linux")]
            Inner::Hardware(hw) => hw
                .display
                .set_pixels(0, 0, WIDTH as u16 - 1, HEIGHT as u16 - 1, frame.pixels())
                .map_err(map_display_err),
            Inner::Stub(stub) => {
                stub.pushes += 1;
                stub.last_frame = Some(frame.clone());
                Ok(())
            }
        }
    }

    /// Fill the whole panel directly, bypassing frame composition. Used for
    /// teardown so shutdown does not allocate a frame.
    pub fn clear(&mut self, color: Rgb565) -> Result<()> {
        match &mut self.inner {
            #[cfg(target_os = "linux")]
            Inner::Hardware(hw) => hw.display.clear(color).map_err(map_display_err),
            Inner::Stub(stub) => {
                let _ = color;
                stub.clears += 1;
                stub.last_frame = None;
                Ok(())
            }
        }
    }

    /// Backlight intensity, 0..=1023. Software PWM on the backlight GPIO;
    /// 0 parks the pin low so standby draws nothing.
    pub fn set_backlight(&mut self, level: u16) -> Result<()> {
        let level = level.min(BACKLIGHT_FULL);
        match &mut self.inner {
            #[cfg(target_os = "linux")]
            Inner::Hardware(hw) => {
                if level == 0 {
                    hw.backlight.clear_pwm().map_err(map_gpio_err)?;
                    hw.backlight.set_low();
                    Ok(())
                } else {
                    hw.backlight
                        .set_pwm_frequency(2_000.0, f64::from(level) / f64::from(BACKLIGHT_FULL))
                        .map_err(map_gpio_err)
                }
            }
            Inner::Stub(stub) => {
                stub.backlight.push(level);
                Ok(())
            }
        }
    }

    pub fn stub_pushes(&self) -> usize {
        match &self.inner {
            Inner::Stub(stub) => stub.pushes,
            #[cfg(target_os = "linux")]
            Inner::Hardware(_) => 0,
        }
    }

    pub fn stub_clears(&self) -> usize {
        match &self.inner {
            Inner::Stub(stub) => stub.clears,
            #[cfg(target_os = "linux")]
            Inner::Hardware(_) => 0,
        }
    }

    pub fn stub_last_frame(&self) -> Option<&Frame> {
        match &self.inner {
            Inner::Stub(stub) => stub.last_frame.as_ref(),
            #[cfg(target_os = "linux")]
            Inner::Hardware(_) => None,
        }
    }

    pub fn stub_backlight_history(&self) -> &[u16] {
        match &self.inner {
            Inner::Stub(stub) => &stub.backlight,
            #[cfg(target_os = "linux")]
            Inner::Hardware(_) => &[],
        }
    }
}

#[cfg(target_os = "linux")]
fn map_gpio_err(err: rppal::gpio::Error) -> crate::Error {
    crate::Error::Io(std::io::Error::other(err.to_string()))
}

#[cfg(target_os = "linux")]
fn map_display_err(err: impl std::fmt::Debug) -> crate::Error {
    crate::Error::Io(std::io::Error::other(format!("panel write: {err:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn stub_records_pushes_and_backlight() {
        let mut panel = Panel::stub();
        let frame = Frame::new(Rgb565::BLACK);
        panel.push(&frame).unwrap();
        panel.push(&frame).unwrap();
        panel.set_backlight(1023).unwrap();
        panel.set_backlight(0).unwrap();
        assert_eq!(panel.stub_pushes(), 2);
        assert_eq!(panel.stub_backlight_history(), &[1023, 0]);
        assert!(panel.stub_last_frame().is_some());
    }

    #[test]
    fn stub_clamp_backlight_to_full_scale() {
        let mut panel = Panel::stub();
        panel.set_backlight(u16::MAX).unwrap();
        assert_eq!(panel.stub_backlight_history(), &[BACKLIGHT_FULL]);
    }

    #[test]
    fn clear_drops_the_recorded_frame() {
        let mut panel = Panel::stub();
        panel.push(&Frame::new(Rgb565::WHITE)).unwrap();
        panel.clear(Rgb565::BLACK).unwrap();
        assert_eq!(panel.stub_clears(), 1);
        assert!(panel.stub_last_frame().is_none());
    }
}
