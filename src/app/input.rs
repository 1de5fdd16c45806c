//! Button wiring. The GPIO alert callbacks run on rppal's interrupt
//! thread; they only post events into the channel, so the main loop never
//! shares the state enum across contexts. Stubbed off Linux.

#[cfg(target_os = "linux")]
use std::time::Duration;

use std::sync::mpsc::Sender;

use crate::state::ButtonEvent;
#[cfg(target_os = "linux")]
use crate::{
    config::{BUTTON_DEBOUNCE_MS, BUTTON_LEFT_PIN, BUTTON_RIGHT_PIN},
    Error,
};
use crate::Result;

/// Holds the claimed input pins; dropping releases the interrupts.
#[cfg(target_os = "linux")]
pub struct Buttons {
    _left: rppal::gpio::InputPin,
    _right: rppal::gpio::InputPin,
}

#[cfg(target_os = "linux")]
impl Buttons {
    /// Claim both buttons with pull-downs and post debounced rising edges
    /// to `events`.
    pub fn claim(events: Sender<ButtonEvent>) -> Result<Self> {
        use rppal::gpio::Trigger;

        let gpio = rppal::gpio::Gpio::new().map_err(map_gpio_err)?;
        let debounce = Some(Duration::from_millis(BUTTON_DEBOUNCE_MS));

        let mut left = gpio
            .get(BUTTON_LEFT_PIN)
            .map_err(map_gpio_err)?
            .into_input_pulldown();
        let tx = events.clone();
        left.set_async_interrupt(Trigger::RisingEdge, debounce, move |_| {
            let _ = tx.send(ButtonEvent::Left);
        })
        .map_err(map_gpio_err)?;

        let mut right = gpio
            .get(BUTTON_RIGHT_PIN)
            .map_err(map_gpio_err)?
            .into_input_pulldown();
        let tx = events;
        right.set_async_interrupt(Trigger::RisingEdge, debounce, move |_| {
            let _ = tx.send(ButtonEvent::Right);
        })
        .map_err(map_gpio_err)?;

        Ok(Self {
            _left: left,
            _right: right,
        })
    }
}

#[cfg(target_os = "linux")]
fn map_gpio_err(err: rppal::gpio::Error) -> Error {
    Error::Io(std::io::Error::other(err.to_string()))
}

#[cfg(not(target_os = "linux"))]
pub struct Buttons;

#[cfg(not(target_os = "linux"))]
impl Buttons {
    pub fn claim(_events: Sender<ButtonEvent>) -> Result<Self> {
        Err(crate::Error::InvalidArgs(
            "buttons unsupported on this platform".into(),
        ))
    }
}
