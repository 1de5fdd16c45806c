//! Screen selection and standby logic. Pure state: all hardware side
//! effects (backlight, rendering) are decided by the caller from the
//! booleans returned here.

/// Which screen the panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Stats,
    Temperature,
    Standby,
}

/// A debounced button edge, delivered over the input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Left,
    Right,
}

/// Tracks the current screen and the inactivity clock that drives standby.
#[derive(Debug)]
pub struct DisplayState {
    screen: Screen,
    idle_secs: u32,
    standby_after_secs: u32,
}

impl DisplayState {
    pub fn new(standby_after_secs: u32) -> Self {
        Self {
            screen: Screen::Splash,
            idle_secs: 0,
            standby_after_secs,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn idle_secs(&self) -> u32 {
        self.idle_secs
    }

    /// Apply a button press. Returns true when the press woke the panel out
    /// of standby, in which case the caller must turn the backlight back on.
    ///
    /// The left button cycles Splash -> Stats -> Temperature -> Splash. The
    /// right button is a reserved slot: it counts as activity but changes no
    /// screen outside standby. Any press while in standby returns to Splash.
    pub fn handle_button(&mut self, event: ButtonEvent) -> bool {
        self.idle_secs = 0;
        let was_standby = self.screen == Screen::Standby;
        if was_standby {
            self.screen = Screen::Splash;
            return true;
        }
        if event == ButtonEvent::Left {
            self.screen = match self.screen {
                Screen::Splash => Screen::Stats,
                Screen::Stats => Screen::Temperature,
                _ => Screen::Splash,
            };
        }
        false
    }

    /// Advance the inactivity clock by one loop second. Returns true when
    /// the threshold was just crossed and the panel entered standby; the
    /// caller must turn the backlight off.
    ///
    /// The clock only runs while something is displayed; standby holds until
    /// a button press.
    pub fn tick(&mut self) -> bool {
        if self.screen == Screen::Standby {
            return false;
        }
        self.idle_secs += 1;
        if self.idle_secs > self.standby_after_secs {
            self.screen = Screen::Standby;
            self.idle_secs = 0;
            return true;
        }
        false
    }
}
