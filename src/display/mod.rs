pub mod frame;
pub mod panel;
pub mod screens;

pub use frame::Frame;
pub use panel::Panel;
pub use screens::Backgrounds;
