//! Offscreen RGB565 framebuffer the screens compose into before one push
//! to the panel. Redraws start by cloning a pre-rendered background frame
//! and writing the dynamic cells on top.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, Pixel};

pub const WIDTH: u32 = 240;
pub const HEIGHT: u32 = 320;

#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: Vec<Rgb565>,
}

impl Frame {
    pub fn new(fill: Rgb565) -> Self {
        Self {
            buf: vec![fill; (WIDTH * HEIGHT) as usize],
        }
    }

    /// Pixels in row-major order, for the panel push.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.buf.iter().copied()
    }

    /// Fill the rectangle with inclusive corners, clipped to the frame.
    /// Inclusive corners match the coordinate tables the screens use.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        let x0 = x0.clamp(0, WIDTH as i32 - 1);
        let x1 = x1.clamp(0, WIDTH as i32 - 1);
        let y0 = y0.clamp(0, HEIGHT as i32 - 1);
        let y1 = y1.clamp(0, HEIGHT as i32 - 1);
        for y in y0..=y1 {
            let row = y as usize * WIDTH as usize;
            for x in x0..=x1 {
                self.buf[row + x as usize] = color;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb565 {
        self.buf[(y * WIDTH + x) as usize]
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.x < WIDTH as i32 && point.y >= 0 && point.y < HEIGHT as i32 {
                self.buf[point.y as usize * WIDTH as usize + point.x as usize] = color;
            }
        }
        Ok(())
    }
}
