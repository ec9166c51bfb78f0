use std::io::Cursor;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Default figure size in pixels.
pub const FIGURE_SIZE: (u32, u32) = (800, 600);

// ---------------------------------------------------------------------------
// Figure – one off-screen canvas per chart
// ---------------------------------------------------------------------------

/// An explicit off-screen canvas. Drawing happens against a plotters
/// `DrawingArea` borrowed from the internal buffer; once the draw closure
/// returns, the figure is consumed and encoded, so no canvas outlives its
/// chart.
pub struct Figure {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Figure {
            width,
            height,
            // RGB, white background until filled
            buffer: vec![255u8; (width * height * 3) as usize],
        }
    }

    /// Run `draw` against a fresh drawing area, then encode the canvas as a
    /// base64 PNG payload.
    pub fn render<F>(mut self, draw: F) -> Result<String>
    where
        F: for<'a> FnOnce(&DrawingArea<BitMapBackend<'a>, Shift>) -> Result<()>,
    {
        {
            let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE)?;
            draw(&root)?;
            root.present()?;
        }
        self.encode()
    }

    fn encode(self) -> Result<String> {
        let img = RgbImage::from_raw(self.width, self.height, self.buffer)
            .context("figure buffer has unexpected size")?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .context("encoding figure as PNG")?;
        Ok(BASE64.encode(&png))
    }
}

impl Default for Figure {
    fn default() -> Self {
        Figure::new(FIGURE_SIZE.0, FIGURE_SIZE.1)
    }
}
