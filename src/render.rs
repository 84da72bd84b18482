//! Rendering a codel map to an image.
//!
//! Every codel is painted with the initial color shifted by its cumulative
//! change. A termination trap is drawn east of the codel executed last:
//! three codels in the color a final push leads to, flanked by black
//! blockers. Trap codels never overwrite program codels.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Color, ColorChange};
use crate::error::RenderError;
use crate::machine::{CodelMap, Position};

const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// Milliseconds each hue is shown in animated output.
const FRAME_DELAY_MS: u32 = 600;

/// How codels are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Side of a codel, in pixels.
    pub codel_size: u32,
    /// Name of the color of the first codel.
    pub initial_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            codel_size: 20,
            initial_color: "red".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn color(&self) -> Result<Color, RenderError> {
        self.initial_color.parse()
    }
}

/// Codel-addressed drawing surface covering a rectangle of positions.
struct Canvas {
    image: RgbImage,
    min: Position,
    max: Position,
    codel_size: u32,
}

impl Canvas {
    fn new(min: Position, max: Position, codel_size: u32) -> Self {
        let columns = (max.x - min.x + 1) as u32;
        let rows = (max.y - min.y + 1) as u32;
        Self {
            image: RgbImage::from_pixel(columns * codel_size, rows * codel_size, WHITE),
            min,
            max,
            codel_size,
        }
    }

    fn contains(&self, position: Position) -> bool {
        (self.min.x..=self.max.x).contains(&position.x)
            && (self.min.y..=self.max.y).contains(&position.y)
    }

    fn paint(&mut self, position: Position, color: Rgb<u8>) {
        if !self.contains(position) {
            return;
        }
        let left = (position.x - self.min.x) as u32 * self.codel_size;
        let top = (position.y - self.min.y) as u32 * self.codel_size;
        for dy in 0..self.codel_size {
            for dx in 0..self.codel_size {
                self.image.put_pixel(left + dx, top + dy, color);
            }
        }
    }
}

/// Render the codels of a run, starting from `initial`.
pub fn render(codels: &CodelMap, initial: Color, codel_size: u32) -> Result<RgbImage, RenderError> {
    if codel_size == 0 {
        return Err(RenderError::InvalidCodelSize(codel_size));
    }
    let (last, last_change) = codels.last().ok_or(RenderError::EmptyProgram)?;
    let (min, max) = codels.extent().ok_or(RenderError::EmptyProgram)?;
    // Room for the termination trap east and south of the last codel.
    let max = Position::new(max.x.max(last.x + 1), max.y.max(last.y + 1));

    let mut canvas = Canvas::new(min, max, codel_size);
    for (position, change) in codels.iter() {
        canvas.paint(position, Rgb(initial.shifted(change).rgb()));
    }

    let push = Rgb(initial.shifted(last_change + ColorChange::new(1, 0)).rgb());
    let trap = [
        (Position::new(last.x + 1, last.y), push),
        (Position::new(last.x + 1, last.y - 1), push),
        (Position::new(last.x + 1, last.y + 1), push),
        (Position::new(last.x, last.y - 1), BLACK),
        (Position::new(last.x, last.y + 1), BLACK),
        (Position::new(last.x + 1, last.y - 2), BLACK),
    ];
    for (position, color) in trap {
        if codels.get(position).is_none() {
            canvas.paint(position, color);
        }
    }

    debug!(
        width = canvas.image.width(),
        height = canvas.image.height(),
        %initial,
        "codels rendered"
    );
    Ok(canvas.image)
}

/// Render and save to `path`.
///
/// `.gif` files get an endless animation cycling through the six hues;
/// any other extension is encoded from the extension with one still image.
pub fn save(codels: &CodelMap, path: &Path, options: &RenderOptions) -> Result<(), RenderError> {
    let animated = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    if !animated {
        let image = render(codels, options.color()?, options.codel_size)?;
        image.save(path)?;
        return Ok(());
    }

    let mut encoder = GifEncoder::new(BufWriter::new(File::create(path)?));
    encoder.set_repeat(Repeat::Infinite)?;
    for hue in 0..6 {
        let image = render(codels, Color::new(hue, 1), options.codel_size)?;
        let frame = Frame::from_parts(
            DynamicImage::ImageRgb8(image).into_rgba8(),
            0,
            0,
            Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1),
        );
        encoder.encode_frame(frame)?;
    }
    Ok(())
}
