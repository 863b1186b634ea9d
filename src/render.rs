use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::color::Color;
use crate::grid::Matrix;

/// Gap between cells and around the outer edge, in pixels.
pub const CELL_GAP: u32 = 8;
const LABEL_MARGIN: u32 = 6;
const BORDER: Rgb<u8> = Rgb([170, 170, 170]);
const CANVAS: Rgb<u8> = Rgb([255, 255, 255]);

/// Cell geometry for rasterized export.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_width: 96,
            cell_height: 64,
        }
    }
}

/// Rasterize the matrix: a uniform cell grid with a fixed gap on a white
/// canvas. Each cell is filled with its color, outlined in light gray, and
/// labeled with its uppercase hex string at the bottom-left, in black or
/// white depending on the cell's lightness.
pub fn render_matrix(matrix: &Matrix, options: &RenderOptions) -> RgbImage {
    let rows = matrix.row_count() as u32;
    let cols = matrix.col_count() as u32;
    let width = cols * (options.cell_width + CELL_GAP) + CELL_GAP;
    let height = rows * (options.cell_height + CELL_GAP) + CELL_GAP;
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), CANVAS);

    for r in 0..matrix.row_count() {
        for c in 0..matrix.col_count() {
            let color = matrix.cell(r, c);
            let x0 = CELL_GAP + c as u32 * (options.cell_width + CELL_GAP);
            let y0 = CELL_GAP + r as u32 * (options.cell_height + CELL_GAP);
            fill_cell(&mut img, x0, y0, options.cell_width, options.cell_height, color);

            let label = color.to_hex_upper();
            let fill = if color.is_light() {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            };
            let text_y = (y0 + options.cell_height)
                .saturating_sub(LABEL_MARGIN + GLYPH_HEIGHT * GLYPH_SCALE);
            draw_label(&mut img, x0 + LABEL_MARGIN, text_y, &label, fill);
        }
    }
    img
}

/// Render and save as PNG, regardless of the path's extension.
pub fn write_png(matrix: &Matrix, options: &RenderOptions, path: &Path) -> Result<()> {
    let img = render_matrix(matrix, options);
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write PNG to {}", path.display()))?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "wrote PNG"
    );
    Ok(())
}

fn fill_cell(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Color) {
    let fill = Rgb([color.r, color.g, color.b]);
    let (img_w, img_h) = img.dimensions();
    for y in y0..(y0 + h).min(img_h) {
        for x in x0..(x0 + w).min(img_w) {
            let on_border = x == x0 || y == y0 || x == x0 + w - 1 || y == y0 + h - 1;
            img.put_pixel(x, y, if on_border { BORDER } else { fill });
        }
    }
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SCALE: u32 = 2;
const GLYPH_ADVANCE: u32 = (GLYPH_WIDTH + 1) * GLYPH_SCALE;

/// 5x7 bitmap rows (bit 4 is the leftmost pixel) for the label alphabet:
/// `#`, `0`-`9`, `A`-`F`. Labels only ever contain these 17 characters.
fn glyph(ch: char) -> [u8; 7] {
    match ch {
        '#' => [0x0a, 0x0a, 0x1f, 0x0a, 0x1f, 0x0a, 0x0a],
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        'A' => [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'B' => [0x1e, 0x11, 0x11, 0x1e, 0x11, 0x11, 0x1e],
        'C' => [0x0e, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0e],
        'D' => [0x1e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1e],
        'E' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f],
        'F' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10],
        _ => [0; 7],
    }
}

fn draw_label(img: &mut RgbImage, x: u32, y: u32, text: &str, fill: Rgb<u8>) {
    let (img_w, img_h) = img.dimensions();
    for (i, ch) in text.chars().enumerate() {
        let rows = glyph(ch.to_ascii_uppercase());
        let gx = x + i as u32 * GLYPH_ADVANCE;
        for (gy, bits) in rows.iter().enumerate() {
            for bit in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - bit)) == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let px = gx + bit * GLYPH_SCALE + dx;
                        let py = y + gy as u32 * GLYPH_SCALE + dy;
                        if px < img_w && py < img_h {
                            img.put_pixel(px, py, fill);
                        }
                    }
                }
            }
        }
    }
}
