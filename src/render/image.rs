//! Conversions between `image` buffers and tiny-skia pixmaps, plus PNG output
//!
//! tiny-skia stores premultiplied RGBA while `image` stores straight alpha,
//! so every hop between the two goes through these helpers.

use std::io;

use anyhow::Context;
use image::RgbaImage;
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::domain::CroppedImage;

/// Copy a straight-alpha image into a premultiplied pixmap
pub fn pixmap_from_rgba(img: &RgbaImage) -> anyhow::Result<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height()).context("Image has no pixels")?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for px in img.pixels() {
        let [r, g, b, a] = px.0;
        let p = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
    }
    Pixmap::from_vec(data, size).context("Pixmap buffer size mismatch")
}

/// Copy a premultiplied pixmap back into a straight-alpha image
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    img
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Encode a pixmap as a PNG data URL
pub fn encode_crop(pixmap: &Pixmap) -> anyhow::Result<CroppedImage> {
    let rgba = rgba_from_pixmap(pixmap);
    let mut buffer = Vec::new();
    write_png(&mut buffer, &rgba).context("Failed to encode crop as PNG")?;
    Ok(CroppedImage::from_png_bytes(&buffer))
}
