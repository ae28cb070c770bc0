#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use uniform_tagger::{ImageResource, Point, TaggingSession};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Photo with a horizontal gradient so scaled repaints are not uniform
pub fn gradient_photo(name: &str, width: u32, height: u32, tint: u8) -> ImageResource {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, tint, 255])
    });
    ImageResource::new(name, encode_png(&img))
}

pub fn drag(session: &mut TaggingSession, from: (f32, f32), to: (f32, f32)) {
    session.pointer_down(Point::new(from.0, from.1));
    session.pointer_move(Point::new((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
    session.pointer_move(Point::new(to.0, to.1));
    session.pointer_up(Point::new(to.0, to.1));
}
