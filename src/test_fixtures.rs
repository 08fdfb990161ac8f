//! In-memory image fixtures shared by unit tests.

use std::io::Cursor;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageEncoder, RgbImage, RgbaImage};

use crate::core::SourceFile;

/// Smooth RGBA gradient, stored with light PNG compression so lossy WebP
/// comes out well under it.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([
            ((x * 2 + y) % 256) as u8,
            ((y * 2) % 256) as u8,
            (((x + y) * 3 / 2) % 256) as u8,
            255,
        ])
    });

    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .expect("png fixture should encode");
    out
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("jpeg fixture should encode");
    out.into_inner()
}

pub fn png_file(name: &str, width: u32, height: u32) -> SourceFile {
    SourceFile::from_bytes(name, "image/png", png_bytes(width, height))
}

pub fn jpeg_file(name: &str, width: u32, height: u32) -> SourceFile {
    SourceFile::from_bytes(name, "image/jpeg", jpeg_bytes(width, height))
}

/// PNG whose IHDR declares an 8-bit RGBA image of `width`×`height` but that
/// carries only a token IDAT. The decoder reads the header and gives up
/// before touching pixel data, so huge sizes stay tiny on disk.
pub fn png_header_only(width: u32, height: u32) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    png_chunk(&mut out, b"IHDR", &ihdr);
    png_chunk(&mut out, b"IDAT", &[0x78, 0x9c, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01]);
    png_chunk(&mut out, b"IEND", &[]);
    out
}

fn png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = crc32(kind.iter().chain(data));
    out.extend_from_slice(&crc.to_be_bytes());
}

fn crc32<'a>(bytes: impl Iterator<Item = &'a u8>) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in bytes {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

/// Declared as PNG but not decodable.
pub fn corrupt_file(name: &str) -> SourceFile {
    SourceFile::from_bytes(name, "image/png", b"definitely not a png".to_vec())
}

pub fn text_file(name: &str) -> SourceFile {
    SourceFile::from_bytes(name, "text/plain", b"hello".to_vec())
}
