use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use serde_json::json;

const WIDTH: u32 = 200;
const HEIGHT: u32 = 100;

/// Smooth ramp across the image, offset per band so channels differ.
fn ramp(x: u32, y: u32, band: u32, max: f64) -> f64 {
    let t = (x as f64 / (WIDTH - 1) as f64 + y as f64 / (HEIGHT - 1) as f64) / 2.0;
    ((t + band as f64 * 0.25) % 1.0) * max
}

fn sample_images() -> Vec<(&'static str, DynamicImage)> {
    let gray = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| Luma([ramp(x, y, 0, 255.0) as u8]));
    let gray_alpha = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
        LumaA([ramp(x, y, 0, 255.0) as u8, ramp(x, y, 1, 255.0) as u8])
    });
    let rgb = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
        Rgb([0, 1, 2].map(|b| ramp(x, y, b, 255.0) as u8))
    });
    let rgba = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
        Rgba([0, 1, 2, 3].map(|b| ramp(x, y, b, 255.0) as u8))
    });
    let deep = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
        Rgb([0, 1, 2].map(|b| ramp(x, y, b, 65535.0) as u16))
    });

    let bgra = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
        Rgba([3, 2, 1, 0].map(|b| ramp(x, y, b, 255.0) as u8))
    });

    vec![
        ("gray.png", DynamicImage::ImageLuma8(gray)),
        ("gray_alpha.png", DynamicImage::ImageLumaA8(gray_alpha)),
        ("rgb.png", DynamicImage::ImageRgb8(rgb)),
        ("rgba.png", DynamicImage::ImageRgba8(rgba)),
        ("rgb16.png", DynamicImage::ImageRgb16(deep)),
        ("rgba.tiff", DynamicImage::ImageRgba8(bgra)),
    ]
}

fn main() -> Result<()> {
    let out_dir = Path::new("sample_data");
    let img_dir = out_dir.join("images");
    fs::create_dir_all(&img_dir).context("creating sample_data/images")?;

    let mut rows = Vec::new();
    for (i, (name, img)) in sample_images().into_iter().enumerate() {
        img.save(img_dir.join(name))
            .with_context(|| format!("writing {name}"))?;
        rows.push(json!({
            "img_path": format!("images/{name}"),
            "sample_id": i,
            "channels": img.color().channel_count(),
        }));
    }
    // Referenced but never written: exercises --ignore-empty.
    let next_id = rows.len();
    rows.push(json!({ "img_path": "images/missing.png", "sample_id": next_id }));

    let manifest_path = out_dir.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&rows)?)
        .context("writing manifest")?;

    println!(
        "Wrote {} images ({WIDTH}x{HEIGHT}) and {} manifest rows to {}",
        rows.len() - 1,
        rows.len(),
        manifest_path.display()
    );
    Ok(())
}
