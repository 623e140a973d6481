//! Contrast enhancement by histogram equalization of the Lab lightness plane.
//!
//! Pixels are mapped to 8-bit CIE L\*a\*b\* (L scaled to `0..=255`, a and b
//! offset by 128, sRGB transfer curve, D65 white point). Only the L plane is
//! equalized so hue and saturation survive the stretch.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::equalize_histogram;

// D65 reference white.
const WHITE_X: f32 = 0.950_456;
const WHITE_Z: f32 = 1.088_754;

const LAB_EPSILON: f32 = 0.008_856;
const LAB_KAPPA: f32 = 903.3;

/// Equalize the lightness of `image` and return the enhanced copy.
pub fn enhance(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut lightness = GrayImage::new(width, height);
    let mut chroma = Vec::with_capacity((width as usize) * (height as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        let [l, a, b] = rgb_to_lab8(pixel.0);
        lightness.put_pixel(x, y, Luma([l]));
        chroma.push((a, b));
    }

    // Equalizing a single-level plane would push every pixel to full lightness.
    let first = lightness.as_raw().first().copied();
    let uniform = lightness.as_raw().iter().all(|&l| Some(l) == first);
    let equalized = if uniform {
        lightness
    } else {
        equalize_histogram(&lightness)
    };

    let mut out = RgbImage::new(width, height);
    for ((x, y, pixel), (a, b)) in out.enumerate_pixels_mut().zip(chroma) {
        let l = equalized.get_pixel(x, y).0[0];
        *pixel = Rgb(lab8_to_rgb([l, a, b]));
    }

    tracing::trace!(width, height, "Equalized lightness plane");
    out
}

/// Convert an sRGB pixel to 8-bit Lab.
pub fn rgb_to_lab8(rgb: [u8; 3]) -> [u8; 3] {
    let r = srgb_to_linear(rgb[0]);
    let g = srgb_to_linear(rgb[1]);
    let b = srgb_to_linear(rgb[2]);

    let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / WHITE_X;
    let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
    let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / WHITE_Z;

    let fy = lab_f(y);
    let l = if y > LAB_EPSILON {
        116.0 * fy - 16.0
    } else {
        LAB_KAPPA * y
    };
    let a = 500.0 * (lab_f(x) - fy);
    let b = 200.0 * (fy - lab_f(z));

    [
        to_u8(l * 255.0 / 100.0),
        to_u8(a + 128.0),
        to_u8(b + 128.0),
    ]
}

/// Convert an 8-bit Lab pixel back to sRGB.
pub fn lab8_to_rgb(lab: [u8; 3]) -> [u8; 3] {
    let l = f32::from(lab[0]) * 100.0 / 255.0;
    let a = f32::from(lab[1]) - 128.0;
    let b = f32::from(lab[2]) - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let y = if l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        l / LAB_KAPPA
    };
    let x = lab_f_inv(fx) * WHITE_X;
    let z = lab_f_inv(fz) * WHITE_Z;

    let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
    let g = -0.969_256 * x + 1.875_992 * y + 0.041_556 * z;
    let bl = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

    [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(bl)]
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let v = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    to_u8(v * 255.0)
}

fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f32) -> f32 {
    let cube = t * t * t;
    if cube > LAB_EPSILON {
        cube
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
