//! Procedural planet surface textures: a diagonal gradient with random speckles.

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::color::Rgb;

pub const TEXTURE_WIDTH: u32 = 512;
pub const TEXTURE_HEIGHT: u32 = 256;
/// Speckles drawn on every texture, regardless of seed.
pub const SPECKLE_COUNT: usize = 50;
/// Opacity of each speckle when blended over the gradient.
pub const SPECKLE_ALPHA: f32 = 0.3;
const SPECKLE_MIN_RADIUS: f32 = 2.0;
const SPECKLE_RADIUS_SPAN: f32 = 10.0;

/// A color at an offset in [0, 1] along the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgb,
}

const fn stop(offset: f32, hex: u32) -> GradientStop {
    GradientStop {
        offset,
        color: Rgb::from_hex(hex),
    }
}

/// A filled disc blended over the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speckle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// White when true, black otherwise.
    pub light: bool,
}

/// A synthesized texture together with the parameters that produced it.
#[derive(Debug, Clone)]
pub struct SurfaceTexture {
    pub image: RgbaImage,
    pub stops: Vec<GradientStop>,
    pub speckles: Vec<Speckle>,
}

/// Gradient stops for a body. Earth, Mars, and Jupiter have hand-picked
/// palettes; every other body gets a lightness ramp on its base hue.
pub fn gradient_stops(body_name: &str, base: Rgb) -> Vec<GradientStop> {
    let hue = base.hue();
    let hsl = |offset: f32, s: f32, l: f32| GradientStop {
        offset,
        color: Rgb::from_hsl(hue, s, l),
    };

    match body_name {
        "earth" => vec![
            hsl(0.0, 0.8, 0.6),
            stop(0.3, 0x4a90e2),
            stop(0.7, 0x2d5016),
            hsl(1.0, 0.7, 0.4),
        ],
        "mars" => vec![stop(0.0, 0xff6b35), stop(0.5, 0xcd5c5c), stop(1.0, 0x8b3a3a)],
        "jupiter" => vec![
            stop(0.0, 0xf4e4bc),
            stop(0.3, 0xd8ca9d),
            stop(0.7, 0xc7b377),
            stop(1.0, 0xa0956b),
        ],
        _ => vec![hsl(0.0, 0.9, 0.7), hsl(0.5, 0.8, 0.5), hsl(1.0, 0.7, 0.3)],
    }
}

/// Color at `t` along sorted `stops`, clamped to the end colors.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb::BLACK;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    last.color
}

/// Draws planet textures from a seeded random stream.
///
/// Each call to [`synthesize`](Self::synthesize) consumes randomness, so the
/// same seed and call order always give the same textures.
pub struct TextureSynthesizer {
    rng: ChaCha8Rng,
}

impl TextureSynthesizer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn synthesize(&mut self, body_name: &str, base: Rgb) -> SurfaceTexture {
        let stops = gradient_stops(body_name, base);
        let mut image = paint_gradient(&stops);

        let speckles: Vec<Speckle> = (0..SPECKLE_COUNT)
            .map(|_| Speckle {
                x: self.rng.random::<f32>() * TEXTURE_WIDTH as f32,
                y: self.rng.random::<f32>() * TEXTURE_HEIGHT as f32,
                radius: self.rng.random::<f32>() * SPECKLE_RADIUS_SPAN + SPECKLE_MIN_RADIUS,
                light: self.rng.random_bool(0.5),
            })
            .collect();
        for speckle in &speckles {
            paint_speckle(&mut image, speckle);
        }

        SurfaceTexture {
            image,
            stops,
            speckles,
        }
    }
}

/// Fill the raster with the gradient running from the top-left corner to the
/// bottom-right corner.
fn paint_gradient(stops: &[GradientStop]) -> RgbaImage {
    let (w, h) = (TEXTURE_WIDTH as f32, TEXTURE_HEIGHT as f32);
    let length_sq = w * w + h * h;
    RgbaImage::from_fn(TEXTURE_WIDTH, TEXTURE_HEIGHT, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let t = (px * w + py * h) / length_sq;
        Rgba(sample_gradient(stops, t).to_rgba8(1.0))
    })
}

/// Source-over blend a disc; pixels are covered when their center is inside.
fn paint_speckle(image: &mut RgbaImage, speckle: &Speckle) {
    let ink: f32 = if speckle.light { 255.0 } else { 0.0 };
    let r = speckle.radius;
    let x0 = (speckle.x - r).floor().max(0.0) as u32;
    let y0 = (speckle.y - r).floor().max(0.0) as u32;
    let x1 = ((speckle.x + r).ceil() as u32).min(image.width());
    let y1 = ((speckle.y + r).ceil() as u32).min(image.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - speckle.x;
            let dy = y as f32 + 0.5 - speckle.y;
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let pixel = image.get_pixel_mut(x, y);
            for channel in &mut pixel.0[..3] {
                let blended = ink * SPECKLE_ALPHA + *channel as f32 * (1.0 - SPECKLE_ALPHA);
                *channel = blended.round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EARTH: Rgb = Rgb::from_hex(0x6B93D6);
    const URANUS: Rgb = Rgb::from_hex(0x4FD0E7);

    #[test]
    fn test_dimensions() {
        let texture = TextureSynthesizer::new(1).synthesize("venus", Rgb::from_hex(0xFFC649));
        assert_eq!(texture.image.dimensions(), (TEXTURE_WIDTH, TEXTURE_HEIGHT));
    }

    #[test]
    fn test_always_fifty_speckles() {
        for seed in [0, 1, 42, u64::MAX] {
            let texture = TextureSynthesizer::new(seed).synthesize("mars", Rgb::from_hex(0xCD5C5C));
            assert_eq!(texture.speckles.len(), SPECKLE_COUNT, "seed {seed}");
        }
    }

    #[test]
    fn test_speckle_ranges() {
        let texture = TextureSynthesizer::new(9).synthesize("neptune", Rgb::from_hex(0x4B70DD));
        for s in &texture.speckles {
            assert!((0.0..TEXTURE_WIDTH as f32).contains(&s.x));
            assert!((0.0..TEXTURE_HEIGHT as f32).contains(&s.y));
            assert!((2.0..12.0).contains(&s.radius), "radius {}", s.radius);
        }
    }

    #[test]
    fn test_stop_sets_differ_by_body() {
        let earth = gradient_stops("earth", EARTH);
        let mars = gradient_stops("mars", Rgb::from_hex(0xCD5C5C));
        let uranus = gradient_stops("uranus", URANUS);

        assert_eq!(earth.len(), 4);
        assert_eq!(mars.len(), 3);
        assert_eq!(uranus.len(), 3);
        assert_eq!(earth[1].color, Rgb::from_hex(0x4a90e2));
        assert_eq!(mars[0].color, Rgb::from_hex(0xff6b35));
        assert_ne!(mars, uranus);
        assert!((uranus[1].offset - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_default_stops_follow_base_hue() {
        let stops = gradient_stops("uranus", URANUS);
        for s in &stops {
            assert!(
                (s.color.hue() - URANUS.hue()).abs() < 1.0,
                "stop at {} drifted to hue {}",
                s.offset,
                s.color.hue()
            );
        }
        assert!(stops[0].color.r + stops[0].color.g > stops[2].color.r + stops[2].color.g, "ramp darkens");
    }

    #[test]
    fn test_jupiter_ignores_base_color() {
        let a = gradient_stops("jupiter", Rgb::WHITE);
        let b = gradient_stops("jupiter", Rgb::BLACK);
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_same_texture() {
        let a = TextureSynthesizer::new(77).synthesize("earth", EARTH);
        let b = TextureSynthesizer::new(77).synthesize("earth", EARTH);
        assert_eq!(a.speckles, b.speckles);
        assert_eq!(a.image.as_raw(), b.image.as_raw());

        let c = TextureSynthesizer::new(78).synthesize("earth", EARTH);
        assert_ne!(a.speckles, c.speckles);
    }

    #[test]
    fn test_sample_gradient_endpoints() {
        let stops = gradient_stops("mars", Rgb::BLACK);
        assert_eq!(sample_gradient(&stops, -1.0), Rgb::from_hex(0xff6b35));
        assert_eq!(sample_gradient(&stops, 0.5), Rgb::from_hex(0xcd5c5c));
        assert_eq!(sample_gradient(&stops, 2.0), Rgb::from_hex(0x8b3a3a));
        assert_eq!(sample_gradient(&[], 0.5), Rgb::BLACK);
    }

    #[test]
    fn test_gradient_corners_match_end_stops() {
        let stops = gradient_stops("jupiter", Rgb::BLACK);
        let image = paint_gradient(&stops);
        let top_left = image.get_pixel(0, 0).0;
        let bottom_right = image.get_pixel(TEXTURE_WIDTH - 1, TEXTURE_HEIGHT - 1).0;
        let near = |a: [u8; 4], b: [u8; 4]| a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2);
        assert!(near(top_left, Rgb::from_hex(0xf4e4bc).to_rgba8(1.0)), "{top_left:?}");
        assert!(near(bottom_right, Rgb::from_hex(0xa0956b).to_rgba8(1.0)), "{bottom_right:?}");
    }

    #[test]
    fn test_speckle_blends_toward_ink() {
        let mut image = RgbaImage::from_pixel(32, 32, Rgba([100, 100, 100, 255]));
        paint_speckle(
            &mut image,
            &Speckle {
                x: 16.0,
                y: 16.0,
                radius: 4.0,
                light: true,
            },
        );
        // 255 * 0.3 + 100 * 0.7 = 146.5
        assert_eq!(image.get_pixel(16, 16).0, [147, 147, 147, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [100, 100, 100, 255], "outside untouched");
    }
}
