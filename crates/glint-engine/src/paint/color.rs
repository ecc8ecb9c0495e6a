/// RGBA color with display-encoded (sRGB) components and straight alpha.
///
/// Components are the values a non-sRGB framebuffer would store. When the
/// target surface is sRGB, [`to_wgpu`](Self::to_wgpu) decodes them to linear
/// so the hardware re-encoding lands on the same bytes.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Opaque color from `f32` components in `[0, 1]`.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Clear value for a render pass targeting `format`.
    #[inline]
    pub fn to_wgpu(self, format: wgpu::TextureFormat) -> wgpu::Color {
        let channel = |c: f32| {
            let c = c.clamp(0.0, 1.0) as f64;
            if format.is_srgb() { srgb_to_linear(c) } else { c }
        };
        wgpu::Color {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a.clamp(0.0, 1.0) as f64,
        }
    }
}

/// sRGB transfer function, inverted.
#[inline]
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::TextureFormat as F;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn linear_target_keeps_components() {
        let c = Color::rgb(0.07, 0.13, 0.17).to_wgpu(F::Bgra8Unorm);
        assert_eq!(c.r, 0.07f32 as f64);
        assert_eq!(c.b, 0.17f32 as f64);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn srgb_target_decodes_to_linear() {
        let c = Color::rgb(0.07, 0.13, 0.17).to_wgpu(F::Bgra8UnormSrgb);
        assert!(close(c.r, 0.005_981), "r = {}", c.r);
        assert!(close(c.g, 0.015_325), "g = {}", c.g);
        assert!(close(c.b, 0.024_515), "b = {}", c.b);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn srgb_decode_round_trips_through_encode() {
        let encode = |l: f64| {
            if l <= 0.003_130_8 { l * 12.92 } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
        };
        for v in [0.0, 0.02, 0.07, 0.5, 1.0] {
            assert!(close(encode(srgb_to_linear(v)), v), "v = {v}");
        }
    }

    #[test]
    fn white_and_black_are_fixed_points() {
        let white = Color::WHITE.to_wgpu(F::Rgba8UnormSrgb);
        assert_eq!((white.r, white.g, white.b), (1.0, 1.0, 1.0));
        let black = Color::rgb(0.0, 0.0, 0.0).to_wgpu(F::Rgba8UnormSrgb);
        assert_eq!((black.r, black.g, black.b), (0.0, 0.0, 0.0));
    }
}
