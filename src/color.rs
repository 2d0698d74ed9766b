use palette::FromColor;

/// A packed 24 bit `0xRRGGBB` color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x00FF00);
    pub const YELLOW: Color = Color(0xFFFF00);
    pub const BLUE: Color = Color(0x0000FF);
    pub const CYAN: Color = Color(0x00FFFF);
    pub const MAGENTA: Color = Color(0xFF00FF);
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);

    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Color {
        Color((red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }
}

/// Converts a point on the 16 bit hue circle into a gamma corrected color.
///
/// Gamma correction happens by decoding the sRGB result into linear light,
/// which darkens mid tones the way LED strips need.
pub fn hsv_to_rgb(hue: u16, saturation: u8, value: u8) -> Color {
    let hue = hue as f32 * 360.0 / 65536.0;
    let hsv: palette::Hsv = palette::Hsv::new(hue, saturation as f32 / 255.0, value as f32 / 255.0);
    let srgb: palette::Srgb = palette::Srgb::from_color(hsv);
    let linear: palette::LinSrgb = srgb.into_linear();
    let (red, green, blue) = linear.into_format::<u8>().into_components();
    Color::from_rgb(red, green, blue)
}
