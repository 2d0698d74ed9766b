use crate::color::Color;

/// An addressable LED strip.
///
/// Implementations keep a frame buffer that `set_pixel_color` writes into and
/// `show` pushes to the hardware. Indices past the end of the strip are ignored.
pub trait PixelOutput {
    fn num_pixels(&self) -> usize;
    fn set_pixel_color(&mut self, index: usize, color: Color);
    fn clear(&mut self);
    fn show(&mut self);
    fn set_brightness(&mut self, brightness: u8);
    fn brightness(&self) -> u8;

    fn fill(&mut self, color: Color, start: usize, count: usize) {
        let end = start.saturating_add(count).min(self.num_pixels());
        for index in start..end {
            self.set_pixel_color(index, color);
        }
    }
}

#[cfg(test)]
pub use self::memory::MemoryStrip;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_clipped_to_the_strip() {
        let mut strip = MemoryStrip::new(5);
        strip.fill(Color::CYAN, 3, 10);
        assert_eq!(
            strip.pixels,
            vec![
                Color::BLACK,
                Color::BLACK,
                Color::BLACK,
                Color::CYAN,
                Color::CYAN
            ]
        );
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut strip = MemoryStrip::new(2);
        strip.set_pixel_color(2, Color::RED);
        assert_eq!(strip.pixels, vec![Color::BLACK; 2]);
    }
}
