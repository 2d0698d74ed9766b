use crate::color::{self, Color};
use crate::effects::Effect;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    #[error("A cluster needs at least one pixel")]
    Empty,

    #[error("Peak length {peak_length} must be shorter than the bar width {width}")]
    PeakTooLong { width: usize, peak_length: u8 },

    #[error("Cannot allocate {0} pixels")]
    Allocation(usize),
}

/// A single cell of a cluster. HSV cells always have full value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pixel {
    Rgb([u8; 3]),
    Hsv { hue: u16, saturation: u8 },
}

impl Pixel {
    pub fn color(&self) -> Color {
        match *self {
            Pixel::Rgb([red, green, blue]) => Color::from_rgb(red, green, blue),
            Pixel::Hsv { hue, saturation } => color::hsv_to_rgb(hue, saturation, 255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Stationary,
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn step(self) -> i32 {
        match self {
            Direction::Stationary => 0,
            Direction::LeftToRight => 1,
            Direction::RightToLeft => -1,
        }
    }
}

/// A contiguous group of pixels that moves across the strip as one unit.
pub struct Cluster {
    pixels: Vec<Pixel>,
    pub(crate) effect: Effect,

    direction: Direction,
    wrap_around: bool,
    back_and_forth: bool,
    update_interval: u64,
    start_time: u64,
    start_interval: u64,
    start_position: i32,

    // Owned by the controller once registered
    position: i32,
    done: bool,
    last_update: u64,
}

impl Cluster {
    /// Allocates `length` black pixels.
    pub fn new(length: usize) -> Result<Cluster, ClusterError> {
        if length == 0 {
            return Err(ClusterError::Empty);
        }

        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(length).is_err() {
            log::error!("Cannot allocate memory for a cluster of {length} pixels");
            return Err(ClusterError::Allocation(length));
        }
        pixels.resize(length, Pixel::Rgb([0, 0, 0]));

        Ok(Cluster {
            pixels,
            effect: Effect::Plain,
            direction: Direction::Stationary,
            wrap_around: false,
            back_and_forth: false,
            update_interval: 0,
            start_time: 0,
            start_interval: 0,
            start_position: 0,
            position: 0,
            done: false,
            last_update: 0,
        })
    }

    pub fn pixel(color: Color) -> Result<Cluster, ClusterError> {
        Cluster::bar(color, 1)
    }

    pub fn bar(color: Color, length: usize) -> Result<Cluster, ClusterError> {
        let mut cluster = Cluster::new(length)?;
        for i in 0..length {
            cluster.set_rgb_pixel(i, color);
        }
        Ok(cluster)
    }

    /// One full turn around the hue circle, spread over `width` pixels.
    pub fn rainbow(width: usize) -> Result<Cluster, ClusterError> {
        let mut cluster = Cluster::new(width)?;
        for (i, hue) in rainbow_hues(width).enumerate() {
            cluster.set_rgb_pixel(i, color::hsv_to_rgb(hue, 255, 255));
        }
        Ok(cluster)
    }

    /// Eight pixels, lit where the corresponding bit of `pattern` is set.
    /// Bit 0 is the first pixel.
    pub fn pattern(color: Color, pattern: u8) -> Result<Cluster, ClusterError> {
        let mut cluster = Cluster::new(8)?;
        for bit in 0..8 {
            if pattern & (1 << bit) != 0 {
                cluster.set_rgb_pixel(bit, color);
            } else {
                cluster.set_rgb_pixel(bit, Color::BLACK);
            }
        }
        Ok(cluster)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn set_rgb_pixel(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = Pixel::Rgb(color.to_rgb());
        }
    }

    pub fn set_hsv_pixel(&mut self, index: usize, hue: u16, saturation: u8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = Pixel::Hsv { hue, saturation };
        }
    }

    pub fn get_pixel(&self, index: usize) -> Option<Pixel> {
        self.pixels.get(index).copied()
    }

    pub(crate) fn pixel_mut(&mut self, index: usize) -> Option<&mut Pixel> {
        self.pixels.get_mut(index)
    }

    /// Color of a cell by local index, black when out of range.
    pub fn rgb_pixel(&self, index: usize) -> Color {
        match self.pixels.get(index) {
            Some(pixel) => pixel.color(),
            None => Color::BLACK,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_update_interval(&mut self, interval: u64) {
        self.update_interval = interval;
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn set_start_time(&mut self, time: u64) {
        log::debug!("Cluster scheduled to start at {time}");
        self.start_time = time;
    }

    pub fn start_interval(&self) -> u64 {
        self.start_interval
    }

    pub fn set_start_interval(&mut self, interval: u64) {
        self.start_interval = interval;
    }

    pub fn start_position(&self) -> i32 {
        self.start_position
    }

    pub fn set_start_position(&mut self, position: i32) {
        self.start_position = position;
    }

    pub fn wraps_around(&self) -> bool {
        self.wrap_around
    }

    /// Re-enter at the other end of the strip after leaving it.
    /// Clears back-and-forth.
    pub fn enable_wrap_around(&mut self) {
        self.wrap_around = true;
        self.back_and_forth = false;
    }

    pub fn goes_back_and_forth(&self) -> bool {
        self.back_and_forth
    }

    /// Reverse direction at either end of the strip. Clears wrap-around.
    pub fn enable_back_and_forth(&mut self) {
        self.back_and_forth = true;
        self.wrap_around = false;
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn is_pulsar(&self) -> bool {
        matches!(self.effect, Effect::Pulsar { saturation_step } if saturation_step > 0)
    }

    pub fn is_peak_meter(&self) -> bool {
        matches!(self.effect, Effect::PeakMeter { peak_length } if peak_length > 0)
    }

    pub fn is_pixel_source(&self) -> bool {
        matches!(self.effect, Effect::PixelSource { .. })
    }

    /// Whether the strip index lies in `[position, position + len)`.
    pub fn has_pixel(&self, strip_index: i32) -> bool {
        let start = self.position as i64;
        let index = strip_index as i64;
        index >= start && index < start + self.len() as i64
    }

    /// Maps a strip index into this cluster's buffer.
    pub(crate) fn local_index(&self, strip_index: i32) -> Option<usize> {
        if self.has_pixel(strip_index) {
            Some((strip_index as i64 - self.position as i64) as usize)
        } else {
            None
        }
    }

    pub fn pixel_color_at(&self, strip_index: i32) -> Color {
        match self.local_index(strip_index) {
            Some(index) => self.rgb_pixel(index),
            None => Color::BLACK,
        }
    }

    /// Rate limit for movement and effects. Accepts at most once per
    /// `update_interval` milliseconds.
    pub fn should_move(&mut self, now: u64) -> bool {
        if now.saturating_sub(self.last_update) >= self.update_interval {
            self.last_update = now;
            true
        } else {
            false
        }
    }
}

/// Hues for `width` pixels spread evenly over the hue circle.
pub(crate) fn rainbow_hues(width: usize) -> impl Iterator<Item = u16> {
    let spread = 65536 / width.max(1) as u32;
    (0..width as u32).map(move |i| (spread * i) as u16)
}
