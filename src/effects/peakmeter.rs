use rand::Rng;

use crate::cluster::{Cluster, ClusterError};
use crate::color::Color;
use crate::effects::Effect;

impl Cluster {
    /// A level bar of `width` pixels followed by `peak_length` pixels of
    /// headroom. The bar is split into green, yellow and red.
    pub fn peak_meter(width: usize, peak_length: u8) -> Result<Cluster, ClusterError> {
        if width == 0 {
            return Err(ClusterError::Empty);
        }
        if peak_length as usize >= width {
            return Err(ClusterError::PeakTooLong { width, peak_length });
        }

        let length = width
            .checked_add(peak_length as usize)
            .ok_or(ClusterError::Allocation(usize::MAX))?;
        let mut cluster = Cluster::new(length)?;
        cluster.effect = Effect::PeakMeter { peak_length };
        cluster.paint_level_bar(width);
        Ok(cluster)
    }

    pub fn peak_length(&self) -> u8 {
        match self.effect {
            Effect::PeakMeter { peak_length } => peak_length,
            _ => 0,
        }
    }

    /// Picks a new bar width in `[len - peak, len + peak)` with
    /// `len = length - peak` and repaints. Returns the chosen width.
    /// Without headroom the bar keeps its full width.
    pub(crate) fn jitter_peak<R: Rng>(&mut self, rng: &mut R) -> usize {
        let peak = self.peak_length() as usize;
        let len = self.len() - peak;
        let width = if peak == 0 {
            len
        } else {
            rng.gen_range(len - peak..len + peak)
        };
        self.paint_level_bar(width);
        width
    }

    /// First half green, next third yellow, rest of `width` red, black after.
    fn paint_level_bar(&mut self, width: usize) {
        for i in 0..self.len() {
            let color = if i >= width {
                Color::BLACK
            } else if i < width / 2 {
                Color::GREEN
            } else if i < width / 2 + width / 3 {
                Color::YELLOW
            } else {
                Color::RED
            };
            self.set_rgb_pixel(i, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lit_width(cluster: &Cluster) -> usize {
        (0..cluster.len())
            .take_while(|&i| cluster.rgb_pixel(i) != Color::BLACK)
            .count()
    }

    #[test]
    fn initial_bar_uses_thirds() {
        let cluster = Cluster::peak_meter(12, 3).unwrap();
        assert_eq!(cluster.len(), 15);
        assert!(cluster.is_peak_meter());
        assert_eq!(cluster.peak_length(), 3);

        let colors: Vec<Color> = (0..15).map(|i| cluster.rgb_pixel(i)).collect();
        assert_eq!(&colors[0..6], &[Color::GREEN; 6]);
        assert_eq!(&colors[6..10], &[Color::YELLOW; 4]);
        assert_eq!(&colors[10..12], &[Color::RED; 2]);
        assert_eq!(&colors[12..15], &[Color::BLACK; 3]);
    }

    #[test]
    fn peak_must_be_shorter_than_width() {
        assert_eq!(
            Cluster::peak_meter(4, 4).err(),
            Some(ClusterError::PeakTooLong {
                width: 4,
                peak_length: 4
            })
        );
        assert_eq!(Cluster::peak_meter(0, 0).err(), Some(ClusterError::Empty));
    }

    #[test]
    fn zero_peak_is_not_a_meter() {
        let mut cluster = Cluster::peak_meter(5, 0).unwrap();
        assert!(!cluster.is_peak_meter());
        assert_eq!(lit_width(&cluster), 5);

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(cluster.jitter_peak(&mut rng), 5);
        assert_eq!(lit_width(&cluster), 5);
    }

    #[test]
    fn oversized_meter_is_an_allocation_failure() {
        assert_eq!(
            Cluster::peak_meter(usize::MAX, 1).err(),
            Some(ClusterError::Allocation(usize::MAX))
        );
    }

    #[test]
    fn jitter_stays_within_headroom() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cluster = Cluster::peak_meter(10, 4).unwrap();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..500 {
            let width = cluster.jitter_peak(&mut rng);
            assert!((6..14).contains(&width), "width {width}");
            assert_eq!(lit_width(&cluster), width);
            assert!((width..cluster.len()).all(|i| cluster.rgb_pixel(i) == Color::BLACK));
            seen.insert(width);
        }

        assert_eq!(seen.len(), 8);
    }
}
