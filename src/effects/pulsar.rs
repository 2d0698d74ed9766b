use crate::cluster::{rainbow_hues, Cluster, ClusterError, Pixel};
use crate::color::Color;
use crate::effects::Effect;

impl Cluster {
    pub fn pulsar_pixel(hue: u16, saturation_step: u8) -> Result<Cluster, ClusterError> {
        Cluster::pulsar_bar(hue, saturation_step, 1)
    }

    pub fn pulsar_bar(
        hue: u16,
        saturation_step: u8,
        length: usize,
    ) -> Result<Cluster, ClusterError> {
        let mut cluster = Cluster::new(length)?;
        for i in 0..length {
            cluster.set_hsv_pixel(i, hue, saturation_step);
        }
        cluster.effect = Effect::Pulsar { saturation_step };
        Ok(cluster)
    }

    pub fn pulsar_rainbow(saturation_step: u8, width: usize) -> Result<Cluster, ClusterError> {
        let mut cluster = Cluster::new(width)?;
        for (i, hue) in rainbow_hues(width).enumerate() {
            cluster.set_hsv_pixel(i, hue, saturation_step);
        }
        cluster.effect = Effect::Pulsar { saturation_step };
        Ok(cluster)
    }

    pub fn saturation_step(&self) -> u8 {
        match self.effect {
            Effect::Pulsar { saturation_step } => saturation_step,
            _ => 0,
        }
    }

    /// Like `pixel_color_at`, but first bumps the cell's saturation by the
    /// pulsar step. The returned color reflects the new saturation.
    pub fn pulsar_color_at(&mut self, strip_index: i32) -> Color {
        let step = self.saturation_step();
        let Some(index) = self.local_index(strip_index) else {
            return Color::BLACK;
        };

        match self.pixel_mut(index) {
            Some(pixel) => {
                if let Pixel::Hsv { saturation, .. } = pixel {
                    *saturation = saturation.wrapping_add(step);
                }
                pixel.color()
            }
            None => Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn saturation(cluster: &Cluster, index: usize) -> u8 {
        match cluster.get_pixel(index) {
            Some(Pixel::Hsv { saturation, .. }) => saturation,
            other => panic!("expected an HSV cell, got {other:?}"),
        }
    }

    #[test]
    fn factories_store_hsv_cells() {
        let pixel = Cluster::pulsar_pixel(1000, 16).unwrap();
        assert!(pixel.is_pulsar());
        assert_eq!(pixel.len(), 1);
        assert_eq!(
            pixel.get_pixel(0),
            Some(Pixel::Hsv {
                hue: 1000,
                saturation: 16
            })
        );

        let bar = Cluster::pulsar_bar(2000, 8, 3).unwrap();
        assert!((0..3).all(|i| saturation(&bar, i) == 8));

        let rainbow = Cluster::pulsar_rainbow(4, 4).unwrap();
        let hues: Vec<u16> = (0..4)
            .map(|i| match rainbow.get_pixel(i) {
                Some(Pixel::Hsv { hue, .. }) => hue,
                _ => panic!("expected an HSV cell"),
            })
            .collect();
        assert_eq!(hues, vec![0, 16384, 32768, 49152]);
    }

    #[test]
    fn zero_step_is_not_a_pulsar() {
        let cluster = Cluster::pulsar_bar(0, 0, 2).unwrap();
        assert!(!cluster.is_pulsar());
    }

    #[test]
    fn drawing_advances_saturation_and_wraps() {
        let mut cluster = Cluster::pulsar_bar(0, 100, 2).unwrap();
        cluster.set_position(5);

        assert_eq!(cluster.pulsar_color_at(5), color::hsv_to_rgb(0, 200, 255));
        assert_eq!(saturation(&cluster, 0), 200);
        assert_eq!(saturation(&cluster, 1), 100);

        cluster.pulsar_color_at(5);
        assert_eq!(saturation(&cluster, 0), 44);
    }

    #[test]
    fn plain_reads_leave_saturation_alone() {
        let mut cluster = Cluster::pulsar_pixel(0, 30).unwrap();
        for _ in 0..5 {
            cluster.pixel_color_at(0);
        }
        assert_eq!(saturation(&cluster, 0), 30);
    }

    #[test]
    fn unclaimed_index_is_black_and_untouched() {
        let mut cluster = Cluster::pulsar_pixel(0, 30).unwrap();
        assert_eq!(cluster.pulsar_color_at(1), Color::BLACK);
        assert_eq!(cluster.pulsar_color_at(-1), Color::BLACK);
        assert_eq!(saturation(&cluster, 0), 30);
    }
}
