use crate::cluster::{Cluster, ClusterError, Pixel};
use crate::effects::Effect;

const DARK: Pixel = Pixel::Rgb([0, 0, 0]);

impl Cluster {
    /// A dark cluster of `2 * radius + 1` pixels whose center emits ripples of
    /// `hue` in both directions. The hue moves on by `hue_step` per ripple.
    pub fn pixel_source(hue: u16, hue_step: u16, radius: usize) -> Result<Cluster, ClusterError> {
        if radius == 0 {
            return Err(ClusterError::Empty);
        }

        let length = radius
            .checked_mul(2)
            .and_then(|diameter| diameter.checked_add(1))
            .ok_or(ClusterError::Allocation(usize::MAX))?;
        let mut cluster = Cluster::new(length)?;
        cluster.effect = Effect::PixelSource { hue, hue_step };
        Ok(cluster)
    }

    pub(crate) fn emit_ripple(&mut self) {
        let Effect::PixelSource { hue, hue_step } = self.effect else {
            return;
        };

        let length = self.len();
        let center = length / 2;
        if center == 0 {
            return;
        }
        let fade = (255 / center) as u8;

        // Inner cells move outwards by one, the outermost ones drop off
        for i in 1..=center {
            let faded = self.faded_pixel(i, fade);
            self.set_pixel(i - 1, faded);
        }
        for i in (center..length - 1).rev() {
            let faded = self.faded_pixel(i, fade);
            self.set_pixel(i + 1, faded);
        }

        self.set_hsv_pixel(center, hue, 255);
        self.effect = Effect::PixelSource {
            hue: hue.wrapping_add(hue_step),
            hue_step,
        };
    }

    fn faded_pixel(&self, index: usize, fade: u8) -> Pixel {
        match self.get_pixel(index) {
            Some(Pixel::Hsv { hue, saturation }) if saturation >= fade => Pixel::Hsv {
                hue,
                saturation: saturation - fade,
            },
            _ => DARK,
        }
    }

    fn set_pixel(&mut self, index: usize, value: Pixel) {
        if let Some(pixel) = self.pixel_mut(index) {
            *pixel = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsv(hue: u16, saturation: u8) -> Pixel {
        Pixel::Hsv { hue, saturation }
    }

    fn cells(cluster: &Cluster) -> Vec<Pixel> {
        (0..cluster.len()).filter_map(|i| cluster.get_pixel(i)).collect()
    }

    #[test]
    fn starts_dark_and_symmetric() {
        let cluster = Cluster::pixel_source(100, 10, 3).unwrap();
        assert_eq!(cluster.len(), 7);
        assert!(cluster.is_pixel_source());
        assert_eq!(cells(&cluster), vec![DARK; 7]);
        assert_eq!(Cluster::pixel_source(0, 0, 0).err(), Some(ClusterError::Empty));
    }

    #[test]
    fn ripples_fade_outwards() {
        let mut cluster = Cluster::pixel_source(100, 10, 3).unwrap();

        cluster.emit_ripple();
        assert_eq!(
            cells(&cluster),
            vec![DARK, DARK, DARK, hsv(100, 255), DARK, DARK, DARK]
        );

        cluster.emit_ripple();
        assert_eq!(
            cells(&cluster),
            vec![DARK, DARK, hsv(100, 170), hsv(110, 255), hsv(100, 170), DARK, DARK]
        );

        cluster.emit_ripple();
        assert_eq!(
            cells(&cluster),
            vec![
                DARK,
                hsv(100, 85),
                hsv(110, 170),
                hsv(120, 255),
                hsv(110, 170),
                hsv(100, 85),
                DARK
            ]
        );

        cluster.emit_ripple();
        assert_eq!(cells(&cluster)[0], hsv(100, 0));
        assert_eq!(cells(&cluster)[6], hsv(100, 0));

        // The first ripple has left the cluster
        cluster.emit_ripple();
        assert_eq!(cells(&cluster)[0], hsv(110, 0));
    }

    #[test]
    fn oversized_source_is_an_allocation_failure() {
        assert_eq!(
            Cluster::pixel_source(0, 0, usize::MAX).err(),
            Some(ClusterError::Allocation(usize::MAX))
        );
        assert!(matches!(
            Cluster::pixel_source(0, 0, usize::MAX / 2),
            Err(ClusterError::Allocation(_))
        ));
    }

    #[test]
    fn source_hue_wraps() {
        let mut cluster = Cluster::pixel_source(u16::MAX, 2, 1).unwrap();
        cluster.emit_ripple();
        assert_eq!(cluster.effect, Effect::PixelSource { hue: 1, hue_step: 2 });
    }
}
