pub(crate) mod peakmeter;
pub(crate) mod pixelsource;
pub(crate) mod pulsar;

use rand::Rng;

use crate::cluster::Cluster;

/// What a cluster does to its own pixels besides moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Plain,
    /// Saturation of every cell grows by `saturation_step` each time it is drawn.
    Pulsar { saturation_step: u8 },
    /// The trailing `peak_length` cells are headroom for a jittering level bar.
    PeakMeter { peak_length: u8 },
    /// Ripples of `hue` leave the center cell in both directions.
    PixelSource { hue: u16, hue_step: u16 },
}

impl Cluster {
    /// Runs one step of the cluster's effect. Pulsars advance while being drawn
    /// instead, so they have nothing to do here.
    pub(crate) fn advance_effect<R: Rng>(&mut self, rng: &mut R) {
        if self.is_peak_meter() {
            let width = self.jitter_peak(rng);
            log::trace!("Peak meter bar width {width}");
        } else if self.is_pixel_source() {
            self.emit_ripple();
        }
    }
}
