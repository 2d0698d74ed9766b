use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::clock::Clock;
use crate::cluster::{Cluster, Direction};
use crate::color::Color;
use crate::output::PixelOutput;

const STARTUP_BRIGHTNESS: u8 = 48;
const FLASH_HOLD: Duration = Duration::from_millis(50);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("All {0} cluster slots are taken")]
    Full(usize),

    #[error("Position {position} lies beyond the strip of {pixel_count} pixels")]
    OutOfRange { position: i32, pixel_count: usize },
}

/// Where a cluster ended up after advancing one step.
#[derive(Debug, PartialEq, Eq)]
enum Boundary {
    Inside,
    BelowStart,
    PastEnd,
}

/// Owns the active clusters and composes them onto the strip frame by frame.
pub struct Controller<O: PixelOutput, C: Clock, R: Rng> {
    output: O,
    clock: C,
    rng: R,
    max_clusters: usize,
    clusters: Vec<Cluster>,
    running: bool,
}

impl<O: PixelOutput, C: Clock, R: Rng> Controller<O, C, R> {
    pub fn new(output: O, clock: C, rng: R, max_clusters: usize) -> Self {
        Controller {
            output,
            clock,
            rng,
            max_clusters,
            clusters: Vec::with_capacity(max_clusters),
            running: false,
        }
    }

    /// Turns the strip on and lights the first three pixels red, green, blue
    /// so the color order of the strip can be checked by eye.
    pub fn begin(&mut self) {
        self.output.clear();
        self.output.show();
        self.output.set_brightness(STARTUP_BRIGHTNESS);

        self.output.set_pixel_color(0, Color::RED);
        self.output.set_pixel_color(1, Color::GREEN);
        self.output.set_pixel_color(2, Color::BLUE);
        self.output.show();

        self.running = true;
        log::info!(
            "Controller started on {} pixels, room for {} clusters",
            self.output.num_pixels(),
            self.max_clusters
        );
    }

    pub fn end(&mut self) {
        self.output.clear();
        self.output.show();
        self.running = false;
        log::info!("Controller stopped");
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.output.set_brightness(brightness);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Takes ownership of `cluster` and places it at `position`, which also
    /// becomes its restart position.
    pub fn add_cluster(
        &mut self,
        mut cluster: Cluster,
        position: i32,
    ) -> Result<(), ControllerError> {
        if self.clusters.len() >= self.max_clusters {
            log::warn!("Rejecting cluster, all {} slots are taken", self.max_clusters);
            return Err(ControllerError::Full(self.max_clusters));
        }

        let pixel_count = self.output.num_pixels();
        if position as i64 >= pixel_count as i64 {
            log::warn!("Rejecting cluster at {position}, strip has {pixel_count} pixels");
            return Err(ControllerError::OutOfRange {
                position,
                pixel_count,
            });
        }

        log::debug!(
            "Adding cluster #{} of {} pixels at {position}",
            self.clusters.len(),
            cluster.len()
        );
        cluster.set_start_position(position);
        cluster.set_position(position);
        self.clusters.push(cluster);
        Ok(())
    }

    /// Renders one frame: every awake cluster runs its effect, is drawn in
    /// registration order and moves on. Finished clusters are dropped afterwards.
    pub fn show(&mut self) {
        if !self.running {
            return;
        }

        let now = self.clock.now_ms();
        let pixel_count = i32::try_from(self.output.num_pixels()).unwrap_or(i32::MAX);
        self.output.clear();

        for cluster in self.clusters.iter_mut() {
            if cluster.start_interval() > 0 && cluster.start_time() > now {
                continue;
            }

            let should_move = cluster.should_move(now);
            if should_move {
                cluster.advance_effect(&mut self.rng);
            }

            draw_cluster(cluster, &mut self.output, pixel_count);

            if should_move {
                advance_cluster(cluster, pixel_count, now);
            }
        }

        self.output.show();
        self.reap();
    }

    fn reap(&mut self) {
        let mut index = 0;
        self.clusters.retain(|cluster| {
            let done = cluster.is_done();
            if done {
                log::info!("Cluster #{index} done");
            }
            index += 1;
            !done
        });
    }

    /// Flashes the whole strip at full brightness, then goes dark again.
    pub fn flash_all(&mut self, color: Color) {
        log::debug!("Flashing all pixels with {:06x}", color.0);
        let old_brightness = self.output.brightness();
        self.output.set_brightness(255);
        let pixel_count = self.output.num_pixels();
        self.output.fill(color, 0, pixel_count);
        self.output.show();

        thread::sleep(FLASH_HOLD);

        self.output.set_brightness(old_brightness);
        self.output.clear();
        self.output.show();
    }
}

fn draw_cluster<O: PixelOutput>(cluster: &mut Cluster, output: &mut O, pixel_count: i32) {
    let start = cluster.position().max(0);
    let end = (cluster.position() as i64 + cluster.len() as i64).min(pixel_count as i64);
    let pulsar = cluster.is_pulsar();

    for pixel_no in start..end as i32 {
        let color = if pulsar {
            cluster.pulsar_color_at(pixel_no)
        } else {
            cluster.pixel_color_at(pixel_no)
        };
        log::trace!("Pixel {pixel_no} = {:06x}", color.0);
        output.set_pixel_color(pixel_no as usize, color);
    }
}

fn classify(position: i32, length: i32, pixel_count: i32) -> Boundary {
    if position <= length.saturating_neg() {
        Boundary::BelowStart
    } else if position >= pixel_count {
        Boundary::PastEnd
    } else {
        Boundary::Inside
    }
}

/// Moves the cluster one step and applies its boundary policy. Wrap-around
/// wins over back-and-forth, which wins over a periodic restart.
fn advance_cluster(cluster: &mut Cluster, pixel_count: i32, now: u64) {
    let length = i32::try_from(cluster.len()).unwrap_or(i32::MAX);
    let position = cluster.position().saturating_add(cluster.direction().step());

    let boundary = classify(position, length, pixel_count);
    if boundary == Boundary::Inside {
        cluster.set_position(position);
        return;
    }

    if cluster.wraps_around() {
        let wrapped = match boundary {
            Boundary::BelowStart => pixel_count.saturating_sub(1),
            _ => 1i32.saturating_sub(length),
        };
        log::debug!("Cluster wraps from {position} to {wrapped}");
        cluster.set_position(wrapped);
    } else if cluster.goes_back_and_forth() {
        let direction = match boundary {
            Boundary::BelowStart => Direction::LeftToRight,
            _ => Direction::RightToLeft,
        };
        log::debug!("Cluster turns around at {position}");
        cluster.set_direction(direction);
    } else if cluster.start_interval() > 0 {
        let start_time = now.saturating_add(cluster.start_interval());
        log::debug!(
            "Cluster restarts at {} in {} ms",
            cluster.start_position(),
            cluster.start_interval()
        );
        cluster.set_start_time(start_time);
        cluster.set_position(cluster.start_position());
    } else {
        cluster.mark_done();
    }
}
