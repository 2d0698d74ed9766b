use std::thread;
use std::time::{Duration, Instant};

/// Paces the frame loop to a fixed frame rate.
pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
    measure_fps: bool,
    last_fps_report: Instant,
    frame: u64,
    frames_since_report: u32,
    overruns: u64,
}

impl IntervalTimer {
    pub fn new(fps: f32, measure_fps: bool) -> IntervalTimer {
        let frame_micros = 1_000_000.0 / fps.max(0.001);

        IntervalTimer {
            interval: Duration::from_micros(frame_micros as u64),
            last_tick: Instant::now(),
            measure_fps,
            last_fps_report: Instant::now(),
            frame: 0,
            frames_since_report: 0,
            overruns: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames that ran past their slot so far.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Waits for the slot of the next frame. A frame that overran its slot
    /// gets a fresh one starting now instead of rushing to catch up.
    pub fn sleep_until_next_tick(&mut self) {
        self.frame += 1;
        if self.measure_fps {
            self.update_fps();
        }

        let now = Instant::now();
        let due = self.last_tick + self.interval;
        let next_tick = if due > now {
            due
        } else {
            self.overruns += 1;
            log::warn!(
                "Frame {} overran its {:?} slot by {:?}",
                self.frame,
                self.interval,
                now - due
            );
            now + self.interval
        };

        thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        self.last_tick = next_tick
    }

    fn update_fps(&mut self) {
        self.frames_since_report += 1;

        if self.last_fps_report.elapsed() > Duration::from_secs(1) {
            log::debug!(
                "{} frames in the last second, {} overran so far",
                self.frames_since_report,
                self.overruns
            );
            self.frames_since_report = 0;
            self.last_fps_report = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_follows_frequency() {
        let timer = IntervalTimer::new(50.0, false);
        assert_eq!(timer.interval(), Duration::from_millis(20));
    }

    #[test]
    fn sleeps_about_one_interval() {
        let mut timer = IntervalTimer::new(100.0, true);
        let started = Instant::now();
        timer.sleep_until_next_tick();
        timer.sleep_until_next_tick();
        assert!(started.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn slow_frame_counts_as_overrun() {
        let mut timer = IntervalTimer::new(100.0, false);
        thread::sleep(Duration::from_millis(30));
        timer.sleep_until_next_tick();
        assert_eq!(timer.overruns(), 1);

        let started = Instant::now();
        timer.sleep_until_next_tick();
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
