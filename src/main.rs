pub(crate) mod clock;
pub(crate) mod cluster;
pub(crate) mod color;
pub(crate) mod controller;
pub(crate) mod effects;
pub(crate) mod intervaltimer;
pub(crate) mod olaoutput;
pub(crate) mod output;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use crate::clock::SystemClock;
use crate::cluster::{Cluster, ClusterError, Direction};
use crate::color::Color;
use crate::controller::Controller;
use crate::intervaltimer::IntervalTimer;
use crate::olaoutput::OlaOutput;
use crate::output::PixelOutput;

#[derive(Parser)]
struct Cli {
    /// Where the OLA daemon listens for OSC
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:7770")]
    ola_addr: SocketAddr,

    /// Number of pixels on the strip
    #[arg(short, long, default_value_t = 60)]
    pixels: usize,

    /// Frames per second
    #[arg(short, long, default_value_t = 30.0)]
    fps: f32,

    /// How many clusters may be active at once
    #[arg(short, long, default_value_t = 16)]
    max_clusters: usize,

    /// Strip brightness, 0-255
    #[arg(short, long, default_value_t = 48)]
    brightness: u8,
}

/// Each cluster of the demo with its starting position.
fn demo_scene(pixel_count: usize) -> Vec<(Result<Cluster, ClusterError>, i32)> {
    let pixel_count = pixel_count as i32;
    let mut scene = vec![];

    let rainbow = Cluster::rainbow(12).map(|mut cluster| {
        cluster.set_direction(Direction::LeftToRight);
        cluster.set_update_interval(40);
        cluster.enable_wrap_around();
        cluster
    });
    scene.push((rainbow, 0));

    let pulsar_rainbow = Cluster::pulsar_rainbow(4, 6).map(|mut cluster| {
        cluster.set_direction(Direction::RightToLeft);
        cluster.set_update_interval(90);
        cluster.enable_wrap_around();
        cluster
    });
    scene.push((pulsar_rainbow, pixel_count / 2));

    let pulsar_bar = Cluster::pulsar_bar(43690, 8, 5).map(|mut cluster| {
        cluster.set_direction(Direction::LeftToRight);
        cluster.set_update_interval(60);
        cluster.enable_back_and_forth();
        cluster
    });
    scene.push((pulsar_bar, pixel_count / 3));

    let source = Cluster::pixel_source(0, 1024, 4).map(|mut cluster| {
        cluster.set_update_interval(80);
        cluster
    });
    scene.push((source, pixel_count / 2 - 4));

    scene.push((Cluster::pulsar_pixel(21845, 32), pixel_count / 4));

    let meter = Cluster::peak_meter(12, 4).map(|mut cluster| {
        cluster.set_update_interval(100);
        cluster
    });
    scene.push((meter, pixel_count - 16));

    let comet = Cluster::pixel(Color::WHITE).map(|mut cluster| {
        cluster.set_direction(Direction::RightToLeft);
        cluster.set_update_interval(15);
        cluster.set_start_interval(3000);
        cluster
    });
    scene.push((comet, pixel_count - 1));

    let pattern = Cluster::pattern(Color::CYAN, 0b1010_0101).map(|mut cluster| {
        cluster.set_direction(Direction::LeftToRight);
        cluster.set_update_interval(50);
        cluster
    });
    scene.push((pattern, 0));

    let late_bar = Cluster::bar(Color::MAGENTA, 3).map(|mut cluster| {
        cluster.set_direction(Direction::RightToLeft);
        cluster.set_update_interval(70);
        cluster.set_start_interval(5000);
        cluster.set_start_time(2000);
        cluster
    });
    scene.push((late_bar, pixel_count - 1));

    scene
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let ola = match OlaOutput::new(args.ola_addr, args.pixels) {
        Ok(ola) => ola,
        Err(err) => panic!("Cannot set up OLA output: {}", err),
    };

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || handler_running.store(false, Ordering::SeqCst)) {
        panic!("Cannot install Ctrl-C handler: {}", err);
    }

    let mut controller = Controller::new(
        ola,
        SystemClock::new(),
        rand::thread_rng(),
        args.max_clusters,
    );
    controller.begin();
    controller.flash_all(Color::WHITE);
    controller.set_brightness(args.brightness);

    for (cluster, position) in demo_scene(args.pixels) {
        let cluster = match cluster {
            Ok(cluster) => cluster,
            Err(err) => {
                log::warn!("Skipping cluster: {err}");
                continue;
            }
        };
        if let Err(err) = controller.add_cluster(cluster, position) {
            log::warn!("Cannot add cluster: {err}");
        }
    }

    let mut timer = IntervalTimer::new(args.fps, true);
    log::info!(
        "Animating {} clusters on {} pixels, one frame every {:?}",
        controller.clusters().len(),
        controller.output().num_pixels(),
        timer.interval()
    );

    while running.load(Ordering::SeqCst) {
        controller.show();
        timer.sleep_until_next_tick();
    }

    controller.end();
}
