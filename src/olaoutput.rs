use std::net::{SocketAddr, UdpSocket};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::color::Color;
use crate::output::PixelOutput;

const UNIVERSE_SIZE: usize = 512;
const CHANNELS_PER_PIXEL: usize = 3;
pub const MAX_PIXELS: usize = UNIVERSE_SIZE / CHANNELS_PER_PIXEL;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("{count} pixels do not fit into one DMX universe (max {max})")]
    TooManyPixels { count: usize, max: usize },

    #[error("Cannot bind UDP socket: {0}")]
    Socket(#[from] std::io::Error),
}

/// Strip driven through an OLA daemon listening for OSC on UDP. Each pixel
/// takes three consecutive DMX channels of universe 0.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    pixels: Vec<Color>,
    brightness: u8,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr, pixel_count: usize) -> Result<Self, OutputError> {
        if pixel_count > MAX_PIXELS {
            return Err(OutputError::TooManyPixels {
                count: pixel_count,
                max: MAX_PIXELS,
            });
        }

        let our_addr = SocketAddr::from(([0, 0, 0, 0], 0));
        let sock = UdpSocket::bind(our_addr)?;
        log::info!("Sending {pixel_count} pixels to OLA at {target_addr}");

        Ok(OlaOutput {
            sock,
            target_addr,
            pixels: vec![Color::BLACK; pixel_count],
            brightness: 255,
            buffer: vec![0; UNIVERSE_SIZE],
        })
    }

    fn fill_buffer(&mut self) {
        let scale = self.brightness as u16 + 1;
        for (pixel, channels) in self
            .pixels
            .iter()
            .zip(self.buffer.chunks_exact_mut(CHANNELS_PER_PIXEL))
        {
            for (channel, value) in channels.iter_mut().zip(pixel.to_rgb()) {
                *channel = ((value as u16 * scale) >> 8) as u8;
            }
        }
    }
}

impl PixelOutput for OlaOutput {
    fn num_pixels(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel_color(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|pixel| *pixel = Color::BLACK);
    }

    fn show(&mut self) {
        self.fill_buffer();
        let msg_buf = match encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/dmx/universe/0".to_string(),
            args: vec![OscType::Blob(Vec::clone(&self.buffer))],
        })) {
            Ok(msg_buf) => msg_buf,
            Err(err) => {
                log::error!("Cannot encode DMX frame: {err:?}");
                return;
            }
        };

        if let Err(err) = self.sock.send_to(&msg_buf, self.target_addr) {
            log::warn!("Sending DMX frame to {} failed: {err}", self.target_addr);
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }
}
