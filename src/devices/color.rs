//! HiTechnic color sensor V2.
//!
//! The sensor has three operating modes. Calibrated readings are only valid
//! in active mode (LED lit); raw readings need passive or raw mode. The driver
//! caches the last mode it set so repeated reads do not rewrite the mode
//! register.
//!
//! # Registers (active mode)
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 1 | Color number 0..=17 |
//! | 1 | 3 | Red, green, blue |
//! | 4 | 1 | White |
//! | 5 | 1 | Color index (6-bit RGB) |
//! | 6 | 3 | Normalized red, green, blue |
//!
//! In passive and raw mode the block holds four big-endian 16-bit values:
//! red, green, blue and white.

use crate::error::Error;
use crate::link::{I2cLink, MuxLink, SensorLink};
use crate::traits::{I2cBus, MuxChannel, MuxSensorType, SensorMux};

/// Default bus address.
pub const COLOR_ADDRESS: u8 = 0x02;

const COMMAND_REGISTER: u8 = 0x41;

/// Sensor operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorMode {
    /// LED lit, calibrated readings.
    Active,
    /// LED off, ambient light.
    Passive,
    /// LED lit, uncalibrated readings.
    Raw,
}

impl ColorMode {
    /// Command byte selecting this mode.
    pub const fn code(self) -> u8 {
        match self {
            Self::Active => 0x00,
            Self::Passive => 0x01,
            Self::Raw => 0x03,
        }
    }
}

/// Mains frequency the sensor filters out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MainsFrequency {
    /// 50 Hz supply.
    Hz50,
    /// 60 Hz supply.
    Hz60,
}

impl MainsFrequency {
    const fn code(self) -> u8 {
        match self {
            Self::Hz50 => 0x35,
            Self::Hz60 => 0x36,
        }
    }
}

/// One value per color channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb<T> {
    /// Red channel.
    pub red: T,
    /// Green channel.
    pub green: T,
    /// Blue channel.
    pub blue: T,
}

impl Rgb<u8> {
    fn from_bytes(buf: [u8; 3]) -> Self {
        Self {
            red: buf[0],
            green: buf[1],
            blue: buf[2],
        }
    }
}

/// HiTechnic color sensor V2.
///
/// # Example
///
/// ```rust
/// use nxt_drivers::devices::{ColorMode, ColorSensor};
/// use nxt_drivers::hal::MockBus;
///
/// let mut bus = MockBus::new();
/// let mut sensor = ColorSensor::new(&mut bus);
///
/// sensor.set_mode(ColorMode::Active).unwrap();
/// sensor.set_mode(ColorMode::Active).unwrap(); // cached, no bus traffic
/// assert_eq!(sensor.mode(), Some(ColorMode::Active));
/// assert_eq!(bus.transactions.len(), 1);
/// ```
#[derive(Debug)]
pub struct ColorSensor<L> {
    link: L,
    mode: Option<ColorMode>,
}

impl<B: I2cBus> ColorSensor<I2cLink<B>> {
    /// Sensor on a direct I2C port. The mode is unknown until first set.
    pub fn new(bus: B) -> Self {
        Self {
            link: I2cLink::new(bus, COLOR_ADDRESS),
            mode: None,
        }
    }

    /// Last mode successfully written, if any.
    pub fn mode(&self) -> Option<ColorMode> {
        self.mode
    }

    /// Switch the operating mode.
    ///
    /// Does nothing when `mode` is already cached. The cache only changes
    /// once the write succeeds.
    pub fn set_mode(&mut self, mode: ColorMode) -> Result<(), Error<B::Error>> {
        if self.mode == Some(mode) {
            return Ok(());
        }
        log::debug!("color: switching to {:?} mode", mode);
        self.link.write_command(COMMAND_REGISTER, mode.code())?;
        self.mode = Some(mode);
        Ok(())
    }

    /// Configure the mains filter. The operating mode is left as it is.
    pub fn set_mains_frequency(
        &mut self,
        frequency: MainsFrequency,
    ) -> Result<(), Error<B::Error>> {
        self.link.write_command(COMMAND_REGISTER, frequency.code())
    }

    /// Color number 0..=17, switching to active mode first.
    pub fn read_color(&mut self) -> Result<u8, Error<B::Error>> {
        self.set_mode(ColorMode::Active)?;
        self.read_u8(0)
    }

    /// Calibrated RGB, switching to active mode first.
    pub fn read_rgb(&mut self) -> Result<Rgb<u8>, Error<B::Error>> {
        self.set_mode(ColorMode::Active)?;
        self.read_rgb_at(1)
    }

    /// White level, switching to active mode first.
    pub fn read_white(&mut self) -> Result<u8, Error<B::Error>> {
        self.set_mode(ColorMode::Active)?;
        self.read_u8(4)
    }

    /// 6-bit color index (`rrggbb`), switching to active mode first.
    pub fn read_color_index(&mut self) -> Result<u8, Error<B::Error>> {
        self.set_mode(ColorMode::Active)?;
        self.read_u8(5)
    }

    /// Normalized RGB, switching to active mode first.
    pub fn read_normalized_rgb(&mut self) -> Result<Rgb<u8>, Error<B::Error>> {
        self.set_mode(ColorMode::Active)?;
        self.read_rgb_at(6)
    }

    /// Uncalibrated 16-bit RGB in passive (`true`) or raw (`false`) mode.
    pub fn read_raw_rgb(&mut self, passive: bool) -> Result<Rgb<u16>, Error<B::Error>> {
        self.set_mode(raw_mode(passive))?;
        let mut buf = [0u8; 8];
        self.link.read_data(0, &mut buf)?;
        Ok(Rgb {
            red: u16::from_be_bytes([buf[0], buf[1]]),
            green: u16::from_be_bytes([buf[2], buf[3]]),
            blue: u16::from_be_bytes([buf[4], buf[5]]),
        })
    }

    /// Uncalibrated 16-bit white level in passive (`true`) or raw (`false`) mode.
    pub fn read_raw_white(&mut self, passive: bool) -> Result<u16, Error<B::Error>> {
        self.set_mode(raw_mode(passive))?;
        let mut buf = [0u8; 2];
        self.link.read_data(6, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<M: SensorMux> ColorSensor<MuxLink<M>> {
    /// Sensor on a multiplexer channel.
    ///
    /// There is no mode management on this path; the sensor stays in the
    /// mode the multiplexer left it in.
    pub fn muxed(mux: M, channel: MuxChannel) -> Self {
        Self {
            link: MuxLink::new(mux, channel, MuxSensorType::ColorV2),
            mode: None,
        }
    }

    /// Color number 0..=17.
    pub fn read_color(&mut self) -> Result<u8, Error<M::Error>> {
        self.read_u8(0)
    }

    /// Calibrated RGB.
    pub fn read_rgb(&mut self) -> Result<Rgb<u8>, Error<M::Error>> {
        self.read_rgb_at(1)
    }
}

impl<L: SensorLink> ColorSensor<L> {
    /// Returns the link.
    pub fn release(self) -> L {
        self.link
    }

    fn read_u8(&mut self, offset: u8) -> Result<u8, Error<L::BusError>> {
        let mut buf = [0u8; 1];
        self.link.read_data(offset, &mut buf)?;
        Ok(buf[0])
    }

    fn read_rgb_at(&mut self, offset: u8) -> Result<Rgb<u8>, Error<L::BusError>> {
        let mut buf = [0u8; 3];
        self.link.read_data(offset, &mut buf)?;
        Ok(Rgb::from_bytes(buf))
    }
}

fn raw_mode(passive: bool) -> ColorMode {
    if passive {
        ColorMode::Passive
    } else {
        ColorMode::Raw
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::hal::{MockBus, MockMux, Transaction};

    #[test]
    fn first_mode_write_then_cached() {
        let mut bus = MockBus::new();
        let mut sensor = ColorSensor::new(&mut bus);
        assert_eq!(sensor.mode(), None);

        sensor.set_mode(ColorMode::Passive).unwrap();
        sensor.set_mode(ColorMode::Passive).unwrap();

        assert_eq!(bus.transactions, vec![Transaction::write(0x02, 0x41, &[0x01])]);
    }

    #[test]
    fn failed_mode_write_leaves_cache_unchanged() {
        let mut bus = MockBus::new();
        bus.fail_next(1);
        let mut sensor = ColorSensor::new(&mut bus);

        assert!(sensor.set_mode(ColorMode::Raw).is_err());
        assert_eq!(sensor.mode(), None);

        sensor.set_mode(ColorMode::Raw).unwrap();
        assert_eq!(sensor.mode(), Some(ColorMode::Raw));
        assert_eq!(bus.transactions.len(), 2);
    }

    #[test]
    fn active_reads_switch_mode_once() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[6]);
        bus.queue_reply(&[10, 20, 30]);
        let mut sensor = ColorSensor::new(&mut bus);

        assert_eq!(sensor.read_color().unwrap(), 6);
        assert_eq!(
            sensor.read_rgb().unwrap(),
            Rgb {
                red: 10,
                green: 20,
                blue: 30
            }
        );

        assert_eq!(
            bus.transactions,
            vec![
                Transaction::write(0x02, 0x41, &[0x00]),
                Transaction::write_read(0x02, 0x42, 1),
                Transaction::write_read(0x02, 0x43, 3),
            ]
        );
    }

    #[test]
    fn white_index_and_normalized_offsets() {
        let mut bus = MockBus::new();
        let mut sensor = ColorSensor::new(&mut bus);
        sensor.read_white().unwrap();
        sensor.read_color_index().unwrap();
        sensor.read_normalized_rgb().unwrap();

        assert_eq!(
            &bus.transactions[1..],
            &[
                Transaction::write_read(0x02, 0x46, 1),
                Transaction::write_read(0x02, 0x47, 1),
                Transaction::write_read(0x02, 0x48, 3),
            ]
        );
    }

    #[test]
    fn raw_rgb_is_big_endian_words() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[0x01, 0x00, 0x00, 0xFF, 0x12, 0x34, 0x00, 0x00]);
        let mut sensor = ColorSensor::new(&mut bus);

        let rgb = sensor.read_raw_rgb(false).unwrap();

        assert_eq!(
            rgb,
            Rgb {
                red: 0x0100,
                green: 0x00FF,
                blue: 0x1234
            }
        );
        assert_eq!(sensor.mode(), Some(ColorMode::Raw));
        assert_eq!(
            bus.transactions,
            vec![
                Transaction::write(0x02, 0x41, &[0x03]),
                Transaction::write_read(0x02, 0x42, 8),
            ]
        );
    }

    #[test]
    fn raw_white_reads_its_own_register() {
        let mut bus = MockBus::new();
        bus.queue_reply(&[0x02, 0x00]);
        let mut sensor = ColorSensor::new(&mut bus);

        assert_eq!(sensor.read_raw_white(true).unwrap(), 512);
        assert_eq!(
            bus.transactions,
            vec![
                Transaction::write(0x02, 0x41, &[0x01]),
                Transaction::write_read(0x02, 0x48, 2),
            ]
        );
    }

    #[test]
    fn mains_filter_keeps_mode() {
        let mut bus = MockBus::new();
        let mut sensor = ColorSensor::new(&mut bus);
        sensor.set_mode(ColorMode::Active).unwrap();
        sensor.set_mains_frequency(MainsFrequency::Hz50).unwrap();
        sensor.set_mains_frequency(MainsFrequency::Hz60).unwrap();
        assert_eq!(sensor.mode(), Some(ColorMode::Active));

        assert_eq!(
            bus.writes(),
            vec![
                &Transaction::write(0x02, 0x41, &[0x00]),
                &Transaction::write(0x02, 0x41, &[0x35]),
                &Transaction::write(0x02, 0x41, &[0x36]),
            ]
        );
    }

    #[test]
    fn muxed_reads_without_mode_writes() {
        let mut mux = MockMux::new();
        mux.attach(MuxChannel::C2, MuxSensorType::ColorV2);
        mux.queue_reply(&[3]);
        mux.queue_reply(&[1, 2, 3]);
        let mut sensor = ColorSensor::muxed(&mut mux, MuxChannel::C2);

        assert_eq!(sensor.read_color().unwrap(), 3);
        assert_eq!(sensor.read_rgb().unwrap().blue, 3);
        assert_eq!(mux.calls.len(), 4);
    }
}
