// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! Typed register access for QSFP-class optical transceiver modules.
//!
//! A module's 256-byte memory map is reached through an [`Access`]
//! capability, which moves raw bytes to and from the device at a numeric
//! offset. The descriptors in this crate ([`Reg8`], [`Reg16`], [`RegI16`])
//! pin down the offset and width of each register and handle the big-endian
//! encoding of multi-byte values, so that no caller ever computes a raw
//! address. The [`map`] module collects the SFF-8636 offsets the driver
//! actually touches.

use thiserror::Error;

/// An error raised by the bus transport underneath an [`Access`]
/// implementation.
///
/// These are never retried at this layer; they propagate unchanged to the
/// caller.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum Error {
    /// The transport failed to move any bytes for this transaction.
    #[error("bus transfer failed at offset {offset:#05x} (len {len}, write {write})")]
    Transport { offset: u16, len: usize, write: bool },

    /// The transport moved fewer bytes than requested.
    ///
    /// A short transfer must be reported, never silently truncated.
    #[error("short bus transfer at offset {offset:#05x}: {transferred} of {len} bytes")]
    PartialTransfer {
        offset: u16,
        len: usize,
        transferred: usize,
    },
}

/// The capability used to reach a transceiver module's hardware.
///
/// Implementations provide the physical transport (I2C behind a mux, a
/// simulator, a test stub); the driver core only consumes this trait. Every
/// call is synchronous and either succeeds completely or fails with an
/// [`Error`].
pub trait Access {
    /// Assert or deassert the module's reset line.
    fn reset_active(&mut self, active: bool) -> Result<(), Error>;

    /// Enable or disable the module's low-power mode pin.
    fn set_low_power_mode(&mut self, enable: bool) -> Result<(), Error>;

    /// Transfer `buf.len()` bytes at `offset` within the module's memory
    /// map.
    ///
    /// With `is_write == false` the buffer is filled from the device; with
    /// `is_write == true` the buffer is written to it.
    fn read_write(&mut self, offset: u16, buf: &mut [u8], is_write: bool) -> Result<(), Error>;
}

/// A single 8-bit register at a fixed offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reg8 {
    offset: u16,
}

impl Reg8 {
    pub const fn new(offset: u16) -> Self {
        Self { offset }
    }

    pub const fn offset(&self) -> u16 {
        self.offset
    }

    /// Read the register through `access`.
    pub fn get(&self, access: &mut dyn Access) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        access.read_write(self.offset, &mut buf, false)?;
        Ok(buf[0])
    }

    /// Write `value` to the register through `access`.
    pub fn set(&self, access: &mut dyn Access, value: u8) -> Result<(), Error> {
        let mut buf = [value];
        access.read_write(self.offset, &mut buf, true)
    }
}

/// An unsigned 16-bit register at a fixed offset, transferred big-endian.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reg16 {
    offset: u16,
}

impl Reg16 {
    pub const fn new(offset: u16) -> Self {
        Self { offset }
    }

    pub const fn offset(&self) -> u16 {
        self.offset
    }

    /// Read the register through `access`, high byte first.
    pub fn get(&self, access: &mut dyn Access) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        access.read_write(self.offset, &mut buf, false)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write `value` to the register through `access`, high byte first.
    pub fn set(&self, access: &mut dyn Access, value: u16) -> Result<(), Error> {
        let mut buf = value.to_be_bytes();
        access.read_write(self.offset, &mut buf, true)
    }
}

/// A signed 16-bit register at a fixed offset.
///
/// The wire format is identical to [`Reg16`]; the value is the
/// two's-complement reinterpretation of the unsigned word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegI16 {
    inner: Reg16,
}

impl RegI16 {
    pub const fn new(offset: u16) -> Self {
        Self {
            inner: Reg16::new(offset),
        }
    }

    pub const fn offset(&self) -> u16 {
        self.inner.offset()
    }

    pub fn get(&self, access: &mut dyn Access) -> Result<i16, Error> {
        self.inner.get(access).map(|v| v as i16)
    }

    pub fn set(&self, access: &mut dyn Access, value: i16) -> Result<(), Error> {
        self.inner.set(access, value as u16)
    }
}

/// The SFF-8636 register offsets used by the driver.
///
/// Offsets 0-127 address the fixed lower page; offsets 128-255 address
/// whichever upper page is currently selected through [`PAGE_SELECT`].
pub mod map {
    use super::Reg16;
    use super::Reg8;
    use super::RegI16;

    /// Module status byte (lower page, byte 2).
    pub const STATUS: Reg8 = Reg8::new(2);

    /// Bit of [`STATUS`] that is set while the module's memory map is not
    /// yet ready to be read after insertion or reset.
    pub const STATUS_DATA_NOT_READY: u8 = 1 << 0;

    /// Per-lane transmitter disable (lower page, byte 86). Bits [3:0]
    /// correspond to lanes 1-4; a set bit disables the lane.
    pub const TX_DISABLE: Reg8 = Reg8::new(86);

    /// Only 4 lanes exist; the upper bits of [`TX_DISABLE`] are reserved.
    pub const TX_DISABLE_LANE_MASK: u8 = 0x0f;

    /// Upper-memory page select (lower page, byte 127).
    pub const PAGE_SELECT: Reg8 = Reg8::new(127);

    /// The upper page holding the static identity/EEPROM data.
    pub const IDENTITY_PAGE: u8 = 0;

    /// The upper page selected once the identity has been read, holding
    /// thresholds and channel controls. All later traffic defaults here.
    pub const OPERATING_PAGE: u8 = 3;

    /// First byte of the upper memory region.
    pub const UPPER_MEMORY_START: u16 = 128;

    /// Size of the upper memory region, in bytes and in 16-bit words.
    pub const UPPER_MEMORY_LEN: usize = 128;
    pub const UPPER_MEMORY_WORDS: usize = UPPER_MEMORY_LEN / 2;

    /// The `index`-th big-endian word of the upper memory region.
    pub const fn upper_word(index: usize) -> Reg16 {
        Reg16::new(UPPER_MEMORY_START + 2 * index as u16)
    }

    /// One alarm/warning threshold quadruple on the operating page.
    ///
    /// See SFF-8636 rev 2.10a Table 6-28. Each measurement kind occupies
    /// four consecutive 16-bit registers: alarm high, alarm low, warning
    /// high, warning low.
    #[derive(Clone, Copy, Debug)]
    pub struct ThresholdRegs<R> {
        pub alarm_hi: R,
        pub alarm_lo: R,
        pub warning_hi: R,
        pub warning_lo: R,
    }

    /// Temperature thresholds (page 3, bytes 128-135). Signed.
    pub const TEMPERATURE_THRESHOLDS: ThresholdRegs<RegI16> = ThresholdRegs {
        alarm_hi: RegI16::new(128),
        alarm_lo: RegI16::new(130),
        warning_hi: RegI16::new(132),
        warning_lo: RegI16::new(134),
    };

    /// Supply voltage thresholds (page 3, bytes 144-151).
    pub const SUPPLY_VOLTAGE_THRESHOLDS: ThresholdRegs<Reg16> = ThresholdRegs {
        alarm_hi: Reg16::new(144),
        alarm_lo: Reg16::new(146),
        warning_hi: Reg16::new(148),
        warning_lo: Reg16::new(150),
    };

    /// Receiver optical power thresholds (page 3, bytes 176-183).
    pub const RX_POWER_THRESHOLDS: ThresholdRegs<Reg16> = ThresholdRegs {
        alarm_hi: Reg16::new(176),
        alarm_lo: Reg16::new(178),
        warning_hi: Reg16::new(180),
        warning_lo: Reg16::new(182),
    };

    /// Transmitter bias current thresholds (page 3, bytes 184-191).
    pub const TX_BIAS_THRESHOLDS: ThresholdRegs<Reg16> = ThresholdRegs {
        alarm_hi: Reg16::new(184),
        alarm_lo: Reg16::new(186),
        warning_hi: Reg16::new(188),
        warning_lo: Reg16::new(190),
    };

    // Sanity checks on the map layout.
    static_assertions::const_assert_eq!(UPPER_MEMORY_WORDS * 2, UPPER_MEMORY_LEN);
    static_assertions::const_assert!(UPPER_MEMORY_START as usize + UPPER_MEMORY_LEN <= 256);
    static_assertions::const_assert!(PAGE_SELECT.offset() < UPPER_MEMORY_START);
    static_assertions::const_assert_eq!(
        TX_BIAS_THRESHOLDS.alarm_hi.offset(),
        RX_POWER_THRESHOLDS.warning_lo.offset() + 2,
    );
}

#[cfg(test)]
mod tests {
    use super::map;
    use super::Access;
    use super::Error;
    use super::Reg16;
    use super::Reg8;
    use super::RegI16;

    // A loopback stub backed by a flat 256-byte memory.
    struct Loopback {
        mem: [u8; 256],
    }

    impl Loopback {
        fn new() -> Self {
            Self { mem: [0; 256] }
        }
    }

    impl Access for Loopback {
        fn reset_active(&mut self, _active: bool) -> Result<(), Error> {
            Ok(())
        }

        fn set_low_power_mode(&mut self, _enable: bool) -> Result<(), Error> {
            Ok(())
        }

        fn read_write(&mut self, offset: u16, buf: &mut [u8], is_write: bool) -> Result<(), Error> {
            let start = usize::from(offset);
            let end = start + buf.len();
            assert!(end <= self.mem.len());
            if is_write {
                self.mem[start..end].copy_from_slice(buf);
            } else {
                buf.copy_from_slice(&self.mem[start..end]);
            }
            Ok(())
        }
    }

    // A stub whose transport always fails.
    struct Broken;

    impl Access for Broken {
        fn reset_active(&mut self, _active: bool) -> Result<(), Error> {
            Ok(())
        }

        fn set_low_power_mode(&mut self, _enable: bool) -> Result<(), Error> {
            Ok(())
        }

        fn read_write(&mut self, offset: u16, buf: &mut [u8], is_write: bool) -> Result<(), Error> {
            Err(Error::Transport {
                offset,
                len: buf.len(),
                write: is_write,
            })
        }
    }

    #[test]
    fn test_reg8_round_trip() {
        let mut access = Loopback::new();
        let reg = Reg8::new(0x10);
        reg.set(&mut access, 0xa5).unwrap();
        assert_eq!(reg.get(&mut access).unwrap(), 0xa5);
    }

    #[test]
    fn test_reg16_round_trip_big_endian() {
        let mut access = Loopback::new();
        let reg = Reg16::new(0x20);
        reg.set(&mut access, 0x1234).unwrap();
        assert_eq!(reg.get(&mut access).unwrap(), 0x1234);

        // High byte lands at the lower offset.
        assert_eq!(access.mem[0x20], 0x12);
        assert_eq!(access.mem[0x21], 0x34);
    }

    #[test]
    fn test_regi16_round_trip() {
        let mut access = Loopback::new();
        let reg = RegI16::new(0x30);
        for value in [-1i16, i16::MIN, i16::MAX, 0, -256] {
            reg.set(&mut access, value).unwrap();
            assert_eq!(reg.get(&mut access).unwrap(), value);
        }

        // -1 is all-ones on the wire.
        reg.set(&mut access, -1).unwrap();
        assert_eq!(access.mem[0x30], 0xff);
        assert_eq!(access.mem[0x31], 0xff);
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut access = Broken;
        let err = map::STATUS.get(&mut access).unwrap_err();
        assert_eq!(
            err,
            Error::Transport {
                offset: map::STATUS.offset(),
                len: 1,
                write: false,
            }
        );
    }

    #[test]
    fn test_upper_word_offsets() {
        assert_eq!(map::upper_word(0).offset(), 128);
        assert_eq!(map::upper_word(1).offset(), 130);
        assert_eq!(
            map::upper_word(map::UPPER_MEMORY_WORDS - 1).offset(),
            254
        );
    }
}
