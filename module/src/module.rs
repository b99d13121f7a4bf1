// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! The per-slot transceiver module state machine.

use crate::Config;
use crate::Error;
use qsfp_decode::threshold::RX_POWER_SCALE;
use qsfp_decode::threshold::SUPPLY_VOLTAGE_SCALE;
use qsfp_decode::threshold::TEMPERATURE_SCALE;
use qsfp_decode::threshold::TX_BIAS_SCALE;
use qsfp_decode::Compliance;
use qsfp_decode::Eeprom;
use qsfp_decode::ExtendedCompliance;
use qsfp_decode::MonitorThresholds;
use qsfp_decode::QsfpThreshold;
use qsfp_registers::map;
use qsfp_registers::Access;
use slog::debug;
use slog::trace;
use slog::warn;
use slog::Logger;
use std::fmt;
use std::time::Instant;

// The identity image is exactly the upper memory region.
static_assertions::const_assert_eq!(Eeprom::LEN, map::UPPER_MEMORY_LEN);

/// A hardware signal associated with a transceiver slot.
///
/// The driver keeps one cached boolean per signal and detects edges by
/// comparing the cached value against each new one delivered through
/// [`QsfpModule::set_signal`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    /// The module-present pin of the slot.
    ModulePresent,
    /// The module's interrupt line.
    InterruptStatus,
    /// The low-power-mode pin.
    LowPowerMode,
    /// The module reset line.
    ResetActive,
}

impl Signal {
    /// The number of signal variants, for sizing the value cache.
    pub const COUNT: usize = 4;

    const fn index(self) -> usize {
        self as usize
    }
}

/// The lifecycle state of a transceiver slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// No module is inserted, or its identity has been invalidated.
    Absent,
    /// A module is inserted and its identity has been read.
    Ready,
    /// A module asserted presence but never became ready to read.
    TimedOut,
}

/// The driver for one transceiver slot.
///
/// A `QsfpModule` is constructed once per physical slot and lives for the
/// process lifetime; its cached state is cleared and repopulated as
/// modules are hot-plugged. It never owns the bus: every operation borrows
/// an [`Access`] capability from the caller. A single `QsfpModule` is not
/// safe for concurrent use; drive it from one thread or add external
/// synchronization.
pub struct QsfpModule {
    state: State,
    eeprom: Option<Eeprom>,
    thresholds: Option<MonitorThresholds>,
    signals: [bool; Signal::COUNT],
    tx_disable: u8,
    config: Config,
    log: Logger,
    interrupt_handler: Option<Box<dyn FnMut() + Send>>,
}

impl fmt::Debug for QsfpModule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("QsfpModule")
            .field("state", &self.state)
            .field("eeprom", &self.eeprom)
            .field("thresholds", &self.thresholds)
            .field("signals", &self.signals)
            .field("tx_disable", &self.tx_disable)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QsfpModule {
    /// Create a driver for one slot. All signals start deasserted and the
    /// slot starts [`State::Absent`].
    pub fn new(config: Config, log: Logger) -> Self {
        Self {
            state: State::Absent,
            eeprom: None,
            thresholds: None,
            signals: [false; Signal::COUNT],
            tx_disable: 0,
            config,
            log,
            interrupt_handler: None,
        }
    }

    /// The current lifecycle state of the slot.
    pub fn state(&self) -> State {
        self.state
    }

    /// Return the cached value of a signal.
    pub fn get_signal(&self, signal: Signal) -> bool {
        self.signals[signal.index()]
    }

    /// Register a callback invoked on each rising edge of
    /// [`Signal::InterruptStatus`].
    pub fn set_interrupt_handler(&mut self, handler: impl FnMut() + Send + 'static) {
        self.interrupt_handler = Some(Box::new(handler));
    }

    /// Deliver a new value for a signal, returning the prior value.
    ///
    /// Delivering the value a signal already holds has no side effect and
    /// performs no hardware I/O. On a change of [`Signal::ModulePresent`]
    /// the insertion handshake or cache invalidation runs; on a rising
    /// edge of [`Signal::InterruptStatus`] the registered interrupt
    /// handler is invoked. Other signals are cached only.
    pub fn set_signal(
        &mut self,
        access: &mut dyn Access,
        signal: Signal,
        value: bool,
    ) -> Result<bool, Error> {
        let old = self.signals[signal.index()];
        self.signals[signal.index()] = value;
        if old != value {
            match signal {
                Signal::ModulePresent => self.present(access, value)?,
                Signal::InterruptStatus if value => self.interrupt(),
                _ => {}
            }
        }
        Ok(old)
    }

    /// Drive the slot's reset line through the capability and record the
    /// signal state.
    pub fn set_reset(&mut self, access: &mut dyn Access, active: bool) -> Result<bool, Error> {
        access.reset_active(active)?;
        self.set_signal(access, Signal::ResetActive, active)
    }

    /// Drive the slot's low-power-mode pin through the capability and
    /// record the signal state.
    pub fn set_low_power_mode(
        &mut self,
        access: &mut dyn Access,
        enable: bool,
    ) -> Result<bool, Error> {
        access.set_low_power_mode(enable)?;
        self.set_signal(access, Signal::LowPowerMode, enable)
    }

    /// Enable or disable transmit lanes.
    ///
    /// Bits of `lane_mask` select which of the 4 lanes to update; bits of
    /// `enable_mask` give the new state for the selected lanes (set bit =
    /// transmit enabled). Returns the disable mask in effect before this
    /// call. The hardware register is written only when the computed mask
    /// actually changes.
    pub fn tx_enable(
        &mut self,
        access: &mut dyn Access,
        enable_mask: u8,
        lane_mask: u8,
    ) -> Result<u8, Error> {
        let was = self.tx_disable;
        let now = map::TX_DISABLE_LANE_MASK & ((was & !lane_mask) | !enable_mask);
        if now != was {
            map::TX_DISABLE.set(access, now)?;
            self.tx_disable = now;
            debug!(
                self.log,
                "updated tx disable mask";
                "was" => format!("{was:#06b}"),
                "now" => format!("{now:#06b}")
            );
        }
        Ok(was)
    }

    /// Return the decoded identity of the inserted module.
    ///
    /// Fails with [`Error::InvalidState`] unless the slot is
    /// [`State::Ready`]; stale identity data is never returned.
    pub fn eeprom(&self) -> Result<&Eeprom, Error> {
        match (self.state, self.eeprom.as_ref()) {
            (State::Ready, Some(eeprom)) => Ok(eeprom),
            _ => Err(Error::InvalidState),
        }
    }

    /// Return the compliance flag set and extended compliance code of the
    /// inserted module.
    pub fn compliance(&self) -> Result<(Compliance, ExtendedCompliance), Error> {
        self.eeprom().map(Eeprom::compliance)
    }

    /// Return the module's alarm/warning thresholds.
    ///
    /// Fails with [`Error::InvalidState`] unless the slot is
    /// [`State::Ready`] and threshold decoding was enabled in the
    /// [`Config`].
    pub fn thresholds(&self) -> Result<&MonitorThresholds, Error> {
        if self.state != State::Ready {
            return Err(Error::InvalidState);
        }
        self.thresholds.as_ref().ok_or(Error::InvalidState)
    }

    // React to a change of the module-present signal.
    fn present(&mut self, access: &mut dyn Access, is_present: bool) -> Result<(), Error> {
        if !is_present {
            debug!(self.log, "module removed; invalidating cached state");
            self.invalidate();
            return Ok(());
        }

        // Any previously cached identity is for a module that is gone.
        self.eeprom = None;
        self.thresholds = None;

        self.wait_ready(access)?;

        // The identity data lives on page 0. Leave the selector alone if
        // it is already there.
        if map::PAGE_SELECT.get(access)? != map::IDENTITY_PAGE {
            map::PAGE_SELECT.set(access, map::IDENTITY_PAGE)?;
        }

        let mut raw = [0u8; Eeprom::LEN];
        for (i, chunk) in raw.chunks_exact_mut(2).enumerate() {
            let word = map::upper_word(i).get(access)?;
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        let eeprom = Eeprom::decode(&raw);
        debug!(
            self.log,
            "read module identity";
            "identifier" => %eeprom.identifier,
            "vendor" => %eeprom.vendor
        );
        self.eeprom = Some(eeprom);

        // Select the operating page so all subsequent traffic lands there
        // by default.
        map::PAGE_SELECT.set(access, map::OPERATING_PAGE)?;

        if self.config.read_thresholds {
            let thresholds = self.read_thresholds(access)?;
            trace!(self.log, "decoded monitor thresholds"; "thresholds" => ?thresholds);
            self.thresholds = Some(thresholds);
        }

        self.state = State::Ready;
        Ok(())
    }

    // Poll the data-not-ready bit until it clears or the deadline expires.
    fn wait_ready(&mut self, access: &mut dyn Access) -> Result<(), Error> {
        let start = Instant::now();
        loop {
            let status = map::STATUS.get(access)?;
            if status & map::STATUS_DATA_NOT_READY == 0 {
                trace!(self.log, "module ready"; "elapsed" => ?start.elapsed());
                return Ok(());
            }
            if start.elapsed() >= self.config.ready_timeout {
                warn!(
                    self.log,
                    "module readiness bit did not clear; giving up";
                    "timeout" => ?self.config.ready_timeout
                );
                self.state = State::TimedOut;
                return Err(Error::ReadyTimeout(self.config.ready_timeout));
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }

    // Read the four threshold quadruples from the operating page, which
    // must already be selected.
    fn read_thresholds(&self, access: &mut dyn Access) -> Result<MonitorThresholds, Error> {
        let regs = map::TEMPERATURE_THRESHOLDS;
        let temperature = QsfpThreshold::from_words(
            regs.alarm_hi.get(access)?,
            regs.alarm_lo.get(access)?,
            regs.warning_hi.get(access)?,
            regs.warning_lo.get(access)?,
            TEMPERATURE_SCALE,
        );
        let regs = map::SUPPLY_VOLTAGE_THRESHOLDS;
        let supply_voltage = QsfpThreshold::from_words(
            regs.alarm_hi.get(access)?,
            regs.alarm_lo.get(access)?,
            regs.warning_hi.get(access)?,
            regs.warning_lo.get(access)?,
            SUPPLY_VOLTAGE_SCALE,
        );
        let regs = map::RX_POWER_THRESHOLDS;
        let rx_power = QsfpThreshold::from_words(
            regs.alarm_hi.get(access)?,
            regs.alarm_lo.get(access)?,
            regs.warning_hi.get(access)?,
            regs.warning_lo.get(access)?,
            RX_POWER_SCALE,
        );
        let regs = map::TX_BIAS_THRESHOLDS;
        let tx_bias = QsfpThreshold::from_words(
            regs.alarm_hi.get(access)?,
            regs.alarm_lo.get(access)?,
            regs.warning_hi.get(access)?,
            regs.warning_lo.get(access)?,
            TX_BIAS_SCALE,
        );
        Ok(MonitorThresholds {
            temperature,
            supply_voltage,
            rx_power,
            tx_bias,
        })
    }

    // Drop all cached per-module state. No hardware I/O.
    fn invalidate(&mut self) {
        self.eeprom = None;
        self.thresholds = None;
        self.tx_disable = 0;
        self.state = State::Absent;
    }

    // A rising interrupt edge was delivered.
    fn interrupt(&mut self) {
        if let Some(handler) = self.interrupt_handler.as_mut() {
            handler();
        } else {
            debug!(self.log, "module interrupt asserted");
        }
    }
}
