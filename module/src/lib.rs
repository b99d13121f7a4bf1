// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! The driver for one QSFP-class optical transceiver slot.
//!
//! A [`QsfpModule`] tracks the hardware signals of a single slot and owns
//! the cached identity, threshold, and transmit-disable state for whatever
//! module is currently inserted. An external presence-detection mechanism
//! feeds signal transitions in through [`QsfpModule::set_signal`]; the
//! driver reacts to edges by running the insertion handshake or
//! invalidating its caches. All hardware traffic goes through an
//! [`Access`] capability borrowed from the caller for the duration of each
//! operation.

pub mod config;
pub mod module;

pub use config::Config;
pub use config::ConfigBuilder;
pub use module::QsfpModule;
pub use module::Signal;
pub use module::State;
pub use qsfp_registers::Access;

use std::time::Duration;
use thiserror::Error;

/// An error from driving a transceiver module.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum Error {
    /// The bus transport failed. Propagated unchanged, never retried.
    #[error(transparent)]
    Register(#[from] qsfp_registers::Error),

    /// The module's readiness bit never cleared during the insertion
    /// handshake.
    ///
    /// A stuck module is a hardware condition requiring operator
    /// intervention, not a transient fault; this error is fatal for the
    /// handshake attempt, though a later presence assertion may retry it.
    #[error("module readiness bit did not clear within {0:?}")]
    ReadyTimeout(Duration),

    /// An operation that requires a valid module identity was invoked
    /// while the module is absent, timed out, or otherwise unread.
    #[error("operation requires a present module with a valid identity")]
    InvalidState,
}
