// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! Decode the identity data and classification codes of QSFP-class optical
//! transceiver modules.
//!
//! Everything in this crate operates on bytes already read from a module;
//! no hardware access happens here. Decoding is total: unknown or reserved
//! codes always map to a defined variant with a stable display name, never
//! to an error. The only fallible conversion is building an [`Eeprom`] from
//! a slice of the wrong length.

pub mod compliance;
pub mod connector;
pub mod eeprom;
pub mod ident;
pub mod threshold;

pub use compliance::Compliance;
pub use compliance::ExtendedCompliance;
pub use connector::ConnectorType;
pub use eeprom::Eeprom;
pub use eeprom::Vendor;
pub use ident::Identifier;
pub use threshold::MonitorThresholds;
pub use threshold::QsfpThreshold;
pub use threshold::ThresholdRange;

use thiserror::Error;

/// An error related to decoding a module's identity data.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum Error {
    /// An identity image of the wrong size was provided.
    #[error("expected a {expected}-byte identity image, found {actual} bytes")]
    WrongImageSize { expected: usize, actual: usize },
}
