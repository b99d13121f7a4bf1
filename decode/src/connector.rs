// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! The SFF-8024 connector type advertised by a module.

use std::fmt;

/// The connector type reported in a module's identity page.
///
/// The code space is sparse: one cluster of optical and copper connector
/// codes at 0x00-0x0D and a second at 0x20-0x24. Everything in between and
/// beyond is carried through as [`ConnectorType::Reserved`].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
#[cfg_attr(any(feature = "api-traits", test), serde(rename_all = "snake_case"))]
pub enum ConnectorType {
    Unknown,
    Subscriber,
    FibreChannelStyle1,
    FibreChannelStyle2,
    BncTnc,
    FibreChannelCoax,
    FiberJack,
    Lucent,
    MtRj,
    Mu,
    Sg,
    OpticalPigtail,
    Mpo1x12,
    Mpo2x16,
    Hssdc2,
    CopperPigtail,
    Rj45,
    NoSeparableConnector,
    Mxc2x16,
    Reserved(u8),
}

impl From<u8> for ConnectorType {
    fn from(x: u8) -> Self {
        use ConnectorType::*;
        match x {
            0x00 => Unknown,
            0x01 => Subscriber,
            0x02 => FibreChannelStyle1,
            0x03 => FibreChannelStyle2,
            0x04 => BncTnc,
            0x05 => FibreChannelCoax,
            0x06 => FiberJack,
            0x07 => Lucent,
            0x08 => MtRj,
            0x09 => Mu,
            0x0a => Sg,
            0x0b => OpticalPigtail,
            0x0c => Mpo1x12,
            0x0d => Mpo2x16,
            0x20 => Hssdc2,
            0x21 => CopperPigtail,
            0x22 => Rj45,
            0x23 => NoSeparableConnector,
            0x24 => Mxc2x16,
            _ => Reserved(x),
        }
    }
}

impl From<ConnectorType> for u8 {
    fn from(c: ConnectorType) -> Self {
        use ConnectorType::*;
        match c {
            Unknown => 0x00,
            Subscriber => 0x01,
            FibreChannelStyle1 => 0x02,
            FibreChannelStyle2 => 0x03,
            BncTnc => 0x04,
            FibreChannelCoax => 0x05,
            FiberJack => 0x06,
            Lucent => 0x07,
            MtRj => 0x08,
            Mu => 0x09,
            Sg => 0x0a,
            OpticalPigtail => 0x0b,
            Mpo1x12 => 0x0c,
            Mpo2x16 => 0x0d,
            Hssdc2 => 0x20,
            CopperPigtail => 0x21,
            Rj45 => 0x22,
            NoSeparableConnector => 0x23,
            Mxc2x16 => 0x24,
            Reserved(x) => x,
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ConnectorType::*;
        write!(
            f,
            "{}",
            match self {
                Unknown => "Unknown or unspecified",
                Subscriber => "SC (Subscriber Connector)",
                FibreChannelStyle1 => "Fibre Channel Style 1 copper connector",
                FibreChannelStyle2 => "Fibre Channel Style 2 copper connector",
                BncTnc => "BNC/TNC (Bayonet/Threaded Neill-Concelman)",
                FibreChannelCoax => "Fibre Channel coax headers",
                FiberJack => "Fiber Jack",
                Lucent => "LC (Lucent Connector)",
                MtRj => "MT-RJ (Mechanical Transfer - Registered Jack)",
                Mu => "MU (Multiple Optical)",
                Sg => "SG",
                OpticalPigtail => "Optical Pigtail",
                Mpo1x12 => "MPO 1x12 (Multifiber Parallel Optic)",
                Mpo2x16 => "MPO 2x16",
                Hssdc2 => "HSSDC II (High Speed Serial Data Connector)",
                CopperPigtail => "Copper pigtail",
                Rj45 => "RJ45 (Registered Jack)",
                NoSeparableConnector => "No separable connector",
                Mxc2x16 => "MXC 2x16",
                Reserved(_) => "Reserved",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectorType;

    #[test]
    fn test_connector_round_trip() {
        for code in 0..=u8::MAX {
            let connector = ConnectorType::from(code);
            assert_eq!(u8::from(connector), code);
        }
    }

    #[test]
    fn test_connector_gap_is_reserved() {
        // The gap between the two named clusters.
        for code in 0x0e..=0x1f {
            assert_eq!(ConnectorType::from(code), ConnectorType::Reserved(code));
            assert_eq!(ConnectorType::from(code).to_string(), "Reserved");
        }
        assert_eq!(ConnectorType::from(0x25), ConnectorType::Reserved(0x25));
    }

    #[test]
    fn test_connector_display() {
        assert_eq!(
            ConnectorType::Mpo1x12.to_string(),
            "MPO 1x12 (Multifiber Parallel Optic)"
        );
        assert_eq!(ConnectorType::Lucent.to_string(), "LC (Lucent Connector)");
    }
}
