// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! The SFF-8024 identifier reported in a module's identity byte.

use std::fmt;

/// The SFF-8024 identifier for a transceiver module.
///
/// This is the main description of the kind of module, read from the first
/// byte of the identity page. Codes beyond the named set are carried
/// through as [`Identifier::Reserved`] or [`Identifier::VendorSpecific`] so
/// that they round-trip and render predictably.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
#[cfg_attr(any(feature = "api-traits", test), serde(rename_all = "snake_case"))]
pub enum Identifier {
    Unknown,
    Gbic,
    Soldered,
    Sfp,
    Xbi,
    Xenpak,
    Xfp,
    Xff,
    XfpE,
    Xpak,
    X2,
    DwdmSfp,
    Qsfp,
    QsfpPlus,
    Cxp,
    ShieldedMultiLane4,
    ShieldedMultiLane8,
    Qsfp28,
    Cxp2,
    Cdfp,
    ShieldedMultiLane4Fanout,
    ShieldedMultiLane8Fanout,
    Cdfp3,
    MicroQsfp,
    QsfpDD,
    Reserved(u8),
    VendorSpecific(u8),
}

impl From<u8> for Identifier {
    fn from(x: u8) -> Self {
        use Identifier::*;
        match x {
            0x00 => Unknown,
            0x01 => Gbic,
            0x02 => Soldered,
            0x03 => Sfp,
            0x04 => Xbi,
            0x05 => Xenpak,
            0x06 => Xfp,
            0x07 => Xff,
            0x08 => XfpE,
            0x09 => Xpak,
            0x0a => X2,
            0x0b => DwdmSfp,
            0x0c => Qsfp,
            0x0d => QsfpPlus,
            0x0e => Cxp,
            0x0f => ShieldedMultiLane4,
            0x10 => ShieldedMultiLane8,
            0x11 => Qsfp28,
            0x12 => Cxp2,
            0x13 => Cdfp,
            0x14 => ShieldedMultiLane4Fanout,
            0x15 => ShieldedMultiLane8Fanout,
            0x16 => Cdfp3,
            0x17 => MicroQsfp,
            0x18 => QsfpDD,
            0x19..=0x7f => Reserved(x),
            0x80.. => VendorSpecific(x),
        }
    }
}

impl From<Identifier> for u8 {
    fn from(id: Identifier) -> Self {
        use Identifier::*;
        match id {
            Unknown => 0x00,
            Gbic => 0x01,
            Soldered => 0x02,
            Sfp => 0x03,
            Xbi => 0x04,
            Xenpak => 0x05,
            Xfp => 0x06,
            Xff => 0x07,
            XfpE => 0x08,
            Xpak => 0x09,
            X2 => 0x0a,
            DwdmSfp => 0x0b,
            Qsfp => 0x0c,
            QsfpPlus => 0x0d,
            Cxp => 0x0e,
            ShieldedMultiLane4 => 0x0f,
            ShieldedMultiLane8 => 0x10,
            Qsfp28 => 0x11,
            Cxp2 => 0x12,
            Cdfp => 0x13,
            ShieldedMultiLane4Fanout => 0x14,
            ShieldedMultiLane8Fanout => 0x15,
            Cdfp3 => 0x16,
            MicroQsfp => 0x17,
            QsfpDD => 0x18,
            Reserved(x) | VendorSpecific(x) => x,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Identifier::*;
        write!(
            f,
            "{}",
            match self {
                Unknown => "Unknown or unspecified",
                Gbic => "GBIC",
                Soldered => "Module/connector soldered to motherboard",
                Sfp => "SFP/SFP+/SFP28",
                Xbi => "300 pin XBI",
                Xenpak => "XENPAK",
                Xfp => "XFP",
                Xff => "XFF",
                XfpE => "XFP-E",
                Xpak => "XPAK",
                X2 => "X2",
                DwdmSfp => "DWDM-SFP/SFP+",
                Qsfp => "QSFP",
                QsfpPlus => "QSFP+",
                Cxp => "CXP",
                ShieldedMultiLane4 => "Shielded Mini Multilane HD 4X",
                ShieldedMultiLane8 => "Shielded Mini Multilane HD 8X",
                Qsfp28 => "QSFP28",
                Cxp2 => "CXP2/CXP28",
                Cdfp => "CDFP (Style 1/Style 2)",
                ShieldedMultiLane4Fanout => "Shielded Mini Multilane HD 4X Fanout Cable",
                ShieldedMultiLane8Fanout => "Shielded Mini Multilane HD 8X Fanout Cable",
                Cdfp3 => "CDFP (Style 3)",
                MicroQsfp => "Micro QSFP",
                QsfpDD => "QSFP-DD",
                Reserved(_) => "Reserved",
                VendorSpecific(_) => "Vendor Specific",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Identifier;

    #[test]
    fn test_identifier_round_trip() {
        for code in 0..=u8::MAX {
            let id = Identifier::from(code);
            assert_eq!(u8::from(id), code);
        }
    }

    #[test]
    fn test_identifier_unnamed_codes() {
        assert_eq!(Identifier::from(0x19), Identifier::Reserved(0x19));
        assert_eq!(Identifier::from(0x7f), Identifier::Reserved(0x7f));
        assert_eq!(Identifier::from(0x80), Identifier::VendorSpecific(0x80));
        assert_eq!(Identifier::from(0xff), Identifier::VendorSpecific(0xff));
        assert_eq!(Identifier::Reserved(0x19).to_string(), "Reserved");
        assert_eq!(
            Identifier::VendorSpecific(0xff).to_string(),
            "Vendor Specific"
        );
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::Qsfp28.to_string(), "QSFP28");
        assert_eq!(Identifier::QsfpDD.to_string(), "QSFP-DD");
        assert_eq!(u8::from(Identifier::QsfpDD), 0x18);
    }
}
