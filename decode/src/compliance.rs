// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! Link-standard compliance codes advertised in a module's identity page.

use std::fmt;

bitflags::bitflags! {
    /// The Ethernet compliance flags from the first specification
    /// compliance byte.
    ///
    /// Each set bit declares support for one link standard. Bit 7 does not
    /// name a standard itself; it declares that the separate extended
    /// compliance byte is meaningful. See [`ExtendedCompliance`].
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Compliance: u8 {
        const ETH_40G_XLPPI = 1 << 0;
        const ETH_40G_LR = 1 << 1;
        const ETH_40G_SR = 1 << 2;
        const ETH_40G_CR = 1 << 3;
        const ETH_10G_SR = 1 << 4;
        const ETH_10G_LR = 1 << 5;
        const ETH_10G_LRM = 1 << 6;
        const EXTENDED_VALID = 1 << 7;
    }
}

impl Compliance {
    const NAMES: [(Compliance, &'static str); 8] = [
        (Compliance::ETH_40G_XLPPI, "40G XLPPI"),
        (Compliance::ETH_40G_LR, "40G LR"),
        (Compliance::ETH_40G_SR, "40G SR"),
        (Compliance::ETH_40G_CR, "40G CR"),
        (Compliance::ETH_10G_SR, "10G SR"),
        (Compliance::ETH_10G_LR, "10G LR"),
        (Compliance::ETH_10G_LRM, "10G LRM"),
        (Compliance::EXTENDED_VALID, "extended"),
    ];
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut sep = "";
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                write!(f, "{sep}{name}")?;
                sep = ", ";
            }
        }
        Ok(())
    }
}

/// The extended compliance code from the identity page.
///
/// This single-byte code covers the finer-grained and newer link standards
/// that do not fit in the [`Compliance`] flag byte. It is meaningful only
/// when [`Compliance::EXTENDED_VALID`] is set; callers should obtain it
/// through [`crate::Eeprom::compliance`], which applies that gate.
///
/// Several codes in the middle of the space are explicitly reserved or
/// obsolete; those decode to [`ExtendedCompliance::Reserved`] rather than
/// being absorbed into a neighboring name.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
#[cfg_attr(any(feature = "api-traits", test), serde(rename_all = "snake_case"))]
pub enum ExtendedCompliance {
    Unspecified,
    Aoc100GBer5e5,
    Base100GSr4,
    Base100GLr4,
    Base100GEr4,
    Base100GSr10,
    Cwdm4100G,
    Psm4100G,
    Acc100GBer5e5,
    Base100GCr4,
    Base25GCrCaS,
    Base25GCrCaN,
    Base40GEr4,
    X4Base10GSr,
    Base40GPsm4,
    G959P1I12D1,
    G959P1S12D2,
    G959P1L12D2,
    Base10GTSfi,
    Clr4100G,
    Aoc100GBer1e12,
    Acc100GBer1e12,
    Dwdm2100Ge,
    Reserved(u8),
}

impl From<u8> for ExtendedCompliance {
    fn from(x: u8) -> Self {
        use ExtendedCompliance::*;
        match x {
            0x00 => Unspecified,
            0x01 => Aoc100GBer5e5,
            0x02 => Base100GSr4,
            0x03 => Base100GLr4,
            0x04 => Base100GEr4,
            0x05 => Base100GSr10,
            0x06 => Cwdm4100G,
            0x07 => Psm4100G,
            0x08 => Acc100GBer5e5,
            // 0x09 is obsolete, 0x0a reserved.
            0x0b => Base100GCr4,
            0x0c => Base25GCrCaS,
            0x0d => Base25GCrCaN,
            // 0x0e-0x0f reserved.
            0x10 => Base40GEr4,
            0x11 => X4Base10GSr,
            0x12 => Base40GPsm4,
            0x13 => G959P1I12D1,
            0x14 => G959P1S12D2,
            0x15 => G959P1L12D2,
            0x16 => Base10GTSfi,
            0x17 => Clr4100G,
            0x18 => Aoc100GBer1e12,
            0x19 => Acc100GBer1e12,
            0x1a => Dwdm2100Ge,
            _ => Reserved(x),
        }
    }
}

impl From<ExtendedCompliance> for u8 {
    fn from(x: ExtendedCompliance) -> Self {
        use ExtendedCompliance::*;
        match x {
            Unspecified => 0x00,
            Aoc100GBer5e5 => 0x01,
            Base100GSr4 => 0x02,
            Base100GLr4 => 0x03,
            Base100GEr4 => 0x04,
            Base100GSr10 => 0x05,
            Cwdm4100G => 0x06,
            Psm4100G => 0x07,
            Acc100GBer5e5 => 0x08,
            Base100GCr4 => 0x0b,
            Base25GCrCaS => 0x0c,
            Base25GCrCaN => 0x0d,
            Base40GEr4 => 0x10,
            X4Base10GSr => 0x11,
            Base40GPsm4 => 0x12,
            G959P1I12D1 => 0x13,
            G959P1S12D2 => 0x14,
            G959P1L12D2 => 0x15,
            Base10GTSfi => 0x16,
            Clr4100G => 0x17,
            Aoc100GBer1e12 => 0x18,
            Acc100GBer1e12 => 0x19,
            Dwdm2100Ge => 0x1a,
            Reserved(code) => code,
        }
    }
}

impl fmt::Display for ExtendedCompliance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ExtendedCompliance::*;
        write!(
            f,
            "{}",
            match self {
                Unspecified => "unspecified",
                Aoc100GBer5e5 => "100G AOC BER < 5e-5",
                Base100GSr4 => "100GBASE-SR4",
                Base100GLr4 => "100GBASE-LR4",
                Base100GEr4 => "100GBASE-ER4",
                Base100GSr10 => "100GBASE-SR10",
                Cwdm4100G => "100G CWDM4",
                Psm4100G => "100G PSM4 Parallel SMF",
                Acc100GBer5e5 => "100G ACC BER < 5e-5",
                Base100GCr4 => "100GBASE-CR4 or 25GBASE-CR CA-L",
                Base25GCrCaS => "25GBASE-CR CA-S",
                Base25GCrCaN => "25GBASE-CR CA-N",
                Base40GEr4 => "40GBASE-ER4",
                X4Base10GSr => "4 x 10GBASE-SR",
                Base40GPsm4 => "40G PSM4",
                G959P1I12D1 => "G959.1 profile P1I1-2D1 (10709 MBd, 2km, 1310nm SM)",
                G959P1S12D2 => "G959.1 profile P1S1-2D2 (10709 MBd, 40km, 1550nm SM)",
                G959P1L12D2 => "G959.1 profile P1L1-2D2 (10709 MBd, 80km, 1550nm SM)",
                Base10GTSfi => "10GBASE-T with SFI electrical interface",
                Clr4100G => "100G CLR4",
                Aoc100GBer1e12 => "100G AOC BER < 1e-12",
                Acc100GBer1e12 => "100G ACC BER < 1e-12",
                Dwdm2100Ge => "100GE-DWDM2",
                Reserved(_) => "reserved",
            }
        )
    }
}
