// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! Decoding of the 128-byte identity image read from a module's EEPROM.

use crate::Compliance;
use crate::ConnectorType;
use crate::Error;
use crate::ExtendedCompliance;
use crate::Identifier;
use std::fmt;
use std::ops::Range;

// Field locations within the identity image, relative to the start of the
// upper memory page (byte 128 of the full map). See SFF-8636 rev 2.10a
// Table 6-14.
const IDENTIFIER: usize = 0;
const CONNECTOR: usize = 2;
const COMPATIBILITY: Range<usize> = 3..11;
const VENDOR_NAME: Range<usize> = 20..36;
const VENDOR_OUI: Range<usize> = 37..40;
const VENDOR_PART: Range<usize> = 40..56;
const VENDOR_REVISION: Range<usize> = 56..58;
const EXTENDED_COMPLIANCE: usize = 64;
const VENDOR_SERIAL: Range<usize> = 68..84;
const VENDOR_DATE: Range<usize> = 84..92;

static_assertions::const_assert_eq!(VENDOR_NAME.end - VENDOR_NAME.start, 16);
static_assertions::const_assert_eq!(VENDOR_PART.end - VENDOR_PART.start, 16);
static_assertions::const_assert_eq!(VENDOR_SERIAL.end - VENDOR_SERIAL.start, 16);
static_assertions::const_assert_eq!(VENDOR_DATE.end - VENDOR_DATE.start, 8);
static_assertions::const_assert!(VENDOR_DATE.end <= Eeprom::LEN);

/// Vendor-specific information about a transceiver module.
///
/// All string fields are extracted from their fixed-width EEPROM ranges by
/// truncating at the first NUL byte and trimming surrounding whitespace.
#[derive(Clone, PartialEq)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
pub struct Vendor {
    pub name: String,
    pub oui: [u8; 3],
    pub part: String,
    pub revision: String,
    pub serial: String,
    pub date: String,
}

impl Vendor {
    /// Return a formatted version of the Organizational Unique Identifier.
    pub fn format_oui(&self) -> String {
        format!(
            "{0:02x}-{1:02x}-{2:02x}",
            self.oui[0], self.oui[1], self.oui[2]
        )
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", &self.name, &self.part)
    }
}

impl fmt::Debug for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Vendor")
            .field("name", &self.name)
            .field("oui", &self.format_oui())
            .field("part", &self.part)
            .field("revision", &self.revision)
            .field("serial", &self.serial)
            .field("date", &self.date)
            .finish()
    }
}

/// The decoded identity record of a transceiver module.
///
/// This is a structural reinterpretation of the 128-byte upper-page-0
/// image read during the presence handshake. The driver replaces it
/// wholesale on each successful handshake; it is never partially updated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
pub struct Eeprom {
    /// The SFF-8024 identifier.
    pub identifier: Identifier,
    /// The connector type.
    pub connector: ConnectorType,
    /// The raw specification compliance bytes.
    pub compatibility: [u8; COMPATIBILITY.end - COMPATIBILITY.start],
    /// The raw extended compliance byte. Only meaningful when the
    /// compliance byte declares it valid; use [`Eeprom::compliance`].
    pub extended_compliance: u8,
    /// The vendor information.
    pub vendor: Vendor,
}

impl Eeprom {
    /// The size of the identity image, in bytes.
    pub const LEN: usize = 128;

    /// Decode an identity image.
    ///
    /// Decoding is total: every byte pattern produces a value, with unknown
    /// classification codes mapped to their reserved variants.
    pub fn decode(raw: &[u8; Self::LEN]) -> Self {
        let vendor = Vendor {
            name: trim_field(&raw[VENDOR_NAME]),
            oui: raw[VENDOR_OUI].try_into().unwrap(),
            part: trim_field(&raw[VENDOR_PART]),
            revision: trim_field(&raw[VENDOR_REVISION]),
            serial: trim_field(&raw[VENDOR_SERIAL]),
            date: trim_field(&raw[VENDOR_DATE]),
        };
        Self {
            identifier: Identifier::from(raw[IDENTIFIER]),
            connector: ConnectorType::from(raw[CONNECTOR]),
            compatibility: raw[COMPATIBILITY].try_into().unwrap(),
            extended_compliance: raw[EXTENDED_COMPLIANCE],
            vendor,
        }
    }

    /// Return the compliance flag set and the extended compliance code.
    ///
    /// The extended code is reported as
    /// [`ExtendedCompliance::Unspecified`] unless the compliance byte's
    /// extended-valid bit is set, regardless of the raw byte's contents.
    pub fn compliance(&self) -> (Compliance, ExtendedCompliance) {
        let compliance = Compliance::from_bits_retain(self.compatibility[0]);
        let extended = if compliance.contains(Compliance::EXTENDED_VALID) {
            ExtendedCompliance::from(self.extended_compliance)
        } else {
            ExtendedCompliance::Unspecified
        };
        (compliance, extended)
    }
}

impl TryFrom<&[u8]> for Eeprom {
    type Error = Error;

    fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
        let raw: &[u8; Self::LEN] = raw.try_into().map_err(|_| Error::WrongImageSize {
            expected: Self::LEN,
            actual: raw.len(),
        })?;
        Ok(Self::decode(raw))
    }
}

impl fmt::Display for Eeprom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Id: {}", self.identifier)?;
        write!(
            f,
            "\n  Vendor: {}, Part Number {}, Revision {}, Serial {}, Date {}",
            self.vendor.name,
            self.vendor.part,
            self.vendor.revision,
            self.vendor.serial,
            self.vendor.date,
        )?;
        write!(f, "\n  Connector Type: {}", self.connector)?;
        let (compliance, extended) = self.compliance();
        write!(f, "\n  Compliance: {compliance}")?;
        if extended != ExtendedCompliance::Unspecified {
            write!(f, " {extended}")?;
        }
        Ok(())
    }
}

// Extract a string from a fixed-width EEPROM field: truncate at the first
// NUL byte, drop any trailing invalid UTF-8, and trim whitespace from both
// ends.
fn trim_field(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let buf = &buf[..end];
    match std::str::from_utf8(buf) {
        Ok(s) => s.trim().to_string(),
        Err(e) => {
            let (valid, _) = buf.split_at(e.valid_up_to());
            std::str::from_utf8(valid)
                .expect("utf8 checked right above")
                .trim()
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::trim_field;
    use super::Compliance;
    use super::ConnectorType;
    use super::Eeprom;
    use super::Error;
    use super::ExtendedCompliance;
    use super::Identifier;

    // Build an identity image with the given classification codes and
    // vendor fields copied into their fixed locations.
    fn fixture(compliance: u8, extended: u8) -> [u8; Eeprom::LEN] {
        let mut raw = [0u8; Eeprom::LEN];
        raw[super::IDENTIFIER] = u8::from(Identifier::Qsfp28);
        raw[super::CONNECTOR] = u8::from(ConnectorType::Mpo1x12);
        raw[super::COMPATIBILITY][0] = compliance;
        raw[super::EXTENDED_COMPLIANCE] = extended;
        raw[super::VENDOR_NAME][..4].copy_from_slice(b"ACME");
        raw[super::VENDOR_OUI].copy_from_slice(&[0xa8, 0x40, 0x25]);
        raw[super::VENDOR_PART][..8].copy_from_slice(b"Q28-SR4 ");
        raw[super::VENDOR_REVISION].copy_from_slice(b"01");
        raw[super::VENDOR_SERIAL][..6].copy_from_slice(b"SN0001");
        raw[super::VENDOR_DATE].copy_from_slice(b"200101  ");
        raw
    }

    #[test]
    fn test_decode_fixture() {
        let eeprom = Eeprom::decode(&fixture(0, 0));
        assert_eq!(eeprom.identifier, Identifier::Qsfp28);
        assert_eq!(eeprom.connector, ConnectorType::Mpo1x12);
        assert_eq!(eeprom.vendor.name, "ACME");
        assert_eq!(eeprom.vendor.oui, [0xa8, 0x40, 0x25]);
        assert_eq!(eeprom.vendor.format_oui(), "a8-40-25");
        assert_eq!(eeprom.vendor.part, "Q28-SR4");
        assert_eq!(eeprom.vendor.revision, "01");
        assert_eq!(eeprom.vendor.serial, "SN0001");
        assert_eq!(eeprom.vendor.date, "200101");
    }

    #[test]
    fn test_extended_compliance_gated_by_valid_bit() {
        // For every value of the compliance byte, the extended code must
        // read back as unspecified whenever bit 7 is clear, no matter what
        // the raw extended byte holds.
        for compliance in 0..=u8::MAX {
            let eeprom = Eeprom::decode(&fixture(compliance, 0x02));
            let (c, x) = eeprom.compliance();
            assert_eq!(c.bits(), compliance);
            if compliance & 0x80 == 0 {
                assert_eq!(x, ExtendedCompliance::Unspecified);
            } else {
                assert_eq!(x, ExtendedCompliance::Base100GSr4);
            }
        }
    }

    #[test]
    fn test_trim_field() {
        // NUL-padded to field width, with stray spaces beyond the NUL.
        let mut field = [0u8; 16];
        field[..4].copy_from_slice(b"ACME");
        field[8..].copy_from_slice(b"        ");
        assert_eq!(trim_field(&field), "ACME");

        assert_eq!(trim_field(b"  padded  "), "padded");
        assert_eq!(trim_field(b"\0leftover"), "");
        assert_eq!(trim_field(b"full-width-field"), "full-width-field");
    }

    #[test]
    fn test_try_from_wrong_length() {
        let short = [0u8; 64];
        assert_eq!(
            Eeprom::try_from(&short[..]).unwrap_err(),
            Error::WrongImageSize {
                expected: Eeprom::LEN,
                actual: 64,
            }
        );
        assert!(Eeprom::try_from(&[0u8; Eeprom::LEN][..]).is_ok());
    }

    #[test]
    fn test_display() {
        let raw = fixture(
            (Compliance::ETH_40G_SR | Compliance::EXTENDED_VALID).bits(),
            u8::from(ExtendedCompliance::Base100GSr4),
        );
        let rendered = Eeprom::decode(&raw).to_string();
        let expected = "Id: QSFP28\n  \
            Vendor: ACME, Part Number Q28-SR4, Revision 01, Serial SN0001, Date 200101\n  \
            Connector Type: MPO 1x12 (Multifiber Parallel Optic)\n  \
            Compliance: 40G SR, extended 100GBASE-SR4";
        assert_eq!(rendered, expected);

        // Without the extended-valid bit, no extended name is appended.
        let raw = fixture(Compliance::ETH_40G_SR.bits(), 0x02);
        let rendered = Eeprom::decode(&raw).to_string();
        assert!(rendered.ends_with("Compliance: 40G SR"));
    }

    #[test]
    fn test_vendor_serdes() {
        let vendor = super::Vendor {
            name: String::from("ACME"),
            oui: [0xa8, 0x40, 0x25],
            part: String::from("Q28-SR4"),
            revision: String::from("01"),
            serial: String::from("SN0001"),
            date: String::from("200101"),
        };
        let expected = "{\"name\":\"ACME\",\"oui\":[168,64,37],\
            \"part\":\"Q28-SR4\",\"revision\":\"01\",\"serial\":\"SN0001\",\
            \"date\":\"200101\"}";
        assert_eq!(serde_json::to_string(&vendor).unwrap(), expected);
        assert_eq!(vendor, serde_json::from_str(expected).unwrap());

        let id = Identifier::Qsfp28;
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"qsfp28\"");
    }
}
