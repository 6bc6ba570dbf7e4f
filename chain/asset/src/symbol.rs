use taiyi_primitives::ChainError;

use crate::damm::damm_checksum_8digit;

/// Bit layout of `AssetSymbol::asset_num` (`spec.md` §4.1). Decimals sit in
/// the low nibble, the control bit marks "this is a NAI-space symbol", the
/// qi bit marks "this is the qi-variant of its paired symbol", and
/// `nai_data_digits` occupies everything above that.
const DECIMALS_MASK: u32 = 0x0F;
const CONTROL_MASK: u32 = 0x10;
const QI_MASK: u32 = 0x20;
const NAI_SHIFT: u32 = 6;

pub const MAX_DECIMALS: u8 = 12;
pub const MIN_NAI: u32 = 10_000_000;
pub const MAX_NAI: u32 = (u32::MAX >> NAI_SHIFT) as u32;

/// Fixed first-class assets that predate the NAI encoding. Numbers are
/// small and disjoint from anything `CONTROL_MASK` could produce.
pub mod legacy {
    pub const YANG: u32 = 1;
    pub const YIN: u32 = 2;
    pub const QI: u32 = 3;
    pub const GOLD: u32 = 4;
    pub const FOOD: u32 = 5;
    pub const WOOD: u32 = 6;
    pub const FABRIC: u32 = 7;
    pub const HERB: u32 = 8;

    pub const PRECISION_YANG: u8 = 3;
    pub const PRECISION_YIN: u8 = 3;
    pub const PRECISION_QI: u8 = 3;
    pub const PRECISION_GOLD: u8 = 0;
    pub const PRECISION_FOOD: u8 = 0;
    pub const PRECISION_WOOD: u8 = 0;
    pub const PRECISION_FABRIC: u8 = 0;
    pub const PRECISION_HERB: u8 = 0;

    pub fn precision(asset_num: u32) -> Option<u8> {
        Some(match asset_num {
            YANG => PRECISION_YANG,
            YIN => PRECISION_YIN,
            QI => PRECISION_QI,
            GOLD => PRECISION_GOLD,
            FOOD => PRECISION_FOOD,
            WOOD => PRECISION_WOOD,
            FABRIC => PRECISION_FABRIC,
            HERB => PRECISION_HERB,
            _ => return None,
        })
    }

    /// The reserved NAI slot each legacy asset prints as in its `"@@..."`
    /// wire form, disjoint from the user-definable NAI range.
    pub fn reserved_nai(asset_num: u32) -> Option<u32> {
        Some(match asset_num {
            YANG => 1_000_000,
            YIN => 1_000_001,
            QI => 1_000_002,
            GOLD => 1_000_003,
            FOOD => 1_000_004,
            WOOD => 1_000_005,
            FABRIC => 1_000_006,
            HERB => 1_000_007,
            _ => return None,
        })
    }
}

/// A validated asset symbol: either one of the eight legacy first-class
/// assets, or a user-defined symbol living in NAI space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetSymbol {
    asset_num: u32,
}

impl AssetSymbol {
    pub const YANG: AssetSymbol = AssetSymbol {
        asset_num: legacy::YANG,
    };
    pub const YIN: AssetSymbol = AssetSymbol {
        asset_num: legacy::YIN,
    };
    pub const QI: AssetSymbol = AssetSymbol {
        asset_num: legacy::QI,
    };
    pub const GOLD: AssetSymbol = AssetSymbol {
        asset_num: legacy::GOLD,
    };
    pub const FOOD: AssetSymbol = AssetSymbol {
        asset_num: legacy::FOOD,
    };
    pub const WOOD: AssetSymbol = AssetSymbol {
        asset_num: legacy::WOOD,
    };
    pub const FABRIC: AssetSymbol = AssetSymbol {
        asset_num: legacy::FABRIC,
    };
    pub const HERB: AssetSymbol = AssetSymbol {
        asset_num: legacy::HERB,
    };

    /// Constructs a symbol directly from its raw `asset_num`, validating it
    /// first.
    pub fn from_asset_num(asset_num: u32) -> Result<Self, ChainError> {
        let symbol = Self { asset_num };
        symbol.validate()?;
        Ok(symbol)
    }

    /// Raw wire representation.
    pub fn asset_num(&self) -> u32 {
        self.asset_num
    }

    fn is_legacy(&self) -> bool {
        legacy::precision(self.asset_num).is_some()
    }

    /// Encodes a NAI-space symbol from its 8-digit data and a decimal
    /// precision (`spec.md` §4.1). If `nai_data_digits` happens to match a
    /// reserved legacy NAI this instead returns the legacy symbol, asserting
    /// the decimals agree.
    pub fn from_nai(nai_data_digits: u32, decimals: u8) -> Result<Self, ChainError> {
        for legacy_num in [
            legacy::YANG,
            legacy::YIN,
            legacy::QI,
            legacy::GOLD,
            legacy::FOOD,
            legacy::WOOD,
            legacy::FABRIC,
            legacy::HERB,
        ] {
            if legacy::reserved_nai(legacy_num) == Some(nai_data_digits) {
                let expected = legacy::precision(legacy_num).expect("legacy_num is legacy");
                if decimals != expected {
                    return Err(ChainError::validation(format!(
                        "legacy asset {legacy_num} requires decimals {expected}, got {decimals}"
                    )));
                }
                return Ok(Self {
                    asset_num: legacy_num,
                });
            }
        }

        if !(MIN_NAI..=MAX_NAI).contains(&nai_data_digits) {
            return Err(ChainError::validation(format!(
                "NAI {nai_data_digits} out of range [{MIN_NAI}, {MAX_NAI}]"
            )));
        }
        if decimals > MAX_DECIMALS {
            return Err(ChainError::validation(format!(
                "decimals {decimals} exceeds MAX_DECIMALS {MAX_DECIMALS}"
            )));
        }
        let asset_num = (nai_data_digits << NAI_SHIFT) | CONTROL_MASK | decimals as u32;
        Self::from_asset_num(asset_num)
    }

    /// Parses an 11-byte NAI string (`"@@"` + 9 digits) into a symbol,
    /// verifying the trailing Damm check digit (`spec.md` §4.1, §8 property
    /// 1).
    pub fn from_nai_string(s: &str, decimals: u8) -> Result<Self, ChainError> {
        if s.len() != 11 {
            return Err(ChainError::validation(format!(
                "NAI string must be 11 bytes, got {}",
                s.len()
            )));
        }
        if &s[0..2] != "@@" {
            return Err(ChainError::validation("NAI string must start with \"@@\""));
        }
        let digits = &s[2..11];
        let nai: u32 = digits
            .parse()
            .map_err(|_| ChainError::validation("NAI string digits are not numeric"))?;

        let check_digit = (nai % 10) as u8;
        let nai_data_digits = nai / 10;
        let expected = damm_checksum_8digit(nai_data_digits);
        if check_digit != expected {
            return Err(ChainError::validation(format!(
                "NAI check digit mismatch: expected {expected}, got {check_digit}"
            )));
        }

        Self::from_nai(nai_data_digits, decimals)
    }

    /// Returns the 9-digit integer whose first 8 digits are
    /// `nai_data_digits` and whose last digit is the Damm check digit.
    pub fn to_nai(&self) -> u32 {
        let nai_data_digits = self.nai_data_digits();
        nai_data_digits * 10 + damm_checksum_8digit(nai_data_digits) as u32
    }

    /// Renders the canonical `"@@XXXXXXXXX"` wire form (`spec.md` §6).
    pub fn to_nai_string(&self) -> String {
        format!("@@{:09}", self.to_nai())
    }

    fn nai_data_digits(&self) -> u32 {
        if self.is_legacy() {
            // Legacy symbols carry a dedicated reserved NAI slot, disjoint
            // from the user-definable [MIN_NAI, MAX_NAI] range.
            legacy::reserved_nai(self.asset_num)
                .expect("legacy asset_num always has a reserved NAI")
        } else {
            self.asset_num >> NAI_SHIFT
        }
    }

    pub fn decimals(&self) -> u8 {
        if let Some(p) = legacy::precision(self.asset_num) {
            return p;
        }
        (self.asset_num & DECIMALS_MASK) as u8
    }

    /// True iff this symbol is the qi-variant of its paired symbol.
    pub fn is_qi(&self) -> bool {
        if self.is_legacy() {
            self.asset_num == legacy::QI
        } else {
            self.asset_num & QI_MASK != 0
        }
    }

    /// Returns the symbol this one is paired with (`spec.md` §4.1, §8
    /// property 2: applying this twice is the identity).
    pub fn get_paired_symbol(&self) -> Self {
        if self.is_legacy() {
            let asset_num = match self.asset_num {
                legacy::YANG => legacy::QI,
                legacy::QI => legacy::YANG,
                other => other,
            };
            Self { asset_num }
        } else {
            Self {
                asset_num: self.asset_num ^ QI_MASK,
            }
        }
    }

    /// Re-validates the invariants `spec.md` §4.1 places on `asset_num`.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.is_legacy() {
            return Ok(());
        }
        let nai_data_digits = self.asset_num >> NAI_SHIFT;
        let control_bit = self.asset_num & CONTROL_MASK;
        let decimals = (self.asset_num & DECIMALS_MASK) as u8;

        if !(MIN_NAI..=MAX_NAI).contains(&nai_data_digits) {
            return Err(ChainError::validation(format!(
                "NAI {nai_data_digits} out of range"
            )));
        }
        if control_bit != CONTROL_MASK {
            return Err(ChainError::validation("NAI-space symbol missing control bit"));
        }
        if decimals > MAX_DECIMALS {
            return Err(ChainError::validation(format!(
                "decimals {decimals} exceeds MAX_DECIMALS {MAX_DECIMALS}"
            )));
        }
        Ok(())
    }
}
