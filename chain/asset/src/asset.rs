use taiyi_primitives::{ChainError, Satoshis};

use crate::symbol::AssetSymbol;

/// The largest amount of any asset that may exist, in its smallest unit.
pub const MAX_SATOSHIS: Satoshis = 9_000_000_000_000_000;

/// An amount of a specific asset. `amount` is always `0 <= amount <=
/// MAX_SATOSHIS` (`spec.md` §4.1); negative intermediate values are only
/// ever handled as deltas, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub amount: Satoshis,
    pub symbol: AssetSymbol,
}

impl Asset {
    pub fn new(amount: Satoshis, symbol: AssetSymbol) -> Result<Self, ChainError> {
        if amount.unsigned_abs() as i128 > MAX_SATOSHIS as i128 {
            return Err(ChainError::validation(format!(
                "amount {amount} exceeds MAX_SATOSHIS {MAX_SATOSHIS}"
            )));
        }
        Ok(Self { amount, symbol })
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    fn require_same_symbol(&self, other: &Asset) -> Result<(), ChainError> {
        if self.symbol != other.symbol {
            return Err(ChainError::validation(
                "cannot combine assets of different symbols",
            ));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset, ChainError> {
        self.require_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| ChainError::validation("asset addition overflowed"))?;
        Asset::new(amount, self.symbol)
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset, ChainError> {
        self.require_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| ChainError::validation("asset subtraction overflowed"))?;
        Asset::new(amount, self.symbol)
    }
}

/// A base/quote exchange rate, `price = base / quote`, with `base.symbol !=
/// quote.symbol` and both amounts strictly positive (`spec.md` §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub base: Asset,
    pub quote: Asset,
}

impl Price {
    pub fn new(base: Asset, quote: Asset) -> Result<Self, ChainError> {
        if base.symbol == quote.symbol {
            return Err(ChainError::validation(
                "price base and quote must have different symbols",
            ));
        }
        if base.amount <= 0 || quote.amount <= 0 {
            return Err(ChainError::validation(
                "price base and quote amounts must be positive",
            ));
        }
        Ok(Self { base, quote })
    }

    /// Cross-multiplied comparison in 128-bit, avoiding the precision loss
    /// of converting to floating point.
    pub fn cross_compare(&self, other: &Price) -> std::cmp::Ordering {
        let lhs = self.base.amount as i128 * other.quote.amount as i128;
        let rhs = other.base.amount as i128 * self.quote.amount as i128;
        lhs.cmp(&rhs)
    }

    /// Converts `asset` (which must share a symbol with either `base` or
    /// `quote`) into the other currency: `(a.amount * other.amount) /
    /// same.amount`, failing if the result doesn't fit in 64 bits.
    pub fn convert(&self, asset: &Asset) -> Result<Asset, ChainError> {
        let (same, other) = if asset.symbol == self.base.symbol {
            (self.base, self.quote)
        } else if asset.symbol == self.quote.symbol {
            (self.quote, self.base)
        } else {
            return Err(ChainError::validation(
                "asset shares no symbol with this price",
            ));
        };

        let numerator = asset.amount as i128 * other.amount as i128;
        let converted = numerator / same.amount as i128;
        if converted > Satoshis::MAX as i128 || converted < Satoshis::MIN as i128 {
            return Err(ChainError::validation("price conversion overflowed i64"));
        }
        Asset::new(converted as Satoshis, other.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::AssetSymbol;

    fn gold(amount: Satoshis) -> Asset {
        Asset::new(amount, AssetSymbol::GOLD).unwrap()
    }

    fn food(amount: Satoshis) -> Asset {
        Asset::new(amount, AssetSymbol::FOOD).unwrap()
    }

    #[test]
    fn rejects_mixed_symbol_arithmetic() {
        assert!(gold(1).checked_add(&food(1)).is_err());
    }

    #[test]
    fn price_requires_distinct_symbols_and_positive_amounts() {
        assert!(Price::new(gold(1), gold(1)).is_err());
        assert!(Price::new(gold(0), food(1)).is_err());
    }

    #[test]
    fn convert_round_trips_through_price() {
        let price = Price::new(gold(2), food(1)).unwrap();
        let converted = price.convert(&food(10)).unwrap();
        assert_eq!(converted, gold(20));
        let back = price.convert(&converted).unwrap();
        assert_eq!(back, food(10));
    }

    #[test]
    fn cross_compare_matches_float_ordering() {
        let a = Price::new(gold(1), food(3)).unwrap();
        let b = Price::new(gold(1), food(2)).unwrap();
        assert_eq!(a.cross_compare(&b), std::cmp::Ordering::Less);
    }
}
