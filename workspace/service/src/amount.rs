//! Decimal column bounds for money amounts.

use rust_decimal::Decimal;

use crate::error::{Result, ServiceError};

/// `DECIMAL(precision, scale)` of a column.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Precision {
    pub precision: u32,
    pub scale: u32,
}

/// Daily rates, booking totals and payment amounts.
pub(crate) const PRICE: Precision = Precision {
    precision: 10,
    scale: 2,
};

/// Car sale prices.
pub(crate) const SALE_PRICE: Precision = Precision {
    precision: 12,
    scale: 2,
};

impl Precision {
    /// Largest absolute value the column stores, e.g. 99,999,999.99 for (10, 2).
    pub(crate) fn max_value(self) -> Decimal {
        let limit = Decimal::from(10u64.pow(self.precision - self.scale));
        limit - Decimal::new(1, self.scale)
    }

    /// Rounds `value` to the column scale and rejects it when its integer
    /// part does not fit.
    pub(crate) fn fit(
        self,
        entity: &'static str,
        field: &'static str,
        value: Decimal,
    ) -> Result<Decimal> {
        let rounded = value.round_dp(self.scale);
        if rounded.abs() > self.max_value() {
            return Err(ServiceError::validation(
                entity,
                field,
                format!("must not exceed {}", self.max_value()),
            ));
        }
        Ok(rounded)
    }
}
