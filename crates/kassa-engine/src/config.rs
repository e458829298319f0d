//! # Engine Configuration
//!
//! Deployment-level settings of one register: which event it sells for,
//! which device it is, the tax rate, and whether sales require a signed-in
//! cashier.

use kassa_core::{TaxRate, DEFAULT_TAX_RATE_BPS};

/// Engine configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = EngineConfig::new("seefest-2026", "pos-01")
///     .require_cashier(true)
///     .report_top_products(10);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The single event this register sells for.
    pub event_id: String,

    /// Identifier of this device, stamped on every order.
    pub device_id: String,

    /// Tax rate applied to all products, in basis points.
    pub tax_rate_bps: u32,

    /// Whether finalize requires a signed-in cashier. Deployments that run
    /// anonymous registers set this to false; cashier snapshot fields are
    /// then NULL on orders.
    pub require_cashier: bool,

    /// How many products the per-product report breakdown keeps.
    pub report_top_products: u32,
}

impl EngineConfig {
    /// Creates a configuration with the standard defaults.
    pub fn new(event_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        EngineConfig {
            event_id: event_id.into(),
            device_id: device_id.into(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            require_cashier: true,
            report_top_products: 10,
        }
    }

    /// Sets the tax rate in basis points.
    pub fn tax_rate_bps(mut self, bps: u32) -> Self {
        self.tax_rate_bps = bps;
        self
    }

    /// Sets whether finalize requires a signed-in cashier.
    pub fn require_cashier(mut self, required: bool) -> Self {
        self.require_cashier = required;
        self
    }

    /// Sets the per-product report truncation.
    pub fn report_top_products(mut self, count: u32) -> Self {
        self.report_top_products = count;
        self
    }

    /// The configured tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new("seefest-2026", "pos-01");
        assert_eq!(config.tax_rate_bps, 2000);
        assert!(config.require_cashier);
        assert_eq!(config.report_top_products, 10);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new("seefest-2026", "pos-01")
            .tax_rate_bps(1000)
            .require_cashier(false)
            .report_top_products(5);

        assert_eq!(config.tax_rate().bps(), 1000);
        assert!(!config.require_cashier);
        assert_eq!(config.report_top_products, 5);
    }
}
