//! Pricing engine input and output models.
//!
//! Wire names are camelCase to stay compatible with records and sheets
//! produced by earlier versions of the invoice tool.

use serde::{Deserialize, Serialize};

use super::coercion::FieldValue;

/// Raw form inputs for one calculation. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceInput {
    /// SAR per night
    pub makkah_hotel_rate: Option<FieldValue>,
    pub nights_in_makkah: Option<FieldValue>,
    /// SAR per night
    pub madinah_hotel_rate: Option<FieldValue>,
    pub nights_in_madinah: Option<FieldValue>,
    /// SAR per traveler
    pub visa_rate: Option<FieldValue>,
    /// SAR per traveler
    pub ziyarat_rate: Option<FieldValue>,
    pub profit_percentage: Option<FieldValue>,
    pub per_pax_count: Option<FieldValue>,
    /// SAR -> PKR multiplier
    pub exchange_rate: Option<FieldValue>,
    /// PKR per traveler
    pub airline_price_pkr: Option<FieldValue>,
}

/// Complete pricing breakdown. SAR amounts unless the name says PKR.
///
/// Every amount is already rounded to two decimals; consumers must display
/// these values as-is rather than recompute them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceBreakdown {
    pub makkah_cost: f64,
    pub madinah_cost: f64,
    pub visa_total: f64,
    pub ziyarat_total: f64,
    pub base_total: f64,
    pub with_profit: f64,
    #[serde(alias = "perPax")]
    pub per_pax_sar: f64,
    #[serde(alias = "finalInPKR")]
    pub per_pax_pkr: f64,
    pub airline_per_pax_pkr: f64,
    pub airline_total_pkr: f64,
    #[serde(rename = "totalWithProfitPKR")]
    pub total_with_profit_pkr: f64,
    pub pax_count: i64,
}

impl Default for InvoiceBreakdown {
    fn default() -> Self {
        Self {
            makkah_cost: 0.0,
            madinah_cost: 0.0,
            visa_total: 0.0,
            ziyarat_total: 0.0,
            base_total: 0.0,
            with_profit: 0.0,
            per_pax_sar: 0.0,
            per_pax_pkr: 0.0,
            airline_per_pax_pkr: 0.0,
            airline_total_pkr: 0.0,
            total_with_profit_pkr: 0.0,
            pax_count: 1,
        }
    }
}

impl InvoiceBreakdown {
    /// All amount fields, in declaration order.
    pub fn amounts(&self) -> [f64; 11] {
        [
            self.makkah_cost,
            self.madinah_cost,
            self.visa_total,
            self.ziyarat_total,
            self.base_total,
            self.with_profit,
            self.per_pax_sar,
            self.per_pax_pkr,
            self.airline_per_pax_pkr,
            self.airline_total_pkr,
            self.total_with_profit_pkr,
        ]
    }
}
