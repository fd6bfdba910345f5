//! Skip catalog types and offer-eligibility rules.
//!
//! [`SkipOffer`] mirrors the upstream by-location catalog document, which
//! uses snake_case keys; the fields therefore carry no serde renames. The
//! eligibility rules here are pure so the wizard can re-run them on every
//! state change.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::booking::{HeavyWastePercentage, HeavyWasteType};

/// Largest skip (in yards) that may carry heavy waste.
pub const HEAVY_WASTE_MAX_YARDS: u32 = 8;

/// One skip offer from the catalog for a given postcode/area.
///
/// Prices are quoted before VAT; `vat` is a percentage. `created_at` and
/// `updated_at` are upstream bookkeeping strings, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SkipOffer {
    pub id: i64,
    /// Size in yards.
    pub size: u32,
    pub hire_period_days: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transport_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub per_tonne_cost: Option<f64>,
    pub price_before_vat: f64,
    /// VAT rate as a percentage, e.g. `20.0`.
    pub vat: f64,
    pub postcode: String,
    #[serde(default)]
    pub area: String,
    /// Marked unofferable upstream; never shown to customers.
    pub forbidden: bool,
    pub created_at: String,
    pub updated_at: String,
    pub allowed_on_road: bool,
    pub allows_heavy_waste: bool,
}

impl SkipOffer {
    /// Price including VAT.
    #[must_use]
    pub fn total_with_vat(&self) -> f64 {
        self.price_before_vat * (1.0 + self.vat / 100.0)
    }

    /// Price including VAT, rounded to whole currency units for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn display_total(&self) -> i64 {
        self.total_with_vat().round() as i64
    }

    /// Whether this offer may be shown when the load declares heavy waste.
    #[must_use]
    pub fn suits_heavy_waste(&self) -> bool {
        self.allows_heavy_waste && self.size <= HEAVY_WASTE_MAX_YARDS
    }
}

/// Filters a catalog down to the offers a customer may select.
///
/// Forbidden offers are always dropped. When the declared percentage is
/// above "No heavy waste" *and* at least one heavy-waste type is picked, the
/// remaining offers must allow heavy waste and be at most
/// [`HEAVY_WASTE_MAX_YARDS`] yards. Either signal alone changes nothing.
#[must_use]
pub fn eligible_skips<'a>(
    catalog: &'a [SkipOffer],
    percentage: HeavyWastePercentage,
    heavy_types: &BTreeSet<HeavyWasteType>,
) -> Vec<&'a SkipOffer> {
    let heavy_load = percentage.declares_heavy_waste() && !heavy_types.is_empty();
    catalog
        .iter()
        .filter(|offer| !offer.forbidden)
        .filter(|offer| !heavy_load || offer.suits_heavy_waste())
        .collect()
}
