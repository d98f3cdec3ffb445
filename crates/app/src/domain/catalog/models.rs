//! Catalog Models

use attar::ids::PerfumeUuid;
use jiff::Timestamp;
use rustc_hash::FxHashMap;

/// Perfume as currently listed, with its current price in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Perfume {
    pub uuid: PerfumeUuid,
    pub name: String,
    pub brand: String,
    pub price: u64,
}

/// Perfume saved to a customer's wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistEntry {
    pub perfume: PerfumeUuid,
    pub name: String,
    pub brand: String,
    pub price: u64,
    pub added_at: Timestamp,
}

/// Index perfumes by identifier.
#[must_use]
pub fn index_perfumes(perfumes: &[Perfume]) -> FxHashMap<PerfumeUuid, &Perfume> {
    perfumes.iter().map(|perfume| (perfume.uuid, perfume)).collect()
}

/// Current prices keyed by perfume.
#[must_use]
pub fn price_map(perfumes: &[Perfume]) -> FxHashMap<PerfumeUuid, u64> {
    perfumes
        .iter()
        .map(|perfume| (perfume.uuid, perfume.price))
        .collect()
}
