//! Cart

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::PerfumeUuid;

/// Smallest quantity a cart line may hold.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Largest quantity a cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Requested quantity is outside `[MIN_LINE_QUANTITY, MAX_LINE_QUANTITY]`.
    #[error("quantity {0} is outside the allowed range 1-10")]
    QuantityOutOfRange(u32),

    /// The perfume has no line in this cart.
    #[error("perfume {0} is not in the cart")]
    NotInCart(PerfumeUuid),

    /// No current price is known for the perfume.
    #[error("perfume {0} has no current price")]
    UnknownPerfume(PerfumeUuid),

    /// Line totals overflowed.
    #[error("cart total overflowed")]
    Overflow,
}

/// One perfume, its quantity and the unit price in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub perfume: PerfumeUuid,
    pub quantity: u32,
    pub unit_price: u64,
}

impl CartLine {
    /// Create a line.
    #[must_use]
    pub const fn new(perfume: PerfumeUuid, quantity: u32, unit_price: u64) -> Self {
        Self {
            perfume,
            quantity,
            unit_price,
        }
    }

    /// `unit_price × quantity`, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Result of normalising raw rows that may contain duplicate perfumes.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupeReport {
    /// The normalised cart.
    pub cart: Cart,

    /// Perfumes that appeared on more than one row.
    pub collapsed: Vec<PerfumeUuid>,
}

impl DedupeReport {
    /// Whether any duplicate rows were merged.
    #[must_use]
    pub fn had_duplicates(&self) -> bool {
        !self.collapsed.is_empty()
    }
}

/// A set of cart lines with at most one line per perfume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw lines, merging duplicates.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        Self::dedupe(lines).cart
    }

    /// Build a cart from raw lines and report which perfumes were duplicated.
    ///
    /// Duplicate lines are merged by summing quantities, capped at
    /// [`MAX_LINE_QUANTITY`]. The first line seen for a perfume keeps its
    /// position and unit price. Lines with a quantity of zero are dropped.
    pub fn dedupe(lines: impl IntoIterator<Item = CartLine>) -> DedupeReport {
        let mut cart = Self::new();
        let mut positions: FxHashMap<PerfumeUuid, usize> = FxHashMap::default();
        let mut collapsed = Vec::new();

        for line in lines {
            if line.quantity == 0 {
                continue;
            }

            if let Some(&position) = positions.get(&line.perfume) {
                if !collapsed.contains(&line.perfume) {
                    collapsed.push(line.perfume);
                }

                if let Some(existing) = cart.lines.get_mut(position) {
                    existing.quantity = capped_sum(existing.quantity, line.quantity);
                }

                continue;
            }

            positions.insert(line.perfume, cart.lines.len());

            cart.lines.push(CartLine {
                quantity: line.quantity.min(MAX_LINE_QUANTITY),
                ..line
            });
        }

        DedupeReport { cart, collapsed }
    }

    /// Add a line, merging it into an existing line for the same perfume.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }

        match self.line_mut(line.perfume) {
            Some(existing) => existing.quantity = capped_sum(existing.quantity, line.quantity),
            None => self.lines.push(CartLine {
                quantity: line.quantity.min(MAX_LINE_QUANTITY),
                ..line
            }),
        }
    }

    /// Merge another cart (e.g. an anonymous cart on sign-in) into this one.
    pub fn merge(&mut self, other: Cart) {
        for line in other.lines {
            self.add(line);
        }
    }

    /// Set the absolute quantity of an existing line.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityOutOfRange`]: quantity outside `[1, 10]`.
    /// - [`CartError::NotInCart`]: the perfume has no line.
    pub fn set_quantity(&mut self, perfume: PerfumeUuid, quantity: u32) -> Result<(), CartError> {
        validate_quantity(quantity)?;

        let line = self
            .line_mut(perfume)
            .ok_or(CartError::NotInCart(perfume))?;

        line.quantity = quantity;

        Ok(())
    }

    /// Remove a perfume's line. Returns `true` if a line was removed.
    pub fn remove(&mut self, perfume: PerfumeUuid) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.perfume != perfume);

        self.lines.len() != before
    }

    /// Replace unit prices with the given current prices.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownPerfume`] if any line has no current price.
    pub fn reprice(&mut self, prices: &FxHashMap<PerfumeUuid, u64>) -> Result<(), CartError> {
        for line in &mut self.lines {
            line.unit_price = *prices
                .get(&line.perfume)
                .ok_or(CartError::UnknownPerfume(line.perfume))?;
        }

        Ok(())
    }

    /// Perfumes in this cart, in line order.
    pub fn perfumes(&self) -> impl Iterator<Item = PerfumeUuid> + '_ {
        self.lines.iter().map(|line| line.perfume)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the total does not fit a `u64`.
    pub fn subtotal(&self) -> Result<u64, CartError> {
        self.lines.iter().try_fold(0_u64, |acc, line| {
            line.line_total()
                .and_then(|total| acc.checked_add(total))
                .ok_or(CartError::Overflow)
        })
    }

    /// Cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, perfume: PerfumeUuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.perfume == perfume)
    }
}

/// Check a requested line quantity against the allowed range.
///
/// # Errors
///
/// Returns [`CartError::QuantityOutOfRange`] outside `[1, 10]`.
pub fn validate_quantity(quantity: u32) -> Result<(), CartError> {
    if (MIN_LINE_QUANTITY..=MAX_LINE_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(CartError::QuantityOutOfRange(quantity))
    }
}

fn capped_sum(a: u32, b: u32) -> u32 {
    a.saturating_add(b).min(MAX_LINE_QUANTITY)
}
