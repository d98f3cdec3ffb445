//! Cart Models

use attar::{
    cart::{Cart, CartLine},
    ids::{PerfumeUuid, TypedUuid, UserUuid},
};
use jiff::Timestamp;

/// Cart item row marker.
#[derive(Debug)]
pub struct CartItemRow;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRow>;

/// A stored cart row joined with its perfume. Several rows may exist for the
/// same perfume until the cart is next read.
#[derive(Debug, Clone)]
pub struct StoredCartItem {
    pub uuid: CartItemUuid,
    pub perfume: PerfumeUuid,
    pub name: String,
    pub brand: String,
    pub price: u64,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One line of a customer's cart, priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub perfume: PerfumeUuid,
    pub name: String,
    pub brand: String,
    pub unit_price: u64,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn line(&self) -> CartLine {
        CartLine::new(self.perfume, self.quantity, self.unit_price)
    }
}

/// A registered customer's persisted cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCart {
    pub user: UserUuid,
    pub items: Vec<CartItem>,
}

impl UserCart {
    /// Build the cart from stored rows, collapsing duplicate perfumes.
    ///
    /// Returns the cart and the perfumes that had more than one row.
    #[must_use]
    pub fn from_rows(user: UserUuid, rows: &[StoredCartItem]) -> (Self, Vec<PerfumeUuid>) {
        let report = Cart::dedupe(
            rows.iter()
                .map(|row| CartLine::new(row.perfume, row.quantity, row.price)),
        );

        let items = report
            .cart
            .lines()
            .iter()
            .filter_map(|line| {
                rows.iter()
                    .find(|row| row.perfume == line.perfume)
                    .map(|row| CartItem {
                        perfume: line.perfume,
                        name: row.name.clone(),
                        brand: row.brand.clone(),
                        unit_price: line.unit_price,
                        quantity: line.quantity,
                    })
            })
            .collect();

        (Self { user, items }, report.collapsed)
    }

    /// Domain view of this cart.
    #[must_use]
    pub fn to_cart(&self) -> Cart {
        Cart::from_lines(self.items.iter().map(CartItem::line))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(perfume: PerfumeUuid, quantity: u32) -> StoredCartItem {
        let now = Timestamp::now();

        StoredCartItem {
            uuid: CartItemUuid::new(),
            perfume,
            name: "Amber Nights".to_string(),
            brand: "Attar House".to_string(),
            price: 180_00,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn duplicate_rows_are_collapsed_and_reported() {
        let amber = PerfumeUuid::new();
        let rose = PerfumeUuid::new();
        let rows = [row(amber, 4), row(rose, 1), row(amber, 8)];

        let (cart, collapsed) = UserCart::from_rows(UserUuid::new(), &rows);

        assert_eq!(collapsed, vec![amber]);
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items.first().map(|item| item.quantity), Some(10));
        assert_eq!(cart.items.get(1).map(|item| item.perfume), Some(rose));
    }

    #[test]
    fn clean_rows_report_nothing() {
        let rows = [row(PerfumeUuid::new(), 2)];

        let (cart, collapsed) = UserCart::from_rows(UserUuid::new(), &rows);

        assert!(collapsed.is_empty());
        assert_eq!(cart.to_cart().total_quantity(), 2);
    }
}
