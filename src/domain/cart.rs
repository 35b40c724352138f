//! Client-side cart state.
//!
//! Every mutation returns a [`CartSnapshot`] so callers can render or
//! compare the cart without holding a borrow on it.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::catalog::{BundleItem, Product};
use super::errors::DomainError;

const DEFAULT_UNIT: &str = "pièce";

/// One product entry of the cart, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(default)]
    pub product_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub quantity: Option<BigDecimal>,
    #[serde(default)]
    pub weight: Option<BigDecimal>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub contents: Vec<BundleItem>,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLine {
    pub fn new(name: impl Into<String>, price: BigDecimal) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            price,
            quantity: None,
            weight: None,
            unit: None,
            contents: Vec::new(),
            image: None,
        }
    }

    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: Some(product.id),
            name: product.name.clone(),
            price: product.price.clone(),
            quantity: None,
            weight: product.weight.clone(),
            unit: product.unit.clone(),
            contents: product.contents.clone(),
            image: product.image.clone(),
        }
    }

    pub fn with_quantity(mut self, quantity: BigDecimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_weight(mut self, weight: BigDecimal) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_contents(mut self, contents: Vec<BundleItem>) -> Self {
        self.contents = contents;
        self
    }

    pub fn is_bundle(&self) -> bool {
        !self.contents.is_empty()
    }

    /// Quantity used for pricing; an unset quantity counts as one.
    pub fn effective_quantity(&self) -> BigDecimal {
        self.quantity.clone().unwrap_or_else(one)
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.price * &self.effective_quantity()
    }

    /// Human readable quantity shown next to the line.
    pub fn quantity_label(&self) -> String {
        if self.is_bundle() {
            return format!("{} articles", self.contents.len());
        }

        match (&self.unit, &self.weight, &self.quantity) {
            (Some(unit), Some(weight), _) => format_weight(weight, unit),
            (Some(unit), None, Some(quantity)) => {
                format!("{} {}", format_decimal(quantity), unit)
            }
            _ => format!(
                "{} {}",
                format_decimal(&self.effective_quantity()),
                DEFAULT_UNIT
            ),
        }
    }

    /// Same line with the quantity filled in, as sent with an order.
    pub fn with_defaulted_quantity(&self) -> Self {
        let mut line = self.clone();
        line.quantity = Some(self.effective_quantity());
        line
    }
}

fn one() -> BigDecimal {
    BigDecimal::from(1)
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

/// Renders a decimal without trailing zeros, e.g. `1.50` as `1.5`.
pub fn format_decimal(value: &BigDecimal) -> String {
    let normalized = value.normalized();
    if normalized.is_integer() {
        normalized.with_scale(0).to_string()
    } else {
        normalized.to_string()
    }
}

/// Weight followed by its unit, e.g. `1.5 kg`.
pub fn format_weight(weight: &BigDecimal, unit: &str) -> String {
    format!("{} {}", format_decimal(weight), unit)
}

/// Sum of `price * quantity` over `lines`, unset quantities counting as one.
pub fn order_total(lines: &[CartLine]) -> BigDecimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Immutable view of the cart after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: BigDecimal,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, name: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.name == name)
    }

    pub fn total(&self) -> BigDecimal {
        order_total(&self.lines)
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total: self.total(),
        }
    }

    /// Adds `line`, merging quantities when a line with the same name exists.
    pub fn add(&mut self, line: CartLine) -> Result<CartSnapshot, DomainError> {
        if let Some(quantity) = &line.quantity {
            if *quantity <= zero() {
                return Err(DomainError::InvalidInput(format!(
                    "quantity of '{}' must be positive",
                    line.name
                )));
            }
        }

        match self.lines.iter_mut().find(|l| l.name == line.name) {
            Some(existing) => {
                let merged = existing.effective_quantity() + line.effective_quantity();
                existing.quantity = Some(merged);
            }
            None => self.lines.push(line),
        }
        Ok(self.snapshot())
    }

    pub fn increment(&mut self, name: &str) -> CartSnapshot {
        self.adjust(name, one())
    }

    pub fn decrement(&mut self, name: &str) -> CartSnapshot {
        self.adjust(name, -one())
    }

    fn adjust(&mut self, name: &str, delta: BigDecimal) -> CartSnapshot {
        let current = match self.get(name) {
            Some(line) => line.effective_quantity(),
            None => return self.snapshot(),
        };
        self.set_quantity(name, current + delta)
    }

    /// Sets the quantity of a line; zero or below removes it.
    pub fn set_quantity(&mut self, name: &str, quantity: BigDecimal) -> CartSnapshot {
        if quantity <= zero() {
            return self.remove(name);
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.name == name) {
            line.quantity = Some(quantity);
        }
        self.snapshot()
    }

    pub fn remove(&mut self, name: &str) -> CartSnapshot {
        self.lines.retain(|line| line.name != name);
        self.snapshot()
    }

    pub fn clear(&mut self) -> CartSnapshot {
        self.lines.clear();
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn bundle_item(name: &str) -> BundleItem {
        BundleItem {
            name: name.to_string(),
            quantity: Some("1".to_string()),
            origin: Some("France".to_string()),
        }
    }

    #[test]
    fn total_defaults_missing_quantity_to_one() {
        let lines = vec![
            CartLine::new("Tomates", dec("2.50")).with_quantity(dec("3")),
            CartLine::new("Miel", dec("4.00")),
        ];
        assert_eq!(order_total(&lines), dec("11.50"));
    }

    #[test]
    fn total_of_empty_cart_is_zero() {
        assert_eq!(Cart::new().total(), dec("0"));
    }

    #[test]
    fn bundle_label_counts_contents() {
        let line = CartLine::new("Panier", dec("15"))
            .with_quantity(dec("2"))
            .with_contents(vec![bundle_item("a"), bundle_item("b"), bundle_item("c")]);
        assert_eq!(line.quantity_label(), "3 articles");

        let single = CartLine::new("Mini", dec("5")).with_contents(vec![bundle_item("a")]);
        assert_eq!(single.quantity_label(), "1 articles");
    }

    #[test]
    fn weight_label_uses_weight_formatter() {
        let line = CartLine::new("Pommes", dec("3.20"))
            .with_unit("kg")
            .with_weight(dec("1.5"));
        assert_eq!(line.quantity_label(), format_weight(&dec("1.5"), "kg"));
        assert_eq!(line.quantity_label(), "1.5 kg");
    }

    #[test]
    fn weight_is_shown_with_its_own_unit() {
        assert_eq!(format_weight(&dec("0.500"), "kg"), "0.5 kg");
        assert_eq!(format_weight(&dec("0.25"), "kg"), "0.25 kg");
        assert_eq!(format_weight(&dec("250"), "g"), "250 g");
    }

    #[test]
    fn unit_label_uses_quantity() {
        let line = CartLine::new("Oeufs", dec("0.40"))
            .with_unit("boîte")
            .with_quantity(dec("2"));
        assert_eq!(line.quantity_label(), "2 boîte");
    }

    #[test]
    fn fallback_label_is_one_piece() {
        assert_eq!(CartLine::new("Pain", dec("1.20")).quantity_label(), "1 pièce");
        let three = CartLine::new("Pain", dec("1.20")).with_quantity(dec("3"));
        assert_eq!(three.quantity_label(), "3 pièce");
    }

    #[test]
    fn format_decimal_strips_trailing_zeros() {
        assert_eq!(format_decimal(&dec("1.50")), "1.5");
        assert_eq!(format_decimal(&dec("3.000")), "3");
        assert_eq!(format_decimal(&dec("500")), "500");
    }

    #[test]
    fn add_merges_lines_with_same_name() {
        let mut cart = Cart::new();
        cart.add(CartLine::new("Miel", dec("4"))).expect("add");
        let snapshot = cart
            .add(CartLine::new("Miel", dec("4")).with_quantity(dec("2")))
            .expect("add");
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].quantity, Some(dec("3")));
        assert_eq!(snapshot.total, dec("12"));
    }

    #[test]
    fn add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let result = cart.add(CartLine::new("Miel", dec("4")).with_quantity(dec("0")));
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(CartLine::new("Miel", dec("4")).with_quantity(dec("2")))
            .expect("add");
        assert_eq!(cart.decrement("Miel").lines[0].quantity, Some(dec("1")));
        assert!(cart.decrement("Miel").is_empty());
    }

    #[test]
    fn increment_unknown_line_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add(CartLine::new("Miel", dec("4"))).expect("add");
        let snapshot = cart.increment("Pain");
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].quantity, None);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let mut cart = Cart::new();
        let before = cart.add(CartLine::new("Miel", dec("4"))).expect("add");
        cart.clear();
        assert_eq!(before.lines.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn defaulted_quantity_fills_in_one() {
        let line = CartLine::new("Miel", dec("4")).with_defaulted_quantity();
        assert_eq!(line.quantity, Some(dec("1")));
    }
}
