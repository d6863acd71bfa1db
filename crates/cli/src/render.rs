//! Text rendering for products and the cart.
//!
//! Amounts are printed the way the storefront displays them: French digit
//! grouping followed by the currency suffix, e.g. `350 000 FCFA`.

use std::fmt::Write;

use boutique_core::{Price, Product};
use boutique_storefront::CartLine;

const CURRENCY_SUFFIX: &str = "FCFA";
/// Narrow no-break space, the fr-FR group separator.
const GROUP_SEPARATOR: char = '\u{202f}';

/// Format an amount with thousands grouping and the currency suffix.
#[must_use]
pub fn format_price(price: Price) -> String {
    let digits = price.minor_units().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 6);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }
    format!("{grouped} {CURRENCY_SUFFIX}")
}

/// Render a product listing.
#[must_use]
pub fn products(products: &[&Product]) -> String {
    if products.is_empty() {
        return "Aucun produit ne correspond à votre recherche\n".to_string();
    }
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "[{:>3}] {:<22} {:<10} {:>14}",
            product.id.as_i32(),
            product.name,
            product.category.label(),
            format_price(product.price)
        );
        let _ = writeln!(out, "      {}", product.description);
    }
    out
}

/// Render cart lines followed by the item count and total.
#[must_use]
pub fn cart(lines: &[CartLine], item_count: u64, total: Price) -> String {
    if lines.is_empty() {
        let total = format_price(Price::ZERO);
        return format!("Votre panier est vide\nTotal : {total}\n");
    }
    let mut out = String::new();
    for line in lines {
        let _ = writeln!(
            out,
            "[{:>3}] {:<22} {:>14} x {:<3} = {:>14}",
            line.id().as_i32(),
            line.product.name,
            format_price(line.product.price),
            line.quantity,
            format_price(line.line_total())
        );
    }
    let _ = writeln!(out, "Articles : {item_count}");
    let _ = writeln!(out, "Total : {}", format_price(total));
    out
}
