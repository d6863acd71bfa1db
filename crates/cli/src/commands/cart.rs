//! Cart commands.

use std::io::Write;

use boutique_core::ProductId;
use boutique_storefront::Action;

use super::{CliSession, print_notices};
use crate::render;

/// Print the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show(session: &CliSession, out: &mut impl Write) -> std::io::Result<()> {
    let cart = session.cart();
    out.write_all(
        render::cart(cart.lines(), cart.total_item_count(), cart.total_price()).as_bytes(),
    )
}

/// Add one unit of a product, then print the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn add(session: &mut CliSession, id: ProductId, out: &mut impl Write) -> std::io::Result<()> {
    if session.catalog().get(id).is_none() {
        tracing::warn!(%id, "No such product");
    }
    apply(session, Action::AddToCart(id), out)
}

/// Remove a product line, then print the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn remove(
    session: &mut CliSession,
    id: ProductId,
    out: &mut impl Write,
) -> std::io::Result<()> {
    apply(session, Action::RemoveFromCart(id), out)
}

/// Change a line's quantity, then print the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn adjust(
    session: &mut CliSession,
    id: ProductId,
    delta: i32,
    out: &mut impl Write,
) -> std::io::Result<()> {
    apply(session, Action::AdjustQuantity { id, delta }, out)
}

/// Empty the cart once confirmed.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn clear(
    session: &mut CliSession,
    confirmed: bool,
    out: &mut impl Write,
) -> std::io::Result<()> {
    if !confirmed {
        writeln!(
            out,
            "Voulez-vous vraiment vider le panier ? Relancez avec --yes pour confirmer."
        )?;
        return Ok(());
    }
    apply(session, Action::ClearCart, out)
}

/// Print the cart being ordered, then place the order.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn checkout(session: &mut CliSession, out: &mut impl Write) -> std::io::Result<()> {
    if !session.cart().is_empty() {
        show(session, out)?;
    }
    let notices = session.dispatch(Action::Checkout);
    print_notices(&notices, out)
}

fn apply(session: &mut CliSession, action: Action, out: &mut impl Write) -> std::io::Result<()> {
    let notices = session.dispatch(action);
    print_notices(&notices, out)?;
    show(session, out)
}
