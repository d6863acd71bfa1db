//! Catalog listing.

use std::io::Write;

use boutique_storefront::{Action, CategoryFilter, SortKey};

use super::CliSession;
use crate::render;

/// List products matching the category, search term and sort order.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn list(
    session: &mut CliSession,
    category: &str,
    search: String,
    sort: &str,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let filter = CategoryFilter::parse(category);
    if let CategoryFilter::Unknown(code) = &filter {
        tracing::warn!(category = %code, "Unknown category; no product will match");
    }

    let _ = session.dispatch(Action::SelectCategory(filter));
    let _ = session.dispatch(Action::Search(search));
    let _ = session.dispatch(Action::Sort(SortKey::parse(sort)));

    let view = session.view();
    tracing::info!(
        shown = view.len(),
        total = session.catalog().len(),
        "Listing products"
    );
    out.write_all(render::products(&view).as_bytes())
}
