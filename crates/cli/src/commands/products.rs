//! One-shot product listing.

use std::io::Write;

use quickcart_storefront::{Gateway, Storefront};

use crate::terminal::TerminalFrontend;

/// Print the catalog, optionally narrowed by a search term or category.
///
/// # Errors
///
/// Returns the gateway error if the catalog could not be fetched.
pub async fn list<G, W>(
    storefront: &mut Storefront<G, TerminalFrontend<W>>,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>>
where
    G: Gateway,
    W: Write,
{
    // Only the final grid is printed
    storefront.frontend_mut().set_muted(true);
    storefront.refresh_catalog().await?;

    match (search, category) {
        (_, Some(category)) => {
            storefront.filter_by_category(category);
        }
        (Some(term), None) => {
            storefront.search(term);
        }
        (None, None) => {}
    }

    let rendered = storefront.grid().render();
    storefront.frontend_mut().print_rendered(rendered);
    Ok(())
}
