//! Plain-text rendering of the list and detail screens

use domain_products::Product;
use std::fmt::Write;

use crate::view::ListSnapshot;

const NAME_WIDTH: usize = 36;

pub fn render_list(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();

    let _ = write!(out, "Products ({})", snapshot.products_number);
    if !snapshot.filter.is_empty() {
        let _ = write!(out, " matching \"{}\"", snapshot.filter);
    }
    let _ = writeln!(out, "    Favourites: {}", snapshot.favourites);
    let _ = writeln!(out, "{}", "-".repeat(60));

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {}", error);
    } else if !snapshot.loaded {
        let _ = writeln!(out, "Loading products...");
    } else if snapshot.page.is_empty() {
        let _ = writeln!(out, "No products found.");
    }

    for (row, product) in snapshot.page.iter().enumerate() {
        let marker = match &snapshot.selected {
            Some(selected) if selected.id == product.id => '>',
            _ => ' ',
        };
        let favourite = if snapshot.favourite_ids.contains(&product.id) {
            " *"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{}{}{}",
            marker,
            product_line(row + 1, product),
            favourite
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(60));
    let _ = writeln!(
        out,
        "{} Page {} of {} {}",
        if snapshot.has_previous { "[p]<" } else { "    " },
        snapshot.current_page,
        snapshot.page_count,
        if snapshot.has_next { ">[n]" } else { "" },
    );

    if snapshot.loading && snapshot.loaded {
        let _ = writeln!(out, "Refreshing...");
    }
    if let Some(product) = &snapshot.notification {
        let _ = writeln!(out, "* {} added to favourites", product.name);
    }

    out
}

pub fn render_detail(product: Option<&Product>) -> String {
    let Some(product) = product else {
        return "Product not found.\n[b] back to list\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.name, product.id);
    let _ = writeln!(out, "{}", "-".repeat(60));
    let _ = writeln!(out, "Price:       {}", product.display_price());
    if let Some(description) = &product.description {
        let _ = writeln!(out, "Description: {}", description);
    }
    if let Some(image_url) = &product.image_url {
        let _ = writeln!(out, "Image:       {}", image_url);
    }
    if let Some(modified) = &product.modified_date {
        let _ = writeln!(out, "Modified:    {}", modified.format("%Y-%m-%d %H:%M"));
    }
    if product.fixed_price {
        let _ = writeln!(out, "Fixed price");
    }
    if product.discontinued {
        let _ = writeln!(out, "Discontinued");
    }
    let _ = writeln!(out, "[b] back to list");
    out
}

pub fn help() -> &'static str {
    "\
/<text>   filter by name (3+ characters, '/' alone clears)
n / p     next / previous page
s <row>   open product on row
f <row>   add product on row to favourites
r         refresh the catalog
g <path>  open a route, e.g. 'g /products/3'
b         back to the list
q         quit
"
}

fn product_line(row: usize, product: &Product) -> String {
    let mut name: String = product.name.chars().take(NAME_WIDTH).collect();
    if product.discontinued {
        name.push_str(" (discontinued)");
    }
    format!(
        "{:>2}. {:<width$} {:>10}",
        row,
        name,
        product.display_price(),
        width = NAME_WIDTH
    )
}
