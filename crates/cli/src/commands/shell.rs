//! Interactive storefront shell.
//!
//! Reads one command per line from stdin. Every command maps onto a single
//! storefront operation; errors are printed and the shell keeps going.

use std::io::Write;

use askama::Template;
use clap::{Parser, Subcommand};
use quickcart_core::{OrderId, ProductId};
use quickcart_storefront::gateway::{Credentials, Registration};
use quickcart_storefront::view::{OrderDetailView, OrderListView};
use quickcart_storefront::{Gateway, Storefront, StorefrontError};
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::terminal::TerminalFrontend;

const PROMPT: &str = "quickcart> ";

/// One shell line. The first word is the command.
#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum ShellCommand {
    /// Show every product
    Products,
    /// Search names, descriptions and categories
    Search {
        #[arg(trailing_var_arg = true)]
        term: Vec<String>,
    },
    /// Show one category (exact label)
    Category {
        #[arg(trailing_var_arg = true, required = true)]
        label: Vec<String>,
    },
    /// List category labels
    Categories,
    /// Add one unit of a product to the cart
    Add { id: i32 },
    /// Remove a product from the cart
    Remove { id: i32 },
    /// Change a cart quantity by a signed amount
    Qty {
        id: i32,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Show the cart
    Cart,
    /// Empty the cart
    Clear,
    /// Create an account and sign in
    Register {
        email: String,
        password: String,
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },
    /// Sign in
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Place an order for the cart
    Checkout,
    /// List past orders
    Orders,
    /// Show one past order
    Order { id: i32 },
    /// Reload the product list
    Refresh,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if stdin cannot be read.
pub async fn run<G, W>(
    storefront: &mut Storefront<G, TerminalFrontend<W>>,
) -> Result<(), Box<dyn std::error::Error>>
where
    G: Gateway,
    W: Write,
{
    if let Err(e) = storefront.start().await {
        e.capture();
        tracing::warn!(error = %e, "Starting without a catalog");
    }
    storefront
        .frontend_mut()
        .line("Type `help` for a list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(storefront.frontend_mut());

    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        if !words.is_empty() {
            match ShellLine::try_parse_from(words) {
                Ok(parsed) => {
                    if execute(storefront, parsed.command).await == Flow::Quit {
                        break;
                    }
                }
                Err(e) => storefront
                    .frontend_mut()
                    .line(e.render().to_string().trim_end()),
            }
        }
        prompt(storefront.frontend_mut());
    }

    Ok(())
}

fn prompt<W: Write>(frontend: &mut TerminalFrontend<W>) {
    frontend.prompt(PROMPT);
}

async fn execute<G, W>(
    storefront: &mut Storefront<G, TerminalFrontend<W>>,
    command: ShellCommand,
) -> Flow
where
    G: Gateway,
    W: Write,
{
    tracing::debug!(?command, "Shell command");

    match command {
        ShellCommand::Products => {
            storefront.show_all();
        }
        ShellCommand::Search { term } => {
            storefront.search(&term.join(" "));
        }
        ShellCommand::Category { label } => {
            storefront.filter_by_category(&label.join(" "));
        }
        ShellCommand::Categories => {
            let labels = storefront.catalog().categories().join(", ");
            storefront.frontend_mut().line(&labels);
        }
        ShellCommand::Add { id } => {
            if !storefront.add_item(ProductId::new(id)) {
                storefront
                    .frontend_mut()
                    .line(&format!("No product with id {id}"));
            }
        }
        ShellCommand::Remove { id } => {
            storefront.remove_item(ProductId::new(id));
        }
        ShellCommand::Qty { id, delta } => {
            storefront.change_quantity(ProductId::new(id), delta);
        }
        ShellCommand::Cart => storefront.frontend_mut().show_cart(),
        ShellCommand::Clear => storefront.clear_cart(),
        ShellCommand::Register {
            email,
            password,
            name,
        } => {
            let registration = Registration {
                email,
                password: SecretString::from(password),
                name: name.join(" "),
            };
            if let Err(e) = storefront.register(&registration).await {
                report(storefront.frontend_mut(), &e);
            }
        }
        ShellCommand::Login { email, password } => {
            let credentials = Credentials {
                email,
                password: SecretString::from(password),
            };
            if let Err(e) = storefront.login(&credentials).await {
                report(storefront.frontend_mut(), &e);
            }
        }
        ShellCommand::Logout => storefront.logout(),
        ShellCommand::Whoami => {
            let text = whoami(storefront);
            storefront.frontend_mut().line(&text);
        }
        ShellCommand::Checkout => {
            // Outcome already reported through the frontend
            if let Err(e) = storefront.place_order().await {
                e.capture();
                tracing::debug!(error = %e, "Checkout did not complete");
            }
        }
        ShellCommand::Orders => match storefront.order_history().await {
            Ok(orders) => {
                let rendered = OrderListView::from(orders.as_slice()).render();
                storefront.frontend_mut().print_rendered(rendered);
            }
            Err(e) => report(storefront.frontend_mut(), &e),
        },
        ShellCommand::Order { id } => match storefront.order_details(OrderId::new(id)).await {
            Ok(order) => {
                let rendered = OrderDetailView::from(&order).render();
                storefront.frontend_mut().print_rendered(rendered);
            }
            Err(e) => report(storefront.frontend_mut(), &e),
        },
        ShellCommand::Refresh => {
            if let Err(e) = storefront.refresh_catalog().await {
                e.capture();
                tracing::debug!(error = %e, "Refresh failed");
            }
        }
        ShellCommand::Quit => return Flow::Quit,
    }

    Flow::Continue
}

/// Print a failed operation's error, sending unexpected ones to Sentry.
fn report<W: Write>(frontend: &mut TerminalFrontend<W>, error: &StorefrontError) {
    error.capture();
    frontend.error(error);
}

fn whoami<G: Gateway, W: Write>(storefront: &Storefront<G, TerminalFrontend<W>>) -> String {
    match (storefront.user(), storefront.session().is_authenticated()) {
        (Some(user), _) => match &user.email {
            Some(email) => format!("{} <{email}>", user.name),
            None => user.name.clone(),
        },
        (None, true) => "Signed in from a saved session. Log in again to check out.".to_string(),
        (None, false) => "Not signed in.".to_string(),
    }
}
