//! Line-oriented terminal shell over a [`PosSession`].

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table};

use pizzeria_billing::PaymentStatus;
use pizzeria_cart::CartRepository;
use pizzeria_core::{Category, ItemId, Money};

use crate::printer::{ReceiptPrinter, TextReceiptPrinter};
use crate::session::{PosError, PosSession};

const PROMPT: &str = "pizzeria> ";

/// One shell line; the command word comes first, there is no binary name.
#[derive(Debug, Parser)]
#[command(
    name = "pizzeria",
    no_binary_name = true,
    disable_version_flag = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Show the menu (pizzas, toppings, beverages)
    Menu {
        #[arg(value_parser = parse_category)]
        category: Option<Category>,
    },
    /// Tick an item, optionally with a quantity (1-10)
    Pick {
        #[arg(value_parser = parse_category)]
        category: Category,
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
        quantity: Option<u32>,
    },
    /// Untick an item
    Unpick {
        #[arg(value_parser = parse_category)]
        category: Category,
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },
    /// Add the ticked items of a category to the cart
    Add {
        #[arg(value_parser = parse_category)]
        category: Category,
    },
    /// Show the cart
    Cart,
    /// Set the customer name
    Customer {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Set the customer telephone
    Phone {
        #[arg(required = true, num_args = 1..)]
        number: Vec<String>,
    },
    /// Record the amount tendered, e.g. `pay Rs. 3,500`
    Pay {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        amount: Vec<String>,
    },
    /// Show the invoice
    Bill,
    /// Confirm payment
    Confirm,
    /// Print the receipt
    Print,
    /// Clear the cart and start a new sale
    New,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Parse one input line. Help requests come back as errors whose rendering
/// is the help text (see [`clap::Error::kind`]).
pub fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>()
        .map_err(|_| "expected pizza, topping or beverage".to_string())
}

fn parse_item_id(raw: &str) -> Result<ItemId, String> {
    raw.trim_start_matches('#')
        .parse::<ItemId>()
        .map_err(|_| "expected a numeric item id".to_string())
}

enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until `quit` or end of input, writing
/// responses to `output`. Command failures are reported and the loop goes on;
/// only I/O failures on `output`/`input` end it with an error.
pub fn run<R, I, O>(session: &mut PosSession<R>, input: I, mut output: O) -> io::Result<()>
where
    R: CartRepository,
    I: BufRead,
    O: Write,
{
    writeln!(output, "Type `help` for commands.")?;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                // Usage errors render with their own `error:` prefix; help has none.
                writeln!(output, "{}", err.render().to_string().trim_end())?;
                continue;
            }
        };
        tracing::debug!(?command, "shell command");

        match execute(session, command, &mut output) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(PosError::Print(err)) => return Err(io::Error::other(err)),
            Err(err) => writeln!(output, "error: {err}")?,
        }
    }
    Ok(())
}

fn execute<R, O>(
    session: &mut PosSession<R>,
    command: ShellCommand,
    out: &mut O,
) -> Result<Flow, PosError>
where
    R: CartRepository,
    O: Write,
{
    match command {
        ShellCommand::Menu { category } => {
            let categories = match category {
                Some(c) => vec![c],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                show_menu(session, category, out)?;
            }
        }
        ShellCommand::Pick {
            category,
            id,
            quantity,
        } => {
            session.pick(category, id, quantity)?;
            let qty = session
                .sheet(category)
                .and_then(|s| s.quantity(id))
                .unwrap_or(1);
            say(out, format!("ticked {category} #{id} x{qty}"))?;
        }
        ShellCommand::Unpick { category, id } => {
            if session.unpick(category, id)? {
                say(out, format!("unticked {category} #{id}"))?;
            } else {
                say(out, format!("{category} #{id} was not ticked"))?;
            }
        }
        ShellCommand::Add { category } => {
            let outcome = session.add_selected(category)?;
            say(
                out,
                format!(
                    "cart updated: {} new, {} increased ({} lines)",
                    outcome.appended,
                    outcome.incremented,
                    session.cart().len()
                ),
            )?;
        }
        ShellCommand::Cart => show_cart(session, out)?,
        ShellCommand::Customer { name } => {
            session.set_customer_name(name.join(" "));
            say(out, "customer name set")?;
        }
        ShellCommand::Phone { number } => {
            session.set_telephone(number.join(" "));
            say(out, "customer telephone set")?;
        }
        ShellCommand::Pay { amount } => {
            let amount = session.set_tendered(&amount.join(" "))?;
            say(out, format!("tendered {amount}"))?;
        }
        ShellCommand::Bill => show_bill(session, out)?,
        ShellCommand::Confirm => {
            let was_confirmed = session.status() == PaymentStatus::Confirmed;
            session.confirm(Utc::now())?;
            if was_confirmed {
                say(out, "payment already confirmed")?;
            } else {
                say(out, "payment confirmed")?;
            }
        }
        ShellCommand::Print => {
            let receipt = session.receipt(Utc::now())?;
            TextReceiptPrinter::new(&mut *out).print(&receipt)?;
        }
        ShellCommand::New => {
            session.new_sale()?;
            say(out, "new sale started")?;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn say<O: Write>(out: &mut O, text: impl Display) -> Result<(), PosError> {
    writeln!(out, "{text}").map_err(|e| PosError::Print(e.into()))
}

fn amount_cell(amount: Money) -> Cell {
    Cell::new(amount).set_alignment(CellAlignment::Right)
}

fn show_menu<R, O>(session: &PosSession<R>, category: Category, out: &mut O) -> Result<(), PosError>
where
    R: CartRepository,
    O: Write,
{
    say(out, format!("== {} ==", category.collection()))?;
    let items = session.catalog().items(category);
    if items.is_empty() {
        return say(out, "  (no items available)");
    }

    let sheet = session.sheet(category);
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Picked"),
        Cell::new("#"),
        Cell::new("Item"),
        Cell::new("Price"),
        Cell::new(""),
    ]);
    for item in items {
        let picked = match sheet.and_then(|s| s.quantity(item.id)) {
            Some(qty) => format!("x{qty}"),
            None => String::new(),
        };
        let availability = if item.is_active { "" } else { "unavailable" };
        table.add_row(vec![
            Cell::new(picked),
            Cell::new(item.id),
            Cell::new(item.label()),
            amount_cell(item.price),
            Cell::new(availability),
        ]);
    }
    say(out, table)
}

fn show_cart<R, O>(session: &PosSession<R>, out: &mut O) -> Result<(), PosError>
where
    R: CartRepository,
    O: Write,
{
    let cart = session.cart();
    if cart.is_empty() {
        return say(out, "cart is empty");
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Category"),
        Cell::new("#"),
        Cell::new("Item"),
        Cell::new("Qty"),
        Cell::new("Price"),
        Cell::new("Amount"),
    ]);
    for line in cart.lines() {
        let total = match line.line_total() {
            Some(total) => amount_cell(total),
            None => Cell::new("overflow"),
        };
        table.add_row(vec![
            Cell::new(line.category()),
            Cell::new(line.item_id()),
            Cell::new(line.label()),
            Cell::new(line.quantity()).set_alignment(CellAlignment::Right),
            amount_cell(line.price()),
            total,
        ]);
    }
    say(out, table)?;
    say(out, format!("{} items", cart.total_quantity()))
}

fn show_bill<R, O>(session: &PosSession<R>, out: &mut O) -> Result<(), PosError>
where
    R: CartRepository,
    O: Write,
{
    let invoice = session.invoice()?;

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Item"),
        Cell::new("Qty"),
        Cell::new("Price"),
        Cell::new("Amount"),
    ]);
    for line in invoice.lines() {
        table.add_row(vec![
            Cell::new(&line.label),
            Cell::new(line.quantity).set_alignment(CellAlignment::Right),
            amount_cell(line.unit_price),
            amount_cell(line.line_total),
        ]);
    }
    let tax_label = format!("Tax ({})", invoice.tax_rate_label());
    let totals = [
        ("Subtotal", invoice.subtotal()),
        (tax_label.as_str(), invoice.tax()),
        ("Total", invoice.total()),
        ("Paid", invoice.amount_paid()),
        ("Balance", invoice.balance()),
    ];
    for (label, amount) in totals {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(""),
            Cell::new(""),
            amount_cell(amount),
        ]);
    }
    say(out, table)?;

    let status = match session.status() {
        PaymentStatus::Confirmed => "confirmed",
        PaymentStatus::Unconfirmed if invoice.is_paid() => "paid, awaiting confirmation",
        PaymentStatus::Unconfirmed => "unpaid",
    };
    say(out, format!("Status: {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_line("menu").unwrap(),
            ShellCommand::Menu { category: None }
        );
        assert_eq!(
            parse_line("menu drinks").unwrap(),
            ShellCommand::Menu {
                category: Some(Category::Beverage)
            }
        );
        assert_eq!(
            parse_line("pick pizza 1 2").unwrap(),
            ShellCommand::Pick {
                category: Category::Pizza,
                id: ItemId::new(1),
                quantity: Some(2)
            }
        );
        assert_eq!(
            parse_line("pick toppings #5").unwrap(),
            ShellCommand::Pick {
                category: Category::Topping,
                id: ItemId::new(5),
                quantity: None
            }
        );
        assert_eq!(
            parse_line("add beverage").unwrap(),
            ShellCommand::Add {
                category: Category::Beverage
            }
        );
        assert_eq!(
            parse_line("customer  Asha Khan ").unwrap(),
            ShellCommand::Customer {
                name: vec!["Asha".into(), "Khan".into()]
            }
        );
        assert_eq!(
            parse_line("pay Rs. 3,500").unwrap(),
            ShellCommand::Pay {
                amount: vec!["Rs.".into(), "3,500".into()]
            }
        );
        assert_eq!(
            parse_line("pay -5").unwrap(),
            ShellCommand::Pay {
                amount: vec!["-5".into()]
            }
        );
        assert_eq!(parse_line("exit").unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn reports_parse_failures_by_kind() {
        let kind = |line: &str| parse_line(line).unwrap_err().kind();

        assert_eq!(kind("dance"), ErrorKind::InvalidSubcommand);
        assert_eq!(kind("pick pizza"), ErrorKind::MissingRequiredArgument);
        assert_eq!(kind("pay"), ErrorKind::MissingRequiredArgument);
        assert_eq!(kind("pick dessert 1"), ErrorKind::ValueValidation);
        assert_eq!(kind("unpick pizza one"), ErrorKind::ValueValidation);
        assert!(parse_line("pick pizza 1 lots").is_err());
    }

    #[test]
    fn help_is_rendered_from_the_command_definitions() {
        let err = parse_line("help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let text = err.render().to_string();
        assert!(text.contains("Tick an item, optionally with a quantity (1-10)"));
        assert!(text.contains("Record the amount tendered"));
    }
}
