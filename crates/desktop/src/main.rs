//! Terminal front-end for the shop screen.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use tillpoint_catalog::{FilterKind, JsonFileInventoryService};
use tillpoint_core::StockId;
use tillpoint_desktop::shop::{CLEAR_CART_PROMPT, CLOSE_PROMPT, LOGOUT_PROMPT};
use tillpoint_desktop::{CloseChoice, PosShop, ShopConfig, render};
use tillpoint_observability::LogFormat;

/// Point-of-sale shop shell
#[derive(Debug, Parser)]
#[command(name = "tillpoint", version)]
struct Args {
    /// Catalog JSON file (overrides TILLPOINT_CATALOG_PATH)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

const HELP: &str = "\
commands:
  list                         show the catalog
  search <text>                fuzzy search by name (empty clears)
  brand <name> on|off          toggle a brand filter
  category <name> on|off       toggle a category filter
  add <stock-id> <qty>         put items in the cart
  inc <stock-id>               one more
  dec <stock-id>               one less (removes at 1)
  clear                        empty the cart
  cart                         show the cart
  checkout                     snapshot the cart for payment
  refresh                      reload the catalog
  logout                       leave the shop
  quit                         close the shop";

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ShopConfig::from_env().context("invalid shop configuration")?;
    if let Some(path) = args.catalog {
        config.set_catalog_path(path);
    }
    if args.json_logs {
        config.set_log_format(LogFormat::Json);
    }
    tillpoint_observability::init(&config.log_filter, config.log_format);
    config.log_defaults();

    tracing::info!(catalog = %config.catalog_path.display(), "starting shop");
    let service = Arc::new(JsonFileInventoryService::new(config.catalog_path.clone()));
    let (mut shop, mut messages) = PosShop::new(config, service);
    shop.refresh();

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            Some(message) = messages.recv() => {
                shop.handle_message(message);
                print_notices(&mut shop);
                if !shop.is_fetching() {
                    println!("{}", render::catalog_table(shop.catalog_view()));
                }
            }
            line = input.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if !run_command(&mut shop, &mut input, line.trim()).await? {
                    break;
                }
                print_notices(&mut shop);
            }
        }
    }

    tracing::info!("shop closed");
    Ok(())
}

/// Returns `false` when the shell should exit.
async fn run_command(shop: &mut PosShop, input: &mut Input, line: &str) -> anyhow::Result<bool> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "help" => println!("{HELP}"),
        "list" => {
            println!("{}", render::filter_list("Brands", shop.brand_options()));
            println!("{}", render::filter_list("Categories", shop.category_options()));
            println!("{}", render::catalog_table(shop.catalog_view()));
        }
        "search" => shop.set_search_text(rest),
        "brand" | "category" => {
            let kind = if command == "brand" {
                FilterKind::Brand
            } else {
                FilterKind::Category
            };
            match rest.rsplit_once(' ') {
                Some((name, "on")) => shop.toggle_filter(kind, name.trim(), true),
                Some((name, "off")) => shop.toggle_filter(kind, name.trim(), false),
                _ => println!("usage: {command} <name> on|off"),
            }
        }
        "add" => {
            let mut parts = rest.split_whitespace();
            match (parse_id(parts.next()), parts.next().and_then(|q| q.parse::<i64>().ok())) {
                (Some(id), Some(qty)) => {
                    if shop.add_to_cart(id, qty).is_ok() {
                        println!("{}", render::cart_table(shop.cart_view()));
                    }
                }
                _ => println!("usage: add <stock-id> <qty>"),
            }
        }
        "inc" | "dec" => match parse_id(Some(rest)) {
            Some(id) => {
                let result = if command == "inc" {
                    shop.increment(id)
                } else {
                    shop.decrement(id)
                };
                if result.is_ok() {
                    println!("{}", render::cart_table(shop.cart_view()));
                }
            }
            None => println!("usage: {command} <stock-id>"),
        },
        "clear" => {
            let yes = confirm(input, CLEAR_CART_PROMPT).await?;
            if shop.clear_cart(|_| yes) {
                println!("{}", render::cart_table(shop.cart_view()));
            }
        }
        "cart" => println!("{}", render::cart_table(shop.cart_view())),
        "checkout" => {
            if let Ok(request) = shop.checkout() {
                println!("{}", render::checkout_summary(&request));
            }
        }
        "refresh" => {
            if !shop.refresh() {
                println!("catalog is already loading");
            }
        }
        "logout" => {
            let proceed = if shop.cart().is_empty() {
                true
            } else {
                confirm(input, LOGOUT_PROMPT).await?
            };
            if shop.before_logout(|_| proceed) {
                return Ok(false);
            }
        }
        "quit" | "exit" => {
            let choice = if shop.cart().is_empty() {
                CloseChoice::Save
            } else {
                close_choice(input).await?
            };
            if shop.before_close(|_| choice) {
                return Ok(false);
            }
        }
        other => println!("unknown command {other:?}; try `help`"),
    }

    // Patches are for incremental front-ends; this shell redraws whole tables.
    shop.take_patches();
    Ok(true)
}

fn parse_id(raw: Option<&str>) -> Option<StockId> {
    raw.and_then(|raw| raw.parse().ok())
}

fn print_notices(shop: &mut PosShop) {
    for notice in shop.take_notices() {
        println!("{}", render::notice(&notice));
    }
}

async fn confirm(input: &mut Input, prompt: &str) -> anyhow::Result<bool> {
    println!("{prompt} [y/N]");
    let answer = input.next_line().await.context("failed to read input")?;
    Ok(matches!(
        answer.as_deref().map(str::trim),
        Some("y" | "Y" | "yes")
    ))
}

async fn close_choice(input: &mut Input) -> anyhow::Result<CloseChoice> {
    println!("{CLOSE_PROMPT} [s]ave / [d]iscard / [c]ancel");
    let answer = input.next_line().await.context("failed to read input")?;
    Ok(match answer.as_deref().map(str::trim) {
        Some("s" | "save") => CloseChoice::Save,
        Some("d" | "discard") => CloseChoice::Discard,
        _ => CloseChoice::Cancel,
    })
}
