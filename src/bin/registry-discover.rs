//! registry-discover: list the functions, agents and models visible to the token

mod common;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use surrogate_pipeline::registry::{JobService, RegistryClient, RegistryItem};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Listing {
    Functions,
    Agents,
    Models,
    All,
}

#[derive(Parser, Debug)]
#[command(name = "registry-discover")]
#[command(about = "Discover registry functions, agents and models")]
struct Args {
    /// What to list
    #[arg(long, value_enum, default_value_t = Listing::All)]
    list: Listing,

    /// Page size
    #[arg(long, default_value_t = 50)]
    size: usize,
}

fn print_section(title: &str, size: usize, items: &[RegistryItem]) {
    println!("=== {title} (first {size}) ===");
    for item in items {
        println!("- {} :: {}", item.label(), item.display());
    }
    println!();
}

fn main() -> Result<()> {
    let args = Args::parse();
    common::init_tracing();

    let client = RegistryClient::from_env()?;
    let wants = |listing: Listing| args.list == Listing::All || args.list == listing;

    if wants(Listing::Functions) {
        print_section("Functions", args.size, &client.list_functions(args.size)?);
    }
    if wants(Listing::Agents) {
        print_section("Agents", args.size, &client.list_agents(args.size)?);
    }
    if wants(Listing::Models) {
        print_section("Models", args.size, &client.list_models(args.size)?);
    }
    Ok(())
}
