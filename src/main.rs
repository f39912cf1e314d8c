use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};

use subnetcalc::config_loader;
use subnetcalc::ip::{Cidr, SubnetTree};
use subnetcalc::orchestrator;
use subnetcalc::render;

/// Hierarchical IPv4 subnet reservation and free-block allocation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show mask, size and host range of a network
    Info {
        /// Network in CIDR notation, e.g. 10.0.0.0/16
        cidr: Cidr,
    },

    /// Split a network a fixed number of levels and print the result
    Divide {
        /// Network in CIDR notation
        cidr: Cidr,

        /// Number of levels to split below the network
        #[arg(short, long, default_value_t = 2)]
        depth: u8,

        /// Only print blocks that were not split further
        #[arg(long)]
        leaves_only: bool,
    },

    /// Find the lowest free block of a given size
    Find {
        /// Network in CIDR notation
        network: Cidr,

        /// Prefix length of the wanted block
        #[arg(short, long)]
        size: u8,

        /// Blocks that are already in use (repeatable)
        #[arg(short, long)]
        taken: Vec<Cidr>,
    },

    /// Apply an allocation plan file and report the reservations
    Plan {
        /// Path to the plan YAML file
        path: PathBuf,

        /// Output format for the reservation listing
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also print the partition tree
        #[arg(long)]
        tree: bool,

        /// Only print unsplit blocks when printing the tree
        #[arg(long, requires = "tree")]
        leaves_only: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    match args.command {
        Command::Info { cidr } => print_info(cidr),
        Command::Divide {
            cidr,
            depth,
            leaves_only,
        } => {
            let mut tree = SubnetTree::new(cidr);
            tree.divide_recursively(tree.root(), depth);
            info!("Materialised {} block(s) under {}", tree.node_count(), cidr);
            print!("{}", render::render_tree(&tree, tree.root(), leaves_only));
        }
        Command::Find {
            network,
            size,
            taken,
        } => {
            let mut tree = SubnetTree::new(network);
            let root = tree.root();
            for block in &taken {
                tree.add_reservation_cidr(root, *block, "taken")
                    .wrap_err_with(|| format!("Cannot mark {} as taken", block))?;
            }
            let found = tree
                .find_free(root, size)
                .wrap_err_with(|| format!("No free /{} in {}", size, network))?;
            println!("{}", tree.node(found).cidr());
        }
        Command::Plan {
            path,
            format,
            tree,
            leaves_only,
        } => {
            let plan = config_loader::load_plan(&path)?;
            let outcome = orchestrator::execute_plan(&plan)?;
            if !outcome.is_complete() {
                warn!(
                    "Plan '{}' was only partially applied: {} conflict(s), {} unsatisfied request(s)",
                    path.display(),
                    outcome.conflicts.len(),
                    outcome.unsatisfied.len()
                );
            }

            let report = outcome.report();
            match format {
                OutputFormat::Text => print!(
                    "{}",
                    render::render_reservations(&report.network.to_string(), &report.reservations)
                ),
                OutputFormat::Json => println!(
                    "{}",
                    render::render_json(&report).wrap_err("Failed to serialize plan report")?
                ),
            }

            if tree {
                print!(
                    "{}",
                    render::render_tree(&outcome.tree, outcome.tree.root(), leaves_only)
                );
            }
        }
    }

    Ok(())
}

fn print_info(cidr: Cidr) {
    let tree = SubnetTree::new(cidr);
    let node = tree.root_node();
    println!("Network:    {}", cidr);
    println!("Netmask:    {}", cidr.netmask());
    println!("Addresses:  {}", cidr.address_count());
    println!("First host: {}", node.first_ip());
    println!("Last host:  {}", node.last_ip());
}
