use clap::{ArgAction, Parser};
use ordered_tree::Tree;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Builds a tree from a list of keys, then reports its minimum, one search and its validity.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Keys to insert, in order
    #[arg(
        long,
        env = "ORDERED_TREE_KEYS",
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "10,5,15,3,7,12,18"
    )]
    keys: Vec<i64>,

    /// Key to look up after inserting
    #[arg(
        long,
        env = "ORDERED_TREE_SEARCH",
        allow_negative_numbers = true,
        default_value_t = 7
    )]
    search: i64,

    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    println!("--- Binary Search Tree Demo ---");

    let mut tree = Tree::new();
    println!("Inserting values: {:?}", cli.keys);
    for &key in &cli.keys {
        tree.insert(key);
    }

    match tree.get_minimum() {
        Some(min) => println!("Minimum value: {}", min),
        None => println!("Minimum value: none (empty tree)"),
    }

    let found = tree.search_iterative(&cli.search).is_some();
    println!(
        "Search for {}: {}",
        cli.search,
        if found { "Found" } else { "Not Found" }
    );

    match tree.verify() {
        Ok(()) => println!("Is tree valid?: true"),
        Err(e) => println!("Is tree valid?: false ({})", e),
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!(?filter, "logging initialised");
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn defaults_reproduce_demo_scenario() {
        let cli = Cli::try_parse_from(["ordered-tree"]).unwrap();
        assert_eq!(cli.keys, vec![10, 5, 15, 3, 7, 12, 18]);
        assert_eq!(cli.search, 7);
        assert_eq!(cli.debug, 0);
    }

    #[test]
    fn parses_comma_separated_keys() {
        let cli =
            Cli::try_parse_from(["ordered-tree", "--keys", "5,-5,5", "--search", "-5", "-dd"])
                .unwrap();
        assert_eq!(cli.keys, vec![5, -5, 5]);
        assert_eq!(cli.search, -5);
        assert_eq!(cli.debug, 2);
    }

    #[test]
    fn rejects_non_numeric_keys() {
        assert!(Cli::try_parse_from(["ordered-tree", "--keys", "1,two"]).is_err());
    }
}
