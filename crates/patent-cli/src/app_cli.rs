use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser.
#[derive(Debug, Parser)]
#[command(name = "patentctl", version, about = "Domain-restricted patent evidence search engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download, parse, filter, chunk, and index weekly patent-grant archives.
    Ingest(IngestArgs),
    /// Hybrid lexical/vector search over indexed evidence chunks.
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    #[arg(long, default_value_t = 12)]
    pub weeks: usize,

    #[arg(long, default_value = "G06F")]
    pub cpc: String,

    #[arg(long)]
    pub since_last: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub query: String,

    #[arg(long, default_value_t = 50)]
    pub topk: usize,

    #[arg(long = "topk-bm25", default_value_t = 200)]
    pub topk_bm25: usize,

    #[arg(long = "topk-vec", default_value_t = 200)]
    pub topk_vec: usize,

    #[arg(long = "graph-expand")]
    pub graph_expand: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ingest_defaults_match_the_documented_cli_contract() {
        let cli = Cli::try_parse_from(["patentctl", "ingest"]).unwrap();
        let Commands::Ingest(args) = cli.command else { panic!("expected ingest") };
        assert_eq!(args.weeks, 12);
        assert_eq!(args.cpc, "G06F");
        assert!(!args.since_last);
    }

    #[test]
    fn search_requires_query_and_defaults_the_rest() {
        let cli = Cli::try_parse_from(["patentctl", "search", "--query", "widget"]).unwrap();
        let Commands::Search(args) = cli.command else { panic!("expected search") };
        assert_eq!(args.query, "widget");
        assert_eq!(args.topk, 50);
        assert_eq!(args.topk_bm25, 200);
        assert_eq!(args.topk_vec, 200);
        assert!(!args.graph_expand);
    }

    #[test]
    fn search_without_query_fails_to_parse() {
        assert!(Cli::try_parse_from(["patentctl", "search"]).is_err());
    }
}
