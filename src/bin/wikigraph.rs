//! wikigraph CLI tool
//!
//! Command-line interface for turning wiki dumps into link graphs and extracting query
//! subgraphs from them.
//!
//! ## Commands
//!
//! - `build <dump>`: Scan redirects, optionally export a text corpus, and build the link graph
//! - `query <title>`: Extract a depth-limited query tree and its induced subgraph
//! - `resolve <title>`: Show where a title's redirect chain ends
//! - `init-config <path>`: Write a config file with every default spelled out

use clap::{Parser, Subcommand, ValueEnum};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use wikigraph::{
    config::GraphConfig,
    corpus::TextCorpusWriter,
    document::DocumentReader,
    graph::{GraphBuilder, LinkGraph},
    markup::MarkupParser,
    query::{
        induce_subgraph_parallel, query_graph_path, query_tree_path, save_pretty,
        to_pretty_text, QueryExtractor, TraversalOptions,
    },
    redirect::RedirectResolver,
    WikiGraphError,
};

const REDIRECT_FILE: &str = "redirect.txt";
const GRAPH_FILE: &str = "graph.json";
const CORPUS_DIR: &str = "text";

#[derive(Parser)]
#[command(name = "wikigraph")]
#[command(author, version, about = "Link graphs and query subgraphs from wiki markup dumps", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "wikigraph.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scope {
    /// The query root's direct neighborhood
    Root,
    /// Every title expanded by the traversal
    Tree,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the redirect table and the link graph from a dump file or shard directory
    Build {
        /// Path to the dump (JSON array, JSON Lines, or a directory of shards)
        input: PathBuf,

        /// Output directory for redirect.txt and graph.json
        #[arg(short, long, default_value = "data")]
        out: PathBuf,

        /// Also write the plain-text corpus and its index under <out>/text
        #[arg(long)]
        text_corpus: bool,

        /// Build the graph on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Extract a query tree and its induced subgraph
    Query {
        /// Title to start the traversal from
        title: String,

        /// Directory holding redirect.txt and graph.json
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Traversal depth (overrides the config file)
        #[arg(long)]
        depth: Option<usize>,

        /// Node budget per query (overrides the config file)
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Node set the subgraph is induced over
        #[arg(long, value_enum, default_value = "root")]
        scope: Scope,

        /// Print the query graph after writing it
        #[arg(short, long)]
        print: bool,
    },

    /// Follow a title's redirect chain
    Resolve {
        title: String,

        /// Directory holding redirect.txt
        #[arg(short, long, default_value = "data")]
        data: PathBuf,
    },

    /// Write a config file with default values
    InitConfig {
        /// Where to write the config
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            out,
            text_corpus,
            sequential,
        } => {
            let config = GraphConfig::load(&cli.config)?;
            build(&config, &input, &out, text_corpus, sequential)?;
            Ok(())
        }

        Commands::Query {
            title,
            data,
            depth,
            max_nodes,
            scope,
            print,
        } => {
            let config = GraphConfig::load(&cli.config)?;
            let mut options = TraversalOptions::from(&config.traversal);
            if let Some(depth) = depth {
                options.max_depth = depth;
            }
            if let Some(max_nodes) = max_nodes {
                options.max_nodes = Some(max_nodes);
            }
            query(&config, &title, &data, options, scope, print)?;
            Ok(())
        }

        Commands::Resolve { title, data } => {
            let config = GraphConfig::load(&cli.config)?;
            let parser = MarkupParser::new(&config)?;
            let redirects = load_redirects(&data);
            let resolution = redirects.resolve(&parser.normalize_title(&title));
            if !resolution.is_redirect() {
                println!("'{}' is not a redirect", resolution.final_target);
                return Ok(());
            }
            println!("Final target: {}", resolution.final_target);
            println!(
                "Traced: {}",
                resolution.traced.iter().cloned().collect::<Vec<_>>().join(", ")
            );
            if resolution.cycle {
                println!("Redirect cycle: resolution stopped at its entry point");
            }
            Ok(())
        }

        Commands::InitConfig { path } => {
            GraphConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn build(
    config: &GraphConfig,
    input: &Path,
    out: &Path,
    text_corpus: bool,
    sequential: bool,
) -> Result<(), WikiGraphError> {
    let parser = MarkupParser::new(config)?;
    fs::create_dir_all(out)?;

    // Pass 1: redirects (and the text corpus) must be complete before any link is expanded.
    let mut corpus = if text_corpus {
        Some(TextCorpusWriter::create(
            out.join(CORPUS_DIR),
            config.corpus_bucket_size,
        )?)
    } else {
        None
    };
    let (redirects, scan) =
        RedirectResolver::scan_documents(DocumentReader::open(input)?, &parser, |doc, plain| {
            if let Some(corpus) = corpus.as_mut() {
                corpus.write_document(&doc.title, plain)?;
            }
            Ok(())
        })?;
    if let Some(corpus) = corpus {
        corpus.finish()?;
    }
    redirects.save(out.join(REDIRECT_FILE))?;
    println!("\n=== Redirect Scan ===");
    println!("{scan}");

    // Pass 2: the graph.
    let builder = GraphBuilder::new(&parser, &redirects);
    let (graph, stats) = if sequential {
        builder.build(DocumentReader::open(input)?)?
    } else {
        let pool = config.thread_pool()?;
        let documents = DocumentReader::open(input)?;
        pool.install(|| builder.build_parallel(documents))?
    };
    graph.save(out.join(GRAPH_FILE))?;
    println!("\n=== Graph Build ===");
    println!("{stats}");
    for diagnostic in stats.diagnostics.iter() {
        println!("  {diagnostic}");
    }
    Ok(())
}

fn query(
    config: &GraphConfig,
    title: &str,
    data: &Path,
    options: TraversalOptions,
    scope: Scope,
    print: bool,
) -> Result<(), WikiGraphError> {
    let parser = MarkupParser::new(config)?;
    let graph = LinkGraph::load(data.join(GRAPH_FILE))?;
    let redirects = load_redirects(data);
    let title = parser.normalize_title(title);

    let result = QueryExtractor::new(&graph, &redirects, options).extract(&title);
    let nodes: BTreeSet<String> = match scope {
        Scope::Root => result.root_scope(),
        Scope::Tree => result.tree.node_set(),
    };
    let pool = config.thread_pool()?;
    let query_graph = pool.install(|| induce_subgraph_parallel(&nodes, &graph));

    let tree_path = query_tree_path(data, &title);
    let graph_path = query_graph_path(data, &title);
    save_pretty(&result.tree, &tree_path)?;
    save_pretty(&query_graph, &graph_path)?;

    match result.root.as_deref() {
        Some(root) if root != title => println!("'{title}' resolved to '{root}'"),
        Some(_) => {}
        None => println!("'{title}' is not in the graph"),
    }
    println!("{}", result.depth_counts);
    for diagnostic in result.diagnostics.iter() {
        println!("  {diagnostic}");
    }
    println!(
        "Query graph: {} nodes, {} edges",
        query_graph.node_count(),
        query_graph.edge_count()
    );
    println!("Wrote {} and {}", tree_path.display(), graph_path.display());
    if print {
        println!("{}", to_pretty_text(&query_graph)?);
    }
    Ok(())
}

/// A missing redirect table only degrades dereferencing, so it is not fatal.
fn load_redirects(data: &Path) -> RedirectResolver {
    match RedirectResolver::load(data.join(REDIRECT_FILE)) {
        Ok(redirects) => redirects,
        Err(e) => {
            tracing::warn!("No usable redirect table in {:?} ({e}); continuing without", data);
            RedirectResolver::new()
        }
    }
}
