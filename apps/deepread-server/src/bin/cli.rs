use std::path::PathBuf;

use clap::{Parser, Subcommand};

use deepread_core::config::Config;
use deepread_core::data_processor::DataProcessor;
use deepread_core::traits::SearchEngine;
use deepread_core::types::IngestRequest;
use deepread_rag::DocumentIndex;
use deepread_server::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "deepread-cli", about = "Index a folder of text files and query it from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest every .txt file under DIR, then run a query against it.
    Ingest {
        dir: PathBuf,

        #[arg(long, short)]
        query: String,

        /// Only read the first N files.
        #[arg(long)]
        limit: Option<usize>,

        /// Override retrieval.top_k.
        #[arg(long)]
        top_k: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut settings = Config::load()?.settings()?;

    match cli.command {
        Command::Ingest { dir, query, limit, top_k } => {
            if let Some(k) = top_k {
                settings.retrieval.top_k = k;
            }
            let processor = limit.map_or_else(DataProcessor::new, DataProcessor::with_limit);
            let sources = processor.process_directory(&dir)?;
            let index = DocumentIndex::in_memory(&settings.retrieval)?;

            println!("DeepRead\n========");
            println!("Data directory: {}", dir.display());
            let mut total_chunks = 0;
            for source in sources {
                let chunks = index.ingest(IngestRequest::new(source.doc_id, source.filename, source.text))?;
                total_chunks += chunks;
            }
            println!("Indexed {} documents ({} chunks)", index.document_count()?, total_chunks);

            let results = index.query(&query)?;
            println!("\nFound {} results for: \"{}\"", results.len(), query);
            for (i, result) in results.iter().enumerate() {
                println!("\n  {}. score={}  id={}  file={}", i + 1, result.score, result.doc_id, result.filename);
                println!("     {}", preview(&result.text, 160));
            }
        }
    }
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &flat[..end]),
        None => flat,
    }
}
