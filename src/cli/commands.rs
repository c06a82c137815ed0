use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docrag", about = "Retrieval-augmented answers over a document collection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port to bind (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Store a document
    Insert {
        /// JSON with content, vector and optional metadata.file_path
        json: String,
    },
    /// Answer a question from the stored documents
    Find {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}
