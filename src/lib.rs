pub mod agent;
pub mod audio;
pub mod cli;
pub mod config;
pub mod lang;
pub mod llm;
pub mod models;
pub mod search;
pub mod server;
pub mod translate;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Search Endpoint: {}", args.search_endpoint);
    info!("Search Index: {}", args.search_index);
    info!("Search Limit: {}", args.search_limit);
    info!("LLM Model: {}", args.llm_model);
    info!("LLM Base URL: {}", args.llm_base_url);
    info!("Translation Base URL: {}", args.translate_base_url);
    info!("Default Language: {}", args.default_language);
    info!("Speech URL: {}", args.speech_url);
    if let Some(path) = &args.prompts_path {
        info!("Prompts Path: {}", path);
    }
    info!("-------------------------");

    let agent = Arc::new(ChatAgent::new(&args)?);
    let addr = args.server_addr.clone();
    let server = Server::new(addr, agent, args.max_upload_bytes);
    server.run().await?;

    Ok(())
}
