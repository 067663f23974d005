//! Scout Runtime
//!
//! Entry point for the ReAct agent CLI. Handles args, credential checks,
//! client construction, and the single-query / interactive front ends.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::Input;
use tracing_subscriber::EnvFilter;

use scout::agent::agent_loop::{extract_answer, run_agent_loop, AgentLoopOptions};
use scout::agent::system_prompt::build_system_prompt;
use scout::config::{load_settings, Settings, DEFAULT_MAX_ITERATIONS};
use scout::groq::GroqClient;
use scout::tavily::TavilyClient;
use scout::types::{CompletionClient, SearchClient};

const BANNER: &str = r#"
██████╗ ███████╗ █████╗  ██████╗████████╗
██╔══██╗██╔════╝██╔══██╗██╔════╝╚══██╔══╝
██████╔╝█████╗  ███████║██║        ██║
██╔══██╗██╔══╝  ██╔══██║██║        ██║
██║  ██║███████╗██║  ██║╚██████╗   ██║
╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝ ╚═════╝   ╚═╝

 █████╗  ██████╗ ███████╗███╗   ██╗████████╗
██╔══██╗██╔════╝ ██╔════╝████╗  ██║╚══██╔══╝
███████║██║  ███╗█████╗  ██╔██╗ ██║   ██║
██╔══██║██║   ██║██╔══╝  ██║╚██╗██║   ██║
██║  ██║╚██████╔╝███████╗██║ ╚████║   ██║
╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚═╝  ╚═══╝   ╚═╝
"#;

/// Words that end an interactive session.
const EXIT_WORDS: &[&str] = &["exit", "quit", "bye"];

const SEPARATOR_WIDTH: usize = 80;

/// ReAct Agent -- reasons with Groq, searches with Tavily
#[derive(Parser, Debug)]
#[command(
    name = "scout",
    version,
    about = "ReAct Agent -- an AI agent that uses Groq and Tavily"
)]
struct Cli {
    /// Single query to process
    #[arg(long)]
    query: Option<String>,

    /// Maximum number of iterations per query
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u32,

    /// Run in interactive mode
    #[arg(long, short)]
    interactive: bool,

    /// Parse "Action: internet_search:" directives out of model replies and
    /// execute the real search, feeding the result back as an Observation.
    /// Without this flag the loop resubmits the original query each
    /// iteration and never invokes the search service.
    #[arg(long)]
    execute_actions: bool,
}

/// Handles shared by every query in a session, built once at startup.
struct Clients {
    completion: Arc<dyn CompletionClient>,
    search: Arc<dyn SearchClient>,
}

impl Clients {
    fn new(settings: &Settings) -> Self {
        Self {
            completion: Arc::new(GroqClient::new(
                settings.groq_api_url.clone(),
                settings.groq_api_key.clone(),
                settings.model.clone(),
            )),
            search: Arc::new(TavilyClient::new(
                settings.tavily_api_url.clone(),
                settings.tavily_api_key.clone(),
            )),
        }
    }
}

fn display_banner() {
    println!("{}", BANNER.truecolor(255, 135, 0));
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Run one query through the agent loop and print the final answer.
/// Remote faults never escape the loop (they degrade to sentinel
/// replies), so a query always completes and the session continues.
async fn process_query(query: &str, clients: &Clients, cli: &Cli) {
    let options = AgentLoopOptions {
        completion: Arc::clone(&clients.completion),
        search: Some(Arc::clone(&clients.search)),
        system_prompt: Some(build_system_prompt().to_string()),
        max_iterations: cli.max_iterations,
        dispatch_actions: cli.execute_actions,
    };

    let transcript = run_agent_loop(query, options).await;
    let final_answer = extract_answer(&transcript);

    println!("\nFinal Answer:");
    println!("{final_answer}");
    println!("\n{}\n", separator());
}

/// Interactive mode: prompt for questions until an exit word or interrupt.
async fn interactive_session(clients: &Clients, cli: &Cli) {
    display_banner();
    println!("\nWelcome to ReAct Agent! Ask me anything...");
    println!("\nType 'exit', 'quit', or 'bye' to end the session");
    println!("Press Ctrl+C to exit at any time");
    println!("\n{}\n", separator());

    loop {
        let input: Result<String, _> = Input::new()
            .with_prompt("Your question".bold().to_string())
            .allow_empty(true)
            .interact_text();

        let query = match input {
            Ok(line) => line.trim().to_string(),
            // Ctrl+C or closed stdin lands here; leave gracefully.
            Err(_) => break,
        };

        if EXIT_WORDS.contains(&query.to_lowercase().as_str()) {
            break;
        }

        if !query.is_empty() {
            process_query(&query, clients, cli).await;
        }
    }

    println!("\nThank you for using ReAct Agent. Goodbye!");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let settings = match load_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let clients = Clients::new(&settings);

    if cli.interactive {
        interactive_session(&clients, &cli).await;
    } else if let Some(ref query) = cli.query {
        display_banner();
        process_query(query, &clients, &cli).await;
    } else {
        display_banner();
        println!("Run \"scout --help\" for usage information.");
        println!("Run \"scout --query <text>\" to process a single query.");
        println!("Run \"scout --interactive\" to start a session.");
    }

    Ok(())
}
