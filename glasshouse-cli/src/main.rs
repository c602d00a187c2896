//! Interactive operator console for the glasshouse engine.
//!
//! Presents the seven-character roster, runs conversation loops, and
//! prints status reports. All engine state lives in [`DialogueEngine`];
//! this binary is display and input plumbing only.

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use glasshouse_core::{
    DialogueEngine, EngineConfig, EngineError, NpcId, SamplingParams, TextGenerator,
};
use glasshouse_llm::{GenClient, GenRequest, Provider};

#[derive(Parser)]
#[command(name = "glasshouse", about = "Talk to the seven regulars of the Glasshouse bar")]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which generation backend to use.
    #[arg(long, value_enum, default_value = "none")]
    provider: ProviderKind,

    /// Base URL of the generation backend.
    #[arg(long, default_value = "http://localhost:11434")]
    base_url: String,

    /// Model name to request from the backend.
    #[arg(long, default_value = "llama3")]
    model: String,

    /// API key for OpenAI-compatible backends.
    #[arg(long)]
    api_key: Option<String>,

    /// RNG seed override for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProviderKind {
    /// Ollama at `--base-url`.
    Ollama,
    /// Any OpenAI-compatible completion API at `--base-url`.
    Openai,
    /// No backend; characters fall back to canned lines.
    None,
}

/// Bridges the engine's generator seam onto the HTTP client.
struct HttpBackend {
    client: GenClient,
}

#[async_trait]
impl TextGenerator for HttpBackend {
    async fn complete(
        &self,
        prompt: &str,
        params: SamplingParams,
    ) -> glasshouse_core::error::Result<String> {
        let request = GenRequest {
            prompt: prompt.to_string(),
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            max_new_tokens: params.max_new_tokens,
            no_repeat_ngram: params.no_repeat_ngram,
            timeout_ms: params.timeout_ms,
            stop: vec!["\n".to_string(), "Player:".to_string()],
        };
        let response = self
            .client
            .generate(&request)
            .await
            .map_err(|e| EngineError::Backend(e.to_string()))?;
        Ok(response.text)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.general.seed = args.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.general.log_level.clone())),
        )
        .init();

    let provider = match args.provider {
        ProviderKind::Ollama => Provider::Ollama {
            base_url: args.base_url.clone(),
        },
        ProviderKind::Openai => Provider::OpenAiCompatible {
            base_url: args.base_url.clone(),
            api_key: args.api_key.clone().unwrap_or_default(),
        },
        ProviderKind::None => Provider::None,
    };
    let client = GenClient::new(provider, args.model.clone());
    if !client.is_available() {
        info!("no backend configured; responses use canned fallbacks");
    }
    let backend = Arc::new(HttpBackend { client });

    let engine = DialogueEngine::new(backend, config);
    run_menu(&engine).await
}

async fn run_menu(engine: &DialogueEngine) -> anyhow::Result<()> {
    println!("🌟 NPC Relationship System 🌟");
    println!("Available NPCs:");
    for entry in engine.list() {
        println!(
            "{}. {} - {} ({})",
            entry.id.0, entry.name, entry.personality_description, entry.affiliation
        );
    }

    loop {
        let Some(choice) = read_line("\nChoose an NPC to talk to (1-7), 'log' for status, or 'quit': ")?
        else {
            break;
        };
        match choice.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "log" => {
                print_status(engine);
                continue;
            }
            other => match other.parse::<u8>() {
                Ok(n) if (1..=7).contains(&n) => converse(engine, NpcId(n)).await?,
                Ok(_) => println!("Please enter a number between 1 and 7"),
                Err(_) => println!("Please enter a valid number"),
            },
        }
    }
    Ok(())
}

async fn converse(engine: &DialogueEngine, npc_id: NpcId) -> anyhow::Result<()> {
    let Ok(snapshot) = engine.status(npc_id) else {
        println!("NPC not found!");
        return Ok(());
    };

    println!(
        "\n💬 Conversation with {} ({})",
        snapshot.name, snapshot.affiliation
    );
    println!("Personality: {}", snapshot.personality_description);
    println!(
        "Current mood: {} ({}/100)",
        snapshot.mood_descriptor, snapshot.mood
    );
    println!("Type 'quit' to end conversation, 'log' to view status\n");

    println!("{}: {}", snapshot.name, engine.greeting(npc_id));

    loop {
        let Some(player_input) = read_line("You: ")? else {
            break;
        };
        if player_input.is_empty() {
            continue;
        }
        match player_input.to_lowercase().as_str() {
            "quit" | "exit" => {
                println!("{}: {}", snapshot.name, engine.farewell(npc_id));
                break;
            }
            "log" => {
                print_status(engine);
                continue;
            }
            _ => {}
        }
        let response = engine.generate(npc_id, &player_input).await;
        println!("{}: {response}", snapshot.name);
    }
    Ok(())
}

fn print_status(engine: &DialogueEngine) {
    let roster = engine.list();
    let names: BTreeMap<NpcId, String> = roster
        .iter()
        .map(|entry| (entry.id, entry.name.clone()))
        .collect();

    println!("\n=== SYSTEM LOGS ===");
    println!("Total NPCs: {}", roster.len());
    println!("System events: {}\n", engine.world().event_count());

    println!("\n=== NPC STATUS REPORTS ===");
    for entry in &roster {
        let Ok(report) = engine.status(entry.id) else {
            continue;
        };
        println!("\nNPC {}: {}", report.id.0, report.name);
        if let Some(location) = engine.world().location_of(report.id) {
            println!("Location: {location}");
        }
        println!("Personality: {}", report.personality_description);
        println!("Gang: {}", report.affiliation);
        println!("Mood: {} ({})", report.mood, report.mood_descriptor);

        println!("\nRelationships:");
        for (target, tie) in &report.relationships {
            let other = names.get(target).map_or("?", String::as_str);
            println!("- {other}: {} ({}/100)", tie.description, tie.strength);
        }

        if !report.recent_history.is_empty() {
            println!("\nRecent conversation:");
            for line in &report.recent_history {
                println!("  {line}");
            }
        }
    }

    println!("\n=== KNOWN LOCATIONS ===");
    for (landmark, ids) in glasshouse_core::World::known_locations() {
        let occupants: Vec<&str> = ids
            .iter()
            .filter_map(|id| names.get(id).map(String::as_str))
            .collect();
        println!("{landmark}: {}", occupants.join(", "));
    }

    println!("\n=== RECENT SYSTEM EVENTS ===");
    for event in engine.recent_events(5) {
        println!("[{}] {}", event.at.format("%Y-%m-%d %H:%M:%S"), event.event);
    }
}

/// Prompt and read one trimmed line. `None` on EOF.
fn read_line(prompt: &str) -> anyhow::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
