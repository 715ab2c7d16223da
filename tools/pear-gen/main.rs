use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value, json};
use std::fs;

/// A CLI tool to generate random .pear pool documents for exercising the layout
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated document to
    #[arg(short, long, default_value = "generated_pool.pear")]
    output: String,

    /// Number of agents in the pool
    #[arg(long, default_value_t = 4)]
    agents: usize,

    /// The maximum number of tools per agent
    #[arg(long, default_value_t = 3)]
    max_tools: usize,

    /// Put a routing agent in front of the pool's agents
    #[arg(long)]
    router: bool,

    /// Probability (0..=1) that an agent gets its own history store
    #[arg(long, default_value_t = 0.25)]
    agent_history: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const TOOL_NAMES: &[(&str, &str)] = &[
    ("search_web", "Searches the web for information about a given query."),
    ("get_weather", "Gets the current weather for a specific location."),
    ("send_email", "Sends an email to a recipient with a subject and body."),
    ("read_file", "Reads the content of a file from the local filesystem."),
    ("write_file", "Writes content to a file in the local filesystem."),
    ("analyze_data", "Analyzes a dataset and provides insights."),
    ("translate_text", "Translates text from one language to another."),
    ("summarize_text", "Summarizes a long piece of text into a concise summary."),
    ("query_database", "Executes a SQL query against the connected database."),
];

const ROLES: &[&str] = &[
    "Research_Analyst",
    "Chief_Editor",
    "Lead_Developer",
    "Creative_Director",
    "Support_Engineer",
    "Data_Scientist",
];

const STORE_TYPES: &[&str] = &["session_buffer", "file", "sqlite", "postgresql", "redis"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.agent_history) {
        eprintln!(
            "Error: --agent-history ({}) must be between 0 and 1",
            cli.agent_history
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating pool with {} agent(s), up to {} tool(s) each...",
        cli.agents, cli.max_tools
    );

    let agents: Vec<Value> = (0..cli.agents)
        .map(|index| generate_agent(&mut rng, index, cli.max_tools, cli.agent_history))
        .collect();

    let mut data = Map::new();
    if cli.router {
        data.insert("router".to_string(), generate_router(&agents));
        println!("-> Added routing agent.");
    }
    data.insert("agents".to_string(), Value::Array(agents));
    data.insert("max_iter".to_string(), json!(rng.random_range(3..=10)));
    data.insert("tracing".to_string(), json!(rng.random_bool(0.5)));
    data.insert("history".to_string(), generate_history(&mut rng));

    let document = json!({ "type": "pool", "data": Value::Object(data) });
    fs::write(&cli.output, serde_json::to_string_pretty(&document)?)?;

    println!("Successfully generated and saved document to '{}'", cli.output);
    Ok(())
}

fn generate_agent(rng: &mut StdRng, index: usize, max_tools: usize, history_chance: f64) -> Value {
    let role = ROLES[index % ROLES.len()];
    let tool_count = rng.random_range(0..=max_tools);
    let tools: Vec<Value> = TOOL_NAMES
        .choose_multiple(rng, tool_count)
        .map(|(name, description)| generate_tool(rng, name, description))
        .collect();

    let mut agent = json!({
        "name": format!("{}_{}", role, index),
        "description": format!("Agent {} acting as {}.", index, role.replace('_', " ")),
        "persona": format!("You are a {}.", role.replace('_', " ").to_lowercase()),
        "model": { "type": "GroqModel", "model_name": "llama-3.2-70b-instruct" },
        "tools": tools,
        "max_retries": rng.random_range(0..=3),
        "tracing": false,
    });
    if rng.random_bool(history_chance) {
        agent["history"] = generate_history(rng);
    }
    agent
}

fn generate_tool(rng: &mut StdRng, name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "source_code": format!("def {}(value: str) -> str:\n    return value\n", name),
        "input_parameters": { "value": "str" },
        "max_retries": rng.random_range(0..=2),
        "retry_delay": 1.0,
        "retry_backoff": true,
        "on_error": "raise",
    })
}

fn generate_router(agents: &[Value]) -> Value {
    let names: Vec<Value> = agents.iter().filter_map(|a| a.get("name").cloned()).collect();
    json!({
        "name": "Orchestrator",
        "persona": "You route each request to the most appropriate specialist agent.",
        "model": { "type": "GroqModel", "model_name": "llama-3.2-70b-instruct" },
        "agents": names,
    })
}

fn generate_history(rng: &mut StdRng) -> Value {
    let store = STORE_TYPES.choose(rng).copied().unwrap_or("sqlite");
    let mut history = json!({ "type": "history", "store_type": store });
    match store {
        "sqlite" => history["database_path"] = json!("./history.db"),
        "file" => history["storage_dir"] = json!("./history"),
        "postgresql" => history["connection_string"] = json!("postgresql://localhost/atlas"),
        "redis" => history["host"] = json!("localhost"),
        _ => {}
    }
    history
}
