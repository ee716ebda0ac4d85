use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "assistdesk-cli", about = "assistdesk dashboard API CLI")]
struct Cli {
    #[arg(long, env = "ASSISTDESK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Liveness check against `/healthz`.
    Ping,
    /// Ask the ticket assistant.
    Chat(ChatArgs),
    /// Ask the RAN agent.
    Agent { message: String },
    /// Search the RAG index.
    Search { query: String },
    /// List live RAN sites with metrics.
    Sites,
    /// Read any RAN backend path, e.g. `/api/ran/alarms`.
    RanHealth { endpoint: String },
    /// Generate text through the inference gateway.
    Infer(InferArgs),
    /// Chat dependency probe plus RAN agent info.
    Status,
}

#[derive(Args, Debug)]
struct ChatArgs {
    message: String,

    #[arg(long, default_value_t = 200)]
    max_tokens: u32,

    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    #[arg(long)]
    page: Option<String>,

    #[arg(long)]
    ticket_id: Option<String>,

    #[arg(long)]
    ticket_title: Option<String>,

    #[arg(long)]
    ticket_status: Option<String>,

    #[arg(long)]
    ticket_priority: Option<String>,

    #[arg(long)]
    kanban_column: Option<String>,
}

#[derive(Args, Debug)]
struct InferArgs {
    prompt: String,

    #[arg(long, default_value_t = 200)]
    max_tokens: u32,

    #[arg(long, default_value_t = 0.7)]
    temperature: f32,
}

struct Api {
    http: reqwest::Client,
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let api = Api { http: reqwest::Client::new(), base_url: cli.base_url.trim_end_matches('/').to_owned() };

    match cli.command {
        Command::Ping => run_ping(&api).await,
        Command::Chat(args) => print_json(&api.post("/api/chat-vllm", chat_body(&args)).await?),
        Command::Agent { message } => print_json(&api.post("/api/ran-agent", json!({ "message": message })).await?),
        Command::Search { query } => print_json(&api.post("/api/rag/search", json!({ "query": query })).await?),
        Command::Sites => print_json(&api.get("/api/ran-sites").await?),
        Command::RanHealth { endpoint } => {
            let response = api.http.get(api.url("/api/ran-health")).query(&[("endpoint", endpoint)]).send().await?;
            print_json(&read_json(response).await?)
        }
        Command::Infer(args) => print_json(
            &api.post(
                "/api/inference",
                json!({ "prompt": args.prompt, "maxTokens": args.max_tokens, "temperature": args.temperature }),
            )
            .await?,
        ),
        Command::Status => run_status(&api).await,
    }
}

async fn run_ping(api: &Api) -> Result<(), CliError> {
    let response = api.http.get(api.url("/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_status(api: &Api) -> Result<(), CliError> {
    // The chat probe answers 503 when vLLM is unconfigured; show it anyway.
    let response = api.http.get(api.url("/api/chat-vllm")).send().await?;
    let chat: Value = serde_json::from_str(&response.text().await?)?;
    let agent = api.get("/api/ran-agent").await?;
    print_json(&json!({ "chat": chat, "ranAgent": agent }))
}

impl Api {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str) -> Result<Value, CliError> {
        read_json(self.http.get(self.url(path)).send().await?).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, CliError> {
        read_json(self.http.post(self.url(path)).json(&body).send().await?).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    decode_body(status, &text)
}

/// Error statuses keep the raw body as the message; success bodies must be JSON.
fn decode_body(status: u16, text: &str) -> Result<Value, CliError> {
    if !(200..300).contains(&status) {
        return Err(CliError::ServerError { status, message: text.to_owned() });
    }
    Ok(serde_json::from_str(text)?)
}

fn chat_body(args: &ChatArgs) -> Value {
    let mut context = Map::new();
    let fields = [
        ("page", &args.page),
        ("ticketId", &args.ticket_id),
        ("ticketTitle", &args.ticket_title),
        ("ticketStatus", &args.ticket_status),
        ("ticketPriority", &args.ticket_priority),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            context.insert(key.to_owned(), Value::String(value.clone()));
        }
    }
    if let Some(column) = &args.kanban_column {
        context.insert("metadata".to_owned(), json!({ "kanbanColumn": column }));
    }

    let mut body = json!({
        "message": args.message,
        "maxTokens": args.max_tokens,
        "temperature": args.temperature,
    });
    if !context.is_empty() {
        body["context"] = Value::Object(context);
    }
    body
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
