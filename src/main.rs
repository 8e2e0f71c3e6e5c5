use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

use blog_client::abort::AbortController;
use blog_client::api::HttpPostsApi;
use blog_client::blog::{BlogState, BlogStore, OperationError, Post, PostDraft};
use blog_client::config::Config;
use blog_client::logging::init_tracing;

#[derive(Parser)]
#[command(name = "blog-client", version, about = "Manage blog posts through the posts API")]
struct Cli {
    /// Path to config file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every post
    List,
    /// Create a post
    Create(FieldArgs),
    /// Replace an existing post
    Update {
        /// Id of the post to replace
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a post
    Delete {
        /// Id of the post to delete
        id: String,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Post field as key=value (value parsed as JSON when possible)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// Post fields as a JSON object
    #[arg(long, value_name = "OBJECT", conflicts_with = "fields")]
    json: Option<String>,
}

impl FieldArgs {
    fn into_draft(self) -> anyhow::Result<PostDraft> {
        let fields = match self.json {
            Some(raw) => match serde_json::from_str::<Value>(&raw).context("--json is not valid JSON")? {
                Value::Object(map) => map,
                _ => anyhow::bail!("--json must be a JSON object"),
            },
            None => self.fields.into_iter().collect::<Map<String, Value>>(),
        };
        Ok(PostDraft::from_object(fields))
    }
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err("field name must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = timeout;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::from(1);
        }
    };

    let api = match HttpPostsApi::new(&config.api) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::from(1);
        }
    };

    tracing::debug!(base_url = %api.base_url(), policy = ?config.store.loading_policy, "starting");
    let store = BlogStore::spawn(
        Arc::new(api),
        BlogState::with_policy(config.store.loading_policy),
    );

    let controller = AbortController::new();
    let signal = controller.signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            controller.abort();
        }
    });

    let outcome = match cli.command {
        Command::List => store
            .get_post_list(signal)
            .await
            .map(|posts| serde_json::to_value(posts).unwrap_or(Value::Null)),
        Command::Create(fields) => match fields.into_draft() {
            Ok(draft) => store
                .create_post(draft, signal)
                .await
                .map(|post| serde_json::to_value(post).unwrap_or(Value::Null)),
            Err(err) => {
                eprintln!("Error: {:#}", err);
                return ExitCode::from(1);
            }
        },
        Command::Update { id, fields } => match fields.into_draft() {
            Ok(draft) => {
                let body = Post::from_draft(id.clone(), draft);
                store
                    .update_post(id, body, signal)
                    .await
                    .map(|post| serde_json::to_value(post).unwrap_or(Value::Null))
            }
            Err(err) => {
                eprintln!("Error: {:#}", err);
                return ExitCode::from(1);
            }
        },
        Command::Delete { id } => store
            .delete_post(id, signal)
            .await
            .map(|echo| serde_json::to_value(echo).unwrap_or(Value::Null)),
    };

    report(outcome)
}

fn report(outcome: Result<Value, OperationError>) -> ExitCode {
    match outcome {
        Ok(value) => {
            println!("{}", pretty(&value));
            ExitCode::SUCCESS
        }
        Err(OperationError::Rejected(payload)) => {
            eprintln!("Validation failed:\n{}", pretty(&payload));
            ExitCode::from(2)
        }
        Err(OperationError::Aborted) => {
            eprintln!("Aborted");
            ExitCode::from(130)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_field_reads_json_values() {
        assert_eq!(parse_field("published=true").unwrap(), ("published".into(), json!(true)));
        assert_eq!(parse_field("views=3").unwrap(), ("views".into(), json!(3)));
    }

    #[test]
    fn parse_field_falls_back_to_string() {
        assert_eq!(
            parse_field("title=Hello world").unwrap(),
            ("title".into(), json!("Hello world"))
        );
        assert_eq!(parse_field("a=b=c").unwrap(), ("a".into(), json!("b=c")));
    }

    #[test]
    fn parse_field_rejects_malformed_input() {
        assert!(parse_field("no-equals").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn json_fields_must_be_an_object() {
        let args = FieldArgs {
            fields: Vec::new(),
            json: Some("[1,2]".into()),
        };
        assert!(args.into_draft().is_err());
    }

    #[test]
    fn json_fields_drop_id() {
        let args = FieldArgs {
            fields: Vec::new(),
            json: Some(r#"{"id":"x","title":"T"}"#.into()),
        };
        let draft = args.into_draft().unwrap();
        assert_eq!(draft, PostDraft::new().with("title", "T"));
    }

    #[test]
    fn cli_parses_update_with_fields() {
        let cli = Cli::try_parse_from([
            "blog-client",
            "--base-url",
            "http://example.com/",
            "update",
            "42",
            "--field",
            "title=New",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://example.com/"));
        match cli.command {
            Command::Update { id, fields } => {
                assert_eq!(id, "42");
                assert_eq!(fields.fields, vec![("title".to_string(), json!("New"))]);
            }
            _ => panic!("expected update"),
        }
    }
}
