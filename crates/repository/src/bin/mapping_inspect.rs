//! Mapping Inspection CLI
//!
//! Resolves the effective mapping of one index exactly the way schema setup
//! does, then prints it together with where it came from.
//!
//! # Usage
//!
//! ```bash
//! # Inspect hfs_log_events on a local cluster
//! mapping-inspect log_events
//!
//! # Fall back to a local descriptor and check a few fields
//! mapping-inspect log_events --local-mapping log_events.json --field message --field company
//! ```
//!
//! # Environment Variables
//!
//! - `HELIOS_ES_NODE` - Elasticsearch node URL (default: http://localhost:9200)
//! - `HELIOS_ES_INDEX_PREFIX` - Index name prefix (default: hfs)
//! - `HELIOS_ES_TYPE_NAME` - Document type name (default: doc)
//! - `HELIOS_ES_USERNAME` / `HELIOS_ES_PASSWORD` - Basic auth credentials
//! - `HELIOS_ES_TIMEOUT_MS` - Request timeout in milliseconds (default: 30000)

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use helios_repository::backends::elasticsearch::{
    ElasticsearchAuth, ElasticsearchConfig, ElasticsearchMappingClient,
};
use helios_repository::mapping::{IndexType, QueryParserConfiguration, TypeMapping};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "mapping-inspect")]
#[command(about = "Resolve and print the effective mapping of an index")]
struct Args {
    /// Unprefixed index name.
    index: String,

    /// Elasticsearch node URL.
    #[arg(long, env = "HELIOS_ES_NODE", default_value = "http://localhost:9200")]
    node: String,

    /// Index name prefix.
    #[arg(long, env = "HELIOS_ES_INDEX_PREFIX", default_value = "hfs")]
    index_prefix: String,

    /// Document type name.
    #[arg(long, env = "HELIOS_ES_TYPE_NAME", default_value = "doc")]
    type_name: String,

    /// Basic auth username.
    #[arg(long, env = "HELIOS_ES_USERNAME")]
    username: Option<String>,

    /// Basic auth password.
    #[arg(long, env = "HELIOS_ES_PASSWORD", requires = "username")]
    password: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, env = "HELIOS_ES_TIMEOUT_MS", default_value = "30000")]
    timeout_ms: u64,

    /// JSON file holding the local mapping descriptor.
    #[arg(long)]
    local_mapping: Option<PathBuf>,

    /// Field to look up in the effective mapping (repeatable).
    #[arg(long = "field")]
    fields: Vec<String>,
}

impl Args {
    fn es_config(&self) -> ElasticsearchConfig {
        let auth = self.username.as_ref().map(|username| ElasticsearchAuth::Basic {
            username: username.clone(),
            password: self.password.clone().unwrap_or_default(),
        });

        ElasticsearchConfig {
            nodes: vec![self.node.clone()],
            index_prefix: self.index_prefix.clone(),
            request_timeout_ms: self.timeout_ms,
            mapping_type_name: self.type_name.clone(),
            auth,
            ..Default::default()
        }
    }

    fn local_mapping(&self) -> anyhow::Result<TypeMapping> {
        let Some(ref path) = self.local_mapping else {
            return Ok(TypeMapping::new());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,helios_repository=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.es_config();
    let client = ElasticsearchMappingClient::new(config)?;

    let index_type = client
        .config()
        .index_type(&args.index)
        .with_local_mapping(args.local_mapping()?);

    tracing::info!(
        node = %args.node,
        index = %index_type.index_name(),
        type_name = %index_type.type_name(),
        "Resolving mapping"
    );

    let parser_config = QueryParserConfiguration::new()
        .use_mappings(&index_type, &client)
        .await;

    let Some(resolved) = parser_config.mapping() else {
        anyhow::bail!("no mapping was resolved");
    };

    println!("source: {:?}", resolved.source);
    println!("{}", serde_json::to_string_pretty(&resolved.mapping.to_json()?)?);

    for field in &args.fields {
        match parser_config.field_mapping(field) {
            Some(property) => println!(
                "{}: type={} analyzed={}",
                field,
                property.field_type().unwrap_or("object"),
                property.is_analyzed()
            ),
            None => println!("{}: not mapped", field),
        }
    }

    Ok(())
}
