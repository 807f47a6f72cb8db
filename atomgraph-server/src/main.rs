//! Atomgraph MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio (MCP 2025-11-25 framing).
//!
//! Tools (also callable directly as methods):
//! - parse: Compile expression text into a wire-format node
//! - parse_batch: Compile several expressions, one result per item
//! - render: Turn a wire-format node back into expression text
//! - roundtrip: Parse then render, to check an expression's normal form
//! - describe: Help for one atom, by call name or wire tag
//! - list_atoms: Every registered atom, optionally by category
//!
//! Configuration (environment):
//! - ATOMGRAPH_REGISTRY: path to a JSON atom table (default: standard library)
//! - ATOMGRAPH_FOLD: `1`/`true` to fold constant sub-expressions while parsing
//! - RUST_LOG: log filter, logs go to stderr

use atomgraph::{AtomCompiler, AtomError, AtomRegistry, ConstantFolder, Node, RegistryError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "atomgraph";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
/// Expression failed to compile; `data` carries the `AtomError`
const COMPILE_ERROR: i32 = -32001;

/// Server settings read from the environment
#[derive(Debug, Clone, Default, PartialEq)]
struct ServerConfig {
    registry_path: Option<PathBuf>,
    fold_constants: bool,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            registry_path: lookup("ATOMGRAPH_REGISTRY")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            fold_constants: lookup("ATOMGRAPH_FOLD").is_some_and(|v| is_truthy(&v)),
        }
    }

    fn build_compiler(&self) -> Result<AtomCompiler, RegistryError> {
        let registry = match &self.registry_path {
            Some(path) => AtomRegistry::from_path(path)?,
            None => atomgraph_std::standard_registry()?,
        };
        let compiler = AtomCompiler::new(registry);
        Ok(if self.fold_constants {
            compiler.with_simplifier(ConstantFolder)
        } else {
            compiler
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

impl McpResponse {
    fn new(id: Option<JsonValue>, outcome: Result<JsonValue, McpError>) -> Self {
        let (result, error) = match outcome {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e)),
        };
        Self { jsonrpc: "2.0".to_string(), id, result, error }
    }
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl From<AtomError> for McpError {
    fn from(e: AtomError) -> Self {
        Self {
            code: COMPILE_ERROR,
            message: e.to_string(),
            data: serde_json::to_value(&e).ok(),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_logging();

    let config = ServerConfig::from_env();
    let compiler = match config.build_compiler() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load atom registry");
            std::process::exit(1);
        }
    };

    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        atoms = compiler.registry().len(),
        simplifier = compiler.simplifier_name(),
        registry = ?config.registry_path,
        "atomgraph server ready"
    );

    let stdin = io::stdin();
    let reader = io::BufReader::new(stdin.lock());
    if let Err(e) = serve(&compiler, reader, io::stdout()) {
        error!(error = %e, "i/o failure, shutting down");
    }
    info!("server shutting down");
}

/// Answer one request per input line until EOF
fn serve(compiler: &AtomCompiler, reader: impl BufRead, mut writer: impl Write) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "request received");

        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                let response = handle_request(compiler, &request);
                // Notifications (no id) get no response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    continue;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                McpResponse::new(None, Err(McpError::new(PARSE_ERROR, format!("Parse error: {}", e))))
            }
        };

        writeln!(writer, "{}", serde_json::to_string(&response)?)?;
        writer.flush()?;
    }
    info!("client disconnected (EOF)");
    Ok(())
}

fn handle_request(compiler: &AtomCompiler, request: &McpRequest) -> McpResponse {
    let params = request.params.clone().unwrap_or_else(|| json!({}));
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(compiler),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // MCP tools
        "tools/list" => Ok(handle_tools_list()),
        "tools/call" => handle_tool_call(compiler, &params),

        // Direct methods
        method => call_tool(compiler, method, params).unwrap_or_else(|| {
            Err(McpError::new(METHOD_NOT_FOUND, format!("Method not found: {}", method)))
        }),
    };

    McpResponse::new(request.id.clone(), result)
}

fn handle_initialize(compiler: &AtomCompiler) -> Result<JsonValue, McpError> {
    Ok(json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        "instructions": format!(
            "Atomgraph compiles expressions such as `Heal(Self(), GetAttr(MaxHealth) * 0.02)` into \
             wire-format node graphs and renders them back. {} atoms are registered; use \
             'list_atoms' and 'describe' to explore them.",
            compiler.registry().len()
        ),
    }))
}

fn handle_tools_list() -> JsonValue {
    json!({
        "tools": [
            {
                "name": "parse",
                "description": "Compile expression text into a wire-format node graph",
                "inputSchema": {
                    "type": "object",
                    "properties": { "expression": { "type": "string" } },
                    "required": ["expression"]
                }
            },
            {
                "name": "parse_batch",
                "description": "Compile several expressions; failures are reported per item",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "expressions": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["expressions"]
                }
            },
            {
                "name": "render",
                "description": "Render a wire-format node back into expression text",
                "inputSchema": {
                    "type": "object",
                    "properties": { "node": { "type": "object" } },
                    "required": ["node"]
                }
            },
            {
                "name": "roundtrip",
                "description": "Parse an expression and render it again, showing its normal form",
                "inputSchema": {
                    "type": "object",
                    "properties": { "expression": { "type": "string" } },
                    "required": ["expression"]
                }
            },
            {
                "name": "describe",
                "description": "Help for one atom by call name or wire tag; categories when omitted",
                "inputSchema": {
                    "type": "object",
                    "properties": { "name": { "type": "string" } }
                }
            },
            {
                "name": "list_atoms",
                "description": "List registered atoms, optionally filtered by category",
                "inputSchema": {
                    "type": "object",
                    "properties": { "category": { "type": "string" } }
                }
            }
        ]
    })
}

fn handle_tool_call(compiler: &AtomCompiler, params: &JsonValue) -> Result<JsonValue, McpError> {
    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    let result = call_tool(compiler, name, args)
        .unwrap_or_else(|| Err(McpError::invalid_params(format!("Unknown tool: {}", name))))?;

    Ok(json!({
        "content": [{ "type": "text", "text": result.to_string() }],
        "structuredContent": result,
        "isError": false,
    }))
}

/// Dispatch a tool by name; `None` when no such tool exists
fn call_tool(compiler: &AtomCompiler, name: &str, args: JsonValue) -> Option<Result<JsonValue, McpError>> {
    let result = match name {
        "parse" => tool_parse(compiler, &args),
        "parse_batch" => tool_parse_batch(compiler, &args),
        "render" => tool_render(compiler, &args),
        "roundtrip" => tool_roundtrip(compiler, &args),
        "describe" => tool_describe(compiler, &args),
        "list_atoms" => tool_list_atoms(compiler, &args),
        _ => return None,
    };
    Some(result)
}

fn str_arg<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", key)))
}

fn tool_parse(compiler: &AtomCompiler, args: &JsonValue) -> Result<JsonValue, McpError> {
    let expression = str_arg(args, "expression")?;
    let node = compiler.parse_node(expression)?;
    Ok(json!({ "node": node.to_json() }))
}

fn tool_parse_batch(compiler: &AtomCompiler, args: &JsonValue) -> Result<JsonValue, McpError> {
    let expressions = args.get("expressions")
        .and_then(|v| v.as_array())
        .ok_or_else(|| McpError::invalid_params("Missing expressions argument (array of strings)"))?;

    let results: Vec<JsonValue> = expressions.iter()
        .enumerate()
        .map(|(i, item)| match item.as_str() {
            Some(expression) => match compiler.parse_node(expression) {
                Ok(node) => json!({ "index": i, "node": node.to_json() }),
                Err(e) => json!({ "index": i, "error": e }),
            },
            None => json!({ "index": i, "error": { "code": "INVALID_PARAMS", "message": "expression must be a string" } }),
        })
        .collect();

    let failed = results.iter().filter(|r| r.get("error").is_some()).count();
    Ok(json!({ "results": results, "failed": failed }))
}

fn tool_render(compiler: &AtomCompiler, args: &JsonValue) -> Result<JsonValue, McpError> {
    let json = args.get("node")
        .ok_or_else(|| McpError::invalid_params("Missing node argument"))?;
    let node = Node::from_json(json)?;
    Ok(json!({ "expression": compiler.render_node(&node) }))
}

fn tool_roundtrip(compiler: &AtomCompiler, args: &JsonValue) -> Result<JsonValue, McpError> {
    let expression = str_arg(args, "expression")?;
    let node = compiler.parse_node(expression)?;
    let rendered = compiler.render_node(&node);
    let stable = compiler.parse_node(&rendered).is_ok_and(|again| again == node);
    Ok(json!({
        "node": node.to_json(),
        "expression": rendered,
        "stable": stable,
    }))
}

fn tool_describe(compiler: &AtomCompiler, args: &JsonValue) -> Result<JsonValue, McpError> {
    let registry = compiler.registry();
    match args.get("name").and_then(|v| v.as_str()) {
        Some(name) => registry.describe(name).ok_or_else(|| {
            let similar = registry.similar_names(name);
            McpError {
                code: INVALID_PARAMS,
                message: format!("Unknown atom: {}", name),
                data: Some(json!({ "similar": similar })),
            }
        }),
        None => Ok(json!({
            "atoms": registry.len(),
            "categories": registry.categories(),
        })),
    }
}

fn tool_list_atoms(compiler: &AtomCompiler, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category").and_then(|v| v.as_str());
    Ok(json!({ "atoms": compiler.registry().list(category) }))
}
