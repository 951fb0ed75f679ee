use std::collections::BTreeMap;
use std::io::{self, BufRead, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Instant;

use mailer_strategy_core::{
    calculate_strategy, format_audience, format_roas, formats, render_report, themes, BrandForm,
    BrandProfile, NumericMode, ProfileError,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::http::{
    read_http_request, write_http_response, HttpRequest, HttpResponse, MAX_BODY_BYTES,
};
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::resources::{formats_value, resource_text, resources, themes_value};

const DEFAULT_MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "mailer-strategy-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const TOOL_CALCULATE_STRATEGY: &str = "calculate_strategy";
const TOOL_LIST_THEMES: &str = "list_themes";
const TOOL_LIST_FORMATS: &str = "list_formats";
const KNOWN_TOOLS: [&str; 3] = [TOOL_CALCULATE_STRATEGY, TOOL_LIST_THEMES, TOOL_LIST_FORMATS];

pub struct McpServer {
    config: ServerConfig,
    metrics: Mutex<BTreeMap<&'static str, ToolMetric>>,
}

#[derive(Debug, Default, Clone, Serialize)]
struct ToolMetric {
    calls: u64,
    errors: u64,
    total_latency_ms: f64,
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid jsonrpc version",
            ));
        }

        debug!(method = %request.method, "rpc request");
        if request.is_notification() && request.method.starts_with("notifications/") {
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => {
                let protocol_version = request
                    .params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_MCP_PROTOCOL_VERSION);
                JsonRpcResponse::success(
                    id,
                    json!({
                        "protocolVersion": protocol_version,
                        "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
                        "capabilities": {
                            "tools": {
                                "listChanged": false
                            },
                            "resources": {
                                "subscribe": false,
                                "listChanged": false
                            }
                        }
                    }),
                )
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, tools_list_result()),
            "tools/call" => self.handle_tools_call(id, request.params),
            "resources/list" => JsonRpcResponse::success(id, resources_list_result()),
            "resources/read" => handle_resources_read(id, request.params),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "method not found"),
        };

        Some(response)
    }

    fn handle_tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let parsed: ToolsCallParams = match serde_json::from_value(params) {
            Ok(v) => v,
            Err(err) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"));
            }
        };

        let start = Instant::now();
        let response = match parsed.name.as_str() {
            TOOL_CALCULATE_STRATEGY => self.exec_calculate_strategy(id, parsed.arguments),
            TOOL_LIST_THEMES => exec_list_themes(id),
            TOOL_LIST_FORMATS => exec_list_formats(id),
            _ => JsonRpcResponse::error(id, METHOD_NOT_FOUND, "unknown tool"),
        };
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            tool = %parsed.name,
            latency_ms,
            error = response.is_error(),
            "tool call"
        );
        self.record_tool_metrics(&parsed.name, latency_ms, response.is_error());
        response
    }

    fn exec_calculate_strategy(&self, id: Value, arguments: Option<Value>) -> JsonRpcResponse {
        let profile = match parse_strategy_args(arguments, self.config.numeric_mode) {
            Ok(v) => v,
            Err(resp) => return with_id(resp, id),
        };

        let rec = calculate_strategy(&profile);
        let format = rec.format.option();
        let report = render_report(&rec);
        let structured = json!({
            "recommendation": &rec,
            "theme_name": rec.theme_name(),
            "format_name": format.name,
            "format_description": format.description,
            "estimated_roas_display": format_roas(rec.estimated_roas),
            "audience_display": format!("{} households", format_audience(rec.audience_size)),
            "campaign_estimate": rec.campaign_estimate()
        });

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{"type": "text", "text": report}],
                "structuredContent": structured
            }),
        )
    }

    fn record_tool_metrics(&self, tool: &str, latency_ms: f64, is_error: bool) {
        let key = KNOWN_TOOLS
            .iter()
            .copied()
            .find(|known| *known == tool)
            .unwrap_or("unknown");
        let mut metrics = self.metrics.lock();
        let entry = metrics.entry(key).or_default();
        entry.calls += 1;
        if is_error {
            entry.errors += 1;
        }
        entry.total_latency_ms += latency_ms;
    }

    fn metrics_summary(&self) -> Value {
        let metrics = self.metrics.lock();
        json!({ "tools": &*metrics })
    }

    pub fn serve_stdio(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let reader = io::BufReader::new(stdin.lock());
        let stdout = io::stdout();
        self.serve(reader, stdout.lock())
    }

    /// Answers JSON-RPC messages from `reader` until EOF. Each message may be a
    /// single JSON line or a `Content-Length` frame; replies use the same framing.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }

            let trimmed = line.trim_end_matches(['\r', '\n']).trim_start();
            if trimmed.is_empty() {
                continue;
            }

            let (payload, frame) = if is_stdio_header_line(trimmed) {
                let content_length = match read_stdio_content_length(&mut reader, trimmed) {
                    Ok(v) => v,
                    Err(err) => {
                        warn!(error = %err, "invalid stdio frame");
                        let response = JsonRpcResponse::error(
                            Value::Null,
                            PARSE_ERROR,
                            format!("invalid stdio frame: {err}"),
                        );
                        write_stdio_response(&mut writer, &response, StdioFrame::LineDelimited)?;
                        continue;
                    }
                };

                let mut body = vec![0_u8; content_length];
                if let Err(err) = reader.read_exact(&mut body) {
                    warn!(error = %err, "truncated stdio frame body");
                    let response = JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("invalid stdio frame body: {err}"),
                    );
                    write_stdio_response(&mut writer, &response, StdioFrame::ContentLength)?;
                    continue;
                }
                (body, StdioFrame::ContentLength)
            } else {
                (trimmed.as_bytes().to_vec(), StdioFrame::LineDelimited)
            };

            let request: JsonRpcRequest = match serde_json::from_slice(&payload) {
                Ok(v) => v,
                Err(err) => {
                    let response = JsonRpcResponse::error(
                        Value::Null,
                        PARSE_ERROR,
                        format!("parse error: {err}"),
                    );
                    write_stdio_response(&mut writer, &response, frame)?;
                    continue;
                }
            };

            if let Some(response) = self.handle_request(request) {
                write_stdio_response(&mut writer, &response, frame)?;
            }
        }

        Ok(())
    }

    pub fn serve_http(&self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        info!(addr = %listener.local_addr()?, "http listening");
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = self.handle_http_connection(stream) {
                        warn!(error = %err, "http request error");
                    }
                }
                Err(err) => {
                    warn!(error = %err, "http accept error");
                }
            }
        }
        Ok(())
    }

    fn handle_http_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let mut reader = io::BufReader::new(stream.try_clone()?);
        let Some(req) = read_http_request(&mut reader)? else {
            return Ok(());
        };
        let response = self.dispatch_http_request(&req);
        write_http_response(&mut stream, &response)
    }

    fn dispatch_http_request(&self, req: &HttpRequest) -> HttpResponse {
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/health") => HttpResponse::json(200, &json!({"status": "ok"})),
            ("GET", "/metrics/summary") => HttpResponse::json(200, &self.metrics_summary()),
            ("POST", "/mcp") => self.dispatch_http_rpc(req),
            (_, "/mcp") => HttpResponse::json(
                405,
                &json!({"error": "method_not_allowed", "message": "use POST /mcp"}),
            ),
            _ => HttpResponse::json(
                404,
                &json!({"error": "not_found", "message": format!("no route for {}", req.path)}),
            ),
        }
    }

    fn dispatch_http_rpc(&self, req: &HttpRequest) -> HttpResponse {
        let json_body = req
            .headers
            .get("content-type")
            .map_or(true, |ct| ct.to_ascii_lowercase().starts_with("application/json"));
        if !json_body {
            return HttpResponse::json(
                415,
                &json!({"error": "unsupported_media_type", "message": "expected application/json"}),
            );
        }

        let rpc: JsonRpcRequest = match serde_json::from_slice(&req.body) {
            Ok(v) => v,
            Err(err) => {
                let response =
                    JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {err}"));
                return rpc_http_response(400, &response);
            }
        };
        match self.handle_request(rpc) {
            Some(response) => rpc_http_response(200, &response),
            None => HttpResponse::empty(204),
        }
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

fn rpc_http_response(status: u16, response: &JsonRpcResponse) -> HttpResponse {
    match serde_json::to_value(response) {
        Ok(payload) => HttpResponse::json(status, &payload),
        Err(_) => HttpResponse::json(
            500,
            &json!({"error": "internal_error", "message": "failed to serialize rpc response"}),
        ),
    }
}

fn tools_list_result() -> Value {
    json!({
        "tools": [
            {
                "name": TOOL_CALCULATE_STRATEGY,
                "description": "Recommend a shared mailer theme, format, ROAS estimate, audience size and pricing for a brand.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "annual_revenue": {"type": "number"},
                        "average_order_value": {"type": "number"},
                        "industry": {"type": "string", "enum": industry_codes()},
                        "target_audience": {"type": "string", "enum": audience_codes()},
                        "budget_constrained": {"type": "boolean"},
                        "has_repeat_customers": {"type": "boolean"},
                        "form": {
                            "type": "object",
                            "description": "Raw form fields; used instead of the typed profile when present.",
                            "properties": {
                                "revenue": {"type": "string"},
                                "aov": {"type": "string"},
                                "industry": {"type": "string"},
                                "target_audience": {"type": "string"},
                                "budget_constraint": {"type": "boolean"},
                                "has_repeat_customers": {"type": "boolean"}
                            }
                        },
                        "numeric_mode": {"type": "string", "enum": ["lenient", "strict"]}
                    }
                }
            },
            {
                "name": TOOL_LIST_THEMES,
                "description": "List mailer themes with historical ROAS and audience affinities.",
                "inputSchema": {"type": "object", "properties": {}}
            },
            {
                "name": TOOL_LIST_FORMATS,
                "description": "List mail formats with per-piece cost.",
                "inputSchema": {"type": "object", "properties": {}}
            }
        ]
    })
}

fn industry_codes() -> Vec<&'static str> {
    mailer_strategy_core::Industry::ALL
        .iter()
        .map(|industry| industry.code())
        .collect()
}

fn audience_codes() -> Vec<&'static str> {
    mailer_strategy_core::TargetAudience::ALL
        .iter()
        .map(|audience| audience.code())
        .collect()
}

fn exec_list_themes(id: Value) -> JsonRpcResponse {
    let text = themes()
        .iter()
        .map(|theme| {
            format!(
                "{}: {}x average ROAS, minimum AOV ${}",
                theme.name, theme.average_roas, theme.minimum_aov
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": text}],
            "structuredContent": themes_value()
        }),
    )
}

fn exec_list_formats(id: Value) -> JsonRpcResponse {
    let text = formats()
        .iter()
        .map(|format| {
            format!(
                "{}: ${:.3} per piece, {}",
                format.name, format.cost_per_piece, format.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": text}],
            "structuredContent": formats_value()
        }),
    )
}

fn resources_list_result() -> Value {
    let resources = resources()
        .iter()
        .map(|resource| {
            json!({
                "uri": resource.uri,
                "name": resource.name,
                "description": resource.description,
                "mimeType": resource.mime_type
            })
        })
        .collect::<Vec<_>>();
    json!({ "resources": resources })
}

fn handle_resources_read(id: Value, params: Value) -> JsonRpcResponse {
    let parsed: ResourceReadParams = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(err) => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"));
        }
    };
    let Some(text) = resource_text(&parsed.uri) else {
        return JsonRpcResponse::error(id, INVALID_PARAMS, "unknown resource uri");
    };

    JsonRpcResponse::success(
        id,
        json!({
            "contents": [{
                "uri": parsed.uri,
                "mimeType": "application/json",
                "text": text
            }]
        }),
    )
}

fn with_id(mut response: JsonRpcResponse, id: Value) -> JsonRpcResponse {
    response.id = id;
    response
}

/// Accepts either a typed profile or `{"form": {...}}` with raw field text.
fn parse_strategy_args(
    arguments: Option<Value>,
    default_mode: NumericMode,
) -> Result<BrandProfile, JsonRpcResponse> {
    let Some(args) = arguments else {
        return Err(invalid_params("missing tool arguments"));
    };

    if args.get("form").is_some() {
        let input: FormInput = serde_json::from_value(args)
            .map_err(|err| invalid_params(format!("invalid tool arguments: {err}")))?;
        let mode = input.numeric_mode.unwrap_or(default_mode);
        return input
            .form
            .into_profile(mode)
            .map_err(|err: ProfileError| invalid_params(err.to_string()));
    }

    serde_json::from_value(args)
        .map_err(|err| invalid_params(format!("invalid tool arguments: {err}")))
}

fn invalid_params(message: impl Into<String>) -> JsonRpcResponse {
    JsonRpcResponse::error(Value::Null, INVALID_PARAMS, message)
}

#[derive(Debug, Clone, Copy)]
enum StdioFrame {
    LineDelimited,
    ContentLength,
}

fn write_stdio_response<W: Write>(
    writer: &mut W,
    response: &JsonRpcResponse,
    frame: StdioFrame,
) -> io::Result<()> {
    match frame {
        StdioFrame::LineDelimited => {
            let serialized = serde_json::to_string(response)?;
            writeln!(writer, "{serialized}")?;
        }
        StdioFrame::ContentLength => {
            let serialized = serde_json::to_vec(response)?;
            write!(writer, "Content-Length: {}\r\n\r\n", serialized.len())?;
            writer.write_all(&serialized)?;
        }
    }
    writer.flush()
}

fn is_stdio_header_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("content-length:") || lower.starts_with("content-type:")
}

fn read_stdio_content_length<R: BufRead>(reader: &mut R, first_line: &str) -> io::Result<usize> {
    let mut content_length = parse_content_length(first_line);
    let mut header_line = String::new();
    loop {
        header_line.clear();
        if reader.read_line(&mut header_line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "unexpected eof while reading frame headers",
            ));
        }
        let trimmed = header_line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if let Some(v) = parse_content_length(trimmed) {
            content_length = Some(v);
        }
    }
    let content_length = content_length
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing content-length header"))?;
    if content_length > MAX_BODY_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame body of {content_length} bytes exceeds limit"),
        ));
    }
    Ok(content_length)
}

fn parse_content_length(line: &str) -> Option<usize> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

#[derive(Debug, Deserialize)]
struct ToolsCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct FormInput {
    form: BrandForm,
    #[serde(default)]
    numeric_mode: Option<NumericMode>,
}
