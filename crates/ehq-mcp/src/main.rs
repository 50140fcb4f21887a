//! EHQ MCP Server entry point.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio::task::JoinSet;

use ehq_mcp::config::{UpstreamConfig, BASE_URL_ENV};
use ehq_mcp::transport::{shutdown_channel, ConnectionTracker, Shutdown, StdioTransport};
use ehq_mcp::types::{InitializeResult, McpResult};
use ehq_mcp::ProtocolHandler;

#[derive(Parser)]
#[command(
    name = "ehq-mcp",
    about = "MCP server exposing EngagementHQ tools and resources",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Shorthand for --log-level debug.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server (stdio unless a network transport is given).
    Serve(ServeArgs),

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   ehq-mcp completions bash > ~/.local/share/bash-completion/completions/ehq-mcp
    ///   ehq-mcp completions zsh > ~/.zfunc/_ehq-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Serve over stdin/stdout alongside any network transport.
    #[arg(long)]
    stdio: bool,

    /// HTTP listen address (host:port) for POST /mcp.
    #[arg(long)]
    http: Option<String>,

    /// WebSocket listen address (host:port) for GET /ws.
    #[arg(long)]
    ws: Option<String>,

    /// EngagementHQ base URL.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { cli.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            // Stdin reads run on a blocking thread that cannot be cancelled,
            // so the runtime is shut down with a bound instead of dropped.
            let runtime = tokio::runtime::Runtime::new()?;
            let result = runtime.block_on(serve(args));
            runtime.shutdown_timeout(Duration::from_secs(1));
            result?;
        }

        Commands::Info => {
            let upstream = UpstreamConfig::resolve(None);
            let handler = ehq_mcp::build_handler(&upstream);
            let init = InitializeResult::new(
                handler.server_info().clone(),
                handler.capabilities().clone(),
            );
            let tools = handler.catalog().list_tools()?;
            let resources = handler.catalog().list_resources()?;
            let info = serde_json::json!({
                "server": init.server_info,
                "protocol_version": init.protocol_version,
                "capabilities": init.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "resources": resources.iter().map(|r| &r.uri).collect::<Vec<_>>(),
                "resource_count": resources.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ehq-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let upstream = UpstreamConfig::resolve(args.base_url.as_deref());
    tracing::info!("EHQ MCP server");
    tracing::info!("Upstream: {}", upstream.base_url);

    let handler = Arc::new(ehq_mcp::build_handler(&upstream));
    let (trigger, shutdown) = shutdown_channel();
    let tracker = ConnectionTracker::new();
    let mut servers: JoinSet<McpResult<()>> = JoinSet::new();

    spawn_network(&mut servers, &handler, &args, &shutdown, &tracker)?;

    let use_stdio = args.stdio || servers.is_empty();
    let mut stdio = use_stdio.then(|| {
        let transport = StdioTransport::new(handler.clone());
        let shutdown = shutdown.clone();
        tokio::spawn(async move { transport.run(shutdown).await })
    });

    match stdio.as_mut() {
        // Stdio on its own: EOF ends the process.
        Some(task) if servers.is_empty() => {
            tokio::select! {
                result = task => {
                    report("stdio", result);
                    return Ok(());
                }
                _ = shutdown_signal() => {}
            }
        }
        _ => shutdown_signal().await,
    }

    tracing::info!("Shutting down gracefully...");
    trigger.trigger();

    if let Some(task) = stdio {
        report("stdio", task.await);
    }
    while let Some(result) = servers.join_next().await {
        report("network", result);
    }
    tracker.wait().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(feature = "http")]
fn spawn_network(
    servers: &mut JoinSet<McpResult<()>>,
    handler: &Arc<ProtocolHandler>,
    args: &ServeArgs,
    shutdown: &Shutdown,
    tracker: &ConnectionTracker,
) -> anyhow::Result<()> {
    use ehq_mcp::transport::{serve_router, HttpTransport, WsTransport};

    let http = HttpTransport::new(handler.clone());
    let ws = WsTransport::new(handler.clone());

    let mut listeners = Vec::new();
    match (&args.http, &args.ws) {
        (Some(http_addr), Some(ws_addr)) if http_addr == ws_addr => {
            tracing::info!("HTTP and WebSocket share {http_addr}");
            let router = http.router().merge(ws.router(shutdown.clone(), tracker));
            listeners.push((http_addr.clone(), router));
        }
        (http_addr, ws_addr) => {
            if let Some(addr) = http_addr {
                listeners.push((addr.clone(), http.router()));
            }
            if let Some(addr) = ws_addr {
                listeners.push((addr.clone(), ws.router(shutdown.clone(), tracker)));
            }
        }
    }

    for (addr, router) in listeners {
        let shutdown = shutdown.clone();
        servers.spawn(async move { serve_router(router, &addr, shutdown).await });
    }
    Ok(())
}

#[cfg(not(feature = "http"))]
fn spawn_network(
    _servers: &mut JoinSet<McpResult<()>>,
    _handler: &Arc<ProtocolHandler>,
    args: &ServeArgs,
    _shutdown: &Shutdown,
    _tracker: &ConnectionTracker,
) -> anyhow::Result<()> {
    if args.http.is_some() || args.ws.is_some() {
        anyhow::bail!("this build has no network transports (enable the `http` feature)");
    }
    Ok(())
}

fn report(transport: &str, result: Result<McpResult<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::debug!("{transport} transport finished"),
        Ok(Err(e)) => tracing::error!("{transport} transport failed: {e}"),
        Err(e) => tracing::error!("{transport} transport task panicked: {e}"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
