use std::sync::Arc;
use std::time::Duration;

use admin_api::{
    AdminClient, AuthService, ClientConfig, ListQuery, Notifier, Resource, ResourceService, SiteInfoService,
    SiteInfoStore, TracingSink, full_asset_url,
};
use admin_navigation::{
    ApiPermissionSource, EmptySectionPolicy, MenuCatalog, MenuRefresher, MenuStore, NavigationBinding,
    NavigationResolver, RefreshGuard, RefreshPhase, RefreshSettings, RouteSignal, TracingPublisher,
};
use admin_types::ApiEnvelope;
use admin_util::{PanelConfig, redact_sensitive};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "admin-panel", version, about = "Admin panel navigation and API tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the current user's permissions and print the filtered menu.
    Menu,
    /// Navigate to a route path and print the active menu key and breadcrumbs.
    ///
    /// Authenticated routes refresh the menu first, as the panel router does.
    Resolve {
        /// Route path, e.g. /menu-management/menus
        path: String,
    },
    /// Send a request to an API-relative path.
    Request {
        /// HTTP method (GET, POST, PATCH, DELETE)
        method: String,
        /// API-relative path, e.g. /roles
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// List one page of a REST collection, e.g. `list roles --search admin`.
    List {
        /// Collection endpoint name (menu, subMenus, roles, users, ...)
        resource: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
    },
    /// Fetch and print public site information.
    SiteInfo,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = PanelConfig::load()?;
    let client = Arc::new(build_client(&config)?);

    match cli.command {
        Command::Menu => {
            let refresher = build_refresher(&config, &client)?;
            refresher.load_now().await;
            debug!(origin = ?refresher.store().snapshot().origin(), "menu loaded");
            println!("{}", serde_json::to_string_pretty(&*refresher.store().snapshot())?);
        }
        Command::Resolve { path } => {
            let refresher = build_refresher(&config, &client)?;
            let mut changes = refresher.store().subscribe();
            let route = RouteSignal::new(path);
            let _guard = RefreshGuard::attach(&route, refresher.clone());
            if refresher.phase() != RefreshPhase::Idle {
                changes.changed().await?;
            }
            let binding = NavigationBinding::attach(
                &route,
                NavigationResolver::new(refresher.store().clone()),
                Arc::new(TracingPublisher),
            );
            let out = serde_json::json!({
                "path": route.current(),
                "origin": refresher.store().snapshot().origin(),
                "activeKey": binding.active_key(),
                "breadcrumbs": binding.breadcrumbs(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Request {
            method,
            path,
            body,
            dry_run,
        } => run_request(&client, &method, &path, body.as_deref(), dry_run).await?,
        Command::List {
            resource,
            page,
            limit,
            search,
        } => {
            let resource = Resource::from_name(&resource).with_context(|| {
                let known: Vec<&str> = Resource::ALL.iter().map(|resource| &resource.path()[1..]).collect();
                format!("unknown resource '{resource}'; expected one of {}", known.join(", "))
            })?;
            let service = ResourceService::new(Arc::clone(&client), resource);
            let envelope = service.list(&ListQuery { page, limit, search }).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Command::SiteInfo => {
            let service = SiteInfoService::new(Arc::clone(&client));
            let store = SiteInfoStore::new();
            store.fetch(&service).await;
            if let Some(error) = store.snapshot().error {
                anyhow::bail!(error);
            }
            let asset = |path: Option<String>| path.map(|path| full_asset_url(service.base_url(), &path));
            let out = serde_json::json!({
                "siteName": store.site_name(),
                "siteDescription": store.site_description(),
                "favicon": asset(store.favicon()),
                "siteLogo": asset(store.site_logo()),
                "imgLogin": asset(store.login_image()),
                "contactEmail": store.contact_email(),
                "phone": store.phone(),
                "address": store.address(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing::subscriber::set_global_default(log_subscriber(&filter));
}

fn log_subscriber(filter: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn build_client(config: &PanelConfig) -> Result<AdminClient> {
    let client_config = ClientConfig {
        base_url: config.api.base_url.clone(),
        timeout: Duration::from_secs(config.api.timeout_secs),
        token: config.api.token.clone(),
    };
    let notifier = Arc::new(Notifier::with_sink(Arc::new(TracingSink)));
    let client = AdminClient::new(client_config)
        .with_context(|| format!("cannot use API base URL {}", config.api.base_url))?
        .with_notifier(notifier);
    Ok(client)
}

fn build_refresher(config: &PanelConfig, client: &Arc<AdminClient>) -> Result<MenuRefresher> {
    let catalog = match &config.navigation.catalog_path {
        Some(path) => MenuCatalog::from_path(path)?,
        None => MenuCatalog::builtin(),
    };
    let settings = RefreshSettings {
        cache_duration: Duration::from_millis(config.navigation.cache_duration_ms),
        debounce: Duration::from_millis(config.navigation.debounce_ms),
        empty_sections: if config.navigation.prune_empty_sections {
            EmptySectionPolicy::Prune
        } else {
            EmptySectionPolicy::Retain
        },
    };
    let source = ApiPermissionSource::new(AuthService::new(Arc::clone(client)));
    Ok(MenuRefresher::new(Arc::new(catalog), Arc::new(source), MenuStore::new(), settings))
}

async fn run_request(client: &AdminClient, method: &str, path: &str, body: Option<&str>, dry_run: bool) -> Result<()> {
    let method = match method.to_ascii_uppercase().as_str() {
        "GET" => reqwest::Method::GET,
        "POST" => reqwest::Method::POST,
        "PATCH" => reqwest::Method::PATCH,
        "DELETE" => reqwest::Method::DELETE,
        other => anyhow::bail!("unsupported method: {}", other),
    };
    let body_value: Option<Value> = body
        .map(serde_json::from_str)
        .transpose()
        .context("request body is not valid JSON")?;

    if dry_run {
        let mut builder = client.request(method, path);
        if let Some(ref b) = body_value {
            builder = builder.json(b);
        }
        let req = builder.build()?;
        let mut headers_out = serde_json::Map::new();
        for (name, value) in req.headers().iter() {
            let line = format!("{}: {}", name.as_str(), value.to_str().unwrap_or(""));
            let redacted = redact_sensitive(&line);
            let out_val = redacted.split_once(':').map(|(_, v)| v.trim()).unwrap_or("").to_string();
            headers_out.insert(name.as_str().to_string(), Value::String(out_val));
        }
        let body_out = match &body_value {
            Some(b) => {
                let redacted = redact_sensitive(&b.to_string());
                serde_json::from_str(&redacted).unwrap_or(Value::String(redacted))
            }
            None => Value::Null,
        };
        let out = serde_json::json!({
            "method": req.method().to_string(),
            "url": req.url().to_string(),
            "headers": headers_out,
            "body": body_out,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let envelope: ApiEnvelope = client.send_json(method, path, &[], body_value.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
