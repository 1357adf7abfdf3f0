mod data;
mod error;
mod layout;
mod routes;
mod serde_util;
mod session;

use std::future::Future;
use std::io;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr as _;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderValue, Method};
pub use data::{ClassDataError, ClassDataService, FixtureClassDataService, HttpClassDataService};
use snafu::{ResultExt as _, Snafu};
use tokio::net::{TcpListener, TcpSocket};
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tower_cookies::CookieManagerLayer;
use tower_http::CompressionLevel;
use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::SizeAbove;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;
use tutordash_core::RoleResolver;
use tutordash_core::audit::AuditTrail;
use url::Url;

pub const LOG_TARGET: &str = "tutordash::web-ui";

fn default_assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[derive(Clone, Debug, bon::Builder)]
pub struct Opts {
    #[builder(into)]
    pub listen: String,
    pub cors_origin: Option<String>,
    assets_dir: Option<PathBuf>,
    #[builder(default)]
    pub reuseport: bool,
    /// Production deployment: session cookies get the `Secure` attribute
    #[builder(default)]
    pub production: bool,
    /// Base URL of the backing class data API; fixtures are used when unset
    pub data_api_url: Option<Url>,
}

impl Opts {
    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir.clone().unwrap_or_else(default_assets_dir)
    }

    /// The configured origin, or the listen address itself.
    pub fn cors_origin(&self, listen: SocketAddr) -> ServerResult<HeaderValue> {
        let origin = self
            .cors_origin
            .clone()
            .unwrap_or_else(|| format!("http://{listen}"));
        HeaderValue::from_str(&origin).context(CorsSnafu { origin })
    }
}

pub struct UiState {
    resolver: RoleResolver,
    secure_cookies: bool,
    class_data: Arc<dyn ClassDataService>,
    audit: AuditTrail,
}

impl UiState {
    pub fn new(opts: &Opts) -> ServerResult<Self> {
        let class_data: Arc<dyn ClassDataService> = match opts.data_api_url.clone() {
            Some(url) => Arc::new(HttpClassDataService::new(url).context(DataClientSnafu)?),
            None => Arc::new(FixtureClassDataService),
        };

        Ok(Self {
            resolver: RoleResolver::default(),
            secure_cookies: opts.production,
            class_data,
            audit: AuditTrail::seeded(),
        })
    }
}

pub type SharedState = Arc<UiState>;

#[derive(Debug, Snafu)]
pub enum WebUiServerError {
    #[snafu(transparent)]
    IO {
        source: io::Error,
    },

    ListenAddr {
        source: AddrParseError,
    },

    #[snafu(display("CORS origin {origin:?} is not a valid header value"))]
    Cors {
        origin: String,
        source: InvalidHeaderValue,
    },

    DataClient {
        source: ClassDataError,
    },

    Join {
        source: JoinError,
    },
}

pub type ServerResult<T> = std::result::Result<T, WebUiServerError>;

pub struct Server {
    listener: TcpListener,

    state: SharedState,
    opts: Opts,
}

impl Server {
    pub async fn init(opts: Opts) -> ServerResult<Server> {
        let listener = Self::get_listener(&opts).await?;
        let state = Arc::new(UiState::new(&opts)?);

        info!(target: LOG_TARGET, addr = %listener.local_addr()?, "Listening");
        Ok(Self {
            listener,
            state,
            opts,
        })
    }

    pub async fn get_listener(opts: &Opts) -> ServerResult<TcpListener> {
        let socket = {
            let addr = SocketAddr::from_str(&opts.listen).context(ListenAddrSnafu)?;

            let socket = if addr.is_ipv4() {
                TcpSocket::new_v4()?
            } else {
                TcpSocket::new_v6()?
            };
            if opts.reuseport {
                #[cfg(unix)]
                socket.set_reuseport(true)?;
            }
            socket.set_nodelay(true)?;

            socket.bind(addr)?;

            socket
        };

        Ok(socket.listen(1024)?)
    }

    pub fn addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    fn router(&self) -> ServerResult<Router> {
        let listen = self.addr()?;
        Ok(Router::new()
            .merge(routes::route_handler(self.state.clone()))
            .nest_service("/assets", ServeDir::new(self.opts.assets_dir()))
            .layer(CookieManagerLayer::new())
            // Outside the cookie manager, to see the `Set-Cookie` it adds.
            .layer(middleware::from_fn(routes::cache_control))
            .layer(cors_layer(&self.opts, listen)?)
            .layer(compression_layer()))
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> ServerResult<()> {
        self.run_until(shutdown_signal()).await
    }

    async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        let router = self.router()?;

        info!(target: LOG_TARGET, "Starting server");
        axum::serve(
            self.listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!(target: LOG_TARGET, "Server stopped");
        Ok(())
    }
}

/// Handle to a server running in a background task.
pub struct UiServer {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<ServerResult<()>>,
}

impl UiServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(self) -> ServerResult<()> {
        // The server task might be gone already; its result tells why.
        let _ = self.shutdown_tx.send(());
        self.handle.await.context(JoinSnafu)?
    }
}

/// Start the web UI in a background task.
pub async fn start_ui(opts: Opts) -> ServerResult<UiServer> {
    let server = Server::init(opts).await?;
    let addr = server.addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let handle = tokio::spawn(server.run_until(async {
        let _ = shutdown_rx.await;
    }));

    Ok(UiServer {
        addr,
        shutdown_tx,
        handle,
    })
}

fn compression_layer() -> CompressionLayer<SizeAbove> {
    CompressionLayer::new()
        .quality(CompressionLevel::Precise(4))
        .compress_when(SizeAbove::new(512))
}

fn cors_layer(opts: &Opts, listen: SocketAddr) -> ServerResult<CorsLayer> {
    Ok(CorsLayer::new()
        .allow_credentials(true)
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
        .allow_origin(opts.cors_origin(listen)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::HEAD,
        ]))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
