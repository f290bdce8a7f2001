//! HTTP server and graceful shutdown.
//!
//! Every request runs through the same assembled handler:
//!
//! ```text
//! LogRequests → Authorize → Router → route handler
//! ```
//!
//! On SIGTERM or Ctrl-C the server stops accepting, lets every in-flight
//! connection finish, then returns from [`Server::serve`].

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::middleware::{Authorize, Chain, LogRequests};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::settings::Settings;

/// The HTTP server.
pub struct Server {
    settings: Arc<Settings>,
}

impl Server {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// The middleware every request passes through, outermost first.
    pub fn middleware(&self) -> Chain {
        Chain::new()
            .with(LogRequests)
            .with(Authorize::new(self.settings.authorization.clone()))
    }

    /// The router wrapped in [`middleware`](Self::middleware).
    pub fn app(&self, router: Router) -> BoxedHandler {
        self.middleware().around(Arc::new(router))
    }

    /// Binds the configured address and serves `router` until shutdown.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let raw = self.settings.addr();
        let addr: SocketAddr = raw.parse().map_err(|_| Error::Addr(raw))?;
        let listener = TcpListener::bind(addr).await?;
        self.serve_on(listener, router, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        router: Router,
        shutdown: impl std::future::Future<Output = ()>,
    ) -> Result<(), Error> {
        let app = self.app(router);
        info!(addr = %listener.local_addr()?, "HTTP server started");

        let mut tasks = tokio::task::JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting at once.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let app = Arc::clone(&app);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let app = Arc::clone(&app);
                            async move { dispatch(app, req).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the set does not grow
                // without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Runs one request through the assembled handler.
///
/// Infallible: every failure has already been written into the response.
async fn dispatch(
    app: BoxedHandler,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<http_body_util::Full<bytes::Bytes>>, std::convert::Infallible> {
    let mut res = Response::new();
    app.call(Request::from_http(req), &mut res).await;
    Ok(res.into_http())
}

/// Resolves on SIGTERM or SIGINT (Ctrl-C only on non-Unix platforms).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
