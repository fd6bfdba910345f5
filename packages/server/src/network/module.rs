//! The HTTP server lifecycle: construct, bind, serve.
//!
//! Startup is split in three so callers learn the bound port before any
//! traffic flows: `new()` wires shared state, `start()` binds the TCP
//! listener (port 0 asks the OS for one), `serve()` accepts connections
//! until shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{
    create_booking, delete_booking, get_booking, health_handler, list_bookings, liveness_handler,
    readiness_handler, skips_by_location, update_booking, AppState,
};
use super::middleware;
use super::shutdown::ShutdownController;
use crate::catalog::SkipCatalog;
use crate::openapi::openapi_json;
use crate::storage::BookingRepository;

/// The REST server: repository, catalog client, router, and listener.
///
/// Call `new()`, then `start()`, then `serve()`.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    repo: Arc<dyn BookingRepository>,
    catalog: Arc<dyn SkipCatalog>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Wires the module. No port is bound until [`start`](Self::start).
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        repo: Arc<dyn BookingRepository>,
        catalog: Arc<dyn SkipCatalog>,
    ) -> Self {
        Self {
            config,
            listener: None,
            repo,
            catalog,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// The module's shutdown controller, for checking health state or
    /// triggering shutdown from outside the serve loop.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the router: booking CRUD under `/api/bookings`, the
    /// catalog lookup under `/api/skips/by-location`, the health trio, and
    /// the OpenAPI document, all behind the middleware stack.
    #[must_use]
    pub fn build_router(&self) -> Router {
        let state = AppState {
            repo: Arc::clone(&self.repo),
            catalog: Arc::clone(&self.catalog),
            shutdown: Arc::clone(&self.shutdown),
            start_time: Instant::now(),
        };

        let router = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/api/bookings", get(list_bookings).post(create_booking))
            .route(
                "/api/bookings/{id}",
                get(get_booking).patch(update_booking).delete(delete_booking),
            )
            .route("/api/skips/by-location", get(skips_by_location))
            .route("/api-docs/openapi.json", get(openapi_json))
            .with_state(state);

        middleware::apply(router, &self.config)
    }

    /// Binds the listener and returns the bound port, which differs from
    /// the configured one when port 0 was requested.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound, port already in use being
    /// the usual cause.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until either `shutdown` resolves or
    /// [`ShutdownController::trigger_shutdown`] fires on this module's
    /// controller. On shutdown the health state moves to Draining, axum
    /// drains in-flight requests, and the state ends at Stopped.
    ///
    /// Consumes `self`: the listener moves into the server.
    ///
    /// # Errors
    ///
    /// Fails only on a fatal I/O error in the accept loop.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let shutdown_ctrl = self.shutdown;

        // Transition to Ready so readiness probes pass.
        shutdown_ctrl.set_ready();
        info!("Serving HTTP connections");

        let mut shutdown_rx = shutdown_ctrl.shutdown_receiver();
        let trigger = Arc::clone(&shutdown_ctrl);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    () = shutdown => {}
                    _ = shutdown_rx.wait_for(|triggered| *triggered) => {}
                }
                trigger.trigger_shutdown();
            })
            .await?;

        shutdown_ctrl.set_stopped();
        info!("Server stopped");
        Ok(())
    }
}
