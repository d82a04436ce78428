use std::future::Future;

use tokio::net::TcpListener;

use crate::router::router;
use crate::state::State;

pub async fn serve<F>(state: State, listener: TcpListener, shutdown: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {:?}", addr),
        Err(e) => tracing::warn!("listening on an unknown address: {}", e),
    }

    let app = router(state.dispatcher, state.secret, state.enable_metrics);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!("failed to serve programs api: {}", e);
    }
}
