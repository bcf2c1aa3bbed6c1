use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use bizdesk_core::TenantId;
use bizdesk_infra::config::{AppConfig, StoreBackend};
use bizdesk_infra::store::DocumentStore;
use bizdesk_infra::{BroadcastNotifier, InMemoryDocumentStore, Services, StoreError};

/// Domain services plus the realtime channel the API streams from.
#[derive(Clone)]
pub struct AppServices {
    pub domain: Services,
    realtime: Arc<BroadcastNotifier>,
}

impl AppServices {
    pub fn new(store: Arc<dyn DocumentStore>, channel_capacity: usize) -> Self {
        let realtime = Arc::new(BroadcastNotifier::new(channel_capacity));
        Self {
            domain: Services::new(store, realtime.clone()),
            realtime,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        let defaults = AppConfig::default();
        Self::new(
            Arc::new(InMemoryDocumentStore::new()),
            defaults.notifications.channel_capacity,
        )
    }

    pub fn realtime(&self) -> &BroadcastNotifier {
        &self.realtime
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let capacity = config.notifications.channel_capacity;

    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory document store");
            Ok(AppServices::new(Arc::new(InMemoryDocumentStore::new()), capacity))
        }
        StoreBackend::Postgres => build_postgres_services(config, capacity).await,
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres_services(config: &AppConfig, capacity: usize) -> Result<AppServices, StoreError> {
    use bizdesk_infra::store::PostgresDocumentStore;

    let url = config
        .store
        .database_url
        .as_deref()
        .ok_or_else(|| StoreError::Backend("store.database_url is not set".to_string()))?;

    let store = PostgresDocumentStore::connect(url).await?;
    store.migrate().await?;
    tracing::info!("using postgres document store");
    Ok(AppServices::new(Arc::new(store), capacity))
}

#[cfg(not(feature = "postgres"))]
async fn build_postgres_services(_config: &AppConfig, _capacity: usize) -> Result<AppServices, StoreError> {
    Err(StoreError::Backend(
        "store.backend = \"postgres\" but the postgres feature is not enabled".to_string(),
    ))
}

/// SSE stream of the tenant's notifications (lossy for slow consumers).
pub fn tenant_sse_stream(
    services: Arc<AppServices>,
    tenant_id: TenantId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if m.tenant_id == tenant_id => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
