use std::path::PathBuf;
use std::sync::Arc;

use eyre::Result;
use spot_booking_core::{Config, Dataset};
use spot_booking_store::Store;

mod api;
pub use api::{Api, ApiError, ApiResponse, ApiResult};

/// Where the service under test gets its snapshot from
#[derive(Clone, Debug)]
pub enum Source {
    /// Use this dataset directly
    Dataset(Dataset),
    /// Load the JSON file at this path, like the server does at startup
    File(PathBuf),
}

pub struct TestCtxBuilder {
    /// Snapshot to start from
    pub source: Source,
    /// Count of handler threads
    pub worker_threads: u16,
}

impl TestCtxBuilder {
    /// Create a new test context builder with an empty dataset
    pub fn new() -> Self {
        TestCtxBuilder {
            source: Source::Dataset(Dataset::default()),
            worker_threads: 2,
        }
    }

    /// Start from the given dataset
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.source = Source::Dataset(dataset);
        self
    }

    /// Start from the JSON snapshot given as a string
    pub fn with_snapshot(self, json: &str) -> Result<Self> {
        let dataset = serde_json::from_str(json)?;
        Ok(self.with_dataset(dataset))
    }

    /// Load the snapshot from a file
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Source::File(path.into());
        self
    }

    /// Set the number of handler threads to use
    pub fn with_worker_threads(mut self, threads: u16) -> Self {
        assert_ne!(threads, 0);
        self.worker_threads = threads;
        self
    }

    /// Build the test context
    pub async fn build(self) -> Result<TestCtx> {
        let service = match self.source {
            Source::Dataset(dataset) => {
                spot_booking_store::Service::new(Arc::new(Store::new(dataset)))
            }
            Source::File(data) => {
                let config = Config { data };
                tokio::task::spawn_blocking(move || spot_booking_store::launch(&config))
                    .await??
            }
        };
        let store = service.store().clone();
        let (service, api) = api::mock::start(self.worker_threads, service).await;

        Ok(TestCtx {
            api,
            store,
            service,
            drop_bomb: DropBomb,
        })
    }
}

impl Default for TestCtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Test context
pub struct TestCtx {
    /// API allowing to interact with the service
    pub api: Api,
    /// The store behind the service, for inspecting state directly
    pub store: Arc<Store>,
    service: api::mock::MockService,

    drop_bomb: DropBomb,
}

impl TestCtx {
    /// Shut the service down and finish the test
    ///
    /// All clones of [`TestCtx::api`] must have been dropped before.
    pub async fn finish(self) {
        std::mem::forget(self.drop_bomb);
        drop(self.api);
        self.service.shutdown().await;
    }
}

struct DropBomb;

impl Drop for DropBomb {
    fn drop(&mut self) {
        eprintln!("@TestAuthor: You should call `ctx.finish().await` to shut the service down");
    }
}
