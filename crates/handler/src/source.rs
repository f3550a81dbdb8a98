//! Dashboard source retrieval.
//!
//! One store serves every place a dashboard document can come from:
//! object storage, the local filesystem, or inline event properties.
//! Object storage goes through the `object_store` crate so tests and
//! offline runs can swap Amazon S3 for an in-memory backend without
//! touching the lifecycle code.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::{ObjectStore, path::Path as StoragePath};
use thiserror::Error;
use tracing::debug;

use grafana_sync_config::SourceSpec;

/// Errors raised while retrieving a dashboard document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The object or file does not exist at the described location.
    #[error("Dashboard source not found: {0}")]
    Missing(String),

    /// Local filesystem read failed.
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Object storage access failed for a reason other than absence.
    #[error("Object store error for {location}: {source}")]
    Store {
        location: String,
        #[source]
        source: object_store::Error,
    },
}

enum Backend {
    /// Bucket names resolve to S3 stores configured from the ambient
    /// AWS environment (credentials, region, endpoint overrides).
    Amazon,
    /// One shared in-memory store, keyed by `bucket/key`. Used by tests
    /// and offline invocations.
    Memory(Arc<InMemory>),
}

/// Retrieves dashboard documents from wherever a [`SourceSpec`] points.
#[derive(Clone)]
pub struct SourceStore {
    backend: Arc<Backend>,
}

impl SourceStore {
    /// Store backed by Amazon S3, configured from the environment.
    pub fn amazon() -> Self {
        Self {
            backend: Arc::new(Backend::Amazon),
        }
    }

    /// Fully in-memory store. Objects exist only after [`Self::seed`].
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(Arc::new(InMemory::new()))),
        }
    }

    /// Fetch the raw bytes a source spec points at.
    pub async fn fetch(&self, spec: &SourceSpec) -> Result<Vec<u8>, FetchError> {
        match spec {
            SourceSpec::ObjectStore { bucket, key } => self.fetch_object(bucket, key).await,
            SourceSpec::LocalFile { path } => fetch_file(path).await,
            SourceSpec::Inline { content } => Ok(content.clone().into_bytes()),
        }
    }

    /// Write an object into the store.
    ///
    /// Tests use this to stock the in-memory backend before invoking
    /// the lifecycle; on the Amazon backend it performs a real upload.
    pub async fn seed(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), FetchError> {
        let location = object_location(bucket, key);
        let (store, path) = self.resolve(bucket, key).map_err(|source| FetchError::Store {
            location: location.clone(),
            source,
        })?;
        store
            .put(&path, bytes.into())
            .await
            .map_err(|source| FetchError::Store { location, source })?;
        Ok(())
    }

    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let location = object_location(bucket, key);
        let (store, path) = self.resolve(bucket, key).map_err(|source| FetchError::Store {
            location: location.clone(),
            source,
        })?;

        let result = match store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(FetchError::Missing(location));
            }
            Err(source) => return Err(FetchError::Store { location, source }),
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|source| FetchError::Store {
                location: location.clone(),
                source,
            })?;

        debug!(location = %location, size = bytes.len(), "Fetched dashboard source");
        Ok(bytes.to_vec())
    }

    fn resolve(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<(Arc<dyn ObjectStore>, StoragePath), object_store::Error> {
        match self.backend.as_ref() {
            Backend::Amazon => {
                let store = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .build()?;
                Ok((Arc::new(store), StoragePath::from(key)))
            }
            Backend::Memory(store) => {
                // The single shared store namespaces by bucket prefix.
                let path = StoragePath::from(format!("{bucket}/{key}"));
                Ok((Arc::clone(store) as Arc<dyn ObjectStore>, path))
            }
        }
    }
}

impl fmt::Debug for SourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match self.backend.as_ref() {
            Backend::Amazon => "amazon",
            Backend::Memory(_) => "memory",
        };
        f.debug_struct("SourceStore").field("backend", &backend).finish()
    }
}

async fn fetch_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!(path = %path.display(), size = bytes.len(), "Read dashboard source file");
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FetchError::Missing(path.display().to_string()))
        }
        Err(source) => Err(FetchError::Io {
            location: path.display().to_string(),
            source,
        }),
    }
}

fn object_location(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}
