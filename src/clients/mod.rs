pub mod geocoder;
pub mod storage;
#[cfg(test)]
pub mod testing;

pub use geocoder::{GeocodeResult, Geocoder, OpenCageGeocoder};
pub use storage::{GcsObjectStore, ObjectStore, UploadedFile};

/// Failure talking to an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} responded with {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
}

impl ClientError {
    async fn from_response(service: &'static str, resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Self::Status {
            service,
            status,
            body,
        }
    }
}
