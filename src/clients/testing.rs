//! Canned collaborators for service and router tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::geocoder::{AddressComponents, Geometry};
use super::{ClientError, GeocodeResult, Geocoder, ObjectStore, UploadedFile};

pub fn result(lat: f64, lng: f64, components: AddressComponents) -> GeocodeResult {
    GeocodeResult {
        geometry: Geometry { lat, lng },
        components,
    }
}

pub fn mountain_view() -> GeocodeResult {
    result(
        37.422,
        -122.084,
        AddressComponents {
            country: Some("United States".into()),
            city: Some("Mountain View".into()),
            state: Some("California".into()),
            ..Default::default()
        },
    )
}

/// Answers every address with the same results, or with an upstream failure.
pub struct StaticGeocoder {
    results: Option<Vec<GeocodeResult>>,
}

impl StaticGeocoder {
    pub fn returning(results: Vec<GeocodeResult>) -> Self {
        Self {
            results: Some(results),
        }
    }

    pub fn unreachable() -> Self {
        Self { results: None }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Vec<GeocodeResult>, ClientError> {
        self.results.clone().ok_or(ClientError::Status {
            service: "geocoder",
            status: 503,
            body: "unavailable".into(),
        })
    }
}

/// Keeps uploaded file names and hands back predictable URLs.
#[derive(Default)]
pub struct RecordingObjectStore {
    pub uploads: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingObjectStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn upload(&self, file: UploadedFile) -> Result<String, ClientError> {
        if self.fail {
            return Err(ClientError::Status {
                service: "object storage",
                status: 500,
                body: "boom".into(),
            });
        }
        self.uploads.lock().unwrap().push(file.file_name.clone());
        Ok(format!("https://storage.test/bucket/{}", file.file_name))
    }
}
