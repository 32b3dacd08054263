use std::sync::Arc;

use uuid::Uuid;

use crate::clients::{GeocodeResult, Geocoder, ObjectStore, UploadedFile};
use crate::db::DeviceStore;
use crate::error::AppError;
use crate::models::device::{Device, DeviceLocation, NewDevice, Registration, UpdatedFields};

/// Picks country, best-effort city and state out of a geocoding result.
pub fn resolve_location(result: &GeocodeResult) -> Result<DeviceLocation, AppError> {
    let c = &result.components;
    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    let country = present(&c.country)
        .ok_or_else(|| AppError::validation("Could not determine country from address"))?;
    let city = [&c.city, &c.town, &c.village, &c.county]
        .into_iter()
        .find_map(present)
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(DeviceLocation {
        country,
        city,
        state: present(&c.state).unwrap_or_default(),
    })
}

/// Result of a background/roll-count update.
#[derive(Debug)]
pub struct MediaUpdate {
    pub device: Device,
    pub updated: UpdatedFields,
}

#[derive(Clone)]
pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
    geocoder: Arc<dyn Geocoder>,
    objects: Arc<dyn ObjectStore>,
}

impl DeviceService {
    pub fn new(
        store: Arc<dyn DeviceStore>,
        geocoder: Arc<dyn Geocoder>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            store,
            geocoder,
            objects,
        }
    }

    #[tracing::instrument(skip(self, reg), fields(device_key = %reg.device_key))]
    pub async fn register(&self, reg: Registration) -> Result<Device, AppError> {
        let results = self.geocoder.geocode(&reg.address).await?;
        let Some(first) = results.first() else {
            tracing::warn!(address = %reg.address, "address returned no geocoding results");
            return Err(AppError::Geocode("Address could not be geocoded".to_string()));
        };
        let location = resolve_location(first)?;

        let device = self
            .store
            .insert(NewDevice {
                device_key: reg.device_key,
                device_name: reg.device_name,
                base_url: reg.base_url,
                printer_name: reg.printer_name,
                location,
                latitude: first.geometry.lat,
                longitude: first.geometry.lng,
            })
            .await?;

        tracing::info!(id = %device.id, city = %device.device_location.city, "device registered");
        Ok(device)
    }

    /// Lists every device, newest first. An empty collection is reported as not found.
    pub async fn list(&self) -> Result<Vec<Device>, AppError> {
        let devices = self.store.list().await?;
        if devices.is_empty() {
            return Err(AppError::NotFound("No devices found".to_string()));
        }
        Ok(devices)
    }

    pub async fn get(&self, device_key: &str) -> Result<Device, AppError> {
        self.store
            .find_by_key(device_key)
            .await?
            .ok_or_else(AppError::device_not_found)
    }

    /// Uploads the optional file and writes the optional roll count.
    ///
    /// The upload happens before the row is written; if that write fails the
    /// stored object is left behind.
    #[tracing::instrument(skip(self, file), fields(has_file = file.is_some()))]
    pub async fn update_media(
        &self,
        device_key: &str,
        file: Option<UploadedFile>,
        no_of_rolls: Option<i64>,
    ) -> Result<MediaUpdate, AppError> {
        let existing = self.get(device_key).await?;

        let background_image = match file {
            Some(file) => Some(self.objects.upload(file).await?),
            None => None,
        };

        let device = if background_image.is_none() && no_of_rolls.is_none() {
            existing
        } else {
            self.store
                .update_media(device_key, background_image.as_deref(), no_of_rolls)
                .await?
                .ok_or_else(AppError::device_not_found)?
        };

        tracing::info!(
            background_updated = background_image.is_some(),
            ?no_of_rolls,
            "device media updated"
        );
        Ok(MediaUpdate {
            device,
            updated: UpdatedFields {
                background_image,
                no_of_rolls,
            },
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, device_key: &str) -> Result<Device, AppError> {
        let device = self
            .store
            .delete_by_key(device_key)
            .await?
            .ok_or_else(AppError::device_not_found)?;
        tracing::info!(id = %device.id, "device deleted");
        Ok(device)
    }

    /// Sets `base_url` without validating it. An absent value leaves the record as is.
    #[tracing::instrument(skip(self))]
    pub async fn update_base_url(
        &self,
        device_key: &str,
        base_url: Option<&str>,
    ) -> Result<Device, AppError> {
        let updated = match base_url {
            Some(url) => self.store.update_base_url(device_key, url).await?,
            None => self.store.find_by_key(device_key).await?,
        };
        updated.ok_or_else(AppError::device_not_found)
    }

    /// Looks a device up by internal id and reports its stored roll count.
    pub async fn remaining_copies(&self, id: Uuid) -> Result<(Device, Option<i64>), AppError> {
        let device = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::device_not_found)?;
        let remaining = device.no_of_rolls;
        Ok((device, remaining))
    }
}
