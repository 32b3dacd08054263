//! In-memory stores backing service and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{DeviceStore, JourneyStore, StoreError};
use crate::models::device::{Device, NewDevice};
use crate::models::journey::Journey;

#[derive(Default)]
pub struct InMemoryDeviceStore {
    devices: Mutex<Vec<Device>>,
}

impl InMemoryDeviceStore {
    pub fn len(&self) -> usize {
        self.devices.lock().unwrap().len()
    }
}

#[async_trait]
impl DeviceStore for InMemoryDeviceStore {
    async fn insert(&self, device: NewDevice) -> Result<Device, StoreError> {
        let mut devices = self.devices.lock().unwrap();
        if devices.iter().any(|d| d.device_key == device.device_key) {
            return Err(StoreError::DuplicateKey(device.device_key));
        }
        let created = Device {
            id: Uuid::new_v4(),
            device_key: device.device_key,
            device_name: device.device_name,
            base_url: device.base_url,
            printer_name: device.printer_name,
            device_location: device.location,
            latitude: device.latitude,
            longitude: device.longitude,
            background_image: None,
            no_of_rolls: None,
            created_at: Utc::now(),
        };
        devices.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Device>, StoreError> {
        let mut devices: Vec<Device> = self.devices.lock().unwrap().iter().rev().cloned().collect();
        // stable: equal timestamps keep the latest insert first
        devices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(devices)
    }

    async fn find_by_key(&self, device_key: &str) -> Result<Option<Device>, StoreError> {
        let devices = self.devices.lock().unwrap();
        Ok(devices.iter().find(|d| d.device_key == device_key).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, StoreError> {
        let devices = self.devices.lock().unwrap();
        Ok(devices.iter().find(|d| d.id == id).cloned())
    }

    async fn update_media(
        &self,
        device_key: &str,
        background_image: Option<&str>,
        no_of_rolls: Option<i64>,
    ) -> Result<Option<Device>, StoreError> {
        let mut devices = self.devices.lock().unwrap();
        let Some(device) = devices.iter_mut().find(|d| d.device_key == device_key) else {
            return Ok(None);
        };
        if let Some(url) = background_image {
            device.background_image = Some(url.to_string());
        }
        if let Some(rolls) = no_of_rolls {
            device.no_of_rolls = Some(rolls);
        }
        Ok(Some(device.clone()))
    }

    async fn update_base_url(
        &self,
        device_key: &str,
        base_url: &str,
    ) -> Result<Option<Device>, StoreError> {
        let mut devices = self.devices.lock().unwrap();
        let Some(device) = devices.iter_mut().find(|d| d.device_key == device_key) else {
            return Ok(None);
        };
        device.base_url = Some(base_url.to_string());
        Ok(Some(device.clone()))
    }

    async fn delete_by_key(&self, device_key: &str) -> Result<Option<Device>, StoreError> {
        let mut devices = self.devices.lock().unwrap();
        let idx = devices.iter().position(|d| d.device_key == device_key);
        Ok(idx.map(|i| devices.remove(i)))
    }
}

#[derive(Default)]
pub struct InMemoryJourneyStore {
    journeys: Mutex<Vec<Journey>>,
}

impl InMemoryJourneyStore {
    fn modify(&self, id: Uuid, f: impl FnOnce(&mut Journey)) -> Option<Journey> {
        let mut journeys = self.journeys.lock().unwrap();
        let journey = journeys.iter_mut().find(|j| j.id == id)?;
        f(journey);
        journey.updated_at = Utc::now();
        Some(journey.clone())
    }
}

#[async_trait]
impl JourneyStore for InMemoryJourneyStore {
    async fn create(&self, device_key: Option<&str>) -> Result<Journey, StoreError> {
        let now = Utc::now();
        let journey = Journey {
            id: Uuid::new_v4(),
            device_key: device_key.map(str::to_string),
            frame: None,
            no_of_copies: None,
            created_at: now,
            updated_at: now,
        };
        self.journeys.lock().unwrap().push(journey.clone());
        Ok(journey)
    }

    async fn set_frame(&self, id: Uuid, frame: &str) -> Result<Option<Journey>, StoreError> {
        Ok(self.modify(id, |j| j.frame = Some(frame.to_string())))
    }

    async fn set_copies(
        &self,
        id: Uuid,
        no_of_copies: i32,
    ) -> Result<Option<Journey>, StoreError> {
        Ok(self.modify(id, |j| j.no_of_copies = Some(no_of_copies)))
    }
}
