use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DeviceStore, StoreError};
use crate::models::device::{Device, DeviceRow, NewDevice};

const COLUMNS: &str = "id, device_key, device_name, base_url, printer_name, country, city, state,
     latitude, longitude, background_image, no_of_rolls, created_at";

#[derive(Clone)]
pub struct PgDeviceStore {
    db: PgPool,
}

impl PgDeviceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeviceStore for PgDeviceStore {
    async fn insert(&self, device: NewDevice) -> Result<Device, StoreError> {
        let sql = format!(
            "INSERT INTO devices (device_key, device_name, base_url, printer_name,
                                  country, city, state, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(&device.device_key)
            .bind(&device.device_name)
            .bind(&device.base_url)
            .bind(&device.printer_name)
            .bind(&device.location.country)
            .bind(&device.location.city)
            .bind(&device.location.state)
            .bind(device.latitude)
            .bind(device.longitude)
            .fetch_one(&self.db)
            .await
            .map(Device::from)
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateKey(device.device_key.clone())
                }
                e => StoreError::Database(e),
            })
    }

    async fn list(&self) -> Result<Vec<Device>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM devices ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, DeviceRow>(&sql)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn find_by_key(&self, device_key: &str) -> Result<Option<Device>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM devices WHERE device_key = $1");
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(device_key)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Device::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM devices WHERE id = $1");
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Device::from))
    }

    async fn update_media(
        &self,
        device_key: &str,
        background_image: Option<&str>,
        no_of_rolls: Option<i64>,
    ) -> Result<Option<Device>, StoreError> {
        let sql = format!(
            "UPDATE devices
             SET background_image = COALESCE($2, background_image),
                 no_of_rolls = COALESCE($3, no_of_rolls)
             WHERE device_key = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(device_key)
            .bind(background_image)
            .bind(no_of_rolls)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Device::from))
    }

    async fn update_base_url(
        &self,
        device_key: &str,
        base_url: &str,
    ) -> Result<Option<Device>, StoreError> {
        let sql = format!(
            "UPDATE devices SET base_url = $2 WHERE device_key = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(device_key)
            .bind(base_url)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Device::from))
    }

    async fn delete_by_key(&self, device_key: &str) -> Result<Option<Device>, StoreError> {
        let sql = format!("DELETE FROM devices WHERE device_key = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(device_key)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Device::from))
    }
}
