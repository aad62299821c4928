#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pulso::api::storage::{ObjectFetcher, StorageError};
use serde_json::{json, Value};

pub const HISTORICAL_KEY: &str = "raw/dataset_macro.json";
pub const PREDICTION_KEY: &str = "raw/prediccion_dolar.json";

enum Object {
    Body(Vec<u8>),
    Fail(StorageError),
}

/// In-memory object store standing in for the bucket
#[derive(Default)]
pub struct FakeStore {
    objects: HashMap<String, Object>,
    requests: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, key: &str, value: Value) -> Self {
        self.with_body(key, &value.to_string())
    }

    pub fn with_body(mut self, key: &str, body: &str) -> Self {
        self.objects
            .insert(key.to_string(), Object::Body(body.as_bytes().to_vec()));
        self
    }

    pub fn failing(mut self, key: &str, err: StorageError) -> Self {
        self.objects.insert(key.to_string(), Object::Fail(err));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectFetcher for FakeStore {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.requests.lock().unwrap().push(key.to_string());
        match self.objects.get(key) {
            Some(Object::Body(bytes)) => Ok(bytes.clone()),
            Some(Object::Fail(err)) => Err(err.clone()),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }
}

pub fn historical_json() -> Value {
    json!([
        {"fecha_dato": "2025-01-01", "dolar_oficial": 1000.0, "reservas_bcra": 29500},
        {"fecha_dato": "2025-01-02", "dolar_oficial": 1010.0, "reservas_bcra": 29610}
    ])
}

pub fn prediction_json() -> Value {
    json!({
        "prediction_generated_on": "2025-01-02T21:00:00",
        "anchor_price": 1010.0,
        "trajectory": [
            {"date": "2025-01-03", "forecast_day": 1, "lower_bound": 1000.0, "upper_bound": 1030.0},
            {"date": "2025-01-04", "forecast_day": 2, "lower_bound": 995.0, "upper_bound": 1045.0}
        ]
    })
}

pub fn full_store() -> FakeStore {
    FakeStore::new()
        .with_json(HISTORICAL_KEY, historical_json())
        .with_json(PREDICTION_KEY, prediction_json())
}
