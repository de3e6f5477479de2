// src/test_support.rs
// DOCUMENTATION: Shared fakes for unit tests
// PURPOSE: In-memory restaurant store and misbehaving cache backends

use crate::db::RestaurantSource;
use crate::errors::{CacheError, QEatsError};
use crate::models::{MenuItem, RestaurantRecord};
use crate::services::CacheBackend;
use async_trait::async_trait;
use chrono::NaiveTime;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const ORIGIN_LAT: f64 = 12.9716;
pub const ORIGIN_LON: f64 = 77.5946;

pub fn at(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// Record ~`km_north` kilometers north of the origin, open 09:00-22:00
pub fn restaurant(id: &str, name: &str, attributes: &[&str], km_north: f64) -> RestaurantRecord {
    RestaurantRecord {
        restaurant_id: id.to_string(),
        name: name.to_string(),
        city: Some("Bengaluru".to_string()),
        image_url: None,
        latitude: ORIGIN_LAT + km_north / 111.195,
        longitude: ORIGIN_LON,
        opens_at: at(9, 0, 0),
        closes_at: at(22, 0, 0),
        attributes: attributes.iter().map(|a| a.to_string()).collect(),
        menu_items: vec![MenuItem {
            name: format!("{} special", name),
            attributes: vec![],
        }],
    }
}

/// Lookups the fake store can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    All,
    NameExact,
    NameContaining,
    AttributeExact,
    AttributeContaining,
}

/// In-memory RestaurantSource with call counting, latency and failure injection
#[derive(Default)]
pub struct InMemorySource {
    records: Mutex<Vec<RestaurantRecord>>,
    failing: Mutex<HashSet<Lookup>>,
    delays: Mutex<HashMap<Lookup, Duration>>,
    answered: Mutex<HashMap<Lookup, usize>>,
    fetch_all_calls: AtomicUsize,
}

impl InMemorySource {
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn fail(&self, lookup: Lookup) {
        self.failing.lock().unwrap().insert(lookup);
    }

    /// Make `lookup` sleep before answering
    pub fn delay(&self, lookup: Lookup, by: Duration) {
        self.delays.lock().unwrap().insert(lookup, by);
    }

    /// How many times `lookup` got past its delay
    pub fn answered(&self, lookup: Lookup) -> usize {
        self.answered.lock().unwrap().get(&lookup).copied().unwrap_or(0)
    }

    pub fn replace_records(&self, records: Vec<RestaurantRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    async fn select(
        &self,
        lookup: Lookup,
        pred: impl Fn(&RestaurantRecord) -> bool,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        let delay = self.delays.lock().unwrap().get(&lookup).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        *self.answered.lock().unwrap().entry(lookup).or_insert(0) += 1;

        if self.failing.lock().unwrap().contains(&lookup) {
            return Err(QEatsError::SourceFetch(format!("{:?} unavailable", lookup)));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| pred(r))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RestaurantSource for InMemorySource {
    async fn fetch_all(&self) -> Result<Vec<RestaurantRecord>, QEatsError> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        self.select(Lookup::All, |_| true).await
    }

    async fn fetch_by_name_exact(&self, text: &str) -> Result<Vec<RestaurantRecord>, QEatsError> {
        let text = text.to_lowercase();
        self.select(Lookup::NameExact, |r| r.name.to_lowercase() == text)
            .await
    }

    async fn fetch_by_name_containing(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        let text = text.to_lowercase();
        self.select(Lookup::NameContaining, |r| {
            r.name.to_lowercase().contains(&text)
        })
        .await
    }

    async fn fetch_by_attribute_exact(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        let text = text.to_lowercase();
        self.select(Lookup::AttributeExact, |r| {
            r.attributes.iter().any(|a| a.to_lowercase() == text)
        })
        .await
    }

    async fn fetch_by_attribute_containing(
        &self,
        text: &str,
    ) -> Result<Vec<RestaurantRecord>, QEatsError> {
        let text = text.to_lowercase();
        self.select(Lookup::AttributeContaining, |r| {
            r.attributes.iter().any(|a| a.to_lowercase().contains(&text))
        })
        .await
    }
}

/// Backend that claims to be up but refuses every call
pub struct UnreachableCache {
    pub writes: AtomicUsize,
}

impl UnreachableCache {
    pub fn new() -> Self {
        Self {
            writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CacheBackend for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_with_expiry(
        &self,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Backend that reads fine but rejects writes
pub struct ReadOnlyCache;

#[async_trait]
impl CacheBackend for ReadOnlyCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set_with_expiry(
        &self,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Backend("OOM command not allowed".to_string()))
    }

    async fn is_available(&self) -> bool {
        true
    }
}
