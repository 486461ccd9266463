//! Lightweight global metrics for debug snapshot retrieval.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Manifest index (loads, forced reloads, cache hits, absent index files)
//! - Snapshot loader (retry sleeps, loads, not-found, integrity failures)
//! - Panel dispatch

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Manifest -----
static MANIFEST_LOADS: AtomicU64 = AtomicU64::new(0);
static MANIFEST_RELOADS: AtomicU64 = AtomicU64::new(0);
static MANIFEST_CACHE_HITS: AtomicU64 = AtomicU64::new(0);
static MANIFEST_ABSENT: AtomicU64 = AtomicU64::new(0);

// ----- Loader -----
static RETRY_SLEEPS: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_LOADED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_BYTES_READ: AtomicU64 = AtomicU64::new(0);
static NOT_FOUND: AtomicU64 = AtomicU64::new(0);
static INTEGRITY_FAILURES: AtomicU64 = AtomicU64::new(0);

// ----- Panels -----
static PANELS_DISPATCHED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    // Manifest
    pub manifest_loads: u64,
    pub manifest_reloads: u64,
    pub manifest_cache_hits: u64,
    pub manifest_absent: u64,

    // Loader
    pub retry_sleeps: u64,
    pub snapshots_loaded: u64,
    pub snapshot_bytes_read: u64,
    pub not_found: u64,
    pub integrity_failures: u64,

    // Panels
    pub panels_dispatched: u64,
}

impl MetricsSnapshot {
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.manifest_cache_hits + self.manifest_loads;
        if total == 0 {
            0.0
        } else {
            self.manifest_cache_hits as f64 / total as f64
        }
    }
}

// ----- Recorders (Manifest) -----
pub fn record_manifest_load(forced: bool) {
    MANIFEST_LOADS.fetch_add(1, Ordering::Relaxed);
    if forced {
        MANIFEST_RELOADS.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_manifest_cache_hit() {
    MANIFEST_CACHE_HITS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_manifest_absent() {
    MANIFEST_ABSENT.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Loader) -----
pub fn record_retry_sleep() {
    RETRY_SLEEPS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_snapshot_loaded(bytes: usize) {
    SNAPSHOTS_LOADED.fetch_add(1, Ordering::Relaxed);
    SNAPSHOT_BYTES_READ.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_not_found() {
    NOT_FOUND.fetch_add(1, Ordering::Relaxed);
}

pub fn record_integrity_failure() {
    INTEGRITY_FAILURES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Panels) -----
pub fn record_panel_dispatch() {
    PANELS_DISPATCHED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        manifest_loads: MANIFEST_LOADS.load(Ordering::Relaxed),
        manifest_reloads: MANIFEST_RELOADS.load(Ordering::Relaxed),
        manifest_cache_hits: MANIFEST_CACHE_HITS.load(Ordering::Relaxed),
        manifest_absent: MANIFEST_ABSENT.load(Ordering::Relaxed),

        retry_sleeps: RETRY_SLEEPS.load(Ordering::Relaxed),
        snapshots_loaded: SNAPSHOTS_LOADED.load(Ordering::Relaxed),
        snapshot_bytes_read: SNAPSHOT_BYTES_READ.load(Ordering::Relaxed),
        not_found: NOT_FOUND.load(Ordering::Relaxed),
        integrity_failures: INTEGRITY_FAILURES.load(Ordering::Relaxed),

        panels_dispatched: PANELS_DISPATCHED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    MANIFEST_LOADS.store(0, Ordering::Relaxed);
    MANIFEST_RELOADS.store(0, Ordering::Relaxed);
    MANIFEST_CACHE_HITS.store(0, Ordering::Relaxed);
    MANIFEST_ABSENT.store(0, Ordering::Relaxed);

    RETRY_SLEEPS.store(0, Ordering::Relaxed);
    SNAPSHOTS_LOADED.store(0, Ordering::Relaxed);
    SNAPSHOT_BYTES_READ.store(0, Ordering::Relaxed);
    NOT_FOUND.store(0, Ordering::Relaxed);
    INTEGRITY_FAILURES.store(0, Ordering::Relaxed);

    PANELS_DISPATCHED.store(0, Ordering::Relaxed);
}
