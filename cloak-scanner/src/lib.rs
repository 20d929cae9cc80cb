//! # Cloak Scanner
//!
//! Determines which on-chain announcements belong to a recipient.
//!
//! ## Algorithm
//!
//! For each announcement record:
//!
//! 1. Reconstruct the ephemeral public key from the record's bare X
//!    coordinate, assuming even parity (the shared secret hashes only the X
//!    coordinate, so the assumption is provably harmless — see
//!    `cloak_crypto::keypair`)
//! 2. Decrypt the ciphertext with the viewing private key to get a candidate
//!    secret
//! 3. Multiply the spending public key by the candidate; the record matches
//!    iff the product's address equals the record's receiver
//!
//! Decryption is unconditional XOR, so non-matching records still "decrypt" —
//! they just derive a different address. Any hard failure on a single record
//! (malformed coordinate, out-of-range candidate scalar) marks that record as
//! a non-match and never aborts the batch.
//!
//! ## Concurrency
//!
//! Scanning is embarrassingly parallel. Records are partitioned round-robin
//! into N disjoint shards (N = available parallelism, floor of 2), each
//! processed by an isolated blocking worker with no shared mutable state.
//! Workers communicate only by message passing: incremental progress counts
//! and one final result batch, after which they terminate. A single
//! controller task aggregates counts and batches; merge preserves per-shard
//! relative order, but the overall output order is unspecified beyond being
//! exactly the matching set — callers sort as needed.
//!
//! There is no cancellation primitive: a scan runs to completion once
//! started, and an abandoning caller simply drops the future (workers are
//! side-effect-free, so abandonment is survivable).
//!
//! ## Example
//!
//! ```rust,ignore
//! use cloak_scanner::Scanner;
//!
//! let scanner = Scanner::new(spending_public, viewing_private)?;
//! let matches = scanner.scan(records).await?;
//! for found in matches {
//!     println!("payment at {}", found.record.receiver);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use cloak_core::constants::{MIN_SCAN_SHARDS, SCAN_PROGRESS_STRIDE};
use cloak_core::error::{CloakError, Result};
use cloak_core::types::{AnnouncementRecord, EncryptedPayload};
use cloak_crypto::KeyPair;

/// Scanner configuration.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// Number of shards for parallel scanning. `None` uses the machine's
    /// available parallelism, floored at [`MIN_SCAN_SHARDS`].
    pub shard_count: Option<usize>,
    /// Records processed between progress messages.
    pub progress_stride: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            shard_count: None,
            progress_stride: SCAN_PROGRESS_STRIDE,
        }
    }
}

impl ScannerConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit shard count.
    pub fn shard_count(mut self, count: usize) -> Self {
        self.shard_count = Some(count.max(1));
        self
    }

    /// Sets the progress reporting stride.
    pub fn progress_stride(mut self, stride: usize) -> Self {
        self.progress_stride = stride.max(1);
        self
    }
}

/// Scan progress snapshot.
///
/// `percent` is monotonically non-decreasing across a scan and reaches
/// exactly 100 on completion regardless of how records divide across shards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Total records in the scan.
    pub total: usize,
    /// Records completed so far.
    pub completed: usize,
    /// Completion percentage (0–100).
    pub percent: u8,
}

/// Callback invoked with progress snapshots.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

/// An announcement determined to belong to the recipient.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanMatch {
    /// The matching record.
    pub record: AnnouncementRecord,
    /// The recovered per-send secret (fixed-width hex), the material needed
    /// to later derive the spendable private key.
    pub random_secret: String,
}

impl ScanMatch {
    /// Derives the spendable stealth private key with the recipient's
    /// spending private key.
    pub fn derive_private_key(&self, spending_private: &KeyPair) -> Result<KeyPair> {
        spending_private.mul_private_key(&self.random_secret)
    }
}

enum WorkerMessage {
    Progress(usize),
    Done {
        shard: usize,
        matches: Vec<ScanMatch>,
    },
}

/// Scans announcement records for payments addressed to one recipient.
///
/// Holds the spending *public* key and the viewing *private* key — exactly
/// the material a delegated scanning service needs, and no spending
/// authority.
#[derive(Clone)]
pub struct Scanner {
    spending_public: KeyPair,
    viewing_private: KeyPair,
    config: ScannerConfig,
}

impl Scanner {
    /// Creates a scanner.
    ///
    /// # Errors
    /// `MissingPrivateKey` if the viewing key has no private half.
    pub fn new(spending_public: KeyPair, viewing_private: KeyPair) -> Result<Self> {
        Self::with_config(spending_public, viewing_private, ScannerConfig::default())
    }

    /// Creates a scanner with custom configuration.
    pub fn with_config(
        spending_public: KeyPair,
        viewing_private: KeyPair,
        config: ScannerConfig,
    ) -> Result<Self> {
        if !viewing_private.has_private_key() {
            return Err(CloakError::MissingPrivateKey);
        }
        Ok(Self {
            spending_public: spending_public.public_only(),
            viewing_private,
            config,
        })
    }

    /// Evaluates a single record. `None` means "not addressed to this
    /// recipient" — including records that fail decryption or validation.
    pub fn check_record(&self, record: &AnnouncementRecord) -> Option<ScanMatch> {
        if record.validate().is_err() {
            return None;
        }
        let pkx = record.pkx_array().ok()?;
        let ephemeral = KeyPair::decompress_assuming_even(&pkx).ok()?;
        let ciphertext = record.ciphertext_array().ok()?;
        let payload =
            EncryptedPayload::new(&ephemeral.to_uncompressed_bytes(), &ciphertext).ok()?;
        let secret = self.viewing_private.decrypt(&payload).ok()?;
        let candidate = self.spending_public.mul_public_key(&secret).ok()?;
        (candidate.address() == record.receiver).then(|| ScanMatch {
            record: record.clone(),
            random_secret: secret,
        })
    }

    /// Scans all records in parallel, returning the matching subset.
    #[instrument(skip(self, records), fields(total = records.len()))]
    pub async fn scan(&self, records: Vec<AnnouncementRecord>) -> Result<Vec<ScanMatch>> {
        self.scan_with_progress(records, None).await
    }

    /// Scans with progress reporting.
    #[instrument(skip(self, records, callback), fields(total = records.len()))]
    pub async fn scan_with_progress(
        &self,
        records: Vec<AnnouncementRecord>,
        callback: Option<ProgressCallback>,
    ) -> Result<Vec<ScanMatch>> {
        let total = records.len();
        if total == 0 {
            if let Some(callback) = &callback {
                callback(ScanProgress {
                    total: 0,
                    completed: 0,
                    percent: 100,
                });
            }
            return Ok(Vec::new());
        }

        let shards = self.config.shard_count.unwrap_or_else(default_shard_count);
        let stride = self.config.progress_stride;
        info!(total, shards, "starting scan");

        // Round-robin partition: disjoint shards, stable order within each
        let mut shard_records: Vec<Vec<AnnouncementRecord>> =
            (0..shards).map(|_| Vec::new()).collect();
        for (index, record) in records.into_iter().enumerate() {
            shard_records[index % shards].push(record);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        for (shard, batch) in shard_records.into_iter().enumerate() {
            let tx = tx.clone();
            let scanner = self.clone();
            // Workers terminate after their Done message: the closure returns
            // and drops its sender
            tokio::task::spawn_blocking(move || {
                let mut matches = Vec::new();
                let mut since_report = 0usize;
                for record in &batch {
                    if let Some(found) = scanner.check_record(record) {
                        matches.push(found);
                    }
                    since_report += 1;
                    if since_report == stride {
                        let _ = tx.send(WorkerMessage::Progress(since_report));
                        since_report = 0;
                    }
                }
                if since_report > 0 {
                    let _ = tx.send(WorkerMessage::Progress(since_report));
                }
                let _ = tx.send(WorkerMessage::Done { shard, matches });
            });
        }
        drop(tx);

        // Single controller task owns all aggregation state; workers never
        // touch shared memory
        let mut shard_results: Vec<Option<Vec<ScanMatch>>> = (0..shards).map(|_| None).collect();
        let mut completed = 0usize;
        let mut last_percent = 0u8;
        while let Some(message) = rx.recv().await {
            match message {
                WorkerMessage::Progress(count) => {
                    completed += count;
                    let percent = (completed * 100 / total) as u8;
                    if percent > last_percent {
                        last_percent = percent;
                        if let Some(callback) = &callback {
                            callback(ScanProgress {
                                total,
                                completed,
                                percent,
                            });
                        }
                    }
                }
                WorkerMessage::Done { shard, matches } => {
                    debug!(shard, matches = matches.len(), "shard complete");
                    shard_results[shard] = Some(matches);
                }
            }
        }

        // Every record reports exactly once, so the final percent is exactly
        // 100 even when total % shards != 0
        if last_percent < 100 {
            warn!(completed, total, "scan ended below 100 percent");
            if let Some(callback) = &callback {
                callback(ScanProgress {
                    total,
                    completed,
                    percent: 100,
                });
            }
        }

        let mut all = Vec::new();
        for result in shard_results {
            let matches = result.ok_or_else(|| {
                CloakError::InternalError("scan worker terminated before reporting".into())
            })?;
            all.extend(matches);
        }
        info!(matches = all.len(), "scan complete");
        Ok(all)
    }

    /// Sequential fallback: chunked processing with periodic progress
    /// callbacks. Same output set as the parallel path, different latency.
    pub fn scan_sequential(
        &self,
        records: &[AnnouncementRecord],
        callback: Option<&(dyn Fn(ScanProgress))>,
    ) -> Vec<ScanMatch> {
        let total = records.len();
        if total == 0 {
            if let Some(callback) = callback {
                callback(ScanProgress {
                    total: 0,
                    completed: 0,
                    percent: 100,
                });
            }
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut completed = 0usize;
        let mut last_percent = 0u8;
        for chunk in records.chunks(self.config.progress_stride) {
            for record in chunk {
                if let Some(found) = self.check_record(record) {
                    matches.push(found);
                }
            }
            completed += chunk.len();
            let percent = (completed * 100 / total) as u8;
            if percent > last_percent {
                last_percent = percent;
                if let Some(callback) = callback {
                    callback(ScanProgress {
                        total,
                        completed,
                        percent,
                    });
                }
            }
        }
        matches
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("spending_public", &self.spending_public)
            .field("viewing_private", &"[REDACTED]")
            .field("config", &self.config)
            .finish()
    }
}

fn default_shard_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_SCAN_SHARDS)
        .max(MIN_SCAN_SHARDS)
}
