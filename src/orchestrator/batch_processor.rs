//! Batch processor - orchestration layer
//!
//! Fans out one PageNavigator task per protection number, bounded by a
//! semaphore and processed in batches, then classifies every successful
//! extraction and persists it through the record store. The batch run is a
//! join barrier: it returns only after every spawned task reached a terminal
//! state, and one task's failure never cancels its siblings.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::{AutoThrottle, HttpPortal, Portal};
use crate::models::ProtectionNumber;
use crate::services::{classify, CsvRecordStore, FailureWriter, RecordStore};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_numbers_loaded, log_startup,
    print_final_stats,
};
use crate::workflow::{PageNavigator, TaskCtx};

/// Outcome of the fan-out phase: extracted codes or the failure that ended
/// the task. Every input number appears exactly once.
pub type BatchOutcomes = HashMap<ProtectionNumber, std::result::Result<Vec<String>, AppError>>;

/// Application main structure
pub struct App {
    config: Config,
    portal: Arc<dyn Portal>,
    store: Box<dyn RecordStore>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl App {
    /// Initialize the application against the real portal and CSV store
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(config.max_concurrent_tasks, &config.entry_url);

        let throttle = Arc::new(AutoThrottle::new(&config));
        let portal: Arc<dyn Portal> = Arc::new(HttpPortal::new(&config, throttle)?);
        let store: Box<dyn RecordStore> = Box::new(
            CsvRecordStore::open(&config.input_csv)
                .with_context(|| format!("reading protection numbers from {}", config.input_csv))?,
        );

        Ok(Self::new(config, portal, store))
    }

    /// Assemble an application from its parts (offline runs, tests)
    pub fn new(config: Config, portal: Arc<dyn Portal>, store: Box<dyn RecordStore>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            portal,
            store,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Run the batch: navigate, classify, write back, report
    pub async fn run(mut self) -> Result<()> {
        let numbers = self.store.read_all()?;
        if numbers.is_empty() {
            bail!("no protection numbers found in {}", self.config.input_csv);
        }
        log_numbers_loaded(numbers.len(), self.config.max_concurrent_tasks);

        self.spawn_shutdown_watcher();

        let outcomes = run_batch(
            Arc::clone(&self.portal),
            &self.config,
            numbers,
            self.shutdown_rx.clone(),
        )
        .await?;

        let (success, failed) = self.persist_outcomes(&outcomes).await;

        self.store.flush().context("flushing the record store")?;
        info!("✓ record store flushed");

        print_final_stats(success, &failed, outcomes.len(), &self.config.output_log_file);
        Ok(())
    }

    /// Classify successful extractions and write them back; collect failures
    async fn persist_outcomes(&mut self, outcomes: &BatchOutcomes) -> (usize, Vec<String>) {
        let failure_writer = FailureWriter::with_path(&self.config.failure_report_file);
        let mut success = 0usize;
        let mut failed = Vec::new();

        for (number, outcome) in outcomes {
            match outcome {
                Ok(codes) => {
                    let result = classify(codes);
                    if self.config.verbose_logging {
                        info!("{}: {} | {}", number, result.verdict, result.despacho_text());
                    }
                    match self.store.write(number, &result) {
                        Ok(()) => success += 1,
                        Err(e) => {
                            // Write failures are per-row: log, report, move on
                            error!("❌ failed to persist {}: {}", number, e);
                            self.report_failure(&failure_writer, number, &e.to_string()).await;
                            failed.push(number.to_string());
                        }
                    }
                }
                Err(e) => {
                    warn!("⚠️ {} was not classified: {}", number, e);
                    self.report_failure(&failure_writer, number, &e.to_string()).await;
                    failed.push(number.to_string());
                }
            }
        }

        (success, failed)
    }

    async fn report_failure(
        &self,
        failure_writer: &FailureWriter,
        number: &ProtectionNumber,
        reason: &str,
    ) {
        if let Err(e) = failure_writer.write(number, reason).await {
            error!("failed to append {} to the failure report: {}", number, e);
        }
    }

    /// Wire Ctrl-C to the shutdown flag
    ///
    /// Once the flag is set no new tasks are started; in-flight tasks run to
    /// their terminal state.
    fn spawn_shutdown_watcher(&self) {
        let shutdown_tx = Arc::clone(&self.shutdown_tx);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⚠️ shutdown requested, letting in-flight tasks finish");
                let _ = shutdown_tx.send(true);
            }
        });
    }
}

/// Run one navigation pipeline per protection number
///
/// Tasks run concurrently under the semaphore, batch by batch; the call
/// returns only after every spawned task was joined. Duplicated input numbers
/// are each executed but share one entry in the outcome map.
pub async fn run_batch(
    portal: Arc<dyn Portal>,
    config: &Config,
    numbers: Vec<ProtectionNumber>,
    shutdown: watch::Receiver<bool>,
) -> Result<BatchOutcomes> {
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_tasks));
    let total = numbers.len();
    let total_batches = total.div_ceil(config.max_concurrent_tasks);
    let mut outcomes: BatchOutcomes = HashMap::new();

    for batch_start in (0..total).step_by(config.max_concurrent_tasks) {
        let batch_end = (batch_start + config.max_concurrent_tasks).min(total);
        let batch = &numbers[batch_start..batch_end];
        let batch_num = (batch_start / config.max_concurrent_tasks) + 1;

        log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total);

        // Spawn this batch's tasks
        let mut handles = Vec::new();
        for (idx, number) in batch.iter().enumerate() {
            if *shutdown.borrow() {
                outcomes.insert(number.clone(), Err(AppError::Cancelled));
                continue;
            }

            let index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let ctx = TaskCtx::new(number.clone(), index);
            let navigator = PageNavigator::new(Arc::clone(&portal), config.entry_url.clone());

            let handle = tokio::spawn(async move {
                let _permit = permit;
                navigator.run(&ctx).await
            });
            handles.push((number.clone(), index, handle));
        }

        // Join barrier: wait for every task of this batch
        let mut batch_success = 0usize;
        let batch_size = handles.len();
        for (number, index, handle) in handles {
            match handle.await {
                Ok(Ok(codes)) => {
                    batch_success += 1;
                    outcomes.insert(number, Ok(codes));
                }
                Ok(Err(e)) => {
                    error!("[patent {} #{}] ❌ task failed: {}", number, index, e);
                    outcomes.insert(number, Err(e));
                }
                Err(e) => {
                    // A panicking task is a failure marker, not a batch abort
                    error!("[patent {} #{}] task execution failed: {}", number, index, e);
                    outcomes.insert(number, Err(AppError::TaskFailed(e.to_string())));
                }
            }
        }

        log_batch_complete(batch_num, batch_success, batch_size);
    }

    Ok(outcomes)
}
