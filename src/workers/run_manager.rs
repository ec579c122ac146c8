// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::domain::models::scrape::{BatchEntry, RunOutcome, RunStatus, ScrapeRequest};
use crate::infrastructure::observability::metrics;
use crate::infrastructure::observability::scraping_logger::ScrapingLogger;
use crate::utils::errors::{RunError, ScraperError};
use crate::workers::scrape_worker::{ImageScraper, ProgressCallback};

/// 单次任务的图片数量上限
pub const MAX_IMAGES_PER_RUN: usize = 100;
/// 批量任务中每条记录的图片数量上限
pub const MAX_IMAGES_PER_ENTRY: usize = 500;

/// 抓取器工厂
///
/// 每次运行创建一个新的 [`ImageScraper`]，浏览器会话不在运行之间共享
#[async_trait]
pub trait ScraperFactory: Send + Sync {
    async fn create(&self, logger: Arc<ScrapingLogger>) -> Result<ImageScraper, ScraperError>;
}

/// 启动 Chrome 的默认工厂
pub struct ChromiumScraperFactory {
    settings: Arc<Settings>,
}

impl ChromiumScraperFactory {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ScraperFactory for ChromiumScraperFactory {
    async fn create(&self, logger: Arc<ScrapingLogger>) -> Result<ImageScraper, ScraperError> {
        ImageScraper::launch(&self.settings, logger).await
    }
}

#[derive(Default)]
struct RunState {
    running: AtomicBool,
    progress: Mutex<String>,
}

impl RunState {
    fn set_progress(&self, message: impl Into<String>) {
        *self.progress.lock() = message.into();
    }
}

/// 运行标志守卫，任务结束（包括 panic）时释放标志
struct RunGuard {
    state: Arc<RunState>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::Release);
    }
}

/// 后台运行句柄
pub struct RunHandle {
    pub id: Uuid,
    join: JoinHandle<Result<RunOutcome, ScraperError>>,
}

impl RunHandle {
    /// 等待运行结束
    pub async fn wait(self) -> Result<RunOutcome, ScraperError> {
        self.join
            .await
            .map_err(|e| ScraperError::Worker(format!("Run {} aborted: {}", self.id, e)))?
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

enum RunPlan {
    Single(ScrapeRequest),
    Batch {
        entries: Vec<BatchEntry>,
        images_per_entry: usize,
        default_destination: PathBuf,
    },
}

impl RunPlan {
    fn kind(&self) -> &'static str {
        match self {
            RunPlan::Single(_) => "single",
            RunPlan::Batch { .. } => "batch",
        }
    }
}

/// 运行管理器
///
/// 保证进程内同一时间只有一个抓取任务，任务在独立的 tokio 任务中执行，
/// 状态与日志的读取不会被任务阻塞
pub struct RunManager {
    state: Arc<RunState>,
    factory: Arc<dyn ScraperFactory>,
    logger: Arc<ScrapingLogger>,
    storage_root: PathBuf,
    default_max_images: usize,
}

impl RunManager {
    pub fn new(settings: Arc<Settings>, logger: Arc<ScrapingLogger>) -> Self {
        let storage_root = settings.storage.root.clone();
        let default_max_images = settings.scraper.default_max_images;
        Self::with_factory(
            Arc::new(ChromiumScraperFactory::new(settings)),
            logger,
            storage_root,
            default_max_images,
        )
    }

    pub fn with_factory(
        factory: Arc<dyn ScraperFactory>,
        logger: Arc<ScrapingLogger>,
        storage_root: PathBuf,
        default_max_images: usize,
    ) -> Self {
        Self {
            state: Arc::new(RunState::default()),
            factory,
            logger,
            storage_root,
            default_max_images,
        }
    }

    pub fn logger(&self) -> &Arc<ScrapingLogger> {
        &self.logger
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// 启动单关键词抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求，`max_images` 越界时回退到默认值，目标目录为空时使用存储根目录
    /// * `on_progress` - 可选的进度回调，状态快照总会被更新
    ///
    /// # 返回值
    ///
    /// * `Ok(RunHandle)` - 任务已在后台启动
    /// * `Err(RunError)` - 已有任务在运行或请求无效
    pub fn start_run(
        &self,
        mut request: ScrapeRequest,
        on_progress: Option<ProgressCallback>,
    ) -> Result<RunHandle, RunError> {
        request.query = required(&request.query, "Search keywords are required")?;
        request.class_name = required(&request.class_name, "Class name is required")?;
        request.max_images =
            clamp_or_default(request.max_images, MAX_IMAGES_PER_RUN, self.default_max_images);
        request.destination = self.resolve_destination(&request.destination);

        self.spawn(RunPlan::Single(request), on_progress)
    }

    /// 启动批量抓取
    pub fn start_batch(
        &self,
        entries: Vec<BatchEntry>,
        images_per_entry: usize,
        default_destination: Option<PathBuf>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<RunHandle, RunError> {
        if entries.is_empty() {
            return Err(RunError::InvalidRequest(
                "At least one search entry is required".to_string(),
            ));
        }
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, mut entry)| {
                entry.query = required(
                    &entry.query,
                    &format!("Entry {} is missing search keywords", i + 1),
                )?;
                entry.class_name = required(
                    &entry.class_name,
                    &format!("Entry {} is missing a class name", i + 1),
                )?;
                Ok(entry)
            })
            .collect::<Result<Vec<_>, RunError>>()?;

        let images_per_entry =
            clamp_or_default(images_per_entry, MAX_IMAGES_PER_ENTRY, self.default_max_images);
        let default_destination =
            self.resolve_destination(default_destination.as_deref().unwrap_or(Path::new("")));

        self.spawn(
            RunPlan::Batch {
                entries,
                images_per_entry,
                default_destination,
            },
            on_progress,
        )
    }

    /// 当前状态快照，不会阻塞
    pub fn get_status(&self) -> RunStatus {
        RunStatus {
            is_running: self.state.running.load(Ordering::Acquire),
            progress: self.state.progress.lock().clone(),
        }
    }

    /// 清除上一次运行残留的进度消息
    ///
    /// 不会中断正在进行的任务；有任务运行时返回 `false`
    pub fn reset_status(&self) -> bool {
        if self.state.running.load(Ordering::Acquire) {
            return false;
        }
        self.state.set_progress(String::new());
        true
    }

    fn resolve_destination(&self, destination: &Path) -> PathBuf {
        if destination.to_string_lossy().trim().is_empty() {
            self.storage_root.clone()
        } else {
            destination.to_path_buf()
        }
    }

    fn claim(&self) -> Result<RunGuard, RunError> {
        self.state
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RunError::AlreadyRunning)?;
        Ok(RunGuard {
            state: self.state.clone(),
        })
    }

    fn spawn(
        &self,
        plan: RunPlan,
        on_progress: Option<ProgressCallback>,
    ) -> Result<RunHandle, RunError> {
        let guard = self.claim()?;
        let id = Uuid::new_v4();

        self.logger.clear_logs();
        self.state.set_progress("Initializing scraper...");
        metrics::record_run(plan.kind());
        info!("Run {} started ({})", id, plan.kind());

        let state = self.state.clone();
        let factory = self.factory.clone();
        let logger = self.logger.clone();
        let progress: ProgressCallback = {
            let state = state.clone();
            Arc::new(move |message: &str| {
                state.set_progress(message);
                if let Some(callback) = &on_progress {
                    callback(message);
                }
            })
        };

        let join = tokio::spawn(async move {
            let _guard = guard;

            let scraper = match factory.create(logger.clone()).await {
                Ok(scraper) => scraper,
                Err(e) => {
                    error!("Run {} could not start: {}", id, e);
                    logger.error(format!("Failed to initialize scraper: {}", e));
                    state.set_progress(format!("Error: {}", e));
                    return Err(e);
                }
            };

            let outcome = match plan {
                RunPlan::Single(request) => RunOutcome::Single(
                    scraper
                        .scrape_one(
                            &request.query,
                            &request.destination,
                            &request.class_name,
                            request.max_images,
                            &progress,
                        )
                        .await,
                ),
                RunPlan::Batch {
                    entries,
                    images_per_entry,
                    default_destination,
                } => RunOutcome::Batch(
                    scraper
                        .scrape_batch(&entries, images_per_entry, &default_destination, &progress)
                        .await,
                ),
            };

            if let Err(e) = scraper.close().await {
                warn!("Run {} failed to release browser: {}", id, e);
            }

            state.set_progress(format!(
                "Completed! Downloaded {} images.",
                outcome.downloaded()
            ));
            info!("Run {} finished, {} images downloaded", id, outcome.downloaded());
            Ok(outcome)
        });

        Ok(RunHandle { id, join })
    }
}

fn required(value: &str, message: &str) -> Result<String, RunError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RunError::InvalidRequest(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// 越界（包括 0）时回退到默认值而不是报错
pub fn clamp_or_default(value: usize, max: usize, default: usize) -> usize {
    if (1..=max).contains(&value) {
        value
    } else {
        default
    }
}

#[cfg(test)]
#[path = "run_manager_test.rs"]
mod tests;
