// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{DynamicFetchSettings, Settings};
use crate::domain::models::crawl::Domain;
use crate::engines::traits::{FetchError, FetchStrategy, StrategyKind};
use crate::utils::url_utils;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 浏览器临时用户目录
///
/// 在启动浏览器之前创建，drop时删除，启动中途被取消也不会遗留目录
struct ProfileDir(PathBuf);

impl ProfileDir {
    fn create(root: &Path) -> Result<Self, FetchError> {
        let dir = root.join(format!("prodcrawl-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).map_err(|e| {
            FetchError::RenderFailed(format!(
                "Failed to create browser profile {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self(dir))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove browser profile {}: {}", self.0.display(), e);
            }
        }
    }
}

/// 浏览器会话
///
/// 每次抓取独占一个浏览器进程和临时用户目录。无论成功、出错还是
/// 外层future被取消，会话都会被拆除：正常路径调用 `close`，其余路径由
/// `Drop` 中止事件处理任务，浏览器进程随 `Browser` 的drop被杀掉
struct BrowserSession {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    // Declared last so the directory outlives the browser process
    _profile: ProfileDir,
}

impl BrowserSession {
    async fn launch(
        settings: &DynamicFetchSettings,
        profile_root: &Path,
    ) -> Result<Self, FetchError> {
        let profile = ProfileDir::create(profile_root)?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(profile.path())
            .request_timeout(settings.timeout())
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &settings.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        let config = builder
            .build()
            .map_err(|e| FetchError::RenderFailed(format!("Invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::RenderFailed(format!("Failed to launch browser: {}", e)))?;

        // Spawn a handler to process browser events
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Some(browser),
            handler,
            _profile: profile,
        })
    }

    async fn render(&self, url: &str, settle_delay: Duration) -> Result<String, FetchError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| FetchError::RenderFailed("Browser session already closed".to_string()))?;

        // new_page navigates and waits for the load event
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::RenderFailed(format!("Navigation failed: {}", e)))?;

        tokio::time::sleep(settle_delay).await;

        let content = page
            .content()
            .await
            .map_err(|e| FetchError::RenderFailed(format!("Failed to read document: {}", e)));

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        content
    }

    async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                debug!("Browser close failed: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Waiting for browser exit failed: {}", e);
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.browser.take().is_some() {
            warn!("Browser session dropped before close, killing browser process");
        }
    }
}

/// 动态抓取引擎
///
/// 基于chromiumoxide的无头浏览器渲染，等待固定的渲染时间后读取完整DOM
pub struct DynamicFetch {
    settings: DynamicFetchSettings,
    scheme: String,
    profile_root: PathBuf,
}

impl DynamicFetch {
    pub fn new(settings: DynamicFetchSettings, scheme: &str) -> Self {
        Self {
            settings,
            scheme: scheme.to_string(),
            profile_root: std::env::temp_dir(),
        }
    }

    /// 设置浏览器临时用户目录的父目录，默认为系统临时目录
    pub fn with_profile_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.profile_root = root.into();
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.dynamic_fetch.clone(), &settings.crawler.scheme)
    }
}

#[async_trait]
impl FetchStrategy for DynamicFetch {
    /// 执行浏览器渲染抓取
    ///
    /// # 参数
    ///
    /// * `domain` - 目标域名
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 渲染后的HTML
    /// * `Err(FetchError)` - 浏览器启动失败、导航失败或超时
    async fn fetch(&self, domain: &Domain) -> Result<String, FetchError> {
        let url = url_utils::homepage_url(&self.scheme, domain.as_str())
            .map_err(|e| FetchError::InvalidTarget(format!("{}: {}", domain, e)))?;

        let session = BrowserSession::launch(&self.settings, &self.profile_root).await?;
        info!(domain = %domain, "Browser session started");

        let timeout = self.settings.timeout();
        let rendered = tokio::time::timeout(
            timeout,
            session.render(url.as_str(), self.settings.settle_delay()),
        )
        .await
        .unwrap_or_else(|_| {
            Err(FetchError::RenderFailed(format!(
                "Navigation timed out after {:?}",
                timeout
            )))
        });

        session.close().await;
        debug!(domain = %domain, ok = rendered.is_ok(), "Browser session closed");

        rendered
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Dynamic
    }

    fn name(&self) -> &'static str {
        "dynamic"
    }
}
