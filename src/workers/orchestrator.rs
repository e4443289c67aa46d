// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::crawl::{CrawlReport, Domain, DomainResult, FailureKind};
use crate::domain::services::domain_crawler::DomainCrawler;
use crate::domain::services::product_extractor::ProductExtractor;
use crate::engines::dynamic_fetch::DynamicFetch;
use crate::engines::router::FetchRouter;
use crate::engines::static_fetch::StaticFetch;
use crate::infrastructure::export::ReportExporter;
use crate::utils::errors::CrawlError;
use crate::workers::aggregator::{CrawlEvent, ResultAggregator};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};

/// 爬取调度器
///
/// 在有界的工作池中并发爬取所有域名。每个域名有独立的超时，
/// 单个域名的失败或超时不会影响其他域名
pub struct CrawlOrchestrator {
    crawler: Arc<DomainCrawler>,
    workers: usize,
    domain_timeout: Duration,
}

impl CrawlOrchestrator {
    /// 创建调度器
    ///
    /// # 参数
    ///
    /// * `crawler` - 单域名爬取器
    /// * `workers` - 同时运行的域名数量上限
    /// * `domain_timeout` - 单个域名的爬取期限
    pub fn new(crawler: DomainCrawler, workers: usize, domain_timeout: Duration) -> Self {
        Self {
            crawler: Arc::new(crawler),
            workers,
            domain_timeout,
        }
    }

    /// 根据配置创建调度器
    ///
    /// 先校验配置，再构建静态、动态抓取策略和链接提取器
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlOrchestrator)` - 调度器
    /// * `Err(CrawlError)` - 配置无效
    pub fn from_settings(settings: &Settings) -> Result<Self, CrawlError> {
        settings.validate()?;

        let static_fetch = StaticFetch::from_settings(settings)
            .map_err(|e| CrawlError::Configuration(format!("无法创建HTTP客户端: {}", e)))?;
        let dynamic_fetch = DynamicFetch::from_settings(settings);
        let extractor = ProductExtractor::from_settings(settings)?;
        let router = FetchRouter::with_settings(
            Arc::new(static_fetch),
            Arc::new(dynamic_fetch),
            extractor.markers().clone(),
            settings,
        )?;

        Ok(Self::new(
            DomainCrawler::new(router, extractor),
            settings.crawler.workers,
            settings.crawler.domain_timeout(),
        ))
    }

    /// 爬取所有域名
    ///
    /// # 参数
    ///
    /// * `domains` - 输入域名，重复的域名只爬取一次
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlReport)` - 每个不同的输入域名恰好对应一个结果
    /// * `Err(CrawlError)` - 域名列表为空或工作池大小为0
    pub async fn run(&self, domains: &[Domain]) -> Result<CrawlReport, CrawlError> {
        if domains.is_empty() {
            return Err(CrawlError::Configuration("域名列表不能为空".to_string()));
        }
        if self.workers == 0 {
            return Err(CrawlError::Configuration("workers 必须大于0".to_string()));
        }

        let mut seen = HashSet::new();
        let domains: Vec<Domain> = domains
            .iter()
            .filter(|d| seen.insert(*d))
            .cloned()
            .collect();

        info!(
            domains = domains.len(),
            workers = self.workers,
            timeout_secs = self.domain_timeout.as_secs(),
            "Starting crawl"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let collector = tokio::spawn(ResultAggregator::new(&domains).collect(rx));

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for domain in domains {
            let crawler = self.crawler.clone();
            let semaphore = semaphore.clone();
            let tx = tx.clone();
            let timeout = self.domain_timeout;
            let span = info_span!("crawl_domain", domain = %domain);

            tasks.spawn(
                async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            error!("Worker pool closed: {}", e);
                            return;
                        }
                    };

                    let progress_tx = tx.clone();
                    let progress_domain = domain.clone();
                    let crawl = crawler.crawl_with_progress(&domain, move |state| {
                        let _ = progress_tx.send(CrawlEvent::Transition {
                            domain: progress_domain.clone(),
                            state,
                        });
                    });

                    // Dropping the crawl future on expiry tears down any browser session
                    let result = match tokio::time::timeout(timeout, crawl).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(timeout_secs = timeout.as_secs(), "Domain crawl timed out");
                            DomainResult::failure(domain.clone(), FailureKind::Timeout)
                        }
                    };

                    info!(
                        status = %result.status,
                        product_urls = result.urls.len(),
                        "Domain finished"
                    );
                    let _ = tx.send(CrawlEvent::Completed(result));
                }
                .instrument(span),
            );
        }
        drop(tx);

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Crawl task aborted: {}", e);
            }
        }

        let report = collector
            .await
            .map_err(|e| CrawlError::Aggregation(e.to_string()))?;

        let summary = report.summary();
        info!(
            succeeded = summary.succeeded,
            partially_failed = summary.partially_failed,
            failed = summary.failed,
            product_urls = summary.product_urls,
            "Crawl finished"
        );

        Ok(report)
    }

    /// 爬取所有域名并把完整报告交给导出器
    ///
    /// 报告只导出一次，导出失败时返回错误
    pub async fn run_and_export(
        &self,
        domains: &[Domain],
        exporter: &dyn ReportExporter,
    ) -> Result<CrawlReport, CrawlError> {
        let report = self.run(domains).await?;
        exporter.export(&report).await?;
        Ok(report)
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
