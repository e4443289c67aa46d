// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::{Domain, DomainResult, DomainState};
use crate::domain::services::product_extractor::ProductExtractor;
use crate::engines::router::FetchRouter;
use tracing::{debug, info};

/// 域名爬取器
///
/// 单个域名的流水线：抓取 → 提取 → 规范化。抓取错误不会越过这里，
/// 一律转换为失败状态的结果
pub struct DomainCrawler {
    router: FetchRouter,
    extractor: ProductExtractor,
}

impl DomainCrawler {
    pub fn new(router: FetchRouter, extractor: ProductExtractor) -> Self {
        Self { router, extractor }
    }

    /// 爬取单个域名
    pub async fn crawl(&self, domain: &Domain) -> DomainResult {
        self.crawl_with_progress(domain, |_| {}).await
    }

    /// 爬取单个域名并上报状态变化
    ///
    /// # 参数
    ///
    /// * `domain` - 目标域名
    /// * `progress` - 进入 Fetching、Extracting 时回调，Done 由调用方记录
    ///
    /// # 返回值
    ///
    /// 域名结果。没有找到产品链接仍然是成功
    pub async fn crawl_with_progress<F>(&self, domain: &Domain, mut progress: F) -> DomainResult
    where
        F: FnMut(DomainState) + Send,
    {
        progress(DomainState::Fetching);
        let routed = self.router.route(domain).await;

        let html = match routed.outcome.result {
            Ok(html) => html,
            Err(e) => {
                info!(domain = %domain, strategy = %routed.outcome.strategy, "Domain failed: {}", e);
                return DomainResult::failure(domain.clone(), e.kind());
            }
        };

        progress(DomainState::Extracting);
        let urls = self.extractor.extract(&html, domain);
        debug!(
            domain = %domain,
            strategy = %routed.outcome.strategy,
            product_urls = urls.len(),
            "Extraction finished"
        );

        match routed.degraded {
            Some(kind) => DomainResult::partial(domain.clone(), urls, kind),
            None => DomainResult::success(domain.clone(), urls),
        }
    }
}
