// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{FetchMode, Settings};
use crate::domain::models::crawl::{Domain, FailureKind, FetchOutcome};
use crate::domain::services::product_extractor::PathMarkers;
use crate::engines::traits::{FetchStrategy, StrategyKind};
use crate::utils::errors::CrawlError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 路由后的抓取结果
#[derive(Debug)]
pub struct RoutedFetch {
    /// 最终采用的抓取结果（HTML或最后一个错误）
    pub outcome: FetchOutcome,
    /// 回退失败时记录的失败类别，此时 outcome 为静态抓取的HTML
    pub degraded: Option<FailureKind>,
}

/// 抓取路由器
///
/// 根据域名的抓取模式选择静态或动态策略，auto 模式下先静态抓取，
/// 页面中没有任何产品路径标记时再回退到动态渲染
pub struct FetchRouter {
    /// 静态抓取策略
    static_fetch: Arc<dyn FetchStrategy>,
    /// 动态抓取策略
    dynamic_fetch: Arc<dyn FetchStrategy>,
    /// 默认模式
    default_mode: FetchMode,
    /// 按域名覆盖的模式
    overrides: HashMap<Domain, FetchMode>,
    /// 判断是否需要回退的路径标记
    markers: PathMarkers,
    /// 静态抓取出错时是否回退
    fallback_on_error: bool,
}

impl FetchRouter {
    /// 创建新的抓取路由器
    ///
    /// # 参数
    ///
    /// * `static_fetch` - 静态抓取策略
    /// * `dynamic_fetch` - 动态抓取策略
    /// * `markers` - 产品路径标记
    ///
    /// # 返回值
    ///
    /// 默认模式为 auto、没有域名覆盖的路由器
    pub fn new(
        static_fetch: Arc<dyn FetchStrategy>,
        dynamic_fetch: Arc<dyn FetchStrategy>,
        markers: PathMarkers,
    ) -> Self {
        Self {
            static_fetch,
            dynamic_fetch,
            default_mode: FetchMode::Auto,
            overrides: HashMap::new(),
            markers,
            fallback_on_error: false,
        }
    }

    /// 使用配置中的模式设置创建路由器
    pub fn with_settings(
        static_fetch: Arc<dyn FetchStrategy>,
        dynamic_fetch: Arc<dyn FetchStrategy>,
        markers: PathMarkers,
        settings: &Settings,
    ) -> Result<Self, CrawlError> {
        Ok(Self::new(static_fetch, dynamic_fetch, markers)
            .with_default_mode(settings.crawler.default_mode)
            .with_overrides(settings.crawler.overrides()?)
            .with_fallback_on_error(settings.crawler.fallback_on_error))
    }

    pub fn with_default_mode(mut self, mode: FetchMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_overrides(mut self, overrides: HashMap<Domain, FetchMode>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_fallback_on_error(mut self, enabled: bool) -> Self {
        self.fallback_on_error = enabled;
        self
    }

    /// 域名对应的抓取模式
    pub fn mode_for(&self, domain: &Domain) -> FetchMode {
        self.overrides
            .get(domain)
            .copied()
            .unwrap_or(self.default_mode)
    }

    fn strategy(&self, kind: StrategyKind) -> &Arc<dyn FetchStrategy> {
        match kind {
            StrategyKind::Static => &self.static_fetch,
            StrategyKind::Dynamic => &self.dynamic_fetch,
        }
    }

    /// 使用指定策略抓取一次并计时
    pub async fn fetch_with(&self, domain: &Domain, kind: StrategyKind) -> FetchOutcome {
        let strategy = self.strategy(kind);
        let start = Instant::now();
        let result = strategy.fetch(domain).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(html) => info!(
                domain = %domain,
                strategy = strategy.name(),
                bytes = html.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Fetch succeeded"
            ),
            Err(e) => warn!(
                domain = %domain,
                strategy = strategy.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Fetch failed: {}",
                e
            ),
        }

        FetchOutcome {
            domain: domain.clone(),
            strategy: kind,
            result,
            elapsed,
        }
    }

    /// 按域名的抓取模式路由请求
    ///
    /// # 参数
    ///
    /// * `domain` - 目标域名
    ///
    /// # 返回值
    ///
    /// 最终采用的抓取结果，以及回退失败时的降级标记
    pub async fn route(&self, domain: &Domain) -> RoutedFetch {
        let mode = self.mode_for(domain);
        debug!(domain = %domain, mode = %mode, "Routing fetch");

        match mode {
            FetchMode::Static => RoutedFetch {
                outcome: self.fetch_with(domain, StrategyKind::Static).await,
                degraded: None,
            },
            FetchMode::Dynamic => RoutedFetch {
                outcome: self.fetch_with(domain, StrategyKind::Dynamic).await,
                degraded: None,
            },
            FetchMode::Auto => self.route_auto(domain).await,
        }
    }

    async fn route_auto(&self, domain: &Domain) -> RoutedFetch {
        let primary = self.fetch_with(domain, StrategyKind::Static).await;

        let needs_fallback = match &primary.result {
            Ok(html) => !self.markers.appear_in(html),
            Err(_) => self.fallback_on_error,
        };
        if !needs_fallback {
            return RoutedFetch {
                outcome: primary,
                degraded: None,
            };
        }

        match &primary.result {
            Ok(_) => info!(domain = %domain, "No product markers in static markup, falling back to dynamic fetch"),
            Err(e) => info!(domain = %domain, "Static fetch failed ({}), falling back to dynamic fetch", e),
        }
        let fallback = self.fetch_with(domain, StrategyKind::Dynamic).await;

        match (primary.result, fallback.result) {
            (_, Ok(html)) => RoutedFetch {
                outcome: FetchOutcome {
                    result: Ok(html),
                    ..fallback
                },
                degraded: None,
            },
            // Keep the static markup when only the fallback failed
            (Ok(html), Err(e)) => RoutedFetch {
                degraded: Some(e.kind()),
                outcome: FetchOutcome {
                    domain: primary.domain,
                    strategy: primary.strategy,
                    result: Ok(html),
                    elapsed: primary.elapsed + fallback.elapsed,
                },
            },
            (Err(_), Err(e)) => RoutedFetch {
                outcome: FetchOutcome {
                    result: Err(e),
                    ..fallback
                },
                degraded: None,
            },
        }
    }
}
