// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::{Settings, StaticFetchSettings};
use crate::domain::models::crawl::Domain;
use crate::engines::traits::{FetchError, FetchStrategy, StrategyKind};
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::url_utils;
use async_trait::async_trait;
use tracing::{debug, warn};

/// 静态抓取引擎
///
/// 基于reqwest的单次HTTP GET，不执行页面脚本
pub struct StaticFetch {
    client: reqwest::Client,
    scheme: String,
    retry: RetryPolicy,
}

impl StaticFetch {
    /// 创建静态抓取引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 静态抓取配置，超时时间总会设置到客户端上
    /// * `scheme` - 首页URL协议
    /// * `retry` - 网络错误的重试策略
    ///
    /// # 返回值
    ///
    /// * `Ok(StaticFetch)` - 引擎实例
    /// * `Err(FetchError)` - HTTP客户端构建失败
    pub fn new(
        settings: &StaticFetchSettings,
        scheme: &str,
        retry: RetryPolicy,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .connect_timeout(settings.timeout())
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            scheme: scheme.to_string(),
            retry,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(
            &settings.static_fetch,
            &settings.crawler.scheme,
            RetryPolicy::from_settings(&settings.retry),
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        // Redirects are followed by the client; anything left outside 2xx/3xx is a failure
        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FetchStrategy for StaticFetch {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `domain` - 目标域名
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 首页HTML
    /// * `Err(FetchError)` - 重试耗尽后的最后一个错误
    async fn fetch(&self, domain: &Domain) -> Result<String, FetchError> {
        let url = url_utils::homepage_url(&self.scheme, domain.as_str())
            .map_err(|e| FetchError::InvalidTarget(format!("{}: {}", domain, e)))?;

        let mut retries = 0;
        loop {
            match self.fetch_once(url.as_str()).await {
                Ok(html) => {
                    debug!(domain = %domain, bytes = html.len(), "Static fetch succeeded");
                    return Ok(html);
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(retries) => {
                    retries += 1;
                    let backoff = self.retry.calculate_backoff(retries);
                    warn!(
                        domain = %domain,
                        attempt = retries,
                        "Static fetch failed with retryable error: {}, retrying in {:?}",
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Static
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
#[path = "static_fetch_test.rs"]
mod tests;
