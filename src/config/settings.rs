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

use crate::domain::models::crawl::Domain;
use crate::utils::errors::CrawlError;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// 默认产品路径标记
pub const DEFAULT_PATH_MARKERS: [&str; 3] = ["/product/", "/item/", "/p/"];

/// 应用程序配置设置
///
/// 包含爬取调度、静态抓取、动态抓取、重试和导出等所有配置项
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 爬取调度配置
    pub crawler: CrawlerSettings,
    /// 静态抓取配置
    pub static_fetch: StaticFetchSettings,
    /// 动态抓取配置
    pub dynamic_fetch: DynamicFetchSettings,
    /// 重试配置
    pub retry: RetrySettings,
    /// 导出配置
    pub export: ExportSettings,
}

/// 抓取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// 仅静态HTTP抓取
    Static,
    /// 仅无头浏览器渲染
    Dynamic,
    /// 先静态抓取，页面中没有产品路径标记时回退到动态渲染
    #[default]
    Auto,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchMode::Static => write!(f, "static"),
            FetchMode::Dynamic => write!(f, "dynamic"),
            FetchMode::Auto => write!(f, "auto"),
        }
    }
}

/// 单个域名的抓取模式覆盖
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyOverride {
    /// 域名
    pub domain: String,
    /// 抓取模式
    pub mode: FetchMode,
}

/// 爬取调度配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// 待爬取的域名列表
    pub domains: Vec<String>,
    /// 并发工作数
    pub workers: usize,
    /// 单个域名的爬取期限（秒）
    pub domain_timeout_secs: u64,
    /// 首页URL协议
    pub scheme: String,
    /// 产品路径标记，区分大小写
    pub path_markers: Vec<String>,
    /// 默认抓取模式
    pub default_mode: FetchMode,
    /// 静态抓取出错时是否也回退到动态渲染（仅 auto 模式）
    pub fallback_on_error: bool,
    /// 按域名覆盖抓取模式
    pub strategy_overrides: Vec<StrategyOverride>,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            workers: 4,
            domain_timeout_secs: 60,
            scheme: "https".to_string(),
            path_markers: DEFAULT_PATH_MARKERS.iter().map(|m| m.to_string()).collect(),
            default_mode: FetchMode::Auto,
            fallback_on_error: false,
            strategy_overrides: Vec::new(),
        }
    }
}

impl CrawlerSettings {
    pub fn domain_timeout(&self) -> Duration {
        Duration::from_secs(self.domain_timeout_secs)
    }

    /// 解析配置中的域名列表
    pub fn domains(&self) -> Result<Vec<Domain>, CrawlError> {
        Domain::parse_all(&self.domains)
    }

    /// 解析按域名的模式覆盖
    pub fn overrides(&self) -> Result<HashMap<Domain, FetchMode>, CrawlError> {
        self.strategy_overrides
            .iter()
            .map(|o| Domain::parse(&o.domain).map(|d| (d, o.mode)))
            .collect()
    }
}

/// 静态抓取配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFetchSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
}

impl Default for StaticFetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (compatible; prodcrawl/0.1)".to_string(),
        }
    }
}

impl StaticFetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 动态抓取配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DynamicFetchSettings {
    /// 导航加渲染的超时时间（秒）
    pub timeout_secs: u64,
    /// 页面加载后等待客户端渲染的时间（毫秒）
    pub settle_delay_ms: u64,
    /// Chrome 可执行文件路径，未设置时自动查找
    pub chrome_executable: Option<String>,
    /// 是否无头模式
    pub headless: bool,
}

impl Default for DynamicFetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            settle_delay_ms: 2000,
            chrome_executable: None,
            headless: true,
        }
    }
}

impl DynamicFetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// 总请求次数，1 表示不重试
    pub max_attempts: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
    /// 是否启用抖动
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
            jitter: true,
        }
    }
}

/// 导出配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// JSON 输出路径，为空时不输出
    pub json_path: String,
    /// CSV 输出路径，为空时不输出
    pub csv_path: String,
    /// 带每个域名爬取状态的完整报告路径，为空时不输出
    pub status_path: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            json_path: "discovered_product_urls.json".to_string(),
            csv_path: "discovered_product_urls.csv".to_string(),
            status_path: "crawl_status.json".to_string(),
        }
    }
}

/// 单次运行允许的最大重试次数
const MAX_RETRY_ATTEMPTS: u32 = 5;

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 和 `PRODCRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PRODCRAWL")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("crawler.domains")
                    .with_list_parse_key("crawler.path_markers")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 使用默认配置爬取指定域名
    pub fn for_domains<S: AsRef<str>>(domains: &[S]) -> Self {
        let mut settings = Self::default();
        settings.crawler.domains = domains.iter().map(|d| d.as_ref().to_string()).collect();
        settings
    }

    /// 校验配置
    ///
    /// 在任何爬取开始前调用，错误会中止整次运行。域名列表是否为空由
    /// 调度器在启动时检查，这里只校验非空的域名条目
    pub fn validate(&self) -> Result<(), CrawlError> {
        let crawler = &self.crawler;

        if crawler.workers == 0 {
            return Err(CrawlError::Configuration("workers 必须大于0".to_string()));
        }
        if crawler.domain_timeout_secs == 0 {
            return Err(CrawlError::Configuration(
                "domain_timeout_secs 必须大于0".to_string(),
            ));
        }
        if crawler.scheme != "http" && crawler.scheme != "https" {
            return Err(CrawlError::Configuration(format!(
                "不支持的协议: {}",
                crawler.scheme
            )));
        }
        if crawler.path_markers.is_empty() {
            return Err(CrawlError::Configuration("path_markers 不能为空".to_string()));
        }
        if crawler.path_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(CrawlError::Configuration(
                "path_markers 不能包含空标记".to_string(),
            ));
        }
        crawler.domains()?;
        crawler.overrides()?;

        if self.static_fetch.timeout_secs == 0 || self.dynamic_fetch.timeout_secs == 0 {
            return Err(CrawlError::Configuration("抓取超时时间必须大于0".to_string()));
        }
        if self.retry.max_attempts == 0 || self.retry.max_attempts > MAX_RETRY_ATTEMPTS {
            return Err(CrawlError::Configuration(format!(
                "retry.max_attempts 必须在 1 到 {} 之间",
                MAX_RETRY_ATTEMPTS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
