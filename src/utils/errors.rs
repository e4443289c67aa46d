// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 爬取运行级错误
///
/// 只有这里的错误会中止整次运行，单个域名的抓取错误在域名爬取器内部
/// 转换为失败状态的结果
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("导出错误: {0}")]
    Export(String),

    #[error("结果汇总失败: {0}")]
    Aggregation(String),
}

impl From<config::ConfigError> for CrawlError {
    fn from(err: config::ConfigError) -> Self {
        CrawlError::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for CrawlError {
    fn from(err: std::io::Error) -> Self {
        CrawlError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for CrawlError {
    fn from(err: serde_json::Error) -> Self {
        CrawlError::Export(err.to_string())
    }
}

impl From<csv::Error> for CrawlError {
    fn from(err: csv::Error) -> Self {
        CrawlError::Export(err.to_string())
    }
}
