// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ReportExporter;
use crate::domain::models::crawl::CrawlReport;
use crate::utils::errors::CrawlError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// JSON 文件导出器
///
/// 输出 `{ "<domain>": ["url", ...] }`，URL 按字典序排列
pub struct JsonFileExporter {
    path: PathBuf,
}

impl JsonFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 渲染报告为JSON文本
    pub fn render(report: &CrawlReport) -> Result<String, CrawlError> {
        Ok(serde_json::to_string_pretty(&report.url_map())?)
    }
}

#[async_trait]
impl ReportExporter for JsonFileExporter {
    async fn export(&self, report: &CrawlReport) -> Result<(), CrawlError> {
        let body = Self::render(report)?;
        fs::write(&self.path, body).await.map_err(|e| {
            CrawlError::Export(format!("无法写入 {}: {}", self.path.display(), e))
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
