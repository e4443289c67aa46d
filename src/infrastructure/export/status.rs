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

/// 状态报告导出器
///
/// 输出完整的爬取报告，每个域名带上 `status` 和失败时的 `kind`，
/// 使"成功但没有产品链接"和"抓取失败"在输出中可以区分
pub struct StatusFileExporter {
    path: PathBuf,
}

impl StatusFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn render(report: &CrawlReport) -> Result<String, CrawlError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[async_trait]
impl ReportExporter for StatusFileExporter {
    async fn export(&self, report: &CrawlReport) -> Result<(), CrawlError> {
        let body = Self::render(report)?;
        fs::write(&self.path, body).await.map_err(|e| {
            CrawlError::Export(format!("无法写入 {}: {}", self.path.display(), e))
        })
    }

    fn name(&self) -> &'static str {
        "status"
    }
}
