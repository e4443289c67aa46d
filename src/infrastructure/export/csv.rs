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

/// CSV 文件导出器
///
/// 每个域名一列，表头为域名；较短的列用空单元格补齐到最长的URL列表
pub struct CsvFileExporter {
    path: PathBuf,
}

impl CsvFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 渲染报告为CSV字节
    pub fn render(report: &CrawlReport) -> Result<Vec<u8>, CrawlError> {
        let columns = report.url_map();
        let rows = columns.values().map(Vec::len).max().unwrap_or(0);

        let mut writer = ::csv::Writer::from_writer(Vec::new());
        if !columns.is_empty() {
            writer.write_record(columns.keys())?;
        }
        for row in 0..rows {
            writer.write_record(
                columns
                    .values()
                    .map(|urls| urls.get(row).map(String::as_str).unwrap_or("")),
            )?;
        }

        writer
            .into_inner()
            .map_err(|e| CrawlError::Export(e.to_string()))
    }
}

#[async_trait]
impl ReportExporter for CsvFileExporter {
    async fn export(&self, report: &CrawlReport) -> Result<(), CrawlError> {
        let body = Self::render(report)?;
        fs::write(&self.path, body).await.map_err(|e| {
            CrawlError::Export(format!("无法写入 {}: {}", self.path.display(), e))
        })
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
