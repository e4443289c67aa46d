// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 报告导出
//!
//! 爬取核心只依赖 `ReportExporter` 接口，文件格式由具体实现决定

pub mod csv;
pub mod json;
pub mod status;

pub use self::csv::CsvFileExporter;
pub use self::json::JsonFileExporter;
pub use self::status::StatusFileExporter;

use crate::config::settings::ExportSettings;
use crate::domain::models::crawl::CrawlReport;
use crate::utils::errors::CrawlError;
use async_trait::async_trait;
use tracing::info;

/// 报告导出接口
#[async_trait]
pub trait ReportExporter: Send + Sync {
    /// 导出完整的爬取报告
    ///
    /// # 参数
    ///
    /// * `report` - 已完成的报告，导出期间不会再被修改
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 导出成功
    /// * `Err(CrawlError)` - 导出失败
    async fn export(&self, report: &CrawlReport) -> Result<(), CrawlError>;

    /// 导出器名称
    fn name(&self) -> &'static str;
}

/// 组合导出器
///
/// 按顺序把同一份报告交给每个导出器，遇到第一个错误即停止
#[derive(Default)]
pub struct MultiExporter {
    exporters: Vec<Box<dyn ReportExporter>>,
}

impl MultiExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, exporter: Box<dyn ReportExporter>) -> Self {
        self.exporters.push(exporter);
        self
    }

    /// 按导出配置创建，路径为空的格式不输出
    pub fn from_settings(settings: &ExportSettings) -> Self {
        let mut multi = Self::new();
        if !settings.json_path.trim().is_empty() {
            multi = multi.with(Box::new(JsonFileExporter::new(&settings.json_path)));
        }
        if !settings.csv_path.trim().is_empty() {
            multi = multi.with(Box::new(CsvFileExporter::new(&settings.csv_path)));
        }
        if !settings.status_path.trim().is_empty() {
            multi = multi.with(Box::new(StatusFileExporter::new(&settings.status_path)));
        }
        multi
    }

    pub fn len(&self) -> usize {
        self.exporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }
}

#[async_trait]
impl ReportExporter for MultiExporter {
    async fn export(&self, report: &CrawlReport) -> Result<(), CrawlError> {
        for exporter in &self.exporters {
            exporter.export(report).await?;
            info!(exporter = exporter.name(), domains = report.len(), "Report exported");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "multi"
    }
}
