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

use prodcrawl::config::settings::Settings;
use prodcrawl::infrastructure::export::MultiExporter;
use prodcrawl::utils::telemetry;
use prodcrawl::workers::CrawlOrchestrator;
use tracing::{info, warn};

/// 主函数
///
/// 命令行参数中的域名会覆盖配置文件中的 `crawler.domains`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting prodcrawl...");

    // 2. Load configuration
    let mut settings = Settings::new()?;
    let cli_domains: Vec<String> = std::env::args().skip(1).collect();
    if !cli_domains.is_empty() {
        settings.crawler.domains = cli_domains;
    }
    settings.validate()?;
    let domains = settings.crawler.domains()?;
    info!(domains = domains.len(), "Configuration loaded");

    // 3. Build the pipeline
    let orchestrator = CrawlOrchestrator::from_settings(&settings)?;
    let exporter = MultiExporter::from_settings(&settings.export);
    if exporter.is_empty() {
        warn!("No export path configured, report will only be logged");
    }

    // 4. Crawl and export
    let report = orchestrator.run_and_export(&domains, &exporter).await?;

    for result in report.iter() {
        info!(
            domain = %result.domain,
            status = %result.status,
            product_urls = result.urls.len(),
            "Domain summary"
        );
    }

    Ok(())
}
