// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 爬取调度器在有界工作池中运行域名爬取器，
/// 结果汇总器作为报告的唯一写入方收集结果
pub mod aggregator;
pub mod orchestrator;

pub use orchestrator::CrawlOrchestrator;
