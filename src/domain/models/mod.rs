// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 爬取（crawl）：域名、处理状态、域名结果和爬取报告
pub mod crawl;
