// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 域名爬取器（domain_crawler）：抓取 → 提取 → 规范化
/// - 产品链接提取器（product_extractor）：路径标记匹配与URL规范化
pub mod domain_crawler;
pub mod product_extractor;
