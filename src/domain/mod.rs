// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：域名、抓取结果、爬取报告
/// - 服务（services）：产品链接提取和单域名爬取
pub mod models;
pub mod services;
