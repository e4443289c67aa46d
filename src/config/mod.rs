// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理爬虫的配置设置，包括抓取策略、超时、路径标记和导出路径
pub mod settings;
