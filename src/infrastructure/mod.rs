// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 导出（export）：把爬取报告写成JSON或CSV文件
pub mod export;
