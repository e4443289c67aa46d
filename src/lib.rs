// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 加载和校验运行配置
pub mod config;

/// 领域模块
///
/// 爬取报告模型、链接提取和单域名爬取流程
pub mod domain;

/// 引擎模块
///
/// 静态与动态抓取策略及其路由
pub mod engines;

/// 基础设施模块
///
/// 报告导出等外部协作方
pub mod infrastructure;

/// 工具模块
///
/// 错误类型、日志、URL处理和重试策略
pub mod utils;

/// 工作器模块
///
/// 多域名并发调度与结果汇总
pub mod workers;
