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

use crate::domain::models::crawl::{Domain, FailureKind};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败（DNS、连接、超时等）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功的HTTP状态码
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),
    /// 无法构造目标URL
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    /// 浏览器渲染失败（启动失败、崩溃、导航超时）
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

impl FetchError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 超时、连接失败和5xx状态码返回true，其余返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            FetchError::HttpStatus(code) => *code >= 500,
            FetchError::InvalidTarget(_) | FetchError::RenderFailed(_) => false,
        }
    }

    /// 映射为结果中记录的失败类别
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::RequestFailed(_) | FetchError::HttpStatus(_) | FetchError::InvalidTarget(_) => {
                FailureKind::Network
            }
            FetchError::RenderFailed(_) => FailureKind::Render,
        }
    }
}

/// 抓取策略类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// 单次HTTP GET，不执行脚本
    Static,
    /// 无头浏览器渲染
    Dynamic,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StrategyKind::Static => write!(f, "static"),
            StrategyKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// 抓取策略特质
///
/// 获取域名首页的原始HTML
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// 抓取 `<scheme>://<domain>/` 的HTML
    async fn fetch(&self, domain: &Domain) -> Result<String, FetchError>;

    /// 策略类别
    fn kind(&self) -> StrategyKind;

    /// 策略名称
    fn name(&self) -> &'static str;
}
