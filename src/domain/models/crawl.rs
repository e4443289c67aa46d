// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{FetchError, StrategyKind};
use crate::utils::errors::CrawlError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

/// 产品URL
///
/// 经过规范化的绝对URL，按字符串值判等
pub type ProductUrl = String;

/// 域名
///
/// 不含协议的主机名（可带端口），爬取开始后不可变
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// 解析并校验域名
    ///
    /// # 参数
    ///
    /// * `raw` - 原始域名字符串
    ///
    /// # 返回值
    ///
    /// * `Ok(Domain)` - 合法的域名，统一为小写
    /// * `Err(CrawlError)` - 域名为空或包含协议、路径、查询、片段、用户信息、空白字符
    pub fn parse(raw: &str) -> Result<Self, CrawlError> {
        let host = raw.trim();
        if host.is_empty() {
            return Err(CrawlError::Configuration("域名不能为空".to_string()));
        }
        if host
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '@') || c.is_whitespace())
        {
            return Err(CrawlError::Configuration(format!(
                "域名必须是不含协议和路径的主机名: {}",
                raw
            )));
        }
        // Hostnames are case-insensitive
        Ok(Self(host.to_ascii_lowercase()))
    }

    /// 批量解析域名列表，保持输入顺序
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, CrawlError> {
        raw.iter().map(|d| Self::parse(d.as_ref())).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 失败类别
///
/// 记录在域名结果中的失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 网络错误（DNS、连接、非成功状态码、请求超时）
    Network,
    /// 渲染错误（浏览器启动失败、崩溃、导航超时）
    Render,
    /// 单个域名的爬取期限已到
    Timeout,
    /// 爬取任务异常退出，未能上报结果
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::Render => write!(f, "render"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Aborted => write!(f, "aborted"),
        }
    }
}

/// 域名爬取状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "kind", rename_all = "snake_case")]
pub enum CrawlStatus {
    /// 成功（即使没有找到产品链接）
    Success,
    /// 部分失败：静态抓取成功但动态回退失败，保留静态结果
    PartialFailure(FailureKind),
    /// 失败，URL集合为空
    Failure(FailureKind),
}

impl CrawlStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CrawlStatus::Success)
    }

    /// 失败类别，成功时为None
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            CrawlStatus::Success => None,
            CrawlStatus::PartialFailure(kind) | CrawlStatus::Failure(kind) => Some(*kind),
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlStatus::Success => write!(f, "success"),
            CrawlStatus::PartialFailure(kind) => write!(f, "partial_failure({})", kind),
            CrawlStatus::Failure(kind) => write!(f, "failure({})", kind),
        }
    }
}

/// 域名处理状态
///
/// 状态转换只能向前推进：
/// Pending → Fetching → Extracting → Done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainState {
    /// 等待调度
    Pending,
    /// 正在抓取页面
    Fetching,
    /// 正在提取链接
    Extracting,
    /// 已完成
    Done(CrawlStatus),
}

impl DomainState {
    fn rank(&self) -> u8 {
        match self {
            DomainState::Pending => 0,
            DomainState::Fetching => 1,
            DomainState::Extracting => 2,
            DomainState::Done(_) => 3,
        }
    }

    /// 判断是否允许转换到目标状态
    ///
    /// 允许跳过中间状态（例如抓取失败直接进入Done），但不允许回退，
    /// Done 是终态
    pub fn can_transition_to(&self, next: &DomainState) -> bool {
        !self.is_done() && next.rank() > self.rank()
    }

    pub fn is_done(&self) -> bool {
        matches!(self, DomainState::Done(_))
    }
}

/// 单次抓取结果
///
/// HTML 与错误二者必居其一
#[derive(Debug)]
pub struct FetchOutcome {
    /// 目标域名
    pub domain: Domain,
    /// 使用的抓取策略
    pub strategy: StrategyKind,
    /// 原始HTML或抓取错误
    pub result: Result<String, FetchError>,
    /// 耗时
    pub elapsed: Duration,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// 单个域名的爬取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainResult {
    /// 域名
    pub domain: Domain,
    /// 发现的产品URL集合（无重复）
    pub urls: BTreeSet<ProductUrl>,
    /// 结果状态
    #[serde(flatten)]
    pub status: CrawlStatus,
}

impl DomainResult {
    pub fn success(domain: Domain, urls: BTreeSet<ProductUrl>) -> Self {
        Self {
            domain,
            urls,
            status: CrawlStatus::Success,
        }
    }

    pub fn partial(domain: Domain, urls: BTreeSet<ProductUrl>, kind: FailureKind) -> Self {
        Self {
            domain,
            urls,
            status: CrawlStatus::PartialFailure(kind),
        }
    }

    /// 失败结果，URL集合为空
    pub fn failure(domain: Domain, kind: FailureKind) -> Self {
        Self {
            domain,
            urls: BTreeSet::new(),
            status: CrawlStatus::Failure(kind),
        }
    }
}

/// 爬取报告汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub succeeded: usize,
    pub partially_failed: usize,
    pub failed: usize,
    pub product_urls: usize,
}

/// 爬取报告
///
/// 每个输入域名恰好对应一个结果，交给导出接口后不再修改
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrawlReport {
    results: BTreeMap<Domain, DomainResult>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一个域名结果，返回被替换的旧结果
    pub fn insert(&mut self, result: DomainResult) -> Option<DomainResult> {
        self.results.insert(result.domain.clone(), result)
    }

    pub fn get(&self, domain: &Domain) -> Option<&DomainResult> {
        self.results.get(domain)
    }

    pub fn contains(&self, domain: &Domain) -> bool {
        self.results.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainResult> {
        self.results.values()
    }

    /// 域名到URL列表的映射，URL按字典序排列
    pub fn url_map(&self) -> BTreeMap<String, Vec<String>> {
        self.results
            .iter()
            .map(|(domain, result)| {
                (
                    domain.to_string(),
                    result.urls.iter().cloned().collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for result in self.results.values() {
            match result.status {
                CrawlStatus::Success => summary.succeeded += 1,
                CrawlStatus::PartialFailure(_) => summary.partially_failed += 1,
                CrawlStatus::Failure(_) => summary.failed += 1,
            }
            summary.product_urls += result.urls.len();
        }
        summary
    }
}
