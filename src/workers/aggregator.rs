// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::{CrawlReport, Domain, DomainResult, DomainState, FailureKind};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// 爬取任务上报给汇总器的事件
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// 域名进入新的处理状态
    Transition { domain: Domain, state: DomainState },
    /// 域名处理完成
    Completed(DomainResult),
}

/// 结果汇总器
///
/// 报告的唯一写入方。各爬取任务只通过通道发送事件，
/// 汇总器按域名记录状态并合并结果
#[derive(Debug)]
pub struct ResultAggregator {
    states: BTreeMap<Domain, DomainState>,
    report: CrawlReport,
}

impl ResultAggregator {
    /// 创建汇总器，所有域名初始为 Pending
    pub fn new(domains: &[Domain]) -> Self {
        Self {
            states: domains
                .iter()
                .map(|d| (d.clone(), DomainState::Pending))
                .collect(),
            report: CrawlReport::new(),
        }
    }

    /// 当前状态
    pub fn state(&self, domain: &Domain) -> Option<DomainState> {
        self.states.get(domain).copied()
    }

    /// 应用一个事件
    ///
    /// 未知域名和回退的状态转换会被忽略并记录警告
    pub fn apply(&mut self, event: CrawlEvent) {
        match event {
            CrawlEvent::Transition { domain, state } => {
                self.transition(&domain, state);
            }
            CrawlEvent::Completed(result) => self.merge(result),
        }
    }

    /// 合并一个域名结果
    ///
    /// 每个域名只接受第一个结果，之后的结果会被丢弃
    pub fn merge(&mut self, result: DomainResult) {
        if !self.transition(&result.domain, DomainState::Done(result.status)) {
            return;
        }
        debug!(
            domain = %result.domain,
            status = %result.status,
            product_urls = result.urls.len(),
            "Domain result merged"
        );
        self.report.insert(result);
    }

    fn transition(&mut self, domain: &Domain, next: DomainState) -> bool {
        let Some(current) = self.states.get_mut(domain) else {
            warn!(domain = %domain, "Event for unknown domain ignored");
            return false;
        };
        if !current.can_transition_to(&next) {
            warn!(
                domain = %domain,
                from = ?current,
                to = ?next,
                "Invalid state transition ignored"
            );
            return false;
        }
        *current = next;
        true
    }

    /// 结束汇总
    ///
    /// 没有上报结果的域名记为 Aborted 失败，保证每个输入域名都在报告中
    pub fn finish(mut self) -> CrawlReport {
        let missing: Vec<Domain> = self
            .states
            .iter()
            .filter(|(_, state)| !state.is_done())
            .map(|(domain, _)| domain.clone())
            .collect();

        for domain in missing {
            warn!(domain = %domain, "No result reported, marking as aborted");
            self.merge(DomainResult::failure(domain, FailureKind::Aborted));
        }

        self.report
    }

    /// 消费事件直到所有发送方关闭
    pub async fn collect(mut self, mut rx: mpsc::UnboundedReceiver<CrawlEvent>) -> CrawlReport {
        while let Some(event) = rx.recv().await {
            self.apply(event);
        }
        self.finish()
    }
}
