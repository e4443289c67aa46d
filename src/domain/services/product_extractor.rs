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

use crate::config::settings::{Settings, DEFAULT_PATH_MARKERS};
use crate::domain::models::crawl::{Domain, ProductUrl};
use crate::utils::errors::CrawlError;
use crate::utils::url_utils;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::warn;

/// 产品路径标记集合
///
/// 任一标记作为子串出现在URL路径中即视为产品链接。匹配区分大小写，
/// `/Product/` 不会命中 `/product/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMarkers(Vec<String>);

impl PathMarkers {
    /// 创建路径标记集合
    ///
    /// # 参数
    ///
    /// * `markers` - 标记列表，不能为空且不能包含空标记
    ///
    /// # 返回值
    ///
    /// * `Ok(PathMarkers)` - 标记集合
    /// * `Err(CrawlError)` - 标记集合无效
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Result<Self, CrawlError> {
        if markers.is_empty() {
            return Err(CrawlError::Configuration("路径标记不能为空".to_string()));
        }
        let markers: Vec<String> = markers.iter().map(|m| m.as_ref().to_string()).collect();
        if markers.iter().any(|m| m.trim().is_empty()) {
            return Err(CrawlError::Configuration("路径标记不能包含空字符串".to_string()));
        }
        Ok(Self(markers))
    }

    /// 判断路径是否包含任一标记
    pub fn matches(&self, path: &str) -> bool {
        self.0.iter().any(|m| path.contains(m.as_str()))
    }

    /// 判断原始文本中是否出现任一标记
    ///
    /// 用于在提取之前粗略判断静态页面是否已包含产品链接
    pub fn appear_in(&self, text: &str) -> bool {
        self.matches(text)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for PathMarkers {
    fn default() -> Self {
        Self(DEFAULT_PATH_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}

/// 产品链接提取器
///
/// 从HTML中找出路径命中标记的 `<a href>`，规范化为绝对URL并去重
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    markers: PathMarkers,
    scheme: String,
}

impl ProductExtractor {
    pub fn new(markers: PathMarkers, scheme: &str) -> Self {
        Self {
            markers,
            scheme: scheme.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CrawlError> {
        Ok(Self::new(
            PathMarkers::new(&settings.crawler.path_markers)?,
            &settings.crawler.scheme,
        ))
    }

    pub fn markers(&self) -> &PathMarkers {
        &self.markers
    }

    /// 从HTML中提取产品链接
    ///
    /// 解析失败不会向上传播：html5ever会尽量恢复文档结构，
    /// 无法恢复的部分只是找不到锚点，结果退化为空集合
    ///
    /// # 参数
    ///
    /// * `html` - 页面HTML
    /// * `domain` - 页面所属域名，用于解析相对链接
    ///
    /// # 返回值
    ///
    /// 去重后的产品URL集合
    pub fn extract(&self, html: &str, domain: &Domain) -> BTreeSet<ProductUrl> {
        let mut urls = BTreeSet::new();

        let homepage = match url_utils::homepage_url(&self.scheme, domain.as_str()) {
            Ok(url) => url,
            Err(e) => {
                warn!(domain = %domain, "Cannot build base URL: {}", e);
                return urls;
            }
        };

        let selector = match Selector::parse("a[href]") {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Invalid anchor selector: {:?}", e);
                return urls;
            }
        };

        let document = Html::parse_document(html);
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = url_utils::normalize_href(&homepage, href) else {
                continue;
            };
            let is_product = url_utils::path_of(&url)
                .map(|path| self.markers.matches(&path))
                .unwrap_or(false);
            if is_product {
                urls.insert(url);
            }
        }

        urls
    }
}
