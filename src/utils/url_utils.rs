// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 构造域名首页URL，形如 `https://<domain>/`
pub fn homepage_url(scheme: &str, domain: &str) -> Result<Url, ParseError> {
    Url::parse(&format!("{}://{}/", scheme, domain))
}

/// 将页面中的href规范化为绝对URL
///
/// * 以 `http://` 或 `https://` 开头的绝对URL原样保留
/// * 以 `/` 开头的根相对路径拼接为 `<scheme>://<domain><path>`
/// * 其余形式（相对路径、`//host/path`）按标准规则相对首页解析
///
/// 空href、`#` 以及非http(s)协议的链接返回None
pub fn normalize_href(homepage: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href == "#" {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return Some(format!("{}{}", origin_of(homepage), href));
    }

    let resolved = resolve_url(homepage, href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// 取URL的路径部分，无法解析时返回None
pub fn path_of(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.path().to_string())
}

fn origin_of(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}://{}:{}", url.scheme(), host, port),
        (Some(host), None) => format!("{}://{}", url.scheme(), host),
        _ => url.origin().ascii_serialization(),
    }
}
