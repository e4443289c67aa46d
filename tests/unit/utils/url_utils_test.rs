// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use prodcrawl::utils::url_utils::{homepage_url, normalize_href};

    const HREFS: [&str; 6] = [
        "/product/123",
        "product/123",
        "//cdn.shop.example.com/item/1",
        "https://partner.example.com/p/2",
        "/search?q=/product/",
        "../p/3",
    ];

    #[test]
    fn test_normalization_is_pure() {
        let home = homepage_url("https", "shop.example.com").unwrap();
        for href in HREFS {
            assert_eq!(normalize_href(&home, href), normalize_href(&home, href));
        }
    }

    #[test]
    fn test_normalized_urls_are_absolute_with_host() {
        let home = homepage_url("https", "shop.example.com").unwrap();
        for href in HREFS {
            let normalized = normalize_href(&home, href).unwrap();
            let parsed = url::Url::parse(&normalized).unwrap();
            assert!(parsed.host_str().is_some(), "{} lost its host", href);
        }
    }
}
