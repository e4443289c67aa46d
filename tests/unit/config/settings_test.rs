// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置加载和验证功能

#[cfg(test)]
mod tests {
    use prodcrawl::config::settings::{FetchMode, Settings};
    use prodcrawl::utils::errors::CrawlError;

    #[test]
    fn test_config_loading_from_default_toml() {
        // Runs from the crate root, where config/default.toml lives
        let settings = Settings::new().expect("default configuration should load");

        assert_eq!(settings.crawler.workers, 4);
        assert_eq!(settings.crawler.default_mode, FetchMode::Auto);
        assert_eq!(settings.static_fetch.timeout_secs, 15);
        assert_eq!(settings.dynamic_fetch.settle_delay_ms, 2000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_override_is_configuration_error() {
        let mut settings = Settings::for_domains(&["a.test"]);
        settings.crawler.strategy_overrides.push(
            prodcrawl::config::settings::StrategyOverride {
                domain: "https://a.test/".to_string(),
                mode: FetchMode::Dynamic,
            },
        );

        assert!(matches!(
            settings.validate(),
            Err(CrawlError::Configuration(_))
        ));
    }

    #[test]
    fn test_scheme_in_domain_is_rejected() {
        let settings = Settings::for_domains(&["https://a.test"]);
        assert!(matches!(
            settings.validate(),
            Err(CrawlError::Configuration(_))
        ));
    }
}
