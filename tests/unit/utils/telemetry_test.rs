// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use prodcrawl::utils::telemetry;

    #[test]
    fn test_telemetry_initialization() {
        // 初始化日志系统
        telemetry::init_telemetry();

        tracing::debug!("This is a debug message");
        tracing::info!("This is an info message");

        // 测试结构化日志
        tracing::info!(
            domain = "shop.example.com",
            strategy = "static",
            elapsed_ms = 42u64,
            "Fetch succeeded"
        );
    }

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        telemetry::init_telemetry();
        telemetry::init_telemetry();

        let span = tracing::info_span!("crawl_domain", domain = "a.test");
        let _guard = span.enter();
        tracing::warn!("Inside crawl span");
    }
}
