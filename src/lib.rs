//! # Fixture Runner Library / Fixture Runner 库
//!
//! This library provides the core functionality for the Fixture Runner tool,
//! a data-driven HTTP API test harness: rows of a CSV or spreadsheet fixture
//! are bound to typed parameters and fed, one row at a time, to registered
//! test cases that call a REST service and assert on its responses.
//!
//! 此库为 Fixture Runner 工具提供核心功能，
//! 这是一个数据驱动的 HTTP API 测试工具：CSV 或电子表格夹具的每一行被绑定为
//! 类型化参数，并逐行传给已注册的测试用例，用例调用 REST 服务并对响应进行断言。
//!
//! ## Modules / 模块
//!
//! - `core` - Fixture reading, row binding, case contract and execution engine
//! - `infra` - Infrastructure services like HTTP, JSON paths and file system operations
//! - `reporting` - Console, HTML and JSON reports
//! - `cli` - Command-line interface and commands
//! - `cases` - The built-in case catalogue
//!
//! - `core` - 夹具读取、行绑定、用例契约和执行引擎
//! - `infra` - 基础设施服务，如 HTTP、JSON 路径和文件系统操作
//! - `reporting` - 控制台、HTML 和 JSON 报告
//! - `cli` - 命令行接口和命令
//! - `cases` - 内置用例目录

pub mod cases;
pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

use tracing_subscriber::EnvFilter;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

/// Picks the best available locale for `requested`.
///
/// Tries the full tag first (e.g. "zh-CN"), then just the language code
/// (e.g. "en" from "en-US"), then falls back to "en". With no request, the
/// system locale is used.
///
/// 为 `requested` 选择最合适的可用语言环境。先尝试完整标签，再尝试语言代码，
/// 最后回退到 "en"。未指定时使用系统语言环境。
pub fn resolve_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available = rust_i18n::available_locales!();

    if available.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split(['-', '_'])
        .next()
        .and_then(|code| {
            available
                .iter()
                .find(|candidate| candidate.split('-').next() == Some(code))
        })
        .map(|found| found.to_string())
        .unwrap_or_else(|| "en".to_string())
}

/// Resolves and activates the locale for the rest of the process.
/// 解析并激活进程其余部分使用的语言环境。
pub fn init(requested: Option<&str>) -> String {
    let locale = resolve_locale(requested);
    rust_i18n::set_locale(&locale);
    locale
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the crate logs at `warn`, or at
/// `debug` with `--verbose`. Calling it twice is harmless.
///
/// 安装 tracing 订阅器。设置了 `RUST_LOG` 时以其为准；否则默认 `warn`，
/// 使用 `--verbose` 时为 `debug`。
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "fixture_runner=debug"
    } else {
        "fixture_runner=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
