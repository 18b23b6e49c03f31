//! # Suite Configuration Module / 套件配置模块
//!
//! Loads `Suite.toml`: the target services (base addresses, extra headers) and
//! the list of suites, each binding one registered case to a service and an
//! optional fixture.
//!
//! 加载 `Suite.toml`：目标服务（基础地址、附加请求头）以及套件列表，
//! 每个套件将一个已注册的用例绑定到一个服务和一个可选的夹具。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::cases;
use crate::core::fixture::FixtureSource;
use crate::infra::fs::expand_path;

/// Connection settings for one target service.
/// 单个目标服务的连接设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Absolute http(s) base address, e.g. `https://reqres.in/api`.
    /// 绝对 http(s) 基础地址。
    pub base_url: String,
    /// Headers sent with every request to this service.
    /// 随每个请求发送到此服务的请求头。
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
        }
    }
}

/// One suite: a registered case run against a service, once per fixture row
/// or once in total when the case takes no parameters.
/// 一个套件：针对某服务运行的已注册用例，每个夹具行运行一次；
/// 若用例没有参数则总共运行一次。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuiteConfig {
    /// Unique suite name, used by `--filter` and in reports.
    /// 唯一的套件名称，用于 `--filter` 和报告。
    pub name: String,
    /// Registered case name, e.g. `reqres.get_users`.
    pub case: String,
    /// Key into `[services]`.
    pub service: String,
    /// Fixture supplying the rows. Required iff the case declares parameters.
    /// 提供数据行的夹具。当且仅当用例声明了参数时必需。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<FixtureSource>,
}

/// The whole `Suite.toml`.
/// 整个 `Suite.toml`。
#[derive(Debug, Deserialize, Serialize)]
pub struct SuiteFile {
    /// Language for runner messages (e.g. "en", "zh-CN").
    /// 运行器消息的语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Concurrent invocations. `1` runs rows strictly one at a time, `0`
    /// uses one per CPU core.
    /// 并发调用数。`1` 表示严格逐行执行，`0` 表示每个 CPU 核心一个。
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    #[serde(default)]
    pub services: BTreeMap<String, ServiceConfig>,

    #[serde(default)]
    pub suites: Vec<SuiteConfig>,
}

fn default_jobs() -> usize {
    1
}

/// Parses and validates a suite file.
///
/// Base addresses and fixture paths are shell-expanded; relative fixture paths
/// are resolved against the directory holding the config file.
///
/// 解析并验证套件文件。基础地址和夹具路径会进行 shell 展开；
/// 相对夹具路径相对于配置文件所在目录解析。
pub fn load_suite_file(path: &Path) -> Result<SuiteFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_suite_file(&content, base_dir)
}

/// Parses suite file content. Split out so tests can feed strings directly.
pub fn parse_suite_file(content: &str, base_dir: &Path) -> Result<SuiteFile> {
    let mut file: SuiteFile =
        toml::from_str(content).context("Failed to parse suite configuration")?;

    for (name, service) in file.services.iter_mut() {
        service.base_url = shellexpand::full(&service.base_url)
            .with_context(|| format!("Failed to expand base_url of service '{name}'"))?
            .into_owned();
    }

    for suite in file.suites.iter_mut() {
        if let Some(fixture) = suite.fixture.as_mut() {
            fixture.path = expand_path(&fixture.path, base_dir).with_context(|| {
                format!("Failed to expand fixture path of suite '{}'", suite.name)
            })?;
        }
    }

    validate(&file)?;
    Ok(file)
}

fn validate(file: &SuiteFile) -> Result<()> {
    for (name, service) in &file.services {
        let url = url::Url::parse(&service.base_url).with_context(|| {
            format!(
                "Service '{name}' has an invalid base_url: {}",
                service.base_url
            )
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("Service '{name}' base_url must use http or https, got '{}'", url.scheme());
        }
    }

    let mut seen = HashSet::new();
    for suite in &file.suites {
        if !seen.insert(suite.name.as_str()) {
            bail!("Duplicate suite name '{}'", suite.name);
        }
        if !file.services.contains_key(&suite.service) {
            bail!(
                "Suite '{}' refers to unknown service '{}'",
                suite.name,
                suite.service
            );
        }
        let Some(case) = cases::find(&suite.case) else {
            bail!("Suite '{}' refers to unknown case '{}'", suite.name, suite.case);
        };
        match (case.signature().is_empty(), suite.fixture.is_some()) {
            (false, false) => bail!(
                "Suite '{}' runs data-driven case '{}' but has no fixture",
                suite.name,
                suite.case
            ),
            (true, true) => bail!(
                "Suite '{}' gives a fixture to case '{}', which takes no parameters",
                suite.name,
                suite.case
            ),
            _ => {}
        }
    }
    Ok(())
}
