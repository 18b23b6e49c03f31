//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, an interactive wizard that
//! scaffolds a `Suite.toml` together with starter CSV fixtures.
//!
//! 此模块实现了 `init` 命令，一个交互式向导，
//! 用于生成 `Suite.toml` 以及入门用的 CSV 夹具。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Prompts for service addresses and suite templates
//! - **Non-interactive Mode**: Writes the defaults without prompting (CI friendly)
//! - **Overwrite Protection**: Confirmation prompt before replacing an existing config;
//!   without a prompt, an existing config is only replaced with `--force`
//!
//! - **交互式向导**: 提示输入服务地址和套件模板
//! - **非交互模式**: 不提示直接写入默认值（适用于 CI）
//! - **覆盖保护**: 替换现有配置前的确认提示；非交互模式下仅在使用 `--force` 时替换

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::{ServiceConfig, SuiteConfig, SuiteFile};
use crate::core::fixture::FixtureSource;
use crate::infra::fs::write_creating_parents;
use crate::infra::t;

/// The default name for the suite configuration file.
/// 套件配置文件的默认名称。
pub const CONFIG_FILE_NAME: &str = "Suite.toml";

pub const DEFAULT_REQRES_URL: &str = "https://reqres.in/api";
pub const DEFAULT_OBJECTS_URL: &str = "https://api.restful-api.dev";

const OBJECTS_FIXTURE: &str = "fixtures/testdata.csv";
const OBJECTS_FIXTURE_CONTENT: &str = "userId,title\n1,Test Title 1\n2,Test Title 2\n";
const USERS_FIXTURE: &str = "fixtures/users.csv";
const USERS_FIXTURE_CONTENT: &str =
    "name,job,expectedStatus\nmorpheus,leader,201\nneo,the one,201\n";

/// A suite the wizard can scaffold.
/// 向导可以生成的套件模板。
#[derive(Debug, Clone, Copy)]
pub struct SuiteTemplate {
    pub name: &'static str,
    pub case: &'static str,
    pub service: &'static str,
    pub fixture: Option<&'static str>,
}

/// Templates offered by the wizard, all selected by default.
pub const TEMPLATES: &[SuiteTemplate] = &[
    SuiteTemplate {
        name: "objects-create",
        case: "objects.create_object",
        service: "objects",
        fixture: Some(OBJECTS_FIXTURE),
    },
    SuiteTemplate {
        name: "objects-get-all",
        case: "objects.get_all",
        service: "objects",
        fixture: None,
    },
    SuiteTemplate {
        name: "objects-delete-and-verify",
        case: "objects.delete_and_verify",
        service: "objects",
        fixture: None,
    },
    SuiteTemplate {
        name: "reqres-create-user",
        case: "reqres.create_user",
        service: "reqres",
        fixture: Some(USERS_FIXTURE),
    },
    SuiteTemplate {
        name: "reqres-empty-payload",
        case: "reqres.create_user_empty_payload",
        service: "reqres",
        fixture: None,
    },
];

/// Runs the wizard (or writes the defaults when `non_interactive` is set)
/// in the current directory.
///
/// An existing `Suite.toml` is replaced only after confirmation, or with
/// `force`. In non-interactive mode without `force` it is left as is.
///
/// 在当前目录运行向导（设置 `non_interactive` 时直接写入默认值）。
/// 现有的 `Suite.toml` 仅在确认后或使用 `force` 时被替换。
pub fn run_init_wizard(language: &str, non_interactive: bool, force: bool) -> Result<()> {
    let target_dir = PathBuf::from(".");

    if non_interactive {
        let config_path = target_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() && !force {
            println!(
                "{}",
                t!("init.file_exists", locale = language, path = config_path.display()).red()
            );
            println!("{}", t!("init.use_force", locale = language).yellow());
            return Ok(());
        }
        let suite_file =
            build_suite_file(language, DEFAULT_REQRES_URL, DEFAULT_OBJECTS_URL, TEMPLATES);
        return write_scaffold(&target_dir, &suite_file, language);
    }

    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init.welcome", locale = language).bold().cyan());
    println!("{}\n", t!("init.description", locale = language));

    if !force && !confirm_overwrite(&theme, &target_dir, language)? {
        println!("{}", t!("init.aborted", locale = language).yellow());
        return Ok(());
    }

    let reqres_url: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_reqres_url", locale = language).to_string())
        .default(DEFAULT_REQRES_URL.to_string())
        .interact_text()?;
    let objects_url: String = Input::with_theme(&theme)
        .with_prompt(t!("init.prompt_objects_url", locale = language).to_string())
        .default(DEFAULT_OBJECTS_URL.to_string())
        .interact_text()?;

    let labels: Vec<String> = TEMPLATES
        .iter()
        .map(|tpl| format!("{} ({})", tpl.name, tpl.case))
        .collect();
    let defaults = vec![true; TEMPLATES.len()];
    let chosen = MultiSelect::with_theme(&theme)
        .with_prompt(t!("init.prompt_suites", locale = language).to_string())
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    if chosen.is_empty() {
        println!("{}", t!("init.no_suites_selected", locale = language).yellow());
        return Ok(());
    }

    let templates: Vec<SuiteTemplate> = chosen.into_iter().map(|i| TEMPLATES[i]).collect();
    let suite_file = build_suite_file(language, &reqres_url, &objects_url, &templates);
    write_scaffold(&target_dir, &suite_file, language)
}

/// Builds the configuration for the chosen templates. Only services used by
/// at least one suite are emitted.
///
/// 为所选模板构建配置。只输出至少被一个套件使用的服务。
pub fn build_suite_file(
    language: &str,
    reqres_url: &str,
    objects_url: &str,
    templates: &[SuiteTemplate],
) -> SuiteFile {
    let mut services = BTreeMap::new();
    for tpl in templates {
        let service = match tpl.service {
            "reqres" => {
                let mut service = ServiceConfig::new(reqres_url);
                service
                    .headers
                    .insert("x-api-key".to_string(), "reqres-free-v1".to_string());
                service
            }
            _ => ServiceConfig::new(objects_url),
        };
        services.entry(tpl.service.to_string()).or_insert(service);
    }

    SuiteFile {
        language: Some(language.to_string()),
        jobs: 1,
        services,
        suites: templates
            .iter()
            .map(|tpl| SuiteConfig {
                name: tpl.name.to_string(),
                case: tpl.case.to_string(),
                service: tpl.service.to_string(),
                fixture: tpl.fixture.map(FixtureSource::new),
            })
            .collect(),
    }
}

/// Writes `Suite.toml` and every fixture it references into `dir`.
/// Existing fixture files are left untouched.
///
/// 将 `Suite.toml` 及其引用的所有夹具写入 `dir`。已存在的夹具文件不会被修改。
pub fn write_scaffold(dir: &Path, suite_file: &SuiteFile, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(suite_file)
        .context(t!("init.serialize_failed", locale = language).to_string())?;
    let config_path = dir.join(CONFIG_FILE_NAME);
    write_creating_parents(&config_path, toml_string).with_context(|| {
        t!("init.write_failed", locale = language, path = config_path.display()).to_string()
    })?;

    for suite in &suite_file.suites {
        let Some(fixture) = &suite.fixture else {
            continue;
        };
        let content = match fixture.path.to_str() {
            Some(OBJECTS_FIXTURE) => OBJECTS_FIXTURE_CONTENT,
            Some(USERS_FIXTURE) => USERS_FIXTURE_CONTENT,
            _ => continue,
        };
        let fixture_path = dir.join(&fixture.path);
        if fixture_path.exists() {
            continue;
        }
        write_creating_parents(&fixture_path, content).with_context(|| {
            t!(
                "init.write_failed",
                locale = language,
                path = fixture_path.display()
            )
            .to_string()
        })?;
    }

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success", locale = language, path = config_path.display()).bold()
    );
    println!("{}", t!("init.usage_hint", locale = language));
    Ok(())
}

/// Asks before replacing an existing `Suite.toml`. Returns `true` when the
/// wizard may proceed.
fn confirm_overwrite(theme: &ColorfulTheme, dir: &Path, language: &str) -> Result<bool> {
    if !dir.join(CONFIG_FILE_NAME).exists() {
        return Ok(true);
    }
    let proceed = Confirm::with_theme(theme)
        .with_prompt(
            t!(
                "init.confirm_overwrite",
                locale = language,
                file = CONFIG_FILE_NAME
            )
            .to_string(),
        )
        .default(false)
        .interact()?;
    Ok(proceed)
}
