//! # List Command Module / 列表命令模块
//!
//! Prints the registered cases with their parameter signatures, so a suite
//! author knows which fixture columns each case expects.
//!
//! 打印已注册的用例及其参数签名，便于套件作者了解每个用例期望的夹具列。

use colored::*;

use crate::cases;
use crate::core::binder::Signature;
use crate::infra::t;

pub fn execute(locale: &str) {
    println!("{}", t!("list.header", locale = locale).bold());

    for case in cases::registry() {
        println!(
            "  {:<36} {}",
            case.name().cyan(),
            describe_signature(case.signature(), locale).dimmed()
        );
        println!("  {:<36} {}", "", case.description());
    }
}

/// Renders a signature like `(userId: text, expectedStatus: integer)`.
pub fn describe_signature(signature: Signature, locale: &str) -> String {
    if signature.is_empty() {
        return t!("list.no_params", locale = locale).to_string();
    }
    let params: Vec<String> = signature
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.as_str()))
        .collect();
    format!("({})", params.join(", "))
}
