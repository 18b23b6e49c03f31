//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the fixture runner:
//! fixture reading, row binding, the test case contract, the execution
//! engine and its result models.
//!
//! 此模块包含夹具运行器的核心功能：
//! 夹具读取、行绑定、测试用例契约、执行引擎及其结果模型。

pub mod assertions;
pub mod binder;
pub mod case;
pub mod config;
pub mod error;
pub mod execution;
pub mod fixture;
pub mod models;
pub mod planner;

// Re-exports
pub use case::{CaseError, TestCase};
pub use error::HarnessError;
pub use execution::run_suite;
pub use models::CaseResult;
