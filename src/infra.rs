//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the fixture runner,
//! including the HTTP request builder, JSON path lookup, file system
//! operations and i18n support.
//!
//! 此模块为夹具运行器提供基础设施服务，
//! 包括 HTTP 请求构建器、JSON 路径查找、文件系统操作和国际化支持。

pub mod fs;
pub mod http;
pub mod json_path;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
