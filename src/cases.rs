//! # Case Catalogue / 用例目录
//!
//! Built-in test cases for the two target services. Suites refer to them by
//! registry name (`reqres.get_users`, `objects.delete_and_verify`, ...).
//!
//! 两个目标服务的内置测试用例。套件通过注册名称引用它们。

use std::sync::Arc;

use crate::core::case::TestCase;

/// Cases against the user-management API / 用户管理 API 的用例
pub mod reqres;
/// Cases against the object-CRUD API / 对象 CRUD API 的用例
pub mod objects;

/// Every registered case, in listing order.
/// 所有已注册的用例，按列出顺序排列。
pub fn registry() -> Vec<Arc<dyn TestCase>> {
    vec![
        Arc::new(reqres::GetUsers),
        Arc::new(reqres::UserCrud),
        Arc::new(reqres::CreateUser),
        Arc::new(reqres::CreateUserEmptyPayload),
        Arc::new(reqres::CreateUserMissingJob),
        Arc::new(objects::CreateObject),
        Arc::new(objects::LargePayload),
        Arc::new(objects::DuplicateCreate),
        Arc::new(objects::UpdateAndVerify),
        Arc::new(objects::DeleteAndVerify),
        Arc::new(objects::DeleteNew),
        Arc::new(objects::PatchName),
        Arc::new(objects::PutUpdate),
        Arc::new(objects::PostMacbook),
        Arc::new(objects::GetAll),
        Arc::new(objects::GetInvalidId),
    ]
}

/// Looks up a case by registry name.
pub fn find(name: &str) -> Option<Arc<dyn TestCase>> {
    registry().into_iter().find(|case| case.name() == name)
}
