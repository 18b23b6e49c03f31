//! Cases against the user-management API (`/users`).
//!
//! The service accepts incomplete creation payloads and still answers `201`,
//! so body fields are only checked when the observed status is the success
//! code of the operation.

use async_trait::async_trait;
use serde_json::json;

use crate::core::assertions::{expect_field, expect_field_absent, expect_status};
use crate::core::binder::{Param, ParameterTuple, Signature};
use crate::core::case::{CaseError, TestCase};
use crate::infra::http::{ApiClient, RequestSpec};

/// `GET /users` or `GET /users/{id}`, checking the returned id on success.
pub struct GetUsers;

#[async_trait]
impl TestCase for GetUsers {
    fn name(&self) -> &'static str {
        "reqres.get_users"
    }

    fn description(&self) -> &'static str {
        "GET user(s) data-driven"
    }

    fn signature(&self) -> Signature {
        const SIGNATURE: Signature = &[Param::text("userId"), Param::integer("expectedStatus")];
        SIGNATURE
    }

    async fn execute(&self, params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let user_id = params.text("userId")?;
        let expected_status = params.integer("expectedStatus")?;

        let path = if user_id.is_empty() {
            "/users".to_string()
        } else {
            format!("/users/{user_id}")
        };
        let response = client.send(RequestSpec::get(path)).await?;

        expect_status(&response, expected_status)?;
        if !user_id.is_empty() && expected_status == 200 {
            expect_field(&response, "data.id", user_id)?;
        }
        Ok(())
    }
}

/// Create, update or delete a user depending on the row's `method` column.
pub struct UserCrud;

#[async_trait]
impl TestCase for UserCrud {
    fn name(&self) -> &'static str {
        "reqres.user_crud"
    }

    fn description(&self) -> &'static str {
        "CRUD user data-driven"
    }

    fn signature(&self) -> Signature {
        const SIGNATURE: Signature = &[
            Param::text("name"),
            Param::text("job"),
            Param::integer("expectedStatus"),
            Param::text("method"),
            Param::text("userId"),
        ];
        SIGNATURE
    }

    async fn execute(&self, params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let name = params.text("name")?;
        let job = params.text("job")?;
        let expected_status = params.integer("expectedStatus")?;
        let method = params.text("method")?.to_ascii_uppercase();
        let user_id = params.text("userId")?;

        let path = if user_id.is_empty() {
            "/users".to_string()
        } else {
            format!("/users/{user_id}")
        };
        let payload = json!({ "name": name, "job": job });

        let request = match method.as_str() {
            "POST" => RequestSpec::post(path).json(payload),
            "PUT" => RequestSpec::put(path).json(payload),
            "DELETE" => RequestSpec::delete(path),
            other => {
                return Err(CaseError::Unexpected(format!("unsupported method: {other:?}")));
            }
        };
        let response = client.send(request).await?;

        expect_status(&response, expected_status)?;
        let echoes_body = matches!(
            (method.as_str(), expected_status),
            ("POST", 201) | ("PUT", 200)
        );
        if echoes_body {
            expect_field(&response, "name", name)?;
            expect_field(&response, "job", job)?;
        }
        Ok(())
    }
}

/// `POST /users`; the echoed fields are checked only when `201` is expected.
pub struct CreateUser;

#[async_trait]
impl TestCase for CreateUser {
    fn name(&self) -> &'static str {
        "reqres.create_user"
    }

    fn description(&self) -> &'static str {
        "Create user with data from the fixture"
    }

    fn signature(&self) -> Signature {
        const SIGNATURE: Signature = &[
            Param::text("name"),
            Param::text("job"),
            Param::integer("expectedStatus"),
        ];
        SIGNATURE
    }

    async fn execute(&self, params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let name = params.text("name")?;
        let job = params.text("job")?;
        let expected_status = params.integer("expectedStatus")?;

        let response = client
            .send(RequestSpec::post("/users").json(json!({ "name": name, "job": job })))
            .await?;

        expect_status(&response, expected_status)?;
        if expected_status == 201 {
            expect_field(&response, "name", name)?;
            expect_field(&response, "job", job)?;
        }
        Ok(())
    }
}

/// An empty object is still accepted with `201`.
pub struct CreateUserEmptyPayload;

#[async_trait]
impl TestCase for CreateUserEmptyPayload {
    fn name(&self) -> &'static str {
        "reqres.create_user_empty_payload"
    }

    fn description(&self) -> &'static str {
        "Negative: create user with empty payload"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let response = client.send(RequestSpec::post("/users").json(json!({}))).await?;
        expect_status(&response, 201)
    }
}

/// A payload without `job` is accepted; the response echoes no `job`.
pub struct CreateUserMissingJob;

#[async_trait]
impl TestCase for CreateUserMissingJob {
    fn name(&self) -> &'static str {
        "reqres.create_user_missing_job"
    }

    fn description(&self) -> &'static str {
        "Negative: create user with missing job field"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let response = client
            .send(RequestSpec::post("/users").json(json!({ "name": "NoJobUser" })))
            .await?;
        expect_status(&response, 201)?;
        expect_field(&response, "name", "NoJobUser")?;
        expect_field_absent(&response, "job")
    }
}
