//! Cases against the object-CRUD API (`/objects`).
//!
//! Every flow that updates, patches or deletes an object first creates that
//! object itself.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use crate::core::assertions::{
    expect_close, expect_field, expect_status, expect_status_in, expect_that, require_field,
};
use crate::core::binder::{Param, ParameterTuple, Signature};
use crate::core::case::{CaseError, TestCase};
use crate::infra::http::{ApiClient, ApiResponse, RequestSpec};

/// Creates an object and returns the server-assigned id.
async fn create(client: &ApiClient, payload: Value) -> Result<(String, ApiResponse), CaseError> {
    let response = client.send(RequestSpec::post("/objects").json(payload)).await?;
    expect_status(&response, 200)?;
    let id = require_field(&response, "id")?;
    info!(%id, "created object");
    Ok((id, response))
}

/// `POST /objects` with `{name: title, data: {userId}}` from the fixture.
pub struct CreateObject;

#[async_trait]
impl TestCase for CreateObject {
    fn name(&self) -> &'static str {
        "objects.create_object"
    }

    fn description(&self) -> &'static str {
        "Data-driven: create object"
    }

    fn signature(&self) -> Signature {
        const SIGNATURE: Signature = &[Param::text("userId"), Param::text("title")];
        SIGNATURE
    }

    async fn execute(&self, params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let user_id = params.text("userId")?;
        let title = params.text("title")?;

        let (_, response) = create(
            client,
            json!({ "name": title, "data": { "userId": user_id } }),
        )
        .await?;
        expect_field(&response, "name", title)?;
        expect_field(&response, "data.userId", user_id)
    }
}

/// A 2000-character field is either stored (`200`) or rejected with a server
/// error (`500`) whose body mentions the error. Any other status fails.
pub struct LargePayload;

#[async_trait]
impl TestCase for LargePayload {
    fn name(&self) -> &'static str {
        "objects.large_payload"
    }

    fn description(&self) -> &'static str {
        "Create object with large payload and verify API handles it"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let big_field = "A".repeat(2000);
        let response = client
            .send(RequestSpec::post("/objects").json(json!({
                "name": "LargePayload",
                "data": { "bigField": big_field }
            })))
            .await?;

        match expect_status_in(&response, &[200, 500])? {
            200 => {
                expect_field(&response, "name", "LargePayload")?;
                let stored = response.get_string("data.bigField").unwrap_or_default();
                expect_that(
                    stored.chars().count() == 2000,
                    "data.bigField length",
                    2000,
                    stored.chars().count(),
                )
            }
            _ => {
                let body = response.text();
                expect_that(
                    body.contains("Internal Server Error") || body.contains("error"),
                    "server error body should describe the error",
                    "body mentioning an error",
                    body,
                )
            }
        }
    }
}

/// The same payload created twice yields two distinct objects.
pub struct DuplicateCreate;

#[async_trait]
impl TestCase for DuplicateCreate {
    fn name(&self) -> &'static str {
        "objects.duplicate_create"
    }

    fn description(&self) -> &'static str {
        "Attempt to create duplicate objects and check API response"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let payload = json!({ "name": "DuplicateTest", "data": { "userId": "dupUser" } });
        let (first_id, _) = create(client, payload.clone()).await?;
        let (second_id, second) = create(client, payload).await?;

        expect_that(
            first_id != second_id,
            "duplicate objects should have different ids",
            format!("id other than {first_id:?}"),
            format!("{second_id:?}"),
        )?;
        expect_field(&second, "name", "DuplicateTest")?;
        expect_field(&second, "data.userId", "dupUser")
    }
}

/// Create, replace with `PUT`, then read back the replaced fields.
pub struct UpdateAndVerify;

#[async_trait]
impl TestCase for UpdateAndVerify {
    fn name(&self) -> &'static str {
        "objects.update_and_verify"
    }

    fn description(&self) -> &'static str {
        "Update object and verify changes persist"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let (id, _) = create(
            client,
            json!({ "name": "UpdateMe", "data": { "userId": "updateMe" } }),
        )
        .await?;

        let updated = client
            .send(RequestSpec::put(format!("/objects/{id}")).json(json!({
                "name": "UpdatedName",
                "data": { "userId": "updatedUser", "extra": "field" }
            })))
            .await?;
        expect_status(&updated, 200)?;
        expect_field(&updated, "name", "UpdatedName")?;
        expect_field(&updated, "data.userId", "updatedUser")?;
        expect_field(&updated, "data.extra", "field")?;

        let fetched = client.send(RequestSpec::get(format!("/objects/{id}"))).await?;
        expect_status(&fetched, 200)?;
        expect_field(&fetched, "name", "UpdatedName")?;
        expect_field(&fetched, "data.userId", "updatedUser")?;
        expect_field(&fetched, "data.extra", "field")
    }
}

/// Create, delete, then confirm the object is gone.
pub struct DeleteAndVerify;

#[async_trait]
impl TestCase for DeleteAndVerify {
    fn name(&self) -> &'static str {
        "objects.delete_and_verify"
    }

    fn description(&self) -> &'static str {
        "Delete object and verify it is gone"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let (id, _) = create(
            client,
            json!({ "name": "DeleteMe", "data": { "userId": "deleteMe2" } }),
        )
        .await?;

        let deleted = client.send(RequestSpec::delete(format!("/objects/{id}"))).await?;
        expect_status(&deleted, 200)?;

        let fetched = client.send(RequestSpec::get(format!("/objects/{id}"))).await?;
        expect_status(&fetched, 404)
    }
}

/// Create, delete, and check the deletion response.
pub struct DeleteNew;

#[async_trait]
impl TestCase for DeleteNew {
    fn name(&self) -> &'static str {
        "objects.delete_new"
    }

    fn description(&self) -> &'static str {
        "DELETE a newly created object and verify response"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let (id, _) = create(
            client,
            json!({ "name": "ObjectToDelete", "data": { "userId": "deleteMe" } }),
        )
        .await?;

        let deleted = client.send(RequestSpec::delete(format!("/objects/{id}"))).await?;
        expect_status(&deleted, 200)?;
        let body = deleted.text();
        expect_that(
            body.contains("success") || body.contains("deleted") || deleted.status() == 200,
            "delete response should confirm the deletion",
            "success or deleted",
            body,
        )
    }
}

/// Create, then rename with `PATCH`.
pub struct PatchName;

#[async_trait]
impl TestCase for PatchName {
    fn name(&self) -> &'static str {
        "objects.patch_name"
    }

    fn description(&self) -> &'static str {
        "PATCH update name of a newly created object and verify response"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let (id, _) = create(
            client,
            json!({ "name": "PatchMe", "data": { "userId": "patchMe" } }),
        )
        .await?;

        let patched = client
            .send(
                RequestSpec::patch(format!("/objects/{id}"))
                    .json(json!({ "name": "Patched Name" })),
            )
            .await?;
        expect_status(&patched, 200)?;
        expect_field(&patched, "name", "Patched Name")
    }
}

/// Create, then replace with a full record of typed fields.
pub struct PutUpdate;

#[async_trait]
impl TestCase for PutUpdate {
    fn name(&self) -> &'static str {
        "objects.put_update"
    }

    fn description(&self) -> &'static str {
        "PUT update a newly created object and verify response"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let (id, _) = create(
            client,
            json!({ "name": "PutMe", "data": { "userId": "putMe" } }),
        )
        .await?;

        let response = client
            .send(RequestSpec::put(format!("/objects/{id}")).json(json!({
                "name": "PutMe Updated",
                "data": {
                    "year": 2023,
                    "price": 999.99,
                    "CPU model": "Intel Core i7",
                    "Hard disk size": "512 GB",
                    "color": "black"
                }
            })))
            .await?;
        expect_status(&response, 200)?;
        expect_field(&response, "name", "PutMe Updated")?;
        expect_close(&response, "data.price", 999.99, 0.001)?;
        expect_field(&response, "data.color", "black")?;
        expect_field(&response, "data.year", "2023")?;
        expect_field(&response, "data['CPU model']", "Intel Core i7")?;
        expect_field(&response, "data['Hard disk size']", "512 GB")
    }
}

/// `POST` a full laptop record and check every echoed field.
pub struct PostMacbook;

#[async_trait]
impl TestCase for PostMacbook {
    fn name(&self) -> &'static str {
        "objects.post_macbook"
    }

    fn description(&self) -> &'static str {
        "POST Apple MacBook Pro 16 object and verify response"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let (_, response) = create(
            client,
            json!({
                "name": "Apple MacBook Pro 16",
                "data": {
                    "year": 2019,
                    "price": 1849.99,
                    "CPU model": "Intel Core i9",
                    "Hard disk size": "1 TB"
                }
            }),
        )
        .await?;
        expect_field(&response, "name", "Apple MacBook Pro 16")?;
        expect_field(&response, "data.year", "2019")?;
        expect_close(&response, "data.price", 1849.99, 0.01)?;
        expect_field(&response, "data['CPU model']", "Intel Core i9")?;
        expect_field(&response, "data['Hard disk size']", "1 TB")
    }
}

/// `GET /objects` returns a non-empty list.
pub struct GetAll;

#[async_trait]
impl TestCase for GetAll {
    fn name(&self) -> &'static str {
        "objects.get_all"
    }

    fn description(&self) -> &'static str {
        "Positive: get all objects"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let response = client.send(RequestSpec::get("/objects")).await?;
        expect_status(&response, 200)?;
        expect_that(
            response.json().is_some(),
            "response should be JSON",
            "JSON body",
            response.text(),
        )?;
        let ids = response.get_list("id").len();
        expect_that(ids > 0, "object list should not be empty", "> 0 ids", ids)
    }
}

/// `GET /objects/invalid` is `404`.
pub struct GetInvalidId;

#[async_trait]
impl TestCase for GetInvalidId {
    fn name(&self) -> &'static str {
        "objects.get_invalid_id"
    }

    fn description(&self) -> &'static str {
        "Negative: get object with invalid id"
    }

    fn signature(&self) -> Signature {
        &[]
    }

    async fn execute(&self, _params: &ParameterTuple, client: &ApiClient) -> Result<(), CaseError> {
        let response = client.send(RequestSpec::get("/objects/invalid")).await?;
        expect_status(&response, 404)
    }
}
