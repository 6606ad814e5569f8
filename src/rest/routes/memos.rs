// rest/routes/memos.rs — memo generation and revision routes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::extract::{extract_all, Sections};
use crate::prompt;
use crate::storage::MemoField;
use crate::AppContext;

#[derive(Deserialize)]
pub struct GenerateMemoRequest {
    pub subject: String,
}

#[derive(Deserialize)]
pub struct UpdateMemoRequest {
    pub instruction: String,
    pub field_to_update: String,
}

/// POST /generate-memo/ — draft a new memo and persist it.
pub async fn generate_memo(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<GenerateMemoRequest>,
) -> Result<Json<Sections>, ApiError> {
    let user_prompt = prompt::generation_prompt(&body.subject);
    let content = ctx
        .completion
        .complete(prompt::GENERATE_SYSTEM, &user_prompt)
        .await?;

    let sections = extract_all(&content);
    let id = ctx
        .storage
        .insert_memo(
            &body.subject,
            &sections.background,
            &sections.proposal,
            &sections.recommendation,
        )
        .await?;

    info!(memo_id = id, subject = %body.subject, "memo generated");
    Ok(Json(sections))
}

/// PUT /update-memo/{id}/ — revise one section of an existing memo.
///
/// The field name is validated before any storage access, so an invalid
/// field never touches the database.
pub async fn update_memo(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMemoRequest>,
) -> Result<Json<Value>, ApiError> {
    let field = MemoField::parse(&body.field_to_update)?;
    let memo = ctx.storage.fetch_memo(id).await?;

    let user_prompt = prompt::revision_prompt(&memo, field, &body.instruction);
    let content = ctx
        .completion
        .complete(prompt::REVISE_SYSTEM, &user_prompt)
        .await?;

    // The model is asked for only the target section but may echo all three;
    // extract everything and keep the one we asked for.
    let sections = extract_all(&content);
    let updated = match field {
        MemoField::Background => sections.background,
        MemoField::Proposal => sections.proposal,
        MemoField::Recommendation => sections.recommendation,
    };
    ctx.storage.update_memo_field(id, field, &updated).await?;

    info!(memo_id = id, field = field.as_str(), "memo section updated");

    let mut response = serde_json::Map::new();
    response.insert(
        "message".to_string(),
        json!(format!("'{}' section updated successfully", field.as_str())),
    );
    response.insert(field.as_str().to_string(), json!(updated));
    Ok(Json(Value::Object(response)))
}
