use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    adapters::inbound::http::{ContactPageResponse, ContactResponse},
    app_state::AppState,
    domain::models::{AvatarUpload, ContactDetails, ContactId, ListParams},
    routes::{error::ErrorCode, ApiError},
};

// Room for multipart framing on top of the avatar size policy.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;
const AVATAR_FIELD: &str = "avatar";

type ContactPath = WithRejection<Path<i32>, ApiError>;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route(
            "/:id/avatar",
            put(update_avatar).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
}

#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    name: Option<String>,
    phone: Option<String>,
}

impl ContactPayload {
    fn into_details(self) -> Result<ContactDetails, ApiError> {
        Ok(ContactDetails::new(
            self.name.as_deref(),
            self.phone.as_deref(),
        )?)
    }
}

#[instrument(name = "GET /phonebooks", skip(app_state))]
async fn list_contacts(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<Json<ContactPageResponse>, ApiError> {
    let page = app_state.contact_service.list_contacts(params).await?;

    Ok(Json(page.into()))
}

#[instrument(name = "GET /phonebooks/:id", skip(app_state))]
async fn get_contact(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): ContactPath,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = app_state
        .contact_service
        .get_contact(ContactId::from(id))
        .await?;

    Ok(Json(contact.into()))
}

#[instrument(name = "POST /phonebooks", skip(app_state))]
async fn create_contact(
    State(app_state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<ContactPayload>, ApiError>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let contact = app_state
        .contact_service
        .create_contact(body.into_details()?)
        .await?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[instrument(name = "PUT /phonebooks/:id", skip(app_state))]
async fn update_contact(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): ContactPath,
    WithRejection(Json(body), _): WithRejection<Json<ContactPayload>, ApiError>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let contact = app_state
        .contact_service
        .update_contact(ContactId::from(id), body.into_details()?)
        .await?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[instrument(name = "PUT /phonebooks/:id/avatar", skip(app_state, multipart))]
async fn update_avatar(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): ContactPath,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    // A request that is not multipart at all carries no file either.
    let upload = match multipart {
        Ok(mut multipart) => extract_avatar_from_multipart(&mut multipart).await?,
        Err(_) => None,
    };

    let contact = app_state
        .contact_service
        .update_avatar(ContactId::from(id), upload)
        .await?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[instrument(name = "DELETE /phonebooks/:id", skip(app_state))]
async fn delete_contact(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): ContactPath,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = app_state
        .contact_service
        .delete_contact(ContactId::from(id))
        .await?;

    Ok(Json(contact.into()))
}

async fn extract_avatar_from_multipart(
    multipart: &mut Multipart,
) -> Result<Option<AvatarUpload>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if file_name.is_empty() && bytes.is_empty() {
            // Browsers send an empty part when the file input was left blank.
            return Ok(None);
        }

        return Ok(Some(AvatarUpload::new(file_name, content_type, bytes.to_vec())));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text()).with_code(ErrorCode::MalformedRequest)
}
