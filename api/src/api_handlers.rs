use crate::auth::{self, AuthKeys, AuthenticatedUser};
use crate::database::properties::{Property, PropertyInput};
use crate::database::recommendations::{ReceivedRecommendation, SentRecommendation};
use crate::database::Database;
use crate::search::{parse_query_pairs, SearchService};
use crate::validation;
use poem::error::ResponseError;
use poem::http::StatusCode;
use poem::{
    handler,
    web::{Data, Json, Path},
    Request, Response, Result as PoemResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// Common response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Handler-level error with its HTTP status. Rendered as
/// `{"success": false, "error": …}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn as_response(&self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        Response::builder()
            .status(self.status())
            .content_type("application/json")
            .body(body.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("request failed: {:#}", e);
        ApiError::Internal("Server error".to_string())
    }
}

fn bad_request(e: anyhow::Error) -> ApiError {
    ApiError::BadRequest(e.to_string())
}

// ============ Auth Endpoints ============

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[handler]
pub async fn register(
    db: Data<&Arc<Database>>,
    keys: Data<&Arc<AuthKeys>>,
    Json(req): Json<RegisterRequest>,
) -> PoemResult<Json<ApiResponse<TokenResponse>>> {
    validation::validate_email(&req.email).map_err(bad_request)?;
    validation::validate_password(&req.password).map_err(bad_request)?;

    let password_hash = auth::hash_password(&req.password).map_err(ApiError::from)?;
    let user = db
        .create_user(&req.name, &req.email, &password_hash)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::BadRequest("Email already registered".to_string()))?;

    let token = auth::issue_token(user.id, &keys.secret).map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(TokenResponse { token })))
}

#[handler]
pub async fn login(
    db: Data<&Arc<Database>>,
    keys: Data<&Arc<AuthKeys>>,
    Json(req): Json<LoginRequest>,
) -> PoemResult<Json<ApiResponse<TokenResponse>>> {
    let user = db
        .get_user_by_email(&req.email)
        .await
        .map_err(ApiError::from)?;

    // One failure path for unknown email and wrong password.
    let user = match user {
        Some(u) if auth::verify_password(&req.password, &u.password_hash) => u,
        _ => return Err(ApiError::BadRequest("Invalid credentials".to_string()).into()),
    };

    let token = auth::issue_token(user.id, &keys.secret).map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(TokenResponse { token })))
}

// ============ Property Endpoints ============

#[handler]
pub async fn list_properties(
    req: &Request,
    search: Data<&Arc<SearchService<Database>>>,
) -> PoemResult<Json<ApiResponse<Vec<Property>>>> {
    let params = parse_query_pairs(req.uri().query().unwrap_or(""));
    let properties = search
        .search_properties(&params)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(properties)))
}

#[handler]
pub async fn create_property(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
    Json(input): Json<PropertyInput>,
) -> PoemResult<Json<ApiResponse<Property>>> {
    let title = input
        .title
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;
    validation::validate_title(title).map_err(bad_request)?;

    let property = db
        .create_property(&input, user.user_id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(property)))
}

/// Owner gate shared by update and delete. A missing property and a foreign
/// property are both answered with 403.
async fn owned_property(db: &Database, id: i64, user_id: i64) -> Result<Property, ApiError> {
    let property = db.get_property(id).await.map_err(ApiError::from)?;
    match property {
        Some(p) if p.created_by == Some(user_id) => Ok(p),
        _ => Err(ApiError::Forbidden("Forbidden".to_string())),
    }
}

#[handler]
pub async fn update_property(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
    Path(id): Path<i64>,
    Json(input): Json<PropertyInput>,
) -> PoemResult<Json<ApiResponse<Property>>> {
    owned_property(&db, id, user.user_id).await?;

    let updated = db
        .update_property(id, &input)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;
    Ok(Json(ApiResponse::success(updated)))
}

#[handler]
pub async fn delete_property(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
    Path(id): Path<i64>,
) -> PoemResult<Json<ApiResponse<MessageResponse>>> {
    owned_property(&db, id, user.user_id).await?;

    db.delete_property(id).await.map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(MessageResponse::new("Deleted"))))
}

// ============ Favorites Endpoints ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub prop_id: i64,
}

#[handler]
pub async fn list_favorites(
    user: AuthenticatedUser,
    req: &Request,
    search: Data<&Arc<SearchService<Database>>>,
) -> PoemResult<Json<ApiResponse<Vec<Property>>>> {
    let params = parse_query_pairs(req.uri().query().unwrap_or(""));
    let properties = search
        .search_favorites(user.user_id, &params)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(properties)))
}

#[handler]
pub async fn add_favorite(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
    Json(req): Json<AddFavoriteRequest>,
) -> PoemResult<Json<ApiResponse<MessageResponse>>> {
    db.get_property(req.prop_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    db.add_favorite(user.user_id, req.prop_id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Added to favorites",
    ))))
}

#[handler]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
    Path(id): Path<i64>,
) -> PoemResult<Json<ApiResponse<MessageResponse>>> {
    db.remove_favorite(user.user_id, id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Property removed from favorites",
    ))))
}

// ============ Recommendation Endpoints ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub recipient_email: String,
    pub prop_id: Option<i64>,
}

#[handler]
pub async fn recommend(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
    Json(req): Json<RecommendRequest>,
) -> PoemResult<(StatusCode, Json<ApiResponse<MessageResponse>>)> {
    let prop_id = match (req.recipient_email.is_empty(), req.prop_id) {
        (false, Some(id)) => id,
        _ => return Err(ApiError::BadRequest("Missing data".to_string()).into()),
    };

    let sender = db
        .get_user_by_id(user.user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    db.get_property(prop_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let recipient = db
        .get_user_by_email(&req.recipient_email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Recipient not found".to_string()))?;

    let created = db
        .create_recommendation(sender.id, &sender.email, recipient.id, prop_id)
        .await
        .map_err(ApiError::from)?;
    if !created {
        return Err(ApiError::Conflict("Already recommended by you".to_string()).into());
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MessageResponse::new(
            "Recommendation sent successfully!",
        ))),
    ))
}

#[handler]
pub async fn received_recommendations(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
) -> PoemResult<Json<ApiResponse<Vec<ReceivedRecommendation>>>> {
    let recommendations = db
        .received_recommendations(user.user_id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(recommendations)))
}

#[handler]
pub async fn sent_recommendations(
    user: AuthenticatedUser,
    db: Data<&Arc<Database>>,
) -> PoemResult<Json<ApiResponse<Vec<SentRecommendation>>>> {
    let recommendations = db
        .sent_recommendations(user.user_id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(recommendations)))
}
