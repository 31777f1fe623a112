use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{
    auth_token::TokenClaims,
    db::{
        models::{IdQuery, JobPostFilter, JobPostInput, JobPostQuery, JobPostUpdate},
        Store,
    },
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}

/// GET /api/v1/job-posts
pub async fn list_job_posts(
    query: web::Query<JobPostQuery>,
    db: web::Data<Store>,
) -> Result<HttpResponse> {
    let filter = JobPostFilter::from(query.into_inner());
    let posts = db.job_posts().list(&filter).await?;

    log::debug!("Listed {} job posts for {:?}", posts.len(), filter);

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/single-job-data
pub async fn single_job_post(
    query: web::Query<IdQuery>,
    db: web::Data<Store>,
) -> Result<HttpResponse> {
    let id = query.object_id()?;
    let post = db.job_posts().find_by_id(id).await?;

    if post.is_none() {
        log::info!("Job post {} not found", id);
    }

    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/v1/update-job-post-data
pub async fn update_job_post(
    query: web::Query<IdQuery>,
    update: web::Json<JobPostUpdate>,
    db: web::Data<Store>,
) -> Result<HttpResponse> {
    let id = query.object_id()?;
    let post = db.job_posts().update(id, &update).await?;

    match &post {
        Some(_) => log::info!("Updated job post {}", id),
        None => log::info!("Job post {} not found for update", id),
    }

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/v1/delete-job-post
pub async fn delete_job_post(
    query: web::Query<IdQuery>,
    db: web::Data<Store>,
) -> Result<HttpResponse> {
    let id = query.object_id()?;
    let post = db.job_posts().delete(id).await?;

    match &post {
        Some(_) => log::info!("Deleted job post {}", id),
        None => log::info!("Job post {} not found for delete", id),
    }

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/v1/job-post
pub async fn create_job_post(
    post: web::Json<JobPostInput>,
    db: web::Data<Store>,
    caller: web::ReqData<TokenClaims>,
) -> Result<HttpResponse> {
    let id = db.job_posts().create(&post).await?;

    log::info!(
        "Job post {} created for {} by {}",
        id,
        post.user_email,
        caller.email().unwrap_or("<unknown>")
    );

    Ok(HttpResponse::Ok().json(CreatedResponse {
        message: "Job data received successfully".to_string(),
        inserted_id: id.to_hex(),
    }))
}
