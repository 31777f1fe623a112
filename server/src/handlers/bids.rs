use actix_web::{web, HttpResponse};

use super::job_posts::CreatedResponse;
use crate::{
    auth_token::TokenClaims,
    db::{
        models::{BidFilter, BidInput, BidQuery, BidStatusUpdate, IdQuery},
        Store,
    },
    error::Result,
};

/// POST /api/v1/job-bid
pub async fn create_bid(
    bid: web::Json<BidInput>,
    db: web::Data<Store>,
    caller: web::ReqData<TokenClaims>,
) -> Result<HttpResponse> {
    let id = db.bids().create(&bid).await?;

    log::info!(
        "Bid {} by {} on a job owned by {} (caller {})",
        id,
        bid.bidder_email,
        bid.job_info.user_email,
        caller.email().unwrap_or("<unknown>")
    );

    Ok(HttpResponse::Ok().json(CreatedResponse {
        message: "Bid data received successfully".to_string(),
        inserted_id: id.to_hex(),
    }))
}

/// GET /api/v1/job-bid
pub async fn list_bids(query: web::Query<BidQuery>, db: web::Data<Store>) -> Result<HttpResponse> {
    let filter = BidFilter::try_from(query.into_inner())?;
    let bids = db.bids().list(&filter).await?;

    log::debug!("Listed {} bids for {:?}", bids.len(), filter);

    Ok(HttpResponse::Ok().json(bids))
}

/// PUT /api/v1/bid-status-update
pub async fn update_bid_status(
    query: web::Query<IdQuery>,
    update: web::Json<BidStatusUpdate>,
    db: web::Data<Store>,
) -> Result<HttpResponse> {
    let id = query.object_id()?;
    let bid = db.bids().update_status(id, &update).await?;

    match &bid {
        Some(_) => log::info!("Bid {} status set to {}", id, update.bid_status),
        None => log::info!("Bid {} not found for status update", id),
    }

    Ok(HttpResponse::Ok().json(bid))
}
