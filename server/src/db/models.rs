use mongodb::bson::{
    self, doc, oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string, Document,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::store::parse_object_id;
use crate::error::AppError;

/// Job post fields as submitted by the owner. Fields outside the named set
/// are stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPostInput {
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "user_photoURL", default, skip_serializing_if = "Option::is_none")]
    pub user_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub maximum_price: Option<f64>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub post: JobPostInput,
}

/// Owner-editable fields. Fields left out of the request body are not
/// touched; `user_email` is never editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPostUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "user_photoURL", default, skip_serializing_if = "Option::is_none")]
    pub user_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub maximum_price: Option<f64>,
}

impl JobPostUpdate {
    pub fn to_patch(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }
}

/// Snapshot of the job post a bid was placed on. Only the owner's email is
/// interpreted; everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub user_email: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidInput {
    pub job_info: JobInfo,
    pub bidder_email: String,
    #[serde(default = "default_bid_status")]
    pub bid_status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

fn default_bid_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub bid: BidInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidStatusUpdate {
    pub bid_status: String,
}

impl BidStatusUpdate {
    pub fn to_patch(&self) -> Document {
        doc! { "bid_status": self.bid_status.as_str() }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        parse_object_id(self.id.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobPostQuery {
    pub category: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPostFilter {
    All,
    Category(String),
    OwnerEmail(String),
}

impl From<JobPostQuery> for JobPostFilter {
    /// Owner email takes precedence over category.
    fn from(query: JobPostQuery) -> Self {
        if let Some(email) = present(query.email) {
            JobPostFilter::OwnerEmail(email)
        } else if let Some(category) = present(query.category) {
            JobPostFilter::Category(category)
        } else {
            JobPostFilter::All
        }
    }
}

impl JobPostFilter {
    pub fn to_document(&self) -> Document {
        match self {
            JobPostFilter::All => Document::new(),
            JobPostFilter::Category(category) => doc! { "category": category.as_str() },
            JobPostFilter::OwnerEmail(email) => doc! { "user_email": email.as_str() },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BidQuery {
    pub company_email: Option<String>,
    pub email: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidFilter {
    All,
    CompanyEmail(String),
    BidderEmail(String),
    Id(ObjectId),
}

impl TryFrom<BidQuery> for BidFilter {
    type Error = AppError;

    /// Precedence: job owner email, then bidder email, then bid id.
    fn try_from(query: BidQuery) -> Result<Self, Self::Error> {
        if let Some(company_email) = present(query.company_email) {
            return Ok(BidFilter::CompanyEmail(company_email));
        }
        if let Some(email) = present(query.email) {
            return Ok(BidFilter::BidderEmail(email));
        }
        match present(query.id) {
            Some(id) => parse_object_id(Some(&id)).map(BidFilter::Id),
            None => Ok(BidFilter::All),
        }
    }
}

impl BidFilter {
    pub fn to_document(&self) -> Document {
        match self {
            BidFilter::All => Document::new(),
            BidFilter::CompanyEmail(email) => doc! { "job_info.user_email": email.as_str() },
            BidFilter::BidderEmail(email) => doc! { "bidder_email": email.as_str() },
            BidFilter::Id(id) => doc! { "_id": *id },
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts prices as JSON numbers or numeric strings.
fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(AmountVisitor)
}

struct AmountVisitor;

impl<'de> de::Visitor<'de> for AmountVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<f64>()
            .map(Some)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
