use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub shelf_location: String,
    pub cover_url: String,
    pub status: String,
    pub borrowed_by: String,
    pub borrowed_date: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A record is on loan while a borrower is recorded.
    pub fn is_on_loan(&self) -> bool {
        !self.borrowed_by.is_empty()
    }
}

/// Reading status of a catalog record. Stored as snake_case TEXT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    ToRead,
    Reading,
    Read,
    Abandoned,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::ToRead => "to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
            ReadingStatus::Abandoned => "abandoned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "to_read" => Some(ReadingStatus::ToRead),
            "reading" => Some(ReadingStatus::Reading),
            "read" => Some(ReadingStatus::Read),
            "abandoned" => Some(ReadingStatus::Abandoned),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for listing. `OnLoan` is a pseudo status: it matches
/// records with a non-empty borrower instead of the status column, and
/// is mutually exclusive with an explicit reading status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    Status(ReadingStatus),
    OnLoan,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        if s == "on_loan" {
            return Some(StatusFilter::OnLoan);
        }
        ReadingStatus::parse(s).map(StatusFilter::Status)
    }
}
