use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One job listing as presented to the swipe deck. Immutable once loaded
/// into the current batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub external_url: String,
    pub salary: Option<String>,
    pub kind: Option<String>, // "Full-time", "Part-time", ...
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    Like,
    Pass,
    Superlike,
}

impl SwipeAction {
    pub fn label(&self) -> &'static str {
        match self {
            SwipeAction::Like => "liked",
            SwipeAction::Pass => "passed",
            SwipeAction::Superlike => "super-liked",
        }
    }
}

/// The recorded outcome of one gesture or button press on a card.
/// Session-scoped only; never persisted.
#[derive(Debug, Clone)]
pub struct SwipeDecision {
    pub card: JobCard,
    pub action: SwipeAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Job,
    Profile,
    Company,
}

impl FavoriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Job => "job",
            FavoriteKind::Profile => "profile",
            FavoriteKind::Company => "company",
        }
    }
}

impl std::str::FromStr for FavoriteKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job" => Ok(FavoriteKind::Job),
            "profile" => Ok(FavoriteKind::Profile),
            "company" => Ok(FavoriteKind::Company),
            other => Err(anyhow::anyhow!("unknown favorite kind: {}", other)),
        }
    }
}

/// A saved reference to a job, profile or company, unique by id within the
/// collection and durable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub date_added: DateTime<Utc>,
    pub kind: FavoriteKind,
}

impl FavoriteEntry {
    /// Build an entry from a swiped card, stamped with the current time.
    pub fn from_card(card: &JobCard) -> Self {
        Self {
            id: card.id.clone(),
            title: card.title.clone(),
            company: card.company.clone(),
            location: card.location.clone(),
            salary: card.salary.clone(),
            date_added: Utc::now(),
            kind: FavoriteKind::Job,
        }
    }
}

/// A supported UI locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub label: &'static str,
    pub native_label: &'static str,
}
