//! Chirp domain models and body rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Maximum chirp body length in bytes
pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const BLUR: &str = "****";

/// Chirp
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

/// Create chirp / validate chirp request
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateChirpResponse {
    pub cleaned_body: String,
}

/// Sort order by `created_at`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// `GET /api/chirps` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ChirpQuery {
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Check length and replace profane words.
///
/// Words are split on single spaces and compared case-insensitively; a word
/// with trailing punctuation is left alone.
pub fn clean_body(body: &str) -> Result<String, AppError> {
    if body.len() > MAX_CHIRP_LENGTH {
        return Err(AppError::BadRequest("Chirp is too long".to_string()));
    }

    Ok(replace_profanity(body))
}

pub fn replace_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE_WORDS.contains(&lower.as_str()) {
                BLUR
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_profanity() {
        assert_eq!(
            replace_profanity("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            replace_profanity("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            replace_profanity("I really need a kerfuffle to go to bed sooner, Fornax !"),
            "I really need a **** to go to bed sooner, **** !"
        );
    }

    #[test]
    fn test_punctuation_is_not_filtered() {
        assert_eq!(replace_profanity("Sharbert!"), "Sharbert!");
    }

    #[test]
    fn test_spacing_is_preserved() {
        assert_eq!(replace_profanity("a  fornax "), "a  **** ");
    }

    #[test]
    fn test_length_limit_is_bytes() {
        assert!(clean_body(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());
        assert!(clean_body(&"a".repeat(MAX_CHIRP_LENGTH + 1)).is_err());
        // 47 three-byte characters = 141 bytes
        assert!(clean_body(&"€".repeat(47)).is_err());
    }

    #[test]
    fn test_sort_order_default_is_asc() {
        let query: ChirpQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.sort, SortOrder::Asc);
        assert!(query.author_id.is_none());

        let query: ChirpQuery = serde_json::from_str(r#"{"sort":"desc"}"#).unwrap();
        assert_eq!(query.sort, SortOrder::Desc);
    }
}
