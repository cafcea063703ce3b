//! History service for the transformation gallery
//!
//! The backend returns the whole list; searching and filtering happen here
//! over the fetched rows.

use std::sync::Arc;

use super::auth::AuthService;
use crate::error::Result;
use crate::gateway::BackendGateway;
use crate::types::{Transformation, Verbosity};

/// Client-side filter over fetched transformations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Case-insensitive substring matched against input and output text
    pub search: Option<String>,
    pub persona: Option<String>,
    pub verbosity: Option<Verbosity>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn matches(&self, row: &Transformation) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                let needle = search.to_lowercase();
                let hit = row.input_text.to_lowercase().contains(&needle)
                    || row.output_text.to_lowercase().contains(&needle)
                    || row
                        .username
                        .as_deref()
                        .is_some_and(|u| u.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }

        if let Some(persona) = &self.persona {
            match &row.persona {
                Some(p) if p.eq_ignore_ascii_case(persona) => {}
                _ => return false,
            }
        }

        if let Some(verbosity) = self.verbosity {
            if row.verbosity_level != verbosity.level() {
                return false;
            }
        }

        true
    }

    /// Keep matching rows in their original order, honouring `limit`
    pub fn apply(&self, rows: Vec<Transformation>) -> Vec<Transformation> {
        let matching = rows.into_iter().filter(|row| self.matches(row));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

/// History service
#[derive(Clone)]
pub struct HistoryService {
    gateway: Arc<dyn BackendGateway>,
    auth: AuthService,
}

impl HistoryService {
    pub fn new(gateway: Arc<dyn BackendGateway>, auth: AuthService) -> Self {
        Self { gateway, auth }
    }

    /// The signed-in user's transformations, newest first
    pub async fn fetch(&self) -> Result<Vec<Transformation>> {
        let rows = self
            .gateway
            .history()
            .await
            .map_err(|e| self.auth.check_expired(e))?;
        tracing::debug!(rows = rows.len(), "Fetched history");
        Ok(rows)
    }

    /// Fetch and filter in one step
    pub async fn list(&self, query: &HistoryQuery) -> Result<Vec<Transformation>> {
        Ok(query.apply(self.fetch().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, input: &str, output: &str, persona: &str, level: u8) -> Transformation {
        Transformation {
            id,
            input_text: input.to_string(),
            output_text: output.to_string(),
            verbosity_level: level,
            created_at: "2024-05-13 09:30:00".to_string(),
            persona: Some(persona.to_string()),
            api_provider: None,
            user_id: Some(2),
            username: None,
        }
    }

    fn rows() -> Vec<Transformation> {
        vec![
            row(3, "Taxes are high", "Taxes are theft", "friedman", 1),
            row(2, "The weather", "Tremendous weather", "trump", 2),
            row(1, "Religion", "God is not great", "hitchens", 3),
        ]
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        assert_eq!(HistoryQuery::default().apply(rows()).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_over_both_texts() {
        let query = HistoryQuery {
            search: Some("TREMENDOUS".to_string()),
            ..Default::default()
        };
        let result = query.apply(rows());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);

        let query = HistoryQuery {
            search: Some("taxes".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(rows())[0].id, 3);
    }

    #[test]
    fn test_blank_search_ignored() {
        let query = HistoryQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(rows()).len(), 3);
    }

    #[test]
    fn test_persona_and_verbosity_filters() {
        let query = HistoryQuery {
            persona: Some("Hitchens".to_string()),
            verbosity: Some(Verbosity::Verbose),
            ..Default::default()
        };
        let result = query.apply(rows());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);

        let query = HistoryQuery {
            persona: Some("hitchens".to_string()),
            verbosity: Some(Verbosity::Concise),
            ..Default::default()
        };
        assert!(query.apply(rows()).is_empty());
    }

    #[test]
    fn test_limit_preserves_order() {
        let query = HistoryQuery {
            limit: Some(2),
            ..Default::default()
        };
        let ids: Vec<i64> = query.apply(rows()).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
