//! # Catalog Search
//!
//! The patron-facing catalog operations. Thin over [`CatalogRepository`]:
//! input is validated here and empty results become domain errors where the
//! caller needs one.
//!
//! ```text
//! search_by_subject(subject) ──► Vec<SubjectMatch>    (empty is fine)
//! search_by_author(last)     ──► Vec<AuthorMatch>     (empty is fine)
//! recommend_book(subject)    ──► Recommendation
//!                                 └── none in subject → NoBooksInSubject
//! ```

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::ServiceResult;
use crate::repository::CatalogRepository;
use stacks_core::validation::validate_search_query;
use stacks_core::{AuthorMatch, CoreError, Recommendation, SubjectMatch};

#[derive(Debug, Clone)]
pub struct SearchService {
    catalog: CatalogRepository,
}

impl SearchService {
    pub fn new(pool: SqlitePool) -> Self {
        SearchService {
            catalog: CatalogRepository::new(pool),
        }
    }

    /// Distinct subjects, alphabetical.
    pub async fn subjects(&self) -> ServiceResult<Vec<String>> {
        Ok(self.catalog.list_subjects().await?)
    }

    pub async fn search_by_subject(&self, subject: &str) -> ServiceResult<Vec<SubjectMatch>> {
        Ok(self.catalog.search_by_subject(subject).await?)
    }

    /// Books by an author's last name as typed by a patron.
    pub async fn search_by_author(&self, last_name: &str) -> ServiceResult<Vec<AuthorMatch>> {
        let last_name = validate_search_query(last_name)?;
        Ok(self.catalog.search_by_author(&last_name).await?)
    }

    /// One book from the subject, chosen at random.
    pub async fn recommend_book(&self, subject: &str) -> ServiceResult<Recommendation> {
        match self.catalog.recommend(subject).await? {
            Some(pick) => {
                debug!(subject = %subject, isbn = %pick.isbn, "Recommended");
                Ok(pick)
            }
            None => {
                warn!(subject = %subject, "Nothing to recommend");
                Err(CoreError::NoBooksInSubject(subject.to_string()).into())
            }
        }
    }
}
