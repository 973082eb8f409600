//! Candidate resolution
//!
//! Turns a free-text title into scored series candidates. The catalog decides
//! the order; this module only annotates each hit with a confidence score the
//! host can use to auto-select a match.

use crate::catalog::CatalogProvider;

/// Maximum number of search hits turned into candidates
pub const MAX_CANDIDATES: usize = 10;

/// Score of the first hit, and of any exact title match
pub const TOP_SCORE: u8 = 100;

/// Score lost per position in the response
const SCORE_STEP: u8 = 5;

/// A series the host may choose to bind a library entry to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Catalog identifier passed back to `update`
    pub remote_id: String,
    pub title: String,
    pub year: Option<i32>,
    /// Match confidence from 0 to 100
    pub rank_score: u8,
}

/// Score for the hit at `index` (0-based) in response order.
pub fn position_score(index: usize) -> u8 {
    let penalty = index.saturating_mul(SCORE_STEP as usize);
    TOP_SCORE.saturating_sub(penalty.min(TOP_SCORE as usize) as u8)
}

/// Searches the catalog and returns at most [`MAX_CANDIDATES`] candidates
/// in response order.
///
/// Never fails: a failed request yields no candidates, and a malformed hit
/// ends the list with the candidates collected before it.
pub fn resolve_candidates<P>(catalog: &P, query: &str, year: Option<i32>) -> Vec<Candidate>
where
    P: CatalogProvider + ?Sized,
{
    log::info!("Searching for: {query}");

    let hits = match catalog.search(query, year) {
        Ok(hits) => hits,
        Err(e) => {
            log::error!("Search error: {e}");
            return Vec::new();
        }
    };

    let wanted = query.to_lowercase();
    let mut candidates = Vec::new();

    for (index, hit) in hits.into_iter().take(MAX_CANDIDATES).enumerate() {
        let hit = match hit {
            Ok(hit) => hit,
            Err(e) => {
                log::error!("Search error: {e}");
                break;
            }
        };

        let rank_score = if hit.title.to_lowercase() == wanted {
            TOP_SCORE
        } else {
            position_score(index)
        };

        log::info!(
            "Found: {} (ID: {}, Score: {})",
            hit.title,
            hit.remote_id,
            rank_score
        );

        candidates.push(Candidate {
            remote_id: hit.remote_id,
            title: hit.title,
            year: hit.year,
            rank_score,
        });
    }

    candidates
}
