//! Key search shared by every [`TargetIndex`](crate::store::TargetIndex)
//! backend.
//!
//! Only keys are searchable. A key like `/services/api-gateway/replicas`
//! is tokenized on every non-alphanumeric character into
//! `services`, `api`, `gateway`, `replicas`. Matching is case-insensitive
//! and the last query term is treated as a prefix so that search-as-you-type
//! works (`api gat` matches the key above).
//!
//! # Matching strategies
//!
//! | Strategy | Rule |
//! |----------|------|
//! | [`MatchingStrategy::All`] | every term must match |
//! | [`MatchingStrategy::Last`] | terms are dropped from the end until the rest match; the first term is always required |
//!
//! Results are ordered by matched-term count (desc), then key (asc).

use serde::Deserialize;

use crate::models::KeyValue;

/// How many query terms a key must match to be returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingStrategy {
    All,
    #[default]
    Last,
}

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// A parsed search query.
#[derive(Debug, Clone)]
pub struct KeyQuery {
    terms: Vec<String>,
    strategy: MatchingStrategy,
}

impl KeyQuery {
    pub fn parse(query: &str, strategy: MatchingStrategy) -> Self {
        Self {
            terms: tokenize(query),
            strategy,
        }
    }

    /// A query without terms lists keys instead of searching them.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms `key` matches, or `None` when it is not a hit.
    ///
    /// Under [`MatchingStrategy::Last`] only a leading run of terms counts:
    /// terms are dropped from the end of the query until the rest all match.
    pub fn score(&self, key: &str) -> Option<usize> {
        let tokens = tokenize(key);
        let last = self.terms.len().saturating_sub(1);
        let term_hits = |(i, term): &(usize, &String)| {
            tokens.iter().any(|tok| {
                if *i == last {
                    tok.starts_with(term.as_str())
                } else {
                    tok == *term
                }
            })
        };

        let matched = match self.strategy {
            MatchingStrategy::All => {
                let all = self.terms.iter().enumerate().all(|t| term_hits(&t));
                if all {
                    self.terms.len()
                } else {
                    0
                }
            }
            MatchingStrategy::Last => self
                .terms
                .iter()
                .enumerate()
                .take_while(|t| term_hits(t))
                .count(),
        };
        (matched > 0).then_some(matched)
    }

    /// Render the query as an SQLite FTS5 `MATCH` expression.
    ///
    /// Every term is quoted so that FTS5 operators in user input are
    /// treated as text. Returns `None` for an empty query.
    pub fn fts_expression(&self) -> Option<String> {
        if self.terms.is_empty() {
            return None;
        }
        let last = self.terms.len() - 1;
        let parts: Vec<String> = self
            .terms
            .iter()
            .enumerate()
            .map(|(i, term)| {
                let quoted = format!("\"{}\"", term.replace('"', "\"\""));
                if i == last {
                    format!("{}*", quoted)
                } else {
                    quoted
                }
            })
            .collect();
        let joiner = match self.strategy {
            MatchingStrategy::All => " AND ",
            MatchingStrategy::Last => " OR ",
        };
        Some(parts.join(joiner))
    }

    /// Score, filter and order `entries`, keeping at most `limit`.
    pub fn rank<'a, I>(&self, entries: I, limit: usize) -> Vec<KeyValue>
    where
        I: IntoIterator<Item = &'a KeyValue>,
    {
        let mut hits: Vec<(usize, &KeyValue)> = entries
            .into_iter()
            .filter_map(|kv| self.score(&kv.key).map(|s| (s, kv)))
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.key.cmp(&b.1.key)));
        hits.into_iter()
            .take(limit)
            .map(|(_, kv)| kv.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("/services/API-gateway/replicas"),
            vec!["services", "api", "gateway", "replicas"]
        );
        assert!(tokenize("///").is_empty());
    }

    #[test]
    fn test_last_term_is_prefix() {
        let q = KeyQuery::parse("api gat", MatchingStrategy::All);
        assert_eq!(q.score("/services/api-gateway"), Some(2));
        // Only the last term is a prefix.
        let q = KeyQuery::parse("ap gateway", MatchingStrategy::All);
        assert_eq!(q.score("/services/api-gateway"), None);
    }

    #[test]
    fn test_strategy_all_requires_every_term() {
        let q = KeyQuery::parse("db replicas", MatchingStrategy::All);
        assert!(q.score("/db/primary").is_none());
        assert_eq!(q.score("/db/replicas"), Some(2));
    }

    #[test]
    fn test_strategy_last_drops_trailing_terms() {
        let q = KeyQuery::parse("db replicas", MatchingStrategy::Last);
        assert_eq!(q.score("/db/primary"), Some(1));
        assert_eq!(q.score("/db/replicas"), Some(2));
        assert!(q.score("/cache/size").is_none());
        // Matching a later term alone is not enough.
        assert!(q.score("/cache/replicas").is_none());

        let q = KeyQuery::parse("app db port", MatchingStrategy::Last);
        assert_eq!(q.score("/app/db/host"), Some(2));
        assert_eq!(q.score("/app/cache/port"), Some(1));
        assert!(q.score("/svc/db/port").is_none());
    }

    #[test]
    fn test_rank_orders_by_score_then_key() {
        let entries = vec![
            KeyValue::new("/db/primary", "1"),
            KeyValue::new("/db/replicas", "3"),
            KeyValue::new("/cache/replicas", "2"),
            KeyValue::new("/cache/size", "9"),
        ];
        let q = KeyQuery::parse("db replicas", MatchingStrategy::Last);
        let keys: Vec<String> = q.rank(&entries, 10).into_iter().map(|kv| kv.key).collect();
        assert_eq!(keys, vec!["/db/replicas", "/db/primary"]);

        let limited = q.rank(&entries, 1);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].key, "/db/replicas");
    }

    #[test]
    fn test_fts_expression() {
        let q = KeyQuery::parse("api gat", MatchingStrategy::All);
        assert_eq!(q.fts_expression().unwrap(), "\"api\" AND \"gat\"*");
        let q = KeyQuery::parse("api gat", MatchingStrategy::Last);
        assert_eq!(q.fts_expression().unwrap(), "\"api\" OR \"gat\"*");
        assert!(KeyQuery::parse("  ", MatchingStrategy::Last)
            .fts_expression()
            .is_none());
    }

    #[test]
    fn test_fts_expression_neutralises_operators() {
        let q = KeyQuery::parse("NEAR(a b)", MatchingStrategy::All);
        assert_eq!(q.terms(), &["near", "a", "b"]);
        assert_eq!(q.fts_expression().unwrap(), "\"near\" AND \"a\" AND \"b\"*");
    }
}
