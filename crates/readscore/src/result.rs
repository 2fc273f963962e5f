// ABOUTME: Scored page and result set types produced by the pipeline.
// ABOUTME: Readscore ordering is ascending with unscored pages always sorted last.

use std::cmp::Ordering;

use serde::{Serialize, Serializer};

/// A page's readability score, or the marker for a page that could not be scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readscore {
    Scored(f64),
    Unscored,
}

impl Readscore {
    /// The numeric score, if there is one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Readscore::Scored(v) => Some(*v),
            Readscore::Unscored => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Readscore::Scored(_))
    }

    /// Ascending order by score; every unscored value sorts after every scored one.
    pub fn ascending(a: &Readscore, b: &Readscore) -> Ordering {
        match (a, b) {
            (Readscore::Scored(x), Readscore::Scored(y)) => x.total_cmp(y),
            (Readscore::Scored(_), Readscore::Unscored) => Ordering::Less,
            (Readscore::Unscored, Readscore::Scored(_)) => Ordering::Greater,
            (Readscore::Unscored, Readscore::Unscored) => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for Readscore {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Readscore::Unscored, Readscore::Scored)
    }
}

/// Serialized as a number, or `null` when unscored.
impl Serialize for Readscore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// One page of the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPage {
    pub page_id: u64,
    pub title: String,
    pub readscore: Readscore,
}

/// Pages ordered from least to most readable, unscored pages last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub category: String,
    pub pages: Vec<ScoredPage>,
    /// False when some extracts could not be fetched, so unscored pages may
    /// have readable text upstream.
    pub complete: bool,
}

impl ResultSet {
    /// Build a result set, sorting `pages` stably by readscore.
    ///
    /// Pages with equal scores keep the order they were given in.
    pub fn from_unsorted(category: impl Into<String>, mut pages: Vec<ScoredPage>) -> Self {
        pages.sort_by(|a, b| Readscore::ascending(&a.readscore, &b.readscore));
        Self {
            category: category.into(),
            pages,
            complete: true,
        }
    }

    /// Mark whether every extract request behind this ranking succeeded.
    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredPage> {
        self.pages.iter()
    }

    /// Number of pages that received a score.
    pub fn scored_count(&self) -> usize {
        self.pages.iter().filter(|p| p.readscore.is_scored()).count()
    }

    /// `(title, readscore, page_id)` triples in ranking order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, Readscore, u64)> + '_ {
        self.pages
            .iter()
            .map(|p| (p.title.as_str(), p.readscore, p.page_id))
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScoredPage;
    type IntoIter = std::slice::Iter<'a, ScoredPage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: u64, score: Option<f64>) -> ScoredPage {
        ScoredPage {
            page_id: id,
            title: format!("Page {}", id),
            readscore: score.into(),
        }
    }

    fn ids(set: &ResultSet) -> Vec<u64> {
        set.iter().map(|p| p.page_id).collect()
    }

    #[test]
    fn sorts_ascending_by_score() {
        let set = ResultSet::from_unsorted("Trees", vec![page(1, Some(70.8)), page(2, Some(45.2))]);
        assert_eq!(ids(&set), vec![2, 1]);
    }

    #[test]
    fn unscored_pages_go_last() {
        let set = ResultSet::from_unsorted(
            "Trees",
            vec![
                page(1, None),
                page(2, Some(80.0)),
                page(3, None),
                page(4, Some(-12.5)),
                page(5, Some(30.0)),
            ],
        );
        assert_eq!(ids(&set), vec![4, 5, 2, 1, 3]);
        assert_eq!(set.scored_count(), 3);
        let first_unscored = set
            .iter()
            .position(|p| !p.readscore.is_scored())
            .unwrap();
        assert!(set.pages[first_unscored..]
            .iter()
            .all(|p| !p.readscore.is_scored()));
    }

    #[test]
    fn ties_keep_encounter_order() {
        let set = ResultSet::from_unsorted(
            "Trees",
            vec![
                page(7, Some(50.0)),
                page(3, Some(50.0)),
                page(9, Some(10.0)),
                page(1, Some(50.0)),
            ],
        );
        assert_eq!(ids(&set), vec![9, 7, 3, 1]);
    }

    #[test]
    fn ascending_is_a_total_order() {
        let values = [
            Readscore::Scored(-1.0),
            Readscore::Scored(0.0),
            Readscore::Scored(99.5),
            Readscore::Unscored,
        ];
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                assert_eq!(Readscore::ascending(a, b), i.cmp(&j));
            }
        }
    }

    #[test]
    fn serializes_unscored_as_null() {
        let json = serde_json::to_value(page(4, None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page_id": 4, "title": "Page 4", "readscore": null})
        );
        let json = serde_json::to_value(page(5, Some(61.25))).unwrap();
        assert_eq!(json["readscore"], 61.25);
    }

    #[test]
    fn complete_by_default_and_overridable() {
        let set = ResultSet::from_unsorted("Trees", vec![page(1, Some(1.0))]);
        assert!(set.complete);
        let set = set.with_complete(false);
        assert!(!set.complete);
        assert_eq!(serde_json::to_value(&set).unwrap()["complete"], false);
    }

    #[test]
    fn triples_follow_ranking() {
        let set = ResultSet::from_unsorted("Trees", vec![page(1, None), page(2, Some(1.0))]);
        let triples: Vec<_> = set.triples().collect();
        assert_eq!(
            triples,
            vec![
                ("Page 2", Readscore::Scored(1.0), 2),
                ("Page 1", Readscore::Unscored, 1)
            ]
        );
    }
}
