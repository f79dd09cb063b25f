// 🔎 Result Filters - Search term and area filtering for match results

use crate::matching::Match;
use crate::record::Record;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilter {
    /// Case-insensitive substring of the record name ("" = everything)
    pub search: String,

    /// Exact area (None = every area)
    pub area: Option<String>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_lowercase();
        self
    }

    pub fn with_area(mut self, area: &str) -> Self {
        self.area = Some(area.to_string());
        self
    }

    fn name_matches(&self, name: &str) -> bool {
        self.search.is_empty() || name.to_lowercase().contains(&self.search)
    }

    fn area_matches(&self, area: &str) -> bool {
        match &self.area {
            Some(wanted) => area == wanted,
            None => true,
        }
    }

    pub fn accepts_record(&self, record: &Record) -> bool {
        self.name_matches(&record.name) && self.area_matches(&record.area)
    }

    /// A match passes when either side fits the search and either side fits the area
    pub fn accepts_match(&self, m: &Match) -> bool {
        (self.name_matches(&m.a.name) || self.name_matches(&m.b.name))
            && (self.area_matches(&m.a.area) || self.area_matches(&m.b.area))
    }

    pub fn filter_records<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.accepts_record(r)).collect()
    }

    pub fn filter_matches<'a>(&self, matches: &'a [Match]) -> Vec<&'a Match> {
        matches.iter().filter(|m| self.accepts_match(m)).collect()
    }
}

/// Distinct non-empty areas, in first-occurrence order
pub fn distinct_areas(records: &[Record]) -> Vec<String> {
    collect_distinct(records.iter().map(|r| r.area.as_str()))
}

/// Distinct non-empty areas on either side of the matches
pub fn match_areas(matches: &[Match]) -> Vec<String> {
    collect_distinct(
        matches
            .iter()
            .flat_map(|m| [m.a.area.as_str(), m.b.area.as_str()]),
    )
}

fn collect_distinct<'a>(areas: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    areas
        .filter(|area| !area.is_empty() && seen.insert(*area))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;
    use crate::similarity::FieldScores;

    fn create_test_records() -> Vec<Record> {
        vec![
            Record::new(1, "Vacunación infantil").with_area("Salud"),
            Record::new(2, "Recolección de basura").with_area("Limpia"),
            Record::new(3, "Vacunación canina").with_area("Salud"),
            Record::new(4, "Bacheo"),
        ]
    }

    fn create_test_match(a: Record, b: Record) -> Match {
        Match {
            a,
            b,
            similarity: 0.9,
            scores: FieldScores {
                name: 0.9,
                description: 0.9,
                area: 0.9,
            },
        }
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let records = create_test_records();
        assert_eq!(MatchFilter::new().filter_records(&records).len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let records = create_test_records();
        let found = MatchFilter::new().with_search("VACUNACIÓN").filter_records(&records);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, RecordId::Int(1));
        assert_eq!(found[1].id, RecordId::Int(3));
    }

    #[test]
    fn test_search_and_area_combined() {
        let records = create_test_records();
        let filter = MatchFilter::new().with_search("basura").with_area("Salud");
        assert!(filter.filter_records(&records).is_empty());

        let filter = MatchFilter::new().with_area("Limpia");
        assert_eq!(filter.filter_records(&records)[0].id, RecordId::Int(2));
    }

    #[test]
    fn test_filter_matches_either_side() {
        let matches = vec![
            create_test_match(
                Record::new(1, "Vacunación infantil").with_area("Salud"),
                Record::new(10, "Programa de inmunización").with_area("Servicios Médicos"),
            ),
            create_test_match(
                Record::new(2, "Bacheo").with_area("Obras"),
                Record::new(11, "Reparación de baches").with_area("Obras"),
            ),
        ];

        let by_b_name = MatchFilter::new().with_search("inmunización");
        assert_eq!(by_b_name.filter_matches(&matches).len(), 1);

        let by_b_area = MatchFilter::new().with_area("Servicios Médicos");
        assert_eq!(by_b_area.filter_matches(&matches)[0].a.id, RecordId::Int(1));
    }

    #[test]
    fn test_distinct_areas() {
        let records = create_test_records();
        assert_eq!(distinct_areas(&records), vec!["Salud", "Limpia"]);
    }

    #[test]
    fn test_match_areas() {
        let matches = vec![create_test_match(
            Record::new(1, "a").with_area("Salud"),
            Record::new(2, "b").with_area("Salud"),
        )];
        assert_eq!(match_areas(&matches), vec!["Salud"]);
    }
}
