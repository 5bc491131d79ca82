use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use super::ranker::RankedEntry;
use crate::error::DataIntegrityWarning;

/// Finishers whose places add up to the team score
pub const SCORING_RUNNERS: usize = 5;
/// Finishers after the scoring five that only break ties
pub const DISPLACERS: usize = 2;

/// A team's score with the runners behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScoreSummary {
    pub team: String,
    /// Sum of the scoring five's overall places; lower is better
    pub score: u32,
    pub scorers: Vec<RankedEntry>,
    pub displacers: Vec<RankedEntry>,
    /// Team has at least five finishers
    pub complete: bool,
}

impl TeamScoreSummary {
    /// Build a summary from a team's entries in overall place order
    pub fn from_entries(team: &str, entries: &[&RankedEntry]) -> Self {
        let scorers: Vec<RankedEntry> = entries
            .iter()
            .take(SCORING_RUNNERS)
            .map(|e| (*e).clone())
            .collect();
        let displacers: Vec<RankedEntry> = entries
            .iter()
            .skip(SCORING_RUNNERS)
            .take(DISPLACERS)
            .map(|e| (*e).clone())
            .collect();

        Self {
            team: team.to_string(),
            score: scorers.iter().map(|e| e.place).sum(),
            complete: scorers.len() == SCORING_RUNNERS,
            scorers,
            displacers,
        }
    }
}

/// A scored team in the final standings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    /// 1-based rank; tied teams share a rank
    pub rank: u32,
    /// Still level with another team after every tie-breaker
    pub tied: bool,
    #[serde(flatten)]
    pub summary: TeamScoreSummary,
}

#[derive(Debug, Clone, Default)]
pub struct TeamScoring {
    pub standings: Vec<TeamStanding>,
    /// Teams with fewer than five finishers, in order of first finisher
    pub unscored_teams: Vec<String>,
    pub warnings: Vec<DataIntegrityWarning>,
}

type TieBreakKey = fn(&TeamScoreSummary) -> u32;

/// Applied in order until one separates the teams
const TIE_BREAKERS: [TieBreakKey; 4] = [
    total_score,
    last_scorer_place,
    first_displacer_place,
    second_displacer_place,
];

fn total_score(summary: &TeamScoreSummary) -> u32 {
    summary.score
}

fn last_scorer_place(summary: &TeamScoreSummary) -> u32 {
    summary.scorers.last().map(|e| e.place).unwrap_or(u32::MAX)
}

// A missing displacer loses to any present one.
fn first_displacer_place(summary: &TeamScoreSummary) -> u32 {
    summary.displacers.first().map(|e| e.place).unwrap_or(u32::MAX)
}

fn second_displacer_place(summary: &TeamScoreSummary) -> u32 {
    summary.displacers.get(1).map(|e| e.place).unwrap_or(u32::MAX)
}

fn compare_teams(a: &TeamScoreSummary, b: &TeamScoreSummary) -> Ordering {
    TIE_BREAKERS
        .iter()
        .map(|key| key(a).cmp(&key(b)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Cross-country team standings from the overall ranking.
///
/// Entries without a team are skipped with a warning. Only teams with five
/// finishers are ranked; the rest are listed in `unscored_teams`.
pub fn score_teams(entries: &[RankedEntry]) -> TeamScoring {
    let mut scoring = TeamScoring::default();
    let mut order: Vec<&str> = Vec::new();
    let mut by_team: HashMap<&str, Vec<&RankedEntry>> = HashMap::new();

    for entry in entries {
        match entry.team.as_deref() {
            Some(team) => {
                by_team
                    .entry(team)
                    .or_insert_with(|| {
                        order.push(team);
                        Vec::new()
                    })
                    .push(entry);
            }
            None => scoring
                .warnings
                .push(DataIntegrityWarning::MissingTeam { bib: entry.bib }),
        }
    }

    let mut summaries = Vec::new();
    for team in order {
        let summary = TeamScoreSummary::from_entries(team, &by_team[team]);
        if summary.complete {
            summaries.push(summary);
        } else {
            debug!(team, finishers = summary.scorers.len(), "team not scored");
            scoring.unscored_teams.push(summary.team);
        }
    }

    summaries.sort_by(compare_teams);

    for (i, summary) in summaries.iter().enumerate() {
        let level_with_prev = i > 0 && compare_teams(&summaries[i - 1], summary).is_eq();
        let level_with_next = summaries
            .get(i + 1)
            .is_some_and(|next| compare_teams(summary, next).is_eq());

        let rank = if level_with_prev {
            scoring.standings[i - 1].rank
        } else {
            i as u32 + 1
        };
        scoring.standings.push(TeamStanding {
            rank,
            tied: level_with_prev || level_with_next,
            summary: summary.clone(),
        });
    }

    scoring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(place: u32, bib: u32, team: Option<&str>) -> RankedEntry {
        RankedEntry {
            place,
            bib,
            name: format!("Runner {}", bib),
            finish_time: 600.0 + place as f64,
            team: team.map(str::to_string),
            age: None,
        }
    }

    /// Entries for `team` at the given places, plus filler at every other place
    fn field(teams: &[(&str, Vec<u32>)]) -> Vec<RankedEntry> {
        let last = teams
            .iter()
            .flat_map(|(_, places)| places.iter().copied())
            .max()
            .unwrap_or(0);
        (1..=last)
            .map(|place| {
                let team = teams
                    .iter()
                    .find(|(_, places)| places.contains(&place))
                    .map(|(team, _)| *team)
                    .unwrap_or("Filler");
                entry(place, place, Some(team))
            })
            .collect()
    }

    fn standing<'a>(scoring: &'a TeamScoring, team: &str) -> &'a TeamStanding {
        scoring
            .standings
            .iter()
            .find(|s| s.summary.team == team)
            .unwrap()
    }

    #[test]
    fn test_score_is_sum_of_five_places() {
        let entries = field(&[("A", vec![2, 5, 6, 7, 8])]);
        let scoring = score_teams(&entries);
        assert_eq!(standing(&scoring, "A").summary.score, 28);
    }

    #[test]
    fn test_sixth_runner_is_displacer_only() {
        let entries = field(&[("A", vec![2, 5, 6, 7, 8, 9, 10])]);
        let scoring = score_teams(&entries);
        let a = &standing(&scoring, "A").summary;

        assert_eq!(a.score, 28);
        assert!(a.complete);
        let displacers: Vec<u32> = a.displacers.iter().map(|e| e.place).collect();
        assert_eq!(displacers, vec![9, 10]);
    }

    #[test]
    fn test_only_two_displacers() {
        let entries = field(&[("A", vec![1, 2, 3, 4, 5, 6, 7, 8])]);
        let scoring = score_teams(&entries);
        let a = &standing(&scoring, "A").summary;
        assert_eq!(a.displacers.len(), 2);
        assert_eq!(a.score, 15);
    }

    #[test]
    fn test_four_finishers_not_scored() {
        let entries = field(&[("A", vec![1, 2, 3, 4]), ("B", vec![5, 6, 7, 8, 9])]);
        let scoring = score_teams(&entries);

        assert!(scoring.standings.iter().all(|s| s.summary.team != "A"));
        assert_eq!(scoring.unscored_teams, vec!["A".to_string()]);
        assert_eq!(standing(&scoring, "B").rank, 1);
    }

    #[test]
    fn test_lowest_score_wins() {
        let entries = field(&[
            ("A", vec![2, 4, 6, 8, 10]),
            ("B", vec![1, 3, 5, 7, 9]),
        ]);
        let scoring = score_teams(&entries);
        assert_eq!(scoring.standings[0].summary.team, "B");
        assert_eq!(scoring.standings[0].rank, 1);
        assert_eq!(scoring.standings[1].summary.team, "A");
        assert_eq!(scoring.standings[1].rank, 2);
        assert!(!scoring.standings[0].tied);
    }

    #[test]
    fn test_tie_broken_by_fifth_scorer() {
        let entries = field(&[
            ("A", vec![1, 2, 3, 10, 14]),
            ("B", vec![4, 5, 6, 7, 8]),
        ]);
        // A = 30, B = 30; B's fifth scorer (8) beats A's (14)
        let scoring = score_teams(&entries);
        assert_eq!(scoring.standings[0].summary.team, "B");
        assert_eq!(scoring.standings[1].summary.team, "A");
        assert_eq!(scoring.standings[1].rank, 2);
        assert!(!scoring.standings[0].tied);
    }

    #[test]
    fn test_tie_broken_by_first_displacer() {
        // Both score 29 with a dead heat for fifth scorer at 11
        let entries = vec![
            entry(1, 1, Some("A")),
            entry(2, 2, Some("B")),
            entry(3, 3, Some("B")),
            entry(4, 4, Some("A")),
            entry(5, 5, Some("A")),
            entry(6, 6, Some("B")),
            entry(7, 7, Some("B")),
            entry(8, 8, Some("A")),
            entry(9, 9, Some("C")),
            entry(10, 10, Some("C")),
            entry(11, 11, Some("A")),
            entry(11, 12, Some("B")),
            entry(13, 13, Some("B")),
            entry(14, 14, Some("A")),
        ];

        let scoring = score_teams(&entries);
        assert_eq!(standing(&scoring, "A").summary.score, 29);
        assert_eq!(standing(&scoring, "B").summary.score, 29);
        assert_eq!(standing(&scoring, "B").rank, 1);
        assert_eq!(standing(&scoring, "A").rank, 2);
    }

    #[test]
    fn test_tie_broken_by_second_displacer() {
        let entries = vec![
            entry(1, 1, Some("A")),
            entry(1, 2, Some("B")),
            entry(3, 3, Some("A")),
            entry(3, 4, Some("B")),
            entry(5, 5, Some("A")),
            entry(5, 6, Some("B")),
            entry(7, 7, Some("A")),
            entry(7, 8, Some("B")),
            entry(9, 9, Some("A")),
            entry(9, 10, Some("B")),
            entry(11, 11, Some("A")),
            entry(11, 12, Some("B")),
            entry(13, 13, Some("B")),
            entry(14, 14, Some("A")),
        ];
        let scoring = score_teams(&entries);
        assert_eq!(standing(&scoring, "B").rank, 1);
        assert_eq!(standing(&scoring, "A").rank, 2);
        assert!(!standing(&scoring, "A").tied);
    }

    #[test]
    fn test_missing_displacer_loses_tie_break() {
        let entries = vec![
            entry(1, 1, Some("A")),
            entry(1, 2, Some("B")),
            entry(3, 3, Some("A")),
            entry(3, 4, Some("B")),
            entry(5, 5, Some("A")),
            entry(5, 6, Some("B")),
            entry(7, 7, Some("A")),
            entry(7, 8, Some("B")),
            entry(9, 9, Some("A")),
            entry(9, 10, Some("B")),
            entry(11, 11, Some("B")),
        ];
        let scoring = score_teams(&entries);
        assert_eq!(standing(&scoring, "B").rank, 1);
        assert_eq!(standing(&scoring, "A").rank, 2);
    }

    #[test]
    fn test_unresolved_tie_shares_rank() {
        let entries = vec![
            entry(1, 1, Some("A")),
            entry(1, 2, Some("B")),
            entry(3, 3, Some("A")),
            entry(3, 4, Some("B")),
            entry(5, 5, Some("A")),
            entry(5, 6, Some("B")),
            entry(7, 7, Some("A")),
            entry(7, 8, Some("B")),
            entry(9, 9, Some("A")),
            entry(9, 10, Some("B")),
            entry(11, 11, Some("C")),
            entry(12, 12, Some("C")),
            entry(13, 13, Some("C")),
            entry(14, 14, Some("C")),
            entry(15, 15, Some("C")),
        ];
        let scoring = score_teams(&entries);
        let a = standing(&scoring, "A");
        let b = standing(&scoring, "B");
        assert_eq!(a.rank, 1);
        assert_eq!(b.rank, 1);
        assert!(a.tied && b.tied);
        // Next team resumes after the tied pair
        let c = standing(&scoring, "C");
        assert_eq!(c.rank, 3);
        assert!(!c.tied);
    }

    #[test]
    fn test_runner_without_team_is_skipped() {
        let mut entries = field(&[("A", vec![1, 2, 3, 4, 6])]);
        entries[4].team = None;
        entries.push(entry(7, 7, None));

        let scoring = score_teams(&entries);
        assert!(scoring
            .warnings
            .contains(&DataIntegrityWarning::MissingTeam { bib: 5 }));
        assert!(scoring
            .warnings
            .contains(&DataIntegrityWarning::MissingTeam { bib: 7 }));
        assert_eq!(standing(&scoring, "A").summary.score, 16);
    }
}
