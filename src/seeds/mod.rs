// Seed data for the tournaments that can be created with their full
// schedule: national teams, groups, group fixtures and knockout rules.

use chrono::NaiveDate;

use crate::tournament::TournamentKind;

mod euro2016;
mod worldcup2014;
mod worldcup2018;

const DATE_FORMAT: &str = "%b/%d/%Y";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// A scheduled match. For knockout matches `team1`/`team2` are rule slots
/// such as `1A`, `W49` or `3A/C/D`.
#[derive(Debug, Clone, Copy)]
pub struct MatchSeed {
    pub id_number: i64,
    pub date: &'static str,
    pub team1: &'static str,
    pub team2: &'static str,
    pub location: &'static str,
}

impl MatchSeed {
    /// Rule string stored on a knockout match until its teams are known.
    pub fn rule(&self) -> String {
        format!("{} {}", self.team1, self.team2)
    }
}

pub(crate) const fn m(
    id_number: i64,
    date: &'static str,
    team1: &'static str,
    team2: &'static str,
    location: &'static str,
) -> MatchSeed {
    MatchSeed {
        id_number,
        date,
        team1,
        team2,
        location,
    }
}

/// One group in draw order, with its six round-robin matches.
#[derive(Debug, Clone, Copy)]
pub struct GroupSeed {
    pub name: &'static str,
    pub teams: [&'static str; 4],
    pub matches: [MatchSeed; 6],
}

#[derive(Debug)]
pub struct TournamentSeed {
    pub kind: TournamentKind,
    pub name: &'static str,
    pub description: &'static str,
    pub start_date: &'static str,
    pub end_date: &'static str,
    pub groups: &'static [GroupSeed],
    pub knockout: &'static [MatchSeed],
    /// Flag codes by team name.
    pub codes: &'static [(&'static str, &'static str)],
}

impl TournamentSeed {
    pub fn country_code(&self, team: &str) -> Option<&'static str> {
        self.codes
            .iter()
            .find(|(name, _)| *name == team)
            .map(|(_, code)| *code)
    }

    pub fn group_matches(&self) -> impl Iterator<Item = &MatchSeed> {
        self.groups.iter().flat_map(|g| g.matches.iter())
    }

    pub fn all_matches(&self) -> impl Iterator<Item = &MatchSeed> {
        self.group_matches().chain(self.knockout.iter())
    }
}

/// Seed data for a tournament kind. Custom tournaments have none.
pub fn seed(kind: TournamentKind) -> Option<&'static TournamentSeed> {
    match kind {
        TournamentKind::Custom => None,
        TournamentKind::WorldCup2014 => Some(&worldcup2014::SEED),
        TournamentKind::WorldCup2018 => Some(&worldcup2018::SEED),
        TournamentKind::Euro2016 => Some(&euro2016::SEED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{parse_rule, Phase};
    use std::collections::HashSet;

    fn seeds() -> Vec<&'static TournamentSeed> {
        TournamentKind::SEEDED.into_iter().filter_map(seed).collect()
    }

    #[test]
    fn test_every_seeded_kind_has_data() {
        assert!(seed(TournamentKind::Custom).is_none());
        for kind in TournamentKind::SEEDED {
            assert_eq!(seed(kind).unwrap().kind, kind);
        }
    }

    #[test]
    fn test_match_numbers_fill_the_layout() {
        for s in seeds() {
            let mut ids: Vec<i64> = s.all_matches().map(|m| m.id_number).collect();
            ids.sort();
            let (_, last) = s.kind.layout().last().map(|p| (p.first, p.last)).unwrap();
            assert_eq!(ids, (1..=last).collect::<Vec<_>>(), "{}", s.name);
            for m in s.group_matches() {
                assert_eq!(s.kind.phase_of(m.id_number), Some(Phase::FirstStage));
            }
            for m in s.knockout {
                assert_ne!(s.kind.phase_of(m.id_number), Some(Phase::FirstStage));
            }
        }
    }

    #[test]
    fn test_every_team_has_a_code_and_plays_in_its_group() {
        for s in seeds() {
            for group in s.groups {
                let names: HashSet<&str> = group.teams.iter().copied().collect();
                for t in &group.teams {
                    assert!(s.country_code(t).is_some(), "{t} has no code in {}", s.name);
                }
                for m in &group.matches {
                    assert!(names.contains(m.team1) && names.contains(m.team2), "match {}", m.id_number);
                }
            }
        }
    }

    #[test]
    fn test_dates_parse_within_tournament() {
        for s in seeds() {
            let start = parse_date(s.start_date).unwrap();
            let end = parse_date(s.end_date).unwrap();
            for m in s.all_matches() {
                let d = parse_date(m.date).unwrap();
                assert!(d >= start && d <= end, "{}: match {} out of range", s.name, m.id_number);
            }
        }
        let wc = seed(TournamentKind::WorldCup2014).unwrap();
        assert_eq!(parse_date(wc.start_date), NaiveDate::from_ymd_opt(2014, 6, 12));
    }

    #[test]
    fn test_knockout_rules_parse() {
        for s in seeds() {
            for m in s.knockout {
                assert!(parse_rule(&m.rule()).is_some(), "{}: match {}", s.name, m.id_number);
            }
        }
        let wc = seed(TournamentKind::WorldCup2014).unwrap();
        assert_eq!(wc.knockout[14].rule(), "L61 L62");
        let euro = seed(TournamentKind::Euro2016).unwrap();
        assert_eq!(euro.knockout.last().unwrap().rule(), "W49 W50");
    }

    #[test]
    fn test_group_stage_ends_with_its_last_match_number() {
        // the last group match must be played on the last group-stage day
        for s in seeds() {
            let last_day = s.group_matches().map(|m| parse_date(m.date).unwrap()).max().unwrap();
            let last_ids: Vec<i64> = s
                .group_matches()
                .filter(|m| parse_date(m.date).unwrap() == last_day)
                .map(|m| m.id_number)
                .collect();
            let (_, last) = s.kind.interval(Phase::FirstStage).unwrap();
            assert_eq!(last_ids.iter().max(), Some(&last), "{}", s.name);
        }
    }
}
