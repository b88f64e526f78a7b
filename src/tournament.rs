// Tournament structure: phases over the match sequence, calendar grouping,
// knockout rule resolution and group standings.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    FirstStage,
    RoundOf16,
    QuarterFinals,
    SemiFinals,
    ThirdPlace,
    Finals,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::FirstStage,
        Phase::RoundOf16,
        Phase::QuarterFinals,
        Phase::SemiFinals,
        Phase::ThirdPlace,
        Phase::Finals,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::FirstStage => "First Stage",
            Phase::RoundOf16 => "Round of 16",
            Phase::QuarterFinals => "Quarter-finals",
            Phase::SemiFinals => "Semi-finals",
            Phase::ThirdPlace => "Third Place",
            Phase::Finals => "Finals",
        }
    }

    /// Parse a phase from its path name (`round_of_16`) or display name.
    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_str_name() == s || p.display_name().eq_ignore_ascii_case(s))
    }

    pub fn to_str_name(&self) -> &'static str {
        match self {
            Phase::FirstStage => "first_stage",
            Phase::RoundOf16 => "round_of_16",
            Phase::QuarterFinals => "quarter_finals",
            Phase::SemiFinals => "semi_finals",
            Phase::ThirdPlace => "third_place",
            Phase::Finals => "finals",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Inclusive range of match numbers played in one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseInterval {
    pub phase: Phase,
    pub first: i64,
    pub last: i64,
}

const fn span(phase: Phase, first: i64, last: i64) -> PhaseInterval {
    PhaseInterval { phase, first, last }
}

/// 32 teams: eight groups, then a 16-team bracket with a third place match.
const WORLD_CUP_LAYOUT: [PhaseInterval; 6] = [
    span(Phase::FirstStage, 1, 48),
    span(Phase::RoundOf16, 49, 56),
    span(Phase::QuarterFinals, 57, 60),
    span(Phase::SemiFinals, 61, 62),
    span(Phase::ThirdPlace, 63, 63),
    span(Phase::Finals, 64, 64),
];

/// 24 teams: six groups, then a 16-team bracket without a third place match.
const EURO_LAYOUT: [PhaseInterval; 5] = [
    span(Phase::FirstStage, 1, 36),
    span(Phase::RoundOf16, 37, 44),
    span(Phase::QuarterFinals, 45, 48),
    span(Phase::SemiFinals, 49, 50),
    span(Phase::Finals, 51, 51),
];

/// What a tournament was created from. The kind decides how match numbers
/// split into phases.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
pub enum TournamentKind {
    #[default]
    #[serde(rename = "custom")]
    #[sqlx(rename = "custom")]
    Custom,
    #[serde(rename = "world_cup_2014")]
    #[sqlx(rename = "world_cup_2014")]
    WorldCup2014,
    #[serde(rename = "world_cup_2018")]
    #[sqlx(rename = "world_cup_2018")]
    WorldCup2018,
    #[serde(rename = "euro_2016")]
    #[sqlx(rename = "euro_2016")]
    Euro2016,
}

impl TournamentKind {
    /// Kinds that come with seed data.
    pub const SEEDED: [TournamentKind; 3] = [
        TournamentKind::WorldCup2014,
        TournamentKind::WorldCup2018,
        TournamentKind::Euro2016,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentKind::Custom => "custom",
            TournamentKind::WorldCup2014 => "world_cup_2014",
            TournamentKind::WorldCup2018 => "world_cup_2018",
            TournamentKind::Euro2016 => "euro_2016",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        [TournamentKind::Custom]
            .into_iter()
            .chain(Self::SEEDED)
            .find(|k| k.as_str() == s)
    }

    /// Phases in calendar order. Custom tournaments follow the World Cup layout.
    pub fn layout(&self) -> &'static [PhaseInterval] {
        match self {
            TournamentKind::Euro2016 => &EURO_LAYOUT,
            TournamentKind::Custom | TournamentKind::WorldCup2014 | TournamentKind::WorldCup2018 => {
                &WORLD_CUP_LAYOUT
            }
        }
    }

    pub fn phases(&self) -> impl Iterator<Item = Phase> {
        self.layout().iter().map(|p| p.phase)
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        self.phases().any(|p| p == phase)
    }

    /// Inclusive range of match numbers of `phase`, if this layout plays it.
    pub fn interval(&self, phase: Phase) -> Option<(i64, i64)> {
        self.layout()
            .iter()
            .find(|p| p.phase == phase)
            .map(|p| (p.first, p.last))
    }

    pub fn phase_of(&self, id_number: i64) -> Option<Phase> {
        self.layout()
            .iter()
            .find(|p| id_number >= p.first && id_number <= p.last)
            .map(|p| p.phase)
    }

    pub fn is_group_match(&self, id_number: i64) -> bool {
        self.phase_of(id_number) == Some(Phase::FirstStage)
    }

    /// The phase played after `phase` on the calendar.
    pub fn next(&self, phase: Phase) -> Option<Phase> {
        let layout = self.layout();
        let pos = layout.iter().position(|p| p.phase == phase)?;
        layout.get(pos + 1).map(|p| p.phase)
    }

    /// Phases whose rules are resolved once `phase` is complete.
    /// Semi-finals feed both the third place match, when there is one, and
    /// the final.
    pub fn targets(&self, phase: Phase) -> Vec<Phase> {
        match phase {
            Phase::ThirdPlace | Phase::Finals => Vec::new(),
            Phase::SemiFinals => [Phase::ThirdPlace, Phase::Finals]
                .into_iter()
                .filter(|p| self.has_phase(*p))
                .collect(),
            _ => self.next(phase).into_iter().collect(),
        }
    }
}

impl std::fmt::Display for TournamentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Calendar grouping ────────────────────────────────────────────────

/// Anything placed on the tournament calendar.
pub trait Scheduled {
    fn id_number(&self) -> i64;
    fn date(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Serialize)]
pub struct Day<M> {
    pub date: NaiveDate,
    pub matches: Vec<M>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseDays<M> {
    pub phase: Phase,
    pub name: &'static str,
    pub days: Vec<Day<M>>,
}

/// Group matches by calendar day, days ascending and matches by number within a day.
pub fn group_by_day<M: Scheduled + Clone>(matches: &[M]) -> Vec<Day<M>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<M>> = BTreeMap::new();
    for m in matches {
        by_date.entry(m.date()).or_default().push(m.clone());
    }
    by_date
        .into_iter()
        .map(|(date, mut matches)| {
            matches.sort_by_key(|m| m.id_number());
            Day { date, matches }
        })
        .collect()
}

/// Group matches into every phase of `kind` (empty phases included), each
/// split by day.
pub fn group_by_phase<M: Scheduled + Clone>(matches: &[M], kind: TournamentKind) -> Vec<PhaseDays<M>> {
    kind.layout()
        .iter()
        .map(|interval| {
            let in_phase: Vec<M> = matches
                .iter()
                .filter(|m| m.id_number() >= interval.first && m.id_number() <= interval.last)
                .cloned()
                .collect();
            PhaseDays {
                phase: interval.phase,
                name: interval.phase.display_name(),
                days: group_by_day(&in_phase),
            }
        })
        .collect()
}

/// The phase closed by `id_number`, if it is the last match of that phase's last day.
pub fn last_match_of_phase<M: Scheduled>(id_number: i64, phases: &[PhaseDays<M>]) -> Option<Phase> {
    phases.iter().find_map(|p| {
        let last = p.days.last()?.matches.last()?;
        (last.id_number() == id_number).then_some(p.phase)
    })
}

// ── Knockout rules ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("cannot parse rule: no team for {0:?}")]
    Unresolved(String),
}

/// Split a rule like `"1A 2B"` into its two slot tokens.
pub fn parse_rule(rule: &str) -> Option<(&str, &str)> {
    let mut parts = rule.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}

/// Resolve both slots of a rule against the known team assignments.
///
/// Returns `Ok(None)` when the match carries no two-token rule.
pub fn resolve_rule(
    rule: &str,
    slots: &HashMap<String, i64>,
) -> Result<Option<(i64, i64)>, RuleError> {
    let Some((a, b)) = parse_rule(rule) else {
        return Ok(None);
    };
    let team1 = *slots
        .get(a)
        .ok_or_else(|| RuleError::Unresolved(a.to_string()))?;
    let team2 = *slots
        .get(b)
        .ok_or_else(|| RuleError::Unresolved(b.to_string()))?;
    Ok(Some((team1, team2)))
}

/// Winner and loser of a knockout match. Draws go to team 1 (no penalties).
pub fn knockout_outcome(team1: i64, team2: i64, result1: i64, result2: i64) -> (i64, i64) {
    if result1 >= result2 {
        (team1, team2)
    } else {
        (team2, team1)
    }
}

/// A finished knockout match as seen by the bracket.
#[derive(Debug, Clone, Copy)]
pub struct KnockoutResult {
    pub id_number: i64,
    pub team1: i64,
    pub team2: i64,
    pub result1: i64,
    pub result2: i64,
}

/// Slot assignments produced by a completed knockout phase: `W<n>` for every
/// winner and, for semi-finals, `L<n>` for every loser.
pub fn knockout_slots(phase: Phase, results: &[KnockoutResult]) -> HashMap<String, i64> {
    let mut slots = HashMap::new();
    for r in results {
        let (winner, loser) = knockout_outcome(r.team1, r.team2, r.result1, r.result2);
        slots.insert(format!("W{}", r.id_number), winner);
        if phase == Phase::SemiFinals {
            slots.insert(format!("L{}", r.id_number), loser);
        }
    }
    slots
}

// ── Group standings ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub points: i64,
    pub goals_for: i64,
    pub goals_against: i64,
}

impl Standing {
    pub fn goal_difference(&self) -> i64 {
        self.goals_for - self.goals_against
    }

    /// Record one played match from this team's point of view.
    pub fn record(&mut self, scored: i64, conceded: i64) {
        if scored > conceded {
            self.points += 3;
        } else if scored == conceded {
            self.points += 1;
        }
        self.goals_for += scored;
        self.goals_against += conceded;
    }
}

/// Indices of `standings` in ranked order: points, goal difference, goals
/// scored, then draw position.
pub fn rank_group(standings: &[Standing]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..standings.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (&standings[a], &standings[b]);
        sb.points
            .cmp(&sa.points)
            .then(sb.goal_difference().cmp(&sa.goal_difference()))
            .then(sb.goals_for.cmp(&sa.goals_for))
            .then(a.cmp(&b))
    });
    order
}

/// `1X` and `2X` slots for a ranked group named `X`.
pub fn group_slots(group_name: &str, ranked_team_ids: &[i64]) -> Vec<(String, i64)> {
    ranked_team_ids
        .iter()
        .take(2)
        .enumerate()
        .map(|(i, id)| (format!("{}{}", i + 1, group_name), *id))
        .collect()
}

/// Groups listed by a best-third slot such as `3A/C/D`.
pub fn third_place_groups(token: &str) -> Option<Vec<&str>> {
    let groups = token.strip_prefix('3')?;
    if groups.is_empty() {
        return None;
    }
    Some(groups.split('/').collect())
}

/// The team a group finished with in third place.
#[derive(Debug, Clone)]
pub struct ThirdPlaced {
    pub group: String,
    pub team_id: i64,
    pub standing: Standing,
}

/// Fill best-third slots. The best `tokens.len()` third-placed teams qualify,
/// ranked like a group table with ties going to group order, and each one is
/// placed in a slot listing its group. Returns no slots when no such
/// placement exists.
pub fn third_place_slots(tokens: &[&str], thirds: &[ThirdPlaced]) -> HashMap<String, i64> {
    let standings: Vec<Standing> = thirds.iter().map(|t| t.standing).collect();
    let qualified: Vec<&ThirdPlaced> = rank_group(&standings)
        .into_iter()
        .take(tokens.len())
        .map(|i| &thirds[i])
        .collect();

    let mut taken = vec![false; qualified.len()];
    let mut chosen = vec![0; tokens.len()];
    if !place_thirds(0, tokens, &qualified, &mut taken, &mut chosen) {
        return HashMap::new();
    }
    tokens
        .iter()
        .zip(chosen)
        .map(|(token, i)| (token.to_string(), qualified[i].team_id))
        .collect()
}

fn place_thirds(
    slot: usize,
    tokens: &[&str],
    qualified: &[&ThirdPlaced],
    taken: &mut [bool],
    chosen: &mut [usize],
) -> bool {
    let Some(token) = tokens.get(slot) else {
        return true;
    };
    let groups = third_place_groups(token).unwrap_or_default();
    for (i, team) in qualified.iter().enumerate() {
        if taken[i] || !groups.contains(&team.group.as_str()) {
            continue;
        }
        taken[i] = true;
        chosen[slot] = i;
        if place_thirds(slot + 1, tokens, qualified, taken, chosen) {
            return true;
        }
        taken[i] = false;
    }
    false
}

/// Elapsed share of a tournament at `now`, clamped to `[0, 1]`.
pub fn progress(start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> f64 {
    let start = start.and_time(NaiveTime::MIN);
    let end = end.and_time(NaiveTime::MIN);
    if now < start {
        return 0.0;
    }
    if now >= end {
        return 1.0;
    }
    let elapsed = (now - start).num_seconds() as f64;
    let total = (end - start).num_seconds() as f64;
    elapsed / total
}
