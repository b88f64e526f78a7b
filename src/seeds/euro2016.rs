// 2016 UEFA Euro, France. Four of the six third-placed teams reach the
// round of 16 through the `3X/Y/Z` slots.

use super::{m, GroupSeed, MatchSeed, TournamentSeed};
use crate::tournament::TournamentKind;

pub(super) static SEED: TournamentSeed = TournamentSeed {
    kind: TournamentKind::Euro2016,
    name: "2016 UEFA Euro",
    description: "France",
    start_date: "Jun/10/2016",
    end_date: "Jul/10/2016",
    groups: &GROUPS,
    knockout: &KNOCKOUT,
    codes: &CODES,
};

const GROUPS: [GroupSeed; 6] = [
    GroupSeed {
        name: "A",
        teams: ["Albania", "France", "Romania", "Switzerland"],
        matches: [
            m(1, "Jun/10/2016", "France", "Romania", "Stade de France, Saint-Denis"),
            m(2, "Jun/11/2016", "Albania", "Switzerland", "Stade Felix Bollaert, Lens"),
            m(13, "Jun/15/2016", "Romania", "Switzerland", "Parc des Princes, Paris"),
            m(14, "Jun/15/2016", "France", "Albania", "Stade Vélodrome, Marseille"),
            m(25, "Jun/19/2016", "Switzerland", "France", "Stade Pierre Mauroy, Lille"),
            m(26, "Jun/19/2016", "Romania", "Albania", "Parc OL, Lyon"),
        ],
    },
    GroupSeed {
        name: "B",
        teams: ["England", "Russia", "Slovakia", "Wales"],
        matches: [
            m(3, "Jun/11/2016", "Wales", "Slovakia", "Matmut Atlantique, Bordeaux"),
            m(4, "Jun/11/2016", "England", "Russia", "Stade Vélodrome, Marseille"),
            m(15, "Jun/15/2016", "Russia", "Slovakia", "Stade Pierre Mauroy, Lille"),
            m(16, "Jun/16/2016", "England", "Wales", "Stade Felix Bollaert, Lens"),
            m(27, "Jun/20/2016", "Slovakia", "England", "Stade Geoffroy Guichard, Saint-Etienne"),
            m(28, "Jun/20/2016", "Russia", "Wales", "Stadium de Toulouse, Toulouse"),
        ],
    },
    GroupSeed {
        name: "C",
        teams: ["Germany", "Northern Ireland", "Poland", "Ukraine"],
        matches: [
            m(5, "Jun/12/2016", "Poland", "Northern Ireland", "Allianz Riviera, Nice"),
            m(6, "Jun/12/2016", "Germany", "Ukraine", "Stade Pierre Mauroy, Lille"),
            m(17, "Jun/16/2016", "Ukraine", "Northern Ireland", "Parc OL, Lyon"),
            m(18, "Jun/16/2016", "Germany", "Poland", "Stade de France, Saint-Denis"),
            m(29, "Jun/21/2016", "Northern Ireland", "Germany", "Parc des Princes, Paris"),
            m(30, "Jun/21/2016", "Ukraine", "Poland", "Stade Vélodrome, Marseille"),
        ],
    },
    GroupSeed {
        name: "D",
        teams: ["Croatia", "Czech Republic", "Spain", "Turkey"],
        matches: [
            m(7, "Jun/12/2016", "Turkey", "Croatia", "Parc des Princes, Paris"),
            m(8, "Jun/13/2016", "Spain", "Czech Republic", "Stadium de Toulouse, Toulouse"),
            m(19, "Jun/17/2016", "Czech Republic", "Croatia", "Stade Geoffroy Guichard, Saint-Etienne"),
            m(20, "Jun/17/2016", "Spain", "Turkey", "Allianz Riviera, Nice"),
            m(31, "Jun/21/2016", "Croatia", "Spain", "Matmut Atlantique, Bordeaux"),
            m(32, "Jun/21/2016", "Czech Republic", "Turkey", "Stade Felix Bollaert, Lens"),
        ],
    },
    GroupSeed {
        name: "E",
        teams: ["Belgium", "Italy", "Republic of Ireland", "Sweden"],
        matches: [
            m(9, "Jun/13/2016", "Republic of Ireland", "Sweden", "Stade de France, Saint-Denis"),
            m(10, "Jun/13/2016", "Belgium", "Italy", "Parc OL, Lyon"),
            m(21, "Jun/17/2016", "Italy", "Sweden", "Stadium de Toulouse, Toulouse"),
            m(22, "Jun/18/2016", "Belgium", "Republic of Ireland", "Matmut Atlantique, Bordeaux"),
            m(33, "Jun/22/2016", "Sweden", "Belgium", "Allianz Riviera, Nice"),
            m(34, "Jun/22/2016", "Italy", "Republic of Ireland", "Stade Pierre Mauroy, Lille"),
        ],
    },
    GroupSeed {
        name: "F",
        teams: ["Austria", "Hungary", "Iceland", "Portugal"],
        matches: [
            m(11, "Jun/14/2016", "Austria", "Hungary", "Matmut Atlantique, Bordeaux"),
            m(12, "Jun/14/2016", "Portugal", "Iceland", "Stade Geoffroy Guichard, Saint-Etienne"),
            m(23, "Jun/18/2016", "Iceland", "Hungary", "Stade Vélodrome, Marseille"),
            m(24, "Jun/18/2016", "Portugal", "Austria", "Parc des Princes, Paris"),
            m(35, "Jun/22/2016", "Iceland", "Austria", "Stade de France, Saint-Denis"),
            m(36, "Jun/22/2016", "Hungary", "Portugal", "Parc OL, Lyon"),
        ],
    },
];

const KNOCKOUT: [MatchSeed; 15] = [
    // Round of 16
    m(37, "Jun/25/2016", "2A", "2C", "Saint-Etienne"),
    m(38, "Jun/25/2016", "1B", "3A/C/D", "Paris"),
    m(39, "Jun/25/2016", "1D", "3B/E/F", "Lens"),
    m(40, "Jun/26/2016", "1A", "3C/D/E", "Lyon"),
    m(41, "Jun/26/2016", "1C", "3A/B/F", "Lille"),
    m(42, "Jun/26/2016", "1F", "2E", "Toulouse"),
    m(43, "Jun/27/2016", "1E", "2D", "Saint-Denis"),
    m(44, "Jun/27/2016", "2B", "2F", "Nice"),
    // Quarter-finals
    m(45, "Jun/30/2016", "W37", "W39", "Marseille"),
    m(46, "Jul/01/2016", "W38", "W42", "Lille"),
    m(47, "Jul/02/2016", "W41", "W43", "Bordeaux"),
    m(48, "Jul/03/2016", "W40", "W44", "Saint-Denis"),
    // Semi-finals
    m(49, "Jul/06/2016", "W45", "W46", "Lyon"),
    m(50, "Jul/07/2016", "W47", "W48", "Marseille"),
    // Final
    m(51, "Jul/10/2016", "W49", "W50", "Saint-Denis"),
];

const CODES: [(&str, &str); 24] = [
    ("Albania", "al"),
    ("France", "fr"),
    ("Romania", "ro"),
    ("Switzerland", "ch"),
    ("England", "gb"),
    ("Russia", "ru"),
    ("Slovakia", "sk"),
    ("Wales", "gb"),
    ("Germany", "de"),
    ("Northern Ireland", "gb"),
    ("Poland", "pl"),
    ("Ukraine", "ua"),
    ("Croatia", "hr"),
    ("Czech Republic", "cz"),
    ("Spain", "es"),
    ("Turkey", "tr"),
    ("Belgium", "be"),
    ("Italy", "it"),
    ("Republic of Ireland", "ie"),
    ("Sweden", "se"),
    ("Austria", "at"),
    ("Hungary", "hu"),
    ("Iceland", "is"),
    ("Portugal", "pt"),
];
