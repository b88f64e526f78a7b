// 2018 FIFA World Cup, Russia.

use super::{m, GroupSeed, MatchSeed, TournamentSeed};
use crate::tournament::TournamentKind;

pub(super) static SEED: TournamentSeed = TournamentSeed {
    kind: TournamentKind::WorldCup2018,
    name: "2018 FIFA World Cup",
    description: "Russia",
    start_date: "Jun/14/2018",
    end_date: "Jul/15/2018",
    groups: &GROUPS,
    knockout: &KNOCKOUT,
    codes: &CODES,
};

const GROUPS: [GroupSeed; 8] = [
    GroupSeed {
        name: "A",
        teams: ["Russia", "Saudi Arabia", "Egypt", "Uruguay"],
        matches: [
            m(1, "Jun/14/2018", "Russia", "Saudi Arabia", "Moscow"),
            m(2, "Jun/15/2018", "Egypt", "Uruguay", "Yekaterinburg"),
            m(17, "Jun/19/2018", "Russia", "Egypt", "Saint Petersburg"),
            m(18, "Jun/20/2018", "Uruguay", "Saudi Arabia", "Rostov-on-Don"),
            m(33, "Jun/25/2018", "Uruguay", "Russia", "Samara"),
            m(34, "Jun/25/2018", "Saudi Arabia", "Egypt", "Volgograd"),
        ],
    },
    GroupSeed {
        name: "B",
        teams: ["Portugal", "Spain", "Morocco", "Iran"],
        matches: [
            m(3, "Jun/15/2018", "Portugal", "Spain", "Sochi"),
            m(4, "Jun/15/2018", "Morocco", "Iran", "Saint Petersburg"),
            m(19, "Jun/20/2018", "Portugal", "Morocco", "Moscow"),
            m(20, "Jun/20/2018", "Iran", "Spain", "Kazan"),
            m(35, "Jun/25/2018", "Iran", "Portugal", "Saransk"),
            m(36, "Jun/25/2018", "Spain", "Morocco", "Kaliningrad"),
        ],
    },
    GroupSeed {
        name: "C",
        teams: ["France", "Australia", "Peru", "Denmark"],
        matches: [
            m(5, "Jun/16/2018", "France", "Australia", "Kazan"),
            m(6, "Jun/16/2018", "Peru", "Denmark", "Saransk"),
            m(21, "Jun/21/2018", "France", "Peru", "Yekaterinburg"),
            m(22, "Jun/21/2018", "Denmark", "Australia", "Samara"),
            m(37, "Jun/26/2018", "Denmark", "France", "Moscow"),
            m(38, "Jun/26/2018", "Australia", "Peru", "Sochi"),
        ],
    },
    GroupSeed {
        name: "D",
        teams: ["Argentina", "Iceland", "Croatia", "Nigeria"],
        matches: [
            m(7, "Jun/16/2018", "Argentina", "Iceland", "Moscow"),
            m(8, "Jun/16/2018", "Croatia", "Nigeria", "Kaliningrad"),
            m(23, "Jun/21/2018", "Argentina", "Croatia", "Nizhny Novgorod"),
            m(24, "Jun/22/2018", "Nigeria", "Iceland", "Volgograd"),
            m(39, "Jun/26/2018", "Nigeria", "Argentina", "Saint Petersburg"),
            m(40, "Jun/26/2018", "Iceland", "Croatia", "Rostov-on-Don"),
        ],
    },
    GroupSeed {
        name: "E",
        teams: ["Brazil", "Switzerland", "Costa Rica", "Serbia"],
        matches: [
            m(9, "Jun/17/2018", "Brazil", "Switzerland", "Rostov-on-Don"),
            m(10, "Jun/17/2018", "Costa Rica", "Serbia", "Samara"),
            m(25, "Jun/22/2018", "Brazil", "Costa Rica", "Saint Petersburg"),
            m(26, "Jun/22/2018", "Serbia", "Switzerland", "Kaliningrad"),
            m(41, "Jun/27/2018", "Serbia", "Brazil", "Moscow"),
            m(42, "Jun/27/2018", "Switzerland", "Costa Rica", "Nizhny Novgorod"),
        ],
    },
    GroupSeed {
        name: "F",
        teams: ["Germany", "Mexico", "Sweden", "South Korea"],
        matches: [
            m(11, "Jun/17/2018", "Germany", "Mexico", "Moscow"),
            m(12, "Jun/18/2018", "Sweden", "South Korea", "Nizhny Novgorod"),
            m(27, "Jun/23/2018", "Germany", "Sweden", "Sochi"),
            m(28, "Jun/23/2018", "South Korea", "Mexico", "Rostov-on-Don"),
            m(43, "Jun/27/2018", "South Korea", "Germany", "Kazan"),
            m(44, "Jun/27/2018", "Mexico", "Sweden", "Yekaterinburg"),
        ],
    },
    GroupSeed {
        name: "G",
        teams: ["Belgium", "Panama", "Tunisia", "England"],
        matches: [
            m(13, "Jun/18/2018", "Belgium", "Panama", "Sochi"),
            m(14, "Jun/18/2018", "Tunisia", "England", "Volgograd"),
            m(29, "Jun/23/2018", "Belgium", "Tunisia", "Moscow"),
            m(30, "Jun/24/2018", "England", "Panama", "Nizhny Novgorod"),
            m(45, "Jun/28/2018", "England", "Belgium", "Kaliningrad"),
            m(46, "Jun/28/2018", "Panama", "Tunisia", "Saransk"),
        ],
    },
    GroupSeed {
        name: "H",
        teams: ["Poland", "Senegal", "Colombia", "Japan"],
        matches: [
            m(15, "Jun/19/2018", "Poland", "Senegal", "Moscow"),
            m(16, "Jun/19/2018", "Colombia", "Japan", "Saransk"),
            m(31, "Jun/24/2018", "Poland", "Colombia", "Kazan"),
            m(32, "Jun/24/2018", "Japan", "Senegal", "Yekaterinburg"),
            m(47, "Jun/28/2018", "Japan", "Poland", "Volgograd"),
            m(48, "Jun/28/2018", "Senegal", "Colombia", "Samara"),
        ],
    },
];

const KNOCKOUT: [MatchSeed; 16] = [
    // Round of 16
    m(49, "Jun/30/2018", "1A", "2B", "Sochi"),
    m(50, "Jun/30/2018", "1C", "2D", "Kazan"),
    m(51, "Jul/01/2018", "1B", "2A", "Moscow"),
    m(52, "Jul/01/2018", "1D", "2C", "Nizhny Novgorod"),
    m(53, "Jul/02/2018", "1E", "2F", "Samara"),
    m(54, "Jul/02/2018", "1G", "2H", "Rostov-on-Don"),
    m(55, "Jul/03/2018", "1F", "2E", "Saint Petersburg"),
    m(56, "Jul/03/2018", "1H", "2G", "Moscow"),
    // Quarter-finals
    m(57, "Jul/06/2018", "W49", "W50", "Nizhny Novgorod"),
    m(58, "Jul/06/2018", "W53", "W54", "Kazan"),
    m(59, "Jul/07/2018", "W51", "W52", "Samara"),
    m(60, "Jul/07/2018", "W55", "W56", "Sochi"),
    // Semi-finals
    m(61, "Jul/10/2018", "W57", "W58", "Saint Petersburg"),
    m(62, "Jul/11/2018", "W59", "W60", "Moscow"),
    // Third place
    m(63, "Jul/14/2018", "L61", "L62", "Saint Petersburg"),
    // Final
    m(64, "Jul/15/2018", "W61", "W62", "Moscow"),
];

const CODES: [(&str, &str); 32] = [
    ("Russia", "ru"),
    ("Saudi Arabia", "sa"),
    ("Egypt", "eg"),
    ("Uruguay", "uy"),
    ("Portugal", "pt"),
    ("Spain", "es"),
    ("Morocco", "ma"),
    ("Iran", "ir"),
    ("France", "fr"),
    ("Australia", "au"),
    ("Peru", "pe"),
    ("Denmark", "dk"),
    ("Argentina", "ar"),
    ("Iceland", "is"),
    ("Croatia", "hr"),
    ("Nigeria", "ng"),
    ("Brazil", "br"),
    ("Switzerland", "ch"),
    ("Costa Rica", "cr"),
    ("Serbia", "rs"),
    ("Germany", "de"),
    ("Mexico", "mx"),
    ("Sweden", "se"),
    ("South Korea", "kr"),
    ("Belgium", "be"),
    ("Panama", "pa"),
    ("Tunisia", "tn"),
    ("England", "gb-eng"),
    ("Poland", "pl"),
    ("Senegal", "sn"),
    ("Colombia", "co"),
    ("Japan", "jp"),
];
