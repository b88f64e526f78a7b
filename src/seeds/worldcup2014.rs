// 2014 FIFA World Cup, Brazil.

use super::{m, GroupSeed, MatchSeed, TournamentSeed};
use crate::tournament::TournamentKind;

pub(super) static SEED: TournamentSeed = TournamentSeed {
    kind: TournamentKind::WorldCup2014,
    name: "2014 FIFA World Cup",
    description: "FIFA World Cup Brazil 2014",
    start_date: "Jun/12/2014",
    end_date: "Jul/13/2014",
    groups: &GROUPS,
    knockout: &KNOCKOUT,
    codes: &CODES,
};

const GROUPS: [GroupSeed; 8] = [
    GroupSeed {
        name: "A",
        teams: ["Brazil", "Croatia", "Mexico", "Cameroon"],
        matches: [
            m(1, "Jun/12/2014", "Brazil", "Croatia", "Arena de São Paulo, São Paulo"),
            m(2, "Jun/13/2014", "Mexico", "Cameroon", "Estádio das Dunas, Natal"),
            m(17, "Jun/17/2014", "Brazil", "Mexico", "Estádio Castelão, Fortaleza"),
            m(18, "Jun/18/2014", "Cameroon", "Croatia", "Arena Amazônia, Manaus"),
            m(33, "Jun/23/2014", "Cameroon", "Brazil", "Brasília"),
            m(34, "Jun/23/2014", "Croatia", "Mexico", "Recife"),
        ],
    },
    GroupSeed {
        name: "B",
        teams: ["Spain", "Netherlands", "Chile", "Australia"],
        matches: [
            m(3, "Jun/13/2014", "Spain", "Netherlands", "Arena Fonte Nova, Salvador"),
            m(4, "Jun/13/2014", "Chile", "Australia", "Arena Pantanal, Cuiabá"),
            m(19, "Jun/18/2014", "Spain", "Chile", "Estádio do Maracanã, Rio de Janeiro"),
            m(20, "Jun/18/2014", "Australia", "Netherlands", "Estádio Beira-Rio, Porto Alegre"),
            m(35, "Jun/23/2014", "Australia", "Spain", "Curitiba"),
            m(36, "Jun/23/2014", "Netherlands", "Chile", "São Paulo"),
        ],
    },
    GroupSeed {
        name: "C",
        teams: ["Colombia", "Greece", "Côte d'Ivoire", "Japan"],
        matches: [
            m(5, "Jun/14/2014", "Colombia", "Greece", "Estádio Mineirão, Belo Horizonte"),
            m(6, "Jun/14/2014", "Côte d'Ivoire", "Japan", "Arena Pernambuco, Recife"),
            m(21, "Jun/19/2014", "Colombia", "Côte d'Ivoire", "Estádio Nacional Mané Garrincha, Brasília"),
            m(22, "Jun/19/2014", "Japan", "Greece", "Estádio das Dunas, Natal"),
            m(37, "Jun/24/2014", "Japan", "Colombia", "Cuiabá"),
            m(38, "Jun/24/2014", "Côte d'Ivoire", "Greece", "Fortaleza"),
        ],
    },
    GroupSeed {
        name: "D",
        teams: ["Uruguay", "Costa Rica", "England", "Italy"],
        matches: [
            m(7, "Jun/14/2014", "Uruguay", "Costa Rica", "Estádio Castelão, Fortaleza"),
            m(8, "Jun/14/2014", "England", "Italy", "Arena Amazônia, Manaus"),
            m(23, "Jun/19/2014", "Uruguay", "England", "Arena de São Paulo, São Paulo"),
            m(24, "Jun/20/2014", "Italy", "Costa Rica", "Arena Pernambuco, Recife"),
            m(39, "Jun/24/2014", "Italy", "Uruguay", "Natal"),
            m(40, "Jun/24/2014", "Costa Rica", "England", "Belo Horizonte"),
        ],
    },
    GroupSeed {
        name: "E",
        teams: ["Switzerland", "Ecuador", "France", "Honduras"],
        matches: [
            m(9, "Jun/15/2014", "Switzerland", "Ecuador", "Estádio Nacional Mané Garrincha, Brasília"),
            m(10, "Jun/15/2014", "France", "Honduras", "Estádio Beira-Rio, Porto Alegre"),
            m(25, "Jun/20/2014", "Switzerland", "France", "Arena Fonte Nova, Salvador"),
            m(26, "Jun/20/2014", "Honduras", "Ecuador", "Arena da Baixada, Curitiba"),
            m(41, "Jun/25/2014", "Honduras", "Switzerland", "Manaus"),
            m(42, "Jun/25/2014", "Ecuador", "France", "Rio de Janeiro"),
        ],
    },
    GroupSeed {
        name: "F",
        teams: ["Argentina", "Bosnia-Herzegovina", "Iran", "Nigeria"],
        matches: [
            m(11, "Jun/15/2014", "Argentina", "Bosnia-Herzegovina", "Estádio do Maracanã, Rio de Janeiro"),
            m(12, "Jun/16/2014", "Iran", "Nigeria", "Arena da Baixada, Curitiba"),
            m(27, "Jun/21/2014", "Argentina", "Iran", "Estádio Mineirão, Belo Horizonte"),
            m(28, "Jun/21/2014", "Nigeria", "Bosnia-Herzegovina", "Arena Pantanal, Cuiabá"),
            m(43, "Jun/25/2014", "Nigeria", "Argentina", "Porto Alegre"),
            m(44, "Jun/25/2014", "Bosnia-Herzegovina", "Iran", "Salvador"),
        ],
    },
    GroupSeed {
        name: "G",
        teams: ["Germany", "Portugal", "Ghana", "United States"],
        matches: [
            m(13, "Jun/16/2014", "Germany", "Portugal", "Arena Fonte Nova, Salvador"),
            m(14, "Jun/16/2014", "Ghana", "United States", "Estádio das Dunas, Natal"),
            m(29, "Jun/21/2014", "Germany", "Ghana", "Fortaleza"),
            m(30, "Jun/22/2014", "United States", "Portugal", "Manaus"),
            m(45, "Jun/26/2014", "United States", "Germany", "Recife"),
            m(46, "Jun/26/2014", "Portugal", "Ghana", "Brasília"),
        ],
    },
    GroupSeed {
        name: "H",
        teams: ["Belgium", "Algeria", "Russia", "South Korea"],
        matches: [
            m(15, "Jun/17/2014", "Belgium", "Algeria", "Estádio Mineirão, Belo Horizonte"),
            m(16, "Jun/17/2014", "Russia", "South Korea", "Arena Pantanal, Cuiabá"),
            m(31, "Jun/22/2014", "Belgium", "Russia", "Rio de Janeiro"),
            m(32, "Jun/22/2014", "South Korea", "Algeria", "Porto Alegre"),
            m(47, "Jun/26/2014", "South Korea", "Belgium", "São Paulo"),
            m(48, "Jun/26/2014", "Algeria", "Russia", "Curitiba"),
        ],
    },
];

const KNOCKOUT: [MatchSeed; 16] = [
    // Round of 16
    m(49, "Jun/28/2014", "1A", "2B", "Belo Horizonte"),
    m(50, "Jun/28/2014", "1C", "2D", "Rio de Janeiro"),
    m(51, "Jun/29/2014", "1B", "2A", "Fortaleza"),
    m(52, "Jun/29/2014", "1D", "2C", "Recife"),
    m(53, "Jun/30/2014", "1E", "2F", "Brasília"),
    m(54, "Jun/30/2014", "1G", "2H", "Porto Alegre"),
    m(55, "Jul/01/2014", "1F", "2E", "São Paulo"),
    m(56, "Jul/01/2014", "1H", "2G", "Salvador"),
    // Quarter-finals
    m(57, "Jul/04/2014", "W49", "W50", "Fortaleza"),
    m(58, "Jul/04/2014", "W53", "W54", "Rio de Janeiro"),
    m(59, "Jul/05/2014", "W51", "W52", "Salvador"),
    m(60, "Jul/05/2014", "W55", "W56", "Brasília"),
    // Semi-finals
    m(61, "Jul/08/2014", "W57", "W58", "Belo Horizonte"),
    m(62, "Jul/09/2014", "W59", "W60", "São Paulo"),
    // Third place
    m(63, "Jul/12/2014", "L61", "L62", "Brasília"),
    // Final
    m(64, "Jul/13/2014", "W61", "W62", "Rio de Janeiro"),
];

const CODES: [(&str, &str); 32] = [
    ("Brazil", "br"),
    ("Croatia", "hr"),
    ("Mexico", "mx"),
    ("Cameroon", "cm"),
    ("Spain", "es"),
    ("Netherlands", "nl"),
    ("Chile", "cl"),
    ("Australia", "au"),
    ("Colombia", "co"),
    ("Greece", "gr"),
    ("Côte d'Ivoire", "ci"),
    ("Japan", "jp"),
    ("Uruguay", "uy"),
    ("Costa Rica", "cr"),
    ("England", "gb"),
    ("Italy", "it"),
    ("Switzerland", "ch"),
    ("Ecuador", "ec"),
    ("France", "fr"),
    ("Honduras", "hn"),
    ("Argentina", "ar"),
    ("Bosnia-Herzegovina", "ba"),
    ("Iran", "ir"),
    ("Nigeria", "ng"),
    ("Germany", "de"),
    ("Portugal", "pt"),
    ("Ghana", "gh"),
    ("United States", "us"),
    ("Belgium", "be"),
    ("Algeria", "dz"),
    ("Russia", "ru"),
    ("South Korea", "kr"),
];
