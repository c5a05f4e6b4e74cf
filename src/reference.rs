use crate::models::CharacterType::{AlphaUpper, AlphanumericUpper, Numeric};
use crate::models::{CharacterType, CountrySpec};

const fn plain(
    length: usize,
    bank_code: (usize, CharacterType),
    account: (usize, CharacterType),
) -> CountrySpec {
    CountrySpec {
        length,
        bank_code_length: bank_code.0,
        bank_code_type: bank_code.1,
        account_length: account.0,
        account_type: account.1,
        branch_code_length: None,
        branch_code_type: None,
        national_check_length: None,
        national_check_type: None,
    }
}

const fn with_branch(spec: CountrySpec, branch: (usize, CharacterType)) -> CountrySpec {
    CountrySpec {
        branch_code_length: Some(branch.0),
        branch_code_type: Some(branch.1),
        ..spec
    }
}

const fn with_national_check(spec: CountrySpec, check: (usize, CharacterType)) -> CountrySpec {
    CountrySpec {
        national_check_length: Some(check.0),
        national_check_type: Some(check.1),
        ..spec
    }
}

pub const COUNTRY_SPECS: &[(&str, CountrySpec)] = &[
    ("NL", plain(18, (4, AlphaUpper), (10, Numeric))),
    ("DE", plain(22, (8, Numeric), (10, Numeric))),
    (
        "BE",
        with_national_check(plain(16, (3, Numeric), (7, Numeric)), (2, Numeric)),
    ),
    (
        "FR",
        with_national_check(
            with_branch(plain(27, (5, Numeric), (11, AlphanumericUpper)), (5, Numeric)),
            (2, Numeric),
        ),
    ),
    (
        "ES",
        with_national_check(
            with_branch(plain(24, (4, Numeric), (10, Numeric)), (4, Numeric)),
            (2, Numeric),
        ),
    ),
    (
        "IT",
        with_national_check(
            with_branch(plain(27, (5, Numeric), (12, AlphanumericUpper)), (5, Numeric)),
            (1, AlphaUpper),
        ),
    ),
    ("AT", plain(20, (5, Numeric), (11, Numeric))),
    ("CH", plain(21, (5, Numeric), (12, Numeric))),
    ("LU", plain(20, (3, Numeric), (13, Numeric))),
    (
        "PT",
        with_national_check(
            with_branch(plain(25, (4, Numeric), (11, Numeric)), (4, Numeric)),
            (2, Numeric),
        ),
    ),
    (
        "GB",
        with_branch(plain(22, (4, AlphaUpper), (8, Numeric)), (6, Numeric)),
    ),
    ("SE", plain(24, (3, Numeric), (17, Numeric))),
    ("NO", plain(15, (4, Numeric), (7, Numeric))),
    ("DK", plain(18, (4, Numeric), (10, Numeric))),
];

pub const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("NL", "Netherlands"),
    ("DE", "Germany"),
    ("BE", "Belgium"),
    ("FR", "France"),
    ("ES", "Spain"),
    ("IT", "Italy"),
    ("AT", "Austria"),
    ("CH", "Switzerland"),
    ("LU", "Luxembourg"),
    ("PT", "Portugal"),
    ("GB", "United Kingdom"),
    ("SE", "Sweden"),
    ("NO", "Norway"),
    ("DK", "Denmark"),
];

/// Bank directory: `(country, [(key, name, code)])`. Keys are BIC-style
/// identifiers, codes fill the bank-code field of the BBAN.
pub const BANK_DIRECTORY: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "NL",
        &[
            ("ABNA", "ABN AMRO", "ABNA"),
            ("INGB", "ING", "INGB"),
            ("RABO", "Rabobank", "RABO"),
            ("SNSB", "SNS Bank", "SNSB"),
            ("ASNB", "ASN Bank", "ASNB"),
            ("RBRB", "RegioBank", "RBRB"),
            ("KNAB", "Knab", "KNAB"),
            ("BUNQ", "Bunq", "BUNQ"),
            ("TRIO", "Triodos Bank", "TRIO"),
            ("FVLB", "Van Lanschot", "FVLB"),
        ],
    ),
    (
        "DE",
        &[
            ("DEUTDEFF", "Deutsche Bank", "50070010"),
            ("COBADEFF", "Commerzbank", "50040000"),
            ("PBNKDEFF", "Postbank", "50010060"),
            ("GENODEFF", "DZ Bank", "50060400"),
        ],
    ),
    (
        "BE",
        &[
            ("GEBABEBB", "BNP Paribas Fortis", "001"),
            ("BBRUBEBB", "ING Belgium", "310"),
            ("KREDBEBB", "KBC Bank", "734"),
            ("GKCCBEBB", "Belfius Bank", "068"),
        ],
    ),
    (
        "FR",
        &[
            ("BNPAFRPP", "BNP Paribas", "30004"),
            ("SOGEFRPP", "Société Générale", "30003"),
            ("CRLYFRPP", "Crédit Lyonnais (LCL)", "30002"),
            ("CEPAFRPP", "Caisse d'Epargne", "11306"),
        ],
    ),
    (
        "ES",
        &[
            ("BSCHESMM", "Banco Santander", "0049"),
            ("BBVAESMM", "BBVA", "0182"),
            ("CAIXESBB", "CaixaBank", "2100"),
            ("SABBESBB", "Banco Sabadell", "0081"),
        ],
    ),
    (
        "IT",
        &[
            ("UNCRITMM", "UniCredit", "02008"),
            ("BCITITMM", "Intesa Sanpaolo", "03069"),
            ("BNLIITRR", "BNL", "01005"),
            ("MPSITIT1", "Monte dei Paschi", "01030"),
        ],
    ),
    (
        "AT",
        &[
            ("BKAUATWW", "UniCredit Bank Austria", "12000"),
            ("GIBAATWW", "Erste Bank", "20111"),
            ("RZBAATWW", "Raiffeisen Bank International", "31000"),
        ],
    ),
    (
        "CH",
        &[
            ("UBSWCHZH", "UBS", "00240"),
            ("POFICHBE", "PostFinance", "09000"),
            ("ZKBKCHZZ", "Zürcher Kantonalbank", "00700"),
        ],
    ),
    (
        "LU",
        &[
            ("BCEELULL", "Spuerkeess", "001"),
            ("BILLLULL", "Banque Internationale à Luxembourg", "002"),
            ("CCRALULL", "Banque Raiffeisen", "009"),
        ],
    ),
    (
        "PT",
        &[
            ("BCOMPTPL", "Millennium BCP", "0033"),
            ("CGDIPTPL", "Caixa Geral de Depósitos", "0035"),
            ("TOTAPTPL", "Santander Totta", "0018"),
        ],
    ),
    (
        "GB",
        &[
            ("BARCGB22", "Barclays", "BARC"),
            ("HBUKGB4B", "HSBC UK", "HBUK"),
            ("LOYDGB2L", "Lloyds Bank", "LOYD"),
            ("NWBKGB2L", "NatWest", "NWBK"),
        ],
    ),
    (
        "SE",
        &[
            ("HANDSESS", "Handelsbanken", "600"),
            ("ESSESESS", "SEB", "500"),
            ("SWEDSESS", "Swedbank", "800"),
        ],
    ),
    (
        "NO",
        &[
            ("DNBANOKK", "DNB", "1200"),
            ("NDEANOKK", "Nordea Norway", "6000"),
        ],
    ),
    (
        "DK",
        &[
            ("DABADKKK", "Danske Bank", "0040"),
            ("NDEADKKK", "Nordea Denmark", "2000"),
            ("JYBADKKK", "Jyske Bank", "7858"),
        ],
    ),
];
