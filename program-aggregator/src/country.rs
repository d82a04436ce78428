/// Countries served by the generic CSV connector, one configured feed each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvCountry {
    Norway,
    Australia,
    Canada,
    Germany,
    France,
    Luxembourg,
    NewZealand,
    Finland,
    Japan,
    Singapore,
    China,
}

impl CsvCountry {
    pub const ALL: [CsvCountry; 11] = [
        CsvCountry::Norway,
        CsvCountry::Australia,
        CsvCountry::Canada,
        CsvCountry::Germany,
        CsvCountry::France,
        CsvCountry::Luxembourg,
        CsvCountry::NewZealand,
        CsvCountry::Finland,
        CsvCountry::Japan,
        CsvCountry::Singapore,
        CsvCountry::China,
    ];

    /// The upper-case key callers pass as `country`.
    pub fn key(self) -> &'static str {
        match self {
            CsvCountry::Norway => "NORWAY",
            CsvCountry::Australia => "AUSTRALIA",
            CsvCountry::Canada => "CANADA",
            CsvCountry::Germany => "GERMANY",
            CsvCountry::France => "FRANCE",
            CsvCountry::Luxembourg => "LUXEMBOURG",
            CsvCountry::NewZealand => "NEWZEALAND",
            CsvCountry::Finland => "FINLAND",
            CsvCountry::Japan => "JAPAN",
            CsvCountry::Singapore => "SINGAPORE",
            CsvCountry::China => "CHINA",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|country| country.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Country code used when a record has no `country` column: the first two
    /// letters of the key, so `NEWZEALAND` becomes `NE`.
    pub fn fallback_code(self) -> &'static str {
        &self.key()[..2]
    }
}

/// What a request's `country` parameter selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySelector {
    All,
    Us,
    Uk,
    Csv(CsvCountry),
    Unsupported(String),
}

impl CountrySelector {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_ascii_uppercase();
        match key.as_str() {
            "" | "ALL" => CountrySelector::All,
            "US" => CountrySelector::Us,
            "UK" => CountrySelector::Uk,
            _ => match CsvCountry::from_key(&key) {
                Some(country) => CountrySelector::Csv(country),
                None => CountrySelector::Unsupported(key),
            },
        }
    }
}
