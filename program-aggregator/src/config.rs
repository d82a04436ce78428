use std::time::Duration;

use envconfig::Envconfig;

use crate::country::CsvCountry;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "PORT", default = "5000")]
    pub port: u16,

    // An empty secret refuses every request rather than admitting them all
    #[envconfig(from = "AGG_SECRET", default = "")]
    pub agg_secret: String,

    #[envconfig(from = "DATA_GOV_KEY", default = "")]
    pub data_gov_key: String,

    #[envconfig(default = "https://api.data.gov/ed/collegescorecard/v1/schools.json")]
    pub scorecard_url: String,

    #[envconfig(from = "SRC_UK_CSV", default = "")]
    pub src_uk_csv: String,

    #[envconfig(from = "SRC_NORWAY_CSV", default = "")]
    pub src_norway_csv: String,

    #[envconfig(from = "SRC_AUSTRALIA_CSV", default = "")]
    pub src_australia_csv: String,

    #[envconfig(from = "SRC_CANADA_CSV", default = "")]
    pub src_canada_csv: String,

    #[envconfig(from = "SRC_GERMANY_CSV", default = "")]
    pub src_germany_csv: String,

    #[envconfig(from = "SRC_FRANCE_CSV", default = "")]
    pub src_france_csv: String,

    #[envconfig(from = "SRC_LUX_CSV", default = "")]
    pub src_lux_csv: String,

    #[envconfig(from = "SRC_NZ_CSV", default = "")]
    pub src_nz_csv: String,

    #[envconfig(from = "SRC_FINLAND_CSV", default = "")]
    pub src_finland_csv: String,

    #[envconfig(from = "SRC_JAPAN_CSV", default = "")]
    pub src_japan_csv: String,

    #[envconfig(from = "SRC_SG_CSV", default = "")]
    pub src_sg_csv: String,

    #[envconfig(from = "SRC_CHINA_CSV", default = "")]
    pub src_china_csv: String,

    #[envconfig(default = "30")]
    pub upstream_timeout_secs: u64,

    #[envconfig(default = "false")]
    pub enable_metrics: bool,
}

pub const UK_CSV_ENV: &str = "SRC_UK_CSV";

/// Environment variable holding the feed URL for `UK` or a CSV country key.
pub fn source_env_var(key: &str) -> Option<&'static str> {
    if key.trim().eq_ignore_ascii_case("UK") {
        return Some(UK_CSV_ENV);
    }
    CsvCountry::from_key(key).map(|country| match country {
        CsvCountry::Norway => "SRC_NORWAY_CSV",
        CsvCountry::Australia => "SRC_AUSTRALIA_CSV",
        CsvCountry::Canada => "SRC_CANADA_CSV",
        CsvCountry::Germany => "SRC_GERMANY_CSV",
        CsvCountry::France => "SRC_FRANCE_CSV",
        CsvCountry::Luxembourg => "SRC_LUX_CSV",
        CsvCountry::NewZealand => "SRC_NZ_CSV",
        CsvCountry::Finland => "SRC_FINLAND_CSV",
        CsvCountry::Japan => "SRC_JAPAN_CSV",
        CsvCountry::Singapore => "SRC_SG_CSV",
        CsvCountry::China => "SRC_CHINA_CSV",
    })
}

fn configured(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl Config {
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn data_gov_key(&self) -> Option<&str> {
        configured(&self.data_gov_key)
    }

    pub fn uk_csv_url(&self) -> Option<&str> {
        configured(&self.src_uk_csv)
    }

    pub fn csv_source_url(&self, country: CsvCountry) -> Option<&str> {
        configured(self.csv_source_field(country))
    }

    fn csv_source_field(&self, country: CsvCountry) -> &String {
        match country {
            CsvCountry::Norway => &self.src_norway_csv,
            CsvCountry::Australia => &self.src_australia_csv,
            CsvCountry::Canada => &self.src_canada_csv,
            CsvCountry::Germany => &self.src_germany_csv,
            CsvCountry::France => &self.src_france_csv,
            CsvCountry::Luxembourg => &self.src_lux_csv,
            CsvCountry::NewZealand => &self.src_nz_csv,
            CsvCountry::Finland => &self.src_finland_csv,
            CsvCountry::Japan => &self.src_japan_csv,
            CsvCountry::Singapore => &self.src_sg_csv,
            CsvCountry::China => &self.src_china_csv,
        }
    }

    /// Every configured feed as `(key, url)`, UK first.
    pub fn configured_sources(&self) -> Vec<(&'static str, &str)> {
        self.uk_csv_url()
            .map(|url| ("UK", url))
            .into_iter()
            .chain(
                CsvCountry::ALL
                    .into_iter()
                    .filter_map(|c| self.csv_source_url(c).map(|url| (c.key(), url))),
            )
            .collect()
    }

    pub fn default_for_test() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            agg_secret: "test-secret".to_string(),
            data_gov_key: String::new(),
            scorecard_url: "http://localhost:1/schools.json".to_string(),
            src_uk_csv: String::new(),
            src_norway_csv: String::new(),
            src_australia_csv: String::new(),
            src_canada_csv: String::new(),
            src_germany_csv: String::new(),
            src_france_csv: String::new(),
            src_lux_csv: String::new(),
            src_nz_csv: String::new(),
            src_finland_csv: String::new(),
            src_japan_csv: String::new(),
            src_sg_csv: String::new(),
            src_china_csv: String::new(),
            upstream_timeout_secs: 5,
            enable_metrics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::init_from_hashmap(&HashMap::new()).unwrap();

        assert_eq!(config.bind(), "0.0.0.0:5000");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.scorecard_url,
            "https://api.data.gov/ed/collegescorecard/v1/schools.json"
        );
        assert!(config.agg_secret.is_empty());
        assert!(config.data_gov_key().is_none());
        assert!(config.uk_csv_url().is_none());
        assert!(config.configured_sources().is_empty());
        assert!(!config.enable_metrics);
    }

    #[test]
    fn test_source_urls_from_env_names() {
        let env = HashMap::from([
            ("SRC_UK_CSV".to_string(), "https://uk.example/all.csv".to_string()),
            ("SRC_NZ_CSV".to_string(), "https://nz.example/nz.csv".to_string()),
            ("SRC_LUX_CSV".to_string(), "   ".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ]);
        let config = Config::init_from_hashmap(&env).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.uk_csv_url(), Some("https://uk.example/all.csv"));
        assert_eq!(
            config.csv_source_url(CsvCountry::NewZealand),
            Some("https://nz.example/nz.csv")
        );
        assert_eq!(config.csv_source_url(CsvCountry::Luxembourg), None);
        assert_eq!(
            config.configured_sources(),
            vec![
                ("UK", "https://uk.example/all.csv"),
                ("NEWZEALAND", "https://nz.example/nz.csv"),
            ]
        );
    }

    #[test]
    fn test_every_source_env_var_is_read() {
        for country in CsvCountry::ALL {
            let var = source_env_var(country.key()).unwrap();
            let env = HashMap::from([(var.to_string(), format!("https://{var}.example"))]);
            let config = Config::init_from_hashmap(&env).unwrap();

            assert_eq!(
                config.csv_source_url(country),
                Some(format!("https://{var}.example").as_str()),
                "{var}"
            );
            assert_eq!(config.configured_sources().len(), 1);
        }

        assert_eq!(source_env_var("uk"), Some(UK_CSV_ENV));
        assert_eq!(source_env_var("newzealand"), Some("SRC_NZ_CSV"));
        assert_eq!(source_env_var("ATLANTIS"), None);
    }
}
