pub mod domain;
pub mod ingest;
pub mod planner;
pub mod recommend;
pub mod store;
pub mod suitability;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub beach_catalog_path: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                beach_catalog_path: std::env::var("BEACH_CATALOG_PATH").ok(),
            })
        }
    }
}
