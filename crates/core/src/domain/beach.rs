use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Queries shorter than this return nothing rather than matching half the
/// catalog on a single letter.
pub const MIN_QUERY_LEN: usize = 2;

/// A surfable beach. Alternative names (including Hebrew spellings) are
/// matched during search but never serialized back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beach {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing)]
    pub alt_names: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct BeachCatalog {
    beaches: Vec<Beach>,
}

impl BeachCatalog {
    /// The built-in Israeli coastline catalog.
    pub fn builtin() -> Self {
        let beaches = vec![
            israeli_beach(
                "beach_netanya",
                "Netanya Beach",
                &["נתניה", "netania"],
                32.3194,
                34.8612,
                "Central",
            ),
            israeli_beach(
                "beach_haifa",
                "Haifa Carmel Beach",
                &["חיפה", "carmel", "כרמל"],
                32.8245,
                34.9887,
                "North",
            ),
            israeli_beach(
                "beach_ashdod",
                "Ashdod Beach",
                &["אשדוד"],
                31.8067,
                34.6479,
                "South",
            ),
            israeli_beach(
                "beach_ashkelon",
                "Ashkelon Beach",
                &["אשקלון"],
                31.6736,
                34.5681,
                "South",
            ),
            israeli_beach(
                "beach_herzliya",
                "Herzliya Beach",
                &["הרצליה", "herzeliya"],
                32.1649,
                34.7701,
                "Central",
            ),
            israeli_beach(
                "beach_tel_aviv_hilton",
                "Tel Aviv Hilton Beach",
                &["תל אביב", "hilton", "הילטון"],
                32.0901,
                34.7730,
                "Tel Aviv",
            ),
            israeli_beach(
                "beach_tel_aviv_gordon",
                "Tel Aviv Gordon Beach",
                &["גורדון", "gordon"],
                32.0831,
                34.7683,
                "Tel Aviv",
            ),
            israeli_beach(
                "beach_bat_yam",
                "Bat Yam Beach",
                &["בת ים"],
                32.0167,
                34.7500,
                "Central",
            ),
            israeli_beach(
                "beach_rishon",
                "Rishon LeZion Beach",
                &["ראשון לציון", "rishon lezion"],
                31.9642,
                34.7396,
                "Central",
            ),
            israeli_beach(
                "beach_hadera",
                "Hadera Beach",
                &["חדרה"],
                32.4340,
                34.8667,
                "North",
            ),
            israeli_beach(
                "beach_nahariya",
                "Nahariya Beach",
                &["נהריה"],
                33.0067,
                35.0833,
                "North",
            ),
            israeli_beach(
                "beach_eilat",
                "Eilat Beach",
                &["אילת"],
                29.5577,
                34.9519,
                "South",
            ),
        ];
        Self { beaches }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let beaches: Vec<Beach> =
            serde_json::from_str(json).context("failed to parse beach catalog JSON")?;
        ensure!(!beaches.is_empty(), "beach catalog must not be empty");
        let mut seen = HashSet::new();
        for beach in &beaches {
            ensure!(!beach.id.is_empty(), "beach id must not be empty");
            ensure!(
                seen.insert(beach.id.as_str()),
                "duplicate beach id in catalog: {}",
                beach.id
            );
        }
        Ok(Self { beaches })
    }

    pub fn get(&self, beach_id: &str) -> Option<&Beach> {
        self.beaches.iter().find(|b| b.id == beach_id)
    }

    /// Case-insensitive substring search over name, region and
    /// alternative names.
    pub fn search(&self, query: &str) -> Vec<&Beach> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.beaches
            .iter()
            .filter(|b| {
                b.name.to_lowercase().contains(&needle)
                    || b.region.to_lowercase().contains(&needle)
                    || b.alt_names
                        .iter()
                        .any(|alt| alt.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beach> {
        self.beaches.iter()
    }

    pub fn len(&self) -> usize {
        self.beaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beaches.is_empty()
    }
}

fn israeli_beach(
    id: &str,
    name: &str,
    alt_names: &[&str],
    latitude: f64,
    longitude: f64,
    region: &str,
) -> Beach {
    Beach {
        id: id.to_string(),
        name: name.to_string(),
        alt_names: alt_names.iter().map(|s| s.to_string()).collect(),
        latitude,
        longitude,
        region: region.to_string(),
        country: "Israel".to_string(),
    }
}
