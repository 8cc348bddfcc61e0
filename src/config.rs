// Runtime configuration.
//
// Everything has a default so the binary runs from a checkout that keeps the
// assets under `./data`; env vars override individual settings.
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("out"),
            preview_rows: 10,
        }
    }
}

impl Config {
    /// Read `SDG_DATA_DIR`, `SDG_OUTPUT_DIR` and `SDG_PREVIEW_ROWS`, falling
    /// back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut cfg = Config::default();
        if let Ok(dir) = env::var("SDG_DATA_DIR") {
            if !dir.trim().is_empty() {
                cfg.data_dir = PathBuf::from(dir.trim());
            }
        }
        if let Ok(dir) = env::var("SDG_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                cfg.output_dir = PathBuf::from(dir.trim());
            }
        }
        if let Ok(n) = env::var("SDG_PREVIEW_ROWS") {
            if let Ok(n) = n.trim().parse::<usize>() {
                cfg.preview_rows = n;
            }
        }
        cfg
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join("scoreData.csv")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join("metaData.csv")
    }

    pub fn footnotes_path(&self) -> PathBuf {
        self.data_dir.join("footnotes.csv")
    }

    /// Per-goal indicator table, e.g. `data/SDG/SDG 3.csv`.
    pub fn indicator_path(&self, sdg: &str) -> PathBuf {
        self.data_dir.join("SDG").join(format!("{}.csv", sdg))
    }

    pub fn boundary_path(&self, before_cutoff: bool) -> PathBuf {
        let file = if before_cutoff {
            "India_State_Boundary_Before_2020.json"
        } else {
            "India_State_Boundary_2020.json"
        };
        self.data_dir.join("map-geometry").join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_follow_data_dir() {
        let cfg = Config::default().with_data_dir("/srv/assets");
        assert_eq!(cfg.scores_path(), PathBuf::from("/srv/assets/scoreData.csv"));
        assert_eq!(
            cfg.indicator_path("SDG 7"),
            PathBuf::from("/srv/assets/SDG/SDG 7.csv")
        );
        assert!(cfg
            .boundary_path(true)
            .ends_with("map-geometry/India_State_Boundary_Before_2020.json"));
    }
}
