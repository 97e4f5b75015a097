// fund_report_core/src/settings.rs

//! Configuration structures for report generation.
//! Loads settings from a JSON file and validates them.

use anyhow::Context;

/// A sector index correlated against every fund.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SectorIndex {
    pub symbol: String,
    pub label: String,
}

impl SectorIndex {
    fn new(symbol: &str, label: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
        }
    }
}

/// Chart dimensions in pixels.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { width: 800, height: 600 }
    }
}

/// Top-level settings structure. Every field has a default, so a settings
/// file only needs the values it overrides.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ReportSettings {
    /// Benchmark symbol, e.g. "$SPX".
    pub benchmark: String,
    /// Directory holding one `<symbol>.csv` file per symbol.
    pub data_path: String,
    /// Price column fetched for benchmark and sector indices.
    pub price_field: String,
    pub output_dir: String,
    pub report_file: String,
    /// Notional used for the fund value lines and the per-fund chart.
    pub stats_notional: f64,
    /// Notional used for the multi-fund comparison chart.
    pub comparison_notional: f64,
    pub periods_per_year: u32,
    pub sector_indices: Vec<SectorIndex>,
    pub chart: ChartSettings,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            benchmark: "$SPX".to_string(),
            data_path: "data".to_string(),
            price_field: "close".to_string(),
            output_dir: ".".to_string(),
            report_file: "report.html".to_string(),
            stats_notional: 1_000_000.0,
            comparison_notional: 10_000.0,
            periods_per_year: 252,
            sector_indices: default_sector_indices(),
            chart: ChartSettings::default(),
        }
    }
}

/// Dow Jones US sector indices.
pub fn default_sector_indices() -> Vec<SectorIndex> {
    vec![
        SectorIndex::new("$DJUSBM", "Materials"),
        SectorIndex::new("$DJUSNC", "Goods"),
        SectorIndex::new("$DJUSCY", "Services"),
        SectorIndex::new("$DJUSFN", "Financials"),
        SectorIndex::new("$DJUSHC", "Health"),
        SectorIndex::new("$DJUSIN", "Industrial"),
        SectorIndex::new("$DJUSEN", "Oil & Gas"),
        SectorIndex::new("$DJUSTC", "Technology"),
        SectorIndex::new("$DJUSTL", "TeleComm"),
        SectorIndex::new("$DJUSUT", "Utilities"),
    ]
}

impl ReportSettings {
    /// Loads settings from a JSON file.
    /// # Arguments
    /// * `settings_file_path` - Path to the JSON settings file.
    /// # Returns
    /// * `anyhow::Result<ReportSettings>` containing the validated settings.
    pub fn load<P: AsRef<std::path::Path>>(settings_file_path: P) -> anyhow::Result<Self> {
        let path = settings_file_path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;

        let settings: ReportSettings = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings JSON: {}", e))?;

        settings
            .validate()
            .map_err(|e| anyhow::anyhow!("Settings validation failed:\n{}", e))?;

        anyhow::Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        // check symbols and paths
        {
            if self.benchmark.trim().is_empty() {
                anyhow::bail!("'benchmark' must not be empty");
            }
            if self.price_field.trim().is_empty() {
                anyhow::bail!("'price_field' must not be empty");
            }
            if self.report_file.trim().is_empty() {
                anyhow::bail!("'report_file' must not be empty");
            }
        }

        // check notionals
        {
            for (name, value) in [
                ("stats_notional", self.stats_notional),
                ("comparison_notional", self.comparison_notional),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    anyhow::bail!("'{}' must be positive, got {}", name, value);
                }
            }
        }

        // check periods_per_year
        {
            if self.periods_per_year == 0 {
                anyhow::bail!("'periods_per_year' must be positive");
            }
        }

        // check sector indices
        {
            for sector in &self.sector_indices {
                if sector.symbol.trim().is_empty() {
                    anyhow::bail!("sector index '{}' has an empty symbol", sector.label);
                }
            }
        }

        // check chart
        {
            if self.chart.width < 100 || self.chart.height < 100 {
                anyhow::bail!(
                    "'chart' must be at least 100x100, got {}x{}",
                    self.chart.width,
                    self.chart.height,
                );
            }
        }

        anyhow::Ok(())
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year as f64
    }

    pub fn report_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.output_dir).join(&self.report_file)
    }
}
