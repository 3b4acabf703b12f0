//! Sale configuration: presets, TOML files and flag overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use zcurve_model::{CurveParameters, U256};

use crate::units::{parse_amount, parse_raw};

/// Raw sale settings, every field optional so sources can be layered
///
/// Amounts are human decimals ("800000000", "0.5"); `divisor` is a raw integer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaleSettings {
    pub sale_cap: Option<String>,
    pub quad_cap: Option<String>,
    pub divisor: Option<String>,
    pub target_raised: Option<String>,
}

impl SaleSettings {
    /// Built-in starting points
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "reference" | "default" => Ok(Self {
                sale_cap: Some("800000000".to_string()),
                quad_cap: Some("200000000".to_string()),
                divisor: None,
                target_raised: Some("2".to_string()),
            }),
            "none" | "custom" => Ok(Self::default()),
            _ => anyhow::bail!("Unknown preset: {}. Use reference or none", name),
        }
    }

    /// Fields set in `other` replace ours
    pub fn merge(self, other: SaleSettings) -> Self {
        Self {
            sale_cap: other.sale_cap.or(self.sale_cap),
            quad_cap: other.quad_cap.or(self.quad_cap),
            divisor: other.divisor.or(self.divisor),
            target_raised: other.target_raised.or(self.target_raised),
        }
    }
}

pub struct SaleConfig {
    pub preset: String,
    pub config_path: Option<PathBuf>,
    pub params: CurveParameters,
    /// Set when the divisor was calibrated from (or alongside) a target
    pub target_raised: Option<U256>,
}

impl SaleConfig {
    pub fn new(
        preset: &str,
        config_path: Option<PathBuf>,
        overrides: SaleSettings,
    ) -> Result<Self> {
        let mut settings = SaleSettings::preset(preset)?;

        if let Some(path) = &config_path {
            settings = settings.merge(load_settings(path)?);
        }
        let settings = settings.merge(overrides);

        let sale_cap = parse_amount(
            settings
                .sale_cap
                .as_deref()
                .context("sale_cap is not set (use --sale-cap or a config file)")?,
        )
        .context("Invalid sale_cap")?;
        let quad_cap = parse_amount(
            settings
                .quad_cap
                .as_deref()
                .context("quad_cap is not set (use --quad-cap or a config file)")?,
        )
        .context("Invalid quad_cap")?;
        let target_raised = settings
            .target_raised
            .as_deref()
            .map(parse_amount)
            .transpose()
            .context("Invalid target_raised")?;

        // An explicit divisor wins over calibration
        let params = match (settings.divisor.as_deref(), target_raised) {
            (Some(divisor), _) => {
                let divisor = parse_raw(divisor).context("Invalid divisor")?;
                CurveParameters::new(sale_cap, quad_cap, divisor)
                    .context("Invalid curve parameters")?
            }
            (None, Some(target)) => CurveParameters::calibrated(sale_cap, quad_cap, target)
                .context("Failed to calibrate divisor")?,
            (None, None) => anyhow::bail!("Either divisor or target_raised must be set"),
        };

        log::debug!(
            "resolved sale: sale_cap={} quad_cap={} divisor={}",
            params.sale_cap(),
            params.quad_cap(),
            params.divisor()
        );

        Ok(Self {
            preset: preset.to_string(),
            config_path,
            params,
            target_raised,
        })
    }
}

/// Load sale settings from a TOML file
fn load_settings(path: &Path) -> Result<SaleSettings> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&data)
        .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reference_preset() {
        let config = SaleConfig::new("reference", None, SaleSettings::default()).unwrap();
        assert_eq!(config.params.sale_cap(), parse_amount("800000000").unwrap());
        assert_eq!(config.params.quad_cap(), parse_amount("200000000").unwrap());
        assert_eq!(config.target_raised, Some(parse_amount("2").unwrap()));
        assert_eq!(
            config.params.divisor(),
            "2222222222222220555555555555558333333333333".parse::<U256>().unwrap()
        );
    }

    #[test]
    fn test_unknown_preset() {
        let result = SaleConfig::new("mainnet", None, SaleSettings::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sale_cap = \"1000\"\nquad_cap = \"250\"\ntarget_raised = \"5\"").unwrap();

        let overrides = SaleSettings {
            quad_cap: Some("500".to_string()),
            ..Default::default()
        };
        let config = SaleConfig::new("none", Some(file.path().to_path_buf()), overrides).unwrap();

        assert_eq!(config.params.sale_cap(), parse_amount("1000").unwrap());
        assert_eq!(config.params.quad_cap(), parse_amount("500").unwrap());
        assert_eq!(config.target_raised, Some(parse_amount("5").unwrap()));
    }

    #[test]
    fn test_explicit_divisor_wins() {
        let overrides = SaleSettings {
            divisor: Some("12345".to_string()),
            ..Default::default()
        };
        let config = SaleConfig::new("reference", None, overrides).unwrap();
        assert_eq!(config.params.divisor(), U256::from(12_345u64));
    }

    #[test]
    fn test_missing_pricing_rejected() {
        let overrides = SaleSettings {
            sale_cap: Some("100".to_string()),
            quad_cap: Some("10".to_string()),
            ..Default::default()
        };
        let err = SaleConfig::new("none", None, overrides).err().unwrap();
        assert!(err.to_string().contains("divisor or target_raised"));
    }

    #[test]
    fn test_invalid_curve_surfaces_domain_error() {
        let overrides = SaleSettings {
            quad_cap: Some("900000000".to_string()),
            ..Default::default()
        };
        let err = SaleConfig::new("reference", None, overrides).err().unwrap();
        let chain = format!("{:#}", err);
        assert!(chain.contains("quad cap"), "{}", chain);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sale_cap = \"1000\"\nslope = \"3\"").unwrap();
        let result = SaleConfig::new("none", Some(file.path().to_path_buf()), SaleSettings::default());
        assert!(result.is_err());
    }
}
