//! RF system parameters and named presets
//!
//! [`SystemParameters`] is a plain value; presets are constructed fresh on
//! request and configuration overrides produce a new value rather than
//! mutating a shared table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoexError, CoexResult};

/// Power amplifier conduction class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaClass {
    A,
    #[default]
    AB,
    B,
    C,
}

impl PaClass {
    /// HD3 correction relative to class AB, dB.
    pub fn hd3_correction_db(&self) -> f64 {
        match self {
            PaClass::A => 5.0,
            PaClass::AB => 0.0,
            PaClass::B => -3.0,
            PaClass::C => -8.0,
        }
    }
}

impl fmt::Display for PaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaClass::A => "A",
            PaClass::AB => "AB",
            PaClass::B => "B",
            PaClass::C => "C",
        };
        f.write_str(s)
    }
}

/// Transmit, isolation, linearity and receiver parameters of a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParameters {
    // TX power, dBm
    pub lte_tx_power_dbm: f64,
    pub wifi_tx_power_dbm: f64,
    pub ble_tx_power_dbm: f64,
    pub halow_tx_power_dbm: f64,

    // Isolation, dB
    pub antenna_isolation_db: f64,
    pub pcb_isolation_db: f64,
    pub shield_isolation_db: f64,

    // Filtering, dB
    pub tx_harmonic_filtering_db: f64,
    pub rx_preselector_filtering_db: f64,
    pub out_of_band_rejection_db: f64,

    // Technology coupling, dB
    pub lte_to_gnss_coupling_db: f64,
    pub wifi_ble_isolation_db: f64,
    pub cellular_wifi_isolation_db: f64,

    // Linearity, dBm
    pub iip3_dbm: f64,
    pub iip2_dbm: f64,
    pub oip3_dbm: f64,
    pub compression_point_dbm: f64,

    // Power amplifier
    pub pa_efficiency: f64,
    pub pa_class: PaClass,
    pub bias_point_optimized: bool,

    // Receiver sensitivity, dBm
    pub lte_sensitivity_dbm: f64,
    pub wifi_sensitivity_dbm: f64,
    pub ble_sensitivity_dbm: f64,
    pub gnss_sensitivity_dbm: f64,
    pub halow_sensitivity_dbm: f64,

    // Environment
    pub temperature_celsius: f64,
    pub noise_figure_db: f64,
    pub thermal_noise_density_dbm_hz: f64,

    pub configuration_name: String,
    pub configuration_notes: String,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            lte_tx_power_dbm: 23.0,
            wifi_tx_power_dbm: 18.0,
            ble_tx_power_dbm: 10.0,
            halow_tx_power_dbm: 20.0,
            antenna_isolation_db: 25.0,
            pcb_isolation_db: 20.0,
            shield_isolation_db: 0.0,
            tx_harmonic_filtering_db: 40.0,
            rx_preselector_filtering_db: 0.0,
            out_of_band_rejection_db: 60.0,
            lte_to_gnss_coupling_db: -10.0,
            wifi_ble_isolation_db: 10.0,
            cellular_wifi_isolation_db: 15.0,
            iip3_dbm: -10.0,
            iip2_dbm: 20.0,
            oip3_dbm: 10.0,
            compression_point_dbm: 5.0,
            pa_efficiency: 0.35,
            pa_class: PaClass::AB,
            bias_point_optimized: true,
            lte_sensitivity_dbm: -105.0,
            wifi_sensitivity_dbm: -85.0,
            ble_sensitivity_dbm: -95.0,
            gnss_sensitivity_dbm: -150.0,
            halow_sensitivity_dbm: -90.0,
            temperature_celsius: 25.0,
            noise_figure_db: 6.0,
            thermal_noise_density_dbm_hz: -174.0,
            configuration_name: "Default".to_string(),
            configuration_notes: String::new(),
        }
    }
}

impl SystemParameters {
    /// Fresh copy of a named preset.
    pub fn preset(preset: Preset) -> Self {
        let d = Self::default();
        match preset {
            Preset::MobileDeviceTypical => Self {
                antenna_isolation_db: 25.0,
                lte_tx_power_dbm: 23.0,
                wifi_tx_power_dbm: 18.0,
                ble_tx_power_dbm: 10.0,
                iip3_dbm: -12.0,
                iip2_dbm: 15.0,
                pa_class: PaClass::AB,
                bias_point_optimized: true,
                lte_sensitivity_dbm: -105.0,
                wifi_sensitivity_dbm: -85.0,
                ble_sensitivity_dbm: -95.0,
                gnss_sensitivity_dbm: -150.0,
                ..d
            },
            Preset::MobileDevicePoor => Self {
                antenna_isolation_db: 20.0,
                lte_tx_power_dbm: 23.0,
                wifi_tx_power_dbm: 20.0,
                ble_tx_power_dbm: 20.0,
                iip3_dbm: -15.0,
                iip2_dbm: 10.0,
                pa_class: PaClass::AB,
                bias_point_optimized: false,
                lte_sensitivity_dbm: -102.0,
                wifi_sensitivity_dbm: -82.0,
                ble_sensitivity_dbm: -92.0,
                gnss_sensitivity_dbm: -147.0,
                ..d
            },
            Preset::IotDeviceTypical => Self {
                antenna_isolation_db: 20.0,
                lte_tx_power_dbm: 20.0,
                wifi_tx_power_dbm: 15.0,
                ble_tx_power_dbm: 10.0,
                iip3_dbm: -18.0,
                iip2_dbm: 12.0,
                pa_class: PaClass::AB,
                bias_point_optimized: true,
                lte_sensitivity_dbm: -108.0,
                wifi_sensitivity_dbm: -88.0,
                ble_sensitivity_dbm: -98.0,
                gnss_sensitivity_dbm: -145.0,
                ..d
            },
            Preset::BaseStation => Self {
                antenna_isolation_db: 40.0,
                lte_tx_power_dbm: 43.0,
                wifi_tx_power_dbm: 30.0,
                ble_tx_power_dbm: 20.0,
                iip3_dbm: -5.0,
                iip2_dbm: 25.0,
                pa_class: PaClass::AB,
                bias_point_optimized: true,
                lte_sensitivity_dbm: -120.0,
                wifi_sensitivity_dbm: -95.0,
                ble_sensitivity_dbm: -105.0,
                gnss_sensitivity_dbm: -155.0,
                ..d
            },
            Preset::LaboratoryReference => Self {
                antenna_isolation_db: 50.0,
                lte_tx_power_dbm: 20.0,
                wifi_tx_power_dbm: 20.0,
                ble_tx_power_dbm: 20.0,
                iip3_dbm: 0.0,
                iip2_dbm: 30.0,
                pa_class: PaClass::A,
                bias_point_optimized: true,
                lte_sensitivity_dbm: -130.0,
                wifi_sensitivity_dbm: -105.0,
                ble_sensitivity_dbm: -115.0,
                gnss_sensitivity_dbm: -160.0,
                thermal_noise_density_dbm_hz: -130.0,
                tx_harmonic_filtering_db: 60.0,
                ..d
            },
            Preset::DesktopProfessional => Self {
                antenna_isolation_db: 20.0,
                pcb_isolation_db: 0.0,
                shield_isolation_db: 0.0,
                lte_tx_power_dbm: 23.0,
                wifi_tx_power_dbm: 20.0,
                ble_tx_power_dbm: 20.0,
                tx_harmonic_filtering_db: 40.0,
                iip3_dbm: -10.0,
                iip2_dbm: 20.0,
                pa_class: PaClass::AB,
                bias_point_optimized: true,
                lte_sensitivity_dbm: -102.0,
                wifi_sensitivity_dbm: -82.0,
                ble_sensitivity_dbm: -92.0,
                gnss_sensitivity_dbm: -147.0,
                configuration_name: "Desktop Professional".to_string(),
                configuration_notes:
                    "Professional desktop system - HD levels calculated from IIP3/IIP2".to_string(),
                ..d
            },
            Preset::Automotive => Self {
                antenna_isolation_db: 25.0,
                iip3_dbm: -10.0,
                iip2_dbm: 18.0,
                pa_class: PaClass::AB,
                bias_point_optimized: true,
                lte_tx_power_dbm: 27.0,
                lte_sensitivity_dbm: -105.0,
                ..d
            },
        }
    }

    /// Preset by name; `default` returns [`SystemParameters::default`].
    pub fn named(name: &str) -> CoexResult<Self> {
        if name.eq_ignore_ascii_case("default") {
            return Ok(Self::default());
        }
        Ok(Self::preset(name.parse()?))
    }

    /// Antenna + PCB + shield isolation, dB.
    pub fn base_isolation_db(&self) -> f64 {
        self.antenna_isolation_db + self.pcb_isolation_db + self.shield_isolation_db
    }

    pub fn validate(&self) -> CoexResult<()> {
        if !(self.pa_efficiency > 0.0 && self.pa_efficiency <= 1.0) {
            return Err(CoexError::InvalidConfig(format!(
                "pa_efficiency must be in (0, 1], got {}",
                self.pa_efficiency
            )));
        }
        if self.noise_figure_db < 0.0 {
            return Err(CoexError::InvalidConfig(format!(
                "noise_figure_db must be non-negative, got {}",
                self.noise_figure_db
            )));
        }
        for (name, value) in [
            ("antenna_isolation_db", self.antenna_isolation_db),
            ("pcb_isolation_db", self.pcb_isolation_db),
            ("shield_isolation_db", self.shield_isolation_db),
            ("tx_harmonic_filtering_db", self.tx_harmonic_filtering_db),
            ("rx_preselector_filtering_db", self.rx_preselector_filtering_db),
            ("out_of_band_rejection_db", self.out_of_band_rejection_db),
        ] {
            if value < 0.0 {
                return Err(CoexError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Named parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    MobileDeviceTypical,
    MobileDevicePoor,
    IotDeviceTypical,
    BaseStation,
    LaboratoryReference,
    DesktopProfessional,
    Automotive,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::MobileDeviceTypical,
        Preset::MobileDevicePoor,
        Preset::IotDeviceTypical,
        Preset::BaseStation,
        Preset::LaboratoryReference,
        Preset::DesktopProfessional,
        Preset::Automotive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::MobileDeviceTypical => "mobile_device_typical",
            Preset::MobileDevicePoor => "mobile_device_poor",
            Preset::IotDeviceTypical => "iot_device_typical",
            Preset::BaseStation => "base_station",
            Preset::LaboratoryReference => "laboratory_reference",
            Preset::DesktopProfessional => "desktop_professional",
            Preset::Automotive => "automotive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::MobileDeviceTypical => "Handset, class AB PA, typical isolation",
            Preset::MobileDevicePoor => "Compact handset, poor isolation and linearity",
            Preset::IotDeviceTypical => "Low-power IoT module with integrated front end",
            Preset::BaseStation => "High-power infrastructure radio",
            Preset::LaboratoryReference => "Class A lab setup with heavy filtering",
            Preset::DesktopProfessional => "Desktop platform, isolation lumped into antenna",
            Preset::Automotive => "Telematics unit with raised LTE power",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CoexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            // short aliases
            "mobile_device" => Ok(Preset::MobileDeviceTypical),
            "iot_gateway" => Ok(Preset::IotDeviceTypical),
            _ => Preset::ALL
                .iter()
                .copied()
                .find(|p| p.name() == key)
                .ok_or_else(|| CoexError::UnknownPreset(s.to_string())),
        }
    }
}

/// Partial parameter set layered over a preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemOverrides {
    pub lte_tx_power_dbm: Option<f64>,
    pub wifi_tx_power_dbm: Option<f64>,
    pub ble_tx_power_dbm: Option<f64>,
    pub halow_tx_power_dbm: Option<f64>,
    pub antenna_isolation_db: Option<f64>,
    pub pcb_isolation_db: Option<f64>,
    pub shield_isolation_db: Option<f64>,
    pub tx_harmonic_filtering_db: Option<f64>,
    pub rx_preselector_filtering_db: Option<f64>,
    pub out_of_band_rejection_db: Option<f64>,
    pub lte_to_gnss_coupling_db: Option<f64>,
    pub wifi_ble_isolation_db: Option<f64>,
    pub cellular_wifi_isolation_db: Option<f64>,
    pub iip3_dbm: Option<f64>,
    pub iip2_dbm: Option<f64>,
    pub oip3_dbm: Option<f64>,
    pub compression_point_dbm: Option<f64>,
    pub pa_efficiency: Option<f64>,
    pub pa_class: Option<PaClass>,
    pub bias_point_optimized: Option<bool>,
    pub lte_sensitivity_dbm: Option<f64>,
    pub wifi_sensitivity_dbm: Option<f64>,
    pub ble_sensitivity_dbm: Option<f64>,
    pub gnss_sensitivity_dbm: Option<f64>,
    pub halow_sensitivity_dbm: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub noise_figure_db: Option<f64>,
    pub thermal_noise_density_dbm_hz: Option<f64>,
    pub configuration_name: Option<String>,
    pub configuration_notes: Option<String>,
}

impl SystemOverrides {
    /// New parameter set with every `Some` field replaced.
    pub fn apply(&self, base: &SystemParameters) -> SystemParameters {
        let mut p = base.clone();
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = &self.$field {
                    p.$field = v.clone();
                })*
            };
        }
        take!(
            lte_tx_power_dbm,
            wifi_tx_power_dbm,
            ble_tx_power_dbm,
            halow_tx_power_dbm,
            antenna_isolation_db,
            pcb_isolation_db,
            shield_isolation_db,
            tx_harmonic_filtering_db,
            rx_preselector_filtering_db,
            out_of_band_rejection_db,
            lte_to_gnss_coupling_db,
            wifi_ble_isolation_db,
            cellular_wifi_isolation_db,
            iip3_dbm,
            iip2_dbm,
            oip3_dbm,
            compression_point_dbm,
            pa_efficiency,
            pa_class,
            bias_point_optimized,
            lte_sensitivity_dbm,
            wifi_sensitivity_dbm,
            ble_sensitivity_dbm,
            gnss_sensitivity_dbm,
            halow_sensitivity_dbm,
            temperature_celsius,
            noise_figure_db,
            thermal_noise_density_dbm_hz,
            configuration_name,
            configuration_notes,
        );
        p
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = SystemParameters::default();
        assert_eq!(p.lte_tx_power_dbm, 23.0);
        assert_eq!(p.base_isolation_db(), 45.0);
        assert_eq!(p.pa_class, PaClass::AB);
        assert_eq!(p.configuration_name, "Default");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_presets_are_fresh_values() {
        let mut a = SystemParameters::preset(Preset::BaseStation);
        a.lte_tx_power_dbm = 0.0;
        let b = SystemParameters::preset(Preset::BaseStation);
        assert_eq!(b.lte_tx_power_dbm, 43.0);
    }

    #[test]
    fn test_preset_values() {
        let lab = SystemParameters::preset(Preset::LaboratoryReference);
        assert_eq!(lab.pa_class, PaClass::A);
        assert_eq!(lab.thermal_noise_density_dbm_hz, -130.0);
        assert_eq!(lab.tx_harmonic_filtering_db, 60.0);

        let desk = SystemParameters::preset(Preset::DesktopProfessional);
        assert_eq!(desk.base_isolation_db(), 20.0);
        assert_eq!(desk.configuration_name, "Desktop Professional");

        let poor = SystemParameters::preset(Preset::MobileDevicePoor);
        assert!(!poor.bias_point_optimized);

        let auto = SystemParameters::preset(Preset::Automotive);
        assert_eq!(auto.lte_tx_power_dbm, 27.0);
        assert_eq!(auto.wifi_tx_power_dbm, 18.0);
        for preset in Preset::ALL {
            assert!(SystemParameters::preset(preset).validate().is_ok(), "{}", preset);
        }
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("base_station".parse::<Preset>().unwrap(), Preset::BaseStation);
        assert_eq!("Mobile-Device".parse::<Preset>().unwrap(), Preset::MobileDeviceTypical);
        assert!(matches!(
            "warp_drive".parse::<Preset>(),
            Err(CoexError::UnknownPreset(_))
        ));
        assert_eq!(SystemParameters::named("default").unwrap(), SystemParameters::default());
    }

    #[test]
    fn test_overrides() {
        let base = SystemParameters::preset(Preset::MobileDeviceTypical);
        let o = SystemOverrides {
            iip3_dbm: Some(0.0),
            pa_class: Some(PaClass::C),
            configuration_name: Some("Bench".into()),
            ..Default::default()
        };
        let p = o.apply(&base);
        assert_eq!(p.iip3_dbm, 0.0);
        assert_eq!(p.pa_class, PaClass::C);
        assert_eq!(p.configuration_name, "Bench");
        assert_eq!(p.iip2_dbm, base.iip2_dbm);
        assert_eq!(base.iip3_dbm, -12.0);
        assert!(SystemOverrides::default().is_empty());
    }

    #[test]
    fn test_validate_rejects() {
        let p = SystemParameters {
            pa_efficiency: 1.5,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(CoexError::InvalidConfig(_))));
        let p = SystemParameters {
            antenna_isolation_db: -3.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
