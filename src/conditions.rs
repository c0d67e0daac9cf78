//! Farm conditions supplied by the UI
//!
//! Weather, soil and farmer preferences that feed the crop and fertilizer
//! prompts. All wire names are camelCase; enum values are lowercase.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// mm
    pub rainfall: f64,
    pub season: String,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilNutrients {
    /// ppm
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilData {
    pub ph: f64,
    #[serde(rename = "type")]
    pub soil_type: String,
    pub nutrients: SoilNutrients,
    /// %
    pub organic_matter: f64,
}

/// Declares a lowercase wire enum with a `label()` for prompt text.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

labelled_enum!(CropType {
    Cereals => "cereals",
    Vegetables => "vegetables",
    Fruits => "fruits",
    Pulses => "pulses",
    Oilseeds => "oilseeds",
    Spices => "spices",
    All => "all",
});

labelled_enum!(FarmSize {
    Small => "small",
    Medium => "medium",
    Large => "large",
});

labelled_enum!(MarketFocus {
    Local => "local",
    Export => "export",
    Processing => "processing",
});

labelled_enum!(Budget {
    Low => "low",
    Medium => "medium",
    High => "high",
});

labelled_enum!(GrowthStage {
    Seedling => "seedling",
    Vegetative => "vegetative",
    Flowering => "flowering",
    Fruiting => "fruiting",
    Maturity => "maturity",
});

labelled_enum!(SoilType {
    Sandy => "sandy",
    Clay => "clay",
    Loam => "loam",
    Silt => "silt",
});

labelled_enum!(
    /// Organic, chemical or a mix of both
    FertilizerPreference {
        Organic => "organic",
        Chemical => "chemical",
        Mixed => "mixed",
    }
);

labelled_enum!(IrrigationType {
    Drip => "drip",
    Flood => "flood",
    Sprinkler => "sprinkler",
    Rainfed => "rainfed",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPreferences {
    #[serde(default)]
    pub crop_type: Option<CropType>,
    #[serde(default)]
    pub farm_size: Option<FarmSize>,
    #[serde(default)]
    pub market_focus: Option<MarketFocus>,
    #[serde(default)]
    pub budget: Option<Budget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerNutrients {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub organic_matter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerData {
    pub crop_name: String,
    pub growth_stage: GrowthStage,
    pub soil_ph: f64,
    pub soil_type: SoilType,
    pub nutrients: FertilizerNutrients,
    pub weather_conditions: WeatherConditions,
    pub farm_size: FarmSize,
    pub budget: Budget,
    pub preference: FertilizerPreference,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerHistory {
    #[serde(default)]
    pub previous_crop: Option<String>,
    #[serde(default)]
    pub irrigation_type: Option<IrrigationType>,
    #[serde(default)]
    pub pest_issues: Vec<String>,
    #[serde(default)]
    pub disease_history: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fertilizer_data_from_ui_json() {
        let data: FertilizerData = serde_json::from_str(
            r#"{"cropName":"Cotton","growthStage":"flowering","soilPh":7.2,"soilType":"clay",
                "nutrients":{"nitrogen":120,"phosphorus":30,"potassium":200,"organicMatter":0.8},
                "weatherConditions":{"temperature":31,"humidity":60,"rainfall":12},
                "farmSize":"small","budget":"low","preference":"mixed"}"#,
        )
        .unwrap();
        assert_eq!(data.growth_stage, GrowthStage::Flowering);
        assert_eq!(data.preference.label(), "mixed");
    }

    #[test]
    fn test_preferences_are_optional() {
        let prefs: CropPreferences = serde_json::from_str(r#"{"budget":"high"}"#).unwrap();
        assert_eq!(prefs.budget, Some(Budget::High));
        assert!(prefs.crop_type.is_none());
    }
}
