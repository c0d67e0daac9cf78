//! Prompt builders
//!
//! One function per feature. Each takes the response [`Language`] explicitly
//! and returns the full prompt text sent to the model.

use crate::conditions::{CropPreferences, FertilizerData, FertilizerHistory, SoilData, WeatherData};
use crate::language::Language;

/// Location assumed when the upload form leaves it blank.
pub const DEFAULT_LOCATION: &str = "Ichalkaranji, Maharashtra, India";

const JSON_KEYS_NOTE: &str = "Keep all JSON keys exactly as shown in English; only the values follow the language instruction.";

/// Image-based disease detection. The reply is normalized into
/// [`crate::normalizer::NormalizedResult`].
pub fn disease_detection(plant_name: &str, language: Language) -> String {
    format!(
        r#"Analyze this {plant_name} plant image for diseases. Provide a BRIEF analysis in this exact JSON format (keep descriptions under 50 words each):

{instruction}
{keys_note}

{{
  "plantName": "{plant_name}",
  "scientificName": "scientific name",
  "family": "plant family",
  "isHealthy": boolean,
  "confidence": number between 0-100,
  "diseases": [{{
    "name": "disease name",
    "probability": number between 0-100,
    "description": "SHORT description (max 50 words)",
    "symptoms": ["3-4 key symptoms only"],
    "causes": ["2-3 main causes only"],
    "treatment": {{
      "organic": ["2-3 key organic solutions"],
      "chemical": ["1-2 key chemical solutions"]
    }},
    "prevention": ["3-4 key prevention steps"]
  }}],
  "plantDetails": {{
    "commonNames": ["1-2 common names only"],
    "description": "BRIEF description (max 25 words)",
    "careInstructions": ["3-4 essential care steps"]
  }}
}}

IMPORTANT: Keep all text fields brief and concise. Do not exceed the specified word limits."#,
        plant_name = plant_name,
        instruction = language.response_instruction(),
        keys_note = JSON_KEYS_NOTE,
    )
}

/// Server-side pathologist analysis for an uploaded image.
pub fn pathologist_analysis(plant_name: &str, location: Option<&str>) -> String {
    let location = location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOCATION);

    format!(
        r#"You are an expert plant pathologist. Analyze the attached image and return a JSON object with the structure:
{{
  "identification": {{
    "isHealthy": boolean,
    "diseaseName": string,
    "scientificName": string,
    "confidenceScore": number,
    "shortDescription": string
  }},
  "solutionTabs": {{
    "aboutDisease": {{ "title": string, "content": [{{"heading": string, "text": string}}] }},
    "organicSolutions": {{ "title": string, "content": [{{"heading": string, "text": string}}] }},
    "chemicalSolutions": {{ "title": string, "content": [{{"heading": string, "text": string}}] }},
    "preventiveMeasures": {{ "title": string, "content": [{{"heading": string, "text": string}}] }}
  }}
}}
Respond ONLY with JSON (no markdown/code blocks).
Plant name: {plant_name}
Location: {location}"#
    )
}

/// Free-text treatment advice for an identified disease.
pub fn disease_advice(
    disease_name: &str,
    plant_name: Option<&str>,
    additional_context: Option<&str>,
    language: Language,
) -> String {
    let on_plant = plant_name
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!(" on {}", p.trim()))
        .unwrap_or_default();
    let context = format!(
        "A plant has been identified with the disease: \"{}\"{}. {}",
        disease_name,
        on_plant,
        additional_context.unwrap_or("")
    );

    format!(
        "{context}\n\n{instruction}\n\n\
You MUST write 100% of the response in the specified language. Do NOT mix languages.\n\n\
Please provide comprehensive advice for treating and managing this plant disease. Include:\n\
1. Disease description and symptoms\n\
2. Causes and conditions that favor the disease\n\
3. Immediate treatment steps (both organic and chemical options)\n\
4. Prevention measures\n\
5. Long-term management strategies\n\
6. When to seek professional help\n\
7. Expected recovery timeline\n\n\
Be specific and practical for farmers.",
        context = context.trim_end(),
        instruction = language.response_instruction(),
    )
}

/// General farming question.
pub fn farming_advice(question: &str, language: Language) -> String {
    format!(
        "{}\n\nUser Question: {}\n\nProvide practical farming advice considering Indian agricultural conditions.",
        language.response_instruction(),
        question.trim()
    )
}

/// Short conversational answer for the voice assistant.
pub fn assistant_question(question: &str, language: Language) -> String {
    match language {
        Language::English | Language::Hindi | Language::Marathi => {
            format!("{}\n\nQuestion: {}", language.assistant_persona(), question.trim())
        }
        _ => format!(
            "{}\n{}\n\nQuestion: {}",
            language.assistant_persona(),
            language.response_instruction(),
            question.trim()
        ),
    }
}

fn weather_block(weather: &WeatherData) -> String {
    let mut block = format!(
        "- Location: {}\n- Temperature: {}°C\n- Humidity: {}%\n- Rainfall: {}mm\n- Season: {}",
        weather.location, weather.temperature, weather.humidity, weather.rainfall, weather.season
    );
    if let Some(coords) = &weather.coordinates {
        block.push_str(&format!(
            "\n- Coordinates: {}, {}",
            coords.latitude, coords.longitude
        ));
    }
    block
}

/// Top-five crop recommendation, answered as JSON.
pub fn crop_recommendations(
    weather: &WeatherData,
    soil: Option<&SoilData>,
    preferences: Option<&CropPreferences>,
    language: Language,
) -> String {
    let mut prompt = String::from(
        "You are an expert agricultural scientist and agronomist specializing in crop recommendations for Indian farmers.\n\n\
Analyze the following farming conditions and provide detailed crop recommendations:\n\n\
**Location & Climate:**\n",
    );
    prompt.push_str(&weather_block(weather));
    prompt.push_str("\n\n");

    if let Some(soil) = soil {
        prompt.push_str(&format!(
            "**Soil Conditions:**\n- pH: {}\n- Soil Type: {}\n- Nitrogen: {} ppm\n- Phosphorus: {} ppm\n- Potassium: {} ppm\n- Organic Matter: {}%\n\n",
            soil.ph,
            soil.soil_type,
            soil.nutrients.nitrogen,
            soil.nutrients.phosphorus,
            soil.nutrients.potassium,
            soil.organic_matter
        ));
    }

    if let Some(prefs) = preferences {
        prompt.push_str(&format!(
            "**Farmer Preferences:**\n- Crop Type: {}\n- Farm Size: {}\n- Market Focus: {}\n- Budget: {}\n\n",
            prefs.crop_type.map_or("all", |c| c.label()),
            prefs.farm_size.map_or("medium", |f| f.label()),
            prefs.market_focus.map_or("local", |m| m.label()),
            prefs.budget.map_or("medium", |b| b.label()),
        ));
    }

    prompt.push_str(
        r#"Provide a comprehensive analysis with:

1. **Top 5 crop recommendations** with detailed information
2. **Suitability scores** (0-100) for each crop
3. **Specific reasons** why each crop is suitable
4. **Planting and harvest timelines**
5. **Water, soil, and climate requirements**
6. **Market value and yield expectations**
7. **Care instructions and pest management**
8. **Economic benefits and potential challenges**
9. **Alternative crop options**

Format your response as a JSON object with this exact structure:
{
  "recommendations": [
    {
      "cropName": "string",
      "scientificName": "string",
      "family": "string",
      "suitabilityScore": number,
      "reasons": ["string array"],
      "plantingTime": "string",
      "harvestTime": "string",
      "waterRequirements": "string",
      "soilRequirements": "string",
      "climateRequirements": "string",
      "marketValue": "string",
      "yieldExpectation": "string",
      "careInstructions": ["string array"],
      "pestManagement": ["string array"],
      "diseaseResistance": ["string array"],
      "economicBenefits": ["string array"],
      "challenges": ["string array"],
      "alternativeCrops": ["string array"]
    }
  ],
  "summary": "string",
  "bestSeason": "string",
  "generalAdvice": "string"
}

Focus on crops that are:
- Suitable for the given climate and soil conditions
- Economically viable for the farmer's budget and market focus
- Appropriate for the farm size
- Have good disease resistance and pest management options
- Provide good yield potential

Be specific about Indian farming conditions, local market prices, and practical implementation advice."#,
    );
    push_language(&mut prompt, language, true);
    prompt
}

/// Free-text cultivation guide for one crop.
pub fn crop_details(crop_name: &str, weather: &WeatherData, language: Language) -> String {
    let mut prompt = format!(
        r#"Provide detailed information about {crop_name} cultivation including:

1. **Crop Overview**: Scientific name, family, origin
2. **Growing Conditions**: Temperature, rainfall, soil requirements
3. **Planting Guide**: Best time, spacing, seed rate
4. **Care Instructions**: Watering, fertilizing, weeding
5. **Pest & Disease Management**: Common issues and solutions
6. **Harvesting**: Timing, methods, yield expectations
7. **Post-Harvest**: Storage, processing, marketing
8. **Economic Aspects**: Cost of cultivation, expected returns
9. **Varieties**: Recommended varieties for different conditions
10. **Challenges & Solutions**: Common problems and remedies

Current conditions:
"#
    );
    prompt.push_str(&weather_block(weather));
    prompt.push_str("\n\nProvide practical, actionable advice suitable for Indian farmers.");
    push_language(&mut prompt, language, false);
    prompt
}

/// Fertilizer plan for a crop, answered as JSON.
pub fn fertilizer_recommendations(
    data: &FertilizerData,
    history: Option<&FertilizerHistory>,
    language: Language,
) -> String {
    let mut prompt = format!(
        "You are an expert agricultural scientist and soil fertility specialist. Provide comprehensive fertilizer recommendations for the following crop and conditions:\n\n\
**Crop Information:**\n- Crop: {}\n- Growth Stage: {}\n- Farm Size: {}\n- Budget: {}\n- Preference: {}\n\n\
**Soil Analysis:**\n- pH: {}\n- Soil Type: {}\n- Nitrogen: {} ppm\n- Phosphorus: {} ppm\n- Potassium: {} ppm\n- Organic Matter: {}%\n\n\
**Weather Conditions:**\n- Temperature: {}°C\n- Humidity: {}%\n- Rainfall: {}mm\n\n",
        data.crop_name,
        data.growth_stage.label(),
        data.farm_size.label(),
        data.budget.label(),
        data.preference.label(),
        data.soil_ph,
        data.soil_type.label(),
        data.nutrients.nitrogen,
        data.nutrients.phosphorus,
        data.nutrients.potassium,
        data.nutrients.organic_matter,
        data.weather_conditions.temperature,
        data.weather_conditions.humidity,
        data.weather_conditions.rainfall,
    );

    if let Some(history) = history {
        let or_none = |items: &[String]| {
            if items.is_empty() {
                "None reported".to_string()
            } else {
                items.join(", ")
            }
        };
        prompt.push_str(&format!(
            "**Additional Information:**\n- Previous Crop: {}\n- Irrigation: {}\n- Pest Issues: {}\n- Disease History: {}\n\n",
            history.previous_crop.as_deref().unwrap_or("Not specified"),
            history.irrigation_type.map_or("Not specified", |i| i.label()),
            or_none(&history.pest_issues),
            or_none(&history.disease_history),
        ));
    }

    prompt.push_str(
        r#"Provide detailed fertilizer recommendations including:

1. **Specific fertilizer recommendations** for each growth stage
2. **NPK ratios and application rates**
3. **Application methods and timing**
4. **Cost estimates** based on budget
5. **Organic and chemical options** based on preference
6. **Soil improvement strategies**
7. **Expected yield improvements**
8. **Precautions and warnings**
9. **Alternative options** for different budgets
10. **Seasonal application schedule**

Format your response as a JSON object with this exact structure:
{
  "recommendations": [
    {
      "fertilizerName": "string",
      "type": "organic|chemical|biofertilizer",
      "npkRatio": "string",
      "applicationRate": "string",
      "applicationMethod": "string",
      "timing": "string",
      "frequency": "string",
      "cost": "string",
      "benefits": ["string array"],
      "precautions": ["string array"],
      "alternatives": ["string array"],
      "expectedResults": "string",
      "soilImprovement": "string"
    }
  ],
  "schedule": [
    {
      "stage": "string",
      "fertilizers": [/* fertilizer objects */],
      "totalCost": "string",
      "applicationNotes": "string"
    }
  ],
  "soilAnalysis": "string",
  "generalAdvice": "string",
  "costEstimate": "string",
  "expectedYield": "string",
  "warnings": ["string array"]
}

Focus on:
- Practical, cost-effective solutions
- Indian market availability and prices
- Weather-appropriate timing
- Soil-specific requirements
- Sustainable farming practices
- Yield optimization strategies"#,
    );
    push_language(&mut prompt, language, true);
    prompt
}

/// Free-text product guide for one fertilizer on one crop.
pub fn fertilizer_details(fertilizer_name: &str, crop_name: &str, language: Language) -> String {
    let mut prompt = format!(
        r#"Provide detailed information about {fertilizer_name} for {crop_name} cultivation:

1. **Fertilizer Composition**: NPK ratio, micronutrients, organic matter
2. **Application Guidelines**: Rate, method, timing, frequency
3. **Benefits**: Specific advantages for the crop
4. **Precautions**: Safety measures, storage, handling
5. **Cost Analysis**: Price per unit, cost per hectare
6. **Availability**: Where to buy, brands, alternatives
7. **Mixing Instructions**: Compatibility with other inputs
8. **Environmental Impact**: Sustainability aspects
9. **Results Timeline**: When to expect results
10. **Troubleshooting**: Common issues and solutions

Provide practical advice for Indian farmers with specific brand recommendations and local market prices."#
    );
    push_language(&mut prompt, language, false);
    prompt
}

fn push_language(prompt: &mut String, language: Language, json_reply: bool) {
    prompt.push_str("\n\n");
    prompt.push_str(language.response_instruction());
    if json_reply {
        prompt.push(' ');
        prompt.push_str(JSON_KEYS_NOTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Budget, Coordinates};

    fn weather() -> WeatherData {
        WeatherData {
            temperature: 29.5,
            humidity: 70.0,
            rainfall: 120.0,
            season: "Kharif".to_string(),
            location: "Kolhapur".to_string(),
            coordinates: Some(Coordinates {
                latitude: 16.705,
                longitude: 74.243,
            }),
        }
    }

    #[test]
    fn test_disease_detection_embeds_plant_and_language() {
        let prompt = disease_detection("Tomato", Language::Hindi);
        assert!(prompt.contains("Analyze this Tomato plant image"));
        assert!(prompt.contains("\"plantName\": \"Tomato\""));
        assert!(prompt.contains(Language::Hindi.response_instruction()));
        assert!(prompt.contains("\"careInstructions\""));
    }

    #[test]
    fn test_pathologist_uses_default_location() {
        assert!(pathologist_analysis("Okra", None).contains(DEFAULT_LOCATION));
        assert!(pathologist_analysis("Okra", Some("  ")).contains(DEFAULT_LOCATION));
        assert!(pathologist_analysis("Okra", Some("Pune")).contains("Location: Pune"));
    }

    #[test]
    fn test_disease_advice_context() {
        let prompt = disease_advice("Leaf curl", Some("Chilli"), None, Language::English);
        assert!(prompt.starts_with("A plant has been identified with the disease: \"Leaf curl\" on Chilli."));

        let prompt = disease_advice("Leaf curl", None, None, Language::English);
        assert!(prompt.contains("\"Leaf curl\"."));
    }

    #[test]
    fn test_crop_prompt_optional_blocks() {
        let without = crop_recommendations(&weather(), None, None, Language::English);
        assert!(without.contains("- Coordinates: 16.705, 74.243"));
        assert!(!without.contains("**Soil Conditions:**"));
        assert!(!without.contains("**Farmer Preferences:**"));

        let prefs = CropPreferences {
            budget: Some(Budget::Low),
            ..CropPreferences::default()
        };
        let with = crop_recommendations(&weather(), None, Some(&prefs), Language::English);
        assert!(with.contains("- Budget: low"));
        assert!(with.contains("- Crop Type: all"));
    }

    #[test]
    fn test_assistant_question_adds_instruction_for_other_languages() {
        let tamil = assistant_question("When to sow?", Language::Tamil);
        assert!(tamil.contains(Language::Tamil.response_instruction()));

        let hindi = assistant_question("When to sow?", Language::Hindi);
        assert!(!hindi.contains("Respond ONLY"));
        assert!(hindi.ends_with("Question: When to sow?"));
    }
}
