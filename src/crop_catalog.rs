//! Static crop catalog
//!
//! Crops offered in the crop picker, grouped by category. Served by
//! `GET /api/crops/catalog`.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CropCategory {
    CashCrops,
    Cereals,
    Flowers,
    FodderCrops,
    Fruits,
    Mushrooms,
    Nuts,
    Oilseeds,
    OtherCrops,
    Pulses,
    RootCrops,
    SpicesHerbs,
    Vegetables,
}

impl CropCategory {
    pub fn label(self) -> &'static str {
        match self {
            CropCategory::CashCrops => "Cash Crops",
            CropCategory::Cereals => "Cereals",
            CropCategory::Flowers => "Flowers",
            CropCategory::FodderCrops => "Fodder Crops",
            CropCategory::Fruits => "Fruits",
            CropCategory::Mushrooms => "Mushrooms",
            CropCategory::Nuts => "Nuts",
            CropCategory::Oilseeds => "Oilseeds",
            CropCategory::OtherCrops => "Other Crops",
            CropCategory::Pulses => "Pulses",
            CropCategory::RootCrops => "Root Crops",
            CropCategory::SpicesHerbs => "Spices & Herbs",
            CropCategory::Vegetables => "Vegetables",
        }
    }
}

impl Serialize for CropCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crop {
    pub name: &'static str,
    pub category: CropCategory,
}

/// One category with its crops sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub crops: Vec<Crop>,
}

// ============================================================================
// EMBEDDED CROP TABLE
// ============================================================================

static CROPS: &[Crop] = &[
    // Cereals
    Crop { name: "Rice", category: CropCategory::Cereals },
    Crop { name: "Wheat", category: CropCategory::Cereals },
    Crop { name: "Maize", category: CropCategory::Cereals },
    Crop { name: "Barley", category: CropCategory::Cereals },
    Crop { name: "Pearl Millet", category: CropCategory::Cereals },
    Crop { name: "Sorghum", category: CropCategory::Cereals },
    Crop { name: "Finger Millet", category: CropCategory::Cereals },
    Crop { name: "Foxtail Millet", category: CropCategory::Cereals },
    Crop { name: "Proso Millet", category: CropCategory::Cereals },
    Crop { name: "Little Millet", category: CropCategory::Cereals },
    Crop { name: "Kodo Millet", category: CropCategory::Cereals },
    Crop { name: "Barnyard Millet", category: CropCategory::Cereals },
    Crop { name: "Bajra", category: CropCategory::Cereals },
    Crop { name: "Amaranth", category: CropCategory::Cereals },
    Crop { name: "Buckwheat", category: CropCategory::Cereals },
    Crop { name: "Oats", category: CropCategory::Cereals },
    Crop { name: "Rye", category: CropCategory::Cereals },
    Crop { name: "Triticale", category: CropCategory::Cereals },
    // Pulses
    Crop { name: "Chickpea", category: CropCategory::Pulses },
    Crop { name: "Pigeon Pea", category: CropCategory::Pulses },
    Crop { name: "Green Gram", category: CropCategory::Pulses },
    Crop { name: "Black Gram", category: CropCategory::Pulses },
    Crop { name: "Lentil", category: CropCategory::Pulses },
    Crop { name: "Horse Gram", category: CropCategory::Pulses },
    Crop { name: "Field Pea", category: CropCategory::Pulses },
    Crop { name: "Cowpea", category: CropCategory::Pulses },
    Crop { name: "Broad Bean", category: CropCategory::Pulses },
    Crop { name: "Moth Bean", category: CropCategory::Pulses },
    Crop { name: "Soybean", category: CropCategory::Pulses },
    Crop { name: "Cluster Bean", category: CropCategory::Pulses },
    Crop { name: "Bambara Groundnut", category: CropCategory::Pulses },
    Crop { name: "Pea", category: CropCategory::Pulses },
    Crop { name: "Rajma", category: CropCategory::Pulses },
    Crop { name: "Lupin", category: CropCategory::Pulses },
    Crop { name: "Winged Bean", category: CropCategory::Pulses },
    Crop { name: "Faba Bean", category: CropCategory::Pulses },
    Crop { name: "Hyacinth Bean", category: CropCategory::Pulses },
    // Oilseeds
    Crop { name: "Groundnut", category: CropCategory::Oilseeds },
    Crop { name: "Sesame", category: CropCategory::Oilseeds },
    Crop { name: "Mustard / Rapeseed", category: CropCategory::Oilseeds },
    Crop { name: "Sunflower", category: CropCategory::Oilseeds },
    Crop { name: "Safflower", category: CropCategory::Oilseeds },
    Crop { name: "Castor", category: CropCategory::Oilseeds },
    Crop { name: "Linseed", category: CropCategory::Oilseeds },
    Crop { name: "Coconut", category: CropCategory::Oilseeds },
    Crop { name: "Olive", category: CropCategory::Oilseeds },
    // Cash Crops
    Crop { name: "Sugarcane", category: CropCategory::CashCrops },
    Crop { name: "Sweet Sorghum", category: CropCategory::CashCrops },
    Crop { name: "Sugar Beet", category: CropCategory::CashCrops },
    Crop { name: "Cotton", category: CropCategory::CashCrops },
    Crop { name: "Jute", category: CropCategory::CashCrops },
    Crop { name: "Kenaf", category: CropCategory::CashCrops },
    Crop { name: "Hemp", category: CropCategory::CashCrops },
    Crop { name: "Mesta", category: CropCategory::CashCrops },
    Crop { name: "Silk", category: CropCategory::CashCrops },
    Crop { name: "Mulberry", category: CropCategory::CashCrops },
    Crop { name: "Tea", category: CropCategory::CashCrops },
    Crop { name: "Coffee", category: CropCategory::CashCrops },
    Crop { name: "Rubber", category: CropCategory::CashCrops },
    Crop { name: "Arecanut", category: CropCategory::CashCrops },
    Crop { name: "Oil Palm", category: CropCategory::CashCrops },
    Crop { name: "Cashew", category: CropCategory::CashCrops },
    Crop { name: "Cocoa", category: CropCategory::CashCrops },
    // Fruits
    Crop { name: "Mango", category: CropCategory::Fruits },
    Crop { name: "Banana", category: CropCategory::Fruits },
    Crop { name: "Guava", category: CropCategory::Fruits },
    Crop { name: "Pineapple", category: CropCategory::Fruits },
    Crop { name: "Papaya", category: CropCategory::Fruits },
    Crop { name: "Sapota", category: CropCategory::Fruits },
    Crop { name: "Litchi", category: CropCategory::Fruits },
    Crop { name: "Lychee", category: CropCategory::Fruits },
    Crop { name: "Pomegranate", category: CropCategory::Fruits },
    Crop { name: "Orange", category: CropCategory::Fruits },
    Crop { name: "Sweet Lime", category: CropCategory::Fruits },
    Crop { name: "Lemon", category: CropCategory::Fruits },
    Crop { name: "Grapes", category: CropCategory::Fruits },
    Crop { name: "Apple", category: CropCategory::Fruits },
    Crop { name: "Pear", category: CropCategory::Fruits },
    Crop { name: "Apricot", category: CropCategory::Fruits },
    Crop { name: "Plum", category: CropCategory::Fruits },
    Crop { name: "Strawberry", category: CropCategory::Fruits },
    Crop { name: "Blackberry", category: CropCategory::Fruits },
    Crop { name: "Blueberry", category: CropCategory::Fruits },
    Crop { name: "Custard Apple", category: CropCategory::Fruits },
    Crop { name: "Ber", category: CropCategory::Fruits },
    Crop { name: "Jamun", category: CropCategory::Fruits },
    Crop { name: "Kinnow", category: CropCategory::Fruits },
    Crop { name: "Mandarin", category: CropCategory::Fruits },
    Crop { name: "Tangerine", category: CropCategory::Fruits },
    Crop { name: "Watermelon", category: CropCategory::Fruits },
    Crop { name: "Muskmelon", category: CropCategory::Fruits },
    Crop { name: "Cantaloupe", category: CropCategory::Fruits },
    Crop { name: "Honeydew", category: CropCategory::Fruits },
    Crop { name: "Jackfruit", category: CropCategory::Fruits },
    Crop { name: "Breadfruit", category: CropCategory::Fruits },
    Crop { name: "Sapodilla", category: CropCategory::Fruits },
    Crop { name: "Rambutan", category: CropCategory::Fruits },
    Crop { name: "Durian", category: CropCategory::Fruits },
    Crop { name: "Carambola", category: CropCategory::Fruits },
    Crop { name: "Longan", category: CropCategory::Fruits },
    Crop { name: "Mangosteen", category: CropCategory::Fruits },
    // Vegetables
    Crop { name: "Potato", category: CropCategory::Vegetables },
    Crop { name: "Tomato", category: CropCategory::Vegetables },
    Crop { name: "Onion", category: CropCategory::Vegetables },
    Crop { name: "Garlic", category: CropCategory::Vegetables },
    Crop { name: "Chilli", category: CropCategory::Vegetables },
    Crop { name: "Brinjal", category: CropCategory::Vegetables },
    Crop { name: "Okra", category: CropCategory::Vegetables },
    Crop { name: "Cabbage", category: CropCategory::Vegetables },
    Crop { name: "Cauliflower", category: CropCategory::Vegetables },
    Crop { name: "Broccoli", category: CropCategory::Vegetables },
    Crop { name: "Spinach", category: CropCategory::Vegetables },
    Crop { name: "Methi", category: CropCategory::Vegetables },
    Crop { name: "Celery", category: CropCategory::Vegetables },
    Crop { name: "Carrot", category: CropCategory::Vegetables },
    Crop { name: "Beetroot", category: CropCategory::Vegetables },
    Crop { name: "Radish", category: CropCategory::Vegetables },
    Crop { name: "Turnip", category: CropCategory::Vegetables },
    Crop { name: "Bottle Gourd", category: CropCategory::Vegetables },
    Crop { name: "Bitter Gourd", category: CropCategory::Vegetables },
    Crop { name: "Ridge Gourd", category: CropCategory::Vegetables },
    Crop { name: "Snake Gourd", category: CropCategory::Vegetables },
    Crop { name: "Pointed Gourd", category: CropCategory::Vegetables },
    Crop { name: "Sweet Potato", category: CropCategory::Vegetables },
    Crop { name: "Colocasia", category: CropCategory::Vegetables },
    Crop { name: "Arbi", category: CropCategory::Vegetables },
    Crop { name: "Peas", category: CropCategory::Vegetables },
    Crop { name: "Cluster Beans", category: CropCategory::Vegetables },
    Crop { name: "Zucchini", category: CropCategory::Vegetables },
    Crop { name: "Cucumber", category: CropCategory::Vegetables },
    Crop { name: "Field Beans", category: CropCategory::Vegetables },
    Crop { name: "Bell Pepper", category: CropCategory::Vegetables },
    Crop { name: "Lettuce", category: CropCategory::Vegetables },
    Crop { name: "Microgreens", category: CropCategory::Vegetables },
    Crop { name: "Purslane", category: CropCategory::Vegetables },
    Crop { name: "Kale", category: CropCategory::Vegetables },
    Crop { name: "Collard Greens", category: CropCategory::Vegetables },
    Crop { name: "Pak Choi", category: CropCategory::Vegetables },
    Crop { name: "Arugula", category: CropCategory::Vegetables },
    Crop { name: "Endive", category: CropCategory::Vegetables },
    Crop { name: "Fiddlehead", category: CropCategory::Vegetables },
    Crop { name: "Kangkong", category: CropCategory::Vegetables },
    Crop { name: "Chayote", category: CropCategory::Vegetables },
    Crop { name: "Perennial Vegetables", category: CropCategory::Vegetables },
    Crop { name: "Ramps", category: CropCategory::Vegetables },
    // Spices & Herbs
    Crop { name: "Turmeric", category: CropCategory::SpicesHerbs },
    Crop { name: "Ginger", category: CropCategory::SpicesHerbs },
    Crop { name: "Black Pepper", category: CropCategory::SpicesHerbs },
    Crop { name: "Cardamom", category: CropCategory::SpicesHerbs },
    Crop { name: "Cinnamon", category: CropCategory::SpicesHerbs },
    Crop { name: "Clove", category: CropCategory::SpicesHerbs },
    Crop { name: "Nutmeg", category: CropCategory::SpicesHerbs },
    Crop { name: "Mace", category: CropCategory::SpicesHerbs },
    Crop { name: "Coriander", category: CropCategory::SpicesHerbs },
    Crop { name: "Cumin", category: CropCategory::SpicesHerbs },
    Crop { name: "Fennel", category: CropCategory::SpicesHerbs },
    Crop { name: "Fenugreek", category: CropCategory::SpicesHerbs },
    Crop { name: "Ajwain", category: CropCategory::SpicesHerbs },
    Crop { name: "Bay Leaf", category: CropCategory::SpicesHerbs },
    Crop { name: "Saffron", category: CropCategory::SpicesHerbs },
    Crop { name: "Star Anise", category: CropCategory::SpicesHerbs },
    Crop { name: "Mustard", category: CropCategory::SpicesHerbs },
    Crop { name: "Tamarind", category: CropCategory::SpicesHerbs },
    Crop { name: "Ashwagandha", category: CropCategory::SpicesHerbs },
    Crop { name: "Aloe Vera", category: CropCategory::SpicesHerbs },
    Crop { name: "Tulsi", category: CropCategory::SpicesHerbs },
    Crop { name: "Brahmi", category: CropCategory::SpicesHerbs },
    Crop { name: "Shatavari", category: CropCategory::SpicesHerbs },
    Crop { name: "Giloy", category: CropCategory::SpicesHerbs },
    Crop { name: "Neem", category: CropCategory::SpicesHerbs },
    Crop { name: "Artemisia", category: CropCategory::SpicesHerbs },
    Crop { name: "Bhringraj", category: CropCategory::SpicesHerbs },
    Crop { name: "Stevia", category: CropCategory::SpicesHerbs },
    Crop { name: "Mint", category: CropCategory::SpicesHerbs },
    Crop { name: "Lemongrass", category: CropCategory::SpicesHerbs },
    Crop { name: "Sweet Flag", category: CropCategory::SpicesHerbs },
    Crop { name: "Kalmegh", category: CropCategory::SpicesHerbs },
    Crop { name: "Licorice", category: CropCategory::SpicesHerbs },
    Crop { name: "Chamomile", category: CropCategory::SpicesHerbs },
    Crop { name: "Curry Leaf", category: CropCategory::SpicesHerbs },
    // Flowers
    Crop { name: "Rose", category: CropCategory::Flowers },
    Crop { name: "Marigold", category: CropCategory::Flowers },
    Crop { name: "Jasmine", category: CropCategory::Flowers },
    Crop { name: "Tuberose", category: CropCategory::Flowers },
    Crop { name: "Gladiolus", category: CropCategory::Flowers },
    Crop { name: "Chrysanthemum", category: CropCategory::Flowers },
    Crop { name: "Gerbera", category: CropCategory::Flowers },
    Crop { name: "Carnation", category: CropCategory::Flowers },
    Crop { name: "Lily", category: CropCategory::Flowers },
    Crop { name: "Orchid", category: CropCategory::Flowers },
    Crop { name: "Hibiscus", category: CropCategory::Flowers },
    // Nuts
    Crop { name: "Areca Nut", category: CropCategory::Nuts },
    Crop { name: "Almond", category: CropCategory::Nuts },
    Crop { name: "Walnut", category: CropCategory::Nuts },
    Crop { name: "Pistachio", category: CropCategory::Nuts },
    Crop { name: "Chestnut", category: CropCategory::Nuts },
    // Mushrooms
    Crop { name: "Button Mushroom", category: CropCategory::Mushrooms },
    Crop { name: "Oyster Mushroom", category: CropCategory::Mushrooms },
    Crop { name: "Paddy Straw Mushroom", category: CropCategory::Mushrooms },
    Crop { name: "Shiitake", category: CropCategory::Mushrooms },
    Crop { name: "Milky Mushroom", category: CropCategory::Mushrooms },
    // Fodder Crops
    Crop { name: "Berseem", category: CropCategory::FodderCrops },
    Crop { name: "Lucerne", category: CropCategory::FodderCrops },
    Crop { name: "Napier Grass", category: CropCategory::FodderCrops },
    Crop { name: "Hybrid Napier", category: CropCategory::FodderCrops },
    Crop { name: "Grass pea", category: CropCategory::FodderCrops },
    Crop { name: "Sesbania", category: CropCategory::FodderCrops },
    Crop { name: "Sunhemp", category: CropCategory::FodderCrops },
    // Root Crops
    Crop { name: "Cassava", category: CropCategory::RootCrops },
    Crop { name: "Yam", category: CropCategory::RootCrops },
    Crop { name: "Elephant Foot Yam", category: CropCategory::RootCrops },
    Crop { name: "Arum", category: CropCategory::RootCrops },
    // Other Crops
    Crop { name: "Herbal Tea Crops", category: CropCategory::OtherCrops },
    Crop { name: "Cane Sugar", category: CropCategory::OtherCrops },
    Crop { name: "Niger", category: CropCategory::OtherCrops },
    Crop { name: "Perilla", category: CropCategory::OtherCrops },
    Crop { name: "Ricebean", category: CropCategory::OtherCrops },
    Crop { name: "Mungbean", category: CropCategory::OtherCrops },
    Crop { name: "Black soybean", category: CropCategory::OtherCrops },
    Crop { name: "Perennial legumes", category: CropCategory::OtherCrops },
    Crop { name: "Herb Farming", category: CropCategory::OtherCrops },
    Crop { name: "Hydroponic Vegetables", category: CropCategory::OtherCrops },
    Crop { name: "Poppy", category: CropCategory::OtherCrops },
    Crop { name: "Tobacco", category: CropCategory::OtherCrops },
    Crop { name: "Betel Vine", category: CropCategory::OtherCrops },
    Crop { name: "Vanilla", category: CropCategory::OtherCrops },
    Crop { name: "Pepper", category: CropCategory::OtherCrops },
    Crop { name: "Industrial Crops", category: CropCategory::OtherCrops },
    Crop { name: "Khesari", category: CropCategory::OtherCrops },
    Crop { name: "Toria", category: CropCategory::OtherCrops },
    Crop { name: "Sesamum", category: CropCategory::OtherCrops },
    Crop { name: "Korral", category: CropCategory::OtherCrops },
    Crop { name: "Pan", category: CropCategory::OtherCrops },
    Crop { name: "Kokum", category: CropCategory::OtherCrops },
    Crop { name: "Phalsa", category: CropCategory::OtherCrops },
    Crop { name: "Wood apple", category: CropCategory::OtherCrops },
    Crop { name: "Bael", category: CropCategory::OtherCrops },
    Crop { name: "Indian Gooseberry", category: CropCategory::OtherCrops },
    Crop { name: "Bel", category: CropCategory::OtherCrops },
    Crop { name: "Neemat", category: CropCategory::OtherCrops },
    Crop { name: "Indian Mustard", category: CropCategory::OtherCrops },
    Crop { name: "Silk Cotton", category: CropCategory::OtherCrops },
    Crop { name: "Grain Sorghum", category: CropCategory::OtherCrops },
    Crop { name: "Ragi", category: CropCategory::OtherCrops },
    Crop { name: "Kodo", category: CropCategory::OtherCrops },
    Crop { name: "Korale Millet", category: CropCategory::OtherCrops },
    Crop { name: "Field Corn", category: CropCategory::OtherCrops },
    Crop { name: "Sweet Corn", category: CropCategory::OtherCrops },
    Crop { name: "Dryland Rice Varieties", category: CropCategory::OtherCrops },
    Crop { name: "Irrigated Rice Varieties", category: CropCategory::OtherCrops },
    Crop { name: "Hybrid Rice", category: CropCategory::OtherCrops },
    Crop { name: "Basmati Rice", category: CropCategory::OtherCrops },
    Crop { name: "Non-Basmati Rice", category: CropCategory::OtherCrops },
    Crop { name: "Heat-resistant Tomato Varieties", category: CropCategory::OtherCrops },
    Crop { name: "Cold-tolerant Potato Varieties", category: CropCategory::OtherCrops },
    Crop { name: "High-yield Wheat Varieties", category: CropCategory::OtherCrops },
    Crop { name: "Organic Vegetables", category: CropCategory::OtherCrops },
    Crop { name: "Intercrops", category: CropCategory::OtherCrops },
    Crop { name: "Cover Crops", category: CropCategory::OtherCrops },
];

pub fn all_crops() -> &'static [Crop] {
    CROPS
}

/// Categories sorted by label, crops within each sorted by name.
pub fn crops_by_category() -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<&'static str, Vec<Crop>> = BTreeMap::new();
    for crop in CROPS {
        groups.entry(crop.category.label()).or_default().push(*crop);
    }

    groups
        .into_iter()
        .map(|(name, mut crops)| {
            crops.sort_by_key(|c| c.name.to_lowercase());
            CategoryGroup { name, crops }
        })
        .collect()
}

/// Case-insensitive substring match on crop name or category label.
pub fn search_crops(query: &str) -> Vec<Crop> {
    let query = query.trim().to_lowercase();
    CROPS
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&query) || c.category.label().to_lowercase().contains(&query))
        .copied()
        .collect()
}

pub fn crop_names() -> Vec<&'static str> {
    CROPS.iter().map(|c| c.name).collect()
}
