use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Industry category codes offered by the brand form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Ecommerce,
    Baby,
    Home,
    Apparel,
    Beauty,
    Health,
    Fitness,
    Food,
    Travel,
    Outdoor,
    Tech,
    Decor,
    Luxury,
    Furniture,
    Accessories,
    Registry,
}

impl Industry {
    pub const ALL: [Self; 16] = [
        Self::Ecommerce,
        Self::Baby,
        Self::Home,
        Self::Apparel,
        Self::Beauty,
        Self::Health,
        Self::Fitness,
        Self::Food,
        Self::Travel,
        Self::Outdoor,
        Self::Tech,
        Self::Decor,
        Self::Luxury,
        Self::Furniture,
        Self::Accessories,
        Self::Registry,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Ecommerce => "ecommerce",
            Self::Baby => "baby",
            Self::Home => "home",
            Self::Apparel => "apparel",
            Self::Beauty => "beauty",
            Self::Health => "health",
            Self::Fitness => "fitness",
            Self::Food => "food",
            Self::Travel => "travel",
            Self::Outdoor => "outdoor",
            Self::Tech => "tech",
            Self::Decor => "decor",
            Self::Luxury => "luxury",
            Self::Furniture => "furniture",
            Self::Accessories => "accessories",
            Self::Registry => "registry",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ecommerce => "General E-commerce",
            Self::Baby => "Baby & Parenting",
            Self::Home => "Home & Furnishings",
            Self::Apparel => "Apparel & Fashion",
            Self::Beauty => "Beauty & Skincare",
            Self::Health => "Health & Wellness",
            Self::Fitness => "Fitness & Sports",
            Self::Food => "Food & Beverages",
            Self::Travel => "Travel & Luggage",
            Self::Outdoor => "Outdoor & Recreation",
            Self::Tech => "Electronics & Tech",
            Self::Decor => "Home Decor",
            Self::Luxury => "Luxury Goods",
            Self::Furniture => "Furniture",
            Self::Accessories => "Accessories",
            Self::Registry => "Wedding/Registry",
        }
    }
}

impl FromStr for Industry {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|industry| industry.code() == s)
            .ok_or_else(|| ProfileError::UnknownIndustry(s.to_string()))
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Audience segment codes offered by the brand form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    General,
    NewParents,
    HomeBuyers,
    HealthConscious,
    GiftGivers,
    Travelers,
    Newlyweds,
    Retirees,
}

impl TargetAudience {
    pub const ALL: [Self; 8] = [
        Self::General,
        Self::NewParents,
        Self::HomeBuyers,
        Self::HealthConscious,
        Self::GiftGivers,
        Self::Travelers,
        Self::Newlyweds,
        Self::Retirees,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::NewParents => "new_parents",
            Self::HomeBuyers => "home_buyers",
            Self::HealthConscious => "health_conscious",
            Self::GiftGivers => "gift_givers",
            Self::Travelers => "travelers",
            Self::Newlyweds => "newlyweds",
            Self::Retirees => "retirees",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General Consumers",
            Self::NewParents => "New Parents",
            Self::HomeBuyers => "New Home Buyers",
            Self::HealthConscious => "Health & Fitness Enthusiasts",
            Self::GiftGivers => "Gift Shoppers",
            Self::Travelers => "Travel Enthusiasts",
            Self::Newlyweds => "Newlyweds & Engaged Couples",
            Self::Retirees => "Recent Retirees",
        }
    }
}

impl FromStr for TargetAudience {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|audience| audience.code() == s)
            .ok_or_else(|| ProfileError::UnknownAudience(s.to_string()))
    }
}

impl fmt::Display for TargetAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeId {
    NewMoms,
    NewMovers,
    NewYear,
    GiftGuide,
    Travel,
    Newlyweds,
    Retirees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatId {
    Postcard,
    Cardalog,
    MiniCatalog,
}

/// Revenue-banded pricing offer. Serialized as the offer text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingTier {
    #[serde(rename = "$15,000 base + 5% revenue share")]
    Enterprise,
    #[serde(rename = "$8,000 base OR 10% revenue share")]
    Growth,
    #[serde(rename = "$3,000 base OR 15% revenue share")]
    Starter,
}

impl PricingTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enterprise => "$15,000 base + 5% revenue share",
            Self::Growth => "$8,000 base OR 10% revenue share",
            Self::Starter => "$3,000 base OR 15% revenue share",
        }
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub annual_revenue: f64,
    pub average_order_value: f64,
    pub industry: Industry,
    pub target_audience: TargetAudience,
    #[serde(default)]
    pub budget_constrained: bool,
    #[serde(default)]
    pub has_repeat_customers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub theme: ThemeId,
    pub format: FormatId,
    pub estimated_roas: f64,
    pub pricing_tier: PricingTier,
    pub audience_size: u32,
    pub notes: Vec<String>,
}
