use serde::Serialize;

use crate::types::{FormatId, Industry, TargetAudience, ThemeId};

/// Historical performance of one mailer theme.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThemeProfile {
    pub id: ThemeId,
    pub name: &'static str,
    pub average_roas: f64,
    pub suited_industries: &'static [Industry],
    pub minimum_aov: f64,
}

impl ThemeProfile {
    pub fn suits(&self, industry: Industry) -> bool {
        self.suited_industries.contains(&industry)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormatOption {
    pub id: FormatId,
    pub name: &'static str,
    pub cost_per_piece: f64,
    pub minimum_audience: u32,
    pub description: &'static str,
}

/// Bonus for a theme built around the audience the brand targets.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AudienceAffinity {
    pub audience: TargetAudience,
    pub theme: ThemeId,
    pub bonus: f64,
}

static NEW_MOMS: ThemeProfile = ThemeProfile {
    id: ThemeId::NewMoms,
    name: "New Moms",
    average_roas: 47.5,
    suited_industries: &[Industry::Baby, Industry::Health],
    minimum_aov: 50.0,
};

static NEW_MOVERS: ThemeProfile = ThemeProfile {
    id: ThemeId::NewMovers,
    name: "New Movers",
    average_roas: 14.38,
    suited_industries: &[Industry::Home, Industry::Furniture, Industry::Decor],
    minimum_aov: 100.0,
};

static NEW_YEAR: ThemeProfile = ThemeProfile {
    id: ThemeId::NewYear,
    name: "New Year New You",
    average_roas: 11.15,
    suited_industries: &[Industry::Fitness, Industry::Health, Industry::Apparel],
    minimum_aov: 40.0,
};

static GIFT_GUIDE: ThemeProfile = ThemeProfile {
    id: ThemeId::GiftGuide,
    name: "Gift Guide",
    average_roas: 9.07,
    suited_industries: &[Industry::Apparel, Industry::Accessories, Industry::Luxury],
    minimum_aov: 60.0,
};

static TRAVEL: ThemeProfile = ThemeProfile {
    id: ThemeId::Travel,
    name: "Travel & Adventure",
    average_roas: 15.2,
    suited_industries: &[Industry::Travel, Industry::Outdoor],
    minimum_aov: 80.0,
};

static NEWLYWEDS: ThemeProfile = ThemeProfile {
    id: ThemeId::Newlyweds,
    name: "Newlyweds",
    average_roas: 18.5,
    suited_industries: &[Industry::Home, Industry::Registry, Industry::Luxury],
    minimum_aov: 120.0,
};

static RETIREES: ThemeProfile = ThemeProfile {
    id: ThemeId::Retirees,
    name: "Recent Retirees",
    average_roas: 12.8,
    suited_industries: &[Industry::Health, Industry::Travel, Industry::Luxury],
    minimum_aov: 100.0,
};

// Scoring walks this order; earlier entries win ties.
static THEMES: [&ThemeProfile; 7] = [
    &NEW_MOMS,
    &NEW_MOVERS,
    &NEW_YEAR,
    &GIFT_GUIDE,
    &TRAVEL,
    &NEWLYWEDS,
    &RETIREES,
];

static POSTCARD: FormatOption = FormatOption {
    id: FormatId::Postcard,
    name: "Postcard",
    cost_per_piece: 0.586,
    minimum_audience: 50_000,
    description: "Low budget, simple offer",
};

static CARDALOG: FormatOption = FormatOption {
    id: FormatId::Cardalog,
    name: "Cardalog",
    cost_per_piece: 0.774,
    minimum_audience: 50_000,
    description: "Multiple products, lifestyle focus",
};

static MINI_CATALOG: FormatOption = FormatOption {
    id: FormatId::MiniCatalog,
    name: "Mini Catalog",
    cost_per_piece: 0.82,
    minimum_audience: 50_000,
    description: "Premium brands, complex offers",
};

static FORMATS: [&FormatOption; 3] = [&POSTCARD, &CARDALOG, &MINI_CATALOG];

static AFFINITIES: [AudienceAffinity; 7] = [
    AudienceAffinity {
        audience: TargetAudience::NewParents,
        theme: ThemeId::NewMoms,
        bonus: 10.0,
    },
    AudienceAffinity {
        audience: TargetAudience::HomeBuyers,
        theme: ThemeId::NewMovers,
        bonus: 10.0,
    },
    AudienceAffinity {
        audience: TargetAudience::GiftGivers,
        theme: ThemeId::GiftGuide,
        bonus: 8.0,
    },
    AudienceAffinity {
        audience: TargetAudience::HealthConscious,
        theme: ThemeId::NewYear,
        bonus: 7.0,
    },
    AudienceAffinity {
        audience: TargetAudience::Travelers,
        theme: ThemeId::Travel,
        bonus: 10.0,
    },
    AudienceAffinity {
        audience: TargetAudience::Newlyweds,
        theme: ThemeId::Newlyweds,
        bonus: 10.0,
    },
    AudienceAffinity {
        audience: TargetAudience::Retirees,
        theme: ThemeId::Retirees,
        bonus: 10.0,
    },
];

pub fn themes() -> &'static [&'static ThemeProfile] {
    &THEMES
}

pub fn formats() -> &'static [&'static FormatOption] {
    &FORMATS
}

pub fn affinities() -> &'static [AudienceAffinity] {
    &AFFINITIES
}

/// Theme with the best historical ROAS.
pub fn top_theme() -> &'static ThemeProfile {
    THEMES
        .iter()
        .copied()
        .fold(&NEW_MOMS, |best, theme| {
            if theme.average_roas > best.average_roas {
                theme
            } else {
                best
            }
        })
}

impl ThemeId {
    pub fn profile(self) -> &'static ThemeProfile {
        match self {
            Self::NewMoms => &NEW_MOMS,
            Self::NewMovers => &NEW_MOVERS,
            Self::NewYear => &NEW_YEAR,
            Self::GiftGuide => &GIFT_GUIDE,
            Self::Travel => &TRAVEL,
            Self::Newlyweds => &NEWLYWEDS,
            Self::Retirees => &RETIREES,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl FormatId {
    pub fn option(self) -> &'static FormatOption {
        match self {
            Self::Postcard => &POSTCARD,
            Self::Cardalog => &CARDALOG,
            Self::MiniCatalog => &MINI_CATALOG,
        }
    }

    pub fn name(self) -> &'static str {
        self.option().name
    }
}
