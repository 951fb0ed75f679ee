use crate::catalog::{affinities, themes, top_theme, ThemeProfile};
use crate::types::{
    BrandProfile, FormatId, PricingTier, Recommendation, TargetAudience, ThemeId,
};

pub const ENTERPRISE_REVENUE: f64 = 20_000_000.0;
pub const GROWTH_REVENUE: f64 = 5_000_000.0;
pub const PREMIUM_FORMAT_AOV: f64 = 150.0;

pub const PREMIUM_PLACEMENT_NOTE: &str =
    "Consider premium placement options for high-value products";
pub const FIRST_TIME_OFFER_NOTE: &str =
    "Include a special offer for first-time customers to drive new acquisition";
pub const MULTI_CAMPAIGN_NOTE: &str =
    "Your brand profile suggests high potential - consider multi-campaign commitment for best placements";

const INDUSTRY_MATCH_POINTS: f64 = 5.0;
const AOV_FLOOR_POINTS: f64 = 3.0;
const HIGH_AOV_BOOST: f64 = 1.3;
const LOW_AOV_PENALTY: f64 = 0.7;
const PREMIUM_PLACEMENT_AOV: f64 = 100.0;
const MULTI_CAMPAIGN_ROAS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeScore {
    pub theme: ThemeId,
    pub score: f64,
}

/// Builds the full mailer recommendation for one brand.
///
/// Non-finite revenue or AOV is not rejected here: every threshold comparison
/// against NaN is false, so such input lands on the lowest bands.
pub fn calculate_strategy(profile: &BrandProfile) -> Recommendation {
    let theme = select_theme(profile);
    let raw_roas = adjusted_roas(theme.profile(), profile.average_order_value);
    let estimated_roas = round_to_tenth(raw_roas);

    Recommendation {
        theme,
        format: select_format(profile),
        estimated_roas,
        pricing_tier: pricing_tier_for(profile.annual_revenue),
        audience_size: audience_size_for(profile.annual_revenue),
        notes: collect_notes(profile, theme, raw_roas),
    }
}

pub fn score_theme(profile: &BrandProfile, theme: &ThemeProfile) -> f64 {
    let mut score = 0.0;
    if theme.suits(profile.industry) {
        score += INDUSTRY_MATCH_POINTS;
    }
    if profile.average_order_value >= theme.minimum_aov {
        score += AOV_FLOOR_POINTS;
    }
    score += theme.average_roas / 10.0;
    score + affinity_bonus(profile.target_audience, theme.id)
}

pub fn affinity_bonus(audience: TargetAudience, theme: ThemeId) -> f64 {
    affinities()
        .iter()
        .find(|rule| rule.audience == audience && rule.theme == theme)
        .map_or(0.0, |rule| rule.bonus)
}

/// Scores every theme in table order.
pub fn rank_themes(profile: &BrandProfile) -> Vec<ThemeScore> {
    themes()
        .iter()
        .map(|theme| ThemeScore {
            theme: theme.id,
            score: score_theme(profile, theme),
        })
        .collect()
}

pub fn select_theme(profile: &BrandProfile) -> ThemeId {
    pick_best(rank_themes(profile)).theme
}

// A later entry must beat the current best strictly to replace it.
fn pick_best(scores: impl IntoIterator<Item = ThemeScore>) -> ThemeScore {
    let seed = ThemeScore {
        theme: ThemeId::NewMovers,
        score: 0.0,
    };
    scores.into_iter().fold(seed, |best, candidate| {
        if candidate.score > best.score {
            candidate
        } else {
            best
        }
    })
}

pub fn select_format(profile: &BrandProfile) -> FormatId {
    if profile.annual_revenue > ENTERPRISE_REVENUE
        || profile.average_order_value > PREMIUM_FORMAT_AOV
    {
        FormatId::MiniCatalog
    } else if profile.annual_revenue < GROWTH_REVENUE && profile.budget_constrained {
        FormatId::Postcard
    } else {
        FormatId::Cardalog
    }
}

/// Theme ROAS after the single AOV adjustment, before rounding.
pub fn adjusted_roas(theme: &ThemeProfile, average_order_value: f64) -> f64 {
    if average_order_value > theme.minimum_aov * 2.0 {
        theme.average_roas * HIGH_AOV_BOOST
    } else if average_order_value < theme.minimum_aov {
        theme.average_roas * LOW_AOV_PENALTY
    } else {
        theme.average_roas
    }
}

/// Rounds to one decimal place, halves going up.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

pub fn audience_size_for(annual_revenue: f64) -> u32 {
    if annual_revenue > ENTERPRISE_REVENUE {
        200_000
    } else if annual_revenue > GROWTH_REVENUE {
        100_000
    } else {
        50_000
    }
}

pub fn pricing_tier_for(annual_revenue: f64) -> PricingTier {
    if annual_revenue > ENTERPRISE_REVENUE {
        PricingTier::Enterprise
    } else if annual_revenue > GROWTH_REVENUE {
        PricingTier::Growth
    } else {
        PricingTier::Starter
    }
}

pub fn top_theme_note() -> String {
    let top = top_theme();
    format!(
        "{} is our highest performing segment with {}x average ROAS - highly recommended",
        top.name, top.average_roas
    )
}

fn collect_notes(profile: &BrandProfile, theme: ThemeId, raw_roas: f64) -> Vec<String> {
    let mut notes = Vec::new();
    if profile.average_order_value > PREMIUM_PLACEMENT_AOV {
        notes.push(PREMIUM_PLACEMENT_NOTE.to_string());
    }
    if profile.has_repeat_customers {
        notes.push(FIRST_TIME_OFFER_NOTE.to_string());
    }
    if raw_roas > MULTI_CAMPAIGN_ROAS {
        notes.push(MULTI_CAMPAIGN_NOTE.to_string());
    }
    if theme == top_theme().id {
        notes.push(top_theme_note());
    }
    notes
}
