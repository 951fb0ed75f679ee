use serde::Serialize;

use crate::types::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CampaignEstimate {
    pub audience_size: u32,
    pub cost_per_piece: f64,
    pub total_cost: u64,
}

impl Recommendation {
    pub fn theme_name(&self) -> &'static str {
        self.theme.name()
    }

    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    pub fn campaign_estimate(&self) -> CampaignEstimate {
        let cost_per_piece = self.format.option().cost_per_piece;
        let total = (f64::from(self.audience_size) * cost_per_piece).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total_cost = total.max(0.0) as u64;
        CampaignEstimate {
            audience_size: self.audience_size,
            cost_per_piece,
            total_cost,
        }
    }
}

/// Groups digits in threes: `200000` becomes `200,000`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_audience(size: u32) -> String {
    format_thousands(u64::from(size))
}

pub fn format_roas(roas: f64) -> String {
    format!("{roas}x")
}

/// Plain-text rendering of the results view.
pub fn render_report(rec: &Recommendation) -> String {
    let format = rec.format.option();
    let estimate = rec.campaign_estimate();
    let audience = format_audience(rec.audience_size);

    let mut out = format!(
        "Recommended Theme: {}\n\
         Recommended Format: {} ({})\n\
         Estimated ROAS: {}\n\
         Recommended Audience Size: {audience} households\n\
         Pricing Recommendation: {}\n",
        rec.theme_name(),
        format.name,
        format.description,
        format_roas(rec.estimated_roas),
        rec.pricing_tier,
    );
    if !rec.notes.is_empty() {
        out.push_str("Strategic Recommendations:\n");
        for note in &rec.notes {
            out.push_str("- ");
            out.push_str(note);
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "Base campaign cost: ${}\nBased on {audience} households at ${:.3} per piece",
        format_thousands(estimate.total_cost),
        estimate.cost_per_piece
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FormatId, PricingTier, ThemeId};

    fn recommendation(format: FormatId, audience_size: u32) -> Recommendation {
        Recommendation {
            theme: ThemeId::Travel,
            format,
            estimated_roas: 15.2,
            pricing_tier: PricingTier::Growth,
            audience_size,
            notes: vec!["Include a special offer".to_string()],
        }
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(200_000), "200,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn roas_keeps_shortest_form() {
        assert_eq!(format_roas(47.5), "47.5x");
        assert_eq!(format_roas(10.0), "10x");
        assert_eq!(format_roas(f64::NAN), "NaNx");
    }

    #[test]
    fn campaign_cost_is_audience_times_piece_cost() {
        let est = recommendation(FormatId::MiniCatalog, 200_000).campaign_estimate();
        assert_eq!(est.total_cost, 164_000);
        let est = recommendation(FormatId::Postcard, 50_000).campaign_estimate();
        assert_eq!(est.total_cost, 29_300);
    }

    #[test]
    fn report_without_notes_skips_recommendations_block() {
        let mut rec = recommendation(FormatId::Postcard, 50_000);
        rec.notes.clear();
        assert_eq!(
            render_report(&rec),
            "Recommended Theme: Travel & Adventure\n\
             Recommended Format: Postcard (Low budget, simple offer)\n\
             Estimated ROAS: 15.2x\n\
             Recommended Audience Size: 50,000 households\n\
             Pricing Recommendation: $8,000 base OR 10% revenue share\n\
             Base campaign cost: $29,300\n\
             Based on 50,000 households at $0.586 per piece"
        );
    }

    #[test]
    fn report_lists_every_section() {
        let report = render_report(&recommendation(FormatId::Cardalog, 100_000));
        assert!(report.contains("Recommended Theme: Travel & Adventure"));
        assert!(report.contains("Cardalog (Multiple products, lifestyle focus)"));
        assert!(report.contains("Estimated ROAS: 15.2x"));
        assert!(report.contains("100,000 households"));
        assert!(report.contains("$8,000 base OR 10% revenue share"));
        assert!(report.contains("- Include a special offer"));
        assert!(report.contains("Base campaign cost: $77,400"));
        assert!(report.ends_with("at $0.774 per piece"));
    }
}
