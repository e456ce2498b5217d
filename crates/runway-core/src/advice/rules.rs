//! Baseline advice rules

use crate::config::AdviceConfig;
use crate::models::{
    AdviceCategory, AdviceItem, DaysUntil, DerivedMetrics, ExpenseRecord, ItemType, Profile,
    RiskLevel, Severity,
};
use crate::projection::safe_limit::is_weekend;

/// Inputs visible to every rule
pub struct RuleContext<'a> {
    pub profile: &'a Profile,
    pub metrics: &'a DerivedMetrics,
    pub records: &'a [ExpenseRecord],
    pub config: &'a AdviceConfig,
}

impl<'a> RuleContext<'a> {
    /// Purchase count and total cost for one item category
    pub fn category_summary(&self, item_type: &ItemType) -> (usize, f64) {
        self.records
            .iter()
            .filter(|r| &r.item_type == item_type)
            .fold((0, 0.0), |(count, total), r| (count + 1, total + r.cost))
    }

    /// Rate the exhaustion forecast was computed with
    fn forecast_rate(&self) -> f64 {
        if self.metrics.burn_rate_7d == 0.0 {
            self.metrics.burn_rate_overall
        } else {
            self.metrics.burn_rate_7d
        }
    }
}

/// One row of the rule table
#[derive(Clone, Copy)]
pub struct AdviceRule {
    pub id: &'static str,
    pub title: &'static str,
    pub severity: Severity,
    pub category: AdviceCategory,
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub message: fn(&RuleContext<'_>) -> String,
}

impl AdviceRule {
    /// Build an item if the rule fires
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<AdviceItem> {
        if !(self.applies)(ctx) {
            return None;
        }
        Some(AdviceItem {
            id: self.id.to_string(),
            title: self.title.to_string(),
            message: (self.message)(ctx),
            severity: self.severity,
            category: self.category,
        })
    }
}

impl std::fmt::Debug for AdviceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdviceRule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("category", &self.category)
            .finish()
    }
}

pub const BASELINE_RULES: &[AdviceRule] = &[
    AdviceRule {
        id: "on-track",
        title: "On track",
        severity: Severity::Low,
        category: AdviceCategory::Budget,
        applies: on_track_applies,
        message: on_track_message,
    },
    AdviceRule {
        id: "early-overspending",
        title: "Spending ahead of schedule",
        severity: Severity::High,
        category: AdviceCategory::Budget,
        applies: early_overspending_applies,
        message: early_overspending_message,
    },
    AdviceRule {
        id: "exhaustion-warning",
        title: "Credits will run out early",
        severity: Severity::High,
        category: AdviceCategory::Forecast,
        applies: exhaustion_warning_applies,
        message: exhaustion_warning_message,
    },
    AdviceRule {
        id: "frequent-premium",
        title: "Frequent premium purchases",
        severity: Severity::Medium,
        category: AdviceCategory::Habits,
        applies: frequent_premium_applies,
        message: frequent_premium_message,
    },
    AdviceRule {
        id: "indulgence-overspend",
        title: "Treats are adding up",
        severity: Severity::Medium,
        category: AdviceCategory::Habits,
        applies: indulgence_overspend_applies,
        message: indulgence_overspend_message,
    },
    AdviceRule {
        id: "daily-limit-exceeded",
        title: "Daily limit exceeded",
        severity: Severity::High,
        category: AdviceCategory::Daily,
        applies: daily_limit_exceeded_applies,
        message: daily_limit_exceeded_message,
    },
    AdviceRule {
        id: "weekend-boost-tip",
        title: "Try weekend boost",
        severity: Severity::Low,
        category: AdviceCategory::Tips,
        applies: weekend_boost_tip_applies,
        message: weekend_boost_tip_message,
    },
    AdviceRule {
        id: "surplus-projection",
        title: "Projected surplus",
        severity: Severity::Low,
        category: AdviceCategory::Forecast,
        applies: surplus_projection_applies,
        message: surplus_projection_message,
    },
    AdviceRule {
        id: "critical-balance",
        title: "Critical balance",
        severity: Severity::High,
        category: AdviceCategory::Alert,
        applies: critical_balance_applies,
        message: critical_balance_message,
    },
];

const EARLY_PERIOD_FRACTION: f64 = 0.5;
const EARLY_OVERSPEND_MARGIN: f64 = 0.1;
const WEEKEND_TIP_HEADROOM: f64 = 0.8;
const MIN_RECORDS_ON_TRACK: usize = 3;
const MIN_RECORDS_SURPLUS: usize = 5;
const SURPLUS_SHARE: f64 = 0.1;

fn on_track_applies(ctx: &RuleContext<'_>) -> bool {
    ctx.metrics.risk_level == RiskLevel::Safe && ctx.metrics.record_count >= MIN_RECORDS_ON_TRACK
}

fn on_track_message(ctx: &RuleContext<'_>) -> String {
    let projected = ctx.metrics.surplus_or_deficit;
    if projected >= 0.0 {
        format!(
            "Your spending is on pace. At this rate you will finish the period with about {:.0} credits to spare.",
            projected
        )
    } else {
        format!(
            "Your spending is on pace for now, but at this rate you will be about {:.0} credits short by the end of the period.",
            -projected
        )
    }
}

fn early_overspending_applies(ctx: &RuleContext<'_>) -> bool {
    let m = ctx.metrics;
    m.time_elapsed_ratio <= EARLY_PERIOD_FRACTION
        && m.credits_used_ratio > m.time_elapsed_ratio + EARLY_OVERSPEND_MARGIN
}

fn early_overspending_message(ctx: &RuleContext<'_>) -> String {
    let m = ctx.metrics;
    format!(
        "You have used {:.0}% of your credits in the first {:.0}% of the period. Cut back to about {:.0} per day to get back on pace.",
        m.credits_used_ratio * 100.0,
        m.time_elapsed_ratio * 100.0,
        m.target_burn_rate
    )
}

fn exhaustion_warning_applies(ctx: &RuleContext<'_>) -> bool {
    match ctx.metrics.exhaustion.days_until {
        DaysUntil::Finite(days) => days < ctx.metrics.remaining_days,
        DaysUntil::Never => false,
    }
}

fn exhaustion_warning_message(ctx: &RuleContext<'_>) -> String {
    let m = ctx.metrics;
    let days = m.exhaustion.days_until.finite().unwrap_or(0);
    let shortfall = m.remaining_days.saturating_sub(days);
    let required = if m.remaining_days > 0 {
        m.remaining_credits / f64::from(m.remaining_days)
    } else {
        0.0
    };
    let when = m
        .exhaustion
        .date
        .map(|d| format!(" (around {})", d.format("%b %-d")))
        .unwrap_or_default();
    format!(
        "At {:.0} per day your credits run out in {} days{}, {} days before the period ends. Keep spending under {:.0} per day to make it last.",
        ctx.forecast_rate(),
        days,
        when,
        shortfall,
        required
    )
}

fn frequent_premium_applies(ctx: &RuleContext<'_>) -> bool {
    let (count, _) = ctx.category_summary(&ctx.config.premium_item_type);
    count >= ctx.config.premium_min_purchases
}

fn frequent_premium_message(ctx: &RuleContext<'_>) -> String {
    let item = &ctx.config.premium_item_type;
    let (count, total) = ctx.category_summary(item);
    let saving = total * ctx.config.substitution_saving_ratio;
    format!(
        "You bought {} {} times this period for {:.0} credits. Switching to a cheaper option could save about {:.0}.",
        item, count, total, saving
    )
}

fn indulgence_overspend_applies(ctx: &RuleContext<'_>) -> bool {
    let (_, total) = ctx.category_summary(&ctx.config.indulgence_item_type);
    total > ctx.profile.monthly_credits * ctx.config.indulgence_share
}

fn indulgence_overspend_message(ctx: &RuleContext<'_>) -> String {
    let item = &ctx.config.indulgence_item_type;
    let (_, total) = ctx.category_summary(item);
    let share = if ctx.profile.monthly_credits > 0.0 {
        total / ctx.profile.monthly_credits * 100.0
    } else {
        0.0
    };
    format!(
        "{} purchases total {:.0} credits, {:.1}% of your allowance.",
        capitalize(item.as_str()),
        total,
        share
    )
}

fn daily_limit_exceeded_applies(ctx: &RuleContext<'_>) -> bool {
    let m = ctx.metrics;
    m.daily_safe_limit > 0.0 && m.today_spend > m.daily_safe_limit
}

fn daily_limit_exceeded_message(ctx: &RuleContext<'_>) -> String {
    let m = ctx.metrics;
    format!(
        "You have spent {:.0} today, {:.0} over today's safe limit of {:.0}.",
        m.today_spend,
        m.today_spend - m.daily_safe_limit,
        m.daily_safe_limit
    )
}

fn weekend_boost_tip_applies(ctx: &RuleContext<'_>) -> bool {
    let m = ctx.metrics;
    !ctx.profile.preferences.weekend_boost
        && !is_weekend(m.computed_for)
        && m.today_spend < m.daily_safe_limit * WEEKEND_TIP_HEADROOM
}

fn weekend_boost_tip_message(_ctx: &RuleContext<'_>) -> String {
    "You are comfortably under today's limit. Turn on weekend boost to allow a little more on Saturdays and Sundays.".to_string()
}

fn surplus_projection_applies(ctx: &RuleContext<'_>) -> bool {
    ctx.metrics.surplus_or_deficit > ctx.profile.monthly_credits * SURPLUS_SHARE
        && ctx.metrics.record_count >= MIN_RECORDS_SURPLUS
}

fn surplus_projection_message(ctx: &RuleContext<'_>) -> String {
    let surplus = ctx.metrics.surplus_or_deficit;
    format!(
        "You are projected to finish with {:.0} credits left over ({:.0}% of your allowance).",
        surplus,
        surplus / ctx.profile.monthly_credits * 100.0
    )
}

fn critical_balance_applies(ctx: &RuleContext<'_>) -> bool {
    ctx.metrics.risk_level == RiskLevel::Danger
        && ctx.metrics.remaining_credits < ctx.config.critical_balance_floor
}

fn critical_balance_message(ctx: &RuleContext<'_>) -> String {
    format!(
        "Only {:.0} credits left. Keep cash or another payment method ready for the rest of the period.",
        ctx.metrics.remaining_credits
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
