//! The twenty analysis steps.
//!
//! Every step reads the enriched [`Dataset`] and returns an [`AnalysisResult`]
//! holding tables, metrics and chart descriptions. Nothing here prints or
//! draws; presentation lives in [`crate::report`] and [`crate::chart`].

use crate::aggregate::{
    appearance_order, categorical_order, group_by, group_by_defined, rank_by, reindex_weekdays,
    weekday_key, Group, SortDirection,
};
use crate::chart::{ChartKind, ChartSpec, Series};
use crate::dataset::Dataset;
use crate::models::{weekday_name, EnrichedRecord};
use crate::stats::{mean, pearson, safe_ratio, BoxStats};
use crate::table::{Metric, Table};
use serde::Serialize;
use std::collections::BTreeMap;

/// Knobs shared by every step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Rows kept in ranking tables
    pub top_n: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

/// One output of a step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Artifact {
    /// A grouped aggregate, printed to the console
    Table(Table),
    /// A single number, printed to the console
    Metric(Metric),
    /// A chart, handed to the renderer
    Chart(ChartSpec),
}

/// Everything a step produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// 1-based step number
    pub step: u8,
    /// Stable identifier
    pub id: &'static str,
    /// Heading shown in the report
    pub title: &'static str,
    /// Outputs in presentation order
    pub artifacts: Vec<Artifact>,
}

impl AnalysisResult {
    /// Tables in this result
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Charts in this result
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Chart(c) => Some(c),
            _ => None,
        })
    }

    /// Metrics in this result
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Metric(m) => Some(m),
            _ => None,
        })
    }

    /// Table with the given slug
    #[must_use]
    pub fn table(&self, slug: &str) -> Option<&Table> {
        self.tables().find(|t| t.slug == slug)
    }

    /// Chart with the given slug
    #[must_use]
    pub fn chart(&self, slug: &str) -> Option<&ChartSpec> {
        self.charts().find(|c| c.slug == slug)
    }
}

/// The analysis catalogue, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Analysis {
    /// Records per day
    EngagementTrend,
    /// Clicks distribution per banner
    ClicksByBanner,
    /// Displays and clicks per placement
    PlacementReach,
    /// Cost against revenue
    CostVsRevenue,
    /// Mean revenue per click
    RevenuePerClick,
    /// Conversion rate per campaign
    CampaignConversionRate,
    /// Post-click sales per day
    SalesTrend,
    /// Engagement level distribution per banner
    EngagementByBanner,
    /// Conversion rate per placement
    PlacementConversionRate,
    /// Displays and clicks per month
    MonthlyReach,
    /// Engagement level against revenue
    EngagementVsRevenue,
    /// Cost, clicks and revenue spread
    MetricOutliers,
    /// ROI per banner and placement
    BannerPlacementRoi,
    /// ROI per campaign
    CampaignRoi,
    /// Conversions distribution per placement
    ConversionsByPlacement,
    /// Records per weekday
    WeekdayEngagement,
    /// CPC per campaign and per banner
    CpcDistribution,
    /// Cost per conversion per campaign
    CampaignCostPerConversion,
    /// Conversion rate per weekday
    WeekdayConversionRate,
    /// Conversions per engagement label
    EngagementConversions,
}

impl Analysis {
    /// Every step, in report order
    pub const ALL: [Self; 20] = [
        Self::EngagementTrend,
        Self::ClicksByBanner,
        Self::PlacementReach,
        Self::CostVsRevenue,
        Self::RevenuePerClick,
        Self::CampaignConversionRate,
        Self::SalesTrend,
        Self::EngagementByBanner,
        Self::PlacementConversionRate,
        Self::MonthlyReach,
        Self::EngagementVsRevenue,
        Self::MetricOutliers,
        Self::BannerPlacementRoi,
        Self::CampaignRoi,
        Self::ConversionsByPlacement,
        Self::WeekdayEngagement,
        Self::CpcDistribution,
        Self::CampaignCostPerConversion,
        Self::WeekdayConversionRate,
        Self::EngagementConversions,
    ];

    /// 1-based position in the report
    #[must_use]
    pub const fn step(self) -> u8 {
        self as u8 + 1
    }

    /// Stable identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::EngagementTrend => "engagement-trend",
            Self::ClicksByBanner => "clicks-by-banner",
            Self::PlacementReach => "placement-reach",
            Self::CostVsRevenue => "cost-vs-revenue",
            Self::RevenuePerClick => "revenue-per-click",
            Self::CampaignConversionRate => "campaign-conversion-rate",
            Self::SalesTrend => "sales-trend",
            Self::EngagementByBanner => "engagement-by-banner",
            Self::PlacementConversionRate => "placement-conversion-rate",
            Self::MonthlyReach => "monthly-reach",
            Self::EngagementVsRevenue => "engagement-vs-revenue",
            Self::MetricOutliers => "metric-outliers",
            Self::BannerPlacementRoi => "banner-placement-roi",
            Self::CampaignRoi => "campaign-roi",
            Self::ConversionsByPlacement => "conversions-by-placement",
            Self::WeekdayEngagement => "weekday-engagement",
            Self::CpcDistribution => "cpc-distribution",
            Self::CampaignCostPerConversion => "campaign-cost-per-conversion",
            Self::WeekdayConversionRate => "weekday-conversion-rate",
            Self::EngagementConversions => "engagement-conversions",
        }
    }

    /// Question the step answers
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::EngagementTrend => "Trend in user engagement",
            Self::ClicksByBanner => "Impact of banner size on clicks",
            Self::PlacementReach => "Placements with highest displays and clicks",
            Self::CostVsRevenue => "Correlation between cost and revenue",
            Self::RevenuePerClick => "Average revenue per click",
            Self::CampaignConversionRate => "Campaigns with highest post-click conversion rates",
            Self::SalesTrend => "Trends in post-click sales amounts over time",
            Self::EngagementByBanner => "User engagement variation across banner sizes",
            Self::PlacementConversionRate => "Placements with highest post-click conversion rates",
            Self::MonthlyReach => "Seasonal patterns in displays and clicks",
            Self::EngagementVsRevenue => "Correlation between user engagement and revenue",
            Self::MetricOutliers => "Outliers in cost, clicks, and revenue",
            Self::BannerPlacementRoi => "Campaign effectiveness based on ad size and placement",
            Self::CampaignRoi => "Best performing campaigns by ROI",
            Self::ConversionsByPlacement => "Distribution of post-click conversions across placements",
            Self::WeekdayEngagement => "User engagement differences between weekdays and weekends",
            Self::CpcDistribution => "Cost per click (CPC) variation across campaigns and banners",
            Self::CampaignCostPerConversion => "Cost-effective campaigns for post-click conversions",
            Self::WeekdayConversionRate => "Trends in post-click conversion rates by day of the week",
            Self::EngagementConversions => "Campaign effectiveness across user engagement types",
        }
    }

    /// Compute this step over the dataset.
    #[must_use]
    pub fn run(self, dataset: &Dataset, options: &AnalysisOptions) -> AnalysisResult {
        let top_n = options.top_n;
        let artifacts = match self {
            Self::EngagementTrend => engagement_trend(dataset),
            Self::ClicksByBanner => clicks_by_banner(dataset),
            Self::PlacementReach => placement_reach(dataset, top_n),
            Self::CostVsRevenue => cost_vs_revenue(dataset),
            Self::RevenuePerClick => revenue_per_click(dataset),
            Self::CampaignConversionRate => campaign_conversion_rate(dataset, top_n),
            Self::SalesTrend => sales_trend(dataset),
            Self::EngagementByBanner => engagement_by_banner(dataset),
            Self::PlacementConversionRate => placement_conversion_rate(dataset, top_n),
            Self::MonthlyReach => monthly_reach(dataset),
            Self::EngagementVsRevenue => engagement_vs_revenue(dataset),
            Self::MetricOutliers => metric_outliers(dataset),
            Self::BannerPlacementRoi => banner_placement_roi(dataset, top_n),
            Self::CampaignRoi => campaign_roi(dataset, top_n),
            Self::ConversionsByPlacement => conversions_by_placement(dataset),
            Self::WeekdayEngagement => weekday_engagement(dataset),
            Self::CpcDistribution => cpc_distribution(dataset),
            Self::CampaignCostPerConversion => campaign_cost_per_conversion(dataset, top_n),
            Self::WeekdayConversionRate => weekday_conversion_rate(dataset),
            Self::EngagementConversions => engagement_conversions(dataset),
        };

        AnalysisResult { step: self.step(), id: self.id(), title: self.title(), artifacts }
    }
}

/// Run every step in report order.
#[must_use]
pub fn run_all(dataset: &Dataset, options: &AnalysisOptions) -> Vec<AnalysisResult> {
    Analysis::ALL.iter().map(|a| a.run(dataset, options)).collect()
}

// ---------------------------------------------------------------------------
// Shared building blocks
// ---------------------------------------------------------------------------

type KeyedRow = (Vec<String>, Vec<Option<f64>>);

fn total<F>(rows: &Group<'_>, field: F) -> f64
where
    F: Fn(&EnrichedRecord) -> f64,
{
    rows.iter().map(|r| field(r)).sum()
}

fn ranked_table(
    (slug, title): (&str, &str),
    key_columns: &[&str],
    value_columns: &[&str],
    rows: Vec<KeyedRow>,
    sort_column: usize,
    direction: SortDirection,
    limit: usize,
) -> Table {
    let mut table = Table::new(
        slug,
        title,
        key_columns.iter().copied(),
        value_columns.iter().copied(),
    );
    for (keys, values) in rank_by(rows, |r| r.1[sort_column], direction, limit) {
        table.push(keys, values);
    }
    table
}

/// Box statistics per category, categories in chart order.
fn boxes_by<F, V>(dataset: &Dataset, key: F, value: V) -> Vec<BoxStats>
where
    F: Fn(&EnrichedRecord) -> String,
    V: Fn(&EnrichedRecord) -> Option<f64>,
{
    let order = categorical_order(appearance_order(dataset, &key));
    let groups = group_by(dataset, &key);
    order
        .into_iter()
        .filter_map(|label| {
            let rows = groups.get(&label)?;
            BoxStats::compute(label, rows.iter().copied().map(&value))
        })
        .collect()
}

fn box_chart(slug: &str, title: &str, x_label: &str, y_label: &str, boxes: Vec<BoxStats>) -> Artifact {
    Artifact::Chart(ChartSpec::new(slug, title, x_label, y_label, ChartKind::Box { boxes }))
}

/// Pairwise correlation matrix of two columns, the way a dataframe prints it.
fn correlation_table(slug: &str, names: [&str; 2], pairs: &[(Option<f64>, Option<f64>)]) -> Table {
    let r = pearson(pairs.iter().copied());
    let self_x = pearson(pairs.iter().map(|(x, _)| (*x, *x)));
    let self_y = pearson(pairs.iter().map(|(_, y)| (*y, *y)));

    let mut table = Table::new(slug, "Correlation matrix", [""], names);
    table.push(vec![names[0].to_string()], vec![self_x, r]);
    table.push(vec![names[1].to_string()], vec![r, self_y]);
    table
}

fn scatter(slug: &str, title: &str, x_label: &str, y_label: &str, pairs: &[(Option<f64>, Option<f64>)]) -> Artifact {
    let points = pairs.iter().filter_map(|(x, y)| Some(((*x)?, (*y)?))).collect();
    Artifact::Chart(ChartSpec::new(slug, title, x_label, y_label, ChartKind::Scatter { points }))
}

fn weekday_bar(slug: &str, title: &str, y_label: &str, by_day: &BTreeMap<u32, Option<f64>>) -> Artifact {
    let (categories, values) = reindex_weekdays(by_day)
        .into_iter()
        .map(|(day, v)| (weekday_name(day).to_string(), v))
        .unzip();
    Artifact::Chart(ChartSpec::new(slug, title, "weekday", y_label, ChartKind::Bar { categories, values }))
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn engagement_trend(dataset: &Dataset) -> Vec<Artifact> {
    let groups = group_by_defined(dataset, |r| r.date);
    let categories = groups.keys().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    let counts = groups.values().map(|rows| Some(rows.len() as f64)).collect();

    vec![Artifact::Chart(ChartSpec::new(
        "engagement-trend",
        "User Engagement Trend",
        "Date",
        "User Engagement Count",
        ChartKind::Line {
            categories,
            series: vec![Series { name: "user_engagement".into(), values: counts }],
        },
    ))]
}

fn clicks_by_banner(dataset: &Dataset) -> Vec<Artifact> {
    let boxes = boxes_by(dataset, |r| r.record.banner.clone(), |r| Some(r.record.clicks as f64));
    vec![box_chart("clicks-by-banner", "Effect of Banner Size on Clicks", "banner", "clicks", boxes)]
}

fn placement_reach(dataset: &Dataset, top_n: usize) -> Vec<Artifact> {
    let rows = group_by(dataset, |r| r.record.placement.clone())
        .into_iter()
        .map(|(placement, rows)| {
            let displays = total(&rows, |r| r.record.displays as f64);
            let clicks = total(&rows, |r| r.record.clicks as f64);
            (vec![placement], vec![Some(displays), Some(clicks)])
        })
        .collect();

    vec![Artifact::Table(ranked_table(
        ("placement-reach", "Placements by total displays"),
        &["placement"],
        &["displays", "clicks"],
        rows,
        0,
        SortDirection::Descending,
        top_n,
    ))]
}

fn cost_vs_revenue(dataset: &Dataset) -> Vec<Artifact> {
    let pairs: Vec<_> = dataset
        .iter()
        .map(|r| (Some(r.record.cost), Some(r.record.revenue)))
        .collect();
    vec![
        scatter("cost-vs-revenue", "Cost vs Revenue", "cost", "revenue", &pairs),
        Artifact::Table(correlation_table("cost-revenue-correlation", ["cost", "revenue"], &pairs)),
    ]
}

fn revenue_per_click(dataset: &Dataset) -> Vec<Artifact> {
    vec![Artifact::Metric(Metric {
        label: "Average Revenue per Click".into(),
        value: mean(dataset.iter().map(|r| r.revenue_per_click)),
        precision: 2,
    })]
}

fn mean_conversion_rate_by<F>(dataset: &Dataset, key: F) -> Vec<KeyedRow>
where
    F: Fn(&EnrichedRecord) -> String,
{
    group_by(dataset, key)
        .into_iter()
        .map(|(k, rows)| {
            let rate = mean(rows.iter().map(|r| r.post_click_conversion_rate));
            (vec![k], vec![rate])
        })
        .collect()
}

fn campaign_conversion_rate(dataset: &Dataset, top_n: usize) -> Vec<Artifact> {
    let rows = mean_conversion_rate_by(dataset, |r| r.record.campaign_number.clone());
    vec![Artifact::Table(ranked_table(
        ("campaign-conversion-rate", "Campaigns by mean post-click conversion rate"),
        &["campaign_number"],
        &["post_click_conversion_rate"],
        rows,
        0,
        SortDirection::Descending,
        top_n,
    ))]
}

fn sales_trend(dataset: &Dataset) -> Vec<Artifact> {
    let groups = group_by_defined(dataset, |r| r.date);
    let categories = groups.keys().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    let sales = groups
        .values()
        .map(|rows| Some(total(rows, |r| r.record.post_click_sales_amount)))
        .collect();

    vec![Artifact::Chart(ChartSpec::new(
        "sales-trend",
        "Post Click Sales Amount Over Time",
        "Date",
        "Sales Amount",
        ChartKind::Line {
            categories,
            series: vec![Series { name: "post_click_sales_amount".into(), values: sales }],
        },
    ))]
}

fn engagement_by_banner(dataset: &Dataset) -> Vec<Artifact> {
    let boxes = boxes_by(
        dataset,
        |r| r.record.banner.clone(),
        |r| r.user_engagement_num.map(f64::from),
    );
    vec![box_chart(
        "engagement-by-banner",
        "User Engagement by Banner Size",
        "banner",
        "user_engagement",
        boxes,
    )]
}

fn placement_conversion_rate(dataset: &Dataset, top_n: usize) -> Vec<Artifact> {
    let rows = mean_conversion_rate_by(dataset, |r| r.record.placement.clone());
    vec![Artifact::Table(ranked_table(
        ("placement-conversion-rate", "Placements by mean post-click conversion rate"),
        &["placement"],
        &["post_click_conversion_rate"],
        rows,
        0,
        SortDirection::Descending,
        top_n,
    ))]
}

fn monthly_reach(dataset: &Dataset) -> Vec<Artifact> {
    let groups = group_by_defined(dataset, |r| r.month_year);
    let categories = groups.keys().map(|d| d.format("%Y-%m").to_string()).collect();
    let displays = groups
        .values()
        .map(|rows| Some(total(rows, |r| r.record.displays as f64)))
        .collect();
    let clicks = groups
        .values()
        .map(|rows| Some(total(rows, |r| r.record.clicks as f64)))
        .collect();

    vec![Artifact::Chart(ChartSpec::new(
        "monthly-reach",
        "Monthly Displays and Clicks",
        "Month",
        "Count",
        ChartKind::Line {
            categories,
            series: vec![
                Series { name: "Displays".into(), values: displays },
                Series { name: "Clicks".into(), values: clicks },
            ],
        },
    ))]
}

fn engagement_vs_revenue(dataset: &Dataset) -> Vec<Artifact> {
    let pairs: Vec<_> = dataset
        .iter()
        .map(|r| (r.user_engagement_num.map(f64::from), Some(r.record.revenue)))
        .collect();
    vec![
        scatter(
            "engagement-vs-revenue",
            "User Engagement vs Revenue",
            "User Engagement (Numerical)",
            "revenue",
            &pairs,
        ),
        Artifact::Table(correlation_table(
            "engagement-revenue-correlation",
            ["user_engagement_num", "revenue"],
            &pairs,
        )),
    ]
}

fn metric_outliers(dataset: &Dataset) -> Vec<Artifact> {
    let columns: [(&str, fn(&EnrichedRecord) -> f64); 3] = [
        ("cost", |r| r.record.cost),
        ("clicks", |r| r.record.clicks as f64),
        ("revenue", |r| r.record.revenue),
    ];
    let boxes = columns
        .iter()
        .filter_map(|(name, field)| BoxStats::compute(*name, dataset.iter().map(|r| Some(field(r)))))
        .collect();
    vec![box_chart(
        "metric-outliers",
        "Outliers in Cost, Clicks, and Revenue",
        "metric",
        "value",
        boxes,
    )]
}

fn roi_row(keys: Vec<String>, rows: &Group<'_>) -> KeyedRow {
    let revenue = total(rows, |r| r.record.revenue);
    let cost = total(rows, |r| r.record.cost);
    (keys, vec![Some(revenue), Some(cost), safe_ratio(revenue, cost)])
}

fn banner_placement_roi(dataset: &Dataset, top_n: usize) -> Vec<Artifact> {
    let rows = group_by(dataset, |r| (r.record.banner.clone(), r.record.placement.clone()))
        .into_iter()
        .map(|((banner, placement), rows)| roi_row(vec![banner, placement], &rows))
        .collect();

    vec![Artifact::Table(ranked_table(
        ("banner-placement-roi", "Banner and placement combinations by ROI"),
        &["banner", "placement"],
        &["revenue", "cost", "ROI"],
        rows,
        2,
        SortDirection::Descending,
        top_n,
    ))]
}

fn campaign_roi(dataset: &Dataset, top_n: usize) -> Vec<Artifact> {
    let rows = group_by(dataset, |r| r.record.campaign_number.clone())
        .into_iter()
        .map(|(campaign, rows)| roi_row(vec![campaign], &rows))
        .collect();

    vec![Artifact::Table(ranked_table(
        ("campaign-roi", "Campaigns by ROI"),
        &["campaign_number"],
        &["revenue", "cost", "ROI"],
        rows,
        2,
        SortDirection::Descending,
        top_n,
    ))]
}

fn conversions_by_placement(dataset: &Dataset) -> Vec<Artifact> {
    let boxes = boxes_by(
        dataset,
        |r| r.record.placement.clone(),
        |r| Some(r.record.post_click_conversions as f64),
    );
    vec![box_chart(
        "conversions-by-placement",
        "Post Click Conversions by Placement",
        "placement",
        "post_click_conversions",
        boxes,
    )]
}

fn weekday_engagement(dataset: &Dataset) -> Vec<Artifact> {
    let counts: BTreeMap<u32, Option<f64>> = group_by_defined(dataset, weekday_key)
        .into_iter()
        .map(|(day, rows)| (day, Some(rows.len() as f64)))
        .collect();
    vec![weekday_bar(
        "weekday-engagement",
        "User Engagement on Weekdays vs Weekends",
        "User Engagement Count",
        &counts,
    )]
}

fn cpc_distribution(dataset: &Dataset) -> Vec<Artifact> {
    let by_campaign = boxes_by(dataset, |r| r.record.campaign_number.clone(), |r| r.cpc);
    let by_banner = boxes_by(dataset, |r| r.record.banner.clone(), |r| r.cpc);
    vec![
        box_chart(
            "cpc-by-campaign",
            "Cost per Click (CPC) by Campaign",
            "campaign_number",
            "CPC",
            by_campaign,
        ),
        box_chart("cpc-by-banner", "Cost per Click (CPC) by Banner Size", "banner", "CPC", by_banner),
    ]
}

fn campaign_cost_per_conversion(dataset: &Dataset, top_n: usize) -> Vec<Artifact> {
    let rows = group_by(dataset, |r| r.record.campaign_number.clone())
        .into_iter()
        .map(|(campaign, rows)| {
            let conversions = total(&rows, |r| r.record.post_click_conversions as f64);
            let cost = total(&rows, |r| r.record.cost);
            (
                vec![campaign],
                vec![Some(conversions), Some(cost), safe_ratio(cost, conversions)],
            )
        })
        .collect();

    vec![Artifact::Table(ranked_table(
        ("campaign-cost-per-conversion", "Campaigns by cost per conversion"),
        &["campaign_number"],
        &["post_click_conversions", "cost", "cost_per_conversion"],
        rows,
        2,
        SortDirection::Ascending,
        top_n,
    ))]
}

fn weekday_conversion_rate(dataset: &Dataset) -> Vec<Artifact> {
    let rates: BTreeMap<u32, Option<f64>> = group_by_defined(dataset, weekday_key)
        .into_iter()
        .map(|(day, rows)| (day, mean(rows.iter().map(|r| r.post_click_conversion_rate))))
        .collect();
    vec![weekday_bar(
        "weekday-conversion-rate",
        "Post Click Conversion Rate by Day of the Week",
        "Conversion Rate",
        &rates,
    )]
}

fn engagement_conversions(dataset: &Dataset) -> Vec<Artifact> {
    let (categories, values) = group_by(dataset, |r| r.record.user_engagement.clone())
        .into_iter()
        .map(|(label, rows)| (label, Some(total(&rows, |r| r.record.post_click_conversions as f64))))
        .unzip();

    vec![Artifact::Chart(ChartSpec::new(
        "engagement-conversions",
        "Post Click Conversions by User Engagement Type",
        "user_engagement",
        "Total Conversions",
        ChartKind::Bar { categories, values },
    ))]
}
