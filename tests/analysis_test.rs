//! End-to-end tests for the analysis steps over small in-memory datasets

use ad_performance_eda::analysis::{run_all, Analysis, AnalysisOptions, AnalysisResult};
use ad_performance_eda::chart::ChartKind;
use ad_performance_eda::metrics::MetricsCollector;
use ad_performance_eda::runner::prepare_from_reader;
use ad_performance_eda::Dataset;

const HEADER: &str = "month,day,campaign_number,banner,placement,displays,clicks,cost,revenue,post_click_conversions,post_click_sales_amount,user_engagement";

/// Same campaign and placement on 2025-01-01 (a Wednesday); the second row has no clicks.
const TWO_ROWS: &str = "1,1,1,300x250,Top,100,10,5.0,20.0,2,50.0,High\n1,1,1,300x250,Top,50,0,2.0,0.0,0,0.0,Low\n";

/// Three campaigns with distinct ROI and cost per conversion; campaign 3 spent nothing.
const CAMPAIGNS: &str = "\
1,6,1,728x90,Top,200,20,10.0,30.0,2,80.0,High
1,7,2,728x90,Middle,300,25,10.0,50.0,1,40.0,Medium
1,8,3,160x600,Bottom,40,0,0.0,0.0,0,0.0,Low
";

fn dataset(rows: &str) -> Dataset {
    let csv = format!("{HEADER}\n{rows}");
    let mut metrics = MetricsCollector::default();
    prepare_from_reader(csv.as_bytes(), 2025, &mut metrics).unwrap().dataset
}

fn step(dataset: &Dataset, analysis: Analysis, top_n: usize) -> AnalysisResult {
    analysis.run(dataset, &AnalysisOptions { top_n })
}

#[test]
fn test_derived_ratios_undefined_for_zero_clicks() {
    let data = dataset(TWO_ROWS);
    let rpc: Vec<_> = data.iter().map(|r| r.revenue_per_click).collect();
    let rate: Vec<_> = data.iter().map(|r| r.post_click_conversion_rate).collect();
    let cpc: Vec<_> = data.iter().map(|r| r.cpc).collect();

    assert_eq!(rpc, vec![Some(2.0), None]);
    assert_eq!(rate, vec![Some(0.2), None]);
    assert_eq!(cpc, vec![Some(0.5), None]);
}

#[test]
fn test_placement_reach_sums_displays() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::PlacementReach, 5);
    let table = result.table("placement-reach").unwrap();

    assert_eq!(table.value(&["Top"], "displays"), Some(Some(150.0)));
    assert_eq!(table.value(&["Top"], "clicks"), Some(Some(10.0)));
}

#[test]
fn test_campaign_conversion_rate_skips_undefined() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::CampaignConversionRate, 5);
    let table = result.table("campaign-conversion-rate").unwrap();

    assert_eq!(table.value(&["1"], "post_click_conversion_rate"), Some(Some(0.2)));
}

#[test]
fn test_revenue_per_click_metric() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::RevenuePerClick, 5);
    let metric = result.metrics().next().unwrap();

    assert_eq!(metric.label, "Average Revenue per Click");
    assert_eq!(metric.value, Some(2.0));
}

#[test]
fn test_cost_revenue_correlation() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::CostVsRevenue, 5);
    let table = result.table("cost-revenue-correlation").unwrap();

    let r = table.value(&["cost"], "revenue").unwrap().unwrap();
    assert!((r - 1.0).abs() < 1e-12);
    let diagonal = table.value(&["revenue"], "revenue").unwrap().unwrap();
    assert!((diagonal - 1.0).abs() < 1e-12);

    match &result.chart("cost-vs-revenue").unwrap().kind {
        ChartKind::Scatter { points } => assert_eq!(points, &vec![(5.0, 20.0), (2.0, 0.0)]),
        other => panic!("unexpected chart kind: {other:?}"),
    }
}

#[test]
fn test_correlation_undefined_for_constant_column() {
    let data = dataset("1,1,1,300x250,Top,100,10,5.0,20.0,2,50.0,High\n1,2,1,300x250,Top,100,10,5.0,30.0,2,50.0,High\n");
    let result = step(&data, Analysis::CostVsRevenue, 5);
    let table = result.table("cost-revenue-correlation").unwrap();

    assert_eq!(table.value(&["cost"], "revenue"), Some(None));
}

#[test]
fn test_engagement_revenue_correlation_uses_ordinal_levels() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::EngagementVsRevenue, 5);
    let table = result.table("engagement-revenue-correlation").unwrap();

    let r = table.value(&["user_engagement_num"], "revenue").unwrap().unwrap();
    assert!((r - 1.0).abs() < 1e-12);
}

#[test]
fn test_campaign_roi_descending_with_undefined_last() {
    let data = dataset(CAMPAIGNS);
    let result = step(&data, Analysis::CampaignRoi, 5);
    let table = result.table("campaign-roi").unwrap();

    assert_eq!(table.first_keys(), vec!["2", "1", "3"]);
    assert_eq!(table.value(&["2"], "ROI"), Some(Some(5.0)));
    assert_eq!(table.value(&["3"], "ROI"), Some(None));
}

#[test]
fn test_campaign_roi_respects_top_n() {
    let data = dataset(CAMPAIGNS);
    let result = step(&data, Analysis::CampaignRoi, 2);

    assert_eq!(result.table("campaign-roi").unwrap().first_keys(), vec!["2", "1"]);
}

#[test]
fn test_cost_per_conversion_ascending_with_undefined_last() {
    let data = dataset(CAMPAIGNS);
    let result = step(&data, Analysis::CampaignCostPerConversion, 5);
    let table = result.table("campaign-cost-per-conversion").unwrap();

    assert_eq!(table.first_keys(), vec!["1", "2", "3"]);
    assert_eq!(table.value(&["1"], "cost_per_conversion"), Some(Some(5.0)));
    assert_eq!(table.value(&["2"], "cost_per_conversion"), Some(Some(10.0)));
}

#[test]
fn test_banner_placement_roi_keys_on_both_columns() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::BannerPlacementRoi, 5);
    let table = result.table("banner-placement-roi").unwrap();

    let roi = table.value(&["300x250", "Top"], "ROI").unwrap().unwrap();
    assert!((roi - 20.0 / 7.0).abs() < 1e-12);
}

#[test]
fn test_weekday_bar_covers_whole_week() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::WeekdayEngagement, 5);

    match &result.chart("weekday-engagement").unwrap().kind {
        ChartKind::Bar { categories, values } => {
            assert_eq!(
                categories,
                &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
            );
            assert_eq!(values, &vec![None, None, Some(2.0), None, None, None, None]);
        }
        other => panic!("unexpected chart kind: {other:?}"),
    }
}

#[test]
fn test_weekday_conversion_rate_skips_undefined() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::WeekdayConversionRate, 5);

    match &result.chart("weekday-conversion-rate").unwrap().kind {
        ChartKind::Bar { values, .. } => assert_eq!(values[2], Some(0.2)),
        other => panic!("unexpected chart kind: {other:?}"),
    }
}

#[test]
fn test_monthly_reach_has_two_series() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::MonthlyReach, 5);

    match &result.chart("monthly-reach").unwrap().kind {
        ChartKind::Line { categories, series } => {
            assert_eq!(categories, &["2025-01"]);
            let names: Vec<_> = series.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, ["Displays", "Clicks"]);
            assert_eq!(series[0].values, vec![Some(150.0)]);
            assert_eq!(series[1].values, vec![Some(10.0)]);
        }
        other => panic!("unexpected chart kind: {other:?}"),
    }
}

#[test]
fn test_trend_drops_undated_rows() {
    // February 30th does not exist
    let data = dataset("1,1,1,300x250,Top,100,10,5.0,20.0,2,50.0,High\n2,30,1,300x250,Top,100,10,5.0,20.0,2,50.0,High\n");
    let result = step(&data, Analysis::EngagementTrend, 5);

    match &result.chart("engagement-trend").unwrap().kind {
        ChartKind::Line { categories, series } => {
            assert_eq!(categories, &["2025-01-01"]);
            assert_eq!(series[0].values, vec![Some(1.0)]);
        }
        other => panic!("unexpected chart kind: {other:?}"),
    }
}

#[test]
fn test_engagement_conversions_sums_per_label() {
    let data = dataset(TWO_ROWS);
    let result = step(&data, Analysis::EngagementConversions, 5);

    match &result.chart("engagement-conversions").unwrap().kind {
        ChartKind::Bar { categories, values } => {
            assert_eq!(categories, &["High", "Low"]);
            assert_eq!(values, &vec![Some(2.0), Some(0.0)]);
        }
        other => panic!("unexpected chart kind: {other:?}"),
    }
}

#[test]
fn test_run_all_produces_every_step() {
    let data = dataset(CAMPAIGNS);
    let results = run_all(&data, &AnalysisOptions::default());

    assert_eq!(results.len(), 20);
    assert_eq!(results.iter().flat_map(AnalysisResult::tables).count(), 8);
    assert_eq!(results.iter().flat_map(AnalysisResult::charts).count(), 14);
    assert_eq!(results.iter().flat_map(AnalysisResult::metrics).count(), 1);
}

#[test]
fn test_revenue_proportional_to_cost_correlates_perfectly() {
    let data = dataset(
        "1,1,1,a,Top,10,1,1.0,4.0,0,0.0,Low\n1,2,1,a,Top,10,1,2.5,10.0,0,0.0,Low\n1,3,1,a,Top,10,1,7.0,28.0,0,0.0,Low\n",
    );
    let result = step(&data, Analysis::CostVsRevenue, 5);
    let r = result
        .table("cost-revenue-correlation")
        .and_then(|t| t.value(&["cost"], "revenue"))
        .flatten()
        .unwrap();

    assert!((r - 1.0).abs() < 1e-12);
}
