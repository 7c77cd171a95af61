//! HTML rendering for the dashboard page.
//!
//! Straight-line `format!` templating. Every piece of text that came from
//! the request or from upstream data goes through [`escape_html`].

use crime_dashboard_analytics_models::{ALL_SENTINEL, CategoryCount, TimeBreakdown};
use crime_dashboard_incident_models::DerivedIncident;
use crime_dashboard_map::{RenderedMap, escape_html};
use crime_dashboard_server_models::DashboardQueryParams;

use crate::dashboard::DashboardView;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Inputs to [`render_page`].
pub struct PageContext<'a> {
    /// Page heading.
    pub title: &'a str,
    /// The request's raw parameters, echoed back into the form.
    pub params: &'a DashboardQueryParams,
    /// Filtered and aggregated data.
    pub view: &'a DashboardView<'a>,
    /// Map fragment or placeholder.
    pub map: &'a RenderedMap,
    /// Maximum incident rows in the table.
    pub max_table_rows: usize,
}

/// Renders the full dashboard page.
#[must_use]
pub fn render_page(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<h1>{title}</h1>
{form}
<section class="map">
{map}
</section>
<section class="stats">
{top}
{breakdown}
</section>
{incidents}
</body>
</html>"#,
        title = escape_html(ctx.title),
        css = PAGE_CSS,
        form = render_filter_form(ctx.params, &ctx.view.categories, &ctx.view.wards),
        map = ctx.map.html(),
        top = render_top_categories(&ctx.view.top_categories),
        breakdown = render_time_breakdown(&ctx.view.time_breakdown),
        incidents = render_incident_table(&ctx.view.filtered, ctx.max_table_rows),
    )
}

const PAGE_CSS: &str = "\
body { font-family: system-ui, sans-serif; margin: 1.5rem; color: #1f2937; }
form.filters { display: flex; flex-wrap: wrap; gap: 1rem; align-items: end; margin-bottom: 1rem; }
form.filters label { display: flex; flex-direction: column; font-size: 0.9rem; }
section.stats { display: flex; flex-wrap: wrap; gap: 2rem; margin: 1.5rem 0; }
table { border-collapse: collapse; }
th, td { border: 1px solid #d1d5db; padding: 0.25rem 0.6rem; text-align: left; }
td.num { text-align: right; }
p.note { color: #6b7280; }
";

fn selected_value(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ALL_SENTINEL)
}

fn render_select(name: &str, label: &str, options: &[String], current: Option<&str>) -> String {
    let current = selected_value(current);
    let items: String = std::iter::once(ALL_SENTINEL)
        .chain(options.iter().map(String::as_str))
        .map(|option| {
            let selected = if option == current { " selected" } else { "" };
            let option = escape_html(option);
            format!(r#"<option value="{option}"{selected}>{option}</option>"#)
        })
        .collect();

    format!(r#"<label>{label}<select name="{name}">{items}</select></label>"#)
}

fn render_date_input(name: &str, label: &str, current: Option<&str>) -> String {
    let value = escape_html(current.unwrap_or_default());
    format!(r#"<label>{label}<input type="date" name="{name}" value="{value}"></label>"#)
}

/// Filter form with the current selections preserved.
#[must_use]
pub fn render_filter_form(
    params: &DashboardQueryParams,
    categories: &[String],
    wards: &[String],
) -> String {
    format!(
        r#"<form class="filters" method="get" action="/">
{primary_type}
{ward}
{date_from}
{date_to}
<button type="submit">Filter</button>
</form>"#,
        primary_type = render_select(
            "primary_type",
            "Crime type",
            categories,
            params.primary_type.as_deref()
        ),
        ward = render_select("ward", "Ward", wards, params.ward.as_deref()),
        date_from = render_date_input("date_from", "From", params.date_from.as_deref()),
        date_to = render_date_input("date_to", "To", params.date_to.as_deref()),
    )
}

fn render_top_categories(ranking: &[CategoryCount]) -> String {
    if ranking.is_empty() {
        return "<div><h2>Top crime types</h2><p class=\"note\">No incidents match the filters.</p></div>"
            .to_string();
    }

    let rows: String = ranking
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            format!(
                r#"<tr><td class="num">{}</td><td>{}</td><td class="num">{}</td></tr>"#,
                rank + 1,
                escape_html(&entry.category),
                entry.count
            )
        })
        .collect();

    format!(
        "<div><h2>Top crime types</h2><table><thead><tr><th>#</th><th>Type</th><th>Count</th></tr></thead><tbody>{rows}</tbody></table></div>"
    )
}

fn render_time_breakdown(breakdown: &TimeBreakdown) -> String {
    let weekday_rows: String = WEEKDAYS
        .iter()
        .zip(breakdown.by_day_of_week)
        .map(|(name, count)| format!(r#"<tr><td>{name}</td><td class="num">{count}</td></tr>"#))
        .collect();

    let hour_rows: String = breakdown
        .by_hour
        .iter()
        .enumerate()
        .map(|(hour, count)| {
            format!(r#"<tr><td>{hour:02}:00</td><td class="num">{count}</td></tr>"#)
        })
        .collect();

    format!(
        r#"<div><h2>By day of week</h2><table><tbody>{weekday_rows}</tbody></table>
<p class="note">Weekend: {weekend} &middot; Weekday: {weekday}</p></div>
<div><h2>By hour</h2><table><tbody>{hour_rows}</tbody></table></div>"#,
        weekend = breakdown.weekend,
        weekday = breakdown.weekday,
    )
}

fn optional_cell(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_default()
}

fn coordinate_cell(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{v:.5}"))
        .unwrap_or_default()
}

/// Table of filtered incidents, truncated to `max_rows`.
#[must_use]
pub fn render_incident_table(records: &[&DerivedIncident], max_rows: usize) -> String {
    let shown = records.len().min(max_rows);

    let rows: String = records
        .iter()
        .take(max_rows)
        .map(|record| {
            let incident = &record.incident;
            format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                optional_cell(incident.id.as_deref()),
                incident.occurred_at.format(TIMESTAMP_FORMAT),
                optional_cell(incident.primary_description.as_deref()),
                optional_cell(incident.ward.as_deref()),
                coordinate_cell(incident.latitude),
                coordinate_cell(incident.longitude),
            )
        })
        .collect();

    format!(
        r#"<section class="incidents"><h2>Incidents</h2>
<p class="note">Showing {shown} of {total} incidents</p>
<table><thead><tr><th>Case</th><th>Date</th><th>Type</th><th>Ward</th><th>Latitude</th><th>Longitude</th></tr></thead>
<tbody>{rows}</tbody></table></section>"#,
        total = records.len(),
    )
}

#[cfg(test)]
mod tests {
    use crime_dashboard_incident_models::{Incident, RawIncident};

    use super::*;

    fn record(id: &str, category: &str) -> DerivedIncident {
        DerivedIncident::from(
            Incident::try_from(RawIncident {
                id: Some(id.to_string()),
                date_of_occurrence: Some("2024-01-01T08:30:00".to_string()),
                primary_description: Some(category.to_string()),
                ward: Some("5".to_string()),
                latitude: Some(41.88),
                longitude: None,
            })
            .unwrap(),
        )
    }

    #[test]
    fn form_preserves_selections() {
        let params = DashboardQueryParams {
            primary_type: Some("THEFT".to_string()),
            ward: None,
            date_from: Some("2024-01-01".to_string()),
            date_to: None,
        };
        let html = render_filter_form(
            &params,
            &["BATTERY".to_string(), "THEFT".to_string()],
            &["5".to_string()],
        );

        assert!(html.contains(r#"<option value="THEFT" selected>THEFT</option>"#));
        assert!(html.contains(r#"<option value="BATTERY">BATTERY</option>"#));
        assert!(html.contains(r#"<option value="All" selected>All</option>"#));
        assert!(html.contains(r#"name="date_from" value="2024-01-01""#));
        assert!(html.contains(r#"name="date_to" value="""#));
    }

    #[test]
    fn form_escapes_echoed_input() {
        let params = DashboardQueryParams {
            date_from: Some(r#""><script>alert(1)</script>"#.to_string()),
            ..DashboardQueryParams::default()
        };
        let html = render_filter_form(&params, &[], &[]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn incident_table_is_capped() {
        let records: Vec<_> = (0..5).map(|i| record(&format!("JA{i}"), "THEFT")).collect();
        let refs: Vec<_> = records.iter().collect();

        let html = render_incident_table(&refs, 2);

        assert!(html.contains("Showing 2 of 5 incidents"));
        assert!(html.contains("<td>JA1</td>"));
        assert!(!html.contains("<td>JA2</td>"));
        assert!(html.contains("2024-01-01 08:30"));
    }

    #[test]
    fn incident_table_escapes_upstream_text() {
        let records = [record("JA1", "<b>THEFT</b>")];
        let refs: Vec<_> = records.iter().collect();

        let html = render_incident_table(&refs, 10);

        assert!(html.contains("&lt;b&gt;THEFT&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn empty_ranking_shows_note() {
        assert!(render_top_categories(&[]).contains("No incidents match the filters."));
    }

    #[test]
    fn ranking_rows_are_numbered_in_order() {
        let ranking = [
            CategoryCount {
                category: "THEFT".to_string(),
                count: 7,
            },
            CategoryCount {
                category: "BATTERY".to_string(),
                count: 3,
            },
        ];
        let html = render_top_categories(&ranking);

        let theft = html
            .find(r#"<td class="num">1</td><td>THEFT</td><td class="num">7</td>"#)
            .unwrap();
        let battery = html
            .find(r#"<td class="num">2</td><td>BATTERY</td><td class="num">3</td>"#)
            .unwrap();
        assert!(theft < battery);
    }

    #[test]
    fn breakdown_lists_every_weekday_and_hour() {
        let html = render_time_breakdown(&TimeBreakdown::default());
        for day in WEEKDAYS {
            assert!(html.contains(day));
        }
        assert!(html.contains("<td>00:00</td>"));
        assert!(html.contains("<td>23:00</td>"));
    }
}
