//! Page composition and HTML output.
//!
//! A page is composed from scratch for every request, the same way the
//! whole dashboard is recomputed whenever the user touches a widget.

use std::collections::HashMap;
use std::fmt::Write;

use log::warn;
use polars::prelude::DataFrame;

use crate::charts::{build_section, importance_section, ChartKind, Section, SectionOutcome};
use crate::context::AppContext;
use crate::overview::{head, summary_statistics};
use crate::prediction::{predict, Prediction};
use crate::render::draw_figure;

pub const TITLE: &str = "Air Quality Monitoring & AQI Bucket Prediction";

/// Widget state carried by one run.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub show_stats: bool,
    pub submit: bool,
    pub values: HashMap<String, String>,
}

impl PageRequest {
    /// Reads the query string of a `GET /`: `stats` and `predict` are the
    /// checkbox and button, every other key is a feature field.
    pub fn from_query(mut query: HashMap<String, String>) -> Self {
        let show_stats = query.remove("stats").map_or(false, |v| v != "off");
        let submit = query.remove("predict").is_some();
        PageRequest {
            show_stats,
            submit,
            values: query,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Predicted(Prediction),
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub head: DataFrame,
    pub statistics: Option<Result<DataFrame, String>>,
    pub leading: Vec<Section>,
    pub importance: Section,
    pub more: Vec<Section>,
    pub form: Vec<FormField>,
    pub prediction: Option<PredictionOutcome>,
    pub show_stats: bool,
}

impl DashboardPage {
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.leading
            .iter()
            .chain(std::iter::once(&self.importance))
            .chain(self.more.iter())
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections().find(|s| s.title == title)
    }
}

pub fn compose_page(ctx: &AppContext, request: &PageRequest) -> DashboardPage {
    let df = &ctx.dataset;
    let statistics = request
        .show_stats
        .then(|| summary_statistics(df).map_err(|e| e.to_string()));

    let form = ctx
        .schema
        .features()
        .iter()
        .map(|f| FormField {
            name: f.name.clone(),
            value: request
                .values
                .get(&f.name)
                .cloned()
                .unwrap_or_else(|| f.default.to_string()),
        })
        .collect();

    let prediction = request.submit.then(|| {
        match ctx
            .schema
            .vector_from_form(&request.values)
            .and_then(|input| predict(&*ctx.model, &input))
        {
            Ok(prediction) => PredictionOutcome::Predicted(prediction),
            Err(e) => {
                warn!("prediction rejected: {}", e);
                PredictionOutcome::Rejected(e.to_string())
            }
        }
    });

    DashboardPage {
        head: head(df),
        statistics,
        leading: ChartKind::LEADING.iter().map(|k| build_section(*k, df)).collect(),
        importance: importance_section(&*ctx.model, &ctx.schema),
        more: ChartKind::MORE.iter().map(|k| build_section(*k, df)).collect(),
        form,
        prediction,
        show_stats: request.show_stats,
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;max-width:1100px;margin:auto;padding:1rem}\
pre{background:#f6f6f6;padding:.5rem;overflow-x:auto}\
.warning{background:#fff4d6;border-left:4px solid #f0ad00;padding:.5rem}\
.success{background:#e3f6e8;border-left:4px solid #21a349;padding:.5rem}\
.fields{display:grid;grid-template-columns:repeat(3,1fr);gap:.4rem}\
label{display:flex;flex-direction:column;font-size:.85rem}";

fn write_section(out: &mut String, section: &Section) -> std::fmt::Result {
    writeln!(out, "<section><h3>{}</h3>", escape(&section.title))?;
    match &section.outcome {
        SectionOutcome::Figure(figure) => match draw_figure(figure) {
            Ok(svg) => writeln!(out, "<div class=\"figure\">{}</div>", svg)?,
            Err(e) => {
                warn!("{}: {}", section.title, e);
                writeln!(out, "<div class=\"warning\">{}</div>", escape(&e.to_string()))?
            }
        },
        SectionOutcome::Warning(message) => {
            writeln!(out, "<div class=\"warning\">{}</div>", escape(message))?
        }
    }
    writeln!(out, "</section>")
}

fn write_page(out: &mut String, page: &DashboardPage) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{}</title>", escape(TITLE))?;
    writeln!(out, "<style>{}</style></head><body>", STYLE)?;
    writeln!(out, "<h1>{}</h1>", escape(TITLE))?;
    writeln!(out, "<form method=\"get\" action=\"/\">")?;

    writeln!(out, "<h2>Dataset Overview</h2>")?;
    writeln!(out, "<pre>{}</pre>", escape(&page.head.to_string()))?;
    writeln!(
        out,
        "<label><span><input type=\"checkbox\" name=\"stats\" onchange=\"this.form.submit()\"{}> Show Summary Statistics</span></label>",
        if page.show_stats { " checked" } else { "" }
    )?;
    match &page.statistics {
        Some(Ok(stats)) => writeln!(out, "<pre>{}</pre>", escape(&stats.to_string()))?,
        Some(Err(e)) => writeln!(out, "<div class=\"warning\">{}</div>", escape(e))?,
        None => {}
    }

    for section in &page.leading {
        write_section(out, section)?;
    }
    write_section(out, &page.importance)?;

    writeln!(out, "<h2>More Visualizations</h2>")?;
    for section in &page.more {
        write_section(out, section)?;
    }

    writeln!(out, "<h2>Predict AQI Category</h2>")?;
    writeln!(
        out,
        "<h4>Adjust values if needed, or use the defaults to test a prediction:</h4>"
    )?;
    writeln!(out, "<div class=\"fields\">")?;
    for field in &page.form {
        let name = escape(&field.name);
        writeln!(
            out,
            "<label>{}<input type=\"number\" step=\"any\" name=\"{}\" value=\"{}\"></label>",
            name,
            name,
            escape(&field.value)
        )?;
    }
    writeln!(out, "</div>")?;
    writeln!(
        out,
        "<p><button type=\"submit\" name=\"predict\" value=\"1\">Predict AQI Bucket</button></p>"
    )?;
    match &page.prediction {
        Some(PredictionOutcome::Predicted(p)) => writeln!(
            out,
            "<div class=\"success\">✅ Predicted AQI Bucket: <strong>{} - {}</strong></div>",
            p.code,
            escape(p.label)
        )?,
        Some(PredictionOutcome::Rejected(reason)) => {
            writeln!(out, "<div class=\"warning\">{}</div>", escape(reason))?
        }
        None => {}
    }
    writeln!(out, "</form></body></html>")
}

pub fn render_html(page: &DashboardPage) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_page(&mut out, page);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_flags_are_split_from_feature_values() {
        let mut query = HashMap::new();
        query.insert("stats".to_string(), "on".to_string());
        query.insert("predict".to_string(), "1".to_string());
        query.insert("AQI".to_string(), "210".to_string());
        let request = PageRequest::from_query(query);
        assert!(request.show_stats);
        assert!(request.submit);
        assert_eq!(request.values.len(), 1);
        assert_eq!(request.values["AQI"], "210");

        let idle = PageRequest::from_query(HashMap::new());
        assert!(!idle.show_stats && !idle.submit);
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
