//! plotly.js Sankey figure model
//!
//! Mirrors the subset of the plotly figure schema used by a single Sankey
//! trace, so the figure can be serialized straight into a page or a file.

use crate::core::report::SankeyDiagram;
use serde::Serialize;

/// A complete plotly figure: one Sankey trace plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotlyFigure {
    /// Traces (always exactly one Sankey trace)
    pub data: Vec<SankeyTrace>,
    /// Figure layout
    pub layout: Layout,
}

/// A `type: "sankey"` trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyTrace {
    /// Trace type, always `"sankey"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Node settings and labels
    pub node: NodeSpec,
    /// Parallel link arrays
    pub link: LinkSpec,
}

/// Node block of a Sankey trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    /// Space between nodes
    pub pad: u32,
    /// Node thickness
    pub thickness: u32,
    /// Node border
    pub line: LineSpec,
    /// Node labels, indexed by link source/target
    pub label: Vec<String>,
}

/// Node border style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSpec {
    /// CSS color
    pub color: String,
    /// Width in pixels
    pub width: f64,
}

/// Link block of a Sankey trace, as three parallel arrays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSpec {
    /// Source node indices
    pub source: Vec<usize>,
    /// Target node indices
    pub target: Vec<usize>,
    /// Link values
    pub value: Vec<f64>,
}

/// Figure layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Figure title
    pub title: TitleSpec,
    /// Global font
    pub font: FontSpec,
}

/// Title block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSpec {
    /// Title text
    pub text: String,
}

/// Font block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    /// Font size in points
    pub size: u32,
}

impl PlotlyFigure {
    /// Build the figure for a diagram
    #[must_use]
    pub fn from_diagram(diagram: &SankeyDiagram) -> Self {
        let style = &diagram.style;
        let link = LinkSpec {
            source: diagram.links.iter().map(|l| l.source).collect(),
            target: diagram.links.iter().map(|l| l.target).collect(),
            value: diagram.links.iter().map(|l| l.value).collect(),
        };

        Self {
            data: vec![SankeyTrace {
                kind: "sankey",
                node: NodeSpec {
                    pad: style.node_pad,
                    thickness: style.node_thickness,
                    line: LineSpec {
                        color: style.node_line_color.clone(),
                        width: style.node_line_width,
                    },
                    label: diagram.labels.clone(),
                },
                link,
            }],
            layout: Layout {
                title: TitleSpec {
                    text: diagram.title.clone(),
                },
                font: FontSpec {
                    size: style.font_size,
                },
            },
        }
    }

    /// Serialize as compact JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize as JSON that is safe to inline in a `<script>` element
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(self.to_json()?.replace("</", "<\\/").replace("<!--", "<\\!--"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Link;
    use crate::core::report::DiagramStyle;

    fn diagram() -> SankeyDiagram {
        SankeyDiagram {
            title: "flows.csv".into(),
            labels: vec!["A".into(), "B".into()],
            links: vec![
                Link {
                    source: 0,
                    target: 1,
                    value: 1.0,
                },
                Link {
                    source: 1,
                    target: 0,
                    value: 1.0,
                },
            ],
            style: DiagramStyle::default(),
        }
    }

    #[test]
    fn test_figure_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&PlotlyFigure::from_diagram(&diagram()).to_json().unwrap())
                .unwrap();

        let trace = &json["data"][0];
        assert_eq!(trace["type"], "sankey");
        assert_eq!(trace["node"]["pad"], 15);
        assert_eq!(trace["node"]["thickness"], 20);
        assert_eq!(trace["node"]["line"]["color"], "black");
        assert_eq!(trace["node"]["line"]["width"], 0.5);
        assert_eq!(trace["node"]["label"], serde_json::json!(["A", "B"]));
        assert_eq!(trace["link"]["source"], serde_json::json!([0, 1]));
        assert_eq!(trace["link"]["target"], serde_json::json!([1, 0]));
        assert_eq!(trace["link"]["value"], serde_json::json!([1.0, 1.0]));
        assert_eq!(json["layout"]["title"]["text"], "flows.csv");
        assert_eq!(json["layout"]["font"]["size"], 10);
    }

    #[test]
    fn test_script_json_cannot_close_the_script_element() {
        let mut d = diagram();
        d.labels[0] = "</script><b>".into();
        let json = PlotlyFigure::from_diagram(&d).to_script_json().unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("<\\/script>"));
    }
}
