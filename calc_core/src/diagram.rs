//! # Single Line Diagram
//!
//! Builds the single line diagram (SLD) of a sized installation as a small
//! graph model and serializes it to Graphviz DOT:
//!
//! ```text
//! TR ──incomer──▶ EVDB ──▶ CB_1 ──cable──▶ CH_1
//!                      ──▶ CB_2 ──cable──▶ CH_2
//! ```
//!
//! Node labels are Graphviz HTML-like tables. Rasterizing to SVG/PNG/PDF runs
//! the external `dot` binary; a missing binary or a failed run is reported as
//! [`CalcError::RenderFailed`] and never affects the sizing result.

use std::fmt;
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::calculations::{CircuitResult, SizingResult};
use crate::charger::ChargerKind;
use crate::equations::StandardReference;
use crate::errors::{CalcError, CalcResult};
use crate::standards::Selection;

const EXCEEDS: &str = "EXCEEDS STANDARD RANGE";
const AC_FILL: &str = "#c8e6c9";
const DC_FILL: &str = "#bbdefb";
const HEADER_FILL: &str = "#f0f0f0";
const WARNING_COLOR: &str = "#c62828";

/// Output format of the `dot` renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    Svg,
    Png,
    Pdf,
}

impl DiagramFormat {
    /// `-T` argument for `dot`
    pub fn code(&self) -> &'static str {
        match self {
            DiagramFormat::Svg => "svg",
            DiagramFormat::Png => "png",
            DiagramFormat::Pdf => "pdf",
        }
    }

    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> CalcResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        ext.parse()
    }
}

impl std::str::FromStr for DiagramFormat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(DiagramFormat::Svg),
            "png" => Ok(DiagramFormat::Png),
            "pdf" => Ok(DiagramFormat::Pdf),
            other => Err(CalcError::invalid_input("format", other, "Diagram format must be svg, png or pdf")),
        }
    }
}

/// A diagram node; `label` is a Graphviz HTML-like label body.
#[derive(Debug, Clone, PartialEq)]
pub struct SldNode {
    pub id: String,
    pub label: String,
    pub shape: &'static str,
    /// Extra `key="value"` attributes
    pub attrs: Vec<(&'static str, String)>,
}

/// A connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SldEdge {
    pub from: String,
    pub to: String,
    /// Plain-text annotation, one entry per line
    pub label: Vec<String>,
    pub arrowhead: Option<&'static str>,
}

/// Graph model of the single line diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleLineDiagram {
    pub title: String,
    pub nodes: Vec<SldNode>,
    pub edges: Vec<SldEdge>,
}

impl SingleLineDiagram {
    /// Build the diagram for a sizing result.
    pub fn from_result(result: &SizingResult, title: &str) -> Self {
        let mut nodes = vec![transformer_node(result), board_node(result)];
        let mut edges = vec![SldEdge {
            from: "TR".to_string(),
            to: "EVDB".to_string(),
            label: incomer_label(result),
            arrowhead: None,
        }];

        for (i, circuit) in result.circuits.iter().enumerate() {
            let number = i + 1;
            let breaker_id = format!("CB_{}", number);
            let charger_id = format!("CH_{}", number);

            nodes.push(breaker_node(&breaker_id, circuit));
            nodes.push(charger_node(&charger_id, number, circuit));
            edges.push(SldEdge {
                from: "EVDB".to_string(),
                to: breaker_id.clone(),
                label: Vec::new(),
                arrowhead: Some("none"),
            });
            edges.push(SldEdge {
                from: breaker_id,
                to: charger_id,
                label: cable_label(circuit),
                arrowhead: None,
            });
        }

        nodes.push(legend_node());

        SingleLineDiagram {
            title: title.to_string(),
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&SldNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Serialize to Graphviz DOT, left to right.
    pub fn to_dot(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SingleLineDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph EV_Charger_SLD {{")?;
        writeln!(
            f,
            "    graph [rankdir=LR, fontname=\"Arial\", fontsize=10, labelloc=t, label=\"{}\\n(PRELIMINARY - AS/NZS 3000 REFERENCED)\"];",
            escape_dot(&self.title.to_uppercase())
        )?;
        writeln!(f, "    node [fontname=\"Arial\", fontsize=10];")?;
        writeln!(f, "    edge [fontname=\"Arial\", fontsize=8];")?;
        writeln!(f)?;

        for node in &self.nodes {
            write!(f, "    {} [shape={}, label=<{}>", node.id, node.shape, node.label)?;
            for (key, value) in &node.attrs {
                write!(f, ", {}=\"{}\"", key, escape_dot(value))?;
            }
            writeln!(f, "];")?;
        }
        writeln!(f)?;

        for edge in &self.edges {
            let mut attrs = Vec::new();
            if !edge.label.is_empty() {
                let lines: Vec<String> = edge.label.iter().map(|l| escape_dot(l)).collect();
                attrs.push(format!("label=\"{}\"", lines.join("\\n")));
            }
            if let Some(head) = edge.arrowhead {
                attrs.push(format!("arrowhead={}", head));
            }
            if attrs.is_empty() {
                writeln!(f, "    {} -> {};", edge.from, edge.to)?;
            } else {
                writeln!(f, "    {} -> {} [{}];", edge.from, edge.to, attrs.join(", "))?;
            }
        }

        writeln!(f, "}}")
    }
}

/// Convenience: DOT source for a sizing result
pub fn to_dot(result: &SizingResult, title: &str) -> String {
    SingleLineDiagram::from_result(result, title).to_dot()
}

/// Rasterize DOT source with the Graphviz `dot` binary.
pub fn render(dot: &str, format: DiagramFormat) -> CalcResult<Vec<u8>> {
    let mut child = Command::new("dot")
        .arg(format!("-T{}", format.code()))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CalcError::render_failed("graphviz", format!("could not run dot: {}", e)))?;

    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CalcError::render_failed("graphviz", "dot stdin unavailable"))?;
        stdin
            .write_all(dot.as_bytes())
            .map_err(|e| CalcError::render_failed("graphviz", e.to_string()))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| CalcError::render_failed("graphviz", e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CalcError::render_failed(
            "graphviz",
            format!("dot exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    tracing::debug!(format = format.code(), bytes = output.stdout.len(), "rendered diagram");
    Ok(output.stdout)
}

/// Render to a file, choosing the format from its extension.
pub fn render_to_file(dot: &str, path: &Path) -> CalcResult<()> {
    let format = DiagramFormat::from_path(path)?;
    let bytes = render(dot, format)?;
    std::fs::write(path, bytes)
        .map_err(|e| CalcError::file_error("write", path.display().to_string(), e.to_string()))?;
    tracing::info!(path = %path.display(), "wrote single line diagram");
    Ok(())
}

fn transformer_node(result: &SizingResult) -> SldNode {
    let t = &result.transformer;
    let rating = if t.is_no_load() {
        "no load".to_string()
    } else {
        format!("{}kVA", t.rating_kva)
    };
    let label = header_table(
        "DISTRIBUTION TRANSFORMER",
        &[
            ("Rating", rating),
            ("Voltage", t.voltage_ratio.clone()),
            (
                "Impedance",
                format!("{}% ({})", t.impedance_percent, StandardReference::PowerTransformers.short_form()),
            ),
            ("Vector Group", t.vector_group.clone()),
        ],
    );
    plaintext_node("TR", label)
}

fn board_node(result: &SizingResult) -> SldNode {
    let msb = &result.msb;
    let incomer = match &msb.main_breaker {
        Selection::Standard(rating) => format!("{}A, 65kA SCCR", rating),
        Selection::NoLoad => "no load".to_string(),
        Selection::ExceedsStandardRange { required_a, .. } => exceeds_html(*required_a),
    };
    let switchboard = match &msb.configuration {
        Selection::Standard(config) => escape_html(&format!("{} ({} mm)", config.designation(), config.dimensions_mm)),
        Selection::NoLoad => "no load".to_string(),
        Selection::ExceedsStandardRange { required_a, .. } => exceeds_html(*required_a),
    };
    let label = header_table(
        "EV DISTRIBUTION BOARD",
        &[
            ("Incomer", incomer),
            ("Busbar", format!("{}A, Cu, 1A/mm²", msb.busbar_rating_a)),
            ("Switchboard", switchboard),
            (
                "Protection",
                format!("Type B RCD ({})", escape_html(StandardReference::EvRcdProtection.citation())),
            ),
            (
                "Standard",
                format!("{} (Form 4B)", StandardReference::SwitchgearAssemblies.citation()),
            ),
        ],
    );
    plaintext_node("EVDB", label)
}

fn breaker_node(id: &str, circuit: &CircuitResult) -> SldNode {
    let rows = match (&circuit.breaker, circuit.breaker_class()) {
        (Selection::Standard(rating), Some(class)) => vec![
            class.code().to_string(),
            format!("{}A, 10kA, {}", rating, circuit.phase.poles()),
            circuit.breaker_reference().citation().to_string(),
        ],
        (Selection::ExceedsStandardRange { required_a, .. }, _) => vec![
            exceeds_html(*required_a),
            circuit.breaker_reference().citation().to_string(),
        ],
        _ => vec!["no load".to_string()],
    };
    let cells: String = rows.iter().map(|row| format!("<TR><TD>{}</TD></TR>", row)).collect();
    let label = format!("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">{}</TABLE>", cells);

    SldNode {
        id: id.to_string(),
        label,
        shape: "none",
        attrs: vec![("width", "0.75".to_string())],
    }
}

fn charger_node(id: &str, number: usize, circuit: &CircuitResult) -> SldNode {
    let spec = &circuit.spec;
    let fill = match spec.kind {
        ChargerKind::Ac => AC_FILL,
        ChargerKind::Dc => DC_FILL,
    };
    let label = format!(
        "<TABLE BORDER=\"0\" CELLBORDER=\"0\" CELLSPACING=\"0\">\
         <TR><TD><B>EV CHARGER {}</B></TD></TR>\
         <TR><TD>{}kW {} x{}</TD></TR>\
         <TR><TD>{}V {}</TD></TR>\
         <TR><TD>{}</TD></TR>\
         </TABLE>",
        number,
        spec.power_kw,
        spec.kind,
        spec.quantity,
        circuit.voltage_v,
        circuit.phase.display_name(),
        StandardReference::EvChargingInstallations.citation(),
    );
    SldNode {
        id: id.to_string(),
        label,
        shape: "box",
        attrs: vec![("style", "rounded,filled".to_string()), ("fillcolor", fill.to_string())],
    }
}

fn legend_node() -> SldNode {
    let label = format!(
        "<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">\
         <TR><TD COLSPAN=\"2\" BGCOLOR=\"{header}\"><B>LEGEND &amp; STANDARDS</B></TD></TR>\
         <TR><TD>AC Charger</TD><TD BGCOLOR=\"{ac}\"> </TD></TR>\
         <TR><TD>DC Charger</TD><TD BGCOLOR=\"{dc}\"> </TD></TR>\
         <TR><TD COLSPAN=\"2\"><I>Design to AS/NZS 3000:2018 Wiring Rules</I></TD></TR>\
         <TR><TD COLSPAN=\"2\"><I>EV Charging: {ev}</I></TD></TR>\
         <TR><TD COLSPAN=\"2\"><I>Cables: {cables}</I></TD></TR>\
         </TABLE>",
        header = HEADER_FILL,
        ac = AC_FILL,
        dc = DC_FILL,
        ev = StandardReference::EvChargingInstallations.citation(),
        cables = StandardReference::CableCurrentCapacity.citation(),
    );
    plaintext_node("LEGEND", label)
}

fn incomer_label(result: &SizingResult) -> Vec<String> {
    let msb = &result.msb;
    match &msb.incomer_cable {
        Selection::Standard(incomer) => {
            let runs = if incomer.runs > 1 {
                format!("{} x ", incomer.runs)
            } else {
                String::new()
            };
            vec![
                format!("415V {}4Cx{}mm²", runs, incomer.size_mm2),
                format!("PVC/SWA/PVC ({})", StandardReference::PowerCables.short_form()),
                format!("Current Capacity: {}A", incomer.ampacity_a()),
            ]
        }
        Selection::NoLoad => vec!["no load".to_string()],
        Selection::ExceedsStandardRange { required_a, .. } => {
            vec![EXCEEDS.to_string(), format!("required {:.1}A", required_a)]
        }
    }
}

fn cable_label(circuit: &CircuitResult) -> Vec<String> {
    match &circuit.cable {
        Selection::Standard(cable) => vec![
            format!("{}mm² {} PVC/XLPE Cu", cable.size_mm2, circuit.cable_cores),
            format!("Current Capacity: {}A", cable.ampacity_a),
            StandardReference::CableCurrentCapacity.citation().to_string(),
        ],
        Selection::NoLoad => vec!["no load".to_string()],
        Selection::ExceedsStandardRange { required_a, largest_a } => vec![
            EXCEEDS.to_string(),
            format!("required {:.1}A, largest {} {}A", required_a, circuit.cable_cores, largest_a),
        ],
    }
}

fn header_table(title: &str, rows: &[(&str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(key, value)| format!("<TR><TD>{}</TD><TD>{}</TD></TR>", key, value))
        .collect();
    format!(
        "<TABLE BORDER=\"1\" CELLBORDER=\"0\" CELLSPACING=\"0\" CELLPADDING=\"4\">\
         <TR><TD COLSPAN=\"2\" BGCOLOR=\"{}\"><B>{}</B></TD></TR>{}</TABLE>",
        HEADER_FILL, title, body
    )
}

fn plaintext_node(id: &str, label: String) -> SldNode {
    SldNode {
        id: id.to_string(),
        label,
        shape: "plaintext",
        attrs: Vec::new(),
    }
}

fn exceeds_html(required_a: f64) -> String {
    format!(
        "<FONT COLOR=\"{}\"><B>{}</B> ({:.1}A)</FONT>",
        WARNING_COLOR, EXCEEDS, required_a
    )
}

/// Escape text for Graphviz HTML-like labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text for a double-quoted DOT string
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::size_installation;
    use crate::charger::{ChargerSpec, SupplyPhase};
    use crate::params::CalculationParameters;
    use crate::standards::AS_NZS_TABLES;

    fn result(chargers: &[ChargerSpec]) -> SizingResult {
        size_installation(chargers, &CalculationParameters::default(), &AS_NZS_TABLES)
    }

    #[test]
    fn test_graph_structure() {
        let diagram = SingleLineDiagram::from_result(
            &result(&[ChargerSpec::ac(22.0, 4), ChargerSpec::dc(50.0, 2)]),
            "Depot",
        );
        // TR, EVDB, 2 × (breaker + charger), legend
        assert_eq!(diagram.nodes.len(), 7);
        assert_eq!(diagram.edges.len(), 5);
        assert!(diagram.node("CB_2").is_some());
        assert!(diagram.node("CH_1").unwrap().attrs.contains(&("fillcolor", AC_FILL.to_string())));
        assert!(diagram.node("CH_2").unwrap().attrs.contains(&("fillcolor", DC_FILL.to_string())));
    }

    #[test]
    fn test_dot_content() {
        let dot = to_dot(&result(&[ChargerSpec::ac(22.0, 1).with_phase(SupplyPhase::Three)]), "Depot");
        assert!(dot.starts_with("digraph EV_Charger_SLD {"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("DEPOT\\n(PRELIMINARY - AS/NZS 3000 REFERENCED)"));
        assert!(!dot.contains("COMPLIANT"));
        assert!(dot.contains("TR -> EVDB"));
        assert!(dot.contains("EVDB -> CB_1 [arrowhead=none];"));
        assert!(dot.contains("25mm² 4C PVC/XLPE Cu\\nCurrent Capacity: 64A"));
        assert!(dot.contains("500kVA"));
        assert!(dot.contains("Dyn11"));
        assert!(dot.contains("50A, 10kA, 3P"));
        assert!(dot.contains("LEGEND &amp; STANDARDS"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_exceeded_cable_is_labelled() {
        let dot = to_dot(&result(&[ChargerSpec::dc(500.0, 1)]), "Hub");
        assert!(dot.contains(EXCEEDS));
        assert!(dot.contains("largest 2C 674A"));
        // No device rating is drawn for a circuit without a standard cable
        assert!(!dot.contains("1600A"));
    }

    #[test]
    fn test_parallel_incomer_label() {
        let dot = to_dot(&result(&[ChargerSpec::dc(150.0, 4)]), "Hub");
        // 4 × 299.9 A × 0.9 = 1079.5 A on 500 mm² (464 A per run)
        assert!(dot.contains("415V 3 x 4Cx500mm²"));
        assert!(dot.contains("Current Capacity: 1392A"));
    }

    #[test]
    fn test_empty_schedule_diagram() {
        let diagram = SingleLineDiagram::from_result(&result(&[]), "Empty");
        assert_eq!(diagram.nodes.len(), 3);
        let dot = diagram.to_dot();
        assert!(dot.contains("<TD>Rating</TD><TD>no load</TD>"));
        assert!(!dot.contains("kVA"));
    }

    #[test]
    fn test_title_is_escaped() {
        let dot = to_dot(&result(&[]), "Site \"A\"");
        assert!(dot.contains("SITE \\\"A\\\""));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(DiagramFormat::from_path(Path::new("sld.svg")).unwrap(), DiagramFormat::Svg);
        assert_eq!(DiagramFormat::from_path(Path::new("out/SLD.PNG")).unwrap(), DiagramFormat::Png);
        assert!(DiagramFormat::from_path(Path::new("sld.jpg")).is_err());
        assert!(DiagramFormat::from_path(Path::new("sld")).is_err());
    }

    #[test]
    fn test_render_failure_is_render_error() {
        // Either graphviz is missing or the input is rejected; both are RenderFailed
        match render("this is not dot", DiagramFormat::Svg) {
            Err(err) => assert_eq!(err.error_code(), "RENDER_FAILED"),
            Ok(_) => panic!("invalid DOT should not render"),
        }
    }
}
