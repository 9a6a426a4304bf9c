//! # PDF Sizing Report
//!
//! Renders a sizing result to a PDF report using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via string replacement before compilation
//! - Fonts come from `typst-assets`; nothing is read from disk
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::charger::ChargerSpec;
//! use calc_core::pdf::render_session_pdf;
//! use calc_core::session::Session;
//!
//! let mut session = Session::new("Depot");
//! session.add_charger(ChargerSpec::dc(150.0, 2)).unwrap();
//!
//! let pdf_bytes = render_session_pdf(&session, &session.calculate()).unwrap();
//! std::fs::write("sizing_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::{Datelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::{CircuitResult, SizingResult};
use crate::errors::{CalcError, CalcResult};
use crate::params::Parameter;
use crate::session::Session;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), u8::try_from(now.month()).ok()?, u8::try_from(now.day()).ok()?)
    }
}

// ============================================================================
// Report Template
// ============================================================================

const REPORT_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[EV Charging Infrastructure Sizing]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[{{EDITION}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 12pt)[Charger Circuits, Main Switchboard and Supply Sizing]
  ]
]

#v(8pt)

*Design Date:* {{DATE}} \
*Chargers:* {{CHARGER_COUNT}} units on {{LINE_COUNT}} circuits

== Calculation Parameters

#table(
  columns: (1fr, auto),
  stroke: 0.5pt + gray,
  [*Parameter*], [*Value*],
{{PARAM_ROWS}}
)

== Charger Schedule

#table(
  columns: (auto, auto, auto, auto, auto, auto, 1fr, 1fr),
  stroke: 0.5pt + gray,
  [*No.*], [*Type*], [*Power*], [*Qty*], [*Supply*], [*Design I*], [*Breaker*], [*Cable*],
{{SCHEDULE_ROWS}}
)

== Main Switchboard and Supply

#table(
  columns: (1fr, 1fr),
  stroke: 0.5pt + gray,
{{MSB_ROWS}}
)

{{WARNING}}

== Technical Notes

{{NOTES}}

#v(12pt)
#text(size: 8pt, fill: gray)[
  *Disclaimer:* This report provides estimates based on Australian Standards.
  Actual installations must be designed by a qualified electrician.
  Always verify with current AS/NZS standards.
]
"##;

/// Render a sizing result with the session's title and design date.
pub fn render_session_pdf(session: &Session, result: &SizingResult) -> CalcResult<Vec<u8>> {
    let source = REPORT_TEMPLATE
        .replace("{{TITLE}}", &escape_typst(&session.meta.title))
        .replace("{{DATE}}", &session.meta.design_date.format("%Y-%m-%d").to_string())
        .replace("{{EDITION}}", &escape_typst(&result.edition))
        .replace("{{CHARGER_COUNT}}", &result.charger_count().to_string())
        .replace("{{LINE_COUNT}}", &result.circuits.len().to_string())
        .replace("{{PARAM_ROWS}}", &build_param_rows(result))
        .replace("{{SCHEDULE_ROWS}}", &build_schedule_rows(&result.circuits))
        .replace("{{MSB_ROWS}}", &build_msb_rows(result))
        .replace("{{WARNING}}", &build_warning(result))
        .replace("{{NOTES}}", &build_notes(result));

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("typst", format!("compilation failed: {}", error_msgs.join("; ")))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("typst", format!("PDF export failed: {}", error_msgs.join("; ")))
    })?;

    tracing::debug!(bytes = pdf_bytes.len(), "rendered sizing report");
    Ok(pdf_bytes)
}

/// Render the report and write it to `path`.
pub fn write_session_pdf(session: &Session, result: &SizingResult, path: &std::path::Path) -> CalcResult<()> {
    let bytes = render_session_pdf(session, result)?;
    std::fs::write(path, bytes).map_err(|e| CalcError::file_error("write", path.display().to_string(), e.to_string()))?;
    tracing::info!(path = %path.display(), "wrote sizing report");
    Ok(())
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            '/' => "\\/".to_string(),
            '~' => "\\~".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

fn cell(s: &str) -> String {
    format!("[{}]", escape_typst(s))
}

fn build_param_rows(result: &SizingResult) -> String {
    Parameter::ALL
        .iter()
        .map(|p| {
            let value = match p.reference() {
                Some(reference) => format!("{} ({})", result.params.get(*p), reference.citation()),
                None => result.params.get(*p).to_string(),
            };
            format!("  {}, {},", cell(p.display_name()), cell(&value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_schedule_rows(circuits: &[CircuitResult]) -> String {
    circuits
        .iter()
        .enumerate()
        .map(|(i, circuit)| {
            let breaker = circuit.breaker.describe(|rating| {
                let class = circuit.breaker_class().map(|c| c.code()).unwrap_or_default();
                format!("{}A {} {}", rating, class, circuit.phase.poles())
            });
            let cable = circuit
                .cable
                .describe(|c| format!("{}mm² {} ({}A)", c.size_mm2, circuit.cable_cores, c.ampacity_a));
            [
                (i + 1).to_string(),
                circuit.spec.kind.to_string(),
                format!("{}kW", circuit.spec.power_kw),
                circuit.spec.quantity.to_string(),
                circuit.phase.display_name().to_string(),
                format!("{:.1}A", circuit.design_current_a),
                breaker,
                cable,
            ]
            .iter()
            .map(|s| cell(s))
            .collect::<Vec<_>>()
            .join(", ")
        })
        .map(|row| format!("  {},", row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_msb_rows(result: &SizingResult) -> String {
    let msb = &result.msb;
    let t = &result.transformer;
    let main_breaker = msb.main_breaker.describe(|rating| format!("{}A", rating));

    let rows = [
        ("Total Connected Load", format!("{:.1} kW", msb.total_connected_kw)),
        ("Total Design AC Current", format!("{:.1} A", msb.total_design_ac_current_a)),
        ("Diversity Factor", msb.diversity_factor.to_string()),
        ("Diversified Current", format!("{:.1} A", msb.diversified_current_a)),
        ("Main Breaker", main_breaker),
        ("MSB Configuration", msb.configuration_description()),
        ("Busbar Rating", format!("{} A", msb.busbar_rating_a)),
        ("Incomer Cable", msb.incomer_description()),
        ("Transformer Load", format!("{:.1} kVA", t.apparent_power_kva)),
        ("Transformer", t.description()),
    ];

    rows.iter()
        .map(|(key, value)| format!("  {}, {},", cell(key), cell(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_warning(result: &SizingResult) -> String {
    if result.exceeds_standard_range() {
        "#text(fill: rgb(\"#c62828\"))[*One or more selections exceed the standard range and require a custom design. Consider splitting the load across multiple switchboards or a higher supply voltage.*]".to_string()
    } else {
        String::new()
    }
}

fn build_notes(result: &SizingResult) -> String {
    result
        .notes
        .iter()
        .map(|note| format!("- {}", escape_typst(&note.to_string())))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charger::ChargerSpec;
    use crate::equations::StandardReference;

    #[test]
    fn test_pdf_generation() {
        let mut session = Session::new("Test Depot <A>");
        session.add_charger(ChargerSpec::ac(22.0, 4)).unwrap();
        session.add_charger(ChargerSpec::dc(500.0, 1)).unwrap();
        let result = session.calculate();

        let pdf = render_session_pdf(&session, &result);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("a*b_c#"), "a\\*b\\_c\\#");
        assert_eq!(escape_typst("(1250 A > 674 A)"), "(1250 A \\> 674 A)");
        assert_eq!(escape_typst("PVC/XLPE"), "PVC\\/XLPE");
    }

    #[test]
    fn test_param_rows_cite_clauses() {
        let result = Session::default().calculate();
        let rows = build_param_rows(&result);
        assert!(rows.contains("Diversity Factor]"));
        assert!(rows.contains(&escape_typst(&format!(
            "0.9 ({})",
            StandardReference::MaximumDemand.citation()
        ))));
    }

    #[test]
    fn test_msb_rows_without_load() {
        let rows = build_msb_rows(&Session::default().calculate());
        assert!(rows.contains("[Transformer], [no load]"));
        assert!(rows.contains("[Incomer Cable], [no load]"));
    }

    #[test]
    fn test_schedule_rows() {
        let mut session = Session::default();
        session.add_charger(ChargerSpec::ac(22.0, 2)).unwrap();
        let result = session.calculate();
        let rows = build_schedule_rows(&result.circuits);
        assert!(rows.contains("[160A MCCB 1P]"));
        assert!(rows.contains("[95mm² 2C (189A)]"));
        assert!(rows.trim_end().ends_with(','));
    }
}
