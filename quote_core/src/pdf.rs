//! # PDF Quotation
//!
//! Renders a [`QuoteRecord`] to an A4 quotation using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via placeholder replacement before compilation
//! - Fonts come from `typst-assets`, no system font lookup
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::export::QuoteRecord;
//! use quote_core::pdf::render_quote_pdf;
//! use quote_core::settings::CompanyProfile;
//! # fn record() -> QuoteRecord { unimplemented!() }
//!
//! let record = record();
//! let pdf_bytes = render_quote_pdf(&record, &CompanyProfile::default()).unwrap();
//! std::fs::write(record.pdf_file_name(), pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::display::{format_inr, format_km, format_rate};
use crate::errors::{CalcResult, QuoteError};
use crate::export::record::QuoteRecord;
use crate::settings::CompanyProfile;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
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
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const QUOTE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 20mm, bottom: 20mm, left: 20mm, right: 20mm),
  footer: [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #align(center)[
      #text(size: 10pt)[Thank you for choosing {{COMPANY}}] \
      #text(size: 9pt, fill: gray)[For inquiries, contact us at {{COMPANY_PHONE}}]
    ]
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

// Letterhead
#block(width: 100%, fill: rgb("#1e3a5f"), inset: 14pt)[
  #text(size: 20pt, weight: "bold", fill: white)[{{COMPANY}}]
  #v(2pt)
  #text(size: 9pt, fill: white)[{{COMPANY_ADDRESS}}] \
  #text(size: 9pt, fill: white)[Phone: {{COMPANY_PHONE}} | Email: {{COMPANY_EMAIL}}]
]

#v(10pt)

#grid(
  columns: (1fr, 1fr),
  align(left)[#text(size: 16pt, weight: "bold")[QUOTATION]],
  align(right)[
    Date: {{DATE}} \
    #text(size: 9pt, fill: gray)[Ref: {{REFERENCE}}]
  ],
)

#v(8pt)

== Customer Information

#table(
  columns: (1fr, 2fr),
  stroke: none,
  [Name:], [{{CUSTOMER_NAME}}],
  [Phone:], [{{CUSTOMER_PHONE}}],
)

== Quote Details

#table(
  columns: (1fr, 2fr),
  stroke: 0.5pt + gray,
  [Wall Type], [{{WALL_TYPE}}],
  [Perimeter], [{{PERIMETER}} feet],
  [Height], [{{HEIGHT}} feet],
  [Area], [{{AREA}} sq.ft],
  [Base Rate], [{{BASE_RATE}}/sq.ft],
)

== Cost Breakdown

#table(
  columns: (1fr, 2fr),
  stroke: 0.5pt + gray,
  [Base Cost], [{{BASE_COST}}],
  [Distance], [{{DISTANCE}} km ({{DISTANCE_METHOD}})],
  [Shipping Distance], [{{BILLABLE}} km (free up to {{FREE_RADIUS}} km)],
  [Shipping Cost], [{{SURCHARGE}}],
)

#v(6pt)

#block(width: 100%, fill: rgb("#f0f0f0"), inset: 10pt, radius: 4pt)[
  #grid(
    columns: (1fr, 1fr),
    align(left)[#text(size: 14pt, weight: "bold")[Total Amount]],
    align(right)[#text(size: 14pt, weight: "bold")[{{TOTAL}}]],
  )
]

#v(12pt)

== Terms & Conditions

#text(size: 10pt)[
  1. This is an estimated price excluding taxes
  2. Valid for 30 days from the date of issue
  3. Installation charges may apply
  4. Payment terms: 50% advance, 50% on delivery
]
"##;

/// Render a quotation to PDF bytes.
///
/// # Errors
///
/// `RenderFailed` if Typst compilation or PDF export fails.
pub fn render_quote_pdf(record: &QuoteRecord, company: &CompanyProfile) -> CalcResult<Vec<u8>> {
    let source = quote_source(record, company);

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::render_failed("compile", error_msgs.join("; "))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::render_failed("export", error_msgs.join("; "))
    })?;

    tracing::debug!(reference = %record.reference, bytes = pdf_bytes.len(), "Quotation rendered");
    Ok(pdf_bytes)
}

/// Fill the template. Amounts use the same formatting as the quote panel.
fn quote_source(record: &QuoteRecord, company: &CompanyProfile) -> String {
    let result = &record.result;
    QUOTE_TEMPLATE
        .replace("{{COMPANY}}", &escape_typst(&company.name))
        .replace("{{COMPANY_ADDRESS}}", &escape_typst(&company.address))
        .replace("{{COMPANY_PHONE}}", &escape_typst(&company.phone))
        .replace("{{COMPANY_EMAIL}}", &escape_typst(&company.email))
        .replace("{{DATE}}", &record.issue_date())
        .replace("{{REFERENCE}}", &record.reference)
        .replace("{{CUSTOMER_NAME}}", &escape_typst(&record.customer.name))
        .replace("{{CUSTOMER_PHONE}}", &escape_typst(&record.customer.phone))
        .replace("{{WALL_TYPE}}", result.wall_type.display_name())
        .replace("{{PERIMETER}}", &format!("{:.2}", result.perimeter_ft))
        .replace("{{HEIGHT}}", &result.height_ft.to_string())
        .replace("{{AREA}}", &format!("{:.2}", result.area_sqft))
        .replace("{{BASE_RATE}}", &format_rate(result.base_rate))
        .replace("{{BASE_COST}}", &format_inr(result.base_cost))
        .replace("{{DISTANCE}}", &format_km(result.distance_km))
        .replace("{{DISTANCE_METHOD}}", record.distance_method.display_name())
        .replace("{{BILLABLE}}", &format_km(result.billable_distance_km))
        .replace("{{FREE_RADIUS}}", &result.free_radius_km.to_string())
        .replace("{{SURCHARGE}}", &format_inr(result.surcharge))
        .replace("{{TOTAL}}", &format_inr(result.total))
}

/// Escape special Typst characters in user-provided text.
///
/// `//` and `/*` would open a comment and swallow the closing bracket of the
/// surrounding content block. A leading `=`, `-` or `+` would start a heading
/// or list.
fn escape_typst(s: &str) -> String {
    let lead = match s.chars().next() {
        Some('=' | '-' | '+') => "\\",
        _ => "",
    };
    let body: String = s
        .chars()
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
        .collect();
    format!("{}{}", lead, body)
}
