#![allow(clippy::float_cmp)]

use time::macros::date;

use super::*;
use crate::catalog::FieldCatalog;
use crate::doc::{ManualField, Paragraph};

fn manual(key: &str, sample: &str) -> Element {
    let mut el = Element::new(ElementType::ManualField);
    el.kind = ElementKind::ManualField(ManualField { key: key.into(), sample: sample.into(), ..Default::default() });
    el
}

fn paragraph(html: &str) -> Element {
    let mut el = Element::new(ElementType::Paragraph);
    el.kind = ElementKind::Paragraph(Paragraph { html: html.into(), ..Default::default() });
    el
}

struct Fixture {
    catalog: FieldCatalog,
    overrides: HashMap<String, String>,
}

impl Fixture {
    fn new() -> Self {
        Self { catalog: FieldCatalog::builtin(), overrides: HashMap::new() }
    }

    fn ctx(&self) -> ResolveContext<'_> {
        ResolveContext { catalog: &self.catalog, overrides: &self.overrides, today: date!(2024 - 03 - 10) }
    }
}

#[test]
fn manual_keys_in_order_without_duplicates() {
    let els = vec![manual("Lote", ""), paragraph("x"), manual("Peso", ""), manual("Lote", ""), manual("", "")];
    assert_eq!(manual_keys(&els), vec!["Lote".to_owned(), "Peso".to_owned()]);
}

#[test]
fn canvas_pixels_at_dpi() {
    assert_eq!(mm_to_px(25.4, 96.0), 96.0);
    assert_eq!(mm_to_px(50.8, 300.0), 600.0);
}

#[test]
fn label_without_manual_fields_prints_directly() {
    let fx = Fixture::new();
    let els = vec![paragraph("<p>{{product.name}}</p>"), Element::new(ElementType::Line)];
    let job = prepare(&els, &Canvas::new(25.4, 50.8), &fx.ctx(), None, 96.0).unwrap();
    assert_eq!((job.width_px, job.height_px), (96.0, 192.0));
    assert_eq!(job.elements[0].content.as_deref(), Some("<p>Queso curado</p>"));
    assert!(job.elements[1].content.is_none());
}

#[test]
fn manual_fields_require_values() {
    let fx = Fixture::new();
    let els = vec![manual("Lote", "L-1")];
    let err = prepare(&els, &Canvas::new(10.0, 10.0), &fx.ctx(), None, 96.0).unwrap_err();
    assert!(matches!(&err, PrintError::ManualValuesRequired(keys) if keys == &["Lote".to_owned()]));
    assert_eq!(err.error_code(), "E_MANUAL_VALUES_REQUIRED");
}

#[test]
fn supplied_values_override_samples_for_this_job_only() {
    let fx = Fixture::new();
    let els = vec![manual("Lote", "L-1"), manual("Peso", "1 kg"), paragraph("{{Lote}}/{{Peso}}")];
    let values = HashMap::from([("Lote".to_owned(), "L-99".to_owned())]);
    let job = prepare(&els, &Canvas::new(10.0, 10.0), &fx.ctx(), Some(&values), 96.0).unwrap();

    assert_eq!(job.values.get("Lote").map(String::as_str), Some("L-99"));
    assert_eq!(job.values.get("Peso").map(String::as_str), Some("1 kg"));
    assert_eq!(job.elements[2].content.as_deref(), Some("L-99/1 kg"));
    let ElementKind::ManualField(f) = &els[0].kind else { panic!("manual field expected") };
    assert_eq!(f.sample, "L-1");
}

struct Recording {
    jobs: Vec<(String, usize)>,
}

impl PrintTarget for Recording {
    fn render(&mut self, target_id: &str, job: &PrintJob) -> Result<(), PrintError> {
        self.jobs.push((target_id.to_owned(), job.elements.len()));
        Ok(())
    }
}

#[test]
fn target_receives_prepared_job() {
    let fx = Fixture::new();
    let job = prepare(&[paragraph("a")], &Canvas::new(10.0, 10.0), &fx.ctx(), None, 96.0).unwrap();
    let mut target = Recording { jobs: Vec::new() };
    target.render("print-frame", &job).unwrap();
    assert_eq!(target.jobs, vec![("print-frame".to_owned(), 1)]);
}
