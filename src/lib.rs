//! Label document editor engine.
//!
//! A label is a millimeter canvas holding typed elements (text, catalog-bound
//! fields, manual/select/checkbox/date fields, barcodes, QR codes, lines,
//! sanitary-registration stamps and rich paragraphs). This crate owns the
//! document model and everything that changes it: the single update gateway
//! with style normalization and key maintenance, pointer-driven drag and
//! resize, canvas rotation in 90° steps, field resolution for preview and
//! print, and import/export. Rendering, storage transport and UI are host
//! concerns reached through the traits in [`persist`], [`print`] and [`fit`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Editor`]: document state, selection, pointer and keyboard handling |
//! | [`doc`] | Element sum type, style enums, canvas and document |
//! | [`store`] | Ordered element store and its update gateway |
//! | [`style`] | Style normalizer over raw element JSON |
//! | [`keys`] | Placeholder scanning, key rename cascade, unique key suggestion |
//! | [`catalog`] | Read-only field catalog |
//! | [`resolve`] | Field resolver and placeholder substitution |
//! | [`geometry`] | Drag, resize and clamp math |
//! | [`hit`] | Hit-testing element bodies and resize handles |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`orient`] | Canvas rotation transform |
//! | [`transfer`] | Import/export and document validation |
//! | [`persist`] | Label repository boundary and save validation |
//! | [`print`] | Print job preparation |
//! | [`fit`] | Auto-fit of text elements |
//! | [`config`] | Environment configuration |
//! | [`error`] | Error codes and user notices |
//! | [`viewport`] | Points, rects, zoom and px/mm conversion |
//! | [`consts`] | Shared numeric constants |

pub mod catalog;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod keys;
pub mod orient;
pub mod persist;
pub mod print;
pub mod resolve;
pub mod store;
pub mod style;
pub mod transfer;
pub mod viewport;
