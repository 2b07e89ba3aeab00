#![allow(missing_docs)]

pub mod builder;
pub mod config;
pub mod controller;
pub mod criteria;
pub mod error;
pub mod record;
pub mod render;
pub mod review;
pub mod schema;
pub mod visibility;

pub use builder::build_schema;
pub use config::FormConfig;
pub use controller::FormController;
pub use criteria::{
    CriteriaAtom, CriteriaOutcome, Dialect, Operator, ParsedCriteria, Target, compare, evaluate,
    parse,
};
pub use error::FormError;
pub use record::{RawRecord, RowsDocument};
pub use render::render_text;
pub use review::{ReviewField, ReviewPayload, ReviewSection, build_review_payload, review_schema};
pub use schema::{
    FALLBACK_SECTION, FieldDefinition, FieldKind, FieldValue, FormSchema, Order, PickOption,
    SectionDefinition,
};
pub use visibility::resolve_visibility;
