//! Template Bindings
//!
//! `template` and `template/{id}`.

use super::{Resource, ResourceClient};
use crate::models::{RecordId, Template, TemplateDraft};

/// The `template` collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Templates;

impl Resource for Templates {
    const PATH: &'static str = "template";

    type Record = Template;
    type Draft = TemplateDraft;

    fn id(record: &Template) -> &RecordId {
        &record.id
    }
}

pub type TemplateClient = ResourceClient<Templates>;
