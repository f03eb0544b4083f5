pub mod assemble;
pub mod error;
pub mod link;
pub mod registry;
pub mod representation;
pub mod source;
pub mod template;

pub use assemble::{
    attachment, attachment_at_version, class, comment, history_summary, object_summary, page,
    page_parameters, page_summary, root, space, typed_object_summary, versioned_page_parameters,
};
pub use error::{BuildError, ContentAccessError, RegistryError, RestError, TemplateError};
pub use link::{Link, LinkResolver, Relation, RootReference, WADL_MEDIA_TYPE};
pub use registry::{RegistryBuilder, ResourceRegistry, ResourceType, RouteTable, standard_table};
pub use representation::{
    Attachment, Class, ClassProperty, Comment, HistorySummary, ObjectSummary, Page, PageSummary,
    Property, Space, Translations, XWikiRoot,
};
pub use source::{
    Access, AttachmentEntry, ClassCatalog, ClassDefinition, ClassPropertyDefinition, CommentEntry,
    DocumentSnapshot, DocumentSource, HistoryEntry, ObjectEntry, PageReference, PropertyEntry,
    PropertyKind, PropertyValue, RcsVersion, SpaceEntry,
};
pub use template::{Param, Parameters, UriTemplate};
