use crate::assemble::{log_abandoned, page_parameters};
use crate::error::BuildError;
use crate::link::{LinkResolver, Relation};
use crate::registry::ResourceType;
use crate::representation::{Class, ClassProperty, ObjectSummary, Property};
use crate::source::{
    ClassCatalog, ClassDefinition, ClassPropertyDefinition, DocumentSource, ObjectEntry,
    PropertyEntry, PropertyKind, PropertyValue,
};
use crate::template::{Param, Parameters};

/// Object summary with raw property values and no type metadata.
pub fn object_summary<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    object: &ObjectEntry,
) -> Result<ObjectSummary, BuildError>
where
    D: DocumentSource + ?Sized,
{
    build_lightweight(links, doc, object).inspect_err(log_abandoned("object"))
}

fn build_lightweight<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    object: &ObjectEntry,
) -> Result<ObjectSummary, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let mut summary = summary(links, doc, object)?;
    summary.properties = object
        .properties
        .iter()
        .map(|entry| Property::new(&entry.name, display_value(entry)))
        .collect();
    Ok(summary)
}

/// Object summary whose properties carry their declared type and, for list and
/// date properties, the allowed values, separators or date format.
///
/// Fails with [`BuildError::PropertyTypeNotFound`] when the object's class does
/// not declare one of its properties.
pub fn typed_object_summary<D, C>(
    links: &LinkResolver<'_>,
    doc: &D,
    classes: &C,
    object: &ObjectEntry,
) -> Result<ObjectSummary, BuildError>
where
    D: DocumentSource + ?Sized,
    C: ClassCatalog + ?Sized,
{
    build_typed(links, doc, classes, object).inspect_err(log_abandoned("object"))
}

fn build_typed<D, C>(
    links: &LinkResolver<'_>,
    doc: &D,
    classes: &C,
    object: &ObjectEntry,
) -> Result<ObjectSummary, BuildError>
where
    D: DocumentSource + ?Sized,
    C: ClassCatalog + ?Sized,
{
    let class = classes.class(&object.class_name)?;
    let properties = object
        .properties
        .iter()
        .map(|entry| {
            let definition = class.property(&entry.name).ok_or_else(|| {
                BuildError::PropertyTypeNotFound {
                    class: class.name.clone(),
                    property: entry.name.clone(),
                }
            })?;
            Ok(typed_property(entry, definition))
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    let mut summary = summary(links, doc, object)?;
    summary.properties = properties;
    Ok(summary)
}

fn summary<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    object: &ObjectEntry,
) -> Result<ObjectSummary, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let page_id = doc.prefixed_full_name()?;
    let params = page_parameters(&doc.wiki()?, &doc.space()?, &doc.name()?);
    let object_params = params
        .clone()
        .with(Param::ClassName, &object.class_name)
        .with(Param::ObjectNumber, object.number.to_string());

    Ok(ObjectSummary {
        id: format!("{page_id}:{}", object.guid),
        guid: object.guid.clone(),
        class_name: object.class_name.clone(),
        number: object.number,
        page_id,
        pretty_name: object.pretty_name.clone(),
        properties: Vec::new(),
        links: vec![
            links.link(ResourceType::Page, &params, Relation::Page)?,
            links.link(ResourceType::Object, &object_params, Relation::SelfRef)?,
        ],
    })
}

fn display_value(entry: &PropertyEntry) -> String {
    entry
        .value
        .as_ref()
        .map(PropertyValue::to_string)
        .unwrap_or_default()
}

fn typed_property(entry: &PropertyEntry, definition: &ClassPropertyDefinition) -> Property {
    let value = entry
        .value
        .as_ref()
        .map(PropertyValue::form_string)
        .unwrap_or_default();
    let mut property = Property::new(&entry.name, value);
    property.property_type = Some(definition.kind.class_type().to_string());

    match &definition.kind {
        PropertyKind::List {
            allowed_values,
            separators,
            ..
        } => {
            // Commas inside a value are not escaped; consumers split on ','.
            if !allowed_values.is_empty() {
                property.allowed_values = Some(allowed_values.join(","));
            }
            property.separators = Some(separators.clone());
        }
        PropertyKind::Date { date_format } => {
            property.date_format = Some(date_format.clone());
        }
        PropertyKind::Scalar { .. } => {}
    }
    property
}

/// Class description with each property's declared type and settings.
pub fn class(
    links: &LinkResolver<'_>,
    wiki: &str,
    definition: &ClassDefinition,
) -> Result<Class, BuildError> {
    build_class(links, wiki, definition).inspect_err(log_abandoned("class"))
}

fn build_class(
    links: &LinkResolver<'_>,
    wiki: &str,
    definition: &ClassDefinition,
) -> Result<Class, BuildError> {
    let params = Parameters::new()
        .with(Param::WikiName, wiki)
        .with(Param::ClassName, &definition.name);
    let link = links.link(ResourceType::Class, &params, Relation::SelfRef)?;

    let properties = definition
        .properties
        .iter()
        .map(|property| ClassProperty {
            name: property.name.clone(),
            property_type: property.kind.class_type().to_string(),
            properties: property
                .meta
                .iter()
                .map(|meta| Property::new(&meta.name, display_value(meta)))
                .collect(),
        })
        .collect();

    Ok(Class {
        class_name: definition.name.clone(),
        properties,
        links: vec![link],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::harness::{Harness, href};
    use crate::error::ContentAccessError;
    use crate::source::{Access, DocumentSnapshot, RcsVersion};

    const PAGE: &str = "/wikis/xwiki/spaces/Main/pages/WebHome";

    fn tag_class() -> ClassDefinition {
        ClassDefinition {
            name: "XWiki.TagClass".into(),
            properties: vec![
                ClassPropertyDefinition {
                    name: "tags".into(),
                    kind: PropertyKind::List {
                        class_type: "StaticList".into(),
                        allowed_values: vec!["red".into(), "green".into(), "blue".into()],
                        separators: "|,".into(),
                    },
                    meta: vec![PropertyEntry {
                        name: "prettyName".into(),
                        value: Some(PropertyValue::Text("Tags".into())),
                    }],
                },
                ClassPropertyDefinition {
                    name: "due".into(),
                    kind: PropertyKind::Date {
                        date_format: "dd/MM/yyyy".into(),
                    },
                    meta: vec![PropertyEntry {
                        name: "emptyIsToday".into(),
                        value: None,
                    }],
                },
                ClassPropertyDefinition {
                    name: "weight".into(),
                    kind: PropertyKind::Scalar {
                        class_type: "Number".into(),
                    },
                    meta: vec![],
                },
            ],
        }
    }

    fn object() -> ObjectEntry {
        ObjectEntry {
            guid: "6f1c".into(),
            class_name: "XWiki.TagClass".into(),
            number: 2,
            pretty_name: "Tags".into(),
            properties: vec![
                PropertyEntry {
                    name: "tags".into(),
                    value: Some(PropertyValue::List(vec!["red".into(), "blue".into()])),
                },
                PropertyEntry {
                    name: "due".into(),
                    value: Some(PropertyValue::Integer(1_700_000_000_000)),
                },
                PropertyEntry {
                    name: "weight".into(),
                    value: None,
                },
            ],
        }
    }

    fn doc() -> DocumentSnapshot {
        let mut doc = DocumentSnapshot::new("xwiki", "Main", "WebHome", RcsVersion::new(1, 1));
        doc.classes = vec![tag_class()];
        doc
    }

    #[test]
    fn summary_ids_and_links() {
        let harness = Harness::new();
        let summary = object_summary(&harness.links(), &doc(), &object()).unwrap();

        assert_eq!(summary.id, "xwiki:Main.WebHome:6f1c");
        assert_eq!(summary.page_id, "xwiki:Main.WebHome");
        assert_eq!(summary.links[0].rel, Relation::Page);
        assert_eq!(summary.links[0].href, href(PAGE));
        assert_eq!(summary.links[1].rel, Relation::SelfRef);
        assert_eq!(
            summary.links[1].href,
            href(&format!("{PAGE}/objects/XWiki.TagClass/2"))
        );
    }

    #[test]
    fn lightweight_properties_have_no_type_metadata() {
        let harness = Harness::new();
        let summary = object_summary(&harness.links(), &doc(), &object()).unwrap();

        assert_eq!(summary.properties[0], Property::new("tags", "[red, blue]"));
        assert_eq!(summary.properties[1].value, "1700000000000");
        assert_eq!(summary.properties[2], Property::new("weight", ""));
        assert!(summary.properties.iter().all(|p| p.property_type.is_none()));
    }

    #[test]
    fn typed_list_property_joins_allowed_values_with_comma() {
        let harness = Harness::new();
        let doc = doc();
        let summary = typed_object_summary(&harness.links(), &doc, &doc, &object()).unwrap();

        let tags = &summary.properties[0];
        assert_eq!(tags.property_type.as_deref(), Some("StaticList"));
        assert_eq!(tags.allowed_values.as_deref(), Some("red,green,blue"));
        assert_eq!(tags.separators.as_deref(), Some("|,"));
        assert_eq!(tags.value, "red|blue");
        assert_eq!(tags.date_format, None);
    }

    #[test]
    fn typed_date_and_scalar_properties() {
        let harness = Harness::new();
        let doc = doc();
        let summary = typed_object_summary(&harness.links(), &doc, &doc, &object()).unwrap();

        let due = &summary.properties[1];
        assert_eq!(due.property_type.as_deref(), Some("Date"));
        assert_eq!(due.date_format.as_deref(), Some("dd/MM/yyyy"));
        assert_eq!(due.allowed_values, None);

        let weight = &summary.properties[2];
        assert_eq!(weight.property_type.as_deref(), Some("Number"));
        assert_eq!(weight.value, "");
        assert_eq!(weight.separators, None);
    }

    #[test]
    fn embedded_commas_are_not_escaped() {
        let harness = Harness::new();
        let mut doc = doc();
        doc.classes[0].properties[0].kind = PropertyKind::List {
            class_type: "StaticList".into(),
            allowed_values: vec!["a,b".into(), "c".into()],
            separators: "|".into(),
        };
        let summary = typed_object_summary(&harness.links(), &doc, &doc, &object()).unwrap();
        assert_eq!(summary.properties[0].allowed_values.as_deref(), Some("a,b,c"));
    }

    #[test]
    fn empty_allowed_values_leave_field_unset() {
        let harness = Harness::new();
        let mut doc = doc();
        doc.classes[0].properties[0].kind = PropertyKind::List {
            class_type: "DBList".into(),
            allowed_values: vec![],
            separators: " ".into(),
        };
        let summary = typed_object_summary(&harness.links(), &doc, &doc, &object()).unwrap();
        assert_eq!(summary.properties[0].allowed_values, None);
        assert_eq!(summary.properties[0].separators.as_deref(), Some(" "));
    }

    #[test]
    fn undeclared_property_fails_the_build() {
        let harness = Harness::new();
        let doc = doc();
        let mut object = object();
        object.properties.push(PropertyEntry {
            name: "colour".into(),
            value: Some(PropertyValue::Text("red".into())),
        });

        let err = typed_object_summary(&harness.links(), &doc, &doc, &object).unwrap_err();
        assert_eq!(
            err,
            BuildError::PropertyTypeNotFound {
                class: "XWiki.TagClass".into(),
                property: "colour".into(),
            }
        );
    }

    #[test]
    fn unknown_class_fails_the_build() {
        struct NoClasses;
        impl ClassCatalog for NoClasses {
            fn class(&self, name: &str) -> Access<ClassDefinition> {
                Err(ContentAccessError::new("class", format!("{name} unavailable")))
            }
        }

        let harness = Harness::new();
        let err = typed_object_summary(&harness.links(), &doc(), &NoClasses, &object()).unwrap_err();
        assert!(matches!(err, BuildError::Unavailable(_)));
    }

    #[test]
    fn class_lists_properties_and_settings() {
        let harness = Harness::new();
        let class = class(&harness.links(), "xwiki", &tag_class()).unwrap();

        assert_eq!(class.class_name, "XWiki.TagClass");
        assert_eq!(class.properties.len(), 3);
        assert_eq!(class.properties[0].property_type, "StaticList");
        assert_eq!(
            class.properties[0].properties,
            vec![Property::new("prettyName", "Tags")]
        );
        assert_eq!(
            class.properties[1].properties,
            vec![Property::new("emptyIsToday", "")]
        );
        assert_eq!(class.links.len(), 1);
        assert_eq!(
            class.links[0].href,
            href("/wikis/xwiki/classes/XWiki.TagClass")
        );
    }
}
