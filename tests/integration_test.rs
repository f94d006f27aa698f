use content_graph::builder::MAX_INCLUDE_DEPTH;
use content_graph::model::{BaseResource, CustomResource, FieldValue, Resource};
use content_graph::support::sys_str;
use content_graph::{BuildConfig, BuildContext, ResourceBuilder, ResourceError, ResourceFactory, ResourceMapping};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

fn link(kind: &str, id: &str) -> Value {
    json!({"sys": {"type": "Link", "linkType": kind, "id": id}})
}

fn cat_entry(id: &str, content_type: &str) -> Value {
    json!({
        "sys": {
            "type": "Entry",
            "id": id,
            "contentType": link("ContentType", content_type)
        },
        "fields": {"name": id}
    })
}

fn nyan_asset() -> Value {
    json!({
        "sys": {"type": "Asset", "id": "nyan"},
        "fields": {
            "title": "Nyan Cat",
            "file": {"fileName": "nyan.png", "contentType": "image/png", "url": "//images.example.com/nyan.png"}
        }
    })
}

fn build(raw: Value, config: BuildConfig) -> Result<content_graph::Built, ResourceError> {
    ResourceBuilder::new(raw, config).run()
}

#[derive(Debug)]
struct Cat {
    base: BaseResource,
    name: String,
}

impl CustomResource for Cat {
    fn kind_name(&self) -> &str {
        "Cat"
    }

    fn base(&self) -> &BaseResource {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Pet {
    base: BaseResource,
}

impl CustomResource for Pet {
    fn kind_name(&self) -> &str {
        "Pet"
    }

    fn base(&self) -> &BaseResource {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn build_cat(node: &Value, ctx: &BuildContext<'_>) -> Result<Resource, ResourceError> {
    let name = node["fields"]["name"].as_str().unwrap_or_default().to_uppercase();
    Ok(Resource::Custom(Arc::new(Cat {
        base: BaseResource::new(node, ctx)?,
        name,
    })))
}

fn build_pet(node: &Value, ctx: &BuildContext<'_>) -> Result<Resource, ResourceError> {
    Ok(Resource::Custom(Arc::new(Pet {
        base: BaseResource::new(node, ctx)?,
    })))
}

/// An entry linking an included asset gets the asset inlined.
#[test]
fn test_collection_inlines_included_asset() {
    let raw = json!({
        "sys": {"type": "Array"},
        "total": 1,
        "skip": 0,
        "limit": 100,
        "items": [{
            "sys": {"type": "Entry", "id": "nyancat"},
            "fields": {"name": "Nyan Cat", "image": link("Asset", "nyan")}
        }],
        "includes": {"Asset": [nyan_asset()]}
    });

    let collection = build(raw, BuildConfig::default())
        .expect("Failed to build")
        .into_collection()
        .expect("Not a collection");
    assert_eq!(collection.total(), Some(1));
    assert_eq!(collection.skip(), Some(0));
    assert_eq!(collection.limit(), Some(100));
    assert!(!collection.is_sync_page());

    let cat = collection.items()[0].as_entry().expect("Not an entry");
    let image = cat
        .get_field("image")
        .unwrap()
        .as_resource()
        .and_then(Resource::as_asset)
        .expect("Image not inlined");
    assert_eq!(image.id(), "nyan");
    assert_eq!(image.title(), Some("Nyan Cat"));
    assert_eq!(image.url(), "//images.example.com/nyan.png");
}

/// The same link without the include stays a link.
#[test]
fn test_missing_include_leaves_link() {
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [{
            "sys": {"type": "Entry", "id": "nyancat"},
            "fields": {"image": link("Asset", "nyan")}
        }]
    });

    let collection = build(raw, BuildConfig::default()).unwrap().into_collection().unwrap();
    let image = collection.items()[0].as_entry().unwrap().get_field("image").unwrap();
    let unresolved = image.as_link().expect("Expected a link");
    assert_eq!(unresolved.id, "nyan");
    assert_eq!(unresolved.link_type, "Asset");
}

/// Arrays of links are coerced element by element, mixing inlined and unresolved.
#[test]
fn test_link_arrays_keep_order() {
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [{
            "sys": {"type": "Entry", "id": "nyancat"},
            "fields": {"friends": [link("Entry", "happycat"), link("Entry", "grumpycat")]}
        }],
        "includes": {"Entry": [cat_entry("happycat", "cat")]}
    });

    let collection = build(raw, BuildConfig::default()).unwrap().into_collection().unwrap();
    let friends = collection.items()[0].as_entry().unwrap().get_field("friends").unwrap();
    let friends = friends.as_list().expect("Expected a list");
    assert_eq!(friends.len(), 2);
    assert_eq!(friends[0].as_resource().unwrap().id(), "happycat");
    assert_eq!(friends[1].as_link().unwrap().id, "grumpycat");
}

/// A -> B -> A terminates: after the depth ceiling the reference is a link.
#[test]
fn test_cyclic_links_stop_at_depth_ceiling() {
    let a = json!({"sys": {"type": "Entry", "id": "a"}, "fields": {"friend": link("Entry", "b")}});
    let b = json!({"sys": {"type": "Entry", "id": "b"}, "fields": {"friend": link("Entry", "a")}});
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [a.clone()],
        "includes": {"Entry": [a, b]}
    });

    let collection = build(raw, BuildConfig::default()).unwrap().into_collection().unwrap();
    let mut current = collection.items()[0].clone();
    for _ in 0..MAX_INCLUDE_DEPTH {
        let next = current
            .as_entry()
            .unwrap()
            .get_field("friend")
            .unwrap()
            .as_resource()
            .expect("Should be inlined below the ceiling")
            .clone();
        current = next;
    }

    // Ten hops from `a` lands on `a` again, whose friend is left unresolved.
    assert_eq!(current.id(), "a");
    let friend = current.as_entry().unwrap().get_field("friend").unwrap();
    assert_eq!(friend.as_link().expect("Expected a link at the ceiling").id, "b");
}

/// A configured starting depth shortens the inlining budget.
#[test]
fn test_start_depth_counts_toward_ceiling() {
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [{"sys": {"type": "Entry", "id": "nyancat"}, "fields": {"image": link("Asset", "nyan")}}],
        "includes": {"Asset": [nyan_asset()]}
    });

    let config = BuildConfig::default().depth(MAX_INCLUDE_DEPTH);
    let collection = build(raw, config).unwrap().into_collection().unwrap();
    let image = collection.items()[0].as_entry().unwrap().get_field("image").unwrap();
    assert!(matches!(image, FieldValue::Link(_)));
}

/// Counts are optional; items keep source order and length.
#[test]
fn test_collection_without_counts() {
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [
            cat_entry("nyancat", "cat"),
            nyan_asset(),
            {"sys": {"type": "ContentType", "id": "cat"}, "name": "Cat", "fields": []},
            {"sys": {"type": "Space", "id": "cfexampleapi"}, "locales": []}
        ]
    });

    let collection = build(raw, BuildConfig::default()).unwrap().into_collection().unwrap();
    assert_eq!(collection.total(), None);
    assert_eq!(collection.skip(), None);
    assert_eq!(collection.limit(), None);
    assert_eq!(collection.len(), 4);

    let kinds: Vec<_> = collection.iter().map(Resource::kind_name).collect();
    assert_eq!(kinds, vec!["Entry", "Asset", "ContentType", "Space"]);
}

/// One sloppy content type or space does not fail the page it is on.
#[test]
fn test_malformed_definitions_do_not_fail_collection() {
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [
            {
                "sys": {"type": "ContentType", "id": "cat"},
                "name": "Cat",
                "fields": [{"id": "name", "type": "Text", "localized": true}]
            },
            {
                "sys": {"type": "ContentType", "id": "dog"},
                "name": "Dog",
                "fields": [{"id": "name", "type": "Text", "localized": null}]
            },
            {
                "sys": {"type": "Space", "id": "cfexampleapi"},
                "locales": [{"code": "en-US", "default": null}]
            }
        ]
    });

    let collection = build(raw, BuildConfig::default())
        .expect("Malformed definitions should not fail the build")
        .into_collection()
        .unwrap();
    assert_eq!(collection.len(), 3);

    let dog = collection.items()[1].as_content_type().expect("Not a content type");
    let name = dog.field_for("name").expect("Field definition dropped");
    assert_eq!(name.field_type, "Text");
    assert!(!name.localized);

    let space = collection.items()[2].as_space().unwrap();
    assert_eq!(space.locales[0].code, "en-US");
    assert!(space.default_locale().is_none());
}

/// A broken `details` block leaves the rest of the file intact.
#[test]
fn test_asset_file_survives_broken_details() {
    let raw = json!({
        "sys": {"type": "Asset", "id": "nyan"},
        "fields": {
            "file": {
                "url": "//img/nyan.png",
                "fileName": "nyan.png",
                "details": {"size": 12273, "image": {"width": 250.5, "height": 250}}
            }
        }
    });

    let resource = build(raw, BuildConfig::default()).unwrap().into_resource().unwrap();
    let asset = resource.as_asset().unwrap();
    let file = asset.file(None).expect("File dropped");
    assert_eq!(asset.url(), "//img/nyan.png");
    assert_eq!(file.file_name.as_deref(), Some("nyan.png"));
    assert_eq!(file.size(), Some(12273));
    assert_eq!(file.height(), Some(250));
}

#[test]
fn test_empty_collection() {
    let collection = build(json!({"sys": {"type": "Array"}}), BuildConfig::default())
        .unwrap()
        .into_collection()
        .unwrap();
    assert!(collection.is_empty());
}

/// Unknown kinds fail the whole build, at the root or inside a collection.
#[test]
fn test_unknown_kind_is_unparsable() {
    let err = build(json!({"sys": {"type": "Widget", "id": "w"}}), BuildConfig::default()).unwrap_err();
    assert!(matches!(err, ResourceError::UnparsableResource(_)));
    assert!(err.to_string().contains("Item type is not known"));

    let raw = json!({
        "sys": {"type": "Array"},
        "items": [cat_entry("nyancat", "cat"), {"sys": {"type": "Widget", "id": "w"}}]
    });
    let err = build(raw, BuildConfig::default()).unwrap_err();
    assert!(matches!(err, ResourceError::UnparsableResource(_)));
}

/// A malformed date aborts the build.
#[test]
fn test_malformed_timestamp_aborts_build() {
    let raw = json!({"sys": {"type": "Entry", "id": "nyancat", "createdAt": "yesterday"}});
    let err = build(raw, BuildConfig::default()).unwrap_err();
    match err {
        ResourceError::MalformedTimestamp { field, .. } => assert_eq!(field, "createdAt"),
        other => panic!("Unexpected error: {other:?}"),
    }
}

/// Sync pages hydrate localized fields even when the config says otherwise.
#[test]
fn test_sync_page_forces_localized_fields() {
    let raw = json!({
        "sys": {"type": "Array"},
        "nextSyncUrl": "https://cdn.example.com/spaces/x/sync?sync_token=abc",
        "items": [
            {
                "sys": {"type": "Entry", "id": "nyancat"},
                "fields": {"name": {"en-US": "Nyan Cat", "tlh": "Nyan vIghro'"}}
            },
            {
                "sys": {"type": "DeletedEntry", "id": "grumpycat", "deletedAt": "2013-06-27T22:46:15.106Z"}
            }
        ]
    });

    let collection = build(raw, BuildConfig::default()).unwrap().into_collection().unwrap();
    assert!(collection.is_sync_page());
    assert_eq!(
        collection.next_sync_url(),
        Some("https://cdn.example.com/spaces/x/sync?sync_token=abc")
    );
    assert_eq!(collection.next_page_url(), None);

    let cat = collection.items()[0].as_entry().unwrap();
    assert_eq!(cat.locales(), vec!["en-US", "tlh"]);
    assert_eq!(cat.get_field("name").unwrap().as_str(), Some("Nyan Cat"));
    assert_eq!(cat.get_field_in("name", "tlh").unwrap().as_str(), Some("Nyan vIghro'"));

    let Resource::DeletedEntry(deleted) = &collection.items()[1] else {
        panic!("Expected a deleted entry");
    };
    assert!(deleted.deleted_at().is_some());
}

/// Localized builds of non-sync collections follow the config.
#[test]
fn test_localized_config_groups_fields_by_locale() {
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [{"sys": {"type": "Entry", "id": "nyancat"}, "fields": {"name": {"en-US": "Nyan", "de-DE": "Nyan Katze"}}}]
    });

    let collection = build(raw, BuildConfig::default().localized(true)).unwrap().into_collection().unwrap();
    let cat = collection.items()[0].as_entry().unwrap();
    let by_field = cat.fields_with_locales();
    assert_eq!(by_field["name"].len(), 2);
    assert_eq!(by_field["name"]["de-DE"].as_str(), Some("Nyan Katze"));
}

/// Single items use the caller's includes plus their own.
#[test]
fn test_single_item_with_caller_includes() {
    let raw = json!({
        "sys": {"type": "Entry", "id": "nyancat"},
        "fields": {"image": link("Asset", "nyan"), "friend": link("Entry", "happycat")},
        "includes": {"Entry": [cat_entry("happycat", "cat")]}
    });

    let resource = ResourceBuilder::new(raw, BuildConfig::default())
        .with_includes(vec![nyan_asset()])
        .run()
        .unwrap()
        .into_resource()
        .expect("Not a single resource");
    let cat = resource.as_entry().unwrap();
    assert!(cat.get_field("image").unwrap().as_resource().is_some());
    assert!(cat.get_field("friend").unwrap().as_resource().is_some());
}

/// Content-type mappings win over the generic entry mapping.
#[test]
fn test_entry_mapping_wins_over_resource_mapping() {
    let config = BuildConfig::default()
        .with_resource_mapping("Entry", ResourceMapping::constructor(build_pet))
        .with_entry_mapping("cat", ResourceMapping::constructor(build_cat));
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [cat_entry("nyancat", "cat"), cat_entry("rex", "dog"), nyan_asset()]
    });

    let collection = build(raw, config).unwrap().into_collection().unwrap();
    let items = collection.items();

    let cat = items[0].as_custom::<Cat>().expect("Expected a Cat");
    assert_eq!(cat.name, "NYANCAT");
    assert_eq!(items[0].kind_name(), "Cat");

    assert!(items[1].as_custom::<Pet>().is_some());
    assert!(items[1].as_custom::<Cat>().is_none());

    // Assets keep their default constructor.
    assert!(items[2].as_asset().is_some());
}

/// Mappings also apply to nested resources.
#[test]
fn test_mapping_applies_to_inlined_links() {
    let config = BuildConfig::default().with_entry_mapping("cat", ResourceMapping::constructor(build_cat));
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [{"sys": {"type": "Entry", "id": "owner"}, "fields": {"pet": link("Entry", "nyancat")}}],
        "includes": {"Entry": [cat_entry("nyancat", "cat")]}
    });

    let collection = build(raw, config).unwrap().into_collection().unwrap();
    let pet = collection.items()[0].as_entry().unwrap().get_field("pet").unwrap();
    assert!(pet.as_resource().unwrap().as_custom::<Cat>().is_some());
}

/// A selector picks per node; `None` falls back to the default constructor.
#[test]
fn test_selector_mapping_falls_back_to_default() {
    let selector = ResourceMapping::select(|node: &Value| {
        if sys_str(node, "id") == Some("nyancat") {
            Some(Arc::new(build_cat) as Arc<dyn ResourceFactory>)
        } else {
            None
        }
    });
    let config = BuildConfig::default().with_entry_mapping("cat", selector);
    let raw = json!({
        "sys": {"type": "Array"},
        "items": [cat_entry("nyancat", "cat"), cat_entry("happycat", "cat")]
    });

    let collection = build(raw, config).unwrap().into_collection().unwrap();
    assert!(collection.items()[0].as_custom::<Cat>().is_some());
    assert!(collection.items()[1].as_entry().is_some());
}

/// Constructor errors propagate out of the build.
#[test]
fn test_constructor_error_propagates() {
    let config = BuildConfig::default().with_resource_mapping(
        "Asset",
        ResourceMapping::constructor(|_: &Value, _: &BuildContext<'_>| Err(ResourceError::from("no assets".to_string()))),
    );
    let err = build(nyan_asset(), config).unwrap_err();
    assert!(matches!(err, ResourceError::Custom(msg) if msg == "no assets"));
}

/// Identity is kind plus id.
#[test]
fn test_resource_equality_by_kind_and_id() {
    let first = build(cat_entry("nyancat", "cat"), BuildConfig::default()).unwrap().into_resource().unwrap();
    let mut changed = cat_entry("nyancat", "cat");
    changed["fields"]["name"] = json!("Someone else");
    let second = build(changed, BuildConfig::default()).unwrap().into_resource().unwrap();
    assert_eq!(first, second);

    let asset = json!({"sys": {"type": "Asset", "id": "nyancat"}});
    let asset = build(asset, BuildConfig::default()).unwrap().into_resource().unwrap();
    assert_ne!(first, asset);
}

/// Field lookup by unknown name is an error; names are snake_cased.
#[test]
fn test_dynamic_field_lookup() {
    let raw = json!({"sys": {"type": "Entry", "id": "nyancat"}, "fields": {"likesCheese": true}});
    let resource = build(raw, BuildConfig::default()).unwrap().into_resource().unwrap();
    let cat = resource.as_entry().unwrap();

    assert_eq!(cat.get_field("likes_cheese").unwrap().as_json(), Some(&json!(true)));
    assert_eq!(cat.get_field("likesCheese").unwrap().as_json(), Some(&json!(true)));
    assert!(matches!(cat.get_field("whiskers"), Err(ResourceError::UnknownField(_))));
}

#[test]
fn test_setup_tracing_is_idempotent() {
    content_graph::telemetry::setup_tracing();
    content_graph::telemetry::setup_tracing();
}
