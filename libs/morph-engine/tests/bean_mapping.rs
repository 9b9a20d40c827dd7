use std::sync::Arc;

use morph_api::bean::{Bean, PropertyValue};
use morph_api::descriptor::{PrimitiveKind, TypeDescriptor};
use morph_api::dyna::DynaBean;
use morph_api::error::MorphError;
use morph_api::value::Value;
use morph_engine::bean::BeanMorpher;
use morph_engine::registry::MorpherRegistry;
use morph_engine::standard::{register_standard_morphers, StandardMorphers};

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
struct TextBean {
    integer: String,
    name: Option<String>,
    ratio: String,
}

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
struct TypedBean {
    integer: i32,
    name: Option<String>,
    ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
#[bean(name = "Account")]
struct Account {
    id: i64,
    #[bean(rename = "displayName")]
    display: Option<String>,
    #[bean(read_only)]
    checksum: String,
    payload: Value,
    #[bean(skip)]
    cache: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
struct Holder {
    owner: Account,
    tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
struct Widget {
    size: i32,
}

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
struct Credentials {
    user: String,
    #[bean(write_only)]
    secret: String,
}

#[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
struct Login {
    user: String,
    secret: Option<String>,
}

mod inventory {
    #[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
    pub struct Item {
        pub size: i32,
    }
}

mod catalog {
    #[derive(Debug, Clone, PartialEq, Default, morph_api::Bean)]
    pub struct Item {
        pub label: Option<String>,
    }
}

fn standard_registry() -> Arc<MorpherRegistry> {
    let registry = Arc::new(MorpherRegistry::new());
    register_standard_morphers(&registry).unwrap();
    registry
}

fn register_bean<T: PropertyValue>(
    registry: &Arc<MorpherRegistry>,
    lenient: bool,
) -> TypeDescriptor {
    let target = T::type_descriptor();
    let morpher = BeanMorpher::with_leniency(&target, registry, lenient).unwrap();
    registry.register(Arc::new(morpher), false);
    target
}

fn convert<T: PropertyValue>(registry: &MorpherRegistry, value: &Value) -> Result<T, MorphError> {
    T::from_value(registry.convert(&T::type_descriptor(), value)?)
}

#[test]
fn bean_to_bean_with_type_narrowing() {
    let registry = standard_registry();
    register_bean::<TypedBean>(&registry, false);

    let source = TextBean {
        integer: "24".into(),
        name: Some("answer".into()),
        ratio: "0.5".into(),
    };
    let typed: TypedBean = convert(&registry, &source.into_value()).unwrap();

    assert_eq!(
        typed,
        TypedBean {
            integer: 24,
            name: Some("answer".into()),
            ratio: 0.5,
        }
    );
}

#[test]
fn strict_mapping_names_the_property() {
    let registry = Arc::new(MorpherRegistry::new());
    let target = register_bean::<TypedBean>(&registry, false);

    let source = TextBean {
        integer: "24".into(),
        ..Default::default()
    };
    let err = registry.convert(&target, &source.into_value()).unwrap_err();

    match err {
        MorphError::NoMorpher { target, property } => {
            assert_eq!(target, TypeDescriptor::Primitive(PrimitiveKind::Int));
            assert_eq!(property, "integer");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lenient_mapping_leaves_zero_values() {
    let registry = Arc::new(MorpherRegistry::new());
    register_bean::<TypedBean>(&registry, true);

    let source = TextBean {
        integer: "24".into(),
        name: Some("kept".into()),
        ratio: "0.5".into(),
    };
    let typed: TypedBean = convert(&registry, &source.into_value()).unwrap();

    assert_eq!(typed.integer, 0);
    assert_eq!(typed.ratio, 0.0);
    assert_eq!(typed.name.as_deref(), Some("kept"));
}

#[test]
fn dyna_bean_source() {
    let registry = standard_registry();
    register_bean::<TypedBean>(&registry, false);

    let source = DynaBean::new()
        .with("integer", TypeDescriptor::Wrapper(PrimitiveKind::Long), 99i64)
        .with("name", TypeDescriptor::String, "dyna")
        .with("unrelated", TypeDescriptor::Object, Value::Null);
    let typed: TypedBean = convert(&registry, &Value::DynaBean(source)).unwrap();

    assert_eq!(typed.integer, 99);
    assert_eq!(typed.name.as_deref(), Some("dyna"));
    assert_eq!(typed.ratio, 0.0);
}

#[test]
fn unset_dyna_property_into_primitive_yields_zero() {
    let registry = Arc::new(MorpherRegistry::new());
    register_bean::<TypedBean>(&registry, false);

    let mut source = DynaBean::new();
    source.define("integer", TypeDescriptor::Primitive(PrimitiveKind::Int));
    source.define("ratio", TypeDescriptor::Wrapper(PrimitiveKind::Double));
    let typed: TypedBean = convert(&registry, &Value::DynaBean(source)).unwrap();

    assert_eq!(typed, TypedBean::default());
}

#[test]
fn map_source_with_renamed_read_only_and_object_properties() {
    let registry = standard_registry();
    register_bean::<Account>(&registry, false);

    let source = Value::from_json_str(
        r#"{
            "id": "17",
            "displayName": "Ada",
            "display": "ignored",
            "checksum": "ignored",
            "payload": [1, "two"],
            "cache": [1, 2]
        }"#,
    )
    .unwrap();
    let account: Account = convert(&registry, &source).unwrap();

    assert_eq!(account.id, 17);
    assert_eq!(account.display.as_deref(), Some("Ada"));
    assert_eq!(account.checksum, "");
    assert!(account.cache.is_empty());
    assert_eq!(account.payload, source_payload());
}

fn source_payload() -> Value {
    Value::array(
        TypeDescriptor::Object,
        vec![Value::Long(1), Value::from("two")],
    )
}

#[test]
fn nested_beans_and_arrays() {
    let registry = standard_registry();
    register_bean::<Account>(&registry, false);
    register_bean::<Holder>(&registry, false);

    let source = Value::from_json_str(r#"{"owner": {"id": 3}, "tags": ["a", 1, true]}"#).unwrap();
    let holder: Holder = convert(&registry, &source).unwrap();

    assert_eq!(holder.owner.id, 3);
    assert_eq!(holder.tags, vec!["a", "1", "true"]);
}

#[test]
fn null_source_and_bean_class_schema() {
    let registry = standard_registry();
    let target = register_bean::<Account>(&registry, false);

    assert_eq!(registry.convert(&target, &Value::Null).unwrap(), Value::Null);

    let class = Account::bean_class();
    assert_eq!(class.name(), "Account");
    let names: Vec<&str> = class.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "displayName", "checksum", "payload"]);
    assert!(!class.property("checksum").unwrap().writable);
}

#[test]
fn unparseable_property_fails_even_when_lenient() {
    let registry = Arc::new(MorpherRegistry::new());
    StandardMorphers::new().use_defaults(false).register(&registry).unwrap();
    register_bean::<Widget>(&registry, true);

    let source = Value::from_json_str(r#"{"size": "large"}"#).unwrap();
    let err = convert::<Widget>(&registry, &source).unwrap_err();
    assert!(matches!(err, MorphError::Unparseable { .. }), "{err}");
}

#[test]
fn string_source_maps_to_default_bean() {
    let registry = standard_registry();
    register_bean::<Widget>(&registry, false);

    let widget: Widget = convert(&registry, &Value::from("hello")).unwrap();
    assert_eq!(widget, Widget::default());
}

#[test]
fn write_only_source_property_is_not_read() {
    let registry = standard_registry();
    register_bean::<Login>(&registry, false);

    let source = Credentials {
        user: "ada".into(),
        secret: "hunter2".into(),
    };
    let login: Login = convert(&registry, &source.into_value()).unwrap();

    assert_eq!(login.user, "ada");
    assert_eq!(login.secret, None);
}

#[test]
fn same_named_beans_are_distinct_types() {
    let registry = standard_registry();
    let inventory = register_bean::<inventory::Item>(&registry, false);
    let catalog = catalog::Item::type_descriptor();

    assert_ne!(inventory, catalog);
    assert_eq!(inventory.to_string(), catalog.to_string());
    assert!(!catalog.is_assignable_from(&inventory));

    // No morpher is registered for the second `Item`: identity passes the map through.
    let source = Value::from_json_str(r#"{"size": "4", "label": "x"}"#).unwrap();
    assert_eq!(registry.convert(&catalog, &source).unwrap(), source);

    register_bean::<catalog::Item>(&registry, false);
    let item: catalog::Item = convert(&registry, &source).unwrap();
    assert_eq!(item.label.as_deref(), Some("x"));
    let item: inventory::Item = convert(&registry, &source).unwrap();
    assert_eq!(item.size, 4);
}
