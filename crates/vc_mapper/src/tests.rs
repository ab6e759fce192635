//! End-to-end behaviour of derived types.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::any::type_name;

use crate::construct::ConstructorKind;
use crate::derive::Mapped;
use crate::document::{DocumentNode, OrderedMap};
use crate::info::{DescriptorBuilder, Include, MinVisibility, Visibility, VisibilityRules};
use crate::mapper::{ReadContext, WriteContext};
use crate::poly::{DynamicType, PolymorphicBase, Subtypes};
use crate::value::{Codec, Maybe};
use crate::{DiscriminatorError, MapError, Mapper, MapperConfig, SchemaError, object};

fn keys(node: &DocumentNode) -> Vec<&str> {
    node.as_object().unwrap().keys().collect()
}

// -----------------------------------------------------------------------------
// Plain values

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(default)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub tags: Vec<String>,
    pub nick: Option<String>,
}

#[test]
fn round_trip() {
    let mapper = Mapper::new();
    let person = Person {
        name: "Ada".into(),
        age: 36,
        tags: vec!["math".into()],
        nick: None,
    };
    let node = mapper.write(&person).unwrap();
    assert_eq!(
        node,
        object! {
            "name" => "Ada",
            "age" => 36,
            "tags" => vec![DocumentNode::from("math")],
            "nick" => DocumentNode::Null,
        }
    );
    assert_eq!(keys(&node), ["name", "age", "tags", "nick"]);
    assert_eq!(mapper.read::<Person>(&node).unwrap(), person);
}

#[test]
fn missing_keys_keep_defaults() {
    let person: Person = Mapper::new().read(&object! { "name" => "Bob" }).unwrap();
    assert_eq!(person.age, 0);
    assert_eq!(person.nick, None);
}

#[test]
fn json_text_helpers() {
    let mapper = Mapper::new();
    let person: Person = mapper
        .from_json_str(r#"{"name":"Eve","age":"41","tags":[],"nick":"e"}"#)
        .unwrap();
    assert_eq!(person.age, 41);
    assert_eq!(
        mapper.to_json_string(&person).unwrap(),
        r#"{"name":"Eve","age":41,"tags":[],"nick":"e"}"#
    );
    assert!(matches!(mapper.from_json_str::<Person>("{"), Err(MapError::Json(_))));
}

#[derive(Mapped, Default, Debug)]
#[mapped(default)]
pub struct Team {
    pub members: Vec<Person>,
}

#[test]
fn coercion_errors_carry_the_path() {
    let mapper = Mapper::new();
    let node = object! {
        "members" => vec![
            object! { "name" => "ok" },
            object! { "age" => true },
        ],
    };
    let err = mapper.read::<Team>(&node).unwrap_err();
    assert_eq!(err.path().unwrap().to_string(), "$.members[1].age");

    let err = mapper.read::<Person>(&object! { "age" => DocumentNode::Null }).unwrap_err();
    assert!(matches!(&err, MapError::ValueCoercion { expected, .. } if expected == "u32"));
    assert_eq!(err.path().unwrap().to_string(), "$.age");

    let err = mapper.read::<Person>(&DocumentNode::from(3)).unwrap_err();
    assert!(err.path().unwrap().is_root());
}

// -----------------------------------------------------------------------------
// Inclusion

#[derive(Mapped, Default)]
#[mapped(default, include = NonNull)]
pub struct Sparse {
    pub a: Option<i32>,
    pub b: i32,
}

#[test]
fn non_null_omits_nulls() {
    let mapper = Mapper::new();
    let empty = mapper.write(&Sparse { a: None, b: 0 }).unwrap();
    assert_eq!(keys(&empty), ["b"]);
    let full = mapper.write(&Sparse { a: Some(1), b: 0 }).unwrap();
    assert_eq!(full, object! { "a" => 1, "b" => 0 });
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Toggle {
    #[mapped(include = NonDefault)]
    pub on: bool,
    pub n: i32,
}

#[test]
fn non_default_drops_false() {
    let mapper = Mapper::new();
    let off = mapper.write(&Toggle { on: false, n: 0 }).unwrap();
    assert_eq!(off, object! { "n" => 0 });
    let on = mapper.write(&Toggle { on: true, n: 0 }).unwrap();
    assert_eq!(on, object! { "on" => true, "n" => 0 });
}

#[derive(Mapped, Default)]
#[mapped(default, include = NonNull)]
pub struct Patch {
    pub name: Maybe<String>,
    pub note: Option<String>,
}

#[derive(Mapped, Default)]
#[mapped(default, include = NonAbsent)]
pub struct StrictPatch {
    pub name: Maybe<String>,
    pub note: Option<String>,
}

#[test]
fn absent_values_are_told_apart_from_nulls() {
    let mapper = Mapper::new();
    let patch = Patch {
        name: Maybe::Absent,
        note: None,
    };
    assert_eq!(mapper.write(&patch).unwrap(), object! { "name" => DocumentNode::Null });

    let strict = StrictPatch {
        name: Maybe::Absent,
        note: None,
    };
    assert_eq!(mapper.write(&strict).unwrap(), object! {});

    let read: Patch = mapper.read(&object! { "name" => DocumentNode::Null }).unwrap();
    assert_eq!(read.name, Maybe::Absent);
}

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(default)]
pub struct Margin {
    pub top: i32,
    pub left: i32,
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Frame {
    pub title: String,
    #[mapped(include = NonDefault)]
    pub margin: Margin,
}

#[test]
fn non_default_compares_objects_with_a_fresh_default() {
    let mapper = Mapper::new();
    let desc = mapper.describe::<Frame>().unwrap();
    assert!(!desc.property("margin").unwrap().non_default_degraded());

    let plain = Frame {
        title: "a".into(),
        margin: Margin::default(),
    };
    assert_eq!(mapper.write(&plain).unwrap(), object! { "title" => "a" });

    let padded = Frame {
        title: "a".into(),
        margin: Margin { top: 4, left: 0 },
    };
    let node = mapper.write(&padded).unwrap();
    assert_eq!(keys(&node), ["title", "margin"]);
    assert_eq!(node.get("margin"), Some(&object! { "top" => 4, "left" => 0 }));
}

#[derive(Mapped, Debug, PartialEq)]
#[mapped(include = NonNull, creator(call = Note::new, args = ["text"], optional = ["text"]))]
pub struct Note {
    pub text: Option<String>,
}

impl Note {
    fn new(text: Option<String>) -> Self {
        Self { text }
    }
}

#[derive(Mapped)]
pub struct Holder {
    #[mapped(include = NonDefault)]
    pub reply: Reply,
    #[mapped(include = NonDefault)]
    pub note: Note,
}

#[test]
fn non_default_degrades_without_a_default() {
    let mapper = Mapper::new();
    let desc = mapper.describe::<Holder>().unwrap();
    assert!(desc.property("reply").unwrap().non_default_degraded());
    assert!(desc.property("note").unwrap().non_default_degraded());
    assert_eq!(desc.constructor(), ConstructorKind::None);

    let err = mapper.read::<Holder>(&object! {}).err().unwrap();
    assert!(matches!(err, MapError::NotConstructible { .. }));

    let holder = Holder {
        reply: Reply::new(0, String::new()),
        note: Note::new(None),
    };
    let node = mapper.write(&holder).unwrap();
    assert_eq!(keys(&node), ["reply"]);
    assert_eq!(
        node.get("reply"),
        Some(&object! { "code" => 0, "msg" => "", "extra" => DocumentNode::Null })
    );

    let holder = Holder {
        note: Note::new(Some("hi".into())),
        ..holder
    };
    let node = mapper.write(&holder).unwrap();
    assert_eq!(keys(&node), ["reply", "note"]);
    assert_eq!(node.get("note"), Some(&object! { "text" => "hi" }));
}

// -----------------------------------------------------------------------------
// Unknown keys and the any-bucket

#[derive(Mapped, Default, Debug)]
#[mapped(default)]
pub struct Small {
    pub a: i32,
}

#[derive(Mapped, Default, Debug)]
#[mapped(default, ignore_unknown)]
pub struct Lenient {
    pub a: i32,
}

#[derive(Mapped, Default, Debug)]
#[mapped(default, ignore_unknown = false)]
pub struct Strict {
    pub a: i32,
}

#[test]
fn unknown_keys() {
    let node = object! { "a" => 1, "b" => 2 };
    let mapper = Mapper::new();

    let err = mapper.read::<Small>(&node).unwrap_err();
    assert!(matches!(&err, MapError::UnknownKey { key, .. } if key == "b"));
    assert!(err.to_string().contains("\"b\""));

    assert_eq!(mapper.read::<Lenient>(&node).unwrap().a, 1);
    assert_eq!(mapper.reader().ignore_unknown(true).read::<Small>(&node).unwrap().a, 1);

    let tolerant = Mapper::with_config(MapperConfig::DEFAULT.with_ignore_unknown(true));
    assert_eq!(tolerant.read::<Small>(&node).unwrap().a, 1);
    assert!(tolerant.read::<Strict>(&node).is_err());
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Open {
    pub id: i32,
    #[mapped(any_bucket)]
    pub extra: OrderedMap<DocumentNode>,
}

#[test]
fn any_bucket_keeps_insertion_order() {
    let mapper = Mapper::new();
    let node = object! { "z" => true, "id" => 7, "a" => "x" };
    let open: Open = mapper.read(&node).unwrap();
    assert_eq!(open.id, 7);
    assert_eq!(open.extra.keys().collect::<Vec<_>>(), ["z", "a"]);

    let written = mapper.write(&open).unwrap();
    assert_eq!(keys(&written), ["id", "z", "a"]);
    assert_eq!(written.get("a"), Some(&DocumentNode::from("x")));
}

#[test]
fn any_bucket_never_replaces_declared_keys() {
    let mapper = Mapper::new();
    let mut extra = OrderedMap::new();
    extra.insert("id", DocumentNode::from(99));
    extra.insert("note", DocumentNode::from("x"));
    let open = Open { id: 7, extra };

    let written = mapper.write(&open).unwrap();
    assert_eq!(written, object! { "id" => 7, "note" => "x" });

    let back: Open = mapper.read(&written).unwrap();
    assert_eq!(back.id, 7);
    assert_eq!(back.extra.keys().collect::<Vec<_>>(), ["note"]);
}

#[test]
fn wide_objects_fill_the_bucket_in_order() {
    let mut node = object! { "id" => 1 };
    if let DocumentNode::Object(map) = &mut node {
        for i in 0..20_000 {
            map.insert(format!("k{i}"), DocumentNode::from(i));
        }
    }
    let open: Open = Mapper::new().read(&node).unwrap();
    assert_eq!(open.extra.len(), 20_000);
    assert_eq!(open.extra.first(), Some(("k0", &DocumentNode::from(0))));
    assert_eq!(open.extra.get("k19999"), Some(&DocumentNode::from(19_999)));
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct FilteredBucket {
    #[mapped(any_bucket, include = NonNull)]
    pub extra: BTreeMap<String, Option<i32>>,
}

#[test]
fn any_bucket_entries_are_filtered_one_by_one() {
    let mut extra = BTreeMap::new();
    extra.insert("kept".to_string(), Some(1));
    extra.insert("dropped".to_string(), None);
    let node = Mapper::new().write(&FilteredBucket { extra }).unwrap();
    assert_eq!(node, object! { "kept" => 1 });
}

// -----------------------------------------------------------------------------
// Construction

#[derive(Mapped, Debug, PartialEq)]
#[mapped(creator(call = Reply::new, args = ["code", "msg"]))]
pub struct Reply {
    pub code: i32,
    pub msg: String,
    pub extra: Option<String>,
}

impl Reply {
    fn new(code: i32, msg: String) -> Self {
        Self {
            code,
            msg,
            extra: None,
        }
    }
}

#[test]
fn creator_requires_mandatory_arguments() {
    let mapper = Mapper::new();
    let err = mapper.read::<Reply>(&object! { "code" => 2 }).unwrap_err();
    assert!(matches!(&err, MapError::MissingRequiredArgument { key, .. } if key == "msg"));

    let err = mapper.read::<Reply>(&object! {}).unwrap_err();
    assert!(matches!(&err, MapError::MissingRequiredArgument { key, .. } if key == "code"));

    let reply: Reply = mapper
        .read(&object! { "code" => 2, "msg" => "ok", "extra" => "more" })
        .unwrap();
    assert_eq!(
        reply,
        Reply {
            code: 2,
            msg: "ok".into(),
            extra: Some("more".into()),
        }
    );
    assert_eq!(mapper.describe::<Reply>().unwrap().constructor(), ConstructorKind::Properties);
}

#[derive(Mapped, Debug)]
#[mapped(creator(call = Version::new, args = ["major", "minor"], optional = ["minor"]))]
pub struct Version {
    pub major: u32,
    pub minor: Option<u32>,
}

impl Version {
    fn new(major: u32, minor: Option<u32>) -> Self {
        Self { major, minor }
    }
}

#[test]
fn optional_creator_arguments_fall_back() {
    let version: Version = Mapper::new().read(&object! { "major" => 3 }).unwrap();
    assert_eq!((version.major, version.minor), (3, None));
}

#[derive(Mapped, Debug)]
#[mapped(map_creator = Tally::from_map)]
pub struct Tally {
    pub total: i64,
}

impl Tally {
    fn from_map(map: BTreeMap<String, i64>) -> Self {
        Self {
            total: map.values().sum(),
        }
    }
}

#[test]
fn map_creator_receives_the_whole_object() {
    let mapper = Mapper::new();
    let tally: Tally = mapper.read(&object! { "x" => 1, "y" => 2 }).unwrap();
    assert_eq!(tally.total, 3);
    assert_eq!(mapper.write(&tally).unwrap(), object! { "total" => 3 });
    assert_eq!(mapper.describe::<Tally>().unwrap().constructor(), ConstructorKind::Delegating);
}

// -----------------------------------------------------------------------------
// Naming and visibility

#[derive(Mapped, Default)]
#[mapped(default, rename_all = "camelCase")]
pub struct Renamed {
    pub first_name: String,
    #[mapped(rename = "SURNAME")]
    pub last_name: String,
}

#[test]
fn rename_beats_the_naming_strategy() {
    let node = Mapper::new().write(&Renamed::default()).unwrap();
    assert_eq!(keys(&node), ["firstName", "SURNAME"]);
}

#[derive(Default)]
pub struct Temperature {
    celsius: f64,
}

impl crate::Mapped for Temperature {
    fn describe(builder: &mut DescriptorBuilder<Self>) {
        builder.default_constructor(Temperature::default);
        builder
            .field("celsius", Visibility::Private, |t| &t.celsius, |t| &mut t.celsius)
            .rename("c");
        builder
            .getter("fahrenheit", Visibility::Public, |t| t.celsius * 1.8 + 32.0)
            .accessor_key("f");
    }
}
crate::impl_map_value!(Temperature);

#[test]
fn accessor_keys_and_computed_getters() {
    let mapper = Mapper::new();
    let node = mapper.write(&Temperature { celsius: 100.0 }).unwrap();
    assert_eq!(node, object! { "c" => 100.0, "f" => 212.0 });

    let temp: Temperature = mapper.read(&object! { "c" => 5, "f" => 0 }).unwrap();
    assert_eq!(temp.celsius, 5.0);
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Account {
    pub id: u32,
    secret: String,
    pub(crate) note: String,
}

#[derive(Mapped, Default)]
#[mapped(default, visibility(write = PublicOnly, read = Any))]
pub struct OpenAccount {
    pub id: u32,
    secret: String,
}

#[test]
fn visibility_thresholds() {
    let mapper = Mapper::new();
    let account = Account {
        id: 1,
        secret: "s".into(),
        note: "n".into(),
    };
    assert_eq!(keys(&mapper.write(&account).unwrap()), ["id", "secret", "note"]);

    let read: Account = mapper
        .read(&object! { "id" => 2, "secret" => "x", "note" => "y" })
        .unwrap();
    assert_eq!((read.id, read.secret.as_str(), read.note.as_str()), (2, "", "y"));

    let open = OpenAccount {
        id: 1,
        secret: "s".into(),
    };
    assert_eq!(keys(&mapper.write(&open).unwrap()), ["id"]);
    let read: OpenAccount = mapper.read(&object! { "secret" => "x" }).unwrap();
    assert_eq!(read.secret, "x");

    let closed = Mapper::with_config(MapperConfig::DEFAULT.with_visibility(VisibilityRules::new(
        MinVisibility::PublicOnly,
        MinVisibility::PublicOnly,
    )));
    assert_eq!(keys(&closed.write(&account).unwrap()), ["id"]);
}

// -----------------------------------------------------------------------------
// Ignoring

#[derive(Mapped, Default)]
#[mapped(default, ignore_properties = ["password"])]
pub struct Login {
    pub user: String,
    pub password: String,
}

#[derive(Mapped, Default)]
#[mapped(default, ignore_properties = ["token"], allow_getters)]
pub struct Session {
    pub user: String,
    pub token: String,
}

#[test]
fn type_level_ignore_lists() {
    let mapper = Mapper::new();
    let login = Login {
        user: "u".into(),
        password: "p".into(),
    };
    assert_eq!(mapper.write(&login).unwrap(), object! { "user" => "u" });
    let read: Login = mapper.read(&object! { "user" => "u", "password" => "p" }).unwrap();
    assert_eq!(read.password, "");

    let session = Session {
        user: "u".into(),
        token: "t".into(),
    };
    let node = mapper.write(&session).unwrap();
    assert_eq!(node, object! { "user" => "u", "token" => "t" });
    assert_eq!(mapper.read::<Session>(&node).unwrap().token, "");
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Cache {
    pub hits: u32,
    #[mapped(ignore)]
    pub scratch: String,
    #[mapped(ignore_read)]
    pub computed: u32,
    #[mapped(any_bucket)]
    pub rest: OrderedMap<DocumentNode>,
}

#[test]
fn ignored_keys_never_reach_the_bucket() {
    let mapper = Mapper::new();
    let node = object! { "hits" => 1, "scratch" => "x", "computed" => 9, "other" => 0 };
    let cache: Cache = mapper.read(&node).unwrap();
    assert_eq!((cache.hits, cache.computed), (1, 0));
    assert_eq!(cache.scratch, "");
    assert_eq!(cache.rest.keys().collect::<Vec<_>>(), ["other"]);
}

#[derive(Mapped, Default)]
#[mapped(default, ignore_type)]
pub struct Secret {
    pub value: i32,
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Vault {
    pub name: String,
    pub secret: Secret,
    pub backup: Option<Secret>,
}

#[test]
fn ignored_types_are_dropped() {
    let mapper = Mapper::new();
    let vault = Vault {
        name: "v".into(),
        secret: Secret { value: 1 },
        backup: None,
    };
    assert_eq!(mapper.write(&vault).unwrap(), object! { "name" => "v" });

    let read: Vault = mapper
        .read(&object! { "name" => "w", "secret" => object! { "value" => 2 } })
        .unwrap();
    assert_eq!(read.secret.value, 0);
}

// -----------------------------------------------------------------------------
// Unwrapping

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(default)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(default)]
pub struct Customer {
    pub name: String,
    #[mapped(unwrapped(prefix = "home_"))]
    pub home: Address,
    #[mapped(unwrapped)]
    pub work: Option<Address>,
}

#[test]
fn unwrapped_children_are_spliced() {
    let mapper = Mapper::new();
    let mut customer = Customer {
        name: "c".into(),
        home: Address {
            city: "Oslo".into(),
            zip: "0150".into(),
        },
        work: None,
    };

    let node = mapper.write(&customer).unwrap();
    assert_eq!(keys(&node), ["name", "home_city", "home_zip"]);
    assert_eq!(mapper.read::<Customer>(&node).unwrap(), customer);

    customer.work = Some(Address {
        city: "Bergen".into(),
        zip: "5003".into(),
    });
    let node = mapper.write(&customer).unwrap();
    assert_eq!(keys(&node), ["name", "home_city", "home_zip", "city", "zip"]);
    assert_eq!(mapper.read::<Customer>(&node).unwrap(), customer);
}

#[test]
fn unwrapped_errors_name_the_spliced_key() {
    let mapper = Mapper::new();
    let node = object! { "name" => "c", "home_zip" => vec![DocumentNode::from(1)] };
    let err = mapper.read::<Customer>(&node).unwrap_err();
    assert_eq!(err.path().unwrap().to_string(), "$.home_zip");

    let node = object! { "city" => object! {} };
    let err = mapper.read::<Customer>(&node).unwrap_err();
    assert_eq!(err.path().unwrap().to_string(), "$.city");
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Clashing {
    pub city: String,
    #[mapped(unwrapped)]
    pub address: Address,
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct NotAnObject {
    #[mapped(unwrapped)]
    pub count: i32,
}

#[test]
fn invalid_unwraps_are_schema_errors() {
    let mapper = Mapper::new();
    let err = mapper.describe::<Clashing>().unwrap_err();
    assert!(
        matches!(&err, SchemaError::DuplicateKey { key, second, .. } if key == "city" && second == "address.city")
    );

    let err = mapper.describe::<NotAnObject>().unwrap_err();
    assert!(matches!(err, SchemaError::InvalidUnwrap { property: "count", .. }));

    let err = mapper.write(&NotAnObject::default()).unwrap_err();
    assert!(matches!(err, MapError::Schema(SchemaError::InvalidUnwrap { .. })));
}

#[derive(Default)]
pub struct Knot {
    depth: u32,
}

impl crate::Mapped for Knot {
    fn describe(builder: &mut DescriptorBuilder<Self>) {
        builder.default_constructor(Knot::default);
        builder.field("depth", Visibility::Public, |k| &k.depth, |k| &mut k.depth);
        builder
            .getter("inner", Visibility::Public, |_| Knot::default())
            .unwrapped();
    }
}
crate::impl_map_value!(Knot);

#[test]
fn recursive_unwrap_is_rejected() {
    let err = Mapper::new().describe::<Knot>().unwrap_err();
    assert_eq!(
        err,
        SchemaError::RecursiveUnwrap {
            type_path: type_name::<Knot>(),
        }
    );
}

// -----------------------------------------------------------------------------
// Codecs and raw values

struct YesNo;

impl Codec<bool> for YesNo {
    fn encode(&self, value: &bool, _: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::from(if *value { "Y" } else { "N" }))
    }

    fn decode(&self, node: &DocumentNode, _: &ReadContext<'_>) -> Result<bool, MapError> {
        match node.as_str() {
            Some("Y") => Ok(true),
            Some("N") => Ok(false),
            _ => Err(MapError::coercion("Y or N", node)),
        }
    }
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Survey {
    #[mapped(codec = YesNo)]
    pub agreed: bool,
}

#[test]
fn codecs_replace_the_representation() {
    let mapper = Mapper::new();
    let node = mapper.write(&Survey { agreed: true }).unwrap();
    assert_eq!(node, object! { "agreed" => "Y" });
    assert!(mapper.read::<Survey>(&object! { "agreed" => "N" }).is_ok_and(|s| !s.agreed));

    let err = mapper.read::<Survey>(&object! { "agreed" => true }).err().unwrap();
    assert_eq!(err.path().unwrap().to_string(), "$.agreed");
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Envelope {
    pub id: i32,
    #[mapped(raw)]
    pub body: String,
}

#[test]
fn raw_values_pass_through() {
    let mapper = Mapper::new();
    let envelope = Envelope {
        id: 1,
        body: r#"{"x":1}"#.into(),
    };
    let node = mapper.write(&envelope).unwrap();
    assert_eq!(node.get("body"), Some(&DocumentNode::Raw(r#"{"x":1}"#.into())));

    let text = mapper.to_json_string(&envelope).unwrap();
    assert_eq!(text, r#"{"id":1,"body":{"x":1}}"#);

    let back: Envelope = mapper.from_json_str(&text).unwrap();
    assert_eq!(back.body, r#"{"x":1}"#);
    let plain: Envelope = mapper.read(&object! { "body" => "as is" }).unwrap();
    assert_eq!(plain.body, "as is");
}

// -----------------------------------------------------------------------------
// Single values

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(value = Color::hex, map_creator = Color::from_hex)]
pub struct Color {
    pub rgb: u32,
}

impl Color {
    fn hex(&self) -> String {
        format!("#{:06x}", self.rgb)
    }

    fn from_hex(hex: String) -> Self {
        let rgb = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0);
        Self { rgb }
    }
}

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(default)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<Color>,
}

#[test]
fn value_writers_replace_the_object() {
    let mapper = Mapper::new();
    let desc = mapper.describe::<Color>().unwrap();
    assert!(desc.writes_single_value());
    assert_eq!(desc.constructor(), ConstructorKind::Delegating);

    let orange = Color { rgb: 0xff8800 };
    assert_eq!(mapper.write(&orange).unwrap(), DocumentNode::from("#ff8800"));
    assert_eq!(mapper.read::<Color>(&DocumentNode::from("#ff8800")).unwrap(), orange);

    let palette = Palette {
        name: "warm".into(),
        colors: vec![orange, Color { rgb: 0x10 }],
    };
    let text = mapper.to_json_string(&palette).unwrap();
    assert_eq!(text, r##"{"name":"warm","colors":["#ff8800","#000010"]}"##);
    assert_eq!(mapper.from_json_str::<Palette>(&text).unwrap(), palette);
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Painted {
    #[mapped(unwrapped)]
    pub color: Color,
}

#[test]
fn single_values_cannot_be_unwrapped() {
    let err = Mapper::new().describe::<Painted>().unwrap_err();
    assert!(matches!(err, SchemaError::InvalidUnwrap { property: "color", .. }));
}

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(default)]
pub struct Mailing {
    #[mapped(accept_single_value, unwrap_single_array)]
    pub to: Vec<String>,
    #[mapped(accept_single_value)]
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    #[mapped(unwrap_single_array = false)]
    pub reply_to: Vec<String>,
}

#[test]
fn single_element_sequences_per_property() {
    let mapper = Mapper::new();
    let desc = mapper.describe::<Mailing>().unwrap();
    assert!(desc.property("to").unwrap().accepts_single_value());
    assert!(desc.property("to").unwrap().unwraps_single_array());
    assert!(!desc.property("bcc").unwrap().accepts_single_value());

    let read: Mailing = mapper
        .read(&object! { "to" => "a", "cc" => "b", "bcc" => vec![DocumentNode::from("c")] })
        .unwrap();
    assert_eq!(read.to, ["a"]);
    assert_eq!(read.cc, ["b"]);
    assert_eq!(read.bcc, ["c"]);

    let err = mapper.read::<Mailing>(&object! { "bcc" => "c" }).unwrap_err();
    assert_eq!(err.path().unwrap().to_string(), "$.bcc");

    let node = mapper.write(&read).unwrap();
    assert_eq!(node.get("to"), Some(&DocumentNode::from("a")));
    assert_eq!(node.get("cc"), Some(&DocumentNode::from(vec![DocumentNode::from("b")])));

    let two = Mailing {
        to: vec!["a".into(), "b".into()],
        ..Mailing::default()
    };
    let node = mapper.write(&two).unwrap();
    assert_eq!(node.get("to").and_then(DocumentNode::as_sequence).map(<[_]>::len), Some(2));
}

#[test]
fn single_element_sequences_from_the_config() {
    let config = MapperConfig::DEFAULT
        .with_accept_single_value(true)
        .with_unwrap_single_arrays(true);
    let mapper = Mapper::with_config(config);

    let read: Mailing = mapper.read(&object! { "bcc" => "c", "reply_to" => "d" }).unwrap();
    assert_eq!(read.bcc, ["c"]);
    assert_eq!(read.reply_to, ["d"]);

    let node = mapper.write(&read).unwrap();
    assert_eq!(node.get("bcc"), Some(&DocumentNode::from("c")));
    assert_eq!(node.get("reply_to"), Some(&DocumentNode::from(vec![DocumentNode::from("d")])));
    assert_eq!(node.get("to"), Some(&DocumentNode::Sequence(vec![])));
}

// -----------------------------------------------------------------------------
// Polymorphism

pub trait Animal: DynamicType {
    fn sound(&self) -> &'static str;
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Cat {
    pub lives: u8,
}

impl Animal for Cat {
    fn sound(&self) -> &'static str {
        "meow"
    }
}

#[derive(Mapped, Default)]
#[mapped(default, type_name = "b")]
pub struct Dog {
    pub good: bool,
}

impl Animal for Dog {
    fn sound(&self) -> &'static str {
        "woof"
    }
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Stray {
    pub name: String,
}

impl Animal for Stray {
    fn sound(&self) -> &'static str {
        "..."
    }
}

impl PolymorphicBase for dyn Animal {
    fn subtypes(types: &mut Subtypes<Self>) {
        types
            .register_as::<Cat>("a", |v| Box::new(v))
            .register::<Dog>(|v| Box::new(v));
    }
}

fn lives(animal: &dyn Animal) -> Option<u8> {
    animal.as_any().downcast_ref::<Cat>().map(|cat| cat.lives)
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Zoo {
    pub star: Option<Box<dyn Animal>>,
    pub all: Vec<Box<dyn Animal>>,
}

#[test]
fn polymorphic_property_round_trip() {
    let mapper = Mapper::new();
    let zoo = Zoo {
        star: Some(Box::new(Cat { lives: 9 })),
        all: vec![Box::new(Dog { good: true }), Box::new(Cat { lives: 1 })],
    };
    let node = mapper.write(&zoo).unwrap();
    assert_eq!(
        node,
        object! {
            "star" => object! { "@type" => "a", "lives" => 9 },
            "all" => vec![
                object! { "@type" => "b", "good" => true },
                object! { "@type" => "a", "lives" => 1 },
            ],
        }
    );
    assert_eq!(keys(node.get("star").unwrap()), ["@type", "lives"]);

    let back: Zoo = mapper.read(&node).unwrap();
    let star = back.star.unwrap();
    assert_eq!(star.sound(), "meow");
    assert_eq!(lives(&*star), Some(9));
    let sounds: Vec<_> = back.all.iter().map(|a| a.sound()).collect();
    assert_eq!(sounds, ["woof", "meow"]);
}

#[test]
fn tag_errors() {
    let mapper = Mapper::new();

    let err = mapper.read_as::<dyn Animal>(&object! { "@type" => "z" }).err().unwrap();
    assert!(matches!(
        &err,
        MapError::Discriminator(DiscriminatorError::UnknownTag { tag, .. }) if tag == "z"
    ));

    let err = mapper.read_as::<dyn Animal>(&object! { "lives" => 1 }).err().unwrap();
    assert!(matches!(err, MapError::Discriminator(DiscriminatorError::MissingTag { .. })));

    let stray: Box<dyn Animal> = Box::new(Stray::default());
    let err = mapper.write(&stray).unwrap_err();
    assert!(matches!(
        err,
        MapError::Discriminator(DiscriminatorError::UnregisteredSubtype { .. })
    ));
}

#[test]
fn subtype_registry() {
    let registry = Mapper::new().subtypes::<dyn Animal>().unwrap();
    assert_eq!(registry.len(), 2);
    let tags: Vec<_> = registry.iter().map(|e| e.tag(crate::poly::TagId::Name)).collect();
    assert_eq!(tags, ["a", "b"]);
}

#[test]
fn erased_writes_name_their_base() {
    let mapper = Mapper::new();
    let cat = Cat { lives: 3 };
    let dog = Dog { good: false };

    let node = mapper.write_as::<dyn Animal>(&cat).unwrap();
    assert_eq!(node, object! { "@type" => "a", "lives" => 3 });

    let items: [&dyn DynamicType; 2] = [&cat, &dog];
    let node = mapper.write_seq_as::<dyn Animal>(items).unwrap();
    assert_eq!(
        node,
        DocumentNode::Sequence(vec![
            object! { "@type" => "a", "lives" => 3 },
            object! { "@type" => "b", "good" => false },
        ])
    );

    let err = mapper.write_as::<dyn Animal>(&Stray::default()).unwrap_err();
    assert!(matches!(err, MapError::Discriminator(_)));
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Pen {
    #[mapped(discriminator(external_property = "kind"))]
    pub animal: Option<Box<dyn Animal>>,
}

#[test]
fn external_property_tags() {
    let mapper = Mapper::new();
    let pen = Pen {
        animal: Some(Box::new(Cat { lives: 2 })),
    };
    let node = mapper.write(&pen).unwrap();
    assert_eq!(keys(&node), ["animal", "kind"]);
    assert_eq!(node, object! { "animal" => object! { "lives" => 2 }, "kind" => "a" });

    let back: Pen = mapper.read(&node).unwrap();
    assert_eq!(lives(&*back.animal.unwrap()), Some(2));

    let empty = mapper.write(&Pen::default()).unwrap();
    assert_eq!(empty, object! { "animal" => DocumentNode::Null });
    assert!(mapper.read::<Pen>(&empty).unwrap().animal.is_none());

    let err = mapper.read::<Pen>(&object! { "animal" => object! {} }).err().unwrap();
    assert!(matches!(err, MapError::Discriminator(DiscriminatorError::MissingTag { .. })));
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Wrapped {
    #[mapped(discriminator(wrapper_array))]
    pub array: Option<Box<dyn Animal>>,
    #[mapped(discriminator(wrapper_object))]
    pub object: Option<Box<dyn Animal>>,
    #[mapped(discriminator(class, property = "type"))]
    pub class: Option<Box<dyn Animal>>,
}

#[test]
fn wrapper_and_class_tags() {
    let mapper = Mapper::new();
    let wrapped = Wrapped {
        array: Some(Box::new(Cat { lives: 1 })),
        object: Some(Box::new(Dog { good: true })),
        class: Some(Box::new(Cat { lives: 5 })),
    };
    let node = mapper.write(&wrapped).unwrap();
    assert_eq!(
        node,
        object! {
            "array" => vec![DocumentNode::from("a"), object! { "lives" => 1 }],
            "object" => object! { "b" => object! { "good" => true } },
            "class" => object! { "type" => type_name::<Cat>(), "lives" => 5 },
        }
    );

    let back: Wrapped = mapper.read(&node).unwrap();
    assert_eq!(lives(&*back.array.unwrap()), Some(1));
    assert_eq!(back.object.unwrap().sound(), "woof");
    assert_eq!(lives(&*back.class.unwrap()), Some(5));

    let bad = object! { "array" => object! { "lives" => 1 } };
    let err = mapper.read::<Wrapped>(&bad).err().unwrap();
    assert!(matches!(
        err,
        MapError::Discriminator(DiscriminatorError::MalformedWrapper { .. })
    ));
}

pub trait Shade: DynamicType {}

impl Shade for Color {}

impl PolymorphicBase for dyn Shade {
    fn subtypes(types: &mut Subtypes<Self>) {
        types.register_as::<Color>("color", |v| Box::new(v));
    }
}

#[derive(Mapped, Default)]
#[mapped(default)]
pub struct Swatch {
    pub shade: Option<Box<dyn Shade>>,
    #[mapped(discriminator(wrapper_object))]
    pub boxed: Option<Box<dyn Shade>>,
}

#[test]
fn tagged_single_values_use_wrappers() {
    let mapper = Mapper::new();
    let swatch = Swatch {
        shade: Some(Box::new(Color { rgb: 0xff })),
        boxed: Some(Box::new(Color { rgb: 0x1 })),
    };
    let node = mapper.write(&swatch).unwrap();
    assert_eq!(
        node,
        object! {
            "shade" => vec![DocumentNode::from("color"), DocumentNode::from("#0000ff")],
            "boxed" => object! { "color" => "#000001" },
        }
    );

    let back: Swatch = mapper.read(&node).unwrap();
    let shade = back.shade.unwrap();
    assert_eq!((*shade).as_any().downcast_ref::<Color>(), Some(&Color { rgb: 0xff }));
    let boxed = back.boxed.unwrap();
    assert_eq!((*boxed).as_any().downcast_ref::<Color>(), Some(&Color { rgb: 0x1 }));
}

// -----------------------------------------------------------------------------
// Erased and shared use

#[test]
fn described_reads_and_writes() {
    let mapper = Mapper::new();
    let desc = mapper.describe::<Small>().unwrap();
    let node = mapper.write_described(&Small { a: 4 }, &desc).unwrap();
    assert_eq!(node, object! { "a" => 4 });

    let value = mapper.read_described(&node, &desc).unwrap();
    assert_eq!(value.downcast_ref::<Small>().map(|s| s.a), Some(4));

    assert!(mapper.write_described(&Person::default(), &desc).is_err());
}

#[test]
fn descriptors_are_built_once_across_threads() {
    let mapper = Mapper::new();
    let descriptors: Vec<Arc<_>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| mapper.describe::<Customer>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(descriptors.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn shared_mapper_uses_the_default_config() {
    let shared = Mapper::shared();
    assert_eq!(shared.config().default_include, Include::Always);
    assert_eq!(shared.write(&Small { a: 1 }).unwrap(), object! { "a" => 1 });
}
