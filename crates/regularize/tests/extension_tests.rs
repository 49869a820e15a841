//! Integration tests for the extension registry.

use std::sync::Arc;

use regularize::{
    ClassMember, ExtArg, Extension, ExtensionRegistry, GroupSpec, Pattern, RegularizeError, Result,
};

fn html_tag(p: &Pattern, args: &[ExtArg]) -> Result<Pattern> {
    let opening = ExtArg::bool_at(args, 0, true)?;
    p.literal(if opening { "<" } else { "</" })
        .any_of([ClassMember::AsciiLowercase])
        .at_least_one()
        .map(|p| p.literal(">"))
}

struct Repeat;

impl Extension for Repeat {
    fn apply(&self, pattern: &Pattern, args: &[ExtArg]) -> Result<Pattern> {
        let text = ExtArg::text_at(args, 0)?;
        let times = ExtArg::int_at(args, 1)?;
        let times = u32::try_from(times)
            .map_err(|_| RegularizeError::invalid_extension_argument(1, "must be non-negative"))?;
        pattern
            .group_pattern(&Pattern::from(text), GroupSpec::non_capturing())?
            .exactly(times)
    }
}

#[test]
fn unknown_then_registered() {
    let registry = Arc::new(ExtensionRegistry::new());
    let p = Pattern::with_registry(Arc::clone(&registry));

    assert!(matches!(
        p.ext("html_tag", &[]),
        Err(RegularizeError::UnknownExtension { ref name }) if name == "html_tag"
    ));

    registry.add("html_tag", html_tag);
    assert_eq!(p.ext("html_tag", &[]).unwrap().compile().pattern(), "<[a-z]+>");
    assert_eq!(
        p.ext("html_tag", &[ExtArg::from(false)]).unwrap().compile().pattern(),
        "</[a-z]+>"
    );
}

#[test]
fn extensions_compose_with_the_builder() {
    let registry = Arc::new(ExtensionRegistry::new());
    registry.add("html_tag", html_tag);
    let element = Pattern::with_registry(registry)
        .ext("html_tag", &[])
        .unwrap()
        .match_all()
        .ext("html_tag", &[false.into()])
        .unwrap();
    assert_eq!(element.compile().pattern(), "<[a-z]+>.+</[a-z]+>");
    assert!(element.test("<b>bold</b>").is_ok());
}

#[test]
fn trait_implementations() {
    let registry = Arc::new(ExtensionRegistry::new());
    registry.add_extension("repeat", Repeat);
    let p = Pattern::with_registry(registry);

    let out = p.ext("repeat", &["ab".into(), 3_i64.into()]).unwrap();
    assert_eq!(out.compile().pattern(), "(?:ab){3}");

    let bad = p.ext("repeat", &["ab".into(), "three".into()]);
    assert!(matches!(
        bad,
        Err(RegularizeError::InvalidExtensionArgument { index: 1, .. })
    ));
    assert!(p.ext("repeat", &["ab".into(), (-1_i64).into()]).is_err());
}

#[test]
fn pattern_arguments() {
    let registry = Arc::new(ExtensionRegistry::new());
    registry.add("quoted", |p: &Pattern, args: &[ExtArg]| {
        let inner = ExtArg::pattern_at(args, 0)?;
        p.literal("\"").concat(inner).map(|p| p.literal("\""))
    });
    let word = Pattern::new().word_characters().at_least_one().unwrap();
    let quoted = Pattern::with_registry(registry).ext("quoted", &[word.into()]).unwrap();
    assert_eq!(quoted.compile().pattern(), r#""\w+""#);
}

#[test]
fn extensions_can_call_extensions() {
    let registry = Arc::new(ExtensionRegistry::new());
    registry.add("digit", |p: &Pattern, _: &[ExtArg]| Ok(p.digits()));
    registry.add("pair", |p: &Pattern, _: &[ExtArg]| {
        p.ext("digit", &[])?.ext("digit", &[])
    });
    let pair = Pattern::with_registry(registry).ext("pair", &[]).unwrap();
    assert_eq!(pair.compile().pattern(), "[0-9][0-9]");
}

#[test]
fn registries_are_isolated() {
    let one = Arc::new(ExtensionRegistry::new());
    let two = Arc::new(ExtensionRegistry::new());
    one.add("only_here", |p: &Pattern, _: &[ExtArg]| Ok(p.wildcard()));

    assert!(Pattern::with_registry(Arc::clone(&one)).ext("only_here", &[]).is_ok());
    assert!(Pattern::with_registry(two).ext("only_here", &[]).is_err());
}

#[test]
fn global_registry_is_shared() {
    let name = "regularize_test_global_registry_word";
    ExtensionRegistry::global().add(name, |p: &Pattern, _: &[ExtArg]| Ok(p.word_characters()));

    let out = Pattern::new().ext(name, &[]).unwrap();
    assert_eq!(out.compile().pattern(), r"\w");
    assert!(Arc::ptr_eq(out.registry(), &ExtensionRegistry::global()));

    assert!(ExtensionRegistry::global().remove(name).is_some());
    assert!(Pattern::new().ext(name, &[]).is_err());
}
