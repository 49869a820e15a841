//! Integration tests for the pattern builder.

use regularize::{ClassMember, Finder, Fragment, GroupSpec, Pattern, RegularizeError};

#[test]
fn chained_calls_do_not_alter_receivers() {
    let p1 = Pattern::new().literal("a");
    let p2 = p1.digits();
    let p3 = p2.at_least_one().unwrap();

    assert_eq!(p1.compile().pattern(), "a");
    assert_eq!(p2.compile().pattern(), "a[0-9]");
    assert_eq!(p3.compile().pattern(), "a[0-9]+");
}

#[test]
fn quantifier_rendering() {
    let d = Pattern::new().digits();
    assert_eq!(d.at_least_one().unwrap().compile().pattern(), "[0-9]+");
    assert_eq!(d.optional().unwrap().compile().pattern(), "[0-9]?");
    assert_eq!(d.exactly(2).unwrap().compile().pattern(), "[0-9]{2}");
    assert!(matches!(
        d.between(3, 1),
        Err(RegularizeError::InvalidRange {
            minimum: 3,
            maximum: 1
        })
    ));
}

#[test]
fn literals_are_escaped() {
    let p = Pattern::new().literal("1+1=2? (yes)");
    assert_eq!(p.compile().pattern(), r"1\+1=2\?\x{20}\(yes\)");
    assert!(p.test("1+1=2? (yes)").is_ok());
}

#[test]
fn character_set_members() {
    let p = Pattern::new().any_of([
        ClassMember::AsciiLowercase,
        ClassMember::Digit,
        ClassMember::from('-'),
    ]);
    assert_eq!(p.compile().pattern(), r"[a-z0-9\-]");

    let range = ClassMember::range('a', 'f').unwrap();
    assert_eq!(Pattern::new().any_of([range]).compile().pattern(), "[a-f]");
    assert_eq!(Pattern::new().any_of_chars("xy").compile().pattern(), "[xy]");
    assert_eq!(
        Pattern::new().none_of([ClassMember::Whitespace]).compile().pattern(),
        r"\S"
    );
}

#[test]
fn domain_name_shape() {
    let alnum = [
        ClassMember::Digit,
        ClassMember::AsciiLowercase,
        ClassMember::AsciiUppercase,
    ];
    let label_inner = [
        ClassMember::Digit,
        ClassMember::AsciiLowercase,
        ClassMember::AsciiUppercase,
        ClassMember::Char('-'),
    ];
    let p = Pattern::new()
        .any_of(alnum)
        .any_of(label_inner)
        .between(1, 61)
        .unwrap()
        .any_of(alnum)
        .literal(".")
        .ascii_letters()
        .at_least(2)
        .unwrap();

    assert_eq!(
        p.compile().pattern(),
        r"[0-9a-zA-Z][0-9a-zA-Z\-]{1,61}[0-9a-zA-Z]\.[a-zA-Z]{2,}"
    );
    assert!(p.test("example.com").is_ok());
    assert!(p.test("e.com").is_err());
}

#[test]
fn named_and_unnamed_groups() {
    let letters = Pattern::new().lowercase_ascii_letters();
    assert_eq!(
        letters.named_group("some_group").unwrap().compile().pattern(),
        "(?P<some_group>[a-z])"
    );
    assert_eq!(
        letters.group(GroupSpec::capturing()).unwrap().compile().pattern(),
        "([a-z])"
    );
    assert_eq!(
        letters.group(GroupSpec::non_capturing()).unwrap().compile().pattern(),
        "(?:[a-z])"
    );
}

#[test]
fn duplicate_names_across_composition() {
    let a = Pattern::new().digits().named_group("n").unwrap();
    let b = Pattern::new().word_characters().named_group("n").unwrap();

    for result in [a.concat(&b), &a + &b, a.or(&b), Pattern::join(&Pattern::new(), [&a, &b])] {
        assert!(matches!(
            result,
            Err(RegularizeError::DuplicateGroupName { ref name }) if name == "n"
        ));
    }
    assert!(a.match_any([b.clone()]).is_err());
}

#[test]
fn duplicate_name_through_separator() {
    let sep = Pattern::new().whitespace().named_group("sep").unwrap();
    let words = [Pattern::from("a"), Pattern::from("b"), Pattern::from("c")];
    assert!(Pattern::join(&sep, &words[..2]).is_ok());
    assert!(matches!(
        Pattern::join(&sep, &words),
        Err(RegularizeError::DuplicateGroupName { .. })
    ));
}

#[test]
fn concatenation_wraps_whole_operands() {
    let word = Pattern::new().word_characters().at_least_one().unwrap();
    let comma = Pattern::from(",");
    let list = (&word + &comma).unwrap().any_number_of().unwrap();
    assert_eq!(list.compile().pattern(), r"(?:\w+,)*");
    assert!(matches!(list.fragments().front(), Some(Fragment::Quantifier { .. })));
}

#[test]
fn alternation_groups() {
    let method = Pattern::new()
        .match_any(["GET", "PUT", "DELETE"])
        .unwrap()
        .named_group("method")
        .unwrap();
    assert_eq!(method.compile().pattern(), "(?P<method>GET|PUT|DELETE)");
    assert_eq!(method.test("PUT /x").unwrap().name("method"), Some("PUT"));

    let either = (Pattern::new().digits() | Pattern::new().whitespace()).unwrap();
    assert_eq!(either.compile().pattern(), r"(?:[0-9]|\s)");
}

#[test]
fn equivalent_patterns_are_equal() {
    let a = Pattern::new().literal("ab").digits();
    let b = (Pattern::from("a") + Pattern::new().literal("b").digits()).unwrap();
    assert_eq!(a, b);

    let mut set = std::collections::HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn group_names_in_order() {
    let p = Pattern::new()
        .digits()
        .named_group("first")
        .unwrap()
        .group_pattern(
            &Pattern::new().word_characters().named_group("inner").unwrap(),
            GroupSpec::named("outer"),
        )
        .unwrap();
    assert_eq!(p.group_names(), ["first", "outer", "inner"]);
    assert_eq!(p.capture_count(), Some(3));
    assert!(p.has_group("inner"));
}

#[test]
fn push_fragment_checks_names() {
    let p = Pattern::new().digits().named_group("d").unwrap();
    let clash = Fragment::group(Fragment::Wildcard, GroupSpec::named("d")).unwrap();
    assert!(p.push_fragment(clash).is_err());
    let fine = Fragment::group(Fragment::Wildcard, GroupSpec::named("e")).unwrap();
    assert_eq!(p.push_fragment(fine).unwrap().compile().pattern(), "(?P<d>[0-9])(?P<e>.)");
}

#[test]
fn test_reports_sample() {
    let p = Pattern::new().digits().exactly(3).unwrap();
    assert_eq!(p.test("1234").unwrap().as_str(), "123");
    let err = p.test("12").unwrap_err();
    assert!(matches!(
        err,
        RegularizeError::SampleNotMatched { ref sample, .. } if sample == "12"
    ));
}

#[test]
fn long_chains_stay_cheap_to_extend() {
    let mut p = Pattern::new();
    for i in 0..2_000 {
        p = p.literal(if i % 2 == 0 { "a" } else { "b" });
    }
    let extended = p.digits();
    assert_eq!(p.len(), 2_000);
    assert_eq!(extended.len(), 2_001);
    assert!(extended.compile().pattern().ends_with("ab[0-9]"));
}

#[test]
fn quantifying_an_optional_group_keeps_it_greedy() {
    let base = Pattern::new()
        .start_of_text()
        .literal("ab")
        .group(GroupSpec::named("h").optional())
        .unwrap();

    let optional = base.optional().unwrap().end_of_text();
    assert_eq!(optional.compile().pattern(), r"\A(?:(?P<h>ab)?)?\z");
    let m = Finder::new(optional).match_at_start("ab").unwrap().unwrap();
    assert_eq!(m.as_str(), "ab");
    assert_eq!(m.name("h"), Some("ab"));

    let repeated = base.at_least_one().unwrap();
    assert_eq!(repeated.compile().pattern(), r"\A(?:(?P<h>ab)?)+");
    let m = Finder::new(repeated).match_at_start("abab").unwrap().unwrap();
    assert_eq!(m.as_str(), "abab");

    let any = base.any_number_of().unwrap();
    assert_eq!(any.compile().pattern(), r"\A(?:(?P<h>ab)?)*");
    let twice = base.exactly(2).unwrap();
    assert_eq!(twice.compile().pattern(), r"\A(?:(?P<h>ab)?){2}");
}
