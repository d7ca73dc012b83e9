use super::*;

fn compound(locator: &str, step: usize) -> Compound {
    Locator::parse(locator).unwrap().steps[step].compound.clone()
}

#[test]
fn parses_child_chain_of_segments() {
    let loc = Locator::parse("#content>ul:nth-of-type(1)>li.item").unwrap();
    assert_eq!(loc.steps.len(), 3);
    assert_eq!(loc.steps[0].combinator, None);
    assert_eq!(loc.steps[0].compound.ids, vec!["content".to_owned()]);
    assert_eq!(loc.steps[1].combinator, Some(Combinator::Child));
    assert_eq!(loc.steps[1].compound.tag.as_deref(), Some("ul"));
    assert_eq!(loc.steps[1].compound.nth_of_type, Some(1));
    assert_eq!(loc.steps[2].compound.classes, vec!["item".to_owned()]);
}

#[test]
fn whitespace_is_descendant_unless_around_gt() {
    let loc = Locator::parse("main  section > p").unwrap();
    let combinators: Vec<_> = loc.steps.iter().map(|s| s.combinator).collect();
    assert_eq!(
        combinators,
        vec![None, Some(Combinator::Descendant), Some(Combinator::Child)]
    );
}

#[test]
fn parses_attribute_tests() {
    let c = compound(r#"button[data-testid="submit-btn"][disabled]"#, 0);
    assert_eq!(c.tag.as_deref(), Some("button"));
    assert_eq!(
        c.attrs,
        vec![
            AttrTest {
                name: "data-testid".to_owned(),
                value: Some("submit-btn".to_owned()),
            },
            AttrTest {
                name: "disabled".to_owned(),
                value: None,
            },
        ]
    );
}

#[test]
fn scope_prefix_is_recognized() {
    let loc = Locator::parse(":scope>span.price").unwrap();
    assert!(loc.steps[0].compound.scope);
    assert_eq!(loc.steps[1].compound.classes, vec!["price".to_owned()]);
}

#[test]
fn escaped_identifiers_round_trip() {
    for raw in ["1st", "a:b", "x.y", "-9", "-", "naïve", "a b", "quote\"d"] {
        let locator = format!("#{}", escape_ident(raw));
        let c = compound(&locator, 0);
        assert_eq!(c.ids, vec![raw.to_owned()], "locator {locator}");
    }
}

#[test]
fn escape_ident_follows_css_rules() {
    assert_eq!(escape_ident("main"), "main");
    assert_eq!(escape_ident("1st"), "\\31 st");
    assert_eq!(escape_ident("-2x"), "-\\32 x");
    assert_eq!(escape_ident("a:b"), "a\\:b");
    assert_eq!(escape_ident("-"), "\\-");
}

#[test]
fn quoted_values_round_trip() {
    for raw in ["plain", "has \"quotes\"", "back\\slash", "tab\there"] {
        let locator = format!("div[data-testid={}]", quote_string(raw));
        let c = compound(&locator, 0);
        assert_eq!(c.attrs[0].value.as_deref(), Some(raw), "locator {locator}");
    }
}

#[test]
fn rejects_malformed_locators() {
    for bad in [
        "[[[invalid",
        "",
        "div>",
        ">div",
        "div:hover",
        "div:nth-of-type(0)",
        "div:nth-of-type(x)",
        "div[data-x=\"open",
        "div.",
        "#",
        "div>:scope",
        "div,span",
        "a\\",
    ] {
        let err = Locator::parse(bad).unwrap_err();
        assert!(!err.message.is_empty(), "{bad}");
    }
}

#[test]
fn syntax_error_converts_to_locator_error() {
    let err: PinmentError = Locator::parse("div:hover").unwrap_err().into();
    assert!(err.to_string().starts_with("locator error: at byte 3"));
}

#[test]
fn caps_compound_count() {
    let at_cap = vec!["div"; MAX_LOCATOR_STEPS].join(">");
    assert_eq!(Locator::parse(&at_cap).unwrap().steps.len(), MAX_LOCATOR_STEPS);

    let over = format!("{at_cap}>div");
    let err = Locator::parse(&over).unwrap_err();
    assert!(err.message.contains("compounds"), "{}", err.message);
}
