use super::*;

#[test]
fn parse_keeps_declaration_order() {
    let s = Style::parse("fill:none; stroke:#000000;stroke-width:0.5;").unwrap();
    let props: Vec<_> = s.declarations().map(|(p, _)| p).collect();
    assert_eq!(props, ["fill", "stroke", "stroke-width"]);
    assert_eq!(s.to_string(), "fill:none;stroke:#000000;stroke-width:0.5");
}

#[test]
fn set_replaces_in_place() {
    let mut s = Style::parse("fill:red;stroke:none").unwrap();
    s.set("fill", "blue");
    s.set("opacity", "0.5");
    assert_eq!(s.to_string(), "fill:blue;stroke:none;opacity:0.5");
    assert_eq!(s.remove("stroke").as_deref(), Some("none"));
    assert_eq!(s.get("stroke"), None);
}

#[test]
fn url_values_survive() {
    let s = Style::parse("filter:url(#filter6343);fill:none").unwrap();
    assert_eq!(s.get("filter"), Some("url(#filter6343)"));
}

#[test]
fn malformed_declarations_are_rejected() {
    assert!(Style::parse("fill").is_err());
    assert!(Style::parse(":red").is_err());
    assert!(Style::parse("").unwrap().is_empty());
}
