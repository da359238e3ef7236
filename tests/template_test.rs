use kql::prelude::*;
use kql::template;
use pretty_assertions::assert_eq;

#[test]
fn test_render_every_kind() {
    let stmt = render(concat!(
        "{database:db}.{table:T} | where {column:a b} == {int:1}",
        " or x == {long:2} or x == {real:2.5} or x == {bool:true}",
        " or t == {datetime:2019-01-02T03:04:05.0000006Z}",
        " or s == {timespan:1.00:00:00}",
        " or d == {dynamic:{\"k\": [1]\\}}",
        " or g == {guid:12345678-1234-1234-1234-123456789012}",
        " | extend y = {function:my-fn}({string:x})",
    ))
    .unwrap();

    assert_eq!(
        stmt.query(),
        concat!(
            r#"database("db").T | where ["a b"] == int(1)"#,
            " or x == long(2) or x == real(2.5) or x == bool(true)",
            " or t == datetime(2019-01-02T03:04:05.0000006Z)",
            " or s == timespan(1.00:00:00.0000000)",
            r#" or d == dynamic("{\"k\": [1]}")"#,
            " or g == guid(12345678-1234-1234-1234-123456789012)",
            r#" | extend y = ["my-fn"](x)"#,
        )
    );
}

#[test]
fn test_render_matches_builder() {
    let rendered = render("MyTable | where i != {int:32} ;").unwrap();
    let built = Builder::new("MyTable | where i != ")
        .add_int(32)
        .add_literal(" ;")
        .build();
    assert_eq!(rendered, built);
}

#[test]
fn test_render_reports_value_errors_with_position() {
    let err = render("T | take {int:ten}").unwrap_err();
    match err {
        KqlError::Parse { position, message } => {
            assert_eq!(position, 9);
            assert!(message.starts_with("Invalid int value 'ten'"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_segments_apply_in_order() {
    let segments = template::parse("{column:a}{{{column:b}}}").unwrap();
    assert_eq!(segments.len(), 4);
    let stmt = segments
        .iter()
        .fold(Builder::default(), |b, s| s.apply(b))
        .build();
    assert_eq!(stmt.query(), "a{b}");
}

#[test]
fn test_parameters_prefix_statement() {
    let params = Parameters::new()
        .add("n", Literal::Long(10))
        .unwrap()
        .add("state", "TEXAS")
        .unwrap();

    let stmt = template::parse("StormEvents | where State == state | take n")
        .unwrap()
        .iter()
        .fold(Builder::new("").add_parameters(&params), |b, s| s.apply(b))
        .build();

    assert_eq!(
        stmt.query(),
        "declare query_parameters(n:long, state:string);StormEvents | where State == state | take n"
    );
    assert_eq!(
        params.to_json(),
        serde_json::json!({ "n": "long(10)", "state": "\"TEXAS\"" })
    );
}
