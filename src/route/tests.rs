use super::*;
use crate::error::ErrorKind;
use http::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Item {
    id: i64,
    name: String,
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn test_handler_with_one_input_per_path_arg() {
    let route = Route::new("/items/:id", Method::GET, |id: i64| {
        Ok::<_, anyhow::Error>(Item {
            id,
            name: "widget".into(),
        })
    })
    .unwrap();

    assert_eq!(route.body_arg(), None);
    assert_eq!(route.body_output(), Some(0));
    assert_eq!(route.error_output(), Some(1));
    assert_eq!(route.to_string(), "{ GET /items/:id }");

    let body = route.invoke(&args(&["7"]), b"").unwrap();
    let item: Item = serde_json::from_slice(&body).unwrap();
    assert_eq!(item.id, 7);
}

#[test]
fn test_extra_input_is_bound_from_body() {
    let route = Route::new("/items/:id", Method::PUT, |id: i64, item: Item| {
        Json(Item {
            id,
            name: item.name,
        })
    })
    .unwrap();
    assert_eq!(route.body_arg(), Some(1));

    let body = route
        .invoke(&args(&["3"]), br#"{"id":0,"name":"renamed"}"#)
        .unwrap();
    assert_eq!(body, br#"{"id":3,"name":"renamed"}"#);
}

#[test]
fn test_too_many_handler_inputs_rejected() {
    let err = Route::new("/items/:id", Method::GET, |_a: i64, _b: i64, _c: Item| ()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRoute);
    assert!(err.to_string().contains("not enough path arguments: 1 < 2"));
    assert!(err.to_string().contains("{ GET /items/:id }"));
}

#[test]
fn test_too_few_handler_inputs_rejected() {
    let err = Route::new("/a/:x/b/:y", Method::GET, |_x: String| ()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRoute);
    assert!(err.to_string().contains("too many path arguments: 2 > 1"));
}

#[test]
fn test_non_scalar_path_argument_rejected() {
    let err = Route::new("/items/:id", Method::GET, |_id: Vec<u8>| ()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRoute);
    assert!(err.to_string().contains("path argument 0"));

    // the same type is fine in the body position
    assert!(Route::new("/items", Method::POST, |_bytes: Vec<u8>| ()).is_ok());
}

#[test]
fn test_path_argument_coercion() {
    let route = Route::new("/n/:n", Method::GET, |n: i64| Json(n * 2)).unwrap();
    assert_eq!(route.invoke(&args(&["42"]), b"").unwrap(), b"84");

    let err = route.invoke(&args(&["abc"]), b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmarshalError);
}

#[test]
fn test_mixed_scalar_kinds() {
    let route = Route::new(
        "/mix/:s/:b/:i/:u/:f",
        Method::GET,
        |s: String, b: bool, i: i8, u: u16, f: f64| Json(format!("{s}|{b}|{i}|{u}|{f}")),
    )
    .unwrap();
    let body = route
        .invoke(&args(&["txt", "true", "-5", "65535", "0.5"]), b"")
        .unwrap();
    assert_eq!(body, br#""txt|true|-5|65535|0.5""#);

    let overflow = route
        .invoke(&args(&["txt", "true", "-5", "65536", "0.5"]), b"")
        .unwrap_err();
    assert_eq!(overflow.kind(), ErrorKind::UnmarshalError);
}

#[test]
fn test_bad_body_is_unmarshal_error() {
    let route = Route::new("/items", Method::POST, |item: Item| Json(item)).unwrap();
    let err = route.invoke(&[], b"{not json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmarshalError);

    let err = route.invoke(&[], b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmarshalError);
}

#[test]
fn test_wrong_argument_count_at_invoke() {
    let route = Route::new("/items/:id", Method::GET, |_id: i64| ()).unwrap();
    let err = route.invoke(&[], b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmarshalError);
}

#[test]
fn test_handler_error_wins_over_body() {
    let route = Route::new("/boom", Method::GET, || {
        (
            Item {
                id: 1,
                name: "ignored".into(),
            },
            Some(anyhow::anyhow!("handler failed")),
        )
    })
    .unwrap();

    let err = route.invoke(&[], b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HandlerError);
    assert_eq!(err.cause().to_string(), "handler failed");
}

#[test]
fn test_pair_without_error_returns_body() {
    let route = Route::new("/ok", Method::GET, || {
        (
            Item {
                id: 1,
                name: "kept".into(),
            },
            None::<anyhow::Error>,
        )
    })
    .unwrap();
    assert_eq!(route.invoke(&[], b"").unwrap(), br#"{"id":1,"name":"kept"}"#);
}

#[test]
fn test_result_error() {
    let route = Route::new("/fail", Method::DELETE, || -> Result<(), std::io::Error> {
        Err(std::io::Error::other("disk full"))
    })
    .unwrap();
    assert_eq!(route.body_output(), None);
    assert_eq!(route.error_output(), Some(0));

    let err = route.invoke(&[], b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HandlerError);
}

#[test]
fn test_empty_results_produce_no_content() {
    let unit = Route::new("/unit", Method::POST, || ()).unwrap();
    assert!(unit.invoke(&[], b"").unwrap().is_empty());
    assert_eq!(unit.body_output(), None);

    let none = Route::new("/none", Method::GET, || Json(None::<Item>)).unwrap();
    assert!(none.invoke(&[], b"").unwrap().is_empty());

    let empty_string = Route::new("/empty", Method::GET, || Json(String::new())).unwrap();
    assert!(empty_string.invoke(&[], b"").unwrap().is_empty());

    let ok_unit = Route::new("/ok", Method::GET, || Ok::<(), anyhow::Error>(())).unwrap();
    assert!(ok_unit.invoke(&[], b"").unwrap().is_empty());
}

#[test]
fn test_non_empty_values_are_encoded() {
    let zero = Route::new("/zero", Method::GET, || Json(0)).unwrap();
    assert_eq!(zero.invoke(&[], b"").unwrap(), b"0");

    let empty_vec = Route::new("/list", Method::GET, || Json(Vec::<u8>::new())).unwrap();
    assert_eq!(empty_vec.invoke(&[], b"").unwrap(), b"[]");

    let some = Route::new("/some", Method::GET, || Json(Some("x"))).unwrap();
    assert_eq!(some.invoke(&[], b"").unwrap(), br#""x""#);

    let some_empty =
        Route::new("/some-empty", Method::GET, || Json(Some(String::new()))).unwrap();
    assert_eq!(some_empty.invoke(&[], b"").unwrap(), br#""""#);
}

#[test]
fn test_non_finite_float_is_marshal_error() {
    let nan = Route::new("/nan", Method::GET, || Json(f64::NAN)).unwrap();
    assert_eq!(nan.invoke(&[], b"").unwrap_err().kind(), ErrorKind::MarshalError);

    let inf = Route::new("/inf", Method::GET, || Ok::<_, anyhow::Error>(vec![1.5, f64::INFINITY]))
        .unwrap();
    assert_eq!(inf.invoke(&[], b"").unwrap_err().kind(), ErrorKind::MarshalError);
}

#[test]
fn test_marshal_error() {
    use std::collections::HashMap;

    // JSON object keys must be strings
    let route = Route::new("/bad", Method::GET, || {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1u8);
        Json(map)
    })
    .unwrap();
    let err = route.invoke(&[], b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MarshalError);
}

struct TwoErrors;

impl Responder for TwoErrors {
    type Body = ();

    fn outputs() -> &'static [OutputKind] {
        &[OutputKind::Error, OutputKind::Error]
    }

    fn into_outputs(self) -> Outputs<()> {
        Outputs::none()
    }
}

struct ThreeOutputs;

impl Responder for ThreeOutputs {
    type Body = ();

    fn outputs() -> &'static [OutputKind] {
        &[OutputKind::Body, OutputKind::Error, OutputKind::Body]
    }

    fn into_outputs(self) -> Outputs<()> {
        Outputs::none()
    }
}

#[test]
fn test_malformed_output_shapes_rejected() {
    let err = Route::new("/x", Method::GET, || TwoErrors).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRoute);
    assert!(err.to_string().contains("too many error return values"));

    let err = Route::new("/x", Method::GET, || ThreeOutputs).unwrap_err();
    assert!(err.to_string().contains("too many return values: 3 > 2"));
}

#[test]
fn test_route_is_shareable_across_threads() {
    let route = std::sync::Arc::new(Route::new("/sq/:n", Method::GET, |n: u32| Json(n * n)).unwrap());
    let handles: Vec<_> = (1..=4u32)
        .map(|n| {
            let route = std::sync::Arc::clone(&route);
            std::thread::spawn(move || route.invoke(&[n.to_string()], b"").unwrap())
        })
        .collect();
    let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![b"1".to_vec(), b"4".to_vec(), b"9".to_vec(), b"16".to_vec()]);
}
