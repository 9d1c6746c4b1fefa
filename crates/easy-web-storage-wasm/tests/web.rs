#![cfg(target_arch = "wasm32")]

use std::{cell::RefCell, rc::Rc};

use easy_web_storage_wasm::EasyWebStorage;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(value: Value) -> JsValue {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap()
}

fn json_of(value: JsValue) -> Value {
    let text = js_sys::JSON::stringify(&value).unwrap().as_string().unwrap();
    serde_json::from_str(&text).unwrap()
}

fn local_storage() -> web_sys::Storage {
    web_sys::window().unwrap().local_storage().unwrap().unwrap()
}

fn open(storage: &str, key: &str) -> EasyWebStorage {
    local_storage().remove_item(key).unwrap();
    EasyWebStorage::new(js(json!({ "storage": storage, "key": key }))).ok().unwrap()
}

#[wasm_bindgen_test]
fn when_value_is_set_then_get_returns_equal_value() {
    let store = open("localStorage", "web-round-trip");

    store.set(js(json!({ "name": "a", "age": 1 })));

    assert_eq!(json_of(store.get()), json!({ "name": "a", "age": 1 }));
    assert_eq!(local_storage().get_item("web-round-trip").unwrap().as_deref(), Some(r#"{"name":"a","age":1}"#));
}

#[wasm_bindgen_test]
fn when_undefined_is_set_then_null_is_stored() {
    let store = open("localStorage", "web-undefined");

    store.set(JsValue::UNDEFINED);

    assert_eq!(local_storage().get_item("web-undefined").unwrap().as_deref(), Some("null"));
    assert!(store.get().is_null());
}

#[wasm_bindgen_test]
fn when_storage_kind_is_unsupported_then_store_is_inert() {
    let store = open("cookieStorage", "web-inert");

    store.set(js(json!(1)));
    store.remove();

    assert!(store.get().is_null());
    assert_eq!(local_storage().get_item("web-inert").unwrap(), None);
}

#[wasm_bindgen_test]
fn when_initial_value_is_a_function_then_its_result_is_stored() {
    local_storage().remove_item("web-initial").unwrap();
    let options = js(json!({ "storage": "localStorage", "key": "web-initial" }));
    let factory = js_sys::Function::new_no_args("return { name: 'a', age: 1 };");
    js_sys::Reflect::set(&options, &JsValue::from_str("initialValue"), &factory).unwrap();

    let store = EasyWebStorage::new(options).ok().unwrap();

    assert_eq!(json_of(store.get()), json!({ "name": "a", "age": 1 }));
}

#[wasm_bindgen_test]
fn when_initial_value_factory_throws_then_nothing_is_stored() {
    local_storage().remove_item("web-initial-throws").unwrap();
    let options = js(json!({ "storage": "localStorage", "key": "web-initial-throws" }));
    let factory = js_sys::Function::new_no_args("throw new Error('boom');");
    js_sys::Reflect::set(&options, &JsValue::from_str("initialValue"), &factory).unwrap();

    let store = EasyWebStorage::new(options).ok().unwrap();

    assert!(store.get().is_null());
    assert_eq!(local_storage().get_item("web-initial-throws").unwrap(), None);
}

#[wasm_bindgen_test]
fn when_date_is_set_then_its_json_form_is_stored() {
    let store = open("localStorage", "web-date");

    store.set(js_sys::Date::new(&JsValue::from_f64(0.0)).into());

    assert_eq!(
        local_storage().get_item("web-date").unwrap().as_deref(),
        Some(r#""1970-01-01T00:00:00.000Z""#)
    );
    assert_eq!(store.get().as_string().as_deref(), Some("1970-01-01T00:00:00.000Z"));
}

#[wasm_bindgen_test]
fn when_property_is_undefined_then_it_is_dropped() {
    let store = open("localStorage", "web-undefined-property");
    let value = js_sys::Object::new();
    js_sys::Reflect::set(&value, &JsValue::from_str("a"), &JsValue::UNDEFINED).unwrap();
    js_sys::Reflect::set(&value, &JsValue::from_str("b"), &JsValue::from_f64(1.0)).unwrap();

    store.set(value.into());

    assert_eq!(local_storage().get_item("web-undefined-property").unwrap().as_deref(), Some(r#"{"b":1}"#));
    assert_eq!(json_of(store.get()), json!({ "b": 1 }));
}

#[wasm_bindgen_test]
fn when_stored_text_is_malformed_then_get_returns_null() {
    let store = open("localStorage", "web-malformed");

    local_storage().set_item("web-malformed", "{oops").unwrap();

    assert!(store.get().is_null());
}

#[wasm_bindgen_test]
fn when_value_changes_then_observers_receive_new_and_old_values() {
    let mut store = open("localStorage", "web-observers");
    let calls: Rc<RefCell<Vec<(Value, Value)>>> = Rc::default();
    let recorded = calls.clone();
    let observer = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |new: JsValue, old: JsValue| {
        recorded.borrow_mut().push((json_of(new), json_of(old)));
    });
    let handle = store.on_change(observer.as_ref().unchecked_ref::<js_sys::Function>().clone()).ok().unwrap();

    store.set(js(json!(1)));
    store.set(js(json!(2)));
    assert!(store.off_change(handle));
    store.set(js(json!(3)));

    assert_eq!(*calls.borrow(), vec![(json!(1), Value::Null), (json!(2), json!(1))]);
}

#[wasm_bindgen_test]
fn when_observer_throws_then_later_observers_still_run_and_value_is_written() {
    let mut store = open("localStorage", "web-observer-throws");
    let calls: Rc<RefCell<Vec<Value>>> = Rc::default();
    let recorded = calls.clone();
    let observer = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |new: JsValue, _old: JsValue| {
        recorded.borrow_mut().push(json_of(new));
    });
    store.on_change(js_sys::Function::new_with_args("n, o", "throw new Error('boom');")).ok().unwrap();
    store.on_change(observer.as_ref().unchecked_ref::<js_sys::Function>().clone()).ok().unwrap();

    store.set(js(json!(1)));

    assert_eq!(*calls.borrow(), vec![json!(1)]);
    assert_eq!(local_storage().get_item("web-observer-throws").unwrap().as_deref(), Some("1"));
}

#[wasm_bindgen_test]
fn when_value_is_removed_then_remove_observer_receives_key_and_old_value() {
    let mut store = open("sessionStorage", "web-remove");
    let calls: Rc<RefCell<Vec<(String, Value)>>> = Rc::default();
    let recorded = calls.clone();
    let observer = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |key: JsValue, old: JsValue| {
        recorded.borrow_mut().push((key.as_string().unwrap(), json_of(old)));
    });
    store.on_remove(observer.as_ref().unchecked_ref::<js_sys::Function>().clone()).ok().unwrap();

    store.set(js(json!("kept")));
    store.remove();

    assert_eq!(*calls.borrow(), vec![("web-remove".to_owned(), json!("kept"))]);
    assert!(store.get().is_null());
    assert_eq!(store.key(), "web-remove");
}

#[wasm_bindgen_test]
fn when_options_are_not_an_object_then_constructor_returns_error() {
    let error = EasyWebStorage::new(JsValue::from_f64(1.0)).err().unwrap();

    assert_eq!(error.r#type, "InvalidOptions");
}
