use error_beacon::{
    all_members, private_members, public_members, AuditError, Beacon, ErrorKind, Fault, FuncValue,
    ReportOptions, ReportOverrides, Value,
};

fn raising(value: &'static str) -> FuncValue {
    FuncValue::native("inner", move |_args| Err(Fault::Value(Value::from(value))))
}

#[test]
fn wrap_passes_success_through_unchanged() {
    let beacon = Beacon::new();
    let double = FuncValue::native("double", |args| match args {
        [Value::Int(n)] => Ok(Value::from(n * 2)),
        _ => Ok(Value::Nil),
    });

    let wrapped = beacon.wrap(double, "math.double", Value::Nil);
    let result = wrapped.call(&[Value::from(21)]).expect("pass-through");
    assert!(matches!(result, Value::Int(42)));
    assert_eq!(beacon.record_count(), 0);
}

#[test]
fn wrap_classifies_a_plain_raised_value() {
    let beacon = Beacon::new();
    let wrapped = beacon.wrap(raising("oops"), "db.load", Value::from("connection#4"));

    let fault = wrapped.call(&[Value::from(7), Value::from("users")]).unwrap_err();
    let record = fault.record().expect("classified");

    assert_eq!(record.kind, ErrorKind::Generic);
    assert!(record.raw_message.contains("[db.load]"));
    assert!(record.raw_message.contains(r#"Arguments: [7,"users"]"#));
    assert!(record.raw_message.contains(r#"toString: "connection#4""#));
}

#[test]
fn wrap_reraises_the_same_record() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("networkError"), ReportOptions::default())
        .expect("fresh kind");

    let original = factory.raise("timeout");
    let original_id = original.id;
    let thrower = FuncValue::native("fetch", move |_args| Err(Fault::Raised(original.clone())));

    let wrapped = beacon.wrap(thrower, "api.fetch", Value::Nil);
    let fault = wrapped.call(&[]).unwrap_err();
    let record = fault.record().expect("still classified");

    assert_eq!(record.id, original_id);
    assert!(record.raw_message.starts_with("timeout"));
    assert!(record.raw_message.contains("[api.fetch]"));
    // The registry copy was amended in place.
    assert_eq!(beacon.record(original_id).expect("stored"), *record);
}

#[test]
fn nested_wraps_read_outermost_first() {
    let beacon = Beacon::new();
    let wrapped = beacon.wrap(raising("boom"), "inner.step", Value::Nil);
    let doubly = beacon.wrap(wrapped, "outer.step", Value::Nil);

    let fault = doubly.call(&[]).unwrap_err();
    let message = &fault.record().expect("classified").raw_message;

    let outer = message.find("[outer.step]").expect("outer line present");
    let inner = message.find("[inner.step]").expect("inner line present");
    assert!(outer < inner, "outermost context must read first: {message}");
}

#[test]
fn augmentation_failure_reraises_the_original_fault() {
    // A record raised on a different hub cannot be amended here, which
    // forces the augmentation path to fail.
    let foreign = Beacon::new();
    let stray = foreign.make_error(ErrorKind::Generic, "stray", ReportOverrides::default());
    let stray_message = stray.raw_message.clone();

    let beacon = Beacon::new();
    let thrower = FuncValue::native("leak", move |_args| Err(Fault::Raised(stray.clone())));
    let wrapped = beacon.wrap(thrower, "edge.case", Value::Nil);

    let fault = wrapped.call(&[]).unwrap_err();
    let record = fault.record().expect("record preserved");
    assert_eq!(record.raw_message, stray_message);
    assert!(!record.raw_message.contains("[edge.case]"));
    assert_eq!(beacon.record_count(), 0);
}

#[test]
fn wrap_all_decorates_selected_public_members() {
    let beacon = Beacon::new();
    let obj = Value::record([]);
    obj.insert("save", Value::Func(raising("disk gone")));
    obj.insert("_flush", Value::Func(raising("never wrapped")));
    obj.insert("limit", Value::from(3));

    let wrapped = beacon.wrap_all(&obj, "store.", public_members).expect("record value");
    assert_eq!(wrapped, 1);

    let Some(Value::Func(save)) = obj.get("save") else {
        panic!("save member must stay a function");
    };
    let fault = save.call(&[Value::from("row")]).unwrap_err();
    let record = fault.record().expect("classified");
    assert!(record.raw_message.contains("[store.save]"));
    // The context is the object itself.
    assert!(record.raw_message.contains("toString: {"));

    // The private member is untouched: it still raises a bare value.
    let Some(Value::Func(flush)) = obj.get("_flush") else {
        panic!("_flush member must stay a function");
    };
    let fault = flush.call(&[]).unwrap_err();
    assert!(fault.record().is_none());
}

#[test]
fn wrap_all_prefix_is_normalized_to_one_separator() {
    let beacon = Beacon::new();

    for prefix in ["store", "store.", "store..."] {
        let obj = Value::record([]);
        obj.insert("save", Value::Func(raising("x")));
        beacon.wrap_all(&obj, prefix, all_members).expect("record value");

        let Some(Value::Func(save)) = obj.get("save") else {
            panic!("save member must stay a function");
        };
        let fault = save.call(&[]).unwrap_err();
        let record = fault.record().expect("classified");
        assert!(
            record.raw_message.contains("[store.save]"),
            "prefix {prefix:?} produced {}",
            record.raw_message
        );
    }
}

#[test]
fn wrap_all_with_empty_prefix_uses_bare_names() {
    let beacon = Beacon::new();
    let obj = Value::record([]);
    obj.insert("_reset", Value::Func(raising("x")));

    beacon.wrap_all(&obj, "", private_members).expect("record value");

    let Some(Value::Func(reset)) = obj.get("_reset") else {
        panic!("_reset member must stay a function");
    };
    let fault = reset.call(&[]).unwrap_err();
    let record = fault.record().expect("classified");
    assert!(record.raw_message.contains("[_reset]"));
}

#[test]
fn wrap_all_rejects_non_record_targets() {
    let beacon = Beacon::new();
    let err = beacon.wrap_all(&Value::from(1), "x", all_members).unwrap_err();
    assert_eq!(err, AuditError::NotARecord);
}

#[test]
fn custom_selectors_see_name_and_value() {
    let beacon = Beacon::new();
    let obj = Value::record([]);
    obj.insert("alpha", Value::Func(raising("a")));
    obj.insert("beta", Value::Func(raising("b")));

    let wrapped = beacon
        .wrap_all(&obj, "", |name, _value| name == "beta")
        .expect("record value");
    assert_eq!(wrapped, 1);

    let Some(Value::Func(alpha)) = obj.get("alpha") else {
        panic!("alpha member must stay a function");
    };
    assert!(alpha.call(&[]).unwrap_err().record().is_none());
}
