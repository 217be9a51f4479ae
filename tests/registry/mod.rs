use error_beacon::{
    Beacon, ErrorKind, Fault, RegistryError, ReportOptions, ReportOverrides, SCHEMA_VERSION,
};

#[test]
fn duplicate_factory_registration_fails() {
    let beacon = Beacon::new();
    let kind = ErrorKind::custom("networkError");
    beacon
        .create_factory(kind.clone(), ReportOptions::default())
        .expect("fresh kind");

    let err = beacon
        .create_factory(kind.clone(), ReportOptions::default())
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateFactory(kind));
}

#[test]
fn builtin_kinds_are_registered_up_front() {
    let beacon = Beacon::new();
    for kind in [ErrorKind::Assertion, ErrorKind::Runtime, ErrorKind::Generic] {
        let err = beacon.create_factory(kind.clone(), ReportOptions::default());
        assert_eq!(err.unwrap_err(), RegistryError::DuplicateFactory(kind));
    }
}

#[test]
fn ids_are_assigned_in_raise_order() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("dbError"), ReportOptions::default())
        .expect("fresh kind");

    let first = factory.raise("deadlock");
    let second = factory.raise("constraint");
    assert_eq!(first.id, 0);
    assert_eq!(second.id, 1);
    assert_eq!(beacon.record_count(), 2);
}

#[test]
fn display_message_round_trips_through_recover() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("networkError"), ReportOptions::default())
        .expect("fresh kind");

    let record = factory.raise("timeout");
    assert!(record.display_message.starts_with("[e#"));
    assert!(record.display_message.ends_with("timeout"));

    let recovered = beacon.recover(&record.display_message).expect("token present");
    assert_eq!(recovered, record);
}

#[test]
fn recover_rejects_tokenless_and_out_of_range_text() {
    let beacon = Beacon::new();
    assert!(beacon.recover("plain message, no token").is_none());
    assert!(beacon.recover("[e#999] beyond the registry").is_none());
}

#[test]
fn recover_uses_the_first_token_only() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("dbError"), ReportOptions::default())
        .expect("fresh kind");
    let first = factory.raise("one");
    let second = factory.raise("two");

    let text = format!("{} trailing {}", first.display_message, second.display_message);
    let recovered = beacon.recover(&text).expect("token present");
    assert_eq!(recovered.id, first.id);
}

#[test]
fn strip_token_is_idempotent() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("networkError"), ReportOptions::default())
        .expect("fresh kind");

    let record = factory.raise("timeout");
    let once = beacon.strip_token(&record.display_message);
    assert_eq!(once, "timeout");
    assert_eq!(beacon.strip_token(&once), once);
}

#[test]
fn make_error_with_unknown_kind_falls_back_to_generic() {
    let beacon = Beacon::new();
    let record = beacon.make_error(
        ErrorKind::custom("doesNotExist"),
        "boom",
        ReportOverrides::default(),
    );

    assert_eq!(record.kind, ErrorKind::Generic);
    assert!(record.raw_message.contains("doesNotExist"));
    assert!(record.raw_message.contains("boom"));
}

#[test]
fn make_error_routes_registered_kinds_through_their_factory() {
    let beacon = Beacon::new();
    let kind = ErrorKind::custom("networkError");
    beacon
        .create_factory(kind.clone(), ReportOptions { report_immediately: true })
        .expect("fresh kind");

    let record = beacon.make_error(kind.clone(), "timeout", ReportOverrides::default());
    assert_eq!(record.kind, kind);
    assert_eq!(beacon.pending_reports(), 1);
}

#[test]
fn overrides_merge_over_factory_defaults() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(
            ErrorKind::custom("ioError"),
            ReportOptions { report_immediately: true },
        )
        .expect("fresh kind");

    factory.raise("queued");
    factory.raise_with("held back", ReportOverrides::report_immediately(false));
    assert_eq!(beacon.pending_reports(), 1);

    factory.raise_with("queued too", ReportOverrides::default());
    assert_eq!(beacon.pending_reports(), 2);
}

#[test]
fn stack_trace_comes_from_the_installed_provider() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("dbError"), ReportOptions::default())
        .expect("fresh kind");

    let bare = factory.raise("no provider yet");
    assert!(bare.stack_trace.is_none());

    beacon.set_stack_provider(|| Some("frame a\nframe b".to_string()));
    let traced = factory.raise("with provider");
    assert_eq!(traced.stack_trace.as_deref(), Some("frame a\nframe b"));
}

#[test]
fn records_export_the_documented_fields() {
    let beacon = Beacon::new();
    let factory = beacon
        .create_factory(ErrorKind::custom("networkError"), ReportOptions::default())
        .expect("fresh kind");

    let record = factory.raise("timeout");
    let json = serde_json::to_value(&record).expect("records serialize");

    assert_eq!(json["id"], 0);
    assert_eq!(json["kind"]["Custom"], "networkError");
    assert_eq!(json["raw_message"], "timeout");
    assert_eq!(json["schema_version"], SCHEMA_VERSION);
    assert!(json.get("audit_offset").is_none());
}

#[test]
fn ensure_raises_assertion_records() {
    let beacon = Beacon::new();
    assert!(beacon.ensure(true, "holds").is_ok());

    let fault = beacon.ensure(false, "broken invariant").unwrap_err();
    let record = fault.record().expect("classified");
    assert_eq!(record.kind, ErrorKind::Assertion);
    assert!(record.raw_message.contains("broken invariant"));
}

#[test]
fn dev_hooks_fire_on_assertion_failure() {
    use std::cell::Cell;
    use std::rc::Rc;

    let beacon = Beacon::new();
    let alerts = Rc::new(Cell::new(0));
    let breaks = Rc::new(Cell::new(0));

    {
        let alerts = alerts.clone();
        beacon.set_alert_hook(move |_record| alerts.set(alerts.get() + 1));
    }
    {
        let breaks = breaks.clone();
        beacon.set_break_hook(move |_record| breaks.set(breaks.get() + 1));
    }

    let _ = beacon.ensure(true, "fine");
    assert_eq!((alerts.get(), breaks.get()), (0, 0));

    let _ = beacon.fail("woops");
    assert_eq!((alerts.get(), breaks.get()), (1, 1));
}

#[test]
fn assertion_macros_early_return() {
    fn guarded(beacon: &Beacon, input: i64) -> Result<i64, Fault> {
        error_beacon::ensure!(beacon, input >= 0, "negative input: {}", input);
        if input > 100 {
            error_beacon::fail!(beacon, "input {} exceeds the limit", input);
        }
        Ok(input * 2)
    }

    let beacon = Beacon::new();
    assert_eq!(guarded(&beacon, 21).unwrap(), 42);

    let fault = guarded(&beacon, -1).unwrap_err();
    assert!(fault.to_string().contains("negative input: -1"));

    let fault = guarded(&beacon, 101).unwrap_err();
    assert!(fault.to_string().contains("exceeds the limit"));
}
