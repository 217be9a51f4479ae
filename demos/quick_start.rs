//! Minimal wiring: a factory, a reporter, a gated handler, and the audit
//! wrapper working together.

use error_beacon::{Beacon, ErrorKind, Fault, FuncValue, Handler, ReportOptions, Value};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let beacon = Beacon::new();

    // The host supplies delivery; here we just print.
    beacon.set_reporter(|record, extra| {
        println!("reported #{}: {} (extra: {})", record.id, record.user_message(), extra.len());
    });

    // Hold network errors at the gate and attach a severity before letting
    // them through.
    beacon.add_handler(
        ErrorKind::custom("networkError"),
        Handler::new()
            .before(|gate| gate.resolve(vec![Value::from("severity=high")]))
            .after(|| println!("post-report hook ran")),
    );

    let network = beacon
        .create_factory(
            ErrorKind::custom("networkError"),
            ReportOptions { report_immediately: true },
        )
        .expect("fresh kind");

    // A wrapped function enriches whatever it raises with call-site context.
    let fetch = FuncValue::native("fetch", move |_args| -> Result<Value, Fault> {
        Err(network.raise("timeout").into())
    });
    let wrapped = beacon.wrap(fetch, "api.fetch", Value::from("client#1"));

    if let Err(fault) = wrapped.call(&[Value::from("https://example.com")]) {
        println!("caught: {}", beacon.strip_token(&fault.to_string()));
    }

    // Records flagged for immediate reporting drain through the pipeline.
    let drained = beacon.pump().await;
    println!("pumped {drained} report(s)");
}
