use criterion::{criterion_group, criterion_main, Criterion};

const RFC3164_INPUT: &str =
    "<134>Feb 18 20:53:31 lb01 haproxy[376]: backend http-in has no server available!";
const RFC5424_INPUT: &str = r#"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut="3" eventSource="Application" eventID="1011"] BOMAn application event log entry..."#;

fn codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.bench_function("rfc3164", |b| {
        b.iter(|| {
            let _ = syslogkit::rfc3164::parse_message(RFC3164_INPUT);
        })
    });
    group.bench_function("rfc5424", |b| {
        b.iter(|| {
            let _ = syslogkit::rfc5424::parse_message(RFC5424_INPUT);
        })
    });
    group.finish();

    let components = syslogkit::rfc5424::parse_message(RFC5424_INPUT).unwrap();
    let mut group = c.benchmark_group("generate");
    group.bench_function("rfc5424", |b| {
        b.iter(|| {
            let _ = syslogkit::rfc5424::generate(&components);
        })
    });
    group.finish();
}

criterion_group!(benches, codec);
criterion_main!(benches);
